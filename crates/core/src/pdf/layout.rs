//! Page geometry and pagination of the invoice table.

use serde::Deserialize;
use std::ops::Range;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 50.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

pub const ROW_HEIGHT: f32 = 18.0;
pub const TABLE_HEADER_HEIGHT: f32 = 22.0;
/// Height of the invoice header block on the first page
pub const INVOICE_HEADER_HEIGHT: f32 = 190.0;
/// Lowest y a table row may occupy; the page number sits below
pub const BOTTOM_LIMIT: f32 = 70.0;

pub const TOTALS_HEIGHT: f32 = 60.0;
pub const PAYPAL_BUTTON_HEIGHT: f32 = 28.0;
pub const PAYPAL_BLOCK_HEIGHT: f32 = PAYPAL_BUTTON_HEIGHT + 22.0;

/// Which optional columns appear in the PDF table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub date: bool,
    pub description: bool,
    pub project: bool,
    pub task: bool,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            date: true,
            description: true,
            project: true,
            task: true,
        }
    }
}

/// A table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Description,
    Project,
    Task,
    Duration,
    Amount,
}

impl Column {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Description => "Description",
            Self::Project => "Project",
            Self::Task => "Task",
            Self::Duration => "Duration",
            Self::Amount => "Amount",
        }
    }

    /// Relative share of the table width
    fn weight(self) -> f32 {
        match self {
            Self::Date => 1.2,
            Self::Description => 3.0,
            Self::Project => 1.8,
            Self::Task => 1.6,
            Self::Duration => 1.2,
            Self::Amount => 1.6,
        }
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Duration | Self::Amount)
    }
}

/// Visible columns with their x offset and width, left to right
#[must_use]
pub fn table_columns(columns: Columns) -> Vec<(Column, f32, f32)> {
    let visible: Vec<Column> = [
        (columns.date, Column::Date),
        (columns.description, Column::Description),
        (columns.project, Column::Project),
        (columns.task, Column::Task),
        (true, Column::Duration),
        (true, Column::Amount),
    ]
    .into_iter()
    .filter_map(|(shown, column)| shown.then_some(column))
    .collect();

    let total_weight: f32 = visible.iter().map(|c| c.weight()).sum();
    let mut x = MARGIN;
    visible
        .into_iter()
        .map(|column| {
            let width = CONTENT_WIDTH * column.weight() / total_weight;
            let placed = (column, x, width);
            x += width;
            placed
        })
        .collect()
}

/// What one page of the invoice carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Rows of the entry table on this page
    pub rows: Range<usize>,
    /// Whether the table (header row) is drawn
    pub table: bool,
    /// Whether the totals block follows the rows
    pub totals: bool,
}

fn rows_fitting(space: f32) -> usize {
    ((space - TABLE_HEADER_HEIGHT) / ROW_HEIGHT).floor().max(1.0) as usize
}

/// Rows per page on the first and on following pages
#[must_use]
pub fn row_capacity() -> (usize, usize) {
    let top = PAGE_HEIGHT - MARGIN;
    let first = rows_fitting(top - INVOICE_HEADER_HEIGHT - BOTTOM_LIMIT);
    let rest = rows_fitting(top - BOTTOM_LIMIT);
    (first, rest)
}

/// Split `row_count` rows into pages
///
/// The totals block (and PayPal button when `with_paypal`) goes after the
/// last row; when it does not fit there it moves to a page of its own.
#[must_use]
pub fn paginate(row_count: usize, with_paypal: bool) -> Vec<PageLayout> {
    let (first, rest) = row_capacity();

    let mut pages = Vec::new();
    let mut start = 0;
    let mut capacity = first;
    loop {
        let end = (start + capacity).min(row_count);
        pages.push(PageLayout {
            rows: start..end,
            table: true,
            totals: false,
        });
        if end >= row_count {
            break;
        }
        start = end;
        capacity = rest;
    }

    let footer_height = TOTALS_HEIGHT + if with_paypal { PAYPAL_BLOCK_HEIGHT } else { 0.0 };
    let last_index = pages.len() - 1;
    let last_capacity = if last_index == 0 { first } else { rest };
    let used = pages[last_index].rows.len();
    let remaining = (last_capacity - used) as f32 * ROW_HEIGHT;

    if remaining >= footer_height {
        pages[last_index].totals = true;
    } else {
        pages.push(PageLayout {
            rows: row_count..row_count,
            table: false,
            totals: true,
        });
    }

    pages
}
