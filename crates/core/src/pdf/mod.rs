//! Invoice rendering with the PDF standard fonts.

mod layout;
mod text;

pub use layout::{paginate, row_capacity, table_columns, Column, Columns, PageLayout};
pub use text::{encode_win_ansi, fit_text, text_width};

use crate::report::{format_amounts, format_date, format_duration, DurationFormat, TimeEntry, Totals};
use layout::{
    BOTTOM_LIMIT, CONTENT_WIDTH, INVOICE_HEADER_HEIGHT, MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
    PAYPAL_BUTTON_HEIGHT, ROW_HEIGHT, TABLE_HEADER_HEIGHT,
};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

const BODY_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 4.0;
const ADDRESS_LINES: usize = 3;

type Rgb = (f32, f32, f32);
const HEADER_FILL: Rgb = (0.91, 0.93, 0.96);
const RULE: Rgb = (0.75, 0.77, 0.8);
const PAYPAL_BLUE: Rgb = (0.0, 0.19, 0.53);
const WHITE: Rgb = (1.0, 1.0, 1.0);
const BLACK: Rgb = (0.0, 0.0, 0.0);

/// Everything printed on an invoice
#[derive(Debug, Clone, Default)]
pub struct Invoice {
    pub workspace_name: String,
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    /// Issue and due dates as supplied by the user, printed verbatim
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub period_start: String,
    pub period_end: String,
    pub columns: Columns,
    pub duration_format: DurationFormat,
    pub entries: Vec<TimeEntry>,
    /// Sanitised `https://paypal.me/...` link
    pub paypal_link: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Thin drawing layer over a content stream
struct Canvas {
    content: Content,
}

impl Canvas {
    fn new() -> Self {
        Self {
            content: Content::new(),
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, text: &str, color: Rgb) {
        let bytes = encode_win_ansi(text);
        self.content.set_fill_rgb(color.0, color.1, color.2);
        self.content
            .begin_text()
            .set_font(if bold { BOLD } else { REGULAR }, size)
            .next_line(x, y)
            .show(Str(&bytes))
            .end_text();
    }

    fn text_right(&mut self, right: f32, y: f32, size: f32, bold: bool, text: &str) {
        let x = right - text_width(text, size, bold);
        self.text(x, y, size, bold, text, BLACK);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.content.set_fill_rgb(color.0, color.1, color.2);
        self.content.rect(x, y, width, height).fill_nonzero();
    }

    fn rule(&mut self, y: f32) {
        self.content
            .set_stroke_rgb(RULE.0, RULE.1, RULE.2)
            .set_line_width(0.5)
            .move_to(MARGIN, y)
            .line_to(PAGE_WIDTH - MARGIN, y)
            .stroke();
    }

    fn finish(self) -> Vec<u8> {
        self.content.finish()
    }
}

/// Draws the invoice header; returns the y where the table starts
fn draw_invoice_header(canvas: &mut Canvas, invoice: &Invoice) -> f32 {
    let top = PAGE_HEIGHT - MARGIN;
    let right = PAGE_WIDTH - MARGIN;

    canvas.text(MARGIN, top - 22.0, 22.0, true, "INVOICE", BLACK);
    let workspace = fit_text(&invoice.workspace_name, CONTENT_WIDTH / 2.0, 12.0, true);
    canvas.text(MARGIN, top - 44.0, 12.0, true, &workspace, BLACK);

    let issue = non_empty(invoice.issue_date.as_deref()).unwrap_or("-");
    let due = non_empty(invoice.due_date.as_deref()).unwrap_or("Upon receipt");
    canvas.text_right(right, top - 16.0, 10.0, false, &format!("Issue date: {issue}"));
    canvas.text_right(right, top - 30.0, 10.0, false, &format!("Due date: {due}"));

    let mut y = top - 80.0;
    canvas.text(MARGIN, y, 10.0, true, "Bill to:", BLACK);
    y -= 14.0;
    let client = non_empty(invoice.client_name.as_deref()).unwrap_or("-");
    canvas.text(MARGIN, y, 10.0, false, &fit_text(client, CONTENT_WIDTH, 10.0, false), BLACK);
    if let Some(address) = non_empty(invoice.client_address.as_deref()) {
        for line in address.lines().map(str::trim).filter(|l| !l.is_empty()).take(ADDRESS_LINES) {
            y -= 13.0;
            canvas.text(MARGIN, y, 10.0, false, &fit_text(line, CONTENT_WIDTH, 10.0, false), BLACK);
        }
    }

    let period = format!(
        "Period: {} - {}",
        format_date(Some(&invoice.period_start)),
        format_date(Some(&invoice.period_end)),
    );
    canvas.text(MARGIN, top - INVOICE_HEADER_HEIGHT + 30.0, 10.0, false, &period, BLACK);

    top - INVOICE_HEADER_HEIGHT
}

fn cell_text(column: Column, entry: &TimeEntry, format: DurationFormat) -> String {
    let or_dash = |value: &Option<String>| non_empty(value.as_deref()).unwrap_or("-").to_string();
    match column {
        Column::Date => format_date(entry.start.as_deref()),
        Column::Description => or_dash(&entry.description),
        Column::Project => or_dash(&entry.project_name),
        Column::Task => or_dash(&entry.task_name),
        Column::Duration => format_duration(entry.duration_seconds, format),
        Column::Amount if entry.amounts.is_empty() => "-".to_string(),
        Column::Amount => format_amounts(&entry.amounts),
    }
}

fn draw_cell(canvas: &mut Canvas, column: Column, x: f32, width: f32, y: f32, bold: bool, value: &str) {
    let text = fit_text(value, width - 2.0 * CELL_PADDING, BODY_SIZE, bold);
    if column.is_numeric() {
        canvas.text_right(x + width - CELL_PADDING, y, BODY_SIZE, bold, &text);
    } else {
        canvas.text(x + CELL_PADDING, y, BODY_SIZE, bold, &text, BLACK);
    }
}

/// Draws the table header and the page's rows; returns the y below them
fn draw_table(canvas: &mut Canvas, invoice: &Invoice, page: &PageLayout, top: f32) -> f32 {
    let columns = table_columns(invoice.columns);

    let header_bottom = top - TABLE_HEADER_HEIGHT;
    canvas.fill_rect(MARGIN, header_bottom, CONTENT_WIDTH, TABLE_HEADER_HEIGHT, HEADER_FILL);
    for &(column, x, width) in &columns {
        draw_cell(canvas, column, x, width, header_bottom + 7.0, true, column.title());
    }

    let mut y = header_bottom;
    for entry in &invoice.entries[page.rows.clone()] {
        for &(column, x, width) in &columns {
            let value = cell_text(column, entry, invoice.duration_format);
            draw_cell(canvas, column, x, width, y - 12.0, false, &value);
        }
        y -= ROW_HEIGHT;
        canvas.rule(y);
    }
    y
}

/// Draws totals and the optional payment button; returns the button area
fn draw_totals(canvas: &mut Canvas, invoice: &Invoice, totals: &Totals, top: f32) -> Option<Rect> {
    let right = PAGE_WIDTH - MARGIN;
    let mut y = top - 20.0;
    canvas.text(MARGIN, y, 10.0, true, "Total duration", BLACK);
    canvas.text_right(right, y, 10.0, true, &totals.duration_display(invoice.duration_format));
    y -= 16.0;
    canvas.text(MARGIN, y, 10.0, true, "Total amount", BLACK);
    canvas.text_right(right, y, 10.0, true, &totals.amounts_display());

    invoice.paypal_link.as_ref()?;

    let label = "Pay with PayPal";
    let width = text_width(label, 11.0, true) + 40.0;
    let bottom = y - 24.0 - PAYPAL_BUTTON_HEIGHT;
    canvas.fill_rect(MARGIN, bottom, width, PAYPAL_BUTTON_HEIGHT, PAYPAL_BLUE);
    canvas.text(MARGIN + 20.0, bottom + 10.0, 11.0, true, label, WHITE);

    Some(Rect::new(MARGIN, bottom, MARGIN + width, bottom + PAYPAL_BUTTON_HEIGHT))
}

/// Render `invoice` to PDF bytes
#[must_use]
pub fn render_invoice(invoice: &Invoice) -> Vec<u8> {
    let pages = paginate(invoice.entries.len(), invoice.paypal_link.is_some());
    let totals = Totals::from_entries(&invoice.entries);
    let page_count = pages.len();

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();
    let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_count as i32);
    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (index, layout) in pages.iter().enumerate() {
        let mut canvas = Canvas::new();
        let mut y = if index == 0 {
            draw_invoice_header(&mut canvas, invoice)
        } else {
            PAGE_HEIGHT - MARGIN
        };

        if layout.table {
            y = draw_table(&mut canvas, invoice, layout, y);
        }
        let button = if layout.totals {
            draw_totals(&mut canvas, invoice, &totals, y)
        } else {
            None
        };

        let footer = format!("Page {} of {page_count}", index + 1);
        let footer_x = (PAGE_WIDTH - text_width(&footer, 8.0, false)) / 2.0;
        canvas.text(footer_x, BOTTOM_LIMIT - 30.0, 8.0, false, &footer, BLACK);

        let content_id = alloc.bump();
        let mut page = pdf.page(page_ids[index]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(page_tree_id)
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(REGULAR, regular_id)
            .pair(BOLD, bold_id);
        if let Some((rect, uri)) = button.zip(invoice.paypal_link.as_deref()) {
            let mut annotations = page.annotations();
            let mut annotation = annotations.push();
            annotation.subtype(AnnotationType::Link).rect(rect);
            annotation
                .insert(Name(b"Border"))
                .array()
                .items([0.0f32, 0.0, 0.0]);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(uri.as_bytes()));
        }
        page.finish();

        pdf.stream(content_id, &canvas.finish());
    }

    pdf.finish()
}
