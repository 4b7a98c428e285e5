use crate::auth::AddonClaims;
use crate::clockify::{ClockifyClient, ClockifyError, Workspace};
use crate::pdf::{render_invoice, Columns, Invoice};
use crate::report::{extract_entries, ReportFilter, TimeEntry, Totals};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Token does not carry a {0}")]
    MissingUrl(&'static str),

    #[error(transparent)]
    Clockify(#[from] ClockifyError),
}

/// Where and as whom to call Clockify
#[derive(Debug, Clone, Copy)]
pub struct ClockifyContext<'a> {
    pub backend_url: &'a str,
    pub reports_url: &'a str,
    pub workspace_id: &'a str,
    pub token: &'a str,
}

impl<'a> ClockifyContext<'a> {
    /// Resolve API locations from verified claims
    pub fn from_claims(claims: &'a AddonClaims, token: &'a str) -> Result<Self, ReportError> {
        Ok(Self {
            backend_url: claims.backend_url().ok_or(ReportError::MissingUrl("backend URL"))?,
            reports_url: claims.reports_url().ok_or(ReportError::MissingUrl("reports URL"))?,
            workspace_id: &claims.workspace_id,
            token,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSettings {
    pub duration_format: String,
}

/// JSON body of a report preview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPreview {
    pub report_data: Value,
    pub workspace_settings: PreviewSettings,
    pub entries: Vec<TimeEntry>,
    pub totals: Totals,
}

/// Invoice fields supplied with a PDF request
#[derive(Debug, Clone, Default)]
pub struct InvoiceDetails {
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    pub columns: Columns,
    /// Already sanitised payment link
    pub paypal_link: Option<String>,
}

/// Fetches reports from Clockify and turns them into previews or invoices
#[derive(Clone)]
pub struct ReportService {
    clockify: ClockifyClient,
}

impl ReportService {
    #[must_use]
    pub fn new(clockify: ClockifyClient) -> Self {
        Self { clockify }
    }

    /// Active clients of the workspace, verbatim
    ///
    /// Only the backend API is involved, so a token without a reports URL
    /// is accepted here.
    pub async fn clients(&self, claims: &AddonClaims, token: &str) -> Result<Value, ReportError> {
        let backend_url = claims
            .backend_url()
            .ok_or(ReportError::MissingUrl("backend URL"))?;
        Ok(self
            .clockify
            .list_clients(backend_url, &claims.workspace_id, token)
            .await?)
    }

    async fn fetch(
        &self,
        ctx: ClockifyContext<'_>,
        filter: &ReportFilter,
    ) -> Result<(Workspace, Value, Vec<TimeEntry>), ReportError> {
        let workspace = self
            .clockify
            .workspace(ctx.backend_url, ctx.workspace_id, ctx.token)
            .await?;
        let report = self
            .clockify
            .detailed_report(ctx.reports_url, ctx.workspace_id, ctx.token, filter)
            .await?;

        let fetched = extract_entries(&report);
        let fetched_count = fetched.len();
        let entries = filter.apply(fetched);
        debug!(
            workspace_id = ctx.workspace_id,
            fetched = fetched_count,
            kept = entries.len(),
            "Report entries filtered"
        );
        Ok((workspace, report, entries))
    }

    /// Raw report plus the filtered entries and their totals
    pub async fn preview(
        &self,
        ctx: ClockifyContext<'_>,
        filter: &ReportFilter,
    ) -> Result<ReportPreview, ReportError> {
        let (workspace, report_data, entries) = self.fetch(ctx, filter).await?;
        let totals = Totals::from_entries(&entries);

        Ok(ReportPreview {
            report_data,
            workspace_settings: PreviewSettings {
                duration_format: workspace
                    .workspace_settings
                    .duration_format
                    .unwrap_or_else(|| "FULL".to_string()),
            },
            entries,
            totals,
        })
    }

    /// Render the filtered report as an invoice PDF
    pub async fn invoice_pdf(
        &self,
        ctx: ClockifyContext<'_>,
        filter: &ReportFilter,
        details: InvoiceDetails,
    ) -> Result<Vec<u8>, ReportError> {
        let (workspace, _, entries) = self.fetch(ctx, filter).await?;
        let duration_format = workspace.duration_format();

        let invoice = Invoice {
            workspace_name: workspace.name,
            client_name: details.client_name,
            client_address: details.client_address,
            issue_date: details.issue_date,
            due_date: details.due_date,
            period_start: filter.start.clone(),
            period_end: filter.end.clone(),
            columns: details.columns,
            duration_format,
            entries,
            paypal_link: details.paypal_link,
        };

        let pdf = render_invoice(&invoice);
        info!(
            workspace_id = ctx.workspace_id,
            rows = invoice.entries.len(),
            bytes = pdf.len(),
            "Invoice rendered"
        );
        Ok(pdf)
    }
}
