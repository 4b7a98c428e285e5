use crate::auth::AddonAuth;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use clockbill_core::pdf::Columns;
use clockbill_core::report::{sanitize_paypal_link, BillableFilter, ReportFilter};
use clockbill_core::{ClockifyContext, InvoiceDetails};
use serde::Deserialize;

/// A single id or a list of ids
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    One(String),
    Many(Vec<String>),
}

impl IdList {
    fn into_vec(self) -> Vec<String> {
        let ids = match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        };
        ids.into_iter().filter(|id| !id.trim().is_empty()).collect()
    }
}

/// Body of `POST /reports`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub preview: bool,

    pub billable_filter: Option<String>,
    pub client_filter: Option<String>,
    pub project_filter: Option<IdList>,
    pub task_filter: Option<IdList>,
    pub description_filter: Option<String>,
    #[serde(default)]
    pub without_task: bool,
    #[serde(default)]
    pub without_description: bool,

    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub issue_date: Option<String>,
    pub due_date: Option<String>,
    #[serde(rename = "USER_PAYPAL_LINK")]
    pub paypal_link: Option<String>,
    #[serde(default)]
    pub columns: Columns,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ReportRequest {
    fn filter(&self) -> Result<ReportFilter, ApiError> {
        let (Some(start), Some(end)) = (
            non_blank(self.start.clone()),
            non_blank(self.end.clone()),
        ) else {
            return Err(ApiError::BadRequest(
                "Missing required fields: start, end".to_string(),
            ));
        };

        Ok(ReportFilter {
            start,
            end,
            billable: BillableFilter::from_param(self.billable_filter.as_deref()),
            client_id: non_blank(self.client_filter.clone()),
            project_ids: self.project_filter.clone().map(IdList::into_vec).unwrap_or_default(),
            task_ids: self.task_filter.clone().map(IdList::into_vec).unwrap_or_default(),
            description: non_blank(self.description_filter.clone()),
            without_task: self.without_task,
            without_description: self.without_description,
        })
    }
}

/// `report-2024-03-01-to-2024-03-31.pdf`
fn pdf_filename(filter: &ReportFilter) -> String {
    let date = |ts: &str| -> String {
        ts.split('T')
            .next()
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect()
    };
    format!("report-{}-to-{}.pdf", date(&filter.start), date(&filter.end))
}

/// `POST /reports`: JSON preview, or a metered PDF invoice
pub async fn generate_report(
    State(state): State<AppState>,
    auth: AddonAuth,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let filter = request.filter()?;
    let ctx = ClockifyContext::from_claims(&auth.claims, &auth.token)?;

    if request.preview {
        let preview = state.reports.preview(ctx, &filter).await?;
        return Ok(Json(preview).into_response());
    }

    let paypal_link = non_blank(request.paypal_link)
        .map(|link| sanitize_paypal_link(&link))
        .transpose()?;

    let count = state.trial.consume_download(ctx.workspace_id).await?;
    tracing::info!(
        workspace_id = ctx.workspace_id,
        downloads = count,
        limit = state.trial.limit(),
        "PDF download granted"
    );

    let details = InvoiceDetails {
        client_name: request.client_name,
        client_address: request.client_address,
        issue_date: request.issue_date,
        due_date: request.due_date,
        columns: request.columns,
        paypal_link,
    };
    let pdf = state.reports.invoice_pdf(ctx, &filter, details).await?;

    let disposition = format!("attachment; filename=\"{}\"", pdf_filename(&filter));
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}
