//! Client for the Clockify REST and Reports APIs, authenticated with the
//! add-on token.

use crate::report::{BillableFilter, DurationFormat, ReportFilter};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, error};

const ADDON_TOKEN_HEADER: &str = "X-Addon-Token";
const REPORT_PAGE_SIZE: u32 = 1000;

#[derive(Error, Debug)]
pub enum ClockifyError {
    #[error("Clockify request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Clockify API error {status}: {body}")]
    Status { status: u16, body: String },
}

/// Workspace details needed for rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub workspace_settings: WorkspaceSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub duration_format: Option<String>,
}

impl Workspace {
    #[must_use]
    pub fn duration_format(&self) -> DurationFormat {
        DurationFormat::from_setting(self.workspace_settings.duration_format.as_deref())
    }
}

/// Request body of the detailed report endpoint
#[must_use]
pub fn detailed_report_body(filter: &ReportFilter) -> Value {
    let mut body = Map::new();
    body.insert("dateRangeStart".into(), json!(filter.start));
    body.insert("dateRangeEnd".into(), json!(filter.end));
    body.insert(
        "detailedFilter".into(),
        json!({ "page": 1, "pageSize": REPORT_PAGE_SIZE }),
    );
    body.insert("amountShown".into(), json!("EARNED"));
    body.insert("exportType".into(), json!("JSON"));

    if filter.billable == BillableFilter::BillableOnly {
        body.insert("billable".into(), json!(true));
    }
    if let Some(client_id) = &filter.client_id {
        body.insert(
            "clients".into(),
            json!({ "ids": [client_id], "contains": "CONTAINS", "status": "ALL" }),
        );
    }
    if !filter.project_ids.is_empty() {
        body.insert(
            "projects".into(),
            json!({ "ids": filter.project_ids, "contains": "CONTAINS", "status": "ALL" }),
        );
    }
    if !filter.without_task && !filter.task_ids.is_empty() {
        body.insert(
            "tasks".into(),
            json!({ "ids": filter.task_ids, "contains": "CONTAINS", "status": "ALL" }),
        );
    }
    if filter.without_description {
        body.insert("withoutDescription".into(), json!(true));
    } else if let Some(description) = filter.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            body.insert("description".into(), json!(description));
        }
    }

    Value::Object(body)
}

/// Clockify API client
#[derive(Clone)]
pub struct ClockifyClient {
    http: reqwest::Client,
}

impl ClockifyClient {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Active clients of a workspace, sorted by name, as returned by Clockify
    pub async fn list_clients(
        &self,
        backend_url: &str,
        workspace_id: &str,
        token: &str,
    ) -> Result<Value, ClockifyError> {
        let url = format!(
            "{backend_url}/v1/workspaces/{workspace_id}/clients?archived=false&page-size=1000&sort-column=NAME&sort-order=ASCENDING"
        );
        debug!(%url, "Fetching clients");
        let response = self
            .http
            .get(&url)
            .header(ADDON_TOKEN_HEADER, token)
            .send()
            .await?;
        Self::json(response).await
    }

    pub async fn workspace(
        &self,
        backend_url: &str,
        workspace_id: &str,
        token: &str,
    ) -> Result<Workspace, ClockifyError> {
        let url = format!("{backend_url}/v1/workspaces/{workspace_id}");
        debug!(%url, "Fetching workspace");
        let response = self
            .http
            .get(&url)
            .header(ADDON_TOKEN_HEADER, token)
            .send()
            .await?;
        Self::json(response).await
    }

    /// Raw detailed report for the filter's date range
    pub async fn detailed_report(
        &self,
        reports_url: &str,
        workspace_id: &str,
        token: &str,
        filter: &ReportFilter,
    ) -> Result<Value, ClockifyError> {
        let url = format!("{reports_url}/v1/workspaces/{workspace_id}/reports/detailed");
        debug!(%url, "Fetching detailed report");
        let response = self
            .http
            .post(&url)
            .header(ADDON_TOKEN_HEADER, token)
            .json(&detailed_report_body(filter))
            .send()
            .await?;
        Self::json(response).await
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClockifyError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Clockify API error: {}", body);
            return Err(ClockifyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_report_body() {
        let filter = ReportFilter {
            start: "2024-03-01T00:00:00Z".to_string(),
            end: "2024-03-31T23:59:59Z".to_string(),
            ..ReportFilter::default()
        };
        let body = detailed_report_body(&filter);

        assert_eq!(body["dateRangeStart"], "2024-03-01T00:00:00Z");
        assert_eq!(body["dateRangeEnd"], "2024-03-31T23:59:59Z");
        assert_eq!(body["detailedFilter"]["pageSize"], 1000);
        assert_eq!(body["amountShown"], "EARNED");
        assert!(body.get("billable").is_none());
        assert!(body.get("clients").is_none());
        assert!(body.get("projects").is_none());
        assert!(body.get("tasks").is_none());
        assert!(body.get("description").is_none());
    }

    #[test]
    fn test_full_report_body() {
        let filter = ReportFilter {
            start: "s".to_string(),
            end: "e".to_string(),
            billable: BillableFilter::BillableOnly,
            client_id: Some("c1".to_string()),
            project_ids: vec!["p1".to_string(), "p2".to_string()],
            task_ids: vec!["t1".to_string()],
            description: Some(" review ".to_string()),
            ..ReportFilter::default()
        };
        let body = detailed_report_body(&filter);

        assert_eq!(body["billable"], true);
        assert_eq!(body["clients"]["ids"], json!(["c1"]));
        assert_eq!(body["projects"]["ids"], json!(["p1", "p2"]));
        assert_eq!(body["tasks"]["ids"], json!(["t1"]));
        assert_eq!(body["description"], "review");
    }

    #[test]
    fn test_without_switches_override_filters() {
        let filter = ReportFilter {
            task_ids: vec!["t1".to_string()],
            description: Some("review".to_string()),
            without_task: true,
            without_description: true,
            ..ReportFilter::default()
        };
        let body = detailed_report_body(&filter);

        assert!(body.get("tasks").is_none());
        assert!(body.get("description").is_none());
        assert_eq!(body["withoutDescription"], true);
    }
}
