use clockbill_core::pdf::Columns;
use clockbill_core::report::{BillableFilter, ReportFilter};
use clockbill_core::{
    AddonClaims, ClockifyClient, ClockifyContext, ClockifyError, InvoiceDetails, ReportError,
    ReportService,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "addon-token";

fn detailed_report() -> Value {
    json!({
        "totals": [{ "totalTime": 9000 }],
        "timeentries": [
            {
                "description": "Homepage layout",
                "projectId": "p1",
                "projectName": "Website",
                "taskId": "t1",
                "taskName": "Design",
                "billable": true,
                "timeInterval": { "start": "2024-03-04T09:00:00Z", "duration": 3600 },
                "amounts": [{ "type": "EARNED", "value": 5000, "currency": "USD" }]
            },
            {
                "description": "Logo",
                "projectId": "p2",
                "projectName": "Branding",
                "billable": true,
                "timeInterval": { "start": "2024-03-05T09:00:00Z", "duration": "PT1H30M" },
                "amountByCurrency": [{ "currency": "eur", "amount": 2500 }]
            },
            {
                "description": "Internal sync",
                "projectId": "p1",
                "projectName": "Website",
                "billable": false,
                "timeInterval": { "start": "2024-03-06T09:00:00Z", "duration": 900 }
            }
        ]
    })
}

async fn clockify_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/workspaces/ws-1"))
        .and(header("X-Addon-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ws-1",
            "name": "Acme Studio",
            "workspaceSettings": { "durationFormat": "DECIMAL" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/reports/v1/workspaces/ws-1/reports/detailed"))
        .and(header("X-Addon-Token", TOKEN))
        .and(body_partial_json(json!({
            "dateRangeStart": "2024-03-01T00:00:00Z",
            "amountShown": "EARNED"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(detailed_report()))
        .mount(&server)
        .await;

    server
}

fn context<'a>(backend: &'a str, reports: &'a str) -> ClockifyContext<'a> {
    ClockifyContext {
        backend_url: backend,
        reports_url: reports,
        workspace_id: "ws-1",
        token: TOKEN,
    }
}

fn claims(urls: Value) -> AddonClaims {
    let mut claims = json!({
        "iss": "clockify",
        "type": "addon",
        "sub": "invoice-addon",
        "workspaceId": "ws-1",
    });
    if let (Some(target), Some(urls)) = (claims.as_object_mut(), urls.as_object()) {
        target.extend(urls.clone());
    }
    serde_json::from_value(claims).unwrap()
}

fn march() -> ReportFilter {
    ReportFilter {
        start: "2024-03-01T00:00:00Z".to_string(),
        end: "2024-03-31T23:59:59Z".to_string(),
        ..ReportFilter::default()
    }
}

fn service() -> ReportService {
    ReportService::new(ClockifyClient::new(reqwest::Client::new()))
}

#[tokio::test]
async fn test_clients_are_returned_verbatim() {
    let server = MockServer::start().await;
    let clients = json!([{ "id": "c1", "name": "Globex" }, { "id": "c2", "name": "Initech" }]);
    Mock::given(method("GET"))
        .and(path("/api/v1/workspaces/ws-1/clients"))
        .and(query_param("archived", "false"))
        .and(query_param("sort-column", "NAME"))
        .and(header("X-Addon-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(&clients))
        .expect(1)
        .mount(&server)
        .await;

    let claims = claims(json!({
        "backendUrl": format!("{}/api", server.uri()),
        "reportsUrl": format!("{}/reports", server.uri()),
    }));
    let result = service().clients(&claims, TOKEN).await.unwrap();

    assert_eq!(result, clients);
}

#[tokio::test]
async fn test_clients_need_only_the_api_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/workspaces/ws-1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let legacy = claims(json!({ "apiUrl": format!("{}/api/", server.uri()) }));
    let result = service().clients(&legacy, TOKEN).await.unwrap();
    assert_eq!(result, json!([]));

    let bare = claims(json!({}));
    assert!(matches!(
        service().clients(&bare, TOKEN).await,
        Err(ReportError::MissingUrl("backend URL"))
    ));
}

#[tokio::test]
async fn test_preview_sums_entries() {
    let server = clockify_server().await;
    let backend = format!("{}/api", server.uri());
    let reports = format!("{}/reports", server.uri());

    let preview = service()
        .preview(context(&backend, &reports), &march())
        .await
        .unwrap();

    assert_eq!(preview.workspace_settings.duration_format, "DECIMAL");
    assert_eq!(preview.entries.len(), 3);
    assert_eq!(preview.totals.duration_seconds, 3600 + 5400 + 900);
    assert_eq!(preview.totals.amounts.get("USD"), Some(&5000));
    assert_eq!(preview.totals.amounts.get("EUR"), Some(&2500));
    assert_eq!(preview.report_data, detailed_report());

    let body = serde_json::to_value(&preview).unwrap();
    assert!(body.get("reportData").is_some());
    assert_eq!(body["workspaceSettings"]["durationFormat"], "DECIMAL");
    assert_eq!(body["totals"]["durationSeconds"], 9900);
}

#[tokio::test]
async fn test_filters_are_reapplied_locally() {
    let server = clockify_server().await;
    let backend = format!("{}/api", server.uri());
    let reports = format!("{}/reports", server.uri());

    // The mock ignores filters, so only local filtering can drop entries
    let filter = ReportFilter {
        billable: BillableFilter::BillableOnly,
        project_ids: vec!["p1".to_string()],
        ..march()
    };
    let preview = service()
        .preview(context(&backend, &reports), &filter)
        .await
        .unwrap();

    assert_eq!(preview.entries.len(), 1);
    assert_eq!(preview.entries[0].description.as_deref(), Some("Homepage layout"));
    assert_eq!(preview.totals.duration_seconds, 3600);
}

#[tokio::test]
async fn test_invoice_pdf() {
    let server = clockify_server().await;
    let backend = format!("{}/api", server.uri());
    let reports = format!("{}/reports", server.uri());

    let details = InvoiceDetails {
        client_name: Some("Globex".to_string()),
        issue_date: Some("01/04/2024".to_string()),
        columns: Columns::default(),
        paypal_link: Some("https://paypal.me/acme".to_string()),
        ..InvoiceDetails::default()
    };
    let pdf = service()
        .invoice_pdf(context(&backend, &reports), &march(), details)
        .await
        .unwrap();

    assert!(pdf.starts_with(b"%PDF"));
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("(Acme Studio)"));
    assert!(text.contains("(Globex)"));
    // DECIMAL workspace setting: 2.75 hours in total
    assert!(text.contains("(2.75)"));
    assert!(text.contains("/URI"));
}

#[tokio::test]
async fn test_upstream_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let backend = format!("{}/api", server.uri());
    let reports = format!("{}/reports", server.uri());
    let result = service().preview(context(&backend, &reports), &march()).await;

    assert!(matches!(
        result,
        Err(ReportError::Clockify(ClockifyError::Status { status: 403, ref body })) if body == "forbidden"
    ));
}
