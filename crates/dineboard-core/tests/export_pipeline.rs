//! Integration tests for the report export pipeline

use chrono::Utc;
use dineboard_core::export::csv::UTF8_BOM;
use dineboard_core::export::fetch_bundle;
use dineboard_core::{
    ApiClient, CoreError, ExportEvent, ExportFormat, ExportPipeline, FetchReport, FilterState,
    ProgressBus,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::broadcast::Receiver;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, endpoint: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", endpoint)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

fn products(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "name": format!("Product {}", i),
                    "vendas": 100 - i,
                    "quantidade": 120 - i,
                    "receita": 1000.0 - i as f64 * 10.0,
                    "precoMedio": 10.0
                })
            })
            .collect(),
    )
}

async fn mount_required(server: &MockServer) {
    mount(
        server,
        "metrics",
        200,
        json!({"faturamento": 15230.5, "pedidos": 320, "ticketMedio": 47.6, "clientes": 210,
               "tempoMedioProducao": 1290, "crescimento": {"faturamento": 12.5, "pedidos": -3}}),
    )
    .await;
    mount(
        server,
        "revenue-timeline",
        200,
        json!([{"date": "2024-01-01", "value": 500.0, "pedidos": 10}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/top-products"))
        .and(query_param("limit", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(30)))
        .mount(server)
        .await;
    mount(
        server,
        "channel-distribution",
        200,
        json!([
            {"name": "iFood", "type": "D", "pedidos": 120, "receita": 6000.0, "ticketMedio": 50.0, "percentual": 37.5},
            {"name": "Balcão", "type": "P", "pedidos": 200, "receita": 9230.5, "ticketMedio": 46.2, "percentual": 62.5}
        ]),
    )
    .await;
    mount(
        server,
        "store-performance",
        200,
        json!([{"name": "Centro", "city": "São Paulo", "pedidos": 320, "receita": 15230.5,
                "ticketMedio": 47.6, "tempoMedioProducao": 1290}]),
    )
    .await;
    mount(
        server,
        "sales-by-hour",
        200,
        json!([{"hora": 12, "pedidos": 40, "receita": 1900.0}]),
    )
    .await;
}

async fn mount_optional(server: &MockServer) {
    mount(
        server,
        "top-items",
        200,
        json!([{"name": "Bacon", "grupo": "Extras", "vezesAdicionado": 30, "quantidade": 30, "receita": 150.0}]),
    )
    .await;
    mount(
        server,
        "payment-methods",
        200,
        json!([{"metodo": "Pix", "online": true, "transacoes": 100, "valor": 5000.0}]),
    )
    .await;
    mount(
        server,
        "coupon-performance",
        200,
        json!([{"code": "WELCOME10", "tipo": "percent", "usos": 12, "descontoTotal": 96.0, "ticketMedio": 55.0}]),
    )
    .await;
}

fn drain(rx: &mut Receiver<ExportEvent>) -> Vec<ExportEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn progress(events: &[ExportEvent]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            ExportEvent::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

async fn pipeline(server: &MockServer, dir: &TempDir) -> (ExportPipeline, Receiver<ExportEvent>) {
    let client = ApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let bus = ProgressBus::default();
    let rx = bus.subscribe();
    (ExportPipeline::new(client, dir.path()).with_bus(bus), rx)
}

#[tokio::test]
async fn test_full_csv_export() {
    let server = MockServer::start().await;
    mount_required(&server).await;
    mount_optional(&server).await;
    let dir = TempDir::new().unwrap();
    let (pipeline, mut rx) = pipeline(&server, &dir).await;

    let outcome = pipeline
        .run(ExportFormat::Csv, &FilterState::for_period("7"))
        .await
        .unwrap();

    let name = outcome.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("full_report_7_"));
    assert!(name.ends_with(".csv"));
    assert!(!outcome.report.is_degraded());

    let csv = std::fs::read_to_string(&outcome.path).unwrap();
    assert_eq!(outcome.bytes, csv.len() as u64);
    assert!(csv.starts_with(UTF8_BOM));
    for section in [
        "GENERAL METRICS",
        "TOP PRODUCTS",
        "TOP ITEMS",
        "CHANNEL DISTRIBUTION",
        "STORE PERFORMANCE",
        "SALES BY HOUR",
        "PAYMENT METHODS",
        "COUPON PERFORMANCE",
    ] {
        assert!(csv.contains(section), "missing section {}", section);
    }
    let product_rows = csv.lines().filter(|l| l.contains(",Product ")).count();
    assert_eq!(product_rows, 30);
    assert!(csv.contains("Revenue (R$),15230.50,12.5%"));

    let events = drain(&mut rx);
    assert_eq!(progress(&events), vec![10, 40, 60, 100]);
    assert!(matches!(events.last(), Some(ExportEvent::Completed { path }) if *path == outcome.path));
}

#[tokio::test]
async fn test_fetched_bundle_totals() {
    let server = MockServer::start().await;
    mount_required(&server).await;
    mount_optional(&server).await;
    let client = ApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let mut report = FetchReport::new();

    let bundle = fetch_bundle(&client, &FilterState::for_period("30"), &mut report, Utc::now())
        .await
        .unwrap();

    assert_eq!(report.endpoints_requested, 9);
    assert_eq!(report.endpoints_failed, 0);
    assert_eq!(bundle.products.len(), 30);
    assert_eq!(bundle.channels.len(), 2);
    assert!((bundle.channel_percent_total() - 100.0).abs() < 0.5);
    assert_eq!(bundle.channel_orders_total(), 320);
}

#[tokio::test]
async fn test_optional_sections_degrade() {
    let server = MockServer::start().await;
    mount_required(&server).await;
    mount(&server, "top-items", 500, json!({"error": "boom"})).await;
    mount(&server, "payment-methods", 404, json!({"error": "not found"})).await;
    mount(&server, "coupon-performance", 500, json!({"error": "boom"})).await;
    let dir = TempDir::new().unwrap();
    let (pipeline, mut rx) = pipeline(&server, &dir).await;

    let outcome = pipeline
        .run(ExportFormat::RichCsv, &FilterState::default())
        .await
        .unwrap();

    assert!(outcome.report.is_degraded());
    assert_eq!(outcome.report.degraded_endpoints().len(), 3);

    let name = outcome.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("full_report_detailed_30d_"));

    let csv = std::fs::read_to_string(&outcome.path).unwrap();
    assert!(csv.contains("DINEBOARD FULL REPORT"));
    assert!(csv.contains("TOP PRODUCTS"));
    assert!(!csv.contains("TOP ITEMS"));
    assert!(!csv.contains("PAYMENT METHODS"));
    assert!(!csv.contains("COUPON PERFORMANCE"));

    let events = drain(&mut rx);
    assert!(!events.iter().any(|e| matches!(e, ExportEvent::Failed { .. })));
}

#[tokio::test]
async fn test_required_failure_aborts_without_file() {
    let server = MockServer::start().await;
    mount(&server, "metrics", 500, json!({"error": "metrics unavailable"})).await;
    mount(&server, "revenue-timeline", 200, json!([])).await;
    mount(&server, "top-products", 200, json!([])).await;
    mount(&server, "channel-distribution", 200, json!([])).await;
    mount(&server, "store-performance", 200, json!([])).await;
    mount(&server, "sales-by-hour", 200, json!([])).await;
    mount_optional(&server).await;
    let dir = TempDir::new().unwrap();
    let (pipeline, mut rx) = pipeline(&server, &dir).await;

    let err = pipeline
        .run(ExportFormat::Html, &FilterState::for_period("30"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::RequiredEndpoint { endpoint: "metrics", .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    let events = drain(&mut rx);
    let failures = events
        .iter()
        .filter(|e| matches!(e, ExportEvent::Failed { .. }))
        .count();
    assert_eq!(failures, 1);
    assert_eq!(progress(&events), vec![10]);
    assert!(!events.iter().any(|e| matches!(e, ExportEvent::Completed { .. })));
}

#[tokio::test]
async fn test_html_export() {
    let server = MockServer::start().await;
    mount_required(&server).await;
    mount_optional(&server).await;
    let dir = TempDir::new().unwrap();
    let (pipeline, _rx) = pipeline(&server, &dir).await;

    let mut filters = FilterState::for_period("7");
    filters.channel = Some("iFood".into());
    let outcome = pipeline.run(ExportFormat::Html, &filters).await.unwrap();

    assert_eq!(outcome.path.extension().unwrap(), "html");
    let html = std::fs::read_to_string(&outcome.path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<strong>Channel:</strong> iFood"));
    assert!(html.contains("Payment Methods"));
    assert!(html.contains("WELCOME10"));
    assert_eq!(html.matches("<td class=\"rank").count(), 15);
}
