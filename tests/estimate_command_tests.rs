//! End-to-end estimate flow: resource specs -> form -> HTTP -> result
//!
//! Runs the `estimate` command logic against a mockito pricing service.

use costctl::commands::{self, CommandContext, ResourceSpec};
use costctl::config::Config;
use costctl::display::{format_cost, render_estimate};
use costctl::error::{ApiCall, CostctlError};
use costctl::exit_codes::{codes, exit_code_for_anyhow};
use costctl::pricing::PricingClient;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn context_for(server: &ServerGuard) -> CommandContext {
    let client = PricingClient::new(server.url(), Duration::from_secs(5)).unwrap();
    CommandContext {
        api: Arc::new(client),
        config: Config::default(),
        output: "json".to_string(),
    }
}

/// Mocks stay mounted only while the returned handles are alive
async fn mount_catalog(server: &mut ServerGuard) -> Vec<Mock> {
    let names = server
        .mock("GET", "/api/pricing/names")
        .match_query(Matcher::UrlEncoded("type".into(), "Compute".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"["db.t3.micro","db.t3.small"]"#)
        .create_async()
        .await;
    let regions = server
        .mock("GET", "/api/pricing/regions")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "Compute".into()),
            Matcher::UrlEncoded("name".into(), "db.t3.micro".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"["us-east-1","us-west-2"]"#)
        .create_async()
        .await;
    vec![names, regions]
}

#[tokio::test]
async fn test_estimate_flow_displays_total() {
    let mut server = mockito::Server::new_async().await;
    let _catalog = mount_catalog(&mut server).await;
    let estimate = server
        .mock("POST", "/api/estimate")
        .match_body(Matcher::Json(json!({
            "resources": [{"type": "Compute", "name": "db.t3.micro", "region": "us-east-1", "units": 2}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "totalCost": 40,
                "breakdown": [{"type": "Compute", "name": "db.t3.micro", "region": "us-east-1",
                               "units": 2, "unitCost": 20, "cost": 40}]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let ctx = context_for(&server);
    let specs: Vec<ResourceSpec> = vec!["Compute:db.t3.micro:us-east-1:2".parse().unwrap()];
    let result = commands::estimate(&ctx, &specs).await.unwrap();

    assert_eq!(format_cost(result.total_cost), "40.00");
    let rendered = console::strip_ansi_codes(&render_estimate(&result, "$")).to_string();
    assert!(rendered.contains("Total: $40.00"));
    estimate.assert_async().await;
}

#[tokio::test]
async fn test_estimate_rejects_name_not_offered() {
    let mut server = mockito::Server::new_async().await;
    let _catalog = mount_catalog(&mut server).await;
    let estimate = server
        .mock("POST", "/api/estimate")
        .expect(0)
        .create_async()
        .await;

    let ctx = context_for(&server);
    let specs: Vec<ResourceSpec> = vec!["Compute:m5.huge:us-east-1:2".parse().unwrap()];
    let err = commands::estimate(&ctx, &specs).await.unwrap_err();

    match err {
        CostctlError::Validation { field, reason } => {
            assert_eq!(field, "name");
            assert!(reason.contains("db.t3.micro"));
        }
        other => panic!("Expected validation error, got: {:?}", other),
    }
    estimate.assert_async().await;
}

#[tokio::test]
async fn test_estimate_reports_names_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    let _names = server
        .mock("GET", "/api/pricing/names")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let ctx = context_for(&server);
    let specs: Vec<ResourceSpec> = vec!["Storage:s3:us-east-1:1".parse().unwrap()];
    let err = commands::run_estimate(&ctx, &specs).await.unwrap_err();

    assert!(err.to_string().contains("Failed to load resource names"));
    assert_eq!(err.api_call(), Some(ApiCall::Names));
    // a service outage is a system failure, not bad input
    assert_eq!(
        exit_code_for_anyhow(&anyhow::Error::from(err)),
        codes::SYSTEM_ERROR
    );
}

#[tokio::test]
async fn test_estimate_reports_regions_fetch_failure() {
    let mut server = mockito::Server::new_async().await;
    let _names = server
        .mock("GET", "/api/pricing/names")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"["db.t3.micro"]"#)
        .create_async()
        .await;
    let _regions = server
        .mock("GET", "/api/pricing/regions")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let estimate = server
        .mock("POST", "/api/estimate")
        .expect(0)
        .create_async()
        .await;

    let ctx = context_for(&server);
    let specs: Vec<ResourceSpec> = vec!["Compute:db.t3.micro:us-east-1:2".parse().unwrap()];
    let err = commands::estimate(&ctx, &specs).await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to load regions");
    assert_eq!(
        exit_code_for_anyhow(&anyhow::Error::from(err)),
        codes::SYSTEM_ERROR
    );
    estimate.assert_async().await;
}

#[tokio::test]
async fn test_estimate_rejects_zero_units_without_submitting() {
    let mut server = mockito::Server::new_async().await;
    let _catalog = mount_catalog(&mut server).await;
    let estimate = server
        .mock("POST", "/api/estimate")
        .expect(0)
        .create_async()
        .await;

    let ctx = context_for(&server);
    let specs: Vec<ResourceSpec> = vec!["Compute:db.t3.micro:us-east-1:0".parse().unwrap()];
    let err = commands::estimate(&ctx, &specs).await.unwrap_err();

    assert!(matches!(err, CostctlError::Validation { .. }));
    estimate.assert_async().await;
}

#[tokio::test]
async fn test_run_estimate_requires_resources() {
    let server = mockito::Server::new_async().await;
    let ctx = context_for(&server);
    assert!(commands::run_estimate(&ctx, &[]).await.is_err());
}
