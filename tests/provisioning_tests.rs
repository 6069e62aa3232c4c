mod common;

use push_provisioning::domain::provisioning::{ProvisioningRequest, RequestState};
use push_provisioning::domain::token::{ProvisioningOutcome, TokenStatus};
use push_provisioning::error::ProvisioningError;
use std::collections::HashSet;

#[tokio::test]
async fn test_unknown_merchants_never_reach_gateway() {
    let (services, gateway) = common::counted_services();

    let result = services
        .state
        .orchestrator
        .provision(ProvisioningRequest::new([1, 999, 42], "default_card"))
        .await;

    match result {
        Err(ProvisioningError::InvalidMerchantIds(ids)) => assert_eq!(ids, vec![42, 999]),
        other => panic!("expected InvalidMerchantIds, got {other:?}"),
    }
    assert_eq!(gateway.create_calls(), 0);
    services.shutdown().await;
}

#[tokio::test]
async fn test_provision_three_merchants() {
    let (services, gateway) = common::counted_services();

    let response = services
        .state
        .orchestrator
        .provision(ProvisioningRequest::new([3, 1, 2], "default_card"))
        .await
        .unwrap();

    assert_eq!(gateway.create_calls(), 1);
    assert_eq!(response.overall_status, "ACCEPTED");
    let names: Vec<&str> = response
        .results
        .iter()
        .map(|r| r.merchant_name.as_str())
        .collect();
    assert_eq!(names, vec!["Myntra", "Uber", "Zepto"]);

    let ids: HashSet<&str> = response
        .results
        .iter()
        .map(|r| r.token_reference_id.as_str())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(response.results.iter().all(|r| {
        r.outcome == ProvisioningOutcome::Success && r.token_status == TokenStatus::Active
    }));
    services.shutdown().await;
}

#[tokio::test]
async fn test_single_merchant_scenario() {
    let services = common::services();

    let response = services
        .state
        .orchestrator
        .provision(ProvisioningRequest::new([1], "x"))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    let result = &response.results[0];
    assert_eq!(result.merchant_name, "Myntra");
    assert_eq!(result.merchant_id, "VISA_MERCHANT_001");
    assert_eq!(result.outcome, ProvisioningOutcome::Success);
    assert!(result.token_reference_id.starts_with("TKN_"));
    services.shutdown().await;
}

#[tokio::test]
async fn test_status_is_tracked_per_request() {
    let services = common::services();
    let orchestrator = services.state.orchestrator.clone();

    let response = orchestrator
        .provision(ProvisioningRequest::new([1, 2], "default_card"))
        .await
        .unwrap();

    let snapshot = orchestrator.get_status(&response.request_id).await.unwrap();
    assert_eq!(snapshot.state, RequestState::Completed);
    assert_eq!(snapshot.merchant_count, 2);
    assert_eq!(snapshot.succeeded, 2);
    assert_eq!(snapshot.failed, 0);

    assert!(matches!(
        orchestrator.get_status("not-a-request").await,
        Err(ProvisioningError::RequestNotFound(_))
    ));

    drop(orchestrator);
    services.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_requests_get_distinct_tokens() {
    let services = common::services();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let orchestrator = services.state.orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orchestrator
                .provision(ProvisioningRequest::new([1, 2, 3, 4, 5, 6, 7], "default_card"))
                .await
        }));
    }

    let mut token_ids = HashSet::new();
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.results.len(), 7);
        for result in response.results {
            assert!(token_ids.insert(result.token_reference_id));
        }
    }
    assert_eq!(token_ids.len(), 56);

    let listed = services.state.registry.list("default_card").await.unwrap();
    assert_eq!(listed.total_count, 56);
    services.shutdown().await;
}
