mod common;

use push_provisioning::domain::provisioning::ProvisioningRequest;
use push_provisioning::domain::token::TokenStatus;
use push_provisioning::error::ProvisioningError;

#[tokio::test]
async fn test_full_token_lifecycle() {
    let services = common::services();
    let registry = services.state.registry.clone();

    let response = services
        .state
        .orchestrator
        .provision(ProvisioningRequest::new([2, 3], "card_a"))
        .await
        .unwrap();
    let uber = response.results[0].token_reference_id.clone();
    let zepto = response.results[1].token_reference_id.clone();

    let listed = registry.list("card_a").await.unwrap();
    assert_eq!(listed.total_count, listed.tokens.len());
    assert_eq!(listed.total_count, 2);
    assert!(registry.list("card_b").await.unwrap().tokens.is_empty());

    let update = registry.update_status(&uber, "inactive").await.unwrap();
    assert_eq!(update.update_result, "SUCCESS");
    let fetched = registry.get(&uber).await.unwrap();
    assert_eq!(fetched.token_status, TokenStatus::Inactive);
    assert_eq!(fetched.merchant_name, "Uber");

    let first = registry.delete(&zepto).await.unwrap();
    let second = registry.delete(&zepto).await.unwrap();
    assert_eq!(first.token_reference_id, zepto);
    assert_eq!(second.token_reference_id, zepto);
    assert_eq!(first.deletion_result, "SUCCESS");
    assert_eq!(second.deletion_result, "ALREADY_DELETED");

    let remaining = registry.list("card_a").await.unwrap();
    assert_eq!(remaining.total_count, 1);
    assert_eq!(remaining.tokens[0].token_reference_id, uber);

    drop(registry);
    services.shutdown().await;
}

#[tokio::test]
async fn test_deleted_token_is_confirmed_once_then_gone() {
    let services = common::services();
    let registry = services.state.registry.clone();

    let response = services
        .state
        .orchestrator
        .provision(ProvisioningRequest::new([4], "default_card"))
        .await
        .unwrap();
    let token = response.results[0].token_reference_id.clone();

    registry.delete(&token).await.unwrap();
    let revived = registry.update_status(&token, "ACTIVE").await.unwrap();
    assert_eq!(revived.update_result, "FAILED");
    assert_eq!(revived.token_status, TokenStatus::Deleted);

    assert_eq!(
        registry.get(&token).await.unwrap().token_status,
        TokenStatus::Deleted
    );
    assert!(matches!(
        registry.get(&token).await,
        Err(ProvisioningError::TokenNotFound(_))
    ));
    assert!(matches!(
        registry.update_status(&token, "ACTIVE").await,
        Err(ProvisioningError::TokenNotFound(_))
    ));
    assert!(matches!(
        registry.delete(&token).await,
        Err(ProvisioningError::TokenNotFound(_))
    ));

    drop(registry);
    services.shutdown().await;
}

#[tokio::test]
async fn test_unknown_and_invalid_inputs() {
    let services = common::services();
    let registry = services.state.registry.clone();

    assert!(matches!(
        registry.get("TKN_MISSING").await,
        Err(ProvisioningError::TokenNotFound(_))
    ));
    assert!(matches!(
        registry.update_status("TKN_MISSING", "ACTIVE").await,
        Err(ProvisioningError::TokenNotFound(_))
    ));
    assert!(matches!(
        registry.update_status("TKN_MISSING", "FROZEN").await,
        Err(ProvisioningError::InvalidStatus(_))
    ));
    assert!(matches!(
        registry.delete("TKN_MISSING").await,
        Err(ProvisioningError::TokenNotFound(_))
    ));

    drop(registry);
    services.shutdown().await;
}
