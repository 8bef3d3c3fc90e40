//! Routing strategy and fallback integration tests

use std::sync::Arc;
use std::time::Duration;

use promptforge::core::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use promptforge::core::providers::mock::{MockConfig, MockProvider};
use promptforge::core::providers::openai::{OpenAiConfig, OpenAiProvider};
use promptforge::core::types::GenerationRequest;
use promptforge::{GatewayError, ProviderManager, RoutingStrategy};

fn mock(name: &'static str) -> Arc<MockProvider> {
    Arc::new(MockProvider::new(
        MockConfig::named(name).with_latency(Duration::ZERO),
    ))
}

fn failing_mock(name: &'static str) -> Arc<MockProvider> {
    Arc::new(MockProvider::new(
        MockConfig::named(name)
            .with_latency(Duration::ZERO)
            .failing_every(1),
    ))
}

#[tokio::test]
async fn round_robin_distributes_requests_evenly() {
    let mut manager = ProviderManager::new(RoutingStrategy::RoundRobin);
    manager.register(mock("a"));
    manager.register(mock("b"));

    let request = GenerationRequest::new("spread me");
    for _ in 0..6 {
        manager.generate(&request).await.unwrap();
    }

    let stats = manager.stats();
    assert_eq!(stats["a"].total_requests, 3);
    assert_eq!(stats["b"].total_requests, 3);
}

#[tokio::test]
async fn least_used_balances_after_uneven_traffic() {
    let mut manager = ProviderManager::new(RoutingStrategy::LeastUsed);
    manager.register(mock("a"));
    manager.register(mock("b"));

    let request = GenerationRequest::new("balance me");
    for _ in 0..10 {
        manager.generate(&request).await.unwrap();
    }

    let stats = manager.stats();
    assert_eq!(stats["a"].total_requests, 5);
    assert_eq!(stats["b"].total_requests, 5);
}

#[tokio::test]
async fn lowest_cost_picks_cheapest_default_model() {
    // openai gpt-4o-mini: 0.00015 + 0.0006 per 1K
    // anthropic claude-3-5-haiku: 0.0008 + 0.004 per 1K
    let openai = Arc::new(OpenAiProvider::new(OpenAiConfig::new("sk-test")).unwrap());
    let anthropic =
        Arc::new(AnthropicProvider::new(AnthropicConfig::new("sk-ant-test")).unwrap());

    let mut manager = ProviderManager::new(RoutingStrategy::LowestCost);
    manager.register(anthropic);
    manager.register(openai);

    let selected = manager.select().unwrap();
    assert_eq!(selected.name(), "openai");
}

#[tokio::test]
async fn lowest_cost_tie_resolves_to_registration_order() {
    let mut manager = ProviderManager::new(RoutingStrategy::LowestCost);
    // both mocks cost zero
    manager.register(mock("first"));
    manager.register(mock("second"));

    for _ in 0..3 {
        assert_eq!(manager.select().unwrap().name(), "first");
    }
}

#[tokio::test]
async fn fallback_walks_registration_order_not_strategy_order() {
    // cheapest strategy would favor the healthy mock, but fallback must
    // still start from the first registered provider
    let mut manager = ProviderManager::new(RoutingStrategy::LowestCost);
    manager.register(failing_mock("primary"));
    manager.register(mock("secondary"));

    let response = manager
        .generate_with_fallback(&GenerationRequest::new("x"))
        .await
        .unwrap();
    assert_eq!(response.provider, "secondary");

    let stats = manager.stats();
    assert_eq!(stats["primary"].failed_requests, 1);
    assert_eq!(stats["secondary"].successful_requests, 1);
}

#[tokio::test]
async fn fallback_error_lists_all_attempted_providers() {
    let mut manager = ProviderManager::new(RoutingStrategy::RoundRobin);
    manager.register(failing_mock("a"));
    manager.register(failing_mock("b"));
    manager.register(failing_mock("c"));

    let err = manager
        .generate_with_fallback(&GenerationRequest::new("x"))
        .await
        .unwrap_err();

    match err {
        GatewayError::AllProvidersFailed {
            attempted,
            last_error,
        } => {
            assert_eq!(attempted, vec!["a", "b", "c"]);
            assert_eq!(last_error.provider(), "c");
        }
        other => panic!("expected AllProvidersFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn fallback_skips_disabled_providers() {
    let mut manager = ProviderManager::new(RoutingStrategy::RoundRobin);
    manager.register(failing_mock("a"));
    manager.register(mock("b"));
    manager.set_enabled("a", false).unwrap();

    let response = manager
        .generate_with_fallback(&GenerationRequest::new("x"))
        .await
        .unwrap();
    assert_eq!(response.provider, "b");
    // disabled provider was never attempted
    assert_eq!(manager.stats()["a"].total_requests, 0);
}

#[tokio::test]
async fn health_sweep_marks_mock_healthy() {
    let mut manager = ProviderManager::new(RoutingStrategy::RoundRobin);
    manager.register(mock("a"));

    let results = manager.check_health_all().await;
    assert_eq!(
        results["a"].state,
        promptforge::core::types::HealthState::Healthy
    );
    assert!(results["a"].latency_ms.is_some());
}
