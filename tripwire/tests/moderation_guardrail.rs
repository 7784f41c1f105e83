//! End-to-end behaviour of the moderation guardrail against a mock provider.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tripwire::guardrail::{GUARDRAIL_FAILED, OutputInfo};
use tripwire::prelude::*;

fn parsed(category: &str, rationale: &str) -> Value {
    json!({
        "output_parsed": {
            "moderationCategory": category,
            "moderationRationale": rationale,
        }
    })
}

fn chat_content(content: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn assert_fail_open(result: &GuardrailResult) {
    assert!(!result.tripwire_triggered);
    assert_eq!(
        result.output_info,
        OutputInfo::Failed {
            error: GUARDRAIL_FAILED.to_owned()
        }
    );
}

#[tokio::test]
async fn test_objectionable_categories_trip() {
    for category in ["OFFENSIVE", "OFF_BRAND", "VIOLENCE"] {
        let guardrail = ModerationGuardrail::new(MockProvider::fixed(parsed(category, "Because.")));
        let result = guardrail.check("some agent output").await;
        assert!(result.tripwire_triggered, "{category} should trip");
        assert_eq!(
            result.output().unwrap().moderation_category.as_str(),
            category
        );
    }
}

#[tokio::test]
async fn test_none_does_not_trip_and_is_preserved() {
    let guardrail = ModerationGuardrail::new(MockProvider::fixed(parsed("NONE", "Benign.")));
    let result = guardrail.check("Have a nice day").await;

    assert!(!result.tripwire_triggered);
    assert_eq!(
        result.output_info,
        OutputInfo::Classified(GuardrailOutput::new(ModerationCategory::None, "Benign."))
    );
}

#[tokio::test]
async fn test_output_parsed_wins_over_message_content() {
    let raw = json!({
        "output_parsed": {"moderationCategory": "VIOLENCE", "moderationRationale": "Threat."},
        "choices": [{"message": {"content": "{\"moderationCategory\":\"NONE\",\"moderationRationale\":\"ok\"}"}}]
    });
    let result = ModerationGuardrail::new(MockProvider::fixed(raw))
        .check("x")
        .await;

    assert!(result.tripwire_triggered);
    assert_eq!(
        result.output().unwrap().moderation_category,
        ModerationCategory::Violence
    );
}

#[tokio::test]
async fn test_message_content_is_parsed() {
    let raw = chat_content(json!(
        "{\"moderationCategory\":\"OFF_BRAND\",\"moderationRationale\":\"Disparages a rival.\"}"
    ));
    let result = ModerationGuardrail::new(MockProvider::fixed(raw))
        .check("Our boards beat CompetitorX's junk")
        .await;

    assert!(result.tripwire_triggered);
    assert_eq!(
        result.output().unwrap().moderation_rationale,
        "Disparages a rival."
    );
}

#[tokio::test]
async fn test_bad_message_content_fails_open() {
    for content in [json!(""), json!("   "), json!("{not json"), json!(42)] {
        let result = ModerationGuardrail::new(MockProvider::fixed(chat_content(content.clone())))
            .check("x")
            .await;
        assert_fail_open(&result);
    }
}

#[tokio::test]
async fn test_no_candidate_fails_open() {
    let result = ModerationGuardrail::new(MockProvider::fixed(json!({"error": "failed"})))
        .check("x")
        .await;
    assert_fail_open(&result);
}

#[tokio::test]
async fn test_unknown_category_fails_open() {
    let guardrail =
        ModerationGuardrail::new(MockProvider::fixed(parsed("UNKNOWN_CATEGORY", "Hmm.")));
    assert_fail_open(&guardrail.check("x").await);

    let err = guardrail.classify("x").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_missing_rationale_fails_open() {
    let raw = json!({"output_parsed": {"moderationCategory": "OFFENSIVE"}});
    assert_fail_open(&ModerationGuardrail::new(MockProvider::fixed(raw)).check("x").await);
}

#[tokio::test]
async fn test_transport_failure_fails_open() {
    let provider = MockProvider::failing(TransportError::http_status(500, "{\"error\":\"failed\"}"));
    let guardrail = ModerationGuardrail::new(provider.clone());

    assert_fail_open(&guardrail.check("x").await);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_deadline_fails_open() {
    let provider = MockProvider::classifying(ModerationCategory::Offensive, "Late.")
        .with_delay(Duration::from_secs(30));
    let guardrail = ModerationGuardrail::builder(provider)
        .timeout(Duration::from_millis(25))
        .build();

    assert_fail_open(&guardrail.check("x").await);
}

#[tokio::test]
async fn test_repeated_checks_are_identical() {
    let guardrail = ModerationGuardrail::new(MockProvider::classifying(
        ModerationCategory::OffBrand,
        "Mentions a competitor negatively.",
    ));
    let first = guardrail.check("same message").await;
    let second = guardrail.check("same message").await;
    assert_eq!(first, second);

    let provider = guardrail.provider();
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn test_insult_scenario() {
    let provider = MockProvider::classifying(ModerationCategory::Offensive, "Contains insult.");
    let guardrail = ModerationGuardrail::new(provider.clone());

    let result = guardrail.check("You are all idiots").await;

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "tripwireTriggered": true,
            "outputInfo": {
                "moderationCategory": "OFFENSIVE",
                "moderationRationale": "Contains insult."
            }
        })
    );
    assert_eq!(provider.requests()[0].message(), "You are all idiots");
}

#[tokio::test]
async fn test_competitor_praise_scenario() {
    let guardrail = ModerationGuardrail::new(MockProvider::classifying(
        ModerationCategory::None,
        "Positive comparison without disparagement.",
    ));
    let result = guardrail
        .check("Great product, much better than CompetitorX")
        .await;

    assert!(!result.tripwire_triggered);
    assert!(!result.is_failed());
    assert_eq!(
        result.output().unwrap().moderation_category,
        ModerationCategory::None
    );
}

#[tokio::test]
async fn test_concurrent_checks_are_independent() {
    let provider = MockProvider::new()
        .with_response(parsed("VIOLENCE", "Threat."))
        .with_error(TransportError::network("connection reset"))
        .with_response(parsed("NONE", "Fine."));
    let guardrail = Arc::new(ModerationGuardrail::new(provider));

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let guardrail = Arc::clone(&guardrail);
            tokio::spawn(async move { guardrail.check(&format!("message {i}")).await })
        })
        .collect();

    let mut triggered = 0;
    let mut failed = 0;
    let mut safe = 0;
    for handle in handles {
        let result = handle.await.unwrap();
        if result.is_triggered() {
            triggered += 1;
        } else if result.is_failed() {
            failed += 1;
        } else {
            safe += 1;
        }
    }
    assert_eq!((triggered, failed, safe), (1, 1, 1));
}

#[tokio::test]
async fn test_shared_provider_behind_arc() {
    let provider: Arc<dyn CompletionProvider> = Arc::new(MockProvider::classifying(
        ModerationCategory::Violence,
        "Graphic.",
    ));
    let guardrail = ModerationGuardrail::new(provider);
    assert!(guardrail.check("x").await.is_triggered());
}
