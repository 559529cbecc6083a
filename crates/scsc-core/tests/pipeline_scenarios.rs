use scsc_core::model::{EvaluationOutcome, Highlight};
use scsc_core::pipeline::extract::ExtractMode;
use scsc_core::pipeline::EvaluationPipeline;
use scsc_core::providers::llm::fake::FakeClient;
use std::sync::Arc;

fn pipeline(clf: FakeClient, rw: FakeClient) -> (EvaluationPipeline, Arc<FakeClient>, Arc<FakeClient>) {
    let clf = Arc::new(clf);
    let rw = Arc::new(rw);
    let p = EvaluationPipeline::new(clf.clone(), rw.clone(), ExtractMode::Span);
    (p, clf, rw)
}

#[tokio::test]
async fn test_hello_world_scenario() {
    let (p, clf, rw) = pipeline(
        FakeClient::replying(
            "fake-clf",
            r#"{"score":2,"category":"safe","explanation":"benign greeting"}"#,
        ),
        FakeClient::replying(
            "fake-rw",
            r#"{"rewrites":["hi there","hello","greetings"]}"#,
        ),
    );

    let outcome = p.evaluate("hello world").await;
    let EvaluationOutcome::Success(result) = outcome else {
        panic!("expected success");
    };

    assert_eq!(result.risk, 2.0);
    assert_eq!(
        result.highlights,
        vec![Highlight {
            category: "safe".into(),
            score: 2.0
        }]
    );
    assert_eq!(result.explanation, "benign greeting");
    assert_eq!(result.rewrites, vec!["hi there", "hello", "greetings"]);
    assert!(result.rule_hits.is_empty());

    // each client saw exactly its own prompt, embedding the input
    let clf_prompts = clf.prompts();
    let rw_prompts = rw.prompts();
    assert_eq!(clf_prompts.len(), 1);
    assert_eq!(rw_prompts.len(), 1);
    assert!(clf_prompts[0].contains("sensitivity classifier"));
    assert!(clf_prompts[0].contains("\"hello world\""));
    assert!(rw_prompts[0].contains("Rewrite the following text"));
    assert!(rw_prompts[0].contains("\"hello world\""));
}

#[tokio::test]
async fn test_classifier_failure_is_absorbed() {
    let (p, _, _) = pipeline(
        FakeClient::failing("fake-clf", "quota exceeded"),
        FakeClient::replying("fake-rw", r#"{"rewrites":["a"]}"#),
    );

    let outcome = p.evaluate("anything").await;
    assert_eq!(
        outcome,
        EvaluationOutcome::Failure {
            reason: "quota exceeded".into()
        }
    );

    let report = outcome.render();
    assert!(!report.ok);
    assert_eq!(
        report.result.highlights,
        vec![Highlight {
            category: "error".into(),
            score: 0.0
        }]
    );
    assert!(report.result.rewrites.is_empty());
    assert!(report.result.explanation.contains("quota exceeded"));
}

#[tokio::test]
async fn test_rewriter_failure_is_absorbed() {
    let (p, _, _) = pipeline(
        FakeClient::replying("fake-clf", r#"{"score":80,"category":"hate"}"#),
        FakeClient::failing("fake-rw", "connection reset"),
    );

    let outcome = p.evaluate("anything").await;
    assert!(!outcome.is_ok());
    assert_eq!(outcome.render().result.risk, 0.0);
}

#[tokio::test]
async fn test_unparseable_completions_default() {
    let (p, _, _) = pipeline(
        FakeClient::replying("fake-clf", "I cannot help with that."),
        FakeClient::replying("fake-rw", "Here you go: none"),
    );

    let EvaluationOutcome::Success(result) = p.evaluate("").await else {
        panic!("parse failure must not be a pipeline failure");
    };
    assert_eq!(result.risk, 0.0);
    assert_eq!(result.highlights[0].category, "unknown");
    assert_eq!(result.explanation, "");
    assert!(result.rewrites.is_empty());
}

#[tokio::test]
async fn test_shape_invariants_hold_for_odd_completions() {
    let completions = [
        r#"```json
{"score": 999, "category": "violence", "explanation": "x"}
```"#,
        r#"{"score": -12}"#,
        r#"{"score": "abc", "category": null}"#,
        r#"{"a":1}{"b":2}"#,
    ];

    for text in completions {
        let (p, _, _) = pipeline(
            FakeClient::replying("fake-clf", text),
            FakeClient::replying(
                "fake-rw",
                r#"Sure! {"rewrites": ["1", "2", "3", "4", "5"]} enjoy"#,
            ),
        );
        let report = p.evaluate("input").await.render();
        assert!((0.0..=100.0).contains(&report.result.risk), "risk out of range for {text}");
        assert!(report.result.rewrites.len() <= 3);
        assert_eq!(report.result.highlights.len(), 1);
    }
}

#[tokio::test]
async fn test_balanced_mode_recovers_first_object() {
    let clf = Arc::new(FakeClient::replying(
        "fake-clf",
        r#"{"score":40,"category":"sexism"} {"note":"extra"}"#,
    ));
    let rw = Arc::new(FakeClient::replying("fake-rw", r#"{"rewrites":[]}"#));

    let span = EvaluationPipeline::new(clf.clone(), rw.clone(), ExtractMode::Span);
    let balanced = EvaluationPipeline::new(clf, rw, ExtractMode::Balanced);

    let EvaluationOutcome::Success(r) = span.evaluate("t").await else {
        panic!("expected success");
    };
    assert_eq!(r.highlights[0].category, "unknown");

    let EvaluationOutcome::Success(r) = balanced.evaluate("t").await else {
        panic!("expected success");
    };
    assert_eq!(r.risk, 40.0);
    assert_eq!(r.highlights[0].category, "sexism");
}
