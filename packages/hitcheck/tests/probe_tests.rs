//! End-to-end probe runs against a mock search service.

use std::fs;
use std::path::PathBuf;

use hitcheck::probe::{self, Outcome, ProbeSettings};
use hitcheck::testing::MockSearchService;
use hitcheck::{CounterStore, ProbeError, Severity, Thresholds, WriteFailurePolicy};
use tempfile::TempDir;

const QUERY: &str = r#"{"query":{"match":{"level":"error"}}}"#;

struct Fixture {
    dir: TempDir,
    settings: ProbeSettings,
}

impl Fixture {
    fn new(warning: i64, critical: i64) -> Self {
        let dir = TempDir::new().unwrap();
        let query_path = dir.path().join("query.json");
        fs::write(&query_path, QUERY).unwrap();

        let settings = ProbeSettings {
            query_path,
            thresholds: Thresholds::new(warning, critical),
            ..Default::default()
        };
        Self { dir, settings }
    }

    fn with_counter(mut self) -> Self {
        self.settings.counter = Some(CounterStore::new(self.counter_path()));
        self
    }

    fn counter_path(&self) -> PathBuf {
        self.dir.path().join("hits.count")
    }

    fn store(&self) -> CounterStore {
        CounterStore::new(self.counter_path())
    }

    async fn run(&self, search: &MockSearchService) -> Result<Outcome, ProbeError> {
        let search = search.clone();
        probe::run(&self.settings, move || Ok(search)).await
    }
}

fn verdict(outcome: Outcome) -> hitcheck::Verdict {
    match outcome {
        Outcome::Verdict(v) => v,
        Outcome::Reset => panic!("expected a verdict, got a reset"),
    }
}

#[tokio::test]
async fn warning_without_counter() {
    let fixture = Fixture::new(10, 20);
    let search = MockSearchService::new().with_hits(15);

    let outcome = fixture.run(&search).await.unwrap();
    assert_eq!(outcome.exit_code(), 1);

    let v = verdict(outcome);
    assert_eq!(v.severity, Severity::Warning);
    assert!(v.to_string().starts_with("WARNING: 15 hits for elastic search."));
    assert!(v.to_string().contains("hits=15;10;20;;"));
    assert!(!fixture.counter_path().exists());
}

#[tokio::test]
async fn prior_count_pushes_into_critical() {
    let fixture = Fixture::new(10, 20).with_counter();
    fixture.store().save(16).unwrap();
    let search = MockSearchService::new().with_hits(5);

    let outcome = fixture.run(&search).await.unwrap();
    assert_eq!(outcome.exit_code(), 2);
    assert_eq!(verdict(outcome).value, 21);
    assert_eq!(fixture.store().load().unwrap(), Some(21));
}

#[tokio::test]
async fn counter_keeps_growing_across_runs() {
    let fixture = Fixture::new(100, 200).with_counter();
    let search = MockSearchService::new().with_hits(7);

    for expected in [7, 14, 21] {
        let v = verdict(fixture.run(&search).await.unwrap());
        assert_eq!(v.value, expected);
        assert_eq!(v.severity, Severity::Ok);
    }
    assert_eq!(fixture.store().load().unwrap(), Some(21));
}

#[tokio::test]
async fn ok_event_resets_without_querying() {
    let mut fixture = Fixture::new(10, 20).with_counter();
    fixture.store().save(42).unwrap();
    fixture.settings.is_event = true;
    fixture.settings.current_status = 0;
    let search = MockSearchService::new().with_hits(1);

    let outcome = fixture.run(&search).await.unwrap();
    assert_eq!(outcome, Outcome::Reset);
    assert_eq!(outcome.exit_code(), 0);
    assert!(!fixture.counter_path().exists());
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn reset_does_not_connect() {
    let mut fixture = Fixture::new(10, 20).with_counter();
    fixture.settings.is_event = true;

    let outcome = probe::run(&fixture.settings, || -> Result<MockSearchService, ProbeError> {
        panic!("connect must not be called for a reset")
    })
    .await
    .unwrap();
    assert_eq!(outcome, Outcome::Reset);
}

#[tokio::test]
async fn run_after_reset_starts_from_zero() {
    let mut fixture = Fixture::new(10, 20).with_counter();
    fixture.store().save(100).unwrap();

    fixture.settings.is_event = true;
    fixture.run(&MockSearchService::new()).await.unwrap();

    fixture.settings.is_event = false;
    let v = verdict(fixture.run(&MockSearchService::new().with_hits(3)).await.unwrap());
    assert_eq!(v.value, 3);
    assert_eq!(v.severity, Severity::Ok);
}

#[tokio::test]
async fn critical_event_runs_the_probe() {
    let mut fixture = Fixture::new(10, 20).with_counter();
    fixture.store().save(16).unwrap();
    fixture.settings.is_event = true;
    fixture.settings.current_status = 2;
    let search = MockSearchService::new().with_hits(5);

    let v = verdict(fixture.run(&search).await.unwrap());
    assert_eq!(v.severity, Severity::Critical);
    assert_eq!(search.call_count(), 1);
    assert_eq!(fixture.store().load().unwrap(), Some(21));
}

#[tokio::test]
async fn missing_query_file_is_unknown() {
    let mut fixture = Fixture::new(10, 20);
    fixture.settings.query_path = fixture.dir.path().join("absent.json");
    let search = MockSearchService::new().with_hits(1);

    let err = fixture.run(&search).await.unwrap_err();
    assert!(matches!(err, ProbeError::QueryFile { .. }));
    assert!(hitcheck::verdict::unknown_line(&err).starts_with("UNKNOWN:"));
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn query_is_sent_to_configured_index() {
    let mut fixture = Fixture::new(10, 20);
    fixture.settings.index = "logs-app-*".into();
    let search = MockSearchService::new().with_hits(0);

    fixture.run(&search).await.unwrap();

    let calls = search.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].index, "logs-app-*");
    assert_eq!(calls[0].body, QUERY);
}

#[tokio::test]
async fn search_failure_is_unknown_and_leaves_counter() {
    let fixture = Fixture::new(10, 20).with_counter();
    fixture.store().save(4).unwrap();
    let search = MockSearchService::new().with_error("connection refused");

    let err = fixture.run(&search).await.unwrap_err();
    assert!(matches!(err, ProbeError::Search(_)));
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(fixture.store().load().unwrap(), Some(4));
}

#[tokio::test]
async fn error_body_fails_closed() {
    let fixture = Fixture::new(10, 20).with_counter();
    let search = MockSearchService::new()
        .with_body(r#"{"error":{"type":"index_not_found_exception"},"status":404}"#);

    let err = fixture.run(&search).await.unwrap_err();
    assert!(matches!(err, ProbeError::Decode(_)));
    assert!(!fixture.counter_path().exists());
}

#[tokio::test]
async fn corrupt_counter_is_unknown() {
    let fixture = Fixture::new(10, 20).with_counter();
    fs::write(fixture.counter_path(), b"not-eight-bytes").unwrap();
    let search = MockSearchService::new().with_hits(1);

    let err = fixture.run(&search).await.unwrap_err();
    assert!(matches!(err, ProbeError::CounterRead(_)));
}

#[tokio::test]
async fn unwritable_counter_still_reports_verdict() {
    let mut fixture = Fixture::new(10, 20);
    fixture.settings.counter = Some(CounterStore::new(
        fixture.dir.path().join("missing-dir").join("hits.count"),
    ));
    let search = MockSearchService::new().with_hits(12);

    let v = verdict(fixture.run(&search).await.unwrap());
    assert_eq!(v.severity, Severity::Warning);

    fixture.settings.write_policy = WriteFailurePolicy::Fatal;
    let err = fixture.run(&search).await.unwrap_err();
    assert!(matches!(err, ProbeError::CounterWrite(_)));
}

#[tokio::test]
async fn inverted_thresholds_skip_warning() {
    let fixture = Fixture::new(30, 20);
    let search = MockSearchService::new().with_hits(25);

    let v = verdict(fixture.run(&search).await.unwrap());
    assert_eq!(v.severity, Severity::Critical);
    assert_eq!(v.to_string(), "CRITICAL: 25 hits for elastic search.|hits=25;30;20;;");
}

#[tokio::test]
async fn query_environment_references_are_expanded() {
    let fixture = Fixture::new(10, 20);
    fs::write(
        &fixture.settings.query_path,
        r#"{"query":{"term":{"host":"${HITCHECK_TEST_HOST}"}}}"#,
    )
    .unwrap();
    std::env::set_var("HITCHECK_TEST_HOST", "web-01");
    let search = MockSearchService::new().with_hits(0);

    fixture.run(&search).await.unwrap();
    assert_eq!(
        search.calls()[0].body,
        r#"{"query":{"term":{"host":"web-01"}}}"#
    );
}
