//! Integration tests for concurrent roster enrichment

mod helpers;

use helpers::{roster, snapshot, MockSource, FIXTURES_PER_CALL};
use itl_scout::client::{build_http_client, DEFAULT_REQUEST_TIMEOUT};
use itl_scout::{
    Category, ChampionCatalog, ChampionEntry, ClientConfig, Enricher, FetchError, FetchRequest, LookupError,
    MobalyticsClient, Role, TaskOutcome,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_all_fetches_succeed() {
    let roster = roster();
    let source = Arc::new(MockSource::new());

    let complete = Enricher::new(source.clone(), 5).enrich(&roster).await;

    assert!(complete);
    assert_eq!(source.calls(), 10);
    for (role, entity) in roster.entities() {
        for category in Category::ALL {
            let expected = MockSource::fixtures_for(&FetchRequest::for_entity(entity, role, category));
            let actual = entity.collection(category).expect("collection set");
            assert_eq!(actual.len(), FIXTURES_PER_CALL);
            assert_eq!(actual, expected.as_slice());
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_failure_leaves_only_that_field_absent() {
    let roster = roster();
    let source = Arc::new(MockSource::new().failing(Role::Support, Category::Pool));

    let complete = Enricher::new(source, 5).enrich(&roster).await;

    assert!(!complete);
    assert!(roster.support().pool().is_none());
    assert!(roster.support().against().is_some());
    assert_eq!(roster.missing(), vec![(Role::Support, Category::Pool)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_task_does_not_disturb_other_fields() {
    let reference = roster();
    assert!(Enricher::new(Arc::new(MockSource::new()), 5).enrich(&reference).await);

    let roster = roster();
    let source = Arc::new(MockSource::new().failing(Role::Mid, Category::Against));
    let report = Enricher::new(source, 5).enrich_with_report(&roster).await;

    assert!(!report.complete);
    assert_eq!(report.succeeded(), 9);
    assert_eq!(report.failed(), 1);
    assert!(roster.mid().against().is_none());

    for ((role, pool, against), (_, ref_pool, ref_against)) in
        snapshot(&roster).into_iter().zip(snapshot(&reference))
    {
        assert_eq!(pool, ref_pool, "{role} pool differs");
        if role != Role::Mid {
            assert_eq!(against, ref_against, "{role} against differs");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_completeness_is_stable_across_reads() {
    let roster = roster();
    let source = Arc::new(MockSource::new().failing(Role::Top, Category::Pool));
    let complete = Enricher::new(source, 5).enrich(&roster).await;

    let before = snapshot(&roster);
    for _ in 0..3 {
        assert_eq!(roster.is_complete(), complete);
    }
    assert_eq!(snapshot(&roster), before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_degree_does_not_change_outcome() {
    let serial_roster = roster();
    let parallel_roster = roster();
    let source = || {
        Arc::new(
            MockSource::new()
                .failing(Role::Jungle, Category::Against)
                .with_delay(Duration::from_millis(5)),
        )
    };

    let serial = Enricher::new(source(), 1).enrich(&serial_roster).await;
    let parallel = Enricher::new(source(), 10).enrich(&parallel_roster).await;

    assert_eq!(serial, parallel);
    assert_eq!(snapshot(&serial_roster), snapshot(&parallel_roster));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_fetches_are_bounded() {
    for limit in [1, 3, 5] {
        let roster = roster();
        let source = Arc::new(MockSource::new().with_delay(Duration::from_millis(40)));

        assert!(Enricher::new(source.clone(), limit).enrich(&roster).await);
        assert_eq!(source.peak_concurrency(), limit, "limit {limit}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tasks_run_in_parallel() {
    let roster = roster();
    let source = Arc::new(MockSource::new().with_delay(Duration::from_millis(200)));

    let start = Instant::now();
    assert!(Enricher::new(source, 10).enrich(&roster).await);

    // Ten serial fetches would take two seconds
    assert!(start.elapsed() < Duration::from_millis(1500));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_timed_out_fetch_is_a_failure() {
    let roster = roster();
    let source = Arc::new(MockSource::new().hanging(Role::Adc, Category::Pool));

    let start = Instant::now();
    let report = Enricher::new(source, 5)
        .with_task_timeout(Duration::from_millis(50))
        .enrich_with_report(&roster)
        .await;

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(!report.complete);
    assert!(roster.adc().pool().is_none());
    assert_eq!(roster.missing(), vec![(Role::Adc, Category::Pool)]);

    let timed_out = report
        .tasks
        .iter()
        .find(|t| t.role == Role::Adc && t.category == Category::Pool)
        .expect("adc pool reported");
    assert!(matches!(timed_out.outcome, TaskOutcome::Failed(FetchError::Timeout(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_task_does_not_abort_batch() {
    let roster = roster();
    let source = Arc::new(MockSource::new().panicking(Role::Top, Category::Against));

    let report = Enricher::new(source, 5).enrich_with_report(&roster).await;

    assert!(!report.complete);
    assert_eq!(report.aborted, 1);
    assert_eq!(report.succeeded(), 9);
    assert_eq!(roster.missing(), vec![(Role::Top, Category::Against)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_second_run_rejects_every_write() {
    let roster = roster();
    let enricher = Enricher::new(Arc::new(MockSource::new()), 5);
    assert!(enricher.enrich(&roster).await);
    let first = snapshot(&roster);

    let report = enricher.enrich_with_report(&roster).await;

    assert!(!report.complete);
    assert_eq!(report.succeeded(), 0);
    assert!(report
        .tasks
        .iter()
        .all(|t| matches!(t.outcome, TaskOutcome::Rejected(_))));
    assert_eq!(snapshot(&roster), first);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unknown_champion_filter_fails_every_task() {
    let catalog = ChampionCatalog::new(vec![ChampionEntry {
        name: "Thresh".to_string(),
        slug: "thresh".to_string(),
        id: 412,
    }]);
    let http = build_http_client(DEFAULT_REQUEST_TIMEOUT).unwrap();
    let client = MobalyticsClient::new(http, ClientConfig::new("c".repeat(64), "m".repeat(64)), Arc::new(catalog));

    let roster = roster();
    let report = Enricher::new(Arc::new(client), 5)
        .with_champion("Teemo")
        .enrich_with_report(&roster)
        .await;

    assert!(!report.complete);
    assert_eq!(report.tasks.len(), 10);
    assert!(report.tasks.iter().all(|t| matches!(
        &t.outcome,
        TaskOutcome::Failed(FetchError::Lookup(LookupError::UnknownName(name))) if name == "Teemo"
    )));
    assert_eq!(roster.missing().len(), 10);
}
