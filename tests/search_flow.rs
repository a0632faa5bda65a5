//! End-to-end search flow: typed input through the debounced controller, the
//! orchestrator and the filter pipeline, on a paused clock.

use bookfinder::domain::{FilterState, FilterUpdate};
use bookfinder::search::{project, QueryController, QueryEmission, SearchOrchestrator};
use bookfinder::testing::{book, ScriptedCatalog, SearchReply};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const QUIET: Duration = Duration::from_millis(500);

async fn search_next(
    emissions: &mut mpsc::UnboundedReceiver<QueryEmission>,
    orchestrator: &Arc<SearchOrchestrator>,
) -> tokio::task::JoinHandle<()> {
    let emission = emissions.recv().await.expect("controller emitted");
    let orchestrator = Arc::clone(orchestrator);
    tokio::spawn(async move { orchestrator.search(emission.query()).await })
}

#[tokio::test(start_paused = true)]
async fn typing_settles_then_filters_and_sorts() {
    let catalog = ScriptedCatalog::default();
    catalog.set_results(
        "tolkien",
        vec![
            book("/works/OL1W", "The Hobbit", Some(1937)),
            book("/works/OL2W", "The Silmarillion", Some(1977)),
            book("/works/OL3W", "The Lord of the Rings", Some(1954)),
        ],
    );
    let orchestrator = Arc::new(SearchOrchestrator::new(Arc::new(catalog.clone())));
    let (tx, mut emissions) = mpsc::unbounded_channel();
    let mut controller = QueryController::new(QUIET, tx);

    controller.input("t");
    controller.input("tol");
    controller.input("tolkien");
    tokio::time::sleep(QUIET + Duration::from_millis(10)).await;

    search_next(&mut emissions, &orchestrator).await.await.unwrap();
    assert_eq!(catalog.search_requests(), ["tolkien"]);

    let snapshot = orchestrator.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.results.len(), 3);

    let mut filters = FilterState::default();
    filters.apply(FilterUpdate::YearFrom("1950".into()));
    filters.apply(FilterUpdate::Sort("desc".into()));
    let shown = project(&snapshot.results, &filters);

    let titles: Vec<&str> = shown.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["The Silmarillion", "The Lord of the Rings"]);
    assert!(Arc::ptr_eq(&shown[0], &snapshot.results[1]));
}

#[tokio::test(start_paused = true)]
async fn slow_stale_response_never_overwrites_newer_results() {
    let catalog = ScriptedCatalog::default();
    catalog.script_search(
        "dune",
        SearchReply::Books(vec![book("/works/OL1W", "Dune", Some(1965))]),
        Duration::from_secs(3),
    );
    catalog.script_search(
        "emma",
        SearchReply::Books(vec![book("/works/OL2W", "Emma", Some(1815))]),
        Duration::from_millis(100),
    );
    catalog.ignore_cancellation();

    let orchestrator = Arc::new(SearchOrchestrator::new(Arc::new(catalog)));
    let (tx, mut emissions) = mpsc::unbounded_channel();
    let mut controller = QueryController::new(QUIET, tx);

    controller.input("dune");
    controller.submit();
    let first = search_next(&mut emissions, &orchestrator).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.input("emma");
    controller.submit();
    let second = search_next(&mut emissions, &orchestrator).await;

    second.await.unwrap();
    first.await.unwrap();

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.query, "emma");
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(snapshot.results[0].title, "Emma");
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn failure_then_recovery_clears_error() {
    let catalog = ScriptedCatalog::default();
    catalog.script_search("dune", SearchReply::NetworkError, Duration::ZERO);
    catalog.set_results("emma", vec![book("/works/OL2W", "Emma", None)]);

    let orchestrator = Arc::new(SearchOrchestrator::new(Arc::new(catalog)));
    let mut updates = orchestrator.subscribe();

    orchestrator.search("dune").await;
    let failed = updates.borrow_and_update().clone();
    assert_eq!(failed.error, "Network error: please check your connection.");
    assert!(failed.results.is_empty());

    orchestrator.search("emma").await;
    let recovered = updates.borrow_and_update().clone();
    assert!(recovered.error.is_empty());
    assert_eq!(recovered.results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_clears_results_without_a_request() {
    let catalog = ScriptedCatalog::default();
    catalog.set_results("dune", vec![book("/works/OL1W", "Dune", None)]);
    let orchestrator = Arc::new(SearchOrchestrator::new(Arc::new(catalog.clone())));
    let (tx, mut emissions) = mpsc::unbounded_channel();
    let mut controller = QueryController::new(QUIET, tx);

    controller.input("dune");
    controller.submit();
    search_next(&mut emissions, &orchestrator).await.await.unwrap();
    assert_eq!(orchestrator.snapshot().results.len(), 1);

    controller.input("");
    tokio::time::sleep(QUIET + Duration::from_millis(10)).await;
    search_next(&mut emissions, &orchestrator).await.await.unwrap();

    assert!(orchestrator.snapshot().results.is_empty());
    assert_eq!(catalog.search_requests(), ["dune"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn searches_issued_back_to_back_resolve_in_issue_order() {
    let catalog = ScriptedCatalog::default();
    catalog.set_results("older", vec![book("/works/OL1W", "Older", None)]);
    catalog.set_results("newer", vec![book("/works/OL2W", "Newer", None)]);
    let orchestrator = Arc::new(SearchOrchestrator::new(Arc::new(catalog)));

    for _ in 0..500 {
        let tasks: Vec<_> = ["older", "newer"]
            .into_iter()
            .filter_map(|query| orchestrator.begin(query))
            .map(|pending| {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move { orchestrator.complete(pending).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let snapshot = orchestrator.snapshot();
        assert_eq!(snapshot.query, "newer");
        assert_eq!(snapshot.results[0].title, "Newer");
        assert!(!snapshot.loading);
    }
}
