//! Server paging end to end: ServerTable driving a fetcher, with paused
//! tokio time forcing responses to arrive out of order.

use crate::helpers::{MockFetcher, ids, people, people_columns, settings_with_page_size};
use std::sync::Arc;
use std::time::Duration;
use tabula::{FetchOutcome, FetchRequest, FnFetcher, Row, ServerTable, TableError};

fn server_table(fetcher: Arc<MockFetcher>) -> (ServerTable, tabula::PendingFetch) {
    ServerTable::new(
        people_columns(),
        "people",
        &settings_with_page_size(10),
        fetcher,
    )
}

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_page_never_overwrites_newer() {
    let fetcher = Arc::new(
        MockFetcher::new(people(100))
            .with_delay(2, Duration::from_millis(800))
            .with_delay(5, Duration::from_millis(50)),
    );
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();
    assert_eq!(table.with(|t| t.page().total_count()), 100);

    let page2 = table.go_to(2);
    let page5 = table.go_to(5);
    assert!(page5.seq() > page2.seq());
    assert!(table.with(|t| t.is_loading()));

    let (slow, fast) = tokio::join!(page2.run(), page5.run());
    assert!(matches!(slow.unwrap(), Some(FetchOutcome::Discarded { .. })));
    assert!(matches!(fast.unwrap(), Some(FetchOutcome::Applied { rows: 10, .. })));

    table.with(|t| {
        assert_eq!(ids(t.visible_rows()), (50..60).collect::<Vec<_>>());
        assert_eq!(t.page().page_index(), 5);
        assert!(!t.is_loading());
        assert_eq!(t.status_line(), "Showing 10 items | Page: 6");
    });
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_after_latest_applied() {
    let fetcher = Arc::new(MockFetcher::new(people(100)).with_delay(1, Duration::from_secs(5)));
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();

    let stale = table.next();
    let latest = table.last();
    latest.run().await.unwrap();
    assert_eq!(ids(&table.with(|t| t.visible_rows().to_vec())), (90..100).collect::<Vec<_>>());

    let outcome = stale.run().await.unwrap();
    assert!(matches!(outcome, Some(FetchOutcome::Discarded { .. })));
    assert_eq!(table.with(|t| t.page().page_index()), 9);
    assert_eq!(ids(&table.with(|t| t.visible_rows().to_vec())), (90..100).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_failure_keeps_previous_rows() {
    let fetcher = Arc::new(MockFetcher::new(people(40)).failing_page(1));
    let (table, initial) = server_table(fetcher);
    initial.run().await.unwrap();

    let outcome = table.next().run().await.unwrap();
    assert!(matches!(outcome, Some(FetchOutcome::Failed { .. })));
    table.with(|t| {
        assert_eq!(ids(t.visible_rows()), (0..10).collect::<Vec<_>>());
        assert!(t.fetch_error().is_some_and(|e| e.contains("503")));
        assert!(!t.is_loading());
    });

    // Next successful fetch clears the flag
    table.go_to(2).run().await.unwrap();
    table.with(|t| {
        assert_eq!(t.fetch_error(), None);
        assert_eq!(ids(t.visible_rows()), (20..30).collect::<Vec<_>>());
    });
}

#[tokio::test]
async fn test_page_size_change_refetches_first_page() {
    let fetcher = Arc::new(MockFetcher::new(people(100)));
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();
    table.go_to(4).run().await.unwrap();

    table.set_page_size(25).unwrap().run().await.unwrap();
    let last = fetcher.requests().last().cloned().unwrap();
    assert_eq!(
        last,
        FetchRequest {
            page_index: 0,
            page_size: 25,
            source_id: "people".into(),
        }
    );
    assert_eq!(table.with(|t| t.visible_rows().len()), 25);
}

#[tokio::test]
async fn test_source_switch_starts_fresh() {
    let fetcher = Arc::new(MockFetcher::new(people(100)));
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();
    table.last().run().await.unwrap();

    let pending = table.set_source("archived").unwrap();
    // Count is gone before the new response lands
    assert_eq!(table.with(|t| t.page().total_count()), 0);
    assert_eq!(table.with(|t| t.page().page_index()), 0);
    pending.run().await.unwrap();

    let last = fetcher.requests().last().cloned().unwrap();
    assert_eq!(last.source_id, "archived");
    assert_eq!(last.page_index, 0);
}

#[tokio::test]
async fn test_no_fetch_when_page_unchanged() {
    let fetcher = Arc::new(MockFetcher::new(people(30)));
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();

    let pending = table.prev();
    assert_eq!(pending.seq(), None);
    assert_eq!(pending.run().await.unwrap(), None);
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn test_closure_fetcher_with_out_of_band_total() {
    let data: Arc<Vec<Row>> = Arc::new(people(35));
    let source = Arc::clone(&data);
    let fetcher = FnFetcher(move |request: FetchRequest| {
        let data = Arc::clone(&source);
        async move {
            let start = (request.page_index * request.page_size).min(data.len());
            let end = (start + request.page_size).min(data.len());
            Ok::<_, anyhow::Error>(data[start..end].to_vec())
        }
    });

    let (table, initial) = ServerTable::new(
        people_columns(),
        "people",
        &settings_with_page_size(10),
        Arc::new(fetcher),
    );
    initial.run().await.unwrap();

    // Without a total the table cannot page forward
    assert_eq!(table.next().seq(), None);

    table.set_total_count(data.len()).unwrap().run().await.unwrap();
    table.last().run().await.unwrap();
    table.with(|t| {
        assert_eq!(t.page_label(), "Page 4 of 4");
        assert_eq!(ids(t.visible_rows()), (30..35).collect::<Vec<_>>());
    });
}

#[tokio::test]
async fn test_search_change_refetches_first_page() {
    let fetcher = Arc::new(MockFetcher::new(people(100)));
    let (table, initial) = server_table(fetcher.clone());
    initial.run().await.unwrap();
    table.go_to(3).run().await.unwrap();

    table
        .try_update(|t| t.set_search_field("name"))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(table.with(|t| t.page().page_index()), 0);
    assert_eq!(fetcher.requests().last().map(|r| r.page_index), Some(0));

    assert!(matches!(
        table.try_update(|t| t.set_search_field("ghost")),
        Err(TableError::UnknownColumn(_))
    ));
}
