use super::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

async fn two_shop_server() -> MockServer {
    let server = MockServer::start().await;
    let page = listing_page(&[product_card("Intel Core i5-13400F Processor", "$199.99", "", "10 cores")]);

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page.clone())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    serve_page(&server, "/fast", page).await;

    server
}

#[tokio::test]
async fn test_cancelling_one_run_leaves_the_other_alone() -> anyhow::Result<()> {
    let server = two_shop_server().await;
    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Slow Shop", format!("{}/slow", server.uri())))
        .await;
    repo.add_source(listing_source(2, "Fast Shop", format!("{}/fast", server.uri())))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    let slow_cancel = CancellationToken::new();
    let canceller = slow_cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let (slow, fast) = tokio::join!(
        orchestrator.scrape_source_with_cancel(1, slow_cancel),
        orchestrator.scrape_source_with_cancel(2, CancellationToken::new()),
    );

    let slow = slow?;
    assert!(!slow.is_successful);
    assert_eq!(slow.error_message.as_deref(), Some("Run cancelled"));

    let fast = fast?;
    assert!(fast.is_successful);
    assert_eq!(fast.items_scraped, 1);

    assert_eq!(repo.run_logs().await.len(), 2);
    assert_eq!(repo.components().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_scrape_sources_returns_results_in_input_order() -> anyhow::Result<()> {
    let server = two_shop_server().await;
    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Fast Shop", format!("{}/fast", server.uri())))
        .await;
    repo.add_source(listing_source(2, "Other Shop", format!("{}/fast", server.uri())).disabled())
        .await;
    repo.add_source(listing_source(3, "Third Shop", format!("{}/fast", server.uri())))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    let results = orchestrator
        .scrape_sources(&[3, 2, 1, 99], CancellationToken::new())
        .await;

    let ids: Vec<i64> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![3, 2, 1, 99]);

    assert!(results[0].1.as_ref().is_ok_and(|log| log.is_successful));
    assert!(results[1].1.is_err());
    assert!(results[2].1.as_ref().is_ok_and(|log| log.is_successful));
    assert!(results[3].1.is_err());

    // disabled and missing sources never start a run
    assert_eq!(repo.run_logs().await.len(), 2);
    // both runs raced to create "Unknown"; only one insert happened
    assert_eq!(repo.manufacturers_created().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_parent_cancellation_stops_all_runs() -> anyhow::Result<()> {
    let server = two_shop_server().await;
    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Slow A", format!("{}/slow", server.uri())))
        .await;
    repo.add_source(listing_source(2, "Slow B", format!("{}/slow", server.uri())))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let results = orchestrator.scrape_sources(&[1, 2], cancel).await;

    for (_, result) in results {
        let log = result?;
        assert!(!log.is_successful);
        assert_eq!(log.error_message.as_deref(), Some("Run cancelled"));
    }
    assert!(repo.components().await.is_empty());
    Ok(())
}
