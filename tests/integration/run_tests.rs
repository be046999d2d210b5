use super::*;
use hardware_scraper::ComponentKind;
use rust_decimal::Decimal;
use std::str::FromStr;

#[tokio::test]
async fn test_unreachable_url_records_one_failed_log() -> anyhow::Result<()> {
    let repo = create_test_repository().await;
    // nothing listens on port 1
    repo.add_source(listing_source(1, "Dead Shop", "http://127.0.0.1:1/listing".to_string()))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    let log = orchestrator.scrape_source(1).await?;

    assert!(!log.is_successful);
    assert_eq!(log.items_scraped, 0);
    assert!(log.is_finalized());
    assert!(log.error_message.is_some());

    assert_eq!(repo.run_logs_for(1).await.len(), 1);
    assert!(repo.components().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_one_malformed_node_out_of_five() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let cards = vec![
        product_card("Intel Core i9-14900K Processor", "$549.99", "/img/cpu.png", "24 cores, 32 threads, Socket LGA1700"),
        product_card("NVIDIA GeForce RTX 4070 Super", "$599.00", "/img/gpu.png", "12GB GDDR6X, Boost Clock 2475 MHz"),
        // unparseable image url
        product_card("Corsair Vengeance 32GB DDR5", "$109.99", "http://[broken", "2 x 16GB 6000MHz CL36"),
        product_card("Samsung 990 Pro 2TB NVMe SSD", "$169.99", "/img/ssd.png", "2TB NVMe M.2, read 7450 MB/s"),
        product_card("ASUS ROG Strix B650-A Motherboard", "$229.99", "/img/mb.png", "ATX, Socket AM5, B650"),
    ];
    serve_page(&server, "/listing", listing_page(&cards)).await;

    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Test Shop", format!("{}/listing", server.uri())))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    let log = orchestrator.scrape_source(1).await?;

    assert!(log.is_successful);
    assert_eq!(log.items_scraped, 4);
    assert!(log.error_message.is_none());

    let components = repo.components().await;
    assert_eq!(components.len(), 4);
    assert!(components.iter().all(|c| c.kind() != ComponentKind::Ram));

    let cpu = components.iter().find(|c| c.kind() == ComponentKind::Cpu).unwrap();
    assert_eq!(cpu.base.price, Decimal::from_str("549.99")?);
    assert_eq!(cpu.base.model, "i9-14900K");
    assert_eq!(cpu.base.image_url, Some(format!("{}/img/cpu.png", server.uri())));
    assert_eq!(cpu.as_cpu().unwrap().thread_count, 32);

    let gpu = components.iter().find(|c| c.kind() == ComponentKind::Gpu).unwrap();
    assert_eq!(gpu.as_gpu().unwrap().boost_clock, Decimal::from_str("2.475")?);
    Ok(())
}

#[tokio::test]
async fn test_component_count_excludes_invalid_and_unclassified_nodes() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let cards = vec![
        product_card("AMD Ryzen 5 7600X", "$229.00", "", "6 cores, Socket AM5"),
        product_card("Crucial P3 1TB NVMe", "$64.99", "", ""),
        // missing price
        product_card("Kingston Fury 16GB DDR4", "", "", ""),
        // no category
        product_card("Noctua NH-D15 Cooler", "$109.95", "", "Dual tower air cooler"),
    ];
    serve_page(&server, "/listing", listing_page(&cards)).await;

    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Test Shop", format!("{}/listing", server.uri())))
        .await;

    let log = create_test_orchestrator(repo.clone()).scrape_source(1).await?;

    assert!(log.is_successful);
    assert_eq!(log.items_scraped, 2);
    assert_eq!(repo.components().await.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_unknown_manufacturer_created_once() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let cards = vec![
        product_card("Zotac Gaming GeForce RTX 4060", "$299.99", "", ""),
        product_card("PNY XLR8 GeForce RTX 4070", "$549.99", "", ""),
    ];
    serve_page(&server, "/listing", listing_page(&cards)).await;

    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Test Shop", format!("{}/listing", server.uri())))
        .await;
    let orchestrator = create_test_orchestrator(repo.clone());

    orchestrator.scrape_source(1).await?;
    orchestrator.scrape_source(1).await?;

    assert_eq!(repo.manufacturers_created().await, 1);
    let unknown_id = repo.manufacturer_id("Unknown").await.unwrap();
    let components = repo.components().await;
    assert_eq!(components.len(), 4);
    assert!(components.iter().all(|c| c.base.manufacturer_id == unknown_id));
    Ok(())
}

#[tokio::test]
async fn test_invalid_selector_is_a_configuration_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let repo = create_test_repository().await;
    repo.add_source(
        ScrapingSource::new(1, "Broken Config", server.uri())
            .with_configuration(r#"{"productListSelector": "div[[", "nameSelector": "h3"}"#),
    )
    .await;

    let log = create_test_orchestrator(repo.clone()).scrape_source(1).await?;

    assert!(!log.is_successful);
    let message = log.error_message.unwrap();
    assert!(message.contains("productListSelector"), "{}", message);
    assert_eq!(repo.run_logs_for(1).await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_page_without_products_is_unsuccessful_but_clean() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    serve_page(&server, "/listing", listing_page(&[])).await;

    let repo = create_test_repository().await;
    repo.add_source(listing_source(1, "Empty Shop", format!("{}/listing", server.uri())))
        .await;

    let log = create_test_orchestrator(repo.clone()).scrape_source(1).await?;

    assert!(!log.is_successful);
    assert_eq!(log.items_scraped, 0);
    assert!(log.error_message.is_none());
    assert!(log.is_finalized());
    Ok(())
}
