//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a miniature catalog and run the fetcher,
//! the category crawler and both pipelines end-to-end.

use chrono::NaiveDate;
use shelf_harvest::config::Config;
use shelf_harvest::crawler::{build_http_client, fetch_body, CategoryCrawler};
use shelf_harvest::output::UTF8_BOM;
use shelf_harvest::pipeline::{scrape_book, scrape_category};
use shelf_harvest::{Availability, HarvestError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATEGORY_PATH: &str = "/catalogue/category/books/mystery_3/index.html";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, out: &TempDir) -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 5;
    config.catalog.root_url = format!("{}/catalogue/", base_url);
    config.catalog.book_url = format!("{}/catalogue/book-a_1/index.html", base_url);
    config.catalog.category_url = format!("{}{}", base_url, CATEGORY_PATH);
    config.output.book_dir = out.path().join("books").to_string_lossy().into_owned();
    config.output.category_dir = out.path().join("categories").to_string_lossy().into_owned();
    config
}

fn product_page(title: &str, upc: &str, rating: &str) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/mystery_3/index.html">Mystery</a></li>
            <li class="active">{title}</li>
        </ul>
        <div class="item active"><img src="../../media/cache/{upc}.jpg" alt="{title}"></div>
        <div class="col-sm-6 product_main">
            <h1>{title}</h1>
            <p class="star-rating {rating}"></p>
        </div>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>About {title}.</p>
        <table class="table table-striped">
            <tr><th>UPC</th><td>{upc}</td></tr>
            <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
            <tr><th>Price (incl. tax)</th><td>£12.50</td></tr>
            <tr><th>Availability</th><td>In stock (7 available)</td></tr>
        </table>
        </body></html>"#,
        title = title,
        upc = upc,
        rating = rating,
    )
}

fn listing_page(slugs: &[&str], next: Option<&str>) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="../../../{}/index.html">{}</a></h3></article></li>"#,
                slug, slug
            )
        })
        .collect();
    let pager = next
        .map(|href| format!(r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#, href))
        .unwrap_or_default();

    format!("<html><body><ol>{}</ol>{}</body></html>", items, pager)
}

async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_book(server: &MockServer, slug: &str, title: &str) {
    mount_html(
        server,
        &format!("/catalogue/{}/index.html", slug),
        product_page(title, slug, "Four"),
    )
    .await;
}

/// Two listing pages (3 + 2 books), all detail pages served
async fn mount_two_page_category(server: &MockServer) {
    mount_html(
        server,
        CATEGORY_PATH,
        listing_page(&["book-a_1", "book-b_2", "book-c_3"], Some("page-2.html")),
    )
    .await;
    mount_html(
        server,
        "/catalogue/category/books/mystery_3/page-2.html",
        listing_page(&["book-d_4", "book-e_5"], None),
    )
    .await;

    for (slug, title) in [
        ("book-a_1", "Book A"),
        ("book-b_2", "Book B"),
        ("book-c_3", "Book C"),
        ("book-d_4", "Book D"),
        ("book-e_5", "Book E"),
    ] {
        mount_book(server, slug, title).await;
    }
}

#[tokio::test]
async fn test_scrape_single_book() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_book(&mock_server, "book-a_1", "Book A: The Sequel").await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &out);
    let client = build_http_client(&config.http).unwrap();

    let run = scrape_book(&client, &config, &config.catalog.book_url, run_date())
        .await
        .expect("book run failed");

    let record = &run.record;
    assert_eq!(record.product_page_url, config.catalog.book_url);
    assert_eq!(record.universal_product_code, "book-a_1");
    assert_eq!(record.title, "Book A: The Sequel");
    assert!((record.price_including_tax - 12.5).abs() < 1e-9);
    assert!((record.price_excluding_tax - 10.0).abs() < 1e-9);
    assert_eq!(record.number_available, Availability::Count(7));
    assert_eq!(record.product_description, "About Book A: The Sequel.");
    assert_eq!(record.category, "Mystery");
    assert_eq!(record.review_rating, 4);
    assert_eq!(
        record.image_url,
        format!("{}/media/cache/book-a_1.jpg", base_url)
    );

    let file = run.file.expect("file not written");
    assert_eq!(
        file.file_name().unwrap().to_str().unwrap(),
        "Book_A_The_Sequel_2024-03-09.csv"
    );
    let bytes = std::fs::read(&file).unwrap();
    assert!(bytes.starts_with(UTF8_BOM));
    assert_eq!(String::from_utf8_lossy(&bytes).lines().count(), 2);
}

#[tokio::test]
async fn test_scrape_book_missing_page_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out);
    let client = build_http_client(&config.http).unwrap();

    let err = scrape_book(&client, &config, &config.catalog.book_url, run_date())
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::HttpStatus { status: 404, .. }));
    assert!(!out.path().join("books").exists());
}

#[tokio::test]
async fn test_scrape_book_missing_label_writes_nothing() {
    let mock_server = MockServer::start().await;
    let page = product_page("Book A", "book-a_1", "One")
        .replace("<tr><th>UPC</th><td>book-a_1</td></tr>", "");
    mount_html(&mock_server, "/catalogue/book-a_1/index.html", page).await;

    let out = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out);
    let client = build_http_client(&config.http).unwrap();

    match scrape_book(&client, &config, &config.catalog.book_url, run_date()).await {
        Err(HarvestError::Extraction { url, .. }) => assert_eq!(url, config.catalog.book_url),
        other => panic!("expected extraction failure, got {:?}", other.map(|r| r.file)),
    }
    assert!(!out.path().join("books").exists());
}

#[tokio::test]
async fn test_fetch_forces_utf8() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>£51.77</p>".as_bytes().to_vec(), "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let client = build_http_client(&Config::default().http).unwrap();
    let body = fetch_body(&client, &format!("{}/latin", mock_server.uri()))
        .await
        .unwrap();
    assert!(body.contains("£51.77"));
    assert!(!body.contains("Â£"));
}

#[tokio::test]
async fn test_crawl_follows_pagination_in_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_two_page_category(&mock_server).await;

    let client = build_http_client(&Config::default().http).unwrap();
    let crawler = CategoryCrawler::new(&client, &format!("{}/catalogue/", base_url), 100).unwrap();

    let urls = crawler
        .crawl(&format!("{}{}", base_url, CATEGORY_PATH))
        .await
        .unwrap();

    let expected: Vec<String> = ["book-a_1", "book-b_2", "book-c_3", "book-d_4", "book-e_5"]
        .iter()
        .map(|slug| format!("{}/catalogue/{}/index.html", base_url, slug))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_crawl_stops_on_repeated_next_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_html(
        &mock_server,
        CATEGORY_PATH,
        listing_page(&["book-a_1"], Some("page-2.html")),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/category/books/mystery_3/page-2.html",
        listing_page(&["book-b_2"], Some("index.html")),
    )
    .await;

    let client = build_http_client(&Config::default().http).unwrap();
    let crawler = CategoryCrawler::new(&client, &format!("{}/catalogue/", base_url), 100).unwrap();

    let urls = crawler
        .crawl(&format!("{}{}", base_url, CATEGORY_PATH))
        .await
        .unwrap();
    assert_eq!(urls.len(), 2);
}

#[tokio::test]
async fn test_crawl_respects_max_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_two_page_category(&mock_server).await;

    let client = build_http_client(&Config::default().http).unwrap();
    let crawler = CategoryCrawler::new(&client, &format!("{}/catalogue/", base_url), 1).unwrap();

    let urls = crawler
        .crawl(&format!("{}{}", base_url, CATEGORY_PATH))
        .await
        .unwrap();
    assert_eq!(urls.len(), 3);
}

#[tokio::test]
async fn test_crawl_empty_listing_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_html(
        &mock_server,
        CATEGORY_PATH,
        listing_page(&["book-a_1"], Some("page-2.html")),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/category/books/mystery_3/page-2.html",
        listing_page(&[], None),
    )
    .await;

    let client = build_http_client(&Config::default().http).unwrap();
    let crawler = CategoryCrawler::new(&client, &format!("{}/catalogue/", base_url), 100).unwrap();

    let err = crawler
        .crawl(&format!("{}{}", base_url, CATEGORY_PATH))
        .await
        .unwrap_err();
    match err {
        HarvestError::EmptyListing { url } => assert!(url.ends_with("/page-2.html")),
        other => panic!("expected empty listing, got {}", other),
    }
}

#[tokio::test]
async fn test_crawl_listing_server_error_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&Config::default().http).unwrap();
    let crawler =
        CategoryCrawler::new(&client, &format!("{}/catalogue/", mock_server.uri()), 100).unwrap();

    let err = crawler
        .crawl(&format!("{}{}", mock_server.uri(), CATEGORY_PATH))
        .await
        .unwrap_err();
    assert!(matches!(err, HarvestError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_scrape_category_skips_failed_books() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_html(
        &mock_server,
        CATEGORY_PATH,
        listing_page(&["book-a_1", "book-b_2", "book-c_3"], Some("page-2.html")),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/category/books/mystery_3/page-2.html",
        listing_page(&["book-d_4", "book-e_5"], None),
    )
    .await;
    mount_book(&mock_server, "book-a_1", "Book A").await;
    mount_book(&mock_server, "book-c_3", "Book C").await;
    mount_book(&mock_server, "book-d_4", "Book D").await;
    mount_book(&mock_server, "book-e_5", "Book E").await;
    // book-b_2 is not mounted: wiremock answers 404

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &out);
    let client = build_http_client(&config.http).unwrap();

    let run = scrape_category(&client, &config, &config.catalog.category_url, run_date())
        .await
        .expect("category run failed");

    assert_eq!(run.category, "Mystery");
    assert_eq!(run.links.len(), 5);
    assert_eq!(run.records.len(), 4);
    assert_eq!(run.failures.len(), 1);
    assert!(run.failures[0].url.ends_with("/catalogue/book-b_2/index.html"));

    let titles: Vec<&str> = run.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Book A", "Book C", "Book D", "Book E"]);

    let file = run.file.expect("file not written");
    assert_eq!(
        file.file_name().unwrap().to_str().unwrap(),
        "products_category_Mystery_2024-03-09.csv"
    );
    let bytes = std::fs::read(&file).unwrap();
    let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("product_page_url;universal_product_code;title;"));
}

#[tokio::test]
async fn test_scrape_category_without_records_writes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_html(
        &mock_server,
        CATEGORY_PATH,
        listing_page(&["book-a_1", "book-b_2"], None),
    )
    .await;
    // No detail pages mounted: every book fails

    let out = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &out);
    let client = build_http_client(&config.http).unwrap();

    let run = scrape_category(&client, &config, &config.catalog.category_url, run_date())
        .await
        .unwrap();

    assert_eq!(run.links.len(), 2);
    assert!(run.records.is_empty());
    assert_eq!(run.failures.len(), 2);
    assert!(run.file.is_none());
    assert!(!out.path().join("categories").exists());
}
