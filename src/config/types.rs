use serde::Deserialize;

/// Default catalog root that detail links are resolved against
pub const DEFAULT_ROOT_URL: &str = "https://books.toscrape.com/catalogue/";

/// Default product page for the single-book run
pub const DEFAULT_BOOK_URL: &str =
    "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";

/// Default listing page for the category run
pub const DEFAULT_CATEGORY_URL: &str =
    "https://books.toscrape.com/catalogue/category/books/mystery_3/index.html";

/// Main configuration structure for Shelf-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub catalog: CatalogConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("shelf-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Catalog locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CatalogConfig {
    /// Root that relative detail links are joined onto
    pub root_url: String,

    /// Product page scraped by the `book` run
    pub book_url: String,

    /// Listing page crawled by the `category` run
    pub category_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            book_url: DEFAULT_BOOK_URL.to_string(),
            category_url: DEFAULT_CATEGORY_URL.to_string(),
        }
    }
}

/// Category crawl behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of listing pages followed in one category
    pub max_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self { max_pages: 1000 }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory for single-book files
    pub book_dir: String,

    /// Directory for category files
    pub category_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            book_dir: "CSV/books".to_string(),
            category_dir: "CSV/categories".to_string(),
        }
    }
}
