pub mod scrapers;

pub use scrapers::{create_source, SourceConfig, SourceKind};
pub use scrapers::newsapi::NewsApiSource;
pub use scrapers::search::WebSearchSource;

pub mod prelude {
    pub use super::scrapers::{create_source, SourceConfig, SourceKind};
    pub use ns_core::{Article, ArticleSource, FetchOutcome, Result, Error};
}
