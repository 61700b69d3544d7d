pub mod config;
pub mod crawl;
pub mod document;
pub mod dom;
pub mod extractor;
pub mod fetcher;
pub mod output;
pub mod schema;
