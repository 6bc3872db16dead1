//! On-demand code context: per-session file cache and definition location

pub mod fetcher;
pub mod locator;

pub use fetcher::CodeFileFetcher;
pub use locator::{CallableLocator, LanguageRules, LocatorError};
