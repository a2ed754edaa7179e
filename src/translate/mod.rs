//! Text translation: provider trait, the HTTP provider, the bounded-retry
//! adapter, and the optional concurrent cache.

pub mod adapter;
pub mod cache;
pub mod google;
pub mod provider;

pub use adapter::TranslationAdapter;
pub use cache::TranslationCache;
pub use provider::{MockTranslationProvider, TranslationProvider, TranslationResult};
