use crate::domain::model::{GeneralData, Page};
use async_trait::async_trait;

/// Capability contract every CMS adapter satisfies. Consumed polymorphically
/// through the factory.
///
/// All fetch operations fail soft: upstream errors, malformed payloads and
/// not-found both surface as `None`, never as a panic or an error the caller
/// has to handle. Construction is the only place configuration problems are
/// allowed to be fatal.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Page addressed by its localized slug, or `None` when missing.
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page>;

    /// The page flagged as home, per the provider's own convention
    /// (explicit `home` slug, a start-page flag, or a dedicated query).
    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page>;

    /// Header/footer/navigation data for the locale.
    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData>;

    /// Optional listing support; adapters without it return nothing.
    async fn fetch_page_list(&self, locale: &str) -> Vec<Page> {
        let _ = locale;
        Vec::new()
    }
}
