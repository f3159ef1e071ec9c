//! Provider selection.
//!
//! The factory is the one place configuration errors are allowed to be
//! fatal: a missing credential is a deployment problem and should stop the
//! process at startup, not surface per request. Build it once, pass it by
//! reference; it holds no per-request state.

use crate::config::{CmsConfig, CmsKind};
use crate::domain::model::{GeneralData, Page};
use crate::domain::ports::ContentService;
use crate::providers::contentful::ContentfulService;
use crate::providers::fixture::FixtureService;
use crate::providers::sanity::SanityService;
use crate::providers::storyblok::StoryblokService;
use crate::providers::strapi::StrapiService;
use crate::utils::error::{CmsError, Result};

pub struct CmsFactory {
    service: Option<Box<dyn ContentService>>,
}

impl CmsFactory {
    /// Instantiates exactly one adapter for the configured kind.
    /// Fails when the kind's required fields are missing.
    pub fn from_config(config: &CmsConfig) -> Result<Self> {
        let service: Box<dyn ContentService> = match config.kind {
            CmsKind::Strapi => {
                let base_url = require(config.base_url.as_deref(), "Strapi", "CMS_URL")?;
                let api_token = require(config.api_token.as_deref(), "Strapi", "CMS_API_TOKEN")?;
                Box::new(StrapiService::new(base_url, api_token))
            }
            CmsKind::Contentful => {
                let base_url = require(config.base_url.as_deref(), "Contentful", "CMS_URL")?;
                let space_id = require(
                    config.space_id.as_deref(),
                    "Contentful",
                    "CONTENTFUL_SPACE_ID",
                )?;
                let api_token =
                    require(config.api_token.as_deref(), "Contentful", "CMS_API_TOKEN")?;
                Box::new(ContentfulService::new(base_url, space_id, api_token))
            }
            CmsKind::Storyblok => {
                let base_url = require(config.base_url.as_deref(), "Storyblok", "CMS_URL")?;
                let api_token =
                    require(config.api_token.as_deref(), "Storyblok", "CMS_API_TOKEN")?;
                Box::new(StoryblokService::new(base_url, api_token, config.version))
            }
            CmsKind::Sanity => {
                let base_url = require(config.base_url.as_deref(), "Sanity", "CMS_URL")?;
                let project_id =
                    require(config.space_id.as_deref(), "Sanity", "SANITY_PROJECT_ID")?;
                Box::new(SanityService::new(
                    base_url,
                    project_id,
                    config.dataset_or_default(),
                ))
            }
            CmsKind::Fixture => {
                tracing::info!("Using fixture CMS - serving in-memory demo content");
                Box::new(FixtureService::new())
            }
        };

        Ok(Self {
            service: Some(service),
        })
    }

    /// Factory without a backing adapter; every fetch returns `None` with
    /// a warning. Exists so callers can degrade instead of panicking when
    /// initialization was skipped.
    pub fn unconfigured() -> Self {
        Self { service: None }
    }

    /// Wraps an already-built adapter; the test/dev injection seam.
    pub fn with_service(service: Box<dyn ContentService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    pub fn service(&self) -> Option<&dyn ContentService> {
        self.service.as_deref()
    }

    pub async fn page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        match &self.service {
            Some(service) => service.fetch_page_by_slug(slug, locale).await,
            None => {
                tracing::warn!("No CMS service configured");
                None
            }
        }
    }

    pub async fn home_page(&self, locale: &str) -> Option<Page> {
        match &self.service {
            Some(service) => service.fetch_home_page_data(locale).await,
            None => {
                tracing::warn!("No CMS service configured");
                None
            }
        }
    }

    pub async fn general_data(&self, locale: &str) -> Option<GeneralData> {
        match &self.service {
            Some(service) => service.fetch_general_data(locale).await,
            None => {
                tracing::warn!("No CMS service configured");
                None
            }
        }
    }
}

fn require<'a>(value: Option<&'a str>, provider: &str, field: &str) -> Result<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(CmsError::config(format!(
            "{} CMS requires the {} environment variable",
            provider, field
        ))),
    }
}
