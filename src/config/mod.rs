use crate::utils::error::{CmsError, Result};
use crate::utils::validation::{validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Which CMS product backs the gateway. Selected once at startup; callers
/// never see the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CmsKind {
    Strapi,
    Contentful,
    Storyblok,
    Sanity,
    /// In-memory fixture data, no upstream. The development default.
    #[default]
    Fixture,
}

impl FromStr for CmsKind {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strapi" => Ok(Self::Strapi),
            "contentful" => Ok(Self::Contentful),
            "storyblok" => Ok(Self::Storyblok),
            "sanity" => Ok(Self::Sanity),
            // "mock" and "dummy" are legacy aliases kept for existing deploys
            "fixture" | "mock" | "dummy" => Ok(Self::Fixture),
            other => Err(CmsError::config(format!("Unknown CMS type: {}", other))),
        }
    }
}

impl fmt::Display for CmsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Strapi => "strapi",
            Self::Contentful => "contentful",
            Self::Storyblok => "storyblok",
            Self::Sanity => "sanity",
            Self::Fixture => "fixture",
        };
        f.write_str(name)
    }
}

/// Storyblok content version to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    Draft,
    #[default]
    Published,
}

impl FromStr for PublishState {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(CmsError::config(format!(
                "Unknown publish state: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
        }
    }
}

/// Environment-sourced gateway configuration. Which fields are required
/// depends on the chosen kind; the factory enforces that at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmsConfig {
    pub kind: CmsKind,
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    /// Contentful space id or Sanity project id.
    pub space_id: Option<String>,
    /// Sanity dataset; defaults to `production` when unset.
    pub dataset: Option<String>,
    pub version: PublishState,
    pub webhook_secret: Option<String>,
}

impl CmsConfig {
    /// Reads configuration from the process environment. Unset `CMS_TYPE`
    /// falls back to the fixture provider so local development needs no
    /// environment at all.
    pub fn from_env() -> Result<Self> {
        let kind = match env::var("CMS_TYPE") {
            Ok(value) => value.parse()?,
            Err(_) => CmsKind::default(),
        };

        let version = match env::var("STORYBLOK_VERSION") {
            Ok(value) => value.parse()?,
            Err(_) => PublishState::default(),
        };

        let space_id = env::var("CONTENTFUL_SPACE_ID")
            .or_else(|_| env::var("STORYBLOK_SPACE_ID"))
            .or_else(|_| env::var("SANITY_PROJECT_ID"))
            .ok();

        Ok(Self {
            kind,
            base_url: env::var("CMS_URL").ok(),
            api_token: env::var("CMS_API_TOKEN").ok(),
            space_id,
            dataset: env::var("SANITY_DATASET").ok(),
            version,
            webhook_secret: env::var("CMS_WEBHOOK_SECRET").ok(),
        })
    }

    pub fn dataset_or_default(&self) -> &str {
        self.dataset.as_deref().unwrap_or("production")
    }
}

impl Validate for CmsConfig {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            validate_url("base_url", base_url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("strapi".parse::<CmsKind>().unwrap(), CmsKind::Strapi);
        assert_eq!("Storyblok".parse::<CmsKind>().unwrap(), CmsKind::Storyblok);
        assert_eq!("mock".parse::<CmsKind>().unwrap(), CmsKind::Fixture);
        assert_eq!("dummy".parse::<CmsKind>().unwrap(), CmsKind::Fixture);
        assert!("wordpress".parse::<CmsKind>().is_err());
    }

    #[test]
    fn publish_state_defaults_to_published() {
        assert_eq!(PublishState::default(), PublishState::Published);
        assert_eq!("draft".parse::<PublishState>().unwrap(), PublishState::Draft);
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let config = CmsConfig {
            base_url: Some("not a url".to_string()),
            ..CmsConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CmsConfig {
            base_url: Some("https://api.example.com".to_string()),
            ..CmsConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
