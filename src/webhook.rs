//! Revalidation webhook contract.
//!
//! The HTTP endpoint itself lives in whatever server embeds this crate;
//! the payload and response shapes here are the compatibility surface CMS
//! webhooks are configured against, so they must not drift.

use crate::utils::error::{CmsError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Paths purged when a webhook asks for a full revalidation.
pub const REVALIDATE_ALL_PATHS: [&str; 5] = ["/", "/en", "/nl", "/en/", "/nl/"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevalidateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevalidateResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Validates the shared secret and resolves which paths to purge.
///
/// A wrong secret is the only hard error here; a request without paths is
/// answered with a failure envelope so the sending CMS sees a 200 and does
/// not retry forever.
pub fn handle_revalidate(
    request: &RevalidateRequest,
    expected_secret: Option<&str>,
) -> Result<RevalidateResponse> {
    if let Some(expected) = expected_secret {
        if request.secret.as_deref() != Some(expected) {
            return Err(CmsError::Unauthorized {
                message: "Invalid webhook secret".to_string(),
            });
        }
    }

    let paths: Vec<String> = if request.kind.as_deref() == Some("all") {
        REVALIDATE_ALL_PATHS.iter().map(|p| p.to_string()).collect()
    } else if !request.paths.is_empty() {
        request.paths.clone()
    } else {
        return Ok(RevalidateResponse {
            success: false,
            message: "No paths provided for revalidation".to_string(),
            paths: None,
            timestamp: None,
        });
    };

    tracing::info!("Cache purged for {} path(s): {:?}", paths.len(), paths);

    Ok(RevalidateResponse {
        success: true,
        message: format!("Revalidated {} path(s)", paths.len()),
        paths: Some(paths),
        timestamp: Some(Utc::now().to_rfc3339()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_field_round_trips_on_the_wire() {
        let request: RevalidateRequest =
            serde_json::from_str(r#"{ "type": "all", "secret": "s" }"#).unwrap();
        assert_eq!(request.kind.as_deref(), Some("all"));
        assert!(request.paths.is_empty());
    }

    #[test]
    fn response_omits_absent_fields() {
        let response = RevalidateResponse {
            success: false,
            message: "No paths provided for revalidation".to_string(),
            paths: None,
            timestamp: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("paths").is_none());
        assert!(json.get("timestamp").is_none());
    }
}
