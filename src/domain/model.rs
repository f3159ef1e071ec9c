//! Normalized content model shared by every CMS provider.
//!
//! All shapes are plain values constructed once per request and read-only
//! afterward. The serialized form is camelCase and is the contract consumed
//! by the rendering layer, so field renames here are wire-breaking.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub id: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccordionItem {
    pub title: String,
    pub text: String,
}

/// Where a link opens. Serialized as the HTML `target` attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_self")]
    Current,
    #[serde(rename = "_blank")]
    Blank,
}

/// A resolved link. `href` is never empty; unresolvable upstream links
/// collapse to `/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub target: LinkTarget,
    pub href: String,
}

impl Default for Link {
    fn default() -> Self {
        Self {
            target: LinkTarget::Current,
            href: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub link: Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub heading: Heading,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub ext: String,
    pub url: String,
    pub hash: String,
    pub mime: String,
    pub name: String,
    pub path: Option<String>,
    pub size: f64,
    pub width: u32,
    pub height: u32,
    pub size_in_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFormats {
    pub thumbnail: Thumbnail,
}

/// Normalized image descriptor. `url` is always an absolute, directly
/// fetchable URL regardless of how the upstream represented the asset.
/// `preview_url` and `path` are legitimately absent for providers without
/// local derivatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttributes {
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
    pub formats: ImageFormats,
    pub hash: String,
    pub ext: String,
    pub mime: String,
    pub size: f64,
    pub url: String,
    pub preview_url: Option<String>,
    pub provider: String,
    pub created_at: String,
    pub updated_at: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

impl Hero {
    /// Minimal hero carrying just a title. Pages without an upstream hero
    /// block still get one downstream.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            text: String::new(),
            image: None,
            buttons: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub id: String,
    pub has_background: bool,
    pub is_column_view: bool,
    pub paragraph: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTextContent {
    pub id: String,
    pub text_left: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttributes>,
    pub paragraph: Paragraph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccordionContent {
    pub id: String,
    pub heading: Heading,
    pub items: Vec<AccordionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    pub id: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttributes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_narrow: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    pub id: String,
    pub cta_blocks: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteContent {
    pub id: String,
    pub quote: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    pub url: String,
    pub provider: String,
    pub provider_uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    pub id: String,
    pub video: VideoSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<ImageAttributes>,
    pub caption: String,
    pub is_narrow: bool,
}

/// One block of a page body. The discriminant travels on the wire as
/// `__component` and is a closed set; adapters drop anything upstream
/// that does not map onto one of these kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__component")]
pub enum FlexContent {
    #[serde(rename = "content.text")]
    Text(TextContent),
    #[serde(rename = "content.image-text")]
    ImageText(ImageTextContent),
    #[serde(rename = "content.accordion")]
    Accordion(AccordionContent),
    #[serde(rename = "content.image")]
    Image(ImageContent),
    #[serde(rename = "content.cta")]
    Cta(CtaContent),
    #[serde(rename = "content.quote")]
    Quote(QuoteContent),
    #[serde(rename = "content.video")]
    Video(VideoContent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub title: String,
    pub hero: Hero,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_flex_content: Option<Vec<FlexContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_content: Option<Vec<FlexContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_flex_content: Option<Vec<FlexContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub label: String,
    pub link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<MenuItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub label: String,
    pub href: String,
}

impl Phone {
    /// Builds a `tel:` link from a display number, stripping whitespace
    /// from the dialable part only.
    pub fn from_display(number: &str) -> Self {
        let dialable: String = number.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            label: number.to_string(),
            href: format!("tel:{}", dialable),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number_addition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Social {
    pub channel: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeaderData {
    #[serde(default)]
    pub items: Vec<MenuItem>,
    #[serde(default)]
    pub topbar: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FooterData {
    #[serde(default)]
    pub items: Vec<Menu>,
    #[serde(default)]
    pub bottombar: Vec<MenuItem>,
    #[serde(default)]
    pub socials: Vec<Social>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSeo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_tag_manager_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affix_meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_keywords: Option<String>,
}

/// Site-wide chrome: header navigation plus footer columns, socials and
/// contact addresses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneralData {
    pub header: HeaderData,
    pub footer: FooterData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<GeneralSeo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flex_content_serializes_with_component_tag() {
        let block = FlexContent::Accordion(AccordionContent {
            id: "3".to_string(),
            heading: Heading {
                id: "3".to_string(),
                title: "FAQ".to_string(),
                subtitle: String::new(),
            },
            items: vec![AccordionItem {
                title: "Q".to_string(),
                text: "A".to_string(),
            }],
        });

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["__component"], "content.accordion");
        assert_eq!(json["items"][0]["title"], "Q");
    }

    #[test]
    fn flex_content_deserializes_by_tag() {
        let json = serde_json::json!({
            "__component": "content.text",
            "id": "1",
            "hasBackground": false,
            "isColumnView": true,
            "paragraph": {
                "text": "<p>hi</p>",
                "heading": { "id": "1", "title": "T", "subtitle": "" },
                "buttons": []
            }
        });

        let block: FlexContent = serde_json::from_value(json).unwrap();
        match block {
            FlexContent::Text(text) => assert!(text.is_column_view),
            other => panic!("expected text block, got {:?}", other),
        }
    }

    #[test]
    fn link_defaults_to_root_self() {
        let link = Link::default();
        assert_eq!(link.href, "/");
        assert_eq!(link.target, LinkTarget::Current);
        assert_eq!(serde_json::to_value(&link).unwrap()["target"], "_self");
    }

    #[test]
    fn phone_href_strips_whitespace() {
        let phone = Phone::from_display("+31 20 123 4567");
        assert_eq!(phone.label, "+31 20 123 4567");
        assert_eq!(phone.href, "tel:+31201234567");
    }
}
