//! Sanity adapter (GROQ over HTTP).
//!
//! Sanity has no dedicated page endpoint; everything is a GROQ query
//! against the dataset. Assets are referenced indirectly
//! (`image-{id}-{dims}-{ext}`) and resolve to the Sanity CDN.

use crate::domain::model::{
    AccordionContent, AccordionItem, Address, Button, FlexContent, FooterData, GeneralData,
    GeneralSeo, HeaderData, Heading, Hero, ImageAttributes, ImageFormats, ImageTextContent, Link,
    LinkTarget, Menu, MenuItem, Page, Paragraph, Phone, Social, TextContent, Thumbnail,
};
use crate::domain::ports::ContentService;
use crate::providers::base::{file_ext, FetchClient};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

const API_VERSION: &str = "v2023-05-03";

pub struct SanityService {
    fetch: FetchClient,
    project_id: String,
    dataset: String,
}

#[derive(Debug, Deserialize)]
struct SanityResponse<T> {
    result: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct SanityPage {
    title: String,
    #[serde(default)]
    hero: Option<SanityHero>,
    #[serde(default)]
    content: Option<Vec<SanityBlock>>,
    #[serde(default)]
    seo: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanityHero {
    title: Option<String>,
    subtitle: Option<String>,
    description: Option<String>,
    image: Option<SanityImage>,
    cta: Option<Vec<SanityCta>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SanityCta {
    label: Option<String>,
    url: Option<String>,
    open_in_new_tab: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SanityBlock {
    #[serde(rename = "_type")]
    kind: Option<String>,
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_key")]
    key: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    background_color: Option<String>,
    columns: Option<Value>,
    image: Option<SanityImage>,
    image_position: Option<String>,
    cta: Option<Vec<SanityCta>>,
    items: Option<Vec<SanityAccordionItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanityAccordionItem {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanityImage {
    alt: Option<String>,
    caption: Option<String>,
    url: Option<String>,
    asset: Option<SanityAssetRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanityAssetRef {
    #[serde(rename = "_id", alias = "_ref")]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SanitySettings {
    navigation: Option<Vec<SanityNavItem>>,
    footer_columns: Option<Vec<SanityColumn>>,
    footer_links: Option<Vec<SanityNavItem>>,
    socials: Option<Vec<SanitySocial>>,
    addresses: Option<Vec<SanityAddress>>,
    seo: Option<GeneralSeo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SanityNavItem {
    label: Option<String>,
    url: Option<String>,
    open_in_new_tab: Option<bool>,
    sub_items: Option<Vec<SanityNavItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanityColumn {
    title: Option<String>,
    links: Option<Vec<SanityNavItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SanitySocial {
    platform: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SanityAddress {
    title: Option<String>,
    street: Option<String>,
    house_number: Option<u32>,
    postal_code: Option<String>,
    city: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl SanityService {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        dataset: impl Into<String>,
    ) -> Self {
        Self {
            fetch: FetchClient::new(base_url),
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    fn query_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!(
            "{}/{}/data/query/{}?query={}",
            self.fetch.base_url(),
            API_VERSION,
            self.dataset,
            encoded
        )
    }

    async fn fetch_first_page(&self, query: &str) -> Option<Page> {
        let url = self.query_url(query);
        let response: SanityResponse<SanityPage> = self.fetch.get_json(&url).await?;
        let page = response.result?.into_iter().next()?;
        Some(self.transform_page(page))
    }

    fn transform_page(&self, raw: SanityPage) -> Page {
        let hero = match raw.hero {
            Some(hero) => self.transform_hero(hero, &raw.title),
            None => Hero::with_title(raw.title.clone()),
        };

        let flex_content = raw.content.map(|blocks| {
            blocks
                .into_iter()
                .filter_map(|block| self.transform_block(block))
                .collect()
        });

        Page {
            title: raw.title,
            hero,
            pre_flex_content: None,
            flex_content,
            post_flex_content: None,
            seo: raw.seo,
        }
    }

    fn transform_hero(&self, raw: SanityHero, page_title: &str) -> Hero {
        Hero {
            title: raw.title.unwrap_or_else(|| page_title.to_string()),
            subtitle: raw.subtitle,
            text: raw.description.unwrap_or_default(),
            image: raw.image.map(|image| self.transform_image(image)),
            buttons: raw.cta.map(transform_ctas),
        }
    }

    fn transform_block(&self, block: SanityBlock) -> Option<FlexContent> {
        let kind = block.kind.clone().unwrap_or_default();
        let id = block.id.clone().or(block.key.clone()).unwrap_or_default();

        match kind.as_str() {
            "textBlock" => Some(FlexContent::Text(TextContent {
                // Anything but an explicit white background counts
                has_background: block.background_color.as_deref() != Some("white"),
                is_column_view: is_two_columns(block.columns.as_ref()),
                paragraph: Paragraph {
                    text: block.text.unwrap_or_default(),
                    heading: Heading {
                        id: id.clone(),
                        title: block.title.unwrap_or_default(),
                        subtitle: block.subtitle.unwrap_or_default(),
                    },
                    buttons: block.cta.map(transform_ctas).unwrap_or_default(),
                },
                id,
            })),
            "imageTextBlock" => Some(FlexContent::ImageText(ImageTextContent {
                text_left: block.image_position.as_deref() != Some("left"),
                image: block.image.map(|image| self.transform_image(image)),
                paragraph: Paragraph {
                    text: block.text.unwrap_or_default(),
                    heading: Heading {
                        id: id.clone(),
                        title: block.title.unwrap_or_default(),
                        subtitle: block.subtitle.unwrap_or_default(),
                    },
                    buttons: block.cta.map(transform_ctas).unwrap_or_default(),
                },
                id,
            })),
            "accordionBlock" => Some(FlexContent::Accordion(AccordionContent {
                heading: Heading {
                    id: id.clone(),
                    title: block.title.unwrap_or_default(),
                    subtitle: block.subtitle.unwrap_or_default(),
                },
                items: block
                    .items
                    .unwrap_or_default()
                    .into_iter()
                    .map(|item| AccordionItem {
                        title: item.title.unwrap_or_default(),
                        text: item.content.unwrap_or_default(),
                    })
                    .collect(),
                id,
            })),
            other => {
                tracing::warn!("Unknown content type: {}", other);
                None
            }
        }
    }

    fn transform_image(&self, raw: SanityImage) -> ImageAttributes {
        let asset_id = raw.asset.and_then(|asset| asset.id);
        let url = match &asset_id {
            Some(id) => self.cdn_image_url(id),
            None => raw.url.unwrap_or_default(),
        };
        let hash = asset_id.unwrap_or_default();
        let now = Utc::now().to_rfc3339();
        let name = raw.alt.clone().unwrap_or_else(|| "Image".to_string());

        ImageAttributes {
            name: name.clone(),
            alternative_text: raw.alt,
            caption: raw.caption.or_else(|| Some(String::new())),
            width: 1200,
            height: 800,
            formats: ImageFormats {
                thumbnail: Thumbnail {
                    ext: file_ext(&url).unwrap_or("jpg").to_string(),
                    url: if url.is_empty() {
                        String::new()
                    } else {
                        format!("{}?w=150&h=100&fit=crop", url)
                    },
                    hash: hash.clone(),
                    mime: "image/jpeg".to_string(),
                    name,
                    path: None,
                    size: 0.0,
                    width: 150,
                    height: 100,
                    size_in_bytes: 0,
                },
            },
            hash,
            ext: file_ext(&url).unwrap_or("jpg").to_string(),
            mime: "image/jpeg".to_string(),
            size: 0.0,
            url,
            preview_url: None,
            provider: "sanity".to_string(),
            created_at: now.clone(),
            updated_at: now,
            placeholder: String::new(),
        }
    }

    /// Resolves an asset reference like `image-abc123-1200x800-jpg` to
    /// `https://cdn.sanity.io/images/{project}/{dataset}/abc123-1200x800.jpg`.
    fn cdn_image_url(&self, asset_id: &str) -> String {
        let reference = asset_id.strip_prefix("image-").unwrap_or(asset_id);
        let file = match reference.rsplit_once('-') {
            Some((base, ext)) => format!("{}.{}", base, ext),
            None => reference.to_string(),
        };
        format!(
            "https://cdn.sanity.io/images/{}/{}/{}",
            self.project_id, self.dataset, file
        )
    }

    fn transform_general(&self, settings: SanitySettings) -> GeneralData {
        GeneralData {
            header: HeaderData {
                items: settings
                    .navigation
                    .unwrap_or_default()
                    .into_iter()
                    .map(transform_nav_item)
                    .collect(),
                topbar: Vec::new(),
            },
            footer: FooterData {
                items: settings
                    .footer_columns
                    .unwrap_or_default()
                    .into_iter()
                    .map(|column| Menu {
                        title: column.title,
                        items: column
                            .links
                            .unwrap_or_default()
                            .into_iter()
                            .map(transform_nav_item)
                            .collect(),
                    })
                    .collect(),
                bottombar: settings
                    .footer_links
                    .unwrap_or_default()
                    .into_iter()
                    .map(transform_nav_item)
                    .collect(),
                socials: settings
                    .socials
                    .unwrap_or_default()
                    .into_iter()
                    .map(|social| Social {
                        channel: social.platform.unwrap_or_default(),
                        url: social.url.unwrap_or_default(),
                    })
                    .collect(),
                addresses: settings
                    .addresses
                    .unwrap_or_default()
                    .into_iter()
                    .map(|address| Address {
                        title: address.title.unwrap_or_default(),
                        street: address.street,
                        house_number: address.house_number,
                        house_number_addition: None,
                        postal_code: address.postal_code,
                        city: address.city,
                        email: address.email,
                        phone: address.phone.as_deref().map(Phone::from_display),
                    })
                    .collect(),
            },
            seo: settings.seo,
        }
    }
}

#[async_trait]
impl ContentService for SanityService {
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        let query = format!(
            r#"*[_type == "page" && slug.current == "{}" && language == "{}"] | order(_updatedAt desc)"#,
            slug, locale
        );
        self.fetch_first_page(&query).await
    }

    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page> {
        // Sanity's home convention is a boolean flag on the page document.
        let query = format!(
            r#"*[_type == "page" && isHomepage == true && language == "{}"]"#,
            locale
        );
        self.fetch_first_page(&query).await
    }

    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData> {
        let query = format!(r#"*[_type == "siteSettings" && language == "{}"]"#, locale);
        let url = self.query_url(&query);
        let response: SanityResponse<SanitySettings> = self.fetch.get_json(&url).await?;
        let settings = response.result?.into_iter().next()?;
        Some(self.transform_general(settings))
    }
}

fn is_two_columns(columns: Option<&Value>) -> bool {
    match columns {
        Some(Value::Number(n)) => n.as_i64() == Some(2),
        Some(Value::String(s)) => s == "2",
        _ => false,
    }
}

fn transform_ctas(ctas: Vec<SanityCta>) -> Vec<Button> {
    ctas.into_iter()
        .map(|cta| Button {
            label: cta.label.unwrap_or_default(),
            link: Link {
                href: match cta.url {
                    Some(url) if !url.is_empty() => url,
                    _ => "/".to_string(),
                },
                target: if cta.open_in_new_tab.unwrap_or(false) {
                    LinkTarget::Blank
                } else {
                    LinkTarget::Current
                },
            },
        })
        .collect()
}

fn transform_nav_item(item: SanityNavItem) -> MenuItem {
    MenuItem {
        label: item.label.unwrap_or_default(),
        link: Link {
            href: match item.url {
                Some(url) if !url.is_empty() => url,
                _ => "/".to_string(),
            },
            target: if item.open_in_new_tab.unwrap_or(false) {
                LinkTarget::Blank
            } else {
                LinkTarget::Current
            },
        },
        sub_items: item
            .sub_items
            .map(|subs| subs.into_iter().map(transform_nav_item).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdn_url_from_asset_reference() {
        let service = SanityService::new("https://api.sanity.io", "abc123", "production");
        assert_eq!(
            service.cdn_image_url("image-deadbeef-1200x800-jpg"),
            "https://cdn.sanity.io/images/abc123/production/deadbeef-1200x800.jpg"
        );
    }
}
