//! Storyblok adapter (v2 content delivery API).
//!
//! Storyblok is the loosest of the upstream schemas: links arrive as plain
//! strings or typed objects disambiguated by `linktype`/`cached_url`, CTAs
//! may be a single blok or a sequence, and assets come as bare CDN paths.
//! The precedence rules here mirror the upstream behavior exactly and are
//! deliberately not shared with other adapters.

use crate::config::PublishState;
use crate::domain::model::{
    AccordionContent, AccordionItem, Address, Button, FlexContent, FooterData, GeneralData,
    GeneralSeo, HeaderData, Heading, Hero, ImageAttributes, ImageFormats, ImageTextContent, Link,
    LinkTarget, Menu, MenuItem, Page, Paragraph, Phone, Social, TextContent, Thumbnail,
};
use crate::domain::ports::ContentService;
use crate::providers::base::{file_ext, FetchClient, OneOrMany};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

const STORYBLOK_CDN: &str = "https://a.storyblok.com";

pub struct StoryblokService {
    fetch: FetchClient,
    access_token: String,
    version: PublishState,
}

#[derive(Debug, Deserialize)]
struct StoryblokResponse<C> {
    story: Option<StoryblokStory<C>>,
    #[serde(default = "Vec::new")]
    stories: Vec<StoryblokStory<C>>,
}

#[derive(Debug, Deserialize)]
struct StoryblokStory<C> {
    name: String,
    content: Option<C>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokPageContent {
    hero: Option<StoryblokHero>,
    body: Option<Vec<StoryblokBlock>>,
    seo: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokHero {
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    description: Option<String>,
    image: Option<StoryblokImage>,
    cta: Option<OneOrMany<StoryblokCta>>,
}

/// All block kinds share one raw shape; which fields matter depends on the
/// `component` discriminant (`type` as a fallback).
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoryblokBlock {
    #[serde(rename = "_uid")]
    uid: Option<String>,
    id: Option<Value>,
    component: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    content: Option<String>,
    background_color: Option<String>,
    columns: Option<Value>,
    cta: Option<OneOrMany<StoryblokCta>>,
    image: Option<StoryblokImage>,
    image_position: Option<String>,
    items: Option<Vec<StoryblokAccordionItem>>,
    #[serde(rename = "accordion_items")]
    accordion_items: Option<Vec<StoryblokAccordionItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokAccordionItem {
    title: Option<String>,
    text: Option<String>,
    content: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokCta {
    label: Option<String>,
    title: Option<String>,
    link: Option<StoryblokLink>,
    url: Option<StoryblokLink>,
    target: Option<String>,
}

/// Storyblok link field: either a plain URL string or a typed reference.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryblokLink {
    Url(String),
    Reference(StoryblokLinkRef),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokLinkRef {
    linktype: Option<String>,
    cached_url: Option<String>,
    slug: Option<String>,
    url: Option<String>,
}

/// Asset field: a bare CDN path string or an asset object, occasionally
/// with the real asset nested one level down.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoryblokImage {
    Url(String),
    Asset(StoryblokAsset),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokAsset {
    id: Option<Value>,
    alt: Option<String>,
    title: Option<String>,
    filename: Option<String>,
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    created_at: Option<String>,
    updated_at: Option<String>,
    image: Option<Box<StoryblokAsset>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoryblokSettingsContent {
    navigation: Option<Vec<StoryblokMenuItem>>,
    header_menu: Option<Vec<StoryblokMenuItem>>,
    topbar: Option<Vec<StoryblokMenuItem>>,
    footer_columns: Option<Vec<StoryblokColumn>>,
    footer_menu: Option<Vec<StoryblokColumn>>,
    footer_links: Option<Vec<StoryblokMenuItem>>,
    bottombar: Option<Vec<StoryblokMenuItem>>,
    socials: Option<Vec<StoryblokSocial>>,
    addresses: Option<Vec<StoryblokAddress>>,
    seo: Option<GeneralSeo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoryblokMenuItem {
    label: Option<String>,
    title: Option<String>,
    link: Option<StoryblokLink>,
    url: Option<StoryblokLink>,
    target: Option<String>,
    sub_items: Option<Vec<StoryblokMenuItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokColumn {
    title: Option<String>,
    label: Option<String>,
    items: Option<Vec<StoryblokMenuItem>>,
    links: Option<Vec<StoryblokMenuItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StoryblokSocial {
    platform: Option<String>,
    channel: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoryblokAddress {
    title: Option<String>,
    street: Option<String>,
    house_number: Option<u32>,
    house_number_addition: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl StoryblokService {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        version: PublishState,
    ) -> Self {
        Self {
            fetch: FetchClient::new(base_url),
            access_token: access_token.into(),
            version,
        }
    }

    fn story_url(&self, path: &str) -> String {
        format!(
            "{}/v2/stories/{}?token={}&version={}",
            self.fetch.base_url(),
            path,
            self.access_token,
            self.version
        )
    }

    fn transform_page(&self, story: StoryblokStory<StoryblokPageContent>) -> Page {
        let content = story.content.unwrap_or_default();

        let hero = match content.hero {
            Some(hero) => self.transform_hero(hero, &story.name),
            None => Hero::with_title(story.name.clone()),
        };

        let flex_content = content.body.map(|blocks| {
            blocks
                .into_iter()
                .filter_map(|block| self.transform_block(block))
                .collect()
        });

        Page {
            title: story.name,
            hero,
            pre_flex_content: None,
            flex_content,
            post_flex_content: None,
            seo: content.seo,
        }
    }

    fn transform_hero(&self, raw: StoryblokHero, story_name: &str) -> Hero {
        Hero {
            title: raw
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| story_name.to_string()),
            subtitle: raw.subtitle,
            text: raw.text.or(raw.description).unwrap_or_default(),
            image: raw.image.map(|image| self.transform_image(image)),
            buttons: raw.cta.map(transform_ctas),
        }
    }

    fn transform_block(&self, block: StoryblokBlock) -> Option<FlexContent> {
        let component = block
            .component
            .clone()
            .or_else(|| block.kind.clone())
            .unwrap_or_default();
        let id = block_id(&block);

        match component.as_str() {
            "text" | "textBlock" => Some(FlexContent::Text(TextContent {
                has_background: has_background(block.background_color.as_deref()),
                is_column_view: is_two_columns(block.columns.as_ref()),
                paragraph: Paragraph {
                    text: block.text.or(block.content).unwrap_or_default(),
                    heading: Heading {
                        id: id.clone(),
                        title: block.title.unwrap_or_default(),
                        subtitle: block.subtitle.unwrap_or_default(),
                    },
                    buttons: block.cta.map(transform_ctas).unwrap_or_default(),
                },
                id,
            })),
            "imageText" | "image_text" | "imageTextBlock" => {
                Some(FlexContent::ImageText(ImageTextContent {
                    text_left: block.image_position.as_deref() != Some("right"),
                    image: block.image.map(|image| self.transform_image(image)),
                    paragraph: Paragraph {
                        text: block.text.or(block.content).unwrap_or_default(),
                        heading: Heading {
                            id: id.clone(),
                            title: block.title.unwrap_or_default(),
                            subtitle: block.subtitle.unwrap_or_default(),
                        },
                        buttons: block.cta.map(transform_ctas).unwrap_or_default(),
                    },
                    id,
                }))
            }
            "accordion" | "accordionBlock" => Some(FlexContent::Accordion(AccordionContent {
                heading: Heading {
                    id: id.clone(),
                    title: block.title.unwrap_or_default(),
                    subtitle: block.subtitle.unwrap_or_default(),
                },
                items: block
                    .items
                    .or(block.accordion_items)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|item| AccordionItem {
                        title: item.title.unwrap_or_default(),
                        text: item
                            .text
                            .or(item.content)
                            .or(item.description)
                            .unwrap_or_default(),
                    })
                    .collect(),
                id,
            })),
            other => {
                tracing::warn!("Unknown block type: {}", other);
                None
            }
        }
    }

    /// Storyblok assets are CDN paths; anything without a scheme gets the
    /// `a.storyblok.com` prefix.
    fn transform_image(&self, raw: StoryblokImage) -> ImageAttributes {
        let now = Utc::now().to_rfc3339();

        let (url, asset) = match raw {
            StoryblokImage::Url(url) => (url, StoryblokAsset::default()),
            StoryblokImage::Asset(asset) => {
                let url = asset
                    .filename
                    .clone()
                    .or_else(|| {
                        asset
                            .image
                            .as_ref()
                            .and_then(|nested| nested.filename.clone())
                    })
                    .or_else(|| asset.url.clone())
                    .unwrap_or_default();
                (url, asset)
            }
        };

        let url = if !url.is_empty() && !url.starts_with("http") {
            let path = if url.starts_with('/') {
                url
            } else {
                format!("/{}", url)
            };
            format!("{}{}", STORYBLOK_CDN, path)
        } else {
            url
        };

        let hash = match &asset.id {
            Some(Value::Number(id)) => id.to_string(),
            Some(Value::String(id)) => id.clone(),
            _ => String::new(),
        };
        let name = asset
            .alt
            .clone()
            .or_else(|| asset.title.clone())
            .unwrap_or_else(|| "Image".to_string());

        ImageAttributes {
            name: name.clone(),
            alternative_text: asset.alt.or(asset.title.clone()),
            caption: asset.title,
            width: asset.width.unwrap_or(1200),
            height: asset.height.unwrap_or(800),
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
            provider: "storyblok".to_string(),
            created_at: asset.created_at.unwrap_or_else(|| now.clone()),
            updated_at: asset.updated_at.unwrap_or(now),
            placeholder: String::new(),
        }
    }

    fn transform_general(&self, story: StoryblokStory<StoryblokSettingsContent>) -> GeneralData {
        let content = story.content.unwrap_or_default();

        GeneralData {
            header: HeaderData {
                items: content
                    .navigation
                    .or(content.header_menu)
                    .unwrap_or_default()
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
                topbar: content
                    .topbar
                    .unwrap_or_default()
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
            },
            footer: FooterData {
                items: content
                    .footer_columns
                    .or(content.footer_menu)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|column| Menu {
                        title: column.title.or(column.label),
                        items: column
                            .items
                            .or(column.links)
                            .unwrap_or_default()
                            .into_iter()
                            .map(transform_menu_item)
                            .collect(),
                    })
                    .collect(),
                bottombar: content
                    .footer_links
                    .or(content.bottombar)
                    .unwrap_or_default()
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
                socials: content
                    .socials
                    .unwrap_or_default()
                    .into_iter()
                    .map(|social| Social {
                        channel: social.platform.or(social.channel).unwrap_or_default(),
                        url: social.url.unwrap_or_default(),
                    })
                    .collect(),
                addresses: content
                    .addresses
                    .unwrap_or_default()
                    .into_iter()
                    .map(|address| Address {
                        title: address.title.unwrap_or_default(),
                        street: address.street,
                        house_number: address.house_number,
                        house_number_addition: address.house_number_addition,
                        postal_code: address.postal_code,
                        city: address.city,
                        email: address.email,
                        phone: address.phone.as_deref().map(Phone::from_display),
                    })
                    .collect(),
            },
            seo: content.seo,
        }
    }
}

#[async_trait]
impl ContentService for StoryblokService {
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        let url = self.story_url(&format!("{}/{}", locale, slug));
        let response: StoryblokResponse<StoryblokPageContent> = self.fetch.get_json(&url).await?;
        Some(self.transform_page(response.story?))
    }

    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page> {
        // Storyblok flags its home story with `is_startpage`.
        let url = format!(
            "{}&filter_query[is_startpage][eq]=true",
            self.story_url(locale)
        );
        let response: StoryblokResponse<StoryblokPageContent> = self.fetch.get_json(&url).await?;
        let story = response.stories.into_iter().next()?;
        Some(self.transform_page(story))
    }

    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData> {
        // Site chrome lives in a dedicated `settings` story per locale.
        let url = self.story_url(&format!("{}/settings", locale));
        let response: StoryblokResponse<StoryblokSettingsContent> =
            self.fetch.get_json(&url).await?;
        Some(self.transform_general(response.story?))
    }
}

fn block_id(block: &StoryblokBlock) -> String {
    if let Some(uid) = &block.uid {
        return uid.clone();
    }
    match &block.id {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => String::new(),
    }
}

fn has_background(background_color: Option<&str>) -> bool {
    !matches!(background_color, None | Some("transparent") | Some("white"))
}

fn is_two_columns(columns: Option<&Value>) -> bool {
    match columns {
        Some(Value::String(s)) => s == "2",
        Some(Value::Number(n)) => n.as_i64() == Some(2),
        _ => false,
    }
}

/// Resolves the upstream link precedence: story links (by `linktype` or a
/// `cached_url` hint) before url links before bare slug/url fallbacks.
fn parse_link(link: Option<StoryblokLink>) -> String {
    let reference = match link {
        None => return "/".to_string(),
        Some(StoryblokLink::Url(url)) => {
            if url.is_empty() {
                return "/".to_string();
            }
            return if url.starts_with('/') || url.starts_with("http") {
                url
            } else {
                format!("/{}", url)
            };
        }
        Some(StoryblokLink::Reference(reference)) => reference,
    };

    if reference.linktype.as_deref() == Some("story") || reference.cached_url.is_some() {
        let slug = reference
            .slug
            .or(reference.cached_url)
            .unwrap_or_default();
        return if slug.starts_with('/') {
            slug
        } else {
            format!("/{}", slug)
        };
    }

    if reference.linktype.as_deref() == Some("url") || reference.url.is_some() {
        return reference
            .url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| "/".to_string());
    }

    if let Some(slug) = reference.slug {
        return format!("/{}", slug);
    }

    "/".to_string()
}

fn link_target(target: Option<&str>) -> LinkTarget {
    match target {
        Some("_blank") => LinkTarget::Blank,
        _ => LinkTarget::Current,
    }
}

/// CTAs arrive as a single blok or a sequence; both normalize to an
/// ordered button list.
fn transform_ctas(ctas: OneOrMany<StoryblokCta>) -> Vec<Button> {
    ctas.into_vec()
        .into_iter()
        .map(|cta| Button {
            label: cta.label.or(cta.title).unwrap_or_default(),
            link: Link {
                href: parse_link(cta.link.or(cta.url)),
                target: link_target(cta.target.as_deref()),
            },
        })
        .collect()
}

fn transform_menu_item(item: StoryblokMenuItem) -> MenuItem {
    MenuItem {
        label: item.label.or(item.title).unwrap_or_default(),
        link: Link {
            href: parse_link(item.link.or(item.url)),
            target: link_target(item.target.as_deref()),
        },
        sub_items: item
            .sub_items
            .map(|subs| subs.into_iter().map(transform_menu_item).collect()),
    }
}
