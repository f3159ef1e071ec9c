//! Strapi adapter.
//!
//! Strapi's component tags are the normalized model's native tags, so block
//! mapping is mostly field-by-field. The one wrinkle is asset URLs: Strapi
//! returns upload paths relative to the instance, which must be resolved
//! against the base URL.

use crate::domain::model::{
    AccordionContent, AccordionItem, Address, Button, CtaContent, FlexContent, FooterData,
    GeneralData, GeneralSeo, HeaderData, Heading, Hero, ImageAttributes, ImageContent,
    ImageFormats, ImageTextContent, Link, LinkTarget, Menu, MenuItem, Page, Paragraph, Phone,
    QuoteContent, Social, TextContent, Thumbnail, VideoContent, VideoSource,
};
use crate::domain::ports::ContentService;
use crate::providers::base::{file_ext, FetchClient, OneOrMany};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub struct StrapiService {
    fetch: FetchClient,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct StrapiResponse<T> {
    data: Option<OneOrMany<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StrapiPage {
    title: String,
    hero: Option<StrapiHero>,
    #[serde(default)]
    flex_content: Option<Vec<StrapiBlock>>,
    #[serde(default)]
    seo: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiHero {
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    image: Option<StrapiImage>,
    buttons: Option<Vec<StrapiButton>>,
}

/// One upstream block: the component tag plus whatever fields that kind
/// carries. The tag is inspected first so an unknown kind can be warned
/// about by name before any field parsing happens.
#[derive(Debug, Deserialize)]
struct StrapiBlock {
    #[serde(rename = "__component")]
    component: String,
    #[serde(flatten)]
    body: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiTextBlock {
    has_background: Option<bool>,
    is_column_view: Option<bool>,
    paragraph: Option<StrapiParagraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiImageTextBlock {
    text_left: Option<bool>,
    image: Option<StrapiImage>,
    paragraph: Option<StrapiParagraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiAccordionBlock {
    heading: Option<StrapiHeading>,
    items: Vec<StrapiAccordionItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiImageBlock {
    caption: Option<String>,
    image: Option<StrapiImage>,
    is_narrow: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiCtaBlock {
    cta_blocks: Vec<StrapiParagraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiQuoteBlock {
    quote: Option<String>,
    author: Option<String>,
    image: Option<StrapiImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiVideoBlock {
    video: Option<StrapiVideoSource>,
    placeholder: Option<StrapiImage>,
    caption: Option<String>,
    is_narrow: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiVideoSource {
    url: Option<String>,
    provider: Option<String>,
    provider_uid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiParagraph {
    text: Option<String>,
    heading: Option<StrapiHeading>,
    buttons: Option<Vec<StrapiButton>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiHeading {
    id: Option<Value>,
    title: Option<String>,
    subtitle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiButton {
    label: Option<String>,
    link: Option<StrapiLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiLink {
    href: Option<String>,
    target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiImage {
    name: Option<String>,
    alternative_text: Option<String>,
    caption: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    formats: Option<StrapiFormats>,
    hash: Option<String>,
    ext: Option<String>,
    mime: Option<String>,
    size: Option<f64>,
    url: Option<String>,
    preview_url: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    placeholder: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiFormats {
    thumbnail: Option<StrapiThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiThumbnail {
    ext: Option<String>,
    url: Option<String>,
    hash: Option<String>,
    mime: Option<String>,
    name: Option<String>,
    path: Option<String>,
    size: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
    size_in_bytes: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiGeneral {
    header_items: Vec<StrapiMenuItem>,
    header_topbar: Vec<StrapiMenuItem>,
    footer_items: Vec<StrapiMenu>,
    footer_bottombar: Vec<StrapiMenuItem>,
    footer_socials: Vec<StrapiSocial>,
    footer_addresses: Vec<StrapiAddress>,
    seo: Option<GeneralSeo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiMenuItem {
    label: Option<String>,
    link: Option<StrapiLink>,
    sub_items: Option<Vec<StrapiMenuItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiMenu {
    title: Option<String>,
    items: Vec<StrapiMenuItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StrapiSocial {
    channel: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiAccordionItem {
    title: Option<String>,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StrapiAddress {
    title: Option<String>,
    street: Option<String>,
    house_number: Option<u32>,
    house_number_addition: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl StrapiService {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            fetch: FetchClient::new(base_url),
            api_token: api_token.into(),
        }
    }

    fn page_query(&self, slug: &str, locale: &str) -> String {
        format!(
            "{}/api/pages?filters[slug][$eq]={}&locale[]={}&populate=*",
            self.fetch.base_url(),
            slug,
            locale
        )
    }

    fn transform_page(&self, raw: StrapiPage) -> Page {
        let hero = match raw.hero {
            Some(hero) => self.transform_hero(hero, &raw.title),
            None => Hero::with_title(raw.title.clone()),
        };

        let flex_content = raw.flex_content.map(|blocks| {
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

    fn transform_hero(&self, raw: StrapiHero, page_title: &str) -> Hero {
        Hero {
            title: raw.title.unwrap_or_else(|| page_title.to_string()),
            subtitle: raw.subtitle,
            text: raw.text.unwrap_or_default(),
            image: raw.image.map(|image| self.transform_image(image)),
            buttons: raw.buttons.map(transform_buttons),
        }
    }

    fn transform_block(&self, block: StrapiBlock) -> Option<FlexContent> {
        let id = block_id(&block.body);
        let body = Value::Object(block.body);

        match block.component.as_str() {
            "content.text" => {
                let raw: StrapiTextBlock = parse_block(&block.component, body)?;
                Some(FlexContent::Text(TextContent {
                    has_background: raw.has_background.unwrap_or(false),
                    is_column_view: raw.is_column_view.unwrap_or(false),
                    paragraph: transform_paragraph(raw.paragraph, &id),
                    id,
                }))
            }
            "content.image-text" => {
                let raw: StrapiImageTextBlock = parse_block(&block.component, body)?;
                Some(FlexContent::ImageText(ImageTextContent {
                    text_left: raw.text_left.unwrap_or(true),
                    image: raw.image.map(|image| self.transform_image(image)),
                    paragraph: transform_paragraph(raw.paragraph, &id),
                    id,
                }))
            }
            "content.accordion" => {
                let raw: StrapiAccordionBlock = parse_block(&block.component, body)?;
                Some(FlexContent::Accordion(AccordionContent {
                    heading: transform_heading(raw.heading, &id),
                    items: raw
                        .items
                        .into_iter()
                        .map(|item| AccordionItem {
                            title: item.title.unwrap_or_default(),
                            text: item.text.unwrap_or_default(),
                        })
                        .collect(),
                    id,
                }))
            }
            "content.image" => {
                let raw: StrapiImageBlock = parse_block(&block.component, body)?;
                Some(FlexContent::Image(ImageContent {
                    caption: raw.caption.unwrap_or_default(),
                    image: raw.image.map(|image| self.transform_image(image)),
                    is_narrow: raw.is_narrow,
                    id,
                }))
            }
            "content.cta" => {
                let raw: StrapiCtaBlock = parse_block(&block.component, body)?;
                Some(FlexContent::Cta(CtaContent {
                    cta_blocks: raw
                        .cta_blocks
                        .into_iter()
                        .map(|paragraph| transform_paragraph(Some(paragraph), &id))
                        .collect(),
                    id,
                }))
            }
            "content.quote" => {
                let raw: StrapiQuoteBlock = parse_block(&block.component, body)?;
                Some(FlexContent::Quote(QuoteContent {
                    quote: raw.quote.unwrap_or_default(),
                    author: raw.author.unwrap_or_default(),
                    image: raw.image.map(|image| self.transform_image(image)),
                    id,
                }))
            }
            "content.video" => {
                let raw: StrapiVideoBlock = parse_block(&block.component, body)?;
                let video = raw.video.unwrap_or_default();
                Some(FlexContent::Video(VideoContent {
                    video: VideoSource {
                        url: video.url.unwrap_or_default(),
                        provider: video.provider.unwrap_or_default(),
                        provider_uid: video.provider_uid.unwrap_or_default(),
                    },
                    placeholder: raw.placeholder.map(|image| self.transform_image(image)),
                    caption: raw.caption.unwrap_or_default(),
                    is_narrow: raw.is_narrow.unwrap_or(false),
                    id,
                }))
            }
            other => {
                tracing::warn!("Unknown flex content type: {}", other);
                None
            }
        }
    }

    fn transform_image(&self, raw: StrapiImage) -> ImageAttributes {
        let url = self.resolve_asset_url(raw.url.as_deref().unwrap_or_default());
        let now = Utc::now().to_rfc3339();
        let mime = raw.mime.unwrap_or_else(|| "image/jpeg".to_string());

        let thumbnail = match raw.formats.and_then(|formats| formats.thumbnail) {
            Some(thumb) => Thumbnail {
                ext: thumb.ext.unwrap_or_default(),
                url: self.resolve_asset_url(thumb.url.as_deref().unwrap_or_default()),
                hash: thumb.hash.unwrap_or_default(),
                mime: thumb.mime.unwrap_or_else(|| mime.clone()),
                name: thumb.name.unwrap_or_default(),
                path: thumb.path,
                size: thumb.size.unwrap_or(0.0),
                width: thumb.width.unwrap_or(150),
                height: thumb.height.unwrap_or(100),
                size_in_bytes: thumb.size_in_bytes.unwrap_or(0),
            },
            None => synthesized_thumbnail(&url, raw.hash.as_deref().unwrap_or_default(), &mime),
        };

        ImageAttributes {
            name: raw.name.unwrap_or_default(),
            alternative_text: raw.alternative_text,
            caption: raw.caption,
            width: raw.width.unwrap_or(0),
            height: raw.height.unwrap_or(0),
            formats: ImageFormats { thumbnail },
            hash: raw.hash.unwrap_or_default(),
            ext: raw.ext.unwrap_or_default(),
            mime,
            size: raw.size.unwrap_or(0.0),
            url,
            preview_url: raw.preview_url,
            provider: "strapi".to_string(),
            created_at: raw.created_at.unwrap_or_else(|| now.clone()),
            updated_at: raw.updated_at.unwrap_or(now),
            placeholder: raw.placeholder.unwrap_or_default(),
        }
    }

    /// Strapi serves uploads as instance-relative paths (`/uploads/...`).
    fn resolve_asset_url(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else if url.starts_with("//") {
            format!("https:{}", url)
        } else if url.is_empty() {
            String::new()
        } else {
            let path = if url.starts_with('/') {
                url.to_string()
            } else {
                format!("/{}", url)
            };
            format!("{}{}", self.fetch.base_url().trim_end_matches('/'), path)
        }
    }

    fn transform_general(&self, raw: StrapiGeneral) -> GeneralData {
        GeneralData {
            header: HeaderData {
                items: raw.header_items.into_iter().map(transform_menu_item).collect(),
                topbar: raw
                    .header_topbar
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
            },
            footer: FooterData {
                items: raw
                    .footer_items
                    .into_iter()
                    .map(|menu| Menu {
                        title: menu.title,
                        items: menu.items.into_iter().map(transform_menu_item).collect(),
                    })
                    .collect(),
                bottombar: raw
                    .footer_bottombar
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
                socials: raw
                    .footer_socials
                    .into_iter()
                    .map(|social| Social {
                        channel: social.channel.unwrap_or_default(),
                        url: social.url.unwrap_or_default(),
                    })
                    .collect(),
                addresses: raw
                    .footer_addresses
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
            seo: raw.seo,
        }
    }
}

#[async_trait]
impl ContentService for StrapiService {
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        let url = self.page_query(slug, locale);
        let response: StrapiResponse<StrapiPage> =
            self.fetch.get_json_with_bearer(&url, &self.api_token).await?;
        let page = response.data?.into_first()?;
        Some(self.transform_page(page))
    }

    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page> {
        // Strapi's home convention is the explicit `home` slug.
        self.fetch_page_by_slug("home", locale).await
    }

    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData> {
        let url = format!(
            "{}/api/general?locale[]={}&populate=*",
            self.fetch.base_url(),
            locale
        );
        let response: StrapiResponse<StrapiGeneral> =
            self.fetch.get_json_with_bearer(&url, &self.api_token).await?;
        let general = response.data?.into_first()?;
        Some(self.transform_general(general))
    }

    async fn fetch_page_list(&self, locale: &str) -> Vec<Page> {
        let url = format!(
            "{}/api/pages?locale[]={}&populate=*",
            self.fetch.base_url(),
            locale
        );
        let response: Option<StrapiResponse<StrapiPage>> =
            self.fetch.get_json_with_bearer(&url, &self.api_token).await;

        match response.and_then(|r| r.data) {
            Some(data) => data
                .into_vec()
                .into_iter()
                .map(|page| self.transform_page(page))
                .collect(),
            None => Vec::new(),
        }
    }
}

fn parse_block<T: DeserializeOwned>(component: &str, body: Value) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Dropping malformed {} block: {}", component, e);
            None
        }
    }
}

fn block_id(body: &serde_json::Map<String, Value>) -> String {
    match body.get("id") {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => String::new(),
    }
}

fn transform_heading(raw: Option<StrapiHeading>, fallback_id: &str) -> Heading {
    let raw = raw.unwrap_or_default();
    let id = match raw.id {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id,
        _ => fallback_id.to_string(),
    };
    Heading {
        id,
        title: raw.title.unwrap_or_default(),
        subtitle: raw.subtitle.unwrap_or_default(),
    }
}

fn transform_paragraph(raw: Option<StrapiParagraph>, fallback_id: &str) -> Paragraph {
    let raw = raw.unwrap_or_default();
    Paragraph {
        text: raw.text.unwrap_or_default(),
        heading: transform_heading(raw.heading, fallback_id),
        buttons: raw.buttons.map(transform_buttons).unwrap_or_default(),
    }
}

fn transform_buttons(buttons: Vec<StrapiButton>) -> Vec<Button> {
    buttons
        .into_iter()
        .map(|button| {
            let link = button.link.unwrap_or_default();
            let href = match link.href {
                Some(href) if !href.is_empty() => href,
                _ => "/".to_string(),
            };
            Button {
                label: button.label.unwrap_or_default(),
                link: Link {
                    href,
                    target: match link.target.as_deref() {
                        Some("_blank") => LinkTarget::Blank,
                        _ => LinkTarget::Current,
                    },
                },
            }
        })
        .collect()
}

fn transform_menu_item(item: StrapiMenuItem) -> MenuItem {
    let link = item.link.unwrap_or_default();
    MenuItem {
        label: item.label.unwrap_or_default(),
        link: Link {
            href: match link.href {
                Some(href) if !href.is_empty() => href,
                _ => "/".to_string(),
            },
            target: match link.target.as_deref() {
                Some("_blank") => LinkTarget::Blank,
                _ => LinkTarget::Current,
            },
        },
        sub_items: item
            .sub_items
            .map(|subs| subs.into_iter().map(transform_menu_item).collect()),
    }
}

/// Low-resolution descriptor derived by crop/resize query parameters when
/// the upstream has no native thumbnail format.
fn synthesized_thumbnail(url: &str, hash: &str, mime: &str) -> Thumbnail {
    Thumbnail {
        ext: file_ext(url).unwrap_or_default().to_string(),
        url: if url.is_empty() {
            String::new()
        } else {
            format!("{}?w=150&h=100&fit=crop", url)
        },
        hash: hash.to_string(),
        mime: mime.to_string(),
        name: "thumbnail".to_string(),
        path: None,
        size: 0.0,
        width: 150,
        height: 100,
        size_in_bytes: 0,
    }
}
