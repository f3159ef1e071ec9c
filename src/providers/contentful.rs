//! Contentful adapter.
//!
//! Entries arrive as `{ sys, fields }` envelopes and asset URLs are
//! protocol-relative, so they get an `https:` prefix before leaving the
//! adapter.

use crate::domain::model::{
    Address, Button, FlexContent, FooterData, GeneralData, GeneralSeo, HeaderData, Heading, Hero,
    ImageAttributes, ImageFormats, ImageTextContent, Link, LinkTarget, Menu, MenuItem, Page,
    Paragraph, Phone, Social, TextContent, Thumbnail,
};
use crate::domain::ports::ContentService;
use crate::providers::base::FetchClient;
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub struct ContentfulService {
    fetch: FetchClient,
    space_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ContentfulResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ContentfulEntry<T> {
    #[serde(default)]
    sys: ContentfulSys,
    fields: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulSys {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentfulPageFields {
    title: String,
    #[serde(default)]
    hero: Option<ContentfulHero>,
    #[serde(default)]
    flex_content: Option<Vec<ContentfulBlock>>,
    #[serde(default)]
    seo: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulHero {
    title: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    image: Option<ContentfulAsset>,
    buttons: Option<Vec<ContentfulButton>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulButton {
    label: Option<String>,
    link: Option<ContentfulLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulLink {
    href: Option<String>,
    target: Option<String>,
}

/// Contentful block entries keep the component tag at the top level with
/// the kind-specific fields nested under `fields`.
#[derive(Debug, Deserialize)]
struct ContentfulBlock {
    #[serde(rename = "__component")]
    component: String,
    #[serde(default)]
    sys: ContentfulSys,
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulTextFields {
    has_background: Option<bool>,
    is_column_view: Option<bool>,
    paragraph: Option<ContentfulParagraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulImageTextFields {
    text_left: Option<bool>,
    image: Option<ContentfulAsset>,
    paragraph: Option<ContentfulParagraph>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulParagraph {
    text: Option<String>,
    heading: Option<ContentfulHeading>,
    buttons: Option<Vec<ContentfulButton>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulHeading {
    id: Option<Value>,
    title: Option<String>,
    subtitle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulAsset {
    sys: ContentfulSys,
    fields: ContentfulAssetFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulAssetFields {
    title: Option<String>,
    description: Option<String>,
    file: ContentfulFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulFile {
    url: String,
    content_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulGeneralFields {
    header_items: Vec<ContentfulMenuItem>,
    header_topbar: Vec<ContentfulMenuItem>,
    footer_items: Vec<ContentfulMenu>,
    footer_bottombar: Vec<ContentfulMenuItem>,
    footer_socials: Vec<ContentfulSocial>,
    footer_addresses: Vec<ContentfulAddress>,
    seo: Option<GeneralSeo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulMenuItem {
    label: Option<String>,
    link: Option<ContentfulLink>,
    sub_items: Option<Vec<ContentfulMenuItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulMenu {
    title: Option<String>,
    items: Vec<ContentfulMenuItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentfulSocial {
    channel: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ContentfulAddress {
    title: Option<String>,
    street: Option<String>,
    house_number: Option<u32>,
    house_number_addition: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl ContentfulService {
    pub fn new(
        base_url: impl Into<String>,
        space_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            fetch: FetchClient::new(base_url),
            space_id: space_id.into(),
            access_token: access_token.into(),
        }
    }

    fn entries_query(&self, content_type: &str, locale: &str) -> String {
        format!(
            "{}/spaces/{}/entries?access_token={}&content_type={}&locale={}",
            self.fetch.base_url(),
            self.space_id,
            self.access_token,
            content_type,
            locale
        )
    }

    async fn fetch_page(&self, slug: &str, locale: &str) -> Option<Page> {
        let url = format!(
            "{}&fields.slug={}",
            self.entries_query("page", locale),
            slug
        );
        let response: ContentfulResponse<ContentfulEntry<ContentfulPageFields>> =
            self.fetch.get_json(&url).await?;
        let entry = response.items.into_iter().next()?;
        Some(self.transform_page(entry))
    }

    fn transform_page(&self, entry: ContentfulEntry<ContentfulPageFields>) -> Page {
        let fields = entry.fields;
        let hero = match fields.hero {
            Some(hero) => self.transform_hero(hero, &fields.title),
            None => Hero::with_title(fields.title.clone()),
        };

        let flex_content = fields.flex_content.map(|blocks| {
            blocks
                .into_iter()
                .filter_map(|block| self.transform_block(block))
                .collect()
        });

        Page {
            title: fields.title,
            hero,
            pre_flex_content: None,
            flex_content,
            post_flex_content: None,
            seo: fields.seo,
        }
    }

    fn transform_hero(&self, raw: ContentfulHero, page_title: &str) -> Hero {
        Hero {
            title: raw.title.unwrap_or_else(|| page_title.to_string()),
            subtitle: raw.subtitle,
            text: raw.text.unwrap_or_default(),
            image: raw.image.map(|image| self.transform_image(image)),
            buttons: raw.buttons.map(transform_buttons),
        }
    }

    fn transform_block(&self, block: ContentfulBlock) -> Option<FlexContent> {
        let id = block.sys.id;
        let fields = Value::Object(block.fields);

        match block.component.as_str() {
            "content.text" => {
                let raw: ContentfulTextFields = parse_fields(&block.component, fields)?;
                Some(FlexContent::Text(TextContent {
                    has_background: raw.has_background.unwrap_or(false),
                    is_column_view: raw.is_column_view.unwrap_or(false),
                    paragraph: transform_paragraph(raw.paragraph, &id),
                    id,
                }))
            }
            "content.image-text" => {
                let raw: ContentfulImageTextFields = parse_fields(&block.component, fields)?;
                Some(FlexContent::ImageText(ImageTextContent {
                    text_left: raw.text_left.unwrap_or(true),
                    image: raw.image.map(|image| self.transform_image(image)),
                    paragraph: transform_paragraph(raw.paragraph, &id),
                    id,
                }))
            }
            other => {
                tracing::warn!("Unknown flex content type: {}", other);
                None
            }
        }
    }

    fn transform_image(&self, raw: ContentfulAsset) -> ImageAttributes {
        let file = raw.fields.file;
        let url = resolve_asset_url(&file.url);
        let now = Utc::now().to_rfc3339();
        let ext = file
            .content_type
            .split('/')
            .nth(1)
            .unwrap_or_default()
            .to_string();

        ImageAttributes {
            name: raw.fields.title.unwrap_or_default(),
            alternative_text: raw.fields.description.clone(),
            caption: raw.fields.description,
            // Contentful's entries API does not carry image dimensions
            width: 1200,
            height: 800,
            formats: ImageFormats {
                thumbnail: Thumbnail {
                    ext: ext.clone(),
                    url: if url.is_empty() {
                        String::new()
                    } else {
                        format!("{}?w=150&h=100&fit=crop", url)
                    },
                    hash: raw.sys.id.clone(),
                    mime: file.content_type.clone(),
                    name: "thumbnail".to_string(),
                    path: None,
                    size: 0.0,
                    width: 150,
                    height: 100,
                    size_in_bytes: 0,
                },
            },
            hash: raw.sys.id,
            ext,
            mime: file.content_type,
            size: 0.0,
            url,
            preview_url: None,
            provider: "contentful".to_string(),
            created_at: now.clone(),
            updated_at: now,
            placeholder: String::new(),
        }
    }

    fn transform_general(&self, fields: ContentfulGeneralFields) -> GeneralData {
        GeneralData {
            header: HeaderData {
                items: fields
                    .header_items
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
                topbar: fields
                    .header_topbar
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
            },
            footer: FooterData {
                items: fields
                    .footer_items
                    .into_iter()
                    .map(|menu| Menu {
                        title: menu.title,
                        items: menu.items.into_iter().map(transform_menu_item).collect(),
                    })
                    .collect(),
                bottombar: fields
                    .footer_bottombar
                    .into_iter()
                    .map(transform_menu_item)
                    .collect(),
                socials: fields
                    .footer_socials
                    .into_iter()
                    .map(|social| Social {
                        channel: social.channel.unwrap_or_default(),
                        url: social.url.unwrap_or_default(),
                    })
                    .collect(),
                addresses: fields
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
            seo: fields.seo,
        }
    }
}

#[async_trait]
impl ContentService for ContentfulService {
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        self.fetch_page(slug, locale).await
    }

    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page> {
        // Contentful's home convention is the explicit `home` slug.
        self.fetch_page("home", locale).await
    }

    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData> {
        let url = self.entries_query("generalSettings", locale);
        let response: ContentfulResponse<ContentfulEntry<ContentfulGeneralFields>> =
            self.fetch.get_json(&url).await?;
        let entry = response.items.into_iter().next()?;
        Some(self.transform_general(entry.fields))
    }
}

/// Contentful serves asset URLs protocol-relative (`//images.ctfassets.net/...`).
fn resolve_asset_url(url: &str) -> String {
    if url.is_empty() || url.starts_with("http") {
        url.to_string()
    } else if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

fn parse_fields<T: DeserializeOwned>(component: &str, fields: Value) -> Option<T> {
    match serde_json::from_value(fields) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Dropping malformed {} block: {}", component, e);
            None
        }
    }
}

fn transform_paragraph(raw: Option<ContentfulParagraph>, fallback_id: &str) -> Paragraph {
    let raw = raw.unwrap_or_default();
    let heading = raw.heading.unwrap_or_default();
    let heading_id = match heading.id {
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::String(id)) => id,
        _ => fallback_id.to_string(),
    };
    Paragraph {
        text: raw.text.unwrap_or_default(),
        heading: Heading {
            id: heading_id,
            title: heading.title.unwrap_or_default(),
            subtitle: heading.subtitle.unwrap_or_default(),
        },
        buttons: raw.buttons.map(transform_buttons).unwrap_or_default(),
    }
}

fn transform_buttons(buttons: Vec<ContentfulButton>) -> Vec<Button> {
    buttons
        .into_iter()
        .map(|button| {
            let link = button.link.unwrap_or_default();
            Button {
                label: button.label.unwrap_or_default(),
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
            }
        })
        .collect()
}

fn transform_menu_item(item: ContentfulMenuItem) -> MenuItem {
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
