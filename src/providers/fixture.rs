//! Development adapter serving fixed in-memory content.
//!
//! Behaves like any other adapter (same interface, same fail-soft rules,
//! an artificial delay standing in for network latency) but needs no
//! upstream. It doubles as a test double: the backing store is injectable
//! and pages can be added or overridden. Mutation takes `&mut self`, so a
//! shared instance cannot be written concurrently by construction.

use crate::domain::model::{
    AccordionContent, AccordionItem, Address, Button, FlexContent, FooterData, GeneralData,
    HeaderData, Heading, Hero, ImageAttributes, ImageFormats, ImageTextContent, Link, LinkTarget,
    Menu, MenuItem, Page, Paragraph, Phone, Social, TextContent, Thumbnail,
};
use crate::domain::ports::ContentService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

const PAGE_DELAY: Duration = Duration::from_millis(100);
const GENERAL_DELAY: Duration = Duration::from_millis(50);

/// Per-locale fixture content. Seeded with `en` and `nl` demo pages by
/// default; tests can start from an empty store instead.
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    pages: HashMap<String, HashMap<String, Page>>,
    general: HashMap<String, GeneralData>,
}

impl FixtureStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        let mut store = Self::default();
        for locale in ["en", "nl"] {
            let mut pages = HashMap::new();
            pages.insert("home".to_string(), home_page());
            pages.insert("about".to_string(), about_page());
            pages.insert("about/team".to_string(), about_page());
            pages.insert("about/values".to_string(), about_page());
            store.pages.insert(locale.to_string(), pages);
            store.general.insert(
                locale.to_string(),
                GeneralData {
                    header: header_data(),
                    footer: footer_data(),
                    seo: None,
                },
            );
        }
        store
    }
}

pub struct FixtureService {
    store: FixtureStore,
}

impl Default for FixtureService {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureService {
    pub fn new() -> Self {
        Self {
            store: FixtureStore::seeded(),
        }
    }

    pub fn with_store(store: FixtureStore) -> Self {
        Self { store }
    }

    /// Adds or overrides a single fixture page.
    pub fn add_page(&mut self, locale: &str, slug: &str, page: Page) {
        self.store
            .pages
            .entry(locale.to_string())
            .or_default()
            .insert(slug.to_string(), page);
    }

    /// Adds or overrides a batch of fixture pages.
    pub fn add_pages(&mut self, locale: &str, pages: HashMap<String, Page>) {
        self.store
            .pages
            .entry(locale.to_string())
            .or_default()
            .extend(pages);
    }

    pub fn pages(&self, locale: &str) -> HashMap<String, Page> {
        self.store.pages.get(locale).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ContentService for FixtureService {
    async fn fetch_page_by_slug(&self, slug: &str, locale: &str) -> Option<Page> {
        tokio::time::sleep(PAGE_DELAY).await;

        let pages = self.store.pages.get(locale)?;

        if let Some(page) = pages.get(slug) {
            tracing::debug!("Fetched fixture page: {}/{}", locale, slug);
            return Some(page.clone());
        }

        // Tolerate a trailing slash
        let clean_slug = slug.trim_end_matches('/');
        if let Some(page) = pages.get(clean_slug) {
            tracing::debug!("Fetched fixture page: {}/{}", locale, clean_slug);
            return Some(page.clone());
        }

        tracing::debug!("Fixture page not found: {}/{}", locale, slug);
        None
    }

    async fn fetch_home_page_data(&self, locale: &str) -> Option<Page> {
        tokio::time::sleep(PAGE_DELAY).await;

        let pages = self.store.pages.get(locale)?;
        let home = pages.get("home").or_else(|| pages.values().next())?;
        tracing::debug!("Fetched fixture home page: {}", locale);
        Some(home.clone())
    }

    async fn fetch_general_data(&self, locale: &str) -> Option<GeneralData> {
        tokio::time::sleep(GENERAL_DELAY).await;

        let general = self.store.general.get(locale)?;
        tracing::debug!("Fetched fixture general data: {}", locale);
        Some(general.clone())
    }

    async fn fetch_page_list(&self, locale: &str) -> Vec<Page> {
        tokio::time::sleep(PAGE_DELAY).await;

        self.store
            .pages
            .get(locale)
            .map(|pages| pages.values().cloned().collect())
            .unwrap_or_default()
    }
}

fn nav_item(label: &str, href: &str) -> MenuItem {
    MenuItem {
        label: label.to_string(),
        link: Link {
            target: LinkTarget::Current,
            href: href.to_string(),
        },
        sub_items: None,
    }
}

fn heading(id: &str, title: &str, subtitle: &str) -> Heading {
    Heading {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    }
}

fn button(label: &str, href: &str) -> Button {
    Button {
        label: label.to_string(),
        link: Link {
            target: LinkTarget::Current,
            href: href.to_string(),
        },
    }
}

/// Inline SVG placeholder so demo pages render without any asset host.
pub fn placeholder_image() -> ImageAttributes {
    ImageAttributes {
        name: "placeholder-image".to_string(),
        alternative_text: Some("Placeholder image".to_string()),
        caption: Some("A placeholder image".to_string()),
        width: 1200,
        height: 800,
        formats: ImageFormats {
            thumbnail: Thumbnail {
                ext: ".svg".to_string(),
                url: "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='150' height='100'%3E%3Crect width='150' height='100' fill='%23ddd'/%3E%3C/svg%3E".to_string(),
                hash: "placeholder".to_string(),
                mime: "image/svg+xml".to_string(),
                name: "placeholder".to_string(),
                path: None,
                size: 1000.0,
                width: 150,
                height: 100,
                size_in_bytes: 1000,
            },
        },
        hash: "placeholder".to_string(),
        ext: ".svg".to_string(),
        mime: "image/svg+xml".to_string(),
        size: 10000.0,
        url: "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='1200' height='800'%3E%3Crect width='1200' height='800' fill='%23e0e0e0'/%3E%3C/svg%3E".to_string(),
        preview_url: None,
        provider: "local".to_string(),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        placeholder: "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='1200' height='800'%3E%3Crect width='1200' height='800' fill='%23f5f5f5'/%3E%3C/svg%3E".to_string(),
    }
}

pub fn header_data() -> HeaderData {
    HeaderData {
        items: vec![
            nav_item("Home", "/"),
            MenuItem {
                sub_items: Some(vec![
                    nav_item("Team", "/about/team"),
                    nav_item("Values", "/about/values"),
                ]),
                ..nav_item("About", "/about")
            },
            nav_item("Services", "/services"),
            nav_item("Contact", "/contact"),
        ],
        topbar: Vec::new(),
    }
}

pub fn footer_data() -> FooterData {
    FooterData {
        items: vec![
            Menu {
                title: Some("Company".to_string()),
                items: vec![
                    nav_item("About", "/about"),
                    nav_item("Blog", "/blog"),
                    nav_item("Careers", "/careers"),
                ],
            },
            Menu {
                title: Some("Resources".to_string()),
                items: vec![
                    MenuItem {
                        label: "Documentation".to_string(),
                        link: Link {
                            target: LinkTarget::Blank,
                            href: "#".to_string(),
                        },
                        sub_items: None,
                    },
                    nav_item("Support", "/support"),
                ],
            },
        ],
        bottombar: vec![
            nav_item("Privacy Policy", "/privacy"),
            nav_item("Terms of Service", "/terms"),
        ],
        socials: vec![
            Social {
                channel: "twitter".to_string(),
                url: "https://twitter.com".to_string(),
            },
            Social {
                channel: "linkedin".to_string(),
                url: "https://linkedin.com".to_string(),
            },
            Social {
                channel: "github".to_string(),
                url: "https://github.com".to_string(),
            },
        ],
        addresses: vec![Address {
            title: "Main Office".to_string(),
            street: Some("Main Street".to_string()),
            house_number: Some(123),
            house_number_addition: None,
            postal_code: Some("1000 AA".to_string()),
            city: Some("Amsterdam".to_string()),
            email: Some("info@example.com".to_string()),
            phone: Some(Phone {
                label: "+31 (0)20 123 4567".to_string(),
                href: "tel:+31201234567".to_string(),
            }),
        }],
    }
}

pub fn home_page() -> Page {
    Page {
        title: "Home".to_string(),
        hero: Hero {
            title: "Welcome to Our Website".to_string(),
            subtitle: Some("Build amazing things with us".to_string()),
            text: "<p>This is a placeholder home page. Your content goes here.</p>".to_string(),
            image: Some(placeholder_image()),
            buttons: Some(vec![
                button("Get Started", "/services"),
                button("Learn More", "/about"),
            ]),
        },
        pre_flex_content: None,
        flex_content: Some(vec![
            FlexContent::Text(TextContent {
                id: "1".to_string(),
                has_background: false,
                is_column_view: false,
                paragraph: Paragraph {
                    text: "<p>This is a text component with sample content to demonstrate the flex content system.</p>".to_string(),
                    heading: heading("1", "About Us", "Learn more about what we do"),
                    buttons: Vec::new(),
                },
            }),
            FlexContent::ImageText(ImageTextContent {
                id: "2".to_string(),
                text_left: true,
                image: Some(placeholder_image()),
                paragraph: Paragraph {
                    text: "<p>This is an image-text component demonstrating how images and text can be combined in different layouts.</p>".to_string(),
                    heading: heading("2", "Our Services", "What we offer"),
                    buttons: vec![button("Explore", "/services")],
                },
            }),
            FlexContent::Accordion(AccordionContent {
                id: "3".to_string(),
                heading: heading("3", "FAQ", "Frequently Asked Questions"),
                items: vec![
                    AccordionItem {
                        title: "What is this service?".to_string(),
                        text: "This is an accordion component that displays collapsible content sections.".to_string(),
                    },
                    AccordionItem {
                        title: "How do I get started?".to_string(),
                        text: "Simply follow the steps in the getting started guide.".to_string(),
                    },
                    AccordionItem {
                        title: "Is there support available?".to_string(),
                        text: "Yes, we provide 24/7 customer support for all our services.".to_string(),
                    },
                ],
            }),
        ]),
        post_flex_content: None,
        seo: None,
    }
}

pub fn about_page() -> Page {
    Page {
        title: "About Us".to_string(),
        hero: Hero {
            title: "About Our Company".to_string(),
            subtitle: Some("Our Mission & Values".to_string()),
            text: "<p>We are dedicated to building exceptional products and services.</p>"
                .to_string(),
            image: Some(placeholder_image()),
            buttons: None,
        },
        pre_flex_content: None,
        flex_content: Some(vec![
            FlexContent::Text(TextContent {
                id: "1".to_string(),
                has_background: true,
                is_column_view: true,
                paragraph: Paragraph {
                    text: "<p>Founded in 2024, our company focuses on delivering high-quality solutions to our clients.</p>".to_string(),
                    heading: heading("1", "Our Story", "How it all began"),
                    buttons: Vec::new(),
                },
            }),
            FlexContent::Accordion(AccordionContent {
                id: "2".to_string(),
                heading: heading("2", "Our Values", "What we believe in"),
                items: vec![
                    AccordionItem {
                        title: "Innovation".to_string(),
                        text: "We constantly push the boundaries of what is possible.".to_string(),
                    },
                    AccordionItem {
                        title: "Quality".to_string(),
                        text: "We never compromise on the quality of our work.".to_string(),
                    },
                    AccordionItem {
                        title: "Customer Focus".to_string(),
                        text: "Our customers are at the heart of everything we do.".to_string(),
                    },
                ],
            }),
        ]),
        post_flex_content: None,
        seo: None,
    }
}

/// Generic 404 page for callers that want a rendered fallback rather than
/// a bare error.
pub fn not_found_page() -> Page {
    Page {
        title: "Not Found".to_string(),
        hero: Hero {
            title: "404 - Page Not Found".to_string(),
            subtitle: Some("Oops!".to_string()),
            text: "<p>The page you are looking for could not be found.</p>".to_string(),
            image: None,
            buttons: Some(vec![button("Go Home", "/")]),
        },
        pre_flex_content: None,
        flex_content: None,
        post_flex_content: None,
        seo: None,
    }
}
