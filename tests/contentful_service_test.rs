use cms_gateway::domain::model::FlexContent;
use cms_gateway::providers::contentful::ContentfulService;
use cms_gateway::ContentService;
use httpmock::prelude::*;
use serde_json::json;

fn page_body() -> serde_json::Value {
    json!({
        "items": [{
            "sys": { "id": "page-1" },
            "fields": {
                "title": "About",
                "hero": {
                    "title": "About Us",
                    "text": "<p>Intro</p>",
                    "image": {
                        "sys": { "id": "asset-1" },
                        "fields": {
                            "title": "Team",
                            "description": "The whole team",
                            "file": {
                                "url": "//images.ctfassets.net/space/team.jpg",
                                "contentType": "image/jpeg"
                            }
                        }
                    }
                },
                "flexContent": [
                    {
                        "__component": "content.text",
                        "sys": { "id": "block-1" },
                        "fields": {
                            "hasBackground": true,
                            "paragraph": {
                                "text": "<p>Body</p>",
                                "heading": { "title": "Story", "subtitle": "Ours" }
                            }
                        }
                    },
                    {
                        "__component": "content.image-text",
                        "sys": { "id": "block-2" },
                        "fields": {
                            "textLeft": false,
                            "image": {
                                "sys": { "id": "asset-2" },
                                "fields": {
                                    "file": {
                                        "url": "//images.ctfassets.net/space/office.jpg",
                                        "contentType": "image/png"
                                    }
                                }
                            },
                            "paragraph": { "text": "<p>Office</p>" }
                        }
                    },
                    {
                        "__component": "content.gallery",
                        "sys": { "id": "block-3" },
                        "fields": {}
                    }
                ]
            }
        }]
    })
}

#[tokio::test]
async fn page_entries_are_unwrapped_and_normalized() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/spaces/space42/entries")
            .query_param("access_token", "cf-token")
            .query_param("content_type", "page")
            .query_param("locale", "en")
            .query_param("fields.slug", "about");
        then.status(200).json_body(page_body());
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();
    mock.assert();

    assert_eq!(page.title, "About");
    assert_eq!(page.hero.title, "About Us");

    let blocks = page.flex_content.unwrap();
    // The gallery block has no normalized counterpart and is dropped
    assert_eq!(blocks.len(), 2);

    match &blocks[0] {
        FlexContent::Text(text) => {
            assert_eq!(text.id, "block-1");
            assert!(text.has_background);
            assert_eq!(text.paragraph.heading.title, "Story");
            // No heading id upstream, so the block id is reused
            assert_eq!(text.paragraph.heading.id, "block-1");
        }
        other => panic!("expected text block, got {:?}", other),
    }

    match &blocks[1] {
        FlexContent::ImageText(image_text) => {
            assert_eq!(image_text.id, "block-2");
            assert!(!image_text.text_left);
            let image = image_text.image.as_ref().unwrap();
            assert_eq!(image.mime, "image/png");
            assert_eq!(image.hash, "asset-2");
        }
        other => panic!("expected image-text block, got {:?}", other),
    }
}

#[tokio::test]
async fn protocol_relative_asset_urls_get_https() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spaces/space42/entries");
        then.status(200).json_body(page_body());
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();

    let image = page.hero.image.unwrap();
    assert_eq!(image.url, "https://images.ctfassets.net/space/team.jpg");
    assert_eq!(image.provider, "contentful");
    assert_eq!(
        image.formats.thumbnail.url,
        "https://images.ctfassets.net/space/team.jpg?w=150&h=100&fit=crop"
    );
}

#[tokio::test]
async fn home_page_uses_the_home_slug() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/spaces/space42/entries")
            .query_param("fields.slug", "home");
        then.status(200).json_body(json!({
            "items": [{ "sys": { "id": "p" }, "fields": { "title": "Home" } }]
        }));
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    let page = service.fetch_home_page_data("en").await.unwrap();
    mock.assert();
    assert_eq!(page.title, "Home");
}

#[tokio::test]
async fn empty_item_list_means_no_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spaces/space42/entries");
        then.status(200).json_body(json!({ "items": [] }));
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    assert!(service.fetch_page_by_slug("missing", "en").await.is_none());
}

#[tokio::test]
async fn response_without_items_field_means_no_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spaces/space42/entries");
        then.status(200).json_body(json!({ "total": 0 }));
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    assert!(service.fetch_page_by_slug("about", "en").await.is_none());
    assert!(service.fetch_general_data("en").await.is_none());
}

#[tokio::test]
async fn upstream_errors_fail_soft() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/spaces/space42/entries");
        then.status(401).json_body(json!({ "sys": { "type": "Error" } }));
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    assert!(service.fetch_page_by_slug("about", "en").await.is_none());
    assert!(service.fetch_general_data("en").await.is_none());
}

#[tokio::test]
async fn general_settings_entry_is_normalized() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/spaces/space42/entries")
            .query_param("content_type", "generalSettings");
        then.status(200).json_body(json!({
            "items": [{
                "sys": { "id": "general" },
                "fields": {
                    "headerItems": [
                        { "label": "Home", "link": { "href": "/" } }
                    ],
                    "footerItems": [],
                    "footerBottombar": [],
                    "footerSocials": [
                        { "channel": "github", "url": "https://github.com/acme" }
                    ],
                    "footerAddresses": [
                        { "title": "HQ", "phone": "+31 20 123 4567" }
                    ],
                    "seo": { "fallbackMetaTitle": "Acme" }
                }
            }]
        }));
    });

    let service = ContentfulService::new(server.base_url(), "space42", "cf-token");
    let general = service.fetch_general_data("en").await.unwrap();
    mock.assert();

    assert_eq!(general.header.items[0].label, "Home");
    assert_eq!(general.footer.socials[0].channel, "github");
    let phone = general.footer.addresses[0].phone.as_ref().unwrap();
    assert_eq!(phone.href, "tel:+31201234567");
    assert_eq!(
        general.seo.unwrap().fallback_meta_title.as_deref(),
        Some("Acme")
    );
}
