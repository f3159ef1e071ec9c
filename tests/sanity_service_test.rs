use cms_gateway::domain::model::FlexContent;
use cms_gateway::providers::sanity::SanityService;
use cms_gateway::ContentService;
use httpmock::prelude::*;
use serde_json::json;

fn result_body() -> serde_json::Value {
    json!({
        "ms": 3,
        "result": [{
            "_id": "page-1",
            "title": "About",
            "hero": {
                "title": "About Us",
                "description": "<p>Intro</p>",
                "image": {
                    "alt": "Team",
                    "asset": { "_ref": "image-deadbeef-1200x800-jpg" }
                },
                "cta": [
                    { "label": "Contact", "url": "/contact" },
                    { "label": "Docs", "url": "https://docs.test", "openInNewTab": true }
                ]
            },
            "content": [
                {
                    "_type": "textBlock",
                    "_key": "k1",
                    "title": "Story",
                    "text": "<p>Body</p>",
                    "backgroundColor": "sand",
                    "columns": 2
                },
                {
                    "_type": "imageTextBlock",
                    "_id": "b2",
                    "title": "Office",
                    "text": "<p>Office</p>",
                    "imagePosition": "left",
                    "image": { "url": "https://cdn.sanity.io/images/p/d/office.jpg" }
                },
                {
                    "_type": "accordionBlock",
                    "_key": "k3",
                    "title": "FAQ",
                    "items": [
                        { "title": "Q1", "content": "A1" }
                    ]
                },
                {
                    "_type": "galleryBlock",
                    "_key": "k4"
                }
            ]
        }]
    })
}

#[tokio::test]
async fn groq_result_is_normalized() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v2023-05-03/data/query/production");
        then.status(200).json_body(result_body());
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();
    mock.assert();

    assert_eq!(page.title, "About");
    assert_eq!(page.hero.title, "About Us");
    assert_eq!(page.hero.text, "<p>Intro</p>");

    let buttons = page.hero.buttons.unwrap();
    assert_eq!(buttons[0].link.href, "/contact");
    assert_eq!(
        serde_json::to_value(&buttons[1].link).unwrap()["target"],
        "_blank"
    );

    let blocks = page.flex_content.unwrap();
    // The gallery block has no normalized counterpart and is dropped
    assert_eq!(blocks.len(), 3);

    match &blocks[0] {
        FlexContent::Text(text) => {
            assert_eq!(text.id, "k1");
            assert!(text.has_background);
            assert!(text.is_column_view);
        }
        other => panic!("expected text block, got {:?}", other),
    }

    match &blocks[1] {
        FlexContent::ImageText(image_text) => {
            assert_eq!(image_text.id, "b2");
            assert!(!image_text.text_left);
            // Direct URLs bypass asset reference resolution
            let image = image_text.image.as_ref().unwrap();
            assert_eq!(image.url, "https://cdn.sanity.io/images/p/d/office.jpg");
        }
        other => panic!("expected image-text block, got {:?}", other),
    }

    match &blocks[2] {
        FlexContent::Accordion(accordion) => {
            assert_eq!(accordion.items[0].text, "A1");
        }
        other => panic!("expected accordion block, got {:?}", other),
    }
}

#[tokio::test]
async fn asset_references_resolve_to_the_cdn() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2023-05-03/data/query/production");
        then.status(200).json_body(result_body());
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();

    let image = page.hero.image.unwrap();
    assert_eq!(
        image.url,
        "https://cdn.sanity.io/images/abc123/production/deadbeef-1200x800.jpg"
    );
    assert_eq!(image.hash, "image-deadbeef-1200x800-jpg");
    assert_eq!(image.provider, "sanity");
}

#[tokio::test]
async fn home_page_queries_the_homepage_flag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2023-05-03/data/query/production")
            .query_param(
                "query",
                r#"*[_type == "page" && isHomepage == true && language == "en"]"#,
            );
        then.status(200).json_body(json!({
            "result": [{ "title": "Home" }]
        }));
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    let page = service.fetch_home_page_data("en").await.unwrap();
    mock.assert();

    assert_eq!(page.title, "Home");
    assert_eq!(page.hero.title, "Home");
}

#[tokio::test]
async fn empty_result_means_no_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2023-05-03/data/query/production");
        then.status(200).json_body(json!({ "result": [] }));
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    assert!(service.fetch_page_by_slug("missing", "en").await.is_none());
    assert!(service.fetch_general_data("en").await.is_none());
}

#[tokio::test]
async fn response_without_result_field_means_no_page() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2023-05-03/data/query/production");
        then.status(200).json_body(json!({ "ms": 1 }));
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    assert!(service.fetch_page_by_slug("about", "en").await.is_none());
    assert!(service.fetch_general_data("en").await.is_none());
}

#[tokio::test]
async fn upstream_errors_fail_soft() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2023-05-03/data/query/production");
        then.status(500);
    });

    let service = SanityService::new(server.base_url(), "abc123", "production");
    assert!(service.fetch_page_by_slug("about", "en").await.is_none());
}

#[tokio::test]
async fn site_settings_document_becomes_general_data() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2023-05-03/data/query/staging")
            .query_param(
                "query",
                r#"*[_type == "siteSettings" && language == "en"]"#,
            );
        then.status(200).json_body(json!({
            "result": [{
                "navigation": [
                    { "label": "Home", "url": "/" },
                    {
                        "label": "Docs",
                        "url": "https://docs.test",
                        "openInNewTab": true,
                        "subItems": [
                            { "label": "API", "url": "/docs/api" }
                        ]
                    }
                ],
                "footerColumns": [
                    { "title": "Company", "links": [ { "label": "Blog", "url": "/blog" } ] }
                ],
                "footerLinks": [ { "label": "Privacy", "url": "/privacy" } ],
                "socials": [ { "platform": "linkedin", "url": "https://linkedin.com/company/acme" } ],
                "addresses": [ { "title": "HQ", "phone": "+31 20 123 4567" } ]
            }]
        }));
    });

    let service = SanityService::new(server.base_url(), "abc123", "staging");
    let general = service.fetch_general_data("en").await.unwrap();
    mock.assert();

    assert_eq!(general.header.items.len(), 2);
    let docs = &general.header.items[1];
    assert_eq!(
        serde_json::to_value(&docs.link).unwrap()["target"],
        "_blank"
    );
    assert_eq!(docs.sub_items.as_ref().unwrap()[0].link.href, "/docs/api");

    assert_eq!(general.footer.items[0].items[0].link.href, "/blog");
    assert_eq!(general.footer.socials[0].channel, "linkedin");
    let phone = general.footer.addresses[0].phone.as_ref().unwrap();
    assert_eq!(phone.href, "tel:+31201234567");
}
