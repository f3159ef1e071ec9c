use cms_gateway::domain::model::FlexContent;
use cms_gateway::providers::storyblok::StoryblokService;
use cms_gateway::{ContentService, PublishState};
use httpmock::prelude::*;
use serde_json::json;

fn story_body() -> serde_json::Value {
    json!({
        "story": {
            "name": "About",
            "content": {
                "hero": {
                    "title": "About Us",
                    "description": "<p>Intro</p>",
                    "image": "/f/12345/1200x800/abc/team.jpg",
                    "cta": { "label": "Contact", "link": "contact" }
                },
                "body": [
                    {
                        "_uid": "uid-1",
                        "component": "text",
                        "title": "Story",
                        "text": "<p>Body</p>",
                        "backgroundColor": "sand",
                        "columns": "2"
                    },
                    {
                        "_uid": "uid-2",
                        "component": "imageText",
                        "title": "Office",
                        "content": "<p>Office</p>",
                        "imagePosition": "right",
                        "image": {
                            "id": 99,
                            "alt": "Office",
                            "filename": "https://a.storyblok.com/f/12345/800x600/def/office.jpg"
                        },
                        "cta": [
                            { "title": "One", "link": { "linktype": "story", "slug": "one" } },
                            { "title": "Two", "url": { "linktype": "url", "url": "https://two.test" }, "target": "_blank" }
                        ]
                    },
                    {
                        "_uid": "uid-3",
                        "component": "accordion",
                        "title": "FAQ",
                        "accordion_items": [
                            { "title": "Q1", "content": "A1" },
                            { "title": "Q2", "description": "A2" }
                        ]
                    },
                    {
                        "_uid": "uid-4",
                        "component": "teaser",
                        "title": "dropped"
                    }
                ]
            }
        }
    })
}

#[tokio::test]
async fn story_blocks_are_normalized_with_aliases() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/stories/en/about")
            .query_param("token", "sb-token")
            .query_param("version", "published");
        then.status(200).json_body(story_body());
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Published);
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();
    mock.assert();

    assert_eq!(page.title, "About");
    assert_eq!(page.hero.title, "About Us");
    assert_eq!(page.hero.text, "<p>Intro</p>");

    // Single CTA blok still becomes a button list
    let hero_buttons = page.hero.buttons.unwrap();
    assert_eq!(hero_buttons.len(), 1);
    assert_eq!(hero_buttons[0].link.href, "/contact");

    let blocks = page.flex_content.unwrap();
    assert_eq!(blocks.len(), 3);

    match &blocks[0] {
        FlexContent::Text(text) => {
            assert_eq!(text.id, "uid-1");
            assert!(text.has_background);
            assert!(text.is_column_view);
            assert_eq!(text.paragraph.heading.title, "Story");
        }
        other => panic!("expected text block, got {:?}", other),
    }

    match &blocks[1] {
        FlexContent::ImageText(image_text) => {
            assert!(!image_text.text_left);
            // `content` is the text alias on this block kind
            assert_eq!(image_text.paragraph.text, "<p>Office</p>");
            assert_eq!(image_text.paragraph.buttons.len(), 2);
            assert_eq!(image_text.paragraph.buttons[0].link.href, "/one");
            assert_eq!(image_text.paragraph.buttons[1].link.href, "https://two.test");
        }
        other => panic!("expected image-text block, got {:?}", other),
    }

    match &blocks[2] {
        FlexContent::Accordion(accordion) => {
            assert_eq!(accordion.items.len(), 2);
            assert_eq!(accordion.items[0].text, "A1");
            assert_eq!(accordion.items[1].text, "A2");
        }
        other => panic!("expected accordion block, got {:?}", other),
    }
}

#[tokio::test]
async fn bare_cdn_paths_get_the_asset_host() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/stories/en/about");
        then.status(200).json_body(story_body());
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Published);
    let page = service.fetch_page_by_slug("about", "en").await.unwrap();

    let hero_image = page.hero.image.unwrap();
    assert_eq!(
        hero_image.url,
        "https://a.storyblok.com/f/12345/1200x800/abc/team.jpg"
    );
    assert!(hero_image
        .formats
        .thumbnail
        .url
        .ends_with("team.jpg?w=150&h=100&fit=crop"));

    // Already-absolute asset objects pass through untouched
    let blocks = page.flex_content.unwrap();
    match &blocks[1] {
        FlexContent::ImageText(image_text) => {
            let image = image_text.image.as_ref().unwrap();
            assert_eq!(
                image.url,
                "https://a.storyblok.com/f/12345/800x600/def/office.jpg"
            );
            assert_eq!(image.alternative_text.as_deref(), Some("Office"));
            assert_eq!(image.hash, "99");
        }
        other => panic!("expected image-text block, got {:?}", other),
    }
}

#[tokio::test]
async fn draft_version_is_requested_when_configured() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/stories/en/about")
            .query_param("version", "draft");
        then.status(200).json_body(story_body());
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Draft);
    assert!(service.fetch_page_by_slug("about", "en").await.is_some());
    mock.assert();
}

#[tokio::test]
async fn home_page_is_the_startpage_story() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/stories/en")
            .query_param("filter_query[is_startpage][eq]", "true");
        then.status(200).json_body(json!({
            "stories": [{ "name": "Home", "content": {} }]
        }));
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Published);
    let page = service.fetch_home_page_data("en").await.unwrap();
    mock.assert();

    assert_eq!(page.title, "Home");
    assert_eq!(page.hero.title, "Home");
}

#[tokio::test]
async fn missing_story_fails_soft() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v2/stories/en/missing");
        then.status(404).body("This record could not be found");
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Published);
    assert!(service.fetch_page_by_slug("missing", "en").await.is_none());
}

#[tokio::test]
async fn settings_story_becomes_general_data() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v2/stories/nl/settings");
        then.status(200).json_body(json!({
            "story": {
                "name": "Settings",
                "content": {
                    "navigation": [
                        { "label": "Home", "link": "/" },
                        {
                            "label": "About",
                            "link": { "linktype": "story", "slug": "about" },
                            "subItems": [
                                { "label": "Team", "link": { "cached_url": "about/team" } }
                            ]
                        }
                    ],
                    "footerColumns": [
                        {
                            "title": "Company",
                            "links": [
                                { "title": "Blog", "url": "blog" }
                            ]
                        }
                    ],
                    "footerLinks": [ { "label": "Privacy", "link": "privacy" } ],
                    "socials": [
                        { "platform": "twitter", "url": "https://twitter.com/acme" }
                    ],
                    "addresses": [
                        { "title": "HQ", "city": "Amsterdam", "phone": "+31 20 123 4567" }
                    ]
                }
            }
        }));
    });

    let service = StoryblokService::new(server.base_url(), "sb-token", PublishState::Published);
    let general = service.fetch_general_data("nl").await.unwrap();
    mock.assert();

    assert_eq!(general.header.items[0].link.href, "/");
    let about = &general.header.items[1];
    assert_eq!(about.link.href, "/about");
    assert_eq!(
        about.sub_items.as_ref().unwrap()[0].link.href,
        "/about/team"
    );

    let column = &general.footer.items[0];
    assert_eq!(column.title.as_deref(), Some("Company"));
    assert_eq!(column.items[0].label, "Blog");
    assert_eq!(column.items[0].link.href, "/blog");

    assert_eq!(general.footer.bottombar[0].link.href, "/privacy");
    assert_eq!(general.footer.socials[0].channel, "twitter");
    let phone = general.footer.addresses[0].phone.as_ref().unwrap();
    assert_eq!(phone.href, "tel:+31201234567");
}
