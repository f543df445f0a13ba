//! Integration tests for the public pages
//!
//! These tests drive the full router, templates included, against a
//! temporary database seeded through the repository layer.

use axum::http::StatusCode;
use blog::dto::NewPostDto;
use blog::repo;

mod common;
use common::*;

/// Returns the part of the page between two markers
fn section<'a>(body: &'a str, start: &str, end: &str) -> &'a str {
    let from = body.find(start).expect("start marker missing");
    let rest = &body[from..];
    let to = rest.find(end).unwrap_or(rest.len());
    &rest[..to]
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{}' not found", needle))
}

#[tokio::test]
async fn test_index_on_empty_blog() {
    let mut blog = create_test_blog();

    let (status, body) = get(&mut blog.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Most popular"));
    assert!(body.contains("No posts yet."));
}

#[tokio::test]
async fn test_index_shows_five_freshest_posts_newest_first() {
    let mut blog = create_test_blog();
    for i in 0..7 {
        publish(&blog.pool, &format!("Post {}", i), "Body", &[], at_hour(i));
    }

    let (status, body) = get(&mut blog.app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let fresh = section(&body, "class=\"fresh\"", "</section>");
    assert_eq!(fresh.matches("class=\"post-card\"").count(), 5);
    assert!(position(fresh, ">Post 6<") < position(fresh, ">Post 5<"));
    assert!(position(fresh, ">Post 3<") < position(fresh, ">Post 2<"));
    assert!(!fresh.contains(">Post 1<"));
    assert!(!fresh.contains(">Post 0<"));
}

#[tokio::test]
async fn test_index_ranks_popular_posts_by_likes() {
    let mut blog = create_test_blog();
    let mut posts = Vec::new();
    for i in 0..7 {
        posts.push(publish(&blog.pool, &format!("Post {}", i), "Body", &[], at_hour(i)));
    }
    like(&blog.pool, &posts[0], 3);
    like(&blog.pool, &posts[1], 1);

    let (_, body) = get(&mut blog.app, "/").await;

    let popular = section(&body, "class=\"popular\"", "</section>");
    assert_eq!(popular.matches("class=\"post-card\"").count(), 5);
    assert!(position(popular, ">Post 0<") < position(popular, ">Post 1<"));
    assert!(position(popular, ">Post 1<") < position(popular, ">Post 6<"));
    assert!(!popular.contains(">Post 2<"));
}

#[tokio::test]
async fn test_index_cards_carry_tags_and_comment_counts() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Tagged post", "Body", &["rust", "web"], at_hour(1));
    ensure_user(&blog.pool, "reader");
    repo::create_comment(&blog.pool, "tagged-post", "reader", "One".to_string()).unwrap();
    repo::create_comment(&blog.pool, "tagged-post", "reader", "Two".to_string()).unwrap();

    let (_, body) = get(&mut blog.app, "/").await;

    let fresh = section(&body, "class=\"fresh\"", "</section>");
    assert!(fresh.contains("href=\"/posts/tagged-post/\""));
    assert!(fresh.contains("2 comments"));
    assert!(fresh.contains("href=\"/tags/rust/\""));
    assert!(fresh.contains("href=\"/tags/web/\""));
    assert!(fresh.contains("class=\"first-tag\""));
}

#[tokio::test]
async fn test_index_card_shows_teaser_only() {
    let mut blog = create_test_blog();
    let text = format!("{}{}", "a".repeat(150), "b".repeat(150));
    publish(&blog.pool, "Long read", &text, &[], at_hour(1));

    let (_, body) = get(&mut blog.app, "/").await;

    let teaser = format!("{}{}", "a".repeat(150), "b".repeat(50));
    assert!(body.contains(&teaser));
    assert!(!body.contains(&"b".repeat(51)));
}

#[tokio::test]
async fn test_sidebar_lists_popular_tags_with_counts() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "One", "Body", &["rust", "web"], at_hour(1));
    publish(&blog.pool, "Two", "Body", &["rust"], at_hour(2));
    for i in 0..6 {
        repo::create_tag(&blog.pool, format!("unused-{}", i)).unwrap();
    }

    let (_, body) = get(&mut blog.app, "/").await;

    let cloud = section(&body, "class=\"tag-cloud\"", "</ul>");
    assert_eq!(cloud.matches("<li>").count(), 5);
    assert!(position(cloud, "#rust") < position(cloud, "#web"));
    assert!(cloud.contains("#rust</a> <span class=\"count\">2</span>"));
}

#[tokio::test]
async fn test_post_detail_page() {
    let mut blog = create_test_blog();
    let post = publish(&blog.pool, "Deep dive", "All the details.", &["rust"], at_hour(1));
    ensure_user(&blog.pool, "critic");
    repo::create_comment(&blog.pool, "deep-dive", "critic", "Great read".to_string()).unwrap();
    like(&blog.pool, &post, 3);

    let (status, body) = get(&mut blog.app, "/posts/deep-dive/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Deep dive</h1>"));
    assert!(body.contains("All the details."));
    assert!(body.contains("3 likes"));
    assert!(body.contains("Comments (1)"));
    assert!(body.contains("critic"));
    assert!(body.contains("Great read"));
    assert!(body.contains("href=\"/tags/rust/\""));
}

#[tokio::test]
async fn test_post_detail_without_trailing_slash() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Deep dive", "Body", &[], at_hour(1));

    let (status, body) = get(&mut blog.app, "/posts/deep-dive").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No comments yet."));
}

#[tokio::test]
async fn test_post_detail_unknown_slug() {
    let mut blog = create_test_blog();

    let (status, body) = get(&mut blog.app, "/posts/missing/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_post_detail_shows_image_from_media_url() {
    let mut blog = create_test_blog();
    ensure_user(&blog.pool, "author");
    repo::create_post(
        &blog.pool,
        NewPostDto {
            title: "Pictured".to_string(),
            text: "Body".to_string(),
            image: Some("posts/cover.jpg".to_string()),
            author: "author".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    let (_, body) = get(&mut blog.app, "/posts/pictured/").await;
    assert!(body.contains("src=\"/media/posts/cover.jpg\""));

    let (status, image) = get(&mut blog.app, "/media/posts/cover.jpg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image, "not really a jpeg");
}

#[tokio::test]
async fn test_tag_page_lists_only_tagged_posts() {
    let mut blog = create_test_blog();
    let a = publish(&blog.pool, "Alpha", "Body", &["rust"], at_hour(1));
    publish(&blog.pool, "Beta", "Body", &["rust", "web"], at_hour(2));
    publish(&blog.pool, "Gamma", "Body", &["web"], at_hour(3));
    like(&blog.pool, &a, 2);

    let (status, body) = get(&mut blog.app, "/tags/rust/").await;

    assert_eq!(status, StatusCode::OK);
    let listing = section(&body, "class=\"tag-posts\"", "</section>");
    assert!(listing.contains("Posts tagged #rust"));
    assert_eq!(listing.matches("class=\"post-card\"").count(), 2);
    assert!(position(listing, ">Alpha<") < position(listing, ">Beta<"));
    assert!(!listing.contains(">Gamma<"));
}

#[tokio::test]
async fn test_tag_page_caps_listing_at_twenty() {
    let mut blog = create_test_blog();
    for i in 0..22 {
        publish(&blog.pool, &format!("Post {}", i), "Body", &["busy"], at_hour(i));
    }

    let (_, body) = get(&mut blog.app, "/tags/busy").await;

    let listing = section(&body, "class=\"tag-posts\"", "</section>");
    assert_eq!(listing.matches("class=\"post-card\"").count(), 20);
}

#[tokio::test]
async fn test_tag_page_for_unused_tag() {
    let mut blog = create_test_blog();
    repo::create_tag(&blog.pool, "quiet".to_string()).unwrap();

    let (status, body) = get(&mut blog.app, "/tags/quiet/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No posts with this tag yet."));
}

#[tokio::test]
async fn test_tag_page_with_encoded_title() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Spaced", "Body", &["rust lang"], at_hour(1));

    let (status, body) = get(&mut blog.app, "/tags/rust%20lang/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Posts tagged #rust lang"));
    assert!(body.contains(">Spaced<"));
}

#[tokio::test]
async fn test_tag_page_unknown_tag() {
    let mut blog = create_test_blog();

    let (status, body) = get(&mut blog.app, "/tags/nothing/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_contacts_page() {
    let mut blog = create_test_blog();

    for uri in ["/contacts/", "/contacts"] {
        let (status, body) = get(&mut blog.app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Contacts</h1>"));
    }
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let mut blog = create_test_blog();

    let (status, body) = get(&mut blog.app, "/no/such/page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let mut blog = create_test_blog();

    let (status, body) = get(&mut blog.app, "/static/css/blog.css").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("margin"));
}

#[tokio::test]
async fn test_deleted_post_disappears() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Short lived", "Body", &["rust"], at_hour(1));
    repo::delete_post(&blog.pool, "short-lived").unwrap();

    let (status, _) = get(&mut blog.app, "/posts/short-lived/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get(&mut blog.app, "/").await;
    assert!(!body.contains("Short lived"));
}

#[tokio::test]
async fn test_tag_page_for_dotted_title() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Release notes", "Body", &["v1.2"], at_hour(1));

    let (_, index) = get(&mut blog.app, "/").await;
    assert!(index.contains("href=\"/tags/v1.2/\""));

    let (status, body) = get(&mut blog.app, "/tags/v1.2/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(">Release notes<"));
}

#[tokio::test]
async fn test_detail_page_counts_comments() {
    let mut blog = create_test_blog();
    publish(&blog.pool, "Chatty", "Body", &[], at_hour(1));
    ensure_user(&blog.pool, "reader");
    for text in ["one", "two", "three"] {
        repo::create_comment(&blog.pool, "chatty", "reader", text.to_string()).unwrap();
    }

    let (_, body) = get(&mut blog.app, "/posts/chatty/").await;

    assert!(body.contains("Comments (3)"));
}
