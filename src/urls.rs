//! Builders for the public addresses the pages link to.

use url::Url;

/// Address of a post's detail page
pub fn post_url(slug: &str) -> String {
    format!("/posts/{}/", slug)
}

/// Address of a tag's listing page
///
/// Tag titles are free text, so the title is percent-encoded as a single
/// path segment.
pub fn tag_url(title: &str) -> String {
    let mut url = Url::parse("http://localhost/").expect("static base URL is valid");
    url.path_segments_mut()
        .expect("http URLs always have path segments")
        .pop_if_empty()
        .extend(["tags", title, ""]);
    url.path().to_string()
}

/// Public address of a file stored under the media root
pub fn media_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
