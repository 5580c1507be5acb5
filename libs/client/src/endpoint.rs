use url::Url;

use crate::{response::IntoResponse, ApiError};

pub const POSTS: &str = "/posts";
pub const POST: &str = "/post";
pub const CONTENT: &str = "/content";

pub const ENDPOINTS: [(&str, &str); 3] =
    [("POSTS", POSTS), ("POST", POST), ("CONTENT", CONTENT)];

pub fn build_api_url(base_url: &str, endpoint: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base_url, endpoint)
    } else {
        format!("{}/{}", base_url, endpoint)
    }
}

/// Appends every present parameter as an encoded query pair. Absent values
/// are skipped, and no `?` is added when nothing remains.
pub fn build_api_url_with_params(
    base_url: &str,
    endpoint: &str,
    params: &[(&str, Option<String>)],
) -> Result<Url, ApiError> {
    let mut url = Url::parse(&build_api_url(base_url, endpoint))
        .into_response("failed to parse api url")?;

    let present: Vec<(&str, &str)> = params
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
        .collect();

    if !present.is_empty() {
        url.query_pairs_mut().extend_pairs(present);
    }

    Ok(url)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("http://localhost:5173/api", "/posts")]
    #[case("http://localhost:5173/api/", "/posts")]
    #[case("http://localhost:5173/api", "posts")]
    fn test_build_api_url_normalizes_slashes(
        #[case] base: &str,
        #[case] endpoint: &str,
    ) {
        assert_eq!(
            build_api_url(base, endpoint),
            "http://localhost:5173/api/posts"
        );
    }

    #[test]
    fn test_params_are_encoded_and_absent_ones_skipped() {
        // Arrange
        let params = [
            ("post_id", Some("a b&c".to_string())),
            ("private_access", None),
        ];

        // Act
        let url =
            build_api_url_with_params("https://api.example.com", POST, &params)
                .unwrap();

        // Assert
        assert_eq!(url.as_str(), "https://api.example.com/post?post_id=a+b%26c");
    }

    #[test]
    fn test_no_params_no_query() {
        let url = build_api_url_with_params(
            "https://api.example.com",
            POSTS,
            &[("private_access", None)],
        )
        .unwrap();

        assert_eq!(url.as_str(), "https://api.example.com/posts");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_relative_base_is_rejected() {
        let result = build_api_url_with_params("/api", CONTENT, &[]);

        assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
    }
}
