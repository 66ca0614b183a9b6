//! Site connectivity probe, run once at registration time.
//!
//! Registration must fail fast before a credential gets persisted, so the
//! probe does a read-only GET against the site's post-listing endpoint and
//! classifies what comes back. WordPress installations vary slightly in
//! their success shape, hence the explicit body classifier.

use reqwest::Client;
use tracing::warn;

const PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid WordPress credentials")]
    InvalidCredentials,

    #[error("site returned HTTP {0}")]
    Unreachable(u16),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response did not look like a WordPress post listing")]
    UnrecognizedResponse,
}

/// Classified body of a 2xx probe response
#[derive(Debug)]
pub enum ProbeResponse {
    ListResponse(Vec<serde_json::Value>),
    ObjectResponse(serde_json::Map<String, serde_json::Value>),
    Unparseable,
}

impl ProbeResponse {
    /// Classify a raw response body by its top-level JSON shape
    pub fn classify(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => ProbeResponse::ListResponse(items),
            Ok(serde_json::Value::Object(obj)) => ProbeResponse::ObjectResponse(obj),
            _ => ProbeResponse::Unparseable,
        }
    }

    /// Does this body plausibly come from a WordPress posts endpoint?
    ///
    /// An empty list is a valid site with no posts. A non-empty list or a
    /// single object counts only when the entry carries an `id` or `title`.
    pub fn looks_like_posts(&self) -> bool {
        match self {
            ProbeResponse::ListResponse(items) => match items.first() {
                None => true,
                Some(first) => first
                    .as_object()
                    .map(|obj| obj.contains_key("id") || obj.contains_key("title"))
                    .unwrap_or(false),
            },
            ProbeResponse::ObjectResponse(obj) => {
                obj.contains_key("id") || obj.contains_key("title")
            }
            ProbeResponse::Unparseable => false,
        }
    }
}

/// Probe a site's post-listing endpoint with the supplied credentials
pub async fn check_connection(
    client: &Client,
    wp_url: &str,
    wp_user: &str,
    app_pass: &str,
) -> Result<(), ProbeError> {
    let url = format!("{}/wp-json/wp/v2/posts", wp_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .basic_auth(wp_user, Some(app_pass))
        .timeout(PROBE_TIMEOUT)
        .send()
        .await?;

    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProbeError::InvalidCredentials);
    }

    if !status.is_success() {
        warn!(status = %status, url = %url, "site probe got non-success status");
        return Err(ProbeError::Unreachable(status.as_u16()));
    }

    let body = response.text().await?;

    if ProbeResponse::classify(&body).looks_like_posts() {
        Ok(())
    } else {
        warn!(url = %url, "site probe response was not post-shaped");
        Err(ProbeError::UnrecognizedResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_accepted() {
        assert!(ProbeResponse::classify("[]").looks_like_posts());
    }

    #[test]
    fn test_post_shaped_list_is_accepted() {
        let by_id = r#"[{"id": 12, "content": {"rendered": "<p>hi</p>"}}]"#;
        assert!(ProbeResponse::classify(by_id).looks_like_posts());

        let by_title = r#"[{"title": {"rendered": "Hello"}, "status": "publish"}]"#;
        assert!(ProbeResponse::classify(by_title).looks_like_posts());
    }

    #[test]
    fn test_non_post_list_is_rejected() {
        assert!(!ProbeResponse::classify(r#"[{"foo": "bar"}]"#).looks_like_posts());
        assert!(!ProbeResponse::classify(r#"[1, 2, 3]"#).looks_like_posts());
        assert!(!ProbeResponse::classify(r#"["strings"]"#).looks_like_posts());
    }

    #[test]
    fn test_post_shaped_object_is_accepted() {
        assert!(ProbeResponse::classify(r#"{"id": 7, "title": "t"}"#).looks_like_posts());
        assert!(ProbeResponse::classify(r#"{"title": "only title"}"#).looks_like_posts());
    }

    #[test]
    fn test_arbitrary_object_is_rejected() {
        assert!(!ProbeResponse::classify(r#"{"message": "welcome"}"#).looks_like_posts());
    }

    #[test]
    fn test_unparseable_bodies_are_rejected() {
        assert!(!ProbeResponse::classify("<html>login page</html>").looks_like_posts());
        assert!(!ProbeResponse::classify("").looks_like_posts());
        // Scalar JSON is parseable but never post-shaped
        assert!(!ProbeResponse::classify("42").looks_like_posts());
        assert!(!ProbeResponse::classify(r#""ok""#).looks_like_posts());
    }

    #[test]
    fn test_classifier_variants() {
        assert!(matches!(
            ProbeResponse::classify("[]"),
            ProbeResponse::ListResponse(_)
        ));
        assert!(matches!(
            ProbeResponse::classify("{}"),
            ProbeResponse::ObjectResponse(_)
        ));
        assert!(matches!(
            ProbeResponse::classify("not json"),
            ProbeResponse::Unparseable
        ));
    }
}
