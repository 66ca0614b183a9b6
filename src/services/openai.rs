// src/services/openai.rs
//! Content generator adapter: article text and featured-image generation.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Attempts per generation call before giving up
const GENERATION_ATTEMPTS: u32 = 2;

/// Fixed delay between attempts
const RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("all generation attempts exhausted")]
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
        }
    }
}

/// Article tone presets recognized by the prompt builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleTone {
    Formal,
    Casual,
    Seo,
    Storytelling,
    /// Fallback for unrecognized style tags
    Neutral,
}

impl ArticleTone {
    /// Map a user-supplied style tag to a tone, case-insensitively.
    /// Anything unrecognized falls back to a neutral directive.
    pub fn from_tag(style: &str) -> Self {
        match style.to_lowercase().as_str() {
            "formal" => ArticleTone::Formal,
            "casual" => ArticleTone::Casual,
            "seo" => ArticleTone::Seo,
            "storytelling" => ArticleTone::Storytelling,
            _ => ArticleTone::Neutral,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            ArticleTone::Formal => {
                "Use a professional, structured, and objective tone suitable for corporate or academic audiences."
            }
            ArticleTone::Casual => {
                "Use a friendly, conversational tone with simple words and relatable examples."
            }
            ArticleTone::Seo => {
                "Optimize for SEO with keyword-rich headings, meta description hints, and short, scannable paragraphs. Avoid fluff and focus on ranking content."
            }
            ArticleTone::Storytelling => {
                "Use a storytelling tone with engaging hooks, relatable characters, and a clear narrative flow."
            }
            ArticleTone::Neutral => "Use a balanced and clear tone.",
        }
    }
}

/// Parsed result of a successful article generation
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GeneratedArticle {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    size: String,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

#[derive(Debug)]
pub struct OpenAiService {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiService {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Generate an SEO article for a keyword in the requested style.
    ///
    /// Retries up to [`GENERATION_ATTEMPTS`] times with a fixed delay; if no
    /// attempt yields parseable JSON with a non-empty title and body, the
    /// call reports `OpenAiError::Exhausted` so the caller can respond with
    /// a clean user-facing error.
    pub async fn generate_article(
        &self,
        keyword: &str,
        style: &str,
    ) -> Result<GeneratedArticle, OpenAiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(OpenAiError::NotConfigured)?;

        let prompt = build_article_prompt(keyword, style);

        for attempt in 1..=GENERATION_ATTEMPTS {
            match self.request_completion(api_key, &prompt).await {
                Ok(raw) => match parse_article(&raw) {
                    Some(article) => {
                        info!(keyword = %keyword, style = %style, "article generation completed");
                        return Ok(article);
                    }
                    None => {
                        warn!(
                            attempt = attempt,
                            keyword = %keyword,
                            "model output was not parseable article JSON"
                        );
                    }
                },
                Err(e) => {
                    warn!(attempt = attempt, error = %e, "article generation request failed");
                }
            }

            if attempt < GENERATION_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        Err(OpenAiError::Exhausted)
    }

    /// Generate a base64-encoded featured image for a prompt.
    ///
    /// Best-effort: image generation failure degrades to `None` and must
    /// never abort the surrounding publish workflow.
    pub async fn generate_image(&self, prompt: &str) -> Option<String> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) => key,
            None => {
                warn!("image generation skipped: API key not configured");
                return None;
            }
        };

        for attempt in 1..=GENERATION_ATTEMPTS {
            if let Some(b64) = degrade_to_none(self.request_image(api_key, prompt).await) {
                info!("image generation completed");
                return Some(b64);
            }

            if attempt < GENERATION_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        None
    }

    async fn request_completion(&self, api_key: &str, prompt: &str) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
            max_tokens: 4000,
        };

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(model = %self.config.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenAiError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAiError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "chat completion request failed");
            return Err(OpenAiError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| OpenAiError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| OpenAiError::InvalidResponse("No choices in response".to_string()))
    }

    async fn request_image(&self, api_key: &str, prompt: &str) -> Result<String, OpenAiError> {
        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            size: "1024x1024".to_string(),
        };

        let url = format!(
            "{}/v1/images/generations",
            self.config.base_url.trim_end_matches('/')
        );

        debug!(model = %self.config.image_model, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OpenAiError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAiError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "image generation request failed");
            return Err(OpenAiError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let image_response = response
            .json::<ImageGenerationResponse>()
            .await
            .map_err(|e| OpenAiError::InvalidResponse(e.to_string()))?;

        image_response
            .data
            .first()
            .and_then(|d| d.b64_json.clone())
            .ok_or_else(|| OpenAiError::InvalidResponse("No image data in response".to_string()))
    }
}

/// Downgrade an image-generation failure to "no image".
///
/// This is the one place in the pipeline where a failure is deliberately
/// absorbed instead of propagated: losing the image must not cost the user
/// the article.
fn degrade_to_none<T>(result: Result<T, OpenAiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "image generation failed, continuing without image");
            None
        }
    }
}

/// Build the article generation prompt for a keyword and style tag
fn build_article_prompt(keyword: &str, style: &str) -> String {
    let tone = ArticleTone::from_tag(style);

    format!(
        r#"You are an expert SEO blog writer and WordPress content specialist.

Write a complete article for the topic: "{keyword}".

Writing Style: {style}
Tone Instructions: {tone_directive}
Structure: At least 1300 words, with <h2> and <h3> headings, bullet lists, a conclusion, and 5-7 FAQs.

The article must be formatted in clean HTML ready for WordPress.

Return STRICT JSON only in this format:
{{
  "title": "An SEO-friendly article title containing {keyword}",
  "content": "<HTML formatted article body>"
}}"#,
        keyword = keyword,
        style = style,
        tone_directive = tone.directive(),
    )
}

/// Pull the JSON object out of a model reply that may wrap it in prose.
///
/// Strips ASCII control characters, then takes the substring between the
/// first `{` and the last `}`. Returns the cleaned text unchanged when no
/// such pair exists.
fn extract_json_payload(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(first), Some(last)) if last > first => cleaned[first..=last].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Parse a model reply into an article, requiring non-empty title and body
fn parse_article(raw: &str) -> Option<GeneratedArticle> {
    let payload = extract_json_payload(raw);
    let article: GeneratedArticle = serde_json::from_str(&payload).ok()?;

    if article.title.trim().is_empty() || article.content.trim().is_empty() {
        return None;
    }

    Some(article)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_mapping() {
        assert_eq!(ArticleTone::from_tag("formal"), ArticleTone::Formal);
        assert_eq!(ArticleTone::from_tag("casual"), ArticleTone::Casual);
        assert_eq!(ArticleTone::from_tag("seo"), ArticleTone::Seo);
        assert_eq!(
            ArticleTone::from_tag("storytelling"),
            ArticleTone::Storytelling
        );
        // Case-insensitive
        assert_eq!(ArticleTone::from_tag("SEO"), ArticleTone::Seo);
        // Unrecognized tags fall back to neutral
        assert_eq!(ArticleTone::from_tag("pirate"), ArticleTone::Neutral);
        assert_eq!(ArticleTone::from_tag(""), ArticleTone::Neutral);
    }

    #[test]
    fn test_each_tone_has_distinct_directive() {
        let directives = [
            ArticleTone::Formal.directive(),
            ArticleTone::Casual.directive(),
            ArticleTone::Seo.directive(),
            ArticleTone::Storytelling.directive(),
            ArticleTone::Neutral.directive(),
        ];
        for (i, a) in directives.iter().enumerate() {
            for b in directives.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_extract_json_payload_strips_wrapping() {
        let raw = "Sure! Here is your article:\n```json\n{\"title\": \"T\", \"content\": \"B\"}\n```\nEnjoy!";
        let payload = extract_json_payload(raw);
        assert!(payload.starts_with('{'));
        assert!(payload.ends_with('}'));
        assert!(serde_json::from_str::<serde_json::Value>(&payload).is_ok());
    }

    #[test]
    fn test_extract_json_payload_strips_control_chars() {
        let raw = "{\"title\": \"A\u{0000}B\", \"content\": \"ok\"}";
        let payload = extract_json_payload(raw);
        assert!(!payload.contains('\u{0000}'));
        assert!(serde_json::from_str::<serde_json::Value>(&payload).is_ok());
    }

    #[test]
    fn test_parse_article_accepts_wrapped_json() {
        let raw = "Here you go: {\"title\": \"Best Coffee Makers\", \"content\": \"<h2>Intro</h2>\"} hope it helps";
        let article = parse_article(raw).unwrap();
        assert_eq!(article.title, "Best Coffee Makers");
        assert_eq!(article.content, "<h2>Intro</h2>");
    }

    #[test]
    fn test_parse_article_rejects_empty_fields() {
        assert!(parse_article("{\"title\": \"\", \"content\": \"body\"}").is_none());
        assert!(parse_article("{\"title\": \"t\", \"content\": \"  \"}").is_none());
        assert!(parse_article("no json here at all").is_none());
    }

    #[test]
    fn test_degrade_to_none() {
        assert_eq!(degrade_to_none(Ok("b64".to_string())), Some("b64".to_string()));
        let failed: Result<String, OpenAiError> =
            Err(OpenAiError::RequestFailed("boom".to_string()));
        assert_eq!(degrade_to_none(failed), None);
    }

    #[test]
    fn test_prompt_carries_keyword_and_directive() {
        let prompt = build_article_prompt("best coffee makers", "seo");
        assert!(prompt.contains("best coffee makers"));
        assert!(prompt.contains(ArticleTone::Seo.directive()));
        assert!(prompt.contains("STRICT JSON"));
    }
}
