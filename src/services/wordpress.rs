// src/services/wordpress.rs
//! Publish adapter for the WordPress REST API.
//!
//! Publishing is two sequential calls against `/wp-json/wp/v2`: an optional
//! media upload for the featured image, then the post creation. A failed
//! media upload is fatal to the whole publish call so a post is never
//! created with a half-uploaded image reference.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

/// JPEG quality used for featured images
const FEATURED_IMAGE_QUALITY: u8 = 72;

#[derive(Debug, thiserror::Error)]
pub enum WordPressError {
    #[error("featured image is not a decodable image")]
    InvalidImage,

    #[error("media upload failed with HTTP {status}: {body}")]
    MediaUpload { status: u16, body: String },

    #[error("post creation failed with HTTP {status}: {body}")]
    PostCreation { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    MalformedResponse(String),
}

#[derive(Debug)]
pub struct WordPressService {
    client: Client,
}

impl WordPressService {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Publish a post (and optional featured image) to a WordPress site.
    ///
    /// `wp_url` is the site root (e.g. `https://example.com`); the adapter
    /// appends the REST path itself. Authentication is HTTP Basic with the
    /// site username and decrypted application password. Returns the
    /// canonical URL of the created post.
    pub async fn publish(
        &self,
        wp_url: &str,
        wp_user: &str,
        app_pass: &str,
        title: &str,
        content_html: &str,
        image_b64: Option<&str>,
    ) -> Result<String, WordPressError> {
        let base_url = format!("{}/wp-json/wp/v2", wp_url.trim_end_matches('/'));

        let featured_media_id = match image_b64 {
            Some(b64) => Some(
                self.upload_media(&base_url, wp_user, app_pass, title, b64)
                    .await?,
            ),
            None => None,
        };

        self.create_post(
            &base_url,
            wp_user,
            app_pass,
            title,
            content_html,
            featured_media_id,
        )
        .await
    }

    /// Upload the featured image and return the WordPress media id
    async fn upload_media(
        &self,
        base_url: &str,
        wp_user: &str,
        app_pass: &str,
        title: &str,
        image_b64: &str,
    ) -> Result<i64, WordPressError> {
        let jpeg_bytes = compress_to_jpeg(image_b64, FEATURED_IMAGE_QUALITY)?;
        let filename = media_filename(title);

        debug!(filename = %filename, bytes = jpeg_bytes.len(), "uploading featured image");

        let response = self
            .client
            .post(format!("{}/media", base_url))
            .header(
                "Content-Disposition",
                format!("attachment; filename={}", filename),
            )
            .header("Content-Type", "image/jpeg")
            .basic_auth(wp_user, Some(app_pass))
            .body(jpeg_bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "media upload rejected");
            return Err(WordPressError::MediaUpload {
                status: status.as_u16(),
                body,
            });
        }

        let media: serde_json::Value = response.json().await?;
        media
            .get("id")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| WordPressError::MalformedResponse("media response has no id".to_string()))
    }

    async fn create_post(
        &self,
        base_url: &str,
        wp_user: &str,
        app_pass: &str,
        title: &str,
        content_html: &str,
        featured_media_id: Option<i64>,
    ) -> Result<String, WordPressError> {
        let mut payload = json!({
            "title": title,
            "content": content_html,
            "status": "publish",
        });
        if let Some(media_id) = featured_media_id {
            payload["featured_media"] = json!(media_id);
        }

        let response = self
            .client
            .post(format!("{}/posts", base_url))
            .header("Content-Type", "application/json")
            .basic_auth(wp_user, Some(app_pass))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "post creation rejected");
            return Err(WordPressError::PostCreation {
                status: status.as_u16(),
                body,
            });
        }

        let post: serde_json::Value = response.json().await?;
        let url = post
            .get("link")
            .and_then(|v| v.as_str())
            .or_else(|| {
                post.get("guid")
                    .and_then(|g| g.get("rendered"))
                    .and_then(|v| v.as_str())
            })
            .ok_or_else(|| {
                WordPressError::MalformedResponse("post response has no link or guid".to_string())
            })?
            .to_string();

        info!(url = %url, "post published");

        Ok(url)
    }
}

impl Default for WordPressService {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a base64 image and re-encode it as a baseline JPEG
fn compress_to_jpeg(image_b64: &str, quality: u8) -> Result<Vec<u8>, WordPressError> {
    let raw = BASE64
        .decode(image_b64.as_bytes())
        .map_err(|_| WordPressError::InvalidImage)?;

    let img = image::load_from_memory(&raw).map_err(|_| WordPressError::InvalidImage)?;
    let rgb = img.to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|_| WordPressError::InvalidImage)?;

    Ok(out)
}

/// Derive a short media filename from a post title
fn media_filename(title: &str) -> String {
    let mut slug = String::new();
    let mut last_was_dash = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    slug.truncate(30);
    format!("{}.jpg", slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        BASE64.encode(buf.into_inner())
    }

    #[test]
    fn test_media_filename_slugifies_title() {
        assert_eq!(media_filename("Best Coffee Makers"), "best-coffee-makers.jpg");
        assert_eq!(media_filename("Hello,  World!"), "hello-world-.jpg");
    }

    #[test]
    fn test_media_filename_truncates_long_titles() {
        let long = "a very long title that keeps going well past the limit";
        let name = media_filename(long);
        assert!(name.ends_with(".jpg"));
        assert!(name.len() <= 30 + 4);
    }

    #[test]
    fn test_compress_to_jpeg_round_trip() {
        let b64 = png_base64(16, 16);
        let jpeg = compress_to_jpeg(&b64, FEATURED_IMAGE_QUALITY).unwrap();

        // Output must be a decodable JPEG of the same dimensions
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 16);
        assert_eq!(
            image::guess_format(&jpeg).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_compress_rejects_non_image_payload() {
        let not_an_image = BASE64.encode(b"just some text");
        assert!(matches!(
            compress_to_jpeg(&not_an_image, 72),
            Err(WordPressError::InvalidImage)
        ));
        assert!(matches!(
            compress_to_jpeg("%%% not base64 %%%", 72),
            Err(WordPressError::InvalidImage)
        ));
    }
}
