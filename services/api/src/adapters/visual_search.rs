//! services/api/src/adapters/visual_search.rs
//!
//! This module contains the adapter for the image-search provider.
//! It implements the `VisualSuggestionService` port from the `core` crate.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use eduvisual_core::{
    domain::{ImageCandidate, ImageProvenance},
    ports::{PortError, PortResult, Provenance, TopicVisuals, VisualSuggestionService},
};

const IMAGES_PER_TOPIC: usize = 3;

//=========================================================================================
// Deterministic Placeholder Images
//=========================================================================================

/// Exactly three deterministic placeholder images for a topic, with the
/// topic name URL-encoded into the placeholder URLs.
pub fn placeholder_images(topic: &str) -> Vec<ImageCandidate> {
    let encoded = percent_encode(topic);
    ["Illustration", "Diagram", "Chart"]
        .iter()
        .enumerate()
        .map(|(i, label)| ImageCandidate {
            id: format!("mock-{}-{}", topic, i + 1),
            url: format!("https://via.placeholder.com/800x600?text={}+{}", encoded, i + 1),
            thumb_url: format!("https://via.placeholder.com/200x150?text={}+{}", encoded, i + 1),
            description: format!("{} for {}", label, topic),
            photographer: "Placeholder".to_string(),
            photographer_url: "#".to_string(),
            source_url: "#".to_string(),
            provenance: ImageProvenance::Placeholder,
        })
        .collect()
}

/// Minimal query-string percent-encoding: unreserved ASCII passes through,
/// spaces become `+`, everything else is `%XX`-escaped per byte.
fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

//=========================================================================================
// Placeholder Adapter (used when no API key is configured)
//=========================================================================================

/// A `VisualSuggestionService` that always answers with placeholder images.
pub struct PlaceholderVisualAdapter;

#[async_trait]
impl VisualSuggestionService for PlaceholderVisualAdapter {
    async fn suggest(&self, topics: &[String]) -> PortResult<Vec<TopicVisuals>> {
        Ok(topics
            .iter()
            .map(|topic| TopicVisuals {
                topic: topic.clone(),
                images: placeholder_images(topic),
                provenance: Provenance::Mock,
            })
            .collect())
    }
}

//=========================================================================================
// Unsplash Response Shapes
//=========================================================================================

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    id: String,
    description: Option<String>,
    alt_description: Option<String>,
    urls: PhotoUrls,
    user: PhotoUser,
    links: PhotoLinks,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
    thumb: String,
}

#[derive(Deserialize)]
struct PhotoUser {
    name: String,
    links: UserLinks,
}

#[derive(Deserialize)]
struct UserLinks {
    html: String,
}

#[derive(Deserialize)]
struct PhotoLinks {
    html: String,
}

//=========================================================================================
// The Live Adapter Struct
//=========================================================================================

/// An adapter that implements `VisualSuggestionService` against the Unsplash
/// search API. Each topic degrades independently: a failed search for one
/// topic yields its placeholder images and never aborts the others.
#[derive(Clone)]
pub struct UnsplashVisualAdapter {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl UnsplashVisualAdapter {
    /// Creates a new `UnsplashVisualAdapter`.
    pub fn new(http: reqwest::Client, api_base: String, api_key: String) -> Self {
        Self {
            http,
            api_base,
            api_key,
        }
    }

    async fn search_topic(&self, topic: &str) -> PortResult<Vec<ImageCandidate>> {
        let per_page = IMAGES_PER_TOPIC.to_string();
        let response = self
            .http
            .get(format!("{}/search/photos", self.api_base))
            .query(&[
                ("query", topic),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
            ])
            .header("Authorization", format!("Client-ID {}", self.api_key))
            .send()
            .await
            .map_err(|e| PortError::Upstream(format!("Unsplash API error: {}", e)))?
            .error_for_status()
            .map_err(|e| PortError::Upstream(format!("Unsplash API error: {}", e)))?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| PortError::MalformedResponse(format!("Unsplash API error: {}", e)))?;

        Ok(search
            .results
            .into_iter()
            .map(|photo| ImageCandidate {
                description: photo
                    .description
                    .or(photo.alt_description)
                    .unwrap_or_else(|| topic.to_string()),
                id: photo.id,
                url: photo.urls.regular,
                thumb_url: photo.urls.thumb,
                photographer: photo.user.name,
                photographer_url: photo.user.links.html,
                source_url: photo.links.html,
                provenance: ImageProvenance::Live,
            })
            .collect())
    }
}

//=========================================================================================
// `VisualSuggestionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl VisualSuggestionService for UnsplashVisualAdapter {
    async fn suggest(&self, topics: &[String]) -> PortResult<Vec<TopicVisuals>> {
        let mut visuals = Vec::with_capacity(topics.len());

        for topic in topics {
            match self.search_topic(topic).await {
                Ok(images) => visuals.push(TopicVisuals {
                    topic: topic.clone(),
                    images,
                    provenance: Provenance::Live,
                }),
                Err(e) => {
                    warn!("image search failed for topic \"{}\": {}", topic, e);
                    visuals.push(TopicVisuals {
                        topic: topic.clone(),
                        images: placeholder_images(topic),
                        provenance: Provenance::Mock,
                    });
                }
            }
        }

        Ok(visuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_exactly_three_per_topic() {
        let images = placeholder_images("Cell Biology");
        assert_eq!(images.len(), 3);
        for image in &images {
            assert_eq!(image.provenance, ImageProvenance::Placeholder);
            assert!(image.url.contains("Cell+Biology"));
        }
    }

    #[test]
    fn placeholder_ids_are_stable() {
        let a = placeholder_images("Physics");
        let b = placeholder_images("Physics");
        assert_eq!(a, b);
        assert_eq!(a[0].id, "mock-Physics-1");
        assert_eq!(a[2].id, "mock-Physics-3");
    }

    #[test]
    fn percent_encode_handles_reserved_and_unicode() {
        assert_eq!(percent_encode("cell division"), "cell+division");
        assert_eq!(percent_encode("a&b"), "a%26b");
        assert_eq!(percent_encode("café"), "caf%C3%A9");
    }

    #[tokio::test]
    async fn placeholder_adapter_covers_every_topic() {
        let topics = vec!["One".to_string(), "Two".to_string()];
        let visuals = PlaceholderVisualAdapter.suggest(&topics).await.unwrap();
        assert_eq!(visuals.len(), 2);
        assert!(visuals.iter().all(|v| v.provenance == Provenance::Mock));
        assert!(visuals.iter().all(|v| v.images.len() == 3));
    }
}
