//! Generative assistant for the Nexus apps
//!
//! The assistant app chats through [`AssistantSession`], the gallery creates
//! and edits images through the same [`GenerativeService`]. [`GeminiClient`]
//! is the HTTP implementation; tests substitute their own service.

mod client;
mod image;
mod session;

use std::future::Future;
use thiserror::Error;

pub use client::GeminiClient;
pub use image::GeneratedImage;
pub use session::{AssistantSession, Message, Role, create_image, edit_image, respond};

/// Text shown when a reply arrives without any text parts
pub const EMPTY_REPLY: &str = "No response received.";

/// Text shown in place of a reply when the service fails
pub const NETWORK_ERROR_REPLY: &str =
    "Error connecting to the assistant network. Please check your connection.";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("No API key configured (set {0})")]
    MissingApiKey(String),

    #[error("Service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Text and image generation backend
pub trait GenerativeService {
    /// Complete a prompt with text
    fn generate_text(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Create an image from a prompt. `Ok(None)` if the reply held no image.
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<Option<GeneratedImage>, AssistantError>> + Send;

    /// Edit an existing image following a prompt
    fn edit_image(
        &self,
        image: &GeneratedImage,
        prompt: &str,
    ) -> impl Future<Output = Result<Option<GeneratedImage>, AssistantError>> + Send;
}
