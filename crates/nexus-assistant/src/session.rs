//! Chat transcript for the assistant app

use crate::{GenerativeService, GeneratedImage, NETWORK_ERROR_REPLY};

const GREETING: &str = "Hello. I am Gemini 3.0 Pro. How can I assist you on this legacy device?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    fn user(text: &str) -> Self {
        Self {
            role: Role::User,
            text: text.to_string(),
        }
    }

    fn assistant(text: &str) -> Self {
        Self {
            role: Role::Assistant,
            text: text.to_string(),
        }
    }
}

/// Ask for a text reply, turning any failure into the inline error text
pub async fn respond<S: GenerativeService>(service: &S, prompt: &str) -> String {
    match service.generate_text(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Assistant request failed: {}", e);
            NETWORK_ERROR_REPLY.to_string()
        }
    }
}

/// Create an image, `None` on any failure
pub async fn create_image<S: GenerativeService>(
    service: &S,
    prompt: &str,
) -> Option<GeneratedImage> {
    match service.generate_image(prompt).await {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!("Image generation failed: {}", e);
            None
        }
    }
}

/// Edit an image, `None` on any failure
pub async fn edit_image<S: GenerativeService>(
    service: &S,
    image: &GeneratedImage,
    prompt: &str,
) -> Option<GeneratedImage> {
    match service.edit_image(image, prompt).await {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!("Image edit failed: {}", e);
            None
        }
    }
}

/// Conversation with the assistant, seeded with a greeting.
///
/// The launcher drives it in two halves ([`begin`](Self::begin) then
/// [`finish`](Self::finish)) so the request can run on a separate task;
/// [`ask`](Self::ask) does both in place.
pub struct AssistantSession<S> {
    service: S,
    transcript: Vec<Message>,
    waiting: bool,
}

impl<S: GenerativeService> AssistantSession<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            transcript: vec![Message::assistant(GREETING)],
            waiting: false,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// A prompt has been sent and its reply is outstanding
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Record a user prompt. Returns the prompt to send, or `None` if it is
    /// blank or a reply is still outstanding.
    pub fn begin(&mut self, prompt: &str) -> Option<String> {
        if self.waiting || prompt.trim().is_empty() {
            return None;
        }
        self.transcript.push(Message::user(prompt));
        self.waiting = true;
        Some(prompt.to_string())
    }

    /// Record the reply to the outstanding prompt
    pub fn finish(&mut self, reply: &str) {
        if !self.waiting {
            tracing::debug!("Dropping reply with no outstanding prompt");
            return;
        }
        self.transcript.push(Message::assistant(reply));
        self.waiting = false;
    }

    /// Send a prompt and wait for the reply. Never fails.
    pub async fn ask(&mut self, prompt: &str) -> Option<&Message> {
        let prompt = self.begin(prompt)?;
        let reply = respond(&self.service, &prompt).await;
        self.finish(&reply);
        self.transcript.last()
    }

    pub async fn create_image(&self, prompt: &str) -> Option<GeneratedImage> {
        create_image(&self.service, prompt).await
    }

    pub async fn edit_image(&self, image: &GeneratedImage, prompt: &str) -> Option<GeneratedImage> {
        edit_image(&self.service, image, prompt).await
    }
}
