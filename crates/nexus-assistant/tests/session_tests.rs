//! Assistant session behaviour against scripted services

use nexus_assistant::{
    AssistantError, AssistantSession, GenerativeService, GeneratedImage, NETWORK_ERROR_REPLY,
    Role, respond,
};
use std::sync::Mutex;

/// Echoes prompts and records what it was asked
#[derive(Default)]
struct EchoService {
    prompts: Mutex<Vec<String>>,
}

impl GenerativeService for EchoService {
    async fn generate_text(&self, prompt: &str) -> Result<String, AssistantError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        Ok(format!("echo: {}", prompt))
    }

    async fn generate_image(&self, prompt: &str) -> Result<Option<GeneratedImage>, AssistantError> {
        Ok(Some(GeneratedImage::new("image/png", prompt.as_bytes().to_vec())))
    }

    async fn edit_image(
        &self,
        image: &GeneratedImage,
        prompt: &str,
    ) -> Result<Option<GeneratedImage>, AssistantError> {
        let mut bytes = image.bytes.clone();
        bytes.extend_from_slice(prompt.as_bytes());
        Ok(Some(GeneratedImage::new(image.mime_type.clone(), bytes)))
    }
}

/// Fails every request
struct OfflineService;

impl GenerativeService for OfflineService {
    async fn generate_text(&self, _prompt: &str) -> Result<String, AssistantError> {
        Err(AssistantError::Service {
            status: 503,
            message: "unavailable".into(),
        })
    }

    async fn generate_image(
        &self,
        _prompt: &str,
    ) -> Result<Option<GeneratedImage>, AssistantError> {
        Err(AssistantError::MissingApiKey("GEMINI_API_KEY".into()))
    }

    async fn edit_image(
        &self,
        _image: &GeneratedImage,
        _prompt: &str,
    ) -> Result<Option<GeneratedImage>, AssistantError> {
        Err(AssistantError::Malformed("no candidates".into()))
    }
}

#[tokio::test]
async fn test_session_starts_with_greeting() {
    let session = AssistantSession::new(EchoService::default());
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript()[0].role, Role::Assistant);
    assert!(!session.is_waiting());
}

#[tokio::test]
async fn test_ask_appends_prompt_and_reply() {
    let mut session = AssistantSession::new(EchoService::default());

    let reply = session.ask("What is Gingerbread?").await.cloned().unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert_eq!(reply.text, "echo: What is Gingerbread?");

    let roles: Vec<_> = session.transcript().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
}

#[tokio::test]
async fn test_blank_prompt_is_ignored() {
    let mut session = AssistantSession::new(EchoService::default());
    assert!(session.ask("   ").await.is_none());
    assert_eq!(session.transcript().len(), 1);
    assert!(session.service().prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_error_becomes_inline_text() {
    let mut session = AssistantSession::new(OfflineService);
    let reply = session.ask("hello?").await.cloned().unwrap();
    assert_eq!(reply.text, NETWORK_ERROR_REPLY);
    assert!(!session.is_waiting());

    assert_eq!(respond(&OfflineService, "again").await, NETWORK_ERROR_REPLY);
}

#[tokio::test]
async fn test_split_request_flow() {
    let mut session = AssistantSession::new(EchoService::default());

    let prompt = session.begin("first").unwrap();
    assert!(session.is_waiting());
    // A second prompt while waiting is refused
    assert!(session.begin("second").is_none());

    let reply = respond(session.service(), &prompt).await;
    session.finish(&reply);
    assert_eq!(session.transcript().last().unwrap().text, "echo: first");

    // Stray replies are dropped
    session.finish("late");
    assert_eq!(session.transcript().len(), 3);
}

#[tokio::test]
async fn test_images() {
    let session = AssistantSession::new(EchoService::default());
    let image = session.create_image("android").await.unwrap();
    assert_eq!(image.bytes, b"android");

    let edited = session.edit_image(&image, " green").await.unwrap();
    assert_eq!(edited.bytes, b"android green");
    assert_eq!(edited.mime_type, "image/png");
}

#[tokio::test]
async fn test_image_failures_yield_none() {
    let session = AssistantSession::new(OfflineService);
    assert!(session.create_image("x").await.is_none());

    let image = GeneratedImage::new("image/png", vec![1, 2, 3]);
    assert!(session.edit_image(&image, "x").await.is_none());
}
