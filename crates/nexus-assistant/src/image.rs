//! Image payloads exchanged with the service

use crate::AssistantError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Decode an inline base64 payload
    pub fn from_base64(mime_type: &str, data: &str) -> Result<Self, AssistantError> {
        let bytes = BASE64
            .decode(data.trim())
            .map_err(|e| AssistantError::InvalidImage(e.to_string()))?;
        Ok(Self::new(mime_type, bytes))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL
    pub fn from_data_url(url: &str) -> Result<Self, AssistantError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| AssistantError::InvalidImage("missing data: scheme".into()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| AssistantError::InvalidImage("not a base64 data URL".into()))?;
        if mime_type.is_empty() {
            return Err(AssistantError::InvalidImage("missing mime type".into()));
        }
        Self::from_base64(mime_type, data)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Short description for places that cannot show pixels
    pub fn summary(&self) -> String {
        format!("{} image, {:.1} KB", self.mime_type, self.len() as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url() {
        let image = GeneratedImage::from_data_url("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn test_rejects_bad_urls() {
        for url in [
            "image/png;base64,AAAA",
            "data:image/png,AAAA",
            "data:;base64,AAAA",
            "data:image/png;base64,@@@",
        ] {
            assert!(
                matches!(
                    GeneratedImage::from_data_url(url),
                    Err(AssistantError::InvalidImage(_))
                ),
                "accepted {}",
                url
            );
        }
    }

    #[test]
    fn test_summary() {
        let image = GeneratedImage::new("image/jpeg", vec![0; 2048]);
        assert_eq!(image.summary(), "image/jpeg image, 2.0 KB");
    }
}
