//! Application catalog
//!
//! System apps ship installed; the rest are listed in the Market and can be
//! installed at runtime. Nothing is persisted.

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown app: {0}")]
    UnknownApp(String),
}

/// An app as listed in the drawer or the Market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDefinition {
    pub id: String,
    pub name: String,
    pub installed: bool,
    pub system: bool,
    pub version: Option<String>,
    pub size: Option<String>,
}

impl AppDefinition {
    pub fn system(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            installed: true,
            system: true,
            version: None,
            size: None,
        }
    }

    pub fn market(id: &str, name: &str, version: &str, size: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            installed: false,
            system: false,
            version: Some(version.to_string()),
            size: Some(size.to_string()),
        }
    }
}

fn default_catalog() -> Vec<AppDefinition> {
    vec![
        AppDefinition::system("phone", "Phone"),
        AppDefinition::system("contacts", "Contacts"),
        AppDefinition::system("browser", "Browser"),
        AppDefinition::system("messages", "Messaging"),
        AppDefinition::system("market", "Market"),
        AppDefinition::system("settings", "Settings"),
        AppDefinition::system("camera", "Camera"),
        AppDefinition::system("gallery", "Gallery"),
        AppDefinition::system("music", "Music"),
        AppDefinition::system("maps", "Maps"),
        AppDefinition::system("email", "Email"),
        AppDefinition::system("calendar", "Calendar"),
        AppDefinition::system("clock", "Clock"),
        AppDefinition::system("calculator", "Calculator"),
        AppDefinition::system("recorder", "Recorder"),
        AppDefinition::market("launcher44", "Launcher 4.4", "1.0.2", "4.2MB"),
        AppDefinition::market("holo", "Holo Launcher", "1.0", "2.5MB"),
        AppDefinition::market("magisk", "Magisk", "v23.0", "8.5MB"),
        AppDefinition::market("cydia", "Cydia", "1.1", "2.1MB"),
        AppDefinition::market("whatsapp", "WhatsApp", "2.11", "15MB"),
        AppDefinition::market("vk", "VK", "3.0", "12MB"),
        AppDefinition::market("gemini", "Gemini 3.0", "3.0-preview", "1.5MB"),
        AppDefinition::market("geometry", "Geometry Dash", "1.0", "48MB"),
    ]
}

#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps: Vec<AppDefinition>,
    text_entry: HashSet<String>,
}

impl AppRegistry {
    /// Default catalog with the given keyboard-bearing apps
    pub fn new<I, S>(text_entry: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_apps(default_catalog(), text_entry)
    }

    pub fn with_apps<I, S>(apps: Vec<AppDefinition>, text_entry: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps,
            text_entry: text_entry.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&AppDefinition> {
        self.apps.iter().find(|app| app.id == id)
    }

    pub fn all(&self) -> &[AppDefinition] {
        &self.apps
    }

    /// Apps shown in the drawer
    pub fn installed(&self) -> Vec<&AppDefinition> {
        self.apps.iter().filter(|app| app.installed).collect()
    }

    /// Apps offered by the Market
    pub fn available(&self) -> Vec<&AppDefinition> {
        self.apps.iter().filter(|app| !app.installed).collect()
    }

    /// Mark an app installed. Installing twice is a no-op.
    pub fn install(&mut self, id: &str) -> Result<&AppDefinition, RegistryError> {
        let app = self
            .apps
            .iter_mut()
            .find(|app| app.id == id)
            .ok_or_else(|| RegistryError::UnknownApp(id.to_string()))?;

        if !app.installed {
            app.installed = true;
            tracing::info!("Installed {} ({})", app.name, app.id);
        }
        Ok(app)
    }

    /// Whether opening the app brings up the virtual keyboard
    pub fn is_text_entry(&self, id: &str) -> bool {
        self.text_entry.contains(id)
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new(["gemini", "browser", "whatsapp", "messages", "gallery"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let registry = AppRegistry::default();
        assert_eq!(registry.all().len(), 23);
        assert_eq!(registry.installed().len(), 15);
        assert_eq!(registry.available().len(), 8);
        assert!(registry.installed().iter().all(|app| app.system));
        assert_eq!(
            registry.get("gemini").and_then(|a| a.version.as_deref()),
            Some("3.0-preview")
        );
    }

    #[test]
    fn test_install() {
        let mut registry = AppRegistry::default();
        assert!(registry.install("whatsapp").unwrap().installed);
        assert!(registry.install("whatsapp").is_ok());
        assert_eq!(registry.available().len(), 7);
        assert!(registry.installed().iter().any(|a| a.id == "whatsapp"));
    }

    #[test]
    fn test_install_unknown() {
        let mut registry = AppRegistry::default();
        assert_eq!(
            registry.install("angrybirds").unwrap_err(),
            RegistryError::UnknownApp("angrybirds".into())
        );
    }

    #[test]
    fn test_text_entry() {
        let registry = AppRegistry::default();
        assert!(registry.is_text_entry("browser"));
        assert!(!registry.is_text_entry("calculator"));
    }
}
