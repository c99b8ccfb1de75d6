//! Application configuration loaded once at startup.
//!
//! ## Usage
//!
//! Parse the JSON configuration with [`Config::parse`], or with
//! [`Config::parse_or_default`] when a broken file should not stop the app.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Errors raised while reading the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the schema.
    #[error("invalid application config: {0}")]
    Json(#[from] serde_json::Error),
    /// Two screens share the same url, so stack entries would be ambiguous.
    #[error("screen url `{0}` is declared more than once")]
    DuplicateScreenUrl(String),
}

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Specific data corresponding to this application.
    pub metadata: Metadata,
    /// All of the screens in the application.
    pub screens: Vec<ScreenConfig>,
    /// All of the content modules used throughout the application.
    pub modules: Vec<ModuleConfig>,
    /// Prerequisite materials referenced by tasks.
    pub materials: Vec<MaterialConfig>,
    /// Entries of the help dialog.
    pub help: Vec<HelpConfig>,
}

/// Application metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// The title of the website.
    pub title: String,
    /// Demo mode disables persistence and some interactive actions.
    pub demo: bool,
    /// Path where individual downloadable files are located.
    pub files: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: "undefined".to_string(),
            demo: false,
            files: "./files".to_string(),
        }
    }
}

/// One routable screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenConfig {
    /// Stable identifier used to look the screen up in the registry.
    pub id: String,
    /// Readable title of the screen.
    pub title: String,
    /// Lowercase, hyphenated route string stored in the navigation stack.
    pub url: String,
    /// Currently unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_types: Option<Vec<String>>,
}

/// A grouped set of onboarding tasks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Display name.
    pub title: String,
    /// Unique id.
    pub id: String,
    /// Unused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary color of the module.
    pub primary_color: String,
    /// Secondary color of the module.
    pub secondary_color: String,
    /// Color used for type drawn on top of the module colors.
    pub neutral_color: NeutralColor,
    /// Tasks belonging to this module.
    pub tasks: Vec<TaskConfig>,
}

/// Type color drawn over a module's color scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeutralColor {
    /// Black type.
    Black,
    /// White type.
    White,
}

/// One onboarding task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// Display name.
    pub title: String,
    /// Unique id, also the key of the task's bookmarks.
    pub id: String,
    /// What the user works towards during the task.
    pub description: String,
    /// Task ids that must be complete first.
    pub prerequisites: Vec<String>,
    /// Material ids needed to start the task.
    pub needed_materials: Vec<String>,
    /// Explicitly inaccessible tasks show a warning instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_construction: Option<bool>,
}

/// A prerequisite material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConfig {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Image shown for the material.
    pub image_name: String,
    /// Hover description.
    pub description: String,
}

/// One entry of the help dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpConfig {
    /// Icon name.
    pub icon: String,
    /// Heading.
    pub heading: String,
    /// Body text.
    pub text: String,
    /// Link target.
    pub link: String,
}

impl Config {
    /// Parse and validate a configuration document.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration document, falling back to the empty default.
    ///
    /// Failures are logged and never returned.
    pub fn parse_or_default(json: &str) -> Self {
        match Self::parse(json) {
            Ok(config) => config,
            Err(err) => {
                error!("Validation failed: {err}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for screen in &self.screens {
            if !seen.insert(screen.url.as_str()) {
                return Err(ConfigError::DuplicateScreenUrl(screen.url.clone()));
            }
        }
        Ok(())
    }

    /// Whether the application runs in demo mode.
    pub fn demo(&self) -> bool {
        self.metadata.demo
    }

    /// Find the screen registered under `url`.
    pub fn screen_by_url(&self, url: &str) -> Option<&ScreenConfig> {
        self.screens.iter().find(|screen| screen.url == url)
    }

    /// Find a task and the module that contains it.
    pub fn find_task(&self, task_id: &str) -> Option<(&ModuleConfig, &TaskConfig)> {
        self.modules.iter().find_map(|module| {
            module
                .tasks
                .iter()
                .find(|task| task.id == task_id)
                .map(|task| (module, task))
        })
    }

    /// Find the material with `material_id`.
    pub fn material(&self, material_id: &str) -> Option<&MaterialConfig> {
        self.materials
            .iter()
            .find(|material| material.id == material_id)
    }

    /// Ids of every task in every module, in configuration order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .flat_map(|module| module.tasks.iter().map(|task| task.id.as_str()))
    }
}
