//! Block definitions as supplied by the host, and sources that resolve to them.
//!
//! A definition document looks like:
//!
//! ```json
//! {
//!   "test": [
//!     { "category": "flower", "items": ["rose", "tulip"] },
//!     { "category": "insect", "items": ["wasp"] }
//!   ],
//!   "splash": { "message": "Sort the words", "buttonText": "Start" },
//!   "post": { "message": "Block done" }
//! }
//! ```
//!
//! Older data files name the category field `type` and the pair `evaluations`;
//! both spellings are accepted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::LoadError;

/// One labelled side of a binary classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySet<T> {
    #[serde(alias = "type")]
    pub category: String,
    pub items: Vec<T>,
}

impl<T> CategorySet<T> {
    pub fn new(category: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            category: category.into(),
            items,
        }
    }
}

/// A message shown before or after a block, dismissed by a single button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

impl SplashConfig {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            button_text: None,
        }
    }

    pub fn with_button(mut self, label: impl Into<String>) -> Self {
        self.button_text = Some(label.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition<T> {
    /// Must hold exactly two sets; checked when the block starts.
    #[serde(alias = "evaluations")]
    pub test: Vec<CategorySet<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splash: Option<SplashConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<SplashConfig>,
}

impl<T> BlockDefinition<T> {
    pub fn new(left: CategorySet<T>, right: CategorySet<T>) -> Self {
        Self {
            test: vec![left, right],
            splash: None,
            post: None,
        }
    }

    pub fn with_splash(mut self, splash: SplashConfig) -> Self {
        self.splash = Some(splash);
        self
    }

    pub fn with_post(mut self, post: SplashConfig) -> Self {
        self.post = Some(post);
        self
    }
}

impl<T: DeserializeOwned> BlockDefinition<T> {
    /// Parse a definition; `origin` names the source in error messages.
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, LoadError> {
        serde_json::from_str(raw).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })
    }
}

/// Anything that can produce a block definition on demand.
#[async_trait]
pub trait BlockSource<T>: Send + Sync {
    async fn load(&self) -> Result<BlockDefinition<T>, LoadError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T, S> BlockSource<T> for Box<S>
where
    T: Send + Sync + 'static,
    S: BlockSource<T> + ?Sized,
{
    async fn load(&self) -> Result<BlockDefinition<T>, LoadError> {
        (**self).load().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> BlockSource<T> for BlockDefinition<T> {
    async fn load(&self) -> Result<BlockDefinition<T>, LoadError> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        let labels: Vec<&str> = self.test.iter().map(|set| set.category.as_str()).collect();
        format!("inline block [{}]", labels.join(" / "))
    }
}

/// A definition stored as a JSON file, read when the block is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T: DeserializeOwned + Send + Sync + 'static> BlockSource<T> for JsonFileSource {
    async fn load(&self) -> Result<BlockDefinition<T>, LoadError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;
        BlockDefinition::from_json_str(&raw, &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_definition() {
        let raw = r#"{
            "test": [
                { "category": "flower", "items": ["rose", "tulip"] },
                { "category": "insect", "items": ["wasp"] }
            ],
            "splash": { "message": "Sort the words", "buttonText": "Start" },
            "post": { "message": "Done" }
        }"#;
        let def: BlockDefinition<String> = BlockDefinition::from_json_str(raw, "inline").unwrap();
        assert_eq!(def.test.len(), 2);
        assert_eq!(def.test[0].items, vec!["rose", "tulip"]);
        let splash = def.splash.unwrap();
        assert_eq!(splash.button_text.as_deref(), Some("Start"));
        assert_eq!(def.post.unwrap().button_text, None);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let raw = r#"{ "evaluations": [
            { "type": "good", "items": ["joy"] },
            { "type": "bad", "items": ["agony"] }
        ] }"#;
        let def: BlockDefinition<String> = BlockDefinition::from_json_str(raw, "legacy").unwrap();
        assert_eq!(def.test[0].category, "good");
        assert_eq!(def.test[1].category, "bad");
        assert!(def.splash.is_none());
    }

    #[test]
    fn parse_error_names_origin() {
        let err = BlockDefinition::<String>::from_json_str("{ nope", "blocks/one.json").unwrap_err();
        assert!(err.to_string().contains("blocks/one.json"));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let result: Result<BlockDefinition<String>, _> = source.load().await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
