//! Core asset preloading.
//!
//! The application does not show its first screen until every module icon and
//! named graphic has loaded. Loading is delegated to an [`AssetLoader`]; the
//! requests are issued concurrently and the first failure aborts the preload.

use std::{collections::BTreeMap, io};

use futures_util::future::{BoxFuture, try_join_all};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while preloading assets.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The source does not exist.
    #[error("asset `{name}` not found at `{source_path}`")]
    Missing {
        /// Asset name.
        name: String,
        /// Source that was requested.
        source_path: String,
    },
    /// The source exists but could not be read.
    #[error("failed to load asset `{name}`: {source}")]
    Io {
        /// Asset name.
        name: String,
        /// Underlying error.
        source: io::Error,
    },
}

/// Blurred and focused icon sources for one module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleIcon {
    /// Icon shown out of focus.
    pub blur: String,
    /// Icon shown in focus.
    pub focus: String,
}

/// Every image the application needs before its first screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Module icons in module order.
    #[serde(default)]
    pub modules: Vec<ModuleIcon>,
    /// Named graphics.
    #[serde(default)]
    pub graphics: BTreeMap<String, String>,
}

/// One named load request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRequest {
    /// Name used in diagnostics.
    pub name: String,
    /// Source path or url.
    pub source: String,
}

impl AssetManifest {
    /// Expand the manifest into load requests.
    ///
    /// Module icons are named `mod{n}-blur` and `mod{n}-focus` with `n`
    /// starting at 1.
    pub fn requests(&self) -> Vec<AssetRequest> {
        let icons = self.modules.iter().enumerate().flat_map(|(index, icon)| {
            let n = index + 1;
            [
                AssetRequest {
                    name: format!("mod{n}-blur"),
                    source: icon.blur.clone(),
                },
                AssetRequest {
                    name: format!("mod{n}-focus"),
                    source: icon.focus.clone(),
                },
            ]
        });
        let graphics = self.graphics.iter().map(|(name, source)| AssetRequest {
            name: name.clone(),
            source: source.clone(),
        });
        icons.chain(graphics).collect()
    }
}

/// Loads a single asset.
pub trait AssetLoader: Send + Sync {
    /// Resolve once `source` is loaded.
    fn load<'a>(&'a self, name: &'a str, source: &'a str) -> BoxFuture<'a, Result<(), AssetError>>;
}

/// Load every asset in `manifest` concurrently and return how many loaded.
pub async fn preload(loader: &dyn AssetLoader, manifest: &AssetManifest) -> Result<usize, AssetError> {
    let requests = manifest.requests();
    try_join_all(
        requests
            .iter()
            .map(|request| loader.load(&request.name, &request.source)),
    )
    .await?;
    debug!(count = requests.len(), "core assets loaded");
    Ok(requests.len())
}

#[cfg(test)]
pub(crate) mod testing {
    use futures_util::future::BoxFuture;
    use parking_lot::Mutex;

    use super::{AssetError, AssetLoader};

    /// Loader that fails for sources containing `missing` and records names.
    #[derive(Default)]
    pub(crate) struct RecordingLoader {
        pub(crate) loaded: Mutex<Vec<String>>,
    }

    impl AssetLoader for RecordingLoader {
        fn load<'a>(&'a self, name: &'a str, source: &'a str) -> BoxFuture<'a, Result<(), AssetError>> {
            Box::pin(async move {
                if source.contains("missing") {
                    return Err(AssetError::Missing {
                        name: name.to_string(),
                        source_path: source.to_string(),
                    });
                }
                self.loaded.lock().push(name.to_string());
                Ok(())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AssetError, AssetManifest, ModuleIcon, preload, testing::RecordingLoader};

    fn manifest() -> AssetManifest {
        AssetManifest {
            modules: vec![
                ModuleIcon {
                    blur: "m1-blur.png".into(),
                    focus: "m1-focus.png".into(),
                },
                ModuleIcon {
                    blur: "m2-blur.png".into(),
                    focus: "m2-focus.png".into(),
                },
            ],
            graphics: [("logo".to_string(), "logo.svg".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn requests_name_module_icons_from_one() {
        let names: Vec<_> = manifest()
            .requests()
            .into_iter()
            .map(|request| request.name)
            .collect();
        assert_eq!(
            names,
            ["mod1-blur", "mod1-focus", "mod2-blur", "mod2-focus", "logo"]
        );
    }

    #[tokio::test]
    async fn preload_loads_everything() {
        let loader = RecordingLoader::default();
        let count = preload(&loader, &manifest()).await.expect("all assets exist");
        assert_eq!(count, 5);
        assert_eq!(loader.loaded.lock().len(), 5);
    }

    #[tokio::test]
    async fn preload_fails_on_missing_asset() {
        let mut manifest = manifest();
        manifest
            .graphics
            .insert("ghost".to_string(), "missing.png".to_string());
        let loader = RecordingLoader::default();
        let err = preload(&loader, &manifest)
            .await
            .expect_err("missing asset fails the preload");
        assert!(matches!(err, AssetError::Missing { ref name, .. } if name == "ghost"));
    }
}
