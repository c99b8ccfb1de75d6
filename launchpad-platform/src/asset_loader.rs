//! Filesystem asset loader.

use std::{
    io,
    path::{Path, PathBuf},
};

use futures_util::future::BoxFuture;
use launchpad_ui::{AssetError, AssetLoader};
use tracing::trace;

/// Loads assets by reading them from disk relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    /// Create a loader resolving sources against `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory sources are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLoader for FsAssetLoader {
    fn load<'a>(&'a self, name: &'a str, source: &'a str) -> BoxFuture<'a, Result<(), AssetError>> {
        Box::pin(async move {
            let path = self.root.join(source);
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    trace!(name, bytes = bytes.len(), "asset loaded");
                    Ok(())
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => Err(AssetError::Missing {
                    name: name.to_string(),
                    source_path: path.display().to_string(),
                }),
                Err(err) => Err(AssetError::Io {
                    name: name.to_string(),
                    source: err,
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use launchpad_ui::{AssetError, AssetLoader};
    use tempfile::TempDir;

    use super::FsAssetLoader;

    #[tokio::test]
    async fn loads_existing_files_and_reports_missing_ones() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(dir.path().join("logo.svg"), "<svg/>").expect("write fixture");
        let loader = FsAssetLoader::new(dir.path());

        loader.load("logo", "logo.svg").await.expect("file exists");
        let err = loader
            .load("ghost", "ghost.png")
            .await
            .expect_err("file is missing");
        assert!(matches!(err, AssetError::Missing { ref name, .. } if name == "ghost"));
    }
}
