//! Platform services for launchpad applications.
//!
//! ## Usage
//!
//! Hand these to [`launchpad_ui::EntryPoint`] at startup: a [`FileStore`] for
//! bookmarks and settings, an [`FsAssetLoader`] for the asset preload, and a
//! [`LogStarfield`] where no star canvas exists.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod asset_loader;
pub mod file_store;
pub mod starfield;

pub use asset_loader::FsAssetLoader;
pub use file_store::FileStore;
pub use starfield::LogStarfield;
