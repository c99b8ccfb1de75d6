pub mod bookmark;
pub mod screens;
pub mod settings;
pub mod walk;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Args;
use launchpad_platform::{FileStore, FsAssetLoader, LogStarfield};
use launchpad_ui::{Application, AssetManifest, Config, EntryPoint, ScreenProps, ScreenRegistry};

/// Options shared by every command.
#[derive(Args)]
pub struct AppArgs {
    /// Application configuration file
    #[arg(long, global = true, default_value = "config/application-config.json")]
    pub config: PathBuf,
    /// Directory for bookmarks and settings (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Asset manifest to preload before launching
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,
    /// Run in demo mode regardless of the configuration
    #[arg(long, global = true)]
    pub demo: bool,
}

/// A built application and what it needs to launch.
pub struct Session {
    pub app: Arc<Application>,
    pub stars: Arc<LogStarfield>,
    pub loader: FsAssetLoader,
    pub manifest: AssetManifest,
}

pub fn read_config(path: &Path) -> Result<Config> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration {}", path.display()))?;
    Config::parse(&json).with_context(|| format!("Invalid configuration {}", path.display()))
}

/// Registers a plain-text screen for every configured screen id.
fn text_screens(config: &Config) -> ScreenRegistry {
    let mut registry = ScreenRegistry::new();
    for screen in &config.screens {
        let title = screen.title.clone();
        registry.insert(screen.id.clone(), move |_: Option<&ScreenProps>| title.clone());
    }
    registry
}

pub fn open(args: &AppArgs) -> Result<Session> {
    let config = read_config(&args.config)?;
    let config_dir = args.config.parent().unwrap_or_else(|| Path::new("."));
    let loader = FsAssetLoader::new(config_dir.join(&config.metadata.files));

    let manifest = match &args.assets {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read asset manifest {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Invalid asset manifest {}", path.display()))?
        }
        None => AssetManifest::default(),
    };

    let storage = match &args.data_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::default_location(),
    };
    let stars = Arc::new(LogStarfield::new());

    let mut entry = EntryPoint::from_config(config.clone())
        .registry(text_screens(&config))
        .storage(Arc::new(storage))
        .starfield(stars.clone());
    if args.demo {
        entry = entry.demo(true);
    }

    Ok(Session {
        app: entry.build(),
        stars,
        loader,
        manifest,
    })
}
