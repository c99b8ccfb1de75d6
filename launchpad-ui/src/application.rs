//! The application facade.
//!
//! [`Application`] owns the configuration, the [`Router`] and every state cell
//! the UI observes. It is built once at startup and shared by handle; nothing
//! in this crate keeps a global instance.
//!
//! Bookmarks and settings are persisted through a [`KeyValueStore`] as JSON.
//! Corrupt or missing data never surfaces as an error: readers fall back to a
//! synthesized default and log a warning.

use std::{collections::BTreeMap, sync::Arc};

use launchpad_shard::StateCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    assets::{AssetError, AssetLoader, AssetManifest, preload},
    background::{BackgroundHooks, BackgroundKind, ModuleUpdate, Starfield},
    config::{Config, MaterialConfig, ModuleConfig, TaskConfig},
    navigation::NavigationStore,
    router::Router,
    screen::ScreenRegistry,
    storage::{KeyValueStore, StorageError},
};

/// Storage key for saved bookmarks.
pub const BOOKMARKS_KEY: &str = "launchpad_bookmarks";
/// Storage key for settings.
pub const SETTINGS_KEY: &str = "settings";
/// Url of the first stack entry.
pub const ROOT_URL: &str = "/";

/// User-facing settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether to show the background stars.
    pub use_stars: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { use_stars: true }
    }
}

/// Bookmarked step indices, keyed by task id.
pub type SavedBookmarks = BTreeMap<String, Vec<usize>>;

/// Every state cell owned by the application.
///
/// Hosts observe these through [`StateCell::subscribe`] or by polling
/// [`StateCell::version`].
#[derive(Clone, Debug)]
pub struct AppState {
    /// Navigation history shared with the router.
    pub navigation: NavigationStore,
    /// Backdrop drawn behind the active screen.
    pub active_background: StateCell<BackgroundKind>,
    /// Module whose colors the backdrop uses.
    pub active_module: StateCell<Option<ModuleConfig>>,
    /// Bookmarks loaded at initialization.
    pub saved_bookmarks: StateCell<SavedBookmarks>,
    /// Settings loaded at initialization.
    pub settings: StateCell<Settings>,
}

impl AppState {
    fn new() -> Self {
        Self {
            navigation: NavigationStore::new(),
            active_background: StateCell::new(BackgroundKind::Welcome),
            active_module: StateCell::new(None),
            saved_bookmarks: StateCell::new(SavedBookmarks::new()),
            settings: StateCell::new(Settings::default()),
        }
    }
}

/// Receives the router's background side effects.
pub struct Backdrop {
    active_background: StateCell<BackgroundKind>,
    active_module: StateCell<Option<ModuleConfig>>,
    stars: RwLock<Option<Arc<dyn Starfield>>>,
}

impl Backdrop {
    fn new(state: &AppState) -> Self {
        Self {
            active_background: state.active_background.clone(),
            active_module: state.active_module.clone(),
            stars: RwLock::new(None),
        }
    }

    fn stars(&self) -> Option<Arc<dyn Starfield>> {
        self.stars.read().clone()
    }
}

impl BackgroundHooks for Backdrop {
    fn set_active_background(&self, background: BackgroundKind, module: ModuleUpdate) {
        self.active_background.set(background);
        match module {
            ModuleUpdate::Unchanged => {}
            ModuleUpdate::Clear => self.active_module.set(None),
            ModuleUpdate::Set(module) => self.active_module.set(Some(module)),
        }
    }

    fn update_star_opacity(&self, opacity: f32) {
        match self.stars() {
            Some(stars) => stars.update_opacity(opacity),
            None => debug!(opacity, "no starfield registered"),
        }
    }
}

/// Manages high-level state and configuration.
pub struct Application {
    config: Config,
    router: Router,
    state: AppState,
    backdrop: Arc<Backdrop>,
    storage: Arc<dyn KeyValueStore>,
}

impl Application {
    /// Create the application and bind its state to the router.
    ///
    /// The navigation stack starts empty and not ready; call
    /// [`Application::launch`] or [`Application::initialize`] to seed it.
    pub fn new(config: Config, registry: ScreenRegistry, storage: Arc<dyn KeyValueStore>) -> Self {
        let state = AppState::new();
        let backdrop = Arc::new(Backdrop::new(&state));
        let router = Router::new(config.screens.clone(), registry, backdrop.clone());
        let app = Self {
            config,
            router,
            state,
            backdrop,
            storage,
        };
        app.register_app_state();
        app
    }

    fn register_app_state(&self) {
        let navigation = &self.state.navigation;
        self.router.assign_state(
            navigation.screen_stack.clone(),
            navigation.screen_props.clone(),
            navigation.stack_index.clone(),
            navigation.previous_stack_index.clone(),
        );
    }

    /// Register the background starfield.
    pub fn register_frame_state(&self, stars: Arc<dyn Starfield>) {
        *self.backdrop.stars.write() = Some(stars);
    }

    /// The parsed configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Every state cell owned by the application.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The registered starfield, if any.
    pub fn stars(&self) -> Option<Arc<dyn Starfield>> {
        self.backdrop.stars()
    }

    /// The active background.
    pub fn active_background(&self) -> BackgroundKind {
        self.state.active_background.get()
    }

    /// The active module, or `None` on module-agnostic screens.
    pub fn active_module(&self) -> Option<ModuleConfig> {
        self.state.active_module.get()
    }

    /// Current settings.
    pub fn settings(&self) -> Settings {
        self.state.settings.get()
    }

    /// Whether persistence is disabled.
    pub fn demo(&self) -> bool {
        self.config.demo()
    }

    /// Change the active background and, unless `module` is
    /// [`ModuleUpdate::Unchanged`], the active module.
    pub fn set_active_background(&self, background: BackgroundKind, module: ModuleUpdate) {
        self.backdrop.set_active_background(background, module);
    }

    /// Load every core asset before the first screen is shown.
    pub async fn preload_core_assets(
        &self,
        loader: &dyn AssetLoader,
        manifest: &AssetManifest,
    ) -> Result<(), AssetError> {
        let count = preload(loader, manifest).await?;
        info!(count, "Core assets preloaded");
        Ok(())
    }

    /// Seed the navigation stack and load persisted state.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn initialize(&self) {
        self.state.saved_bookmarks.set(self.get_saved_bookmarks());
        self.state.settings.set(self.get_settings());
        self.state.navigation.seed(ROOT_URL);
        info!(demo = self.demo(), "Application initialized");
    }

    /// Preload assets, then initialize.
    pub async fn launch(
        &self,
        loader: &dyn AssetLoader,
        manifest: &AssetManifest,
    ) -> Result<(), AssetError> {
        self.preload_core_assets(loader, manifest).await?;
        self.initialize();
        Ok(())
    }

    /// Bookmarks from storage.
    ///
    /// Demo mode, missing data and corrupt data all yield the empty template.
    pub fn get_saved_bookmarks(&self) -> SavedBookmarks {
        if self.demo() {
            return self.bookmark_template();
        }
        self.read_json(BOOKMARKS_KEY)
            .unwrap_or_else(|| self.bookmark_template())
    }

    /// Bookmarked step indices for `task_id`, or an empty list.
    pub fn get_task_bookmarks(&self, task_id: &str) -> Vec<usize> {
        self.state
            .saved_bookmarks
            .with(|bookmarks| bookmarks.get(task_id).cloned().unwrap_or_default())
    }

    /// Add, remove or toggle the bookmark on step `index` of `task_id`.
    ///
    /// `Some(true)` adds, `Some(false)` removes, `None` toggles. Requests that
    /// match the current membership change nothing and write nothing.
    /// Before [`Application::initialize`] has loaded the stored bookmarks the
    /// request is ignored.
    pub fn set_bookmark(&self, task_id: &str, index: usize, value: Option<bool>) {
        if !self.state.navigation.is_ready() {
            debug!(task_id, index, "bookmarks not loaded, ignoring change");
            return;
        }
        let mut bookmarks = self.state.saved_bookmarks.get();
        let steps = bookmarks.entry(task_id.to_string()).or_default();
        let position = steps.iter().position(|&step| step == index);
        let bookmarked = position.is_some();
        if value == Some(bookmarked) {
            return;
        }

        match position {
            Some(position) => {
                steps.remove(position);
            }
            None => steps.push(index),
        }
        debug!(task_id, index, bookmarked = !bookmarked, "bookmark changed");

        self.state.saved_bookmarks.set(bookmarks.clone());
        if !self.demo() {
            self.write_json(BOOKMARKS_KEY, &bookmarks);
        }
    }

    /// Settings from storage, or the defaults if missing or corrupt.
    pub fn get_settings(&self) -> Settings {
        self.read_json(SETTINGS_KEY).unwrap_or_default()
    }

    /// Commit and persist new settings.
    pub fn update_settings(&self, settings: Settings) {
        self.state.settings.set(settings);
        self.write_json(SETTINGS_KEY, &settings);
    }

    /// The module and task for `task_id`.
    pub fn find_task(&self, task_id: &str) -> Option<(&ModuleConfig, &TaskConfig)> {
        self.config.find_task(task_id)
    }

    /// The material with `material_id`.
    pub fn find_material(&self, material_id: &str) -> Option<&MaterialConfig> {
        self.config.material(material_id)
    }

    fn bookmark_template(&self) -> SavedBookmarks {
        self.config
            .task_ids()
            .map(|id| (id.to_string(), Vec::new()))
            .collect()
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, backend = self.storage.name(), "Failed to read storage: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, "Discarding corrupt stored value: {err}");
                None
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|source| StorageError::Serialize {
                key: key.to_string(),
                source,
            })
            .and_then(|raw| self.storage.set_item(key, &raw));
        if let Err(err) = result {
            warn!(key, backend = self.storage.name(), "Failed to persist value: {err}");
        }
    }
}
