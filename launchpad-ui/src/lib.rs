//! launchpad-ui is the navigation core of the launchpad onboarding app.
//!
//! # Routing
//!
//! Screens are addressed by url. The [`Router`] keeps its own history stack
//! rather than relying on a platform history API: navigating forward from the
//! middle of the stack discards the entries ahead of the cursor, and going back
//! only moves the cursor.
//!
//! ```
//! use launchpad_ui::{EntryPoint, ScreenProps, SetScreenOptions};
//!
//! let config = r#"{
//!     "metadata": { "title": "Demo", "demo": true, "files": "./files" },
//!     "screens": [
//!         { "id": "w", "title": "Welcome", "url": "/" },
//!         { "id": "m", "title": "Modules", "url": "modules" }
//!     ],
//!     "modules": [], "materials": [], "help": []
//! }"#;
//!
//! let app = EntryPoint::new(config)
//!     .screen("m", |_: Option<&ScreenProps>| "modules".to_string())
//!     .build();
//! app.initialize();
//!
//! app.router().set_screen(SetScreenOptions::to("modules"));
//! assert_eq!(app.router().screen_url(), Ok(Some("modules".to_string())));
//!
//! app.router().go_back(None);
//! assert_eq!(app.router().stack_index(), Some(0));
//! assert_eq!(app.router().screen_stack().map(|stack| stack.len()), Ok(2));
//! ```
//!
//! # State
//!
//! All mutable state lives in [`launchpad_shard::StateCell`]s owned by the
//! [`Application`]. Hosts subscribe to the cells (see [`AppState`]) instead of
//! re-rendering on a timer.
//!
//! # Rendering
//!
//! The [`Outlet`] turns router state into a [`RenderPlan`]: the screens to draw
//! this frame and the transition role of each.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod application;
pub mod assets;
pub mod background;
pub mod config;
pub mod entry_point;
pub mod navigation;
pub mod outlet;
pub mod props;
pub mod router;
pub mod screen;
pub mod storage;
pub mod transition;

pub use launchpad_shard;

pub use crate::{
    application::{AppState, Application, Backdrop, SavedBookmarks, Settings},
    assets::{AssetError, AssetLoader, AssetManifest, AssetRequest, ModuleIcon},
    background::{BackgroundHooks, BackgroundKind, ModuleUpdate, Starfield},
    config::{Config, ConfigError, ModuleConfig, ScreenConfig, TaskConfig},
    entry_point::{EntryPoint, init_tracing},
    navigation::NavigationStore,
    outlet::{LoadingView, Outlet, PlannedScreen, RenderPlan, RenderState},
    props::ScreenProps,
    router::{Router, RouterError, SetScreenOptions, Travel},
    screen::{Screen, ScreenRegistry},
    storage::{KeyValueStore, MemoryStore, StorageError},
    transition::{Direction, ScreenType, TransitionState},
};
