//! Application entry builder.
//!
//! ## Usage
//!
//! Register screens, storage and the starfield before building the
//! [`Application`] handle that the rest of the UI shares.

use std::sync::Arc;

use crate::{
    application::Application,
    background::Starfield,
    config::Config,
    screen::{Screen, ScreenRegistry},
    storage::{KeyValueStore, MemoryStore},
};

/// Builder for the application and its collaborators.
pub struct EntryPoint {
    config: Config,
    registry: ScreenRegistry,
    storage: Option<Arc<dyn KeyValueStore>>,
    stars: Option<Arc<dyn Starfield>>,
}

impl EntryPoint {
    /// Creates a builder from the JSON configuration document.
    ///
    /// An invalid document is logged and replaced by the empty configuration.
    pub fn new(config_json: &str) -> Self {
        Self::from_config(Config::parse_or_default(config_json))
    }

    /// Creates a builder from an already parsed configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            registry: ScreenRegistry::new(),
            storage: None,
            stars: None,
        }
    }

    /// Registers a screen under its configured id.
    pub fn screen(mut self, id: impl Into<String>, screen: impl Screen + 'static) -> Self {
        self.registry.insert(id, screen);
        self
    }

    /// Replaces the screen registry.
    pub fn registry(mut self, registry: ScreenRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the persistence backend. Defaults to an in-memory store.
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the background starfield.
    pub fn starfield(mut self, stars: Arc<dyn Starfield>) -> Self {
        self.stars = Some(stars);
        self
    }

    /// Overrides the configured demo flag.
    pub fn demo(mut self, demo: bool) -> Self {
        self.config.metadata.demo = demo;
        self
    }

    /// Builds the application handle.
    pub fn build(self) -> Arc<Application> {
        init_tracing();
        init_deadlock_detection();
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let app = Application::new(self.config, self.registry, storage);
        if let Some(stars) = self.stars {
            app.register_frame_state(stars);
        }
        Arc::new(app)
    }
}

fn init_deadlock_detection() {
    #[cfg(debug_assertions)]
    {
        use std::{sync::Once, thread, time::Duration};

        static INIT: Once = Once::new();
        INIT.call_once(|| {
            thread::spawn(|| {
                loop {
                    thread::sleep(Duration::from_secs(10));
                    let deadlocks = parking_lot::deadlock::check_deadlock();
                    if deadlocks.is_empty() {
                        continue;
                    }

                    tracing::error!("{} deadlocks detected", deadlocks.len());
                    for (idx, threads) in deadlocks.iter().enumerate() {
                        for thread in threads {
                            tracing::error!(
                                "Deadlock #{idx} thread {:?}\n{:?}",
                                thread.thread_id(),
                                thread.backtrace()
                            );
                        }
                    }
                }
            });
        });
    }
}

/// Installs the global tracing subscriber.
///
/// Honours `RUST_LOG`; otherwise only errors and this crate's info events are
/// shown. Later calls are ignored.
pub fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,launchpad_ui=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::EntryPoint;
    use crate::{
        config::fixtures,
        props::ScreenProps,
        storage::{KeyValueStore, MemoryStore},
    };

    #[test]
    fn builds_application_from_json() {
        let store = Arc::new(MemoryStore::new());
        let app = EntryPoint::new(fixtures::CONFIG_JSON)
            .screen("5b8f1ae9", |_: Option<&ScreenProps>| "welcome".to_string())
            .storage(store.clone())
            .demo(true)
            .build();
        assert!(app.demo());
        assert_eq!(app.config().screens.len(), 5);

        app.initialize();
        let screen = app
            .router()
            .screen(None)
            .expect("index in range")
            .expect("root screen registered");
        assert_eq!(screen.render(None), "welcome");

        app.set_bookmark("13e683c4", 0, None);
        assert!(store.get_item("launchpad_bookmarks").expect("read").is_none());
    }

    #[test]
    fn broken_json_yields_empty_application() {
        let app = EntryPoint::new("{").build();
        assert!(app.config().screens.is_empty());
        app.initialize();
        assert_eq!(app.router().screen_id(None), Ok(None));
    }
}
