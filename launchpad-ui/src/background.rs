//! Background and starfield side effects triggered by navigation.

use serde::{Deserialize, Serialize};

use crate::{config::ModuleConfig, props::ScreenProps};

/// Backdrop drawn behind the active screen.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// Welcome screen artwork.
    Welcome,
    /// Module-agnostic backdrop.
    #[default]
    Neutral,
    /// Tinted with the active module's colors.
    Module,
}

/// How a background change affects the active module.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ModuleUpdate {
    /// Keep whichever module is active.
    #[default]
    Unchanged,
    /// The screen is module-agnostic.
    Clear,
    /// Activate this module.
    Set(ModuleConfig),
}

/// Receives the side effects of a navigation.
///
/// Calls are fire-and-forget; nothing is returned to the router.
pub trait BackgroundHooks: Send + Sync {
    /// Change the active background and, optionally, the active module.
    fn set_active_background(&self, background: BackgroundKind, module: ModuleUpdate);

    /// Nudge the background starfield's opacity.
    fn update_star_opacity(&self, opacity: f32);
}

/// Background starfield collaborator.
pub trait Starfield: Send + Sync {
    /// Set the opacity of the star canvas.
    fn update_opacity(&self, opacity: f32);

    /// Start drawing and listening for input.
    fn attach(&self) {}

    /// Stop drawing and release listeners.
    fn detach(&self) {}
}

/// Side effects selected for one destination url.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundChange {
    /// Background to activate.
    pub background: BackgroundKind,
    /// Effect on the active module.
    pub module: ModuleUpdate,
    /// New star opacity, if it changes.
    pub star_opacity: Option<f32>,
}

impl BackgroundChange {
    /// Deliver this change to `hooks`.
    pub fn apply(self, hooks: &dyn BackgroundHooks) {
        hooks.set_active_background(self.background, self.module);
        if let Some(opacity) = self.star_opacity {
            hooks.update_star_opacity(opacity);
        }
    }
}

/// Look up the background change for a destination url.
///
/// `props` are the props passed with the navigation request. Urls outside the
/// fixed table produce no change.
pub fn background_for(url: &str, props: Option<&ScreenProps>) -> Option<BackgroundChange> {
    let change = match url {
        "welcome" => BackgroundChange {
            background: BackgroundKind::Welcome,
            module: ModuleUpdate::Clear,
            star_opacity: None,
        },
        "modules" => BackgroundChange {
            background: BackgroundKind::Neutral,
            module: ModuleUpdate::Clear,
            star_opacity: Some(0.75),
        },
        "view-module" => module_change(
            props
                .and_then(|props| props.view_module.as_ref())
                .map(|view| &view.module),
            0.5,
        ),
        "task-steps" => module_change(
            props
                .and_then(|props| props.task_step_interface.as_ref())
                .map(|steps| &steps.module),
            0.25,
        ),
        _ => return None,
    };
    Some(change)
}

fn module_change(module: Option<&ModuleConfig>, opacity: f32) -> BackgroundChange {
    match module {
        Some(module) => BackgroundChange {
            background: BackgroundKind::Module,
            module: ModuleUpdate::Set(module.clone()),
            star_opacity: Some(opacity),
        },
        None => BackgroundChange {
            background: BackgroundKind::Module,
            module: ModuleUpdate::Unchanged,
            star_opacity: None,
        },
    }
}
