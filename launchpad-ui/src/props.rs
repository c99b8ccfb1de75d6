//! Per-screen property bags stored alongside the navigation stack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    config::{ModuleConfig, TaskConfig},
    transition::{ScreenType, TransitionState},
};

/// Any data that could be consumed by any screen.
///
/// Every field is optional. [`ScreenProps::merge`] overlays the fields present
/// in another bag and keeps the rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenProps {
    /// Written by the outlet to tell a screen its role in the running transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionProps>,
    /// Bounds of elements that animate across screens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_rects: Option<BTreeMap<String, Rect>>,
    /// Props consumed only by the modules screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModulesProps>,
    /// Props consumed only by the view-module screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_module: Option<ViewModuleProps>,
    /// Props consumed only by the task step interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_step_interface: Option<TaskStepInterfaceProps>,
}

impl ScreenProps {
    /// Shallow merge: every top-level field set in `overlay` replaces ours.
    pub fn merge(&mut self, overlay: ScreenProps) {
        let ScreenProps {
            transition,
            element_rects,
            modules,
            view_module,
            task_step_interface,
        } = overlay;
        if transition.is_some() {
            self.transition = transition;
        }
        if element_rects.is_some() {
            self.element_rects = element_rects;
        }
        if modules.is_some() {
            self.modules = modules;
        }
        if view_module.is_some() {
            self.view_module = view_module;
        }
        if task_step_interface.is_some() {
            self.task_step_interface = task_step_interface;
        }
    }

    /// Return a copy of `base` (or an empty bag) with `overlay` merged in.
    pub fn merged(base: Option<&ScreenProps>, overlay: ScreenProps) -> ScreenProps {
        let mut merged = base.cloned().unwrap_or_default();
        merged.merge(overlay);
        merged
    }

    /// The module a screen with these props belongs to, if any.
    pub fn module(&self) -> Option<&ModuleConfig> {
        self.view_module
            .as_ref()
            .map(|props| &props.module)
            .or_else(|| self.task_step_interface.as_ref().map(|props| &props.module))
    }
}

/// Transition information injected by the outlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionProps {
    /// Whether the screen is entering, leaving or idle.
    pub transition_state: TransitionState,
    /// Whether the screen is the current, previous or a lateral copy.
    pub screen_type: ScreenType,
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Modules screen state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesProps {
    /// Scroll offset of the module list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_amount: Option<f64>,
    /// Index of the module highlighted on return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_module: Option<usize>,
}

/// View-module screen state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModuleProps {
    /// The module being viewed.
    #[serde(rename = "mod")]
    pub module: ModuleConfig,
    /// Scroll offset of the task list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_amount: Option<f64>,
    /// Indices of tasks whose details are expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preopened_tasks: Option<Vec<usize>>,
    /// Index of the task launched from this screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launched_task_index: Option<usize>,
}

/// Task step interface state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStepInterfaceProps {
    /// The task whose steps are shown.
    pub task: TaskConfig,
    /// The module owning the task.
    #[serde(rename = "mod")]
    pub module: ModuleConfig,
    /// Scroll offset of the step list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::{ModulesProps, ScreenProps, ViewModuleProps};
    use crate::config::fixtures;

    #[test]
    fn merge_keeps_fields_absent_from_overlay() {
        let module = fixtures::config().modules[0].clone();
        let mut props = ScreenProps {
            modules: Some(ModulesProps {
                scroll_amount: Some(120.0),
                current_module: None,
            }),
            view_module: Some(ViewModuleProps {
                module,
                scroll_amount: None,
                preopened_tasks: None,
                launched_task_index: None,
            }),
            ..ScreenProps::default()
        };

        props.merge(ScreenProps {
            modules: Some(ModulesProps {
                scroll_amount: None,
                current_module: Some(1),
            }),
            ..ScreenProps::default()
        });

        // Top-level fields are replaced wholesale, not deep-merged.
        assert_eq!(
            props.modules,
            Some(ModulesProps {
                scroll_amount: None,
                current_module: Some(1),
            })
        );
        assert!(props.view_module.is_some());
        assert_eq!(props.module().map(|m| m.id.as_str()), Some("m1"));
    }

    #[test]
    fn merged_starts_from_empty_bag_for_null_entry() {
        let overlay = ScreenProps {
            modules: Some(ModulesProps::default()),
            ..ScreenProps::default()
        };
        assert_eq!(ScreenProps::merged(None, overlay.clone()), overlay);
    }

    #[test]
    fn deserializes_module_under_mod_key() {
        let config = fixtures::config();
        let json = serde_json::json!({
            "viewModule": { "mod": config.modules[1], "preopenedTasks": [0] }
        });
        let props: ScreenProps = serde_json::from_value(json).expect("props parse");
        let view = props.view_module.expect("view module props");
        assert_eq!(view.module.id, "m2");
        assert_eq!(view.preopened_tasks, Some(vec![0]));
    }
}
