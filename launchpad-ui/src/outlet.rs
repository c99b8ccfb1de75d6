//! Decides which screens to draw while the router transitions.
//!
//! During a transition both the current and the previous stack entry are drawn,
//! each labelled with its role. Once the transition window elapses only the
//! current entry remains. The outlet is driven by the host's frame loop:
//! [`Outlet::sync`] after state changes, [`Outlet::poll`] every frame, and
//! [`Outlet::plan`] to get the screens to draw.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::trace;

use crate::{
    application::Application,
    props::{ScreenProps, TransitionProps},
    screen::Screen,
    transition::{ScreenType, TransitionState},
};

/// How long a routing transition keeps both screens drawn.
pub const TRANSITION_WINDOW: Duration = Duration::from_millis(1000);

/// Star opacity once loading has finished.
const LOADED_STAR_OPACITY: f32 = 0.75;

/// Lifecycle of the outlet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderState {
    /// Assets are still loading.
    Loading,
    /// Assets are loaded; the loading screen is fading out.
    LoadingFinished,
    /// Only the current screen is drawn.
    Ready,
    /// A routing transition is running.
    Animating,
}

/// Loading screen overlay.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadingView {
    /// Whether loading is done and the overlay should fade out.
    pub finished: bool,
}

/// One screen to draw.
#[derive(Clone)]
pub struct PlannedScreen {
    /// Stable identity across frames.
    pub key: String,
    /// Stack index of the entry.
    pub index: usize,
    /// Url of the entry.
    pub url: String,
    /// Screen registered for the entry.
    pub screen: Arc<dyn Screen>,
    /// Entry props with the transition role filled in.
    pub props: ScreenProps,
}

impl PlannedScreen {
    /// Role of this screen in the running transition.
    pub fn transition(&self) -> Option<TransitionProps> {
        self.props.transition
    }

    /// Render the screen with its props.
    pub fn render(&self) -> String {
        self.screen.render(Some(&self.props))
    }
}

impl fmt::Debug for PlannedScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedScreen")
            .field("key", &self.key)
            .field("index", &self.index)
            .field("url", &self.url)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}

/// Everything to draw in one frame, back to front.
#[derive(Debug, Default)]
pub struct RenderPlan {
    /// Loading overlay, if shown.
    pub loading: Option<LoadingView>,
    /// Screens in stack order.
    pub screens: Vec<PlannedScreen>,
}

/// Renders router state into [`RenderPlan`]s.
pub struct Outlet {
    app: Arc<Application>,
    render_state: RenderState,
    application_ready: bool,
    deadline: Option<Instant>,
    observed: (Option<usize>, Option<usize>),
    stars_attached: Option<bool>,
}

impl Outlet {
    /// Create an outlet in the loading state.
    pub fn new(app: Arc<Application>) -> Self {
        let router = app.router();
        let observed = (router.stack_index(), router.previous_stack_index());
        Self {
            app,
            render_state: RenderState::Loading,
            application_ready: false,
            deadline: None,
            observed,
            stars_attached: None,
        }
    }

    /// Current lifecycle state.
    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    /// Signal that the application is initialized and screens may be drawn.
    ///
    /// Only the first call has any effect.
    pub fn prepare(&mut self, now: Instant) {
        if self.application_ready {
            return;
        }
        self.render_state = RenderState::LoadingFinished;
        self.application_ready = true;
        self.observed = self.indices();
        self.start_timer(now);
        if let Some(stars) = self.app.stars() {
            stars.update_opacity(LOADED_STAR_OPACITY);
        }
        self.sync_stars();
    }

    /// Pick up router and settings changes.
    ///
    /// Returns whether a navigation was observed. Every navigation starts a
    /// transition; a window that is already running is not extended.
    pub fn sync(&mut self, now: Instant) -> bool {
        self.sync_stars();
        let indices = self.indices();
        if indices == self.observed {
            return false;
        }
        self.observed = indices;
        if self.application_ready {
            self.render_state = RenderState::Animating;
            self.start_timer(now);
        }
        true
    }

    /// Advance timers; call once per frame.
    pub fn poll(&mut self, now: Instant) -> RenderState {
        self.sync_stars();
        if let Some(deadline) = self.deadline
            && now >= deadline
        {
            self.deadline = None;
            self.render_state = RenderState::Ready;
            trace!("transition finished");
        }
        self.render_state
    }

    /// Screens to draw for the current state.
    pub fn plan(&self) -> RenderPlan {
        let show_loading = !self.application_ready
            || matches!(
                self.render_state,
                RenderState::Loading | RenderState::LoadingFinished
            );
        let loading = show_loading.then_some(LoadingView {
            finished: self.render_state == RenderState::LoadingFinished,
        });

        let router = self.app.router();
        let (Some(stack_index), previous) = self.indices() else {
            return RenderPlan {
                loading,
                screens: Vec::new(),
            };
        };
        let (Ok(stack), Ok(all_props)) = (router.screen_stack(), router.screen_props()) else {
            return RenderPlan {
                loading,
                screens: Vec::new(),
            };
        };

        let ready = self.render_state == RenderState::Ready;
        let lateral = previous
            .and_then(|previous| stack.get(previous))
            .is_some_and(|url| Some(url) == stack.get(stack_index));

        let screens = stack
            .iter()
            .enumerate()
            .filter_map(|(index, url)| {
                let is_current = index == stack_index;
                let is_previous = Some(index) == previous;
                if !is_current && !is_previous {
                    return None;
                }
                if ready && !is_current {
                    return None;
                }
                let screen = router.screen(Some(index)).ok().flatten()?;

                let transition_state = match (ready, is_current) {
                    (true, _) => TransitionState::Idle,
                    (false, true) => TransitionState::In,
                    (false, false) => TransitionState::Out,
                };
                let screen_type = match (lateral, is_current) {
                    (true, _) => ScreenType::Lateral,
                    (false, true) => ScreenType::Current,
                    (false, false) => ScreenType::Previous,
                };
                let key = if lateral {
                    format!("{url}-{index}")
                } else {
                    url.clone()
                };
                let props = ScreenProps::merged(
                    all_props.get(index).and_then(Option::as_ref),
                    ScreenProps {
                        transition: Some(TransitionProps {
                            transition_state,
                            screen_type,
                        }),
                        ..ScreenProps::default()
                    },
                );
                Some(PlannedScreen {
                    key,
                    index,
                    url: url.clone(),
                    screen,
                    props,
                })
            })
            .collect();

        RenderPlan { loading, screens }
    }

    fn indices(&self) -> (Option<usize>, Option<usize>) {
        let router = self.app.router();
        (router.stack_index(), router.previous_stack_index())
    }

    fn start_timer(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + TRANSITION_WINDOW);
        }
    }

    fn sync_stars(&mut self) {
        if !self.application_ready {
            return;
        }
        let Some(stars) = self.app.stars() else {
            return;
        };
        let use_stars = self.app.settings().use_stars;
        if self.stars_attached == Some(use_stars) {
            return;
        }
        if use_stars {
            stars.attach();
        } else {
            stars.detach();
        }
        self.stars_attached = Some(use_stars);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        time::{Duration, Instant},
    };

    use parking_lot::Mutex;

    use super::{LoadingView, Outlet, RenderState, TRANSITION_WINDOW};
    use crate::{
        application::{Application, Settings},
        background::Starfield,
        config::fixtures,
        props::ScreenProps,
        router::SetScreenOptions,
        screen::ScreenRegistry,
        storage::MemoryStore,
        transition::{ScreenType, TransitionState},
    };

    #[derive(Debug, PartialEq)]
    enum StarEvent {
        Opacity(f32),
        Attach,
        Detach,
    }

    #[derive(Default)]
    struct Stars {
        events: Mutex<Vec<StarEvent>>,
    }

    impl Starfield for Stars {
        fn update_opacity(&self, opacity: f32) {
            self.events.lock().push(StarEvent::Opacity(opacity));
        }

        fn attach(&self) {
            self.events.lock().push(StarEvent::Attach);
        }

        fn detach(&self) {
            self.events.lock().push(StarEvent::Detach);
        }
    }

    fn app() -> (Arc<Application>, Arc<Stars>) {
        let registry = ScreenRegistry::new()
            .with("5b8f1ae9", |_: Option<&ScreenProps>| "welcome".to_string())
            .with("4cc29a5b", |props: Option<&ScreenProps>| {
                let state = props
                    .and_then(|props| props.transition)
                    .map(|transition| transition.transition_state.as_str())
                    .unwrap_or("none");
                format!("modules:{state}")
            });
        let app = Arc::new(Application::new(
            fixtures::config(),
            registry,
            Arc::new(MemoryStore::new()),
        ));
        let stars = Arc::new(Stars::default());
        app.register_frame_state(stars.clone());
        (app, stars)
    }

    fn roles(outlet: &Outlet) -> Vec<(String, TransitionState, ScreenType)> {
        outlet
            .plan()
            .screens
            .iter()
            .map(|screen| {
                let transition = screen.transition().expect("outlet sets transition");
                (
                    screen.key.clone(),
                    transition.transition_state,
                    transition.screen_type,
                )
            })
            .collect()
    }

    #[test]
    fn shows_loading_until_prepared_and_window_elapses() {
        let (app, stars) = app();
        let mut outlet = Outlet::new(app.clone());
        let plan = outlet.plan();
        assert_eq!(plan.loading, Some(LoadingView { finished: false }));
        assert!(plan.screens.is_empty());

        let t0 = Instant::now();
        app.initialize();
        outlet.sync(t0);
        assert_eq!(outlet.render_state(), RenderState::Loading);

        outlet.prepare(t0);
        outlet.prepare(t0);
        assert_eq!(outlet.render_state(), RenderState::LoadingFinished);
        assert_eq!(outlet.plan().loading, Some(LoadingView { finished: true }));
        assert_eq!(
            roles(&outlet),
            [("/".to_string(), TransitionState::In, ScreenType::Current)]
        );
        assert_eq!(
            *stars.events.lock(),
            [StarEvent::Opacity(0.75), StarEvent::Attach]
        );

        assert_eq!(
            outlet.poll(t0 + Duration::from_millis(500)),
            RenderState::LoadingFinished
        );
        assert_eq!(outlet.poll(t0 + TRANSITION_WINDOW), RenderState::Ready);
        let plan = outlet.plan();
        assert_eq!(plan.loading, None);
        assert_eq!(
            roles(&outlet),
            [("/".to_string(), TransitionState::Idle, ScreenType::Current)]
        );
    }

    #[test]
    fn navigation_during_loading_fade_animates() {
        let (app, _stars) = app();
        let mut outlet = Outlet::new(app.clone());
        let t0 = Instant::now();
        app.initialize();
        outlet.prepare(t0);

        app.router().set_screen(SetScreenOptions::to("modules"));
        assert!(outlet.sync(t0 + Duration::from_millis(900)));
        assert_eq!(outlet.render_state(), RenderState::Animating);
        assert_eq!(outlet.plan().loading, None);
        assert_eq!(
            roles(&outlet),
            [
                ("/".to_string(), TransitionState::Out, ScreenType::Previous),
                ("modules".to_string(), TransitionState::In, ScreenType::Current),
            ]
        );

        assert_eq!(outlet.poll(t0 + TRANSITION_WINDOW), RenderState::Ready);
        assert_eq!(
            roles(&outlet),
            [("modules".to_string(), TransitionState::Idle, ScreenType::Current)]
        );
    }

    fn ready_outlet() -> (Arc<Application>, Arc<Stars>, Outlet, Instant) {
        let (app, stars) = app();
        let mut outlet = Outlet::new(app.clone());
        let t0 = Instant::now();
        app.initialize();
        outlet.prepare(t0);
        outlet.poll(t0 + TRANSITION_WINDOW);
        (app, stars, outlet, t0 + TRANSITION_WINDOW)
    }

    #[test]
    fn navigation_draws_both_screens_until_window_elapses() {
        let (app, _stars, mut outlet, t1) = ready_outlet();
        app.router().set_screen(SetScreenOptions::to("modules"));
        assert!(outlet.sync(t1));
        assert!(!outlet.sync(t1));
        assert_eq!(outlet.render_state(), RenderState::Animating);
        assert_eq!(
            roles(&outlet),
            [
                ("/".to_string(), TransitionState::Out, ScreenType::Previous),
                ("modules".to_string(), TransitionState::In, ScreenType::Current),
            ]
        );
        let rendered: Vec<_> = outlet.plan().screens.iter().map(|s| s.render()).collect();
        assert_eq!(rendered, ["welcome", "modules:in"]);

        // A second navigation inside the window does not extend it.
        app.router().go_back(None);
        outlet.sync(t1 + Duration::from_millis(600));
        assert_eq!(outlet.poll(t1 + TRANSITION_WINDOW), RenderState::Ready);
        assert_eq!(
            roles(&outlet),
            [("/".to_string(), TransitionState::Idle, ScreenType::Current)]
        );
    }

    #[test]
    fn lateral_copies_get_indexed_keys() {
        let (app, _stars, mut outlet, t1) = ready_outlet();
        app.router().set_screen(SetScreenOptions::to("modules"));
        app.router().set_screen(SetScreenOptions::to("modules"));
        outlet.sync(t1);
        assert_eq!(
            roles(&outlet),
            [
                ("modules-1".to_string(), TransitionState::Out, ScreenType::Lateral),
                ("modules-2".to_string(), TransitionState::In, ScreenType::Lateral),
            ]
        );
    }

    #[test]
    fn unresolved_screens_are_skipped() {
        let (app, _stars, mut outlet, t1) = ready_outlet();
        app.router().set_screen(SetScreenOptions::to("view-module"));
        outlet.sync(t1);
        assert_eq!(
            roles(&outlet),
            [("/".to_string(), TransitionState::Out, ScreenType::Previous)]
        );
    }

    #[test]
    fn ignored_back_at_root_keeps_current_screen() {
        let (app, _stars, mut outlet, t1) = ready_outlet();
        app.router().go_back(None);
        outlet.sync(t1);
        outlet.poll(t1 + TRANSITION_WINDOW);
        assert_eq!(
            roles(&outlet),
            [("/-0".to_string(), TransitionState::Idle, ScreenType::Lateral)]
        );
    }

    #[test]
    fn star_attachment_follows_settings() {
        let (app, stars, mut outlet, t1) = ready_outlet();
        stars.events.lock().clear();

        app.update_settings(Settings { use_stars: false });
        outlet.poll(t1);
        outlet.poll(t1);
        app.update_settings(Settings { use_stars: true });
        outlet.sync(t1);
        assert_eq!(*stars.events.lock(), [StarEvent::Detach, StarEvent::Attach]);
    }
}
