use std::time::Instant;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use launchpad_ui::{
    Application, Outlet, SetScreenOptions, TransitionState, outlet::TRANSITION_WINDOW,
};

use crate::output;

use super::{AppArgs, open};

/// One navigation in a walk.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Forward(String),
    Back,
    BackTo(String),
}

impl Step {
    pub fn parse(raw: &str) -> Result<Self> {
        let step = match raw.strip_prefix("back:") {
            _ if raw == "back" => Step::Back,
            Some("") => bail!("Step '{raw}' is missing a url after 'back:'"),
            Some(url) => Step::BackTo(url.to_string()),
            None if raw.is_empty() => bail!("Empty step, expected <url>, back or back:<url>"),
            None => Step::Forward(raw.to_string()),
        };
        Ok(step)
    }

    fn options(&self) -> SetScreenOptions {
        match self {
            Step::Forward(url) => SetScreenOptions::to(url.as_str()),
            Step::Back => SetScreenOptions::back(),
            Step::BackTo(url) => SetScreenOptions::back_to(url.as_str()),
        }
    }
}

pub fn execute(args: &AppArgs, raw_steps: &[String]) -> Result<()> {
    let steps = raw_steps
        .iter()
        .map(|raw| Step::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let session = open(args)?;
    let app = session.app.clone();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime
        .block_on(app.launch(&session.loader, &session.manifest))
        .context("Failed to preload core assets")?;

    let mut now = Instant::now();
    let mut outlet = Outlet::new(app.clone());
    outlet.prepare(now);
    now += TRANSITION_WINDOW;
    outlet.poll(now);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Step",
            "Stack",
            "Index",
            "Previous",
            "Direction",
            "Background",
            "Drawn",
        ]);
    table.add_row(row(&app, &outlet, "launch")?);

    for (raw, step) in raw_steps.iter().zip(&steps) {
        app.router().set_screen(step.options());
        outlet.sync(now);
        table.add_row(row(&app, &outlet, raw)?);
        now += TRANSITION_WINDOW;
        outlet.poll(now);
    }

    println!("{table}");
    output::status(
        "Walked",
        format!(
            "{} steps, stars at {:.2} opacity",
            steps.len(),
            session.stars.opacity()
        ),
    );
    Ok(())
}

fn row(app: &Application, outlet: &Outlet, label: &str) -> Result<Vec<Cell>> {
    let router = app.router();
    let stack = router.screen_stack()?;
    let index = router.stack_index();
    let stack = stack
        .iter()
        .enumerate()
        .map(|(i, url)| {
            if Some(i) == index {
                format!("[{url}]")
            } else {
                url.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let drawn = outlet
        .plan()
        .screens
        .iter()
        .map(|screen| {
            let state = screen
                .transition()
                .map(|transition| transition.transition_state)
                .unwrap_or(TransitionState::Idle);
            format!("{} ({})", screen.render(), state.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ");

    let module = app
        .active_module()
        .map(|module| format!(" {}", module.id))
        .unwrap_or_default();

    Ok(vec![
        Cell::new(label),
        Cell::new(stack),
        Cell::new(format_index(index)),
        Cell::new(format_index(router.previous_stack_index())),
        Cell::new(router.direction()),
        Cell::new(format!("{:?}{module}", app.active_background())),
        Cell::new(drawn),
    ])
}

fn format_index(index: Option<usize>) -> String {
    index.map_or_else(|| "-".to_string(), |index| index.to_string())
}
