use anyhow::Result;
use launchpad_ui::Settings;

use crate::output;

use super::{AppArgs, open};

pub fn execute(args: &AppArgs, use_stars: Option<bool>) -> Result<()> {
    let session = open(args)?;
    let app = session.app;
    app.initialize();

    if let Some(use_stars) = use_stars {
        app.update_settings(Settings { use_stars });
        output::status("Updated", "settings");
    }
    println!("{}", serde_json::to_string_pretty(&app.settings())?);
    Ok(())
}
