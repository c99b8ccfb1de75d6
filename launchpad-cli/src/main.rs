use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::AppArgs;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(version, about = "Drive the launchpad navigation core from the terminal", long_about = None)]
struct Cli {
    #[command(flatten)]
    app: AppArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured screens
    Screens,
    /// Launch the app and replay a navigation walk
    Walk {
        /// Steps: `<url>` to go forward, `back`, or `back:<url>`
        #[arg(required = true)]
        steps: Vec<String>,
    },
    /// Toggle or force a bookmark on a task step
    Bookmark {
        /// Task id from the configuration
        task_id: String,
        /// Step index within the task
        index: usize,
        /// Force the bookmark on (`true`) or off (`false`) instead of toggling
        #[arg(long)]
        set: Option<bool>,
    },
    /// Print or update the settings
    Settings {
        /// Show the background stars
        #[arg(long)]
        use_stars: Option<bool>,
    },
}

fn main() -> Result<()> {
    let Cli { app, command } = Cli::parse();

    match command {
        Commands::Screens => commands::screens::execute(&app)?,
        Commands::Walk { steps } => commands::walk::execute(&app, &steps)?,
        Commands::Bookmark {
            task_id,
            index,
            set,
        } => commands::bookmark::execute(&app, &task_id, index, set)?,
        Commands::Settings { use_stars } => commands::settings::execute(&app, use_stars)?,
    }

    Ok(())
}
