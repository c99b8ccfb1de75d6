use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};

use crate::output;

use super::{AppArgs, read_config};

pub fn execute(args: &AppArgs) -> Result<()> {
    let config = read_config(&args.config)?;
    if config.screens.is_empty() {
        output::warn("No screens configured");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Url", "Title", "Types"]);
    for screen in &config.screens {
        let types = screen
            .screen_types
            .as_ref()
            .map(|types| types.join(", "))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&screen.id),
            Cell::new(&screen.url),
            Cell::new(&screen.title),
            Cell::new(types),
        ]);
    }

    println!("{table}");
    output::status(
        "Listed",
        format!("{} screens from {}", config.screens.len(), config.metadata.title),
    );
    Ok(())
}
