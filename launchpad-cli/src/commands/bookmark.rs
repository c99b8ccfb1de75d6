use anyhow::Result;

use crate::output;

use super::{AppArgs, open};

pub fn execute(args: &AppArgs, task_id: &str, index: usize, value: Option<bool>) -> Result<()> {
    let session = open(args)?;
    let app = session.app;
    app.initialize();

    match app.find_task(task_id) {
        Some((module, task)) => {
            output::note(format!("{} / {}", module.title, task.title));
        }
        None => output::warn(format!("Task '{task_id}' is not in the configuration")),
    }

    app.set_bookmark(task_id, index, value);
    let bookmarks = app.get_task_bookmarks(task_id);
    output::status("Bookmarks", format!("{task_id} {}", output::index_list(&bookmarks)));
    if app.demo() {
        output::note("Demo mode: bookmarks are not persisted");
    }
    Ok(())
}
