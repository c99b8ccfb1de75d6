use console::style;

const STATUS_WIDTH: usize = 12;

pub fn status(label: &str, message: impl AsRef<str>) {
    eprintln!(
        "{:>width$} {}",
        style(label).green().bold(),
        message.as_ref(),
        width = STATUS_WIDTH
    );
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message.as_ref());
}

pub fn note(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("note").blue().bold(), message.as_ref());
}

/// Format a list of step indices as `[1, 4]`.
pub fn index_list(indices: &[usize]) -> String {
    let items: Vec<_> = indices.iter().map(usize::to_string).collect();
    format!("[{}]", items.join(", "))
}
