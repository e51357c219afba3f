//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.  Nothing here ever prints
//! a secret — callers print decrypted values themselves, on purpose.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::generator::strength_label;
use crate::vault::CredentialMetadata;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of credential metadata (never the secret).
pub fn print_credentials_table(credentials: &[CredentialMetadata]) {
    if credentials.is_empty() {
        info("No credentials stored yet.");
        tip("Run `lockvault add <TITLE>` to store your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Username", "Website", "Updated"]);

    for c in credentials {
        table.add_row(vec![
            c.id.to_string(),
            c.title.clone(),
            c.username.clone(),
            c.website.clone().unwrap_or_else(|| "-".into()),
            c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");
}

/// Render a strength score as a colored meter plus label.
pub fn strength_meter(score: u8) -> String {
    let filled = "\u{25a0}".repeat(usize::from(score));
    let empty = "\u{25a1}".repeat(5usize.saturating_sub(usize::from(score)));
    let bar = match score {
        0..=2 => style(filled).red(),
        3 => style(filled).yellow(),
        _ => style(filled).green(),
    };
    format!("{bar}{} {}", style(empty).dim(), strength_label(score))
}
