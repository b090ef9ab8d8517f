//! Terminal interaction helpers
//!
//! Bookmark notes can be written in the user's editor, and destructive
//! commands ask for confirmation when a terminal is attached.

use std::env;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

const FALLBACK_EDITORS: [&str; 4] = ["nano", "vim", "vi", "notepad"];

/// Edit notes in `$VISUAL` / `$EDITOR` and return the new text
///
/// The trailing newline editors add on save is dropped.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let (program, args) = editor_command()?;

    let mut file = tempfile::Builder::new()
        .prefix("shelf_notes_")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temp file for notes")?;
    file.write_all(initial_content.as_bytes())
        .context("Failed to write notes to temp file")?;
    file.flush()?;

    debug!("Opening notes in {} {:?}", program, args);
    let status = Command::new(&program)
        .args(&args)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to run editor: {}", program))?;

    if !status.success() {
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            program
        );
    }

    read_back(&file)
}

/// Re-read the temp file by path; editors usually replace it on save
fn read_back(file: &NamedTempFile) -> Result<String> {
    let mut content =
        std::fs::read_to_string(file.path()).context("Failed to read edited notes")?;

    let trimmed_len = content.trim_end_matches(['\n', '\r']).len();
    content.truncate(trimmed_len);
    Ok(content)
}

/// Split the configured editor into program and arguments
///
/// Values like `code --wait` are common, so the variable is split on
/// whitespace.
fn editor_command() -> Result<(String, Vec<String>)> {
    let configured = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty());

    if let Some(value) = configured {
        return Ok(split_command(&value));
    }

    for editor in FALLBACK_EDITORS {
        if on_path(editor) {
            return Ok((editor.to_string(), Vec::new()));
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

fn split_command(value: &str) -> (String, Vec<String>) {
    let mut parts = value.split_whitespace().map(str::to_string);
    let program = parts.next().unwrap_or_default();
    (program, parts.collect())
}

/// Whether an executable with this name is on `$PATH`
fn on_path(program: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&paths)
        .any(|dir| dir.join(program).is_file() || dir.join(format!("{}.exe", program)).is_file())
}

/// Ask a yes/no question, defaulting to no
///
/// Without a terminal on stdin there is nobody to answer, so this
/// declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
