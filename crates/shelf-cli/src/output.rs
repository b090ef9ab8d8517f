//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use shelf_core::{Bookmark, Category, CategoryEntry, ImportSummary, View};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark, category: Option<&Category>) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", bookmark.id);
                println!("Title:    {}", bookmark.title);
                println!("URL:      {}", bookmark.url);
                println!(
                    "Category: {}",
                    category.map(|c| c.name.as_str()).unwrap_or("(uncategorized)")
                );
                if !bookmark.tags.is_empty() {
                    println!("Tags:     {}", bookmark.tags.join(", "));
                }
                println!("Order:    {}", bookmark.display_order);
                if !bookmark.notes.is_empty() {
                    println!();
                    println!("{}", bookmark.notes);
                }
            }
            OutputFormat::Json => print_json(bookmark),
            OutputFormat::Quiet => println!("{}", bookmark.id),
        }
    }

    /// Print a filtered view
    pub fn print_view(&self, view: &View) {
        match self.format {
            OutputFormat::Human => {
                println!("── {} ──", view.title);
                if view.bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in &view.bookmarks {
                    let tags = if bookmark.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", bookmark.tags.join(", "))
                    };
                    println!(
                        "{:>5} | {}{} | {}",
                        bookmark.id,
                        truncate(&bookmark.title, 35),
                        tags,
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", view.bookmarks.len());
            }
            OutputFormat::Json => print_json(view),
            OutputFormat::Quiet => {
                for bookmark in &view.bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print the category list with bookmark counts
    ///
    /// The first entry is the synthetic "all" category.
    pub fn print_categories(&self, entries: &[(CategoryEntry, usize)]) {
        match self.format {
            OutputFormat::Human => {
                for (entry, count) in entries {
                    println!("{:>5} | {} ({})", entry.id.to_string(), entry.name, count);
                }
                println!("\n{} categories", entries.len().saturating_sub(1));
            }
            OutputFormat::Json => {
                let json: Vec<_> = entries
                    .iter()
                    .map(|(entry, count)| {
                        serde_json::json!({
                            "id": entry.id,
                            "name": entry.name,
                            "displayOrder": entry.display_order,
                            "bookmarks": count
                        })
                    })
                    .collect();
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for (entry, _) in entries {
                    println!("{}", entry.id);
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[(String, i64)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                print_json(&json_tags);
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the result of an import
    pub fn print_import_summary(&self, summary: &ImportSummary) {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "✓ Imported {} categories and {} bookmarks",
                    summary.categories, summary.bookmarks
                );
                if summary.skipped > 0 {
                    println!(
                        "⚠ Skipped {} record(s) that conflicted with existing names",
                        summary.skipped
                    );
                }
            }
            OutputFormat::Json => print_json(summary),
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning (to stderr in human mode)
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
