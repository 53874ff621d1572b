/// Plain-text export of entries and ideas.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::types::{Entry, Idea};

/// Renders entries and ideas as a newline-delimited, human-readable blob.
pub fn render_export(entries: &[Entry], ideas: &[Idea], now: DateTime<Local>) -> String {
    let mut lines = Vec::new();
    lines.push(format!("LoopOS export · {}", now.format("%Y-%m-%d %H:%M")));
    lines.push(String::new());

    lines.push(format!("ENTRIES ({})", entries.len()));
    if entries.is_empty() {
        lines.push("(none)".to_string());
    }
    for entry in entries {
        let mark = if entry.fulfilled { "✓" } else { "✗" };
        lines.push(format!("{} | {mark} | {}", entry.date.format("%Y-%m-%d"), entry.output));
    }
    lines.push(String::new());

    lines.push(format!("IDEAS ({})", ideas.len()));
    if ideas.is_empty() {
        lines.push("(none)".to_string());
    }
    for idea in ideas {
        lines.push(format!("- {}", idea.title));
        for note in idea.notes.lines().filter(|line| !line.trim().is_empty()) {
            lines.push(format!("    {}", note.trim_end()));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn default_export_path(data_dir: &Path, now: DateTime<Local>) -> PathBuf {
    data_dir
        .join("exports")
        .join(format!("loopos-export-{}.txt", now.format("%Y-%m-%d")))
}

pub fn write_export(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 14, 5, 0).unwrap()
    }

    #[test]
    fn renders_entries_and_ideas() {
        let entries = vec![
            Entry {
                id: "2".into(),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                output: "Sent invoice".into(),
                fulfilled: true,
            },
            Entry {
                id: "1".into(),
                date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
                output: "Call with bank".into(),
                fulfilled: false,
            },
        ];
        let ideas = vec![Idea {
            id: "3".into(),
            title: "Garden app".into(),
            notes: "track watering\n\nand seeds".into(),
            created_at: at(2024, 2, 27),
        }];

        let text = render_export(&entries, &ideas, at(2024, 3, 1));
        assert_eq!(
            text,
            "LoopOS export · 2024-03-01 14:05\n\
             \n\
             ENTRIES (2)\n\
             2024-03-01 | ✓ | Sent invoice\n\
             2024-02-28 | ✗ | Call with bank\n\
             \n\
             IDEAS (1)\n\
             - Garden app\n    track watering\n    and seeds\n"
        );
    }

    #[test]
    fn renders_empty_sections() {
        let text = render_export(&[], &[], at(2024, 1, 2));
        assert!(text.contains("ENTRIES (0)\n(none)\n"));
        assert!(text.ends_with("IDEAS (0)\n(none)\n"));
    }

    #[test]
    fn writes_into_exports_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = default_export_path(dir.path(), at(2024, 3, 1));
        assert!(path.ends_with("exports/loopos-export-2024-03-01.txt"));
        write_export(&path, "hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
