use anyhow::Result;
use gopro_rename_core::{Decision, RenamePlan};
use inquire::{Confirm, InquireError};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// Shows the old and new name with the changed characters highlighted.
pub fn format_name_change(old_name: &str, new_name: &str) -> Result<String> {
    let diff = TextDiff::from_chars(old_name, new_name);
    let mut old_line = String::new();
    let mut new_line = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => write!(old_line, "\x1b[31m{}\x1b[0m", change.value())?, // Red
            ChangeTag::Insert => write!(new_line, "\x1b[32m{}\x1b[0m", change.value())?, // Green
            ChangeTag::Equal => {
                old_line.push_str(change.value());
                new_line.push_str(change.value());
            }
        }
    }

    Ok(format!("  - {}\n  + {}", old_line, new_line))
}

pub fn show_rename_and_confirm(plan: &RenamePlan) -> Result<Decision> {
    println!("\n📁 {}", plan.source.display());
    println!("{}", format_name_change(&plan.source_name(), &plan.target_name)?);

    let answer = Confirm::new("Apply this rename?")
        .with_default(true)
        .with_help_message("Esc stops the run")
        .prompt();

    match answer {
        Ok(true) => Ok(Decision::Apply),
        Ok(false) => Ok(Decision::Skip),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(Decision::Stop)
        }
        Err(error) => Err(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_colors(text: &str) -> String {
        text.replace("\x1b[31m", "").replace("\x1b[32m", "").replace("\x1b[0m", "")
    }

    #[test]
    fn test_rename_change() {
        let formatted = format_name_change("GH010527.MP4", "052701-GH010527.MP4").unwrap();

        assert_eq!(
            strip_colors(&formatted),
            "  - GH010527.MP4\n  + 052701-GH010527.MP4"
        );
        assert!(formatted.contains("\x1b[32m"));
        assert!(!formatted.contains("\x1b[31m"));
    }

    #[test]
    fn test_revert_change() {
        let formatted = format_name_change("052701-GH010527.MP4", "GH010527.MP4").unwrap();

        assert_eq!(
            strip_colors(&formatted),
            "  - 052701-GH010527.MP4\n  + GH010527.MP4"
        );
        assert!(formatted.contains("\x1b[31m"));
        assert!(!formatted.contains("\x1b[32m"));
    }
}
