//! File picker prompts
//!
//! The HTTP client lists candidate files remotely and hands them to a
//! [`PickerPrompt`] to let the user choose. The shell uses
//! [`TerminalPickerPrompt`]; tests and the offline client use
//! [`ScriptedPickerPrompt`].

use crate::client::FileHandle;
use crate::error::{DemoError, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Chooses entries from a listing
pub trait PickerPrompt: Send + Sync {
    /// Return the indices of the chosen entries; empty means cancelled
    fn choose(&self, entries: &[FileHandle], multiple: bool) -> Result<Vec<usize>>;
}

/// Parse a picker answer such as `2` or `1, 3` into zero-based indices
///
/// A blank answer cancels the picker.
///
/// # Errors
///
/// Returns `DemoError::Picker` for non-numeric or out-of-range entries, or
/// for several entries when `multiple` is false.
///
/// # Examples
///
/// ```
/// use puter_demo::client::picker::parse_selection;
///
/// assert_eq!(parse_selection("1, 3", 3, true).unwrap(), vec![0, 2]);
/// assert!(parse_selection("", 3, false).unwrap().is_empty());
/// ```
pub fn parse_selection(input: &str, len: usize, multiple: bool) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for part in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        let number: usize = part
            .parse()
            .map_err(|_| DemoError::Picker(format!("Not a number: {}", part)))?;
        if number == 0 || number > len {
            return Err(DemoError::Picker(format!(
                "Choice {} is out of range (1-{})",
                number, len
            ))
            .into());
        }
        if !indices.contains(&(number - 1)) {
            indices.push(number - 1);
        }
    }

    if !multiple && indices.len() > 1 {
        return Err(DemoError::Picker("Only one file may be selected".to_string()).into());
    }

    Ok(indices)
}

/// Interactive picker that prints a numbered listing and reads a choice
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPickerPrompt;

impl PickerPrompt for TerminalPickerPrompt {
    fn choose(&self, entries: &[FileHandle], multiple: bool) -> Result<Vec<usize>> {
        if entries.is_empty() {
            println!("{}", "No files to pick from.".yellow());
            return Ok(Vec::new());
        }

        println!();
        for (i, entry) in entries.iter().enumerate() {
            let size = entry
                .size
                .map(|s| format!(" ({} bytes)", s))
                .unwrap_or_default();
            println!("  {:>3}. {}{}", (i + 1).to_string().cyan(), entry.display_name(), size);
        }

        let hint = if multiple {
            "Pick files (e.g. 1,3), blank to cancel: "
        } else {
            "Pick a file number, blank to cancel: "
        };

        let mut rl = DefaultEditor::new()
            .map_err(|e| DemoError::Picker(format!("Cannot open prompt: {}", e)))?;
        match rl.readline(hint) {
            Ok(line) => parse_selection(line.trim(), entries.len(), multiple),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Vec::new()),
            Err(e) => Err(DemoError::Picker(format!("Prompt failed: {}", e)).into()),
        }
    }
}

/// Picker that always returns a fixed answer
#[derive(Debug, Clone, Default)]
pub struct ScriptedPickerPrompt {
    answer: Vec<usize>,
}

impl ScriptedPickerPrompt {
    /// Always choose the given indices (filtered to the listing length)
    pub fn new(answer: Vec<usize>) -> Self {
        Self { answer }
    }

    /// Always cancel
    pub fn cancel() -> Self {
        Self::default()
    }
}

impl PickerPrompt for ScriptedPickerPrompt {
    fn choose(&self, entries: &[FileHandle], multiple: bool) -> Result<Vec<usize>> {
        let mut chosen: Vec<usize> = self
            .answer
            .iter()
            .copied()
            .filter(|i| *i < entries.len())
            .collect();
        if !multiple {
            chosen.truncate(1);
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_single() {
        assert_eq!(parse_selection("2", 3, false).unwrap(), vec![1]);
    }

    #[test]
    fn test_parse_selection_blank_cancels() {
        assert!(parse_selection("   ", 3, true).unwrap().is_empty());
    }

    #[test]
    fn test_parse_selection_multiple_dedups() {
        assert_eq!(parse_selection("3 1,3", 3, true).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_parse_selection_rejects_out_of_range() {
        assert!(parse_selection("0", 3, false).is_err());
        assert!(parse_selection("4", 3, false).is_err());
    }

    #[test]
    fn test_parse_selection_rejects_garbage() {
        let err = parse_selection("two", 3, false).unwrap_err();
        assert!(err.to_string().contains("Not a number"));
    }

    #[test]
    fn test_parse_selection_rejects_many_in_single_mode() {
        assert!(parse_selection("1,2", 3, false).is_err());
    }

    #[test]
    fn test_scripted_prompt_respects_mode_and_bounds() {
        let entries = vec![FileHandle::from_path("/a"), FileHandle::from_path("/b")];
        let prompt = ScriptedPickerPrompt::new(vec![1, 0, 7]);
        assert_eq!(prompt.choose(&entries, true).unwrap(), vec![1, 0]);
        assert_eq!(prompt.choose(&entries, false).unwrap(), vec![1]);
        assert!(ScriptedPickerPrompt::cancel()
            .choose(&entries, false)
            .unwrap()
            .is_empty());
    }
}
