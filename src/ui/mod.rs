//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::changelog::CategorizedEntries;
use crate::domain::ChangeCategory;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_commit_analysis, display_consistency_report, display_error,
    display_next_steps, display_proposed_version, display_section_preview, display_status,
    display_success,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Displays the given prompt and accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
///
/// # Arguments
/// * `prompt` - The prompt message to display (without the "(y/N): " suffix)
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Asks for changelog entries category by category on the terminal.
///
/// See [`prompt_category_entries_from`].
pub fn prompt_category_entries(label: &str) -> Result<CategorizedEntries> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_category_entries_from(&mut stdin.lock(), &mut stdout.lock(), label)
}

/// Asks for changelog entries category by category.
///
/// Each category takes one entry per line; an empty line moves on to the next
/// category. End of input stops early and keeps what was entered.
///
/// # Arguments
/// * `input` - Where answers are read from
/// * `output` - Where prompts are written to
/// * `label` - Version label shown in the heading
///
/// # Returns
/// * `Ok(entries)` - Entries per category; categories left blank are absent
/// * `Err` - If reading or writing fails
pub fn prompt_category_entries_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<CategorizedEntries> {
    writeln!(output, "\nChangelog entries for {}", label)?;
    writeln!(output, "Enter one change per line, empty line to continue.")?;

    let mut entries = CategorizedEntries::new();
    'categories: for category in ChangeCategory::ALL {
        writeln!(output, "\n{}:", category)?;
        loop {
            write!(output, "  - ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break 'categories;
            }
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            entries.entry(category).or_default().push(line.to_string());
        }
    }

    Ok(entries)
}
