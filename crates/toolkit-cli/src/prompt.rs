//! Terminal prompts for interactive selection.

use colored::Colorize;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use toolkit_engine_core::{Error, Result};
use toolkit_engine_selection::{Chooser, RankedGroup};

/// Asks on the terminal which endpoint an ambiguous group should use.
///
/// Candidates are printed to stderr so stdout only carries the final
/// mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalChooser;

impl TerminalChooser {
    /// Creates a chooser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Chooser for TerminalChooser {
    fn choose(&mut self, group: &RankedGroup) -> Result<String> {
        eprintln!();
        eprintln!(
            "{} {}",
            "Multiple endpoints found for".bold(),
            group.key.to_string().cyan().bold()
        );
        for line in candidate_lines(group) {
            eprintln!("  {line}");
        }

        let theme = ColorfulTheme::default();
        Input::<String>::with_theme(&theme)
            .with_prompt(prompt_text(group))
            .default("0".to_string())
            .interact_text()
            .map_err(|e| Error::Selection {
                message: format!("prompt for {} failed: {e}", group.key),
            })
    }

    fn rejected(&mut self, _group: &RankedGroup, error: &Error) {
        eprintln!("{} {error}", "Invalid choice:".yellow());
    }
}

/// Prompt shown for `group`.
#[must_use]
pub fn prompt_text(group: &RankedGroup) -> String {
    format!("Select endpoint for {} [0-{}]", group.key, group.max_index())
}

/// One `[index] METHOD path (score)` line per candidate.
#[must_use]
pub fn candidate_lines(group: &RankedGroup) -> Vec<String> {
    group
        .candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let score = candidate
                .score
                .map_or_else(|| "unscored".to_string(), |s| format!("score {s:.2}"));
            format!(
                "[{index}] {} {} ({score})",
                candidate.http_method, candidate.path
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
    use toolkit_engine_selection::GroupKey;

    fn group() -> RankedGroup {
        let id = ProductId::new("pipedrive");
        let contacts = EntityName::new("contacts");
        let mut first = Capability::new(
            id.clone(),
            contacts.clone(),
            Action::List,
            HttpMethod::Get,
            "/persons",
        );
        first.score = Some(1.0);
        let second = Capability::new(id, contacts.clone(), Action::List, HttpMethod::Get, "/persons/collection");
        RankedGroup {
            key: GroupKey::new(contacts, Action::List),
            candidates: vec![first, second],
        }
    }

    #[test]
    fn test_candidate_lines() {
        assert_eq!(
            candidate_lines(&group()),
            vec![
                "[0] GET /persons (score 1.00)".to_string(),
                "[1] GET /persons/collection (unscored)".to_string(),
            ]
        );
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            prompt_text(&group()),
            "Select endpoint for contacts.list [0-1]"
        );
    }
}
