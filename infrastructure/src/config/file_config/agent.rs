//! Agent configuration from TOML (`[agent]` section)

use super::ConfigIssue;
use multisource_domain::Locale;
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// name = "MultiSourceAgent"
/// max_iterations = 10
/// enable_shell_commands = false   # deny-listed commands are always refused
/// locale = "pt-BR"                # "pt-BR" or "en"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Name used in the system prompt
    pub name: String,
    /// Decision loop iteration cap
    pub max_iterations: usize,
    /// Whether the shell command tool may run anything at all
    pub enable_shell_commands: bool,
    /// Language of user-facing messages
    pub locale: String,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            name: "MultiSourceAgent".to_string(),
            max_iterations: 10,
            enable_shell_commands: false,
            locale: Locale::default().as_str().to_string(),
        }
    }
}

impl FileAgentConfig {
    /// Parse the locale string, falling back to pt-BR with a warning.
    pub fn parse_locale(&self) -> (Locale, Vec<ConfigIssue>) {
        match self.locale.parse::<Locale>() {
            Ok(locale) => (locale, vec![]),
            Err(_) => (
                Locale::default(),
                vec![ConfigIssue::new(
                    "agent.locale",
                    format!(
                        "unknown value '{}', falling back to '{}'",
                        self.locale,
                        Locale::default()
                    ),
                )],
            ),
        }
    }

    pub(super) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_locale().1;
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::new(
                "agent.max_iterations",
                "0 means every query fails without consulting the model",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        let config = FileAgentConfig {
            locale: "en".to_string(),
            ..Default::default()
        };
        let (locale, issues) = config.parse_locale();
        assert_eq!(locale, Locale::En);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let config = FileAgentConfig {
            locale: "klingon".to_string(),
            ..Default::default()
        };
        let (locale, issues) = config.parse_locale();
        assert_eq!(locale, Locale::PtBr);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "agent.locale");
    }

    #[test]
    fn test_zero_iterations_is_flagged() {
        let config = FileAgentConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert_eq!(config.issues().len(), 1);
    }
}
