//! User-facing text catalog.
//!
//! Every sentence that reaches an end user (failure answers, export
//! labels, suggested questions) is looked up here so the agent can be
//! run in Portuguese (the default) or English.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display language for user-facing text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en")]
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en",
        }
    }

    /// Language name as it should appear inside the system prompt.
    pub fn language_name(&self) -> &'static str {
        match self {
            Locale::PtBr => "português",
            Locale::En => "English",
        }
    }

    /// `chrono` format string for localized date-time display.
    pub fn datetime_format(&self) -> &'static str {
        match self {
            Locale::PtBr => "%d/%m/%Y, %H:%M:%S",
            Locale::En => "%m/%d/%Y, %I:%M:%S %p",
        }
    }

    /// Answer returned when the orchestration itself fails.
    pub fn failure_message(&self, diagnostic: &str) -> String {
        match self {
            Locale::PtBr => format!(
                "Desculpe, ocorreu um erro ao processar sua pergunta: {}",
                diagnostic
            ),
            Locale::En => format!(
                "Sorry, an error occurred while processing your question: {}",
                diagnostic
            ),
        }
    }

    /// Answer returned when the decision loop hits its iteration cap.
    pub fn max_iterations_message(&self, max_iterations: usize) -> String {
        match self {
            Locale::PtBr => format!(
                "Não foi possível concluir a resposta: limite máximo de iterações atingido ({}).",
                max_iterations
            ),
            Locale::En => format!(
                "Could not finish the answer: max iterations reached ({}).",
                max_iterations
            ),
        }
    }

    /// Message for a disabled shell capability, including how to enable it.
    pub fn shell_disabled_message(&self) -> String {
        match self {
            Locale::PtBr => "Comandos shell estão desabilitados. Configure \
                             `agent.enable_shell_commands = true` (ou \
                             MSA_AGENT__ENABLE_SHELL_COMMANDS=true) para habilitar."
                .to_string(),
            Locale::En => "Shell commands are disabled. Set \
                           `agent.enable_shell_commands = true` (or \
                           MSA_AGENT__ENABLE_SHELL_COMMANDS=true) to enable them."
                .to_string(),
        }
    }

    pub fn unsafe_command_message(&self) -> String {
        match self {
            Locale::PtBr => "Comando bloqueado por motivos de segurança. Comandos perigosos \
                             não são permitidos."
                .to_string(),
            Locale::En => {
                "Command blocked for safety reasons. Dangerous commands are not allowed."
                    .to_string()
            }
        }
    }

    pub fn labels(&self) -> ExportLabels {
        match self {
            Locale::PtBr => ExportLabels {
                title: "Histórico de Conversas",
                exported_at: "Exportado em",
                total_entries: "Total de entradas",
                question: "Pergunta",
                answer: "Resposta",
            },
            Locale::En => ExportLabels {
                title: "Conversation History",
                exported_at: "Exported at",
                total_entries: "Total entries",
                question: "Question",
                answer: "Answer",
            },
        }
    }

    /// Suggested questions about a structured data source.
    pub fn database_suggestions(&self, database: &str) -> [String; 2] {
        match self {
            Locale::PtBr => [
                format!("Que tabelas existem no banco {}?", database),
                format!("Mostre alguns registros do banco {}", database),
            ],
            Locale::En => [
                format!("Which tables exist in the {} database?", database),
                format!("Show some records from the {} database", database),
            ],
        }
    }

    /// Suggested questions about a document.
    pub fn document_suggestions(&self, document: &str) -> [String; 2] {
        match self {
            Locale::PtBr => [
                format!("O que contém o documento {}?", document),
                "Busque por \"economia\" nos documentos disponíveis".to_string(),
            ],
            Locale::En => [
                format!("What does the document {} contain?", document),
                "Search for \"economy\" in the available documents".to_string(),
            ],
        }
    }

    /// Suggested questions when shell commands are enabled.
    pub fn shell_suggestions(&self) -> [String; 2] {
        match self {
            Locale::PtBr => [
                "Qual é a data e hora atual?".to_string(),
                "Busque informações sobre o clima em São Paulo".to_string(),
            ],
            Locale::En => [
                "What is the current date and time?".to_string(),
                "Look up the weather in São Paulo".to_string(),
            ],
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Locale::PtBr),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            _ => Err(DomainError::InvalidLocale(s.to_string())),
        }
    }
}

/// Section labels used by the text and markdown exports.
#[derive(Debug, Clone, Copy)]
pub struct ExportLabels {
    pub title: &'static str,
    pub exported_at: &'static str,
    pub total_entries: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
}
