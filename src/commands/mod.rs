pub mod run;
pub mod status;
pub mod suggest;

use crate::error::CompletionError;
use crate::titler::derive::Completer;
use crate::titler::provider::{ProviderConfig, completer_for, resolve_provider_config};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

pub fn require_completer(
    report: &mut CommandReport,
) -> Option<(ProviderConfig, Box<dyn Completer>)> {
    match resolve_provider_config() {
        Some(config) => {
            let completer = completer_for(&config);
            Some((config, completer))
        }
        None => {
            report.issue(CompletionError::NotConfigured.to_string());
            None
        }
    }
}
