//! Diagnostics channel for degraded and fallback decisions.
//!
//! Nothing short of "no data at all" aborts a resolution cycle, so every
//! recovery (a tier falling through, a skipped record, a missing mapping file)
//! is recorded here for the caller and mirrored as a `tracing` event.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::DatasetKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A single recorded decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Tier the decision was taken in, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<DatasetKind>,
    /// File involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            tier: None,
            path: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    #[must_use]
    pub fn with_tier(mut self, tier: DatasetKind) -> Self {
        self.tier = Some(tier);
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Ordered list of diagnostics collected during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and emits it as a tracing event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let tier = diagnostic.tier.map(|t| t.label()).unwrap_or("-");
        let path = diagnostic
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match diagnostic.severity {
            DiagnosticSeverity::Info => {
                tracing::info!(tier, path = %path, "{}", diagnostic.message);
            }
            DiagnosticSeverity::Warning => {
                tracing::warn!(tier, path = %path, "{}", diagnostic.message);
            }
            DiagnosticSeverity::Error => {
                tracing::error!(tier, path = %path, "{}", diagnostic.message);
            }
        }
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticSeverity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticSeverity::Error)
    }

    fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Diagnostics recorded for one tier, in order.
    pub fn for_tier(&self, tier: DatasetKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.tier == Some(tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::info("selected live results"));
        diagnostics.push(
            Diagnostic::warning("status is 'running'")
                .with_tier(DatasetKind::LiveResults)
                .with_path("latest_race_results.json"),
        );
        diagnostics.push(Diagnostic::error("unreadable").with_tier(DatasetKind::BackupFile));

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.for_tier(DatasetKind::LiveResults).count(), 1);
    }
}
