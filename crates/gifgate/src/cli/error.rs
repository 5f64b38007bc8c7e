//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Catalog root does not exist or is not a directory
    pub fn root_not_found(root: &Path) -> Self {
        Self::new(format!("Catalog root not found: {}", root.display()))
            .with_context("gifgate operates on an existing catalog directory")
            .with_suggestions([
                format!("TRY: Create it with its intake folder: mkdir -p {}/inbox", root.display()),
                "TRY: Point at another catalog: gifgate --root <DIR> ...".to_string(),
                "TRY: Set GIFGATE_ROOT to your catalog directory".to_string(),
            ])
    }

    /// Config file present but unusable
    pub fn bad_config(path: &Path, details: &str) -> Self {
        Self::new(format!("Invalid catalog config: {}", details))
            .with_context(format!("While loading {}", path.display()))
            .with_suggestions([
                "TRY: Remove the offending key to fall back to its default".to_string(),
                "TRY: Inspect the resolved settings: gifgate config".to_string(),
            ])
    }

    /// Threshold override out of range
    pub fn invalid_threshold(details: &str) -> Self {
        Self::new(format!("Invalid threshold: {}", details))
            .with_context("Thresholds must be finite numbers greater than zero")
            .with_suggestion("TRY: --max-kb 1536 --reject-aspect 5 --review-aspect 3.6")
    }

    /// Decision id that is not a bare file stem
    pub fn invalid_id(id: &str) -> Self {
        Self::new(format!("Invalid asset id: '{}'", id))
            .with_context("An id is the file name without its .gif extension")
            .with_suggestions([
                "TRY: Use the id column from the manifest, e.g. 'siren' for inbox/siren.gif"
                    .to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Emit a command failure as a JSON document on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": helpful.message,
            "context": helpful.context,
            "suggestions": helpful.suggestions,
        }),
        None => serde_json::json!({ "error": format!("{:#}", err) }),
    };
    println!("{}", payload);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While processing data")
            .with_suggestion("Try again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While processing data"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_root_not_found() {
        let err = HelpfulError::root_not_found(&PathBuf::from("/nonexistent/catalog"));
        let display = format!("{}", err);
        assert!(display.contains("/nonexistent/catalog"));
        assert!(display.contains("TRY:"));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = HelpfulError::invalid_id("../x").into();
        let helpful = err.downcast_ref::<HelpfulError>().unwrap();
        assert!(helpful.message.contains("../x"));
    }
}
