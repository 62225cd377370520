//! `healthswap terms` command handler

use std::io::Write;

use serde::Serialize;

use healthswap_engine::extract_search_terms;

use crate::cli::TermsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `terms` command.
pub fn execute(args: TermsArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let terms = extract_search_terms(&args.name, args.categories.as_deref());
    writer.render(&TermsReport {
        name: args.name,
        categories: args.categories,
        terms,
    })
}

#[derive(Debug, Serialize)]
pub struct TermsReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    pub terms: Vec<String>,
}

impl Render for TermsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Product: {}", self.name.bold())?;
        if self.terms.is_empty() {
            writeln!(w, "{}", "No search terms.".yellow())?;
        }
        for (i, term) in self.terms.iter().enumerate() {
            writeln!(w, "  {}. {}", i + 1, term)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_terms_in_order() {
        let report = TermsReport {
            name: "Greek Yogurt".to_owned(),
            categories: None,
            terms: vec!["greek yogurt".to_owned(), "yogurt".to_owned()],
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("1. greek yogurt"));
        assert!(output.contains("2. yogurt"));
    }

    #[test]
    fn test_json_omits_missing_categories() {
        let report = TermsReport {
            name: "x".to_owned(),
            categories: None,
            terms: Vec::new(),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json.get("categories").is_none());
    }
}
