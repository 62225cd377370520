//! `healthswap alternatives` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use healthswap_core::config::HealthswapConfig;
use healthswap_engine::{AlternativesReport, DiscoveryStatus};

use crate::cli::AlternativesArgs;
use crate::commands::build_engine;
use crate::error::CliError;
use crate::input::load_product;
use crate::output::{OutputWriter, Render};

/// Execute the `alternatives` command.
///
/// # Errors
///
/// Returns `CliError::CatalogUnavailable` (exit code 3) after rendering the
/// empty report when every catalog request failed.
pub async fn execute(
    args: AlternativesArgs,
    config: &HealthswapConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let record = load_product(&args.product).await?;
    let engine = build_engine(config)?;

    info!(
        barcode = %record.barcode,
        catalog = %record.catalog,
        "looking up healthier alternatives"
    );
    let report = engine
        .find_healthier_alternatives(&record, args.max_results)
        .await;

    let output = AlternativesOutput {
        product: record.name,
        message: report.status.user_message(),
        report,
    };
    writer.render(&output)?;

    if output.report.status == DiscoveryStatus::CatalogUnavailable {
        return Err(CliError::CatalogUnavailable(
            "no catalog request succeeded".to_owned(),
        ));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AlternativesOutput {
    pub product: String,
    pub message: &'static str,
    #[serde(flatten)]
    pub report: AlternativesReport,
}

impl Render for AlternativesOutput {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let r = &self.report;
        writeln!(
            w,
            "Product: {} (score {})",
            self.product.bold(),
            r.original_score
        )?;
        writeln!(w, "Search terms: {}", r.search_terms.join(", "))?;
        writeln!(w)?;

        if r.alternatives.is_empty() {
            writeln!(w, "{}", self.message.yellow())?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<4} {:<6} {:<32} {:<16} {:<15} Why",
            "#", "Score", "Name", "Brand", "Badge"
        )?;
        writeln!(w, "{}", "-".repeat(100))?;

        for alt in &r.alternatives {
            let badge = alt.badge.map(|b| b.label()).unwrap_or("");
            writeln!(
                w,
                "{:<4} {:<6} {:<32} {:<16} {:<15} {}",
                alt.rank,
                alt.health_score.to_string().green(),
                alt.candidate.name,
                alt.candidate.brand.as_deref().unwrap_or("-"),
                badge.cyan(),
                alt.improvement_reasons.join("; ")
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use healthswap_core::types::HealthScore;
    use healthswap_engine::{AlternativeResult, CandidateProduct, ValueBadge};

    use super::*;

    fn output(status: DiscoveryStatus, alternatives: Vec<AlternativeResult>) -> AlternativesOutput {
        AlternativesOutput {
            product: "Strawberry Yogurt".to_owned(),
            message: status.user_message(),
            report: AlternativesReport {
                request_id: "req-1".to_owned(),
                original_score: HealthScore::clamped(6),
                search_terms: vec!["yogurt".to_owned()],
                alternatives,
                status,
            },
        }
    }

    #[test]
    fn test_render_alternatives_table() {
        let alt = AlternativeResult {
            candidate: CandidateProduct {
                barcode: "100".to_owned(),
                name: "Plain Yogurt".to_owned(),
                brand: Some("Meadow".to_owned()),
                ..Default::default()
            },
            health_score: HealthScore::clamped(95),
            improvement_reasons: vec!["Better Nutri-Score (A vs D)".to_owned()],
            rank: 1,
            badge: Some(ValueBadge::BestQuality),
        };
        let mut buffer = Vec::new();
        output(DiscoveryStatus::Found, vec![alt])
            .render_text(&mut buffer)
            .expect("render should succeed");
        let text = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(text.contains("Plain Yogurt"));
        assert!(text.contains("Meadow"));
        assert!(text.contains("Better Nutri-Score (A vs D)"));
    }

    #[test]
    fn test_render_empty_uses_user_message() {
        let mut buffer = Vec::new();
        output(DiscoveryStatus::CatalogUnavailable, Vec::new())
            .render_text(&mut buffer)
            .expect("render should succeed");
        let text = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(text.contains("No healthier alternatives found"));
    }

    #[test]
    fn test_json_includes_status_and_message() {
        let json = serde_json::to_value(output(DiscoveryStatus::NoSearchTerms, Vec::new()))
            .expect("serialize");
        assert_eq!(json["status"], "no_search_terms");
        assert_eq!(json["message"], "No healthier alternatives found");
        assert_eq!(json["request_id"], "req-1");
    }
}
