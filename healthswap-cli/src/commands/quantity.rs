//! `healthswap quantity` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use healthswap_core::config::HealthswapConfig;
use healthswap_engine::{
    ParsedQuantity, QuantityComparison, QuantityUnit, compare_quantities, parse_quantity,
};

use crate::cli::QuantityArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `quantity` command.
pub fn execute(
    args: QuantityArgs,
    config: &HealthswapConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = build_report(
        &args.first,
        args.second.as_deref(),
        config.ranking.quantity_tolerance_percent,
    )?;
    writer.render(&report)
}

fn build_report(
    first: &str,
    second: Option<&str>,
    tolerance_percent: f64,
) -> Result<QuantityReport, CliError> {
    let parse = |text: &str| {
        parse_quantity(text)
            .ok_or_else(|| CliError::Input(format!("unrecognized package size: {text:?}")))
    };

    let first = parse(first)?;
    let second = second.map(parse).transpose()?;
    let comparison = second
        .as_ref()
        .and_then(|b| compare_quantities(&first, b, tolerance_percent));

    Ok(QuantityReport {
        first,
        second,
        comparison,
    })
}

/// Parsed quantities and their comparison.
#[derive(Debug, Serialize)]
pub struct QuantityReport {
    pub first: ParsedQuantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<ParsedQuantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<QuantityComparison>,
}

impl Render for QuantityReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        fn line(w: &mut dyn Write, label: &str, q: &ParsedQuantity) -> std::io::Result<()> {
            let base = match q.unit {
                QuantityUnit::Count => "count",
                _ if q.is_volume => "ml",
                _ => "g",
            };
            writeln!(
                w,
                "{label}: {} (normalized {} {base})",
                q.display.bold(),
                q.normalized
            )
        }

        line(w, "A", &self.first)?;
        if let Some(second) = &self.second {
            line(w, "B", second)?;
            match &self.comparison {
                Some(c) => writeln!(w, "B vs A: {}", c.description.cyan())?,
                None => writeln!(w, "B vs A: {}", "not comparable".dimmed())?,
            }
        }
        Ok(())
    }
}
