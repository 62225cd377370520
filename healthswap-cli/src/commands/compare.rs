//! `healthswap compare` command handler

use std::io::Write;

use serde::Serialize;

use healthswap_core::config::HealthswapConfig;
use healthswap_engine::{ComparisonVerdict, Winner};
use healthswap_engine::compare::DeltaOutcome;

use crate::cli::CompareArgs;
use crate::commands::build_engine;
use crate::error::CliError;
use crate::input::load_product;
use crate::output::{OutputWriter, Render};

/// Execute the `compare` command.
pub async fn execute(
    args: CompareArgs,
    config: &HealthswapConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let (a, b) = tokio::try_join!(load_product(&args.a), load_product(&args.b))?;
    let engine = build_engine(config)?;
    let verdict = engine.compare(&a, &b);

    writer.render(&CompareReport {
        name_a: a.name,
        name_b: b.name,
        verdict,
    })
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub name_a: String,
    pub name_b: String,
    #[serde(flatten)]
    pub verdict: ComparisonVerdict,
}

impl Render for CompareReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let v = &self.verdict;
        writeln!(w, "A: {} (score {})", self.name_a.bold(), v.score_a)?;
        writeln!(w, "B: {} (score {})", self.name_b.bold(), v.score_b)?;

        let winner = match v.winner {
            Winner::A => format!("A by {}", v.margin).green().bold(),
            Winner::B => format!("B by {}", v.margin).green().bold(),
            Winner::Tie => "tie".yellow().bold(),
            Winner::Unknown => "unknown (missing data)".dimmed(),
        };
        writeln!(w, "Winner: {winner}")?;
        writeln!(w)?;

        writeln!(w, "{:<22} {:<10} {:<10} A is", "Attribute", "A", "B")?;
        writeln!(w, "{}", "-".repeat(52))?;
        for d in &v.deltas {
            let outcome = match d.outcome {
                DeltaOutcome::Better => "better".green(),
                DeltaOutcome::Worse => "worse".red(),
                DeltaOutcome::Equal => "equal".normal(),
                DeltaOutcome::Unknown => "unknown".dimmed(),
            };
            writeln!(
                w,
                "{:<22} {:<10} {:<10} {}",
                d.attribute.label(),
                d.value_a.as_deref().unwrap_or("-"),
                d.value_b.as_deref().unwrap_or("-"),
                outcome
            )?;
        }

        if let Some(q) = &v.quantity {
            writeln!(w)?;
            writeln!(w, "Package size (B vs A): {}", q.description)?;
        }

        Ok(())
    }
}
