//! `healthswap trend` command handler

use std::io::Write;

use serde::Serialize;

use healthswap_core::config::HealthswapConfig;
use healthswap_engine::trend::summarize;
use healthswap_engine::{TrendDirection, TrendSummary};

use crate::cli::TrendArgs;
use crate::error::CliError;
use crate::input::load_history;
use crate::output::{OutputWriter, Render};

/// Execute the `trend` command.
pub async fn execute(
    args: TrendArgs,
    config: &HealthswapConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let history = load_history(&args.history).await?;
    let summary = summarize(&history, config.ranking.score_tie_margin);
    writer.render(&TrendReport { summary })
}

#[derive(Debug, Serialize)]
pub struct TrendReport {
    /// `None` for an empty history.
    pub summary: Option<TrendSummary>,
}

impl Render for TrendReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let Some(s) = &self.summary else {
            return writeln!(w, "{}", "No scans recorded.".yellow());
        };

        writeln!(w, "Scans: {}", s.count)?;
        writeln!(w, "Average score: {:.1}", s.average_score)?;
        writeln!(w, "Best: {} (at {})", s.best.score, s.best.scanned_at)?;
        writeln!(w, "Worst: {} (at {})", s.worst.score, s.worst.scanned_at)?;
        let direction = match s.direction {
            TrendDirection::Improving => "improving".green().bold(),
            TrendDirection::Declining => "declining".red().bold(),
            TrendDirection::Stable => "stable".normal(),
        };
        writeln!(w, "Trend: {direction}")
    }
}
