//! `healthswap score` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use healthswap_core::config::HealthswapConfig;
use healthswap_core::types::{HealthScore, ProductHealthProfile};
use healthswap_engine::ProfileBuilder;
use healthswap_engine::score::{
    BASE_SCORE, additive_penalty, flagged_penalty, health_score, hint_points, nova_points,
    nutriscore_points,
};

use crate::cli::ScoreArgs;
use crate::error::CliError;
use crate::input::load_product;
use crate::output::{OutputWriter, Render, or_dash};

/// Execute the `score` command.
pub async fn execute(
    args: ScoreArgs,
    config: &HealthswapConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let record = load_product(&args.product).await?;
    let profile = ProfileBuilder::new(&config.ranking.avoid_ingredients).build(&record);

    let report = ScoreReport::new(record.barcode, record.name, profile);
    info!(
        barcode = %report.barcode,
        score = report.score.value(),
        "scored product"
    );

    writer.render(&report)
}

/// Score report with the per-component breakdown.
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub barcode: String,
    pub name: String,
    pub score: HealthScore,
    pub profile: ProductHealthProfile,
    pub breakdown: ScoreBreakdown,
}

/// Signed contribution of each scoring component.
#[derive(Debug, Serialize)]
pub struct ScoreBreakdown {
    pub base: i32,
    pub nutriscore: i32,
    pub nova: i32,
    pub flagged_ingredients: i32,
    pub additives: i32,
    pub rating_hint: i32,
}

impl ScoreReport {
    fn new(barcode: String, name: String, profile: ProductHealthProfile) -> Self {
        let breakdown = ScoreBreakdown {
            base: BASE_SCORE,
            nutriscore: nutriscore_points(profile.nutriscore_grade),
            nova: nova_points(profile.nova_group),
            flagged_ingredients: -flagged_penalty(profile.flagged_ingredient_count),
            additives: -additive_penalty(profile.additive_count),
            rating_hint: hint_points(profile.health_rating_hint),
        };
        Self {
            barcode,
            name,
            score: health_score(&profile),
            profile,
            breakdown,
        }
    }
}

impl Render for ScoreReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Product: {} ({})", self.name.bold(), self.barcode)?;

        let score = self.score.to_string();
        let score_colored = match self.score.value() {
            70.. => score.green().bold(),
            40..=69 => score.yellow().bold(),
            _ => score.red().bold(),
        };
        writeln!(w, "Health score: {score_colored} / 100")?;
        writeln!(w)?;

        let b = &self.breakdown;
        writeln!(w, "  {:<22} {:>4}", "Base", b.base)?;
        writeln!(
            w,
            "  {:<22} {:>+4}",
            format!("Nutri-Score ({})", or_dash(self.profile.nutriscore_grade)),
            b.nutriscore
        )?;
        writeln!(
            w,
            "  {:<22} {:>+4}",
            format!(
                "NOVA ({})",
                or_dash(self.profile.nova_group.map(|g| g.number()))
            ),
            b.nova
        )?;
        writeln!(
            w,
            "  {:<22} {:>+4}",
            format!(
                "Flagged ingredients ({})",
                self.profile.flagged_ingredient_count
            ),
            b.flagged_ingredients
        )?;
        writeln!(
            w,
            "  {:<22} {:>+4}",
            format!("Additives ({})", self.profile.additive_count),
            b.additives
        )?;
        writeln!(
            w,
            "  {:<22} {:>+4}",
            format!("Rating hint ({})", or_dash(self.profile.health_rating_hint)),
            b.rating_hint
        )?;

        Ok(())
    }
}
