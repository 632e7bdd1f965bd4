//! `vitalpath dashboard` and `vitalpath checkin`

use colored::Colorize;
use serde_json::json;

use crate::api::types::{WellnessMetric, WellnessScore, WellnessScores};
use crate::api::ApiClient;
use crate::config::Config;
use crate::dashboard::{render, DashboardView};
use crate::error::Result;

/// Loads and prints the dashboard.
pub async fn show_dashboard(config: &Config, json: bool) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let view = DashboardView::load(&client).await?;

    if json {
        let output = json!({
            "preferred_name": view.profile().map(|p| p.preferred_name.clone()),
            "goals": view.goal_labels(),
            "progress": view.progress(),
            "history": view.history(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render(&view));
    }
    Ok(())
}

/// Starting point for a check-in: the latest entry, else the discovery
/// baseline, else the scale midpoint.
pub fn checkin_scores(
    view: &DashboardView,
    updates: &[(WellnessMetric, WellnessScore)],
) -> WellnessScores {
    let mut scores = view
        .latest()
        .map(|e| e.scores)
        .or_else(|| view.baseline().copied())
        .unwrap_or_default();
    for (metric, score) in updates {
        scores.set(*metric, *score);
    }
    scores
}

/// Records a new dashboard entry.
pub async fn run_checkin(
    config: &Config,
    updates: Vec<(WellnessMetric, WellnessScore)>,
) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let view = DashboardView::load(&client).await?;
    let scores = checkin_scores(&view, &updates);

    let entry = client.create_dashboard_entry(&scores).await?;
    tracing::info!(entry_id = entry.id, updated = updates.len(), "Check-in recorded");

    println!("{}", "Check-in recorded.".green());
    for (metric, score) in entry.scores.iter() {
        println!("  {:<18} {:>3}", metric.label(), score);
    }
    Ok(())
}
