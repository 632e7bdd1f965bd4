//! Terminal rendering of the dashboard

use std::fmt::Write;

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::api::types::WellnessMetric;
use crate::dashboard::progress::{ProgressChange, Trend};
use crate::dashboard::view::DashboardView;

/// Renders goals, progress against baseline and the entry history.
pub fn render(view: &DashboardView) -> String {
    let mut out = String::new();

    let name = view
        .profile()
        .map(|p| p.preferred_name.as_str())
        .unwrap_or("there");
    let _ = writeln!(out, "\n{}\n", format!("Welcome back, {}", name).bold());

    let goals = view.goal_labels();
    if goals.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            "No discovery profile yet. Run `vitalpath discovery` to set your goals.".yellow()
        );
    } else {
        let _ = writeln!(out, "{}", "Your goals".bold());
        for (i, goal) in goals.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, goal);
        }
    }

    if let Some(progress) = view.progress() {
        let heading = if view.latest().is_some() {
            "Current vs. baseline"
        } else {
            "Baseline (no check-ins yet)"
        };
        let _ = writeln!(out, "\n{}", heading.bold());
        let _ = write!(out, "{}", progress_table(&progress));
    }

    let _ = writeln!(out, "\n{}", "History".bold());
    if view.history().is_empty() {
        let _ = writeln!(out, "  No entries yet.");
    } else {
        let _ = write!(out, "{}", history_table(view));
    }

    out
}

fn progress_table(progress: &[ProgressChange]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row!["Indicator", "Baseline", "Current", "Change"]);

    for change in progress {
        let delta = format!("{} {}", change.trend.symbol(), change.formatted_delta());
        let delta = match change.trend {
            Trend::Positive => delta.green(),
            Trend::Neutral => delta.normal(),
            Trend::Negative => delta.red(),
        };
        table.add_row(row![change.metric.label(), change.baseline, change.current, delta]);
    }
    table
}

fn history_table(view: &DashboardView) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    let mut titles = row!["Date"];
    for metric in WellnessMetric::ALL {
        titles.add_cell(prettytable::Cell::new(short_label(metric)));
    }
    table.set_titles(titles);

    for entry in view.history() {
        let date = entry.timestamp.format("%Y-%m-%d %H:%M").to_string();
        let mut cells = row![date];
        for (_, score) in entry.scores.iter() {
            cells.add_cell(prettytable::Cell::new(&score.to_string()));
        }
        table.add_row(cells);
    }
    table
}

fn short_label(metric: WellnessMetric) -> &'static str {
    match metric {
        WellnessMetric::Fulfillment => "Fulfil",
        WellnessMetric::Happiness => "Happy",
        WellnessMetric::Energy => "Energy",
        WellnessMetric::Stress => "Stress",
        WellnessMetric::Sleep => "Sleep",
        WellnessMetric::Activity => "Active",
        WellnessMetric::Nutrition => "Nutr",
        WellnessMetric::Purpose => "Purpose",
        WellnessMetric::Motivation => "Motiv",
        WellnessMetric::Confidence => "Conf",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DashboardEntry, WellnessScore, WellnessScores};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_without_profile() {
        colored::control::set_override(false);
        let view = DashboardView::from_parts(
            None,
            vec![DashboardEntry {
                id: 1,
                timestamp: Utc.with_ymd_and_hms(2025, 3, 2, 8, 30, 0).unwrap(),
                scores: WellnessScores::uniform(WellnessScore::MAX),
            }],
        );
        let text = render(&view);
        assert!(text.contains("Welcome back, there"));
        assert!(text.contains("vitalpath discovery"));
        assert!(text.contains("2025-03-02 08:30"));
        assert!(text.contains("100"));
        assert!(!text.contains("Current vs. baseline"));
    }

    #[test]
    fn test_render_empty_history() {
        colored::control::set_override(false);
        let view = DashboardView::from_parts(None, vec![]);
        assert!(render(&view).contains("No entries yet."));
    }
}
