//! Data behind the dashboard screen

use thiserror::Error;

use crate::api::types::{DashboardEntry, DiscoveryProfile, WellnessScores};
use crate::api::ApiClient;
use crate::dashboard::progress::{compare, ProgressChange};
use crate::discovery::goals;
use crate::error::{Result, VitalPathError};

/// Dashboard failures that the user can recover from by retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// The entry history could not be loaded.
    #[error("Could not load your dashboard ({status}): {message}")]
    Load { status: u16, message: String },
}

/// Profile and entry history, ready to render.
#[derive(Debug, Clone)]
pub struct DashboardView {
    profile: Option<DiscoveryProfile>,
    /// Newest first.
    history: Vec<DashboardEntry>,
}

impl DashboardView {
    /// Loads the profile and the history concurrently.
    ///
    /// A missing profile is tolerated; the view then has no baseline.
    ///
    /// # Errors
    ///
    /// - Session errors when signed out or the session cannot be renewed.
    /// - [`DashboardError::Load`] when the history request is rejected.
    pub async fn load(client: &ApiClient) -> Result<Self> {
        let (profile, history) =
            tokio::join!(client.fetch_discovery(), client.list_dashboard_entries());

        let history = history.map_err(|e| match e.downcast_ref::<VitalPathError>() {
            Some(VitalPathError::Api { status, message }) => DashboardError::Load {
                status: *status,
                message: message.clone(),
            }
            .into(),
            _ => e,
        })?;

        let profile = match profile {
            Ok(profile) => profile,
            Err(e) if VitalPathError::session_kind(&e).is_some() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load discovery profile");
                None
            }
        };

        tracing::debug!(
            entries = history.len(),
            has_profile = profile.is_some(),
            "Loaded dashboard"
        );
        Ok(Self::from_parts(profile, history))
    }

    /// Builds a view from already fetched data, sorting the history newest
    /// first.
    pub fn from_parts(
        profile: Option<DiscoveryProfile>,
        mut history: Vec<DashboardEntry>,
    ) -> Self {
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Self { profile, history }
    }

    pub fn profile(&self) -> Option<&DiscoveryProfile> {
        self.profile.as_ref()
    }

    /// Entries, newest first.
    pub fn history(&self) -> &[DashboardEntry] {
        &self.history
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&DashboardEntry> {
        self.history.first()
    }

    /// Goal labels in priority order. Identifiers outside the catalog are
    /// shown verbatim.
    pub fn goal_labels(&self) -> Vec<String> {
        self.profile
            .as_ref()
            .map(|p| {
                p.goals()
                    .into_iter()
                    .map(|g| goals::find(g).map_or_else(|| g.to_string(), |goal| goal.label.into()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Baseline scores from the profile.
    pub fn baseline(&self) -> Option<&WellnessScores> {
        self.profile.as_ref().map(|p| p.baseline_scores())
    }

    /// The latest entry compared against the baseline. Without entries the
    /// baseline stands in for the current scores. `None` without a profile.
    pub fn progress(&self) -> Option<Vec<ProgressChange>> {
        let baseline = self.baseline()?;
        let current = self.latest().map_or(baseline, |e| &e.scores);
        Some(compare(baseline, current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BaselineScores, Gender, MaritalStatus, WellnessMetric, WellnessScore};
    use crate::dashboard::Trend;
    use chrono::{TimeZone, Utc};

    fn profile(baseline: WellnessScores) -> DiscoveryProfile {
        DiscoveryProfile {
            uuid: None,
            preferred_name: "Alex".into(),
            age: 34,
            gender: Gender::Female,
            height_feet: 5,
            height_inches: 7,
            weight: 150,
            location: "Seattle".into(),
            marital_status: MaritalStatus::Unspecified,
            goal_1: "longevity".into(),
            goal_2: "custom-goal".into(),
            goal_3: String::new(),
            baseline: BaselineScores(baseline),
            completion_metrics: None,
            bmi: None,
            bmi_category: None,
            submitted_at: None,
            updated_at: None,
        }
    }

    fn entry(id: i64, day: u32, scores: WellnessScores) -> DashboardEntry {
        DashboardEntry {
            id,
            timestamp: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
            scores,
        }
    }

    #[test]
    fn test_history_sorted_newest_first() {
        let scores = WellnessScores::default();
        let view = DashboardView::from_parts(
            None,
            vec![entry(1, 1, scores), entry(3, 9, scores), entry(2, 5, scores)],
        );
        let ids: Vec<_> = view.history().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(view.latest().unwrap().id, 3);
    }

    #[test]
    fn test_progress_uses_latest_entry() {
        let baseline = WellnessScores::uniform(WellnessScore::MIDPOINT);
        let mut older = baseline;
        older.set(WellnessMetric::Energy, WellnessScore::MIN);
        let mut newer = baseline;
        newer.set(WellnessMetric::Energy, WellnessScore::MAX);

        let view = DashboardView::from_parts(
            Some(profile(baseline)),
            vec![entry(2, 10, newer), entry(1, 2, older)],
        );
        let progress = view.progress().unwrap();
        let energy = progress
            .iter()
            .find(|c| c.metric == WellnessMetric::Energy)
            .unwrap();
        assert_eq!(energy.current.value(), 100);
        assert_eq!(energy.trend, Trend::Positive);
    }

    #[test]
    fn test_progress_without_entries_is_neutral() {
        let view = DashboardView::from_parts(Some(profile(WellnessScores::default())), vec![]);
        let progress = view.progress().unwrap();
        assert!(progress.iter().all(|c| c.trend == Trend::Neutral));
    }

    #[test]
    fn test_no_profile_means_no_progress() {
        let view = DashboardView::from_parts(None, vec![entry(1, 1, WellnessScores::default())]);
        assert!(view.progress().is_none());
        assert!(view.goal_labels().is_empty());
    }

    #[test]
    fn test_goal_labels() {
        let view = DashboardView::from_parts(Some(profile(WellnessScores::default())), vec![]);
        assert_eq!(view.goal_labels(), vec!["Longevity", "custom-goal"]);
    }
}
