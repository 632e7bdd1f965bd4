//! Progress of current wellness scores against the discovery baseline

use std::fmt;

use serde::Serialize;

use crate::api::types::{WellnessMetric, WellnessScore, WellnessScores};

/// Direction of change from baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Neutral,
    Negative,
}

impl Trend {
    /// Classifies a signed `current - baseline` difference.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitalpath::dashboard::Trend;
    ///
    /// assert_eq!(Trend::from_delta(0), Trend::Neutral);
    /// assert_eq!(Trend::from_delta(-4), Trend::Negative);
    /// ```
    pub fn from_delta(delta: i16) -> Self {
        match delta {
            d if d > 0 => Self::Positive,
            0 => Self::Neutral,
            _ => Self::Negative,
        }
    }

    /// Arrow shown next to the change.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Positive => "↑",
            Self::Neutral => "→",
            Self::Negative => "↓",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        };
        f.write_str(name)
    }
}

/// One metric's change from baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressChange {
    pub metric: WellnessMetric,
    pub baseline: WellnessScore,
    pub current: WellnessScore,
    pub delta: i16,
    pub trend: Trend,
}

impl ProgressChange {
    pub fn new(metric: WellnessMetric, baseline: WellnessScore, current: WellnessScore) -> Self {
        let delta = i16::from(current.value()) - i16::from(baseline.value());
        Self {
            metric,
            baseline,
            current,
            delta,
            trend: Trend::from_delta(delta),
        }
    }

    /// Signed change, e.g. `+12`, `0`, `-5`.
    pub fn formatted_delta(&self) -> String {
        if self.delta > 0 {
            format!("+{}", self.delta)
        } else {
            self.delta.to_string()
        }
    }
}

/// Compares every metric of `current` against `baseline`, in display order.
pub fn compare(baseline: &WellnessScores, current: &WellnessScores) -> Vec<ProgressChange> {
    WellnessMetric::ALL
        .into_iter()
        .map(|m| ProgressChange::new(m, baseline.get(m), current.get(m)))
        .collect()
}
