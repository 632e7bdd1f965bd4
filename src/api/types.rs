//! Request and response shapes exchanged with the VitalPath API
//!
//! Field names follow the backend's JSON exactly. The ten wellness metrics
//! appear bare (`energy`) on dashboard entries and prefixed
//! (`baseline_energy`) on the discovery profile; [`WellnessScores`] is the
//! shared in-memory form and [`BaselineScores`] supplies the prefixed wire
//! encoding.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// WellnessScore
// ---------------------------------------------------------------------------

/// Score outside the 0-100 wellness scale.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("wellness score {0} is outside 0-100")]
pub struct ScoreOutOfRange(pub i64);

/// A self-reported wellness score on the 0-100 scale.
///
/// Construction is checked, so every value in circulation is within range.
/// Both bounds are valid scores.
///
/// # Examples
///
/// ```
/// use vitalpath::api::types::WellnessScore;
///
/// assert_eq!(WellnessScore::try_from(100_i64).unwrap().value(), 100);
/// assert!(WellnessScore::try_from(101_i64).is_err());
/// assert_eq!(WellnessScore::default().value(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct WellnessScore(u8);

impl WellnessScore {
    /// Lowest score on the scale.
    pub const MIN: WellnessScore = WellnessScore(0);
    /// Highest score on the scale.
    pub const MAX: WellnessScore = WellnessScore(100);
    /// Neutral starting point used before the user moves a slider.
    pub const MIDPOINT: WellnessScore = WellnessScore(50);

    /// The raw score.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for WellnessScore {
    fn default() -> Self {
        Self::MIDPOINT
    }
}

impl TryFrom<i64> for WellnessScore {
    type Error = ScoreOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<WellnessScore> for u8 {
    fn from(score: WellnessScore) -> Self {
        score.0
    }
}

impl FromStr for WellnessScore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a whole number", s.trim()))?;
        Self::try_from(value).map_err(|e| e.to_string())
    }
}

impl fmt::Display for WellnessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// WellnessMetric
// ---------------------------------------------------------------------------

/// The ten tracked wellness and purpose indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellnessMetric {
    Fulfillment,
    Happiness,
    Energy,
    /// Higher means better stress management.
    Stress,
    Sleep,
    Activity,
    Nutrition,
    Purpose,
    Motivation,
    Confidence,
}

impl WellnessMetric {
    /// All metrics in display order.
    pub const ALL: [WellnessMetric; 10] = [
        Self::Fulfillment,
        Self::Happiness,
        Self::Energy,
        Self::Stress,
        Self::Sleep,
        Self::Activity,
        Self::Nutrition,
        Self::Purpose,
        Self::Motivation,
        Self::Confidence,
    ];

    /// Field name on dashboard entries.
    pub fn key(self) -> &'static str {
        match self {
            Self::Fulfillment => "fulfillment",
            Self::Happiness => "happiness",
            Self::Energy => "energy",
            Self::Stress => "stress",
            Self::Sleep => "sleep",
            Self::Activity => "activity",
            Self::Nutrition => "nutrition",
            Self::Purpose => "purpose",
            Self::Motivation => "motivation",
            Self::Confidence => "confidence",
        }
    }

    /// Field name on the discovery profile.
    pub fn baseline_key(self) -> &'static str {
        match self {
            Self::Fulfillment => "baseline_fulfillment",
            Self::Happiness => "baseline_happiness",
            Self::Energy => "baseline_energy",
            Self::Stress => "baseline_stress",
            Self::Sleep => "baseline_sleep",
            Self::Activity => "baseline_activity",
            Self::Nutrition => "baseline_nutrition",
            Self::Purpose => "baseline_purpose",
            Self::Motivation => "baseline_motivation",
            Self::Confidence => "baseline_confidence",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fulfillment => "Life Fulfillment",
            Self::Happiness => "Happiness",
            Self::Energy => "Energy",
            Self::Stress => "Stress Management",
            Self::Sleep => "Sleep Quality",
            Self::Activity => "Physical Activity",
            Self::Nutrition => "Nutrition",
            Self::Purpose => "Life Purpose",
            Self::Motivation => "Motivation",
            Self::Confidence => "Confidence",
        }
    }
}

impl fmt::Display for WellnessMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WellnessMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        let needle = needle.strip_prefix("baseline_").unwrap_or(&needle);
        Self::ALL
            .into_iter()
            .find(|m| m.key() == needle || m.label().to_lowercase() == needle)
            .ok_or_else(|| format!("unknown wellness metric '{}'", s.trim()))
    }
}

// ---------------------------------------------------------------------------
// WellnessScores
// ---------------------------------------------------------------------------

/// One value for each of the ten metrics, keyed by bare metric name on the
/// wire. This is the body of `POST /api/dashboard/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WellnessScores {
    pub fulfillment: WellnessScore,
    pub happiness: WellnessScore,
    pub energy: WellnessScore,
    pub stress: WellnessScore,
    pub sleep: WellnessScore,
    pub activity: WellnessScore,
    pub nutrition: WellnessScore,
    pub purpose: WellnessScore,
    pub motivation: WellnessScore,
    pub confidence: WellnessScore,
}

impl WellnessScores {
    /// Every metric set to `score`.
    pub fn uniform(score: WellnessScore) -> Self {
        let mut scores = Self::default();
        for metric in WellnessMetric::ALL {
            scores.set(metric, score);
        }
        scores
    }

    /// Score for `metric`.
    pub fn get(&self, metric: WellnessMetric) -> WellnessScore {
        match metric {
            WellnessMetric::Fulfillment => self.fulfillment,
            WellnessMetric::Happiness => self.happiness,
            WellnessMetric::Energy => self.energy,
            WellnessMetric::Stress => self.stress,
            WellnessMetric::Sleep => self.sleep,
            WellnessMetric::Activity => self.activity,
            WellnessMetric::Nutrition => self.nutrition,
            WellnessMetric::Purpose => self.purpose,
            WellnessMetric::Motivation => self.motivation,
            WellnessMetric::Confidence => self.confidence,
        }
    }

    /// Replaces the score for `metric`.
    pub fn set(&mut self, metric: WellnessMetric, score: WellnessScore) {
        let slot = match metric {
            WellnessMetric::Fulfillment => &mut self.fulfillment,
            WellnessMetric::Happiness => &mut self.happiness,
            WellnessMetric::Energy => &mut self.energy,
            WellnessMetric::Stress => &mut self.stress,
            WellnessMetric::Sleep => &mut self.sleep,
            WellnessMetric::Activity => &mut self.activity,
            WellnessMetric::Nutrition => &mut self.nutrition,
            WellnessMetric::Purpose => &mut self.purpose,
            WellnessMetric::Motivation => &mut self.motivation,
            WellnessMetric::Confidence => &mut self.confidence,
        };
        *slot = score;
    }

    /// Iterates `(metric, score)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (WellnessMetric, WellnessScore)> + '_ {
        WellnessMetric::ALL
            .into_iter()
            .map(move |m| (m, self.get(m)))
    }
}

/// [`WellnessScores`] encoded with `baseline_` prefixed keys.
///
/// Used flattened inside [`DiscoveryProfile`]. Missing keys fall back to the
/// scale midpoint, matching the backend's column defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaselineScores(pub WellnessScores);

impl Serialize for BaselineScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WellnessMetric::ALL.len()))?;
        for (metric, score) in self.0.iter() {
            map.serialize_entry(metric.baseline_key(), &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BaselineScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, serde_json::Value> = HashMap::deserialize(deserializer)?;
        let mut scores = WellnessScores::default();
        for metric in WellnessMetric::ALL {
            let Some(value) = raw.get(metric.baseline_key()) else {
                continue;
            };
            let number = value.as_i64().ok_or_else(|| {
                de::Error::custom(format!("{} must be an integer", metric.baseline_key()))
            })?;
            let score = WellnessScore::try_from(number).map_err(de::Error::custom)?;
            scores.set(metric, score);
        }
        Ok(Self(scores))
    }
}

// ---------------------------------------------------------------------------
// Discovery profile
// ---------------------------------------------------------------------------

/// Gender options offered by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    /// All options in display order.
    pub const ALL: [Gender; 4] = [
        Self::Male,
        Self::Female,
        Self::NonBinary,
        Self::PreferNotToSay,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::NonBinary => "non-binary",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "unknown gender '{}' (expected one of: {})",
                    s.trim(),
                    "male, female, non-binary, prefer-not-to-say"
                )
            })
    }
}

/// Marital status options. Optional on the form; sent as `""` when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaritalStatus {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
    InRelationship,
    PreferNotToSay,
}

impl MaritalStatus {
    const CHOICES: [MaritalStatus; 8] = [
        Self::Unspecified,
        Self::Single,
        Self::Married,
        Self::Divorced,
        Self::Widowed,
        Self::Separated,
        Self::InRelationship,
        Self::PreferNotToSay,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Single => "single",
            Self::Married => "married",
            Self::Divorced => "divorced",
            Self::Widowed => "widowed",
            Self::Separated => "separated",
            Self::InRelationship => "in-relationship",
            Self::PreferNotToSay => "prefer-not-to-say",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::CHOICES
            .into_iter()
            .find(|m| m.as_str() == needle)
            .ok_or_else(|| format!("unknown marital status '{}'", s.trim()))
    }
}

/// How the questionnaire was completed, stored by the backend for research
/// analytics. Write-only on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetrics {
    pub duration_minutes: f64,
    pub sections_completed: u8,
    pub goals_selected: u8,
    pub page_revisits: u32,
    pub saved_progress: bool,
    pub device_type: String,
}

/// The onboarding questionnaire as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryProfile {
    #[serde(default, skip_serializing)]
    pub uuid: Option<Uuid>,

    pub preferred_name: String,
    pub age: u32,
    pub gender: Gender,
    pub height_feet: u32,
    #[serde(default)]
    pub height_inches: u32,
    /// Pounds.
    pub weight: u32,
    pub location: String,
    #[serde(default)]
    pub marital_status: MaritalStatus,

    /// Goals in priority order; unused slots are empty strings.
    pub goal_1: String,
    #[serde(default)]
    pub goal_2: String,
    #[serde(default)]
    pub goal_3: String,

    #[serde(flatten)]
    pub baseline: BaselineScores,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_metrics: Option<CompletionMetrics>,

    #[serde(default, skip_serializing)]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing)]
    pub bmi_category: Option<String>,
    #[serde(default, skip_serializing)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DiscoveryProfile {
    /// Non-empty goal identifiers in priority order.
    pub fn goals(&self) -> Vec<&str> {
        [&self.goal_1, &self.goal_2, &self.goal_3]
            .into_iter()
            .map(|g| g.as_str())
            .filter(|g| !g.trim().is_empty())
            .collect()
    }

    /// Baseline wellness scores.
    pub fn baseline_scores(&self) -> &WellnessScores {
        &self.baseline.0
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// A timestamped snapshot of the ten wellness metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub scores: WellnessScores,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Body of the register and login calls.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Minimal user description returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub preferred_name: Option<String>,
}

/// Response of `POST /api/users/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

/// Body of `POST /api/token/refresh/`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response of `POST /api/token/refresh/`. The refresh token is present only
/// when the backend rotates it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Body of `POST /api/consent/`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsentRequest {
    pub accepted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_profile() -> DiscoveryProfile {
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
            goal_2: String::new(),
            goal_3: String::new(),
            baseline: BaselineScores(WellnessScores::uniform(WellnessScore::MIDPOINT)),
            completion_metrics: None,
            bmi: None,
            bmi_category: None,
            submitted_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_score_bounds() {
        assert_eq!(WellnessScore::try_from(0_i64).unwrap(), WellnessScore::MIN);
        assert_eq!(WellnessScore::try_from(100_i64).unwrap(), WellnessScore::MAX);
        assert_eq!(WellnessScore::try_from(-1_i64), Err(ScoreOutOfRange(-1)));
        assert_eq!(WellnessScore::try_from(101_i64), Err(ScoreOutOfRange(101)));
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<WellnessScore>("101").is_err());
        assert!(serde_json::from_str::<WellnessScore>("-3").is_err());
        assert_eq!(
            serde_json::from_str::<WellnessScore>("0").unwrap().value(),
            0
        );
    }

    #[test]
    fn test_score_from_str() {
        assert_eq!("  72 ".parse::<WellnessScore>().unwrap().value(), 72);
        assert!("abc".parse::<WellnessScore>().is_err());
        assert!("150".parse::<WellnessScore>().is_err());
    }

    #[test]
    fn test_metric_from_str_accepts_keys_labels_and_prefixed() {
        assert_eq!(
            "sleep".parse::<WellnessMetric>().unwrap(),
            WellnessMetric::Sleep
        );
        assert_eq!(
            "Stress Management".parse::<WellnessMetric>().unwrap(),
            WellnessMetric::Stress
        );
        assert_eq!(
            "baseline_purpose".parse::<WellnessMetric>().unwrap(),
            WellnessMetric::Purpose
        );
        assert!("mood".parse::<WellnessMetric>().is_err());
    }

    #[test]
    fn test_profile_serializes_flat_baseline_and_blank_goals() {
        let value = serde_json::to_value(sample_profile()).unwrap();
        assert_eq!(value["baseline_fulfillment"], 50);
        assert_eq!(value["baseline_confidence"], 50);
        assert_eq!(value["goal_1"], "longevity");
        assert_eq!(value["goal_2"], "");
        assert_eq!(value["goal_3"], "");
        assert_eq!(value["gender"], "female");
        assert_eq!(value["marital_status"], "");
        assert!(value.get("uuid").is_none());
        assert!(value.get("bmi").is_none());
        assert!(value.get("completion_metrics").is_none());
    }

    #[test]
    fn test_profile_deserializes_server_response() {
        let body = json!({
            "uuid": "6f1c1a4e-8c7a-4a53-9b0e-2d8f3c9e1a11",
            "preferred_name": "Alex",
            "age": 34,
            "gender": "non-binary",
            "height_feet": 5,
            "height_inches": 7,
            "weight": 150,
            "location": "Seattle",
            "marital_status": "in-relationship",
            "goal_1": "longevity",
            "goal_2": "sleep",
            "goal_3": "",
            "goals_list": ["longevity", "sleep"],
            "baseline_fulfillment": 0,
            "baseline_happiness": 100,
            "baseline_energy": 40,
            "bmi": 23.5,
            "bmi_category": "Normal weight",
            "submitted_at": "2025-03-01T12:00:00Z"
        });
        let profile: DiscoveryProfile = serde_json::from_value(body).unwrap();
        assert!(profile.uuid.is_some());
        assert_eq!(profile.gender, Gender::NonBinary);
        assert_eq!(profile.marital_status, MaritalStatus::InRelationship);
        assert_eq!(profile.goals(), vec!["longevity", "sleep"]);
        let baseline = profile.baseline_scores();
        assert_eq!(baseline.fulfillment.value(), 0);
        assert_eq!(baseline.happiness.value(), 100);
        assert_eq!(baseline.energy.value(), 40);
        // Missing baseline keys fall back to the midpoint.
        assert_eq!(baseline.sleep.value(), 50);
        assert_eq!(profile.bmi, Some(23.5));
    }

    #[test]
    fn test_profile_rejects_out_of_range_baseline() {
        let mut value = serde_json::to_value(sample_profile()).unwrap();
        value["baseline_energy"] = json!(140);
        assert!(serde_json::from_value::<DiscoveryProfile>(value).is_err());
    }

    #[test]
    fn test_dashboard_entry_deserialize() {
        let entry: DashboardEntry = serde_json::from_value(json!({
            "id": 7,
            "timestamp": "2025-03-02T08:30:00.123456Z",
            "fulfillment": 55, "happiness": 60, "energy": 65, "stress": 40,
            "sleep": 70, "activity": 30, "nutrition": 50, "purpose": 80,
            "motivation": 90, "confidence": 100
        }))
        .unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.scores.get(WellnessMetric::Confidence).value(), 100);
        assert_eq!(entry.scores.get(WellnessMetric::Stress).value(), 40);
    }

    #[test]
    fn test_wellness_scores_body_uses_bare_keys() {
        let value = serde_json::to_value(WellnessScores::uniform(WellnessScore::MAX)).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["motivation"], 100);
    }

    #[test]
    fn test_gender_and_marital_parse() {
        assert_eq!("Non Binary".parse::<Gender>().unwrap(), Gender::NonBinary);
        assert!("other".parse::<Gender>().is_err());
        assert_eq!(
            "".parse::<MaritalStatus>().unwrap(),
            MaritalStatus::Unspecified
        );
        assert_eq!(
            "in_relationship".parse::<MaritalStatus>().unwrap(),
            MaritalStatus::InRelationship
        );
    }

    #[test]
    fn test_login_response_optional_fields() {
        let resp: LoginResponse = serde_json::from_value(json!({"access": "a"})).unwrap();
        assert_eq!(resp.access, "a");
        assert!(resp.refresh.is_none());
        assert!(resp.user.is_none());
    }
}
