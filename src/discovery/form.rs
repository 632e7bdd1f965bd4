//! Discovery questionnaire state
//!
//! The questionnaire is three sections visited in order. Moving forward is
//! gated on the current section validating; moving back is always allowed
//! except from the first section. [`DiscoveryForm::to_profile`] validates
//! every section again and is the only way to obtain a submittable
//! [`DiscoveryProfile`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::types::{
    BaselineScores, CompletionMetrics, DiscoveryProfile, Gender, MaritalStatus, WellnessMetric,
    WellnessScore, WellnessScores,
};
use crate::discovery::goals::{self, GoalSelectionError, MAX_GOALS};

/// Reported as the completion device for submissions made from this client.
pub const DEVICE_TYPE: &str = "cli";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// One page of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    BasicInfo,
    Goals,
    WellnessBaseline,
}

impl Section {
    /// Sections in the order they are visited.
    pub const ALL: [Section; 3] = [Self::BasicInfo, Self::Goals, Self::WellnessBaseline];

    /// Heading shown for the section.
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::Goals => "Goals",
            Self::WellnessBaseline => "Wellness Baseline",
        }
    }

    /// One-based position, for "step 2 of 3" style progress.
    pub fn number(self) -> usize {
        match self {
            Self::BasicInfo => 1,
            Self::Goals => 2,
            Self::WellnessBaseline => 3,
        }
    }

    fn next(self) -> Option<Section> {
        match self {
            Self::BasicInfo => Some(Self::Goals),
            Self::Goals => Some(Self::WellnessBaseline),
            Self::WellnessBaseline => None,
        }
    }

    fn previous(self) -> Option<Section> {
        match self {
            Self::BasicInfo => None,
            Self::Goals => Some(Self::BasicInfo),
            Self::WellnessBaseline => Some(Self::Goals),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Per-field validation messages, keyed by wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// An empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, keeping the first message per field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Adds every message from `other`.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.fields {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// Answers on the Basic Info section. Everything is optional until validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub preferred_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub weight: Option<u32>,
    pub location: Option<String>,
    pub marital_status: MaritalStatus,
}

/// In-progress discovery questionnaire.
///
/// Serializable so it can be saved as a draft and resumed later. Time spent
/// on the form is counted per sitting: a draft carries the active time of
/// earlier sittings, and the clock for the current one restarts on load, so
/// hours between sittings are not reported as completion time.
///
/// # Examples
///
/// ```
/// use vitalpath::discovery::{DiscoveryForm, Section};
///
/// let mut form = DiscoveryForm::new();
/// assert!(form.next().is_err());
/// assert_eq!(form.section(), Section::BasicInfo);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryForm {
    #[serde(default)]
    pub basic: BasicInfo,
    #[serde(default)]
    goals: Vec<String>,
    #[serde(default)]
    pub baseline: WellnessScores,
    #[serde(default)]
    section: Section,
    #[serde(default)]
    page_revisits: u32,
    started_at: DateTime<Utc>,
    /// Seconds spent in earlier sittings.
    #[serde(default)]
    active_seconds: i64,
    #[serde(skip, default = "Utc::now")]
    sitting_started_at: DateTime<Utc>,
    #[serde(default)]
    resumed: bool,
}

impl Default for DiscoveryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryForm {
    /// A blank form on the first section, with every score at the midpoint.
    pub fn new() -> Self {
        Self {
            basic: BasicInfo::default(),
            goals: Vec::new(),
            baseline: WellnessScores::default(),
            section: Section::BasicInfo,
            page_revisits: 0,
            started_at: Utc::now(),
            active_seconds: 0,
            sitting_started_at: Utc::now(),
            resumed: false,
        }
    }

    /// Section currently shown.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Selected goal identifiers in priority order.
    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    /// Number of back moves so far.
    pub fn page_revisits(&self) -> u32 {
        self.page_revisits
    }

    /// Whether this form was restored from a saved draft.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Flags the form as restored from a draft and starts a new sitting.
    pub fn mark_resumed(&mut self) {
        self.resumed = true;
        self.sitting_started_at = Utc::now();
    }

    /// Time spent on the form across every sitting, up to now.
    pub fn active_duration(&self) -> Duration {
        let sitting = Utc::now().signed_duration_since(self.sitting_started_at);
        Duration::seconds(self.active_seconds) + sitting.max(Duration::zero())
    }

    /// Copy of the form to persist as a draft, with the current sitting
    /// folded into the recorded active time.
    pub fn to_draft(&self) -> DiscoveryForm {
        let now = Utc::now();
        let mut draft = self.clone();
        draft.active_seconds = self.active_duration().num_seconds();
        draft.sitting_started_at = now;
        draft
    }

    /// Validates the current section and moves to the next one.
    ///
    /// Returns the new section, or `None` when already on the last section
    /// and the form is ready to submit.
    ///
    /// # Errors
    ///
    /// Returns the current section's field errors; the section does not
    /// change.
    pub fn next(&mut self) -> Result<Option<Section>, ValidationErrors> {
        self.validate_section(self.section)?;
        match self.section.next() {
            Some(next) => {
                self.section = next;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    /// Moves to the previous section without validating.
    ///
    /// Returns `None` (and stays put) on the first section.
    pub fn back(&mut self) -> Option<Section> {
        let previous = self.section.previous()?;
        self.section = previous;
        self.page_revisits += 1;
        Some(previous)
    }

    /// Selects `goal` if it is not selected yet, deselects it otherwise.
    ///
    /// Returns `true` if the goal is selected afterwards.
    ///
    /// # Errors
    ///
    /// Refuses unknown goals and a selection beyond three.
    pub fn toggle_goal(&mut self, goal: &str) -> Result<bool, GoalSelectionError> {
        let goal = goals::resolve(goal)?;
        if let Some(pos) = self.goals.iter().position(|g| g == goal.id) {
            self.goals.remove(pos);
            return Ok(false);
        }
        if self.goals.len() >= MAX_GOALS {
            return Err(GoalSelectionError::LimitReached);
        }
        self.goals.push(goal.id.to_string());
        Ok(true)
    }

    /// Replaces the whole selection, in priority order.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown goal or when more than three are given;
    /// the previous selection is kept in that case.
    pub fn set_goals<I, S>(&mut self, selection: I) -> Result<(), GoalSelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chosen: Vec<String> = Vec::new();
        for input in selection {
            let goal = goals::resolve(input.as_ref())?;
            if chosen.iter().any(|g| g == goal.id) {
                continue;
            }
            if chosen.len() >= MAX_GOALS {
                return Err(GoalSelectionError::LimitReached);
            }
            chosen.push(goal.id.to_string());
        }
        self.goals = chosen;
        Ok(())
    }

    /// Sets one baseline score.
    pub fn set_score(&mut self, metric: WellnessMetric, score: WellnessScore) {
        self.baseline.set(metric, score);
    }

    /// Checks the required fields of `section`.
    pub fn validate_section(&self, section: Section) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match section {
            Section::BasicInfo => {
                let basic = &self.basic;
                if is_blank(&basic.preferred_name) {
                    errors.add("preferred_name", "Preferred name is required");
                }
                if basic.age.is_none() {
                    errors.add("age", "Age is required");
                }
                if basic.gender.is_none() {
                    errors.add("gender", "Gender is required");
                }
                if basic.height_feet.is_none() {
                    errors.add("height_feet", "Height is required");
                }
                if basic.weight.is_none() {
                    errors.add("weight", "Weight is required");
                }
                if is_blank(&basic.location) {
                    errors.add("location", "Location is required");
                }
            }
            Section::Goals => {
                if self.goals.is_empty() {
                    errors.add("goals", "Select at least one goal");
                } else if self.goals.len() > MAX_GOALS {
                    errors.add("goals", "Select no more than 3 goals");
                }
            }
            // Every score has a default.
            Section::WellnessBaseline => {}
        }
        errors.into_result()
    }

    /// Checks every section.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for section in Section::ALL {
            if let Err(e) = self.validate_section(section) {
                errors.merge(e);
            }
        }
        errors.into_result()
    }

    /// First section with a validation error, if any.
    pub fn first_invalid_section(&self) -> Option<Section> {
        Section::ALL
            .into_iter()
            .find(|s| self.validate_section(*s).is_err())
    }

    /// Builds the submission payload, including completion metrics.
    ///
    /// # Errors
    ///
    /// Returns every field error across all sections.
    pub fn to_profile(&self) -> Result<DiscoveryProfile, ValidationErrors> {
        self.validate_all()?;

        let basic = &self.basic;
        let missing = |field: &str| {
            let mut errors = ValidationErrors::new();
            errors.add(field, "is required");
            errors
        };
        let age = basic.age.ok_or_else(|| missing("age"))?;
        let gender = basic.gender.ok_or_else(|| missing("gender"))?;
        let height_feet = basic.height_feet.ok_or_else(|| missing("height_feet"))?;
        let weight = basic.weight.ok_or_else(|| missing("weight"))?;

        let goal = |i: usize| self.goals.get(i).cloned().unwrap_or_default();

        Ok(DiscoveryProfile {
            uuid: None,
            preferred_name: basic.preferred_name.clone().unwrap_or_default().trim().to_string(),
            age,
            gender,
            height_feet,
            height_inches: basic.height_inches.unwrap_or(0),
            weight,
            location: basic.location.clone().unwrap_or_default().trim().to_string(),
            marital_status: basic.marital_status,
            goal_1: goal(0),
            goal_2: goal(1),
            goal_3: goal(2),
            baseline: BaselineScores(self.baseline),
            completion_metrics: Some(self.completion_metrics()),
            bmi: None,
            bmi_category: None,
            submitted_at: None,
            updated_at: None,
        })
    }

    fn completion_metrics(&self) -> CompletionMetrics {
        let minutes = self.active_duration().num_seconds() as f64 / 60.0;
        CompletionMetrics {
            duration_minutes: (minutes * 100.0).round() / 100.0,
            sections_completed: Section::ALL
                .into_iter()
                .filter(|s| self.validate_section(*s).is_ok())
                .count() as u8,
            goals_selected: self.goals.len() as u8,
            page_revisits: self.page_revisits,
            saved_progress: self.resumed,
            device_type: DEVICE_TYPE.to_string(),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
