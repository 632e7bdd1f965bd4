//! Non-interactive questionnaire answers
//!
//! An answers file fills the whole form in one go so `vitalpath discovery
//! --answers alex.yaml` can run unattended. YAML and JSON are both accepted,
//! chosen by file extension:
//!
//! ```yaml
//! preferred_name: Alex
//! age: 34
//! gender: female
//! height_feet: 5
//! height_inches: 7
//! weight: 150
//! location: Seattle
//! goals: [longevity]
//! baseline:
//!   sleep: 40
//!   purpose: 100
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::api::types::{Gender, MaritalStatus, WellnessMetric, WellnessScore};
use crate::discovery::form::{DiscoveryForm, ValidationErrors};
use crate::error::{Result, VitalPathError};

/// Answers for every section. Omitted fields stay unset on the form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Answers {
    pub preferred_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_feet: Option<u32>,
    pub height_inches: Option<u32>,
    pub weight: Option<u32>,
    pub location: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub goals: Vec<String>,
    /// Metric name (key or label) to score; unlisted metrics stay at 50.
    #[serde(default)]
    pub baseline: BTreeMap<String, WellnessScore>,
}

impl Answers {
    /// Reads answers from `path`; `.json` files are parsed as JSON, anything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse,
    /// including scores outside 0-100.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VitalPathError::Config(format!(
                "Failed to read answers file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let answers = if is_json {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        tracing::debug!(path = %path.display(), "Loaded discovery answers");
        Ok(answers)
    }

    /// Writes the answers onto `form`.
    ///
    /// # Errors
    ///
    /// Collects unknown goals, too many goals and unknown metric names as
    /// field errors. The form may be partially updated.
    pub fn apply_to(&self, form: &mut DiscoveryForm) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let basic = &mut form.basic;
        if self.preferred_name.is_some() {
            basic.preferred_name = self.preferred_name.clone();
        }
        if self.location.is_some() {
            basic.location = self.location.clone();
        }
        basic.age = self.age.or(basic.age);
        basic.gender = self.gender.or(basic.gender);
        basic.height_feet = self.height_feet.or(basic.height_feet);
        basic.height_inches = self.height_inches.or(basic.height_inches);
        basic.weight = self.weight.or(basic.weight);
        if let Some(status) = self.marital_status {
            basic.marital_status = status;
        }

        if !self.goals.is_empty() {
            if let Err(e) = form.set_goals(&self.goals) {
                errors.add("goals", e.to_string());
            }
        }

        for (name, score) in &self.baseline {
            match name.parse::<WellnessMetric>() {
                Ok(metric) => form.set_score(metric, *score),
                Err(e) => errors.add(format!("baseline.{}", name), e),
            }
        }

        errors.into_result()
    }
}
