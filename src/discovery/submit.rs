//! Two-step questionnaire submission
//!
//! The profile is created first, then the same baseline scores are recorded
//! as the first dashboard entry. The second write is best-effort: its failure
//! is logged and the submission still counts as successful.
//!
//! A participant who already has a profile gets it replaced instead. The
//! server refuses a second create with a 400 "already exists" response, in
//! which case the submission switches to the update endpoint. Updates do not
//! add a dashboard entry, since the history already has a baseline.

use crate::api::types::{DashboardEntry, DiscoveryProfile};
use crate::api::ApiClient;
use crate::discovery::form::DiscoveryForm;
use crate::error::{Result, VitalPathError};

/// Server wording for a create that collides with an existing profile.
const ALREADY_EXISTS: &str = "already exists";

/// Where the participant goes after submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Dashboard,
}

/// Whether the submission created a new profile or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Created,
    Updated,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub kind: SubmissionKind,
    /// The profile as stored by the server.
    pub profile: DiscoveryProfile,
    /// The initial dashboard entry. Absent after an update or if the
    /// best-effort write failed.
    pub baseline_entry: Option<DashboardEntry>,
}

impl SubmissionOutcome {
    pub fn next_step(&self) -> NextStep {
        NextStep::Dashboard
    }

    /// Whether the baseline was also recorded as a dashboard entry.
    pub fn baseline_recorded(&self) -> bool {
        self.baseline_entry.is_some()
    }
}

/// Validates `form` and submits it as a new profile, falling back to an
/// update when the server reports one already exists.
///
/// # Errors
///
/// - `VitalPathError::Validation` before any request when a section is
///   incomplete (including zero goals).
/// - Session errors from the request helper.
/// - `VitalPathError::Api` when the profile is rejected. The form is not
///   consumed, so the caller can let the user edit and retry.
pub async fn submit_discovery(
    client: &ApiClient,
    form: &DiscoveryForm,
) -> Result<SubmissionOutcome> {
    let profile = form.to_profile().map_err(VitalPathError::Validation)?;

    let stored = match client.create_discovery(&profile).await {
        Ok(stored) => stored,
        Err(e) if is_already_exists(&e) => {
            tracing::info!("Discovery profile already exists, updating it instead");
            return update(client, &profile).await;
        }
        Err(e) => return Err(e),
    };
    tracing::info!(uuid = ?stored.uuid, goals = ?stored.goals(), "Discovery profile created");

    let baseline_entry = match client.create_dashboard_entry(profile.baseline_scores()).await {
        Ok(entry) => {
            tracing::debug!(entry_id = entry.id, "Baseline dashboard entry created");
            Some(entry)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to record baseline dashboard entry");
            None
        }
    };

    Ok(SubmissionOutcome {
        kind: SubmissionKind::Created,
        profile: stored,
        baseline_entry,
    })
}

/// Validates `form` and replaces the participant's existing profile.
///
/// # Errors
///
/// As [`submit_discovery`], except that no create is attempted.
pub async fn resubmit_discovery(
    client: &ApiClient,
    form: &DiscoveryForm,
) -> Result<SubmissionOutcome> {
    let profile = form.to_profile().map_err(VitalPathError::Validation)?;
    update(client, &profile).await
}

async fn update(client: &ApiClient, profile: &DiscoveryProfile) -> Result<SubmissionOutcome> {
    let stored = client.update_discovery(profile).await?;
    tracing::info!(uuid = ?stored.uuid, goals = ?stored.goals(), "Discovery profile updated");
    Ok(SubmissionOutcome {
        kind: SubmissionKind::Updated,
        profile: stored,
        baseline_entry: None,
    })
}

fn is_already_exists(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<VitalPathError>(),
        Some(VitalPathError::Api { status: 400, message }) if message.contains(ALREADY_EXISTS)
    )
}
