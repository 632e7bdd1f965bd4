//! Onboarding ("discovery") questionnaire
//!
//! # Module Layout
//!
//! - [`form`]    -- section state machine and validation
//! - [`goals`]   -- the goal catalog
//! - [`answers`] -- filling the form from a YAML or JSON file
//! - [`draft`]   -- saved progress between runs
//! - [`submit`]  -- the two-step submission

pub mod answers;
pub mod draft;
pub mod form;
pub mod goals;
pub mod submit;

pub use answers::Answers;
pub use draft::DraftStore;
pub use form::{BasicInfo, DiscoveryForm, Section, ValidationErrors};
pub use goals::{Goal, GoalSelectionError, GOALS};
pub use submit::{resubmit_discovery, submit_discovery, NextStep, SubmissionKind, SubmissionOutcome};
