//! Command-line interface definition for VitalPath
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for authentication, onboarding and the dashboard.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::types::{WellnessMetric, WellnessScore};

/// VitalPath - health coaching study client
///
/// Sign in, complete the discovery questionnaire and track your wellness
/// scores over time.
#[derive(Parser, Debug, Clone)]
#[command(name = "vitalpath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the API base URL from config
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for VitalPath
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "VITALPATH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "VITALPATH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show sign-in state and backend health
    Status,

    /// Accept the study's informed consent
    Consent,

    /// Complete the discovery questionnaire
    Discovery {
        /// Fill the questionnaire from a YAML or JSON answers file
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Ignore any saved draft and start over
        #[arg(long)]
        fresh: bool,
    },

    /// Show goals, progress against baseline and history
    Dashboard {
        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record today's wellness scores
    ///
    /// Metrics that are not given keep their most recent value.
    Checkin {
        /// Score as metric=value, e.g. `--score energy=70`; repeatable
        #[arg(short, long = "score", value_parser = parse_score_assignment)]
        scores: Vec<(WellnessMetric, WellnessScore)>,
    },

    /// List the goals that can be selected during discovery
    Goals,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            api_url: None,
            command: Commands::Status,
        }
    }
}

/// Parses `metric=value` as used by `checkin --score`.
fn parse_score_assignment(raw: &str) -> Result<(WellnessMetric, WellnessScore), String> {
    let (metric, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected metric=value, got '{}'", raw))?;
    Ok((metric.parse()?, value.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(cli.api_url.is_none());
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_cli_parse_login() {
        let cli = Cli::try_parse_from([
            "vitalpath",
            "login",
            "--email",
            "alex@example.com",
            "--password",
            "secret",
        ])
        .unwrap();
        if let Commands::Login { email, password } = cli.command {
            assert_eq!(email, "alex@example.com");
            assert_eq!(password.as_deref(), Some("secret"));
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_login_requires_email() {
        assert!(Cli::try_parse_from(["vitalpath", "login"]).is_err());
    }

    #[test]
    fn test_cli_parse_discovery_with_answers() {
        let cli =
            Cli::try_parse_from(["vitalpath", "discovery", "--answers", "alex.yaml", "--fresh"])
                .unwrap();
        if let Commands::Discovery { answers, fresh } = cli.command {
            assert_eq!(answers, Some(PathBuf::from("alex.yaml")));
            assert!(fresh);
        } else {
            panic!("Expected Discovery command");
        }
    }

    #[test]
    fn test_cli_parse_dashboard_json() {
        let cli = Cli::try_parse_from(["vitalpath", "dashboard", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Dashboard { json: true }));
    }

    #[test]
    fn test_cli_parse_checkin_scores() {
        let cli = Cli::try_parse_from([
            "vitalpath",
            "checkin",
            "--score",
            "energy=0",
            "-s",
            "sleep=100",
        ])
        .unwrap();
        if let Commands::Checkin { scores } = cli.command {
            assert_eq!(
                scores,
                vec![
                    (WellnessMetric::Energy, WellnessScore::MIN),
                    (WellnessMetric::Sleep, WellnessScore::MAX),
                ]
            );
        } else {
            panic!("Expected Checkin command");
        }
    }

    #[test]
    fn test_cli_parse_checkin_rejects_out_of_range() {
        assert!(Cli::try_parse_from(["vitalpath", "checkin", "--score", "energy=101"]).is_err());
        assert!(Cli::try_parse_from(["vitalpath", "checkin", "--score", "energy"]).is_err());
        assert!(Cli::try_parse_from(["vitalpath", "checkin", "--score", "mood=5"]).is_err());
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vitalpath",
            "status",
            "--api-url",
            "https://study.example.com",
            "-v",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://study.example.com"));
        assert!(cli.verbose);
        assert!(cli.json_logs);
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::try_parse_from(["vitalpath", "--config", "custom.yaml", "goals"]).unwrap();
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["vitalpath"]).is_err());
    }
}
