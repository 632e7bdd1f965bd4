/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `auth`      : register, login, logout and consent
- `status`    : sign-in state and backend health
- `goals`     : the goal catalog
- `discovery` : the onboarding questionnaire
- `dashboard` : dashboard view and check-ins

Handlers are small and delegate to the library components: the API client,
the discovery form and the dashboard view.
*/

use crate::dashboard::DashboardError;
use crate::error::{SessionError, VitalPathError};

// Line prompts shared by interactive handlers
pub mod prompt;

// Discovery questionnaire handler
pub mod discovery;

// Dashboard and check-in handlers
pub mod dashboard;

/// Follow-up advice printed under an error, if the error has an obvious
/// next step.
///
/// # Examples
///
/// ```
/// use vitalpath::commands::error_hint;
/// use vitalpath::error::{SessionError, VitalPathError};
///
/// let err: anyhow::Error = VitalPathError::Session(SessionError::SessionExpired).into();
/// assert!(error_hint(&err).unwrap().contains("vitalpath login"));
/// ```
pub fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(kind) = VitalPathError::session_kind(err) {
        return Some(match kind {
            SessionError::AuthenticationRequired => "Run `vitalpath login` to sign in.",
            SessionError::SessionExpired
            | SessionError::RefreshExpired
            | SessionError::RefreshFailed => "Run `vitalpath login` to sign in again.",
        });
    }
    if err.downcast_ref::<DashboardError>().is_some() {
        return Some("Run `vitalpath dashboard` again to retry.");
    }
    match err.downcast_ref::<VitalPathError>() {
        Some(VitalPathError::Validation(_)) => {
            Some("Fix the fields above and run the command again.")
        }
        Some(VitalPathError::Http(_)) => {
            Some("Check your connection and the api.base_url setting, then retry.")
        }
        _ => None,
    }
}

// Authentication handlers
pub mod auth {
    //! Register, login, logout and consent.
    //!
    //! These calls go straight to the API without the refresh retry; a
    //! successful register or login replaces the stored session.

    use colored::Colorize;

    use crate::api::ApiClient;
    use crate::commands::prompt::{Prompter, ReadlinePrompter};
    use crate::config::Config;
    use crate::error::{Result, VitalPathError};

    /// Uses `password` if given, otherwise asks for it with masked input.
    pub fn resolve_password<P: Prompter>(
        password: Option<String>,
        prompter: &mut P,
    ) -> Result<String> {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            return Ok(password);
        }
        match prompter.ask_secret("Password: ")? {
            Some(line) if !line.is_empty() => Ok(line),
            _ => Err(VitalPathError::Config("A password is required".to_string()).into()),
        }
    }

    fn password_or_prompt(password: Option<String>) -> Result<String> {
        match password {
            Some(p) if !p.is_empty() => Ok(p),
            _ => resolve_password(None, &mut ReadlinePrompter::new()?),
        }
    }

    /// Creates the account, then signs in with the same credentials.
    pub async fn register(config: &Config, email: &str, password: Option<String>) -> Result<()> {
        let password = password_or_prompt(password)?;
        let client = ApiClient::from_config(config)?;
        client.register_and_login(email, &password).await?;
        println!("{}", format!("Account created. Signed in as {}.", email).green());
        println!("Next: run `vitalpath consent`, then `vitalpath discovery`.");
        Ok(())
    }

    /// Signs in and stores the session.
    pub async fn login(config: &Config, email: &str, password: Option<String>) -> Result<()> {
        let password = password_or_prompt(password)?;
        let client = ApiClient::from_config(config)?;
        let response = client.login(email, &password).await?;
        let name = response
            .user
            .and_then(|u| u.preferred_name)
            .unwrap_or_else(|| email.to_string());
        println!("{}", format!("Signed in as {}.", name).green());
        Ok(())
    }

    /// Forgets the stored session.
    pub fn logout(config: &Config) -> Result<()> {
        let client = ApiClient::from_config(config)?;
        client.logout()?;
        println!("Signed out.");
        Ok(())
    }

    /// Records informed consent.
    pub async fn consent(config: &Config) -> Result<()> {
        let client = ApiClient::from_config(config)?;
        client.give_consent().await?;
        println!("{}", "Thank you. Your consent has been recorded.".green());
        Ok(())
    }
}

// Status handler
pub mod status {
    //! Sign-in state and backend health.

    use colored::Colorize;

    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::discovery::DraftStore;
    use crate::error::Result;

    /// Prints where the client points and whether it is signed in.
    pub async fn show_status(config: &Config) -> Result<()> {
        let client = ApiClient::from_config(config)?;

        let backend = match client.health().await {
            Ok(true) => "reachable".green(),
            Ok(false) => "unhealthy".yellow(),
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                "unreachable".red()
            }
        };
        let signed_in = if client.session().is_signed_in()? {
            "yes".green()
        } else {
            "no".yellow()
        };
        let draft = DraftStore::in_dir(config.data_dir()?).path().exists();

        println!("API:        {} ({})", client.base_url(), backend);
        println!("Signed in:  {}", signed_in);
        println!("Store:      {:?}", config.session.store);
        if draft {
            println!("Draft:      unfinished discovery answers saved");
        }
        Ok(())
    }
}

// Goal catalog handler
pub mod goals {
    //! The list of selectable goals.

    use prettytable::{format, row, Table};

    use crate::discovery::GOALS;

    /// Prints the goal catalog.
    pub fn list_goals() {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        table.set_titles(row!["#", "ID", "Goal", "Description"]);
        for (i, goal) in GOALS.iter().enumerate() {
            table.add_row(row![i + 1, goal.id, goal.label, goal.description]);
        }
        table.printstd();
    }
}
