//! `vitalpath discovery`: the onboarding questionnaire
//!
//! Interactive mode walks the three sections with line prompts. At any prompt
//! an empty answer keeps the shown value, `:back` returns to the previous
//! section and `:quit` (or Ctrl-C) leaves with the draft saved.

use std::path::PathBuf;
use std::str::FromStr;

use colored::Colorize;

use crate::api::types::{Gender, MaritalStatus, WellnessMetric, WellnessScore};
use crate::api::ApiClient;
use crate::commands::prompt::{Prompter, ReadlinePrompter};
use crate::config::Config;
use crate::discovery::goals::GOALS;
use crate::discovery::{
    resubmit_discovery, submit_discovery, Answers, DiscoveryForm, DraftStore, NextStep, Section,
    SubmissionKind, ValidationErrors,
};
use crate::error::{Result, VitalPathError};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormExit {
    /// Every section validated; the form can be submitted.
    Ready,
    /// The user quit before finishing.
    Cancelled,
}

enum Flow {
    Next,
    Back,
    Quit,
}

enum Reply {
    Value(String),
    Keep,
    Back,
    Quit,
}

/// Runs the discovery command.
pub async fn run_discovery(config: Config, answers: Option<PathBuf>, fresh: bool) -> Result<()> {
    let client = ApiClient::from_config(&config)?;
    // Fail before asking anything if there is no session to submit with.
    client.session().access_token()?;

    let existing = match client.fetch_discovery().await {
        Ok(profile) => profile.is_some(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not check for an existing discovery profile");
            false
        }
    };
    if existing {
        println!(
            "{}",
            "You already have a discovery profile. Submitting will replace it.".cyan()
        );
    }

    let drafts = DraftStore::in_dir(config.data_dir()?);
    let autosave = config.discovery.autosave_draft;

    let mut form = if fresh {
        drafts.clear()?;
        DiscoveryForm::new()
    } else {
        match drafts.load()? {
            Some(form) => {
                println!(
                    "{}",
                    format!("Resuming your saved answers at {}.", form.section()).cyan()
                );
                form
            }
            None => DiscoveryForm::new(),
        }
    };

    match answers {
        Some(path) => {
            Answers::from_file(&path)?
                .apply_to(&mut form)
                .map_err(VitalPathError::Validation)?;
        }
        None => {
            let mut prompter = ReadlinePrompter::new()?;
            let save = |form: &DiscoveryForm| -> Result<()> {
                if autosave {
                    drafts.save(form)?;
                }
                Ok(())
            };
            if fill_interactively(&mut form, &mut prompter, save)? == FormExit::Cancelled {
                if autosave {
                    println!("Your answers were saved. Run `vitalpath discovery` to continue.");
                }
                return Ok(());
            }
        }
    }

    let submitted = if existing {
        resubmit_discovery(&client, &form).await
    } else {
        submit_discovery(&client, &form).await
    };

    match submitted {
        Ok(outcome) => {
            drafts.clear()?;
            match outcome.kind {
                SubmissionKind::Created => {
                    println!("{}", "Thanks! Your discovery profile was submitted.".green())
                }
                SubmissionKind::Updated => {
                    println!("{}", "Thanks! Your discovery profile was updated.".green())
                }
            }
            if outcome.kind == SubmissionKind::Created && !outcome.baseline_recorded() {
                println!(
                    "{}",
                    "Your baseline could not be added to the dashboard history yet.".yellow()
                );
            }
            match outcome.next_step() {
                NextStep::Dashboard => println!("Next: run `vitalpath dashboard`."),
            }
            Ok(())
        }
        Err(e) => {
            if autosave {
                drafts.save(&form)?;
            }
            Err(e)
        }
    }
}

/// Prompts through the sections until the form is complete or the user
/// quits. `save` runs after every section change and on quit.
pub fn fill_interactively<P, S>(
    form: &mut DiscoveryForm,
    prompter: &mut P,
    save: S,
) -> Result<FormExit>
where
    P: Prompter,
    S: Fn(&DiscoveryForm) -> Result<()>,
{
    loop {
        let section = form.section();
        prompter.say(&format!(
            "\n{} (step {} of {})",
            section.title().bold(),
            section.number(),
            Section::ALL.len()
        ));

        let flow = match section {
            Section::BasicInfo => ask_basic_info(form, prompter)?,
            Section::Goals => ask_goals(form, prompter)?,
            Section::WellnessBaseline => ask_baseline(form, prompter)?,
        };

        match flow {
            Flow::Next => match form.next() {
                Ok(Some(_)) => save(form)?,
                Ok(None) => return Ok(FormExit::Ready),
                Err(errors) => show_errors(prompter, &errors),
            },
            Flow::Back => {
                if form.back().is_some() {
                    save(form)?;
                } else {
                    prompter.say("This is the first section.");
                }
            }
            Flow::Quit => {
                save(form)?;
                return Ok(FormExit::Cancelled);
            }
        }
    }
}

fn show_errors<P: Prompter>(prompter: &mut P, errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        prompter.say(&format!("  {} {}", format!("{}:", field).red(), message));
    }
}

fn ask<P: Prompter>(prompter: &mut P, label: &str, current: Option<String>) -> Result<Reply> {
    let prompt = match current {
        Some(value) if !value.is_empty() => format!("{} [{}]: ", label, value),
        _ => format!("{}: ", label),
    };
    let Some(line) = prompter.ask(&prompt)? else {
        return Ok(Reply::Quit);
    };
    Ok(match line.trim() {
        "" => Reply::Keep,
        ":back" => Reply::Back,
        ":quit" => Reply::Quit,
        value => Reply::Value(value.to_string()),
    })
}

/// Asks until the answer parses, the user keeps the current value, or
/// navigates away. Returns the flow on navigation.
fn ask_parsed<P, T>(
    prompter: &mut P,
    label: &str,
    slot: &mut Option<T>,
    show: impl Fn(&T) -> String,
) -> Result<Option<Flow>>
where
    P: Prompter,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    loop {
        match ask(prompter, label, slot.as_ref().map(&show))? {
            Reply::Keep => return Ok(None),
            Reply::Back => return Ok(Some(Flow::Back)),
            Reply::Quit => return Ok(Some(Flow::Quit)),
            Reply::Value(raw) => match raw.parse::<T>() {
                Ok(value) => {
                    *slot = Some(value);
                    return Ok(None);
                }
                Err(e) => prompter.say(&format!("  {}", e.to_string().red())),
            },
        }
    }
}

fn ask_basic_info<P: Prompter>(form: &mut DiscoveryForm, prompter: &mut P) -> Result<Flow> {
    let basic = &mut form.basic;

    macro_rules! field {
        ($label:expr, $slot:expr, $show:expr) => {
            if let Some(flow) = ask_parsed(prompter, $label, $slot, $show)? {
                return Ok(flow);
            }
        };
    }

    field!("Preferred name", &mut basic.preferred_name, |v: &String| v.clone());
    field!("Age", &mut basic.age, |v: &u32| v.to_string());
    field!(
        "Gender (male, female, non-binary, prefer-not-to-say)",
        &mut basic.gender,
        |v: &Gender| v.as_str().to_string()
    );
    field!("Height (feet)", &mut basic.height_feet, |v: &u32| v.to_string());
    field!("Height (inches)", &mut basic.height_inches, |v: &u32| v.to_string());
    field!("Weight (lbs)", &mut basic.weight, |v: &u32| v.to_string());
    field!("Location", &mut basic.location, |v: &String| v.clone());

    let mut marital = Some(basic.marital_status);
    field!(
        "Marital status (optional)",
        &mut marital,
        |v: &MaritalStatus| v.as_str().to_string()
    );
    basic.marital_status = marital.unwrap_or_default();

    Ok(Flow::Next)
}

fn ask_goals<P: Prompter>(form: &mut DiscoveryForm, prompter: &mut P) -> Result<Flow> {
    prompter.say("Pick 1 to 3 goals in priority order (names or numbers, comma separated):");
    for (i, goal) in GOALS.iter().enumerate() {
        prompter.say(&format!("  {:>2}. {:<18} {}", i + 1, goal.label, goal.description));
    }

    loop {
        let current = form.goals().join(", ");
        match ask(prompter, "Goals", Some(current))? {
            Reply::Keep => return Ok(Flow::Next),
            Reply::Back => return Ok(Flow::Back),
            Reply::Quit => return Ok(Flow::Quit),
            Reply::Value(raw) => {
                let picks: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| match s.parse::<usize>() {
                        Ok(n) if (1..=GOALS.len()).contains(&n) => GOALS[n - 1].id.to_string(),
                        _ => s.to_string(),
                    })
                    .collect();
                match form.set_goals(&picks) {
                    Ok(()) => return Ok(Flow::Next),
                    Err(e) => prompter.say(&format!("  {}", e.to_string().red())),
                }
            }
        }
    }
}

fn ask_baseline<P: Prompter>(form: &mut DiscoveryForm, prompter: &mut P) -> Result<Flow> {
    prompter.say("Rate each area from 0 (worst) to 100 (best):");
    for metric in WellnessMetric::ALL {
        let mut slot = Some(form.baseline.get(metric));
        let label = metric.label();
        let show = |v: &WellnessScore| v.to_string();
        if let Some(flow) = ask_parsed(prompter, label, &mut slot, show)? {
            return Ok(flow);
        }
        if let Some(score) = slot {
            form.set_score(metric, score);
        }
    }
    Ok(Flow::Next)
}
