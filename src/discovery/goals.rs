//! The catalog of health goals a participant can prioritize

use thiserror::Error;

/// Most goals a participant may select.
pub const MAX_GOALS: usize = 3;

/// A selectable health goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Goal {
    /// Identifier sent as `goal_1`..`goal_3`.
    pub id: &'static str,
    /// Short display label.
    pub label: &'static str,
    /// One-line description shown by `vitalpath goals`.
    pub description: &'static str,
}

/// Every goal in display order.
pub const GOALS: [Goal; 10] = [
    Goal {
        id: "longevity",
        label: "Longevity",
        description: "Stay healthy and active for longer",
    },
    Goal {
        id: "weight-loss",
        label: "Weight Loss",
        description: "Reach and keep a healthy weight",
    },
    Goal {
        id: "fitness",
        label: "Fitness",
        description: "Build strength, endurance and mobility",
    },
    Goal {
        id: "energy",
        label: "More Energy",
        description: "Feel less tired through the day",
    },
    Goal {
        id: "sleep",
        label: "Better Sleep",
        description: "Fall asleep easier and wake up rested",
    },
    Goal {
        id: "stress",
        label: "Stress Management",
        description: "Handle pressure with less strain",
    },
    Goal {
        id: "nutrition",
        label: "Nutrition",
        description: "Eat in a way that supports your goals",
    },
    Goal {
        id: "mental-health",
        label: "Mental Health",
        description: "Improve mood and emotional balance",
    },
    Goal {
        id: "purpose",
        label: "Life Purpose",
        description: "Find direction and meaning",
    },
    Goal {
        id: "relationships",
        label: "Relationships",
        description: "Strengthen connections with others",
    },
];

/// Why a goal could not be selected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalSelectionError {
    #[error("Unknown goal '{input}'{}", suggestion_hint(.suggestion))]
    Unknown {
        input: String,
        suggestion: Option<&'static str>,
    },

    #[error("You can select at most 3 goals")]
    LimitReached,
}

fn suggestion_hint(suggestion: &Option<&'static str>) -> String {
    suggestion
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

/// Looks a goal up by identifier or label, ignoring case and separators.
///
/// # Examples
///
/// ```
/// use vitalpath::discovery::goals::find;
///
/// assert_eq!(find("Weight Loss").unwrap().id, "weight-loss");
/// assert!(find("astronaut").is_none());
/// ```
pub fn find(input: &str) -> Option<&'static Goal> {
    let needle = normalize(input);
    GOALS
        .iter()
        .find(|g| normalize(g.id) == needle || normalize(g.label) == needle)
}

/// Resolves `input` to a catalog goal, suggesting the closest identifier on
/// a miss.
pub fn resolve(input: &str) -> Result<&'static Goal, GoalSelectionError> {
    find(input).ok_or_else(|| GoalSelectionError::Unknown {
        input: input.trim().to_string(),
        suggestion: suggest(input),
    })
}

/// Closest goal identifier to `input`, if any is reasonably close.
pub fn suggest(input: &str) -> Option<&'static str> {
    let needle = normalize(input);
    if needle.is_empty() {
        return None;
    }
    GOALS
        .iter()
        .map(|g| {
            let score = strsim::jaro_winkler(&needle, &normalize(g.id))
                .max(strsim::jaro_winkler(&needle, &normalize(g.label)));
            (g.id, score)
        })
        .filter(|(_, score)| *score >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
