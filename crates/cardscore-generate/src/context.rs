use std::cmp::Reverse;
use std::fmt;

use cardscore_core::{ContextualSummary, Interaction};

/// Number of most recent interactions considered by default.
pub const DEFAULT_MAX_HISTORY: usize = 5;

const RECEPTIVE_HIGH_RATIO: f64 = 0.7;
const RECEPTIVE_MODERATE_RATIO: f64 = 0.4;
const UNCOMMITTED_MARKERS: &[&str] = &["sin compromiso", "no commitment"];

/// Cadence of recent contacts, from the mean gap between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPattern {
    InsufficientHistory,
    Weekly,
    Monthly,
    Sporadic,
}

impl ContactPattern {
    fn from_mean_gap(days: f64) -> Self {
        if days <= 7.0 {
            ContactPattern::Weekly
        } else if days <= 30.0 {
            ContactPattern::Monthly
        } else {
            ContactPattern::Sporadic
        }
    }
}

impl fmt::Display for ContactPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactPattern::InsufficientHistory => "insufficient history",
            ContactPattern::Weekly => "frequent (weekly)",
            ContactPattern::Monthly => "regular (monthly)",
            ContactPattern::Sporadic => "sporadic",
        };
        f.write_str(label)
    }
}

/// Summarize a subject's interaction history.
///
/// Interactions without a date are ignored; the rest are ordered newest
/// first and capped at `max_history`. Returns `None` when nothing usable
/// remains.
pub fn summarize_history(
    interactions: &[Interaction],
    max_history: usize,
) -> Option<ContextualSummary> {
    let mut recent: Vec<&Interaction> = interactions
        .iter()
        .filter(|interaction| interaction.date.is_some())
        .collect();
    recent.sort_by_key(|interaction| Reverse(interaction.date));
    recent.truncate(max_history);

    let last = *recent.first()?;
    let total = recent.len();
    let uncommitted = recent
        .iter()
        .filter(|interaction| {
            let result = interaction.result.to_lowercase();
            UNCOMMITTED_MARKERS
                .iter()
                .any(|marker| result.contains(marker))
        })
        .count();
    let receptivity_ratio = 1.0 - uncommitted as f64 / total as f64;

    let customer_type = if receptivity_ratio >= RECEPTIVE_HIGH_RATIO {
        "Receptivo alto"
    } else if receptivity_ratio >= RECEPTIVE_MODERATE_RATIO {
        "Receptivo moderado"
    } else {
        "Evasivo"
    };

    let pattern = contact_pattern(&recent);
    tracing::debug!(
        event = "history_summarized",
        interactions = total,
        uncommitted = uncommitted,
        customer_type = customer_type,
        pattern = %pattern
    );

    Some(ContextualSummary {
        customer_type: customer_type.to_string(),
        receptivity_ratio: Some(receptivity_ratio),
        most_frequent_reason: most_frequent_reason(&recent),
        last_interaction: Some(last.clone()),
        total_interactions: Some(total),
        uncommitted_count: Some(uncommitted),
        contact_pattern: Some(pattern.to_string()),
    })
}

/// Most common non-empty reason; ties go to the most recent one.
fn most_frequent_reason(recent: &[&Interaction]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for interaction in recent {
        let reason = interaction.reason.trim();
        if reason.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == reason) {
            Some((_, count)) => *count += 1,
            None => counts.push((reason, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (reason, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((reason, count));
        }
    }
    best.map(|(reason, _)| reason.to_string()).unwrap_or_default()
}

fn contact_pattern(recent: &[&Interaction]) -> ContactPattern {
    let dates: Vec<_> = recent.iter().filter_map(|interaction| interaction.date).collect();
    if dates.len() < 2 {
        return ContactPattern::InsufficientHistory;
    }

    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_days())
        .collect();
    let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    ContactPattern::from_mean_gap(mean)
}
