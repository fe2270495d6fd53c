//! Ranking of generation configurations by overall score.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One scored output of a (template, model) configuration for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub subject: String,
    pub template: String,
    pub model: String,
    pub overall_score: f64,
}

/// Best candidate for a subject, with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    #[serde(flatten)]
    pub candidate: Candidate,
}

/// Mean overall score of a configuration across subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub template: String,
    pub model: String,
    pub mean_score: f64,
    pub evaluations: usize,
}

/// Keep the highest-scoring candidate per subject.
///
/// The first candidate seen wins ties. Results are ordered by score
/// descending, then subject ascending.
pub fn best_per_subject(candidates: &[Candidate]) -> Vec<RankedCandidate> {
    let mut best: BTreeMap<&str, &Candidate> = BTreeMap::new();
    for candidate in candidates {
        best.entry(candidate.subject.as_str())
            .and_modify(|current| {
                if candidate.overall_score > current.overall_score {
                    *current = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut winners: Vec<&Candidate> = best.into_values().collect();
    winners.sort_by(|a, b| {
        descending(a.overall_score, b.overall_score).then_with(|| a.subject.cmp(&b.subject))
    });

    winners
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| RankedCandidate {
            rank: idx + 1,
            candidate: candidate.clone(),
        })
        .collect()
}

/// Average each configuration's scores and rank configurations.
pub fn leaderboard(candidates: &[Candidate]) -> Vec<LeaderboardEntry> {
    let mut totals: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for candidate in candidates {
        let entry = totals
            .entry((candidate.template.as_str(), candidate.model.as_str()))
            .or_insert((0.0, 0));
        entry.0 += candidate.overall_score;
        entry.1 += 1;
    }

    let mut entries: Vec<LeaderboardEntry> = totals
        .into_iter()
        .map(|((template, model), (sum, count))| LeaderboardEntry {
            rank: 0,
            template: template.to_string(),
            model: model.to_string(),
            mean_score: sum / count as f64,
            evaluations: count,
        })
        .collect();

    entries.sort_by(|a, b| {
        descending(a.mean_score, b.mean_score)
            .then_with(|| (&a.template, &a.model).cmp(&(&b.template, &b.model)))
    });
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    entries
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
