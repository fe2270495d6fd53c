//! Sub-heuristics shared by the comparators.
//!
//! Each function maps already-extracted text to a factor in [0, 1]. None of
//! them can fail; shape problems are handled by the caller before the text
//! reaches this module.

use cardscore_core::labels::{
    AFFIRMATIVE_TERMS, AGGRESSIVE_TERMS, COOPERATIVE_TERMS, EMPATHETIC_TERMS, EVASIVE_TERMS,
    MODERATE_TERMS, RECEPTIVE_TERMS,
};
use cardscore_core::{Channel, CustomerCategory, FieldValue, PressureLevel, contains_any, tokenize};

/// Factor used whenever a heuristic has nothing to compare.
pub const NEUTRAL_SCORE: f64 = 0.5;

pub const COMMENT_OVERLAP_BONUS: f64 = 0.3;
pub const ACTION_VOCABULARY_BONUS: f64 = 0.3;
pub const CONSISTENCY_PENALTY: f64 = 0.3;

pub const HISTORY_MATCH_SCORE: f64 = 1.0;
pub const HISTORY_MISMATCH_SCORE: f64 = 0.6;
pub const HIGH_RECEPTIVITY_THRESHOLD: f64 = 0.7;
pub const LOW_RECEPTIVITY_THRESHOLD: f64 = 0.3;

/// Minimum trimmed length, exclusive, of a substantive action to avoid.
pub const SUBSTANTIVE_ACTION_CHARS: usize = 10;
pub const LOGICAL_ALL_SUBSTANTIVE: f64 = 1.0;
pub const LOGICAL_SOME_SHORT: f64 = 0.7;
pub const LOGICAL_NO_ACTIONS: f64 = 0.3;

pub const TYPIFICATION_MATCH_SCORE: f64 = 1.0;
pub const TYPIFICATION_MISMATCH_SCORE: f64 = 0.6;
pub const CHANNEL_BEST_PRACTICE_SCORE: f64 = 1.0;
pub const CHANNEL_DEFAULT_SCORE: f64 = 0.7;

/// Compatibility of a pressure level with a customer category.
pub fn coherence_matrix(category: CustomerCategory, pressure: PressureLevel) -> Option<f64> {
    use CustomerCategory as C;
    use PressureLevel as P;

    let value = match (category, pressure) {
        (C::ReceptiveHigh, P::Low) => 1.0,
        (C::ReceptiveHigh, P::Moderate) => 0.7,
        (C::ReceptiveHigh, P::High) => 0.2,
        (C::ReceptiveModerate, P::Low) => 0.8,
        (C::ReceptiveModerate, P::Moderate) => 1.0,
        (C::ReceptiveModerate, P::High) => 0.6,
        (C::Evasive, P::Low) => 0.3,
        (C::Evasive, P::Moderate) => 0.8,
        (C::Evasive, P::High) => 1.0,
        (C::Problematic, P::Low) => 1.0,
        (C::Problematic, P::Moderate) => 0.5,
        (C::Problematic, P::High) => 0.2,
        (C::Receptive, _) => return None,
    };
    Some(value)
}

/// Matrix lookup from free-text labels; unknown category or pressure is neutral.
pub fn type_coherence(customer_type: &str, pressure_level: &str) -> f64 {
    let Some(category) = CustomerCategory::classify(customer_type) else {
        return NEUTRAL_SCORE;
    };
    PressureLevel::parse(pressure_level)
        .and_then(|pressure| coherence_matrix(category, pressure))
        .unwrap_or(NEUTRAL_SCORE)
}

/// Neutral base raised when the comment shares a token with the frequent reason.
pub fn comment_relevance(comment: &str, frequent_reason: &str) -> f64 {
    let comment_tokens = tokenize(comment);
    let reason_tokens = tokenize(frequent_reason);
    let overlaps = comment_tokens.intersection(&reason_tokens).next().is_some();

    if overlaps {
        (NEUTRAL_SCORE + COMMENT_OVERLAP_BONUS).min(1.0)
    } else {
        NEUTRAL_SCORE
    }
}

/// Checks the positive-response action for category-appropriate vocabulary.
pub fn action_correctness(positive_action: &str, customer_type: &str) -> f64 {
    let action = positive_action.to_lowercase();
    if action.trim().is_empty() {
        return 0.0;
    }

    let expected_terms = match CustomerCategory::classify(customer_type) {
        Some(CustomerCategory::Problematic) => Some(EMPATHETIC_TERMS),
        Some(category) if category.is_receptive() => Some(AFFIRMATIVE_TERMS),
        _ => None,
    };

    let mut score = NEUTRAL_SCORE;
    if expected_terms.is_some_and(|terms| contains_any(&action, terms)) {
        score += ACTION_VOCABULARY_BONUS;
    }
    score.min(1.0)
}

/// Penalizes a typification that contradicts the stated pressure level.
pub fn internal_consistency(pressure_level: &str, typification: &str) -> f64 {
    let typification = typification.to_lowercase();
    let pressure = PressureLevel::parse(pressure_level);
    let mut score: f64 = 1.0;

    if pressure == Some(PressureLevel::Low) && contains_any(&typification, AGGRESSIVE_TERMS) {
        score -= CONSISTENCY_PENALTY;
    }
    if pressure == Some(PressureLevel::High) && contains_any(&typification, COOPERATIVE_TERMS) {
        score -= CONSISTENCY_PENALTY;
    }

    score.max(0.0)
}

/// Compares the client-profile label against the historical receptivity.
///
/// A profile that is not text at all scores zero.
pub fn historical_coherence(profile: Option<&FieldValue>, receptivity_ratio: f64) -> f64 {
    let label = match profile {
        None => String::new(),
        Some(FieldValue::Text(text)) => text.to_lowercase(),
        Some(_) => return 0.0,
    };

    let expected_terms = if receptivity_ratio > HIGH_RECEPTIVITY_THRESHOLD {
        RECEPTIVE_TERMS
    } else if receptivity_ratio < LOW_RECEPTIVITY_THRESHOLD {
        EVASIVE_TERMS
    } else {
        MODERATE_TERMS
    };

    if contains_any(&label, expected_terms) {
        HISTORY_MATCH_SCORE
    } else {
        HISTORY_MISMATCH_SCORE
    }
}

/// Rates the "actions to avoid" list by how substantive its items are.
pub fn logical_coherence(actions: Option<&FieldValue>) -> f64 {
    match actions {
        Some(FieldValue::List(items)) if !items.is_empty() => {
            let all_substantive = items
                .iter()
                .all(|item| item.trim().chars().count() > SUBSTANTIVE_ACTION_CHARS);
            if all_substantive {
                LOGICAL_ALL_SUBSTANTIVE
            } else {
                LOGICAL_SOME_SHORT
            }
        }
        _ => LOGICAL_NO_ACTIONS,
    }
}

/// Rewards a typification that names the subject's category.
pub fn typification_relevance(typification: &str, customer_type: &str) -> f64 {
    if typification.trim().is_empty() || customer_type.trim().is_empty() {
        return NEUTRAL_SCORE;
    }

    let typification = typification.to_lowercase();
    match CustomerCategory::classify(customer_type) {
        Some(category) if contains_any(&typification, category.keywords()) => {
            TYPIFICATION_MATCH_SCORE
        }
        _ => TYPIFICATION_MISMATCH_SCORE,
    }
}

/// Best-practice channel table per customer category.
pub fn channel_relevance(recommended_channel: &str, customer_type: &str) -> f64 {
    let channel = Channel::parse(recommended_channel);
    let category = CustomerCategory::classify(customer_type);

    let best_practice = match (category, channel) {
        (Some(CustomerCategory::Problematic), Some(Channel::Email | Channel::WhatsApp)) => true,
        (Some(category), Some(Channel::CallCenter)) => category.is_receptive(),
        (Some(CustomerCategory::Evasive), Some(Channel::WhatsApp)) => true,
        _ => false,
    };

    if best_practice {
        CHANNEL_BEST_PRACTICE_SCORE
    } else {
        CHANNEL_DEFAULT_SCORE
    }
}
