//! Label vocabularies shared by comparators and producers.
//!
//! Labels arrive as free text from generators and upstream summaries, in
//! English or Spanish. Everything here matches on lower-cased text so callers
//! never have to normalize first.

use std::collections::BTreeSet;
use std::fmt;

pub const RECEPTIVE_TERMS: &[&str] = &["receptive", "receptivo", "receptiva"];
pub const EVASIVE_TERMS: &[&str] = &["evasive", "evasivo", "evasiva"];
pub const PROBLEMATIC_TERMS: &[&str] = &["problematic", "problemático", "problematico"];
pub const MODERATE_TERMS: &[&str] = &["moderate", "moderado", "moderada"];

/// Vocabulary expected in the positive action for problematic subjects.
pub const EMPATHETIC_TERMS: &[&str] = &["understand", "careful", "comprendo", "entiendo", "cuidadoso"];

/// Vocabulary expected in the positive action for receptive subjects.
pub const AFFIRMATIVE_TERMS: &[&str] = &[
    "perfect",
    "excellent",
    "coordinate",
    "perfecto",
    "excelente",
    "coordinemos",
];

/// Typification vocabulary that contradicts a low pressure level.
pub const AGGRESSIVE_TERMS: &[&str] = &[
    "aggressive",
    "problematic",
    "agresivo",
    "problemático",
    "problematico",
];

/// Typification vocabulary that contradicts a high pressure level.
pub const COOPERATIVE_TERMS: &[&str] = &["receptive", "cooperative", "receptivo", "cooperativo"];

const HIGH_QUALIFIERS: &[&str] = &["high", "alto", "alta"];

/// Lower-case a label and turn `-`/`_` separators into single spaces.
pub fn normalize_label(label: &str) -> String {
    label
        .to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cased, whitespace-split token set.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Substring containment of any term in an already lower-cased haystack.
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}

/// Customer category derived from a free-form customer-type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerCategory {
    ReceptiveHigh,
    ReceptiveModerate,
    /// Receptive without a recognizable intensity qualifier.
    Receptive,
    Evasive,
    Problematic,
}

impl CustomerCategory {
    /// Classify a label such as `"Receptivo alto"` or `"receptive-high"`.
    ///
    /// Returns `None` when the label names no known category.
    pub fn classify(label: &str) -> Option<CustomerCategory> {
        let normalized = normalize_label(label);
        if contains_any(&normalized, RECEPTIVE_TERMS) {
            let has_qualifier = |terms: &[&str]| {
                normalized
                    .split_whitespace()
                    .any(|token| terms.contains(&token))
            };
            if has_qualifier(HIGH_QUALIFIERS) {
                return Some(CustomerCategory::ReceptiveHigh);
            }
            if has_qualifier(MODERATE_TERMS) {
                return Some(CustomerCategory::ReceptiveModerate);
            }
            return Some(CustomerCategory::Receptive);
        }
        if contains_any(&normalized, EVASIVE_TERMS) {
            return Some(CustomerCategory::Evasive);
        }
        if contains_any(&normalized, PROBLEMATIC_TERMS) {
            return Some(CustomerCategory::Problematic);
        }
        None
    }

    pub fn is_receptive(self) -> bool {
        matches!(
            self,
            CustomerCategory::ReceptiveHigh
                | CustomerCategory::ReceptiveModerate
                | CustomerCategory::Receptive
        )
    }

    /// Keywords whose presence in free text signals this category.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            CustomerCategory::ReceptiveHigh
            | CustomerCategory::ReceptiveModerate
            | CustomerCategory::Receptive => RECEPTIVE_TERMS,
            CustomerCategory::Evasive => EVASIVE_TERMS,
            CustomerCategory::Problematic => PROBLEMATIC_TERMS,
        }
    }
}

impl fmt::Display for CustomerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CustomerCategory::ReceptiveHigh => "receptive-high",
            CustomerCategory::ReceptiveModerate => "receptive-moderate",
            CustomerCategory::Receptive => "receptive",
            CustomerCategory::Evasive => "evasive",
            CustomerCategory::Problematic => "problematic",
        };
        f.write_str(label)
    }
}

/// Collection pressure stated by a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureLevel {
    Low,
    Moderate,
    High,
}

impl PressureLevel {
    pub fn parse(label: &str) -> Option<PressureLevel> {
        match label.trim().to_lowercase().as_str() {
            "low" | "baja" | "bajo" => Some(PressureLevel::Low),
            "moderate" | "moderada" | "moderado" | "medium" | "media" => {
                Some(PressureLevel::Moderate)
            }
            "high" | "alta" | "alto" => Some(PressureLevel::High),
            _ => None,
        }
    }
}

/// Contact channel named by a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Primary voice channel.
    CallCenter,
    Email,
    /// Low-intrusion messaging channel.
    WhatsApp,
}

impl Channel {
    pub fn parse(label: &str) -> Option<Channel> {
        let compact: String = label
            .to_lowercase()
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '-' && *ch != '_')
            .collect();
        match compact.as_str() {
            "callcenter" => Some(Channel::CallCenter),
            "email" | "correo" => Some(Channel::Email),
            "whatsapp" => Some(Channel::WhatsApp),
            _ => None,
        }
    }
}
