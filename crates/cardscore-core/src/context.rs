use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::labels::CustomerCategory;

/// Receptivity assumed when the summary does not carry one.
pub const DEFAULT_RECEPTIVITY_RATIO: f64 = 0.5;

/// Situational metadata about the evaluated subject.
///
/// Produced upstream from interaction history and independent of any
/// generated output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContextualSummary {
    /// Free-form customer-type label, e.g. `"Receptivo alto"`.
    #[serde(default, alias = "customerType")]
    pub customer_type: String,
    /// Share of interactions that ended with a commitment, in [0, 1].
    #[serde(
        default,
        alias = "receptivityRatio",
        skip_serializing_if = "Option::is_none"
    )]
    pub receptivity_ratio: Option<f64>,
    #[serde(default, alias = "mostFrequentReason", alias = "motivo_frecuente")]
    pub most_frequent_reason: String,
    #[serde(
        default,
        alias = "lastInteraction",
        alias = "ultima_llamada",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_interaction: Option<Interaction>,
    #[serde(
        default,
        alias = "total_llamadas",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_interactions: Option<usize>,
    #[serde(
        default,
        alias = "sin_compromiso_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub uncommitted_count: Option<usize>,
    #[serde(
        default,
        alias = "patron_fechas",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_pattern: Option<String>,
}

impl ContextualSummary {
    /// Receptivity ratio, falling back to the neutral default.
    pub fn receptivity(&self) -> f64 {
        self.receptivity_ratio.unwrap_or(DEFAULT_RECEPTIVITY_RATIO)
    }

    pub fn category(&self) -> Option<CustomerCategory> {
        CustomerCategory::classify(&self.customer_type)
    }

    pub fn debtor_name(&self) -> &str {
        self.last_interaction
            .as_ref()
            .map(|interaction| interaction.debtor.as_str())
            .unwrap_or("")
    }

    pub fn last_contact_date(&self) -> Option<NaiveDate> {
        self.last_interaction
            .as_ref()
            .and_then(|interaction| interaction.date)
    }
}

/// One historical interaction with the subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Interaction {
    #[serde(default, alias = "Fecha_Gestion", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, alias = "Deudor")]
    pub debtor: String,
    #[serde(default, alias = "Observaciones")]
    pub observations: String,
    /// Outcome label, e.g. `"Sin compromiso de pago"`.
    #[serde(default, alias = "Detalle_Resultado")]
    pub result: String,
    #[serde(default, alias = "Motivo")]
    pub reason: String,
}
