use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::comparators::{self, Comparator};
use crate::errors::EvalError;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Comparator algorithm bound to a metric definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ResponseAppropriateness,
    SemanticCoherence,
    TaskCompletionAccuracy,
    ContextualRelevance,
    ContentCompleteness,
    SemanticSimilarity,
}

impl MetricKind {
    pub fn comparator(self) -> Comparator {
        match self {
            MetricKind::ResponseAppropriateness => comparators::response_appropriateness,
            MetricKind::SemanticCoherence => comparators::semantic_coherence,
            MetricKind::TaskCompletionAccuracy => comparators::task_completion_accuracy,
            MetricKind::ContextualRelevance => comparators::contextual_relevance,
            MetricKind::ContentCompleteness => comparators::content_completeness,
            MetricKind::SemanticSimilarity => comparators::semantic_similarity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Continuous,
    Binary,
    Categorical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationLevel {
    Turn,
    Dialogue,
    System,
}

/// One weighted quality dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub description: String,
    pub kind: MetricKind,
    pub weight: f64,
    pub measurement_type: MeasurementType,
    pub evaluation_level: EvaluationLevel,
    pub reference: String,
    pub citation: String,
}

/// Immutable, ordered set of metric definitions.
///
/// Construction validates the weights; nothing can be changed afterwards, so
/// a registry can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    definitions: Vec<MetricDefinition>,
}

impl MetricRegistry {
    pub fn new(definitions: Vec<MetricDefinition>) -> Result<Self, EvalError> {
        if definitions.is_empty() {
            return Err(EvalError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(EvalError::DuplicateMetric(definition.name.clone()));
            }
            if !(definition.weight > 0.0 && definition.weight <= 1.0) {
                return Err(EvalError::InvalidWeight {
                    name: definition.name.clone(),
                    weight: definition.weight,
                });
            }
        }

        let total: f64 = definitions.iter().map(|definition| definition.weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(EvalError::InvalidWeights { total });
        }

        Ok(Self { definitions })
    }

    /// The six standard metrics with their published weights.
    pub fn standard() -> Self {
        Self {
            definitions: standard_definitions(),
        }
    }

    /// Standard metrics with per-name weight overrides, re-validated.
    pub fn with_weights(overrides: &BTreeMap<String, f64>) -> Result<Self, EvalError> {
        let mut definitions = standard_definitions();
        for (name, weight) in overrides {
            let definition = definitions
                .iter_mut()
                .find(|definition| &definition.name == name)
                .ok_or_else(|| EvalError::UnknownMetric(name.clone()))?;
            definition.weight = *weight;
        }
        Self::new(definitions)
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.definitions
            .iter()
            .find(|definition| definition.name == name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_definitions() -> Vec<MetricDefinition> {
    vec![
        definition(
            "response_appropriateness",
            "How appropriate the recommendation is to the conversational context",
            MetricKind::ResponseAppropriateness,
            0.25,
            MeasurementType::Continuous,
            EvaluationLevel::Turn,
            "Appropriateness in dialogue evaluation, encompassing coherence, relevance and correctness",
            "Deriu et al. (2021) 'Survey on evaluation methods for dialogue systems'; Gandhe & Traum (2016) 'Voted Appropriateness'",
        ),
        definition(
            "semantic_coherence",
            "Semantic and logical coherence of the recommendation",
            MetricKind::SemanticCoherence,
            0.20,
            MeasurementType::Continuous,
            EvaluationLevel::Dialogue,
            "Quantifiable dialogue coherence evaluation using multi-level ranking",
            "Ye et al. (2021) 'Towards Quantifiable Dialogue Coherence Evaluation', ACL 2021",
        ),
        definition(
            "task_completion_accuracy",
            "Accuracy of the customer classification and channel recommendation",
            MetricKind::TaskCompletionAccuracy,
            0.20,
            MeasurementType::Categorical,
            EvaluationLevel::System,
            "Standard classification metrics for customer service NLP systems",
            "Natural Language Processing in Customer Service: accuracy, precision, recall and F1 as the most common evaluation methods (2022)",
        ),
        definition(
            "contextual_relevance",
            "Relevance of the recommendation to the specific customer context",
            MetricKind::ContextualRelevance,
            0.15,
            MeasurementType::Continuous,
            EvaluationLevel::Turn,
            "Fine-grained evaluation of dialogue responses against their context",
            "Liu et al. (2016) 'How NOT To Evaluate Your Dialogue System', EMNLP 2016",
        ),
        definition(
            "content_completeness",
            "Presence of every required field in the recommendation",
            MetricKind::ContentCompleteness,
            0.10,
            MeasurementType::Binary,
            EvaluationLevel::Turn,
            "Completeness as part of appropriateness evaluation in dialogue systems",
            "Walker et al. (1997) PARADISE framework; Lowe et al. (2017) ADEM",
        ),
        definition(
            "semantic_similarity",
            "Lexical approximation of embedding similarity (token-set F1)",
            MetricKind::SemanticSimilarity,
            0.10,
            MeasurementType::Continuous,
            EvaluationLevel::Turn,
            "Context-aware evaluation using pre-trained language model embeddings",
            "Zhang et al. (2020) 'BERTScore: Evaluating Text Generation with BERT', ICLR 2020",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn definition(
    name: &str,
    description: &str,
    kind: MetricKind,
    weight: f64,
    measurement_type: MeasurementType,
    evaluation_level: EvaluationLevel,
    reference: &str,
    citation: &str,
) -> MetricDefinition {
    MetricDefinition {
        name: name.to_string(),
        description: description.to_string(),
        kind,
        weight,
        measurement_type,
        evaluation_level,
        reference: reference.to_string(),
        citation: citation.to_string(),
    }
}
