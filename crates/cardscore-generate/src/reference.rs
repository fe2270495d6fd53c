use cardscore_core::{ContextualSummary, CustomerCategory, Record, RecordField};

/// Longest reason excerpt copied into the reference comment, in characters.
const COMMENT_REASON_CHARS: usize = 50;
const DEFAULT_CHANNEL: &str = "CallCenter";

struct Template {
    pressure: &'static str,
    typification: &'static str,
    positive_action: &'static str,
    negative_action: &'static str,
    actions_to_avoid: &'static [&'static str],
    recommended_channel: &'static str,
    profile: &'static str,
}

const RECEPTIVE: Template = Template {
    pressure: "Baja",
    typification: "Receptivo alto con {limitation}",
    positive_action: "Perfecto {name}, coordinemos el pago para {timeframe}",
    negative_action: "Entiendo {name}, ¿te parece si coordinamos una fecha mejor?",
    actions_to_avoid: &["Presionar por fecha inmediata", "Ignorar limitación económica"],
    recommended_channel: "CallCenter",
    profile: "Receptivo alto con patrón positivo",
};

const EVASIVE: Template = Template {
    pressure: "Alta",
    typification: "Evasivo sin intención clara de pago",
    positive_action: "Excelente {name}, aprovechemos que estamos hablando",
    negative_action: "{name}, necesitamos encontrar una solución. ¿Prefieres otro canal?",
    actions_to_avoid: &[
        "Hablar demasiado al inicio",
        "Mencionar consecuencias inmediatamente",
    ],
    recommended_channel: "WhatsApp",
    profile: "Evasivo - Requiere estrategia alternativa",
};

const PROBLEMATIC: Template = Template {
    pressure: "Baja",
    typification: "Problemático que requiere manejo especializado",
    positive_action: "Agradezco que podamos conversar {name}. Revisemos las opciones disponibles",
    negative_action: "Comprendo tu molestia {name}. ¿Prefieres que te contacte por escrito?",
    actions_to_avoid: &[
        "Confrontar agresividad",
        "Elevar tono de voz",
        "Mencionar consecuencias",
    ],
    recommended_channel: "Email",
    profile: "Problemático - Derivar a supervisor si necesario",
};

/// Builds the expected record for a subject from fixed templates.
///
/// Subjects that are neither receptive-high, evasive nor problematic get the
/// receptive template at moderate pressure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceGenerator;

impl ReferenceGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn expected_for(&self, context: &ContextualSummary) -> Record {
        let category = context.category();
        let (template, pressure, limitation, timeframe) = match category {
            Some(CustomerCategory::ReceptiveHigh) => (
                &RECEPTIVE,
                RECEPTIVE.pressure,
                "limitaciones temporales de liquidez",
                "tu quincena",
            ),
            Some(CustomerCategory::Evasive) => (&EVASIVE, EVASIVE.pressure, "", ""),
            Some(CustomerCategory::Problematic) => (&PROBLEMATIC, PROBLEMATIC.pressure, "", ""),
            _ => (
                &RECEPTIVE,
                "Moderada",
                "necesidades de coordinación",
                "una fecha conveniente",
            ),
        };

        let name = context.debtor_name();
        let fill = |text: &str| {
            tidy(
                &text
                    .replace("{name}", name)
                    .replace("{limitation}", limitation)
                    .replace("{timeframe}", timeframe),
            )
        };

        let last_contact = context
            .last_contact_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let reason: String = context
            .most_frequent_reason
            .chars()
            .take(COMMENT_REASON_CHARS)
            .collect();
        let comment = format!(
            "Cliente {} - {}",
            context.customer_type.to_lowercase(),
            reason
        );

        tracing::debug!(
            event = "reference_generated",
            category = ?category,
            pressure = pressure
        );

        Record::new()
            .with_text(RecordField::PressureLevel, pressure)
            .with_text(RecordField::OperationalTypification, fill(template.typification))
            .with_text(RecordField::PositiveResponseAction, fill(template.positive_action))
            .with_text(RecordField::NegativeResponseAction, fill(template.negative_action))
            .with_list(
                RecordField::ActionsToAvoid,
                template.actions_to_avoid.iter().copied(),
            )
            .with_text(RecordField::LastContact, last_contact)
            .with_text(RecordField::Channel, DEFAULT_CHANNEL)
            .with_text(RecordField::Comment, comment)
            .with_text(RecordField::RecommendedChannel, template.recommended_channel)
            .with_text(RecordField::ClientProfile, template.profile)
    }
}

/// Collapse the gaps left by empty substitutions.
fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.replace(" ,", ",").replace(" .", ".");
    trimmed.trim_start_matches([',', ' ']).to_string()
}
