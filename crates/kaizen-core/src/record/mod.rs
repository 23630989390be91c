//! Data model for process analysis
//!
//! The domain vocabulary is the Portuguese consulting schema the
//! historical corpus was collected in; field identifiers double as the
//! wire contract with the language model and the index.

use serde::{Deserialize, Serialize};

/// One user-submitted description of a business process.
///
/// Immutable once submitted; lives for the duration of one analysis
/// request. The first six fields are mandatory, the rest may be empty.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProcessRecord {
    pub ramo_empresa: String,
    pub direcionadores: String,
    pub nome_processo: String,
    pub atividade: String,
    pub evento: String,
    pub causa: String,
    #[serde(default)]
    pub operaciona_atividade: String,
    #[serde(default)]
    pub sistema_relacionado: String,
    #[serde(default)]
    pub solucao_gap: String,
    #[serde(default)]
    pub outro_gap: String,
    #[serde(default)]
    pub transcricao: String,
}

/// Mandatory fields of a [`ProcessRecord`]
pub const MANDATORY_FIELDS: [&str; 6] = [
    "ramo_empresa",
    "direcionadores",
    "nome_processo",
    "atividade",
    "evento",
    "causa",
];

impl ProcessRecord {
    /// Labeled fields in declaration order
    fn fields(&self) -> [(&'static str, &str); 11] {
        [
            ("ramo_empresa", &self.ramo_empresa),
            ("direcionadores", &self.direcionadores),
            ("nome_processo", &self.nome_processo),
            ("atividade", &self.atividade),
            ("evento", &self.evento),
            ("causa", &self.causa),
            ("operaciona_atividade", &self.operaciona_atividade),
            ("sistema_relacionado", &self.sistema_relacionado),
            ("solucao_gap", &self.solucao_gap),
            ("outro_gap", &self.outro_gap),
            ("transcricao", &self.transcricao),
        ]
    }

    /// Deterministic combined-text serialization.
    ///
    /// `label: value` pairs joined by single spaces, fields in
    /// declaration order. This is the unit embedded and searched, so it
    /// must be byte-identical across calls for the same record.
    pub fn combined_text(&self) -> String {
        self.fields()
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Names of mandatory fields that are empty.
    ///
    /// The caller-side validation gate: a record with any mandatory
    /// field empty must never reach the analyzer.
    pub fn missing_mandatory_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .take(MANDATORY_FIELDS.len())
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect()
    }
}

/// One record of the historical improvement-case corpus (index side).
///
/// Same combined-text convention as [`ProcessRecord`], different field
/// set: this is the schema the corpus spreadsheet was collected in.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoricalCase {
    pub ramo_empresa: String,
    pub direcionadores: String,
    pub nome_processo: String,
    pub atividade: String,
    pub causa: String,
    #[serde(default)]
    pub operaciona_atividade: String,
    #[serde(default)]
    pub solucao_gap: String,
    #[serde(default)]
    pub melhoria: String,
}

impl HistoricalCase {
    fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("ramo_empresa", &self.ramo_empresa),
            ("direcionadores", &self.direcionadores),
            ("nome_processo", &self.nome_processo),
            ("atividade", &self.atividade),
            ("causa", &self.causa),
            ("operaciona_atividade", &self.operaciona_atividade),
            ("solucao_gap", &self.solucao_gap),
            ("melhoria", &self.melhoria),
        ]
    }

    /// Combined text used as the embedded/stored document
    pub fn combined_text(&self) -> String {
        self.fields()
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A historical case surfaced by similarity search
#[derive(Debug, Clone)]
pub struct RetrievedCase {
    /// Combined text of the stored case
    pub content: String,
    /// Similarity rank, 1 = closest
    pub rank: usize,
    /// Cosine similarity against the query embedding
    pub score: f32,
}

/// One structured analysis result row.
///
/// Produced only by parsing the language model response; unknown keys
/// are rejected because extra fields mean the model ignored the output
/// directive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImprovementOpportunity {
    pub oportunidade_melhoria: String,
    pub tarefa: String,
    pub criterio_aceitacao: String,
}

impl ImprovementOpportunity {
    /// A manually appended opportunity; task and acceptance criterion
    /// start empty and are filled in during curation.
    pub fn manual(description: impl Into<String>) -> Self {
        Self {
            oportunidade_melhoria: description.into(),
            tarefa: String::new(),
            criterio_aceitacao: String::new(),
        }
    }

    /// Whether all three fields carry non-empty text
    pub fn is_complete(&self) -> bool {
        !self.oportunidade_melhoria.trim().is_empty()
            && !self.tarefa.trim().is_empty()
            && !self.criterio_aceitacao.trim().is_empty()
    }
}

/// Column names of the tabular analysis result, in order
pub const RESULT_COLUMNS: [&str; 3] = ["oportunidade_melhoria", "tarefa", "criterio_aceitacao"];

/// Ordered collection of improvement opportunities, in the order the
/// language model emitted them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    rows: Vec<ImprovementOpportunity>,
}

impl AnalysisResult {
    pub fn new(rows: Vec<ImprovementOpportunity>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ImprovementOpportunity] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_record() -> ProcessRecord {
        ProcessRecord {
            ramo_empresa: "Moda".into(),
            direcionadores: "Aumentar lucro".into(),
            nome_processo: "Otimização".into(),
            atividade: "Otimização de processo".into(),
            evento: "Reunião mensal".into(),
            causa: "Aumento do preço dos insumos".into(),
            ..Default::default()
        }
    }

    #[test]
    fn combined_text_fixed_order() {
        let record = sample_record();
        let text = record.combined_text();
        assert!(text.starts_with("ramo_empresa: Moda direcionadores: Aumentar lucro"));
        assert!(text.ends_with("outro_gap:  transcricao: "));
    }

    #[test]
    fn combined_text_deterministic() {
        let record = sample_record();
        assert_eq!(record.combined_text(), record.combined_text());
        assert_eq!(
            record.combined_text().as_bytes(),
            record.clone().combined_text().as_bytes()
        );
    }

    #[test]
    fn missing_mandatory_fields_reported() {
        let mut record = sample_record();
        record.causa = String::new();
        record.evento = "   ".into();
        assert_eq!(record.missing_mandatory_fields(), vec!["evento", "causa"]);

        let complete = sample_record();
        assert!(complete.missing_mandatory_fields().is_empty());
    }

    #[test]
    fn optional_fields_never_flagged() {
        let record = sample_record();
        // All optional fields empty, still valid
        assert!(record.operaciona_atividade.is_empty());
        assert!(record.missing_mandatory_fields().is_empty());
    }

    #[test]
    fn opportunity_completeness() {
        let full = ImprovementOpportunity {
            oportunidade_melhoria: "A".into(),
            tarefa: "B".into(),
            criterio_aceitacao: "C".into(),
        };
        assert!(full.is_complete());

        let manual = ImprovementOpportunity::manual("Nova oportunidade");
        assert!(!manual.is_complete());
        assert_eq!(manual.oportunidade_melhoria, "Nova oportunidade");
        assert!(manual.tarefa.is_empty());
    }

    #[test]
    fn opportunity_rejects_unknown_keys() {
        let json = r#"{"oportunidade_melhoria":"A","tarefa":"B","criterio_aceitacao":"C","extra":"x"}"#;
        assert!(serde_json::from_str::<ImprovementOpportunity>(json).is_err());
    }

    #[test]
    fn historical_case_combined_text() {
        let case = HistoricalCase {
            ramo_empresa: "Varejo".into(),
            direcionadores: "Reduzir custo".into(),
            nome_processo: "Compras".into(),
            atividade: "Cotação".into(),
            causa: "Processo manual".into(),
            ..Default::default()
        };
        let text = case.combined_text();
        assert!(text.starts_with("ramo_empresa: Varejo"));
        assert!(text.contains("causa: Processo manual"));
        assert!(text.ends_with("melhoria: "));
    }

    proptest! {
        #[test]
        fn combined_text_deterministic_for_any_record(
            ramo in ".{0,40}",
            direcionadores in ".{0,40}",
            nome in ".{0,40}",
            atividade in ".{0,40}",
            evento in ".{0,40}",
            causa in ".{0,40}",
        ) {
            let record = ProcessRecord {
                ramo_empresa: ramo,
                direcionadores,
                nome_processo: nome,
                atividade,
                evento,
                causa,
                ..Default::default()
            };
            prop_assert_eq!(record.combined_text(), record.combined_text());
        }
    }
}
