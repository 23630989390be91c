//! Curation session for analysis results
//!
//! Explicit session-state object with a defined lifecycle: created
//! when an analysis completes, mutated only through its transition
//! methods, discarded when the deliverable is exported.

use crate::record::{AnalysisResult, ImprovementOpportunity};
use serde::{Deserialize, Serialize};

/// User curation state over one analysis result.
///
/// Selections are tracked as the set of chosen opportunity
/// descriptions; manual additions start with empty task and acceptance
/// criterion and are filled in before export.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisSession {
    result: AnalysisResult,
    additional: Vec<ImprovementOpportunity>,
    selected: Vec<String>,
}

impl AnalysisSession {
    /// Start a session over a freshly produced result
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            additional: Vec::new(),
            selected: Vec::new(),
        }
    }

    /// All opportunities: model-produced rows first, then manual
    /// additions, in insertion order.
    pub fn opportunities(&self) -> Vec<&ImprovementOpportunity> {
        self.result.rows().iter().chain(self.additional.iter()).collect()
    }

    /// Append a manually authored opportunity (empty task/criterion)
    pub fn add_opportunity(&mut self, description: impl Into<String>) {
        self.additional
            .push(ImprovementOpportunity::manual(description));
    }

    /// Mark an opportunity as chosen, by its description
    pub fn select(&mut self, description: &str) {
        if !self.selected.iter().any(|d| d == description) {
            self.selected.push(description.to_string());
        }
    }

    /// Unmark a previously chosen opportunity
    pub fn deselect(&mut self, description: &str) {
        self.selected.retain(|d| d != description);
    }

    /// Descriptions currently chosen
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// The deliverable rows: chosen opportunities in their original
    /// order, full three-field shape.
    pub fn selected_rows(&self) -> Vec<ImprovementOpportunity> {
        self.opportunities()
            .into_iter()
            .filter(|o| {
                self.selected
                    .iter()
                    .any(|d| d == &o.oportunidade_melhoria)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AnalysisResult;

    fn opportunity(desc: &str) -> ImprovementOpportunity {
        ImprovementOpportunity {
            oportunidade_melhoria: desc.to_string(),
            tarefa: format!("tarefa de {}", desc),
            criterio_aceitacao: format!("criterio de {}", desc),
        }
    }

    fn session_with(descs: &[&str]) -> AnalysisSession {
        let rows = descs.iter().map(|d| opportunity(d)).collect();
        AnalysisSession::new(AnalysisResult::new(rows))
    }

    #[test]
    fn selection_filters_in_original_order() {
        let mut session = session_with(&["A", "B", "C"]);
        session.select("C");
        session.select("A");

        let rows = session.selected_rows();
        assert_eq!(rows.len(), 2);
        // Original result order, not selection order
        assert_eq!(rows[0].oportunidade_melhoria, "A");
        assert_eq!(rows[1].oportunidade_melhoria, "C");
    }

    #[test]
    fn deselect_removes() {
        let mut session = session_with(&["A", "B"]);
        session.select("A");
        session.select("B");
        session.deselect("A");
        assert_eq!(session.selected(), &["B".to_string()]);
        assert_eq!(session.selected_rows().len(), 1);
    }

    #[test]
    fn select_is_idempotent() {
        let mut session = session_with(&["A"]);
        session.select("A");
        session.select("A");
        assert_eq!(session.selected().len(), 1);
    }

    #[test]
    fn manual_addition_has_empty_task_and_criterion() {
        let mut session = session_with(&["A"]);
        session.add_opportunity("Nova oportunidade");
        session.select("Nova oportunidade");

        let rows = session.selected_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].oportunidade_melhoria, "Nova oportunidade");
        assert!(rows[0].tarefa.is_empty());
        assert!(rows[0].criterio_aceitacao.is_empty());
    }

    #[test]
    fn roundtrips_through_serde() {
        let mut session = session_with(&["A", "B"]);
        session.add_opportunity("C");
        session.select("B");

        let json = serde_json::to_string(&session).unwrap();
        let restored: AnalysisSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.selected(), &["B".to_string()]);
        assert_eq!(restored.opportunities().len(), 3);
    }
}
