//! Strict parsing of the language model response
//!
//! The wire contract is a bare JSON array of three-field objects. No
//! fence stripping, no heuristic extraction: anything that is not the
//! required shape fails the call.

use crate::error::{KaizenError, Result};
use crate::record::ImprovementOpportunity;

/// Parse a response into the required structured list.
///
/// Fails on surrounding prose, markdown fences, wrong or extra keys,
/// and on any row with an empty field. Never returns partial results.
pub(crate) fn parse_opportunities(response: &str) -> Result<Vec<ImprovementOpportunity>> {
    let trimmed = response.trim();

    let rows: Vec<ImprovementOpportunity> = serde_json::from_str(trimmed).map_err(|e| {
        KaizenError::Parse(format!(
            "LLM response is not the required JSON array of opportunities: {}",
            e
        ))
    })?;

    for (i, row) in rows.iter().enumerate() {
        if !row.is_complete() {
            return Err(KaizenError::Parse(format!(
                "Opportunity {} has an empty field; all three fields must be non-empty",
                i + 1
            )));
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_array() {
        let response =
            r#"[{"oportunidade_melhoria":"A","tarefa":"B","criterio_aceitacao":"C"}]"#;
        let rows = parse_opportunities(response).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].oportunidade_melhoria, "A");
        assert_eq!(rows[0].tarefa, "B");
        assert_eq!(rows[0].criterio_aceitacao, "C");
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let response =
            "\n  [{\"oportunidade_melhoria\":\"A\",\"tarefa\":\"B\",\"criterio_aceitacao\":\"C\"}]\n";
        assert_eq!(parse_opportunities(response).unwrap().len(), 1);
    }

    #[test]
    fn rejects_markdown_fences() {
        let response = "```json\n[{\"oportunidade_melhoria\":\"A\",\"tarefa\":\"B\",\"criterio_aceitacao\":\"C\"}]\n```";
        assert!(matches!(
            parse_opportunities(response),
            Err(KaizenError::Parse(_))
        ));
    }

    #[test]
    fn rejects_surrounding_prose() {
        let response = "Here are the opportunities: [{\"oportunidade_melhoria\":\"A\",\"tarefa\":\"B\",\"criterio_aceitacao\":\"C\"}]";
        assert!(parse_opportunities(response).is_err());
    }

    #[test]
    fn rejects_missing_field() {
        let response = r#"[{"oportunidade_melhoria":"A","tarefa":"B"}]"#;
        assert!(parse_opportunities(response).is_err());
    }

    #[test]
    fn rejects_extra_field() {
        let response = r#"[{"oportunidade_melhoria":"A","tarefa":"B","criterio_aceitacao":"C","prioridade":"alta"}]"#;
        assert!(parse_opportunities(response).is_err());
    }

    #[test]
    fn rejects_empty_field_value() {
        let response = r#"[{"oportunidade_melhoria":"A","tarefa":"","criterio_aceitacao":"C"}]"#;
        assert!(parse_opportunities(response).is_err());
    }

    #[test]
    fn accepts_empty_array() {
        let rows = parse_opportunities("[]").unwrap();
        assert!(rows.is_empty());
    }
}
