//! Analysis prompt construction

use crate::record::RetrievedCase;

/// Fixed role preamble sent as the system message
pub(crate) const SYSTEM_PERSONA: &str = "You are a senior process-optimization consultant at one \
of the leading global strategy consulting firms, with deep experience in organizational \
transformation and continuous-improvement programs. You analyze business processes critically \
and ground your recommendations in evidence from comparable historical cases.";

/// Corrective follow-up sent once when the response fails to parse
pub(crate) const CORRECTIVE_PROMPT: &str = "Your previous answer did not follow the required \
output format. Respond again with ONLY a JSON array of objects, each object having exactly the \
keys \"oportunidade_melhoria\", \"tarefa\" and \"criterio_aceitacao\" with non-empty string \
values. No markdown code fences, no language tag, no commentary before or after the array.";

/// Build the single analysis prompt for one process.
///
/// Embeds the combined process text, the retrieved historical context,
/// the fixed analytic lenses and the strict output-format directive.
pub(crate) fn build_analysis_prompt(process_text: &str, cases: &[RetrievedCase]) -> String {
    let mut context = String::new();
    for case in cases {
        context.push_str(&format!("{}. {}\n", case.rank, case.content));
    }
    if context.is_empty() {
        context.push_str("(no comparable historical cases found)\n");
    }

    format!(
        r#"Analyze the following business process and suggest improvements.

PROCESS UNDER ANALYSIS:
{process_text}

COMPARABLE HISTORICAL CASES (most similar first):
{context}
ANALYSIS GUIDELINES:
- Apply methodologies such as Lean Six Sigma, Theory of Constraints and Business Process Management
- Consider market best practices for the specific industry
- Evaluate digital transformation and Industry 4.0 aspects
- Weigh impact on cost, quality, lead time and customer satisfaction
- Assess risks and required control points

SPECIFIC ASPECTS TO COVER:
1. Bottlenecks and redundancies
2. Automation opportunities (RPA, AI, etc.)
3. Integration between systems and departments
4. Compliance and risk management
5. Performance indicators (KPIs)
6. Required training
7. Impact on people and change management

RESPONSE CRITERIA:
1. Improvement opportunities must be specific, actionable, evidence-based and aligned with the stated business drivers.
2. Tasks must be SMART (specific, measurable, achievable, relevant, time-bound), with clear ownership and dependencies.
3. Acceptance criteria must use quantitative metrics wherever possible, with clear success indicators and milestones.

CONSTRAINTS:
- Keep each suggestion focused on a single aspect of the process
- Prioritize improvements with high impact and low implementation effort
- Only propose realistic, implementable changes

OUTPUT FORMAT:
Return ONLY a JSON array of objects, each with exactly these keys and non-empty string values:
[
  {{"oportunidade_melhoria": "clear, specific description of the identified opportunity",
    "tarefa": "concrete, measurable action to implement the improvement",
    "criterio_aceitacao": "specific metrics and outcomes that indicate successful implementation"}}
]
No markdown code fences. No language tag. No commentary before or after the array."#
    )
}
