// Prompt constants for the critique call.
// The labeled-section layout is the contract with `parser::parse_critique`.

pub const CRITIQUE_SYSTEM: &str = "You are an expert career coach providing feedback on a \
    resume for a specific job description. Be professional, constructive, and encouraging.";

/// Labeled-section critique prompt.
/// Replace: {jd}, {resume}, {missing_keywords}
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"Your response MUST follow this structure EXACTLY, with each section header on a new line:

**Verdict:** [A short, one-line verdict like "Excellent Match", "Good Fit", "Needs Improvement", or "Poor Match"]
**Overall Score:** [A single integer score from 0 to 100 representing the resume's alignment with the job description]
**Actionable Feedback:**
* **Strengths:** [1-2 concise bullet points on what the resume does well in relation to the job.]
* **Areas for Improvement:** [2-3 specific, actionable bullet points on how to better tailor the resume to this job. Suggest how to incorporate some of the missing keywords naturally.]

Analyze the resume against the job description below.
**Job Description:** {jd}
**Resume Text:** {resume}
**Missing Keywords to consider:** {missing_keywords}"#;

pub const STRUCTURED_CRITIQUE_SYSTEM: &str = "You are an expert career coach providing \
    feedback on a resume for a specific job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// JSON critique prompt.
/// Replace: {jd}, {resume}, {missing_keywords}
pub const STRUCTURED_CRITIQUE_PROMPT_TEMPLATE: &str = r#"Analyze the resume against the job description and return a JSON object with this EXACT schema:
{
  "verdict": "Excellent Match | Good Fit | Needs Improvement | Poor Match",
  "overall_score": 0,
  "actionable_feedback": "Markdown bullets: 1-2 strengths, then 2-3 specific improvements that work in some of the missing keywords naturally."
}

overall_score is a single integer from 0 to 100 for the resume's alignment with the job description.

JOB DESCRIPTION:
{jd}

RESUME TEXT:
{resume}

MISSING KEYWORDS TO CONSIDER:
{missing_keywords}"#;
