// All LLM prompt templates for the generation pipeline.
// Placeholders are `{name}`; fill them with `fill_template`, never with chained
// `str::replace`, so user text containing braces is never re-expanded.

/// ParseJob. Placeholders: {title}, {company}, {location}, {description}
pub const PARSE_JOB_TEMPLATE: &str = r#"You are a hiring expert reviewing a job posting.

JOB:
Title: {title}
Company: {company}
Location: {location}

DESCRIPTION:
"""{description}"""

TASKS:
1. Summarize the role in 3-5 bullet points.
2. List the MUST-HAVE skills.
3. List the NICE-TO-HAVE skills.
4. Infer the seniority level, choosing exactly one of: Intern / Entry / Junior / Mid / Senior.
5. List the top 10 keywords an applicant-tracking system (ATS) is likely to screen for.

Respond in markdown."#;

/// ScoreFit. Placeholders: {candidate}, {resume_text}, {job}, {description}, {json_only}
pub const SCORE_FIT_TEMPLATE: &str = r#"You are a recruiter and career coach.

CANDIDATE:
{candidate}

RESUME:
"""{resume_text}"""

JOB:
{job}

DESCRIPTION:
"""{description}"""

TASK:
Assess how well the candidate fits this job. {json_only}

{
  "score": 0-100,
  "level": "Strong Fit" | "Moderate Fit" | "Weak Fit",
  "reasons": ["...", "..."],
  "gaps": ["...", "..."]
}"#;

/// TailorResume. Placeholders: {resume_text}, {job_line}, {description}, {no_fabrication}
pub const TAILOR_RESUME_TEMPLATE: &str = r#"You are a resume optimization assistant.

CANDIDATE RESUME:
"""{resume_text}"""

JOB:
{job_line}

DESCRIPTION:
"""{description}"""

TASK:
1. Select the 6-10 most relevant experiences, projects, or achievements.
2. Rewrite them as strong bullets that open with an action verb and include metrics where the resume supports them.
3. Use the job's keywords where they honestly apply. {no_fabrication}
4. Group the bullets under 2-3 short headings.
5. Suggest one headline, on a single line, tailored to this job.

Output markdown with headings."#;

/// WriteCoverLetter.
/// Placeholders: {candidate}, {resume_text}, {job_line}, {description},
/// {score}, {level}, {reasons}, {gaps}, {no_fabrication}
pub const COVER_LETTER_TEMPLATE: &str = r#"You are an expert cover letter writer.

CANDIDATE:
{candidate}

RESUME:
"""{resume_text}"""

JOB:
{job_line}

DESCRIPTION:
"""{description}"""

FIT:
Score: {score}
Level: {level}
Reasons: {reasons}
Gaps: {gaps}

TASK:
Write a tailored cover letter of 350-450 words:
- Name the role and the company in the opening paragraph.
- Connect 2-3 specific experiences from the resume to the job.
- Be specific and professional, not fluffy.
- {no_fabrication}

Output ONLY the letter text."#;

/// AnswerQuestions. Placeholders: {candidate}, {resume_text}, {job_line}, {description}, {questions}
pub const ANSWER_QUESTIONS_TEMPLATE: &str = r#"You help candidates answer job application questions.

CANDIDATE:
{candidate}

RESUME:
"""{resume_text}"""

JOB:
{job_line}

DESCRIPTION:
"""{description}"""

QUESTIONS:
{questions}

TASK:
Answer each question in 3-6 sentences. Number each answer to match its question and keep the same order."#;

/// Substitutes `{key}` placeholders in a single left-to-right pass.
///
/// Braces that do not enclose a known key are copied through untouched, so
/// JSON examples inside templates survive.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });

        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_keys() {
        let out = fill_template("Hello {name}, welcome to {place}.", &[("name", "Ada"), ("place", "Acme")]);
        assert_eq!(out, "Hello Ada, welcome to Acme.");
    }

    #[test]
    fn test_fill_template_keeps_json_braces() {
        let out = fill_template(r#"{"score": {score}}"#, &[("score", "80")]);
        assert_eq!(out, r#"{"score": 80}"#);
    }

    #[test]
    fn test_fill_template_does_not_expand_placeholders_inside_values() {
        let out = fill_template("{a} / {b}", &[("a", "{b}"), ("b", "second")]);
        assert_eq!(out, "{b} / second");
    }

    #[test]
    fn test_fill_template_handles_unclosed_brace() {
        let out = fill_template("trailing { brace {x}", &[("x", "ok")]);
        assert_eq!(out, "trailing { brace ok");
    }

    #[test]
    fn test_score_fit_template_keeps_schema_example() {
        let out = fill_template(SCORE_FIT_TEMPLATE, &[("json_only", "Return JSON only.")]);
        assert!(out.contains(r#""level": "Strong Fit" | "Moderate Fit" | "Weak Fit""#));
        assert!(out.contains("Return JSON only."));
    }
}
