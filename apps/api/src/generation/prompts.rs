// All LLM prompt constants for the Generation module.

/// Cover letter prompt template.
/// Replace `{tone}`, `{resume}`, and `{job_post}` before sending.
///
/// The JSON-only and no-fence rules are enforced by instruction, not locally:
/// the salvage layer in `generator` still has to tolerate deviations.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are a helpful assistant that generates cover letters.

Based on the resume and job description below, do the following:
1. Write a personalized cover letter in a {tone} tone.
2. Extract the company name from the job description.
3. Return only a valid JSON object with two keys:
   - "letter": the cover letter
   - "company": the company name

Do NOT include markdown, explanations, or code blocks — return only the raw JSON.

Resume:
{resume}

Job Description:
{job_post}

Start the letter with "Dear Hiring Manager," unless a name is specified. Be concise but strictly 250 to 300 words.
"#;
