//! Cover Letter Generation — the one real pipeline in Missive.
//!
//! Flow: render prompt → single Gemini call → fence-strip → parse → respond.
//!
//! Two independent fallback layers keep this infallible toward the caller:
//! - outer: the upstream call failed → fixed sentinel result
//! - inner: the reply text is not the requested JSON → raw text as the letter

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::generation::prompts::COVER_LETTER_PROMPT_TEMPLATE;
use crate::llm_client::{strip_json_fences, TextGenerator};

/// Placeholder company name when the model omits or garbles the key.
const COMPANY_PLACEHOLDER: &str = "company";
/// Letter body returned when the upstream call itself fails.
const GENERATION_ERROR_LETTER: &str = "Error generating letter";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for cover letter generation.
/// Every field is optional on the wire; missing fields become empty strings,
/// never a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_post: String,
    #[serde(default)]
    pub tone: String,
}

/// Response from the generation pipeline. Always well-formed: both failure
/// layers resolve into this shape instead of an error status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateResponse {
    pub letter: String,
    pub company: String,
}

/// The JSON object the prompt asks the model to return.
/// Parsed leniently: a missing `letter` is empty, a missing `company` falls
/// back to the placeholder.
#[derive(Debug, Deserialize)]
struct LetterReply {
    #[serde(default)]
    letter: String,
    #[serde(default = "default_company")]
    company: String,
}

fn default_company() -> String {
    COMPANY_PLACEHOLDER.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Generates a cover letter from the request. Never fails outward: upstream
/// failures collapse into the sentinel result, malformed replies into the
/// raw-text fallback.
pub async fn generate_cover_letter(
    llm: &dyn TextGenerator,
    request: &GenerateRequest,
) -> GenerateResponse {
    let prompt = build_cover_letter_prompt(request);

    match llm.generate(&prompt).await {
        Ok(reply) => salvage_reply(&reply),
        Err(e) => {
            error!("Gemini call failed: {e}");
            GenerateResponse {
                letter: GENERATION_ERROR_LETTER.to_string(),
                company: COMPANY_PLACEHOLDER.to_string(),
            }
        }
    }
}

/// Builds the generation prompt by filling the template with the request
/// fields verbatim. Deterministic: identical inputs yield identical bytes.
pub fn build_cover_letter_prompt(request: &GenerateRequest) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{tone}", &request.tone)
        .replace("{resume}", &request.resume)
        .replace("{job_post}", &request.job_post)
}

/// Reshapes the model's raw reply into the two-field result.
///
/// The reply is fence-stripped, then parsed as the requested JSON object.
/// Anything that is not such an object (prose, bare values, truncated JSON)
/// becomes the letter body itself, with the placeholder company.
pub fn salvage_reply(reply: &str) -> GenerateResponse {
    let text = strip_json_fences(reply);

    match serde_json::from_str::<LetterReply>(text) {
        Ok(parsed) => GenerateResponse {
            letter: parsed.letter,
            company: parsed.company,
        },
        Err(err) => {
            error!("JSON parsing failed: {err}");
            GenerateResponse {
                letter: text.to_string(),
                company: COMPANY_PLACEHOLDER.to_string(),
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    /// Stub generator returning a canned reply.
    struct CannedModel(&'static str);

    #[async_trait]
    impl TextGenerator for CannedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    /// Stub generator whose upstream call always fails.
    struct FailingModel;

    #[async_trait]
    impl TextGenerator for FailingModel {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "upstream unavailable".to_string(),
            })
        }
    }

    fn sample_request() -> GenerateRequest {
        GenerateRequest {
            resume: "Jane Doe, 5y backend".to_string(),
            job_post: "Acme Corp seeks backend engineer".to_string(),
            tone: "formal".to_string(),
        }
    }

    #[test]
    fn test_request_all_fields_absent_default_to_empty() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.resume, "");
        assert_eq!(request.job_post, "");
        assert_eq!(request.tone, "");
    }

    #[test]
    fn test_request_job_post_is_camel_case_on_the_wire() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"resume": "r", "jobPost": "j", "tone": "casual"}"#,
        )
        .unwrap();
        assert_eq!(request.job_post, "j");
        assert_eq!(request.tone, "casual");
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = sample_request();
        assert_eq!(
            build_cover_letter_prompt(&request),
            build_cover_letter_prompt(&request)
        );
    }

    #[test]
    fn test_prompt_embeds_all_fields_verbatim() {
        let request = sample_request();
        let prompt = build_cover_letter_prompt(&request);
        assert!(prompt.contains("Jane Doe, 5y backend"));
        assert!(prompt.contains("Acme Corp seeks backend engineer"));
        assert!(prompt.contains("in a formal tone"));
        assert!(prompt.contains("Dear Hiring Manager,"));
        assert!(prompt.contains("250 to 300 words"));
    }

    #[test]
    fn test_prompt_with_empty_fields_still_renders() {
        let prompt = build_cover_letter_prompt(&GenerateRequest::default());
        assert!(prompt.contains("Resume:"));
        assert!(prompt.contains("Job Description:"));
        assert!(!prompt.contains("{resume}"));
        assert!(!prompt.contains("{job_post}"));
        assert!(!prompt.contains("{tone}"));
    }

    #[test]
    fn test_salvage_plain_json_reply() {
        let result = salvage_reply(r#"{"letter": "X", "company": "Y"}"#);
        assert_eq!(result.letter, "X");
        assert_eq!(result.company, "Y");
    }

    #[test]
    fn test_salvage_fenced_json_reply() {
        let result = salvage_reply(
            "```json\n{\"letter\":\"Dear Hiring Manager, ...\",\"company\":\"Acme Corp\"}\n```",
        );
        assert_eq!(result.letter, "Dear Hiring Manager, ...");
        assert_eq!(result.company, "Acme Corp");
    }

    #[test]
    fn test_salvage_prose_reply_becomes_letter() {
        let result = salvage_reply("I cannot help with that.");
        assert_eq!(result.letter, "I cannot help with that.");
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_salvage_missing_company_defaults_to_placeholder() {
        let result = salvage_reply(r#"{"letter": "X"}"#);
        assert_eq!(result.letter, "X");
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_salvage_missing_letter_defaults_to_empty() {
        let result = salvage_reply(r#"{"company": "Y"}"#);
        assert_eq!(result.letter, "");
        assert_eq!(result.company, "Y");
    }

    #[test]
    fn test_salvage_empty_reply() {
        let result = salvage_reply("");
        assert_eq!(result.letter, "");
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_salvage_non_object_json_falls_back_to_raw_text() {
        // Valid JSON, but not the requested object shape.
        let result = salvage_reply(r#""just a string""#);
        assert_eq!(result.letter, r#""just a string""#);
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_salvage_preserves_inner_fence_content() {
        // Fence stripping must not alter the inner JSON payload.
        let inner = r#"{"letter": "Use ``code`` sparingly", "company": "Acme"}"#;
        let fenced = format!("```json\n{inner}\n```");
        let result = salvage_reply(&fenced);
        assert_eq!(result.letter, "Use ``code`` sparingly");
        assert_eq!(result.company, "Acme");
    }

    #[tokio::test]
    async fn test_generate_happy_path_with_fenced_reply() {
        let model = CannedModel(
            "```json\n{\"letter\":\"Dear Hiring Manager, ...\",\"company\":\"Acme Corp\"}\n```",
        );
        let result = generate_cover_letter(&model, &sample_request()).await;
        assert_eq!(
            result,
            GenerateResponse {
                letter: "Dear Hiring Manager, ...".to_string(),
                company: "Acme Corp".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_generate_prose_reply_is_salvaged() {
        let model = CannedModel("I cannot help with that.");
        let result = generate_cover_letter(&model, &sample_request()).await;
        assert_eq!(result.letter, "I cannot help with that.");
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_generate_upstream_failure_yields_sentinel() {
        let result = generate_cover_letter(&FailingModel, &sample_request()).await;
        assert_eq!(
            result,
            GenerateResponse {
                letter: GENERATION_ERROR_LETTER.to_string(),
                company: COMPANY_PLACEHOLDER.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_generate_never_fails_with_all_fields_absent() {
        let model = CannedModel("{}");
        let result = generate_cover_letter(&model, &GenerateRequest::default()).await;
        assert_eq!(result.letter, "");
        assert_eq!(result.company, COMPANY_PLACEHOLDER);
    }
}
