use serde::{Deserialize, Serialize};

use crate::stream::Prospect;

pub const DEFAULT_MODEL_ID: &str = "meta.llama3-8b-instruct-v1:0";
pub const DEFAULT_MAX_GEN_LEN: u32 = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const EMAIL_SIGNATURE: &str = "Ford Motors";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model_id: String,
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_gen_len: DEFAULT_MAX_GEN_LEN,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// JSON body submitted to the hosted model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl GenerationRequest {
    pub fn for_prospect(prospect: &Prospect, settings: &GenerationSettings) -> Self {
        let instruction = build_instruction(&prospect.first_name, &prospect.interests);
        Self {
            prompt: wrap_llama_envelope(&instruction),
            max_gen_len: settings.max_gen_len,
            temperature: settings.temperature,
            top_p: settings.top_p,
        }
    }

    pub fn to_body(&self) -> Result<Vec<u8>, ContractError> {
        serde_json::to_vec(self).map_err(|error| ContractError::Encode(error.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResponse {
    pub generation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_token_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

impl GenerationResponse {
    pub fn from_body(body: &[u8]) -> Result<Self, ContractError> {
        serde_json::from_slice(body).map_err(|error| ContractError::Decode(error.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    #[error("failed to encode generation request: {0}")]
    Encode(String),
    #[error("malformed generation response: {0}")]
    Decode(String),
}

pub fn build_instruction(first_name: &str, interests: &str) -> String {
    format!(
        "You are a cold email writer whose main purpose is to write concise, friendly, natural, \
and personalised cold emails for potential Ford Motor customers. This particular customer \
({first_name}) has the following interests: {interests}. The objective is to write a \
100-150-word cold email main body that tries to get the person interested in Ford products. \
Take full advantage of the interests above by personalising the email with them. For example, \
if the potential customer likes snowboarding, one or more lines of the email body can describe \
how a Ford model of your choosing can help them do exactly that. Write a natural, friendly, \
warm, and personalised email main body marketing a Ford Motor car model. \
Do NOT include a subject line. Do NOT use markdown. Do NOT use bullet points. Only the email. \
You can use the customer's first name in the email. The signature will be from \"{EMAIL_SIGNATURE}\"."
    )
}

/// Wraps an instruction in the Llama 3 single-turn chat envelope.
pub fn wrap_llama_envelope(instruction: &str) -> String {
    format!(
        "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n{instruction}<|eot_id|><|start_header_id|>assistant<|end_header_id|>\n\n"
    )
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn jane() -> Prospect {
        Prospect {
            customer_id: "abc123".to_string(),
            first_name: "Jane".to_string(),
            interests: "skiing,hiking".to_string(),
        }
    }

    #[test]
    fn instruction_carries_name_interests_and_constraints() {
        let instruction = build_instruction("Jane", "skiing,hiking");

        assert!(instruction.contains("(Jane)"));
        assert!(instruction.contains("interests: skiing,hiking."));
        assert!(instruction.contains("100-150-word"));
        assert!(instruction.contains("Do NOT use markdown"));
        assert!(instruction.contains("Do NOT use bullet points"));
        assert!(instruction.contains("\"Ford Motors\""));
    }

    #[test]
    fn envelope_places_instruction_in_user_turn() {
        let prompt = wrap_llama_envelope("hello");

        assert!(prompt.starts_with("<|begin_of_text|><|start_header_id|>user<|end_header_id|>"));
        assert!(prompt.ends_with("<|start_header_id|>assistant<|end_header_id|>\n\n"));
        let user_turn_end = prompt.find("<|eot_id|>").expect("eot marker");
        assert!(prompt[..user_turn_end].contains("hello"));
    }

    #[test]
    fn request_body_uses_fixed_decoding_parameters() {
        let request = GenerationRequest::for_prospect(&jane(), &GenerationSettings::default());
        let body: Value =
            serde_json::from_slice(&request.to_body().expect("body should encode"))
                .expect("body should be json");

        assert_eq!(body["max_gen_len"], json!(512));
        assert_eq!(body["temperature"], json!(0.7));
        assert_eq!(body["top_p"], json!(0.9));
        let prompt = body["prompt"].as_str().expect("prompt string");
        assert!(prompt.contains("Jane"));
        assert!(prompt.contains("skiing,hiking"));
    }

    #[test]
    fn response_parsing_requires_generation_field() {
        let response = GenerationResponse::from_body(
            br#"{"generation":"Hi Jane,\nFord Motors","prompt_token_count":10,"stop_reason":"stop"}"#,
        )
        .expect("response should parse");
        assert_eq!(response.generation, "Hi Jane,\nFord Motors");
        assert_eq!(response.prompt_token_count, Some(10));
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));

        let error = GenerationResponse::from_body(br#"{"outputs":[]}"#)
            .expect_err("missing generation should fail");
        assert!(matches!(error, ContractError::Decode(_)));
    }
}
