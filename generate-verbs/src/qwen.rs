//! Client for the DashScope (Qwen) text-generation service.
//!
//! The model only supplies the simple tenses and the imperative; compound
//! tenses are derived locally. Replies are free-form text from which a JSON
//! object is extracted, so everything returned here is untrusted until it
//! has gone through record normalization.

use anyhow::Context;
use serde_json::Value;

use crate::collector::ConjugationService;

const DASHSCOPE_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

const DEFAULT_MODEL: &str = "qwen-plus";

const CONJUGATION_PROMPT: &str = r#"
You are an expert Spanish linguist and a strict JSON generator.

Task:
Given ONE Spanish verb in its infinitive form (non-reflexive, like "llamar"),
return a single JSON object with its basic conjugation information.

IMPORTANT: Do NOT include any compound tenses (no "he amado", "habría amado", etc.).
Only simple tenses and imperative. Compound tenses will be computed by the caller.

The JSON MUST strictly follow this schema:

Top-level fields:
- "infinitive": string
- "gerund": string
- "participles": array of strings
- "is_reflexive": boolean

- "indicative": object with EXACTLY these tenses:
    - "present"
    - "imperfect"
    - "preterite"
    - "future"
    - "conditional"

- "subjunctive": object with EXACTLY these tenses:
    - "present"
    - "imperfect"
    - "future"

- "imperative": object with EXACTLY these tenses:
    - "affirmative"
    - "negative"

For EACH tense (in all moods), the value is an object with:
  - "regular": boolean
  - Person slots (ALWAYS arrays of strings):
      - "first_singular"
      - "second_singular"
      - "second_singular_vos_form"
      - "third_singular"
      - "first_plural"
      - "second_plural"
      - "third_plural"

Additional rules:
- "participles" MUST have length 1 or 2.
  - If 2, the FIRST is the regular/standard one, the SECOND is irregular/adjectival.
- "subjunctive.imperfect": EVERY person slot MUST have exactly 2 forms:
  the -ra and -se variants, in this order, e.g. ["hablara","hablase"].
- Imperative:
  - If a person has no imperative form (e.g. first_singular), return [] for that slot.
- Do NOT include any compound tenses.
- Do NOT print comments or explanations. Only output a single JSON object.
"#;

/// Per-verb failures from the generation service. None of these abort a
/// batch; the collector catches them at the per-verb boundary.
#[derive(Debug, thiserror::Error)]
pub enum QwenError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation API error: status={status}, code={code:?}, message={message:?}")]
    Api {
        status: reqwest::StatusCode,
        code: Option<String>,
        message: Option<String>,
    },
    #[error("response carries no message content")]
    MissingContent,
    #[error("no JSON object found in model output")]
    NoJsonObject,
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub struct QwenClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl QwenClient {
    /// Read credentials and the optional model override from the process
    /// environment. A missing API key is fatal before any processing starts.
    pub fn from_env() -> anyhow::Result<QwenClient> {
        let api_key = std::env::var("DASHSCOPE_API_KEY").context("DASHSCOPE_API_KEY not set")?;
        let model = std::env::var("VERB_GENERATION_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(QwenClient {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    /// Send a system/user chat and parse the JSON object out of the reply.
    pub async fn chat_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Value, QwenError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": {
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": user_prompt },
                ],
            },
            "parameters": { "result_format": "message" },
        });

        let response = self
            .client
            .post(DASHSCOPE_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let payload: Value = response.json().await.unwrap_or(Value::Null);
            return Err(QwenError::Api {
                status,
                code: payload["code"].as_str().map(str::to_string),
                message: payload["message"].as_str().map(str::to_string),
            });
        }

        let payload: Value = response.json().await?;
        let content = payload["output"]["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(QwenError::MissingContent)?;
        let object = extract_json_object(content)?;
        Ok(serde_json::from_str(object)?)
    }
}

impl ConjugationService for QwenClient {
    async fn conjugate(&self, base_verb: &str) -> Result<Value, QwenError> {
        self.chat_json(CONJUGATION_PROMPT, &format!("Verb: {base_verb}"))
            .await
    }
}

/// Slice the first `{` .. last `}` span out of free-form model output, which
/// also strips any ```json fences or prose around the object.
fn extract_json_object(text: &str) -> Result<&str, QwenError> {
    let start = text.find('{').ok_or(QwenError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(QwenError::NoJsonObject)?;
    if start > end {
        return Err(QwenError::NoJsonObject);
    }
    Ok(&text[start..=end])
}
