//! Chat-completion client for the Gemini REST API.
//!
//! One client is constructed at startup and shared by reference; it is
//! never rebuilt per request. Transient upstream failures retry on a
//! bounded linear backoff; model names fall back in a fixed order.

use crate::error::StudioError;
use crate::sandbox::bridge::ICON_NAMES;
use serde_json::{Value, json};
use std::sync::OnceLock;
use std::time::Duration;

/// Models tried in order until one answers.
pub const GEMINI_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-pro"];

const MAX_ATTEMPTS: u32 = 3;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Linear backoff schedule: 2s, 4s, 6s.
pub fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(attempt as u64 * 2)
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// The system prompt pins the output contract the extractor and sandbox
/// rely on: one `luau` fence, the `GeneratedComponent` name, no imports,
/// bridge symbols only.
pub fn system_prompt() -> &'static str {
    static PROMPT: OnceLock<String> = OnceLock::new();
    PROMPT.get_or_init(|| {
        format!(
            "You are Protoloom's expert UI component generator. Generate ONLY the Luau component \
code without any explanations, descriptions, or additional text.

STRICT RULES:
1. Always name your main component \"GeneratedComponent\"
2. Return ONLY the Luau code in a single ```luau code block (plus one optional ```css block)
3. No explanations, descriptions, or additional text
4. No import or require statements
5. Build markup with h(tag, props, children) and style with Tailwind utility classes
6. Use useState and useEffect for interactivity

AVAILABLE TAGS:
div, text, button, input, image, icon, badge, divider, spacer

AVAILABLE ICONS (call directly as functions, no imports needed):
{}

RESPONSE FORMAT:
Return ONLY this format with no additional text:

```luau
function GeneratedComponent()
    local count, setCount = useState(0)
    return h(\"div\", {{ class = \"flex flex-col gap-4 p-6\" }}, {{
        h(\"text\", {{ text = \"Count: \" .. count, class = \"text-2xl font-bold\" }}),
        h(\"button\", {{ text = \"Increment\", onClick = function() setCount(count + 1) end }}),
    }})
end
```

NO explanations. NO descriptions. ONLY the code block above.",
            ICON_NAMES.join(", ")
        )
    })
}

/// One prior conversation turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different endpoint (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Send the conversation plus the new prompt; return the full
    /// response text blob unmodified.
    pub async fn generate(
        &self,
        history: &[ChatTurn],
        prompt: &str,
    ) -> Result<String, StudioError> {
        let body = request_body(history, prompt);
        let mut last_error = String::from("chat service unavailable");

        for model in GEMINI_MODELS {
            for attempt in 1..=MAX_ATTEMPTS {
                let url = format!(
                    "{}/models/{}:generateContent?key={}",
                    self.base_url, model, self.api_key
                );
                match self.http.post(&url).json(&body).send().await {
                    Ok(response) if response.status().is_success() => {
                        let payload: Value = response
                            .json()
                            .await
                            .map_err(|err| StudioError::Transport(err.to_string()))?;
                        return response_text(&payload).ok_or_else(|| {
                            StudioError::Transport(
                                "chat service returned no candidates".to_string(),
                            )
                        });
                    }
                    Ok(response) if is_retryable(response.status()) && attempt < MAX_ATTEMPTS => {
                        log::warn!(
                            "model {} returned {}, retrying (attempt {}/{})",
                            model,
                            response.status(),
                            attempt,
                            MAX_ATTEMPTS
                        );
                        tokio::time::sleep(retry_delay(attempt)).await;
                    }
                    Ok(response) => {
                        last_error = format!("model {} returned {}", model, response.status());
                        log::warn!("{}, trying next model", last_error);
                        break;
                    }
                    Err(err) if attempt < MAX_ATTEMPTS => {
                        log::warn!(
                            "request to model {} failed: {}, retrying (attempt {}/{})",
                            model,
                            err,
                            attempt,
                            MAX_ATTEMPTS
                        );
                        tokio::time::sleep(retry_delay(attempt)).await;
                    }
                    Err(err) => {
                        last_error = err.to_string();
                        break;
                    }
                }
            }
        }

        Err(StudioError::Transport(last_error))
    }
}

/// Request payload: system instruction plus the conversation, user turn last.
fn request_body(history: &[ChatTurn], prompt: &str) -> Value {
    let mut contents: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": if turn.role == "user" { "user" } else { "model" },
                "parts": [{ "text": turn.content }],
            })
        })
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": prompt }] }));

    json!({
        "system_instruction": { "parts": [{ "text": system_prompt() }] },
        "contents": contents,
    })
}

/// Concatenated text parts of the first candidate.
fn response_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() { None } else { Some(text) }
}
