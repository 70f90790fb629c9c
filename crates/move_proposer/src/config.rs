use serde::{Deserialize, Serialize};

/// Settings for [`crate::ChatCompletionProposer`].
///
/// Generation parameters favour short, repeatable answers: one move, then stop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposerConfig {
    /// Chat-completion endpoint receiving the POST
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stop: Vec<String>,
    /// TCP/TLS connect timeout; the overall per-call bound is set by the caller
    pub connect_timeout_ms: u64,
}

impl Default for ProposerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/v1/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            temperature: 0.1,
            max_tokens: 8,
            top_p: 0.15,
            stop: vec!["\n".to_string()],
            connect_timeout_ms: 10_000,
        }
    }
}
