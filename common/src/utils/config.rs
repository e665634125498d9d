use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// JSON side-file holding externally generated replies per table.
    #[serde(default = "default_reply_store_path")]
    pub reply_store_path: String,
    #[serde(default = "default_direct_line_base_url")]
    pub direct_line_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: usize,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    #[serde(default = "default_complete_delay_ms")]
    pub complete_delay_ms: u64,
    #[serde(default = "default_upload_max_body_bytes")]
    pub upload_max_body_bytes: usize,
}

fn default_http_port() -> u16 {
    8000
}

fn default_reply_store_path() -> String {
    "/app/output_with_bot_replies.json".to_string()
}

fn default_direct_line_base_url() -> String {
    "https://directline.botframework.com/v3/directline".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_chunk_words() -> usize {
    990
}

fn default_retry_max_attempts() -> usize {
    3
}

fn default_retry_delay_ms() -> u64 {
    2_000
}

fn default_chunk_delay_ms() -> u64 {
    1_000
}

fn default_complete_delay_ms() -> u64 {
    2_000
}

fn default_upload_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            reply_store_path: default_reply_store_path(),
            direct_line_base_url: default_direct_line_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            chunk_words: default_chunk_words(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            chunk_delay_ms: default_chunk_delay_ms(),
            complete_delay_ms: default_complete_delay_ms(),
            upload_max_body_bytes: default_upload_max_body_bytes(),
        }
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
