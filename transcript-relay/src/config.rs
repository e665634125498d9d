use std::time::Duration;

use common::utils::config::AppConfig;

use crate::retry::RetryPolicy;

/// Splits a word sequence into fixed-size chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPolicy {
    pub words_per_chunk: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self { words_per_chunk: 990 }
    }
}

impl ChunkPolicy {
    pub fn split<'a, 'w>(&self, words: &'a [&'w str]) -> Vec<&'a [&'w str]> {
        words.chunks(self.words_per_chunk.max(1)).collect()
    }
}

/// Fixed waits around transcript posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub before_chunk: Duration,
    pub before_complete: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            before_chunk: Duration::from_secs(1),
            before_complete: Duration::from_secs(2),
        }
    }
}

impl PacingPolicy {
    pub const fn none() -> Self {
        Self {
            before_chunk: Duration::ZERO,
            before_complete: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderConfig {
    pub chunking: ChunkPolicy,
    pub retry: RetryPolicy,
    pub pacing: PacingPolicy,
}

impl SenderConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            chunking: ChunkPolicy {
                words_per_chunk: config.chunk_words,
            },
            retry: RetryPolicy {
                max_attempts: config.retry_max_attempts,
                delay: Duration::from_millis(config.retry_delay_ms),
            },
            pacing: PacingPolicy {
                before_chunk: Duration::from_millis(config.chunk_delay_ms),
                before_complete: Duration::from_millis(config.complete_delay_ms),
            },
        }
    }
}
