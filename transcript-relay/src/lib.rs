#![allow(clippy::missing_docs_in_private_items)]

pub mod config;
pub mod conversation;
pub mod direct_line;
pub mod envelope;
pub mod error;
pub mod relay;
pub mod report;
pub mod retry;
pub mod sender;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transport;

pub use config::{ChunkPolicy, PacingPolicy, SenderConfig};
pub use conversation::{start_conversation, ConversationStart};
pub use direct_line::DirectLineClient;
pub use envelope::ActivityEnvelope;
pub use error::TransportError;
pub use relay::{relay_fragments, FragmentRelayReport, FragmentSendResult};
pub use report::ReportStatus;
pub use retry::RetryPolicy;
pub use sender::{
    estimate_watermark, ChunkIndex, ChunkSendResult, ChunkedTranscriptSender, DeliveryPhase,
    DeliveryReport,
};
pub use transport::{BotTransport, TransportResponse};
