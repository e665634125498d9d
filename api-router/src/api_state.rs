use std::{path::PathBuf, sync::Arc};

use common::{error::AppError, utils::config::AppConfig};
use document_pipeline::TableRowMap;
use transcript_relay::{BotTransport, DirectLineClient, SenderConfig};

#[derive(Clone)]
pub struct ApiState {
    pub config: AppConfig,
    pub row_map: Arc<TableRowMap>,
    pub transport: Arc<dyn BotTransport>,
    pub sender: SenderConfig,
}

impl ApiState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let transport = Arc::new(DirectLineClient::from_config(config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: &AppConfig, transport: Arc<dyn BotTransport>) -> Self {
        Self {
            config: config.clone(),
            row_map: Arc::new(TableRowMap::questionnaire()),
            transport,
            sender: SenderConfig::from_app_config(config),
        }
    }

    pub fn reply_store_path(&self) -> PathBuf {
        PathBuf::from(&self.config.reply_store_path)
    }
}
