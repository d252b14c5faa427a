use std::sync::Arc;

use reply_source::{ReplySource, SourceInitError};
use reply_source_remote::{RemoteReplySource, RemoteReplySourceConfig, REMOTE_SOURCE_ID};
use reply_source_simulated::{SimulatedReplySource, SIMULATED_SOURCE_ID};

use crate::config::{ClientConfig, ENDPOINT_ENV_VAR};

/// Builds the reply source named by `config.source_id`.
pub fn source_from_config(config: &ClientConfig) -> Result<Arc<dyn ReplySource>, SourceInitError> {
    match config.source_id.as_str() {
        SIMULATED_SOURCE_ID => Ok(Arc::new(SimulatedReplySource::new())),
        REMOTE_SOURCE_ID => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                SourceInitError::new(format!(
                    "Reply source '{REMOTE_SOURCE_ID}' requires {ENDPOINT_ENV_VAR}"
                ))
            })?;

            let mut remote = RemoteReplySourceConfig::new(endpoint);
            if let Some(timeout) = config.timeout {
                remote = remote.with_timeout(timeout);
            }

            Ok(Arc::new(RemoteReplySource::new(remote)?))
        }
        unknown => Err(SourceInitError::new(format!(
            "Unsupported reply source '{unknown}'. Available sources: {SIMULATED_SOURCE_ID}, {REMOTE_SOURCE_ID}"
        ))),
    }
}
