//! Backend client over reqwest.

use std::time::Duration;

use tracing::debug;
use url::Url;

use elements_codec::FramePayload;

use crate::error::TransportError;
use crate::protocol::{FrameRequest, ProcessedFrameResult};
use crate::{FrameProcessor, TransportResult};

/// Connect timeout for the underlying HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request timeout for reset requests.
///
/// Frame round trips deliberately carry no timeout; the loop awaits them
/// for as long as the server takes.
const RESET_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the frame-processing backend.
#[derive(Debug, Clone)]
pub struct GameClient {
    http: reqwest::Client,
    process_url: Url,
    reset_url: Url,
}

impl GameClient {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str) -> TransportResult<Self> {
        let base = Url::parse(base_url).map_err(|e| TransportError::Url(e.to_string()))?;
        let process_url = base
            .join("/process_frame")
            .map_err(|e| TransportError::Url(e.to_string()))?;
        let reset_url = base
            .join("/reset_game")
            .map_err(|e| TransportError::Url(e.to_string()))?;

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            process_url,
            reset_url,
        })
    }
}

impl FrameProcessor for GameClient {
    async fn process_frame(
        &self,
        payload: &FramePayload,
    ) -> TransportResult<ProcessedFrameResult> {
        let request = FrameRequest {
            frame: &payload.data_url,
        };

        let response = self
            .http
            .post(self.process_url.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let result: ProcessedFrameResult =
            serde_json::from_str(&body).map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(
            success = result.success,
            sounds = result.sound_events.len(),
            "Frame processed"
        );
        Ok(result)
    }

    async fn reset_game(&self) -> TransportResult<()> {
        let response = self
            .http
            .post(self.reset_url.clone())
            .timeout(RESET_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(())
    }
}
