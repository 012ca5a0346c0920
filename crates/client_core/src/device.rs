use reqwest::{Client, StatusCode};
use shared::{
    domain::{Device, SensorReading},
    error::ApiError,
    protocol::ControlResponse,
};
use tracing::{debug, info, warn};

use crate::{
    error::{ListError, ListResult},
    resource::SENSOR_DATA_PATH,
};

pub const LEDS_PATH: &str = "/api/leds";

/// Reads and switches actuators under `/api/leds`, and reads the newest
/// sensor reading for the status panel.
pub struct DeviceControlClient {
    http: Client,
    server_url: String,
}

impl DeviceControlClient {
    pub fn new(http: Client, server_url: impl Into<String>) -> Self {
        Self {
            http,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Last known state of `device`; `None` when the backend has never seen
    /// it reported (404).
    pub async fn state(&self, device: Device) -> ListResult<Option<bool>> {
        let url = format!("{}{LEDS_PATH}/{}/state", self.server_url, device.number());
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(device = device.number(), "no state recorded for device");
            return Ok(None);
        }
        if !status.is_success() {
            let detail = ApiError::from_body(&body).map(|err| err.error);
            warn!(device = device.number(), status = status.as_u16(), "device state lookup failed");
            return Err(ListError::fetch(status, detail));
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Newest row of `/api/sensor-data/recent`, which lists readings newest
    /// first.
    pub async fn latest_reading(&self) -> ListResult<Option<SensorReading>> {
        let url = format!("{}{SENSOR_DATA_PATH}/recent", self.server_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = ApiError::from_body(&body).map(|err| err.error);
            warn!(status = status.as_u16(), "recent sensor data lookup failed");
            return Err(ListError::fetch(status, detail));
        }
        let readings: Vec<SensorReading> = serde_json::from_slice(&body)?;
        Ok(readings.into_iter().next())
    }

    pub async fn set_state(&self, device: Device, on: bool) -> ListResult<ControlResponse> {
        let url = format!("{}{LEDS_PATH}/{}/control", self.server_url, device.number());
        let response = self
            .http
            .post(&url)
            .query(&[("state", on)])
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = ApiError::from_body(&body).map(|err| err.error);
            warn!(device = device.number(), status = status.as_u16(), "device command rejected");
            return Err(ListError::fetch(status, detail));
        }

        let reply: ControlResponse = serde_json::from_slice(&body)?;
        if !reply.success {
            return Err(ListError::Fetch {
                status: status.as_u16(),
                status_text: "Command refused".to_string(),
                detail: reply.message,
            });
        }
        info!(device = device.number(), state = on, "device command accepted");
        Ok(reply)
    }
}

#[cfg(test)]
#[path = "tests/device_tests.rs"]
mod tests;
