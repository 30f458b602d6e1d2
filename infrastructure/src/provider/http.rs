//! HTTP room provider adapter.
//!
//! Talks to a room-hosting service that creates named rooms on demand. The
//! contract is create-or-fetch: a "room already exists" response (HTTP 409)
//! is success, and the room's URL is derived deterministically from its
//! name, which makes creation idempotent under retry or duplicate calls.
//! Every other failure is surfaced unmodified as
//! [`ProviderError::Unavailable`]; this adapter never retries.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use convene_application::{ProviderError, RoomProvider};
use convene_domain::{RoomDescriptor, RoomStatus, RoomType};

/// Request timeout on the shared client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default lifetime of provider-created rooms.
const DEFAULT_ROOM_EXPIRY: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Serialize)]
struct CreateRoomRequest<'a> {
    name: &'a str,
    privacy: &'static str,
    properties: RoomProperties,
}

#[derive(Serialize)]
struct RoomProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_participants: Option<u32>,
    /// Absolute unix timestamp the room expires at.
    exp: i64,
}

#[derive(Deserialize)]
struct CreateRoomResponse {
    name: String,
    url: String,
}

/// Adapter over an HTTP room-hosting API.
pub struct HttpRoomProvider {
    client: reqwest::Client,
    api_base: String,
    room_base: String,
    api_token: String,
    room_expiry: Duration,
}

impl HttpRoomProvider {
    /// `api_base` is the management API (`POST {api_base}/rooms`);
    /// `room_base` is the domain join URLs hang off of, used when the
    /// service reports a room as already existing.
    pub fn new(
        api_base: impl Into<String>,
        room_base: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::unavailable(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            room_base: room_base.into(),
            api_token: api_token.into(),
            room_expiry: DEFAULT_ROOM_EXPIRY,
        })
    }

    pub fn with_room_expiry(mut self, expiry: Duration) -> Self {
        self.room_expiry = expiry;
        self
    }

    fn derived_url(&self, name: &str) -> String {
        format!("{}/{}", self.room_base.trim_end_matches('/'), name)
    }

    fn descriptor(&self, name: &str, url: String, room_type: RoomType) -> RoomDescriptor {
        RoomDescriptor {
            id: name.into(),
            name: name.to_string(),
            url,
            room_type,
            max_participants: room_type.capacity().map(|c| c as u32),
            status: RoomStatus::Available,
        }
    }
}

#[async_trait]
impl RoomProvider for HttpRoomProvider {
    async fn create_room(
        &self,
        name: &str,
        room_type: RoomType,
    ) -> Result<RoomDescriptor, ProviderError> {
        let expires_at = chrono::Utc::now() + chrono::Duration::from_std(self.room_expiry)
            .unwrap_or_else(|_| chrono::Duration::hours(2));

        let request = CreateRoomRequest {
            name,
            privacy: "private",
            properties: RoomProperties {
                max_participants: room_type.capacity().map(|c| c as u32),
                exp: expires_at.timestamp(),
            },
        };

        let response = self
            .client
            .post(format!("{}/rooms", self.api_base.trim_end_matches('/')))
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(format!("create room {}: {}", name, e)))?;

        let status = response.status();

        if status == StatusCode::CONFLICT {
            // The room already exists; that is success. Its URL is a pure
            // function of the name, so nothing needs fetching.
            info!(room = name, "room already exists, reusing");
            return Ok(self.descriptor(name, self.derived_url(name), room_type));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::unavailable(format!(
                "create room {}: HTTP {} {}",
                name,
                status.as_u16(),
                body
            )));
        }

        let created: CreateRoomResponse = response.json().await.map_err(|e| {
            ProviderError::unavailable(format!("create room {}: invalid response: {}", name, e))
        })?;

        debug!(room = %created.name, url = %created.url, "room created");
        Ok(self.descriptor(&created.name, created.url, room_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_url_is_deterministic() {
        let provider =
            HttpRoomProvider::new("https://api.rooms.example/v1", "https://rooms.example/", "tok")
                .unwrap();
        assert_eq!(
            provider.derived_url("abcd-kiva-1"),
            "https://rooms.example/abcd-kiva-1"
        );
        assert_eq!(
            provider.derived_url("abcd-kiva-1"),
            provider.derived_url("abcd-kiva-1")
        );
    }

    #[test]
    fn test_request_shape() {
        let request = CreateRoomRequest {
            name: "abcd-dyad-1",
            privacy: "private",
            properties: RoomProperties {
                max_participants: Some(2),
                exp: 1_700_000_000,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "abcd-dyad-1");
        assert_eq!(json["properties"]["max_participants"], 2);
        assert_eq!(json["properties"]["exp"], 1_700_000_000);
    }

    #[test]
    fn test_main_room_request_has_no_cap() {
        let request = CreateRoomRequest {
            name: "abcd-main",
            privacy: "private",
            properties: RoomProperties {
                max_participants: RoomType::Main.capacity().map(|c| c as u32),
                exp: 1_700_000_000,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["properties"].get("max_participants").is_none());
    }

    #[test]
    fn test_response_parse() {
        let parsed: CreateRoomResponse = serde_json::from_str(
            r#"{"name":"abcd-triad-2","url":"https://rooms.example/abcd-triad-2","id":"xyz"}"#,
        )
        .unwrap();
        assert_eq!(parsed.name, "abcd-triad-2");
        assert_eq!(parsed.url, "https://rooms.example/abcd-triad-2");
    }
}
