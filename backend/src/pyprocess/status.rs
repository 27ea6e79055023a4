use shared::{ConnectionState, ServerStatus};

use super::client::RelayClient;

pub const UNAVAILABLE_MESSAGE: &str = "Python server is not available";

/// Reports whether the external processor answers its health endpoint.
#[derive(Clone)]
pub struct StatusProber {
    relay: RelayClient,
}

impl StatusProber {
    pub fn new(relay: RelayClient) -> Self {
        Self { relay }
    }

    /// Never fails; an unreachable processor is a `disconnected` reading.
    pub async fn probe(&self) -> ServerStatus {
        let reachable = self.relay.health_check().await;
        ServerStatus {
            status: if reachable {
                ConnectionState::Connected
            } else {
                ConnectionState::Disconnected
            },
            python_server_url: self.relay.base_url().to_string(),
            timestamp: crate::timestamp(),
            message: (!reachable).then(|| UNAVAILABLE_MESSAGE.to_string()),
        }
    }
}
