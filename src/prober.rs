use reqwest::Client;
use tracing::debug;

use crate::models::ProbeResult;

/// Issues a single GET against the monitored endpoint.
pub struct Prober {
    client: Client,
    endpoint: String,
}

impl Prober {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Any 2xx is `Online`. Other statuses and transport failures
    /// (refused, DNS, timeout) are `Offline`. No retries.
    pub async fn probe(&self) -> ProbeResult {
        match self.client.get(&self.endpoint).send().await {
            Ok(resp) if resp.status().is_success() => ProbeResult::Online,
            Ok(resp) => {
                debug!(status = %resp.status(), endpoint = %self.endpoint, "probe returned non-2xx");
                ProbeResult::Offline
            }
            Err(e) => {
                debug!(error = %e, endpoint = %self.endpoint, "probe request failed");
                ProbeResult::Offline
            }
        }
    }
}

/// Listener that accepts connections and never answers.
#[cfg(test)]
pub(crate) async fn silent_listener() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}/health")
}
