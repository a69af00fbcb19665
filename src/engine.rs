use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use crate::alarm::transition;
use crate::config::MonitorConfig;
use crate::models::{AlarmState, NotificationEvent, ProbeResult, TickReport};
use crate::notifier::Notifier;
use crate::prober::Prober;

pub struct Monitor {
    pub config: MonitorConfig,
    prober: Prober,
    notifier: Notifier,
    state: AlarmState,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .user_agent(concat!("uptime-alarm/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            prober: Prober::new(http_client.clone(), config.check_endpoint.clone()),
            notifier: Notifier::new(http_client, &config),
            config,
            state: AlarmState::default(),
        })
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// One probe, one possible transition, one possible mail.
    ///
    /// The new state is committed before the mail is attempted; a failed
    /// delivery is logged and dropped.
    pub async fn tick(&mut self) -> TickReport {
        let timestamp = Utc::now();
        let probe = self.prober.probe().await;

        match probe {
            ProbeResult::Online => info!(endpoint = %self.prober.endpoint(), "OK"),
            ProbeResult::Offline => warn!(endpoint = %self.prober.endpoint(), "DOWN"),
        }

        let (next, event) = transition(self.state, probe);
        self.state = next;

        let delivered = match event {
            Some(event) => Some(self.dispatch(event).await),
            None => None,
        };

        TickReport {
            timestamp,
            probe,
            state: self.state,
            event,
            delivered,
        }
    }

    async fn dispatch(&self, event: NotificationEvent) -> bool {
        let msg = format!("[CHANGE] {} -> {:?}", self.prober.endpoint(), self.state);
        match event {
            NotificationEvent::EnteredAlarm => error!("{}", msg),
            NotificationEvent::ExitedAlarm => warn!("{}", msg),
        }

        match self.notifier.notify(event).await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, ?event, "sending email failed");
                false
            }
        }
    }

    pub async fn run(mut self) {
        info!(
            endpoint = %self.config.check_endpoint,
            heartbeat_s = self.config.heartbeat_s,
            timeout_s = self.config.http_timeout_s,
            "Uptime monitor active"
        );

        loop {
            let report = self.tick().await;
            debug!(
                at = %report.timestamp,
                probe = ?report.probe,
                state = ?report.state,
                event = ?report.event,
                delivered = ?report.delivered,
                "tick complete"
            );
            tokio::time::sleep(self.config.heartbeat()).await;
        }
    }
}
