//! The host-facing plugin.
//!
//! The host delivers `request` events and drains outbound events from a
//! channel. Validation happens synchronously before any I/O: an unknown
//! action or source never reaches the network.

use std::sync::Arc;

use aria_core::{default_catalog, CoreError, MusicSource, Quality, ResourceKind};
use aria_resolver::{Resolver, ResolverConfig};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{PluginError, Result};
use crate::events::{combine_notices, InitedPayload, OutboundEvent, RequestEvent, UpdateAlert};

/// Outbound event channel capacity; the host drains quickly, this only
/// absorbs bursts.
const EVENT_BUFFER: usize = 16;

/// Music-source plugin.
pub struct SourcePlugin {
    resolver: Arc<Resolver>,
    events: mpsc::Sender<OutboundEvent>,
    open_dev_tools: bool,
}

impl SourcePlugin {
    /// Create a plugin and the outbound event receiver the host drains.
    pub fn new(config: ResolverConfig) -> Result<(Self, mpsc::Receiver<OutboundEvent>)> {
        let resolver = Arc::new(Resolver::new(config)?);
        let (events, receiver) = mpsc::channel(EVENT_BUFFER);
        Ok((
            Self {
                resolver,
                events,
                open_dev_tools: false,
            },
            receiver,
        ))
    }

    /// Ask the host to open its developer tools on `inited`.
    ///
    /// Off by default; desktop hosts enable this in dev builds.
    pub fn with_dev_tools(mut self, open: bool) -> Self {
        self.open_dev_tools = open;
        self
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Start the plugin.
    ///
    /// Applies remote configuration, announces the source catalogue with
    /// `inited`, runs the first ranking cycle and spawns the periodic one.
    pub async fn start(&self) -> Result<JoinHandle<()>> {
        match self.resolver.sync_remote_config().await {
            Ok(Some(version)) => {
                self.send_alert(UpdateAlert {
                    log: format!("configuration updated to version {version}"),
                    update_url: String::new(),
                })
                .await?;
            }
            Ok(None) => debug!("No remote config URL, using bundled configuration"),
            Err(e) => {
                warn!(error = %e, "Remote config failed, falling back to bundled");
                self.send_alert(UpdateAlert {
                    log: format!("remote configuration unavailable, using bundled defaults: {e}"),
                    update_url: String::new(),
                })
                .await?;
            }
        }

        self.send(OutboundEvent::Inited(InitedPayload {
            open_dev_tools: self.open_dev_tools,
            sources: default_catalog(),
        }))
        .await?;

        let notices = self.resolver.refresh_ranking().await;
        if let Some(alert) = combine_notices(&notices) {
            self.send_alert(alert).await?;
        }

        info!("Plugin initialized");

        // Periodic ranking cycle; stops when the host drops the receiver.
        let resolver = Arc::clone(&self.resolver);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(resolver.rank_interval());
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; the startup cycle
            // already ran.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let notices = resolver.refresh_ranking().await;
                if let Some(alert) = combine_notices(&notices) {
                    if events.send(OutboundEvent::UpdateAlert(alert)).await.is_err() {
                        debug!("Host closed the event channel, stopping ranking loop");
                        break;
                    }
                }
            }
        });

        Ok(handle)
    }

    /// Handle one inbound `request` event.
    ///
    /// Unknown actions and sources are rejected here, synchronously.
    pub async fn handle_request(&self, event: RequestEvent) -> Result<String> {
        let kind = ResourceKind::from_action(&event.action)?;
        let source = MusicSource::from_code(&event.source)
            .ok_or_else(|| CoreError::UnknownSource(event.source.clone()))?;
        let quality = event.info.quality.clone().unwrap_or(Quality::Q128k);

        debug!(
            source = %source,
            action = %event.action,
            song = %event.info.music_info.display_name(),
            "Handling request"
        );

        let value = self
            .resolver
            .resolve(source, &event.info.music_info, &quality, kind)
            .await?;
        Ok(value)
    }

    async fn send(&self, event: OutboundEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| PluginError::ChannelClosed)
    }

    async fn send_alert(&self, alert: UpdateAlert) -> Result<()> {
        self.send(OutboundEvent::UpdateAlert(alert)).await
    }
}
