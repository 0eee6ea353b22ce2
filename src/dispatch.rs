//! Single-threaded event dispatch for the three inbound streams

use crate::common::msg::{Heading, NavSatFix, Position};
use crate::localization::{FusionService, FusionStats};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A message from one of the inbound streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundEvent {
    Heading(Heading),
    Position(Position),
    Fix(NavSatFix),
}

/// Owns the fusion service and feeds it one event at a time
pub struct Dispatcher {
    service: FusionService,
    events: mpsc::Receiver<InboundEvent>,
}

impl Dispatcher {
    pub fn new(service: FusionService, events: mpsc::Receiver<InboundEvent>) -> Self {
        Dispatcher { service, events }
    }

    /// Handle one event to completion
    pub fn dispatch(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Heading(msg) => self.service.handle_heading(msg),
            InboundEvent::Position(msg) => self.service.handle_position(msg),
            InboundEvent::Fix(msg) => {
                // Failures are logged by the service; the stream keeps going
                if let Err(e) = self.service.handle_fix(&msg) {
                    debug!("fix cycle abandoned: {}", e);
                }
            }
        }
    }

    /// Process events until every sender is dropped
    pub async fn run(mut self) -> FusionStats {
        while let Some(event) = self.events.recv().await {
            self.dispatch(event);
        }
        let stats = self.service.stats();
        info!(
            "input closed: {} fixes, {} fused, {} dropped, {} headings, {} positions",
            stats.fixes, stats.emitted, stats.dropped, stats.headings, stats.positions
        );
        stats
    }

    pub fn service(&self) -> &FusionService {
        &self.service
    }
}
