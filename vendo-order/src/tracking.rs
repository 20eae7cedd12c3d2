use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A single shipment tracking entry for an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub order_id: Uuid,
    pub status: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Delivery estimate derived from the latest tracking status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEstimate {
    NoInformation,
    AlreadyDelivered,
    Date(NaiveDate),
}

/// In-memory shipment tracking log, keyed by order id.
#[derive(Default)]
pub struct OrderTracker {
    events: Mutex<HashMap<Uuid, Vec<TrackingEvent>>>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(
        &self,
        order_id: Uuid,
        status: &str,
        location: Option<String>,
        description: Option<String>,
    ) {
        if status.trim().is_empty() {
            warn!("Cannot add tracking event without a status for order {}", order_id);
            return;
        }

        let event = TrackingEvent {
            order_id,
            status: status.to_string(),
            location,
            description,
            timestamp: Utc::now(),
        };
        self.events.lock().entry(order_id).or_default().push(event);
        info!("Tracking event added for order {}: status={}", order_id, status);
    }

    pub fn history(&self, order_id: Uuid) -> Vec<TrackingEvent> {
        match self.events.lock().get(&order_id) {
            Some(events) => events.clone(),
            None => {
                debug!("No tracking history found for order {}", order_id);
                Vec::new()
            }
        }
    }

    pub fn latest(&self, order_id: Uuid) -> Option<TrackingEvent> {
        self.events
            .lock()
            .get(&order_id)
            .and_then(|events| events.last().cloned())
    }

    /// Rough delivery estimate based on the latest status.
    pub fn estimated_delivery(&self, order_id: Uuid) -> DeliveryEstimate {
        let latest = match self.latest(order_id) {
            Some(latest) => latest,
            None => return DeliveryEstimate::NoInformation,
        };

        let days_out = match latest.status.to_uppercase().as_str() {
            "ORDER_PLACED" => 7,
            "PROCESSING" => 5,
            "SHIPPED" => 3,
            "IN_TRANSIT" => 2,
            "OUT_FOR_DELIVERY" => 0,
            "DELIVERED" => return DeliveryEstimate::AlreadyDelivered,
            _ => 7,
        };

        let estimated = (Utc::now() + Duration::days(days_out)).date_naive();
        debug!(
            "Estimated delivery for order {}: {} (status: {})",
            order_id, estimated, latest.status
        );
        DeliveryEstimate::Date(estimated)
    }
}
