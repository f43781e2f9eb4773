//! Stops: the pickup and delivery legs a shipment contributes to a route.

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::error::PlanningError;
use super::shipment::ShipmentId;

/// Identifier of a stop, `"{shipment_id}_{leg code}"` (e.g. `"S100_P"`).
pub type StopId = String;

/// Leg classification of a stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    Pickup,
    Delivery,
}

impl Leg {
    /// Single-character wire code used in stop identifiers.
    pub fn code(&self) -> char {
        match self {
            Leg::Pickup => 'P',
            Leg::Delivery => 'D',
        }
    }

    pub fn from_code(code: &str) -> Result<Self, PlanningError> {
        match code {
            "P" => Ok(Leg::Pickup),
            "D" => Ok(Leg::Delivery),
            other => Err(PlanningError::InvalidLegCode {
                code: other.to_string(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Leg::Pickup => "Pickup",
            Leg::Delivery => "Delivery",
        }
    }
}

/// Builds the stop identifier for one leg of a shipment.
pub fn stop_id(shipment_id: &str, leg: Leg) -> StopId {
    format!("{}_{}", shipment_id, leg.code())
}

/// One leg of a shipment's journey, positioned within a transport's route.
///
/// A stop snapshots its shipment's attributes once, at shipment construction
/// time. Later edits to the shipment are deliberately not reflected here, so
/// route views stay stable while bookings are corrected. `sequence` is only
/// meaningful while the shipment is assigned to a transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub shipment_id: ShipmentId,
    pub leg: Leg,
    /// 1-based position within the owning transport's route.
    pub sequence: u32,
    // Physical attributes copied from the shipment.
    pub weight: f64,
    pub volume: f64,
    pub ldm: f64,
    pub content: String,
    pub units: u32,
    pub unit_type: String,
    pub hazardous: bool,
    pub additional_information: String,
    pub services: Vec<String>,
    // Leg-specific details: collection side for pickups, delivery side
    // for deliveries.
    pub date: Date,
    pub time: Option<Time>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: u32,
    pub country: String,
    pub instructions: String,
}
