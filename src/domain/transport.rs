//! Transports: ordered consolidations of shipments into a single route.

use serde::{Deserialize, Serialize};
use time::Date;

use super::shipment::ShipmentId;
use super::stop::StopId;

/// Identifier of a transport, generated per department (`"TOUR01-0042"`).
pub type TransportId = String;

/// Planning status of a transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportStatus {
    #[default]
    Planning,
    Handled,
}

impl TransportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransportStatus::Planning => "Planning",
            TransportStatus::Handled => "Handled",
        }
    }
}

/// An ordered consolidation of one or more shipments.
///
/// `shipments` and `stops` are kept consistent by the consolidation
/// operations: every member shipment contributes its pickup and delivery
/// stop, and the stops carry sequence numbers `1..=stops.len()`. The
/// aggregate fields are an eagerly maintained sum over the members.
///
/// Dispatch fields (`vehicle`, `driver`, `haulier`, `trailer`) use the empty
/// string for "not assigned", matching the flat records they are exchanged
/// with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub id: TransportId,
    pub department: String,
    /// Member shipment ids, in consolidation order.
    pub shipments: Vec<ShipmentId>,
    /// Route stops, ordered by sequence.
    pub stops: Vec<StopId>,
    /// Earliest pickup date over the members. Only ever widened by `add`,
    /// never recomputed on `remove`.
    pub pickup_date: Date,
    /// Latest delivery date over the members; same widening rule.
    pub delivery_date: Date,
    pub weight: f64,
    pub volume: f64,
    pub ldm: f64,
    pub cost: f64,
    pub status: TransportStatus,
    pub vehicle: String,
    pub driver: String,
    pub haulier: String,
    pub trailer: String,
    pub haulier_cost: f64,
    pub sale: bool,
    pub sale_cost: f64,
}

impl Transport {
    pub fn has_vehicle(&self) -> bool {
        !self.vehicle.is_empty()
    }

    pub fn first_stop_id(&self) -> Option<&StopId> {
        self.stops.first()
    }

    pub fn last_stop_id(&self) -> Option<&StopId> {
        self.stops.last()
    }
}
