//! Error taxonomy for the consolidation core.

use thiserror::Error;

/// Broad classification of a [`PlanningError`], used by hosting layers to
/// map failures onto user-facing messages and status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// A referenced shipment, stop, transport or truck does not exist.
    NotFound,
    /// The operation would violate a uniqueness or single-ownership rule.
    Conflict,
    /// The transport-id space for a department is used up.
    Exhaustion,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum PlanningError {
    #[error("leg code must be 'P' or 'D', got '{code}'")]
    InvalidLegCode { code: String },

    #[error("no shipments selected")]
    EmptySelection,

    #[error("invalid sequence number {sequence}, must be between 1 and {len}")]
    InvalidSequence { sequence: u32, len: usize },

    #[error("shipment '{shipment_id}' not found")]
    ShipmentNotFound { shipment_id: String },

    #[error("transport '{transport_id}' not found")]
    TransportNotFound { transport_id: String },

    #[error("stop '{stop_id}' is not part of transport '{transport_id}'")]
    StopNotInTransport {
        stop_id: String,
        transport_id: String,
    },

    #[error("truck '{plate}' not found")]
    TruckNotFound { plate: String },

    #[error("shipment '{shipment_id}' is already tied to transport '{transport_id}'")]
    AlreadyAssigned {
        shipment_id: String,
        transport_id: String,
    },

    #[error("shipment '{shipment_id}' is not assigned to any transport")]
    NotAssigned { shipment_id: String },

    #[error("all shipments must belong to the same transport, found '{first}' and '{second}'")]
    CrossTransportSelection { first: String, second: String },

    #[error("transport '{transport_id}' already exists")]
    DuplicateTransportId { transport_id: String },

    #[error("transport '{transport_id}' already has a vehicle assigned")]
    VehicleAlreadyAssigned { transport_id: String },

    #[error("transport '{transport_id}' has no vehicle assigned")]
    NoVehicleAssigned { transport_id: String },

    #[error("exceeded maximum sequential transport ids for department '{department}'")]
    IdSpaceExhausted { department: String },
}

impl PlanningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLegCode { .. }
            | Self::EmptySelection
            | Self::InvalidSequence { .. } => ErrorKind::Validation,
            Self::ShipmentNotFound { .. }
            | Self::TransportNotFound { .. }
            | Self::StopNotInTransport { .. }
            | Self::TruckNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyAssigned { .. }
            | Self::NotAssigned { .. }
            | Self::CrossTransportSelection { .. }
            | Self::DuplicateTransportId { .. }
            | Self::VehicleAlreadyAssigned { .. }
            | Self::NoVehicleAssigned { .. } => ErrorKind::Conflict,
            Self::IdSpaceExhausted { .. } => ErrorKind::Exhaustion,
        }
    }
}
