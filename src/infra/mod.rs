//! Intake of flat records from the surrounding systems.

pub mod ingest;

pub use ingest::{
    register_fleet, register_shipments, IngestError, ShipmentRecord, TrailerRecord, TruckRecord,
};
