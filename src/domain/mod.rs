//! Domain model and consolidation logic for dispatch planning.

pub mod consolidation;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod fleet;
pub mod shipment;
pub mod stop;
pub mod store;
pub mod transport;

pub use consolidation::{add, create, remove, reorder};
pub use error::{ErrorKind, PlanningError};
pub use filter::{
    filter_shipments, filter_transports, DateWindow, PostalRangeFilter, ShipmentFilter,
    TransportFilter,
};
pub use fleet::{FleetPool, Trailer, Truck};
pub use shipment::{Shipment, ShipmentId};
pub use stop::{stop_id, Leg, Stop, StopId};
pub use store::{PlanningStore, MAX_TRANSPORT_SEQUENCE, TRANSPORT_ID_PREFIX};
pub use transport::{Transport, TransportId, TransportStatus};
