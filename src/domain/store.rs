//! The planning store: identity maps for shipments, stops and transports,
//! plus the per-department counters that drive transport-id generation.
//!
//! The store is plain owned state passed `&mut` into every operation, so a
//! fresh one can be built per test and the borrow checker enforces the
//! exclusive access the operations need.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::PlanningError;
use super::shipment::{Shipment, ShipmentId};
use super::stop::{Leg, Stop, StopId};
use super::transport::{Transport, TransportId};

/// Fixed prefix of generated transport ids.
pub const TRANSPORT_ID_PREFIX: &str = "TOUR01";

/// Highest counter value per department; 4 digits in the id format.
pub const MAX_TRANSPORT_SEQUENCE: u32 = 9999;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanningStore {
    shipments: HashMap<ShipmentId, Shipment>,
    stops: HashMap<StopId, Stop>,
    transports: HashMap<TransportId, Transport>,
    department_counters: HashMap<String, u32>,
}

impl PlanningStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shipment(&self, id: &str) -> Option<&Shipment> {
        self.shipments.get(id)
    }

    pub fn shipment_mut(&mut self, id: &str) -> Option<&mut Shipment> {
        self.shipments.get_mut(id)
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn stop_mut(&mut self, id: &str) -> Option<&mut Stop> {
        self.stops.get_mut(id)
    }

    pub fn transport(&self, id: &str) -> Option<&Transport> {
        self.transports.get(id)
    }

    pub fn transport_mut(&mut self, id: &str) -> Option<&mut Transport> {
        self.transports.get_mut(id)
    }

    pub fn shipments(&self) -> impl Iterator<Item = &Shipment> {
        self.shipments.values()
    }

    pub fn transports(&self) -> impl Iterator<Item = &Transport> {
        self.transports.values()
    }

    /// Registers a shipment together with its two derived stops.
    ///
    /// Not idempotent: re-registering an id overwrites the previous entries.
    /// Shipment-id uniqueness is the ingestion layer's responsibility; a
    /// colliding stop id is logged and overwritten.
    pub fn register_shipment(&mut self, shipment: Shipment) {
        for leg in [Leg::Pickup, Leg::Delivery] {
            let stop = shipment.build_stop(leg);
            if self.stops.contains_key(&stop.id) {
                warn!(stop_id = %stop.id, "stop id already registered, overwriting");
            }
            self.stops.insert(stop.id.clone(), stop);
        }
        self.shipments.insert(shipment.id.clone(), shipment);
    }

    /// Registers a transport under its id; the id must be free.
    pub fn register_transport(
        &mut self,
        transport: Transport,
    ) -> Result<&Transport, PlanningError> {
        match self.transports.entry(transport.id.clone()) {
            Entry::Occupied(_) => Err(PlanningError::DuplicateTransportId {
                transport_id: transport.id,
            }),
            Entry::Vacant(slot) => Ok(slot.insert(transport)),
        }
    }

    /// Draws the next free transport id for a department. Counter values
    /// whose id is already registered are skipped, so a restored snapshot
    /// never hands out an id twice.
    pub fn next_transport_id(&mut self, department: &str) -> Result<TransportId, PlanningError> {
        let counter = self
            .department_counters
            .entry(department.to_string())
            .or_insert(0);
        loop {
            *counter += 1;
            if *counter > MAX_TRANSPORT_SEQUENCE {
                return Err(PlanningError::IdSpaceExhausted {
                    department: department.to_string(),
                });
            }
            let candidate = format!("{TRANSPORT_ID_PREFIX}-{:04}", *counter);
            if !self.transports.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_department_counter(&mut self, department: &str, value: u32) {
        self.department_counters.insert(department.to_string(), value);
    }
}
