//! Truck and trailer pool bookkeeping.
//!
//! The pool only tracks which vehicle is positioned where and which
//! transport it is tied to; linking a transport and a truck is done by the
//! dispatch operations, which keep both sides in sync.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::error::PlanningError;
use super::transport::TransportId;

/// A truck available for dispatch, keyed by license plate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    pub plate: String,
    pub department: String,
    pub driver: String,
    pub haulier: String,
    /// Currently coupled trailer plate, empty if none.
    pub trailer: String,
    /// Free-form position, e.g. `"DK 9300 Aalborg"`.
    pub location: String,
    /// When the truck becomes available at `location`.
    pub date: Option<Date>,
    pub time: Option<Time>,
    /// Transport this truck is currently assigned to.
    pub transport_id: Option<TransportId>,
    /// Most recently executed transport.
    pub last_transport_id: Option<TransportId>,
}

impl Truck {
    pub fn is_available(&self) -> bool {
        self.transport_id.is_none()
    }
}

/// A trailer in the pool. Open-pool trailers are shared across departments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trailer {
    pub plate: String,
    pub department: String,
    pub open_pool: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FleetPool {
    trucks: HashMap<String, Truck>,
    trailers: HashMap<String, Trailer>,
}

impl FleetPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_truck(&mut self, truck: Truck) {
        self.trucks.insert(truck.plate.clone(), truck);
    }

    pub fn add_trailer(&mut self, trailer: Trailer) {
        self.trailers.insert(trailer.plate.clone(), trailer);
    }

    pub fn truck(&self, plate: &str) -> Option<&Truck> {
        self.trucks.get(plate)
    }

    pub fn truck_mut(&mut self, plate: &str) -> Option<&mut Truck> {
        self.trucks.get_mut(plate)
    }

    pub fn trucks(&self) -> impl Iterator<Item = &Truck> {
        self.trucks.values()
    }

    pub fn trailers(&self) -> impl Iterator<Item = &Trailer> {
        self.trailers.values()
    }

    /// Trucks with no transport assigned, optionally limited to one
    /// department, sorted by plate.
    pub fn available_trucks(&self, department: Option<&str>) -> Vec<&Truck> {
        let mut trucks: Vec<&Truck> = self
            .trucks
            .values()
            .filter(|t| t.is_available())
            .filter(|t| department.map_or(true, |d| t.department == d))
            .collect();
        trucks.sort_by(|a, b| a.plate.cmp(&b.plate));
        trucks
    }

    /// Case-insensitive substring search over trailer plates.
    ///
    /// With `open_pool` set, all open-pool trailers match regardless of
    /// department; otherwise only the department's own (non-open-pool)
    /// trailers are searched.
    pub fn search_trailers(
        &self,
        term: &str,
        department: Option<&str>,
        open_pool: bool,
    ) -> Vec<&Trailer> {
        let term = term.trim().to_uppercase();
        if term.is_empty() {
            return Vec::new();
        }
        let mut matches: Vec<&Trailer> = self
            .trailers
            .values()
            .filter(|t| {
                if open_pool {
                    t.open_pool
                } else {
                    !t.open_pool && department.map_or(true, |d| t.department == d)
                }
            })
            .filter(|t| t.plate.to_uppercase().contains(&term))
            .collect();
        matches.sort_by(|a, b| a.plate.cmp(&b.plate));
        matches
    }

    /// Repositions a truck in time; used when an operator corrects the
    /// availability slot.
    pub fn update_truck_time(&mut self, plate: &str, time: Time) -> Result<(), PlanningError> {
        let truck = self
            .truck_mut(plate)
            .ok_or_else(|| PlanningError::TruckNotFound {
                plate: plate.to_string(),
            })?;
        truck.time = Some(time);
        Ok(())
    }
}
