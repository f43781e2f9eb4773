//! Dispatch operations: sale marking, vehicle assignment and execution.
//!
//! These mutate a transport's dispatch fields and the fleet pool together,
//! keeping the transport/truck link consistent from both sides. Membership
//! and stop order are never touched here; that is the consolidation
//! module's job.

use time::{Date, Time};
use tracing::info;

use super::consolidation;
use super::error::PlanningError;
use super::fleet::FleetPool;
use super::shipment::ShipmentId;
use super::store::PlanningStore;
use super::transport::{Transport, TransportStatus};

/// Flags a transport as sold to a subcontractor at the given price.
pub fn mark_for_sale<'a>(
    store: &'a mut PlanningStore,
    transport_id: &str,
    sale_cost: f64,
) -> Result<&'a Transport, PlanningError> {
    let transport =
        store
            .transport_mut(transport_id)
            .ok_or_else(|| PlanningError::TransportNotFound {
                transport_id: transport_id.to_string(),
            })?;
    transport.sale = true;
    transport.sale_cost = sale_cost;
    info!(transport_id, sale_cost, "transport marked for sale");
    Ok(transport)
}

/// Consolidates unassigned shipments into a fresh transport and immediately
/// marks it for sale.
pub fn sell_shipments<'a>(
    store: &'a mut PlanningStore,
    shipment_ids: &[ShipmentId],
    sale_cost: f64,
) -> Result<&'a Transport, PlanningError> {
    let transport_id = consolidation::create(store, shipment_ids)?.id.clone();
    mark_for_sale(store, &transport_id, sale_cost)
}

/// Assigns a truck to a transport, copying plate, driver and haulier onto
/// the transport. A trailer already chosen on the transport wins over the
/// truck's coupled trailer and is written back to the truck.
pub fn assign_vehicle(
    store: &mut PlanningStore,
    fleet: &mut FleetPool,
    transport_id: &str,
    plate: &str,
) -> Result<(), PlanningError> {
    let transport =
        store
            .transport_mut(transport_id)
            .ok_or_else(|| PlanningError::TransportNotFound {
                transport_id: transport_id.to_string(),
            })?;
    if transport.has_vehicle() {
        return Err(PlanningError::VehicleAlreadyAssigned {
            transport_id: transport_id.to_string(),
        });
    }
    let truck = fleet
        .truck_mut(plate)
        .ok_or_else(|| PlanningError::TruckNotFound {
            plate: plate.to_string(),
        })?;

    transport.vehicle = truck.plate.clone();
    transport.driver = truck.driver.clone();
    transport.haulier = truck.haulier.clone();
    if transport.trailer.is_empty() {
        transport.trailer = truck.trailer.clone();
    } else {
        truck.trailer = transport.trailer.clone();
    }
    truck.transport_id = Some(transport_id.to_string());

    info!(transport_id, plate, "vehicle assigned");
    Ok(())
}

/// Detaches the assigned truck from a transport and clears the dispatch
/// fields. The truck keeps its coupled trailer.
pub fn unassign_vehicle(
    store: &mut PlanningStore,
    fleet: &mut FleetPool,
    transport_id: &str,
) -> Result<(), PlanningError> {
    let transport =
        store
            .transport_mut(transport_id)
            .ok_or_else(|| PlanningError::TransportNotFound {
                transport_id: transport_id.to_string(),
            })?;
    if !transport.has_vehicle() {
        return Err(PlanningError::NoVehicleAssigned {
            transport_id: transport_id.to_string(),
        });
    }

    let plate = std::mem::take(&mut transport.vehicle);
    transport.driver.clear();
    transport.haulier.clear();
    transport.trailer.clear();
    if let Some(truck) = fleet.truck_mut(&plate) {
        truck.transport_id = None;
    }

    info!(transport_id, plate = %plate, "vehicle unassigned");
    Ok(())
}

/// Marks a transport as executed: status moves to `Handled`, and its truck
/// is released and repositioned at the given date and time with the
/// transport remembered as its last tour.
pub fn execute_transport(
    store: &mut PlanningStore,
    fleet: &mut FleetPool,
    transport_id: &str,
    date: Date,
    time: Time,
) -> Result<(), PlanningError> {
    let transport =
        store
            .transport_mut(transport_id)
            .ok_or_else(|| PlanningError::TransportNotFound {
                transport_id: transport_id.to_string(),
            })?;
    if !transport.has_vehicle() {
        return Err(PlanningError::NoVehicleAssigned {
            transport_id: transport_id.to_string(),
        });
    }

    transport.status = TransportStatus::Handled;
    let plate = transport.vehicle.clone();
    if let Some(truck) = fleet.truck_mut(&plate) {
        truck.last_transport_id = truck.transport_id.take();
        truck.date = Some(date);
        truck.time = Some(time);
    }

    info!(transport_id, plate = %plate, "transport executed");
    Ok(())
}

/// Swaps the trailer on a transport; the linked truck, if any, follows.
pub fn update_transport_trailer(
    store: &mut PlanningStore,
    fleet: &mut FleetPool,
    transport_id: &str,
    trailer: &str,
) -> Result<(), PlanningError> {
    let transport =
        store
            .transport_mut(transport_id)
            .ok_or_else(|| PlanningError::TransportNotFound {
                transport_id: transport_id.to_string(),
            })?;
    transport.trailer = trailer.to_string();
    if transport.has_vehicle() {
        let plate = transport.vehicle.clone();
        if let Some(truck) = fleet.truck_mut(&plate) {
            truck.trailer = trailer.to_string();
        }
    }
    Ok(())
}

/// Swaps the trailer on a truck; the linked transport, if any, follows.
pub fn update_truck_trailer(
    store: &mut PlanningStore,
    fleet: &mut FleetPool,
    plate: &str,
    trailer: &str,
) -> Result<(), PlanningError> {
    let truck = fleet
        .truck_mut(plate)
        .ok_or_else(|| PlanningError::TruckNotFound {
            plate: plate.to_string(),
        })?;
    truck.trailer = trailer.to_string();
    if let Some(transport_id) = truck.transport_id.clone() {
        if let Some(transport) = store.transport_mut(&transport_id) {
            transport.trailer = trailer.to_string();
        }
    }
    Ok(())
}

/// Rewrites the departure time shown for a transport, i.e. the time of its
/// first stop. A transport without stops is left alone.
pub fn update_departure_time(
    store: &mut PlanningStore,
    transport_id: &str,
    time: Time,
) -> Result<(), PlanningError> {
    let first_stop = store
        .transport(transport_id)
        .ok_or_else(|| PlanningError::TransportNotFound {
            transport_id: transport_id.to_string(),
        })?
        .first_stop_id()
        .cloned();
    if let Some(stop_id) = first_stop {
        if let Some(stop) = store.stop_mut(&stop_id) {
            stop.time = Some(time);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fleet::Truck;
    use crate::domain::shipment::Shipment;
    use time::macros::{date, time};

    fn make_shipment(id: &str) -> Shipment {
        Shipment {
            id: id.into(),
            transport_id: None,
            department: "KDEGR".into(),
            pickup_date: date!(2024 - 03 - 11),
            pickup_time: Some(time!(08:00)),
            delivery_date: date!(2024 - 03 - 13),
            delivery_time: None,
            collection_name: String::new(),
            collection_city: "Antwerp".into(),
            collection_address: String::new(),
            collection_postal_code: 2030,
            collection_country: "BE".into(),
            delivery_name: String::new(),
            delivery_city: "Aalborg".into(),
            delivery_address: String::new(),
            delivery_postal_code: 9000,
            delivery_country: "DK".into(),
            weight: 100.0,
            volume: 1.0,
            ldm: 0.5,
            content: String::new(),
            units: 1,
            unit_type: "Pallet".into(),
            hazardous: false,
            cost: 50.0,
            finance_department: String::new(),
            incoterm: String::new(),
            customer: String::new(),
            loading_instructions: String::new(),
            customer_reference: String::new(),
            additional_information: String::new(),
            services: vec![],
        }
    }

    fn make_truck(plate: &str) -> Truck {
        Truck {
            plate: plate.into(),
            department: "KDEGR".into(),
            driver: "J. Jensen".into(),
            haulier: "Nordtrans".into(),
            trailer: "TR-100".into(),
            location: "DK 9300 Saeby".into(),
            date: None,
            time: Some(time!(06:30)),
            transport_id: None,
            last_transport_id: None,
        }
    }

    fn setup() -> (PlanningStore, FleetPool, String) {
        let mut store = PlanningStore::new();
        store.register_shipment(make_shipment("S1"));
        let id = consolidation::create(&mut store, &["S1".to_string()])
            .unwrap()
            .id
            .clone();
        let mut fleet = FleetPool::new();
        fleet.add_truck(make_truck("AB-12-345"));
        (store, fleet, id)
    }

    #[test]
    fn assign_copies_truck_details_onto_the_transport() {
        let (mut store, mut fleet, id) = setup();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();

        let transport = store.transport(&id).unwrap();
        assert_eq!(transport.vehicle, "AB-12-345");
        assert_eq!(transport.driver, "J. Jensen");
        assert_eq!(transport.haulier, "Nordtrans");
        assert_eq!(transport.trailer, "TR-100");
        assert_eq!(
            fleet.truck("AB-12-345").unwrap().transport_id.as_deref(),
            Some(id.as_str())
        );
    }

    #[test]
    fn transport_trailer_wins_over_truck_trailer() {
        let (mut store, mut fleet, id) = setup();
        store.transport_mut(&id).unwrap().trailer = "TR-900".into();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();

        assert_eq!(store.transport(&id).unwrap().trailer, "TR-900");
        assert_eq!(fleet.truck("AB-12-345").unwrap().trailer, "TR-900");
    }

    #[test]
    fn double_assignment_is_rejected() {
        let (mut store, mut fleet, id) = setup();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();
        let err = assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap_err();
        assert_eq!(
            err,
            PlanningError::VehicleAlreadyAssigned { transport_id: id }
        );
    }

    #[test]
    fn unassign_clears_both_sides() {
        let (mut store, mut fleet, id) = setup();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();
        unassign_vehicle(&mut store, &mut fleet, &id).unwrap();

        let transport = store.transport(&id).unwrap();
        assert!(!transport.has_vehicle());
        assert!(transport.driver.is_empty());
        assert!(transport.trailer.is_empty());
        assert!(fleet.truck("AB-12-345").unwrap().transport_id.is_none());
        // The truck keeps its coupled trailer.
        assert_eq!(fleet.truck("AB-12-345").unwrap().trailer, "TR-100");
    }

    #[test]
    fn execute_releases_and_repositions_the_truck() {
        let (mut store, mut fleet, id) = setup();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();
        execute_transport(
            &mut store,
            &mut fleet,
            &id,
            date!(2024 - 03 - 14),
            time!(16:00),
        )
        .unwrap();

        assert_eq!(
            store.transport(&id).unwrap().status,
            TransportStatus::Handled
        );
        let truck = fleet.truck("AB-12-345").unwrap();
        assert!(truck.transport_id.is_none());
        assert_eq!(truck.last_transport_id.as_deref(), Some(id.as_str()));
        assert_eq!(truck.date, Some(date!(2024 - 03 - 14)));
        assert_eq!(truck.time, Some(time!(16:00)));
    }

    #[test]
    fn execute_without_vehicle_is_rejected() {
        let (mut store, mut fleet, id) = setup();
        let err = execute_transport(
            &mut store,
            &mut fleet,
            &id,
            date!(2024 - 03 - 14),
            time!(16:00),
        )
        .unwrap_err();
        assert_eq!(err, PlanningError::NoVehicleAssigned { transport_id: id });
    }

    #[test]
    fn trailer_updates_propagate_both_ways() {
        let (mut store, mut fleet, id) = setup();
        assign_vehicle(&mut store, &mut fleet, &id, "AB-12-345").unwrap();

        update_transport_trailer(&mut store, &mut fleet, &id, "TR-500").unwrap();
        assert_eq!(fleet.truck("AB-12-345").unwrap().trailer, "TR-500");

        update_truck_trailer(&mut store, &mut fleet, "AB-12-345", "TR-600").unwrap();
        assert_eq!(store.transport(&id).unwrap().trailer, "TR-600");
    }

    #[test]
    fn sell_shipments_creates_a_sold_transport() {
        let mut store = PlanningStore::new();
        store.register_shipment(make_shipment("S1"));
        let transport = sell_shipments(&mut store, &["S1".to_string()], 1250.0).unwrap();
        assert!(transport.sale);
        assert_eq!(transport.sale_cost, 1250.0);
        assert_eq!(transport.shipments, vec!["S1"]);
    }

    #[test]
    fn departure_time_is_written_to_the_first_stop() {
        let (mut store, _, id) = setup();
        update_departure_time(&mut store, &id, time!(05:45)).unwrap();
        assert_eq!(store.stop("S1_P").unwrap().time, Some(time!(05:45)));
        assert_eq!(store.stop("S1_D").unwrap().time, None);
    }
}
