//! The consolidation operations: `create`, `add`, `remove` and `reorder`.
//!
//! These are the only code paths that change transport membership or stop
//! order. Each operation validates its whole input before touching the
//! store, so a failure never leaves partial effects behind. Callers that
//! serve concurrent requests must serialize access to the store.

use tracing::{info, warn};

use super::error::PlanningError;
use super::shipment::ShipmentId;
use super::stop::{stop_id, Leg, StopId};
use super::store::PlanningStore;
use super::transport::{Transport, TransportStatus};

/// Consolidates a set of unassigned shipments into a new transport.
///
/// The new transport adopts the first shipment's department; a selection
/// that mixes departments is accepted with a warning, and duplicate ids
/// collapse to their first occurrence. Stops are emitted
/// pickup-then-delivery per shipment, in selection order.
pub fn create<'a>(
    store: &'a mut PlanningStore,
    shipment_ids: &[ShipmentId],
) -> Result<&'a Transport, PlanningError> {
    if shipment_ids.is_empty() {
        return Err(PlanningError::EmptySelection);
    }

    // Validate the whole selection before mutating anything.
    let mut selection: Vec<ShipmentId> = Vec::with_capacity(shipment_ids.len());
    let mut selected = Vec::with_capacity(shipment_ids.len());
    for id in shipment_ids {
        if selection.contains(id) {
            warn!(shipment_id = %id, "duplicate shipment in selection, ignoring");
            continue;
        }
        let shipment = store
            .shipment(id)
            .ok_or_else(|| PlanningError::ShipmentNotFound {
                shipment_id: id.clone(),
            })?;
        if shipment.is_assigned() {
            return Err(PlanningError::AlreadyAssigned {
                shipment_id: id.clone(),
                transport_id: shipment.transport_id.clone().unwrap_or_default(),
            });
        }
        selection.push(id.clone());
        selected.push(shipment);
    }

    let department = selected[0].department.clone();
    if selected.iter().any(|s| s.department != department) {
        warn!(department = %department, "selection mixes departments, adopting the first");
    }

    let mut pickup_date = selected[0].pickup_date;
    let mut delivery_date = selected[0].delivery_date;
    let (mut weight, mut volume, mut ldm, mut cost) = (0.0, 0.0, 0.0, 0.0);
    for shipment in &selected {
        pickup_date = pickup_date.min(shipment.pickup_date);
        delivery_date = delivery_date.max(shipment.delivery_date);
        weight += shipment.weight;
        volume += shipment.volume;
        ldm += shipment.ldm;
        cost += shipment.cost;
    }

    let transport_id = store.next_transport_id(&department)?;

    let mut stops = Vec::with_capacity(selection.len() * 2);
    let mut sequence = 1;
    for id in &selection {
        for leg in [Leg::Pickup, Leg::Delivery] {
            let sid = stop_id(id, leg);
            if let Some(stop) = store.stop_mut(&sid) {
                stop.sequence = sequence;
                stops.push(sid);
                sequence += 1;
            }
        }
    }

    for id in &selection {
        if let Some(shipment) = store.shipment_mut(id) {
            shipment.transport_id = Some(transport_id.clone());
        }
    }

    let transport = Transport {
        id: transport_id.clone(),
        department,
        shipments: selection,
        stops,
        pickup_date,
        delivery_date,
        weight,
        volume,
        ldm,
        cost,
        status: TransportStatus::Planning,
        vehicle: String::new(),
        driver: String::new(),
        haulier: String::new(),
        trailer: String::new(),
        haulier_cost: 0.0,
        sale: false,
        sale_cost: 0.0,
    };

    info!(transport_id = %transport_id, shipments = transport.shipments.len(), "created transport");
    store.register_transport(transport)
}

/// Adds shipments to an existing transport.
///
/// Unknown, already-assigned and duplicate shipments are skipped, not
/// rejected; an input that leaves nothing to add returns the transport
/// unchanged. New stops are appended at the tail and the whole route is
/// renumbered. The date window only widens, never narrows.
pub fn add<'a>(
    store: &'a mut PlanningStore,
    transport_id: &str,
    shipment_ids: &[ShipmentId],
) -> Result<&'a Transport, PlanningError> {
    let not_found = || PlanningError::TransportNotFound {
        transport_id: transport_id.to_string(),
    };
    if store.transport(transport_id).is_none() {
        return Err(not_found());
    }

    let mut pending: Vec<ShipmentId> = Vec::new();
    for id in shipment_ids {
        if pending.contains(id) {
            warn!(shipment_id = %id, "duplicate shipment in selection, skipping");
            continue;
        }
        match store.shipment(id) {
            Some(s) if !s.is_assigned() => pending.push(id.clone()),
            Some(s) => {
                warn!(shipment_id = %id, assigned_to = ?s.transport_id, "shipment already assigned, skipping")
            }
            None => warn!(shipment_id = %id, "unknown shipment, skipping"),
        }
    }
    if pending.is_empty() {
        return store.transport(transport_id).ok_or_else(not_found);
    }

    let (mut weight, mut volume, mut ldm, mut cost) = (0.0, 0.0, 0.0, 0.0);
    let mut earliest_pickup = None;
    let mut latest_delivery = None;
    let mut new_stops: Vec<StopId> = Vec::with_capacity(pending.len() * 2);
    for id in &pending {
        if let Some(shipment) = store.shipment(id) {
            weight += shipment.weight;
            volume += shipment.volume;
            ldm += shipment.ldm;
            cost += shipment.cost;
            earliest_pickup = Some(match earliest_pickup {
                Some(d) if d < shipment.pickup_date => d,
                _ => shipment.pickup_date,
            });
            latest_delivery = Some(match latest_delivery {
                Some(d) if d > shipment.delivery_date => d,
                _ => shipment.delivery_date,
            });
        }
        for leg in [Leg::Pickup, Leg::Delivery] {
            let sid = stop_id(id, leg);
            if store.stop(&sid).is_some() {
                new_stops.push(sid);
            }
        }
    }

    let transport = store.transport_mut(transport_id).ok_or_else(not_found)?;
    transport.shipments.extend(pending.iter().cloned());
    transport.weight += weight;
    transport.volume += volume;
    transport.ldm += ldm;
    transport.cost += cost;
    if let Some(date) = earliest_pickup {
        if date < transport.pickup_date {
            transport.pickup_date = date;
        }
    }
    if let Some(date) = latest_delivery {
        if date > transport.delivery_date {
            transport.delivery_date = date;
        }
    }
    transport.stops.extend(new_stops);
    let order = transport.stops.clone();
    renumber_stops(store, &order);

    for id in &pending {
        if let Some(shipment) = store.shipment_mut(id) {
            shipment.transport_id = Some(transport_id.to_string());
        }
    }

    info!(transport_id, added = pending.len(), "added shipments to transport");
    store.transport(transport_id).ok_or_else(not_found)
}

/// Removes shipments from the transport they are assigned to.
///
/// All named shipments must reference the same transport; the transport is
/// derived from them rather than passed in. Shipment ids that are not
/// currently members are skipped without error. The date window is
/// deliberately left as-is (it only ever widens on `add`).
pub fn remove<'a>(
    store: &'a mut PlanningStore,
    shipment_ids: &[ShipmentId],
) -> Result<&'a Transport, PlanningError> {
    if shipment_ids.is_empty() {
        return Err(PlanningError::EmptySelection);
    }

    // All preconditions are checked before the first mutation.
    let mut transport_id: Option<String> = None;
    for id in shipment_ids {
        let shipment = store
            .shipment(id)
            .ok_or_else(|| PlanningError::ShipmentNotFound {
                shipment_id: id.clone(),
            })?;
        let assigned = shipment
            .transport_id
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PlanningError::NotAssigned {
                shipment_id: id.clone(),
            })?;
        match &transport_id {
            None => transport_id = Some(assigned),
            Some(expected) if *expected != assigned => {
                return Err(PlanningError::CrossTransportSelection {
                    first: expected.clone(),
                    second: assigned,
                })
            }
            Some(_) => {}
        }
    }
    let transport_id = transport_id.ok_or(PlanningError::EmptySelection)?;
    let not_found = || PlanningError::TransportNotFound {
        transport_id: transport_id.clone(),
    };
    if store.transport(&transport_id).is_none() {
        return Err(not_found());
    }

    let mut removed = 0usize;
    for id in shipment_ids {
        let is_member = store
            .transport(&transport_id)
            .is_some_and(|t| t.shipments.iter().any(|s| s == id));
        if !is_member {
            continue;
        }

        let Some((weight, volume, ldm, cost)) = store
            .shipment(id)
            .map(|s| (s.weight, s.volume, s.ldm, s.cost))
        else {
            continue;
        };
        if let Some(shipment) = store.shipment_mut(id) {
            shipment.transport_id = None;
        }

        let pickup = stop_id(id, Leg::Pickup);
        let delivery = stop_id(id, Leg::Delivery);
        if let Some(transport) = store.transport_mut(&transport_id) {
            transport.shipments.retain(|s| s != id);
            transport.weight -= weight;
            transport.volume -= volume;
            transport.ldm -= ldm;
            transport.cost -= cost;
            transport.stops.retain(|s| *s != pickup && *s != delivery);
        }
        removed += 1;
    }

    let order = store
        .transport(&transport_id)
        .map(|t| t.stops.clone())
        .unwrap_or_default();
    renumber_stops(store, &order);

    if removed > 0 {
        info!(transport_id = %transport_id, removed, "removed shipments from transport");
    }
    store.transport(&transport_id).ok_or_else(not_found)
}

/// Moves one stop to a new 1-based position within its transport's route.
///
/// Implemented as pairwise sequence shifts over the affected range, which
/// yields the same order as removing the stop and reinserting it at the
/// target index. A move to the current position is a no-op.
pub fn reorder<'a>(
    store: &'a mut PlanningStore,
    transport_id: &str,
    stop: &str,
    new_sequence: u32,
) -> Result<&'a Transport, PlanningError> {
    let not_found = || PlanningError::TransportNotFound {
        transport_id: transport_id.to_string(),
    };
    let transport = store.transport(transport_id).ok_or_else(not_found)?;
    if !transport.stops.iter().any(|s| s == stop) {
        return Err(PlanningError::StopNotInTransport {
            stop_id: stop.to_string(),
            transport_id: transport_id.to_string(),
        });
    }
    let len = transport.stops.len();
    if new_sequence < 1 || new_sequence as usize > len {
        return Err(PlanningError::InvalidSequence {
            sequence: new_sequence,
            len,
        });
    }

    let route = transport.stops.clone();
    let old_sequence = store
        .stop(stop)
        .map(|s| s.sequence)
        .ok_or_else(|| PlanningError::StopNotInTransport {
            stop_id: stop.to_string(),
            transport_id: transport_id.to_string(),
        })?;
    if new_sequence == old_sequence {
        return store.transport(transport_id).ok_or_else(not_found);
    }

    for sid in &route {
        let Some(entry) = store.stop_mut(sid) else {
            continue;
        };
        if sid == stop {
            entry.sequence = new_sequence;
        } else if new_sequence > old_sequence
            && entry.sequence > old_sequence
            && entry.sequence <= new_sequence
        {
            entry.sequence -= 1;
        } else if new_sequence < old_sequence
            && entry.sequence >= new_sequence
            && entry.sequence < old_sequence
        {
            entry.sequence += 1;
        }
    }

    // Keep the stored list in route order.
    let mut ordered: Vec<(u32, StopId)> = route
        .iter()
        .filter_map(|sid| store.stop(sid).map(|s| (s.sequence, sid.clone())))
        .collect();
    ordered.sort_by_key(|(sequence, _)| *sequence);
    if let Some(transport) = store.transport_mut(transport_id) {
        transport.stops = ordered.into_iter().map(|(_, sid)| sid).collect();
    }

    info!(transport_id, stop, old_sequence, new_sequence, "reordered stop");
    store.transport(transport_id).ok_or_else(not_found)
}

/// Rewrites stop sequence numbers to `1..=N` following the given order.
fn renumber_stops(store: &mut PlanningStore, order: &[StopId]) {
    for (index, sid) in order.iter().enumerate() {
        if let Some(stop) = store.stop_mut(sid) {
            stop.sequence = (index + 1) as u32;
        }
    }
}
