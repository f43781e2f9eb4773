//! Shipments: single freight bookings between a collection and delivery party.

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use super::stop::{stop_id, Leg, Stop, StopId};
use super::transport::TransportId;

/// Identifier of a shipment, assigned externally at ingestion time.
pub type ShipmentId = String;

/// A single freight booking. Owns exactly one pickup and one delivery stop,
/// both derived once at construction (see [`Shipment::build_stop`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    /// Back-reference to the consolidating transport, `None` while
    /// unassigned. Kept as a plain identifier, never an object reference.
    pub transport_id: Option<TransportId>,
    pub department: String,
    // Pickup and delivery windows.
    pub pickup_date: Date,
    pub pickup_time: Option<Time>,
    pub delivery_date: Date,
    pub delivery_time: Option<Time>,
    // Collection party.
    pub collection_name: String,
    pub collection_city: String,
    pub collection_address: String,
    pub collection_postal_code: u32,
    pub collection_country: String,
    // Delivery party.
    pub delivery_name: String,
    pub delivery_city: String,
    pub delivery_address: String,
    pub delivery_postal_code: u32,
    pub delivery_country: String,
    // Physical measures.
    pub weight: f64,
    pub volume: f64,
    pub ldm: f64,
    pub content: String,
    pub units: u32,
    pub unit_type: String,
    pub hazardous: bool,
    pub cost: f64,
    // Commercial extras.
    pub finance_department: String,
    pub incoterm: String,
    pub customer: String,
    pub loading_instructions: String,
    pub customer_reference: String,
    pub additional_information: String,
    pub services: Vec<String>,
}

impl Shipment {
    pub fn pickup_stop_id(&self) -> StopId {
        stop_id(&self.id, Leg::Pickup)
    }

    pub fn delivery_stop_id(&self) -> StopId {
        stop_id(&self.id, Leg::Delivery)
    }

    pub fn is_assigned(&self) -> bool {
        self.transport_id.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Derives the stop for one leg of this shipment. Pickup legs snapshot
    /// the collection details, delivery legs the delivery details. The
    /// sequence starts at 0 and is rewritten when the stop joins a route.
    pub fn build_stop(&self, leg: Leg) -> Stop {
        let (date, time, name, city, address, postal_code, country, instructions) = match leg {
            Leg::Pickup => (
                self.pickup_date,
                self.pickup_time,
                self.collection_name.clone(),
                self.collection_city.clone(),
                self.collection_address.clone(),
                self.collection_postal_code,
                self.collection_country.clone(),
                self.loading_instructions.clone(),
            ),
            Leg::Delivery => (
                self.delivery_date,
                self.delivery_time,
                self.delivery_name.clone(),
                self.delivery_city.clone(),
                self.delivery_address.clone(),
                self.delivery_postal_code,
                self.delivery_country.clone(),
                self.customer_reference.clone(),
            ),
        };

        Stop {
            id: stop_id(&self.id, leg),
            shipment_id: self.id.clone(),
            leg,
            sequence: 0,
            weight: self.weight,
            volume: self.volume,
            ldm: self.ldm,
            content: self.content.clone(),
            units: self.units,
            unit_type: self.unit_type.clone(),
            hazardous: self.hazardous,
            additional_information: self.additional_information.clone(),
            services: self.services.clone(),
            date,
            time,
            name,
            address,
            city,
            postal_code,
            country,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn make_shipment() -> Shipment {
        Shipment {
            id: "S100".into(),
            transport_id: None,
            department: "KDEGR".into(),
            pickup_date: date!(2024 - 03 - 11),
            pickup_time: Some(time!(08:00)),
            delivery_date: date!(2024 - 03 - 13),
            delivery_time: Some(time!(14:00)),
            collection_name: "Acme Works".into(),
            collection_city: "Antwerp".into(),
            collection_address: "Dokweg 4".into(),
            collection_postal_code: 2030,
            collection_country: "BE".into(),
            delivery_name: "Nordhandel".into(),
            delivery_city: "Aalborg".into(),
            delivery_address: "Havnegade 12".into(),
            delivery_postal_code: 9000,
            delivery_country: "DK".into(),
            weight: 500.0,
            volume: 2.0,
            ldm: 1.0,
            content: "Machine parts".into(),
            units: 2,
            unit_type: "Pallet".into(),
            hazardous: false,
            cost: 100.0,
            finance_department: String::new(),
            incoterm: "DAP".into(),
            customer: "Acme".into(),
            loading_instructions: "Rear loading only".into(),
            customer_reference: "PO-7731".into(),
            additional_information: String::new(),
            services: vec![],
        }
    }

    #[test]
    fn pickup_stop_snapshots_collection_side() {
        let shipment = make_shipment();
        let stop = shipment.build_stop(Leg::Pickup);
        assert_eq!(stop.id, "S100_P");
        assert_eq!(stop.city, "Antwerp");
        assert_eq!(stop.postal_code, 2030);
        assert_eq!(stop.country, "BE");
        assert_eq!(stop.date, date!(2024 - 03 - 11));
        assert_eq!(stop.instructions, "Rear loading only");
        assert_eq!(stop.weight, 500.0);
    }

    #[test]
    fn delivery_stop_snapshots_delivery_side() {
        let shipment = make_shipment();
        let stop = shipment.build_stop(Leg::Delivery);
        assert_eq!(stop.id, "S100_D");
        assert_eq!(stop.city, "Aalborg");
        assert_eq!(stop.country, "DK");
        assert_eq!(stop.date, date!(2024 - 03 - 13));
        assert_eq!(stop.instructions, "PO-7731");
    }

    #[test]
    fn stops_do_not_observe_later_shipment_edits() {
        let mut shipment = make_shipment();
        let stop = shipment.build_stop(Leg::Pickup);
        shipment.weight = 750.0;
        assert_eq!(stop.weight, 500.0);
    }

    #[test]
    fn empty_transport_reference_counts_as_unassigned() {
        let mut shipment = make_shipment();
        assert!(!shipment.is_assigned());
        shipment.transport_id = Some(String::new());
        assert!(!shipment.is_assigned());
        shipment.transport_id = Some("TOUR01-0001".into());
        assert!(shipment.is_assigned());
    }
}
