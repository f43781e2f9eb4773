//! Flat-record intake for shipments and the fleet.
//!
//! Records arrive as loosely-typed rows (exported spreadsheets, upstream
//! TMS dumps) and are normalized here: postal codes lose their inner
//! whitespace and coerce to numbers, dates and times are parsed strictly.
//! Shipment-id uniqueness is this layer's contract towards the store.

use serde::Deserialize;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};
use tracing::info;

use crate::domain::fleet::{FleetPool, Trailer, Truck};
use crate::domain::shipment::Shipment;
use crate::domain::store::PlanningStore;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("record '{record_id}': bad date '{value}' in {field}")]
    BadDate {
        record_id: String,
        field: &'static str,
        value: String,
        #[source]
        source: time::error::Parse,
    },
    #[error("record '{record_id}': bad time '{value}' in {field}")]
    BadTime {
        record_id: String,
        field: &'static str,
        value: String,
        #[source]
        source: time::error::Parse,
    },
}

/// One flat shipment row as exported by the booking system.
#[derive(Clone, Debug, Deserialize)]
pub struct ShipmentRecord {
    pub shipment_id: String,
    /// Pre-existing transport assignment, usually empty.
    #[serde(default)]
    pub transport: String,
    pub department: String,
    pub pickup_date: String,
    #[serde(default)]
    pub pickup_time: String,
    pub delivery_date: String,
    #[serde(default)]
    pub delivery_time: String,
    pub collection_name: String,
    pub collection_city: String,
    pub collection_address: String,
    pub collection_postal_code: String,
    pub collection_country: String,
    pub delivery_name: String,
    pub delivery_city: String,
    pub delivery_address: String,
    pub delivery_postal_code: String,
    pub delivery_country: String,
    pub weight: f64,
    pub volume: f64,
    pub ldm: f64,
    pub content: String,
    pub units: u32,
    pub unit_type: String,
    pub hazardous: bool,
    pub cost: f64,
    #[serde(default)]
    pub finance_department: String,
    #[serde(default)]
    pub incoterm: String,
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub loading_instructions: String,
    #[serde(default)]
    pub customer_reference: String,
    #[serde(default)]
    pub additional_information: String,
    #[serde(default)]
    pub services: Vec<String>,
}

impl ShipmentRecord {
    pub fn into_shipment(self) -> Result<Shipment, IngestError> {
        let id = self.shipment_id.clone();
        Ok(Shipment {
            transport_id: (!self.transport.is_empty()).then_some(self.transport),
            department: self.department,
            pickup_date: parse_date(&id, "pickup_date", &self.pickup_date)?,
            pickup_time: parse_time(&id, "pickup_time", &self.pickup_time)?,
            delivery_date: parse_date(&id, "delivery_date", &self.delivery_date)?,
            delivery_time: parse_time(&id, "delivery_time", &self.delivery_time)?,
            collection_name: self.collection_name,
            collection_city: self.collection_city,
            collection_address: self.collection_address,
            collection_postal_code: normalize_postal_code(&self.collection_postal_code),
            collection_country: self.collection_country,
            delivery_name: self.delivery_name,
            delivery_city: self.delivery_city,
            delivery_address: self.delivery_address,
            delivery_postal_code: normalize_postal_code(&self.delivery_postal_code),
            delivery_country: self.delivery_country,
            weight: self.weight,
            volume: self.volume,
            ldm: self.ldm,
            content: self.content,
            units: self.units,
            unit_type: self.unit_type,
            hazardous: self.hazardous,
            cost: self.cost,
            finance_department: self.finance_department,
            incoterm: self.incoterm,
            customer: self.customer,
            loading_instructions: self.loading_instructions,
            customer_reference: self.customer_reference,
            additional_information: self.additional_information,
            services: self.services,
            id: self.shipment_id,
        })
    }
}

/// One flat truck row from the fleet sheet.
#[derive(Clone, Debug, Deserialize)]
pub struct TruckRecord {
    pub license_plate: String,
    pub department: String,
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub haulier: String,
    #[serde(default)]
    pub trailer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub transport: String,
    #[serde(default)]
    pub last_transport: String,
}

impl TruckRecord {
    pub fn into_truck(self) -> Result<Truck, IngestError> {
        let plate = self.license_plate.clone();
        let date = if self.date.is_empty() {
            None
        } else {
            Some(parse_date(&plate, "date", &self.date)?)
        };
        Ok(Truck {
            department: self.department,
            driver: self.driver,
            haulier: self.haulier,
            trailer: self.trailer,
            location: self.location,
            date,
            time: parse_time(&plate, "time", &self.time)?,
            transport_id: (!self.transport.is_empty()).then_some(self.transport),
            last_transport_id: (!self.last_transport.is_empty()).then_some(self.last_transport),
            plate: self.license_plate,
        })
    }
}

/// One flat trailer row from the fleet sheet.
#[derive(Clone, Debug, Deserialize)]
pub struct TrailerRecord {
    pub license_plate: String,
    pub department: String,
    #[serde(default)]
    pub open_pool: bool,
}

impl TrailerRecord {
    pub fn into_trailer(self) -> Trailer {
        Trailer {
            plate: self.license_plate,
            department: self.department,
            open_pool: self.open_pool,
        }
    }
}

/// Strips whitespace and coerces a postal code to a number; anything that
/// still fails to parse becomes 0, matching the tolerant upstream exports
/// ("2630 AB", " 9000", blanks).
pub fn normalize_postal_code(raw: &str) -> u32 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    cleaned.parse().unwrap_or(0)
}

fn parse_date(record_id: &str, field: &'static str, value: &str) -> Result<Date, IngestError> {
    Date::parse(value, DATE_FORMAT).map_err(|source| IngestError::BadDate {
        record_id: record_id.to_string(),
        field,
        value: value.to_string(),
        source,
    })
}

fn parse_time(
    record_id: &str,
    field: &'static str,
    value: &str,
) -> Result<Option<Time>, IngestError> {
    if value.is_empty() {
        return Ok(None);
    }
    Time::parse(value, TIME_FORMAT)
        .map(Some)
        .map_err(|source| IngestError::BadTime {
            record_id: record_id.to_string(),
            field,
            value: value.to_string(),
            source,
        })
}

/// Converts and registers a batch of shipment records, returning how many
/// were taken in. Duplicate ids overwrite earlier rows (the store's
/// documented non-idempotent registration).
pub fn register_shipments(
    store: &mut PlanningStore,
    records: Vec<ShipmentRecord>,
) -> Result<usize, IngestError> {
    let mut count = 0;
    for record in records {
        let shipment = record.into_shipment()?;
        store.register_shipment(shipment);
        count += 1;
    }
    info!(count, "registered shipment records");
    Ok(count)
}

/// Converts and registers fleet records into the pool.
pub fn register_fleet(
    fleet: &mut FleetPool,
    trucks: Vec<TruckRecord>,
    trailers: Vec<TrailerRecord>,
) -> Result<usize, IngestError> {
    let mut count = 0;
    for record in trucks {
        fleet.add_truck(record.into_truck()?);
        count += 1;
    }
    for record in trailers {
        fleet.add_trailer(record.into_trailer());
        count += 1;
    }
    info!(count, "registered fleet records");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn make_record(id: &str) -> ShipmentRecord {
        ShipmentRecord {
            shipment_id: id.into(),
            transport: String::new(),
            department: "KDEGR".into(),
            pickup_date: "2024-03-11".into(),
            pickup_time: "08:00".into(),
            delivery_date: "2024-03-13".into(),
            delivery_time: String::new(),
            collection_name: "Acme Works".into(),
            collection_city: "Antwerp".into(),
            collection_address: "Dokweg 4".into(),
            collection_postal_code: "2030".into(),
            collection_country: "BE".into(),
            delivery_name: "Nordhandel".into(),
            delivery_city: "Aalborg".into(),
            delivery_address: "Havnegade 12".into(),
            delivery_postal_code: "9000".into(),
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
            incoterm: String::new(),
            customer: String::new(),
            loading_instructions: String::new(),
            customer_reference: String::new(),
            additional_information: String::new(),
            services: vec![],
        }
    }

    #[test]
    fn record_converts_to_shipment() {
        let shipment = make_record("S100").into_shipment().unwrap();
        assert_eq!(shipment.id, "S100");
        assert_eq!(shipment.pickup_date, date!(2024 - 03 - 11));
        assert_eq!(shipment.pickup_time, Some(time!(08:00)));
        assert_eq!(shipment.delivery_time, None);
        assert!(shipment.transport_id.is_none());
    }

    #[test]
    fn postal_codes_are_normalized() {
        assert_eq!(normalize_postal_code("2700"), 2700);
        assert_eq!(normalize_postal_code(" 27 00 "), 2700);
        assert_eq!(normalize_postal_code("2630 AB"), 2630);
        assert_eq!(normalize_postal_code("N/A"), 0);
        assert_eq!(normalize_postal_code(""), 0);
    }

    #[test]
    fn bad_date_is_reported_with_the_record_id() {
        let mut record = make_record("S100");
        record.pickup_date = "11/03/2024".into();
        let err = record.into_shipment().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("S100"));
        assert!(message.contains("pickup_date"));
    }

    #[test]
    fn registration_builds_shipments_and_stops() {
        let mut store = PlanningStore::new();
        let count =
            register_shipments(&mut store, vec![make_record("S100"), make_record("S200")])
                .unwrap();
        assert_eq!(count, 2);
        assert!(store.shipment("S100").is_some());
        assert!(store.stop("S200_D").is_some());
    }

    #[test]
    fn preassigned_transport_reference_is_kept() {
        let mut record = make_record("S100");
        record.transport = "TOUR01-0007".into();
        let shipment = record.into_shipment().unwrap();
        assert_eq!(shipment.transport_id.as_deref(), Some("TOUR01-0007"));
    }

    #[test]
    fn fleet_records_fill_the_pool() {
        let mut fleet = FleetPool::new();
        let trucks = vec![TruckRecord {
            license_plate: "AB-12-345".into(),
            department: "KDEGR".into(),
            driver: "J. Jensen".into(),
            haulier: "Nordtrans".into(),
            trailer: String::new(),
            location: "DK-9300".into(),
            date: "2024-03-11".into(),
            time: "06:30".into(),
            transport: String::new(),
            last_transport: String::new(),
        }];
        let trailers = vec![TrailerRecord {
            license_plate: "TR-100".into(),
            department: "KDEGR".into(),
            open_pool: false,
        }];
        let count = register_fleet(&mut fleet, trucks, trailers).unwrap();
        assert_eq!(count, 2);
        let truck = fleet.truck("AB-12-345").unwrap();
        assert_eq!(truck.date, Some(date!(2024 - 03 - 11)));
        assert_eq!(truck.time, Some(time!(06:30)));
        assert!(fleet.trailers().any(|t| t.plate == "TR-100"));
    }
}
