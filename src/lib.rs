//! A shipment-to-transport consolidation engine for road freight dispatch
//! planning: shipments each contribute a pickup and a delivery stop, and
//! transports consolidate those stops into a single ordered route while
//! keeping aggregate totals and sequence numbers consistent.
//!
//! The [`domain::PlanningStore`] owns all state; the operations in
//! [`domain::consolidation`] and [`domain::dispatch`] mutate it. Web or UI
//! layers sit on top of this crate and are out of scope here.

pub mod domain;
pub mod infra;
pub mod util;
