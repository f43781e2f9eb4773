//! Supporting utilities around the planning core.

pub mod persistence;

pub use persistence::{load_snapshot, save_snapshot, PersistError, PlanningSnapshot};
