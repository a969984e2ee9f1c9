//! Inventory domain module.
//!
//! Catalog snapshots, grades, demand history and the stock-status classifier.
//! Everything here is deterministic domain logic (no IO, no HTTP, no storage);
//! the storage collaborator hands snapshots in and the analytics crate reads them.

pub mod demand;
pub mod grade;
pub mod item;
pub mod status;

pub use demand::{DemandPoint, DemandSeries, DemandStats, Granularity, DAYS_PER_MONTH};
pub use grade::{AbcGrade, CombinedGrade, XyzGrade};
pub use item::{CatalogItem, SupplierRef};
pub use status::{InventoryStatus, ReorderStatus};
