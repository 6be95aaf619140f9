// Purchase orders: CRUD, listing, line item totals and the acknowledgment
// workflow. Every write recalculates the owning vendor's metrics.

pub mod acknowledgment;
pub mod handlers;
pub mod line_items;
pub mod models;
pub mod repository;
pub mod service;

pub use acknowledgment::*;
pub use handlers::*;
pub use line_items::*;
pub use models::*;
pub use repository::*;
pub use service::*;
