// Vendor performance metrics: pure computation, recalculation on order
// writes, and the read endpoints for cached values and history

pub mod handlers;
pub mod metrics;
pub mod models;
pub mod recalculation;
pub mod repository;

pub use handlers::*;
pub use metrics::*;
pub use models::*;
pub use recalculation::*;
pub use repository::*;
