//! Route assembly: common operational routes and per-collection record routes.

mod common;
mod record;

pub use common::common_routes;
pub use record::{collection_routes, record_routes};
