//! Outbound clients for the two upstreams the monitor scrapes
//!
//! - `bis`: the Building Information System property profile page
//! - `open_data`: the NYC Open Data 311 and violation datasets

pub mod bis;
pub mod open_data;

pub use bis::{BisClient, BisSummary};
pub use open_data::{Complaint311Record, OpenDataClient};
