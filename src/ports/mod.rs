//! Port traits: the seams between the audit domain and its collaborators.

pub mod catalog_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;
