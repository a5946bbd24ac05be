//! Core domain types and logic: the duplicate-asset audit and the data-quality scan.

pub mod aligner;
pub mod audit;
pub mod classifier;
pub mod config_validation;
pub mod correlation;
pub mod error;
pub mod instrument;
pub mod price;
pub mod quality;
pub mod report;
pub mod resolution;
