//! Instrument catalog access port trait.

use crate::domain::error::AuditError;
use crate::domain::instrument::InstrumentRecord;

pub trait CatalogPort {
    fn load_instruments(&self) -> Result<Vec<InstrumentRecord>, AuditError>;
}
