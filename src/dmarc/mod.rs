//! DMARC (Domain-based Message Authentication, Reporting, and Conformance) per RFC 7489.

mod record;
mod setup;

pub use record::{DmarcRecord, Policy};
pub use setup::{dmarc_setup, lookup_dmarc};
