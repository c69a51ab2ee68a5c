//! Common infrastructure shared across SPF, DKIM, and DMARC.

pub mod dns;
pub mod domain;
