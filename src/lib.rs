//! Email authentication setup checks: SPF, DKIM, DMARC.
//!
//! Every check answers "is this configured for the domain?" with a
//! [`SetupState`], and the SPF lookup-budget check reports whether a record
//! stays within the RFC 7208 §10.1 limit of DNS-querying mechanisms.
//!
//! DNS caching is the caller's responsibility: implement [`DnsResolver`]
//! with caching at the resolver layer, or configure it on [`HickoryResolver`].

pub mod checker;
pub mod common;
pub mod dkim;
pub mod dmarc;
pub mod setup;
pub mod spf;

pub use checker::DomainChecker;
pub use common::dns::{DnsError, DnsResolver, HickoryResolver};
pub use setup::SetupState;
pub use spf::{LookupBudgetReport, SpfValidations, DEFAULT_DNS_LOOKUP_LIMIT};
