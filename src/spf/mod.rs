//! SPF (Sender Policy Framework) setup checks per RFC 7208.

mod budget;
mod lookup;
mod parser;
mod setup;
mod types;

pub use budget::{
    spf_lookup_budget, spf_record_resolves_within_dns_lookups_limit, LookupBudgetReport,
    DEFAULT_DNS_LOOKUP_LIMIT,
};
pub use lookup::{find_spf_txt, lookup_spf};
pub use setup::{has_spf_sender, spf_setup, SpfValidations};
pub use types::{Diagnostic, Directive, Mechanism, MechanismKind, Qualifier, Severity, SpfRecord};
