//! DKIM key presence checks.
//!
//! Only the existence of a TXT record at `<selector>._domainkey.<domain>` is
//! checked. Keys are not decoded or validated, and keys published through a
//! CNAME to a provider-hosted record are only seen if the resolver follows it.

use tracing::debug;

use crate::common::dns::{resolve_txt, DnsError, DnsResolver, TxtLookup};
use crate::common::domain::dkim_name;
use crate::setup::SetupState;

/// Whether `domain` publishes a DKIM key record for `selector`.
///
/// Never returns `Invalid`.
pub async fn dkim_setup<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    selector: &str,
) -> Result<SetupState, DnsError> {
    let name = dkim_name(selector, domain);
    let state = match resolve_txt(resolver, &name).await? {
        TxtLookup::Found(records) if records.iter().any(|r| !r.trim().is_empty()) => SetupState::Setup,
        TxtLookup::Found(_) | TxtLookup::Absent => SetupState::NotSetup,
    };
    debug!(domain, selector, %state, "DKIM selector checked");
    Ok(state)
}

/// `Setup` as soon as one of `selectors` has a key record, else `NotSetup`.
/// Selectors are tried in order.
pub async fn dkim_setup_for_any_selector<R: DnsResolver, S: AsRef<str>>(
    resolver: &R,
    domain: &str,
    selectors: &[S],
) -> Result<SetupState, DnsError> {
    for selector in selectors {
        if dkim_setup(resolver, domain, selector.as_ref()).await?.is_setup() {
            return Ok(SetupState::Setup);
        }
    }
    Ok(SetupState::NotSetup)
}
