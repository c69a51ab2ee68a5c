use tracing::debug;

use crate::common::dns::{resolve_txt, DnsError, DnsResolver, TxtLookup};
use crate::common::domain::dmarc_name;
use crate::setup::SetupState;

use super::record::DmarcRecord;

/// Query `_dmarc.<domain>` and return the first TXT record found there.
pub async fn lookup_dmarc<R: DnsResolver>(
    resolver: &R,
    domain: &str,
) -> Result<Option<DmarcRecord>, DnsError> {
    let name = dmarc_name(domain);
    let records = match resolve_txt(resolver, &name).await? {
        TxtLookup::Found(records) => records,
        TxtLookup::Absent => return Ok(None),
    };
    Ok(records.first().map(|txt| DmarcRecord::parse(txt)))
}

/// Whether `domain` publishes a DMARC record with at least one tag.
pub async fn dmarc_setup<R: DnsResolver>(resolver: &R, domain: &str) -> Result<SetupState, DnsError> {
    match lookup_dmarc(resolver, domain).await? {
        None => Ok(SetupState::NotSetup),
        Some(record) if record.is_empty() => {
            debug!(domain, messages = ?record.messages, "DMARC record has no tags");
            Ok(SetupState::Invalid)
        }
        Some(_) => Ok(SetupState::Setup),
    }
}
