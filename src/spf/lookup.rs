use tracing::{debug, trace};

use crate::common::dns::{resolve_txt, DnsError, DnsResolver, TxtLookup};

use super::parser::is_spf_version;
use super::types::SpfRecord;

/// Pick the SPF record out of a TXT answer: the first string starting with
/// `v=spf1`. Additional SPF records are ignored rather than rejected.
pub fn find_spf_txt(records: &[String]) -> Option<&str> {
    records.iter().map(String::as_str).find(|txt| is_spf_version(txt))
}

/// Query TXT records for a domain, select the SPF record and parse it.
///
/// - No domain, no TXT records, or no `v=spf1` record → `Ok(None)`
/// - Parse problems → `Ok(Some(record))` with `record.valid == false`
/// - Transient DNS failure → `Err`
pub async fn lookup_spf<R: DnsResolver>(
    resolver: &R,
    domain: &str,
) -> Result<Option<SpfRecord>, DnsError> {
    let records = match resolve_txt(resolver, domain).await? {
        TxtLookup::Found(records) => records,
        TxtLookup::Absent => {
            trace!(domain, "no TXT records");
            return Ok(None);
        }
    };

    match find_spf_txt(&records) {
        Some(txt) => {
            let record = SpfRecord::parse(txt);
            debug!(domain, valid = record.valid, "SPF record found");
            Ok(Some(record))
        }
        None => {
            trace!(domain, "no v=spf1 record among TXT records");
            Ok(None)
        }
    }
}
