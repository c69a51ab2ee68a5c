use tracing::debug;

use crate::common::dns::{DnsError, DnsResolver};
use crate::common::domain::domains_equal;
use crate::setup::SetupState;

use super::lookup::lookup_spf;
use super::types::{Diagnostic, Mechanism, Qualifier};

/// Optional policy checks on top of structural validity. Both are off by
/// default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpfValidations {
    /// Treat a record with mechanisms after `all` as invalid.
    pub all_mechanism_is_the_last: bool,
    /// Treat a record with neither `all` nor `redirect=` as invalid.
    pub all_mechanism_or_redirect_modifier_is_present: bool,
}

impl SpfValidations {
    /// Both validations enabled.
    pub fn strict() -> Self {
        Self {
            all_mechanism_is_the_last: true,
            all_mechanism_or_redirect_modifier_is_present: true,
        }
    }

    pub fn all_mechanism_is_the_last(mut self, enabled: bool) -> Self {
        self.all_mechanism_is_the_last = enabled;
        self
    }

    pub fn all_mechanism_or_redirect_modifier_is_present(mut self, enabled: bool) -> Self {
        self.all_mechanism_or_redirect_modifier_is_present = enabled;
        self
    }
}

/// Whether `domain` publishes an SPF record, and whether it is usable.
pub async fn spf_setup<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    validations: SpfValidations,
) -> Result<SetupState, DnsError> {
    let record = match lookup_spf(resolver, domain).await? {
        Some(record) => record,
        None => return Ok(SetupState::NotSetup),
    };

    if !record.valid {
        debug!(domain, messages = ?record.messages, "SPF record does not parse");
        return Ok(SetupState::Invalid);
    }

    if validations.all_mechanism_is_the_last && record.has_message(&Diagnostic::MechanismAfterAll) {
        debug!(domain, "SPF record has mechanisms after all");
        return Ok(SetupState::Invalid);
    }

    if validations.all_mechanism_or_redirect_modifier_is_present
        && record.has_message(&Diagnostic::NoAllOrRedirect)
    {
        debug!(domain, "SPF record has neither all nor redirect");
        return Ok(SetupState::Invalid);
    }

    Ok(SetupState::Setup)
}

/// Whether `domain`'s SPF record directly includes `sender` with a pass
/// qualifier. Included records are not searched.
pub async fn has_spf_sender<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    sender: &str,
) -> Result<bool, DnsError> {
    let record = match lookup_spf(resolver, domain).await? {
        Some(record) if record.valid => record,
        _ => return Ok(false),
    };

    Ok(record.directives.iter().any(|d| {
        d.qualifier == Qualifier::Pass
            && matches!(&d.mechanism, Mechanism::Include { domain: target } if domains_equal(target, sender))
    }))
}
