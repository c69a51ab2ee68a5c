use crate::common::dns::{DnsError, DnsResolver};
use crate::dkim::{dkim_setup, dkim_setup_for_any_selector};
use crate::dmarc::dmarc_setup;
use crate::setup::SetupState;
use crate::spf::{
    has_spf_sender, spf_lookup_budget, spf_record_resolves_within_dns_lookups_limit, spf_setup,
    LookupBudgetReport, SpfValidations, DEFAULT_DNS_LOOKUP_LIMIT,
};

// ---------------------------------------------------------------------------
// DomainChecker
// ---------------------------------------------------------------------------

/// A resolver plus the caller's policy for the setup checks.
///
/// Holds no per-call state; every method is an independent lookup.
#[derive(Clone)]
pub struct DomainChecker<R: DnsResolver> {
    resolver: R,
    lookup_limit: usize,
    spf_validations: SpfValidations,
}

impl<R: DnsResolver> DomainChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            lookup_limit: DEFAULT_DNS_LOOKUP_LIMIT,
            spf_validations: SpfValidations::default(),
        }
    }

    pub fn lookup_limit(mut self, limit: usize) -> Self {
        self.lookup_limit = limit;
        self
    }

    pub fn spf_validations(mut self, validations: SpfValidations) -> Self {
        self.spf_validations = validations;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub async fn spf_setup(&self, domain: &str) -> Result<SetupState, DnsError> {
        spf_setup(&self.resolver, domain, self.spf_validations).await
    }

    pub async fn has_spf_sender(&self, domain: &str, sender: &str) -> Result<bool, DnsError> {
        has_spf_sender(&self.resolver, domain, sender).await
    }

    pub async fn spf_within_lookup_limit(&self, domain: &str) -> Result<bool, DnsError> {
        spf_record_resolves_within_dns_lookups_limit(&self.resolver, domain, self.lookup_limit).await
    }

    pub async fn spf_lookup_budget(&self, domain: &str) -> Result<Option<LookupBudgetReport>, DnsError> {
        spf_lookup_budget(&self.resolver, domain, self.lookup_limit).await
    }

    pub async fn dkim_setup(&self, domain: &str, selector: &str) -> Result<SetupState, DnsError> {
        dkim_setup(&self.resolver, domain, selector).await
    }

    pub async fn dkim_setup_for_any_selector<S: AsRef<str>>(
        &self,
        domain: &str,
        selectors: &[S],
    ) -> Result<SetupState, DnsError> {
        dkim_setup_for_any_selector(&self.resolver, domain, selectors).await
    }

    pub async fn dmarc_setup(&self, domain: &str) -> Result<SetupState, DnsError> {
        dmarc_setup(&self.resolver, domain).await
    }
}
