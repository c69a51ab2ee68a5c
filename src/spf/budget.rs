//! DNS lookup budget of an SPF record (RFC 7208 §10.1).
//!
//! The walk follows `include` targets depth-first and tallies `include` and
//! `a` terms across the whole chain. `mx`, `ptr`, `exists` and `redirect=`
//! are not counted, so the result is a lower bound of what a full SPF
//! evaluation would spend.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, trace};

use crate::common::dns::{DnsError, DnsResolver};

use super::lookup::lookup_spf;
use super::types::{Mechanism, SpfRecord};

/// RFC 7208 §4.6.4 cap on DNS-querying terms per evaluation.
pub const DEFAULT_DNS_LOOKUP_LIMIT: usize = 10;

/// Tally of a lookup-budget walk.
///
/// Counts stop growing as soon as their sum exceeds the limit, because the
/// walk stops there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupBudgetReport {
    pub resolved_include_count: usize,
    pub resolved_a_count: usize,
    pub within_limit: bool,
}

impl LookupBudgetReport {
    pub fn total(&self) -> usize {
        self.resolved_include_count + self.resolved_a_count
    }
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DnsError>> + Send + 'a>>;

struct BudgetWalker<'r, R: DnsResolver> {
    resolver: &'r R,
    limit: usize,
    include_count: usize,
    a_count: usize,
}

impl<'r, R: DnsResolver> BudgetWalker<'r, R> {
    fn new(resolver: &'r R, limit: usize) -> Self {
        Self {
            resolver,
            limit,
            include_count: 0,
            a_count: 0,
        }
    }

    fn exhausted(&self) -> bool {
        self.include_count + self.a_count > self.limit
    }

    /// Count the terms of `record`, which sits `depth` includes below the root.
    fn walk<'a>(&'a mut self, record: SpfRecord, depth: usize) -> WalkFuture<'a> {
        Box::pin(async move {
            for directive in &record.directives {
                if self.exhausted() {
                    return Ok(());
                }
                match &directive.mechanism {
                    Mechanism::A { .. } => self.a_count += 1,
                    Mechanism::Include { domain } => {
                        self.include_count += 1;
                        if self.exhausted() {
                            trace!(domain = %domain, "lookup budget exceeded, not following include");
                            return Ok(());
                        }
                        if depth >= self.limit {
                            trace!(domain = %domain, depth, "include depth limit reached");
                            continue;
                        }
                        match lookup_spf(self.resolver, domain).await? {
                            Some(included) => self.walk(included, depth + 1).await?,
                            None => trace!(domain = %domain, "included domain has no SPF record"),
                        }
                    }
                    _ => {}
                }
            }
            Ok(())
        })
    }

    fn report(&self) -> LookupBudgetReport {
        LookupBudgetReport {
            resolved_include_count: self.include_count,
            resolved_a_count: self.a_count,
            within_limit: !self.exhausted(),
        }
    }
}

/// Walk `domain`'s SPF chain and report how many `include` and `a` terms it
/// uses. `Ok(None)` when the domain has no SPF record.
pub async fn spf_lookup_budget<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    limit: usize,
) -> Result<Option<LookupBudgetReport>, DnsError> {
    let record = match lookup_spf(resolver, domain).await? {
        Some(record) => record,
        None => {
            debug!(domain, "no SPF record, nothing to budget");
            return Ok(None);
        }
    };

    let mut walker = BudgetWalker::new(resolver, limit);
    walker.walk(record, 0).await?;
    let report = walker.report();
    debug!(
        domain,
        limit,
        includes = report.resolved_include_count,
        a = report.resolved_a_count,
        within_limit = report.within_limit,
        "SPF lookup budget evaluated"
    );
    Ok(Some(report))
}

/// Whether `domain`'s SPF chain stays within `limit` DNS-querying terms.
/// A domain without an SPF record is never within budget.
pub async fn spf_record_resolves_within_dns_lookups_limit<R: DnsResolver>(
    resolver: &R,
    domain: &str,
    limit: usize,
) -> Result<bool, DnsError> {
    let report = spf_lookup_budget(resolver, domain, limit).await?;
    Ok(report.is_some_and(|r| r.within_limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dns::MockResolver;

    fn chain_resolver() -> MockResolver {
        MockResolver::new()
            .with_txt("a.example", vec!["v=spf1 include:b.example -all"])
            .with_txt("b.example", vec!["v=spf1 a:c.example -all"])
            .with_txt("c.example", vec!["v=spf1 ip4:192.0.2.1 -all"])
    }

    #[tokio::test]
    async fn no_record_is_not_within_limit() {
        let r = MockResolver::new();
        r.set_nxdomain("nothing.example");
        let within = spf_record_resolves_within_dns_lookups_limit(&r, "nothing.example", 10)
            .await
            .unwrap();
        assert!(!within);
        assert_eq!(r.query_count(), 1);
    }

    #[tokio::test]
    async fn txt_without_spf_is_not_within_limit() {
        let r = MockResolver::new().with_txt("plain.example", vec!["hello"]);
        assert!(spf_lookup_budget(&r, "plain.example", 10).await.unwrap().is_none());
        assert_eq!(r.query_count(), 1);
    }

    #[tokio::test]
    async fn chain_over_limit() {
        let r = chain_resolver();
        let within = spf_record_resolves_within_dns_lookups_limit(&r, "a.example", 1)
            .await
            .unwrap();
        assert!(!within);
        assert_eq!(r.query_count(), 2);
    }

    #[tokio::test]
    async fn chain_at_limit() {
        let r = chain_resolver();
        let report = spf_lookup_budget(&r, "a.example", 2).await.unwrap().unwrap();
        assert_eq!(
            report,
            LookupBudgetReport {
                resolved_include_count: 1,
                resolved_a_count: 1,
                within_limit: true,
            }
        );
        assert_eq!(r.query_count(), 2);
        assert_eq!(r.queried_names(), vec!["a.example", "b.example"]);
    }

    #[tokio::test]
    async fn uncounted_mechanisms_cost_nothing() {
        let r = MockResolver::new().with_txt(
            "static.example",
            vec!["v=spf1 ip4:192.0.2.0/24 ip6:2001:db8::/32 mx ptr exists:%{i}.x.example redirect=other.example"],
        );
        let report = spf_lookup_budget(&r, "static.example", 0).await.unwrap().unwrap();
        assert_eq!(report.total(), 0);
        assert!(report.within_limit);
        assert_eq!(r.query_count(), 1);
    }

    #[tokio::test]
    async fn repeated_includes_count_each_time() {
        let r = MockResolver::new()
            .with_txt("dup.example", vec!["v=spf1 include:b.example include:b.example -all"])
            .with_txt("b.example", vec!["v=spf1 a -all"]);
        let report = spf_lookup_budget(&r, "dup.example", 10).await.unwrap().unwrap();
        assert_eq!(report.resolved_include_count, 2);
        assert_eq!(report.resolved_a_count, 2);
        assert_eq!(r.query_count(), 3);
    }

    #[tokio::test]
    async fn bare_and_targeted_a_terms_are_counted() {
        let r = MockResolver::new()
            .with_txt("mixed.example", vec!["v=spf1 a mx a:mail.mixed.example/24 include:b.example -all"])
            .with_txt("b.example", vec!["v=spf1 a -all"]);
        let report = spf_lookup_budget(&r, "mixed.example", 10).await.unwrap().unwrap();
        assert_eq!(report.resolved_include_count, 1);
        assert_eq!(report.resolved_a_count, 3);
        assert!(report.within_limit);
    }

    #[tokio::test]
    async fn self_include_terminates() {
        let r = MockResolver::new().with_txt("loop.example", vec!["v=spf1 include:loop.example -all"]);
        let report = spf_lookup_budget(&r, "loop.example", 10).await.unwrap().unwrap();
        assert!(!report.within_limit);
        assert_eq!(report.resolved_include_count, 11);
        assert_eq!(r.query_count(), 11);
    }

    #[tokio::test]
    async fn mutual_includes_terminate() {
        let r = MockResolver::new()
            .with_txt("ping.example", vec!["v=spf1 include:pong.example -all"])
            .with_txt("pong.example", vec!["v=spf1 include:ping.example -all"]);
        let within = spf_record_resolves_within_dns_lookups_limit(&r, "ping.example", 3)
            .await
            .unwrap();
        assert!(!within);
        assert_eq!(r.query_count(), 4);
    }

    #[tokio::test]
    async fn stops_fetching_once_limit_exceeded() {
        let r = MockResolver::new()
            .with_txt("a.example", vec!["v=spf1 include:b.example -all"])
            .with_txt("b.example", vec!["v=spf1 include:c.example -all"])
            .with_txt("c.example", vec!["v=spf1 include:d.example -all"])
            .with_txt("d.example", vec!["v=spf1 -all"]);
        let report = spf_lookup_budget(&r, "a.example", 2).await.unwrap().unwrap();
        assert_eq!(report.resolved_include_count, 3);
        assert!(!report.within_limit);
        assert_eq!(r.queried_names(), vec!["a.example", "b.example", "c.example"]);
    }

    #[tokio::test]
    async fn missing_include_target_counts_once() {
        let r = MockResolver::new().with_txt("a.example", vec!["v=spf1 include:gone.example -all"]);
        r.set_nxdomain("gone.example");
        let report = spf_lookup_budget(&r, "a.example", 10).await.unwrap().unwrap();
        assert_eq!(report.total(), 1);
        assert!(report.within_limit);
    }

    #[tokio::test]
    async fn transient_failure_in_chain_propagates() {
        let r = MockResolver::new()
            .with_txt("a.example", vec!["v=spf1 include:flaky.example -all"])
            .with_txt_err("flaky.example", DnsError::Timeout);
        let err = spf_record_resolves_within_dns_lookups_limit(&r, "a.example", 10)
            .await
            .unwrap_err();
        assert_eq!(err, DnsError::Timeout);
    }

    #[tokio::test]
    async fn repeated_evaluation_is_stable() {
        let r = chain_resolver();
        let first = spf_lookup_budget(&r, "a.example", 10).await.unwrap();
        let second = spf_lookup_budget(&r, "a.example", 10).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn eleven_includes_exceed_default_limit() {
        let includes: Vec<String> = (0..11).map(|i| format!("include:s{i}.example")).collect();
        let record = format!("v=spf1 {} -all", includes.join(" "));
        let r = MockResolver::new().with_txt("wide.example", vec![record]);
        for i in 0..11 {
            r.add_txt(&format!("s{i}.example"), vec!["v=spf1 ip4:192.0.2.1 -all"]);
        }
        let within = spf_record_resolves_within_dns_lookups_limit(&r, "wide.example", DEFAULT_DNS_LOOKUP_LIMIT)
            .await
            .unwrap();
        assert!(!within);
        // The eleventh include is counted but never fetched
        assert_eq!(r.query_count(), 11);
    }
}
