//! In-memory resolver for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{DnsError, DnsResolver};

/// Mock DNS resolver for testing.
///
/// Names without an entry answer `NoRecords`. Clones share the same zone
/// and the same query log.
#[derive(Clone, Default)]
pub struct MockResolver {
    txt_records: Arc<Mutex<HashMap<String, Vec<String>>>>,
    txt_errors: Arc<Mutex<HashMap<String, DnsError>>>,
    queries: Arc<Mutex<Vec<String>>>,
    query_count: Arc<AtomicUsize>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_txt<S: Into<String>>(&self, name: &str, records: Vec<S>) {
        let records = records.into_iter().map(Into::into).collect();
        self.txt_records.lock().unwrap().insert(name.to_lowercase(), records);
    }

    pub fn add_txt_err(&self, name: &str, err: DnsError) {
        self.txt_errors.lock().unwrap().insert(name.to_lowercase(), err);
    }

    pub fn set_nxdomain(&self, name: &str) {
        self.add_txt_err(name, DnsError::NxDomain);
    }

    pub fn with_txt<S: Into<String>>(self, name: &str, records: Vec<S>) -> Self {
        self.add_txt(name, records);
        self
    }

    pub fn with_txt_err(self, name: &str, err: DnsError) -> Self {
        self.add_txt_err(name, err);
        self
    }

    /// Number of TXT queries answered so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Names queried so far, lower-cased, in query order.
    pub fn queried_names(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl DnsResolver for MockResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let name_lower = name.to_lowercase();
        self.query_count.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(name_lower.clone());

        if let Some(err) = self.txt_errors.lock().unwrap().get(&name_lower) {
            return Err(err.clone());
        }
        self.txt_records
            .lock()
            .unwrap()
            .get(&name_lower)
            .cloned()
            .ok_or(DnsError::NoRecords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_resolver_txt() {
        let resolver = MockResolver::new();
        resolver.add_txt("example.com", vec!["v=spf1 -all"]);

        let result = resolver.query_txt("example.com").await.unwrap();
        assert_eq!(result, vec!["v=spf1 -all"]);
    }

    #[tokio::test]
    async fn test_mock_resolver_nxdomain() {
        let resolver = MockResolver::new();
        resolver.set_nxdomain("nonexistent.com");

        let result = resolver.query_txt("nonexistent.com").await;
        assert!(matches!(result, Err(DnsError::NxDomain)));
    }

    #[tokio::test]
    async fn test_mock_resolver_unknown_name() {
        let resolver = MockResolver::new();
        let result = resolver.query_txt("unknown.com").await;
        assert_eq!(result, Err(DnsError::NoRecords));
    }

    #[tokio::test]
    async fn test_mock_resolver_counts_queries() {
        let resolver = MockResolver::new().with_txt("Example.COM", vec!["hello"]);
        let shared = resolver.clone();

        resolver.query_txt("example.com").await.unwrap();
        let _ = shared.query_txt("other.com").await;

        assert_eq!(resolver.query_count(), 2);
        assert_eq!(resolver.queried_names(), vec!["example.com", "other.com"]);
    }
}
