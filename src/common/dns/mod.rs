use std::future::Future;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, TokioResolver};
use thiserror::Error;
use tracing::{debug, trace};

pub mod mock;

pub use mock::MockResolver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("NXDOMAIN: domain does not exist")]
    NxDomain,
    #[error("no records of the requested type")]
    NoRecords,
    #[error("SERVFAIL: server failure")]
    ServFail,
    #[error("temporary DNS failure")]
    TempFail,
    #[error("timeout")]
    Timeout,
    #[error("DNS error: {0}")]
    Other(String),
}

impl DnsError {
    /// Whether this error means "there is no record here" rather than an
    /// operational failure. Absence is folded into data by [`resolve_txt`];
    /// everything else is handed back to the caller untouched.
    pub fn is_absence(&self) -> bool {
        match self {
            DnsError::NxDomain | DnsError::NoRecords | DnsError::ServFail => true,
            DnsError::TempFail | DnsError::Timeout | DnsError::Other(_) => false,
        }
    }
}

/// DNS resolver trait for abstracting TXT lookups.
///
/// Each returned string is one TXT record with its character-string
/// segments already concatenated.
pub trait DnsResolver: Clone + Send + Sync + 'static {
    fn query_txt(&self, name: &str) -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;
}

/// Outcome of a TXT query once absence has been separated from failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxtLookup {
    Found(Vec<String>),
    Absent,
}

impl TxtLookup {
    pub fn records(&self) -> &[String] {
        match self {
            TxtLookup::Found(records) => records,
            TxtLookup::Absent => &[],
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TxtLookup::Absent)
    }
}

/// Query TXT records for `name`.
///
/// - NXDOMAIN / no records / SERVFAIL → `Ok(TxtLookup::Absent)`
/// - Empty answer → `Ok(TxtLookup::Absent)`
/// - Any other failure → `Err`, unmodified
pub async fn resolve_txt<R: DnsResolver>(resolver: &R, name: &str) -> Result<TxtLookup, DnsError> {
    match resolver.query_txt(name).await {
        Ok(records) if records.is_empty() => {
            trace!(name, "empty TXT answer");
            Ok(TxtLookup::Absent)
        }
        Ok(records) => {
            trace!(name, count = records.len(), "TXT records found");
            Ok(TxtLookup::Found(records))
        }
        Err(e) if e.is_absence() => {
            trace!(name, error = %e, "no TXT record");
            Ok(TxtLookup::Absent)
        }
        Err(e) => {
            debug!(name, error = %e, "transient TXT lookup failure");
            Err(e)
        }
    }
}

/// Hickory DNS resolver implementation
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    pub fn new() -> Self {
        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .build();
        Self { resolver }
    }

    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Self { resolver }
    }

    fn classify_error(e: &ResolveError) -> DnsError {
        if let Some(proto) = e.proto() {
            match proto.kind() {
                ProtoErrorKind::NoRecordsFound { response_code, .. } => {
                    return match *response_code {
                        ResponseCode::NXDomain => DnsError::NxDomain,
                        ResponseCode::ServFail => DnsError::ServFail,
                        _ => DnsError::NoRecords,
                    };
                }
                ProtoErrorKind::Timeout => return DnsError::Timeout,
                _ => {}
            }
        }
        DnsError::Other(e.to_string())
    }
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsResolver for HickoryResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|segment| String::from_utf8_lossy(segment))
                            .collect::<String>()
                    })
                    .collect();
                Ok(records)
            }
            Err(e) => Err(Self::classify_error(&e)),
        }
    }
}
