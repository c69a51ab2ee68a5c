use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Qualifier prefix on a directive (RFC 7208 Section 4.6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Pass,     // + (default)
    Fail,     // -
    SoftFail, // ~
    Neutral,  // ?
}

impl Qualifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Qualifier::Pass),
            '-' => Some(Qualifier::Fail),
            '~' => Some(Qualifier::SoftFail),
            '?' => Some(Qualifier::Neutral),
            _ => None,
        }
    }
}

/// A directive is a qualifier + mechanism pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub qualifier: Qualifier,
    pub mechanism: Mechanism,
}

/// SPF mechanism variants (RFC 7208 Section 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mechanism {
    All,
    Include { domain: String },
    A { domain: Option<String>, cidr4: Option<u8>, cidr6: Option<u8> },
    Mx { domain: Option<String>, cidr4: Option<u8>, cidr6: Option<u8> },
    Ptr { domain: Option<String> },
    Ip4 { addr: Ipv4Addr, prefix: Option<u8> },
    Ip6 { addr: Ipv6Addr, prefix: Option<u8> },
    Exists { domain: String },
}

/// Mechanism name without its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    All,
    Include,
    A,
    Mx,
    Ptr,
    Exists,
    Ip4,
    Ip6,
}

impl MechanismKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MechanismKind::All => "all",
            MechanismKind::Include => "include",
            MechanismKind::A => "a",
            MechanismKind::Mx => "mx",
            MechanismKind::Ptr => "ptr",
            MechanismKind::Exists => "exists",
            MechanismKind::Ip4 => "ip4",
            MechanismKind::Ip6 => "ip6",
        }
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Mechanism {
    pub fn kind(&self) -> MechanismKind {
        match self {
            Mechanism::All => MechanismKind::All,
            Mechanism::Include { .. } => MechanismKind::Include,
            Mechanism::A { .. } => MechanismKind::A,
            Mechanism::Mx { .. } => MechanismKind::Mx,
            Mechanism::Ptr { .. } => MechanismKind::Ptr,
            Mechanism::Ip4 { .. } => MechanismKind::Ip4,
            Mechanism::Ip6 { .. } => MechanismKind::Ip6,
            Mechanism::Exists { .. } => MechanismKind::Exists,
        }
    }

    /// Domain argument, if the mechanism carries one.
    pub fn domain(&self) -> Option<&str> {
        match self {
            Mechanism::Include { domain } | Mechanism::Exists { domain } => Some(domain.as_str()),
            Mechanism::A { domain, .. } | Mechanism::Mx { domain, .. } | Mechanism::Ptr { domain } => {
                domain.as_deref()
            }
            Mechanism::All | Mechanism::Ip4 { .. } | Mechanism::Ip6 { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The record is structurally broken.
    Error,
    /// The record parses but is likely not what the publisher meant.
    Warning,
}

/// Problem found while parsing an SPF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    InvalidVersion(String),
    UnknownMechanism(String),
    InvalidArgument { term: String, reason: String },
    DuplicateModifier(String),
    /// A mechanism follows `all`; it can never be reached.
    MechanismAfterAll,
    /// Neither an `all` mechanism nor a `redirect` modifier ends evaluation.
    NoAllOrRedirect,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::InvalidVersion(_)
            | Diagnostic::UnknownMechanism(_)
            | Diagnostic::InvalidArgument { .. }
            | Diagnostic::DuplicateModifier(_) => Severity::Error,
            Diagnostic::MechanismAfterAll | Diagnostic::NoAllOrRedirect => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidVersion(v) => write!(f, "invalid SPF version: {v}"),
            Diagnostic::UnknownMechanism(m) => write!(f, "unknown mechanism: {m}"),
            Diagnostic::InvalidArgument { term, reason } => write!(f, "invalid term '{term}': {reason}"),
            Diagnostic::DuplicateModifier(m) => write!(f, "duplicate {m} modifier"),
            Diagnostic::MechanismAfterAll => {
                f.write_str("one or more mechanisms were found after the \"all\" mechanism and will be ignored")
            }
            Diagnostic::NoAllOrRedirect => {
                f.write_str("record uses neither an \"all\" mechanism nor a \"redirect\" modifier to terminate processing")
            }
        }
    }
}

/// Parsed SPF record.
///
/// Parsing never fails outright: structural problems clear `valid` and are
/// listed in `messages` next to the warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfRecord {
    pub valid: bool,
    pub directives: Vec<Directive>,
    pub redirect: Option<String>,
    pub explanation: Option<String>,
    pub messages: Vec<Diagnostic>,
}

impl SpfRecord {
    /// Parse an SPF record string (the TXT record value, starting with "v=spf1").
    pub fn parse(record: &str) -> Self {
        super::parser::parse_record(record)
    }

    pub fn has_message(&self, diagnostic: &Diagnostic) -> bool {
        self.messages.contains(diagnostic)
    }
}
