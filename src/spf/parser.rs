use std::net::{Ipv4Addr, Ipv6Addr};

use super::types::{Diagnostic, Directive, Mechanism, Qualifier, Severity, SpfRecord};

const VERSION: &str = "v=spf1";

/// Parse an SPF record string. Problems are reported in `messages`.
pub(crate) fn parse_record(record: &str) -> SpfRecord {
    let trimmed = record.trim();
    let mut messages = Vec::new();

    if !is_spf_version(trimmed) {
        let found = trimmed.split_whitespace().next().unwrap_or("").to_string();
        return SpfRecord {
            valid: false,
            directives: Vec::new(),
            redirect: None,
            explanation: None,
            messages: vec![Diagnostic::InvalidVersion(found)],
        };
    }

    let mut directives = Vec::new();
    let mut redirect: Option<String> = None;
    let mut explanation: Option<String> = None;
    let mut seen_all = false;
    let mut warned_after_all = false;

    for term in trimmed[VERSION.len()..].split_whitespace() {
        if let Some((name, value)) = split_modifier(term) {
            let slot = match name.to_ascii_lowercase().as_str() {
                "redirect" => &mut redirect,
                "exp" => &mut explanation,
                // Unknown modifiers are ignored for forward compatibility
                _ => continue,
            };
            if slot.is_some() {
                messages.push(Diagnostic::DuplicateModifier(name.to_ascii_lowercase()));
            } else if value.is_empty() {
                messages.push(Diagnostic::InvalidArgument {
                    term: term.to_string(),
                    reason: "modifier requires a domain".into(),
                });
            } else {
                *slot = Some(value.to_string());
            }
            continue;
        }

        match parse_directive(term) {
            Ok(directive) => {
                if seen_all && !warned_after_all {
                    messages.push(Diagnostic::MechanismAfterAll);
                    warned_after_all = true;
                }
                seen_all |= directive.mechanism == Mechanism::All;
                directives.push(directive);
            }
            Err(diagnostic) => messages.push(diagnostic),
        }
    }

    if !seen_all && redirect.is_none() {
        messages.push(Diagnostic::NoAllOrRedirect);
    }

    let valid = messages.iter().all(|m| m.severity() != Severity::Error);
    SpfRecord {
        valid,
        directives,
        redirect,
        explanation,
        messages,
    }
}

/// Case-insensitive `v=spf1` followed by whitespace or end of string.
pub(crate) fn is_spf_version(txt: &str) -> bool {
    let txt = txt.trim_start();
    match txt.get(..VERSION.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(VERSION) => txt[VERSION.len()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_ascii_whitespace()),
        _ => false,
    }
}

/// A modifier is `name=value` with an alphabetic name that isn't a mechanism.
fn split_modifier(term: &str) -> Option<(&str, &str)> {
    let (name, value) = term.split_once('=')?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if is_known_mechanism_name(&name.to_ascii_lowercase()) {
        return None;
    }
    Some((name, value))
}

fn is_known_mechanism_name(name: &str) -> bool {
    matches!(
        name,
        "all" | "include" | "a" | "mx" | "ptr" | "ip4" | "ip6" | "exists"
    )
}

/// Parse a single directive term: [qualifier]mechanism[:argument][/cidr]
fn parse_directive(term: &str) -> Result<Directive, Diagnostic> {
    let (qualifier, rest) = match term.chars().next().and_then(Qualifier::from_char) {
        Some(q) => (q, &term[1..]),
        None => (Qualifier::Pass, term),
    };

    let (name, arg) = split_mechanism_arg(rest);
    // `a:` / `mx:` / `ptr:` promise a domain-spec after the colon
    let explicit_domain = rest[name.len()..].starts_with(':');
    let invalid = |reason: String| Diagnostic::InvalidArgument {
        term: term.to_string(),
        reason,
    };

    let mechanism = match name.to_ascii_lowercase().as_str() {
        "all" => match arg {
            None => Mechanism::All,
            Some(_) => return Err(invalid("all takes no argument".into())),
        },
        "include" => Mechanism::Include {
            domain: required_domain(arg).map_err(invalid)?,
        },
        "exists" => Mechanism::Exists {
            domain: required_domain(arg).map_err(invalid)?,
        },
        "a" => {
            let (domain, cidr4, cidr6) = parse_domain_cidr(arg.unwrap_or("")).map_err(invalid)?;
            if explicit_domain && domain.is_none() {
                return Err(invalid("empty domain after ':'".into()));
            }
            Mechanism::A { domain, cidr4, cidr6 }
        }
        "mx" => {
            let (domain, cidr4, cidr6) = parse_domain_cidr(arg.unwrap_or("")).map_err(invalid)?;
            if explicit_domain && domain.is_none() {
                return Err(invalid("empty domain after ':'".into()));
            }
            Mechanism::Mx { domain, cidr4, cidr6 }
        }
        "ptr" => match arg {
            None => Mechanism::Ptr { domain: None },
            Some(_) if !explicit_domain => return Err(invalid("ptr takes no prefix length".into())),
            Some(domain) => Mechanism::Ptr {
                domain: Some(required_domain(Some(domain)).map_err(invalid)?),
            },
        },
        "ip4" => parse_ip4(arg.ok_or("ip4 requires an address".to_string()).map_err(invalid)?)
            .map_err(invalid)?,
        "ip6" => parse_ip6(arg.ok_or("ip6 requires an address".to_string()).map_err(invalid)?)
            .map_err(invalid)?,
        _ => return Err(Diagnostic::UnknownMechanism(rest.to_string())),
    };

    Ok(Directive { qualifier, mechanism })
}

fn required_domain(arg: Option<&str>) -> Result<String, String> {
    match arg {
        Some(domain) if !domain.is_empty() => Ok(domain.to_string()),
        _ => Err("a domain argument is required".into()),
    }
}

/// Split "name:argument" or "name/cidr". A slash-form argument keeps its slash
/// so the CIDR parser can tell `a/24` from `a:domain`.
fn split_mechanism_arg(s: &str) -> (&str, Option<&str>) {
    if let Some((name, arg)) = s.split_once(':') {
        (name, Some(arg))
    } else if let Some(pos) = s.find('/') {
        (&s[..pos], Some(&s[pos..]))
    } else {
        (s, None)
    }
}

/// Parse "domain/cidr4//cidr6", "/cidr4", "//cidr6" and friends.
fn parse_domain_cidr(s: &str) -> Result<(Option<String>, Option<u8>, Option<u8>), String> {
    let (rest, cidr6) = match s.split_once("//") {
        Some((rest, c6)) => (rest, Some(parse_prefix(c6, 128)?)),
        None => (s, None),
    };
    let (domain, cidr4) = match rest.rsplit_once('/') {
        Some((domain, c4)) => (domain, Some(parse_prefix(c4, 32)?)),
        None => (rest, None),
    };
    let domain = (!domain.is_empty()).then(|| domain.to_string());
    Ok((domain, cidr4, cidr6))
}

fn parse_prefix(s: &str, max: u8) -> Result<u8, String> {
    let prefix: u8 = s.parse().map_err(|_| format!("invalid prefix length: {s}"))?;
    if prefix > max {
        return Err(format!("prefix length {prefix} out of range (0-{max})"));
    }
    Ok(prefix)
}

fn parse_ip4(arg: &str) -> Result<Mechanism, String> {
    let (addr, prefix) = match arg.split_once('/') {
        Some((addr, p)) => (addr, Some(parse_prefix(p, 32)?)),
        None => (arg, None),
    };
    let addr: Ipv4Addr = addr.parse().map_err(|e| format!("invalid IPv4 address: {e}"))?;
    Ok(Mechanism::Ip4 { addr, prefix })
}

fn parse_ip6(arg: &str) -> Result<Mechanism, String> {
    // Addresses contain colons; the prefix is whatever follows the last '/'.
    let (addr, prefix) = match arg.rsplit_once('/') {
        Some((addr, p)) => (addr, Some(parse_prefix(p, 128)?)),
        None => (arg, None),
    };
    let addr: Ipv6Addr = addr.parse().map_err(|e| format!("invalid IPv6 address: {e}"))?;
    Ok(Mechanism::Ip6 { addr, prefix })
}
