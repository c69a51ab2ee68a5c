use std::collections::BTreeMap;

/// DMARC policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// No action, monitoring only.
    None,
    /// Treat as suspicious (spam folder).
    Quarantine,
    /// Reject the message.
    Reject,
}

impl Policy {
    /// Parse policy string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Policy::None),
            "quarantine" => Some(Policy::Quarantine),
            "reject" => Some(Policy::Reject),
            _ => Option::None,
        }
    }
}

/// DMARC record as a tag map.
///
/// A record that doesn't start with `v=DMARC1` or has a malformed term
/// parses to an empty tag map; the reason lands in `messages`. Tag values
/// are kept verbatim and not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DmarcRecord {
    pub tags: BTreeMap<String, String>,
    pub messages: Vec<String>,
}

impl DmarcRecord {
    pub fn parse(record: &str) -> Self {
        match parse_tag_list(record) {
            Ok((tags, messages)) => Self { tags, messages },
            Err(detail) => Self {
                tags: BTreeMap::new(),
                messages: vec![detail],
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tag value by (case-insensitive) name.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Requested policy from `p=`, if present and recognised.
    pub fn policy(&self) -> Option<Policy> {
        self.tag("p").and_then(Policy::parse)
    }
}

/// Parse `tag=value` pairs separated by `;`. `v=DMARC1` must come first.
/// The first occurrence of a repeated tag wins.
fn parse_tag_list(record: &str) -> Result<(BTreeMap<String, String>, Vec<String>), String> {
    let mut tags = BTreeMap::new();
    let mut messages = Vec::new();

    for term in record.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        let (name, value) = term
            .split_once('=')
            .ok_or_else(|| format!("malformed term: '{term}'"))?;
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("invalid tag name in '{term}'"));
        }
        if tags.is_empty() && (name != "v" || !value.eq_ignore_ascii_case("DMARC1")) {
            return Err(format!("record must start with v=DMARC1, found '{term}'"));
        }
        if tags.contains_key(&name) {
            messages.push(format!("duplicate tag '{name}' ignored"));
            continue;
        }
        tags.insert(name, value.to_string());
    }

    if tags.is_empty() {
        return Err("empty record".into());
    }
    Ok((tags, messages))
}
