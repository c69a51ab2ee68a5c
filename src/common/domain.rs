/// Normalize a domain: trim, lowercase, strip trailing dot.
pub fn normalize(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    d.strip_suffix('.').unwrap_or(&d).to_string()
}

/// Compare two domains after normalization.
pub fn domains_equal(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Name at which a domain publishes its DMARC policy.
pub fn dmarc_name(domain: &str) -> String {
    format!("_dmarc.{}", normalize(domain))
}

/// Name at which a domain publishes the DKIM key for `selector`.
pub fn dkim_name(selector: &str, domain: &str) -> String {
    format!("{}._domainkey.{}", normalize(selector), normalize(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercase() {
        assert_eq!(normalize("EXAMPLE.COM"), "example.com");
    }

    #[test]
    fn normalize_strip_trailing_dot() {
        assert_eq!(normalize("example.com."), "example.com");
    }

    #[test]
    fn normalize_combined() {
        assert_eq!(normalize(" Mail.EXAMPLE.COM. "), "mail.example.com");
    }

    #[test]
    fn equal_ignores_case_and_root_dot() {
        assert!(domains_equal("_spf.Google.com.", "_spf.google.com"));
        assert!(!domains_equal("spf.google.com", "_spf.google.com"));
    }

    #[test]
    fn dmarc_query_name() {
        assert_eq!(dmarc_name("Example.com."), "_dmarc.example.com");
    }

    // selector._domainkey.domain
    #[test]
    fn dkim_query_name() {
        assert_eq!(dkim_name("sel1", "example.com"), "sel1._domainkey.example.com");
    }
}
