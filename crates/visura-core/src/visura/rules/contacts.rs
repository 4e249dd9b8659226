//! Certified mail, e-mail, phone and website validators.

/// Domain labels that mark a certified mailbox.
const CERTIFIED_DOMAINS: [&str; 2] = ["pec", "legalmail"];

/// Plausible mailbox: one `@`, dotted domain, alphabetic TLD of 2+ letters.
pub fn validate_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty())
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Ordinary e-mail: a valid address outside certified-mail domains.
pub fn validate_ordinary_email(value: &str) -> bool {
    validate_email(value) && !is_certified_address(value)
}

/// Whether the address belongs to a certified-mail provider.
pub fn is_certified_address(value: &str) -> bool {
    value
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain
                .split('.')
                .any(|label| CERTIFIED_DOMAINS.iter().any(|d| label.eq_ignore_ascii_case(d)))
        })
        .unwrap_or(false)
}

/// 6 to 15 digits once separators are ignored.
pub fn validate_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (6..=15).contains(&digits)
}

/// Starts with `www.` or `http`, contains no `@`.
pub fn validate_website(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("www.") || lower.starts_with("http"))
        && lower.len() > 4
        && !lower.contains('@')
}
