/// A phone number is accepted iff it is empty or, after stripping the
/// formatting characters space, `-`, `(`, `)`, and `+`, contains at
/// least 10 digit characters (country code prefix included).
pub fn phone_is_valid(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }

    let cleaned: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();

    cleaned.chars().filter(char::is_ascii_digit).count() >= 10
}

/// Loose shape check, not RFC 5322: one `@`, a non-empty local part, a
/// dotted domain, and no whitespace.
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}
