use crate::error::CreateError;
use url::Url;

/// Checks that `raw` is an absolute http(s) URL with a host.
///
/// The caller stores `raw` exactly as given so that resolving returns the
/// same string; the parsed form is only used for the checks.
pub(crate) fn validate_url(raw: &str) -> Result<(), CreateError> {
    if raw.is_empty() {
        return Err(CreateError::InvalidUrl("url cannot be empty".to_string()));
    }

    // Url::parse would silently strip these
    if raw.trim() != raw {
        return Err(CreateError::InvalidUrl(
            "url must not have leading or trailing whitespace".to_string(),
        ));
    }

    // tabs and newlines inside the url are dropped by Url::parse too
    if raw.chars().any(|c| c.is_ascii_control()) {
        return Err(CreateError::InvalidUrl(
            "url must not contain control characters".to_string(),
        ));
    }

    let parsed = Url::parse(raw).map_err(|e| CreateError::InvalidUrl(format!("{e}: {raw}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CreateError::InvalidUrl(format!(
                "url scheme must be http or https, got {other}"
            )))
        }
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(CreateError::InvalidUrl(format!("url has no host: {raw}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_invalid(url: &str) -> bool {
        matches!(validate_url(url), Err(CreateError::InvalidUrl(_)))
    }

    #[test]
    fn accepts_absolute_http_urls() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a").is_ok());
        assert!(validate_url("https://example.com/path?query=1#frag").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("https://127.0.0.1/x").is_ok());
    }

    #[test]
    fn rejects_empty_and_padded() {
        assert!(is_invalid(""));
        assert!(is_invalid(" https://example.com"));
        assert!(is_invalid("https://example.com\n"));
    }

    #[test]
    fn rejects_embedded_control_characters() {
        assert!(is_invalid("https://exa\nmple.com/a"));
        assert!(is_invalid("https://example.com/a\tb"));
        assert!(is_invalid("https://example.com/a\rb"));
        assert!(is_invalid("https://example.com/a\u{0}b"));
        assert!(is_invalid("https://example.com/a\u{7f}b"));
    }

    #[test]
    fn rejects_relative_and_garbage() {
        assert!(is_invalid("not-a-valid-url"));
        assert!(is_invalid("/relative/path"));
        assert!(is_invalid("example.com"));
        assert!(is_invalid("https://"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(is_invalid("ftp://example.com/file"));
        assert!(is_invalid("javascript:alert(1)"));
        assert!(is_invalid("mailto:someone@example.com"));
        assert!(is_invalid("file:///etc/passwd"));
    }
}
