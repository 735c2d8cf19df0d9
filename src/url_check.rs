use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALID_URL_REGEX: Regex =
        Regex::new(r"^[\p{L}\p{N}.&@+_=;:,!~#\-/\[\]()'%?*]+$").unwrap();
    static ref URL_PARTS_REGEX: Regex =
        Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)").unwrap();
}

/// Check that a string only contains characters that are legal in a url.
///
/// Empty (or whitespace only) strings are rejected, as is anything with
/// whitespace, double quotes, angle brackets, braces, pipes, backslashes, carets or
/// backticks.
pub fn is_valid_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    VALID_URL_REGEX.is_match(url)
}

/// Scheme, host and path of a url. Query string and fragment are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
}

impl UrlParts {
    pub fn parse(url: &str) -> Self {
        let caps = match URL_PARTS_REGEX.captures(url) {
            Some(caps) => caps,
            None => {
                return UrlParts {
                    scheme: None,
                    host: None,
                    path: None,
                };
            }
        };

        let scheme = caps.get(1).map(|m| m.as_str().to_string());
        let host = caps.get(2).and_then(|m| host_of_authority(m.as_str()));
        let path = caps
            .get(3)
            .map(|m| m.as_str())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        UrlParts { scheme, host, path }
    }
}

// user:pass@host:port -> host
fn host_of_authority(authority: &str) -> Option<String> {
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    let host = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        }
    } else {
        match host_port.rfind(':') {
            Some(colon) => &host_port[..colon],
            None => host_port,
        }
    };

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Two urls point at the same page when scheme, host and path match.
pub fn same_page(a: &str, b: &str) -> bool {
    UrlParts::parse(a) == UrlParts::parse(b)
}
