//! Cookies sent with a request and read back from `Set-Cookie`.

use std::fmt;

/// A single cookie as a name/value pair. Attributes such as `Path` or
/// `Expires` are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Read the leading `name=value` pair of a `Set-Cookie` header value.
    ///
    /// Returns `None` when there is no `=` or the name is empty.
    pub fn parse_set_cookie(line: &str) -> Option<Self> {
        let pair = line.split(';').next()?;
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim().trim_matches('"')))
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Render cookies as a single `Cookie` request header value.
pub(crate) fn header_value<'a>(cookies: impl IntoIterator<Item = &'a Cookie>) -> String {
    cookies
        .into_iter()
        .map(Cookie::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
