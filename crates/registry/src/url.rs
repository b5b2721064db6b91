//! Minimal absolute-URL parsing for mirror endpoints.
//!
//! Mirror URLs only ever need three things: a scheme check, the host (APT and
//! YUM address mirrors by host) and the origin (latency probes fall back to
//! it). A full URL parser is not needed for that.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>https?)://(?P<host>[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?)(?P<port>:[0-9]{1,5})?(?P<path>/[^\s]*)?$")
        .expect("URL pattern is a valid regex")
});

/// A validated absolute `http`/`https` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorUrl<'a> {
    raw: &'a str,
    scheme: &'a str,
    host: &'a str,
    port: Option<&'a str>,
    path: &'a str,
}

impl<'a> MirrorUrl<'a> {
    /// Parse `raw`, rejecting anything that is not an absolute http(s) URL.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let caps = URL_PATTERN.captures(raw).ok_or_else(|| Error::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an absolute http:// or https:// URL".to_string(),
        })?;

        let group = |name: &str| caps.name(name).map(|m| &raw[m.start()..m.end()]);
        let host = group("host").unwrap_or_default();
        if host.contains("..") {
            return Err(Error::InvalidUrl {
                url: raw.to_string(),
                reason: "host contains an empty label".to_string(),
            });
        }

        Ok(Self {
            raw,
            scheme: group("scheme").unwrap_or_default(),
            host,
            port: group("port"),
            path: group("path").unwrap_or("/"),
        })
    }

    /// Scheme, either `http` or `https`
    #[must_use]
    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// Host name without port
    #[must_use]
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// Path component, `/` when absent
    #[must_use]
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// `scheme://host[:port]`
    #[must_use]
    pub fn origin(&self) -> String {
        format!(
            "{}://{}{}",
            self.scheme,
            self.host,
            self.port.unwrap_or_default()
        )
    }
}

impl fmt::Display for MirrorUrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_path() {
        let url = MirrorUrl::parse("https://mirrors.aliyun.com/pypi/simple/").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host(), "mirrors.aliyun.com");
        assert_eq!(url.path(), "/pypi/simple/");
        assert_eq!(url.origin(), "https://mirrors.aliyun.com");
    }

    #[test]
    fn test_parse_bare_host() {
        let url = MirrorUrl::parse("https://goproxy.cn").unwrap();
        assert_eq!(url.path(), "/");
        assert_eq!(url.origin(), "https://goproxy.cn");
    }

    #[test]
    fn test_origin_keeps_port() {
        let url = MirrorUrl::parse("http://localhost:8080/npm/").unwrap();
        assert_eq!(url.origin(), "http://localhost:8080");
    }

    #[test]
    fn test_rejects_missing_scheme() {
        assert!(matches!(
            MirrorUrl::parse("mirrors.aliyun.com"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_other_schemes_and_garbage() {
        for raw in [
            "ftp://mirrors.aliyun.com/",
            "https://",
            "https://exa mple.com",
            "https://a..b/",
            "https://goproxy.cn,direct",
        ] {
            assert!(MirrorUrl::parse(raw).is_err(), "accepted {raw}");
        }
    }
}
