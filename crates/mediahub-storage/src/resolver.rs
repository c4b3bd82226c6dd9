//! Public URL derivation and parsing.
//!
//! A public URL is never stored on its own: it is fully determined by the
//! storage host, the bucket and the canonical path.

use serde::Serialize;
use url::Url;

use mediahub_core::config::StorageConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::types::AssetPath;

/// Fixed path segment in front of every public object URL.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public/";

/// How a stored reference value resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetLocator {
    /// A URL on the current storage host.
    Canonical {
        /// Bucket name.
        bucket: String,
        /// Object key.
        path: AssetPath,
    },
    /// A URL on a host that served assets before a migration.
    Legacy {
        /// Bucket name.
        bucket: String,
        /// Object key.
        path: AssetPath,
    },
    /// The field is null or blank.
    Missing,
    /// The value is not a public asset URL this resolver knows.
    Unrecognized {
        /// Raw stored value.
        raw: String,
    },
}

impl AssetLocator {
    /// Bucket and key, when the value resolved to an object.
    pub fn object(&self) -> Option<(&str, &AssetPath)> {
        match self {
            Self::Canonical { bucket, path } | Self::Legacy { bucket, path } => {
                Some((bucket.as_str(), path))
            }
            Self::Missing | Self::Unrecognized { .. } => None,
        }
    }
}

/// Converts between (bucket, path) pairs and public URLs.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    host: String,
    legacy_hosts: Vec<String>,
}

impl AssetResolver {
    /// Create a resolver for `host` with no legacy hosts.
    ///
    /// `host` may carry a port (`127.0.0.1:54321`); a default port is dropped.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: normalize_authority(&host.into()),
            legacy_hosts: Vec::new(),
        }
    }

    /// Create a resolver from the storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.host.trim()).with_legacy_hosts(config.legacy_hosts.iter().cloned())
    }

    /// Also accept URLs on these hosts when parsing.
    pub fn with_legacy_hosts(mut self, hosts: impl IntoIterator<Item = String>) -> Self {
        self.legacy_hosts
            .extend(hosts.into_iter().map(|h| normalize_authority(&h)));
        self
    }

    /// The current storage host, with its port when it has one.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Canonical public URL of an object.
    pub fn to_public_url(&self, bucket: &str, path: &AssetPath) -> String {
        format!(
            "https://{}{}{}/{}",
            self.host,
            PUBLIC_OBJECT_PREFIX,
            urlencoding::encode(bucket),
            encode_key(path.as_str())
        )
    }

    /// Recover bucket and canonical path from a public URL on the current or
    /// a legacy host.
    pub fn from_public_url(&self, url: &str) -> AppResult<(String, AssetPath)> {
        self.parse(url).map(|(bucket, path, _)| (bucket, path))
    }

    /// Interpret a stored reference value.
    pub fn classify(&self, value: Option<&str>) -> AssetLocator {
        let raw = match value.map(str::trim) {
            None | Some("") => return AssetLocator::Missing,
            Some(raw) => raw,
        };
        match self.parse(raw) {
            Ok((bucket, path, true)) => AssetLocator::Canonical { bucket, path },
            Ok((bucket, path, false)) => AssetLocator::Legacy { bucket, path },
            Err(_) => AssetLocator::Unrecognized {
                raw: raw.to_string(),
            },
        }
    }

    /// Returns bucket, path and whether the host is the current one.
    fn parse(&self, raw: &str) -> AppResult<(String, AssetPath, bool)> {
        let url = Url::parse(raw.trim()).map_err(|_| AppError::unrecognized_url(raw))?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(AppError::unrecognized_url(raw));
        }

        let host = authority(&url).ok_or_else(|| AppError::unrecognized_url(raw))?;
        let current = host == self.host;
        if !current && !self.legacy_hosts.iter().any(|h| *h == host) {
            return Err(AppError::unrecognized_url(raw));
        }

        let rest = url
            .path()
            .strip_prefix(PUBLIC_OBJECT_PREFIX)
            .ok_or_else(|| AppError::unrecognized_url(raw))?;
        let mut segments = Vec::new();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            let decoded =
                urlencoding::decode(segment).map_err(|_| AppError::unrecognized_url(raw))?;
            // An encoded separator inside one segment has no single key.
            if decoded.contains('/') {
                return Err(AppError::unrecognized_url(raw));
            }
            segments.push(decoded.into_owned());
        }
        if segments.len() < 2 {
            return Err(AppError::unrecognized_url(raw));
        }
        let bucket = segments.remove(0);
        let path =
            AssetPath::parse(&segments.join("/")).map_err(|_| AppError::unrecognized_url(raw))?;

        Ok((bucket, path, current))
    }
}

/// Percent-encode every segment of a key, keeping the separators.
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lower-cased host plus the port when it is not the scheme default.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

/// Configured host in the form [`authority`] yields for parsed URLs.
fn normalize_authority(raw: &str) -> String {
    let raw = raw.trim().to_ascii_lowercase();
    Url::parse(&format!("https://{raw}/"))
        .ok()
        .and_then(|url| authority(&url))
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediahub_core::error::ErrorKind;

    fn resolver() -> AssetResolver {
        AssetResolver::new("host").with_legacy_hosts(["old-project.example.co".to_string()])
    }

    #[test]
    fn test_public_url_format() {
        let path = AssetPath::parse("logos/1700000000000-ab12cd34.png").unwrap();
        assert_eq!(
            resolver().to_public_url("company", &path),
            "https://host/storage/v1/object/public/company/logos/1700000000000-ab12cd34.png"
        );
    }

    #[test]
    fn test_equivalent_raw_paths_give_identical_urls() {
        let r = resolver();
        let a = r.to_public_url("company", &AssetPath::parse("/logos//x.png").unwrap());
        let b = r.to_public_url("company", &AssetPath::parse("logos/x.png").unwrap());
        let c = AssetResolver::new("host")
            .to_public_url("company", &AssetPath::parse("./logos/x.png/").unwrap());
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_round_trip() {
        let r = resolver();
        for (bucket, raw) in [
            ("company", "logos/x.png"),
            ("images", "banner.webp"),
            ("documents", "2024/data sheet.pdf"),
            ("product-images", "a/b/c/d.jpeg"),
            ("images", "photo#1.png"),
            ("images", "what?.png"),
            ("images", "a%2Fb.png"),
            ("images", "100% cotton.jpg"),
        ] {
            let path = AssetPath::parse(raw).unwrap();
            let url = r.to_public_url(bucket, &path);
            assert_eq!(r.from_public_url(&url).unwrap(), (bucket.to_string(), path));
        }
    }

    #[test]
    fn test_public_url_escapes_key_characters() {
        let path = AssetPath::parse("2024/data sheet #2.pdf").unwrap();
        assert_eq!(
            resolver().to_public_url("documents", &path),
            "https://host/storage/v1/object/public/documents/2024/data%20sheet%20%232.pdf"
        );
    }

    #[test]
    fn test_round_trip_with_port() {
        let path = AssetPath::parse("logos/x.png").unwrap();
        let r = AssetResolver::new("127.0.0.1:54321");
        let url = r.to_public_url("company", &path);
        assert_eq!(
            url,
            "https://127.0.0.1:54321/storage/v1/object/public/company/logos/x.png"
        );
        assert_eq!(r.from_public_url(&url).unwrap(), ("company".to_string(), path.clone()));

        // Same host on another port is a different store.
        let other = "https://127.0.0.1:9999/storage/v1/object/public/company/logos/x.png";
        assert_eq!(r.from_public_url(other).unwrap_err().kind, ErrorKind::UnrecognizedUrl);

        // A default port in the configuration matches URLs without one.
        let r = AssetResolver::new("Media.Example.com:443");
        assert_eq!(r.host(), "media.example.com");
        let url = r.to_public_url("company", &path);
        assert!(r.from_public_url(&url).is_ok());

        let legacy = resolver().with_legacy_hosts(["localhost:8000".to_string()]);
        assert!(matches!(
            legacy.classify(Some("http://localhost:8000/storage/v1/object/public/company/logos/x.png")),
            AssetLocator::Legacy { .. }
        ));
    }

    #[test]
    fn test_from_public_url_normalizes_legacy_shapes() {
        let r = resolver();
        let (bucket, path) = r
            .from_public_url("https://host/storage/v1/object/public/company//logos/x.png?t=1")
            .unwrap();
        assert_eq!(bucket, "company");
        assert_eq!(path.as_str(), "logos/x.png");
    }

    #[test]
    fn test_from_public_url_rejects_foreign_urls() {
        let r = resolver();
        for url in [
            "https://elsewhere.com/storage/v1/object/public/company/logos/x.png",
            "https://host/storage/v1/object/sign/company/logos/x.png",
            "https://host/storage/v1/object/public/company",
            "https://host/storage/v1/object/public/company/",
            "https://host/storage/v1/object/public/company/a%2Fb.png",
            "ftp://host/storage/v1/object/public/company/x.png",
            "logos/x.png",
            "",
        ] {
            let err = r.from_public_url(url).unwrap_err();
            assert_eq!(err.kind, ErrorKind::UnrecognizedUrl, "accepted {url:?}");
        }
    }

    #[test]
    fn test_classify() {
        let r = resolver();
        assert_eq!(r.classify(None), AssetLocator::Missing);
        assert_eq!(r.classify(Some("  ")), AssetLocator::Missing);

        let canonical = r.classify(Some("https://host/storage/v1/object/public/company/logos/x.png"));
        assert!(matches!(canonical, AssetLocator::Canonical { ref bucket, .. } if bucket == "company"));

        let legacy = r.classify(Some(
            "https://OLD-project.example.co/storage/v1/object/public/company/logos/x.png",
        ));
        assert!(matches!(legacy, AssetLocator::Legacy { .. }));
        assert_eq!(
            legacy.object().map(|(b, p)| (b.to_string(), p.to_string())),
            Some(("company".to_string(), "logos/x.png".to_string()))
        );

        assert!(matches!(
            r.classify(Some("/images/logo.png")),
            AssetLocator::Unrecognized { .. }
        ));
    }
}
