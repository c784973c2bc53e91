//! Key codec
//!
//! Maps arbitrary cache keys to tokens that are safe in file names and URLs.
//! A configured site substring is stripped from the key before encoding, so
//! both directions operate on the *canonical* key: `decode(encode(k))` is
//! always `canonical(k)`.

use std::borrow::Cow;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use s3store_core::error::StoreError;

use crate::CacheResult;

/// Reversible key to token mapping
#[derive(Debug, Clone, Default)]
pub struct KeyCodec {
    /// Substring removed from keys before encoding
    site: Option<String>,
}

impl KeyCodec {
    /// Create a codec; an empty site behaves like no site
    pub fn new(site: Option<String>) -> Self {
        Self {
            site: site.filter(|s| !s.is_empty()),
        }
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// Key with the first occurrence of the site removed
    pub fn canonical<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self.site.as_deref() {
            Some(site) if key.contains(site) => Cow::Owned(key.replacen(site, "", 1)),
            _ => Cow::Borrowed(key),
        }
    }

    /// Encode a key into a path and URL safe token
    pub fn encode(&self, key: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.canonical(key).as_bytes())
    }

    /// Decode a token back into the canonical key
    pub fn decode(&self, token: &str) -> CacheResult<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|e| StoreError::Codec {
                token: token.to_string(),
                reason: e.to_string(),
            })?;

        String::from_utf8(bytes).map_err(|e| StoreError::Codec {
            token: token.to_string(),
            reason: format!("decoded key is not UTF-8: {}", e),
        })
    }

    /// [`KeyCodec::encode`] treating an absent key as empty
    pub fn encode_opt(&self, key: Option<&str>) -> String {
        self.encode(key.unwrap_or_default())
    }

    /// [`KeyCodec::decode`] treating an absent token as empty
    pub fn decode_opt(&self, token: Option<&str>) -> CacheResult<String> {
        self.decode(token.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_path_safe() {
        let codec = KeyCodec::default();
        let token = codec.encode("https://example.com/a?b=c&d=/e+f");
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_known_token() {
        let codec = KeyCodec::default();
        assert_eq!(codec.encode("user:42"), "dXNlcjo0Mg");
        assert_eq!(codec.decode("dXNlcjo0Mg").unwrap(), "user:42");
    }

    #[test]
    fn test_site_is_stripped_once() {
        let codec = KeyCodec::new(Some("https://shop.example".to_string()));
        let key = "https://shop.example/p/https://shop.example";

        assert_eq!(codec.canonical(key), "/p/https://shop.example");
        assert_eq!(codec.encode(key), codec.encode("/p/https://shop.example"));
        assert_eq!(
            codec.decode(&codec.encode(key)).unwrap(),
            "/p/https://shop.example"
        );
    }

    #[test]
    fn test_empty_site_is_ignored() {
        let codec = KeyCodec::new(Some(String::new()));
        assert_eq!(codec.site(), None);
        assert_eq!(codec.canonical("abc"), "abc");
    }

    #[test]
    fn test_absent_input_is_empty() {
        let codec = KeyCodec::default();
        assert_eq!(codec.encode_opt(None), "");
        assert_eq!(codec.decode_opt(None).unwrap(), "");
    }

    #[test]
    fn test_decode_rejects_invalid_tokens() {
        let codec = KeyCodec::default();
        assert!(matches!(
            codec.decode("not base64!"),
            Err(StoreError::Codec { .. })
        ));
        // valid base64 of a lone continuation byte
        assert!(matches!(codec.decode("gA"), Err(StoreError::Codec { .. })));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decode_inverts_encode(key in ".*") {
            let codec = KeyCodec::default();
            prop_assert_eq!(codec.decode(&codec.encode(&key)).unwrap(), key);
        }

        #[test]
        fn decode_yields_canonical_key(key in ".*", site in "[a-z]{1,8}") {
            let codec = KeyCodec::new(Some(site.clone()));
            let expected = codec.canonical(&key).into_owned();
            prop_assert_eq!(codec.decode(&codec.encode(&key)).unwrap(), expected);

            if !key.contains(&site) {
                prop_assert_eq!(codec.decode(&codec.encode(&key)).unwrap(), key);
            }
        }
    }
}
