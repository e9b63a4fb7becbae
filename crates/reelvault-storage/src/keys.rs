//! Storage key allocation.
//!
//! Key format: `<namespace>/<64 hex chars>.<extension>`. No uniqueness check is
//! made against the store; 256 random bits make collisions negligible.

use rand::RngCore;

const TOKEN_BYTES: usize = 32;

/// Allocate a fresh key under `namespace` with the given file extension.
///
/// The token comes from the thread-local CSPRNG, so keys can be neither
/// predicted nor enumerated. Re-uploads always receive a new key.
pub fn generate_asset_key(namespace: &str, extension: &str) -> String {
    let mut token = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut token);

    let namespace = namespace.trim_matches('/');
    let extension = extension.trim_start_matches('.');
    format!("{}/{}.{}", namespace, hex::encode(token), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn split(key: &str) -> (&str, &str, &str) {
        let (namespace, file) = key.split_once('/').unwrap();
        let (token, ext) = file.split_once('.').unwrap();
        (namespace, token, ext)
    }

    #[test]
    fn key_has_namespace_token_and_extension() {
        let key = generate_asset_key("landscape", "mp4");
        let (namespace, token, ext) = split(&key);
        assert_eq!(namespace, "landscape");
        assert_eq!(ext, "mp4");
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn stray_separators_are_normalized() {
        let key = generate_asset_key("/thumbnails/", ".png");
        assert!(key.starts_with("thumbnails/"));
        assert!(key.ends_with(".png"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn keys_do_not_repeat() {
        let keys: HashSet<String> = (0..1000).map(|_| generate_asset_key("other", "mp4")).collect();
        assert_eq!(keys.len(), 1000);
    }
}
