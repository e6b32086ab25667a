//! Static assets bundled into the binary
//!
//! These are the build assets the cache store is seeded from, and the
//! origin that cache misses fall back to.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// Entry the root document path resolves to
pub const ROOT_DOCUMENT: &str = "index.html";

/// Names of all bundled assets
pub fn asset_names() -> Vec<String> {
    Assets::iter().map(|name| name.into_owned()).collect()
}

/// Load a bundled asset by name
pub fn load(name: &str) -> Option<Vec<u8>> {
    Assets::get(name).map(|file| file.data.into_owned())
}

/// Map a request path to a bundled asset name: the root document serves
/// `/`, everything else is looked up relative to the asset root.
pub fn entry_name(path: &str) -> &str {
    match path.trim_start_matches('/') {
        "" => ROOT_DOCUMENT,
        trimmed => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_contains_root_document() {
        assert!(asset_names().iter().any(|name| name == ROOT_DOCUMENT));
        assert!(load(ROOT_DOCUMENT).is_some());
    }

    #[test]
    fn test_entry_name_maps_root_to_document() {
        assert_eq!(entry_name("/"), ROOT_DOCUMENT);
        assert_eq!(entry_name(""), ROOT_DOCUMENT);
        assert_eq!(entry_name("/app.css"), "app.css");
        assert_eq!(entry_name("help.txt"), "help.txt");
    }

    #[test]
    fn test_unknown_asset_is_none() {
        assert!(load("no-such-asset.bin").is_none());
    }
}
