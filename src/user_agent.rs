//! User-Agent string for API and token endpoint traffic.

/// Product token sent with every HTTP request.
const PRODUCT: &str = "playlist-downloader";

/// Default User-Agent, identifying the tool and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{PRODUCT}/{version} (youtube-playlist-sync)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_product_and_version() {
        let ua = default_user_agent();
        assert!(ua.starts_with("playlist-downloader/"), "{ua}");
        assert_eq!(
            ua.strip_prefix("playlist-downloader/")
                .and_then(|s| s.split(' ').next()),
            Some(env!("CARGO_PKG_VERSION")),
            "UA must contain crate version: {ua}"
        );
    }
}
