//! Declared content-type handling.

/// Strip parameters and lowercase, e.g. `Video/MP4; codecs="avc1"` -> `video/mp4`.
///
/// Returns `None` unless the value looks like `type/subtype`.
pub fn normalize(declared: &str) -> Option<String> {
    let essence = declared.split(';').next().unwrap_or_default().trim();
    let (kind, subtype) = essence.split_once('/')?;
    if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}

/// File extension for a normalized content type: its subtype, reduced to the
/// characters allowed in a storage key.
pub fn extension_for(content_type: &str) -> String {
    let subtype = content_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .unwrap_or_default();
    let extension: String = subtype
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if extension.is_empty() {
        "bin".to_string()
    } else {
        extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("video/mp4").as_deref(), Some("video/mp4"));
        assert_eq!(normalize(" Video/MP4 ").as_deref(), Some("video/mp4"));
        assert_eq!(
            normalize("video/mp4; codecs=\"avc1.42E01E\"").as_deref(),
            Some("video/mp4")
        );
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("mp4"), None);
        assert_eq!(normalize("video/"), None);
        assert_eq!(normalize("a/b/c"), None);
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("video/webm"), "webm");
        assert_eq!(extension_for("video/x-matroska"), "xmatroska");
        assert_eq!(extension_for("video/"), "bin");
    }
}
