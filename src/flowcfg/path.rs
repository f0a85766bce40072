//! Configuration tree addressing.

/// Cache key reserved for the tree root.
pub const ROOT_KEY: &str = "__root__";

/// Trim whitespace and leading/trailing `/`.
pub fn normalize_path(raw: &str) -> String {
    raw.trim().trim_matches('/').to_string()
}

/// Cache key of a prefix; the empty prefix maps to [`ROOT_KEY`].
pub fn cache_key(prefix: &str) -> String {
    let normalized = normalize_path(prefix);
    if normalized.is_empty() {
        ROOT_KEY.to_string()
    } else {
        normalized
    }
}

/// Split a path into its segments.
pub fn segments(path: &str) -> Vec<String> {
    let normalized = normalize_path(path);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.split('/').map(str::to_string).collect()
}

/// `cfg > a > b`
pub fn title(path: &str) -> String {
    let segs = segments(path);
    if segs.is_empty() {
        return "cfg".to_string();
    }
    format!("cfg > {}", segs.join(" > "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_path("  /mqtt/broker// "), "mqtt/broker");
        assert_eq!(normalize_path("///"), "");
        assert_eq!(normalize_path("a/b"), "a/b");
    }

    #[test]
    fn test_cache_key_root() {
        assert_eq!(cache_key(""), ROOT_KEY);
        assert_eq!(cache_key(" / "), ROOT_KEY);
        assert_eq!(cache_key("/a/b/"), "a/b");
    }

    #[test]
    fn test_segments_and_title() {
        assert!(segments("").is_empty());
        assert_eq!(segments("/pool/pump"), vec!["pool", "pump"]);
        assert_eq!(title(""), "cfg");
        assert_eq!(title("pool/pump"), "cfg > pool > pump");
    }
}
