//! Split dotted keys such as `tenant.name` into association hops and a leaf.

/// A dotted key split into its association hops and its terminal leaf, carrying the payload
/// that goes with it.
///
/// This is purely syntactic: whether the hops name declared associations is only checked when
/// the plan is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<P> {
    pub hops: Vec<String>,
    pub leaf: String,
    pub payload: P,
}

/// Split a dotted key on `.`, trimming whitespace around each segment.
pub fn resolve_path<P>(key: &str, payload: P) -> ResolvedPath<P> {
    let mut hops: Vec<String> = key.split('.').map(|segment| segment.trim().to_string()).collect();
    // split always yields at least one segment
    let leaf = hops.pop().unwrap_or_default();
    ResolvedPath {
        hops,
        leaf,
        payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_has_no_hops() {
        let path = resolve_path("name", ());
        assert!(path.hops.is_empty());
        assert_eq!(path.leaf, "name");
    }

    #[test]
    fn segments_are_trimmed() {
        let path = resolve_path(" tenant . owner .name ", "x");
        assert_eq!(path.hops, vec!["tenant", "owner"]);
        assert_eq!(path.leaf, "name");
        assert_eq!(path.payload, "x");
    }

    #[test]
    fn empty_segments_are_kept_for_the_compiler_to_drop() {
        let path = resolve_path("tenant..name", ());
        assert_eq!(path.hops, vec!["tenant", ""]);
        assert_eq!(path.leaf, "name");
    }
}
