//! Command path notation: `banana:plantain`.

/// Separator between segments of a command path.
pub const PATH_SEP: char = ':';

/// Split a command path into its segments.
///
/// Empty segments are kept (`"a::b"` yields `["a", "", "b"]`) so that a
/// malformed path fails resolution instead of silently collapsing.
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(PATH_SEP).collect()
}

/// Join segments back into a command path.
#[must_use]
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push(PATH_SEP);
        }
        out.push_str(segment.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nested() {
        assert_eq!(split_path("banana:plantain"), vec!["banana", "plantain"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_path("").is_empty());
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split_path("a::b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_join() {
        assert_eq!(join_path(&["apple", "granny-smith"]), "apple:granny-smith");
        assert_eq!(join_path::<&str>(&[]), "");
    }
}
