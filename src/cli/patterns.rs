//! Pattern-group parsing for command arguments
//!
//! Words are patterns; a `/` (alone or attached to a word) starts a new
//! group. `cat dog / fox` gives `[["cat", "dog"], ["fox"]]`.

/// Split arguments into pattern groups. Empty groups are kept; the catalog
/// ignores them when matching.
pub fn build_pattern_groups<S: AsRef<str>>(args: &[S]) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for arg in args {
        for word in arg.as_ref().split_whitespace() {
            let mut pieces = word.split('/');
            if let Some(first) = pieces.next().filter(|p| !p.is_empty()) {
                current.push(first.to_string());
            }
            for piece in pieces {
                groups.push(std::mem::take(&mut current));
                if !piece.is_empty() {
                    current.push(piece.to_string());
                }
            }
        }
    }

    groups.push(current);
    groups
}
