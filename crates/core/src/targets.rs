//! Target-list parsing.

/// Parse a comma-delimited target list into the ordered list of targets to
/// dispatch.
///
/// Entries are trimmed, empty entries dropped, and duplicate names collapsed
/// to their first occurrence so each surviving target maps to exactly one
/// job.
pub fn parse_target_list(raw: &str) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for entry in raw.split(',') {
        let target = entry.trim();
        if target.is_empty() || targets.iter().any(|t| t == target) {
            continue;
        }
        targets.push(target.to_string());
    }
    targets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
