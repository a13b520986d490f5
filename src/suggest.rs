// ==============================================================================
// "Did You Mean?" Suggestions for Unresolved Type References
// ==============================================================================
//
// When a field references a type name that no descriptor source declared, the
// consolidator drops the field and warns. A near-miss among the known
// declaration names (a typo in an annotation, a renamed class) is worth
// pointing out in the warning's help text.

/// Compute the Levenshtein edit distance between two strings.
///
/// Standard dynamic-programming formulation with a two-row buffer. Type names
/// are short, so quadratic time is fine.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr_row[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = (prev_row[j] + cost) // substitution
                .min(prev_row[j + 1] + 1) // deletion
                .min(curr_row[j] + 1); // insertion
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }
    prev_row[b_len]
}

/// Maximum edit distance at which a candidate still counts as "close".
///
/// Short names get a tighter bound so that e.g. `Tag` does not suggest `Bag`,
/// `Tab`, and `Log` all at once.
fn suggestion_threshold(name_len: usize) -> usize {
    if name_len <= 4 { 1 } else { 2 }
}

/// Pick the known declaration name closest to `unresolved`, if any is close
/// enough to be a plausible typo. Ties go to the earliest-registered name.
pub(crate) fn closest_match<'a>(
    unresolved: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    let threshold = suggestion_threshold(unresolved.chars().count());
    let mut best: Option<(&str, usize)> = None;
    for candidate in candidates {
        let distance = edit_distance(unresolved, candidate);
        if distance <= threshold && best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(name, _)| name)
}
