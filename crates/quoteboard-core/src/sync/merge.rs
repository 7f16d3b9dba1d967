use crate::models::Quote;

/// Remote records that the local collection does not already hold.
///
/// A remote record is new when no local record has the same text and
/// category (category compared case-insensitively). Repeats inside `remote`
/// are admitted once. Result order follows `remote`; inputs are untouched.
pub fn merge(remote: &[Quote], local: &[Quote]) -> Vec<Quote> {
    let mut fresh: Vec<Quote> = Vec::new();

    for candidate in remote {
        let known = local.iter().any(|q| q.same_record(candidate))
            || fresh.iter().any(|q| q.same_record(candidate));
        if !known {
            fresh.push(candidate.clone());
        }
    }

    fresh
}
