/// Whether `app_id` fits the scheduler's id grammar.
///
/// An id is an optional leading `/` followed by `/`-separated segments. Each
/// segment is one or more dot-separated labels of lowercase letters, digits
/// and inner hyphens. Empty segments and `.`/`..` are rejected, so an id
/// always names itself when placed in a URL path.
pub fn is_valid_app_id(app_id: &str) -> bool {
    let path = app_id.strip_prefix('/').unwrap_or(app_id);
    !path.is_empty() && path.split('/').all(is_valid_segment)
}

/// Absolute form of an app id: exactly one leading `/`.
pub fn canonical_app_id(app_id: &str) -> String {
    format!("/{}", app_id.strip_prefix('/').unwrap_or(app_id))
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes
                    .iter()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        }
        _ => false,
    }
}
