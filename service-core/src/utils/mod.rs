pub mod validation;

pub use validation::{FieldKind, FieldSpec, PayloadSchema, ValidatedJson};

/// Returns at most `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
