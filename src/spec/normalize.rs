// src/spec/normalize.rs

//! Cosmetic normalization of literal text and type descriptors.

/// Strip surrounding single or triple double-quotes, collapse whitespace runs
/// to one space and trim the result.
pub fn clean_text(raw: &str) -> String {
    let inner = if raw.len() >= 6 && raw.starts_with("\"\"\"") && raw.ends_with("\"\"\"") {
        &raw[3..raw.len() - 3]
    } else if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse nested `list<...>` wrappers into the flat prefix notation:
/// `list<list<int>>` becomes `list:list:int`.
///
/// Whitespace is ignored and already-condensed descriptors are returned
/// unchanged.
pub fn condense_list_type(type_text: &str) -> String {
    let compact: String = type_text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut rest = compact.as_str();
    let mut result = String::new();

    while rest.starts_with("list<") && rest.ends_with('>') {
        result.push_str("list:");
        rest = &rest[5..rest.len() - 1];
    }

    result.push_str(rest);
    result
}
