//! Internal-name and descriptor handling.

use std::collections::BTreeSet;

/// Translate an internal binary name (`a/b/C`) to a qualified name (`a.b.C`).
pub(crate) fn qualified(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Record the class named by a raw Class constant.
///
/// The constant either names an object class in internal form, or holds an
/// array descriptor. Arrays of primitives are not references.
pub(crate) fn push_class(raw: &str, out: &mut BTreeSet<String>) {
    let element = raw.trim_start_matches('[');
    if element.len() == raw.len() {
        out.insert(qualified(raw));
    } else if let Some(name) = element.strip_prefix('L').and_then(|e| e.strip_suffix(';')) {
        out.insert(qualified(name));
    }
}

/// Record every `Lname;` object type mentioned by a field or method descriptor.
pub(crate) fn scan(descriptor: &str, out: &mut BTreeSet<String>) {
    let mut rest = descriptor;
    while let Some(start) = rest.find('L') {
        let tail = &rest[start + 1..];
        match tail.find(';') {
            Some(end) => {
                out.insert(qualified(&tail[..end]));
                rest = &tail[end + 1..];
            }
            None => break,
        }
    }
}
