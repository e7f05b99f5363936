//! Qualified name utilities.
//!
//! Node names are sequences of simple-name segments separated by a dot. The
//! root has the empty name; every other node's qualified name is its
//! parent's qualified name joined with its simple name.

/// The separator between qualified name segments.
pub const SEPARATOR: char = '.';

/// Join a parent qualified name with a child simple name.
pub fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}{SEPARATOR}{child}")
    }
}

/// Split a qualified name into its simple-name segments.
pub fn split(name: &str) -> impl Iterator<Item = &str> {
    name.split(SEPARATOR)
}

/// The final segment of a qualified name.
pub fn simple(name: &str) -> &str {
    name.rsplit(SEPARATOR).next().unwrap_or(name)
}

/// Compute `name` relative to `ancestor`, if `ancestor` is a proper prefix.
pub fn relative_to<'a>(name: &'a str, ancestor: &str) -> Option<&'a str> {
    if ancestor.is_empty() {
        return Some(name);
    }
    name.strip_prefix(ancestor)?.strip_prefix(SEPARATOR)
}
