use std::io;

use thiserror::Error;

/// Errors encountered while reading a class artifact.
///
/// Any of these indicate a malformed artifact; callers are expected to
/// report the artifact and continue with the next one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The stream does not begin with the class file magic number.
    #[error("not a class file: magic is {found:#010X}")]
    Magic {
        /// The first four bytes of the stream.
        found: u32,
    },

    /// An unknown constant pool tag was encountered.
    #[error("unknown constant pool tag {tag} at entry {index}")]
    UnknownPoolTag {
        /// The unrecognized tag byte.
        tag: u8,

        /// The pool index at which it was read.
        index: u16,
    },

    /// A constant pool index did not refer to the expected kind of entry.
    #[error("constant pool entry {index} is not a {expected} entry")]
    BadIndex {
        /// The out-of-range or mistyped index.
        index: u16,

        /// The kind of entry required by the referencing structure.
        expected: &'static str,
    },

    /// A Utf8 constant did not hold valid UTF-8 bytes.
    #[error("malformed Utf8 constant at entry {index}")]
    Utf8 {
        /// The pool index of the malformed constant.
        index: u16,
    },

    /// The stream ended before the class structure was fully read.
    #[error("truncated class file")]
    Truncated(#[from] io::Error),
}
