//! Symbolic reference extraction from compiled class artifacts.
//!
//! A class artifact is parsed only as far as needed to answer two questions:
//!
//! 1. Which fully qualified class names does this artifact reference?
//! 2. Does it declare a `public static void main(String[])` entry point?
//!
//! Parsing covers the constant pool, the class/superclass/interface indices,
//! and the field and method descriptors. Method bodies and attributes are
//! skipped entirely; no verification or semantic analysis is performed.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::collections::BTreeSet;
use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};
use getset::{CopyGetters, Getters};

mod descriptor;
mod error;
mod pool;

pub use error::*;

use pool::Pool;

/// The class file magic number.
const MAGIC: u32 = 0xCAFE_BABE;

/// Access flag for `public` members.
const ACC_PUBLIC: u16 = 0x0001;

/// Access flag for `static` members.
const ACC_STATIC: u16 = 0x0008;

/// The name of the canonical entry point method.
const MAIN_NAME: &str = "main";

/// The descriptor of the canonical entry point method.
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// The symbolic information extracted from one class artifact.
#[derive(Clone, Eq, PartialEq, Debug, Getters, CopyGetters)]
pub struct ClassInfo {
    /// The fully qualified name of the class defined by the artifact.
    #[getset(get = "pub")]
    name: String,

    /// The fully qualified names of the classes the artifact references.
    ///
    /// The defining class itself, primitive types, and `void` are never
    /// included.
    #[getset(get = "pub")]
    references: BTreeSet<String>,

    /// Whether the class declares a `public static void main(String[])` method.
    #[getset(get_copy = "pub")]
    entry_point: bool,
}

impl ClassInfo {
    /// Explode the info into its constituent parts.
    pub fn explode(self) -> (String, BTreeSet<String>, bool) {
        (self.name, self.references, self.entry_point)
    }
}

/// Parse the symbolic references out of one class artifact byte stream.
///
/// The stream is consumed up to the end of the method table; trailing class
/// attributes are left unread.
pub fn parse<R: Read>(stream: &mut R) -> Result<ClassInfo, Error> {
    let magic = stream.read_u32::<BigEndian>()?;
    if magic != MAGIC {
        return Err(Error::Magic { found: magic });
    }

    // Minor and major version.
    stream.read_u16::<BigEndian>()?;
    stream.read_u16::<BigEndian>()?;

    let pool = Pool::read(stream)?;

    // Access flags.
    stream.read_u16::<BigEndian>()?;

    let this_class = stream.read_u16::<BigEndian>()?;
    let name = descriptor::qualified(pool.class_name(this_class)?);

    // The superclass and interfaces are Class entries collected through the
    // pool below; here they only need to be skipped.
    stream.read_u16::<BigEndian>()?;
    let interfaces = stream.read_u16::<BigEndian>()?;
    for _ in 0..interfaces {
        stream.read_u16::<BigEndian>()?;
    }

    let mut references = BTreeSet::new();
    for class in pool.class_names() {
        descriptor::push_class(class?, &mut references);
    }

    // Fields, then methods. Both tables share a layout.
    let mut entry_point = false;
    for section in [Member::Field, Member::Method] {
        let count = stream.read_u16::<BigEndian>()?;
        for _ in 0..count {
            let access = stream.read_u16::<BigEndian>()?;
            let member_name = stream.read_u16::<BigEndian>()?;
            let descriptor_index = stream.read_u16::<BigEndian>()?;
            let descriptor = pool.utf8(descriptor_index)?;
            descriptor::scan(descriptor, &mut references);

            if section == Member::Method
                && access & (ACC_PUBLIC | ACC_STATIC) == (ACC_PUBLIC | ACC_STATIC)
                && descriptor == MAIN_DESCRIPTOR
                && pool.utf8(member_name)? == MAIN_NAME
            {
                entry_point = true;
            }

            skip_attributes(stream)?;
        }
    }

    // A class is not a reference of itself.
    references.remove(&name);

    Ok(ClassInfo {
        name,
        references,
        entry_point,
    })
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Member {
    Field,
    Method,
}

/// Skip one attribute table without interpreting it.
fn skip_attributes<R: Read>(stream: &mut R) -> Result<(), Error> {
    let count = stream.read_u16::<BigEndian>()?;
    for _ in 0..count {
        // Attribute name index, then the body length.
        stream.read_u16::<BigEndian>()?;
        let length = stream.read_u32::<BigEndian>()?;
        let skipped = io::copy(&mut stream.by_ref().take(u64::from(length)), &mut io::sink())?;
        if skipped < u64::from(length) {
            return Err(Error::Truncated(io::ErrorKind::UnexpectedEof.into()));
        }
    }
    Ok(())
}
