//! Constant pool decoding.
//!
//! Only `Class` and `Utf8` entries carry information this crate cares about;
//! every other entry kind is skipped with its correct width so that the rest
//! of the structure stays aligned.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::Error;

/// Constant pool tag bytes, per the class file format.
mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

/// One decoded constant pool slot.
enum Item {
    /// A Utf8 constant, fully decoded.
    Utf8(String),

    /// A Class constant, holding the index of its Utf8 name.
    Class(u16),

    /// Any other constant; its content is irrelevant here.
    Other,
}

/// The decoded constant pool of one class artifact.
pub(crate) struct Pool {
    /// Slots indexed as the format indexes them: entry 0 is unused,
    /// and 8-byte constants occupy two slots.
    entries: Vec<Item>,
}

impl Pool {
    /// Read the constant pool off the front of the stream.
    pub(crate) fn read<R: Read>(stream: &mut R) -> Result<Self, Error> {
        let count = stream.read_u16::<BigEndian>()?;
        let mut entries = vec![Item::Other];

        while (entries.len() as u16) < count {
            let index = entries.len() as u16;
            let tag = stream.read_u8()?;
            match tag {
                tag::UTF8 => {
                    let length = stream.read_u16::<BigEndian>()? as usize;
                    let mut buffer = vec![0; length];
                    stream.read_exact(&mut buffer)?;
                    let value = String::from_utf8(buffer).map_err(|_| Error::Utf8 { index })?;
                    entries.push(Item::Utf8(value));
                }
                tag::CLASS => {
                    let name = stream.read_u16::<BigEndian>()?;
                    entries.push(Item::Class(name));
                }
                tag::INTEGER | tag::FLOAT => {
                    skip(stream, 4)?;
                    entries.push(Item::Other);
                }
                tag::LONG | tag::DOUBLE => {
                    skip(stream, 8)?;
                    // 8-byte constants take up two pool slots.
                    entries.push(Item::Other);
                    entries.push(Item::Other);
                }
                tag::STRING | tag::METHOD_TYPE | tag::MODULE | tag::PACKAGE => {
                    skip(stream, 2)?;
                    entries.push(Item::Other);
                }
                tag::FIELD_REF
                | tag::METHOD_REF
                | tag::INTERFACE_METHOD_REF
                | tag::NAME_AND_TYPE
                | tag::DYNAMIC
                | tag::INVOKE_DYNAMIC => {
                    skip(stream, 4)?;
                    entries.push(Item::Other);
                }
                tag::METHOD_HANDLE => {
                    skip(stream, 3)?;
                    entries.push(Item::Other);
                }
                other => return Err(Error::UnknownPoolTag { tag: other, index }),
            }
        }

        Ok(Self { entries })
    }

    /// The Utf8 value at the provided index.
    pub(crate) fn utf8(&self, index: u16) -> Result<&str, Error> {
        match self.entries.get(index as usize) {
            Some(Item::Utf8(value)) => Ok(value),
            _ => Err(Error::BadIndex {
                index,
                expected: "Utf8",
            }),
        }
    }

    /// The resolved name of the Class entry at the provided index.
    pub(crate) fn class_name(&self, index: u16) -> Result<&str, Error> {
        match self.entries.get(index as usize) {
            Some(Item::Class(name)) => self.utf8(*name),
            _ => Err(Error::BadIndex {
                index,
                expected: "Class",
            }),
        }
    }

    /// Iterate the resolved names of every Class entry in the pool.
    pub(crate) fn class_names(&self) -> impl Iterator<Item = Result<&str, Error>> + '_ {
        self.entries.iter().filter_map(move |item| match item {
            Item::Class(name) => Some(self.utf8(*name)),
            _ => None,
        })
    }
}

/// Discard exactly `width` bytes from the stream.
fn skip<R: Read>(stream: &mut R, width: usize) -> Result<(), Error> {
    let mut buffer = [0u8; 8];
    stream.read_exact(&mut buffer[..width])?;
    Ok(())
}
