//! Enumeration of class artifacts across the containers of a classpath.
//!
//! A classpath is an ordered list of filesystem paths separated by the host
//! path separator. Each entry is a container: either a directory tree of
//! class files, or an archive (`jar`, `war`, `ear`, `rar`). This crate
//! splits the classpath string, classifies its containers, and walks them,
//! yielding one [`walk::Entry`] per class artifact found.
//!
//! Archives are expanded into temporary directories for walking; the
//! temporary tree stays alive for as long as any entry pointing into it and
//! is removed when the last one is dropped.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

use std::env;
use std::path::{Path, PathBuf};

use derive_more::Display;
use getset::{CopyGetters, Getters};
use log::warn;

mod error;
pub mod walk;

pub use error::*;
pub use walk::walk;

/// The kind of a classpath container.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub enum ContainerKind {
    /// A directory tree of class files.
    #[display(fmt = "directory")]
    Directory,

    /// A Java archive.
    #[display(fmt = "jar")]
    Jar,

    /// A web application archive.
    #[display(fmt = "war")]
    War,

    /// An enterprise application archive.
    #[display(fmt = "ear")]
    Ear,

    /// A resource adapter archive.
    #[display(fmt = "rar")]
    Rar,
}

impl ContainerKind {
    /// Classify a classpath entry by filesystem type and suffix.
    fn classify(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(Self::Directory);
        }
        if !path.is_file() {
            return None;
        }

        let suffix = path.extension()?.to_str()?.to_ascii_lowercase();
        match suffix.as_str() {
            "jar" => Some(Self::Jar),
            "war" => Some(Self::War),
            "ear" => Some(Self::Ear),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }

    /// Whether containers of this kind are archives.
    pub fn is_archive(self) -> bool {
        !matches!(self, Self::Directory)
    }
}

/// The archive kinds, in the order their encodings are attempted.
const ARCHIVE_KINDS: [ContainerKind; 4] = [
    ContainerKind::Jar,
    ContainerKind::War,
    ContainerKind::Ear,
    ContainerKind::Rar,
];

/// One container on the classpath.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Getters, CopyGetters)]
pub struct Container {
    /// The container kind.
    #[getset(get_copy = "pub")]
    kind: ContainerKind,

    /// The absolute path of the container on disk.
    #[getset(get = "pub")]
    path: PathBuf,

    /// The encoded container name.
    ///
    /// Directories encode as `dir:<absolute-path>`; archives encode as
    /// `<kind>:<file-stem>_<kind>`, e.g. `jar:guava_jar`.
    #[getset(get = "pub")]
    name: String,
}

impl Container {
    fn new(kind: ContainerKind, path: PathBuf) -> Self {
        let name = match kind {
            ContainerKind::Directory => format!("dir:{}", path.display()),
            archive => {
                let stem = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{archive}:{stem}_{archive}")
            }
        };
        Self { kind, path, name }
    }
}

/// Derive the human form of an encoded container name.
///
/// The container prefix is stripped and encoded archive suffixes are
/// collapsed back: `jar:guava_jar` becomes `guava.jar`, and
/// `dir:/work/classes` becomes `/work/classes`.
pub fn display_name(encoded: &str) -> String {
    if let Some(rest) = encoded.strip_prefix("dir:") {
        return rest.to_string();
    }

    for kind in ARCHIVE_KINDS {
        if let Some(rest) = encoded.strip_prefix(&format!("{kind}:")) {
            return match rest.strip_suffix(&format!("_{kind}")) {
                Some(stem) => format!("{stem}.{kind}"),
                None => rest.to_string(),
            };
        }
    }

    encoded.to_string()
}

/// An ordered list of classpath containers.
#[derive(Clone, Debug, Default, Getters)]
pub struct Classpath {
    /// The containers, in classpath order.
    #[getset(get = "pub")]
    containers: Vec<Container>,
}

impl Classpath {
    /// Parse a classpath string into containers.
    ///
    /// The string is split on the host path separator. Relative entries are
    /// resolved against the process working directory. Entries that are
    /// neither directories nor recognized archives are reported and dropped.
    pub fn parse(classpath: &str) -> Self {
        let cwd = env::current_dir().ok();
        let containers = env::split_paths(classpath)
            .filter(|entry| !entry.as_os_str().is_empty())
            .map(|entry| match (&cwd, entry.is_absolute()) {
                (Some(cwd), false) => cwd.join(entry),
                _ => entry,
            })
            .filter_map(|entry| match ContainerKind::classify(&entry) {
                Some(kind) => Some(Container::new(kind, entry)),
                None => {
                    warn!("classpath entry {entry:?} is not a directory or supported archive; skipping");
                    None
                }
            })
            .collect();
        Self { containers }
    }

    /// Whether the classpath has no usable containers.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// The number of usable containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }
}
