//! Iterator based enumeration of class artifacts.

use std::collections::VecDeque;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compress_tools::{uncompress_archive, Ownership};
use log::debug;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::{Classpath, Container, ContainerKind, Error};

/// The suffix that identifies class artifacts.
const CLASS_SUFFIX: &str = ".class";

/// A class artifact discovered by the walker.
#[derive(Debug)]
pub struct Entry {
    /// The `/`-separated path of the class inside its container,
    /// minus the `.class` suffix.
    class_path: String,

    /// The actual file on disk backing the artifact.
    concrete: PathBuf,

    /// Keeps the expanded archive tree alive for as long as the entry is.
    source: Arc<Opened>,
}

impl Entry {
    /// The container the artifact came from.
    pub fn container(&self) -> &Container {
        &self.source.container
    }

    /// The `/`-separated path of the class inside its container,
    /// without the `.class` suffix.
    pub fn class_path(&self) -> &str {
        &self.class_path
    }

    /// Open the artifact for reading.
    pub fn open(&self) -> Result<File, io::Error> {
        File::open(&self.concrete)
    }

    /// Read the full artifact into memory.
    pub fn bytes(&self) -> Result<Vec<u8>, io::Error> {
        std::fs::read(&self.concrete)
    }
}

/// An opened container: the root to walk, plus the expansion temp
/// directory when the container is an archive.
#[derive(Debug)]
struct Opened {
    container: Container,

    /// The directory whose contents are walked. For directory containers
    /// this is the container path itself; for archives it is the expansion
    /// directory.
    root: PathBuf,

    /// Dropping this removes the expanded tree from disk.
    _expansion: Option<TempDir>,
}

/// Enumerate every class artifact in every container of the classpath.
///
/// `skip` is consulted with the encoded container name before each
/// container is opened; a `true` result skips the container entirely.
///
/// A container that cannot be opened yields one `Err` item, and enumeration
/// continues with the next container. Archives are expanded into a
/// temporary directory which lives for as long as any of its entries does.
pub fn walk<F>(classpath: &Classpath, skip: F) -> Walk<F>
where
    F: FnMut(&str) -> bool,
{
    Walk {
        queue: classpath.containers().iter().cloned().collect(),
        current: None,
        skip,
    }
}

/// Iterator over the class artifacts of a classpath. See [`walk`].
pub struct Walk<F> {
    queue: VecDeque<Container>,
    current: Option<(Arc<Opened>, walkdir::IntoIter)>,
    skip: F,
}

impl<F: FnMut(&str) -> bool> Iterator for Walk<F> {
    type Item = Result<Entry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((source, entries)) = self.current.as_mut() {
                match entries.next() {
                    Some(Ok(found)) => {
                        if !found.path().is_file() {
                            continue;
                        }
                        match class_path(&source.root, found.path()) {
                            Some(class_path) => {
                                return Some(Ok(Entry {
                                    class_path,
                                    concrete: found.into_path(),
                                    source: source.clone(),
                                }))
                            }
                            None => continue,
                        }
                    }
                    Some(Err(error)) => return Some(Err(Error::Walk(error))),
                    None => {
                        self.current = None;
                        continue;
                    }
                }
            }

            let container = self.queue.pop_front()?;
            if (self.skip)(container.name()) {
                debug!("container {} is ignored; skipping", container.name());
                continue;
            }

            match open(container) {
                Ok(opened) => {
                    let entries = WalkDir::new(&opened.root).follow_links(false).into_iter();
                    self.current = Some((Arc::new(opened), entries));
                }
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

/// Open a container for walking, expanding archives to a temporary directory.
fn open(container: Container) -> Result<Opened, Error> {
    if container.kind() == ContainerKind::Directory {
        debug!("walking directory container {:?}", container.path());
        return Ok(Opened {
            root: container.path().to_owned(),
            container,
            _expansion: None,
        });
    }

    debug!("expanding archive container {:?}", container.path());
    let mut handle = File::open(container.path()).map_err(|error| Error::OpenContainer {
        container: container.name().clone(),
        error,
    })?;
    let expansion = tempfile::tempdir().map_err(|error| Error::OpenContainer {
        container: container.name().clone(),
        error,
    })?;
    uncompress_archive(&mut handle, expansion.path(), Ownership::Ignore).map_err(|error| {
        Error::Expand {
            container: container.name().clone(),
            error,
        }
    })?;

    Ok(Opened {
        root: expansion.path().to_owned(),
        container,
        _expansion: Some(expansion),
    })
}

/// Render a file's container-relative class path,
/// or `None` if the file is not a class artifact.
fn class_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        segments.push(component.as_os_str().to_str()?);
    }
    segments
        .join("/")
        .strip_suffix(CLASS_SUFFIX)
        .filter(|path| !path.is_empty())
        .map(str::to_owned)
}
