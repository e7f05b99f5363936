//! End-to-end analysis: enumerate the classpath, extract references,
//! populate the hierarchy, resolve arcs.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use getset::Getters;
use log::{debug, warn};
use typed_builder::TypedBuilder;

use classpath::Classpath;

use crate::check::{unreferenced, ReferenceReport};
use crate::tree::{ContainerKind, Tree};
use crate::{Error, Filter};

/// Options for an analysis run.
#[derive(Clone, Debug, TypedBuilder)]
pub struct Options {
    /// The classpath string to analyze.
    #[builder(setter(into))]
    classpath: String,

    /// The filter deciding sources, reference targets, and focus.
    #[builder(default)]
    filter: Filter,

    /// Explicitly declared entry point classes, as bare qualified names.
    #[builder(default, setter(into))]
    entry_points: Vec<String>,
}

/// A non-fatal problem encountered during analysis.
///
/// Warnings never abort the pass; the offending artifact or container is
/// skipped and analysis continues.
#[derive(Debug)]
#[non_exhaustive]
pub enum Warning {
    /// A container or one of its entries could not be enumerated.
    Enumerate(classpath::Error),

    /// A class artifact could not be read.
    UnreadableClass {
        /// The encoded container name.
        container: String,

        /// The container-relative class path.
        class_path: String,

        /// The read failure.
        error: io::Error,
    },

    /// A class artifact could not be parsed.
    BadClass {
        /// The encoded container name.
        container: String,

        /// The container-relative class path.
        class_path: String,

        /// The parse failure.
        error: classfile::Error,
    },

    /// A class artifact mapped to an already occupied node.
    Duplicate {
        /// The encoded container name.
        container: String,

        /// The container-relative class path.
        class_path: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerate(error) => write!(f, "enumerate: {error}"),
            Self::UnreadableClass {
                container,
                class_path,
                error,
            } => write!(f, "read {class_path} in {container}: {error}"),
            Self::BadClass {
                container,
                class_path,
                error,
            } => write!(f, "bad class {class_path} in {container}: {error}"),
            Self::Duplicate {
                container,
                class_path,
            } => write!(f, "duplicate class {class_path} in {container}"),
        }
    }
}

/// The result of one analysis run: the populated hierarchy plus run
/// metadata.
#[derive(Debug, Getters)]
pub struct Analysis {
    /// The populated hierarchy.
    #[getset(get = "pub")]
    tree: Tree,

    /// The filter the run used.
    #[getset(get = "pub")]
    filter: Filter,

    /// Explicit entry point names provided by the caller.
    #[getset(get = "pub")]
    entry_points: Vec<String>,

    /// Non-fatal problems encountered along the way.
    #[getset(get = "pub")]
    warnings: Vec<Warning>,

    /// The number of accepted class artifacts per container.
    #[getset(get = "pub")]
    classes_per_container: BTreeMap<String, usize>,
}

impl Analysis {
    /// Mutable access to the hierarchy, for collapse state changes.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Run the reference check with this analysis's filter and declared
    /// entry points.
    pub fn unreferenced(&self) -> ReferenceReport {
        unreferenced(&self.tree, &self.filter, &self.entry_points)
    }
}

fn container_kind(kind: classpath::ContainerKind) -> ContainerKind {
    match kind {
        classpath::ContainerKind::Directory => ContainerKind::Directory,
        _ => ContainerKind::Archive,
    }
}

/// Analyze a classpath: enumerate its containers, extract every class
/// artifact's references, and build the resolved hierarchy.
pub fn analyze(options: Options) -> Result<Analysis, Error> {
    let Options {
        classpath,
        filter,
        entry_points,
    } = options;

    let parsed = Classpath::parse(&classpath);
    if parsed.is_empty() {
        return Err(Error::EmptyClasspath { classpath });
    }
    debug!("analyzing {} container(s)", parsed.len());

    let mut tree = Tree::new();
    let mut warnings = Vec::new();
    let mut classes_per_container = BTreeMap::new();

    // Containers contribute their node even when they hold no classes.
    for container in parsed.containers() {
        if filter.ignores_source(container.name()) {
            continue;
        }
        tree.add_container(container_kind(container.kind()), container.name());
        classes_per_container.insert(container.name().clone(), 0);
    }

    for entry in classpath::walk(&parsed, |name| filter.ignores_source(name)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("enumeration failure: {error}");
                warnings.push(Warning::Enumerate(error));
                continue;
            }
        };

        let mut stream = match entry.open() {
            Ok(stream) => io::BufReader::new(stream),
            Err(error) => {
                warn!(
                    "read {} in {}: {error}",
                    entry.class_path(),
                    entry.container().name()
                );
                warnings.push(Warning::UnreadableClass {
                    container: entry.container().name().clone(),
                    class_path: entry.class_path().to_owned(),
                    error,
                });
                continue;
            }
        };

        let info = match classfile::parse(&mut stream) {
            Ok(info) => info,
            Err(error) => {
                warn!(
                    "bad class {} in {}: {error}",
                    entry.class_path(),
                    entry.container().name()
                );
                warnings.push(Warning::BadClass {
                    container: entry.container().name().clone(),
                    class_path: entry.class_path().to_owned(),
                    error,
                });
                continue;
            }
        };

        let (name, references, entry_point) = info.explode();
        if filter.ignores_class(&name) {
            debug!("class {name} is ignored; skipping");
            continue;
        }
        let references = references
            .into_iter()
            .filter(|target| !filter.ignores_class(target))
            .collect();

        let kind = container_kind(entry.container().kind());
        let container = tree.add_container(kind, entry.container().name());
        match tree.add_class(container, entry.class_path(), references, entry_point) {
            Ok(_) => {
                *classes_per_container
                    .entry(entry.container().name().clone())
                    .or_insert(0) += 1;
            }
            Err(error) => {
                warn!("{error}");
                warnings.push(Warning::Duplicate {
                    container: entry.container().name().clone(),
                    class_path: entry.class_path().to_owned(),
                });
            }
        }
    }

    tree.resolve_references();
    debug!(
        "analysis complete: {} container(s), {} class(es), {} warning(s)",
        classes_per_container.len(),
        tree.classes().count(),
        warnings.len()
    );

    Ok(Analysis {
        tree,
        filter,
        entry_points,
        warnings,
        classes_per_container,
    })
}
