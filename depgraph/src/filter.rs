//! Name based filtering of sources, reference targets, and focus.

use lazy_static::lazy_static;
use regex::RegexSet;

use crate::Error;

/// Container names that are never opened: JRE installations and build
/// resource trees.
pub const DEFAULT_IGNORED_SOURCES: &[&str] = &[
    r"dir:.*[/\\]jre[/\\].*",
    r"dir:.*[/\\]jdk[/\\].*",
    r"dir:.*[/\\]build[/\\]resources[/\\].*",
];

/// Class names that become neither nodes nor reference targets: the Java
/// platform, module descriptors, and versioned `META-INF` artifacts.
pub const DEFAULT_IGNORED_CLASSES: &[&str] =
    &[r"^java\..*", r".*module-info$", r"^META-INF\..*"];

/// Names considered part of the project under analysis. By default only
/// directory-backed containers are in focus; archives contribute
/// dependencies but their classes are taken for granted.
pub const DEFAULT_FOCUS: &[&str] = &[r"^dir:.*"];

lazy_static! {
    static ref DEFAULT: Filter = Filter::new(
        DEFAULT_IGNORED_SOURCES,
        DEFAULT_IGNORED_CLASSES,
        DEFAULT_FOCUS,
    )
    .expect("default filter rules must compile");
}

/// Decides which sources are opened, which referenced classes are kept as
/// arcs, and which nodes are in focus (analyzed rather than taken for
/// granted).
#[derive(Clone, Debug)]
pub struct Filter {
    ignored_sources: RegexSet,
    ignored_classes: RegexSet,
    focus: RegexSet,
}

impl Filter {
    /// Build a filter from three rule lists of regular expressions.
    pub fn new(
        ignored_sources: &[&str],
        ignored_classes: &[&str],
        focus: &[&str],
    ) -> Result<Self, Error> {
        Ok(Self {
            ignored_sources: RegexSet::new(ignored_sources)?,
            ignored_classes: RegexSet::new(ignored_classes)?,
            focus: RegexSet::new(focus)?,
        })
    }

    /// Whether the named container is skipped without being opened.
    pub fn ignores_source(&self, name: &str) -> bool {
        self.ignored_sources.is_match(name)
    }

    /// Whether the named class is dropped, both as a node and as a
    /// reference target.
    pub fn ignores_class(&self, name: &str) -> bool {
        self.ignored_classes.is_match(name)
    }

    /// Whether the named node belongs to the project under analysis.
    pub fn in_focus(&self, name: &str) -> bool {
        self.focus.is_match(name)
    }
}

impl Default for Filter {
    fn default() -> Self {
        DEFAULT.clone()
    }
}
