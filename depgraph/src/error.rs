use thiserror::Error;

/// Errors reported by the dependency graph engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The classpath contained no usable containers.
    #[error("classpath contains no usable entries: {classpath}")]
    EmptyClasspath {
        /// The classpath string as provided by the caller.
        classpath: String,
    },

    /// The root of the hierarchy cannot be fully collapsed.
    #[error("the root node cannot be collapsed")]
    CollapseRoot,

    /// Two class artifacts mapped to the same node.
    #[error("class path {path} already exists in container {container}")]
    DuplicateClass {
        /// The qualified name of the container.
        container: String,

        /// The container-relative class path.
        path: String,
    },

    /// A filter rule failed to compile.
    #[error("invalid filter rule")]
    Rule(#[from] regex::Error),

    /// Edge density is undefined for graphs with fewer than two nodes.
    #[error("edge density is undefined for a graph of {nodes} node(s)")]
    DegenerateGraph {
        /// The number of visible nodes in the graph.
        nodes: usize,
    },

    /// Cooperative cancellation was observed during a long computation.
    #[error("cancelled")]
    Cancelled,
}
