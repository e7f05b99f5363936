//! The hierarchy of containers and class leaves, its collapse state, and
//! the projection that state induces.
//!
//! The tree is a single-rooted arena: nodes are stored in one vector and
//! refer to each other by [`NodeId`]. Children are ordered by simple name
//! and names are unique per parent. Class leaves carry the raw reference
//! names extracted from their artifact; after [`Tree::resolve_references`]
//! those names become leaf-to-leaf arcs.
//!
//! Collapse state never alters the raw arcs or the tree structure; it only
//! changes which node stands in for which in the projection.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::{name, Error};

/// Identifies one node in a [`Tree`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeId(usize);

/// How a node's children participate in the projection.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ListMode {
    /// All children are visible.
    #[default]
    Expanded,

    /// Class leaf children are hidden and represented by this node;
    /// container children stay visible.
    LeafsCollapsed,

    /// The whole subtree is hidden and represented by this node.
    Collapsed,
}

/// The kind of a container node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ContainerKind {
    /// The synthetic root above all containers.
    Root,

    /// A directory-backed top level container.
    Directory,

    /// An archive-backed top level container.
    Archive,

    /// A package inside a container.
    Package,
}

/// The payload of a class leaf.
#[derive(Clone, Debug, Default)]
pub struct ClassData {
    /// The referenced qualified class names, as extracted and filtered.
    references: BTreeSet<String>,

    /// Resolved forward arcs, filled by [`Tree::resolve_references`].
    resolved: Vec<NodeId>,

    /// Resolved reverse arcs.
    referenced_by: Vec<NodeId>,

    /// Whether the class declares a main entry point.
    entry_point: bool,
}

/// What a node is: an inner container or a class leaf.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// An inner node with no content of its own.
    Container(ContainerKind),

    /// A class leaf backed by exactly one class artifact.
    Class(ClassData),
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    simple_name: String,
    mode: ListMode,
    kind: NodeKind,
    children: BTreeMap<String, NodeId>,
}

/// The single-rooted tree of containers and class leaves.
///
/// Built once per analysis; afterwards only list modes mutate. Every
/// effective list mode change bumps an epoch counter so that snapshot
/// consumers can detect staleness.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    /// Bare class qualified name (no container prefix) to leaf. The first
    /// definition in classpath order wins.
    classes: HashMap<String, NodeId>,
    epoch: u64,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                simple_name: String::new(),
                mode: ListMode::default(),
                kind: NodeKind::Container(ContainerKind::Root),
                children: BTreeMap::new(),
            }],
            classes: HashMap::new(),
            epoch: 0,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The current collapse epoch, bumped by every effective mode change.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The node's parent; absent only at the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The node's simple name.
    pub fn simple_name(&self, id: NodeId) -> &str {
        &self.node(id).simple_name
    }

    /// The node's list mode.
    pub fn list_mode(&self, id: NodeId) -> ListMode {
        self.node(id).mode
    }

    /// The node's kind.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Whether the node is a class leaf.
    pub fn is_class(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Class(_))
    }

    /// The node's children, in simple-name order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.values().copied()
    }

    /// The dot-joined qualified name of the node; empty for the root.
    pub fn qualified_name(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current != self.root() {
                segments.push(self.node(current).simple_name.as_str());
            }
            cursor = self.node(current).parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// The human display name of the node. Top level container encodings
    /// are decoded; every other node shows its simple name.
    pub fn display_name(&self, id: NodeId) -> String {
        match self.node(id).parent {
            Some(parent) if parent == self.root() => {
                classpath::display_name(&self.node(id).simple_name)
            }
            _ => self.node(id).simple_name.clone(),
        }
    }

    /// Find or create the top level container with the provided encoded
    /// name.
    pub fn add_container(&mut self, kind: ContainerKind, encoded_name: &str) -> NodeId {
        let root = self.root();
        if let Some(existing) = self.node(root).children.get(encoded_name) {
            return *existing;
        }
        self.insert(root, encoded_name.to_string(), NodeKind::Container(kind))
    }

    fn insert(&mut self, parent: NodeId, simple_name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            simple_name: simple_name.clone(),
            mode: ListMode::default(),
            kind,
            children: BTreeMap::new(),
        });
        self.nodes[parent.0].children.insert(simple_name, id);
        id
    }

    /// Add the class artifact at `class_path` (a `/`-separated path without
    /// the `.class` suffix) under the provided container, creating
    /// intermediate package nodes as needed.
    ///
    /// Two artifacts may not share a container and path.
    pub fn add_class(
        &mut self,
        container: NodeId,
        class_path: &str,
        references: BTreeSet<String>,
        entry_point: bool,
    ) -> Result<NodeId, Error> {
        let mut cursor = container;
        let mut segments = class_path.split('/').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                if self.node(cursor).children.contains_key(segment) {
                    return Err(Error::DuplicateClass {
                        container: self.qualified_name(container),
                        path: class_path.to_string(),
                    });
                }
                let id = self.insert(
                    cursor,
                    segment.to_string(),
                    NodeKind::Class(ClassData {
                        references,
                        resolved: Vec::new(),
                        referenced_by: Vec::new(),
                        entry_point,
                    }),
                );
                let bare = class_path.replace('/', ".");
                self.classes.entry(bare).or_insert(id);
                return Ok(id);
            }
            cursor = match self.node(cursor).children.get(segment) {
                Some(existing) => *existing,
                None => self.insert(
                    cursor,
                    segment.to_string(),
                    NodeKind::Container(ContainerKind::Package),
                ),
            };
        }
        Err(Error::DuplicateClass {
            container: self.qualified_name(container),
            path: class_path.to_string(),
        })
    }

    /// Walk the tree child by child along `path`, starting at the root.
    ///
    /// Finds the addressed node even inside collapsed ancestors; returns
    /// `None` if any segment is missing.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.find_from(self.root(), path)
    }

    /// [`Tree::find`], but relative to `from`.
    ///
    /// Child names may themselves contain the separator (container
    /// encodings do); at each step the longest matching child wins.
    pub fn find_from(&self, from: NodeId, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(from);
        }
        let mut cursor = from;
        let mut rest = path;
        loop {
            let mut matched: Option<(&str, NodeId)> = None;
            for (child_name, child) in &self.node(cursor).children {
                let exact = rest == child_name.as_str();
                let prefixed = rest.starts_with(child_name.as_str())
                    && rest.as_bytes().get(child_name.len()) == Some(&(name::SEPARATOR as u8));
                if (exact || prefixed)
                    && matched.map_or(true, |(best, _)| child_name.len() > best.len())
                {
                    matched = Some((child_name, *child));
                }
            }
            let (matched_name, child) = matched?;
            if matched_name.len() == rest.len() {
                return Some(child);
            }
            rest = &rest[matched_name.len() + 1..];
            cursor = child;
        }
    }

    /// Set the node's list mode. The root may not be fully collapsed.
    ///
    /// Bumps the collapse epoch when the mode actually changes; setting a
    /// node to its current mode changes nothing observable.
    pub fn set_list_mode(&mut self, id: NodeId, mode: ListMode) -> Result<(), Error> {
        if id == self.root() && mode == ListMode::Collapsed {
            return Err(Error::CollapseRoot);
        }
        if self.nodes[id.0].mode != mode {
            debug!("list mode of '{}' set to {mode:?}", self.qualified_name(id));
            self.nodes[id.0].mode = mode;
            self.epoch += 1;
        }
        Ok(())
    }

    /// The visible representative of the node under the current collapse
    /// state: the outermost ancestor hiding it, or the node itself.
    ///
    /// Idempotent: `representative(representative(n)) == representative(n)`.
    pub fn representative(&self, id: NodeId) -> NodeId {
        let mut result = id;
        let mut cursor = id;
        while let Some(parent) = self.node(cursor).parent {
            let hides = match self.node(parent).mode {
                ListMode::Collapsed => true,
                ListMode::LeafsCollapsed => cursor == id && self.is_class(id),
                ListMode::Expanded => false,
            };
            if hides {
                result = parent;
            }
            cursor = parent;
        }
        result
    }

    /// Depth-first traversal of the visible nodes strictly below `origin`,
    /// honoring collapse boundaries: children of fully collapsed nodes are
    /// skipped, and class leaf children of leaf-collapsed nodes are
    /// skipped.
    pub fn walk_visible(&self, origin: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = Vec::new();
        self.push_visible_children(origin, &mut stack);
        while let Some(current) = stack.pop() {
            result.push(current);
            self.push_visible_children(current, &mut stack);
        }
        result
    }

    fn push_visible_children(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let node = self.node(id);
        if node.mode == ListMode::Collapsed {
            return;
        }
        let skip_leafs = node.mode == ListMode::LeafsCollapsed;
        // Reverse name order on the stack, so that popping yields name order.
        for child in node.children.values().rev() {
            if skip_leafs && self.is_class(*child) {
                continue;
            }
            stack.push(*child);
        }
    }

    /// Resolve every class's raw reference names to tree leaves and derive
    /// the reverse arcs.
    ///
    /// Targets absent from the tree are discarded: they are outside the
    /// classpath or were filtered away. Call once, after the last
    /// [`Tree::add_class`].
    pub fn resolve_references(&mut self) {
        let leaves: Vec<NodeId> = self.classes_vec();
        let mut forward = Vec::with_capacity(leaves.len());
        for id in leaves {
            let NodeKind::Class(data) = &self.node(id).kind else {
                continue;
            };
            let mut resolved: Vec<NodeId> = data
                .references
                .iter()
                .filter_map(|target| self.classes.get(target).copied())
                .filter(|target| *target != id)
                .collect();
            resolved.sort_unstable();
            resolved.dedup();
            forward.push((id, resolved));
        }

        let mut reverse: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for (source, targets) in &forward {
            for target in targets {
                reverse.entry(*target).or_default().push(*source);
            }
        }

        for (id, resolved) in forward {
            if let NodeKind::Class(data) = &mut self.nodes[id.0].kind {
                data.resolved = resolved;
                data.referenced_by = reverse.remove(&id).unwrap_or_default();
                data.referenced_by.sort_unstable();
            }
        }
    }

    /// Iterate every class leaf in the tree.
    pub fn classes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(move |id| self.is_class(*id))
    }

    fn classes_vec(&self) -> Vec<NodeId> {
        self.classes().collect()
    }

    /// Look up a class leaf by its bare qualified name (no container
    /// prefix). When several containers define the name, the first in
    /// classpath order wins.
    pub fn class_by_name(&self, name: &str) -> Option<NodeId> {
        self.classes.get(name).copied()
    }

    /// The resolved forward arcs of a class leaf; empty for containers.
    pub fn class_references(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Class(data) => &data.resolved,
            NodeKind::Container(_) => &[],
        }
    }

    /// The resolved reverse arcs of a class leaf; empty for containers.
    pub fn class_referenced_by(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Class(data) => &data.referenced_by,
            NodeKind::Container(_) => &[],
        }
    }

    /// Whether the class leaf declares a main entry point.
    pub fn is_entry_point(&self, id: NodeId) -> bool {
        matches!(&self.node(id).kind, NodeKind::Class(data) if data.entry_point)
    }

    /// The class leaves in the subtree rooted at `id`, the node itself
    /// included when it is a leaf. Collapse state is ignored.
    pub fn subtree_classes(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.is_class(current) {
                result.push(current);
            }
            stack.extend(self.node(current).children.values().copied());
        }
        result
    }

    /// The visible successors of a node: the representatives of every
    /// class referenced from inside the node's subtree, the node itself
    /// excepted.
    pub fn visible_successors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.project(id, |class| self.class_references(class))
    }

    /// The inverse of [`Tree::visible_successors`].
    pub fn visible_predecessors(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.project(id, |class| self.class_referenced_by(class))
    }

    fn project<'a>(
        &'a self,
        id: NodeId,
        arcs: impl Fn(NodeId) -> &'a [NodeId],
    ) -> BTreeSet<NodeId> {
        let mut result = BTreeSet::new();
        for class in self.subtree_classes(id) {
            for target in arcs(class) {
                let representative = self.representative(*target);
                if representative != id {
                    result.insert(representative);
                }
            }
        }
        result
    }

    /// Every (source class, target class) pair witnessing that `from`
    /// depends on `to`: sources are inside `from`'s subtree, targets
    /// inside `to`'s, and each source references its target. Empty when no
    /// dependency exists.
    pub fn dependency_reason(&self, from: NodeId, to: NodeId) -> Vec<(NodeId, NodeId)> {
        let targets: BTreeSet<NodeId> = self.subtree_classes(to).into_iter().collect();
        let mut result = Vec::new();
        for source in self.subtree_classes(from) {
            for target in self.class_references(source) {
                if targets.contains(target) {
                    result.push((source, *target));
                }
            }
        }
        result
    }
}
