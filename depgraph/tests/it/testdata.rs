//! Helpers for building trees and on-disk class fixtures.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use depgraph::{ContainerKind, NodeId, Tree};

/// Build a tree holding one directory container with top level classes
/// wired according to `arcs`. Returns the tree and the container node.
pub fn graph_tree(nodes: &[&str], arcs: &[(&str, &str)]) -> (Tree, NodeId) {
    let mut tree = Tree::new();
    let container = tree.add_container(ContainerKind::Directory, "dir:/graph");
    for node in nodes {
        let references: BTreeSet<String> = arcs
            .iter()
            .filter(|(source, _)| source == node)
            .map(|(_, target)| target.to_string())
            .collect();
        tree.add_class(container, node, references, false)
            .expect("add class");
    }
    tree.resolve_references();
    (tree, container)
}

fn push_utf8(pool: &mut Vec<u8>, next: &mut u16, value: &str) -> u16 {
    pool.push(1);
    pool.extend((value.len() as u16).to_be_bytes());
    pool.extend(value.as_bytes());
    let index = *next;
    *next += 1;
    index
}

fn push_class(pool: &mut Vec<u8>, next: &mut u16, name: &str) -> u16 {
    let name = push_utf8(pool, next, name);
    pool.push(7);
    pool.extend(name.to_be_bytes());
    let index = *next;
    *next += 1;
    index
}

/// Emit a minimal class artifact defining `name` (in internal `/` form),
/// referencing `refs` through Class constants, optionally with a
/// `public static void main(String[])` method.
pub fn class_bytes(name: &str, refs: &[&str], main: bool) -> Vec<u8> {
    let mut pool = Vec::new();
    let mut next = 1u16;
    let this = push_class(&mut pool, &mut next, name);
    let object = push_class(&mut pool, &mut next, "java/lang/Object");
    for target in refs {
        push_class(&mut pool, &mut next, target);
    }
    let main_indices = main.then(|| {
        (
            push_utf8(&mut pool, &mut next, "main"),
            push_utf8(&mut pool, &mut next, "([Ljava/lang/String;)V"),
        )
    });

    let mut out = Vec::new();
    out.extend(0xCAFE_BABEu32.to_be_bytes());
    out.extend(0u16.to_be_bytes()); // minor version
    out.extend(52u16.to_be_bytes()); // major version
    out.extend(next.to_be_bytes());
    out.extend(pool);
    out.extend(0x0021u16.to_be_bytes()); // access flags
    out.extend(this.to_be_bytes());
    out.extend(object.to_be_bytes());
    out.extend(0u16.to_be_bytes()); // interfaces
    out.extend(0u16.to_be_bytes()); // fields
    match main_indices {
        Some((name, descriptor)) => {
            out.extend(1u16.to_be_bytes());
            out.extend(0x0009u16.to_be_bytes()); // public static
            out.extend(name.to_be_bytes());
            out.extend(descriptor.to_be_bytes());
            out.extend(0u16.to_be_bytes()); // attributes
        }
        None => out.extend(0u16.to_be_bytes()),
    }
    out.extend(0u16.to_be_bytes()); // class attributes
    out
}

/// Write the artifact for `name` (internal `/` form) at its package path
/// under `root`.
pub fn class_file(root: &Path, name: &str, refs: &[&str], main: bool) {
    let path = root.join(format!("{name}.class"));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create package directories");
    }
    fs::write(path, class_bytes(name, refs, main)).expect("write class artifact");
}
