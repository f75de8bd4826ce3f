//! Data structures for the scanned tree.
//!
//! A [`Node`] is either a file leaf or a directory with ordered children.
//! Both carry the same [`NodeInfo`] record. Nodes are built once, bottom-up,
//! and never modified after being handed to their parent.

use std::path::{Path, PathBuf};

/// Attributes shared by files and directories.
///
/// # Fields
/// * `name` - Basename, or a root label such as `/`
/// * `full_path` - Absolute, normalized path
/// * `size` - Bytes; for directories the sum of the direct children
/// * `depth` - Distance from the scan root (root = 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: String,
    pub full_path: PathBuf,
    pub size: u64,
    pub depth: usize,
}

/// One element of the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(NodeInfo),
    Directory {
        info: NodeInfo,
        /// Sorted by size, largest first; equal sizes keep enumeration order.
        children: Vec<Node>,
    },
}

impl Node {
    /// Builds a directory node, sorting `children` and summing their sizes.
    pub fn directory(name: String, full_path: PathBuf, depth: usize, mut children: Vec<Node>) -> Self {
        sort_by_size(&mut children);
        let size = children.iter().map(Node::size).sum();
        Node::Directory {
            info: NodeInfo {
                name,
                full_path,
                size,
                depth,
            },
            children,
        }
    }

    /// A directory that could not be listed, or that must not be traversed.
    pub fn empty_directory(name: String, full_path: PathBuf, depth: usize) -> Self {
        Self::directory(name, full_path, depth, Vec::new())
    }

    pub fn file(name: String, full_path: PathBuf, size: u64, depth: usize) -> Self {
        Node::File(NodeInfo {
            name,
            full_path,
            size,
            depth,
        })
    }

    pub fn info(&self) -> &NodeInfo {
        match self {
            Node::File(info) => info,
            Node::Directory { info, .. } => info,
        }
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn full_path(&self) -> &Path {
        &self.info().full_path
    }

    pub fn size(&self) -> u64 {
        self.info().size
    }

    pub fn depth(&self) -> usize {
        self.info().depth
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    /// Direct children; empty for files.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File(_) => &[],
            Node::Directory { children, .. } => children,
        }
    }

    /// Visits this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Sorts nodes by size, largest first. The sort is stable, so nodes of equal
/// size stay in the order they were enumerated.
pub fn sort_by_size(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| b.size().cmp(&a.size()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> Node {
        Node::file(name.to_string(), PathBuf::from("/r").join(name), size, 1)
    }

    #[test]
    fn test_directory_aggregates_and_sorts() {
        let dir = Node::directory(
            "r".to_string(),
            PathBuf::from("/r"),
            0,
            vec![file("small", 10), file("big", 300), file("mid", 50)],
        );

        assert_eq!(dir.size(), 360);
        let names: Vec<&str> = dir.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_equal_sizes_keep_enumeration_order() {
        let mut nodes = vec![
            file("first", 5),
            file("large", 9),
            file("second", 5),
            file("third", 5),
        ];
        sort_by_size(&mut nodes);

        let names: Vec<&str> = nodes.iter().map(Node::name).collect();
        assert_eq!(names, vec!["large", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = Node::empty_directory("denied".to_string(), PathBuf::from("/r/denied"), 1);
        assert!(dir.is_folder());
        assert_eq!(dir.size(), 0);
        assert!(dir.children().is_empty());
    }

    #[test]
    fn test_file_has_no_children() {
        let leaf = file("a.txt", 1);
        assert!(!leaf.is_folder());
        assert!(leaf.children().is_empty());
        assert_eq!(leaf.full_path(), Path::new("/r/a.txt"));
    }

    #[test]
    fn test_walk_visits_every_node() {
        let inner = Node::directory("sub".to_string(), PathBuf::from("/r/sub"), 1, vec![file("c", 3)]);
        let root = Node::directory("r".to_string(), PathBuf::from("/r"), 0, vec![inner, file("a", 2)]);

        let mut seen = Vec::new();
        root.walk(&mut |node| seen.push(node.name().to_string()));
        assert_eq!(seen, vec!["r", "sub", "c", "a"]);
    }
}
