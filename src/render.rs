//! Conversion of a scanned tree into the document consumed by front ends.
//!
//! The document mirrors the tree one-to-one, with two additions:
//! - Top-level `file_count` / `folder_count` from the run summary
//! - A synthetic `[Free Disk Space]` leaf when the scan root is a
//!   filesystem root (`/`, `C:\`), sized from the filesystem's free bytes
//!
//! The free-space leaf is not part of the walked tree. It is never counted
//! in `file_count` and does not change the root's `size`.

use crate::data::Node;
use crate::error::ScanError;
use crate::profile::SpaceProbe;
use crate::run::RunSummary;
use crate::utils::is_filesystem_root;
use serde::Serialize;

/// Label of the synthetic free-space leaf.
pub const FREE_SPACE_NAME: &str = "[Free Disk Space]";

/// One node of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNode {
    pub name: String,
    pub size: u64,
    pub is_folder: bool,
    pub is_free_space: bool,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// Present on directories only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RenderedNode>>,
}

/// The root node plus run-level counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeDocument {
    #[serde(flatten)]
    pub root: RenderedNode,
    pub file_count: u64,
    pub folder_count: u64,
    /// Set only when a free-space leaf was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_free: Option<u64>,
}

/// Either a tree or `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Tree(TreeDocument),
    Error { error: String },
}

impl Document {
    pub fn from_error(err: &ScanError) -> Self {
        Document::Error {
            error: err.to_string(),
        }
    }
}

/// Rendering switches.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub include_free_space: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_free_space: true,
        }
    }
}

/// Renders `root` and its run summary into a [`TreeDocument`].
///
/// `probe` is consulted only when `root` is a filesystem root. If it cannot
/// report the free space, no free-space leaf is added.
pub fn render(
    root: &Node,
    summary: &RunSummary,
    probe: &dyn SpaceProbe,
    options: &RenderOptions,
) -> TreeDocument {
    let mut rendered = render_node(root);
    let mut disk_total = None;
    let mut disk_free = None;

    if options.include_free_space && is_filesystem_root(root.full_path()) {
        if let Some(space) = probe.disk_space(root.full_path()) {
            rendered.children.get_or_insert_with(Vec::new).push(RenderedNode {
                name: FREE_SPACE_NAME.to_string(),
                size: space.free,
                is_folder: false,
                is_free_space: true,
                depth: root.depth() + 1,
                full_path: None,
                children: None,
            });
            disk_total = Some(space.total);
            disk_free = Some(space.free);
        }
    }

    TreeDocument {
        root: rendered,
        file_count: summary.file_count,
        folder_count: summary.directory_count,
        disk_total,
        disk_free,
    }
}

fn render_node(node: &Node) -> RenderedNode {
    RenderedNode {
        name: node.name().to_string(),
        size: node.size(),
        is_folder: node.is_folder(),
        is_free_space: false,
        depth: node.depth(),
        full_path: Some(node.full_path().to_string_lossy().into_owned()),
        children: match node {
            Node::File(_) => None,
            Node::Directory { children, .. } => Some(children.iter().map(render_node).collect()),
        },
    }
}
