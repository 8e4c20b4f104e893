//! Text rendering of a tree and its per-node status.

use std::fmt::Write;

use turtle_core::{Status, TurtleDriver};

use crate::bt::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_status: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { show_status: true }
    }
}

fn marker(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Sequence => "{-}",
        NodeKind::Selector => "{o}",
        NodeKind::Parallel => "/_/",
        NodeKind::Leaf => "-->",
    }
}

fn glyph(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Failure => "✕",
        Status::Running => "*",
        Status::Invalid => "-",
    }
}

pub fn unicode_tree<D>(root: &Node<D>, options: RenderOptions) -> String
where
    D: TurtleDriver,
{
    let mut out = String::new();
    root.walk(&mut |node, depth| {
        let indent = "    ".repeat(depth);
        let _ = write!(out, "{indent}{} {}", marker(node.kind()), node.name());
        if options.show_status {
            let _ = write!(out, " [{}]", glyph(node.status()));
        }
        out.push('\n');
    });
    out
}
