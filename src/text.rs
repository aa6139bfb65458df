//! Deferred text assembly for interleaved visit scopes
//!
//! Method bodies are not necessarily visited one after the other: the driver
//! may interleave instruction events from several members before any of them
//! ends. Printing directly to a sequential sink is therefore not possible.
//! Instead every scope appends fragments to its own [`Text`] node, nested
//! nodes are spliced into the parent at the position where the member
//! declaration event occurred, and the whole tree is rendered depth-first
//! once the outermost scope has ended.

use std::cell::RefCell;
use std::rc::Rc;

enum Node {
    Leaf(String),
    Branch(Text),
}

/// A recursive, ordered list of text fragments and nested sub-lists.
///
/// Cloning is shallow: clones share the same underlying node list, which is
/// how a child scope keeps appending to a subtree that was already spliced
/// into its parent. The tree is single-threaded by construction (see the
/// concurrency notes in the crate docs).
#[derive(Clone)]
pub struct Text {
    nodes: Rc<RefCell<Vec<Node>>>,
}

impl Default for Text {
    fn default() -> Text {
        Text::new()
    }
}

impl Text {
    /// An empty tree for a freshly entered scope.
    pub fn new() -> Text {
        Text {
            nodes: Rc::new(RefCell::new(vec![])),
        }
    }

    /// Append a leaf fragment.
    pub fn push_str(&self, fragment: impl Into<String>) {
        self.nodes.borrow_mut().push(Node::Leaf(fragment.into()));
    }

    /// Append a previously built subtree at the current position.
    pub fn append_child(&self, child: &Text) {
        self.nodes.borrow_mut().push(Node::Branch(child.clone()));
    }

    /// Append a fresh empty subtree and return a handle to it.
    ///
    /// The child scope's consumer keeps the handle and fills it in while the
    /// parent continues appending after the splice point.
    pub fn push_child(&self) -> Text {
        let child = Text::new();
        self.append_child(&child);
        child
    }

    /// Depth-first, left-to-right concatenation of all leaf fragments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_to(&mut out);
        out
    }

    /// Write the rendered tree onto the end of `out`.
    pub fn render_to(&self, out: &mut String) {
        for node in self.nodes.borrow().iter() {
            match node {
                Node::Leaf(fragment) => out.push_str(fragment),
                Node::Branch(child) => child.render_to(out),
            }
        }
    }
}

/// Append `s` as a quoted string with escapes for quotes, backslashes, line
/// breaks, and any character outside printable ASCII (`\uXXXX`).
pub fn push_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if (c as u32) < 0x20 || (c as u32) > 0x7f => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
