//! Search tree recording for inspection of the top levels of a search.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TraceNode {
    pub label: String,
    pub children: Vec<TraceNode>,
}

impl TraceNode {
    fn new(label: String) -> Self {
        TraceNode {
            label,
            children: Vec::new(),
        }
    }
}

/// Records move and leaf nodes down to `max_depth` plies below the root.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    root: TraceNode,
    max_depth: usize,
    cursor: Vec<usize>,
}

impl SearchTrace {
    pub fn new(max_depth: usize) -> Self {
        SearchTrace {
            root: TraceNode::new("Root".to_string()),
            max_depth,
            cursor: Vec::new(),
        }
    }

    pub fn root(&self) -> &TraceNode {
        &self.root
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn current(&mut self) -> &mut TraceNode {
        let mut node = &mut self.root;
        for &i in &self.cursor {
            node = &mut node.children[i];
        }
        node
    }

    /// Opens a child of the current node for a move made at `ply`.
    /// Returns false (and records nothing) below the recorded depth.
    pub fn enter<F: FnOnce() -> String>(&mut self, ply: usize, label: F) -> bool {
        if ply >= self.max_depth {
            return false;
        }
        let node = self.current();
        node.children.push(TraceNode::new(label()));
        let idx = node.children.len() - 1;
        self.cursor.push(idx);
        true
    }

    pub fn leave(&mut self) {
        self.cursor.pop();
    }

    /// Attaches a leaf score to the current node.
    pub fn leaf(&mut self, ply: usize, value: f64) {
        if ply <= self.max_depth {
            self.current()
                .children
                .push(TraceNode::new(format!("score: {}", value)));
        }
    }

    /// Appends the top-level nodes of another trace under this root.
    pub fn absorb(&mut self, other: SearchTrace) {
        self.root.children.extend(other.root.children);
    }

    /// Renders the tree with box-drawing guides, one node per line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchTrace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.root.label)?;
        write_children(f, &self.root, "")
    }
}

fn write_children(f: &mut fmt::Formatter, node: &TraceNode, prefix: &str) -> fmt::Result {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(f, "{}{}{}", prefix, branch, child.label)?;
        write_children(f, child, &format!("{}{}", prefix, indent))?;
    }
    Ok(())
}
