//! Indented plain-text dump of a forest.

use crate::render::outline::assignee_label;
use crate::tree::{Forest, NodeId};
use std::fmt::Write as _;

pub fn render_text(forest: &Forest, initiatives: &[NodeId], orphans: &[NodeId]) -> String {
    let mut out = String::new();
    for id in initiatives {
        write_node(&mut out, forest, *id, 0);
    }
    if !orphans.is_empty() {
        out.push_str("Orphans\n");
        for id in orphans {
            write_node(&mut out, forest, *id, 4);
        }
    }
    out
}

fn write_node(out: &mut String, forest: &Forest, id: NodeId, depth: usize) {
    let node = forest.get(id);
    let pad = " ".repeat(depth);
    let _ = writeln!(out, "{pad}{}: {} [{}]", node.key(), node.summary(), node.issue_type());
    let _ = writeln!(out, "{pad}     |   sponsors:    {}", node.sponsors().join(", "));
    let _ = writeln!(out, "{pad}     |   assignee:    {}", assignee_label(node));
    let _ = writeln!(out, "{pad}     |   parent:      {}", node.parent().unwrap_or("-"));
    let _ = writeln!(out, "{pad}     |   state:       {}", node.status().unwrap_or("-"));
    if let Some(url) = node.url() {
        let _ = writeln!(out, "{pad}     |   url:         {url}");
    }
    let _ = writeln!(out, "{pad}     |-> color:       {}", node.color());
    for child in forest.sorted_children(id) {
        write_node(out, forest, child, depth + 4);
    }
}
