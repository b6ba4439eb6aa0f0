//! Freeplane mind-map (`.mm`) output.

use crate::domain::IssueType;
use crate::tree::{Forest, Node, NodeId};
use std::fmt::Write as _;

const INFO_COLOR: &str = "#000000";
const INDENT: usize = 4;

/// What goes into one outline document.
#[derive(Debug, Clone)]
pub struct OutlineDocument<'a> {
    pub project: &'a str,
    /// Server base URL, used for the project root link.
    pub server: &'a str,
    pub initiatives: &'a [NodeId],
    pub orphans: &'a [NodeId],
    pub include_description: bool,
}

pub fn render_outline(forest: &Forest, doc: &OutlineDocument<'_>) -> String {
    let mut out = String::new();
    out.push_str("<map version=\"freeplane 1.6.0\">\n");
    let _ = writeln!(
        out,
        "<node LINK=\"{}\" TEXT=\"{}\" FOLDED=\"false\" COLOR=\"{}\" LOCALIZED_STYLE_REF=\"AutomaticLayout.level.root\">",
        escape_attr(&format!("{}/projects/{}", doc.server.trim_end_matches('/'), doc.project)),
        escape_attr(doc.project),
        INFO_COLOR
    );

    for id in doc.initiatives {
        write_node(&mut out, forest, *id, 0, doc.include_description);
    }

    let _ = writeln!(out, "<node TEXT=\"Orphans\" POSITION=\"left\" FOLDED=\"false\" COLOR=\"{INFO_COLOR}\">");
    for id in doc.orphans {
        write_node(&mut out, forest, *id, 0, doc.include_description);
    }
    out.push_str("</node>\n");

    out.push_str("</node>\n</map>\n");
    out
}

fn write_node(out: &mut String, forest: &Forest, id: NodeId, depth: usize, with_desc: bool) {
    let node = forest.get(id);
    let pad = " ".repeat(depth);
    let folded = matches!(node.issue_type(), IssueType::Epic | IssueType::Story);

    let _ = write!(out, "{pad}<node");
    if let Some(url) = node.url() {
        let _ = write!(out, " LINK=\"{}\"", escape_attr(url));
    }
    let _ = writeln!(
        out,
        " TEXT=\"{}/{}: {}\" FOLDED=\"{}\" COLOR=\"{}\">",
        node.issue_type().letter(),
        escape_attr(node.key()),
        escape_attr(node.summary()),
        folded,
        escape_attr(node.color())
    );

    if with_desc {
        if let Some(description) = node.description().filter(|d| !d.trim().is_empty()) {
            write_description(out, &pad, description);
        }
    }
    write_info(out, node, depth + INDENT);

    for child in forest.sorted_children(id) {
        write_node(out, forest, child, depth + INDENT, with_desc);
    }
    let _ = writeln!(out, "{pad}</node>");
}

fn write_info(out: &mut String, node: &Node, depth: usize) {
    let pad = " ".repeat(depth);
    let inner = " ".repeat(depth + INDENT);
    let leaf = " ".repeat(depth + 2 * INDENT);

    let _ = writeln!(out, "{pad}<node TEXT=\"info\" FOLDED=\"true\" COLOR=\"{INFO_COLOR}\">");
    let _ = writeln!(
        out,
        "{inner}<node TEXT=\"Assignee: {}\" FOLDED=\"false\" COLOR=\"{INFO_COLOR}\"/>",
        escape_attr(assignee_label(node))
    );
    let _ = writeln!(out, "{inner}<node TEXT=\"Sponsors\" FOLDED=\"false\" COLOR=\"{INFO_COLOR}\">");
    for sponsor in node.sponsors() {
        let _ = writeln!(
            out,
            "{leaf}<node TEXT=\"{}\" FOLDED=\"false\" COLOR=\"{INFO_COLOR}\"/>",
            escape_attr(sponsor)
        );
    }
    let _ = writeln!(out, "{inner}</node>");
    let _ = writeln!(out, "{pad}</node>");
}

fn write_description(out: &mut String, pad: &str, description: &str) {
    let _ = writeln!(out, "{pad}<richcontent TYPE=\"DETAILS\" HIDDEN=\"true\">");
    out.push_str("<html>\n<head>\n</head>\n<body>\n<p>\n");
    out.push_str(&escape_text(description));
    out.push_str("\n</p>\n</body>\n</html>\n");
    let _ = writeln!(out, "{pad}</richcontent>");
}

pub(crate) fn assignee_label(node: &Node) -> &str {
    node.assignee().unwrap_or("Unassigned")
}

fn escape_text(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;").replace('\n', "&#10;")
}
