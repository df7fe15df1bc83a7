//! Markdown rendering into the content tree using comrak
//!
//! Parses a note with comrak and materializes its block structure as
//! elements (`h1`..`h6`, `p`, `ul`/`ol` > `li`, `pre` > `code`, `blockquote`,
//! `table`, `hr`, `img`, `div`). Every render replaces the root's children,
//! so element handles from a previous render go dead.

use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};
use log::debug;
use std::collections::HashMap;

use super::tree::{ContentTree, NodeId};
use crate::toc::slugify;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Enable front matter (YAML/TOML), which is skipped when rendering
    pub front_matter_delimiter: Option<String>,
    /// Give headings GitHub-style `id` attributes
    pub heading_ids: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            front_matter_delimiter: Some("---".to_string()),
            heading_ids: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.front_matter_delimiter = self.front_matter_delimiter.clone();
        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Render `source` into `root`, replacing whatever the root held before.
pub fn render_markdown(tree: &mut ContentTree, root: NodeId, source: &str) {
    render_markdown_with_options(tree, root, source, &MarkdownOptions::default());
}

/// Render `source` into `root` with custom options.
pub fn render_markdown_with_options(
    tree: &mut ContentTree,
    root: NodeId,
    source: &str,
    options: &MarkdownOptions,
) {
    let arena = Arena::new();
    let document = parse_document(&arena, source, &options.to_comrak_options());

    tree.clear_children(root);
    let mut ctx = RenderContext {
        tree,
        options,
        used_ids: HashMap::new(),
    };
    for child in document.children() {
        ctx.convert_block(child, root);
    }

    debug!(
        "Rendered markdown into {} top-level blocks",
        ctx.tree.children(root).len()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

struct RenderContext<'t, 'o> {
    tree: &'t mut ContentTree,
    options: &'o MarkdownOptions,
    used_ids: HashMap<String, usize>,
}

impl RenderContext<'_, '_> {
    fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.tree.create_element(tag);
        self.tree.append_child(parent, node);
        node
    }

    fn convert_block<'a>(&mut self, node: &'a AstNode<'a>, parent: NodeId) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::FrontMatter(_) => {}
            NodeValue::Heading(heading) => {
                let level = heading.level.clamp(1, 6);
                let el = self.element(parent, &format!("h{}", level));
                let text = inline_text(node);
                if self.options.heading_ids {
                    let id = self.unique_id(&text);
                    self.tree.set_element_id(el, Some(&id));
                }
                self.tree.set_text(el, &text);
            }
            NodeValue::Paragraph => {
                let el = self.element(parent, "p");
                self.tree.set_text(el, inline_text(node).trim());
                for _ in 0..count_images(node) {
                    self.element(el, "img");
                }
            }
            NodeValue::List(list) => {
                let tag = match list.list_type {
                    ListType::Bullet => "ul",
                    ListType::Ordered => "ol",
                };
                let el = self.element(parent, tag);
                for item in node.children() {
                    self.convert_list_item(item, el);
                }
            }
            NodeValue::CodeBlock(code) => {
                let pre = self.element(parent, "pre");
                let el = self.element(pre, "code");
                self.tree.set_text(el, code.literal.trim_end_matches('\n'));
            }
            NodeValue::BlockQuote => {
                let el = self.element(parent, "blockquote");
                for child in node.children() {
                    self.convert_block(child, el);
                }
            }
            NodeValue::Table(_) => {
                let el = self.element(parent, "table");
                self.tree.set_text(el, &table_text(node));
            }
            NodeValue::ThematicBreak => {
                self.element(parent, "hr");
            }
            NodeValue::HtmlBlock(html) => {
                let el = self.element(parent, "div");
                self.tree.set_text(el, html.literal.trim());
            }
            _ => {
                // Footnote definitions, description lists and anything newer
                let el = self.element(parent, "div");
                for child in node.children() {
                    self.convert_block(child, el);
                }
            }
        }
    }

    fn convert_list_item<'a>(&mut self, item: &'a AstNode<'a>, list: NodeId) {
        let li = self.element(list, "li");
        let mut text = Vec::new();
        if let NodeValue::TaskItem(checked) = &item.data.borrow().value {
            let marker = if checked.is_some() { "☑" } else { "☐" };
            text.push(marker.to_string());
        }
        let mut nested = Vec::new();
        for child in item.children() {
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            if is_paragraph {
                text.push(inline_text(child).trim().to_string());
            } else {
                nested.push(child);
            }
        }
        self.tree.set_text(li, &text.join(" "));
        for child in nested {
            self.convert_block(child, li);
        }
    }

    /// GitHub-style heading id: slug, with `-1`, `-2`... for repeats.
    fn unique_id(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };
        let count = self.used_ids.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        id
    }
}

/// Visible text of an inline subtree.
fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    collect_inline_text(node, &mut out);
    out
}

fn collect_inline_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(t) => out.push_str(t),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak => out.push(' '),
            NodeValue::LineBreak => out.push('\n'),
            NodeValue::Image(_) | NodeValue::HtmlInline(_) => continue,
            _ => {}
        }
        collect_inline_text(child, out);
    }
}

fn count_images<'a>(node: &'a AstNode<'a>) -> usize {
    node.descendants()
        .filter(|n| matches!(n.data.borrow().value, NodeValue::Image(_)))
        .count()
}

fn table_text<'a>(table: &'a AstNode<'a>) -> String {
    table
        .children()
        .map(|row| {
            row.children()
                .map(|cell| inline_text(cell).trim().to_string())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
