//! Body rendering: markdown to typed blocks and HTML
//!
//! The renderer walks the body once per build and produces two things side
//! by side: a finite sequence of typed [`Block`]s (the structural view the
//! assembler and tests work with) and the display HTML. Rendering is pure,
//! so the same source always yields the same block sequence.

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::BuildError;

lazy_static! {
    static ref ASIDE_OPEN: Regex = Regex::new(r"^:::\s*aside\s*$").unwrap();
    static ref ASIDE_CLOSE: Regex = Regex::new(r"^:::\s*$").unwrap();
}

/// A typed body block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    Paragraph(String),
    Heading {
        level: u8,
        text: String,
    },
    /// Fenced code block, preserved verbatim (snippets are illustrative,
    /// never reformatted)
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    /// Inline or reference link, emitted in document order
    Link {
        text: String,
        href: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    FootnoteDef {
        id: String,
        text: String,
    },
    /// Raised aside, delimited by `:::aside` / `:::` marker lines
    Aside(String),
}

/// The output of rendering one body
#[derive(Debug, Clone)]
pub struct Rendered {
    pub blocks: Vec<Block>,
    pub html: String,
}

impl Rendered {
    /// Footnote definitions present in the body
    pub fn footnotes(&self) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::FootnoteDef { .. }))
            .collect()
    }
}

/// A pluggable body markup renderer
pub trait MarkupRenderer {
    fn render(&self, body: &str) -> Result<Rendered, BuildError>;
}

/// Default renderer built on pulldown-cmark
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer for MarkdownRenderer {
    fn render(&self, body: &str) -> Result<Rendered, BuildError> {
        let mut blocks = Vec::new();
        let mut html = String::new();
        let mut footnotes = FootnoteTracker::default();

        for segment in split_asides(body) {
            match segment {
                Segment::Markdown(text) => {
                    render_segment(&text, &mut blocks, &mut html, &mut footnotes);
                }
                Segment::Aside(text) => {
                    // The aside body is markdown too, but its inner blocks
                    // stay out of the top-level sequence
                    let mut inner = Vec::new();
                    html.push_str("<aside>\n");
                    render_segment(&text, &mut inner, &mut html, &mut footnotes);
                    html.push_str("</aside>\n");
                    blocks.push(Block::Aside(text.trim().to_string()));
                }
            }
        }

        // Every reference needs a definition by the time rendering completes
        for id in &footnotes.references {
            if !footnotes.definitions.contains(id) {
                return Err(BuildError::UnresolvedFootnote { id: id.clone() });
            }
        }

        Ok(Rendered { blocks, html })
    }
}

/// Footnote references and definitions seen so far, shared across segments
#[derive(Default)]
struct FootnoteTracker {
    references: Vec<String>,
    definitions: HashSet<String>,
}

enum Segment {
    Markdown(String),
    Aside(String),
}

/// Split the body on `:::aside` / `:::` marker pairs.
///
/// An unterminated opening marker raises the rest of the document, matching
/// fence behavior in CommonMark.
fn split_asides(body: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_aside = false;
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") || line.trim_start().starts_with("~~~") {
            in_fence = !in_fence;
            current.push_str(line);
            current.push('\n');
        } else if in_fence {
            // Marker lines inside a code fence are literal text
            current.push_str(line);
            current.push('\n');
        } else if !in_aside && ASIDE_OPEN.is_match(line) {
            if !current.trim().is_empty() {
                segments.push(Segment::Markdown(std::mem::take(&mut current)));
            } else {
                current.clear();
            }
            in_aside = true;
        } else if in_aside && ASIDE_CLOSE.is_match(line) {
            segments.push(Segment::Aside(std::mem::take(&mut current)));
            in_aside = false;
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }

    if in_aside {
        segments.push(Segment::Aside(current));
    } else if !current.trim().is_empty() {
        segments.push(Segment::Markdown(current));
    }

    segments
}

/// Render one markdown segment, appending typed blocks and HTML
fn render_segment(
    source: &str,
    blocks: &mut Vec<Block>,
    html_out: &mut String,
    footnotes: &mut FootnoteTracker,
) {
    // ENABLE_OLD_FOOTNOTES rather than ENABLE_FOOTNOTES: the GitHub-style
    // parser turns a reference with no matching definition back into plain
    // text, which would hide it from resolution checking.
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_OLD_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(source, options);

    let mut events: Vec<Event> = Vec::new();

    // Block extraction state
    let mut code_lang: Option<String> = None;
    let mut in_code = false;
    let mut code_buf = String::new();
    let mut heading: Option<(u8, String)> = None;
    let mut para_buf = String::new();
    let mut link: Option<(String, String)> = None; // (href, text)
    let mut footnote_def: Option<(String, String)> = None;
    let mut table: Option<TableState> = None;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code_lang = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.to_string();
                        if lang.is_empty() {
                            None
                        } else {
                            Some(lang)
                        }
                    }
                    CodeBlockKind::Indented => None,
                };
                in_code = true;
                code_buf.clear();
            }
            Event::End(TagEnd::CodeBlock) => {
                events.push(Event::Html(CowStr::from(code_block_html(
                    &code_buf,
                    code_lang.as_deref(),
                ))));
                blocks.push(Block::CodeBlock {
                    lang: code_lang.take(),
                    code: code_buf.clone(),
                });
                in_code = false;
            }

            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((heading_level(level), String::new()));
                events.push(Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes: Vec::new(),
                    attrs: Vec::new(),
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some((lvl, text)) = heading.take() {
                    blocks.push(Block::Heading { level: lvl, text });
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }

            Event::Start(Tag::Paragraph) => {
                para_buf.clear();
                events.push(Event::Start(Tag::Paragraph));
            }
            Event::End(TagEnd::Paragraph) => {
                let text = para_buf.trim().to_string();
                if let Some((_, body)) = footnote_def.as_mut() {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(&text);
                } else if !text.is_empty() {
                    blocks.push(Block::Paragraph(text));
                }
                para_buf.clear();
                events.push(Event::End(TagEnd::Paragraph));
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                link = Some((dest_url.to_string(), String::new()));
                events.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }));
            }
            Event::End(TagEnd::Link) => {
                if let Some((href, text)) = link.take() {
                    blocks.push(Block::Link { text, href });
                }
                events.push(Event::End(TagEnd::Link));
            }

            Event::Start(Tag::FootnoteDefinition(name)) => {
                footnotes.definitions.insert(name.to_string());
                footnote_def = Some((name.to_string(), String::new()));
                events.push(Event::Start(Tag::FootnoteDefinition(name)));
            }
            Event::End(TagEnd::FootnoteDefinition) => {
                if let Some((id, text)) = footnote_def.take() {
                    blocks.push(Block::FootnoteDef { id, text });
                }
                events.push(Event::End(TagEnd::FootnoteDefinition));
            }
            Event::FootnoteReference(name) => {
                footnotes.references.push(name.to_string());
                events.push(Event::FootnoteReference(name));
            }

            Event::Start(Tag::Table(alignments)) => {
                table = Some(TableState::default());
                events.push(Event::Start(Tag::Table(alignments)));
            }
            Event::Start(Tag::TableHead) => {
                if let Some(t) = table.as_mut() {
                    t.in_head = true;
                }
                events.push(Event::Start(Tag::TableHead));
            }
            Event::End(TagEnd::TableHead) => {
                if let Some(t) = table.as_mut() {
                    t.in_head = false;
                }
                events.push(Event::End(TagEnd::TableHead));
            }
            Event::Start(Tag::TableCell) => {
                if let Some(t) = table.as_mut() {
                    t.cell.clear();
                }
                events.push(Event::Start(Tag::TableCell));
            }
            Event::End(TagEnd::TableCell) => {
                if let Some(t) = table.as_mut() {
                    let cell = std::mem::take(&mut t.cell);
                    if t.in_head {
                        t.header.push(cell.trim().to_string());
                    } else {
                        t.row.push(cell.trim().to_string());
                    }
                }
                events.push(Event::End(TagEnd::TableCell));
            }
            Event::End(TagEnd::TableRow) => {
                if let Some(t) = table.as_mut() {
                    t.rows.push(std::mem::take(&mut t.row));
                }
                events.push(Event::End(TagEnd::TableRow));
            }
            Event::End(TagEnd::Table) => {
                if let Some(t) = table.take() {
                    blocks.push(Block::Table {
                        header: t.header,
                        rows: t.rows,
                    });
                }
                events.push(Event::End(TagEnd::Table));
            }

            Event::Text(text) => {
                if in_code {
                    code_buf.push_str(&text);
                } else {
                    route_text(
                        &text,
                        &mut link,
                        &mut table,
                        &mut heading,
                        &mut para_buf,
                    );
                    events.push(Event::Text(text));
                }
            }
            Event::Code(text) => {
                route_text(
                    &text,
                    &mut link,
                    &mut table,
                    &mut heading,
                    &mut para_buf,
                );
                events.push(Event::Code(text));
            }
            Event::SoftBreak => {
                route_text(" ", &mut link, &mut table, &mut heading, &mut para_buf);
                events.push(Event::SoftBreak);
            }
            Event::HardBreak => {
                route_text(" ", &mut link, &mut table, &mut heading, &mut para_buf);
                events.push(Event::HardBreak);
            }

            other => {
                events.push(other);
            }
        }
    }

    html::push_html(html_out, events.into_iter());
}

#[derive(Default)]
struct TableState {
    in_head: bool,
    cell: String,
    header: Vec<String>,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Append inline text to every active collector
fn route_text(
    text: &str,
    link: &mut Option<(String, String)>,
    table: &mut Option<TableState>,
    heading: &mut Option<(u8, String)>,
    para_buf: &mut String,
) {
    if let Some((_, link_text)) = link.as_mut() {
        link_text.push_str(text);
    }
    if let Some(t) = table.as_mut() {
        t.cell.push_str(text);
        return;
    }
    if let Some((_, heading_text)) = heading.as_mut() {
        heading_text.push_str(text);
        return;
    }
    para_buf.push_str(text);
}

fn heading_level(level: pulldown_cmark::HeadingLevel) -> u8 {
    use pulldown_cmark::HeadingLevel::*;
    match level {
        H1 => 1,
        H2 => 2,
        H3 => 3,
        H4 => 4,
        H5 => 5,
        H6 => 6,
    }
}

/// Emit a code block verbatim, HTML-escaped only
fn code_block_html(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            lang,
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
    }
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
