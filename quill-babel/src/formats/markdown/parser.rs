//! Markdown parsing (Markdown → Markup tree)
//!
//! Pipeline: Markdown string → pulldown-cmark offset events → Markup tree
//!
//! pulldown-cmark reports a byte range for every event, which is what gives the tree its
//! spans. Events are folded into the tree with an explicit stack of open containers, so deeply
//! nested input never recurses on the native stack; the configured depth limit bounds the
//! stack instead.
//!
//! Text events are kept as `Text` only when their payload equals the source bytes under their
//! range. The parser decodes entities and numeric references, and those decoded runs become
//! `CharacterReference` nodes so that every `Text` value can be located verbatim in the input.

use crate::error::{Dialect, FormatError, ParseError};
use crate::options::MarkupOptions;
use crate::tree::markup::{
    plain_text, CodeBlock, Document, Fence, Heading, Image, InfoString, InlineMath, Leaf, Link,
    List, Literal, Node, Parent,
};
use crate::tree::Span;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag};
use std::ops::Range;

/// Parse Markdown source into a Markup tree.
///
/// The source is taken as-is; frontmatter normalization is the caller's job so that spans
/// always refer to the string passed in here.
pub fn parse_markup(source: &str, options: &MarkupOptions) -> Result<Document, FormatError> {
    let mut builder = TreeBuilder::new(source, options.max_depth);
    for (event, range) in Parser::new_ext(source, parser_options(options)).into_offset_iter() {
        builder.event(event, range)?;
    }
    let doc = builder.finish();
    tracing::debug!(
        bytes = source.len(),
        nodes = doc.node_count(),
        "parsed markdown"
    );
    Ok(doc)
}

fn parser_options(options: &MarkupOptions) -> Options {
    let mut flags = Options::empty();
    if options.math {
        flags.insert(Options::ENABLE_MATH);
    }
    if options.frontmatter {
        flags.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    }
    flags
}

/// A container whose end event has not arrived yet.
enum Open {
    Paragraph,
    Heading(u8),
    BlockQuote,
    List { ordered: bool, start: Option<u64> },
    Item,
    CodeBlock { fenced: bool, info: String },
    HtmlBlock,
    Frontmatter,
    Emphasis,
    Strong,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    /// Constructs outside the supported grammar; children are spliced into the parent.
    Transparent,
}

struct Frame {
    open: Open,
    span: Span,
    children: Vec<Node>,
    /// Raw payload for code, html and frontmatter blocks.
    literal: String,
    /// Set on a list frame when any of its items held a paragraph.
    loose: bool,
}

struct TreeBuilder<'s> {
    source: &'s str,
    max_depth: usize,
    stack: Vec<Frame>,
    root: Vec<Node>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str, max_depth: usize) -> Self {
        Self {
            source,
            max_depth,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) -> Result<(), FormatError> {
        let span = Span::from(range);
        match event {
            Event::Start(tag) => self.open(tag, span)?,
            Event::End(_) => {
                if let Some(frame) = self.stack.pop() {
                    self.close(frame);
                }
            }
            Event::Text(text) => self.text(text, span),
            Event::Code(code) => self.push(Node::InlineCode(Literal {
                value: code.into_string(),
                span: Some(span),
            })),
            Event::InlineMath(math) => self.push(Node::InlineMath(InlineMath {
                value: math.into_string(),
                display: false,
                span: Some(span),
            })),
            Event::DisplayMath(math) => self.push(Node::InlineMath(InlineMath {
                value: math.into_string(),
                display: true,
                span: Some(span),
            })),
            Event::Html(html) => match self.stack.last_mut() {
                Some(frame) if matches!(frame.open, Open::HtmlBlock) => {
                    frame.literal.push_str(&html);
                }
                _ => self.push(Node::Html(Literal {
                    value: html.into_string(),
                    span: Some(span),
                })),
            },
            Event::InlineHtml(html) => self.push(Node::InlineHtml(Literal {
                value: html.into_string(),
                span: Some(span),
            })),
            Event::SoftBreak => self.push(Node::SoftBreak(Leaf { span: Some(span) })),
            Event::HardBreak => self.push(Node::Break(Leaf { span: Some(span) })),
            Event::Rule => self.push(Node::ThematicBreak(Leaf { span: Some(span) })),
            _ => {}
        }
        Ok(())
    }

    fn open(&mut self, tag: Tag<'_>, span: Span) -> Result<(), FormatError> {
        if self.stack.len() >= self.max_depth {
            return Err(
                ParseError::depth_exceeded(Dialect::Markup, Some(span.start), self.max_depth)
                    .into(),
            );
        }

        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, .. } => Open::Heading(level as u8),
            Tag::BlockQuote(_) => Open::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Open::CodeBlock {
                fenced: true,
                info: info.into_string(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Open::CodeBlock {
                fenced: false,
                info: String::new(),
            },
            Tag::HtmlBlock => Open::HtmlBlock,
            Tag::List(start) => Open::List {
                ordered: start.is_some(),
                start,
            },
            Tag::Item => Open::Item,
            Tag::Emphasis => Open::Emphasis,
            Tag::Strong => Open::Strong,
            Tag::Link {
                dest_url, title, ..
            } => Open::Link {
                url: dest_url.into_string(),
                title: non_empty(title),
            },
            Tag::Image {
                dest_url, title, ..
            } => Open::Image {
                url: dest_url.into_string(),
                title: non_empty(title),
            },
            Tag::MetadataBlock(_) => Open::Frontmatter,
            _ => Open::Transparent,
        };

        self.stack.push(Frame {
            open,
            span,
            children: Vec::new(),
            literal: String::new(),
            loose: false,
        });
        Ok(())
    }

    fn text(&mut self, text: CowStr<'_>, span: Span) {
        if let Some(frame) = self.stack.last_mut() {
            if matches!(
                frame.open,
                Open::CodeBlock { .. } | Open::HtmlBlock | Open::Frontmatter
            ) {
                frame.literal.push_str(&text);
                return;
            }
        }

        if span.slice(self.source) != Some(&*text) {
            self.push(Node::CharacterReference(Literal {
                value: text.into_string(),
                span: Some(span),
            }));
            return;
        }

        let children = self.children_mut();
        if let Some(Node::Text(last)) = children.last_mut() {
            if let Some(last_span) = last.span.filter(|s| s.end == span.start) {
                last.value.push_str(&text);
                last.span = Some(last_span.cover(span));
                return;
            }
        }
        children.push(Node::Text(Literal {
            value: text.into_string(),
            span: Some(span),
        }));
    }

    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn close(&mut self, frame: Frame) {
        let Frame {
            open,
            span,
            children,
            literal,
            loose,
        } = frame;
        let span = Some(span);

        let node = match open {
            Open::Paragraph => match display_math(&children).map(|math| math.value.clone()) {
                Some(value) => Node::MathBlock(Literal { value, span }),
                None => Node::Paragraph(Parent { children, span }),
            },
            Open::Heading(depth) => Node::Heading(Heading {
                depth,
                children,
                span,
            }),
            Open::BlockQuote => Node::BlockQuote(Parent { children, span }),
            Open::List { ordered, start } => Node::List(List {
                ordered,
                start,
                tight: !loose,
                children,
                span,
            }),
            Open::Item => {
                let had_paragraph = children
                    .iter()
                    .any(|child| matches!(child, Node::Paragraph(_)));
                if had_paragraph {
                    if let Some(list) = self.stack.last_mut() {
                        list.loose = true;
                    }
                }
                Node::ListItem(Parent {
                    children: wrap_inline_runs(children),
                    span,
                })
            }
            Open::CodeBlock { fenced, info } => self.code_block(fenced, info, literal, span),
            Open::HtmlBlock => Node::Html(Literal {
                value: literal,
                span,
            }),
            Open::Frontmatter => Node::Frontmatter(Literal {
                value: literal,
                span,
            }),
            Open::Emphasis => Node::Emphasis(Parent { children, span }),
            Open::Strong => Node::Strong(Parent { children, span }),
            Open::Link { url, title } => Node::Link(Link {
                url,
                title,
                children,
                span,
            }),
            Open::Image { url, title } => Node::Image(Image {
                url,
                title,
                alt: plain_text(&children),
                span,
            }),
            Open::Transparent => {
                self.children_mut().extend(children);
                return;
            }
        };
        self.push(node);
    }

    fn code_block(&self, fenced: bool, info: String, value: String, span: Option<Span>) -> Node {
        let (fence, info) = match (fenced, span) {
            (true, Some(span)) => {
                let (fence, info_span) = scan_fence(self.source, span.start, &info);
                let info = (!info.is_empty()).then(|| InfoString {
                    value: info,
                    span: info_span,
                });
                (Some(fence), info)
            }
            _ => (None, None),
        };
        Node::CodeBlock(CodeBlock {
            fence,
            info,
            value,
            span,
        })
    }

    fn finish(mut self) -> Document {
        while let Some(frame) = self.stack.pop() {
            self.close(frame);
        }
        Document {
            children: self.root,
            span: Some(Span::new(0, self.source.len())),
        }
    }
}

fn non_empty(value: CowStr<'_>) -> Option<String> {
    (!value.is_empty()).then(|| value.into_string())
}

/// `$$…$$` standing alone in a paragraph.
fn display_math(children: &[Node]) -> Option<&InlineMath> {
    let mut significant = children.iter().filter(|child| match child {
        Node::SoftBreak(_) => false,
        Node::Text(text) => !text.value.trim().is_empty(),
        _ => true,
    });
    match (significant.next(), significant.next()) {
        (Some(Node::InlineMath(math)), None) if math.display => Some(math),
        _ => None,
    }
}

/// Tight list items hold inlines directly; give them the same paragraph shape as loose ones.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    if !children.iter().any(Node::is_inline) {
        return children;
    }

    let mut blocks = Vec::with_capacity(children.len());
    let mut run: Vec<Node> = Vec::new();
    for child in children {
        if child.is_inline() {
            run.push(child);
        } else {
            flush_run(&mut run, &mut blocks);
            blocks.push(child);
        }
    }
    flush_run(&mut run, &mut blocks);
    blocks
}

fn flush_run(run: &mut Vec<Node>, blocks: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let span = run
        .iter()
        .filter_map(Node::span)
        .reduce(|acc, span| acc.cover(span));
    blocks.push(Node::Paragraph(Parent {
        children: std::mem::take(run),
        span,
    }));
}

/// Locates the fence and info string on the opening line of a fenced code block.
fn scan_fence(source: &str, start: usize, info: &str) -> (Fence, Option<Span>) {
    let default = Fence {
        marker: '`',
        length: 3,
    };
    let Some(rest) = source.get(start..) else {
        return (default, None);
    };
    let line = rest.split('\n').next().unwrap_or_default();

    let Some((offset, marker)) = line.char_indices().find(|(_, c)| *c == '`' || *c == '~')
    else {
        return (default, None);
    };
    let length = line[offset..].chars().take_while(|c| *c == marker).count();
    let fence = Fence { marker, length };

    let after = offset + length * marker.len_utf8();
    let tail = &line[after..];
    let lead = tail.len() - tail.trim_start().len();
    let trimmed = tail.trim();
    let info_span = (!info.is_empty() && trimmed == info).then(|| {
        let info_start = start + after + lead;
        Span::new(info_start, info_start + trimmed.len())
    });
    (fence, info_span)
}
