//! Markdown-to-HTML rendering for a single segment.
//!
//! Drives pulldown-cmark and intercepts the event stream: fenced and
//! indented code blocks are routed through the pipeline's registered
//! [`CodeRenderer`](super::CodeRenderer), headings are re-emitted with
//! anchor ids, and table open tags are rewritten with the site's table
//! class after the fact.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

use super::Pipeline;
use super::slug::slugify;

pub(crate) fn render_fragment(source: &str, pipeline: &Pipeline) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut events: Vec<Event> = Vec::new();
    let mut code: Option<CodeCapture> = None;
    let mut heading: Option<HeadingCapture> = None;

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                code = Some(CodeCapture::new(&kind));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(capture) = code.take() {
                    let rendered = pipeline
                        .code_renderer()
                        .render(&capture.text, &capture.lang);
                    events.push(Event::Html(rendered.into()));
                }
            }
            Event::Start(Tag::Heading { level, .. }) if pipeline.heading_anchors() => {
                heading = Some(HeadingCapture {
                    level,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Heading(_)) if pipeline.heading_anchors() => {
                if let Some(capture) = heading.take() {
                    events.push(Event::Html(capture.into_html().into()));
                }
            }
            Event::Text(text) => {
                if let Some(capture) = code.as_mut() {
                    capture.text.push_str(&text);
                } else if let Some(capture) = heading.as_mut() {
                    capture.text.push_str(&text);
                } else {
                    events.push(Event::Text(text));
                }
            }
            Event::Code(text) => {
                if let Some(capture) = heading.as_mut() {
                    capture.text.push_str(&text);
                } else {
                    events.push(Event::Code(text));
                }
            }
            Event::SoftBreak | Event::HardBreak if heading.is_some() => {
                if let Some(capture) = heading.as_mut() {
                    capture.text.push(' ');
                }
            }
            other => {
                // Markup inside a captured code block or heading is dropped;
                // the capture emits its own markup on End.
                if code.is_none() && heading.is_none() {
                    events.push(other);
                }
            }
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());

    if let Some(class) = pipeline.table_class() {
        out = out.replace("<table>", &format!("<table class=\"{class}\">"));
    }
    out
}

struct CodeCapture {
    lang: String,
    text: String,
}

impl CodeCapture {
    fn new(kind: &CodeBlockKind) -> Self {
        let lang = match kind {
            CodeBlockKind::Fenced(info) => {
                info.split_whitespace().next().unwrap_or("").to_string()
            }
            CodeBlockKind::Indented => String::new(),
        };
        Self {
            lang,
            text: String::new(),
        }
    }
}

struct HeadingCapture {
    level: HeadingLevel,
    text: String,
}

impl HeadingCapture {
    fn into_html(self) -> String {
        let id = slugify(&self.text);
        let text = html_escape::encode_text(&self.text);
        format!("<{} id=\"{}\">{}</{}>\n", self.level, id, text, self.level)
    }
}
