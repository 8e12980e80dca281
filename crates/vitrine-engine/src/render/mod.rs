//! The markdown rendering pipeline.
//!
//! Container rules and the code renderer are installed once at
//! configuration time; [`Pipeline::render`] is then invoked synchronously
//! once per document. Rendering holds no state across calls, so a single
//! pipeline may be shared across documents and threads.

pub mod code;
pub mod container;
mod markdown;
pub mod slug;

#[cfg(test)]
mod tests;

pub use code::{
    CodeRenderer, FencedCodeRenderer, HIGHLIGHT_CLASS, HighlightDecorator,
    decode_numeric_entities, inject_highlight_class,
};
pub use container::{ContainerRule, ContainerToken, DEMO_CLOSE, DEMO_OPEN, Nesting};
pub use slug::slugify;

use container::{Segment, segment_source};

/// Table class applied by the standard docs pipeline.
pub const TABLE_CLASS: &str = "vitrine-table";

/// A configured document renderer.
pub struct Pipeline {
    containers: Vec<ContainerRule>,
    code: Box<dyn CodeRenderer + Send + Sync>,
    table_class: Option<String>,
    heading_anchors: bool,
}

impl Pipeline {
    /// An empty pipeline: no container rules, base fenced-code rendering,
    /// no table class, no heading anchors.
    pub fn new() -> Self {
        Self {
            containers: Vec::new(),
            code: Box::new(FencedCodeRenderer),
            table_class: None,
            heading_anchors: false,
        }
    }

    /// The standard docs-site pipeline: demo containers, highlight-tagged
    /// code rendering, the site table class, and heading anchors.
    pub fn docs() -> Self {
        Self::new()
            .with_container(ContainerRule::demo())
            .with_code_renderer(HighlightDecorator::new(FencedCodeRenderer))
            .with_table_class(TABLE_CLASS)
            .with_heading_anchors(true)
    }

    /// Registers a container rule. Rules are tried in registration order.
    pub fn with_container(mut self, rule: ContainerRule) -> Self {
        self.containers.push(rule);
        self
    }

    /// Replaces the code-block renderer.
    pub fn with_code_renderer<R>(mut self, renderer: R) -> Self
    where
        R: CodeRenderer + Send + Sync + 'static,
    {
        self.code = Box::new(renderer);
        self
    }

    /// Sets the class written onto every table open tag.
    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = Some(class.into());
        self
    }

    pub fn with_heading_anchors(mut self, enabled: bool) -> Self {
        self.heading_anchors = enabled;
        self
    }

    /// Renders one markdown document to an HTML fragment.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();
        for segment in segment_source(source, &self.containers) {
            match segment {
                Segment::Markdown(markdown) => {
                    out.push_str(&markdown::render_fragment(&markdown, self));
                }
                Segment::Fragment(html) => out.push_str(&html),
            }
        }
        log::trace!(
            "rendered {} bytes of markdown into {} bytes of html",
            source.len(),
            out.len()
        );
        out
    }

    pub(crate) fn code_renderer(&self) -> &dyn CodeRenderer {
        self.code.as_ref()
    }

    pub(crate) fn table_class(&self) -> Option<&str> {
        self.table_class.as_deref()
    }

    pub(crate) fn heading_anchors(&self) -> bool {
        self.heading_anchors
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
