//! Container fences for live demo blocks.
//!
//! Documentation authors bracket an example with `::: demo [caption]` and
//! `:::`. Each recognized fence is rewritten into markup the front-end
//! demo component mounts into; everything between the fences stays ordinary
//! markdown.

use std::sync::OnceLock;

use regex::Regex;

/// Markup emitted when a demo container opens: a `highlight` slot for the
/// source listing, with the default slot left for the live example.
pub const DEMO_OPEN: &str = r#"<demo-block class="demo-box"><div class="highlight" slot="highlight">"#;

/// Markup emitted when a demo container closes.
pub const DEMO_CLOSE: &str = "</div></demo-block>\n";

/// Direction of a container fence token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    Enter,
    Exit,
}

/// A recognized container fence.
///
/// Produced by the fence scanner and consumed immediately by the matching
/// rule's renderer; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerToken {
    pub nesting: Nesting,
    /// Raw parameter text following the fence marker on the opening line.
    pub params: String,
}

type Validator = Box<dyn Fn(&str) -> bool + Send + Sync>;
type Renderer = Box<dyn Fn(&ContainerToken) -> String + Send + Sync>;

/// A container rule: tag name, a validator deciding whether a fence line's
/// parameter text opens this container, and a renderer deciding the markup
/// that replaces each token.
///
/// Rules are plain values holding two function references; they are
/// registered once on a [`Pipeline`](super::Pipeline) and invoked per
/// document during rendering.
pub struct ContainerRule {
    tag: String,
    validate: Validator,
    render: Renderer,
}

impl ContainerRule {
    pub fn new<V, R>(tag: impl Into<String>, validate: V, render: R) -> Self
    where
        V: Fn(&str) -> bool + Send + Sync + 'static,
        R: Fn(&ContainerToken) -> String + Send + Sync + 'static,
    {
        Self {
            tag: tag.into(),
            validate: Box::new(validate),
            render: Box::new(render),
        }
    }

    /// The demo-block rule.
    ///
    /// The validator accepts any trimmed parameter string starting with the
    /// literal `demo`; trailing text is an optional caption. No word boundary
    /// is enforced after the tag, so `democracy` validates with trailing text
    /// `cracy`.
    pub fn demo() -> Self {
        Self::new(
            "demo",
            |params: &str| demo_params_regex().is_match(params.trim()),
            |token: &ContainerToken| match token.nesting {
                Nesting::Enter => DEMO_OPEN.to_string(),
                Nesting::Exit => DEMO_CLOSE.to_string(),
            },
        )
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn validates(&self, params: &str) -> bool {
        (self.validate)(params)
    }

    pub(crate) fn render(&self, token: &ContainerToken) -> String {
        (self.render)(token)
    }
}

fn demo_params_regex() -> &'static Regex {
    static DEMO_PARAMS: OnceLock<Regex> = OnceLock::new();
    DEMO_PARAMS.get_or_init(|| Regex::new(r"^demo\s*(.*)$").expect("Invalid demo params regex"))
}

/// A slice of the source document: markdown to hand to the markdown
/// renderer, or a ready-made HTML fragment from a container rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Markdown(String),
    Fragment(String),
}

/// Splits a document at container fence lines.
///
/// An opening fence whose parameters some rule validates becomes the rule's
/// rendered `Enter` fragment; a bare `:::` closing the innermost open
/// container becomes its `Exit` fragment. Fence lines inside fenced code
/// blocks, fences no rule validates, and closers with no open container all
/// stay markdown text. Balance is not verified: an unclosed container yields
/// an enter fragment with no matching exit.
pub(crate) fn segment_source(source: &str, rules: &[ContainerRule]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut markdown = String::new();
    let mut open: Vec<usize> = Vec::new();
    let mut fence = FenceState::default();

    for line in source.lines() {
        if fence.outside()
            && let Some(params) = fence_params(line)
        {
            if params.trim().is_empty()
                && let Some(idx) = open.pop()
            {
                flush(&mut segments, &mut markdown);
                let token = ContainerToken {
                    nesting: Nesting::Exit,
                    params: params.to_string(),
                };
                segments.push(Segment::Fragment(rules[idx].render(&token)));
                continue;
            }
            if let Some(idx) = rules.iter().position(|rule| rule.validates(params)) {
                flush(&mut segments, &mut markdown);
                let token = ContainerToken {
                    nesting: Nesting::Enter,
                    params: params.to_string(),
                };
                segments.push(Segment::Fragment(rules[idx].render(&token)));
                open.push(idx);
                continue;
            }
        }

        fence.update(line);
        markdown.push_str(line);
        markdown.push('\n');
    }

    flush(&mut segments, &mut markdown);
    segments
}

/// Parameter text of a container fence line (a run of three or more colons),
/// or `None` if the line is not a fence.
fn fence_params(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with(":::") {
        return None;
    }
    Some(trimmed.trim_start_matches(':'))
}

fn flush(segments: &mut Vec<Segment>, markdown: &mut String) {
    if !markdown.is_empty() {
        segments.push(Segment::Markdown(std::mem::take(markdown)));
    }
}

/// Tracks fenced code blocks line by line so rewrites never apply inside
/// them.
#[derive(Debug, Default)]
pub(crate) struct FenceState {
    open: Option<char>,
}

impl FenceState {
    pub(crate) fn outside(&self) -> bool {
        self.open.is_none()
    }

    pub(crate) fn update(&mut self, line: &str) {
        let trimmed = line.trim_start();
        for marker in ['`', '~'] {
            let run = trimmed.chars().take_while(|&c| c == marker).count();
            if run < 3 {
                continue;
            }
            match self.open {
                None => self.open = Some(marker),
                // Closing fences carry no info string
                Some(current) if current == marker && trimmed[run..].trim().is_empty() => {
                    self.open = None;
                }
                _ => {}
            }
            return;
        }
    }
}
