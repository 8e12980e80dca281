//! Code block rendering.
//!
//! Fenced code reaches the page in two layers: a base renderer emits the
//! `<pre><code>` markup, and [`HighlightDecorator`] prepares that markup for
//! the client-side highlighting library by decoding numeric entity escapes
//! and tagging the code element with the marker class the library looks for.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Class the syntax-highlighting library expects on code elements.
pub const HIGHLIGHT_CLASS: &str = "hljs";

/// Opening of the code element's class attribute as the base renderer emits
/// it. The marker class is inserted immediately after this literal.
const CODE_CLASS_OPEN: &str = r#"<code v-pre class=""#;

/// Renders one fenced code block to HTML.
///
/// Implementations are pure and invoked once per block; the returned string
/// is spliced into the page as-is.
pub trait CodeRenderer {
    fn render(&self, code: &str, lang: &str) -> String;
}

/// Base fence renderer.
///
/// Emits `<pre><code v-pre class="lang-{lang}">` with the code text
/// HTML-escaped, or `<pre><code v-pre>` when the block has no language. The
/// `v-pre` attribute keeps the consuming front-end framework from compiling
/// code content as templates.
#[derive(Debug, Default, Clone, Copy)]
pub struct FencedCodeRenderer;

impl CodeRenderer for FencedCodeRenderer {
    fn render(&self, code: &str, lang: &str) -> String {
        let escaped = html_escape::encode_text(code);
        let lang = lang.split_whitespace().next().unwrap_or("");
        if lang.is_empty() {
            format!("<pre><code v-pre>{escaped}</code></pre>\n")
        } else {
            let lang = html_escape::encode_double_quoted_attribute(lang);
            format!("<pre><code v-pre class=\"lang-{lang}\">{escaped}</code></pre>\n")
        }
    }
}

/// Wraps a [`CodeRenderer`] so its output is ready for the highlighting
/// library: numeric entity escapes are decoded back to literal characters,
/// then the code element is tagged with [`HIGHLIGHT_CLASS`].
pub struct HighlightDecorator<R> {
    inner: R,
}

impl<R> HighlightDecorator<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: CodeRenderer> CodeRenderer for HighlightDecorator<R> {
    fn render(&self, code: &str, lang: &str) -> String {
        let html = self.inner.render(code, lang);
        inject_highlight_class(&decode_numeric_entities(&html))
    }
}

/// Decodes `&#x` + exactly four hex digits + `;` escapes (prefix
/// case-insensitive) to their literal characters.
///
/// Sequences with a different digit count, and values with no corresponding
/// scalar (surrogates), are left as literal text. Lossy and one-directional:
/// there is no re-encode.
pub fn decode_numeric_entities(html: &str) -> String {
    entity_regex()
        .replace_all(html, |caps: &Captures| {
            match u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
            {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Inserts [`HIGHLIGHT_CLASS`] at the front of the code element's class
/// list.
///
/// Only the first occurrence is rewritten; render is invoked per block, so
/// one code element is expected. Output lacking the expected code-open
/// markup passes through unchanged.
pub fn inject_highlight_class(html: &str) -> String {
    html.replacen(
        CODE_CLASS_OPEN,
        &format!("{CODE_CLASS_OPEN}{HIGHLIGHT_CLASS} "),
        1,
    )
}

fn entity_regex() -> &'static Regex {
    static ENTITY: OnceLock<Regex> = OnceLock::new();
    ENTITY.get_or_init(|| Regex::new(r"(?i)&#x([0-9a-f]{4});").expect("Invalid entity regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("&#x0041;", "A")]
    #[case("&#X0041;", "A")]
    #[case("&#x0026;", "&")]
    #[case("&#x2014;", "\u{2014}")]
    #[case("no entities here", "no entities here")]
    #[case("&#x41;", "&#x41;")]
    #[case("&#x00041;", "&#x00041;")]
    #[case("&#xD800;", "&#xD800;")]
    fn decodes_four_digit_hex_entities(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode_numeric_entities(input), expected);
    }

    #[test]
    fn decode_handles_multiple_escapes() {
        assert_eq!(
            decode_numeric_entities("&#x0041;&#x0042; and &#x0043;"),
            "AB and C"
        );
    }

    #[test]
    fn decode_is_idempotent_on_decoded_text() {
        let decoded = decode_numeric_entities("let s = &#x0027;hi&#x0027;;");
        assert_eq!(decode_numeric_entities(&decoded), decoded);
    }

    #[test]
    fn injects_marker_class_before_existing_classes() {
        assert_eq!(
            inject_highlight_class(r#"<code v-pre class="lang-js">"#),
            r#"<code v-pre class="hljs lang-js">"#
        );
    }

    #[test]
    fn inject_skips_unexpected_markup() {
        assert_eq!(
            inject_highlight_class(r#"<pre class="x">"#),
            r#"<pre class="x">"#
        );
    }

    #[test]
    fn inject_rewrites_only_the_first_occurrence() {
        let html = r#"<code v-pre class="lang-js">a</code><code v-pre class="lang-css">b</code>"#;
        assert_eq!(
            inject_highlight_class(html),
            r#"<code v-pre class="hljs lang-js">a</code><code v-pre class="lang-css">b</code>"#
        );
    }

    #[test]
    fn base_renderer_escapes_code_text() {
        let html = FencedCodeRenderer.render("<div a=\"1\" & more>\n", "html");
        assert_eq!(
            html,
            "<pre><code v-pre class=\"lang-html\">&lt;div a=\"1\" &amp; more&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn base_renderer_omits_class_without_language() {
        let html = FencedCodeRenderer.render("plain\n", "");
        assert_eq!(html, "<pre><code v-pre>plain\n</code></pre>\n");
    }

    #[test]
    fn base_renderer_keeps_first_info_string_token() {
        let html = FencedCodeRenderer.render("x\n", "js {highlight}");
        assert!(html.contains(r#"class="lang-js""#));
    }

    struct FixedRenderer(&'static str);

    impl CodeRenderer for FixedRenderer {
        fn render(&self, _code: &str, _lang: &str) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn decorator_decodes_then_tags_inner_output() {
        let inner = r#"<pre><code v-pre class="lang-js">&#x0027;hi&#x0027;</code></pre>"#;
        let decorated = HighlightDecorator::new(FixedRenderer(inner)).render("ignored", "js");
        assert_eq!(
            decorated,
            r#"<pre><code v-pre class="hljs lang-js">'hi'</code></pre>"#
        );
    }

    #[test]
    fn decorator_passes_unexpected_markup_through() {
        let decorated =
            HighlightDecorator::new(FixedRenderer("<pre>plain</pre>")).render("ignored", "");
        assert_eq!(decorated, "<pre>plain</pre>");
    }

    #[test]
    fn decorated_fence_renderer_tags_code_elements() {
        let html = HighlightDecorator::new(FencedCodeRenderer).render("let x = 1;\n", "js");
        assert_eq!(
            html,
            "<pre><code v-pre class=\"hljs lang-js\">let x = 1;\n</code></pre>\n"
        );
    }
}
