//! End-to-end rendering tests for the docs pipeline.
//!
//! Fixture documents (.md) and snapshots (.snap) are co-located in
//! `fixtures/`.

use pretty_assertions::assert_eq;

use crate::render::{DEMO_CLOSE, DEMO_OPEN, Pipeline};

// Fixture-based snapshot tests

#[test]
fn fixture_component_doc() {
    assert_fixture("component_doc");
}

#[test]
fn fixture_demo_blocks() {
    assert_fixture("demo_blocks");
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/render/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let md = std::fs::read_to_string(format!("{fixtures_dir}/{name}.md")).unwrap();

    let html = Pipeline::docs().render(&md);

    insta::with_settings!({
        snapshot_path => fixtures_dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, html);
    });
}

// Pipeline behavior tests

#[test]
fn demo_container_wraps_rendered_code() {
    let source = "::: demo Basic usage\n```js\nconst a = 1;\n```\n:::\n";
    let html = Pipeline::docs().render(source);

    let open = html.find(DEMO_OPEN).expect("missing demo open fragment");
    let close = html.find(DEMO_CLOSE).expect("missing demo close fragment");
    assert!(open < close);
    assert!(html.contains("<code v-pre class=\"hljs lang-js\">"));
    assert!(html.contains("const a = 1;"));
}

#[test]
fn plain_document_needs_no_rules() {
    let html = Pipeline::new().render("Hello world\n");
    assert_eq!(html, "<p>Hello world</p>\n");
}

#[test]
fn prose_between_demo_blocks_stays_markdown() {
    let source = "intro\n\n::: demo One\na\n:::\n\nmiddle\n\n::: demo Two\nb\n:::\n";
    let html = Pipeline::docs().render(source);
    assert_eq!(html.matches(DEMO_OPEN).count(), 2);
    assert_eq!(html.matches(DEMO_CLOSE).count(), 2);
    assert!(html.contains("<p>middle</p>"));
}

#[test]
fn unclosed_demo_leaves_output_unbalanced() {
    let html = Pipeline::docs().render("::: demo\ncontent\n");
    assert!(html.contains(DEMO_OPEN));
    assert!(!html.contains(DEMO_CLOSE));
}

#[test]
fn render_is_stateless_across_calls() {
    let pipeline = Pipeline::docs();
    let source = "# Title\n\n::: demo\n```js\nlet x;\n```\n:::\n";
    assert_eq!(pipeline.render(source), pipeline.render(source));
}

#[test]
fn docs_pipeline_applies_the_table_class() {
    let source = "| Attribute | Type |\n| --- | --- |\n| size | String |\n";
    let html = Pipeline::docs().render(source);
    assert!(html.contains("<table class=\"vitrine-table\">"));
}
