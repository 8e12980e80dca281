use relative_path::{RelativePath, RelativePathBuf};
use serde::Serialize;

use crate::render::Pipeline;
use crate::render::container::FenceState;

/// A markdown source file within the docs tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    relative_path: RelativePathBuf,
    display_name: String,
    route: String,
}

impl SourceFile {
    /// Create from a path relative to the docs root.
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = relative_path
            .file_name()
            .map(|name| name.strip_suffix(".md").unwrap_or(name))
            .unwrap_or("Untitled")
            .to_string();
        let route = {
            let path = relative_path.as_str();
            path.strip_suffix(".md").unwrap_or(path).to_string()
        };

        Self {
            relative_path,
            display_name,
            route,
        }
    }

    /// Create from a relative path string.
    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File stem; the fallback page title.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Site route of the page (relative path without `.md`).
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Location of the rendered page, relative to the output root.
    pub fn output_path(&self) -> RelativePathBuf {
        RelativePathBuf::from(format!("{}.html", self.route))
    }
}

impl From<RelativePathBuf> for SourceFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}

/// A rendered documentation page.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    source: SourceFile,
    title: String,
    html: String,
}

impl Page {
    /// Renders `markdown` through `pipeline`, deriving the page title from
    /// the first level-1 heading and falling back to the file's display
    /// name.
    pub fn render(source: SourceFile, markdown: &str, pipeline: &Pipeline) -> Self {
        let title =
            extract_title(markdown).unwrap_or_else(|| source.display_name().to_string());
        let html = pipeline.render(markdown);
        log::debug!("rendered page {} ({})", source.route(), title);

        Self {
            source,
            title,
            html,
        }
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Text of the first `# ` heading outside fenced code blocks.
fn extract_title(markdown: &str) -> Option<String> {
    let mut fence = FenceState::default();
    for line in markdown.lines() {
        if fence.outside()
            && let Some(rest) = line.trim_start().strip_prefix("# ")
        {
            let title = rest.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
        fence.update(line);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn source_file_derives_route_and_output_path() {
        let file = SourceFile::from_relative_str("components/button.md");
        assert_eq!(file.display_name(), "button");
        assert_eq!(file.route(), "components/button");
        assert_eq!(file.output_path().as_str(), "components/button.html");
    }

    #[test]
    fn source_file_without_extension_keeps_its_name() {
        let file = SourceFile::from_relative_str("CHANGELOG");
        assert_eq!(file.display_name(), "CHANGELOG");
        assert_eq!(file.route(), "CHANGELOG");
        assert_eq!(file.output_path().as_str(), "CHANGELOG.html");
    }

    #[test]
    fn title_comes_from_the_first_level_one_heading() {
        assert_eq!(
            extract_title("intro\n\n# Button\n\n# Second\n"),
            Some("Button".to_string())
        );
    }

    #[test]
    fn title_ignores_headings_inside_code_fences() {
        let markdown = "```\n# not a title\n```\n\n# Real Title\n";
        assert_eq!(extract_title(markdown), Some("Real Title".to_string()));
    }

    #[test]
    fn title_requires_a_heading() {
        assert_eq!(extract_title("just a paragraph\n"), None);
    }

    #[test]
    fn page_falls_back_to_the_display_name() {
        let page = Page::render(
            SourceFile::from_relative_str("components/toast.md"),
            "No heading here.\n",
            &Pipeline::docs(),
        );
        assert_eq!(page.title(), "toast");
    }

    #[test]
    fn page_renders_html_and_keeps_the_heading_title() {
        let page = Page::render(
            SourceFile::from_relative_str("button.md"),
            "# Button\n\nBody text.\n",
            &Pipeline::docs(),
        );
        assert_eq!(page.title(), "Button");
        assert!(page.html().contains("<h1 id=\"button\">Button</h1>"));
        assert!(page.html().contains("<p>Body text.</p>"));
    }
}
