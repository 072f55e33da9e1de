use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use gtmpl::{Context, Template, Value};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::html::{escape_html, PreEscaped};

const EMBEDDED_TEMPLATE: &str = include_str!("../templates/page.html");

static EMBEDDED: OnceCell<PageTemplate> = OnceCell::new();

/// Stands in for the content while a template is checked at parse time.
const CONTENT_MARKER: &str = "\u{0}readinglist-content\u{0}";

/// What Go templates print for a field that doesn't exist.
const NO_VALUE: &str = "<no value>";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse template: {0}")]
    Parse(String),

    #[error("failed to render template: {0}")]
    Render(String),

    #[error("template has no {{{{.Content}}}} placeholder")]
    MissingContent,
}

/// The values substituted into a [`PageTemplate`].
pub struct PageContext<'a> {
    /// Plain text; escaped on render.
    pub title: &'a str,
    pub page_title_bar: &'a PreEscaped,
    pub content: &'a PreEscaped,
    pub extra_head_content: &'a PreEscaped,
}

impl PageContext<'_> {
    fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), Value::String(escape_html(self.title)));
        m.insert(
            "PageTitleBar".to_owned(),
            Value::String(self.page_title_bar.as_str().to_owned()),
        );
        m.insert(
            "Content".to_owned(),
            Value::String(self.content.as_str().to_owned()),
        );
        m.insert(
            "ExtraHeadContent".to_owned(),
            Value::String(self.extra_head_content.as_str().to_owned()),
        );
        Value::Object(m)
    }
}

/// A Go-style page template exposing `{{.Title}}`, `{{.ExtraHeadContent}}`,
/// `{{.PageTitleBar}}` and `{{.Content}}`.
pub struct PageTemplate {
    template: Template,
}

impl PageTemplate {
    /// Returns the template bundled with the binary.
    pub fn embedded() -> Result<&'static Self, TemplateError> {
        EMBEDDED.get_or_try_init(|| Self::parse(EMBEDDED_TEMPLATE))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_owned(),
            source,
        })?;

        Self::parse(&source)
    }

    /// Parses the template and renders it once against placeholder values, so
    /// unknown fields and a missing content slot are reported up front.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut template = Template::default();
        template
            .parse(source)
            .map_err(|err| TemplateError::Parse(err.to_string()))?;

        let page_template = Self { template };

        let empty = PreEscaped::default();
        let rendered = page_template.render(&PageContext {
            title: "",
            page_title_bar: &empty,
            content: &PreEscaped::new(CONTENT_MARKER),
            extra_head_content: &empty,
        })?;

        if rendered.contains(NO_VALUE) && !source.contains(NO_VALUE) {
            return Err(TemplateError::Render(
                "template refers to a field that doesn't exist".to_owned(),
            ));
        }

        if !rendered.contains(CONTENT_MARKER) {
            return Err(TemplateError::MissingContent);
        }

        Ok(page_template)
    }

    pub fn render(&self, ctx: &PageContext) -> Result<String, TemplateError> {
        let context = Context::from(ctx.to_value())
            .map_err(|err| TemplateError::Render(err.to_string()))?;

        let mut output: Vec<u8> = Vec::new();
        self.template
            .execute(&mut output, &context)
            .map_err(|err| TemplateError::Render(err.to_string()))?;

        String::from_utf8(output).map_err(|err| TemplateError::Render(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(template: &PageTemplate, title: &str) -> String {
        template
            .render(&PageContext {
                title,
                page_title_bar: &PreEscaped::new("<h1>Bar</h1>"),
                content: &PreEscaped::new("<div>Listing</div>"),
                extra_head_content: &PreEscaped::new(r#"<link rel="icon" href="/icon.png">"#),
            })
            .unwrap()
    }

    #[test]
    fn test_embedded_template_parses() {
        let template = PageTemplate::embedded().unwrap();

        let rendered = render(template, "Reading list");

        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains("<title>Reading list</title>"));
        assert!(rendered.contains("<h1>Bar</h1>"));
        assert!(rendered.contains("<div>Listing</div>"));
        assert!(rendered.contains(r#"<link rel="icon" href="/icon.png">"#));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render() {
        let template = PageTemplate::parse(indoc! {"
            <title>{{.Title}}</title>
            {{.ExtraHeadContent}}
            {{ .PageTitleBar }}
            {{.Content}}
        "})
        .unwrap();

        assert_eq!(
            render(&template, "Me & <You>"),
            indoc! {r#"
                <title>Me &amp; &lt;You&gt;</title>
                <link rel="icon" href="/icon.png">
                <h1>Bar</h1>
                <div>Listing</div>
            "#}
        );
    }

    #[test]
    fn test_fields_can_repeat() {
        let template = PageTemplate::parse("{{.Title}}|{{.Content}}|{{.Title}}").unwrap();

        assert_eq!(render(&template, "T"), "T|<div>Listing</div>|T");
    }

    #[test]
    fn test_unknown_field() {
        let result = PageTemplate::parse("<p>{{.Content}}</p>{{.Sidebar}}");

        assert!(matches!(result, Err(TemplateError::Render(_))));
    }

    #[test]
    fn test_unclosed_action() {
        let result = PageTemplate::parse("{{.Content}}<p>{{.Title</p>");

        assert!(matches!(result, Err(TemplateError::Parse(_))));
    }

    #[test]
    fn test_missing_content() {
        let result = PageTemplate::parse("<title>{{.Title}}</title>");

        assert!(matches!(result, Err(TemplateError::MissingContent)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<main>{{.Content}}</main>").unwrap();

        let template = PageTemplate::from_path(&path).unwrap();

        assert_eq!(render(&template, ""), "<main><div>Listing</div></main>");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let result = PageTemplate::from_path(dir.path().join("page.html"));

        assert!(matches!(result, Err(TemplateError::Io { .. })));
    }
}
