use std::fmt::{self, Write};

use indexmap::IndexMap;

/// A fragment of HTML that is written out verbatim.
///
/// Only build one of these from markup the program produces itself, never
/// from loaded entry fields.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct PreEscaped(String);

impl PreEscaped {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreEscaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A child of an [`HtmlElement`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Node {
    Element(HtmlElement),
    /// Text that gets escaped on render.
    Text(String),
    Raw(PreEscaped),
}

impl From<HtmlElement> for Node {
    fn from(value: HtmlElement) -> Self {
        Self::Element(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<PreEscaped> for Node {
    fn from(value: PreEscaped) -> Self {
        Self::Raw(value)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct HtmlElement {
    pub tag_name: String,
    pub children: Vec<Node>,
    pub attrs: IndexMap<String, String>,
}

impl HtmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag_name: tag.into(),
            children: Vec::new(),
            attrs: IndexMap::new(),
        }
    }

    pub fn attr<V>(mut self, name: impl Into<String>, value: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        let name = name.into();
        match value.into() {
            Some(value) => {
                *self.attrs.entry(name).or_default() = value.into();
            }
            None => {
                self.attrs.shift_remove(&name);
            }
        }

        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<N>(mut self, children: impl IntoIterator<Item = N>) -> Self
    where
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self.tag_name.as_str(),
            "area"
                | "base"
                | "br"
                | "col"
                | "embed"
                | "hr"
                | "img"
                | "input"
                | "link"
                | "meta"
                | "param"
                | "source"
                | "track"
                | "wbr"
        )
    }

    pub fn render_to_string(&self) -> Result<String, fmt::Error> {
        let mut html = String::new();
        self.render_into(&mut html)?;

        Ok(html)
    }

    /// Renders the element into a fragment that can be embedded as-is.
    pub fn render_to_fragment(&self) -> Result<PreEscaped, fmt::Error> {
        self.render_to_string().map(PreEscaped)
    }

    fn render_into(&self, html: &mut String) -> fmt::Result {
        write!(html, "<{}", self.tag_name)?;

        for (name, value) in &self.attrs {
            write!(html, r#" {name}="{}""#, escape_html(value))?;
        }

        write!(html, ">")?;

        if self.is_void() {
            return Ok(());
        }

        for child in &self.children {
            match child {
                Node::Element(element) => element.render_into(html)?,
                Node::Text(text) => write!(html, "{}", escape_html(text))?,
                Node::Raw(raw) => write!(html, "{raw}")?,
            }
        }

        write!(html, "</{}>", self.tag_name)?;

        Ok(())
    }
}

impl HtmlElement {
    pub fn class<V>(self, class: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("class", class)
    }

    pub fn href<V>(self, href: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("href", href)
    }

    pub fn rel<V>(self, rel: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("rel", rel)
    }

    pub fn target<V>(self, target: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("target", target)
    }

    pub fn src<V>(self, src: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("src", src)
    }

    pub fn style<V>(self, style: impl Into<Option<V>>) -> Self
    where
        V: Into<String>,
    {
        self.attr("style", style)
    }
}

/// Escapes text for use in element content or a quoted attribute value.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for char in text.chars() {
        match char {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            char => escaped.push(char),
        }
    }

    escaped
}

pub fn a() -> HtmlElement {
    HtmlElement::new("a")
}

pub fn br() -> HtmlElement {
    HtmlElement::new("br")
}

pub fn code() -> HtmlElement {
    HtmlElement::new("code")
}

pub fn details() -> HtmlElement {
    HtmlElement::new("details")
}

pub fn div() -> HtmlElement {
    HtmlElement::new("div")
}

pub fn h1() -> HtmlElement {
    HtmlElement::new("h1")
}

pub fn h2() -> HtmlElement {
    HtmlElement::new("h2")
}

pub fn i() -> HtmlElement {
    HtmlElement::new("i")
}

pub fn img() -> HtmlElement {
    HtmlElement::new("img")
}

pub fn li() -> HtmlElement {
    HtmlElement::new("li")
}

pub fn p() -> HtmlElement {
    HtmlElement::new("p")
}

pub fn summary() -> HtmlElement {
    HtmlElement::new("summary")
}

pub fn ul() -> HtmlElement {
    HtmlElement::new("ul")
}
