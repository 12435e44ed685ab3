//! # SVG Document Tree
//!
//! A small owned element tree built from the quick-xml event stream. It is
//! enough to rewrite attributes, select and copy elements, and build new
//! documents; it does not interpret styling or geometry.

use crate::error::{SvgError, SvgResult};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// SVG XML namespace
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// A child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One XML element with ordered attributes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified tag name as written in the source
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder form of [`Element::push`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Tag name without namespace prefix
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Set an attribute, replacing in place to keep attribute order stable
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Direct element children
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// This element and all element descendants in document order
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for child in self.child_elements() {
            child.collect_descendants(out);
        }
    }

    /// Visit this element and every element descendant in document order
    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for node in &mut self.children {
            if let Node::Element(el) = node {
                el.visit_mut(f);
            }
        }
    }

    /// Visit every text node below this element
    pub fn visit_text_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        for node in &mut self.children {
            match node {
                Node::Element(el) => el.visit_text_mut(f),
                Node::Text(text) => f(text),
            }
        }
    }

    /// First element (self included) with the given local name
    pub fn find_first(&self, local_name: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|el| el.local_name() == local_name)
    }

    /// All elements (self included) with the given local name
    pub fn find_all(&self, local_name: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|el| el.local_name() == local_name)
            .collect()
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push_str(&format!(" {}=\"{}\"", key, escape(value.as_str())));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let block = self
            .children
            .iter()
            .all(|node| matches!(node, Node::Element(_)));
        if block {
            out.push('\n');
        }
        for node in &self.children {
            match node {
                Node::Element(el) => el.write_markup(out),
                Node::Text(text) => out.push_str(&escape(text.as_str())),
            }
            if block {
                out.push('\n');
            }
        }
        out.push_str(&format!("</{}>", self.name));
    }
}

/// A parsed SVG document
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: Element,
}

impl SvgDocument {
    /// Wrap an existing root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse markup; the root element must be `<svg>`
    pub fn parse(markup: &str) -> SvgResult<Self> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => stack.push(element_from_start(e)?),
                Ok(Event::Empty(ref e)) => {
                    let el = element_from_start(e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| SvgError::Xml("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = match t.unescape() {
                            Ok(text) => text.into_owned(),
                            Err(_) => String::from_utf8_lossy(t).into_owned(),
                        };
                        if !text.is_empty() {
                            parent.children.push(Node::Text(text));
                        }
                    }
                }
                Ok(Event::CData(ref c)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent
                            .children
                            .push(Node::Text(String::from_utf8_lossy(c).into_owned()));
                    }
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions and doctypes are dropped
                Ok(_) => {}
                Err(e) => return Err(SvgError::Xml(e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(SvgError::Xml(format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or(SvgError::MissingRoot)?;
        if root.local_name() != "svg" {
            return Err(SvgError::NotSvgRoot(root.name));
        }
        Ok(Self { root })
    }

    pub fn view_box(&self) -> Option<&str> {
        self.root.attr("viewBox")
    }

    pub fn width(&self) -> Option<&str> {
        self.root.attr("width")
    }

    pub fn height(&self) -> Option<&str> {
        self.root.attr("height")
    }

    /// Parse the root viewBox into `(min_x, min_y, width, height)`
    pub fn view_box_numbers(&self) -> Option<(f64, f64, f64, f64)> {
        let parts: Vec<f64> = self
            .view_box()?
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [x, y, w, h] => Some((*x, *y, *w, *h)),
            _ => None,
        }
    }

    /// All `path` elements at any depth
    pub fn paths(&self) -> Vec<&Element> {
        self.root.find_all("path")
    }

    /// Non-empty `d` values of every `path` element at any depth
    pub fn path_data(&self) -> Vec<&str> {
        self.paths()
            .into_iter()
            .filter_map(|el| el.attr("d"))
            .filter(|d| !d.trim().is_empty())
            .collect()
    }

    /// A new empty document carrying this document's canvas attributes
    pub fn with_same_canvas(&self) -> SvgDocument {
        let mut root = Element::new("svg").with_attr("xmlns", SVG_NAMESPACE);
        for key in ["viewBox", "width", "height"] {
            if let Some(value) = self.root.attr(key) {
                root.set_attr(key, value);
            }
        }
        SvgDocument::new(root)
    }

    /// Serialize the root element without an XML declaration
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.root.write_markup(&mut out);
        out
    }

    /// Serialize with the given XML declaration line in front
    pub fn to_markup_with_declaration(&self, declaration: &str) -> String {
        let mut out = String::from(declaration);
        out.push('\n');
        self.root.write_markup(&mut out);
        out.push('\n');
        out
    }
}

impl std::fmt::Display for SvgDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn element_from_start(start: &BytesStart) -> SvgResult<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SvgError::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Xml(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> SvgResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(SvgError::Xml("multiple root elements".to_string()));
    }
    *root = Some(element);
    Ok(())
}

/// Canvas attributes of a traced document
///
/// Missing attributes fall back to a fixed 400pt canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasMeta {
    pub view_box: String,
    pub width: String,
    pub height: String,
    /// Transform of the first `g` element, if any
    pub transform: Option<String>,
}

impl Default for CanvasMeta {
    fn default() -> Self {
        Self {
            view_box: "0 0 400.000000 400.000000".to_string(),
            width: "400.000000pt".to_string(),
            height: "400.000000pt".to_string(),
            transform: None,
        }
    }
}

impl CanvasMeta {
    /// Capture canvas attributes from a document's root and first group
    pub fn from_document(doc: &SvgDocument) -> Self {
        let defaults = Self::default();
        Self {
            view_box: doc
                .view_box()
                .map(str::to_string)
                .unwrap_or(defaults.view_box),
            width: doc.width().map(str::to_string).unwrap_or(defaults.width),
            height: doc.height().map(str::to_string).unwrap_or(defaults.height),
            transform: doc
                .root
                .find_first("g")
                .and_then(|g| g.attr("transform"))
                .map(str::to_string),
        }
    }
}
