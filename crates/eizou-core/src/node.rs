//! Structured view output.
//!
//! Renderers build a [`Node`] tree instead of concatenating markup, so views
//! can be inspected in tests and serialized as JSON snapshots. HTML is
//! produced only at the edge by [`Node::to_html`].

use serde::Serialize;

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Node {
    /// Nothing rendered. Used for inert pages.
    Empty,
    Text { text: String },
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Node>,
    },
}

/// Elements that never carry children or a closing tag.
const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

impl Node {
    pub fn el(tag: &str) -> Self {
        Self::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text_node(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Set an attribute. No-op on non-elements.
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((key.to_string(), value.into()));
        }
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Self::Element { children, .. } = &mut self {
            if node != Node::Empty {
                children.push(node);
            }
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        for node in nodes {
            self = self.child(node);
        }
        self
    }

    /// Append a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Self::text_node(text))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// All descendants (including self) carrying `class`, in document order.
    pub fn find_all(&self, class: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if n.has_class(class) {
                out.push(n);
            }
        });
        out
    }

    /// First descendant (including self) with the given `id` attribute.
    pub fn find_id(&self, id: &str) -> Option<&Node> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        match self {
            Self::Element { children, .. } => children.iter().find_map(|c| c.find_id(id)),
            _ => None,
        }
    }

    pub fn count_class(&self, class: &str) -> usize {
        self.find_all(class).len()
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |n| {
            if let Self::Text { text } = n {
                out.push_str(text);
            }
        });
        out
    }

    fn walk<'a>(&'a self, f: &mut dyn FnMut(&'a Node)) {
        f(self);
        if let Self::Element { children, .. } = self {
            for child in children {
                child.walk(f);
            }
        }
    }

    /// Render as HTML, escaping text and attribute values.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text { text } => escape_into(text, out),
            Self::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    escape_into(v, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
