// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//! Minimal XML tree with exclusive canonical serialization.
//!
//! Only the subset needed for the generated assertions is supported: every
//! namespace is declared on the element that introduces it, there are no
//! comments, processing instructions or mixed content with entities.

/// XML node.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

/// XML element.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Set the attribute when the value is present.
    pub fn attr_opt<K: Into<String>, V: Into<String>>(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text<T: Into<String>>(mut self, text: T) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Insert the child right before the first child element with the name.
    /// The child is appended when there is no such element.
    pub fn insert_before(&mut self, name: &str, child: Element) {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.name == name))
            .unwrap_or(self.children.len());
        self.children.insert(position, Node::Element(child));
    }

    /// Canonical form of the element.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        let mut attributes: Vec<&(String, String)> = self.attributes.iter().collect();
        attributes.sort_by(|(a, _), (b, _)| attribute_order(a).cmp(&attribute_order(b)));
        for (key, value) in attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_attribute(value, out);
            out.push('"');
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_canonical(out),
                Node::Text(text) => escape_text(text, out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Namespace declarations first, then unqualified and finally qualified
/// attributes, each group ordered by name.
fn attribute_order(name: &str) -> (u8, &str) {
    if name == "xmlns" || name.starts_with("xmlns:") {
        (0, name)
    } else if !name.contains(':') {
        (1, name)
    } else {
        (2, name)
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_attribute_order() {
        let el = Element::new("saml2:Conditions")
            .attr("saml2:Foo", "3")
            .attr("NotOnOrAfter", "2")
            .attr("NotBefore", "1")
            .attr("xmlns:saml2", "urn:oasis:names:tc:SAML:2.0:assertion");
        assert_eq!(
            r#"<saml2:Conditions xmlns:saml2="urn:oasis:names:tc:SAML:2.0:assertion" NotBefore="1" NotOnOrAfter="2" saml2:Foo="3"></saml2:Conditions>"#,
            el.to_canonical_string()
        );
    }

    #[test]
    fn test_escaping() {
        let el = Element::new("a")
            .attr("b", "x\"<&\n")
            .text("1 < 2 & 3 > \"2\"");
        assert_eq!(
            "<a b=\"x&quot;&lt;&amp;&#xA;\">1 &lt; 2 &amp; 3 &gt; \"2\"</a>",
            el.to_canonical_string()
        );
    }

    #[test]
    fn test_insert_before() {
        let mut el = Element::new("root")
            .child(Element::new("first"))
            .child(Element::new("third"));
        el.insert_before("third", Element::new("second"));
        el.insert_before("missing", Element::new("last"));
        assert_eq!(
            "<root><first></first><second></second><third></third><last></last></root>",
            el.to_canonical_string()
        );
    }
}
