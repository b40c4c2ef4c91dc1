// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A simple reference-counted DOM.
//!
//! This is sufficient as a static parse tree, but don't build a
//! web browser using it. :)
//!
//! Parent pointers are weak, so a subtree is freed as soon as the last
//! external handle to it goes away. The sink records parse errors, quirks
//! mode, and (when the builder is configured for it) per-node source
//! locations.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use tendril::StrTendril;

use crate::interface::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use crate::interface::{NodeLocation, ParseError, SourceSpan};
use crate::{Attribute, ExpandedName, QualName};

/// The different kinds of nodes in the DOM.
pub enum NodeData {
    /// The `Document` itself - the root node of a HTML document.
    Document,

    /// A `DOCTYPE` with name, public id, and system id. See
    /// [document type declaration on wikipedia][dtd wiki].
    ///
    /// [dtd wiki]: https://en.wikipedia.org/wiki/Document_type_declaration
    Doctype {
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    },

    /// A text node.
    Text { contents: RefCell<StrTendril> },

    /// A comment.
    Comment { contents: StrTendril },

    /// An element with attributes.
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,

        /// For HTML \<template\> elements, the [template contents].
        ///
        /// [template contents]: https://html.spec.whatwg.org/multipage/#template-contents
        template_contents: RefCell<Option<Handle>>,

        /// Whether the node is a [HTML integration point].
        ///
        /// [HTML integration point]: https://html.spec.whatwg.org/multipage/#html-integration-point
        mathml_annotation_xml_integration_point: bool,

        /// For HTML \<script\> elements, whether the script has
        /// [already started].
        ///
        /// [already started]: https://html.spec.whatwg.org/multipage/#already-started
        script_already_started: Cell<bool>,
    },
}

/// A DOM node.
pub struct Node {
    /// Parent node.
    pub parent: Cell<Option<WeakHandle>>,
    /// Child nodes of this node.
    pub children: RefCell<Vec<Handle>>,
    /// Represents this node's data.
    pub data: NodeData,
    /// Source position, when the tree builder tracks locations.
    pub location: RefCell<Option<NodeLocation>>,
}

impl Node {
    /// Create a new node from its contents
    pub fn new(data: NodeData) -> Rc<Self> {
        Rc::new(Node {
            data,
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
            location: RefCell::new(None),
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.data {
            NodeData::Document => "Document",
            NodeData::Doctype { .. } => "Doctype",
            NodeData::Text { .. } => "Text",
            NodeData::Comment { .. } => "Comment",
            NodeData::Element { ref name, .. } => return write!(f, "Element({:?})", name.local),
        };
        f.write_str(kind)
    }
}

/// Reference to a DOM node.
pub type Handle = Rc<Node>;

/// Weak reference to a DOM node, used for parent pointers.
pub type WeakHandle = Weak<Node>;

fn get_parent_and_index(target: &Handle) -> Option<(Handle, usize)> {
    let weak = target.parent.take()?;
    let parent = weak.upgrade().expect("dangling weak pointer");
    target.parent.set(Some(weak));

    let i = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, target))
        .expect("have parent but couldn't find in parent's children!");
    Some((parent, i))
}

fn append(new_parent: &Handle, child: Handle) {
    let previous_parent = child.parent.replace(Some(Rc::downgrade(new_parent)));
    // Invariant: child cannot have existing parent
    assert!(previous_parent.is_none());
    new_parent.children.borrow_mut().push(child);
}

fn append_to_existing_text(prev: &Handle, text: &str) -> bool {
    match prev.data {
        NodeData::Text { ref contents } => {
            contents.borrow_mut().push_slice(text);
            true
        }
        _ => false,
    }
}

fn remove_from_parent(target: &Handle) {
    if let Some((parent, i)) = get_parent_and_index(target) {
        parent.children.borrow_mut().remove(i);
        target.parent.set(None);
    }
}

/// The DOM itself; the result of parsing.
pub struct RcDom {
    /// The `Document` itself.
    pub document: Handle,

    /// Errors that occurred during parsing.
    pub errors: RefCell<Vec<ParseError>>,

    /// The document's quirks mode.
    pub quirks_mode: Cell<QuirksMode>,

    /// Span of the token currently being processed, for extending text
    /// node locations over every contributing token.
    current_location: Cell<SourceSpan>,
}

impl RcDom {
    fn new_node(&self, data: NodeData) -> Handle {
        Node::new(data)
    }

    /// Stamp the current token span on a freshly created text node, or
    /// extend the span of the text node `text` was just merged into.
    fn note_text_span(&self, node: &Handle) {
        let span = self.current_location.get();
        if span == SourceSpan::default() {
            return;
        }
        let mut location = node.location.borrow_mut();
        match *location {
            Some(ref mut loc) => loc.span.end = span.end,
            None => {
                *location = Some(NodeLocation {
                    span,
                    ..Default::default()
                })
            }
        }
    }
}

pub struct NameRef<'a> {
    name: &'a QualName,
}

impl fmt::Debug for NameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.expanded().fmt(f)
    }
}

impl ElemName for NameRef<'_> {
    fn ns(&self) -> &crate::Namespace {
        &self.name.ns
    }

    fn local_name(&self) -> &crate::LocalName {
        &self.name.local
    }
}

impl TreeSink for RcDom {
    type Output = Self;
    type Handle = Handle;
    type ElemName<'a> = NameRef<'a>;

    fn finish(self) -> Self {
        self
    }

    fn parse_error(&self, error: ParseError) {
        self.errors.borrow_mut().push(error);
    }

    fn get_document(&self) -> Handle {
        self.document.clone()
    }

    fn get_template_contents(&self, target: &Handle) -> Handle {
        if let NodeData::Element {
            ref template_contents,
            ..
        } = target.data
        {
            template_contents
                .borrow()
                .as_ref()
                .expect("not a template element!")
                .clone()
        } else {
            panic!("not a template element!")
        }
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
    }

    fn same_node(&self, x: &Handle, y: &Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn elem_name<'a>(&'a self, target: &'a Handle) -> NameRef<'a> {
        match target.data {
            NodeData::Element { ref name, .. } => NameRef { name },
            _ => panic!("not an element!"),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Handle {
        self.new_node(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
            template_contents: RefCell::new(if flags.template {
                Some(self.new_node(NodeData::Document))
            } else {
                None
            }),
            mathml_annotation_xml_integration_point: flags
                .mathml_annotation_xml_integration_point,
            script_already_started: Cell::new(false),
        })
    }

    fn create_comment(&self, text: StrTendril) -> Handle {
        let comment = self.new_node(NodeData::Comment { contents: text });
        self.note_text_span(&comment);
        comment
    }

    fn append(&self, parent: &Handle, child: NodeOrText<Handle>) {
        // Append to an existing Text node if we have one.
        if let NodeOrText::AppendText(text) = &child {
            if let Some(h) = parent.children.borrow().last() {
                if append_to_existing_text(h, text) {
                    self.note_text_span(h);
                    return;
                }
            }
        }

        append(
            parent,
            match child {
                NodeOrText::AppendText(text) => {
                    let node = self.new_node(NodeData::Text {
                        contents: RefCell::new(text),
                    });
                    self.note_text_span(&node);
                    node
                }
                NodeOrText::AppendNode(node) => node,
            },
        );
    }

    fn append_before_sibling(&self, sibling: &Handle, child: NodeOrText<Handle>) {
        let (parent, i) =
            get_parent_and_index(sibling).expect("append_before_sibling called on node without parent");

        let child = match (child, i) {
            // No previous node.
            (NodeOrText::AppendText(text), 0) => {
                let node = self.new_node(NodeData::Text {
                    contents: RefCell::new(text),
                });
                self.note_text_span(&node);
                node
            }

            // Look for a text node before the insertion point.
            (NodeOrText::AppendText(text), i) => {
                let children = parent.children.borrow();
                let prev = &children[i - 1];
                if append_to_existing_text(prev, &text) {
                    self.note_text_span(prev);
                    return;
                }
                drop(children);
                let node = self.new_node(NodeData::Text {
                    contents: RefCell::new(text),
                });
                self.note_text_span(&node);
                node
            }

            // The tree builder promises we won't have a text node after
            // the insertion point.

            // Any other kind of node.
            (NodeOrText::AppendNode(node), _) => node,
        };

        remove_from_parent(&child);

        child.parent.set(Some(Rc::downgrade(&parent)));
        parent.children.borrow_mut().insert(i, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Handle,
        prev_element: &Handle,
        child: NodeOrText<Handle>,
    ) {
        let parent = element.parent.take();
        let has_parent = parent.is_some();
        element.parent.set(parent);

        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        append(
            &self.document,
            self.new_node(NodeData::Doctype {
                name,
                public_id,
                system_id,
            }),
        );
    }

    fn add_attrs_if_missing(&self, target: &Handle, attrs: Vec<Attribute>) {
        let mut existing = if let NodeData::Element { ref attrs, .. } = target.data {
            attrs.borrow_mut()
        } else {
            panic!("not an element")
        };

        let existing_names = existing
            .iter()
            .map(|e| e.name.clone())
            .collect::<HashSet<_>>();
        existing.extend(
            attrs
                .into_iter()
                .filter(|attr| !existing_names.contains(&attr.name)),
        );
    }

    fn remove_from_parent(&self, target: &Handle) {
        remove_from_parent(target);
    }

    fn reparent_children(&self, node: &Handle, new_parent: &Handle) {
        let mut children = node.children.borrow_mut();
        let mut new_children = new_parent.children.borrow_mut();
        for child in children.iter() {
            let previous_parent = child.parent.replace(Some(Rc::downgrade(new_parent)));
            assert!(previous_parent.is_some());
        }
        new_children.extend(children.drain(..));
    }

    fn mark_script_already_started(&self, target: &Handle) {
        if let NodeData::Element {
            ref script_already_started,
            ..
        } = target.data
        {
            script_already_started.set(true);
        } else {
            panic!("not a script element!");
        }
    }

    fn is_mathml_annotation_xml_integration_point(&self, target: &Handle) -> bool {
        if let NodeData::Element {
            mathml_annotation_xml_integration_point,
            ..
        } = target.data
        {
            mathml_annotation_xml_integration_point
        } else {
            unreachable!()
        }
    }

    fn set_current_location(&self, span: SourceSpan) {
        self.current_location.set(span);
    }

    fn set_start_location(&self, node: &Handle, start_tag: SourceSpan, attrs: &[SourceSpan]) {
        *node.location.borrow_mut() = Some(NodeLocation {
            span: start_tag,
            end_tag: None,
            attrs: attrs.to_vec(),
        });
    }

    fn set_end_location(&self, node: &Handle, end_tag: SourceSpan) {
        let mut location = node.location.borrow_mut();
        if let Some(ref mut loc) = *location {
            // The first report wins: the builder re-reports <body> and
            // <html> at EOF after patching their real end positions.
            if loc.end_tag.is_none() {
                loc.end_tag = Some(end_tag);
            }
        }
    }
}

impl Default for RcDom {
    fn default() -> RcDom {
        RcDom {
            document: Node::new(NodeData::Document),
            errors: RefCell::new(vec![]),
            quirks_mode: Cell::new(QuirksMode::NoQuirks),
            current_location: Cell::new(SourceSpan::default()),
        }
    }
}

/// A borrowed view of an element's attributes, for tests and tools.
pub fn attrs(node: &Handle) -> Ref<'_, Vec<Attribute>> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs.borrow(),
        _ => panic!("not an element!"),
    }
}

/// Is this node an HTML element with the given local name?
pub fn is_html_element(node: &Handle, local: &crate::LocalName) -> bool {
    match node.data {
        NodeData::Element { ref name, .. } => {
            name.expanded() == ExpandedName {
                ns: &ns!(html),
                local,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::{NodeData, RcDom};
    use crate::interface::tree_builder::{NodeOrText, TreeSink};
    use crate::interface::ElementFlags;
    use crate::QualName;

    #[test]
    fn append_merges_adjacent_text() {
        let dom = RcDom::default();
        let doc = dom.get_document();
        dom.append(&doc, NodeOrText::AppendText("Hello ".into()));
        dom.append(&doc, NodeOrText::AppendText("world".into()));
        let children = doc.children.borrow();
        assert_eq!(children.len(), 1);
        match children[0].data {
            NodeData::Text { ref contents } => {
                assert_eq!(&**contents.borrow(), "Hello world");
            }
            _ => panic!("expected a text node"),
        }
    }

    #[test]
    fn template_contents_allocated_from_flags() {
        let dom = RcDom::default();
        let template = dom.create_element(
            QualName::new(None, ns!(html), local_name!("template")),
            vec![],
            ElementFlags {
                template: true,
                ..Default::default()
            },
        );
        let contents = dom.get_template_contents(&template);
        assert!(matches!(contents.data, NodeData::Document));
    }
}
