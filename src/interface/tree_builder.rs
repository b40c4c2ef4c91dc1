// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The capability interface to the DOM.
//!
//! The tree builder never touches node storage: every read goes through
//! [`TreeSink::elem_name`] and friends, every write through one of the
//! mutating methods. A sink can be a real DOM, an arena, or a recording
//! shim; the builder only requires that handles be cheap to clone and
//! compare.

use std::fmt;

use tendril::StrTendril;

use super::{Attribute, ExpandedName, QualName, SourceSpan};
use crate::{expanded_name, LocalName, Namespace};

pub use self::QuirksMode::{LimitedQuirks, NoQuirks, Quirks};

/// A document's quirks mode, set by the DOCTYPE classifier.
///
/// In quirks mode, some parsing decisions change (e.g. `<p>` is not closed
/// before `<table>`); layout engines change a lot more.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
pub enum QuirksMode {
    /// Full quirks mode.
    Quirks,
    /// Limited quirks mode.
    LimitedQuirks,
    /// No quirks (the default).
    NoQuirks,
}

/// Something which can be inserted into the DOM.
///
/// Adjacent sibling text nodes are merged into a single node, so the sink
/// may not always create a new node when told to insert text.
pub enum NodeOrText<Handle> {
    AppendNode(Handle),
    AppendText(StrTendril),
}

pub use self::NodeOrText::{AppendNode, AppendText};

/// A parse-error kind, named after the condition that produced it.
///
/// The names follow the WHATWG parse-error vocabulary where one exists and
/// extend it for the tree-construction conditions the standard leaves as
/// anonymous "parse error" notes.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Debug)]
#[non_exhaustive]
pub enum ErrorCode {
    AbandonedHeadElementChild,
    ClosingOfElementWithOpenChildElements,
    DisallowedContentInNoscriptInHead,
    EndTagWithoutMatchingOpenElement,
    EofInElementThatCanContainOnlyText,
    MisplacedDoctype,
    MisplacedStartTagForHeadElement,
    MissingDoctype,
    NestedNoscriptInHead,
    NonConformingDoctype,
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    OpenElementsLeftAfterEof,
    UnexpectedCharacterInTable,
    UnexpectedEndTag,
    UnexpectedNullCharacter,
    UnexpectedStartTag,
    UnexpectedToken,
}

impl ErrorCode {
    /// The stable wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match *self {
            ErrorCode::AbandonedHeadElementChild => "abandonedHeadElementChild",
            ErrorCode::ClosingOfElementWithOpenChildElements => {
                "closingOfElementWithOpenChildElements"
            }
            ErrorCode::DisallowedContentInNoscriptInHead => "disallowedContentInNoscriptInHead",
            ErrorCode::EndTagWithoutMatchingOpenElement => "endTagWithoutMatchingOpenElement",
            ErrorCode::EofInElementThatCanContainOnlyText => "eofInElementThatCanContainOnlyText",
            ErrorCode::MisplacedDoctype => "misplacedDoctype",
            ErrorCode::MisplacedStartTagForHeadElement => "misplacedStartTagForHeadElement",
            ErrorCode::MissingDoctype => "missingDoctype",
            ErrorCode::NestedNoscriptInHead => "nestedNoscriptInHead",
            ErrorCode::NonConformingDoctype => "nonConformingDoctype",
            ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus => {
                "nonVoidHtmlElementStartTagWithTrailingSolidus"
            }
            ErrorCode::OpenElementsLeftAfterEof => "openElementsLeftAfterEof",
            ErrorCode::UnexpectedCharacterInTable => "unexpectedCharacterInTable",
            ErrorCode::UnexpectedEndTag => "unexpectedEndTag",
            ErrorCode::UnexpectedNullCharacter => "unexpectedNullCharacter",
            ErrorCode::UnexpectedStartTag => "unexpectedStartTag",
            ErrorCode::UnexpectedToken => "unexpectedToken",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parse-error record delivered to [`TreeSink::parse_error`].
///
/// The span covers the token that triggered the condition; for "before
/// token" conditions it is collapsed to the token's start (end == start).
/// Spans are all-zero when the tokenizer does not track positions.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct ParseError {
    pub code: ErrorCode,
    pub span: SourceSpan,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.code, self.span.start.line, self.span.start.column
        )
    }
}

/// Source positions attached to a node when location tracking is enabled.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct NodeLocation {
    /// For elements, the start tag; for text and comments, the token span
    /// (extended over every contributing character token).
    pub span: SourceSpan,
    /// The matching end tag, if the element was closed by one.
    pub end_tag: Option<SourceSpan>,
    /// Per-attribute spans, index-parallel with the start tag's attributes.
    pub attrs: Vec<SourceSpan>,
}

/// A constraint on element names: the sink hands out borrows of whatever it
/// stores, as long as namespace and local name can be read off it.
pub trait ElemName: fmt::Debug {
    fn ns(&self) -> &Namespace;
    fn local_name(&self) -> &LocalName;

    #[inline]
    fn expanded(&self) -> ExpandedName<'_> {
        ExpandedName {
            ns: self.ns(),
            local: self.local_name(),
        }
    }
}

impl ElemName for ExpandedName<'_> {
    #[inline]
    fn ns(&self) -> &Namespace {
        self.ns
    }

    #[inline]
    fn local_name(&self) -> &LocalName {
        self.local
    }
}

impl<T: ElemName> ElemName for &T {
    #[inline]
    fn ns(&self) -> &Namespace {
        (*self).ns()
    }

    #[inline]
    fn local_name(&self) -> &LocalName {
        (*self).local_name()
    }
}

/// Flags to the sink for special element kinds, passed at creation time so
/// the sink never has to re-derive them from the tag.
#[derive(Copy, Clone, Default)]
pub struct ElementFlags {
    /// A `<template>` element: the sink should allocate the template
    /// contents fragment that [`TreeSink::get_template_contents`] returns.
    pub template: bool,

    /// A MathML `<annotation-xml>` whose `encoding` attribute is an ASCII
    /// case-insensitive match for `text/html` or `application/xhtml+xml`.
    /// The sink reports this back through
    /// [`TreeSink::is_mathml_annotation_xml_integration_point`].
    pub mathml_annotation_xml_integration_point: bool,
}

/// Create an element, computing its [`ElementFlags`] from the name and
/// attributes.
pub fn create_element<Sink>(sink: &Sink, name: QualName, attrs: Vec<Attribute>) -> Sink::Handle
where
    Sink: TreeSink,
{
    let mut flags = ElementFlags::default();
    match name.expanded() {
        expanded_name!(html "template") => flags.template = true,
        expanded_name!(mathml "annotation-xml") => {
            flags.mathml_annotation_xml_integration_point = attrs.iter().any(|attr| {
                attr.name.expanded() == expanded_name!("", "encoding")
                    && (attr.value.eq_ignore_ascii_case("text/html")
                        || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
            })
        }
        _ => {}
    }
    sink.create_element(name, attrs, flags)
}

/// Methods a parse tree provider must support. Each method has a default
/// implementation or is required; the location hooks default to no-ops so
/// sinks that do not record positions pay nothing.
pub trait TreeSink {
    /// `Handle` is a reference to a DOM node. The tree builder requires
    /// that a `Handle` implements `Clone` to get another reference to
    /// the same node.
    type Handle: Clone;

    /// The overall result of parsing.
    type Output;

    /// The element-name view handed out by [`Self::elem_name`].
    type ElemName<'a>: ElemName
    where
        Self: 'a;

    /// Consume this sink and return the overall result of parsing.
    fn finish(self) -> Self::Output;

    /// Signal a parse error.
    fn parse_error(&self, error: ParseError);

    /// Get a handle to the `Document` node.
    fn get_document(&self) -> Self::Handle;

    /// What is the name of this element?
    ///
    /// Should never be called on a non-element node; feel free to `panic!`.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a>;

    /// Create an element.
    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle;

    /// Create a comment node.
    fn create_comment(&self, text: StrTendril) -> Self::Handle;

    /// Append a node as the last child of the given node. If this would
    /// produce adjacent sibling text nodes, it should concatenate the text
    /// instead.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>);

    /// When the insertion point is decided by the existence of a parent
    /// node of the element, we consider both possibilities and send the
    /// element which will be used if a parent node exists, along with the
    /// element to be used if there isn't one.
    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    );

    /// Append a `DOCTYPE` element to the `Document` node.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    );

    /// Append a node as the sibling immediately before the given node.
    ///
    /// The tree builder promises that `sibling` is not a text node. However
    /// its old previous sibling, which would become the new node's previous
    /// sibling, could be a text node. If the new node is also a text node,
    /// the two should be merged, as in the behavior of `append`.
    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>);

    /// Detach the given node from its parent.
    fn remove_from_parent(&self, target: &Self::Handle);

    /// Remove all the children from `node` and append them to `new_parent`.
    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle);

    /// Add each attribute to the given element, if no attribute with that
    /// name already exists. The tree builder promises this will never be
    /// called with something else than an element.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>);

    /// Associate the given form-associatable element with the form element.
    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    /// Get a handle to a template's template contents. The tree builder
    /// promises this will never be called with something else than a
    /// template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle;

    /// Do two handles refer to the same node?
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool;

    /// Set the document's quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode);

    /// Mark a HTML `<script>` as "already started".
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Indicate that a node was popped off the stack of open elements.
    fn pop(&self, _node: &Self::Handle) {}

    /// Returns true if the adjusted current node is an HTML integration
    /// point and the token is a start tag.
    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    /// The span of the token currently being processed. Only called when
    /// location tracking is enabled; lets the sink extend coalesced text
    /// nodes from their first contributing token to their last.
    fn set_current_location(&self, _span: SourceSpan) {}

    /// Record the start-tag span (and per-attribute spans) of a freshly
    /// inserted node. Only called when location tracking is enabled.
    fn set_start_location(
        &self,
        _node: &Self::Handle,
        _start_tag: SourceSpan,
        _attrs: &[SourceSpan],
    ) {
    }

    /// Record the end-tag span of a node leaving the stack of open
    /// elements. A zero-length span means the element was not closed by a
    /// matching end tag. `<body>` and the root `<html>` element are
    /// reported when the parser leaves the body and again at EOF; the
    /// first report is the authoritative one. Only called when location
    /// tracking is enabled.
    fn set_end_location(&self, _node: &Self::Handle, _end_tag: SourceSpan) {}
}

/// Trace hooks for a garbage-collected DOM.
pub trait Tracer {
    type Handle;

    /// Upon a call to `trace_handles`, the tree builder will call this
    /// method for each handle in its internal state.
    fn trace_handle(&self, node: &Self::Handle);
}
