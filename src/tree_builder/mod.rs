// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML5 tree builder.
//!
//! [`TreeBuilder`] owns the tree-construction state — the insertion mode,
//! the stack of open elements, the list of active formatting elements, the
//! element pointers and flags — and turns the tokens pushed into it into
//! [`TreeSink`] calls. The per-mode rules live in `rules.rs`; this module
//! carries the machinery those rules lean on: node insertion and the
//! foster-parenting location logic, the adoption agency, formatting
//! reconstruction, implied end tags, scope queries, the foreign-content
//! dispatch test and attribute fix-ups, and source-location bookkeeping.

pub use crate::interface::{create_element, ElemName, ElementFlags, Tracer, TreeSink};
pub use crate::interface::{AppendNode, AppendText, Attribute, NodeOrText};
pub use crate::interface::{ErrorCode, ParseError};
pub use crate::interface::{LimitedQuirks, NoQuirks, Quirks, QuirksMode};

use self::formatting::{ActiveFormattingList, FormatEntry};
use self::stack::OpenElemStack;
use self::types::*;

use crate::interface::SourceSpan;
use crate::tendril::StrTendril;
use crate::expanded_name;
use crate::{ExpandedName, LocalName, Namespace, Prefix, QualName};

use crate::tokenizer;
use crate::tokenizer::states as tok_state;
use crate::tokenizer::{Doctype, EndTag, StartTag, Tag, TokenSink, TokenSinkResult};

use std::cell::{Cell, Ref, RefCell};

use crate::tree_builder::tag_sets::*;

#[macro_use]
mod tag_sets;

mod data;
mod formatting;
mod rules;
mod stack;
mod types;

/// Tree builder options, with an impl for Default.
#[derive(Copy, Clone)]
pub struct TreeBuilderOpts {
    /// Is scripting enabled?
    ///
    /// With scripting on, `<noscript>` content is opaque text; with it
    /// off, the content is parsed as markup.
    pub scripting_enabled: bool,

    /// Initial quirks mode, before any DOCTYPE is seen. Default: NoQuirks
    pub quirks_mode: QuirksMode,

    /// Is this document the `srcdoc` of an `<iframe>`? Such documents
    /// never leave no-quirks mode, whatever their DOCTYPE.
    pub iframe_srcdoc: bool,

    /// Leave the DOCTYPE (if any) out of the tree?
    pub drop_doctype: bool,

    /// Report node positions to the sink through the location hooks?
    /// Default: false
    pub source_code_location_info: bool,
}

impl Default for TreeBuilderOpts {
    fn default() -> TreeBuilderOpts {
        TreeBuilderOpts {
            scripting_enabled: true,
            quirks_mode: NoQuirks,
            iframe_srcdoc: false,
            drop_doctype: false,
            source_code_location_info: false,
        }
    }
}

/// The tree builder: tokens in, sink calls out.
pub struct TreeBuilder<Handle, Sink> {
    /// Configuration, fixed at construction time.
    opts: TreeBuilderOpts,

    /// Where every tree mutation goes.
    pub sink: Sink,

    /// The `Document` node the sink gave us.
    doc_handle: Handle,

    // Dispatch state.
    /// Insertion mode.
    mode: Cell<InsertionMode>,
    /// The mode to go back to when Text or InTableText finishes.
    orig_mode: Cell<Option<InsertionMode>>,
    /// One entry per open `<template>`, innermost last.
    template_modes: RefCell<Vec<InsertionMode>>,
    /// Character runs held back while deciding whether table text needs
    /// fostering.
    pending_table_text: RefCell<Vec<Input>>,

    // The construction stacks.
    /// Stack of open elements, most recently added at end.
    open_elems: RefCell<OpenElemStack<Handle>>,
    /// List of active formatting elements.
    active_formatting: RefCell<ActiveFormattingList<Handle>>,

    // Element pointers.
    /// Head element pointer.
    head_elem: RefCell<Option<Handle>>,
    /// Form element pointer.
    form_elem: RefCell<Option<Handle>>,
    /// The context element when parsing a fragment.
    context_elem: RefCell<Option<Handle>>,

    // Flags.
    /// The quirks mode the DOCTYPE classifier settled on.
    quirks_mode: Cell<QuirksMode>,
    /// May a `<frameset>` still replace the body?
    frameset_ok: Cell<bool>,
    /// Swallow one upcoming U+000A (after `<pre>` and friends)?
    ignore_lf: Cell<bool>,
    /// Reroute table-adjacent insertions around the table?
    foster_parenting: Cell<bool>,

    // Location bookkeeping.
    /// Span of the token currently being processed.
    current_span: Cell<SourceSpan>,
    /// Name of the end tag currently being processed, for deciding whether
    /// a popped element was closed by its matching end tag.
    current_end_tag: RefCell<Option<LocalName>>,
    // WARNING: If you add new fields that contain Handles, you
    // must add them to trace_handles() below to preserve memory
    // safety!
}

impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    /// Create a new tree builder which sends tree modifications to a
    /// particular `TreeSink`.
    ///
    /// The tree builder is also a `TokenSink`.
    pub fn new(sink: Sink, opts: TreeBuilderOpts) -> TreeBuilder<Handle, Sink> {
        Self::bootstrap(sink, opts, None, None)
    }

    /// Create a new tree builder for the fragment parsing algorithm: the
    /// sink-provided context element decides the initial insertion mode
    /// (and the template-mode stack), and a root `<html>` element is
    /// installed for the fragment's content.
    ///
    /// Like [`TreeBuilder::new`], the result is the `TokenSink` a
    /// tokenizer feeds.
    pub fn new_for_fragment(
        sink: Sink,
        context: Handle,
        form: Option<Handle>,
        opts: TreeBuilderOpts,
    ) -> TreeBuilder<Handle, Sink> {
        let tb = Self::bootstrap(sink, opts, Some(context), form);

        // https://html.spec.whatwg.org/multipage/#parsing-html-fragments
        // The stack of open elements starts out holding just a root html
        // element, and the insertion mode is reset for the context.
        tb.create_root(vec![]);
        let mode = tb.reset_insertion_mode();
        tb.mode.set(mode);

        tb
    }

    fn bootstrap(
        sink: Sink,
        opts: TreeBuilderOpts,
        context_elem: Option<Handle>,
        form_elem: Option<Handle>,
    ) -> TreeBuilder<Handle, Sink> {
        let doc_handle = sink.get_document();
        let template_modes = match &context_elem {
            Some(context)
                if sink.elem_name(context).expanded() == expanded_name!(html "template") =>
            {
                vec![InsertionMode::InTemplate]
            }
            _ => vec![],
        };

        TreeBuilder {
            opts,
            sink,
            doc_handle,
            mode: Cell::new(InsertionMode::Initial),
            orig_mode: Cell::new(None),
            template_modes: RefCell::new(template_modes),
            pending_table_text: Default::default(),
            open_elems: RefCell::new(OpenElemStack::new()),
            active_formatting: RefCell::new(ActiveFormattingList::new()),
            head_elem: Default::default(),
            form_elem: RefCell::new(form_elem),
            context_elem: RefCell::new(context_elem),
            quirks_mode: Cell::new(opts.quirks_mode),
            frameset_ok: Cell::new(true),
            ignore_lf: Default::default(),
            foster_parenting: Default::default(),
            current_span: Default::default(),
            current_end_tag: Default::default(),
        }
    }

    /// The lexical state a fragment host must start its tokenizer in.
    ///
    /// <https://html.spec.whatwg.org/multipage/#concept-frag-parse-context>
    pub fn tokenizer_state_for_context_elem(
        &self,
        context_element_allows_scripting: bool,
    ) -> tok_state::State {
        let context = self.context_elem.borrow();
        let context = context.as_ref().expect("not parsing a fragment");
        let name = self.sink.elem_name(context);
        if *name.ns() != ns!(html) {
            return tok_state::Data;
        }
        use crate::tokenizer::states::{Rawtext, Rcdata, ScriptData};
        let raw = |kind| tok_state::RawData(kind);
        match *name.local_name() {
            local_name!("title") | local_name!("textarea") => raw(Rcdata),
            local_name!("style") | local_name!("xmp") | local_name!("iframe") => raw(Rawtext),
            local_name!("noembed") | local_name!("noframes") => raw(Rawtext),
            local_name!("noscript") if context_element_allows_scripting => raw(Rawtext),
            local_name!("script") => raw(ScriptData),
            local_name!("plaintext") => tok_state::Plaintext,
            _ => tok_state::Data,
        }
    }

    /// Call the `Tracer`'s `trace_handle` method on every `Handle` in the
    /// tree builder's internal state. This is intended to support
    /// garbage-collected DOMs.
    pub fn trace_handles(&self, tracer: &dyn Tracer<Handle = Handle>) {
        tracer.trace_handle(&self.doc_handle);

        for elem in self.open_elems.borrow().iter() {
            tracer.trace_handle(elem);
        }
        for elem in self.active_formatting.borrow().elements() {
            tracer.trace_handle(elem);
        }
        for pointer in [&self.head_elem, &self.form_elem, &self.context_elem] {
            if let Some(elem) = pointer.borrow().as_ref() {
                tracer.trace_handle(elem);
            }
        }
    }

    /// Are we parsing a HTML fragment?
    pub fn is_fragment(&self) -> bool {
        self.context_elem.borrow().is_some()
    }
}

impl<Handle, Sink> TokenSink for TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    type Handle = Handle;

    fn process_token(
        &self,
        token: tokenizer::Token,
        span: SourceSpan,
    ) -> TokenSinkResult<Handle> {
        self.current_span.set(span);
        if self.opts.source_code_location_info {
            self.sink.set_current_location(span);
        }
        let suppress_lf = self.ignore_lf.take();

        let input = match token {
            tokenizer::ParseErrorToken { error, .. } => {
                self.sink.parse_error(error);
                return TokenSinkResult::Continue;
            }
            tokenizer::DoctypeToken(dt) => {
                self.process_doctype(dt);
                return TokenSinkResult::Continue;
            }
            tokenizer::CharacterTokens(mut text) => {
                if suppress_lf && text.starts_with("\n") {
                    text.pop_front(1);
                }
                return self.process_character_runs(text);
            }
            tokenizer::TagToken(tag) => Input::Tag(tag),
            tokenizer::CommentToken(text) => Input::Comment(text),
            tokenizer::NullCharacterToken => Input::Null,
            tokenizer::EOFToken => Input::Eof,
        };

        self.run(input)
    }

    fn end(&self) {
        let eof_span = self.current_span.get().collapsed_to_start();
        let mut open_elems = self.open_elems.borrow_mut();
        for elem in open_elems.drain_top_down() {
            if self.opts.source_code_location_info {
                self.sink.set_end_location(&elem, eof_span);
            }
            self.sink.pop(&elem);
        }
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        if self.open_elems.borrow().is_empty() {
            return false;
        }
        *self.sink.elem_name(&self.adjusted_current_node()).ns() != ns!(html)
    }
}

/// Does a freshly created element join the stack of open elements?
pub(crate) enum PushFlag {
    Push,
    NoPush,
}

/// Where the adoption agency re-files the replacement formatting entry.
enum Bookmark<Handle> {
    /// Take the original entry's slot.
    Replace(Handle),
    /// Go just after this entry.
    InsertAfter(Handle),
}

/// Whether one pass of the adoption agency settled the subject.
enum AgencyOutcome {
    Finished,
    RunAgain,
}

const ADOPTION_AGENCY_OUTER_LIMIT: usize = 8;
const ADOPTION_AGENCY_INNER_LIMIT: usize = 3;

pub(crate) fn tag_error_code(tag: &Tag) -> ErrorCode {
    match tag.kind {
        StartTag => ErrorCode::UnexpectedStartTag,
        EndTag => ErrorCode::UnexpectedEndTag,
    }
}

impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    /// Put one input through the rules until it has been consumed,
    /// following mode switches, and translate the final directive for the
    /// tokenizer.
    fn run(&self, mut input: Input) -> TokenSinkResult<Handle> {
        loop {
            let awaiting_ack = matches!(
                input,
                Input::Tag(Tag {
                    kind: StartTag,
                    self_closing: true,
                    ..
                })
            );
            if self.opts.source_code_location_info {
                *self.current_end_tag.borrow_mut() = match &input {
                    Input::Tag(tag) if tag.kind == EndTag => Some(tag.name.clone()),
                    _ => None,
                };
            }

            let directive = if self.should_use_foreign_rules(&input) {
                self.step_foreign_content(input)
            } else {
                self.step(self.mode.get(), input)
            };

            match directive {
                Directive::Processed => {
                    if awaiting_ack {
                        self.parse_error(ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus);
                    }
                    return TokenSinkResult::Continue;
                }
                Directive::ProcessedSelfClosing => return TokenSinkResult::Continue,
                Directive::Redispatch(mode, redo) => {
                    self.mode.set(mode);
                    input = redo;
                }
                Directive::PauseForScript(script) => return TokenSinkResult::Script(script),
                Directive::EnterPlaintext => return TokenSinkResult::Plaintext,
                Directive::EnterRawText(kind) => return TokenSinkResult::RawData(kind),
            }
        }
    }

    /// Chop character data into maximal whitespace / non-whitespace runs
    /// and feed them through one at a time. Character runs never pause the
    /// tokenizer, so the result is `Continue` throughout.
    fn process_character_runs(&self, mut text: StrTendril) -> TokenSinkResult<Handle> {
        let mut result = TokenSinkResult::Continue;
        while let Some((run, is_whitespace)) = text.pop_front_char_run(|c| c.is_ascii_whitespace())
        {
            let input = if is_whitespace {
                Input::Whitespace(run)
            } else {
                Input::Text(run)
            };
            result = self.run(input);
        }
        result
    }

    /// A DOCTYPE is meaningful only before anything else: classify it,
    /// record it on the document, and set the quirks mode. Anywhere later
    /// it is a stray.
    fn process_doctype(&self, dt: Doctype) {
        if self.mode.get() != InsertionMode::Initial {
            self.parse_error(ErrorCode::MisplacedDoctype);
            return;
        }

        let (err, quirks) = data::doctype_error_and_quirks(&dt, self.opts.iframe_srcdoc);
        if err {
            self.parse_error(ErrorCode::NonConformingDoctype);
        }
        if !self.opts.drop_doctype {
            self.sink.append_doctype_to_document(
                dt.name.unwrap_or_default(),
                dt.public_id.unwrap_or_default(),
                dt.system_id.unwrap_or_default(),
            );
        }
        self.set_quirks_mode(quirks);
        self.mode.set(InsertionMode::BeforeHtml);
    }

    //§ error-reporting
    fn parse_error(&self, code: ErrorCode) {
        self.sink.parse_error(ParseError {
            code,
            span: self.current_span.get(),
        });
    }

    /// Report a condition detected before the current token: the span
    /// collapses to the token's start.
    fn parse_error_before_token(&self, code: ErrorCode) {
        self.sink.parse_error(ParseError {
            code,
            span: self.current_span.get().collapsed_to_start(),
        });
    }

    fn report_unexpected(&self, input: &Input) -> Directive<Handle> {
        self.parse_error(match input {
            Input::Tag(tag) => tag_error_code(tag),
            Input::Null => ErrorCode::UnexpectedNullCharacter,
            _ => ErrorCode::UnexpectedToken,
        });
        Directive::Processed
    }

    fn report_unexpected_tag(&self, tag: &Tag) -> Directive<Handle> {
        self.parse_error(tag_error_code(tag));
        Directive::Processed
    }
    //§ END

    //§ node-queries
    fn current_node(&self) -> Ref<'_, Handle> {
        Ref::map(self.open_elems.borrow(), |stack| stack.current())
    }

    /// The current node, except that with only the root open during a
    /// fragment parse, the context element stands in.
    fn adjusted_current_node(&self) -> Ref<'_, Handle> {
        if self.open_elems.borrow().len() == 1 {
            let context = self.context_elem.borrow();
            if let Ok(context) = Ref::filter_map(context, |c| c.as_ref()) {
                return context;
            }
        }
        self.current_node()
    }

    fn current_node_in<TagSet>(&self, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.elem_in(&self.current_node(), set)
    }

    fn current_node_named(&self, name: LocalName) -> bool {
        self.html_elem_named(&self.current_node(), name)
    }

    fn elem_in<TagSet>(&self, elem: &Handle, set: TagSet) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        set(self.sink.elem_name(elem).expanded())
    }

    fn html_elem_named(&self, elem: &Handle, local: LocalName) -> bool {
        let name = self.sink.elem_name(elem);
        name.expanded()
            == ExpandedName {
                ns: &ns!(html),
                local: &local,
            }
    }

    fn in_html_elem_named(&self, local: LocalName) -> bool {
        let stack = self.open_elems.borrow();
        stack
            .iter()
            .any(|elem| self.html_elem_named(elem, local.clone()))
    }

    /// Get the first element on the stack, which will be the <html>
    /// element.
    fn html_elem(&self) -> Ref<'_, Handle> {
        Ref::map(self.open_elems.borrow(), |stack| &stack[0])
    }

    /// Get the second element on the stack, if it's a HTML body element.
    fn body_elem(&self) -> Option<Ref<'_, Handle>> {
        if self.open_elems.borrow().len() < 2 {
            return None;
        }
        let second = Ref::map(self.open_elems.borrow(), |stack| &stack[1]);
        self.html_elem_named(&second, local_name!("body"))
            .then_some(second)
    }

    fn in_scope<TagSet, Pred>(&self, scope: TagSet, pred: Pred) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
        Pred: Fn(Handle) -> bool,
    {
        self.open_elems.borrow().in_scope(&self.sink, scope, pred)
    }

    fn in_scope_named<TagSet>(&self, scope: TagSet, name: LocalName) -> bool
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.in_scope(scope, |node| self.html_elem_named(&node, name.clone()))
    }

    fn position_in_active_formatting(&self, element: &Handle) -> Option<usize> {
        self.active_formatting
            .borrow()
            .position_of(&self.sink, element)
    }

    fn is_marker_or_open(&self, entry: &FormatEntry<Handle>) -> bool {
        match *entry {
            FormatEntry::Marker => true,
            FormatEntry::Element(ref node, _) => {
                self.open_elems.borrow().contains(&self.sink, node)
            }
        }
    }

    // Check <input> tags for type=hidden
    fn is_type_hidden(&self, tag: &Tag) -> bool {
        tag.get_attribute(&local_name!("type"))
            .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
    }
    //§ END

    //§ stack-maintenance
    fn push(&self, elem: &Handle) {
        self.open_elems.borrow_mut().push(elem.clone());
    }

    fn pop(&self) -> Handle {
        let popped = self.open_elems.borrow_mut().pop();
        let elem = popped.expect("popped an empty stack of open elements");
        self.attach_end_location(&elem);
        self.sink.pop(&elem);
        elem
    }

    fn remove_from_stack(&self, elem: &Handle) {
        let position = self.open_elems.borrow().position_of(&self.sink, elem);
        if let Some(position) = position {
            self.open_elems.borrow_mut().remove(position);
            self.attach_end_location(elem);
            self.sink.pop(elem);
        }
    }

    /// <https://html.spec.whatwg.org/#generate-implied-end-tags>
    fn generate_implied_end_tags<TagSet>(&self, set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        while self
            .open_elems
            .borrow()
            .last()
            .is_some_and(|elem| set(self.sink.elem_name(elem).expanded()))
        {
            self.pop();
        }
    }

    fn generate_implied_end_tags_except(&self, keep_open: LocalName) {
        self.generate_implied_end_tags(|name| {
            if *name.ns == ns!(html) && *name.local == keep_open {
                false
            } else {
                cursory_implied_end(name)
            }
        });
    }

    // Pop elements until an element from the set has been popped. Returns
    // the number of elements popped.
    fn pop_until<TagSet>(&self, set: TagSet) -> usize
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        let mut n = 0;
        loop {
            n += 1;
            if self.open_elems.borrow().is_empty() {
                break;
            }
            let elem = self.pop();
            if set(self.sink.elem_name(&elem).expanded()) {
                break;
            }
        }
        n
    }

    fn pop_until_named(&self, name: LocalName) -> usize {
        self.pop_until(|n| *n.ns == ns!(html) && *n.local == name)
    }

    /// Pop until `name` has been popped, reporting if anything else had to
    /// be closed on the way out.
    fn close_element(&self, name: LocalName) {
        if self.pop_until_named(name) != 1 {
            self.parse_error_before_token(ErrorCode::ClosingOfElementWithOpenChildElements);
        }
    }

    // Drop elements (without closing them) until the current node is in
    // the set.
    fn pop_to_current_in<TagSet>(&self, set: TagSet)
    where
        TagSet: Fn(ExpandedName) -> bool,
    {
        while !self.current_node_in(&set) {
            self.open_elems.borrow_mut().pop();
        }
    }

    fn clear_back_to_table_context(&self) {
        self.pop_to_current_in(table_scope);
    }

    fn clear_back_to_table_body_context(&self) {
        self.pop_to_current_in(table_body_context);
    }

    fn clear_back_to_table_row_context(&self) {
        self.pop_to_current_in(table_row_context);
    }

    fn close_p_element(&self) {
        declare_tag_set!(implied_except_p = [cursory_implied_end] - "p");
        self.generate_implied_end_tags(implied_except_p);
        self.close_element(local_name!("p"));
    }

    fn close_p_element_in_button_scope(&self) {
        if !self.in_scope_named(button_scope, local_name!("p")) {
            return;
        }
        self.close_p_element();
    }

    fn close_the_cell(&self) {
        self.generate_implied_end_tags(cursory_implied_end);
        if self.pop_until(td_th) != 1 {
            self.parse_error_before_token(ErrorCode::ClosingOfElementWithOpenChildElements);
        }
        self.clear_active_formatting_to_marker();
    }

    /// At the end of the body (or at EOF), anything still open beyond the
    /// harmless implied set gets one report.
    fn note_elements_left_open(&self) {
        declare_tag_set!(implied_open_ok =
            "body" "dd" "dt" "html" "li" "optgroup" "option" "p" "rb" "rp" "rt" "rtc"
            "tbody" "td" "tfoot" "th" "thead" "tr");

        let all_ok = self
            .open_elems
            .borrow()
            .iter()
            .all(|elem| self.elem_in(elem, implied_open_ok));
        if !all_ok {
            self.parse_error_before_token(ErrorCode::OpenElementsLeftAfterEof);
        }
    }
    //§ END

    //§ creating-and-inserting-nodes
    /// <https://html.spec.whatwg.org/multipage/#appropriate-place-for-inserting-a-node>
    fn appropriate_place_for_insertion(
        &self,
        override_target: Option<Handle>,
    ) -> InsertionPoint<Handle> {
        declare_tag_set!(fosters_content = "table" "tbody" "tfoot" "thead" "tr");

        let target = override_target.unwrap_or_else(|| self.current_node().clone());
        if self.foster_parenting.get() && self.elem_in(&target, fosters_content) {
            // Walk down for the table. A template on the way swallows the
            // fostered content itself; without a table, the root catches
            // it.
            let stack = self.open_elems.borrow();
            for (index, elem) in stack.iter().enumerate().rev() {
                if self.html_elem_named(elem, local_name!("template")) {
                    return InsertionPoint::AppendTo(self.sink.get_template_contents(elem));
                }
                if self.html_elem_named(elem, local_name!("table")) {
                    return InsertionPoint::FosterBeside {
                        table: elem.clone(),
                        below_table: stack[index - 1].clone(),
                    };
                }
            }
            return InsertionPoint::AppendTo(stack[0].clone());
        }

        if self.html_elem_named(&target, local_name!("template")) {
            InsertionPoint::AppendTo(self.sink.get_template_contents(&target))
        } else {
            InsertionPoint::AppendTo(target)
        }
    }

    fn insert_at(&self, point: InsertionPoint<Handle>, child: NodeOrText<Handle>) {
        match point {
            InsertionPoint::AppendTo(parent) => self.sink.append(&parent, child),
            InsertionPoint::FosterBeside { table, below_table } => {
                self.sink
                    .append_based_on_parent_node(&table, &below_table, child)
            }
        }
    }

    // Insert at the "appropriate place for inserting a node".
    fn insert_appropriately(&self, child: NodeOrText<Handle>, override_target: Option<Handle>) {
        let point = self.appropriate_place_for_insertion(override_target);
        self.insert_at(point, child);
    }

    fn append_text(&self, text: StrTendril) -> Directive<Handle> {
        self.insert_appropriately(AppendText(text), None);
        Directive::Processed
    }

    fn append_comment(&self, text: StrTendril) -> Directive<Handle> {
        let comment = self.sink.create_comment(text);
        self.insert_appropriately(AppendNode(comment), None);
        Directive::Processed
    }

    fn append_comment_to_doc(&self, text: StrTendril) -> Directive<Handle> {
        let comment = self.sink.create_comment(text);
        self.sink.append(&self.doc_handle, AppendNode(comment));
        Directive::Processed
    }

    fn append_comment_to_root(&self, text: StrTendril) -> Directive<Handle> {
        let root = self.html_elem().clone();
        let comment = self.sink.create_comment(text);
        self.sink.append(&root, AppendNode(comment));
        Directive::Processed
    }

    fn create_root(&self, attrs: Vec<Attribute>) -> Handle {
        let root = create_element(
            &self.sink,
            QualName::new(None, ns!(html), local_name!("html")),
            attrs,
        );
        self.push(&root);
        self.sink.append(&self.doc_handle, AppendNode(root.clone()));
        root
    }

    /// <https://html.spec.whatwg.org/multipage/#create-an-element-for-the-token>
    fn insert_element(
        &self,
        push: PushFlag,
        ns: Namespace,
        local: LocalName,
        attrs: Vec<Attribute>,
    ) -> Handle {
        let qname = QualName::new(None, ns, local);
        let elem = create_element(&self.sink, qname.clone(), attrs.clone());

        let point = self.appropriate_place_for_insertion(None);
        self.associate_with_open_form(&elem, &qname, &attrs, &point);
        self.insert_at(point, AppendNode(elem.clone()));

        if let PushFlag::Push = push {
            self.push(&elem);
        }
        elem
    }

    /// The form-owner step of element creation: form-associatable elements
    /// pick up the open form, unless a template is open or the token names
    /// an explicit owner.
    fn associate_with_open_form(
        &self,
        elem: &Handle,
        qname: &QualName,
        attrs: &[Attribute],
        point: &InsertionPoint<Handle>,
    ) {
        declare_tag_set!(form_associatable =
            "button" "fieldset" "img" "input" "object" "output" "select" "textarea");
        declare_tag_set!(listed = [form_associatable] - "img");

        if !form_associatable(qname.expanded()) {
            return;
        }
        let Some(form) = self.form_elem.borrow().as_ref().cloned() else {
            return;
        };
        if self.in_html_elem_named(local_name!("template")) {
            return;
        }
        if listed(qname.expanded())
            && attrs
                .iter()
                .any(|a| a.name.expanded() == expanded_name!("", "form"))
        {
            return;
        }

        let nodes = match point {
            InsertionPoint::AppendTo(parent) => (parent, None),
            InsertionPoint::FosterBeside { table, below_table } => (table, Some(below_table)),
        };
        self.sink.associate_with_form(elem, &form, nodes);
    }

    fn insert_element_for(&self, tag: Tag) -> Handle {
        let Tag {
            name,
            attrs,
            attr_spans,
            ..
        } = tag;
        let elem = self.insert_element(PushFlag::Push, ns!(html), name, attrs);
        self.attach_start_location(&elem, &attr_spans);
        elem
    }

    /// Insert an element that never takes children: it goes into the tree
    /// but not onto the stack.
    fn insert_void_element_for(&self, tag: Tag) -> Handle {
        let Tag {
            name,
            attrs,
            attr_spans,
            ..
        } = tag;
        let elem = self.insert_element(PushFlag::NoPush, ns!(html), name, attrs);
        self.attach_start_location(&elem, &attr_spans);
        elem
    }

    /// Insert an element the markup never named (the implied `<head>`,
    /// `<body>`, `<colgroup>`, ...).
    fn insert_implied(&self, name: LocalName) -> Handle {
        self.insert_element(PushFlag::Push, ns!(html), name, vec![])
    }

    fn insert_formatting_element_for(&self, tag: Tag) -> Handle {
        let (name, attrs) = (tag.name.clone(), tag.attrs.clone());
        let elem = self.insert_element(PushFlag::Push, ns!(html), name, attrs);
        self.attach_start_location(&elem, &tag.attr_spans);
        self.active_formatting
            .borrow_mut()
            .push_element(elem.clone(), tag);
        elem
    }

    /// The shared tail of foreign-element insertion: a self-closing tag
    /// only touches the tree, anything else opens an element.
    fn insert_foreign_element(&self, tag: Tag, ns: Namespace) -> Directive<Handle> {
        let Tag {
            name,
            attrs,
            attr_spans,
            self_closing,
            ..
        } = tag;
        let push = if self_closing {
            PushFlag::NoPush
        } else {
            PushFlag::Push
        };
        let elem = self.insert_element(push, ns, name, attrs);
        self.attach_start_location(&elem, &attr_spans);
        if self_closing {
            Directive::ProcessedSelfClosing
        } else {
            Directive::Processed
        }
    }

    fn clear_active_formatting_to_marker(&self) {
        self.active_formatting.borrow_mut().clear_to_last_marker();
    }
    //§ END

    //§ the-adoption-agency-algorithm
    /// <https://html.spec.whatwg.org/multipage/#adoption-agency-algorithm>
    fn adoption_agency(&self, subject: LocalName) {
        // If the subject is current and not in the formatting list, plain
        // popping is all it takes.
        let bare_subject_is_current = self.current_node_named(subject.clone())
            && self
                .position_in_active_formatting(&self.current_node())
                .is_none();
        if bare_subject_is_current {
            self.pop();
            return;
        }

        for _ in 0..ADOPTION_AGENCY_OUTER_LIMIT {
            if let AgencyOutcome::Finished = self.adoption_agency_pass(&subject) {
                return;
            }
        }
    }

    /// One outer-loop pass of the adoption agency.
    fn adoption_agency_pass(&self, subject: &LocalName) -> AgencyOutcome {
        // The formatting element: the newest matching entry back to the
        // last marker. Without one, the subject is an ordinary end tag.
        let newest = self.active_formatting.borrow().newest_entry_named(subject);
        let Some((entry_index, formatting_elem, formatting_tag)) = newest else {
            self.any_other_end_tag_in_body(Tag {
                kind: EndTag,
                name: subject.clone(),
                self_closing: false,
                attrs: vec![],
                attr_spans: vec![],
            });
            return AgencyOutcome::Finished;
        };

        // An entry whose element is no longer open is stale: drop it.
        let stack_index = self
            .open_elems
            .borrow()
            .position_of(&self.sink, &formatting_elem);
        let Some(stack_index) = stack_index else {
            self.parse_error(ErrorCode::UnexpectedEndTag);
            self.active_formatting.borrow_mut().remove_at(entry_index);
            return AgencyOutcome::Finished;
        };

        if !self.in_scope(default_scope, |elem| {
            self.sink.same_node(&elem, &formatting_elem)
        }) {
            self.parse_error(ErrorCode::UnexpectedEndTag);
            return AgencyOutcome::Finished;
        }
        if !self.sink.same_node(&self.current_node(), &formatting_elem) {
            // Recoverable misnesting: the walk below sorts it out.
            self.parse_error(ErrorCode::UnexpectedEndTag);
        }

        // The furthest block: the lowest special element above the
        // formatting element. With none, the subject closes wholesale.
        let furthest = self
            .open_elems
            .borrow()
            .lowest_match_from(&self.sink, stack_index, special_tag);
        let Some((block_index, furthest_block)) = furthest else {
            self.open_elems.borrow_mut().truncate(stack_index);
            self.active_formatting.borrow_mut().remove_at(entry_index);
            return AgencyOutcome::Finished;
        };

        let common_ancestor = self
            .open_elems
            .borrow()
            .common_ancestor(&self.sink, &formatting_elem)
            .expect("formatting element at the root of the stack");

        // Walk upward from the furthest block toward the formatting
        // element, carrying the detached chain along and re-hanging it
        // under fresh clones of the formatting entries we pass.
        let mut bookmark = Bookmark::Replace(formatting_elem.clone());
        let mut carried = furthest_block.clone();
        let mut above_index = block_index;
        let mut visited = 0usize;
        loop {
            above_index -= 1;
            let node = self.open_elems.borrow()[above_index].clone();
            if self.sink.same_node(&node, &formatting_elem) {
                break;
            }
            visited += 1;

            // Anything that is not an active formatting element — or is
            // too deep in the pile — just drops out of the stack.
            let list_index = self.position_in_active_formatting(&node);
            let Some(list_index) = list_index else {
                self.open_elems.borrow_mut().remove(above_index);
                continue;
            };
            if visited > ADOPTION_AGENCY_INNER_LIMIT {
                self.active_formatting.borrow_mut().remove_at(list_index);
                self.open_elems.borrow_mut().remove(above_index);
                continue;
            }

            let clone = self.refresh_formatting_clone(above_index, list_index);

            if self.sink.same_node(&carried, &furthest_block) {
                bookmark = Bookmark::InsertAfter(clone.clone());
            }

            self.sink.remove_from_parent(&carried);
            self.sink.append(&clone, AppendNode(carried));
            carried = clone;
        }

        // The carried chain lands under the common ancestor (fostered if
        // that is a table part).
        self.sink.remove_from_parent(&carried);
        self.insert_appropriately(AppendNode(carried), Some(common_ancestor));

        // The furthest block gives its children to a fresh clone of the
        // formatting element and adopts that clone as its own child.
        let replacement = create_element(
            &self.sink,
            QualName::new(None, ns!(html), formatting_tag.name.clone()),
            formatting_tag.attrs.clone(),
        );
        self.sink.reparent_children(&furthest_block, &replacement);
        self.sink
            .append(&furthest_block, AppendNode(replacement.clone()));

        // File the replacement's entry at the bookmark and retire the old
        // one; on the stack the replacement sits just above the furthest
        // block.
        let new_entry = FormatEntry::Element(replacement.clone(), formatting_tag);
        match bookmark {
            Bookmark::Replace(slot) => {
                let index = self
                    .position_in_active_formatting(&slot)
                    .expect("adoption agency bookmark vanished");
                self.active_formatting
                    .borrow_mut()
                    .replace_at(index, new_entry);
            }
            Bookmark::InsertAfter(previous) => {
                let index = self
                    .position_in_active_formatting(&previous)
                    .expect("adoption agency bookmark vanished")
                    + 1;
                self.active_formatting
                    .borrow_mut()
                    .insert_at(index, new_entry);
                let stale = self
                    .position_in_active_formatting(&formatting_elem)
                    .expect("replaced formatting entry vanished");
                self.active_formatting.borrow_mut().remove_at(stale);
            }
        }

        self.remove_from_stack(&formatting_elem);
        let block_position = self
            .open_elems
            .borrow()
            .position_of(&self.sink, &furthest_block)
            .expect("furthest block left the stack");
        self.open_elems
            .borrow_mut()
            .insert(block_position + 1, replacement);

        AgencyOutcome::RunAgain
    }

    /// Make a fresh element from the formatting entry at `list_index` and
    /// swap it in for the original, both on the stack (at `stack_index`)
    /// and in the list.
    fn refresh_formatting_clone(&self, stack_index: usize, list_index: usize) -> Handle {
        let tag = match self.active_formatting.borrow().entry(list_index) {
            FormatEntry::Element(_, tag) => tag.clone(),
            FormatEntry::Marker => unreachable!("markers hold no formatting clone"),
        };

        let clone = create_element(
            &self.sink,
            QualName::new(None, ns!(html), tag.name.clone()),
            tag.attrs.clone(),
        );
        self.open_elems
            .borrow_mut()
            .replace(stack_index, clone.clone());
        self.active_formatting
            .borrow_mut()
            .replace_at(list_index, FormatEntry::Element(clone.clone(), tag));
        clone
    }

    /// The "any other end tag" steps of the in-body rules: close the
    /// nearest matching open element, or nothing if a special element
    /// shields it.
    fn any_other_end_tag_in_body(&self, tag: Tag) {
        let found = {
            let stack = self.open_elems.borrow();
            let mut found = None;
            for (index, elem) in stack.iter().enumerate().rev() {
                if self.html_elem_named(elem, tag.name.clone()) {
                    found = Some(index);
                    break;
                }
                if self.elem_in(elem, special_tag) {
                    break;
                }
            }
            found
        };
        let Some(index) = found else {
            self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
            return;
        };

        self.generate_implied_end_tags_except(tag.name.clone());
        if index != self.open_elems.borrow().len() - 1 {
            self.parse_error(ErrorCode::UnexpectedEndTag);
        }
        while self.open_elems.borrow().len() > index {
            self.pop();
        }
    }

    /// A second `<a>` while one is still listed: the open anchor is
    /// adopted shut and dropped before the new one opens.
    fn implicitly_close_open_anchor(&self, tag: &Tag) {
        let open_anchor = self
            .active_formatting
            .borrow()
            .newest_entry_named(&local_name!("a"))
            .map(|(_, handle, _)| handle);
        let Some(anchor) = open_anchor else {
            return;
        };

        self.report_unexpected_tag(tag);
        self.adoption_agency(local_name!("a"));
        if let Some(index) = self.position_in_active_formatting(&anchor) {
            self.active_formatting.borrow_mut().remove_at(index);
        }
        self.remove_from_stack(&anchor);
    }
    //§ END

    //§ reconstructing-the-active-formatting-elements
    /// <https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements>
    ///
    /// Entries newer than the last marker whose elements are no longer
    /// open get re-created, oldest first, each nested in the previous.
    fn reconstruct_active_formatting_elements(&self) {
        let start = {
            let list = self.active_formatting.borrow();
            list.first_index_needing_reopen(|entry| self.is_marker_or_open(entry))
        };
        let Some(start) = start else {
            return;
        };

        let len = self.active_formatting.borrow().len();
        for index in start..len {
            let tag = match self.active_formatting.borrow().entry(index) {
                FormatEntry::Element(_, tag) => tag.clone(),
                FormatEntry::Marker => unreachable!("markers sit below the reopened range"),
            };
            let (name, attrs) = (tag.name.clone(), tag.attrs.clone());
            let reopened = self.insert_element(PushFlag::Push, ns!(html), name, attrs);
            self.active_formatting
                .borrow_mut()
                .replace_at(index, FormatEntry::Element(reopened, tag));
        }
    }
    //§ END

    //§ resetting-the-insertion-mode
    /// <https://html.spec.whatwg.org/multipage/#reset-the-insertion-mode-appropriately>
    fn reset_insertion_mode(&self) -> InsertionMode {
        let stack = self.open_elems.borrow();
        let context = self.context_elem.borrow();
        for (index, elem) in stack.iter().enumerate().rev() {
            let last = index == 0;
            // In the fragment case the root stands in for the context
            // element.
            let node = if last {
                context.as_ref().unwrap_or(elem)
            } else {
                elem
            };
            let name = self.sink.elem_name(node);
            if *name.ns() != ns!(html) {
                continue;
            }
            let mode = match *name.local_name() {
                local_name!("select") => self.reset_mode_for_select(&stack, index),
                local_name!("td") | local_name!("th") if !last => InsertionMode::InCell,
                local_name!("tr") => InsertionMode::InRow,
                local_name!("tbody") | local_name!("thead") | local_name!("tfoot") => {
                    InsertionMode::InTableBody
                }
                local_name!("caption") => InsertionMode::InCaption,
                local_name!("colgroup") => InsertionMode::InColumnGroup,
                local_name!("table") => InsertionMode::InTable,
                local_name!("template") => *self
                    .template_modes
                    .borrow()
                    .last()
                    .expect("open template without a template mode"),
                local_name!("head") if !last => InsertionMode::InHead,
                local_name!("body") => InsertionMode::InBody,
                local_name!("frameset") => InsertionMode::InFrameset,
                local_name!("html") => {
                    if self.head_elem.borrow().is_some() {
                        InsertionMode::AfterHead
                    } else {
                        InsertionMode::BeforeHead
                    }
                }
                _ => continue,
            };
            return mode;
        }
        InsertionMode::InBody
    }

    /// A `<select>` under a `<table>` (with no `<template>` in between)
    /// reverts to the table-aware select mode.
    fn reset_mode_for_select(
        &self,
        stack: &OpenElemStack<Handle>,
        select_index: usize,
    ) -> InsertionMode {
        for ancestor in stack[..select_index].iter().rev() {
            if self.html_elem_named(ancestor, local_name!("template")) {
                break;
            }
            if self.html_elem_named(ancestor, local_name!("table")) {
                return InsertionMode::InSelectInTable;
            }
        }
        InsertionMode::InSelect
    }
    //§ END

    //§ foreign-content-support
    /// Does this input go to the foreign-content rules instead of the
    /// insertion mode? False whenever the adjusted current node is in the
    /// HTML namespace or forms an integration point the input falls into,
    /// and always false at EOF.
    fn should_use_foreign_rules(&self, input: &Input) -> bool {
        if matches!(input, Input::Eof) || self.open_elems.borrow().is_empty() {
            return false;
        }

        let adjusted = self.adjusted_current_node();
        let adjusted_name = self.sink.elem_name(&adjusted);
        let name = adjusted_name.expanded();
        if *name.ns == ns!(html) {
            return false;
        }

        let is_character = matches!(input, Input::Whitespace(_) | Input::Text(_) | Input::Null);
        let start_tag_name = match input {
            Input::Tag(tag) if tag.kind == StartTag => Some(&tag.name),
            _ => None,
        };

        if mathml_text_integration_point(name) {
            if is_character {
                return false;
            }
            if let Some(tag_name) = start_tag_name {
                if !matches!(*tag_name, local_name!("mglyph") | local_name!("malignmark")) {
                    return false;
                }
            }
        }

        if name == expanded_name!(mathml "annotation-xml") {
            if start_tag_name == Some(&local_name!("svg")) {
                return false;
            }
            if (is_character || start_tag_name.is_some())
                && self
                    .sink
                    .is_mathml_annotation_xml_integration_point(&adjusted)
            {
                return false;
            }
        }

        if svg_html_integration_point(name) && (is_character || start_tag_name.is_some()) {
            return false;
        }

        true
    }

    /// Lowercased SVG tag names whose canonical spelling is mixed-case.
    fn adjust_svg_tag_name(&self, tag: &mut Tag) {
        if let Some(&(_, canonical)) = SVG_TAG_NAME_FIXES
            .iter()
            .find(|&&(lowercase, _)| *tag.name == *lowercase)
        {
            tag.name = LocalName::from(canonical);
        }
    }

    /// Lowercased SVG attribute names whose canonical spelling is
    /// mixed-case.
    fn adjust_svg_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            if attr.name.ns != ns!() {
                continue;
            }
            if let Some(&(_, canonical)) = SVG_ATTRIBUTE_FIXES
                .iter()
                .find(|&&(lowercase, _)| *attr.name.local == *lowercase)
            {
                attr.name.local = LocalName::from(canonical);
            }
        }
    }

    fn adjust_mathml_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            if attr.name.local == local_name!("definitionurl") {
                attr.name.local = local_name!("definitionURL");
            }
        }
    }

    /// The namespaced attributes every foreign element may carry: xlink,
    /// xml, and xmlns names get their prefix and namespace back.
    fn adjust_foreign_attributes(&self, tag: &mut Tag) {
        for attr in &mut tag.attrs {
            let adjusted = match &*attr.name.local {
                "xlink:actuate" => ("xlink", ns!(xlink), "actuate"),
                "xlink:arcrole" => ("xlink", ns!(xlink), "arcrole"),
                "xlink:href" => ("xlink", ns!(xlink), "href"),
                "xlink:role" => ("xlink", ns!(xlink), "role"),
                "xlink:show" => ("xlink", ns!(xlink), "show"),
                "xlink:title" => ("xlink", ns!(xlink), "title"),
                "xlink:type" => ("xlink", ns!(xlink), "type"),
                "xml:lang" => ("xml", ns!(xml), "lang"),
                "xml:space" => ("xml", ns!(xml), "space"),
                "xmlns" => ("", ns!(xmlns), "xmlns"),
                "xmlns:xlink" => ("xmlns", ns!(xmlns), "xlink"),
                _ => continue,
            };
            let (prefix, ns, local) = adjusted;
            attr.name = QualName::new(Some(Prefix::from(prefix)), ns, LocalName::from(local));
        }
    }
    //§ END

    //§ source-location-bookkeeping
    fn attach_start_location(&self, elem: &Handle, attr_spans: &[SourceSpan]) {
        if self.opts.source_code_location_info {
            self.sink
                .set_start_location(elem, self.current_span.get(), attr_spans);
        }
    }

    /// Attach an end location to an element leaving the stack: the full
    /// span of a matching end tag, else a zero-length span at the current
    /// token's start.
    fn attach_end_location(&self, elem: &Handle) {
        if !self.opts.source_code_location_info {
            return;
        }
        let span = self.current_span.get();
        let closed_by_end_tag = {
            let name = self.sink.elem_name(elem);
            *name.ns() == ns!(html)
                && self
                    .current_end_tag
                    .borrow()
                    .as_ref()
                    .is_some_and(|end| end == name.local_name())
        };
        let span = if closed_by_end_tag {
            span
        } else {
            span.collapsed_to_start()
        };
        self.sink.set_end_location(elem, span);
    }

    /// `<body>` and the root `<html>` element are never popped; their end
    /// locations are patched when the parser leaves the body.
    fn patch_body_end_location(&self) {
        if !self.opts.source_code_location_info {
            return;
        }
        let Some(body) = self.body_elem().map(|b| b.clone()) else {
            return;
        };
        self.attach_end_location(&body);
    }

    fn patch_html_end_location(&self) {
        if !self.opts.source_code_location_info {
            return;
        }
        if self.open_elems.borrow().is_empty() {
            return;
        }
        let root = self.html_elem().clone();
        self.attach_end_location(&root);
    }
    //§ END

    fn set_quirks_mode(&self, mode: QuirksMode) {
        self.quirks_mode.set(mode);
        self.sink.set_quirks_mode(mode);
    }
}

static SVG_TAG_NAME_FIXES: &[(&str, &str)] = &[
    ("altglyph", "altGlyph"),
    ("altglyphdef", "altGlyphDef"),
    ("altglyphitem", "altGlyphItem"),
    ("animatecolor", "animateColor"),
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomponenttransfer", "feComponentTransfer"),
    ("fecomposite", "feComposite"),
    ("feconvolvematrix", "feConvolveMatrix"),
    ("fediffuselighting", "feDiffuseLighting"),
    ("fedisplacementmap", "feDisplacementMap"),
    ("fedistantlight", "feDistantLight"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fefunca", "feFuncA"),
    ("fefuncb", "feFuncB"),
    ("fefuncg", "feFuncG"),
    ("fefuncr", "feFuncR"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("femorphology", "feMorphology"),
    ("feoffset", "feOffset"),
    ("fepointlight", "fePointLight"),
    ("fespecularlighting", "feSpecularLighting"),
    ("fespotlight", "feSpotLight"),
    ("fetile", "feTile"),
    ("feturbulence", "feTurbulence"),
    ("foreignobject", "foreignObject"),
    ("glyphref", "glyphRef"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

static SVG_ATTRIBUTE_FIXES: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("basefrequency", "baseFrequency"),
    ("baseprofile", "baseProfile"),
    ("calcmode", "calcMode"),
    ("clippathunits", "clipPathUnits"),
    ("diffuseconstant", "diffuseConstant"),
    ("edgemode", "edgeMode"),
    ("filterunits", "filterUnits"),
    ("glyphref", "glyphRef"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("kernelmatrix", "kernelMatrix"),
    ("kernelunitlength", "kernelUnitLength"),
    ("keypoints", "keyPoints"),
    ("keysplines", "keySplines"),
    ("keytimes", "keyTimes"),
    ("lengthadjust", "lengthAdjust"),
    ("limitingconeangle", "limitingConeAngle"),
    ("markerheight", "markerHeight"),
    ("markerunits", "markerUnits"),
    ("markerwidth", "markerWidth"),
    ("maskcontentunits", "maskContentUnits"),
    ("maskunits", "maskUnits"),
    ("numoctaves", "numOctaves"),
    ("pathlength", "pathLength"),
    ("patterncontentunits", "patternContentUnits"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("pointsatx", "pointsAtX"),
    ("pointsaty", "pointsAtY"),
    ("pointsatz", "pointsAtZ"),
    ("preservealpha", "preserveAlpha"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("primitiveunits", "primitiveUnits"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("repeatdur", "repeatDur"),
    ("requiredextensions", "requiredExtensions"),
    ("requiredfeatures", "requiredFeatures"),
    ("specularconstant", "specularConstant"),
    ("specularexponent", "specularExponent"),
    ("spreadmethod", "spreadMethod"),
    ("startoffset", "startOffset"),
    ("stddeviation", "stdDeviation"),
    ("stitchtiles", "stitchTiles"),
    ("surfacescale", "surfaceScale"),
    ("systemlanguage", "systemLanguage"),
    ("tablevalues", "tableValues"),
    ("targetx", "targetX"),
    ("targety", "targetY"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
    ("viewtarget", "viewTarget"),
    ("xchannelselector", "xChannelSelector"),
    ("ychannelselector", "yChannelSelector"),
    ("zoomandpan", "zoomAndPan"),
];
