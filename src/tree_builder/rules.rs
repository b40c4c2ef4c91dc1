// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The insertion-mode rules: one handler per mode, plus the rules for
//! foreign content.
//!
//! Every handler takes the current [`Input`] and answers with a
//! [`Directive`]: consume the token, consume it acknowledging its
//! self-closing flag, switch modes and go again, or stop the tokenizer
//! (raw text, plaintext, a script to run). Handlers delegate freely to
//! each other where the algorithm says "process the token using the rules
//! for" some other mode.

use crate::tendril::StrTendril;
use crate::tokenizer::states::{RawKind, Rawtext, Rcdata, ScriptData};
use crate::tokenizer::{EndTag, StartTag, Tag};
use crate::tree_builder::tag_sets::*;
use crate::tree_builder::types::*;
use crate::tree_builder::{
    create_element, tag_error_code, AppendNode, ElemName, ErrorCode, Quirks, TreeBuilder, TreeSink,
};
use crate::util::str::to_escaped_string;
use crate::{expanded_name, LocalName, QualName};
use log::{debug, log_enabled, warn, Level};

impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    /// Hand the input to the handler for `mode`.
    ///
    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml>
    pub(crate) fn step(&self, mode: InsertionMode, input: Input) -> Directive<Handle> {
        if log_enabled!(Level::Debug) {
            debug!("{:?}: processing {}", mode, to_escaped_string(&input));
        }

        match mode {
            InsertionMode::Initial => self.step_initial(input),
            InsertionMode::BeforeHtml => self.step_before_html(input),
            InsertionMode::BeforeHead => self.step_before_head(input),
            InsertionMode::InHead => self.step_in_head(input),
            InsertionMode::InHeadNoscript => self.step_in_head_noscript(input),
            InsertionMode::AfterHead => self.step_after_head(input),
            InsertionMode::InBody => self.step_in_body(input),
            InsertionMode::Text => self.step_text(input),
            InsertionMode::InTable => self.step_in_table(input),
            InsertionMode::InTableText => self.step_in_table_text(input),
            InsertionMode::InCaption => self.step_in_caption(input),
            InsertionMode::InColumnGroup => self.step_in_column_group(input),
            InsertionMode::InTableBody => self.step_in_table_body(input),
            InsertionMode::InRow => self.step_in_row(input),
            InsertionMode::InCell => self.step_in_cell(input),
            InsertionMode::InSelect => self.step_in_select(input),
            InsertionMode::InSelectInTable => self.step_in_select_in_table(input),
            InsertionMode::InTemplate => self.step_in_template(input),
            InsertionMode::AfterBody => self.step_after_body(input),
            InsertionMode::InFrameset => self.step_in_frameset(input),
            InsertionMode::AfterFrameset => self.step_after_frameset(input),
            InsertionMode::AfterAfterBody => self.step_after_after_body(input),
            InsertionMode::AfterAfterFrameset => self.step_after_after_frameset(input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode>
    fn step_initial(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => Directive::Processed,
            Input::Comment(text) => self.append_comment_to_doc(text),
            input => {
                // No DOCTYPE first: quirks, unless this is iframe srcdoc.
                if !self.opts.iframe_srcdoc {
                    self.parse_error_before_token(ErrorCode::MissingDoctype);
                    self.set_quirks_mode(Quirks);
                }
                Directive::Redispatch(InsertionMode::BeforeHtml, input)
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode>
    fn step_before_html(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => Directive::Processed,
            Input::Comment(text) => self.append_comment_to_doc(text),
            Input::Tag(mut tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => {
                    let attr_spans = std::mem::take(&mut tag.attr_spans);
                    let root = self.create_root(tag.attrs);
                    self.attach_start_location(&root, &attr_spans);
                    self.mode.set(InsertionMode::BeforeHead);
                    Directive::Processed
                }
                (
                    EndTag,
                    local_name!("head")
                    | local_name!("body")
                    | local_name!("html")
                    | local_name!("br"),
                )
                | (StartTag, _) => self.synthesize_root_and_redo(Input::Tag(tag)),
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
            input => self.synthesize_root_and_redo(input),
        }
    }

    /// Anything that needs a document element before the markup provided
    /// one: make a bare `<html>` and carry on.
    fn synthesize_root_and_redo(&self, input: Input) -> Directive<Handle> {
        self.create_root(vec![]);
        Directive::Redispatch(InsertionMode::BeforeHead, input)
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode>
    fn step_before_head(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => Directive::Processed,
            Input::Comment(text) => self.append_comment(text),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("head")) => {
                    let head = self.insert_element_for(tag);
                    *self.head_elem.borrow_mut() = Some(head);
                    self.mode.set(InsertionMode::InHead);
                    Directive::Processed
                }
                (
                    EndTag,
                    local_name!("head")
                    | local_name!("body")
                    | local_name!("html")
                    | local_name!("br"),
                )
                | (StartTag, _) => self.open_implied_head_and_redo(Input::Tag(tag)),
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
            input => self.open_implied_head_and_redo(input),
        }
    }

    fn open_implied_head_and_redo(&self, input: Input) -> Directive<Handle> {
        *self.head_elem.borrow_mut() = Some(self.insert_implied(local_name!("head")));
        Directive::Redispatch(InsertionMode::InHead, input)
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead>
    fn step_in_head(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, name) if is_head_metadata(&name) => {
                    self.insert_void_element_for(tag);
                    Directive::ProcessedSelfClosing
                }
                (StartTag, local_name!("title")) => self.begin_text_element(tag, Rcdata),
                (StartTag, local_name!("noscript")) if !self.opts.scripting_enabled => {
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InHeadNoscript);
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("noscript") | local_name!("noframes") | local_name!("style"),
                ) => self.begin_text_element(tag, Rawtext),
                (StartTag, local_name!("script")) => self.begin_script(tag),
                (StartTag, local_name!("template")) => self.begin_template(tag),
                (StartTag, local_name!("head")) => {
                    self.parse_error(ErrorCode::MisplacedStartTagForHeadElement);
                    Directive::Processed
                }
                (EndTag, local_name!("head")) => {
                    self.pop();
                    self.mode.set(InsertionMode::AfterHead);
                    Directive::Processed
                }
                (EndTag, local_name!("template")) => self.close_template(),
                (EndTag, local_name!("body") | local_name!("html") | local_name!("br"))
                | (StartTag, _) => self.leave_head_and_redo(Input::Tag(tag)),
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
            input => self.leave_head_and_redo(input),
        }
    }

    fn leave_head_and_redo(&self, input: Input) -> Directive<Handle> {
        self.pop();
        Directive::Redispatch(InsertionMode::AfterHead, input)
    }

    /// An element whose content is plain text: open it and put the
    /// tokenizer into the matching raw state.
    fn begin_text_element(&self, tag: Tag, kind: RawKind) -> Directive<Handle> {
        self.insert_element_for(tag);
        self.switch_to_raw_text(kind)
    }

    /// Park the current mode and wait in Text for the raw content; the
    /// tokenizer switch takes effect when this directive reaches it.
    fn switch_to_raw_text(&self, kind: RawKind) -> Directive<Handle> {
        self.orig_mode.set(Some(self.mode.get()));
        self.mode.set(InsertionMode::Text);
        Directive::EnterRawText(kind)
    }

    /// `<script>` opens like any text element, except that fragment
    /// parsing marks it already-started.
    fn begin_script(&self, mut tag: Tag) -> Directive<Handle> {
        let attr_spans = std::mem::take(&mut tag.attr_spans);
        let script = create_element(
            &self.sink,
            QualName::new(None, ns!(html), local_name!("script")),
            tag.attrs,
        );
        if self.is_fragment() {
            self.sink.mark_script_already_started(&script);
        }
        self.insert_appropriately(AppendNode(script.clone()), None);
        self.attach_start_location(&script, &attr_spans);
        self.push(&script);
        self.switch_to_raw_text(ScriptData)
    }

    /// `<template>` opens its own insertion-mode scope: a marker in the
    /// formatting list and an entry on the template-mode stack.
    fn begin_template(&self, tag: Tag) -> Directive<Handle> {
        self.active_formatting.borrow_mut().push_marker();
        self.frameset_ok.set(false);
        self.template_modes
            .borrow_mut()
            .push(InsertionMode::InTemplate);
        self.mode.set(InsertionMode::InTemplate);
        self.insert_element_for(tag);
        Directive::Processed
    }

    /// `</template>`: wind the template scope back down.
    fn close_template(&self) -> Directive<Handle> {
        if !self.in_html_elem_named(local_name!("template")) {
            self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
            return Directive::Processed;
        }
        self.generate_implied_end_tags(thorough_implied_end);
        self.close_element(local_name!("template"));
        self.clear_active_formatting_to_marker();
        self.template_modes.borrow_mut().pop();
        self.mode.set(self.reset_insertion_mode());
        Directive::Processed
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript>
    fn step_in_head_noscript(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) | Input::Comment(_) => self.step_in_head(input),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, name) if is_head_metadata(&name) => self.step_in_head(Input::Tag(tag)),
                (StartTag, local_name!("noframes") | local_name!("style")) => {
                    self.step_in_head(Input::Tag(tag))
                }
                (StartTag, local_name!("head")) => {
                    self.parse_error(ErrorCode::MisplacedStartTagForHeadElement);
                    Directive::Processed
                }
                (StartTag, local_name!("noscript")) => {
                    self.parse_error(ErrorCode::NestedNoscriptInHead);
                    Directive::Processed
                }
                (EndTag, local_name!("noscript")) => {
                    self.pop();
                    self.mode.set(InsertionMode::InHead);
                    Directive::Processed
                }
                (EndTag, local_name!("br")) | (StartTag, _) => {
                    self.leave_noscript_and_redo(Input::Tag(tag))
                }
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
            input => self.leave_noscript_and_redo(input),
        }
    }

    fn leave_noscript_and_redo(&self, input: Input) -> Directive<Handle> {
        self.parse_error(ErrorCode::DisallowedContentInNoscriptInHead);
        self.pop();
        Directive::Redispatch(InsertionMode::InHead, input)
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode>
    fn step_after_head(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("body")) => {
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    self.mode.set(InsertionMode::InBody);
                    Directive::Processed
                }
                (StartTag, local_name!("frameset")) => {
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InFrameset);
                    Directive::Processed
                }
                (StartTag, local_name!("head")) => {
                    self.parse_error(ErrorCode::MisplacedStartTagForHeadElement);
                    Directive::Processed
                }
                (StartTag, name) if is_head_only(&name) => {
                    // A head-only element after </head>: put the head
                    // back on the stack just long enough to hold it.
                    self.parse_error(ErrorCode::AbandonedHeadElementChild);
                    let head = self
                        .head_elem
                        .borrow()
                        .as_ref()
                        .expect("head-only content before any head")
                        .clone();
                    self.push(&head);
                    let directive = self.step_in_head(Input::Tag(tag));
                    self.remove_from_stack(&head);
                    directive
                }
                (EndTag, local_name!("template")) => self.close_template(),
                (EndTag, local_name!("body") | local_name!("html") | local_name!("br"))
                | (StartTag, _) => self.open_implied_body_and_redo(Input::Tag(tag)),
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
            input => self.open_implied_body_and_redo(input),
        }
    }

    fn open_implied_body_and_redo(&self, input: Input) -> Directive<Handle> {
        self.insert_implied(local_name!("body"));
        Directive::Redispatch(InsertionMode::InBody, input)
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody>
    fn step_in_body(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Null => {
                self.parse_error(ErrorCode::UnexpectedNullCharacter);
                Directive::Processed
            }
            Input::Whitespace(text) => {
                self.reconstruct_active_formatting_elements();
                self.append_text(text)
            }
            Input::Text(text) => {
                self.reconstruct_active_formatting_elements();
                self.frameset_ok.set(false);
                self.append_text(text)
            }
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => {
                if self.template_modes.borrow().is_empty() {
                    self.note_elements_left_open();
                    Directive::Processed
                } else {
                    self.step_in_template(Input::Eof)
                }
            }
            Input::Tag(tag) => match tag.kind {
                StartTag => self.in_body_start_tag(tag),
                EndTag => self.in_body_end_tag(tag),
            },
        }
    }

    fn in_body_start_tag(&self, tag: Tag) -> Directive<Handle> {
        match tag.name.clone() {
            local_name!("html") => {
                // Merge attributes into the root, but never replace one.
                self.parse_error(ErrorCode::UnexpectedStartTag);
                if !self.in_html_elem_named(local_name!("template")) {
                    let root = self.html_elem().clone();
                    self.sink.add_attrs_if_missing(&root, tag.attrs);
                }
                Directive::Processed
            }

            name if is_head_only(&name) => self.step_in_head(Input::Tag(tag)),

            local_name!("body") => {
                self.parse_error(ErrorCode::UnexpectedStartTag);
                if self.open_elems.borrow().len() > 1
                    && !self.in_html_elem_named(local_name!("template"))
                {
                    if let Some(body) = self.body_elem().map(|b| b.clone()) {
                        self.frameset_ok.set(false);
                        self.sink.add_attrs_if_missing(&body, tag.attrs);
                    }
                }
                Directive::Processed
            }

            local_name!("frameset") => {
                self.parse_error(ErrorCode::UnexpectedStartTag);
                if self.frameset_ok.get() {
                    // Tear the body out and start over with a frameset.
                    if let Some(body) = self.body_elem().map(|b| b.clone()) {
                        self.sink.remove_from_parent(&body);
                        self.open_elems.borrow_mut().truncate(1);
                        self.insert_element_for(tag);
                        self.mode.set(InsertionMode::InFrameset);
                    }
                }
                Directive::Processed
            }

            name if is_body_block_start(&name) => {
                self.close_p_element_in_button_scope();
                self.insert_element_for(tag);
                Directive::Processed
            }

            name if is_heading(&name) => {
                self.close_p_element_in_button_scope();
                if self.current_node_in(heading_tag) {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    self.pop();
                }
                self.insert_element_for(tag);
                Directive::Processed
            }

            local_name!("pre") | local_name!("listing") => {
                self.close_p_element_in_button_scope();
                self.insert_element_for(tag);
                // A newline right after the start tag is decoration.
                self.ignore_lf.set(true);
                self.frameset_ok.set(false);
                Directive::Processed
            }

            local_name!("form") => {
                let in_template = self.in_html_elem_named(local_name!("template"));
                if self.form_elem.borrow().is_some() && !in_template {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                } else {
                    self.close_p_element_in_button_scope();
                    let form = self.insert_element_for(tag);
                    if !in_template {
                        *self.form_elem.borrow_mut() = Some(form);
                    }
                }
                Directive::Processed
            }

            local_name!("li") | local_name!("dd") | local_name!("dt") => {
                self.begin_list_item_like(tag)
            }

            local_name!("plaintext") => {
                self.close_p_element_in_button_scope();
                self.insert_element_for(tag);
                Directive::EnterPlaintext
            }

            local_name!("button") => {
                if self.in_scope_named(default_scope, local_name!("button")) {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    self.generate_implied_end_tags(cursory_implied_end);
                    self.pop_until_named(local_name!("button"));
                }
                self.reconstruct_active_formatting_elements();
                self.insert_element_for(tag);
                self.frameset_ok.set(false);
                Directive::Processed
            }

            local_name!("a") => {
                self.implicitly_close_open_anchor(&tag);
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element_for(tag);
                Directive::Processed
            }

            name if is_simple_formatting(&name) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element_for(tag);
                Directive::Processed
            }

            local_name!("nobr") => {
                self.reconstruct_active_formatting_elements();
                if self.in_scope_named(default_scope, local_name!("nobr")) {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    self.adoption_agency(local_name!("nobr"));
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element_for(tag);
                Directive::Processed
            }

            local_name!("applet") | local_name!("marquee") | local_name!("object") => {
                self.reconstruct_active_formatting_elements();
                self.insert_element_for(tag);
                self.active_formatting.borrow_mut().push_marker();
                self.frameset_ok.set(false);
                Directive::Processed
            }

            local_name!("table") => {
                // Quirks documents keep the open <p> around the table.
                if self.quirks_mode.get() != Quirks {
                    self.close_p_element_in_button_scope();
                }
                self.insert_element_for(tag);
                self.frameset_ok.set(false);
                self.mode.set(InsertionMode::InTable);
                Directive::Processed
            }

            name if is_plain_void(&name) => self.begin_void_element(tag),

            local_name!("param") | local_name!("source") | local_name!("track") => {
                self.insert_void_element_for(tag);
                Directive::ProcessedSelfClosing
            }

            local_name!("hr") => {
                self.close_p_element_in_button_scope();
                self.insert_void_element_for(tag);
                self.frameset_ok.set(false);
                Directive::ProcessedSelfClosing
            }

            local_name!("image") => {
                // The token that never was: treat it as <img>.
                self.parse_error(ErrorCode::UnexpectedStartTag);
                self.in_body_start_tag(Tag {
                    name: local_name!("img"),
                    ..tag
                })
            }

            local_name!("textarea") => {
                self.ignore_lf.set(true);
                self.frameset_ok.set(false);
                self.begin_text_element(tag, Rcdata)
            }

            local_name!("xmp") => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok.set(false);
                self.begin_text_element(tag, Rawtext)
            }

            local_name!("iframe") => {
                self.frameset_ok.set(false);
                self.begin_text_element(tag, Rawtext)
            }

            local_name!("noembed") => self.begin_text_element(tag, Rawtext),

            local_name!("noscript") if self.opts.scripting_enabled => {
                self.begin_text_element(tag, Rawtext)
            }

            local_name!("select") => {
                self.reconstruct_active_formatting_elements();
                self.insert_element_for(tag);
                self.frameset_ok.set(false);
                // The mode cell, not the handler argument: we may be here
                // through "the rules for in body" from a table mode.
                let next = if self.in_table_related_mode() {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                };
                self.mode.set(next);
                Directive::Processed
            }

            local_name!("optgroup") | local_name!("option") => {
                if self.current_node_named(local_name!("option")) {
                    self.pop();
                }
                self.reconstruct_active_formatting_elements();
                self.insert_element_for(tag);
                Directive::Processed
            }

            local_name!("rb") | local_name!("rtc") => {
                if self.in_scope_named(default_scope, local_name!("ruby")) {
                    self.generate_implied_end_tags(cursory_implied_end);
                }
                if !self.current_node_named(local_name!("ruby")) {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                }
                self.insert_element_for(tag);
                Directive::Processed
            }

            local_name!("rp") | local_name!("rt") => {
                if self.in_scope_named(default_scope, local_name!("ruby")) {
                    self.generate_implied_end_tags_except(local_name!("rtc"));
                }
                if !self.current_node_named(local_name!("rtc"))
                    && !self.current_node_named(local_name!("ruby"))
                {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                }
                self.insert_element_for(tag);
                Directive::Processed
            }

            local_name!("math") => self.enter_foreign_content(tag, ns!(mathml)),
            local_name!("svg") => self.enter_foreign_content(tag, ns!(svg)),

            name if is_table_only(&name) => {
                self.parse_error(ErrorCode::UnexpectedStartTag);
                Directive::Processed
            }

            _ => {
                self.reconstruct_active_formatting_elements();
                self.insert_element_for(tag);
                Directive::Processed
            }
        }
    }

    /// `<li>`, `<dd>`, `<dt>`: close an open item of the same family
    /// first, unless a special element (other than address, div, p)
    /// shields it.
    fn begin_list_item_like(&self, tag: Tag) -> Directive<Handle> {
        self.frameset_ok.set(false);

        let item_is_li = tag.name == local_name!("li");
        let mut to_close = None;
        for node in self.open_elems.borrow().iter().rev() {
            let elem_name = self.sink.elem_name(node);
            let name = elem_name.expanded();
            let same_family = if item_is_li {
                name == expanded_name!(html "li")
            } else {
                matches!(name, expanded_name!(html "dd") | expanded_name!(html "dt"))
            };
            if same_family {
                to_close = Some(name.local.clone());
                break;
            }
            let shields = special_tag(name)
                && !matches!(
                    name,
                    expanded_name!(html "address")
                        | expanded_name!(html "div")
                        | expanded_name!(html "p")
                );
            if shields {
                break;
            }
        }

        if let Some(name) = to_close {
            self.generate_implied_end_tags_except(name.clone());
            self.close_element(name);
        }

        self.close_p_element_in_button_scope();
        self.insert_element_for(tag);
        Directive::Processed
    }

    /// The plain void elements of the in-body rules, with the
    /// `type=hidden` carve-out for `<input>`.
    fn begin_void_element(&self, tag: Tag) -> Directive<Handle> {
        let hidden_input =
            tag.name == local_name!("input") && self.is_type_hidden(&tag);
        self.reconstruct_active_formatting_elements();
        self.insert_void_element_for(tag);
        if !hidden_input {
            self.frameset_ok.set(false);
        }
        Directive::ProcessedSelfClosing
    }

    fn in_body_end_tag(&self, tag: Tag) -> Directive<Handle> {
        match tag.name.clone() {
            local_name!("template") => self.close_template(),

            local_name!("body") => {
                if self.in_scope_named(default_scope, local_name!("body")) {
                    self.note_elements_left_open();
                    self.mode.set(InsertionMode::AfterBody);
                    self.patch_body_end_location();
                } else {
                    self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                }
                Directive::Processed
            }

            local_name!("html") => {
                if self.in_scope_named(default_scope, local_name!("body")) {
                    self.note_elements_left_open();
                    self.patch_body_end_location();
                    Directive::Redispatch(InsertionMode::AfterBody, Input::Tag(tag))
                } else {
                    self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                    Directive::Processed
                }
            }

            name if is_body_block_end(&name) => {
                if self.in_scope_named(default_scope, name.clone()) {
                    self.generate_implied_end_tags(cursory_implied_end);
                    self.close_element(name);
                } else {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                }
                Directive::Processed
            }

            local_name!("form") => self.close_form(),

            local_name!("p") => {
                if !self.in_scope_named(button_scope, local_name!("p")) {
                    // No <p> to close: conjure one so there is.
                    self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                    self.insert_implied(local_name!("p"));
                }
                self.close_p_element();
                Directive::Processed
            }

            local_name!("li") | local_name!("dd") | local_name!("dt") => {
                let scope_ok = if tag.name == local_name!("li") {
                    self.in_scope_named(list_item_scope, tag.name.clone())
                } else {
                    self.in_scope_named(default_scope, tag.name.clone())
                };
                if scope_ok {
                    self.generate_implied_end_tags_except(tag.name.clone());
                    self.close_element(tag.name);
                } else {
                    self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                }
                Directive::Processed
            }

            name if is_heading(&name) => {
                // Any open heading satisfies any heading end tag.
                if self.in_scope(default_scope, |elem| self.elem_in(&elem, heading_tag)) {
                    self.generate_implied_end_tags(cursory_implied_end);
                    if !self.current_node_named(name) {
                        self.parse_error_before_token(
                            ErrorCode::ClosingOfElementWithOpenChildElements,
                        );
                    }
                    self.pop_until(heading_tag);
                } else {
                    self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                }
                Directive::Processed
            }

            name if is_adoption_subject(&name) => {
                self.adoption_agency(name);
                Directive::Processed
            }

            local_name!("applet") | local_name!("marquee") | local_name!("object") => {
                if self.in_scope_named(default_scope, tag.name.clone()) {
                    self.generate_implied_end_tags(cursory_implied_end);
                    self.close_element(tag.name);
                    self.clear_active_formatting_to_marker();
                } else {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                }
                Directive::Processed
            }

            local_name!("br") => {
                // Rewritten as a bare <br> start tag.
                self.parse_error(ErrorCode::UnexpectedEndTag);
                self.in_body_start_tag(Tag {
                    kind: StartTag,
                    attrs: vec![],
                    attr_spans: vec![],
                    ..tag
                })
            }

            _ => {
                self.any_other_end_tag_in_body(tag);
                Directive::Processed
            }
        }
    }

    /// `</form>` nullifies the form pointer; the form element itself may
    /// be buried under other open elements.
    fn close_form(&self) -> Directive<Handle> {
        if self.in_html_elem_named(local_name!("template")) {
            if !self.in_scope_named(default_scope, local_name!("form")) {
                self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                return Directive::Processed;
            }
            self.generate_implied_end_tags(cursory_implied_end);
            if !self.current_node_named(local_name!("form")) {
                self.parse_error_before_token(ErrorCode::ClosingOfElementWithOpenChildElements);
            }
            self.pop_until_named(local_name!("form"));
        } else {
            let Some(form) = self.form_elem.take() else {
                self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                return Directive::Processed;
            };
            if !self.in_scope(default_scope, |elem| self.sink.same_node(&form, &elem)) {
                self.parse_error(ErrorCode::EndTagWithoutMatchingOpenElement);
                return Directive::Processed;
            }
            self.generate_implied_end_tags(cursory_implied_end);
            let misnested = !self.sink.same_node(&self.current_node(), &form);
            self.remove_from_stack(&form);
            if misnested {
                self.parse_error_before_token(ErrorCode::ClosingOfElementWithOpenChildElements);
            }
        }
        Directive::Processed
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata>
    fn step_text(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) | Input::Text(text) => self.append_text(text),
            Input::Tag(tag) => {
                // The only tag the tokenizer can produce here is the end
                // tag that terminates the raw text.
                let elem = self.pop();
                self.mode
                    .set(self.orig_mode.take().expect("Text mode without a return mode"));
                if tag.name == local_name!("script") {
                    Directive::PauseForScript(elem)
                } else {
                    Directive::Processed
                }
            }
            Input::Eof => {
                self.parse_error_before_token(ErrorCode::EofInElementThatCanContainOnlyText);
                if self.current_node_named(local_name!("script")) {
                    self.sink
                        .mark_script_already_started(&self.current_node());
                }
                self.pop();
                Directive::Redispatch(
                    self.orig_mode.take().expect("Text mode without a return mode"),
                    Input::Eof,
                )
            }
            Input::Null | Input::Comment(_) => {
                unreachable!("the tokenizer cannot emit this in a raw-text state")
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable>
    fn step_in_table(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Null | Input::Whitespace(_) | Input::Text(_) => {
                self.buffer_or_foster_table_text(input)
            }
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => self.step_in_body(Input::Eof),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("caption")) => {
                    self.clear_back_to_table_context();
                    self.active_formatting.borrow_mut().push_marker();
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCaption);
                    Directive::Processed
                }
                (StartTag, local_name!("colgroup")) => {
                    self.clear_back_to_table_context();
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InColumnGroup);
                    Directive::Processed
                }
                (StartTag, local_name!("col")) => {
                    self.clear_back_to_table_context();
                    self.insert_implied(local_name!("colgroup"));
                    Directive::Redispatch(InsertionMode::InColumnGroup, Input::Tag(tag))
                }
                (StartTag, local_name!("tbody") | local_name!("tfoot") | local_name!("thead")) => {
                    self.clear_back_to_table_context();
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InTableBody);
                    Directive::Processed
                }
                (StartTag, local_name!("td") | local_name!("th") | local_name!("tr")) => {
                    self.clear_back_to_table_context();
                    self.insert_implied(local_name!("tbody"));
                    Directive::Redispatch(InsertionMode::InTableBody, Input::Tag(tag))
                }
                (StartTag, local_name!("table")) => {
                    // A table inside a table implicitly ends the first.
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        Directive::Redispatch(self.reset_insertion_mode(), Input::Tag(tag))
                    } else {
                        Directive::Processed
                    }
                }
                (EndTag, local_name!("table")) => {
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        self.mode.set(self.reset_insertion_mode());
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (
                    EndTag,
                    local_name!("body")
                    | local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("html")
                    | local_name!("tbody")
                    | local_name!("td")
                    | local_name!("tfoot")
                    | local_name!("th")
                    | local_name!("thead")
                    | local_name!("tr"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                (StartTag, local_name!("style") | local_name!("script") | local_name!("template"))
                | (EndTag, local_name!("template")) => self.step_in_head(Input::Tag(tag)),
                (StartTag, local_name!("input")) => {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    if self.is_type_hidden(&tag) {
                        // Hidden inputs may sit directly in the table.
                        self.insert_void_element_for(tag);
                        Directive::ProcessedSelfClosing
                    } else {
                        self.foster_in_body(Input::Tag(tag))
                    }
                }
                (StartTag, local_name!("form")) => {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    if !self.in_html_elem_named(local_name!("template"))
                        && self.form_elem.borrow().is_none()
                    {
                        let form = self.insert_void_element_for(tag);
                        *self.form_elem.borrow_mut() = Some(form);
                    }
                    Directive::Processed
                }
                _ => {
                    self.parse_error(tag_error_code(&tag));
                    self.foster_in_body(Input::Tag(tag))
                }
            },
        }
    }

    /// Character data in a table: hold it while the current node is table
    /// layout (it may yet turn out to be whitespace), foster it otherwise.
    fn buffer_or_foster_table_text(&self, input: Input) -> Directive<Handle> {
        declare_tag_set!(table_layout = "table" "tbody" "tfoot" "thead" "tr");
        if self.current_node_in(table_layout) {
            debug_assert!(self.pending_table_text.borrow().is_empty());
            self.orig_mode.set(Some(self.mode.get()));
            Directive::Redispatch(InsertionMode::InTableText, input)
        } else {
            self.parse_error(ErrorCode::UnexpectedCharacterInTable);
            self.foster_in_body(input)
        }
    }

    /// Run the in-body rules with foster parenting switched on.
    fn foster_in_body(&self, input: Input) -> Directive<Handle> {
        warn!("fostering content out of a table");
        self.foster_parenting.set(true);
        let directive = self.step_in_body(input);
        self.foster_parenting.set(false);
        directive
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext>
    fn step_in_table_text(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Null => {
                self.parse_error(ErrorCode::UnexpectedNullCharacter);
                Directive::Processed
            }
            Input::Whitespace(_) | Input::Text(_) => {
                self.pending_table_text.borrow_mut().push(input);
                Directive::Processed
            }
            input => {
                // Time to decide: pure whitespace stays in the table, any
                // real text sends the whole batch through fostering.
                let pending = self.pending_table_text.take();
                let all_whitespace = pending
                    .iter()
                    .all(|run| matches!(run, Input::Whitespace(_)));

                if all_whitespace {
                    for run in pending {
                        if let Input::Whitespace(text) = run {
                            self.append_text(text);
                        }
                    }
                } else {
                    self.parse_error_before_token(ErrorCode::UnexpectedCharacterInTable);
                    for run in pending {
                        let fostered = self.foster_in_body(run);
                        debug_assert!(matches!(fostered, Directive::Processed));
                    }
                }

                Directive::Redispatch(
                    self.orig_mode
                        .take()
                        .expect("table text without a return mode"),
                    input,
                )
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption>
    fn step_in_caption(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (EndTag, local_name!("caption")) => {
                    if self.close_caption() {
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("tbody")
                    | local_name!("td")
                    | local_name!("tfoot")
                    | local_name!("th")
                    | local_name!("thead")
                    | local_name!("tr"),
                )
                | (EndTag, local_name!("table")) => {
                    if self.close_caption() {
                        Directive::Redispatch(InsertionMode::InTable, Input::Tag(tag))
                    } else {
                        self.parse_error(tag_error_code(&tag));
                        Directive::Processed
                    }
                }
                (
                    EndTag,
                    local_name!("body")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("html")
                    | local_name!("tbody")
                    | local_name!("td")
                    | local_name!("tfoot")
                    | local_name!("th")
                    | local_name!("thead")
                    | local_name!("tr"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                _ => self.step_in_body(Input::Tag(tag)),
            },
            input => self.step_in_body(input),
        }
    }

    /// Close the open `<caption>`, if there is one in table scope.
    fn close_caption(&self) -> bool {
        if !self.in_scope_named(table_scope, local_name!("caption")) {
            return false;
        }
        self.generate_implied_end_tags(cursory_implied_end);
        self.close_element(local_name!("caption"));
        self.clear_active_formatting_to_marker();
        true
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup>
    fn step_in_column_group(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => self.step_in_body(Input::Eof),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("col")) => {
                    self.insert_void_element_for(tag);
                    Directive::ProcessedSelfClosing
                }
                (EndTag, local_name!("colgroup")) => {
                    if self.current_node_named(local_name!("colgroup")) {
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (EndTag, local_name!("col")) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                (StartTag, local_name!("template")) | (EndTag, local_name!("template")) => {
                    self.step_in_head(Input::Tag(tag))
                }
                _ => self.end_column_group_and_redo(Input::Tag(tag)),
            },
            input => self.end_column_group_and_redo(input),
        }
    }

    fn end_column_group_and_redo(&self, input: Input) -> Directive<Handle> {
        if self.current_node_named(local_name!("colgroup")) {
            self.pop();
            Directive::Redispatch(InsertionMode::InTable, input)
        } else {
            self.report_unexpected(&input)
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody>
    fn step_in_table_body(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("tr")) => {
                    self.clear_back_to_table_body_context();
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InRow);
                    Directive::Processed
                }
                (StartTag, local_name!("th") | local_name!("td")) => {
                    // Cells need a row; fabricate one.
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    self.clear_back_to_table_body_context();
                    self.insert_implied(local_name!("tr"));
                    Directive::Redispatch(InsertionMode::InRow, Input::Tag(tag))
                }
                (EndTag, local_name!("tbody") | local_name!("tfoot") | local_name!("thead")) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.clear_back_to_table_body_context();
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("tbody")
                    | local_name!("tfoot")
                    | local_name!("thead"),
                )
                | (EndTag, local_name!("table")) => {
                    declare_tag_set!(table_section = "table" "tbody" "tfoot" "thead");
                    if self.in_scope(table_scope, |elem| self.elem_in(&elem, table_section)) {
                        self.clear_back_to_table_body_context();
                        self.pop();
                        Directive::Redispatch(InsertionMode::InTable, Input::Tag(tag))
                    } else {
                        self.parse_error(tag_error_code(&tag));
                        Directive::Processed
                    }
                }
                (
                    EndTag,
                    local_name!("body")
                    | local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("html")
                    | local_name!("td")
                    | local_name!("th")
                    | local_name!("tr"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                _ => self.step_in_table(Input::Tag(tag)),
            },
            input => self.step_in_table(input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr>
    fn step_in_row(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("th") | local_name!("td")) => {
                    self.clear_back_to_table_row_context();
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCell);
                    self.active_formatting.borrow_mut().push_marker();
                    Directive::Processed
                }
                (EndTag, local_name!("tr")) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.end_current_row();
                        self.mode.set(InsertionMode::InTableBody);
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("tbody")
                    | local_name!("tfoot")
                    | local_name!("thead")
                    | local_name!("tr"),
                )
                | (EndTag, local_name!("table")) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.end_current_row();
                        Directive::Redispatch(InsertionMode::InTableBody, Input::Tag(tag))
                    } else {
                        self.parse_error(tag_error_code(&tag));
                        Directive::Processed
                    }
                }
                (EndTag, local_name!("tbody") | local_name!("tfoot") | local_name!("thead")) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        if self.in_scope_named(table_scope, local_name!("tr")) {
                            self.end_current_row();
                            Directive::Redispatch(InsertionMode::InTableBody, Input::Tag(tag))
                        } else {
                            Directive::Processed
                        }
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                        Directive::Processed
                    }
                }
                (
                    EndTag,
                    local_name!("body")
                    | local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("html")
                    | local_name!("td")
                    | local_name!("th"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                _ => self.step_in_table(Input::Tag(tag)),
            },
            input => self.step_in_table(input),
        }
    }

    fn end_current_row(&self) {
        self.clear_back_to_table_row_context();
        let row = self.pop();
        debug_assert!(self.html_elem_named(&row, local_name!("tr")));
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd>
    fn step_in_cell(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (EndTag, local_name!("td") | local_name!("th")) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.close_element(tag.name);
                        self.clear_active_formatting_to_marker();
                        self.mode.set(InsertionMode::InRow);
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("tbody")
                    | local_name!("td")
                    | local_name!("tfoot")
                    | local_name!("th")
                    | local_name!("thead")
                    | local_name!("tr"),
                ) => {
                    if self.in_scope(table_scope, |elem| self.elem_in(&elem, td_th)) {
                        self.close_the_cell();
                        Directive::Redispatch(InsertionMode::InRow, Input::Tag(tag))
                    } else {
                        self.parse_error(ErrorCode::UnexpectedStartTag);
                        Directive::Processed
                    }
                }
                (
                    EndTag,
                    local_name!("body")
                    | local_name!("caption")
                    | local_name!("col")
                    | local_name!("colgroup")
                    | local_name!("html"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    Directive::Processed
                }
                (
                    EndTag,
                    local_name!("table")
                    | local_name!("tbody")
                    | local_name!("tfoot")
                    | local_name!("thead")
                    | local_name!("tr"),
                ) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.close_the_cell();
                        Directive::Redispatch(InsertionMode::InRow, Input::Tag(tag))
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                        Directive::Processed
                    }
                }
                _ => self.step_in_body(Input::Tag(tag)),
            },
            input => self.step_in_body(input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect>
    fn step_in_select(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Null => {
                self.parse_error(ErrorCode::UnexpectedNullCharacter);
                Directive::Processed
            }
            Input::Whitespace(text) | Input::Text(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => self.step_in_body(Input::Eof),
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("option")) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    Directive::Processed
                }
                (StartTag, local_name!("optgroup")) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    Directive::Processed
                }
                (StartTag, local_name!("hr")) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    self.pop();
                    Directive::ProcessedSelfClosing
                }
                (EndTag, local_name!("optgroup")) => {
                    // An <option> directly inside an <optgroup> closes
                    // along with it.
                    let option_in_optgroup = {
                        let stack = self.open_elems.borrow();
                        stack.len() >= 2
                            && self.html_elem_named(&stack[stack.len() - 1], local_name!("option"))
                            && self
                                .html_elem_named(&stack[stack.len() - 2], local_name!("optgroup"))
                    };
                    if option_in_optgroup {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (EndTag, local_name!("option")) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    } else {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    }
                    Directive::Processed
                }
                (_, local_name!("select")) => {
                    // A nested <select> start tag acts like </select>.
                    let in_scope = self.in_scope_named(select_scope, local_name!("select"));
                    if tag.kind == StartTag || !in_scope {
                        self.parse_error(tag_error_code(&tag));
                    }
                    if in_scope {
                        self.pop_until_named(local_name!("select"));
                        self.mode.set(self.reset_insertion_mode());
                    }
                    Directive::Processed
                }
                (
                    StartTag,
                    local_name!("input") | local_name!("keygen") | local_name!("textarea"),
                ) => {
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    if self.in_scope_named(select_scope, local_name!("select")) {
                        self.pop_until_named(local_name!("select"));
                        Directive::Redispatch(self.reset_insertion_mode(), Input::Tag(tag))
                    } else {
                        Directive::Processed
                    }
                }
                (StartTag, local_name!("script") | local_name!("template"))
                | (EndTag, local_name!("template")) => self.step_in_head(Input::Tag(tag)),
                _ => self.report_unexpected_tag(&tag),
            },
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable>
    fn step_in_select_in_table(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, name) if is_table_layout_or_cell(&name) => {
                    // Table markup tears the select open.
                    self.parse_error(ErrorCode::UnexpectedStartTag);
                    self.pop_until_named(local_name!("select"));
                    Directive::Redispatch(self.reset_insertion_mode(), Input::Tag(tag))
                }
                (EndTag, name) if is_table_layout_or_cell(&name) => {
                    self.parse_error(ErrorCode::UnexpectedEndTag);
                    if self.in_scope_named(table_scope, name) {
                        self.pop_until_named(local_name!("select"));
                        Directive::Redispatch(self.reset_insertion_mode(), Input::Tag(tag))
                    } else {
                        Directive::Processed
                    }
                }
                _ => self.step_in_select(Input::Tag(tag)),
            },
            input => self.step_in_select(input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate>
    fn step_in_template(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) | Input::Text(_) | Input::Null | Input::Comment(_) => {
                self.step_in_body(input)
            }
            Input::Eof => {
                if !self.in_html_elem_named(local_name!("template")) {
                    return Directive::Processed;
                }
                self.parse_error_before_token(ErrorCode::OpenElementsLeftAfterEof);
                self.pop_until_named(local_name!("template"));
                self.clear_active_formatting_to_marker();
                self.template_modes.borrow_mut().pop();
                Directive::Redispatch(self.reset_insertion_mode(), Input::Eof)
            }
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, name) if is_head_only(&name) => self.step_in_head(Input::Tag(tag)),
                (EndTag, local_name!("template")) => self.step_in_head(Input::Tag(tag)),
                (
                    StartTag,
                    local_name!("caption")
                    | local_name!("colgroup")
                    | local_name!("tbody")
                    | local_name!("tfoot")
                    | local_name!("thead"),
                ) => self.retarget_template(InsertionMode::InTable, Input::Tag(tag)),
                (StartTag, local_name!("col")) => {
                    self.retarget_template(InsertionMode::InColumnGroup, Input::Tag(tag))
                }
                (StartTag, local_name!("tr")) => {
                    self.retarget_template(InsertionMode::InTableBody, Input::Tag(tag))
                }
                (StartTag, local_name!("td") | local_name!("th")) => {
                    self.retarget_template(InsertionMode::InRow, Input::Tag(tag))
                }
                (StartTag, _) => self.retarget_template(InsertionMode::InBody, Input::Tag(tag)),
                (EndTag, _) => self.report_unexpected_tag(&tag),
            },
        }
    }

    /// The template's content decides which sub-machine parses it: swap
    /// the top template mode and redispatch.
    fn retarget_template(&self, mode: InsertionMode, input: Input) -> Directive<Handle> {
        let mut modes = self.template_modes.borrow_mut();
        modes.pop();
        modes.push(mode);
        drop(modes);
        Directive::Redispatch(mode, input)
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody>
    fn step_after_body(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => self.step_in_body(input),
            Input::Comment(text) => self.append_comment_to_root(text),
            Input::Eof => Directive::Processed,
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (EndTag, local_name!("html")) => {
                    if self.is_fragment() {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    } else {
                        self.mode.set(InsertionMode::AfterAfterBody);
                        self.patch_html_end_location();
                    }
                    Directive::Processed
                }
                _ => {
                    self.report_unexpected_tag(&tag);
                    Directive::Redispatch(InsertionMode::InBody, Input::Tag(tag))
                }
            },
            input => {
                self.report_unexpected(&input);
                Directive::Redispatch(InsertionMode::InBody, input)
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset>
    fn step_in_frameset(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => {
                if self.open_elems.borrow().len() != 1 {
                    self.parse_error_before_token(ErrorCode::OpenElementsLeftAfterEof);
                }
                Directive::Processed
            }
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("frameset")) => {
                    self.insert_element_for(tag);
                    Directive::Processed
                }
                (EndTag, local_name!("frameset")) => {
                    if self.open_elems.borrow().len() == 1 {
                        self.parse_error(ErrorCode::UnexpectedEndTag);
                    } else {
                        self.pop();
                        if !self.is_fragment()
                            && !self.current_node_named(local_name!("frameset"))
                        {
                            self.mode.set(InsertionMode::AfterFrameset);
                        }
                    }
                    Directive::Processed
                }
                (StartTag, local_name!("frame")) => {
                    self.insert_void_element_for(tag);
                    Directive::ProcessedSelfClosing
                }
                (StartTag, local_name!("noframes")) => self.step_in_head(Input::Tag(tag)),
                _ => self.report_unexpected_tag(&tag),
            },
            input => self.report_unexpected(&input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset>
    fn step_after_frameset(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(text) => self.append_text(text),
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => Directive::Processed,
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (EndTag, local_name!("html")) => {
                    self.mode.set(InsertionMode::AfterAfterFrameset);
                    self.patch_html_end_location();
                    Directive::Processed
                }
                (StartTag, local_name!("noframes")) => self.step_in_head(Input::Tag(tag)),
                _ => self.report_unexpected_tag(&tag),
            },
            input => self.report_unexpected(&input),
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode>
    fn step_after_after_body(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => self.step_in_body(input),
            Input::Comment(text) => self.append_comment_to_doc(text),
            Input::Eof => Directive::Processed,
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                _ => {
                    self.report_unexpected_tag(&tag);
                    Directive::Redispatch(InsertionMode::InBody, Input::Tag(tag))
                }
            },
            input => {
                self.report_unexpected(&input);
                Directive::Redispatch(InsertionMode::InBody, input)
            }
        }
    }

    /// <https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode>
    fn step_after_after_frameset(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Whitespace(_) => self.step_in_body(input),
            Input::Comment(text) => self.append_comment_to_doc(text),
            Input::Eof => Directive::Processed,
            Input::Tag(tag) => match (tag.kind, tag.name.clone()) {
                (StartTag, local_name!("html")) => self.step_in_body(Input::Tag(tag)),
                (StartTag, local_name!("noframes")) => self.step_in_head(Input::Tag(tag)),
                _ => self.report_unexpected_tag(&tag),
            },
            input => self.report_unexpected(&input),
        }
    }

    //§ parsing-main-inforeign
    /// The rules for parsing tokens in foreign content.
    ///
    /// <https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign>
    pub(crate) fn step_foreign_content(&self, input: Input) -> Directive<Handle> {
        match input {
            Input::Null => {
                self.parse_error(ErrorCode::UnexpectedNullCharacter);
                self.append_text(StrTendril::from("\u{fffd}"))
            }
            Input::Whitespace(text) => self.append_text(text),
            Input::Text(text) => {
                self.frameset_ok.set(false);
                self.append_text(text)
            }
            Input::Comment(text) => self.append_comment(text),
            Input::Eof => unreachable!("EOF always dispatches to the HTML rules"),
            Input::Tag(tag) => match tag.kind {
                StartTag if breaks_out_of_foreign_content(&tag) => {
                    self.break_out_of_foreign_content(tag)
                }
                StartTag => self.insert_adjusted_foreign_element(tag),
                EndTag if matches!(tag.name, local_name!("br") | local_name!("p")) => {
                    self.break_out_of_foreign_content(tag)
                }
                EndTag => self.foreign_end_tag(tag),
            },
        }
    }

    /// `<math>` or `<svg>` from the in-body rules: adjust and insert in
    /// the new namespace.
    fn enter_foreign_content(&self, mut tag: Tag, ns: crate::Namespace) -> Directive<Handle> {
        match ns {
            ns!(mathml) => self.adjust_mathml_attributes(&mut tag),
            ns!(svg) => self.adjust_svg_attributes(&mut tag),
            _ => {}
        }
        self.adjust_foreign_attributes(&mut tag);
        self.insert_foreign_element(tag, ns)
    }

    /// Any other start tag in foreign content: adjust for the namespace
    /// the adjusted current node lives in, and insert there.
    fn insert_adjusted_foreign_element(&self, mut tag: Tag) -> Directive<Handle> {
        let ns = self
            .sink
            .elem_name(&self.adjusted_current_node())
            .ns()
            .clone();
        match ns {
            ns!(mathml) => self.adjust_mathml_attributes(&mut tag),
            ns!(svg) => {
                self.adjust_svg_tag_name(&mut tag);
                self.adjust_svg_attributes(&mut tag);
            }
            _ => {}
        }
        self.adjust_foreign_attributes(&mut tag);
        self.insert_foreign_element(tag, ns)
    }

    /// An HTML-ish tag inside foreign content: pop back to HTML (or an
    /// integration point) and let the regular rules have the token.
    fn break_out_of_foreign_content(&self, tag: Tag) -> Directive<Handle> {
        self.parse_error(tag_error_code(&tag));
        while !self.current_node_in(|name| {
            *name.ns == ns!(html)
                || mathml_text_integration_point(name)
                || svg_html_integration_point(name)
        }) {
            self.pop();
        }
        self.step(self.mode.get(), Input::Tag(tag))
    }

    /// An end tag in foreign content closes the nearest foreign element
    /// whose name matches, ASCII-case-insensitively (foreign names keep
    /// their case). An open HTML element found first takes the token back
    /// to the regular rules instead.
    fn foreign_end_tag(&self, tag: Tag) -> Directive<Handle> {
        let top = self.open_elems.borrow().len() - 1;
        let mut reported = false;
        for index in (1..=top).rev() {
            let (is_html, name_matches) = {
                let stack = self.open_elems.borrow();
                let name = self.sink.elem_name(&stack[index]);
                (
                    *name.ns() == ns!(html),
                    name.local_name().eq_ignore_ascii_case(&tag.name),
                )
            };

            if is_html && index < top {
                return self.step(self.mode.get(), Input::Tag(tag));
            }
            if name_matches {
                self.open_elems.borrow_mut().truncate(index);
                return Directive::Processed;
            }
            if !reported {
                self.parse_error(ErrorCode::UnexpectedEndTag);
                reported = true;
            }
        }
        Directive::Processed
    }
    //§ END

    fn in_table_related_mode(&self) -> bool {
        matches!(
            self.mode.get(),
            InsertionMode::InTable
                | InsertionMode::InCaption
                | InsertionMode::InTableBody
                | InsertionMode::InRow
                | InsertionMode::InCell
        )
    }
}

fn is_heading(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("h1")
            | local_name!("h2")
            | local_name!("h3")
            | local_name!("h4")
            | local_name!("h5")
            | local_name!("h6")
    )
}

fn is_head_metadata(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("base")
            | local_name!("basefont")
            | local_name!("bgsound")
            | local_name!("link")
            | local_name!("meta")
    )
}

/// Start tags that belong to the head even when they show up later.
fn is_head_only(name: &LocalName) -> bool {
    is_head_metadata(name)
        || matches!(
            *name,
            local_name!("noframes")
                | local_name!("script")
                | local_name!("style")
                | local_name!("template")
                | local_name!("title")
        )
}

/// Start tags opening the structured flow containers of the in-body
/// rules (the ones that first close an open `<p>`).
fn is_body_block_start(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("address")
            | local_name!("article")
            | local_name!("aside")
            | local_name!("blockquote")
            | local_name!("center")
            | local_name!("details")
            | local_name!("dialog")
            | local_name!("dir")
            | local_name!("div")
            | local_name!("dl")
            | local_name!("fieldset")
            | local_name!("figcaption")
            | local_name!("figure")
            | local_name!("footer")
            | local_name!("header")
            | local_name!("hgroup")
            | local_name!("main")
            | local_name!("menu")
            | local_name!("nav")
            | local_name!("ol")
            | local_name!("p")
            | local_name!("search")
            | local_name!("section")
            | local_name!("summary")
            | local_name!("ul")
    )
}

/// End tags closed by scope check plus implied end tags. `</p>` is not
/// among them: it has its own rule (it can conjure the element it
/// closes).
fn is_body_block_end(name: &LocalName) -> bool {
    if *name == local_name!("p") {
        return false;
    }
    is_body_block_start(name)
        || matches!(
            *name,
            local_name!("button") | local_name!("listing") | local_name!("pre")
        )
}

/// Formatting elements with no extra opening ceremony (`<a>` and
/// `<nobr>` have their own rules).
fn is_simple_formatting(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("b")
            | local_name!("big")
            | local_name!("code")
            | local_name!("em")
            | local_name!("font")
            | local_name!("i")
            | local_name!("s")
            | local_name!("small")
            | local_name!("strike")
            | local_name!("strong")
            | local_name!("tt")
            | local_name!("u")
    )
}

/// End tags that run the adoption agency.
fn is_adoption_subject(name: &LocalName) -> bool {
    is_simple_formatting(name) || matches!(*name, local_name!("a") | local_name!("nobr"))
}

/// Plain void elements of the in-body rules.
fn is_plain_void(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("area")
            | local_name!("br")
            | local_name!("embed")
            | local_name!("img")
            | local_name!("input")
            | local_name!("keygen")
            | local_name!("wbr")
    )
}

/// Start tags that only make sense in table context and are dropped
/// anywhere else in the body.
fn is_table_only(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("caption")
            | local_name!("col")
            | local_name!("colgroup")
            | local_name!("frame")
            | local_name!("head")
            | local_name!("tbody")
            | local_name!("td")
            | local_name!("tfoot")
            | local_name!("th")
            | local_name!("thead")
            | local_name!("tr")
    )
}

/// The table markup that interrupts a `<select>` sitting in a table.
fn is_table_layout_or_cell(name: &LocalName) -> bool {
    matches!(
        *name,
        local_name!("caption")
            | local_name!("table")
            | local_name!("tbody")
            | local_name!("tfoot")
            | local_name!("thead")
            | local_name!("tr")
            | local_name!("td")
            | local_name!("th")
    )
}

/// The HTML-flavored tags whose appearance inside MathML or SVG throws
/// the parser back to HTML, plus `<font>` when it carries HTML-ish
/// presentation attributes.
fn breaks_out_of_foreign_content(tag: &Tag) -> bool {
    if tag.name == local_name!("font") {
        return tag.attrs.iter().any(|attr| {
            attr.name.ns == ns!()
                && matches!(
                    attr.name.local,
                    local_name!("color") | local_name!("face") | local_name!("size")
                )
        });
    }

    is_heading(&tag.name)
        || is_simple_formatting(&tag.name)
        || matches!(
            tag.name,
            local_name!("blockquote")
                | local_name!("body")
                | local_name!("br")
                | local_name!("center")
                | local_name!("dd")
                | local_name!("div")
                | local_name!("dl")
                | local_name!("dt")
                | local_name!("embed")
                | local_name!("head")
                | local_name!("hr")
                | local_name!("img")
                | local_name!("li")
                | local_name!("listing")
                | local_name!("menu")
                | local_name!("meta")
                | local_name!("nobr")
                | local_name!("ol")
                | local_name!("p")
                | local_name!("pre")
                | local_name!("ruby")
                | local_name!("span")
                | local_name!("sub")
                | local_name!("sup")
                | local_name!("table")
                | local_name!("ul")
                | local_name!("var")
        )
}
