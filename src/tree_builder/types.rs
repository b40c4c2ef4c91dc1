// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plumbing shared between the dispatch loop and the per-mode handlers.

use tendril::StrTendril;

use crate::tokenizer::states::RawKind;
use crate::tokenizer::Tag;

/// Which state of the tree-construction state machine the parser is in.
///
/// <https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode>
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub(crate) enum InsertionMode {
    // Document prologue.
    Initial,
    BeforeHtml,
    BeforeHead,
    InHead,
    InHeadNoscript,
    AfterHead,

    // Document content, and elements that may contain only text.
    InBody,
    Text,

    // The table sub-machine.
    InTable,
    InTableText,
    InCaption,
    InColumnGroup,
    InTableBody,
    InRow,
    InCell,

    // Form controls.
    InSelect,
    InSelectInTable,

    // Template contents.
    InTemplate,

    // Document epilogue, with the frameset variants.
    AfterBody,
    InFrameset,
    AfterFrameset,
    AfterAfterBody,
    AfterAfterFrameset,
}

/// A token as the mode handlers see it.
///
/// DOCTYPEs and forwarded tokenizer errors are settled before dispatch and
/// never show up here. Character data arrives pre-chopped into maximal
/// runs that either consist of ASCII whitespace or contain none of it, so
/// no handler ever re-scans text to decide which rule applies.
#[derive(Clone, Debug)]
pub(crate) enum Input {
    Tag(Tag),
    Comment(StrTendril),
    /// A run of ASCII whitespace.
    Whitespace(StrTendril),
    /// A run of character data without any ASCII whitespace.
    Text(StrTendril),
    /// A lone U+0000, which the tokenizer reports on its own.
    Null,
    Eof,
}

/// What the dispatch loop does after a handler has run.
pub(crate) enum Directive<Handle> {
    /// The token was consumed.
    Processed,
    /// Consumed, and a self-closing flag on it was legitimate.
    ProcessedSelfClosing,
    /// Switch to the given mode and put the token through again.
    Redispatch(InsertionMode, Input),
    /// Stop so the host can run this just-closed `<script>`.
    PauseForScript(Handle),
    /// Make the tokenizer switch to the PLAINTEXT state.
    EnterPlaintext,
    /// Make the tokenizer switch to a raw-text state.
    EnterRawText(RawKind),
}

/// Where the next node goes: the outcome of the "appropriate place for
/// inserting a node" steps.
pub(crate) enum InsertionPoint<Handle> {
    /// Append as the last child of this node.
    AppendTo(Handle),
    /// Foster parenting. The sink inserts before `table` when the table
    /// has a parent, and appends to `below_table` (the node under the
    /// table on the stack) when it does not.
    FosterBeside { table: Handle, below_table: Handle },
}
