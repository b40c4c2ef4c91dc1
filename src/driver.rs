// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! High-level interface to the tree builder.
//!
//! The host owns the tokenizer. It asks this module for a configured
//! [`TreeBuilder`], then runs the parsing loop itself:
//!
//! 1. push each token into [`TokenSink::process_token`];
//! 2. obey the returned [`TokenSinkResult`]: switch the tokenizer state on
//!    `RawData`/`Plaintext`, and on `Script(handle)` stop tokenizing, let
//!    the embedder run the script, then continue;
//! 3. when the input ends, push `EOFToken` and call [`TokenSink::end`];
//! 4. take the parse tree from `tree_builder.sink.finish()`.
//!
//! If the input arrives in chunks, the host simply stops pushing tokens
//! when a chunk runs dry and resumes with the next one; the builder keeps
//! all of its state between calls.
//!
//! [`TokenSink`]: crate::tokenizer::TokenSink
//! [`TokenSinkResult`]: crate::tokenizer::TokenSinkResult

use crate::interface::{create_element, TreeSink};
use crate::tree_builder::{TreeBuilder, TreeBuilderOpts};
use crate::{Attribute, QualName};

/// All-encompassing options struct for the parser.
#[derive(Copy, Clone, Default)]
pub struct ParseOpts {
    /// Tree builder options.
    pub tree_builder: TreeBuilderOpts,
}

/// Parse an HTML document.
///
/// The returned tree builder expects the token stream of a whole document
/// (its tokenizer starts in the Data state).
pub fn parse_document<Sink>(sink: Sink, opts: ParseOpts) -> TreeBuilder<Sink::Handle, Sink>
where
    Sink: TreeSink,
{
    TreeBuilder::new(sink, opts.tree_builder)
}

/// Parse an HTML fragment in a context element with the given name and
/// attributes, per the HTML fragment parsing algorithm: a context element
/// is created through the sink, a phantom `<html>` root is installed, and
/// the insertion mode is reset for the context.
///
/// `form_elem` is the nearest `<form>` ancestor of the context node, if
/// the host knows one; the engine cannot walk the host tree itself.
///
/// Hosts with no natural context element should pass an HTML `template`
/// name, which accepts any content.
///
/// The host must initialize its tokenizer to
/// [`TreeBuilder::tokenizer_state_for_context_elem`] before feeding; a
/// `<title>` context, for example, tokenizes as RCDATA from the first
/// character.
///
/// The parsed fragment ends up as the children of the phantom root, i.e.
/// of the document's single element child.
pub fn parse_fragment<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_name: QualName,
    context_attrs: Vec<Attribute>,
    form_elem: Option<Sink::Handle>,
) -> TreeBuilder<Sink::Handle, Sink>
where
    Sink: TreeSink,
{
    let context_elem = create_element(&sink, context_name, context_attrs);
    TreeBuilder::new_for_fragment(sink, context_elem, form_elem, opts.tree_builder)
}
