// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tokenizer states the tree builder can demand.
//!
//! The tokenizer has many more internal states; these are the ones the tree
//! builder switches it into, either through a [`TokenSinkResult`] or when a
//! fragment context element dictates the initial state.
//!
//! [`TokenSinkResult`]: crate::tokenizer::TokenSinkResult

pub use self::RawKind::{Rawtext, Rcdata, ScriptData};
pub use self::State::{Data, Plaintext, RawData};

/// The flavor of raw-text lexing: how the content of an element that can
/// contain only text is terminated.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Debug)]
pub enum RawKind {
    /// `<title>`, `<textarea>`: character references are still expanded.
    Rcdata,
    /// `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`: verbatim
    /// until the matching end tag.
    Rawtext,
    /// `<script>`: raw text with the escaped-script-data dance.
    ScriptData,
}

/// A lexical state the tree builder writes back into the tokenizer.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash, Debug)]
pub enum State {
    /// <https://html.spec.whatwg.org/#data-state>
    Data,
    /// <https://html.spec.whatwg.org/#plaintext-state>
    Plaintext,
    /// One of the raw-text states (RCDATA, RAWTEXT, script data).
    RawData(RawKind),
}
