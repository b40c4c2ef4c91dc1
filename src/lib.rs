// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The tree-construction stage of an HTML5 parser.
//!
//! `grafter` consumes the token stream an HTML tokenizer produces and turns
//! it into mutations against a caller-supplied DOM, implementing the WHATWG
//! tree-construction algorithm: the insertion-mode state machine, the stack
//! of open elements, the list of active formatting elements and the adoption
//! agency, foster parenting, foreign (MathML/SVG) content, template and
//! fragment parsing.
//!
//! The tokenizer itself is an external collaborator. It pushes tokens into a
//! [`TreeBuilder`](tree_builder::TreeBuilder) through the
//! [`TokenSink`](tokenizer::TokenSink) trait and obeys the returned
//! [`TokenSinkResult`](tokenizer::TokenSinkResult) to switch its own state
//! (RCDATA/RAWTEXT/script data/plaintext) and to pause at `</script>`.
//! The DOM is equally external: all reads and writes go through the
//! [`TreeSink`](interface::TreeSink) capability trait. A reference
//! `Rc`-based sink is bundled as [`rcdom`].

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

pub use crate::interface::{Attribute, ExpandedName, QualName};
pub use crate::driver::{parse_document, parse_fragment, ParseOpts};

mod util {
    pub mod str;
}

pub mod driver;
pub mod interface;
pub mod rcdom;
pub mod tokenizer;
pub mod tree_builder;

/// Re-export the tendril crate.
pub mod tendril {
    pub use tendril::*;
}
