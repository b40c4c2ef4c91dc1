// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::borrow::Cow;

use tendril::StrTendril;

use crate::interface::{Attribute, ParseError, SourceSpan};
use crate::tokenizer::states;
use crate::LocalName;

pub use self::TagKind::{EndTag, StartTag};
pub use self::Token::{CharacterTokens, CommentToken, DoctypeToken, TagToken};
pub use self::Token::{EOFToken, NullCharacterToken, ParseErrorToken};

/// A `DOCTYPE` token.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Doctype {
    pub name: Option<StrTendril>,
    pub public_id: Option<StrTendril>,
    pub system_id: Option<StrTendril>,
    pub force_quirks: bool,
}

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum TagKind {
    StartTag,
    EndTag,
}

/// A tag token.
///
/// `attr_spans`, when the tokenizer tracks positions, is index-parallel
/// with `attrs` and covers each attribute from the first character of its
/// name through its value's closing quote. It takes no part in equality.
#[derive(Clone, Debug)]
pub struct Tag {
    pub kind: TagKind,
    pub name: LocalName,
    pub self_closing: bool,
    pub attrs: Vec<Attribute>,
    pub attr_spans: Vec<SourceSpan>,
}

impl Tag {
    /// Are the tags equivalent when we don't care about attribute order?
    /// Also ignores the self-closing flag.
    pub fn equiv_modulo_attr_order(&self, other: &Tag) -> bool {
        if (self.kind != other.kind) || (self.name != other.name) {
            return false;
        }

        let mut self_attrs = self.attrs.clone();
        let mut other_attrs = other.attrs.clone();
        self_attrs.sort();
        other_attrs.sort();

        self_attrs == other_attrs
    }

    pub(crate) fn get_attribute(&self, name: &LocalName) -> Option<StrTendril> {
        self.attrs
            .iter()
            .find(|attribute| attribute.name.ns == ns!() && attribute.name.local == *name)
            .map(|attribute| attribute.value.clone())
    }
}

#[derive(Clone, Debug)]
pub enum Token {
    DoctypeToken(Doctype),
    TagToken(Tag),
    CommentToken(StrTendril),
    CharacterTokens(StrTendril),
    NullCharacterToken,
    EOFToken,
    /// An error the tokenizer itself detected, forwarded so one sink sees
    /// the whole error stream. `message` carries the tokenizer's own
    /// diagnostic text.
    ParseErrorToken {
        error: ParseError,
        message: Cow<'static, str>,
    },
}

/// What the sink tells the tokenizer to do next.
///
/// The raw-text and plaintext switches only take effect after the
/// `process_token` call for the start tag returns, which is exactly when
/// the tokenizer looks at the result.
#[derive(Debug, PartialEq)]
#[must_use]
pub enum TokenSinkResult<Handle> {
    /// Keep going.
    Continue,
    /// A `</script>` was seen: stop, let the host run the script against
    /// the handle, then resume tokenizing.
    Script(Handle),
    /// Switch to the PLAINTEXT state.
    Plaintext,
    /// Switch to a raw-text state.
    RawData(states::RawKind),
}

/// Types which can receive tokens from the tokenizer.
pub trait TokenSink {
    type Handle;

    /// Process a token. `span` is the token's extent in the decoded input
    /// (all zeros when the tokenizer does not track positions).
    fn process_token(&self, token: Token, span: SourceSpan) -> TokenSinkResult<Self::Handle>;

    /// Signal to the sink that tokenization has reached the end.
    fn end(&self) {}

    /// Used in the markup declaration open state: CDATA sections are only
    /// tokenized as such inside foreign content. By default this returns
    /// false and thus all CDATA sections become bogus comments.
    /// <https://html.spec.whatwg.org/multipage/#markup-declaration-open-state>
    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod test {
    use super::{StartTag, Tag};
    use crate::interface::Attribute;
    use crate::QualName;

    fn attr(local: crate::LocalName, value: &str) -> Attribute {
        Attribute {
            name: QualName::new(None, ns!(), local),
            value: value.into(),
        }
    }

    #[test]
    fn tag_equivalence_ignores_attr_order() {
        let ab = Tag {
            kind: StartTag,
            name: local_name!("b"),
            self_closing: false,
            attrs: vec![attr(local_name!("id"), "x"), attr(local_name!("class"), "y")],
            attr_spans: vec![],
        };
        let ba = Tag {
            kind: StartTag,
            name: local_name!("b"),
            self_closing: false,
            attrs: vec![attr(local_name!("class"), "y"), attr(local_name!("id"), "x")],
            attr_spans: vec![],
        };
        assert!(ab.equiv_modulo_attr_order(&ba));

        let other_value = Tag {
            attrs: vec![attr(local_name!("id"), "z"), attr(local_name!("class"), "y")],
            ..ab.clone()
        };
        assert!(!ab.equiv_modulo_attr_order(&other_value));
    }
}
