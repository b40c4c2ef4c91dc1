// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A scripted stand-in for the tokenizer: tests hand the tree builder a
//! ready-made token stream and inspect the resulting rcdom.

#![allow(dead_code)]

use grafter::driver;
use grafter::interface::{SourceSpan, TreeSink};
use grafter::rcdom::{Handle, NodeData, RcDom};
use grafter::tokenizer::{Doctype, Tag, TagKind, Token, TokenSink, TokenSinkResult};
use grafter::tree_builder::TreeBuilder;
use grafter::{ns, namespace_url, Attribute, LocalName, ParseOpts, QualName};

pub struct ParseOutcome {
    pub dom: RcDom,
    /// Script elements handed back at each `</script>` pause, in order.
    pub scripts: Vec<Handle>,
}

pub fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.into(),
    }
}

fn tag_token(kind: TagKind, name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Token {
    Token::TagToken(Tag {
        kind,
        name: LocalName::from(name),
        self_closing,
        attrs: attrs.iter().map(|&(k, v)| attr(k, v)).collect(),
        attr_spans: vec![],
    })
}

pub fn start(name: &str) -> Token {
    tag_token(TagKind::StartTag, name, &[], false)
}

pub fn start_attrs(name: &str, attrs: &[(&str, &str)]) -> Token {
    tag_token(TagKind::StartTag, name, attrs, false)
}

pub fn start_self_closing(name: &str) -> Token {
    tag_token(TagKind::StartTag, name, &[], true)
}

pub fn end(name: &str) -> Token {
    tag_token(TagKind::EndTag, name, &[], false)
}

pub fn text(s: &str) -> Token {
    Token::CharacterTokens(s.into())
}

pub fn comment(s: &str) -> Token {
    Token::CommentToken(s.into())
}

pub fn null_character() -> Token {
    Token::NullCharacterToken
}

pub fn eof() -> Token {
    Token::EOFToken
}

pub fn doctype(name: &str) -> Token {
    doctype_with_ids(name, None, None)
}

pub fn doctype_with_ids(name: &str, public_id: Option<&str>, system_id: Option<&str>) -> Token {
    Token::DoctypeToken(Doctype {
        name: Some(name.into()),
        public_id: public_id.map(Into::into),
        system_id: system_id.map(Into::into),
        force_quirks: false,
    })
}

/// Push every token into the builder, collecting script-pause handles.
pub fn feed(
    tree_builder: &TreeBuilder<Handle, RcDom>,
    tokens: Vec<Token>,
) -> Vec<Handle> {
    feed_spanned(
        tree_builder,
        tokens
            .into_iter()
            .map(|t| (t, SourceSpan::default()))
            .collect(),
    )
}

/// Like [`feed`], with a span per token, for location tests.
pub fn feed_spanned(
    tree_builder: &TreeBuilder<Handle, RcDom>,
    tokens: Vec<(Token, SourceSpan)>,
) -> Vec<Handle> {
    let mut scripts = Vec::new();
    for (token, span) in tokens {
        match tree_builder.process_token(token, span) {
            TokenSinkResult::Continue => {}
            // A real tokenizer would switch lexical state here; a scripted
            // stream already reflects the switch.
            TokenSinkResult::Plaintext | TokenSinkResult::RawData(_) => {}
            TokenSinkResult::Script(handle) => scripts.push(handle),
        }
    }
    scripts
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseOutcome {
    parse_tokens_with_opts(tokens, ParseOpts::default())
}

pub fn parse_tokens_with_opts(tokens: Vec<Token>, opts: ParseOpts) -> ParseOutcome {
    let tree_builder = driver::parse_document(RcDom::default(), opts);
    let scripts = feed(&tree_builder, tokens);
    tree_builder.end();
    ParseOutcome {
        dom: tree_builder.sink.finish(),
        scripts,
    }
}

pub fn parse_spanned_tokens(tokens: Vec<(Token, SourceSpan)>, opts: ParseOpts) -> ParseOutcome {
    let tree_builder = driver::parse_document(RcDom::default(), opts);
    let scripts = feed_spanned(&tree_builder, tokens);
    tree_builder.end();
    ParseOutcome {
        dom: tree_builder.sink.finish(),
        scripts,
    }
}

/// Dump a parse tree in the pipe-and-indent format html5lib uses.
pub fn dump_dom(dom: &RcDom) -> String {
    let mut buf = String::new();
    for child in dom.document.children.borrow().iter() {
        dump(&mut buf, 1, child);
    }
    buf
}

fn push_line_start(buf: &mut String, indent: usize) {
    buf.push('|');
    for _ in 0..indent {
        buf.push(' ');
    }
}

fn dump(buf: &mut String, indent: usize, handle: &Handle) {
    push_line_start(buf, indent);

    match handle.data {
        NodeData::Document => panic!("can't dump a nested document"),

        NodeData::Doctype { ref name, .. } => {
            buf.push_str(&format!("<!DOCTYPE {name}>\n"));
        }

        NodeData::Text { ref contents } => {
            buf.push_str(&format!("\"{}\"\n", contents.borrow()));
        }

        NodeData::Comment { ref contents } => {
            buf.push_str(&format!("<!-- {contents} -->\n"));
        }

        NodeData::Element {
            ref name,
            ref attrs,
            ref template_contents,
            ..
        } => {
            buf.push('<');
            match name.ns {
                ns!(svg) => buf.push_str("svg "),
                ns!(mathml) => buf.push_str("math "),
                _ => (),
            }
            buf.push_str(&name.local);
            buf.push_str(">\n");

            let mut attr_list = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect::<Vec<_>>();
            attr_list.sort();
            for (name, value) in attr_list {
                push_line_start(buf, indent + 2);
                buf.push_str(&format!("{name}=\"{value}\"\n"));
            }

            if let Some(ref contents) = *template_contents.borrow() {
                push_line_start(buf, indent + 2);
                buf.push_str("content\n");
                for child in contents.children.borrow().iter() {
                    dump(buf, indent + 4, child);
                }
            }

            for child in handle.children.borrow().iter() {
                dump(buf, indent + 2, child);
            }
        }
    }
}
