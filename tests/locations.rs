// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Source-location bookkeeping: start tags, attributes, end tags, text
//! extents, EOF, and the body/html end patches.

mod common;

use grafter::interface::{Position, SourceSpan};
use grafter::rcdom::{Handle, NodeData};
use grafter::tokenizer::Token;
use grafter::ParseOpts;

use common::{end, eof, parse_spanned_tokens, start, start_attrs, text};

fn pos(column: u64, offset: usize) -> Position {
    Position {
        line: 1,
        column,
        offset,
    }
}

fn span(start: u64, end: u64) -> SourceSpan {
    SourceSpan {
        start: pos(start + 1, start as usize),
        end: pos(end + 1, end as usize),
    }
}

fn location_opts() -> ParseOpts {
    let mut opts = ParseOpts::default();
    opts.tree_builder.source_code_location_info = true;
    opts
}

fn spanned(tokens: Vec<(Token, SourceSpan)>) -> grafter::rcdom::RcDom {
    parse_spanned_tokens(tokens, location_opts()).dom
}

fn child(node: &Handle, i: usize) -> Handle {
    node.children.borrow()[i].clone()
}

// <html><body><p id=a>x</p></body></html>
fn spanned_document() -> grafter::rcdom::RcDom {
    spanned(vec![
        (start("html"), span(0, 6)),
        (start("body"), span(6, 12)),
        (start_attrs("p", &[("id", "a")]), span(12, 20)),
        (text("x"), span(20, 21)),
        (end("p"), span(21, 25)),
        (end("body"), span(25, 32)),
        (end("html"), span(32, 39)),
        (eof(), span(39, 39)),
    ])
}

#[test]
fn elements_get_start_and_end_tag_spans() {
    let dom = spanned_document();
    let html = child(&dom.document, 0);
    let body = child(&html, 1);
    let p = child(&body, 0);

    let location = p.location.borrow();
    let location = location.as_ref().expect("no location on <p>");
    assert_eq!(location.span, span(12, 20));
    assert_eq!(location.end_tag, Some(span(21, 25)));
    assert_eq!(location.attrs.len(), 0); // the scripted stream carried none
}

#[test]
fn attribute_spans_are_recorded() {
    let mut tag = start_attrs("p", &[("id", "a")]);
    if let Token::TagToken(ref mut t) = tag {
        t.attr_spans = vec![span(15, 19)];
    }
    let dom = spanned(vec![
        (start("body"), span(0, 6)),
        (tag, span(12, 20)),
        (eof(), span(21, 21)),
    ]);

    let html = child(&dom.document, 0);
    let body = child(&html, 1);
    let p = child(&body, 0);
    let location = p.location.borrow();
    let location = location.as_ref().expect("no location on <p>");
    assert_eq!(location.attrs, vec![span(15, 19)]);
}

#[test]
fn body_and_html_end_locations_are_patched() {
    let dom = spanned_document();
    let html = child(&dom.document, 0);
    let body = child(&html, 1);

    let body_location = body.location.borrow();
    let body_location = body_location.as_ref().expect("no location on <body>");
    assert_eq!(body_location.span, span(6, 12));
    // </body> is a matching end tag: the full span, not the EOF patch.
    assert_eq!(body_location.end_tag, Some(span(25, 32)));

    let html_location = html.location.borrow();
    let html_location = html_location.as_ref().expect("no location on <html>");
    assert_eq!(html_location.span, span(0, 6));
    assert_eq!(html_location.end_tag, Some(span(32, 39)));
}

#[test]
fn text_spans_extend_over_contributing_tokens() {
    let dom = spanned(vec![
        (start("body"), span(0, 6)),
        (text("ab"), span(6, 8)),
        (text("cd"), span(8, 10)),
        (eof(), span(10, 10)),
    ]);

    let html = child(&dom.document, 0);
    let body = child(&html, 1);
    let text_node = child(&body, 0);
    match text_node.data {
        NodeData::Text { ref contents } => assert_eq!(&**contents.borrow(), "abcd"),
        _ => panic!("expected text"),
    }
    let location = text_node.location.borrow();
    let location = location.as_ref().expect("no location on text");
    assert_eq!(location.span.start, pos(7, 6));
    assert_eq!(location.span.end, pos(11, 10));
}

#[test]
fn elements_open_at_eof_get_collapsed_end_spans() {
    let dom = spanned(vec![
        (start("body"), span(0, 6)),
        (start("div"), span(6, 11)),
        (eof(), span(11, 11)),
    ]);

    let html = child(&dom.document, 0);
    let body = child(&html, 1);
    let div = child(&body, 0);
    let location = div.location.borrow();
    let location = location.as_ref().expect("no location on <div>");
    assert_eq!(location.span, span(6, 11));
    assert_eq!(location.end_tag, Some(span(11, 11)));
}

#[test]
fn elements_closed_implicitly_get_collapsed_end_spans() {
    // <p> closed by a second <p>: the end is a zero-length span at the
    // second start tag.
    let dom = spanned(vec![
        (start("body"), span(0, 6)),
        (start("p"), span(6, 9)),
        (start("p"), span(9, 12)),
        (eof(), span(12, 12)),
    ]);

    let html = child(&dom.document, 0);
    let body = child(&html, 1);
    let first_p = child(&body, 0);
    let location = first_p.location.borrow();
    let location = location.as_ref().expect("no location on <p>");
    assert_eq!(location.end_tag, Some(span(9, 12).collapsed_to_start()));
}
