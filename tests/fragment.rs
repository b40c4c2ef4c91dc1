// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The HTML fragment parsing algorithm.

mod common;

use grafter::driver::{parse_fragment, ParseOpts};
use grafter::interface::TreeSink;
use grafter::rcdom::RcDom;
use grafter::tokenizer::states::{Data, Plaintext, RawData, Rawtext, Rcdata, ScriptData};
use grafter::tokenizer::TokenSink;
use grafter::{local_name, namespace_url, ns, QualName};

use common::{dump_dom, end, eof, feed, start, text};

fn context(local: grafter::LocalName) -> QualName {
    QualName::new(None, ns!(html), local)
}

#[test]
fn td_in_table_context_gets_table_scaffolding() {
    let tree_builder = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context(local_name!("table")),
        vec![],
        None,
    );
    feed(
        &tree_builder,
        vec![start("td"), text("x"), end("td"), eof()],
    );
    tree_builder.end();
    let dom = tree_builder.sink.finish();

    // The fragment is the children of the phantom root.
    assert_eq!(
        dump_dom(&dom),
        "\
| <html>
|   <tbody>
|     <tr>
|       <td>
|         \"x\"
"
    );
}

#[test]
fn template_context_accepts_any_content() {
    let tree_builder = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context(local_name!("template")),
        vec![],
        None,
    );
    feed(
        &tree_builder,
        vec![start("p"), text("x"), end("p"), eof()],
    );
    tree_builder.end();
    let dom = tree_builder.sink.finish();

    assert_eq!(
        dump_dom(&dom),
        "\
| <html>
|   <p>
|     \"x\"
"
    );
}

#[test]
fn select_context_filters_markup() {
    let tree_builder = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context(local_name!("select")),
        vec![],
        None,
    );
    feed(
        &tree_builder,
        vec![
            start("option"),
            text("one"),
            start("option"),
            text("two"),
            eof(),
        ],
    );
    tree_builder.end();
    let dom = tree_builder.sink.finish();

    assert_eq!(
        dump_dom(&dom),
        "\
| <html>
|   <option>
|     \"one\"
|   <option>
|     \"two\"
"
    );
}

#[test]
fn tokenizer_state_follows_the_context_element() {
    let cases: &[(_, _)] = &[
        (local_name!("title"), RawData(Rcdata)),
        (local_name!("textarea"), RawData(Rcdata)),
        (local_name!("style"), RawData(Rawtext)),
        (local_name!("iframe"), RawData(Rawtext)),
        (local_name!("script"), RawData(ScriptData)),
        (local_name!("plaintext"), Plaintext),
        (local_name!("div"), Data),
    ];
    for (local, expected) in cases {
        let tree_builder = parse_fragment(
            RcDom::default(),
            ParseOpts::default(),
            context(local.clone()),
            vec![],
            None,
        );
        assert_eq!(
            tree_builder.tokenizer_state_for_context_elem(true),
            *expected,
            "context <{local}>",
        );
    }

    // <noscript> depends on whether scripting is enabled.
    let tree_builder = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        context(local_name!("noscript")),
        vec![],
        None,
    );
    assert_eq!(
        tree_builder.tokenizer_state_for_context_elem(true),
        RawData(Rawtext)
    );
    assert_eq!(tree_builder.tokenizer_state_for_context_elem(false), Data);
}
