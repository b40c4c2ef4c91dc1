// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Drive the tree builder with hand-assembled token streams and compare
//! the resulting DOM against expected tree dumps.

mod common;

use grafter::interface::{ErrorCode, QuirksMode};
use grafter::rcdom::NodeData;
use grafter::{local_name, namespace_url, ns};

use common::{
    comment, doctype, doctype_with_ids, dump_dom, end, eof, null_character, parse_tokens,
    parse_tokens_with_opts, start, start_attrs, start_self_closing, text,
};

#[test]
fn basic_document() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("html"),
        start("head"),
        end("head"),
        start("body"),
        text("Hi there!"),
        end("body"),
        end("html"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"Hi there!\"
"
    );
    assert!(outcome.dom.errors.borrow().is_empty());
    assert_eq!(outcome.dom.quirks_mode.get(), QuirksMode::NoQuirks);
}

#[test]
fn consecutive_character_tokens_coalesce() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        text("Hello"),
        text(", "),
        text("world"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"Hello, world\"
"
    );
}

#[test]
fn missing_doctype_forces_quirks() {
    let outcome = parse_tokens(vec![start("p"), text("x"), end("p"), eof()]);

    assert_eq!(outcome.dom.quirks_mode.get(), QuirksMode::Quirks);
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::MissingDoctype));
}

#[test]
fn quirky_doctype_is_reported() {
    let outcome = parse_tokens(vec![
        doctype_with_ids("html", Some("-//W3C//DTD HTML 3.2 Final//EN"), None),
        start("body"),
        eof(),
    ]);

    assert_eq!(outcome.dom.quirks_mode.get(), QuirksMode::Quirks);
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::NonConformingDoctype));
}

#[test]
fn misplaced_doctype_is_ignored() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        doctype("html"),
        text("x"),
        eof(),
    ]);

    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::MisplacedDoctype));
    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"x\"
"
    );
}

// <p>1<b>2<i>3</b>4</i>5</p>
#[test]
fn adoption_agency_reparents_misnested_formatting() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("p"),
        text("1"),
        start("b"),
        text("2"),
        start("i"),
        text("3"),
        end("b"),
        text("4"),
        end("i"),
        text("5"),
        end("p"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
|       \"1\"
|       <b>
|         \"2\"
|         <i>
|           \"3\"
|       <i>
|         \"4\"
|       \"5\"
"
    );
}

// <table>a<tr><td>b</td></tr></table>
#[test]
fn non_space_table_text_is_foster_parented() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("table"),
        text("a"),
        start("tr"),
        start("td"),
        text("b"),
        end("td"),
        end("tr"),
        end("table"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"a\"
|     <table>
|       <tbody>
|         <tr>
|           <td>
|             \"b\"
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::UnexpectedCharacterInTable));
}

#[test]
fn whitespace_table_text_stays_in_table() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("table"),
        text("  "),
        start("tr"),
        end("tr"),
        end("table"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <table>
|       \"  \"
|       <tbody>
|         <tr>
"
    );
}

// <p><b id=x>1<b id=x>2<b id=x>3<b id=x>4</p><p>5
//
// Pushing the fourth identical <b> drops the oldest entry from the list of
// active formatting elements, so the reconstruction in the second <p>
// reopens exactly three.
#[test]
fn noahs_ark_caps_reconstructed_formatting_elements() {
    let b = || start_attrs("b", &[("id", "x")]);
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("p"),
        b(),
        text("1"),
        b(),
        text("2"),
        b(),
        text("3"),
        b(),
        text("4"),
        end("p"),
        start("p"),
        text("5"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <p>
|       <b>
|         id=\"x\"
|         \"1\"
|         <b>
|           id=\"x\"
|           \"2\"
|           <b>
|             id=\"x\"
|             \"3\"
|             <b>
|               id=\"x\"
|               \"4\"
|     <p>
|       <b>
|         id=\"x\"
|         <b>
|           id=\"x\"
|           <b>
|             id=\"x\"
|             \"5\"
"
    );
}

// <body><script>A</script><p>B</p> with a script handler: the driver loop
// returns at </script> with the script element, then resumes.
#[test]
fn script_end_tag_pauses_the_driver() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start("script"),
        text("A"),
        end("script"),
        start("p"),
        text("B"),
        end("p"),
        eof(),
    ]);

    assert_eq!(outcome.scripts.len(), 1);
    let script = &outcome.scripts[0];
    match script.data {
        NodeData::Element { ref name, .. } => {
            assert_eq!(name.ns, ns!(html));
            assert_eq!(name.local, local_name!("script"));
        }
        _ => panic!("script pause did not hand back an element"),
    }

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <script>
|       \"A\"
|     <p>
|       \"B\"
"
    );
}

#[test]
fn template_contents_parse_into_fragment() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("template"),
        start("td"),
        text("x"),
        end("td"),
        end("template"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <template>
|       content
|         <td>
|           \"x\"
|   <body>
"
    );
}

#[test]
fn stray_template_end_tag_is_reported() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        end("template"),
        eof(),
    ]);

    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::EndTagWithoutMatchingOpenElement));
}

#[test]
fn svg_names_and_attributes_are_adjusted() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start_attrs("svg", &[("viewbox", "0 0 10 10")]),
        start("foreignobject"),
        start("p"),
        text("x"),
        end("p"),
        end("foreignobject"),
        end("svg"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       viewBox=\"0 0 10 10\"
|       <svg foreignObject>
|         <p>
|           \"x\"
"
    );
}

#[test]
fn html_breakout_tag_exits_foreign_content() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start("svg"),
        start("p"),
        text("hi"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|     <p>
|       \"hi\"
"
    );
}

#[test]
fn null_character_in_foreign_content_becomes_replacement() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start("svg"),
        null_character(),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <svg svg>
|       \"\u{fffd}\"
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::UnexpectedNullCharacter));
}

#[test]
fn leading_newline_after_pre_is_dropped() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("pre"),
        text("\nfoo"),
        end("pre"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <pre>
|       \"foo\"
"
    );
}

#[test]
fn br_end_tag_is_rewritten_to_a_start_tag() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        text("x"),
        end("br"),
        text("y"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     \"x\"
|     <br>
|     \"y\"
"
    );
}

#[test]
fn image_start_tag_is_rewritten_to_img() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start_attrs("image", &[("src", "a.png")]),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <img>
|       src=\"a.png\"
"
    );
}

#[test]
fn select_inside_table_is_foster_parented_and_closed_by_table_tags() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("table"),
        start("select"),
        start("tr"),
        end("table"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <select>
|     <table>
|       <tbody>
|         <tr>
"
    );
}

#[test]
fn abandoned_head_children_are_reinserted_into_head() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("head"),
        end("head"),
        start("title"),
        text("t"),
        end("title"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <title>
|       \"t\"
|   <body>
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::AbandonedHeadElementChild));
}

#[test]
fn noscript_without_scripting_parses_as_a_tree() {
    let mut opts = grafter::ParseOpts::default();
    opts.tree_builder.scripting_enabled = false;
    let outcome = parse_tokens_with_opts(
        vec![
            doctype("html"),
            start("noscript"),
            start("p"),
            text("x"),
            eof(),
        ],
        opts,
    );

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|     <noscript>
|   <body>
|     <p>
|       \"x\"
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::DisallowedContentInNoscriptInHead));
}

#[test]
fn comment_after_document_end_goes_to_the_document() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("html"),
        end("html"),
        comment("c"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
| <!-- c -->
"
    );
}

#[test]
fn unacknowledged_self_closing_flag_is_reported() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("body"),
        start_self_closing("div"),
        eof(),
    ]);

    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus));
}

#[test]
fn open_elements_at_eof_are_reported() {
    let outcome = parse_tokens(vec![doctype("html"), start("div"), eof()]);

    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::OpenElementsLeftAfterEof));
}

#[test]
fn second_form_is_ignored_while_a_form_is_open() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("form"),
        start("form"),
        text("x"),
        eof(),
    ]);

    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <form>
|       \"x\"
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::UnexpectedStartTag));
}

#[test]
fn form_end_tag_closes_the_pointer_not_the_subtree() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("form"),
        start("div"),
        end("form"),
        text("x"),
        eof(),
    ]);

    // The <div> is still open, so text keeps flowing into it even though
    // the form element itself is closed.
    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <form>
|       <div>
|         \"x\"
"
    );
    assert!(outcome
        .dom
        .errors
        .borrow()
        .iter()
        .any(|e| e.code == ErrorCode::ClosingOfElementWithOpenChildElements));
}

#[test]
fn nested_anchor_runs_the_adoption_agency() {
    let outcome = parse_tokens(vec![
        doctype("html"),
        start("a"),
        text("1"),
        start("div"),
        start("a"),
        text("2"),
        eof(),
    ]);

    // The second <a> implicitly closes the first; the agency leaves an
    // empty clone of the first <a> inside the <div>, and the second <a>
    // opens after it.
    assert_eq!(
        dump_dom(&outcome.dom),
        "\
| <!DOCTYPE html>
| <html>
|   <head>
|   <body>
|     <a>
|       \"1\"
|     <div>
|       <a>
|       <a>
|         \"2\"
"
    );
}
