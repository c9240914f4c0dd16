// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The six concrete input -> tree scenarios, each checked against the
//! `rcdom` reference sink and the parser's reported error count.

#[macro_use]
extern crate html5ever;

use std::iter::repeat;

use html5ever::rcdom::{Handle, NodeEnum, RcDom};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};

fn serialize(buf: &mut String, indent: usize, handle: &Handle) {
    buf.push('|');
    buf.push_str(&repeat(' ').take(indent).collect::<String>());

    match &handle.node {
        NodeEnum::Document => panic!("should not reach Document"),

        NodeEnum::Doctype(name, public_id, system_id) => {
            buf.push_str("<!DOCTYPE ");
            buf.push_str(name);
            if !public_id.is_empty() || !system_id.is_empty() {
                buf.push_str(&format!(" \"{}\" \"{}\"", public_id, system_id));
            }
            buf.push('>');
        },

        NodeEnum::Text(contents) => {
            buf.push('"');
            buf.push_str(&contents.borrow());
            buf.push('"');
        },

        NodeEnum::Comment(contents) => {
            buf.push_str("<!-- ");
            buf.push_str(contents);
            buf.push_str(" -->");
        },

        NodeEnum::Element(name, _, attrs) => {
            buf.push('<');
            match name.ns {
                ns!(svg) => buf.push_str("svg "),
                ns!(mathml) => buf.push_str("math "),
                _ => (),
            }
            buf.push_str(&*name.local);
            buf.push('>');

            let mut attrs = attrs.borrow().clone();
            attrs.sort_by(|x, y| x.name.local.cmp(&y.name.local));
            for attr in attrs.into_iter() {
                buf.push('\n');
                buf.push('|');
                buf.push_str(&repeat(' ').take(indent + 2).collect::<String>());
                match attr.name.ns {
                    ns!(xlink) => buf.push_str("xlink "),
                    ns!(xml) => buf.push_str("xml "),
                    ns!(xmlns) => buf.push_str("xmlns "),
                    _ => (),
                }
                buf.push_str(&format!("{}=\"{}\"", attr.name.local, attr.value));
            }
        },

        NodeEnum::PI(..) => unreachable!("no processing instructions in HTML"),
    }

    for child in handle.children.borrow().iter() {
        buf.push('\n');
        serialize(buf, indent + 2, child);
    }
}

/// Parses `html` as a full document and returns (tree dump, parse error count).
fn tree_of(html: &str) -> (String, usize) {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut buf = String::new();
    for (i, child) in dom.document.children.borrow().iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        serialize(&mut buf, 0, child);
    }
    (buf, dom.errors.borrow().len())
}

#[test]
fn bare_doctype_yields_an_empty_html_document_with_no_errors() {
    let (tree, errors) = tree_of("<!doctype html>");
    assert_eq!(
        tree,
        "|<!DOCTYPE html>\n\
         |<html>\n\
         |  <head>\n\
         |  <body>"
    );
    assert_eq!(errors, 0);
}

#[test]
fn noscript_in_head_is_parsed_as_raw_text_with_one_parse_error() {
    // `<noscript>` in the head is treated as a rawtext element per the
    // insertion mode for scripting-disabled parsing; the trailing text
    // after </head> closes head implicitly, which is the one parse error.
    let (tree, errors) =
        tree_of("<!doctype html><html><head><noscript> x</noscript></head></html>");
    assert_eq!(
        tree,
        "|<!DOCTYPE html>\n\
         |<html>\n\
         |  <head>\n\
         |    <noscript>\n\
         |      \" \"\n\
         |  <body>\n\
         |    \"x\""
    );
    assert_eq!(errors, 1);
}

#[test]
fn mismatched_formatting_elements_trigger_the_adoption_agency() {
    // <i> opened, then <b> opened inside it; </i> closes while <b> is
    // still open, so the adoption agency algorithm relocates a clone of
    // <b> to be a sibling of <i> and parents the rest of the content
    // under it. The misnested </i> is the one parse error.
    let (tree, errors) = tree_of("1<i>2<b>3</i>4</b>5");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    \"1\"\n\
         |    <i>\n\
         |      \"2\"\n\
         |      <b>\n\
         |        \"3\"\n\
         |    <b>\n\
         |      \"4\"\n\
         |    \"5\""
    );
    assert_eq!(errors, 1);
}

#[test]
fn svg_subtree_stays_in_the_svg_namespace_with_no_errors() {
    let (tree, errors) = tree_of("<svg><g><path/></g></svg>");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    <svg svg>\n\
         |      <svg g>\n\
         |        <svg path>"
    );
    assert_eq!(errors, 0);
}

#[test]
fn end_tag_br_is_treated_as_a_start_tag_with_one_parse_error() {
    // An end tag named "br" is non-conforming; the tree builder reports
    // the error and acts as if a start tag had been seen instead.
    let (tree, errors) = tree_of("1</br>2");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    \"1\"\n\
         |    <br>\n\
         |    \"2\""
    );
    assert_eq!(errors, 1);
}

#[test]
fn doctype_with_public_and_system_ids_round_trips_both_and_reports_one_error() {
    // Adjacent quoted identifiers with no intervening whitespace are a
    // parse error, but the public/system ids are still captured verbatim.
    let (tree, errors) = tree_of("<!DOCTYPE html PUBLIC 'foo''bar'>");
    assert_eq!(
        tree,
        "|<!DOCTYPE html \"foo\" \"bar\">\n\
         |<html>\n\
         |  <head>\n\
         |  <body>"
    );
    assert_eq!(errors, 1);
}
