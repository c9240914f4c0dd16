// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tree-construction tests driven straight off the `rcdom` reference sink,
//! rather than the html5lib-tests `.dat` corpus (not vendored in this
//! workspace) and its `rustc-test`-harness runner.

#[macro_use]
extern crate html5ever;

use std::iter::repeat;

use html5ever::rcdom::{Handle, NodeEnum, RcDom};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, parse_fragment, LocalName, ParseOpts, QualName};

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

fn fragment_tree_of(context: &str, html: &str) -> (String, usize) {
    let context = QualName::new(None, ns!(html), LocalName::from(context));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![]).one(html);
    let mut buf = String::new();
    // The fragment case parents everything under a synthetic <html>; walk
    // its children, matching the convention html5lib-tests itself uses.
    let root = &dom.document.children.borrow()[0];
    for (i, child) in root.children.borrow().iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        serialize(&mut buf, 0, child);
    }
    (buf, dom.errors.borrow().len())
}

#[test]
fn p_implicitly_closes_p() {
    let (tree, _) = tree_of("<p>one<p>two");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    <p>\n\
         |      \"one\"\n\
         |    <p>\n\
         |      \"two\""
    );
}

#[test]
fn li_start_tag_closes_an_open_li_through_an_intervening_div() {
    // The li-closing algorithm walks past `div` (one of its three named
    // exceptions) to find and close the outer `<li>`, taking the `div`
    // down with it -- the second `<li>` ends up a sibling of the first,
    // not nested inside the `div`.
    let (tree, _) = tree_of("<ul><li>a<div><li>b</ul>");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    <ul>\n\
         |      <li>\n\
         |        \"a\"\n\
         |        <div>\n\
         |      <li>\n\
         |        \"b\""
    );
}

#[test]
fn table_text_is_foster_parented_out_of_the_table() {
    // "x" is character data directly inside <table>, so it is foster
    // parented to just before the table; "y" lands inside <td> normally;
    // "z" arrives after the table is closed and lands after it in <body>.
    // Implied <tbody>/<tr> structure is inserted for the bare <tr>/<td>.
    let (tree, _) = tree_of("<table>x<tr><td>y</table>z");
    assert_eq!(
        tree,
        "|<html>\n\
         |  <head>\n\
         |  <body>\n\
         |    \"x\"\n\
         |    <table>\n\
         |      <tbody>\n\
         |        <tr>\n\
         |          <td>\n\
         |            \"y\"\n\
         |    \"z\""
    );
}

#[test]
fn fragment_parsing_keeps_siblings_under_the_synthetic_root() {
    let (tree, errors) = fragment_tree_of("div", "<b>bold</b> not bold");
    assert_eq!(
        tree,
        "|<b>\n\
         |  \"bold\"\n\
         |\" not bold\""
    );
    assert_eq!(errors, 0);
}
