// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Predicates over `ExpandedName` used as "tag sets" by the scope and
//! special-element checks of the tree builder. A tag set is just
//! `Fn(ExpandedName) -> bool`, so scope walks (§4.4) take one as a generic
//! parameter instead of allocating a `Vec` of element types at every call
//! site.
//!
//! `declare_tag_set!` builds one of these predicates from a literal list of
//! HTML local names, or by subtracting some names from an existing set:
//!
//! ```ignore
//! declare_tag_set!(close_list = "li");
//! declare_tag_set!(implied = [cursory_implied_end] - "p");
//! ```

use crate::ExpandedName;
use markup5ever::ns;

macro_rules! declare_tag_set {
    ($name:ident = [$base:ident] - $($x:expr)+) => {
        pub fn $name(p: crate::ExpandedName) -> bool {
            #[allow(unreachable_patterns)]
            match &*p.local {
                $( $x )|+ => false,
                _ => $base(p),
            }
        }
    };
    ($name:ident = $($x:expr)+) => {
        pub fn $name(p: crate::ExpandedName) -> bool {
            *p.ns == ns!(html) && matches!(&*p.local, $( $x )|+)
        }
    };
}

// https://html.spec.whatwg.org/multipage/#has-an-element-in-the-specific-scope
//
// The common boundary types shared by every "in scope" check: html, and the
// handful of elements whose content model makes them natural containment
// walls (tables, templates, object/applet-like embeds) plus the MathML text
// integration points and SVG HTML integration points, which the spec folds
// into the default scope directly rather than relying on the foreign-content
// namespace switch.
pub fn default_scope(p: ExpandedName) -> bool {
    match (&*p.ns, &*p.local) {
        (_, _) if *p.ns == ns!(html) => matches!(
            &*p.local,
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                | "template"
        ),
        (_, _) if *p.ns == ns!(mathml) => {
            matches!(&*p.local, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
        },
        (_, _) if *p.ns == ns!(svg) => matches!(&*p.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

declare_tag_set!(list_item_scope = [default_scope] - "ol" "ul");
declare_tag_set!(button_scope = [default_scope] - "button");

// https://html.spec.whatwg.org/multipage/#has-an-element-in-table-scope
declare_tag_set!(table_scope = "html" "table" "template");

// https://html.spec.whatwg.org/multipage/#has-an-element-in-select-scope
//
// Inverted relative to the other scopes: every element is a boundary except
// optgroup and option, so the walk can only see through a run of those.
pub fn select_scope(p: ExpandedName) -> bool {
    !(*p.ns == ns!(html) && matches!(&*p.local, "optgroup" | "option"))
}

declare_tag_set!(heading_tag = "h1" "h2" "h3" "h4" "h5" "h6");

declare_tag_set!(td_th = "td" "th");

// https://html.spec.whatwg.org/multipage/#generate-implied-end-tags
declare_tag_set!(cursory_implied_end =
    "dd" "dt" "li" "optgroup" "option" "p" "rb" "rp" "rt" "rtc");

// https://html.spec.whatwg.org/multipage/#closing-elements-that-have-implied-end-tags
declare_tag_set!(thorough_implied_end =
    "dd" "dt" "li" "optgroup" "option" "p" "rb" "rp" "rt" "rtc"
    "caption" "colgroup" "tbody" "td" "tfoot" "th" "thead" "tr");

// https://html.spec.whatwg.org/multipage/#parsing-main-inforeigncontent, Table 7.1
pub fn special_tag(p: ExpandedName) -> bool {
    match (&*p.ns, &*p.local) {
        (_, _) if *p.ns == ns!(html) => matches!(
            &*p.local,
            "address" | "applet" | "area" | "article" | "aside" | "base" | "basefont"
                | "bgsound" | "blockquote" | "body" | "br" | "button" | "caption" | "center"
                | "col" | "colgroup" | "dd" | "details" | "dir" | "div" | "dl" | "dt" | "embed"
                | "fieldset" | "figcaption" | "figure" | "footer" | "form" | "frame"
                | "frameset" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "header"
                | "hgroup" | "hr" | "html" | "iframe" | "img" | "input" | "keygen" | "li"
                | "link" | "listing" | "main" | "marquee" | "menu" | "meta" | "nav" | "noembed"
                | "noframes" | "noscript" | "object" | "ol" | "p" | "param" | "plaintext"
                | "pre" | "script" | "section" | "select" | "source" | "style" | "summary"
                | "table" | "tbody" | "td" | "template" | "textarea" | "tfoot" | "th" | "thead"
                | "title" | "tr" | "track" | "ul" | "wbr" | "xmp"
        ),
        (_, _) if *p.ns == ns!(mathml) => {
            matches!(&*p.local, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
        },
        (_, _) if *p.ns == ns!(svg) => matches!(&*p.local, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

/// MathML text integration points: `mi, mo, mn, ms, mtext`, MathML namespace only.
pub fn mathml_text_integration_point(p: ExpandedName) -> bool {
    *p.ns == ns!(mathml) && matches!(&*p.local, "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// SVG HTML integration points: `foreignObject, desc, title`, SVG namespace only.
///
/// `annotation-xml` is also an integration point under certain attribute
/// conditions; that case is namespace-crossing and checked separately via
/// `TreeSink::is_mathml_annotation_xml_integration_point`.
pub fn svg_html_integration_point(p: ExpandedName) -> bool {
    *p.ns == ns!(svg) && matches!(&*p.local, "foreignObject" | "desc" | "title")
}
