// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Quirks-mode determination for `<!DOCTYPE>` tokens.
//!
//! <https://html.spec.whatwg.org/multipage/#the-initial-insertion-mode>

use crate::interface::{LimitedQuirks, NoQuirks, Quirks, QuirksMode};
use crate::tokenizer::Doctype;

// https://html.spec.whatwg.org/multipage/#the-initial-insertion-mode
// Public identifiers that, taken alone, put the document in quirks mode.
static QUIRKY_PUBLIC_MATCHES: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3d/dtd html 4.0 transitional/en",
    "html",
];

static QUIRKY_SYSTEM_MATCHES: &[&str] =
    &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

static QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

static QUIRKY_PUBLIC_PREFIXES_NO_SYSTEM: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

static LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

static LIMITED_QUIRKY_PUBLIC_PREFIXES_WITH_SYSTEM: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

fn to_ascii_lowercase(x: &str) -> String {
    x.chars().map(|c| c.to_ascii_lowercase()).collect()
}

fn matches_any(needle: Option<&str>, haystack: &[&str]) -> bool {
    match needle {
        Some(s) => {
            let lower = to_ascii_lowercase(s);
            haystack.iter().any(|&m| lower == m)
        },
        None => false,
    }
}

fn starts_with_any(needle: Option<&str>, prefixes: &[&str]) -> bool {
    match needle {
        Some(s) => {
            let lower = to_ascii_lowercase(s);
            prefixes.iter().any(|&p| lower.starts_with(p))
        },
        None => false,
    }
}

/// Checks a `DOCTYPE` token for conformance and determines the document's
/// resulting quirks mode. Returns `(is_parse_error, quirks_mode)`.
pub fn doctype_error_and_quirks(doctype: &Doctype, iframe_srcdoc: bool) -> (bool, QuirksMode) {
    fn opt_as_str(x: &Option<crate::tendril::StrTendril>) -> Option<&str> {
        x.as_ref().map(|t| &**t)
    }

    let name = opt_as_str(&doctype.name);
    let public = opt_as_str(&doctype.public_id);
    let system = opt_as_str(&doctype.system_id);

    let err = match (name, public, system) {
        (Some("html"), None, None) => false,
        (Some("html"), None, Some("about:legacy-compat")) => false,
        (Some("html"), Some("-//W3C//DTD HTML 4.0//EN"), None) => false,
        (
            Some("html"),
            Some("-//W3C//DTD HTML 4.0//EN"),
            Some("http://www.w3.org/TR/REC-html40/strict.dtd"),
        ) => false,
        (Some("html"), Some("-//W3C//DTD HTML 4.01//EN"), None) => false,
        (
            Some("html"),
            Some("-//W3C//DTD HTML 4.01//EN"),
            Some("http://www.w3.org/TR/html4/strict.dtd"),
        ) => false,
        (
            Some("html"),
            Some("-//W3C//DTD XHTML 1.0 Strict//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"),
        ) => false,
        (
            Some("html"),
            Some("-//W3C//DTD XHTML 1.1//EN"),
            Some("http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd"),
        ) => false,
        _ => true,
    };

    if iframe_srcdoc {
        return (err, NoQuirks);
    }

    let quirky = doctype.force_quirks
        || name != Some("html")
        || matches_any(public, QUIRKY_PUBLIC_MATCHES)
        || matches_any(system, QUIRKY_SYSTEM_MATCHES)
        || starts_with_any(public, QUIRKY_PUBLIC_PREFIXES)
        || (system.is_none() && starts_with_any(public, QUIRKY_PUBLIC_PREFIXES_NO_SYSTEM));

    if quirky {
        return (err, Quirks);
    }

    let limited_quirky = starts_with_any(public, LIMITED_QUIRKY_PUBLIC_PREFIXES)
        || (system.is_some() && starts_with_any(public, LIMITED_QUIRKY_PUBLIC_PREFIXES_WITH_SYSTEM));

    if limited_quirky {
        return (err, LimitedQuirks);
    }

    (err, NoQuirks)
}
