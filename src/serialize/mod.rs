// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTML5 serialization, as described in
//! <https://html.spec.whatwg.org/multipage/#serializing-html-fragments>.

use std::io::{self, Write};

pub use markup5ever::serialize::{AttrRef, Serialize, Serializer, TraversalScope};

use markup5ever::{local_name, ns};

use crate::{LocalName, QualName};

/// Options for the HTML serializer.
#[derive(Clone)]
pub struct SerializeOpts {
    /// Is scripting enabled, so that `<noscript>` contents should be
    /// treated as opaque text rather than markup? Default: true
    pub scripting_enabled: bool,

    /// Part of the tree to serialize, relative to the given node. Default:
    /// `TraversalScope::IncludeNode`.
    pub traversal_scope: TraversalScope,

    /// If `true`, the serializer tolerates encountering an end tag that has
    /// no corresponding open start tag in its internal stack (for example,
    /// when serializing a raw token stream rather than a well-formed tree)
    /// by writing the closing tag literally instead of panicking.
    /// Default: false
    pub create_missing_parent: bool,
}

impl Default for SerializeOpts {
    fn default() -> SerializeOpts {
        SerializeOpts {
            scripting_enabled: true,
            traversal_scope: TraversalScope::IncludeNode,
            create_missing_parent: false,
        }
    }
}

/// Serialize an object which implements `Serialize` into a Unicode stream.
pub fn serialize<Wr, T>(writer: Wr, node: &T, opts: SerializeOpts) -> io::Result<()>
where
    Wr: Write,
    T: Serialize,
{
    let traversal_scope = opts.traversal_scope;
    let mut ser = HtmlSerializer::new(writer, opts);
    node.serialize(&mut ser, traversal_scope)
}

struct ElemInfo {
    html_name: Option<LocalName>,
    ignore_children: bool,
    processed_first_child: bool,
}

/// Writer that turns `Serializer` calls into an HTML5-conformant byte stream.
struct HtmlSerializer<Wr: Write> {
    writer: Wr,
    opts: SerializeOpts,
    stack: Vec<ElemInfo>,
}

fn tagname(name: &QualName) -> String {
    match name.prefix {
        // The SVG/MathML tag names that need case preservation are already
        // spelled out verbatim in their local names (see `adjust_svg_tag_name`);
        // the common case across html/svg/mathml content is to use the local
        // name on its own.
        None => name.local.to_string(),
        Some(ref prefix) => format!("{}:{}", prefix, name.local),
    }
}

impl<Wr: Write> HtmlSerializer<Wr> {
    fn new(writer: Wr, opts: SerializeOpts) -> HtmlSerializer<Wr> {
        HtmlSerializer {
            writer,
            opts,
            stack: vec![ElemInfo {
                html_name: None,
                ignore_children: false,
                processed_first_child: false,
            }],
        }
    }

    fn parent(&mut self) -> &mut ElemInfo {
        self.stack.last_mut().expect("no parent ElemInfo")
    }

    fn write_escaped(&mut self, text: &str, attr_mode: bool) -> io::Result<()> {
        for c in text.chars() {
            match c {
                '&' => self.writer.write_all(b"&amp;")?,
                '\u{00A0}' => self.writer.write_all(b"&nbsp;")?,
                '"' if attr_mode => self.writer.write_all(b"&quot;")?,
                '<' if !attr_mode => self.writer.write_all(b"&lt;")?,
                '>' if !attr_mode => self.writer.write_all(b"&gt;")?,
                c => write!(self.writer, "{}", c)?,
            }
        }
        Ok(())
    }
}

impl<Wr: Write> Serializer for HtmlSerializer<Wr> {
    fn start_elem<'a, AttrIter>(&mut self, name: QualName, attrs: AttrIter) -> io::Result<()>
    where
        AttrIter: Iterator<Item = AttrRef<'a>>,
    {
        let html_name = match name.ns {
            ns!(html) => Some(name.local.clone()),
            _ => None,
        };

        if self.parent().ignore_children {
            self.stack.push(ElemInfo {
                html_name,
                ignore_children: true,
                processed_first_child: false,
            });
            return Ok(());
        }

        write!(self.writer, "<{}", tagname(&name))?;
        for (name, value) in attrs {
            write!(self.writer, " {}=\"", tagname(name))?;
            self.write_escaped(value, true)?;
            self.writer.write_all(b"\"")?;
        }
        self.writer.write_all(b">")?;

        let ignore_children = name.ns == ns!(html)
            && matches!(
                name.local,
                local_name!("area")
                    | local_name!("base")
                    | local_name!("basefont")
                    | local_name!("bgsound")
                    | local_name!("br")
                    | local_name!("col")
                    | local_name!("embed")
                    | local_name!("frame")
                    | local_name!("hr")
                    | local_name!("img")
                    | local_name!("input")
                    | local_name!("keygen")
                    | local_name!("link")
                    | local_name!("menuitem")
                    | local_name!("meta")
                    | local_name!("param")
                    | local_name!("source")
                    | local_name!("track")
                    | local_name!("wbr")
            );

        self.parent().processed_first_child = true;

        self.stack.push(ElemInfo {
            html_name,
            ignore_children,
            processed_first_child: false,
        });

        Ok(())
    }

    fn end_elem(&mut self, name: QualName) -> io::Result<()> {
        let info = if self.opts.create_missing_parent && self.stack.len() <= 1 {
            ElemInfo {
                html_name: Some(name.local.clone()),
                ignore_children: false,
                processed_first_child: false,
            }
        } else {
            self.stack.pop().expect("no ElemInfo")
        };
        if info.ignore_children {
            return Ok(());
        }

        write!(self.writer, "</{}>", tagname(&name))
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let prepend_lf = text.starts_with('\n') && {
            let parent = self.parent();
            !parent.processed_first_child
                && matches!(
                    parent.html_name,
                    Some(local_name!("pre")) | Some(local_name!("textarea")) | Some(local_name!("listing"))
                )
        };

        if prepend_lf {
            self.writer.write_all(b"\n")?;
        }

        let escape = match self.parent().html_name {
            Some(local_name!("style"))
            | Some(local_name!("script"))
            | Some(local_name!("xmp"))
            | Some(local_name!("iframe"))
            | Some(local_name!("noembed"))
            | Some(local_name!("noframes"))
            | Some(local_name!("plaintext")) => false,

            Some(local_name!("noscript")) => !self.opts.scripting_enabled,

            _ => true,
        };

        if escape {
            self.write_escaped(text, false)
        } else {
            self.writer.write_all(text.as_bytes())
        }
    }

    fn write_comment(&mut self, text: &str) -> io::Result<()> {
        write!(self.writer, "<!--{}-->", text)
    }

    fn write_doctype(&mut self, name: &str) -> io::Result<()> {
        write!(self.writer, "<!DOCTYPE {}>", name)
    }

    fn write_processing_instruction(&mut self, target: &str, data: &str) -> io::Result<()> {
        write!(self.writer, "<?{} {}>", target, data)
    }
}
