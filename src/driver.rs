// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The high-level entry points used to drive a parse: [`parse_document`] and
//! [`parse_fragment`]. Both return a [`Parser`], which implements
//! `tendril::TendrilSink` so it can be fed input incrementally (`process`)
//! or all at once (`one`), and consumed from a `Read` via `.from_utf8().read_from(..)`.

use std::borrow::Cow;

use crate::tendril;
use crate::tendril::stream::{TendrilSink, Utf8LossyDecoder};
use crate::tendril::StrTendril;

use crate::buffer_queue::BufferQueue;
use crate::tokenizer::{Tokenizer, TokenizerOpts};
use crate::tree_builder::{TreeBuilder, TreeBuilderOpts, TreeSink};
use crate::{Attribute, QualName};

/// All-encompassing parser setting structure.
#[derive(Clone, Default)]
pub struct ParseOpts {
    /// Tokenizer options.
    pub tokenizer: TokenizerOpts,
    /// Tree builder options.
    pub tree_builder: TreeBuilderOpts,
}

/// Parse an HTML document into a `TreeSink`.
///
/// ## Example
///
/// ```ignore
/// use html5ever::driver::{parse_document, ParseOpts};
/// use html5ever::tendril::TendrilSink;
/// use markup5ever_rcdom::RcDom;
///
/// let dom = parse_document(RcDom::default(), ParseOpts::default())
///     .from_utf8()
///     .read_from(&mut stdin.lock())
///     .unwrap();
/// ```
pub fn parse_document<Sink>(sink: Sink, opts: ParseOpts) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let tb = TreeBuilder::new(sink, opts.tree_builder);
    let tok = Tokenizer::new(tb, opts.tokenizer);
    Parser {
        tokenizer: tok,
        input_buffer: BufferQueue::new(),
    }
}

/// Parse an HTML fragment into a `TreeSink`, using the given element as
/// the fragment parsing algorithm's context element.
///
/// See <https://html.spec.whatwg.org/multipage/#parsing-html-fragments>.
pub fn parse_fragment<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_name: QualName,
    context_attrs: Vec<Attribute>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let context_elem = sink.create_element(context_name, context_attrs, Default::default());
    parse_fragment_for_element(sink, opts, context_elem, None)
}

/// Like `parse_fragment`, but with a context element that has already been
/// created by the sink (and, optionally, a form owner for form-associated
/// elements inside the fragment).
pub fn parse_fragment_for_element<Sink>(
    sink: Sink,
    opts: ParseOpts,
    context_elem: Sink::Handle,
    form_elem: Option<Sink::Handle>,
) -> Parser<Sink>
where
    Sink: TreeSink,
{
    let scripting_enabled = opts.tree_builder.scripting_enabled;
    let tb = TreeBuilder::new_for_fragment(sink, context_elem, form_elem, opts.tree_builder);

    let mut tok_opts = opts.tokenizer;
    tok_opts.initial_state = Some(tb.tokenizer_state_for_context_elem(scripting_enabled));

    let tok = Tokenizer::new(tb, tok_opts);
    Parser {
        tokenizer: tok,
        input_buffer: BufferQueue::new(),
    }
}

/// An HTML parser, ready to receive Unicode input through the
/// `tendril::TendrilSink` trait's methods.
pub struct Parser<Sink>
where
    Sink: TreeSink,
{
    /// Tokenizer used by this parser.
    pub tokenizer: Tokenizer<TreeBuilder<Sink::Handle, Sink>>,
    /// Input buffer shared with the tokenizer.
    pub input_buffer: BufferQueue,
}

impl<Sink: TreeSink> TendrilSink<tendril::fmt::UTF8> for Parser<Sink> {
    type Output = Sink::Output;

    fn process(&mut self, t: StrTendril) {
        self.input_buffer.push_back(t);
        self.tokenizer.feed(&self.input_buffer);
    }

    // FIXME: is it too noisy to report every character decoding error?
    fn error(&mut self, desc: Cow<'static, str>) {
        self.tokenizer.sink.sink.parse_error(desc)
    }

    fn finish(self) -> Self::Output {
        self.tokenizer.end();
        self.tokenizer.sink.sink.finish()
    }
}

impl<Sink: TreeSink> Parser<Sink> {
    /// Wrap this parser into a `TendrilSink` that accepts UTF-8 bytes.
    ///
    /// Use this when the input is bytes known to be valid UTF-8 (decoding is
    /// lossy, like `String::from_utf8_lossy`).
    pub fn from_utf8(self) -> Utf8LossyDecoder<Self> {
        Utf8LossyDecoder::new(self)
    }
}
