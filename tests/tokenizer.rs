// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tokenizer tests built from inline input/expected-token pairs, rather
//! than the html5lib-tests `.test` JSON corpus (not vendored in this
//! workspace) and its `rustc-test`-harness runner.

#[macro_use]
extern crate html5ever;

use std::cell::RefCell;
use std::mem::replace;

use html5ever::tendril::{SliceExt, StrTendril};
use html5ever::tokenizer::{
    BufferQueue, CharacterTokens, CommentToken, DoctypeToken, EndTag, NullCharacterToken,
    StartTag, Tag, TagToken, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::{Attribute, LocalName, QualName};

/// Collects the tokens produced by a run, coalescing adjacent character
/// tokens the way html5lib-tests expects.
struct TokenLogger {
    tokens: RefCell<Vec<Token>>,
    current_str: RefCell<StrTendril>,
}

impl TokenLogger {
    fn new() -> TokenLogger {
        TokenLogger {
            tokens: RefCell::new(vec![]),
            current_str: RefCell::new(StrTendril::new()),
        }
    }

    fn push(&self, token: Token) {
        self.finish_str();
        self.tokens.borrow_mut().push(token);
    }

    fn finish_str(&self) {
        let mut current_str = self.current_str.borrow_mut();
        if !current_str.is_empty() {
            let s = replace(&mut *current_str, StrTendril::new());
            self.tokens.borrow_mut().push(CharacterTokens(s));
        }
    }

    fn into_tokens(self) -> Vec<Token> {
        self.finish_str();
        self.tokens.into_inner()
    }
}

impl TokenSink for TokenLogger {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            CharacterTokens(b) => {
                self.current_str.borrow_mut().push_slice(&b);
            },

            NullCharacterToken => {
                self.current_str.borrow_mut().push_char('\0');
            },

            html5ever::tokenizer::ParseError(_) => (),

            TagToken(mut t) => {
                match t.kind {
                    EndTag => {
                        t.self_closing = false;
                        t.attrs = vec![];
                    },
                    _ => t.attrs.sort_by(|a1, a2| a1.name.cmp(&a2.name)),
                }
                self.push(TagToken(t));
            },

            html5ever::tokenizer::EOFToken => (),

            _ => self.push(token),
        }
        TokenSinkResult::Continue
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    tokenize_with_opts(input, TokenizerOpts::default())
}

fn tokenize_with_opts(input: &str, opts: TokenizerOpts) -> Vec<Token> {
    let sink = TokenLogger::new();
    let tok = Tokenizer::new(sink, opts);
    let buffer = BufferQueue::new();
    buffer.push_back(input.to_tendril());
    let _ = tok.feed(&buffer);
    tok.end();
    tok.sink.into_tokens()
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.to_tendril(),
    }
}

fn start_tag(name: &str, attrs: Vec<Attribute>) -> Token {
    TagToken(Tag {
        kind: StartTag,
        name: LocalName::from(name),
        self_closing: false,
        attrs,
    })
}

fn end_tag(name: &str) -> Token {
    TagToken(Tag {
        kind: EndTag,
        name: LocalName::from(name),
        self_closing: false,
        attrs: vec![],
    })
}

#[test]
fn plain_text_becomes_a_single_character_token() {
    let tokens = tokenize("Hello, world!");
    assert_eq!(tokens, vec![CharacterTokens("Hello, world!".to_tendril())]);
}

#[test]
fn start_and_end_tags_with_an_attribute() {
    let tokens = tokenize("<a href=\"/\">link</a>");
    assert_eq!(
        tokens,
        vec![
            start_tag("a", vec![attr("href", "/")]),
            CharacterTokens("link".to_tendril()),
            end_tag("a"),
        ]
    );
}

#[test]
fn self_closing_tag_sets_the_flag() {
    let tokens = tokenize("<br/>");
    assert_eq!(
        tokens,
        vec![TagToken(Tag {
            kind: StartTag,
            name: LocalName::from("br"),
            self_closing: true,
            attrs: vec![],
        })]
    );
}

#[test]
fn comment_token_carries_its_text() {
    let tokens = tokenize("<!-- hi -->");
    assert_eq!(tokens, vec![CommentToken(" hi ".to_tendril())]);
}

#[test]
fn doctype_token_carries_the_name() {
    let tokens = tokenize("<!DOCTYPE html>");
    match &tokens[..] {
        [DoctypeToken(doctype)] => {
            assert_eq!(doctype.name.as_deref(), Some("html"));
            assert!(!doctype.force_quirks);
        },
        other => panic!("unexpected tokens: {:?}", other),
    }
}

#[test]
fn null_bytes_in_character_data_are_preserved_as_nulls() {
    let tokens = tokenize("a\0b");
    assert_eq!(tokens, vec![CharacterTokens("a\0b".to_tendril())]);
}

#[test]
fn incremental_feeding_in_chunks_matches_feeding_all_at_once() {
    let whole = tokenize("<p>one two three</p>");

    let sink = TokenLogger::new();
    let tok = Tokenizer::new(sink, TokenizerOpts::default());
    let buffer = BufferQueue::new();
    for chunk in ["<p>one ", "two ", "three</p>"] {
        buffer.push_back(chunk.to_tendril());
        let _ = tok.feed(&buffer);
    }
    tok.end();
    let chunked = tok.sink.into_tokens();

    assert_eq!(whole, chunked);
}
