// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The tree builder rules, as a single, enormous nested match expression.

use crate::interface::Quirks;
use crate::tokenizer::states::{Rawtext, Rcdata, ScriptData};
use crate::tokenizer::TagKind::{EndTag, StartTag};
use crate::tree_builder::tag_sets::*;
use crate::tree_builder::types::*;
use crate::tree_builder::{
    create_element, html_elem, ElemName, NodeOrText::AppendNode, StrTendril, Tag, TreeBuilder,
    TreeSink,
};
use crate::QualName;
use markup5ever::{expanded_name, local_name, ns};
use std::borrow::Cow::Borrowed;

use crate::tendril::SliceExt;

fn any_not_whitespace(x: &StrTendril) -> bool {
    // FIXME: this might be much faster as a byte scan
    x.chars().any(|c| !c.is_ascii_whitespace())
}

fn current_node<Handle>(open_elems: &[Handle]) -> &Handle {
    open_elems.last().expect("no current element")
}

#[doc(hidden)]
impl<Handle, Sink> TreeBuilder<Handle, Sink>
where
    Handle: Clone,
    Sink: TreeSink<Handle = Handle>,
{
    pub(crate) fn step(&self, mode: InsertionMode, token: Token) -> ProcessResult<Handle> {
        self.debug_step(mode, &token);

        match mode {
            //§ the-initial-insertion-mode
            InsertionMode::Initial => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                Token::Comment(text) => self.append_comment_to_doc(text),
                token => {
                    if !self.opts.iframe_srcdoc {
                        self.unexpected(&token);
                        self.set_quirks_mode(Quirks);
                    }
                    ProcessResult::Reprocess(InsertionMode::BeforeHtml, token)
                },
            },

            //§ the-before-html-insertion-mode
            InsertionMode::BeforeHtml => {
                let default = |token: Token| {
                    self.create_root(vec![]);
                    ProcessResult::Reprocess(InsertionMode::BeforeHead, token)
                };
                match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        ProcessResult::SplitWhitespace(text)
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                    Token::Comment(text) => self.append_comment_to_doc(text),

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                        self.create_root(tag.attrs);
                        self.mode.set(InsertionMode::BeforeHead);
                        ProcessResult::Done
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("head"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("br"), .. }) => {
                        default(token)
                    },

                    Token::Tag(tag @ Tag { kind: EndTag, .. }) => self.unexpected(&tag),

                    token => default(token),
                }
            },

            //§ the-before-head-insertion-mode
            InsertionMode::BeforeHead => {
                let default = |token: Token| {
                    *self.head_elem.borrow_mut() = Some(self.insert_phantom(local_name!("head")));
                    ProcessResult::Reprocess(InsertionMode::InHead, token)
                };
                match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        ProcessResult::SplitWhitespace(text)
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => ProcessResult::Done,
                    Token::Comment(text) => self.append_comment(text),

                    Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                        self.step(InsertionMode::InBody, token)
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("head"), .. }) => {
                        *self.head_elem.borrow_mut() = Some(self.insert_element_for(tag));
                        self.mode.set(InsertionMode::InHead);
                        ProcessResult::Done
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("head"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("br"), .. }) => {
                        default(token)
                    },

                    Token::Tag(tag @ Tag { kind: EndTag, .. }) => self.unexpected(&tag),

                    token => default(token),
                }
            },

            //§ parsing-main-inhead
            // https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead
            InsertionMode::InHead => {
                let default = |token: Token| {
                    self.pop();
                    ProcessResult::Reprocess(InsertionMode::AfterHead, token)
                };
                match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        ProcessResult::SplitWhitespace(text)
                    },
                    Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                    Token::Comment(text) => self.append_comment(text),

                    Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                        self.step(InsertionMode::InBody, token)
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("base"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("basefont"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("bgsound"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("link"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("meta"), .. }) => {
                        // FIXME: handle <meta charset=...> and <meta http-equiv="Content-Type">
                        self.insert_and_pop_element_for(tag);
                        ProcessResult::DoneAckSelfClosing
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("title"), .. }) => {
                        self.parse_raw_data(tag, Rcdata)
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("noframes"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("style"), .. })
                    | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("noscript"), .. }) => {
                        if (!self.opts.scripting_enabled) && (tag.name == local_name!("noscript")) {
                            self.insert_element_for(tag);
                            self.mode.set(InsertionMode::InHeadNoscript);
                            ProcessResult::Done
                        } else {
                            self.parse_raw_data(tag, Rawtext)
                        }
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("script"), .. }) => {
                        let elem = create_element(
                            &self.sink,
                            QualName::new(None, ns!(html), local_name!("script")),
                            tag.attrs,
                        );
                        if self.is_fragment() {
                            self.sink.mark_script_already_started(&elem);
                        }
                        self.insert_appropriately(AppendNode(elem.clone()), None);
                        self.open_elems.borrow_mut().push(elem);
                        self.to_raw_text_mode(ScriptData)
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("head"), .. }) => {
                        self.pop();
                        self.mode.set(InsertionMode::AfterHead);
                        ProcessResult::Done
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("br"), .. }) => {
                        default(token)
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("template"), .. }) => {
                        self.active_formatting.borrow_mut().push(FormatEntry::Marker);
                        self.frameset_ok.set(false);
                        self.mode.set(InsertionMode::InTemplate);
                        self.template_modes.borrow_mut().push(InsertionMode::InTemplate);
                        self.insert_element_for(tag);
                        ProcessResult::Done
                    },

                    Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                        if !self.in_html_elem_named(local_name!("template")) {
                            self.unexpected(&tag);
                        } else {
                            self.generate_implied_end_tags(thorough_implied_end);
                            self.expect_to_close(local_name!("template"));
                            self.clear_active_formatting_to_marker();
                            self.template_modes.borrow_mut().pop();
                            self.mode.set(self.reset_insertion_mode());
                        }
                        ProcessResult::Done
                    },

                    Token::Tag(Tag { kind: StartTag, name: local_name!("head"), .. }) => {
                        self.unexpected(&token)
                    },
                    Token::Tag(tag @ Tag { kind: EndTag, .. }) => self.unexpected(&tag),

                    token => default(token),
                }
            },

            //§ parsing-main-inheadnoscript
            InsertionMode::InHeadNoscript => {
                let default = |token: Token| {
                    self.unexpected(&token);
                    self.pop();
                    ProcessResult::Reprocess(InsertionMode::InHead, token)
                };
                match token {
                    Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                        self.step(InsertionMode::InBody, token)
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("noscript"), .. }) => {
                        self.pop();
                        self.mode.set(InsertionMode::InHead);
                        ProcessResult::Done
                    },

                    Token::Characters(SplitStatus::NotSplit, text) => {
                        ProcessResult::SplitWhitespace(text)
                    },
                    Token::Characters(SplitStatus::Whitespace, _) => {
                        self.step(InsertionMode::InHead, token)
                    },

                    Token::Comment(_) => self.step(InsertionMode::InHead, token),

                    Token::Tag(Tag { kind: StartTag, name: local_name!("basefont"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("bgsound"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("link"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("meta"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("style"), .. }) => {
                        self.step(InsertionMode::InHead, token)
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("br"), .. }) => default(token),

                    Token::Tag(Tag { kind: StartTag, name: local_name!("head"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("noscript"), .. }) => {
                        self.unexpected(&token)
                    },
                    Token::Tag(tag @ Tag { kind: EndTag, .. }) => self.unexpected(&tag),

                    token => default(token),
                }
            },

            //§ the-after-head-insertion-mode
            InsertionMode::AfterHead => {
                let default = |token: Token| {
                    self.insert_phantom(local_name!("body"));
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                };
                match token {
                    Token::Characters(SplitStatus::NotSplit, text) => {
                        ProcessResult::SplitWhitespace(text)
                    },
                    Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                    Token::Comment(text) => self.append_comment(text),

                    Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                        self.step(InsertionMode::InBody, token)
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("body"), .. }) => {
                        self.insert_element_for(tag);
                        self.frameset_ok.set(false);
                        self.mode.set(InsertionMode::InBody);
                        ProcessResult::Done
                    },

                    Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("frameset"), .. }) => {
                        self.insert_element_for(tag);
                        self.mode.set(InsertionMode::InFrameset);
                        ProcessResult::Done
                    },

                    Token::Tag(Tag { kind: StartTag, name: local_name!("base"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("basefont"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("bgsound"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("link"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("meta"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("script"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("style"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                    | Token::Tag(Tag { kind: StartTag, name: local_name!("title"), .. }) => {
                        self.unexpected(&token);
                        let head = self
                            .head_elem
                            .borrow()
                            .as_ref()
                            .expect("no head element")
                            .clone();
                        self.push(&head);
                        let result = self.step(InsertionMode::InHead, token);
                        self.remove_from_stack(&head);
                        result
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                        self.step(InsertionMode::InHead, token)
                    },

                    Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                    | Token::Tag(Tag { kind: EndTag, name: local_name!("br"), .. }) => {
                        default(token)
                    },

                    Token::Tag(Tag { kind: StartTag, name: local_name!("head"), .. }) => {
                        self.unexpected(&token)
                    },
                    Token::Tag(tag @ Tag { kind: EndTag, .. }) => self.unexpected(&tag),

                    token => default(token),
                }
            },

            //§ parsing-main-inbody
            InsertionMode::InBody => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(_, text) => {
                    self.reconstruct_active_formatting_elements();
                    if any_not_whitespace(&text) {
                        self.frameset_ok.set(false);
                    }
                    self.append_text(text)
                },

                Token::Comment(text) => self.append_comment(text),

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.unexpected(&tag);
                    if !self.in_html_elem_named(local_name!("template")) {
                        let open_elems = self.open_elems.borrow();
                        let top = html_elem(&open_elems);
                        self.sink.add_attrs_if_missing(top, tag.attrs);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("base"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("basefont"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("bgsound"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("link"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("meta"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("script"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("style"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("title"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("body"), .. }) => {
                    self.unexpected(&tag);
                    let body_elem = self.body_elem().as_deref().cloned();
                    match body_elem {
                        Some(ref node)
                            if self.open_elems.borrow().len() != 1
                                && !self.in_html_elem_named(local_name!("template")) =>
                        {
                            self.frameset_ok.set(false);
                            self.sink.add_attrs_if_missing(node, tag.attrs)
                        },
                        _ => {},
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("frameset"), .. }) => {
                    self.unexpected(&tag);
                    if !self.frameset_ok.get() {
                        return ProcessResult::Done;
                    }

                    let Some(body) = self.body_elem().map(|b| b.clone()) else {
                        return ProcessResult::Done;
                    };
                    self.sink.remove_from_parent(&body);

                    // FIXME: can we get here in the fragment case?
                    // What to do with the first element then?
                    self.open_elems.borrow_mut().truncate(1);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InFrameset);
                    ProcessResult::Done
                },

                Token::Eof => {
                    if !self.template_modes.borrow().is_empty() {
                        self.step(InsertionMode::InTemplate, token)
                    } else {
                        self.check_body_end();
                        self.stop_parsing()
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. }) => {
                    if self.in_scope_named(default_scope, local_name!("body")) {
                        self.check_body_end();
                        self.mode.set(InsertionMode::AfterBody);
                    } else {
                        self.sink
                            .parse_error(Borrowed("</body> with no <body> in scope"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. }) => {
                    if self.in_scope_named(default_scope, local_name!("body")) {
                        self.check_body_end();
                        ProcessResult::Reprocess(InsertionMode::AfterBody, token)
                    } else {
                        self.sink
                            .parse_error(Borrowed("</html> with no <body> in scope"));
                        ProcessResult::Done
                    }
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("address"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("article"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("aside"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("blockquote"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("center"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("details"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dialog"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dir"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("div"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dl"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("fieldset"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("figcaption"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("figure"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("footer"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("header"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("hgroup"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("main"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("nav"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("ol"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("p"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("search"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("section"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("summary"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("ul"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("menu"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h1"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h2"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h3"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h4"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h5"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h6"), .. }) => {
                    self.close_p_element_in_button_scope();
                    if self.current_node_in(heading_tag) {
                        self.sink.parse_error(Borrowed("nested heading tags"));
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("pre"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("listing"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    self.ignore_lf.set(true);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("form"), .. }) => {
                    if self.form_elem.borrow().is_some()
                        && !self.in_html_elem_named(local_name!("template"))
                    {
                        self.sink.parse_error(Borrowed("nested forms"));
                    } else {
                        self.close_p_element_in_button_scope();
                        let elem = self.insert_element_for(tag);
                        if !self.in_html_elem_named(local_name!("template")) {
                            *self.form_elem.borrow_mut() = Some(elem);
                        }
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("li"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dd"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dt"), .. }) => {
                    declare_tag_set!(close_list = "li");
                    declare_tag_set!(close_defn = "dd" "dt");
                    declare_tag_set!(extra_special = [special_tag] - "address" "div" "p");
                    let list = match tag.name {
                        local_name!("li") => true,
                        local_name!("dd") | local_name!("dt") => false,
                        _ => unreachable!(),
                    };

                    self.frameset_ok.set(false);

                    let mut to_close = None;
                    for node in self.open_elems.borrow().iter().rev() {
                        let elem_name = self.sink.elem_name(node);
                        let name = elem_name.expanded();
                        let can_close = if list {
                            close_list(name)
                        } else {
                            close_defn(name)
                        };
                        if can_close {
                            to_close = Some(name.local.clone());
                            break;
                        }
                        if extra_special(name) {
                            break;
                        }
                    }

                    if let Some(name) = to_close {
                        self.generate_implied_end_except(name.clone());
                        self.expect_to_close(name);
                    }

                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("plaintext"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.insert_element_for(tag);
                    ProcessResult::ToPlaintext
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("button"), .. }) => {
                    if self.in_scope_named(default_scope, local_name!("button")) {
                        self.sink.parse_error(Borrowed("nested buttons"));
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.pop_until_named(local_name!("button"));
                    }
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("address"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("article"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("aside"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("blockquote"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("button"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("center"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("details"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("dialog"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("dir"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("div"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("dl"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("fieldset"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("figcaption"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("figure"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("footer"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("header"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("hgroup"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("listing"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("main"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("menu"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("nav"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("ol"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("pre"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("search"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("section"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("summary"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("ul"), .. }) => {
                    if !self.in_scope_named(default_scope, tag.name.clone()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("form"), .. }) => {
                    if !self.in_html_elem_named(local_name!("template")) {
                        let Some(node) = self.form_elem.take() else {
                            self.sink.parse_error(Borrowed(
                                "Null form element pointer on </form>",
                            ));
                            return ProcessResult::Done;
                        };
                        if !self.in_scope(default_scope, |n| self.sink.same_node(&node, &n)) {
                            self.sink.parse_error(Borrowed(
                                "Form element not in scope on </form>",
                            ));
                            return ProcessResult::Done;
                        }
                        self.generate_implied_end_tags(cursory_implied_end);
                        let current = self.current_node().clone();
                        self.remove_from_stack(&node);
                        if !self.sink.same_node(&current, &node) {
                            self.sink.parse_error(Borrowed("Bad open element on </form>"));
                        }
                    } else {
                        if !self.in_scope_named(default_scope, local_name!("form")) {
                            self.sink.parse_error(Borrowed(
                                "Form element not in scope on </form>",
                            ));
                            return ProcessResult::Done;
                        }
                        self.generate_implied_end_tags(cursory_implied_end);
                        if !self.current_node_named(local_name!("form")) {
                            self.sink.parse_error(Borrowed("Bad open element on </form>"));
                        }
                        self.pop_until_named(local_name!("form"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("p"), .. }) => {
                    if !self.in_scope_named(button_scope, local_name!("p")) {
                        self.sink.parse_error(Borrowed("No <p> tag to close"));
                        self.insert_phantom(local_name!("p"));
                    }
                    self.close_p_element();
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("li"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("dd"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("dt"), .. }) => {
                    let in_scope = if tag.name == local_name!("li") {
                        self.in_scope_named(list_item_scope, tag.name.clone())
                    } else {
                        self.in_scope_named(default_scope, tag.name.clone())
                    };
                    if in_scope {
                        self.generate_implied_end_except(tag.name.clone());
                        self.expect_to_close(tag.name);
                    } else {
                        self.sink.parse_error(Borrowed("No matching tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h1"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h2"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h3"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h4"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h5"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("h6"), .. }) => {
                    if self.in_scope(default_scope, |n| self.elem_in(&n, heading_tag)) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        if !self.current_node_named(tag.name) {
                            self.sink.parse_error(Borrowed("Closing wrong heading tag"));
                        }
                        self.pop_until(heading_tag);
                    } else {
                        self.sink.parse_error(Borrowed("No heading tag to close"));
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("a"), .. }) => {
                    self.handle_misnested_a_tags(&tag);
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("b"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("big"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("code"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("em"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("font"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("i"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("s"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("small"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("strike"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("strong"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tt"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("u"), .. }) => {
                    self.reconstruct_active_formatting_elements();
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("nobr"), .. }) => {
                    self.reconstruct_active_formatting_elements();
                    if self.in_scope_named(default_scope, local_name!("nobr")) {
                        self.sink.parse_error(Borrowed("Nested <nobr>"));
                        self.adoption_agency(local_name!("nobr"));
                        self.reconstruct_active_formatting_elements();
                    }
                    self.create_formatting_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("a"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("b"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("big"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("code"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("em"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("font"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("i"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("nobr"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("s"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("small"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("strike"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("strong"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tt"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("u"), .. }) => {
                    self.adoption_agency(tag.name);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("applet"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("marquee"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("object"), .. }) => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.active_formatting.borrow_mut().push(FormatEntry::Marker);
                    self.frameset_ok.set(false);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("applet"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("marquee"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("object"), .. }) => {
                    if !self.in_scope_named(default_scope, tag.name.clone()) {
                        self.unexpected(&tag);
                    } else {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                        self.clear_active_formatting_to_marker();
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("table"), .. }) => {
                    if self.quirks_mode.get() != Quirks {
                        self.close_p_element_in_button_scope();
                    }
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    self.mode.set(InsertionMode::InTable);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("br"), .. }) => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            kind: StartTag,
                            attrs: vec![],
                            ..tag
                        }),
                    )
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("area"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("br"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("embed"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("img"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("keygen"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("wbr"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("input"), .. }) => {
                    let keep_frameset_ok = match tag.name {
                        local_name!("input") => self.is_type_hidden(&tag),
                        _ => false,
                    };
                    self.reconstruct_active_formatting_elements();
                    self.insert_and_pop_element_for(tag);
                    if !keep_frameset_ok {
                        self.frameset_ok.set(false);
                    }
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("param"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("source"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("track"), .. }) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("hr"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.insert_and_pop_element_for(tag);
                    self.frameset_ok.set(false);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("image"), .. }) => {
                    self.unexpected(&tag);
                    self.step(
                        InsertionMode::InBody,
                        Token::Tag(Tag {
                            name: local_name!("img"),
                            ..tag
                        }),
                    )
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("textarea"), .. }) => {
                    self.ignore_lf.set(true);
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rcdata)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("xmp"), .. }) => {
                    self.close_p_element_in_button_scope();
                    self.reconstruct_active_formatting_elements();
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rawtext)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("iframe"), .. }) => {
                    self.frameset_ok.set(false);
                    self.parse_raw_data(tag, Rawtext)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("noembed"), .. }) => {
                    self.parse_raw_data(tag, Rawtext)
                },

                // <noscript> handled in wildcard case below
                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("select"), .. }) => {
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    self.frameset_ok.set(false);
                    // NB: mode == InBody but possibly self.mode != mode, if
                    // we're processing "as in the rules for InBody".
                    self.mode.set(match self.mode.get() {
                        InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell => InsertionMode::InSelectInTable,
                        _ => InsertionMode::InSelect,
                    });
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("optgroup"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("option"), .. }) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    self.reconstruct_active_formatting_elements();
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("rb"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("rtc"), .. }) => {
                    if self.in_scope_named(default_scope, local_name!("ruby")) {
                        self.generate_implied_end_tags(cursory_implied_end);
                    }
                    if !self.current_node_named(local_name!("ruby")) {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("rp"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("rt"), .. }) => {
                    if self.in_scope_named(default_scope, local_name!("ruby")) {
                        self.generate_implied_end_except(local_name!("rtc"));
                    }
                    if !self.current_node_named(local_name!("rtc"))
                        && !self.current_node_named(local_name!("ruby"))
                    {
                        self.unexpected(&tag);
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("math"), .. }) => {
                    self.enter_foreign(tag, ns!(mathml))
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("svg"), .. }) => {
                    self.enter_foreign(tag, ns!(svg))
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("frame"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("head"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. }) => {
                    self.unexpected(&token);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, .. }) => {
                    if self.opts.scripting_enabled && tag.name == local_name!("noscript") {
                        self.parse_raw_data(tag, Rawtext)
                    } else {
                        self.reconstruct_active_formatting_elements();
                        self.insert_element_for(tag);
                        ProcessResult::Done
                    }
                },

                Token::Tag(tag @ Tag { kind: EndTag, .. }) => {
                    self.process_end_tag_in_body(tag);
                    ProcessResult::Done
                },

                // FIXME: This should be unreachable, but earlier arms are not
                // provably exhaustive to the compiler.
                _ => panic!("impossible case in InBody mode"),
            },

            //§ parsing-main-incdata
            InsertionMode::Text => match token {
                Token::Characters(_, text) => self.append_text(text),

                Token::Eof => {
                    self.unexpected(&token);
                    if self.current_node_named(local_name!("script")) {
                        let open_elems = self.open_elems.borrow();
                        let current = current_node(&open_elems);
                        self.sink.mark_script_already_started(current);
                    }
                    self.pop();
                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },

                Token::Tag(tag @ Tag { kind: EndTag, .. }) => {
                    let node = self.pop();
                    self.mode.set(self.orig_mode.take().unwrap());
                    if tag.name == local_name!("script") {
                        return ProcessResult::Script(node);
                    }
                    ProcessResult::Done
                },

                // The spec doesn't say what to do here.
                // Other tokens are impossible?
                _ => panic!("impossible case in Text mode"),
            },

            //§ parsing-main-intable
            InsertionMode::InTable => match token {
                Token::NullCharacter => self.process_chars_in_table(token),

                Token::Characters(..) => self.process_chars_in_table(token),

                Token::Comment(text) => self.append_comment(text),

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("caption"), .. }) => {
                    self.pop_until_current(table_scope);
                    self.active_formatting.borrow_mut().push(FormatEntry::Marker);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCaption);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("colgroup"), .. }) => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InColumnGroup);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. }) => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom(local_name!("colgroup"));
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("thead"), .. }) => {
                    self.pop_until_current(table_scope);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InTableBody);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. }) => {
                    self.pop_until_current(table_scope);
                    self.insert_phantom(local_name!("tbody"));
                    ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("table"), .. }) => {
                    self.unexpected(&token);
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    } else {
                        ProcessResult::Done
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("table"), .. }) => {
                    if self.in_scope_named(table_scope, local_name!("table")) {
                        self.pop_until_named(local_name!("table"));
                        self.mode.set(self.reset_insertion_mode());
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tr"), .. }) => {
                    self.unexpected(&token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("style"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("script"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("input"), .. }) => {
                    self.unexpected(&tag);
                    if self.is_type_hidden(&tag) {
                        self.insert_and_pop_element_for(tag);
                        ProcessResult::DoneAckSelfClosing
                    } else {
                        self.foster_parent_in_body(Token::Tag(tag))
                    }
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("form"), .. }) => {
                    self.unexpected(&tag);
                    if !self.in_html_elem_named(local_name!("template"))
                        && self.form_elem.borrow().is_none()
                    {
                        *self.form_elem.borrow_mut() = Some(self.insert_and_pop_element_for(tag));
                    }
                    ProcessResult::Done
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    self.unexpected(&token);
                    self.foster_parent_in_body(token)
                },
            },

            //§ parsing-main-intabletext
            InsertionMode::InTableText => match token {
                Token::NullCharacter => self.unexpected(&token),

                Token::Characters(split, text) => {
                    self.pending_table_text.borrow_mut().push((split, text));
                    ProcessResult::Done
                },

                token => {
                    let pending = self.pending_table_text.take();
                    let contains_nonspace = pending.iter().any(|&(split, ref text)| match split {
                        SplitStatus::Whitespace => false,
                        SplitStatus::NotWhitespace => true,
                        SplitStatus::NotSplit => any_not_whitespace(text),
                    });

                    if contains_nonspace {
                        self.sink.parse_error(Borrowed("Non-space table text"));
                        for (split, text) in pending.into_iter() {
                            match self.foster_parent_in_body(Token::Characters(split, text)) {
                                ProcessResult::Done => (),
                                _ => panic!("not prepared to handle this!"),
                            }
                        }
                    } else {
                        for (_, text) in pending.into_iter() {
                            self.append_text(text);
                        }
                    }

                    ProcessResult::Reprocess(self.orig_mode.take().unwrap(), token)
                },
            },

            //§ parsing-main-incaption
            InsertionMode::InCaption => match token {
                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("col"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tr"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("table"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("caption"), .. }) => {
                    if self.in_scope_named(table_scope, local_name!("caption")) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(local_name!("caption"));
                        self.clear_active_formatting_to_marker();
                        match tag {
                            Tag {
                                kind: EndTag,
                                name: local_name!("caption"),
                                ..
                            } => {
                                self.mode.set(InsertionMode::InTable);
                                ProcessResult::Done
                            },
                            _ => ProcessResult::Reprocess(InsertionMode::InTable, Token::Tag(tag)),
                        }
                    } else {
                        self.unexpected(&tag);
                        ProcessResult::Done
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tr"), .. }) => {
                    self.unexpected(&token)
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-incolgroup
            InsertionMode::InColumnGroup => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("col"), .. }) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. }) => {
                    if self.current_node_named(local_name!("colgroup")) {
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. }) => {
                    self.unexpected(&token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => {
                    if self.current_node_named(local_name!("colgroup")) {
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },
            },

            //§ parsing-main-intbody
            InsertionMode::InTableBody => match token {
                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tr"), .. }) => {
                    self.pop_until_current(table_body_context);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InRow);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. }) => {
                    self.unexpected(&token);
                    self.pop_until_current(table_body_context);
                    self.insert_phantom(local_name!("tr"));
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("thead"), .. }) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        self.mode.set(InsertionMode::InTable);
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("table"), .. }) => {
                    declare_tag_set!(table_outer = "table" "tbody" "tfoot");
                    if self.in_scope(table_scope, |e| self.elem_in(&e, table_outer)) {
                        self.pop_until_current(table_body_context);
                        self.pop();
                        ProcessResult::Reprocess(InsertionMode::InTable, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("tr"), .. }) => {
                    self.unexpected(&token)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intr
            InsertionMode::InRow => match token {
                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("td"), .. }) => {
                    self.pop_until_current(table_row_context);
                    self.insert_element_for(tag);
                    self.mode.set(InsertionMode::InCell);
                    self.active_formatting.borrow_mut().push(FormatEntry::Marker);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("tr"), .. }) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(&node, local_name!("tr"));
                        self.mode.set(InsertionMode::InTableBody);
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("table"), .. }) => {
                    if self.in_scope_named(table_scope, local_name!("tr")) {
                        self.pop_until_current(table_row_context);
                        let node = self.pop();
                        self.assert_named(&node, local_name!("tr"));
                        ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("thead"), .. }) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        if self.in_scope_named(table_scope, local_name!("tr")) {
                            self.pop_until_current(table_row_context);
                            let node = self.pop();
                            self.assert_named(&node, local_name!("tr"));
                            ProcessResult::Reprocess(InsertionMode::InTableBody, Token::Tag(tag))
                        } else {
                            ProcessResult::Done
                        }
                    } else {
                        self.unexpected(&tag)
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("th"), .. }) => {
                    self.unexpected(&token)
                },

                token => self.step(InsertionMode::InTable, token),
            },

            //§ parsing-main-intd
            InsertionMode::InCell => match token {
                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("th"), .. }) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.generate_implied_end_tags(cursory_implied_end);
                        self.expect_to_close(tag.name);
                        self.clear_active_formatting_to_marker();
                        self.mode.set(InsertionMode::InRow);
                    } else {
                        self.unexpected(&tag);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. }) => {
                    if self.in_scope(table_scope, |n| self.elem_in(&n, td_th)) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, token)
                    } else {
                        self.unexpected(&token)
                    }
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("body"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("col"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. }) => {
                    self.unexpected(&token)
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("table"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("thead"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tr"), .. }) => {
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.close_the_cell();
                        ProcessResult::Reprocess(InsertionMode::InRow, Token::Tag(tag))
                    } else {
                        self.unexpected(&tag)
                    }
                },

                token => self.step(InsertionMode::InBody, token),
            },

            //§ parsing-main-inselect
            InsertionMode::InSelect => match token {
                Token::NullCharacter => self.unexpected(&token),
                Token::Characters(_, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("option"), .. }) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("optgroup"), .. }) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("hr"), .. }) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    }
                    self.insert_element_for(tag);
                    self.pop();
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("optgroup"), .. }) => {
                    if self.open_elems.borrow().len() >= 2
                        && self.current_node_named(local_name!("option"))
                        && self.html_elem_named(
                            &self.open_elems.borrow()[self.open_elems.borrow().len() - 2],
                            local_name!("optgroup"),
                        )
                    {
                        self.pop();
                    }
                    if self.current_node_named(local_name!("optgroup")) {
                        self.pop();
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("option"), .. }) => {
                    if self.current_node_named(local_name!("option")) {
                        self.pop();
                    } else {
                        self.unexpected(&token);
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("select"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("select"), .. }) => {
                    let in_scope = self.in_scope_named(select_scope, local_name!("select"));

                    if !in_scope || tag.kind == StartTag {
                        self.unexpected(&tag);
                    }

                    if in_scope {
                        self.pop_until_named(local_name!("select"));
                        self.mode.set(self.reset_insertion_mode());
                    }
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("input"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("keygen"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("textarea"), .. }) => {
                    self.unexpected(&token);
                    if self.in_scope_named(select_scope, local_name!("select")) {
                        self.pop_until_named(local_name!("select"));
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    } else {
                        ProcessResult::Done
                    }
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("script"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.step(InsertionMode::InBody, token),

                token => self.unexpected(&token),
            },

            //§ parsing-main-inselectintable
            InsertionMode::InSelectInTable => match token {
                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("table"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. }) => {
                    self.unexpected(&token);
                    self.pop_until_named(local_name!("select"));
                    ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                },

                Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("caption"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("table"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tbody"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tfoot"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("thead"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("tr"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("td"), .. })
                | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("th"), .. }) => {
                    self.unexpected(&tag);
                    if self.in_scope_named(table_scope, tag.name.clone()) {
                        self.pop_until_named(local_name!("select"));
                        ProcessResult::Reprocess(self.reset_insertion_mode(), Token::Tag(tag))
                    } else {
                        ProcessResult::Done
                    }
                },

                token => self.step(InsertionMode::InSelect, token),
            },

            //§ parsing-main-intemplate
            InsertionMode::InTemplate => match token {
                Token::Characters(_, _) => self.step(InsertionMode::InBody, token),
                Token::Comment(_) => self.step(InsertionMode::InBody, token),

                Token::Tag(Tag { kind: StartTag, name: local_name!("base"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("basefont"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("bgsound"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("link"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("meta"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("script"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("style"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("template"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("title"), .. })
                | Token::Tag(Tag { kind: EndTag, name: local_name!("template"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("caption"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("colgroup"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tbody"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("tfoot"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("thead"), .. }) => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes.borrow_mut().push(InsertionMode::InTable);
                    ProcessResult::Reprocess(InsertionMode::InTable, token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("col"), .. }) => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InColumnGroup);
                    ProcessResult::Reprocess(InsertionMode::InColumnGroup, token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("tr"), .. }) => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes
                        .borrow_mut()
                        .push(InsertionMode::InTableBody);
                    ProcessResult::Reprocess(InsertionMode::InTableBody, token)
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("td"), .. })
                | Token::Tag(Tag { kind: StartTag, name: local_name!("th"), .. }) => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes.borrow_mut().push(InsertionMode::InRow);
                    ProcessResult::Reprocess(InsertionMode::InRow, token)
                },

                Token::Eof => {
                    if !self.in_html_elem_named(local_name!("template")) {
                        self.stop_parsing()
                    } else {
                        self.unexpected(&token);
                        self.pop_until_named(local_name!("template"));
                        self.clear_active_formatting_to_marker();
                        self.template_modes.borrow_mut().pop();
                        self.mode.set(self.reset_insertion_mode());
                        ProcessResult::Reprocess(self.reset_insertion_mode(), token)
                    }
                },

                Token::Tag(tag @ Tag { kind: StartTag, .. }) => {
                    self.template_modes.borrow_mut().pop();
                    self.template_modes.borrow_mut().push(InsertionMode::InBody);
                    ProcessResult::Reprocess(InsertionMode::InBody, Token::Tag(tag))
                },

                token => self.unexpected(&token),
            },

            //§ parsing-main-afterbody
            InsertionMode::AfterBody => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_html(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. }) => {
                    if self.is_fragment() {
                        self.unexpected(&token);
                    } else {
                        self.mode.set(InsertionMode::AfterAfterBody);
                    }
                    ProcessResult::Done
                },

                Token::Eof => self.stop_parsing(),

                token => {
                    self.unexpected(&token);
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                },
            },

            //§ parsing-main-inframeset
            InsertionMode::InFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("frameset"), .. }) => {
                    self.insert_element_for(tag);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("frameset"), .. }) => {
                    if self.open_elems.borrow().len() == 1 {
                        self.unexpected(&token);
                    } else {
                        self.pop();
                        if !self.is_fragment() && !self.current_node_named(local_name!("frameset"))
                        {
                            self.mode.set(InsertionMode::AfterFrameset);
                        }
                    }
                    ProcessResult::Done
                },

                Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("frame"), .. }) => {
                    self.insert_and_pop_element_for(tag);
                    ProcessResult::DoneAckSelfClosing
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => {
                    if self.open_elems.borrow().len() != 1 {
                        self.unexpected(&token);
                    }
                    self.stop_parsing()
                },

                token => self.unexpected(&token),
            },

            //§ parsing-main-afterframeset
            InsertionMode::AfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, text) => self.append_text(text),
                Token::Comment(text) => self.append_comment(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Tag(Tag { kind: EndTag, name: local_name!("html"), .. }) => {
                    self.mode.set(InsertionMode::AfterAfterFrameset);
                    ProcessResult::Done
                },

                Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                Token::Eof => self.stop_parsing(),

                token => self.unexpected(&token),
            },

            //§ the-after-after-body-insertion-mode
            InsertionMode::AfterAfterBody => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Eof => self.stop_parsing(),

                token => {
                    self.unexpected(&token);
                    ProcessResult::Reprocess(InsertionMode::InBody, token)
                },
            },

            //§ the-after-after-frameset-insertion-mode
            InsertionMode::AfterAfterFrameset => match token {
                Token::Characters(SplitStatus::NotSplit, text) => {
                    ProcessResult::SplitWhitespace(text)
                },
                Token::Characters(SplitStatus::Whitespace, _) => {
                    self.step(InsertionMode::InBody, token)
                },
                Token::Comment(text) => self.append_comment_to_doc(text),

                Token::Tag(Tag { kind: StartTag, name: local_name!("html"), .. }) => {
                    self.step(InsertionMode::InBody, token)
                },

                Token::Eof => self.stop_parsing(),

                Token::Tag(Tag { kind: StartTag, name: local_name!("noframes"), .. }) => {
                    self.step(InsertionMode::InHead, token)
                },

                token => self.unexpected(&token),
            },
            //§ END
        }
    }

    pub(crate) fn step_foreign(&self, token: Token) -> ProcessResult<Handle> {
        match token {
            Token::NullCharacter => {
                self.unexpected(&token);
                self.append_text("\u{fffd}".to_tendril())
            },

            Token::Characters(_, text) => {
                if any_not_whitespace(&text) {
                    self.frameset_ok.set(false);
                }
                self.append_text(text)
            },

            Token::Comment(text) => self.append_comment(text),

            Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("b"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("big"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("blockquote"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("body"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("br"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("center"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("code"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dd"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("div"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dl"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("dt"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("em"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("embed"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h1"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h2"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h3"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h4"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h5"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("h6"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("head"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("hr"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("i"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("img"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("li"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("listing"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("menu"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("meta"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("nobr"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("ol"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("p"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("pre"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("ruby"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("s"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("small"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("span"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("strong"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("strike"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("sub"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("sup"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("table"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("tt"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("u"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("ul"), .. })
            | Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("var"), .. })
            | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("br"), .. })
            | Token::Tag(tag @ Tag { kind: EndTag, name: local_name!("p"), .. }) => {
                self.unexpected_start_tag_in_foreign_content(tag)
            },

            Token::Tag(tag @ Tag { kind: StartTag, name: local_name!("font"), .. }) => {
                let unexpected = tag.attrs.iter().any(|attr| {
                    matches!(
                        attr.name.expanded(),
                        expanded_name!("", "color") | expanded_name!("", "face") | expanded_name!("", "size")
                    )
                });
                if unexpected {
                    self.unexpected_start_tag_in_foreign_content(tag)
                } else {
                    self.foreign_start_tag(tag)
                }
            },

            Token::Tag(tag @ Tag { kind: StartTag, .. }) => self.foreign_start_tag(tag),

            // FIXME(#118): </script> in SVG
            Token::Tag(tag @ Tag { kind: EndTag, .. }) => {
                let mut first = true;
                let mut stack_idx = self.open_elems.borrow().len() - 1;
                loop {
                    if stack_idx == 0 {
                        return ProcessResult::Done;
                    }

                    let html;
                    let eq;
                    {
                        let open_elems = self.open_elems.borrow();
                        let node_name = self.sink.elem_name(&open_elems[stack_idx]);
                        html = *node_name.ns() == ns!(html);
                        eq = node_name.local_name().eq_ignore_ascii_case(&tag.name);
                    }
                    if !first && html {
                        let mode = self.mode.get();
                        return self.step(mode, Token::Tag(tag));
                    }

                    if eq {
                        self.open_elems.borrow_mut().truncate(stack_idx);
                        return ProcessResult::Done;
                    }

                    if first {
                        self.unexpected(&tag);
                        first = false;
                    }
                    stack_idx -= 1;
                }
            },

            // FIXME: This should be unreachable, but earlier arms are not
            // provably exhaustive to the compiler.
            _ => panic!("impossible case in foreign content"),
        }
    }
}
