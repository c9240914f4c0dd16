// Copyright 2014-2017 The html5ever Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Types and traits for the tree builder to consume, and for a tree sink
//! (the thing that actually builds a DOM) to implement.
//!
//! <https://html.spec.whatwg.org/multipage/#tree-construction>

use std::borrow::Cow;

use crate::interface::{Attribute, ExpandedName, QualName};
use crate::{LocalName, Namespace};

/// Something which can be inserted into the DOM.
///
/// Adjacent sibling text nodes are merged into a single node, so
/// the tree builder (and not the `TreeSink`) is responsible for
/// splitting UTF-8 character sequences appropriately.
pub enum NodeOrText<Handle> {
    AppendNode(Handle),
    AppendText(StrTendril),
}

pub use self::NodeOrText::{AppendNode, AppendText};

use crate::tendril::StrTendril;

/// A document's quirks mode.
///
/// <https://dom.spec.whatwg.org/#concept-document-quirks>
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QuirksMode {
    Quirks,
    LimitedQuirks,
    NoQuirks,
}

pub use self::QuirksMode::{LimitedQuirks, NoQuirks, Quirks};

/// Whether to interrupt further parsing of the current input until
/// the tree sink signals otherwise, for example because it started
/// fetching an external resource blocking the parser. This is
/// always `Continue` in this implementation, since script execution
/// and resource fetching are outside its scope.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum NextParserState {
    Continue,
    Suspend,
}

/// Types which can visit all of a tree builder's in-memory `Handle`s.
///
/// This is intended to support garbage-collected DOMs.
pub trait Tracer {
    type Handle;
    fn trace_handle(&self, node: &Self::Handle);
}

/// Flags for the tree builder's `create_element` / `TreeSink::create_element`
/// calls, indicating extra information known about the element being created
/// beyond its name and attributes.
#[derive(Copy, Clone, Default)]
pub struct ElementFlags {
    pub template: bool,
    pub mathml_annotation_xml_integration_point: bool,
}

/// Convenience function to create an element while ensuring a consistent
/// set of `ElementFlags` is applied for the common (non-template,
/// non-integration-point) case, for implementations of `TreeSink` that
/// can determine the rest from the `QualName` itself (e.g. whether the
/// name is `html:template`).
pub fn create_element<Sink: TreeSink>(
    sink: &Sink,
    name: QualName,
    attrs: Vec<Attribute>,
) -> Sink::Handle {
    sink.create_element(name, attrs, ElementFlags::default())
}

/// The name of an element, as returned by `TreeSink::elem_name`.
///
/// This is almost always an `ExpandedName` in disguise: a `TreeSink`'s
/// `Handle`s typically don't carry the element name in a form that can be
/// borrowed out directly (e.g. `RcDom`'s `Handle` stores a `QualName` behind
/// a `RefCell`), so `elem_name` hands back a short-lived view instead of a
/// `QualName` by value.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ElemName<'a> {
    pub ns: &'a Namespace,
    pub local: &'a LocalName,
}

impl<'a> ElemName<'a> {
    pub fn ns(&self) -> &'a Namespace {
        self.ns
    }

    pub fn local_name(&self) -> &'a LocalName {
        self.local
    }

    pub fn expanded(&self) -> ExpandedName<'a> {
        ExpandedName {
            ns: self.ns,
            local: self.local,
        }
    }
}

/// The overall tree construction algorithm (`TreeBuilder`, in
/// `tree_builder::mod`) drives parsing by sending it a stream of tokens and
/// a handful of higher-level tree operations; `TreeSink` is the "other side"
/// of that boundary, implemented by whatever actually owns and mutates the
/// resulting tree (`RcDom` in this crate, but any DOM representation can
/// implement it).
///
/// "Consumer" and "Producer" refer to whether the tree builder sends
/// information to the `TreeSink` or receives it.
///
/// `Handle` is a reference to a DOM node. Implementations are free to use
/// any representation that's `Clone` and cheap to copy, since the tree
/// builder clones handles freely while walking the stack of open elements.
pub trait TreeSink {
    /// The overall result of parsing.
    ///
    /// This is a `TreeSink`, not a `TreeBuilder`, method because it's often
    /// only the sink that knows when a tree is "finished" -- e.g. it may
    /// need to perform some final normalization.
    type Output;

    /// Consume this sink and return the overall result of parsing.
    fn finish(self) -> Self::Output;

    /// `Handle` is a reference to a DOM node.
    type Handle: Clone;

    /// Signal a parse error.
    fn parse_error(&self, msg: Cow<'static, str>);

    /// Get a handle to the `Document` node.
    fn get_document(&self) -> Self::Handle;

    /// Get a handle to a template's template contents.
    ///
    /// The tree builder promises this will never be called with something
    /// other than a template element.
    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle;

    /// Do two handles refer to the same node?
    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool;

    /// What is the name of this element?
    ///
    /// Should never be called on a non-element node: the tree builder only
    /// calls this on elements it itself inserted or that appear on the
    /// stack of open elements.
    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ElemName<'a>;

    /// Set the document's quirks mode.
    fn set_quirks_mode(&self, mode: QuirksMode);

    /// Create an element.
    ///
    /// When creating a template element (`name.ns.expanded() ==
    /// expanded_name!(html "template")`), an empty template contents
    /// document fragment must be associated, retrievable with
    /// `get_template_contents`.
    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle;

    /// Create a comment node.
    fn create_comment(&self, text: StrTendril) -> Self::Handle;

    /// Create a Processing Instruction node.
    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle;

    /// Append a node as the last child of the given node. If this would
    /// produce adjacent sibling text nodes, it should concatenate the text
    /// instead.
    ///
    /// The child node will not already have a parent.
    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>);

    /// Append a node as the sibling immediately before the given node.
    ///
    /// The tree builder promises that `sibling` is not a text node. However
    /// its old previous sibling, if any, may be text, in which case the
    /// sink must concatenate the new text with the old.
    ///
    /// NB: `new_node` may have an old parent, from which it should be
    /// removed.
    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>);

    /// When the insertion point is decided by the existence of a parent
    /// node of the element, we consider both possibilities and send the
    /// element which will be used if a parent node exists, along with the
    /// element to be used if there isn't one.
    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.has_parent_node(element) {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    /// Append a `DOCTYPE` element to the `Document` node.
    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    );

    /// Mark a HTML `<script>` element as "already started".
    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    /// Indicate that a node was popped off the stack of open elements.
    fn pop(&self, _node: &Self::Handle) {}

    /// Whether a node has a parent. Used to determine which of the two
    /// insertion points to use for `append_based_on_parent_node`.
    fn has_parent_node(&self, _node: &Self::Handle) -> bool {
        false
    }

    /// Associate the given form-associatable element with the given form
    /// element.
    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    /// Detect quirks with `annotation-xml` elements.
    fn is_mathml_annotation_xml_integration_point(&self, _handle: &Self::Handle) -> bool {
        false
    }

    /// Called whenever the line number changes.
    fn set_current_line(&self, _line_number: u64) {}

    /// Indicate that a `script` element is complete.
    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    /// Whether to allow a declarative shadow root to attach to a given
    /// document or shadow-including parent. Conservative implementations
    /// (e.g. ones without any notion of shadow trees) should return
    /// `false`.
    fn allow_declarative_shadow_roots(&self, _intended_parent: &Self::Handle) -> bool {
        false
    }

    /// Attach a declarative shadow root to `shadow_host`, whose contents
    /// are the children of `template`. Returns whether the shadow root was
    /// successfully attached.
    fn attach_declarative_shadow(
        &self,
        _shadow_host: &Self::Handle,
        _template: &Self::Handle,
        _attrs: &[Attribute],
    ) -> bool {
        false
    }

    // Tree manipulation methods below are used only if `TreeBuilderOpts`
    // asks for full tree manipulation semantics.

    /// Remove a node from its parent, if any.
    fn remove_from_parent(&self, _target: &Self::Handle) {}

    /// Remove all the children from a node and append them to a new parent.
    fn reparent_children(&self, _node: &Self::Handle, _new_parent: &Self::Handle) {}

    /// Add each attribute to the given element, if no attribute with that
    /// name already exists. The tree builder promises this will never be
    /// called with something other than an element.
    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>);
}
