// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The stack of open elements.
//!
//! Storage plus the identity and scope queries. The stack never talks to
//! the sink on its own behalf: name lookups go through the `&Sink`
//! parameter the caller passes, and the `TreeSink::pop` notification stays
//! with the tree builder, which knows whether a removal means "element
//! closed" or "element relocated".

use crate::interface::{ElemName, ExpandedName, TreeSink};

/// Index 0 is the root `<html>` element (or the fragment root); the current
/// node lives at the end.
pub(crate) struct OpenElemStack<Handle> {
    elems: Vec<Handle>,
}

impl<Handle: Clone> OpenElemStack<Handle> {
    pub(crate) fn new() -> Self {
        OpenElemStack { elems: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.elems.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// The current node. Panics on an empty stack: modes that can see an
    /// empty stack (Initial, BeforeHtml) never ask.
    pub(crate) fn current(&self) -> &Handle {
        self.elems.last().expect("no current element")
    }

    pub(crate) fn last(&self) -> Option<&Handle> {
        self.elems.last()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Handle> {
        self.elems.iter()
    }

    pub(crate) fn push(&mut self, elem: Handle) {
        self.elems.push(elem);
    }

    pub(crate) fn pop(&mut self) -> Option<Handle> {
        self.elems.pop()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.elems.truncate(len);
    }

    pub(crate) fn insert(&mut self, index: usize, elem: Handle) {
        self.elems.insert(index, elem);
    }

    pub(crate) fn remove(&mut self, index: usize) -> Handle {
        self.elems.remove(index)
    }

    pub(crate) fn replace(&mut self, index: usize, elem: Handle) {
        self.elems[index] = elem;
    }

    /// Drain the whole stack from the top down (EOF finalization).
    pub(crate) fn drain_top_down(&mut self) -> impl Iterator<Item = Handle> + '_ {
        self.elems.drain(..).rev()
    }

    /// The topmost position of `elem`, by node identity.
    pub(crate) fn position_of<Sink>(&self, sink: &Sink, elem: &Handle) -> Option<usize>
    where
        Sink: TreeSink<Handle = Handle>,
    {
        self.elems.iter().rposition(|x| sink.same_node(elem, x))
    }

    pub(crate) fn contains<Sink>(&self, sink: &Sink, elem: &Handle) -> bool
    where
        Sink: TreeSink<Handle = Handle>,
    {
        self.position_of(sink, elem).is_some()
    }

    /// The element immediately below `elem`, if any (adoption agency's
    /// common ancestor).
    pub(crate) fn common_ancestor<Sink>(&self, sink: &Sink, elem: &Handle) -> Option<Handle>
    where
        Sink: TreeSink<Handle = Handle>,
    {
        match self.position_of(sink, elem) {
            Some(i) if i > 0 => Some(self.elems[i - 1].clone()),
            _ => None,
        }
    }

    /// The lowest element at or above `from` whose name is in `set`: the
    /// adoption agency's furthest-block search.
    pub(crate) fn lowest_match_from<Sink, TagSet>(
        &self,
        sink: &Sink,
        from: usize,
        set: TagSet,
    ) -> Option<(usize, Handle)>
    where
        Sink: TreeSink<Handle = Handle>,
        TagSet: Fn(ExpandedName) -> bool,
    {
        self.elems[from..]
            .iter()
            .position(|elem| set(sink.elem_name(elem).expanded()))
            .map(|offset| (from + offset, self.elems[from + offset].clone()))
    }

    /// Walk from the current node downward; true if `pred` matches an
    /// element before any element of the `scope` barrier set does.
    ///
    /// <https://html.spec.whatwg.org/multipage/#has-an-element-in-the-specific-scope>
    pub(crate) fn in_scope<Sink, TagSet, Pred>(&self, sink: &Sink, scope: TagSet, pred: Pred) -> bool
    where
        Sink: TreeSink<Handle = Handle>,
        TagSet: Fn(ExpandedName) -> bool,
        Pred: Fn(Handle) -> bool,
    {
        for node in self.elems.iter().rev() {
            if pred(node.clone()) {
                return true;
            }
            if scope(sink.elem_name(node).expanded()) {
                return false;
            }
        }

        // supposed to be impossible, because <html> is always in scope

        false
    }
}

impl<Handle, I> std::ops::Index<I> for OpenElemStack<Handle>
where
    I: std::slice::SliceIndex<[Handle]>,
{
    type Output = I::Output;

    fn index(&self, index: I) -> &I::Output {
        self.elems.index(index)
    }
}

impl<'a, Handle> IntoIterator for &'a OpenElemStack<Handle> {
    type IntoIter = std::slice::Iter<'a, Handle>;
    type Item = &'a Handle;

    fn into_iter(self) -> Self::IntoIter {
        self.elems.iter()
    }
}
