// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The list of active formatting elements.
//!
//! <https://html.spec.whatwg.org/multipage/#the-list-of-active-formatting-elements>

use crate::interface::TreeSink;
use crate::tokenizer::Tag;
use crate::LocalName;

/// An entry in the list: a marker (inserted when entering `<applet>`,
/// `<object>`, `<marquee>`, `<template>`, `<td>`, `<th>`, and `<caption>`)
/// or an element together with the start tag it was created from, kept so
/// the adoption agency and the reconstruction algorithm can clone it.
pub(crate) enum FormatEntry<Handle> {
    Element(Handle, Tag),
    Marker,
}

/// Index 0 is the oldest entry; the most recent entry is at the end.
pub(crate) struct ActiveFormattingList<Handle> {
    entries: Vec<FormatEntry<Handle>>,
}

impl<Handle: Clone> ActiveFormattingList<Handle> {
    pub(crate) fn new() -> Self {
        ActiveFormattingList {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, index: usize) -> &FormatEntry<Handle> {
        &self.entries[index]
    }

    pub(crate) fn last(&self) -> Option<&FormatEntry<Handle>> {
        self.entries.last()
    }

    pub(crate) fn push_marker(&mut self) {
        self.entries.push(FormatEntry::Marker);
    }

    /// Push an element entry, first enforcing the Noah's Ark condition.
    ///
    /// <https://html.spec.whatwg.org/multipage/#push-onto-the-list-of-active-formatting-elements>
    pub(crate) fn push_element(&mut self, element: Handle, tag: Tag) {
        self.enforce_noahs_ark(&tag);
        self.entries.push(FormatEntry::Element(element, tag));
    }

    pub(crate) fn insert_at(&mut self, index: usize, entry: FormatEntry<Handle>) {
        self.entries.insert(index, entry);
    }

    pub(crate) fn replace_at(&mut self, index: usize, entry: FormatEntry<Handle>) {
        self.entries[index] = entry;
    }

    pub(crate) fn remove_at(&mut self, index: usize) {
        self.entries.remove(index);
    }

    /// Pop entries up to and including the nearest marker; clears the whole
    /// list if there is none.
    ///
    /// <https://html.spec.whatwg.org/multipage/#clear-the-list-of-active-formatting-elements-up-to-the-last-marker>
    pub(crate) fn clear_to_last_marker(&mut self) {
        loop {
            match self.entries.pop() {
                None | Some(FormatEntry::Marker) => break,
                _ => (),
            }
        }
    }

    /// Every element entry, oldest first, markers skipped.
    pub(crate) fn elements(&self) -> impl Iterator<Item = &Handle> {
        self.entries.iter().filter_map(|entry| match entry {
            FormatEntry::Element(handle, _) => Some(handle),
            FormatEntry::Marker => None,
        })
    }

    /// The newest element entry back to the last marker whose stored tag
    /// carries this name, together with its index.
    pub(crate) fn newest_entry_named(&self, name: &LocalName) -> Option<(usize, Handle, Tag)> {
        self.iter_end_to_marker()
            .find(|&(_, _, tag)| tag.name == *name)
            .map(|(index, handle, tag)| (index, handle.clone(), tag.clone()))
    }

    /// The index of the oldest entry the reconstruction algorithm has to
    /// reopen: every entry from it to the end of the list fails
    /// `is_settled` (is neither a marker nor still open). `None` when
    /// there is nothing to reconstruct.
    pub(crate) fn first_index_needing_reopen<F>(&self, is_settled: F) -> Option<usize>
    where
        F: Fn(&FormatEntry<Handle>) -> bool,
    {
        match self.entries.last() {
            None => return None,
            Some(entry) if is_settled(entry) => return None,
            Some(_) => {}
        }

        let mut index = self.entries.len() - 1;
        while index > 0 && !is_settled(&self.entries[index - 1]) {
            index -= 1;
        }
        Some(index)
    }

    /// The position of `element` in the list, by node identity.
    pub(crate) fn position_of<Sink>(&self, sink: &Sink, element: &Handle) -> Option<usize>
    where
        Sink: TreeSink<Handle = Handle>,
    {
        self.entries.iter().position(|n| match n {
            FormatEntry::Marker => false,
            FormatEntry::Element(handle, _) => sink.same_node(handle, element),
        })
    }

    /// Iterate over the element entries (with their index in the list) from
    /// the most recent entry back to the last marker, or the whole list if
    /// there are no markers.
    pub(crate) fn iter_end_to_marker(&self) -> impl Iterator<Item = (usize, &Handle, &Tag)> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map_while(|(i, entry)| match entry {
                FormatEntry::Marker => None,
                FormatEntry::Element(h, t) => Some((i, h, t)),
            })
    }

    /// The Noah's Ark condition: at most three entries between the end of
    /// the list and the last marker may carry the same tag name, namespace,
    /// and attribute set; pushing a fourth drops the oldest of them.
    fn enforce_noahs_ark(&mut self, tag: &Tag) {
        let mut first_match = None;
        let mut matches = 0usize;
        for (i, _, old_tag) in self.iter_end_to_marker() {
            if tag.equiv_modulo_attr_order(old_tag) {
                first_match = Some(i);
                matches += 1;
            }
        }

        if matches >= 3 {
            self.entries
                .remove(first_match.expect("matches with no index"));
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ActiveFormattingList, FormatEntry};
    use crate::interface::Attribute;
    use crate::tokenizer::{StartTag, Tag};
    use crate::{LocalName, QualName};

    fn b_tag(id: &str) -> Tag {
        Tag {
            kind: StartTag,
            name: local_name!("b"),
            self_closing: false,
            attrs: vec![Attribute {
                name: QualName::new(None, ns!(), local_name!("id")),
                value: id.into(),
            }],
            attr_spans: vec![],
        }
    }

    fn names(list: &ActiveFormattingList<u32>) -> Vec<Option<(u32, LocalName)>> {
        (0..list.len())
            .map(|i| match list.entry(i) {
                FormatEntry::Marker => None,
                FormatEntry::Element(h, t) => Some((*h, t.name.clone())),
            })
            .collect()
    }

    #[test]
    fn noahs_ark_drops_oldest_of_four() {
        let mut list = ActiveFormattingList::<u32>::new();
        for i in 0..4 {
            list.push_element(i, b_tag("x"));
        }
        assert_eq!(
            names(&list),
            vec![
                Some((1, local_name!("b"))),
                Some((2, local_name!("b"))),
                Some((3, local_name!("b"))),
            ]
        );
    }

    #[test]
    fn noahs_ark_distinguishes_attributes() {
        let mut list = ActiveFormattingList::<u32>::new();
        list.push_element(0, b_tag("x"));
        list.push_element(1, b_tag("y"));
        list.push_element(2, b_tag("x"));
        list.push_element(3, b_tag("x"));
        list.push_element(4, b_tag("x"));
        assert_eq!(list.len(), 4);
        // The oldest id=x entry went; id=y survives.
        assert_eq!(
            names(&list)[0..2],
            [Some((1, local_name!("b"))), Some((2, local_name!("b")))]
        );
    }

    #[test]
    fn markers_shield_older_entries() {
        let mut list = ActiveFormattingList::<u32>::new();
        list.push_element(0, b_tag("x"));
        list.push_marker();
        list.push_element(1, b_tag("x"));
        list.push_element(2, b_tag("x"));
        list.push_element(3, b_tag("x"));
        // Entry 0 is behind the marker: no drop happens.
        assert_eq!(list.len(), 5);

        list.clear_to_last_marker();
        assert_eq!(list.len(), 1);
        assert_eq!(names(&list), vec![Some((0, local_name!("b")))]);
    }
}
