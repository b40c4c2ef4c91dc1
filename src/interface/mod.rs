// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shared vocabulary between the engine, the tokenizer, and the DOM sink:
//! qualified names, attributes, source positions, and the [`TreeSink`]
//! capability surface.

use std::fmt;

use tendril::StrTendril;

use crate::{LocalName, Namespace, Prefix};

pub mod tree_builder;

pub use self::tree_builder::{create_element, ElemName, ElementFlags, Tracer, TreeSink};
pub use self::tree_builder::{AppendNode, AppendText, NodeOrText};
pub use self::tree_builder::{ErrorCode, NodeLocation, ParseError};
pub use self::tree_builder::{LimitedQuirks, NoQuirks, Quirks, QuirksMode};

/// A fully qualified name (with a namespace), used to depict names of tags
/// and attributes.
///
/// Namespaces can be used to differentiate between similar XML fragments.
/// For example:
///
/// ```text
/// // HTML
/// <table>
///   <tr>
///     <td>Apples</td>
///     <td>Bananas</td>
///   </tr>
/// </table>
///
/// // Furniture XML
/// <table>
///   <name>African Coffee Table</name>
///   <width>80</width>
///   <length>120</length>
/// </table>
/// ```
///
/// Without XML namespaces, we can't use those two fragments in the same
/// document at the same time. However if we declare a namespace, we could
/// instead say:
///
/// ```text
/// // Furniture XML
/// <furn:table>
///   <furn:name>African Coffee Table</furn:name>
///   <furn:width>80</furn:width>
///   <furn:length>120</furn:length>
/// </furn:table>
/// ```
///
/// and bind the prefix `furn` to a different namespace.
///
/// For this reason we parse names that contain a colon in the following way:
///
/// ```text
/// <furn:table>
///    |    |
///    |    +- local name
///    |
///  prefix (when resolved gives namespace_url)
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct QualName {
    /// The prefix, if any, of this name.
    pub prefix: Option<Prefix>,
    /// The namespace the name belongs to.
    pub ns: Namespace,
    /// The local part of the name.
    pub local: LocalName,
}

impl QualName {
    /// Basic constructor function.
    #[inline]
    pub fn new(prefix: Option<Prefix>, ns: Namespace, local: LocalName) -> QualName {
        QualName { prefix, ns, local }
    }

    /// Take a reference of this name as an [`ExpandedName`], dropping the
    /// unresolved prefix.
    ///
    /// In XML and HTML prefixes are only used to look up the namespace URI;
    /// names are considered equal if the local name and namespace match.
    #[inline]
    pub fn expanded(&self) -> ExpandedName<'_> {
        ExpandedName {
            ns: &self.ns,
            local: &self.local,
        }
    }
}

/// A name with a namespace.
///
/// This is the type the engine compares: the prefix (if any) has already
/// been resolved away.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ExpandedName<'a> {
    pub ns: &'a Namespace,
    pub local: &'a LocalName,
}

impl fmt::Debug for ExpandedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ns.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}:{}", self.ns, self.local)
        }
    }
}

/// Helper to quickly create an expanded name.
///
/// Can be used both as an expression and as a pattern:
///
/// ```
/// # use grafter::{expanded_name, local_name, namespace_url, ns, LocalName};
/// let n = expanded_name!(html "div");
/// assert_eq!(n.local, &LocalName::from("div"));
/// ```
#[macro_export]
macro_rules! expanded_name {
    ("", $local:tt) => {
        $crate::ExpandedName {
            ns: &ns!(),
            local: &local_name!($local),
        }
    };
    ($ns:ident $local:tt) => {
        $crate::ExpandedName {
            ns: &ns!($ns),
            local: &local_name!($local),
        }
    };
}

/// A tag attribute, e.g. `class="test"` in `<div class="test" ...>`.
///
/// The namespace on the attribute name is almost always `ns!("")`. The
/// tokenizer creates all attributes this way, but the tree builder will
/// adjust certain attribute names inside foreign content (MathML, SVG).
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug)]
pub struct Attribute {
    /// The name of the attribute (e.g. the `class` in `<div class="test">`).
    pub name: QualName,
    /// The value of the attribute (e.g. the `"test"` in `<div class="test">`).
    pub value: StrTendril,
}

/// A line/column/byte position in the decoded input.
///
/// Lines and columns are 1-based, the byte offset is 0-based, following the
/// conventions tokenizers report. A tokenizer that does not track positions
/// passes the zero value throughout.
#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Hash)]
pub struct Position {
    pub line: u64,
    pub column: u64,
    pub offset: usize,
}

/// The extent of a token in the decoded input.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Hash)]
pub struct SourceSpan {
    pub start: Position,
    pub end: Position,
}

impl SourceSpan {
    /// A zero-length span at this span's start, used for "before token"
    /// conditions and for elements closed by something other than a
    /// matching end tag.
    #[inline]
    pub fn collapsed_to_start(self) -> SourceSpan {
        SourceSpan {
            start: self.start,
            end: self.start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::QualName;
    use crate::{LocalName, Namespace};

    #[test]
    fn ns_macro() {
        assert_eq!(ns!(), Namespace::from(""));

        assert_eq!(ns!(html), Namespace::from("http://www.w3.org/1999/xhtml"));
        assert_eq!(ns!(xml), Namespace::from("http://www.w3.org/XML/1998/namespace"));
        assert_eq!(ns!(xmlns), Namespace::from("http://www.w3.org/2000/xmlns/"));
        assert_eq!(ns!(xlink), Namespace::from("http://www.w3.org/1999/xlink"));
        assert_eq!(ns!(svg), Namespace::from("http://www.w3.org/2000/svg"));
        assert_eq!(ns!(mathml), Namespace::from("http://www.w3.org/1998/Math/MathML"));
    }

    #[test]
    fn qualname() {
        assert_eq!(
            QualName::new(None, ns!(), local_name!("div")),
            QualName {
                prefix: None,
                ns: ns!(),
                local: LocalName::from("div"),
            }
        );
        assert_eq!(
            QualName::new(None, ns!(xml), local_name!("base")),
            QualName {
                prefix: None,
                ns: ns!(xml),
                local: local_name!("base"),
            }
        );
    }

    #[test]
    fn expanded_name_macro() {
        let div = expanded_name!(html "div");
        assert_eq!(div.ns, &ns!(html));
        assert_eq!(div.local, &local_name!("div"));
        assert!(matches!(div, expanded_name!(html "div")));
    }
}
