// Copyright 2025 The grafter Project Developers. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The DOCTYPE → quirks-mode tables.

use tendril::StrTendril;

use crate::interface::QuirksMode::{self, LimitedQuirks, NoQuirks, Quirks};
use crate::tokenizer::Doctype;

// These should all be lowercase, for ASCII-case-insensitive matching.
static QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
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
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
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

static QUIRKY_PUBLIC_MATCHES: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

static QUIRKY_SYSTEM_MATCHES: &[&str] =
    &["http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"];

static LIMITED_QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

static HTML4_PUBLIC_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

fn opt_as_str(x: &Option<StrTendril>) -> Option<&str> {
    x.as_ref().map(|t| &**t)
}

fn opt_eq(x: &Option<StrTendril>, y: &str) -> bool {
    // An absent id is only equal to the empty string.
    opt_as_str(x).unwrap_or("") == y
}

fn contains(haystack: &[&str], needle: &str) -> bool {
    // The table is lowercase; quirks-mode matches are case-insensitive.
    let needle = needle.to_ascii_lowercase();
    haystack.iter().any(|&x| x == needle)
}

fn contains_prefix(haystack: &[&str], needle: &str) -> bool {
    let needle = needle.to_ascii_lowercase();
    haystack.iter().any(|&x| needle.starts_with(x))
}

/// Is this one of the handful of DOCTYPEs that parse without a
/// `nonConformingDoctype` error?
fn is_doctype_ok(doctype: &Doctype) -> bool {
    let system = &doctype.system_id;
    let has_system_id = system.is_some();

    if !opt_eq(&doctype.name, "html") {
        false
    } else if doctype.public_id.is_none() {
        !has_system_id || opt_eq(system, "about:legacy-compat")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD HTML 4.0//EN") {
        !has_system_id || opt_eq(system, "http://www.w3.org/TR/REC-html40/strict.dtd")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD HTML 4.01//EN") {
        !has_system_id || opt_eq(system, "http://www.w3.org/TR/html4/strict.dtd")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD XHTML 1.0 Strict//EN") {
        opt_eq(system, "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd")
    } else if opt_eq(&doctype.public_id, "-//W3C//DTD XHTML 1.1//EN") {
        opt_eq(system, "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd")
    } else {
        false
    }
}

/// Classify a DOCTYPE: does it warrant an error report, and which quirks
/// mode does the document get?
///
/// <https://html.spec.whatwg.org/multipage/#the-initial-insertion-mode>
pub(crate) fn doctype_error_and_quirks(doctype: &Doctype, iframe_srcdoc: bool) -> (bool, QuirksMode) {
    let err = !is_doctype_ok(doctype);

    let public = opt_as_str(&doctype.public_id);
    let system = opt_as_str(&doctype.system_id);

    let quirk = match (public, system) {
        _ if doctype.force_quirks => Quirks,
        _ if !opt_eq(&doctype.name, "html") => Quirks,

        _ if iframe_srcdoc => NoQuirks,

        (Some(p), _) if contains(QUIRKY_PUBLIC_MATCHES, p) => Quirks,
        (_, Some(s)) if contains(QUIRKY_SYSTEM_MATCHES, s) => Quirks,

        (Some(p), _) if contains_prefix(QUIRKY_PUBLIC_PREFIXES, p) => Quirks,
        (Some(p), _) if contains_prefix(LIMITED_QUIRKY_PUBLIC_PREFIXES, p) => LimitedQuirks,

        (Some(p), s) if contains_prefix(HTML4_PUBLIC_PREFIXES, p) => match s {
            None => Quirks,
            Some(_) => LimitedQuirks,
        },

        _ => NoQuirks,
    };

    (err, quirk)
}

#[cfg(test)]
mod test {
    use super::doctype_error_and_quirks;
    use crate::interface::QuirksMode::{LimitedQuirks, NoQuirks, Quirks};
    use crate::tokenizer::Doctype;

    fn doctype(
        name: Option<&str>,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Doctype {
        Doctype {
            name: name.map(Into::into),
            public_id: public_id.map(Into::into),
            system_id: system_id.map(Into::into),
            force_quirks: false,
        }
    }

    #[test]
    fn modern_doctype_is_conforming() {
        let (err, quirk) = doctype_error_and_quirks(&doctype(Some("html"), None, None), false);
        assert!(!err);
        assert_eq!(quirk, NoQuirks);
    }

    #[test]
    fn missing_name_forces_quirks() {
        let (err, quirk) = doctype_error_and_quirks(&doctype(None, None, None), false);
        assert!(err);
        assert_eq!(quirk, Quirks);
    }

    #[test]
    fn force_quirks_flag_wins() {
        let mut dt = doctype(Some("html"), None, None);
        dt.force_quirks = true;
        assert_eq!(doctype_error_and_quirks(&dt, false).1, Quirks);
    }

    #[test]
    fn quirky_public_id_prefix_case_insensitive() {
        let dt = doctype(Some("html"), Some("-//W3C//DTD HTML 3.2 Final//EN"), None);
        let (err, quirk) = doctype_error_and_quirks(&dt, false);
        assert!(err);
        assert_eq!(quirk, Quirks);
    }

    #[test]
    fn xhtml_transitional_is_limited_quirks() {
        let dt = doctype(
            Some("html"),
            Some("-//W3C//DTD XHTML 1.0 Transitional//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"),
        );
        assert_eq!(doctype_error_and_quirks(&dt, false).1, LimitedQuirks);
    }

    #[test]
    fn html4_transitional_depends_on_system_id() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        let with_system = doctype(
            Some("html"),
            public,
            Some("http://www.w3.org/TR/html4/loose.dtd"),
        );
        let without_system = doctype(Some("html"), public, None);
        assert_eq!(doctype_error_and_quirks(&with_system, false).1, LimitedQuirks);
        assert_eq!(doctype_error_and_quirks(&without_system, false).1, Quirks);
    }

    #[test]
    fn srcdoc_suppresses_quirks() {
        let dt = doctype(Some("html"), Some("html"), None);
        assert_eq!(doctype_error_and_quirks(&dt, true).1, NoQuirks);
        assert_eq!(doctype_error_and_quirks(&dt, false).1, Quirks);
    }

    #[test]
    fn legacy_compat_is_conforming() {
        let dt = doctype(Some("html"), None, Some("about:legacy-compat"));
        let (err, quirk) = doctype_error_and_quirks(&dt, false);
        assert!(!err);
        assert_eq!(quirk, NoQuirks);
    }
}
