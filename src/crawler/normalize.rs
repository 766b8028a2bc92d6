//! Repairs the JavaScript array literal embedded in IPT home pages
//!
//! IPTs emit their resource table as a single-quoted JS literal with loose
//! escaping, e.g.
//!
//! ```text
//! ['<a href="https://ipt.example.org/resource?r=x"><if>Title</a>',
//! 'Not registered',
//! '--']
//! ```
//!
//! which is not JSON. [`escape_json`] rewrites it into something
//! `serde_json` can decode; it never fails, and malformed output surfaces as
//! a decode error downstream.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

// A backslash together with the character it escapes, unless that is `"`
static STRAY_ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\[^"]"#).expect("hardcoded regex pattern is valid"));

// A quote sitting inside a value: preceded by something that cannot open a
// string and followed by something that cannot close one
static ATTRIBUTE_QUOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\\\s\[])"([^,\]])"#).expect("hardcoded regex pattern is valid")
});

/// Normalizes a quasi-JSON array literal into JSON text
///
/// Steps, in order:
///
/// 1. Replace every backslash not immediately followed by `"`, together with
///    the character after it, by an escaped backslash. The escaped character
///    is lost, so `\'` and `\\` both decode to a single backslash.
/// 2. Turn every `'` into `"`.
/// 3. Escape quotes in attribute position (`href="..."` inside a value),
///    then repeat step 2.
pub fn escape_json(literal: &str) -> String {
    let escaped = STRAY_ESCAPE_REGEX.replace_all(literal, NoExpand(r"\\"));
    let quoted = escaped.replace('\'', "\"");
    ATTRIBUTE_QUOTE_REGEX
        .replace_all(&quoted, "${1}\\\"${2}")
        .replace('\'', "\"")
}
