//! JSON Pointer (RFC 6901) locations used in error reports.

use std::fmt::Write;

/// One step from a container to a child value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Escapes a pointer component: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // `~` first so the `~` introduced by `~1` is not escaped again.
    component.replace('~', "~0").replace('/', "~1")
}

/// Formats segments as a pointer string. The root is `""`.
pub fn format_pointer<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = PathSegment<'a>>,
{
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        match segment {
            PathSegment::Key(k) => out.push_str(&escape_component(k)),
            PathSegment::Index(i) => {
                let _ = write!(out, "{i}");
            }
        }
    }
    out
}
