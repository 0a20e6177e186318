use serde_json::Value;

/// One step of a key path into a JSON tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key<'a> {
    Name(&'a str),
    Index(usize),
}

/// Optional-chaining lookup over a JSON value: walks `path` and returns
/// `None` on a missing key, a wrong-shaped container, or an out-of-range
/// index. Never panics.
pub fn get_path<'v>(value: &'v Value, path: &[Key]) -> Option<&'v Value> {
    let (head, rest) = match path.split_first() {
        Some(parts) => parts,
        None => return Some(value),
    };
    let next = match head {
        Key::Name(name) => value.as_object()?.get(*name)?,
        Key::Index(idx) => value.as_array()?.get(*idx)?,
    };
    get_path(next, rest)
}
