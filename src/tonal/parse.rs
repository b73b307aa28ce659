//! Payload parsing strategies.
//!
//! Catalogue endpoints return one of three JSON shapes: a bare array, an
//! object with the item array under a named field, or a single item as the
//! whole document. Each endpoint picks its [`Payload`] variant statically;
//! nothing is inferred from the response.

use serde_json::Value;

/// The JSON shape an endpoint's response body takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// The document root is a bare array of items.
    Array,
    /// The root is an object holding the item array under this field name.
    NamedList(&'static str),
    /// The whole document is one item, wrapped into a 0/1-element list.
    SingleItem,
}

impl Payload {
    /// Parse `raw` into a list of converted items, preserving document order.
    ///
    /// `convert` maps one JSON node to a domain value and returns `None` to
    /// skip a malformed element; a single bad item never fails the list.
    /// A missing named field, or a root that is not the expected shape,
    /// yields an empty list; many endpoints simply omit empty collections.
    /// Only unparseable JSON text is an error.
    pub fn parse<T>(
        &self,
        raw: &str,
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Result<Vec<T>, serde_json::Error> {
        let root: Value = serde_json::from_str(raw)?;

        Ok(match self {
            Payload::Array => collect(root.as_array(), &convert),
            Payload::NamedList(name) => {
                collect(root.get(*name).and_then(Value::as_array), &convert)
            }
            Payload::SingleItem => convert(&root).into_iter().collect(),
        })
    }
}

fn collect<T>(items: Option<&Vec<Value>>, convert: &impl Fn(&Value) -> Option<T>) -> Vec<T> {
    items
        .map(|list| list.iter().filter_map(convert).collect())
        .unwrap_or_default()
}
