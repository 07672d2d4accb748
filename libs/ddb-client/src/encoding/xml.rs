//! Type-annotated XML mapping of JSON values.
//!
//! Elements carry a `type` attribute whenever their text alone would not
//! decode back to the same JSON value: numbers, booleans, nulls, arrays,
//! empty objects and strings that read like one of those. Documents
//! without annotations still decode, with numeric and boolean text
//! inferred and repeated sibling elements collected into arrays.

use std::collections::BTreeMap;
use std::fmt;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

use super::EncodeError;

const TYPE_ATTR: &str = "type";
const ITEM: &str = "item";

/// Serialize `value` as a document rooted at `root`
pub(super) fn to_document(root: &str, value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new(Vec::new());
    write_node(&mut writer, root, value)?;
    Ok(writer.into_inner())
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    value: &Value,
) -> Result<(), EncodeError> {
    let mut start = BytesStart::new(name);
    if let Some(hint) = type_hint(value) {
        start.push_attribute((TYPE_ATTR, hint));
    }

    let empty = match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                write_node(writer, key, child)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                write_node(writer, ITEM, item)?;
            }
        }
        Value::String(text) => emit(writer, Event::Text(BytesText::new(text)))?,
        Value::Number(number) => {
            emit(writer, Event::Text(BytesText::new(&number.to_string())))?;
        }
        Value::Bool(flag) => {
            let text = if *flag { "true" } else { "false" };
            emit(writer, Event::Text(BytesText::new(text)))?;
        }
        Value::Null => {}
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|e| EncodeError::Xml(e.to_string()))
}

fn type_hint(value: &Value) -> Option<&'static str> {
    match value {
        Value::Null => Some("null"),
        Value::Bool(_) => Some("boolean"),
        Value::Number(_) => Some("number"),
        Value::Array(_) => Some("array"),
        Value::Object(map) if map.is_empty() => Some("object"),
        Value::Object(_) => None,
        Value::String(text) => (!infer(text).is_string()).then_some("string"),
    }
}

/// Untyped text reads as a boolean or number when it parses as one
fn infer(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => text
            .parse::<Number>()
            .map_or_else(|_| Value::String(text.to_owned()), Value::Number),
    }
}

/// Element content as the XML deserializer reports it, keeping repeated
/// keys and their order.
#[derive(Debug)]
pub(super) enum Node {
    Text(String),
    Element(Vec<(String, Node)>),
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("XML element content")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::Text(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::Text(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Text(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Element(Vec::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Element(Vec::new()))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut entries = Vec::new();
        while let Some(node) = seq.next_element::<Node>()? {
            entries.push((ITEM.to_owned(), node));
        }
        Ok(Node::Element(entries))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries = Vec::new();
        while let Some((key, node)) = map.next_entry::<String, Node>()? {
            entries.push((key, node));
        }
        Ok(Node::Element(entries))
    }
}

impl Node {
    fn into_text(self) -> String {
        match self {
            Node::Text(text) => text,
            Node::Element(entries) => entries
                .into_iter()
                .find(|(key, _)| is_text_key(key))
                .map(|(_, node)| node.into_text())
                .unwrap_or_default(),
        }
    }
}

fn is_text_key(key: &str) -> bool {
    key == "$text" || key == "$value"
}

/// The JSON value a document root stands for; an empty root is an empty
/// object.
pub(super) fn root_value(node: Node) -> Result<Value, String> {
    match node {
        Node::Element(entries) if entries.is_empty() => Ok(Value::Object(Map::new())),
        node => to_value(node),
    }
}

fn to_value(node: Node) -> Result<Value, String> {
    let entries = match node {
        Node::Text(text) => return Ok(infer(&text)),
        Node::Element(entries) => entries,
    };

    let mut hint = None;
    let mut text = None;
    let mut children = Vec::new();
    for (key, child) in entries {
        if key.strip_prefix('@') == Some(TYPE_ATTR) {
            hint = Some(child.into_text());
        } else if is_text_key(&key) {
            text = Some(child.into_text());
        } else if !key.starts_with('@') {
            children.push((key, child));
        }
    }
    let text = text.unwrap_or_default();

    match hint.as_deref() {
        Some("null") => Ok(Value::Null),
        Some("string") => Ok(Value::String(text)),
        Some("boolean") => match text.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(format!("`{other}` is not a boolean")),
        },
        Some("number") => text
            .trim()
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| format!("`{text}` is not a number")),
        Some("array") => children
            .into_iter()
            .map(|(_, child)| to_value(child))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Some("object") => object(children),
        _ if children.is_empty() => Ok(infer(&text)),
        _ => object(children),
    }
}

fn object(children: Vec<(String, Node)>) -> Result<Value, String> {
    let mut grouped: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for (key, child) in children {
        grouped.entry(key).or_default().push(to_value(child)?);
    }
    Ok(Value::Object(
        grouped
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    values.pop().unwrap_or(Value::Null)
                } else {
                    Value::Array(values)
                };
                (key, value)
            })
            .collect(),
    ))
}
