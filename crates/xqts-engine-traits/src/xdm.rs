//! XDM value model shared between the runner and engine implementations.

use serde::{Deserialize, Serialize};

/// XML node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

impl NodeKind {
    /// The sequence-type name for this node kind, e.g. `element()`.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document-node()",
            NodeKind::Element => "element()",
            NodeKind::Attribute => "attribute()",
            NodeKind::Text => "text()",
            NodeKind::Comment => "comment()",
            NodeKind::ProcessingInstruction => "processing-instruction()",
            NodeKind::Namespace => "namespace-node()",
        }
    }
}

/// Information about an XML node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// A single XDM item in a query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XdmItem {
    Node(NodeInfo),
    String(String),
    Boolean(bool),
    Integer(i64),
    Decimal(String),
    Double(f64),
    AnyUri(String),
    Date(String),
    DateTime(String),
    Duration(String),
    QName(String),
    /// Escape hatch for types the enum does not model directly; carries the
    /// full `xs:` type name and the lexical form.
    Other { type_name: String, lexical: String },
}

impl XdmItem {
    /// The XDM type name of this item, e.g. `xs:integer` or `element()`.
    pub fn type_name(&self) -> &str {
        match self {
            XdmItem::Node(info) => info.kind.type_name(),
            XdmItem::String(_) => "xs:string",
            XdmItem::Boolean(_) => "xs:boolean",
            XdmItem::Integer(_) => "xs:integer",
            XdmItem::Decimal(_) => "xs:decimal",
            XdmItem::Double(_) => "xs:double",
            XdmItem::AnyUri(_) => "xs:anyURI",
            XdmItem::Date(_) => "xs:date",
            XdmItem::DateTime(_) => "xs:dateTime",
            XdmItem::Duration(_) => "xs:duration",
            XdmItem::QName(_) => "xs:QName",
            XdmItem::Other { type_name, .. } => type_name,
        }
    }

    /// Downcast to a boolean value. Returns `None` for non-boolean items.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            XdmItem::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Downcast to a string value. Returns `None` for non-string items.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            XdmItem::String(s) => Some(s),
            _ => None,
        }
    }

    /// Lexical rendering of the item, used for diagnostics.
    pub fn lexical(&self) -> String {
        match self {
            XdmItem::Node(info) => info.value.clone().unwrap_or_default(),
            XdmItem::String(s) => s.clone(),
            XdmItem::Boolean(b) => b.to_string(),
            XdmItem::Integer(i) => i.to_string(),
            XdmItem::Decimal(s) => s.clone(),
            XdmItem::Double(d) => d.to_string(),
            XdmItem::AnyUri(s) => s.clone(),
            XdmItem::Date(s) => s.clone(),
            XdmItem::DateTime(s) => s.clone(),
            XdmItem::Duration(s) => s.clone(),
            XdmItem::QName(s) => s.clone(),
            XdmItem::Other { lexical, .. } => lexical.clone(),
        }
    }
}

/// An ordered, finite sequence of XDM items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sequence {
    items: Vec<XdmItem>,
}

impl Sequence {
    pub fn new(items: Vec<XdmItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(item: XdmItem) -> Self {
        Self { items: vec![item] }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Zero-based item access.
    pub fn get(&self, index: usize) -> Option<&XdmItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XdmItem> {
        self.items.iter()
    }

    /// A one-item sub-sequence, for re-binding a single item to a variable.
    pub fn singleton(&self, index: usize) -> Option<Sequence> {
        self.items.get(index).cloned().map(Sequence::of)
    }
}

impl FromIterator<XdmItem> for Sequence {
    fn from_iter<T: IntoIterator<Item = XdmItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Parent type in the XSD/XDM derivation lattice, or `None` at a root.
fn parent_type(name: &str) -> Option<&'static str> {
    Some(match name {
        // numeric tower
        "xs:byte" => "xs:short",
        "xs:short" => "xs:int",
        "xs:int" => "xs:long",
        "xs:long" => "xs:integer",
        "xs:unsignedByte" => "xs:unsignedShort",
        "xs:unsignedShort" => "xs:unsignedInt",
        "xs:unsignedInt" => "xs:unsignedLong",
        "xs:unsignedLong" => "xs:nonNegativeInteger",
        "xs:positiveInteger" => "xs:nonNegativeInteger",
        "xs:nonNegativeInteger" => "xs:integer",
        "xs:negativeInteger" => "xs:nonPositiveInteger",
        "xs:nonPositiveInteger" => "xs:integer",
        "xs:integer" => "xs:decimal",
        "xs:decimal" => "xs:anyAtomicType",
        "xs:float" => "xs:anyAtomicType",
        "xs:double" => "xs:anyAtomicType",
        // string family
        "xs:language" => "xs:token",
        "xs:NMTOKEN" => "xs:token",
        "xs:Name" => "xs:token",
        "xs:NCName" => "xs:Name",
        "xs:ID" => "xs:NCName",
        "xs:IDREF" => "xs:NCName",
        "xs:ENTITY" => "xs:NCName",
        "xs:token" => "xs:normalizedString",
        "xs:normalizedString" => "xs:string",
        "xs:string" => "xs:anyAtomicType",
        // durations
        "xs:dayTimeDuration" => "xs:duration",
        "xs:yearMonthDuration" => "xs:duration",
        "xs:duration" => "xs:anyAtomicType",
        // remaining atomics
        "xs:boolean" | "xs:anyURI" | "xs:QName" | "xs:NOTATION" | "xs:date" | "xs:dateTime"
        | "xs:time" | "xs:gYear" | "xs:gYearMonth" | "xs:gMonth" | "xs:gMonthDay" | "xs:gDay"
        | "xs:base64Binary" | "xs:hexBinary" | "xs:untypedAtomic" => "xs:anyAtomicType",
        "xs:anyAtomicType" => "item()",
        // node kinds
        "document-node()" | "element()" | "attribute()" | "text()" | "comment()"
        | "processing-instruction()" | "namespace-node()" => "node()",
        "node()" => "item()",
        "map" | "array" | "function" => "item()",
        _ => return None,
    })
}

/// Whether `actual` is `expected` or derives from it in the XDM type lattice.
pub fn is_subtype_of(actual: &str, expected: &str) -> bool {
    if expected == "item()" {
        return true;
    }
    let mut current = actual;
    loop {
        if current == expected {
            return true;
        }
        match parent_type(current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}
