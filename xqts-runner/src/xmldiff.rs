//! Order- and content-aware comparison of serialized XML fragments.
//!
//! Both fragments are wrapped in an `ignorable-wrapper` element before
//! parsing so that text nodes and multi-root fragments compare as well-formed
//! documents. Reported difference paths therefore start with the wrapper,
//! which the formatter strips again.

use std::fmt;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use thiserror::Error;

use crate::queries::IGNORABLE_WRAPPER;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct XmlDiffError(String);

/// One point where the compared fragments disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// XPath of the disagreeing node, wrapper prefix included
    pub xpath: String,
    pub message: String,
}

static WRAPPER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/ignorable-wrapper(?:\[[0-9]+\])?").expect("valid pattern"));

/// Strip the artificial wrapper from a reported XPath; a path that becomes
/// empty is the document root.
pub fn strip_wrapper_prefix(xpath: &str) -> String {
    let stripped = WRAPPER_PREFIX.replace(xpath, "");
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped.into_owned()
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, strip_wrapper_prefix(&self.xpath))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl XmlNode {
    fn kind(&self) -> &'static str {
        match self {
            XmlNode::Element(_) => "element",
            XmlNode::Text(_) => "text",
            XmlNode::Comment(_) => "comment",
            XmlNode::ProcessingInstruction(_) => "processing-instruction",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

/// Compare two XML fragments, reporting every difference in element order,
/// names, attributes, and character content. With `ignore_prefixes`,
/// namespace prefixes and `xmlns` attributes are left out of the comparison.
pub fn compare(
    expected: &str,
    actual: &str,
    ignore_prefixes: bool,
) -> Result<Vec<Difference>, XmlDiffError> {
    let expected_tree = parse_fragment(expected)?;
    let actual_tree = parse_fragment(actual)?;
    let mut differences = Vec::new();
    let path = format!("/{IGNORABLE_WRAPPER}[1]");
    compare_elements(
        &expected_tree,
        &actual_tree,
        &path,
        ignore_prefixes,
        &mut differences,
    );
    Ok(differences)
}

fn parse_fragment(fragment: &str) -> Result<Element, XmlDiffError> {
    let wrapped = format!("<{IGNORABLE_WRAPPER}>{fragment}</{IGNORABLE_WRAPPER}>");
    let mut reader = Reader::from_str(&wrapped);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader
            .read_event()
            .map_err(|e| XmlDiffError(e.to_string()))?
        {
            Event::Start(start) => {
                let element = open_element(&start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, XmlNode::Element(element));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlDiffError("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, XmlNode::Element(element));
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| XmlDiffError(e.to_string()))?
                    .into_owned();
                if !content.is_empty() {
                    attach(&mut stack, &mut root, XmlNode::Text(content));
                }
            }
            Event::CData(data) => {
                let content = String::from_utf8_lossy(&data).into_owned();
                attach(&mut stack, &mut root, XmlNode::Text(content));
            }
            Event::Comment(text) => {
                let content = String::from_utf8_lossy(&text).into_owned();
                attach(&mut stack, &mut root, XmlNode::Comment(content));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                attach(&mut stack, &mut root, XmlNode::ProcessingInstruction(content));
            }
            Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    match root {
        Some(XmlNode::Element(element)) if stack.is_empty() => Ok(element),
        _ => Err(XmlDiffError("fragment is not well-formed".to_string())),
    }
}

fn open_element(start: &quick_xml::events::BytesStart<'_>) -> Result<Element, XmlDiffError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlDiffError(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlDiffError(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<XmlNode>, node: XmlNode) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        *root = Some(node);
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn comparable_name<'a>(name: &'a str, ignore_prefixes: bool) -> &'a str {
    if ignore_prefixes {
        local_name(name)
    } else {
        name
    }
}

fn is_namespace_declaration(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

fn compare_elements(
    expected: &Element,
    actual: &Element,
    path: &str,
    ignore_prefixes: bool,
    differences: &mut Vec<Difference>,
) {
    if comparable_name(&expected.name, ignore_prefixes)
        != comparable_name(&actual.name, ignore_prefixes)
    {
        differences.push(Difference {
            xpath: path.to_string(),
            message: format!(
                "expected element '{}' but found '{}'",
                expected.name, actual.name
            ),
        });
        return;
    }

    compare_attributes(expected, actual, path, ignore_prefixes, differences);

    if expected.children.len() != actual.children.len() {
        differences.push(Difference {
            xpath: path.to_string(),
            message: format!(
                "expected {} child nodes but found {}",
                expected.children.len(),
                actual.children.len()
            ),
        });
        return;
    }

    for (index, (expected_child, actual_child)) in expected
        .children
        .iter()
        .zip(actual.children.iter())
        .enumerate()
    {
        match (expected_child, actual_child) {
            (XmlNode::Element(e), XmlNode::Element(a)) => {
                let position = expected.children[..index]
                    .iter()
                    .filter(|node| {
                        matches!(node, XmlNode::Element(prior)
                            if comparable_name(&prior.name, ignore_prefixes)
                                == comparable_name(&e.name, ignore_prefixes))
                    })
                    .count()
                    + 1;
                let child_path = format!(
                    "{path}/{}[{position}]",
                    comparable_name(&e.name, ignore_prefixes)
                );
                compare_elements(e, a, &child_path, ignore_prefixes, differences);
            }
            (XmlNode::Text(e), XmlNode::Text(a)) if e != a => {
                differences.push(Difference {
                    xpath: path.to_string(),
                    message: format!("expected text '{e}' but found '{a}'"),
                });
            }
            (XmlNode::Comment(e), XmlNode::Comment(a)) if e != a => {
                differences.push(Difference {
                    xpath: path.to_string(),
                    message: format!("expected comment '{e}' but found '{a}'"),
                });
            }
            (XmlNode::ProcessingInstruction(e), XmlNode::ProcessingInstruction(a)) if e != a => {
                differences.push(Difference {
                    xpath: path.to_string(),
                    message: format!(
                        "expected processing-instruction '{e}' but found '{a}'"
                    ),
                });
            }
            (e, a) if e.kind() != a.kind() => {
                differences.push(Difference {
                    xpath: path.to_string(),
                    message: format!("expected {} node but found {}", e.kind(), a.kind()),
                });
            }
            _ => {}
        }
    }
}

fn compare_attributes(
    expected: &Element,
    actual: &Element,
    path: &str,
    ignore_prefixes: bool,
    differences: &mut Vec<Difference>,
) {
    let relevant = |attributes: &[(String, String)]| -> Vec<(String, String)> {
        let mut filtered: Vec<(String, String)> = attributes
            .iter()
            .filter(|(key, _)| !(ignore_prefixes && is_namespace_declaration(key)))
            .map(|(key, value)| {
                (
                    comparable_name(key, ignore_prefixes).to_string(),
                    value.clone(),
                )
            })
            .collect();
        filtered.sort();
        filtered
    };

    let expected_attributes = relevant(&expected.attributes);
    let actual_attributes = relevant(&actual.attributes);

    for (key, value) in &expected_attributes {
        match actual_attributes.iter().find(|(k, _)| k == key) {
            None => differences.push(Difference {
                xpath: path.to_string(),
                message: format!("missing attribute '{key}'"),
            }),
            Some((_, found)) if found != value => differences.push(Difference {
                xpath: path.to_string(),
                message: format!(
                    "attribute '{key}' expected '{value}' but found '{found}'"
                ),
            }),
            Some(_) => {}
        }
    }
    for (key, _) in &actual_attributes {
        if !expected_attributes.iter().any(|(k, _)| k == key) {
            differences.push(Difference {
                xpath: path.to_string(),
                message: format!("unexpected attribute '{key}'"),
            });
        }
    }
}
