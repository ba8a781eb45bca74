//! Recursive evaluation of the expected-result assertion tree.
//!
//! Most leaf assertions work by re-invoking the engine with the observed
//! result bound to `$result` and testing for a single boolean `true`
//! (the TrueSingleton shape). Composite assertions recurse, left to right,
//! short-circuiting on the first decisive child.

use std::path::Path;

use tracing::warn;
use xqts_engine_traits::{
    is_subtype_of, EngineConnection, QueryError, QueryOutcome, QueryRequest, Sequence, XdmItem,
};

use crate::catalog::Assertion;
use crate::error::RunnerError;
use crate::queries;
use crate::timings::TimingTotals;
use crate::xmldiff;

/// Upper bound on the rendered actual sequence embedded in failure reasons.
const MAX_RENDERED_ACTUAL: usize = 1024;

/// Outcome of checking an assertion. Three variants only: a skipped
/// assumption cannot occur here by construction.
#[derive(Debug)]
pub enum Checked {
    Pass,
    Failure(String),
    Error(RunnerError),
}

/// Result of a helper-query invocation, with engine failures already split
/// from expected XQuery errors. Fatal engine failures are not represented;
/// they propagate as `Err` from the evaluator.
enum HelperOutcome {
    Value(Sequence),
    Query(QueryError),
    Engine(RunnerError),
}

pub struct AssertionEvaluator<'a, C: EngineConnection> {
    conn: &'a mut C,
    timings: &'a mut TimingTotals,
    /// Directory of the test-case file; companion files resolve against it
    case_dir: &'a Path,
}

impl<'a, C: EngineConnection> AssertionEvaluator<'a, C> {
    pub fn new(conn: &'a mut C, timings: &'a mut TimingTotals, case_dir: &'a Path) -> Self {
        Self {
            conn,
            timings,
            case_dir,
        }
    }

    /// Check the primary query's outcome against the expected assertion.
    /// `Err` carries only fatal engine failures.
    pub fn verify(
        &mut self,
        expected: &Assertion,
        outcome: &QueryOutcome,
    ) -> Result<Checked, RunnerError> {
        match outcome {
            QueryOutcome::Error(error) => Ok(self.verify_error(expected, error)),
            QueryOutcome::Sequence(result) => self.check(expected, result),
        }
    }

    /// The primary query raised an XQuery error: only a matching expected
    /// error (possibly nested in `any-of`) passes.
    fn verify_error(&self, expected: &Assertion, error: &QueryError) -> Checked {
        match expected {
            Assertion::Error(code) if *code == error.code => Checked::Pass,
            Assertion::AnyOf(children) if any_of_matches_error(children, error) => Checked::Pass,
            _ => Checked::Failure(format!(
                "expected {expected:?}, but query raised {error}"
            )),
        }
    }

    fn check(&mut self, assertion: &Assertion, result: &Sequence) -> Result<Checked, RunnerError> {
        match assertion {
            Assertion::AllOf(children) => {
                for child in children {
                    match self.check(child, result)? {
                        Checked::Pass => continue,
                        decisive => return Ok(decisive),
                    }
                }
                Ok(Checked::Pass)
            }

            Assertion::AnyOf(children) => {
                let mut reasons = Vec::with_capacity(children.len());
                for child in children {
                    match self.check(child, result)? {
                        Checked::Pass => return Ok(Checked::Pass),
                        Checked::Failure(reason) => reasons.push(reason),
                        Checked::Error(error) => reasons.push(error.to_string()),
                    }
                }
                Ok(Checked::Failure(format!(
                    "no alternative matched: [{}]",
                    reasons.join("; ")
                )))
            }

            Assertion::Assert(xpath) => self.boolean_assertion(
                queries::assert_query(xpath),
                result,
                format!("assertion '{xpath}' did not hold"),
            ),

            Assertion::AssertCount(expected) => {
                if result.item_count() == *expected {
                    Ok(Checked::Pass)
                } else {
                    self.failure_with_actual(
                        result,
                        format!("expected {expected} items, found {}", result.item_count()),
                    )
                }
            }

            Assertion::AssertDeepEq(expected) => self.boolean_assertion(
                queries::assert_deep_eq_query(expected),
                result,
                format!("result is not deep-equal to ({expected})"),
            ),

            Assertion::AssertEmpty => {
                if result.is_empty() {
                    Ok(Checked::Pass)
                } else {
                    self.failure_with_actual(
                        result,
                        format!("expected empty sequence, found {} items", result.item_count()),
                    )
                }
            }

            Assertion::AssertEq(expected) => self.boolean_assertion(
                queries::assert_eq_query(expected),
                result,
                format!("result is not equal to {expected}"),
            ),

            Assertion::AssertFalse => {
                if is_boolean_singleton(result, false) {
                    Ok(Checked::Pass)
                } else {
                    self.failure_with_actual(result, "expected the single boolean false".to_string())
                }
            }

            Assertion::AssertPermutation(expected) => self.boolean_assertion(
                queries::assert_permutation_query(expected),
                result,
                format!("result is not a permutation of ({expected})"),
            ),

            Assertion::AssertSerializationError(code) => {
                self.assert_serialization_error(code, result)
            }

            Assertion::AssertStringValue {
                value,
                normalize_space,
            } => self.assert_string_value(value, *normalize_space, result),

            Assertion::AssertTrue => {
                if is_boolean_singleton(result, true) {
                    Ok(Checked::Pass)
                } else {
                    self.failure_with_actual(result, "expected the single boolean true".to_string())
                }
            }

            Assertion::AssertType(type_expr) => Ok(self.assert_type(type_expr, result)),

            Assertion::AssertXml {
                xml,
                file,
                ignore_prefixes,
            } => self.assert_xml(xml.as_deref(), file.as_deref(), *ignore_prefixes, result),

            Assertion::Error(code) => self.failure_with_actual(
                result,
                format!("expected error {code}, but query returned a result"),
            ),

            Assertion::SerializationMatches { regex, file, flags } => self
                .serialization_matches(
                    regex.as_deref(),
                    file.as_deref(),
                    flags.as_deref(),
                    result,
                ),
        }
    }

    // ----- helper-query plumbing -----

    /// Run a helper query with the given sequence bound to `$result`.
    fn helper(
        &mut self,
        query: impl Into<String>,
        bound: Sequence,
    ) -> Result<HelperOutcome, RunnerError> {
        let request = QueryRequest {
            query: query.into(),
            cache_compiled: true,
            variables: vec![(queries::RESULT_VARIABLE.to_string(), bound)],
            ..QueryRequest::default()
        };
        match self.conn.execute_query(&request) {
            Ok(evaluated) => {
                self.timings.record(&evaluated);
                Ok(match evaluated.outcome {
                    QueryOutcome::Sequence(seq) => HelperOutcome::Value(seq),
                    QueryOutcome::Error(error) => HelperOutcome::Query(error),
                })
            }
            Err(error) => {
                let error = RunnerError::from(error);
                if error.is_fatal() {
                    Err(error)
                } else {
                    Ok(HelperOutcome::Engine(error))
                }
            }
        }
    }

    /// Run a mechanical helper query that must yield exactly one string.
    /// The inner `Err` turns into an `Error` verdict at the caller.
    fn string_helper(
        &mut self,
        query: impl Into<String>,
        bound: Sequence,
    ) -> Result<Result<String, RunnerError>, RunnerError> {
        Ok(match self.helper(query, bound)? {
            HelperOutcome::Value(seq) => match single_string(&seq) {
                Some(text) => Ok(text),
                None => Err(RunnerError::NonStringSerialization),
            },
            HelperOutcome::Query(error) => Err(RunnerError::HelperQuery(error)),
            HelperOutcome::Engine(error) => Err(error),
        })
    }

    /// Pass iff the helper query yields the TrueSingleton shape; an XQuery
    /// error from the helper is a failed expectation, not an error verdict.
    fn boolean_assertion(
        &mut self,
        query: String,
        result: &Sequence,
        description: String,
    ) -> Result<Checked, RunnerError> {
        match self.helper(query, result.clone())? {
            HelperOutcome::Value(outcome) if is_boolean_singleton(&outcome, true) => {
                Ok(Checked::Pass)
            }
            HelperOutcome::Value(_) => self.failure_with_actual(result, description),
            HelperOutcome::Query(error) => {
                Ok(Checked::Failure(format!("{description}: {error}")))
            }
            HelperOutcome::Engine(error) => Ok(Checked::Error(error)),
        }
    }

    /// A failure reason carrying the bounded adaptive rendering of the
    /// actual sequence. Rendering problems become an `Error` verdict.
    fn failure_with_actual(
        &mut self,
        result: &Sequence,
        description: String,
    ) -> Result<Checked, RunnerError> {
        match self.conn.sequence_to_string_adaptive(result) {
            Ok(rendered) => Ok(Checked::Failure(format!(
                "{description}; actual: {}",
                bounded(&rendered)
            ))),
            Err(error) => {
                let error = RunnerError::from(error);
                if error.is_fatal() {
                    Err(error)
                } else {
                    Ok(Checked::Error(error))
                }
            }
        }
    }

    // ----- individual assertion kinds -----

    fn assert_string_value(
        &mut self,
        value: &str,
        normalize_space: bool,
        result: &Sequence,
    ) -> Result<Checked, RunnerError> {
        let (expected, actual) = if normalize_space {
            let expected = match self.string_helper(
                queries::QUERY_NORMALIZED_SPACE,
                Sequence::of(XdmItem::String(value.to_string())),
            )? {
                Ok(text) => text,
                Err(error) => return Ok(Checked::Error(error)),
            };
            let actual = match self.string_helper(
                queries::QUERY_ASSERT_STRING_VALUE_NORMALIZED_SPACE,
                result.clone(),
            )? {
                Ok(text) => text,
                Err(error) => return Ok(Checked::Error(error)),
            };
            (expected, actual)
        } else {
            let actual =
                match self.string_helper(queries::QUERY_ASSERT_STRING_VALUE, result.clone())? {
                    Ok(text) => text,
                    Err(error) => return Ok(Checked::Error(error)),
                };
            (value.to_string(), actual)
        };

        if expected == actual {
            Ok(Checked::Pass)
        } else {
            Ok(Checked::Failure(format!(
                "expected string value '{expected}', found '{}'",
                bounded(&actual)
            )))
        }
    }

    fn assert_type(&mut self, type_expr: &str, result: &Sequence) -> Checked {
        let parsed = TypeAssertion::parse(type_expr);
        if let TypeAssertion::Explicit {
            parameter_types: Some(parameters),
            ..
        } = &parsed
        {
            warn!(type_expr, parameters = %parameters, "ignoring parameter types in assert-type");
        }
        match parsed {
            TypeAssertion::Wildcard => Checked::Pass,
            TypeAssertion::Explicit {
                base_type,
                cardinality,
                ..
            } => {
                if result.is_empty() {
                    if base_type == "empty" {
                        return Checked::Pass;
                    }
                    return Checked::Failure(format!(
                        "expected type {type_expr}, found the empty sequence"
                    ));
                }
                if !cardinality.accepts(result.item_count()) {
                    return Checked::Failure(format!(
                        "expected cardinality {} for type {type_expr}, found {} items",
                        cardinality.notation(),
                        result.item_count()
                    ));
                }
                for item in result.iter() {
                    if !is_subtype_of(item.type_name(), &base_type) {
                        return Checked::Failure(format!(
                            "expected every item to be of type {base_type}, found {}",
                            item.type_name()
                        ));
                    }
                }
                Checked::Pass
            }
        }
    }

    fn assert_serialization_error(
        &mut self,
        code: &str,
        result: &Sequence,
    ) -> Result<Checked, RunnerError> {
        match self.helper(queries::QUERY_ASSERT_XML_SERIALIZATION, result.clone())? {
            HelperOutcome::Query(error) if code == "*" || error.code == code => Ok(Checked::Pass),
            HelperOutcome::Query(error) => Ok(Checked::Failure(format!(
                "expected serialization error {code}, found {}",
                error.code
            ))),
            HelperOutcome::Value(_) => Ok(Checked::Failure(format!(
                "expected serialization error {code}, but serialization succeeded"
            ))),
            HelperOutcome::Engine(error) => Ok(Checked::Error(error)),
        }
    }

    fn assert_xml(
        &mut self,
        xml: Option<&str>,
        file: Option<&Path>,
        ignore_prefixes: bool,
        result: &Sequence,
    ) -> Result<Checked, RunnerError> {
        let expected = match self.companion_text(xml, file) {
            Ok(text) => text,
            Err(error) => return Ok(Checked::Error(error)),
        };

        // Parse the expected fragment behind an artificial wrapper so that
        // multi-root and text-only fragments are well-formed.
        let wrapper = queries::IGNORABLE_WRAPPER;
        let wrapped = format!("<{wrapper}>{expected}</{wrapper}>");
        let wrapper_doc = match self.conn.parse_xml(wrapped.as_bytes()) {
            Ok(doc) => doc,
            Err(error) => {
                let error = RunnerError::from(error);
                if error.is_fatal() {
                    return Err(error);
                }
                return Ok(Checked::Error(error));
            }
        };
        let children = match self.helper(queries::QUERY_WRAPPER_CHILDREN, wrapper_doc)? {
            HelperOutcome::Value(seq) => seq,
            HelperOutcome::Query(error) => {
                return Ok(Checked::Error(RunnerError::HelperQuery(error)))
            }
            HelperOutcome::Engine(error) => return Ok(Checked::Error(error)),
        };

        let expected_strings = match self.serialize_items(&children)? {
            Ok(strings) => strings,
            Err(error) => return Ok(Checked::Error(error)),
        };
        let actual_strings = match self.serialize_items(result)? {
            Ok(strings) => strings,
            Err(error) => return Ok(Checked::Error(error)),
        };

        if expected_strings.len() != actual_strings.len() {
            return self.failure_with_actual(
                result,
                format!(
                    "expected {} XML nodes, found {}",
                    expected_strings.len(),
                    actual_strings.len()
                ),
            );
        }

        let mut reported = Vec::new();
        for (expected, actual) in expected_strings.iter().zip(actual_strings.iter()) {
            if expected == actual {
                continue;
            }
            match xmldiff::compare(expected, actual, ignore_prefixes) {
                Ok(differences) => {
                    reported.extend(differences.iter().map(ToString::to_string));
                }
                Err(error) => {
                    return Ok(Checked::Error(RunnerError::XmlDiff(error.to_string())))
                }
            }
        }

        if reported.is_empty() {
            Ok(Checked::Pass)
        } else {
            Ok(Checked::Failure(format!(
                "XML differs: {}",
                reported.join("; ")
            )))
        }
    }

    /// Serialize each item of a sequence on its own, yielding one canonical
    /// string per node.
    fn serialize_items(
        &mut self,
        sequence: &Sequence,
    ) -> Result<Result<Vec<String>, RunnerError>, RunnerError> {
        let mut strings = Vec::with_capacity(sequence.item_count());
        for index in 0..sequence.item_count() {
            let Some(single) = sequence.singleton(index) else {
                continue;
            };
            match self.string_helper(queries::QUERY_ASSERT_XML_SERIALIZATION, single)? {
                Ok(text) => strings.push(text),
                Err(error) => return Ok(Err(error)),
            }
        }
        Ok(Ok(strings))
    }

    fn serialization_matches(
        &mut self,
        regex: Option<&str>,
        file: Option<&Path>,
        flags: Option<&str>,
        result: &Sequence,
    ) -> Result<Checked, RunnerError> {
        let pattern = match self.companion_text(regex, file) {
            Ok(text) => text,
            Err(error) => return Ok(Checked::Error(error)),
        };
        let serialized =
            match self.string_helper(queries::QUERY_ASSERT_XML_SERIALIZATION, result.clone())? {
                Ok(text) => text,
                Err(error) => return Ok(Checked::Error(error)),
            };

        let flags = flags.unwrap_or_default();
        let query = queries::serialization_matches_query(&pattern, flags);
        match self.helper(query, Sequence::of(XdmItem::String(serialized.clone())))? {
            HelperOutcome::Value(outcome) if is_boolean_singleton(&outcome, true) => {
                Ok(Checked::Pass)
            }
            HelperOutcome::Value(_) => Ok(Checked::Failure(format!(
                "serialization '{}' does not match '{pattern}' with flags '{flags}'",
                bounded(&serialized)
            ))),
            HelperOutcome::Query(error) => Ok(Checked::Failure(format!(
                "serialization match against '{pattern}' failed: {error}"
            ))),
            HelperOutcome::Engine(error) => Ok(Checked::Error(error)),
        }
    }

    /// An assertion's expected text: inline literal or companion file.
    fn companion_text(
        &self,
        literal: Option<&str>,
        file: Option<&Path>,
    ) -> Result<String, RunnerError> {
        match (literal, file) {
            (Some(text), _) => Ok(text.to_string()),
            (None, Some(relative)) => {
                let path = self.case_dir.join(relative);
                std::fs::read_to_string(&path).map_err(|source| RunnerError::Io { path, source })
            }
            (None, None) => Err(RunnerError::XmlDiff(
                "assertion carries neither inline content nor a file".to_string(),
            )),
        }
    }
}

/// Whether the expected `any-of` tree contains an error assertion matching
/// the raised error, expanding nested `any-of` alternatives.
fn any_of_matches_error(children: &[Assertion], error: &QueryError) -> bool {
    children.iter().any(|child| match child {
        Assertion::Error(code) => *code == error.code,
        Assertion::AnyOf(nested) => any_of_matches_error(nested, error),
        _ => false,
    })
}

/// The TrueSingleton shape (and its false twin): exactly one boolean item
/// with the given value, read off the item directly rather than via EBV.
fn is_boolean_singleton(sequence: &Sequence, value: bool) -> bool {
    sequence.item_count() == 1
        && sequence.get(0).and_then(XdmItem::as_boolean) == Some(value)
}

fn single_string(sequence: &Sequence) -> Option<String> {
    if sequence.item_count() != 1 {
        return None;
    }
    sequence.get(0)?.as_string().map(str::to_string)
}

fn bounded(text: &str) -> String {
    if text.chars().count() <= MAX_RENDERED_ACTUAL {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(MAX_RENDERED_ACTUAL).collect();
        clipped.push_str("...");
        clipped
    }
}

// ----- assert-type parsing -----

/// Number of items a sequence type admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ZeroOrOne,
    ExactlyOne,
    OneOrMore,
    ZeroOrMore,
}

impl Cardinality {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Cardinality::ZeroOrOne => count <= 1,
            Cardinality::ExactlyOne => count == 1,
            Cardinality::OneOrMore => count >= 1,
            Cardinality::ZeroOrMore => true,
        }
    }

    pub fn notation(&self) -> &'static str {
        match self {
            Cardinality::ZeroOrOne => "?",
            Cardinality::ExactlyOne => "1",
            Cardinality::OneOrMore => "+",
            Cardinality::ZeroOrMore => "*",
        }
    }
}

/// A parsed `assert-type` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAssertion {
    /// `*`: accepts any result, the empty sequence included
    Wildcard,
    Explicit {
        base_type: String,
        /// Parameter types, e.g. the `xs:string` in `map(xs:string)`; parsed
        /// but deliberately not checked
        parameter_types: Option<String>,
        cardinality: Cardinality,
    },
}

/// Node-kind and function-ish names whose parentheses are part of the type
/// name rather than parameter types.
const NODE_KINDS: [&str; 7] = [
    "document-node",
    "element",
    "attribute",
    "text",
    "comment",
    "processing-instruction",
    "namespace-node",
];

impl TypeAssertion {
    pub fn parse(type_expr: &str) -> Self {
        let trimmed = type_expr.trim();
        if trimmed == "*" {
            return TypeAssertion::Wildcard;
        }

        let (body, cardinality) = match trimmed.chars().last() {
            Some('?') => (&trimmed[..trimmed.len() - 1], Cardinality::ZeroOrOne),
            Some('*') => (&trimmed[..trimmed.len() - 1], Cardinality::ZeroOrMore),
            Some('+') => (&trimmed[..trimmed.len() - 1], Cardinality::OneOrMore),
            Some('1') => (&trimmed[..trimmed.len() - 1], Cardinality::ExactlyOne),
            _ => (trimmed, Cardinality::ExactlyOne),
        };
        let body = body.trim();

        if body == "empty-sequence()" || body == "empty" {
            return TypeAssertion::Explicit {
                base_type: "empty".to_string(),
                parameter_types: None,
                cardinality,
            };
        }

        let Some((name, rest)) = body.split_once('(') else {
            return TypeAssertion::Explicit {
                base_type: body.to_string(),
                parameter_types: None,
                cardinality,
            };
        };
        let inner = rest.strip_suffix(')').unwrap_or(rest).trim();
        let parameter_types = (!inner.is_empty()).then(|| inner.to_string());
        let base_type = if NODE_KINDS.contains(&name) || name == "node" {
            format!("{name}()")
        } else {
            name.to_string()
        };
        TypeAssertion::Explicit {
            base_type,
            parameter_types,
            cardinality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_atomic_type() {
        assert_eq!(
            TypeAssertion::parse("xs:integer"),
            TypeAssertion::Explicit {
                base_type: "xs:integer".into(),
                parameter_types: None,
                cardinality: Cardinality::ExactlyOne,
            }
        );
    }

    #[test]
    fn parses_cardinality_suffixes() {
        for (expr, cardinality) in [
            ("xs:string?", Cardinality::ZeroOrOne),
            ("xs:string*", Cardinality::ZeroOrMore),
            ("xs:string+", Cardinality::OneOrMore),
        ] {
            assert_eq!(
                TypeAssertion::parse(expr),
                TypeAssertion::Explicit {
                    base_type: "xs:string".into(),
                    parameter_types: None,
                    cardinality,
                }
            );
        }
    }

    #[test]
    fn parses_wildcard() {
        assert_eq!(TypeAssertion::parse("*"), TypeAssertion::Wildcard);
        assert_eq!(TypeAssertion::parse(" * "), TypeAssertion::Wildcard);
    }

    #[test]
    fn node_kind_parens_are_not_parameters() {
        assert_eq!(
            TypeAssertion::parse("document-node()"),
            TypeAssertion::Explicit {
                base_type: "document-node()".into(),
                parameter_types: None,
                cardinality: Cardinality::ExactlyOne,
            }
        );
    }

    #[test]
    fn map_parameters_are_recorded_but_separate() {
        assert_eq!(
            TypeAssertion::parse("map(xs:string, xs:integer)"),
            TypeAssertion::Explicit {
                base_type: "map".into(),
                parameter_types: Some("xs:string, xs:integer".into()),
                cardinality: Cardinality::ExactlyOne,
            }
        );
    }

    #[test]
    fn empty_sequence_type() {
        assert_eq!(
            TypeAssertion::parse("empty-sequence()"),
            TypeAssertion::Explicit {
                base_type: "empty".into(),
                parameter_types: None,
                cardinality: Cardinality::ExactlyOne,
            }
        );
    }

    #[test]
    fn cardinality_predicates() {
        assert!(Cardinality::ZeroOrOne.accepts(0));
        assert!(Cardinality::ZeroOrOne.accepts(1));
        assert!(!Cardinality::ZeroOrOne.accepts(2));
        assert!(!Cardinality::ExactlyOne.accepts(0));
        assert!(Cardinality::OneOrMore.accepts(5));
        assert!(Cardinality::ZeroOrMore.accepts(0));
    }

    #[test]
    fn true_singleton_shape() {
        assert!(is_boolean_singleton(
            &Sequence::of(XdmItem::Boolean(true)),
            true
        ));
        assert!(!is_boolean_singleton(
            &Sequence::of(XdmItem::Boolean(false)),
            true
        ));
        assert!(!is_boolean_singleton(
            &Sequence::of(XdmItem::String("true".into())),
            true
        ));
        assert!(!is_boolean_singleton(
            &Sequence::new(vec![XdmItem::Boolean(true), XdmItem::Boolean(true)]),
            true
        ));
        assert!(!is_boolean_singleton(&Sequence::empty(), true));
    }

    #[test]
    fn bounded_clips_long_renderings() {
        let long = "x".repeat(MAX_RENDERED_ACTUAL + 10);
        let clipped = bounded(&long);
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), MAX_RENDERED_ACTUAL + 3);
        assert_eq!(bounded("short"), "short");
    }

    #[test]
    fn any_of_error_matching_expands_nested_alternatives() {
        let error = QueryError::new("FORG0001", "bad cast");
        let children = vec![
            Assertion::AssertTrue,
            Assertion::AnyOf(vec![Assertion::Error("FORG0001".into())]),
        ];
        assert!(any_of_matches_error(&children, &error));
        assert!(!any_of_matches_error(
            &[Assertion::Error("XPTY0004".into())],
            &error
        ));
    }
}
