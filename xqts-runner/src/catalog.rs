//! Test-case descriptors and the assertion tree.
//!
//! These are the values the external catalog parser hands to the runner; the
//! runner never reads catalog XML itself.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Opaque reference to a test set, passed through to the manager unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSetRef {
    pub name: String,
}

impl TestSetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Unique identity of a test case within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestCaseId {
    pub test_set: String,
    pub test_case: String,
}

impl TestCaseId {
    pub fn new(test_set: impl Into<String>, test_case: impl Into<String>) -> Self {
        Self {
            test_set: test_set.into(),
            test_case: test_case.into(),
        }
    }
}

impl std::fmt::Display for TestCaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.test_set, self.test_case)
    }
}

/// The query of a test case: inline text or a path to a query file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestSource {
    Inline(String),
    Path(PathBuf),
}

/// A single test case as parsed from a test-set file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// File the case was parsed from; its URI form is the default base URI
    pub file: PathBuf,
    /// The test query; `None` marks a structurally invalid case
    pub test: Option<TestSource>,
    pub environment: Option<Environment>,
    /// Expected result assertion
    pub result: Option<Assertion>,
}

/// Test environment configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Environment {
    pub name: Option<String>,
    pub static_base_uri: Option<String>,
    pub schemas: Vec<SchemaRef>,
    pub sources: Vec<Source>,
    pub resources: Vec<ResourceRef>,
    pub collections: Vec<Collection>,
    pub params: Vec<Param>,
}

/// Source document for an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub file: PathBuf,
    /// `"."` makes the document the context item; no role makes it an
    /// available document (when a URI is present)
    pub role: Option<String>,
    /// URI for `fn:doc()` etc.
    pub uri: Option<String>,
    pub encoding: Option<String>,
}

/// Schema reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRef {
    pub file: PathBuf,
    pub uri: Option<String>,
}

/// Unparsed text resource for an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub file: PathBuf,
    pub uri: String,
    pub encoding: Option<String>,
}

/// Collection of source documents, addressable via `fn:collection(uri)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub uri: String,
    pub sources: Vec<Source>,
}

/// External variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Declared sequence type, e.g. `xs:integer`
    pub as_type: Option<String>,
    /// Expression computing the value; absent means the empty sequence
    pub select: Option<String>,
}

/// Expected result assertions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assertion {
    /// All nested assertions must pass
    AllOf(Vec<Assertion>),
    /// At least one nested assertion must pass
    AnyOf(Vec<Assertion>),
    /// Custom XPath over `$result`; passes iff it yields a single `true`
    Assert(String),
    /// Result count equals expected
    AssertCount(usize),
    /// Deep equality with a sequence expression
    AssertDeepEq(String),
    /// Result is empty
    AssertEmpty,
    /// Result equals expected value under `eq`
    AssertEq(String),
    /// Result is the single boolean `false`
    AssertFalse,
    /// Result is a permutation of the expected sequence
    AssertPermutation(String),
    /// Serializing the result raises the given error code (`"*"` matches any)
    AssertSerializationError(String),
    /// Result string value matches
    AssertStringValue {
        value: String,
        normalize_space: bool,
    },
    /// Result is the single boolean `true`
    AssertTrue,
    /// Every result item matches the given sequence type
    AssertType(String),
    /// XML comparison against a literal or a companion file
    AssertXml {
        xml: Option<String>,
        file: Option<PathBuf>,
        ignore_prefixes: bool,
    },
    /// Expected error code
    Error(String),
    /// Serialization of the result matches a regular expression
    SerializationMatches {
        regex: Option<String>,
        file: Option<PathBuf>,
        flags: Option<String>,
    },
}
