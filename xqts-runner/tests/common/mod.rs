//! Scripted engine double for driving the runner in tests.
//!
//! Replies are keyed by query text; a reply may additionally be pinned to a
//! specific `$result` binding so the same helper query can answer
//! differently per bound sequence. Every request is recorded for
//! inspection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use xqts_runner::engine::{
    EngineConnection, EngineError, Evaluated, NodeInfo, NodeKind, QueryEngine, QueryError,
    QueryOutcome, QueryRequest, Sequence, XdmItem,
};

#[derive(Clone)]
struct ScriptedReply {
    bound: Option<Sequence>,
    outcome: QueryOutcome,
    compilation_ms: u64,
    execution_ms: u64,
}

#[derive(Default)]
struct ScriptState {
    replies: HashMap<String, Vec<ScriptedReply>>,
    engine_failures: HashMap<String, EngineError>,
    parses: HashMap<Vec<u8>, Sequence>,
    executed: Vec<QueryRequest>,
    live_connections: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a reply for a query regardless of its `$result` binding.
    pub fn on_query(&self, query: &str, outcome: QueryOutcome, timings: (u64, u64)) {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(query.to_string())
            .or_default()
            .push(ScriptedReply {
                bound: None,
                outcome,
                compilation_ms: timings.0,
                execution_ms: timings.1,
            });
    }

    /// Script a reply for a query with a specific `$result` binding.
    pub fn on_query_for(
        &self,
        query: &str,
        bound: Sequence,
        outcome: QueryOutcome,
        timings: (u64, u64),
    ) {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(query.to_string())
            .or_default()
            .push(ScriptedReply {
                bound: Some(bound),
                outcome,
                compilation_ms: timings.0,
                execution_ms: timings.1,
            });
    }

    /// Script an engine-level failure for a query.
    pub fn on_engine_failure(&self, query: &str, error: EngineError) {
        self.state
            .lock()
            .unwrap()
            .engine_failures
            .insert(query.to_string(), error);
    }

    /// Script the document produced by parsing the given XML text.
    pub fn on_parse(&self, xml: &str, parsed: Sequence) {
        self.state
            .lock()
            .unwrap()
            .parses
            .insert(xml.as_bytes().to_vec(), parsed);
    }

    /// Every request executed so far, in order.
    pub fn executed(&self) -> Vec<QueryRequest> {
        self.state.lock().unwrap().executed.clone()
    }

    pub fn executed_queries(&self) -> Vec<String> {
        self.executed().into_iter().map(|r| r.query).collect()
    }

    pub fn live_connections(&self) -> usize {
        self.state.lock().unwrap().live_connections
    }
}

impl QueryEngine for ScriptedEngine {
    type Conn = ScriptedConnection;

    fn acquire(&mut self) -> Result<ScriptedConnection, EngineError> {
        let mut state = self.state.lock().unwrap();
        state.live_connections += 1;
        Ok(ScriptedConnection {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct ScriptedConnection {
    state: Arc<Mutex<ScriptState>>,
}

impl Drop for ScriptedConnection {
    fn drop(&mut self) {
        self.state.lock().unwrap().live_connections -= 1;
    }
}

impl EngineConnection for ScriptedConnection {
    fn execute_query(&mut self, request: &QueryRequest) -> Result<Evaluated, EngineError> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(request.clone());
        if let Some(error) = state.engine_failures.get(&request.query) {
            return Err(error.clone());
        }
        let bound = request
            .variables
            .iter()
            .find(|(name, _)| name == "result")
            .map(|(_, seq)| seq.clone());
        let replies = state
            .replies
            .get(&request.query)
            .ok_or_else(|| EngineError::Internal(format!("unscripted query: {}", request.query)))?;
        let reply = replies
            .iter()
            .find(|r| r.bound.is_some() && r.bound == bound)
            .or_else(|| replies.iter().find(|r| r.bound.is_none()))
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "no scripted reply matches the binding for: {}",
                    request.query
                ))
            })?;
        Ok(Evaluated {
            outcome: reply.outcome.clone(),
            compilation_ms: reply.compilation_ms,
            execution_ms: reply.execution_ms,
        })
    }

    fn parse_xml(&mut self, bytes: &[u8]) -> Result<Sequence, EngineError> {
        let state = self.state.lock().unwrap();
        if let Some(parsed) = state.parses.get(bytes) {
            return Ok(parsed.clone());
        }
        Ok(document(&String::from_utf8_lossy(bytes)))
    }

    fn sequence_to_string(&mut self, seq: &Sequence) -> Result<String, EngineError> {
        Ok(seq
            .iter()
            .map(XdmItem::lexical)
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn sequence_to_string_adaptive(&mut self, seq: &Sequence) -> Result<String, EngineError> {
        Ok(format!(
            "({})",
            seq.iter()
                .map(XdmItem::lexical)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

// ----- value construction helpers -----

pub fn int(value: i64) -> XdmItem {
    XdmItem::Integer(value)
}

pub fn boolean(value: bool) -> XdmItem {
    XdmItem::Boolean(value)
}

pub fn string(value: &str) -> XdmItem {
    XdmItem::String(value.to_string())
}

pub fn element(name: &str, serialized: &str) -> XdmItem {
    XdmItem::Node(NodeInfo {
        kind: NodeKind::Element,
        name: Some(name.to_string()),
        value: Some(serialized.to_string()),
    })
}

/// A one-item document-node sequence carrying its source text.
pub fn document(content: &str) -> Sequence {
    Sequence::of(XdmItem::Node(NodeInfo {
        kind: NodeKind::Document,
        name: None,
        value: Some(content.to_string()),
    }))
}

pub fn seq(items: &[XdmItem]) -> Sequence {
    Sequence::new(items.to_vec())
}

pub fn value(sequence: Sequence) -> QueryOutcome {
    QueryOutcome::Sequence(sequence)
}

pub fn query_error(code: &str, message: &str) -> QueryOutcome {
    QueryOutcome::Error(QueryError::new(code, message))
}
