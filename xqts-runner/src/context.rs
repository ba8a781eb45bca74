//! Assembly of the engine request for a test-case's primary query.
//!
//! Builds on the resolved environment the Pending-Cases Index accumulated.
//! Every step short-circuits on first failure; whatever error surfaces here
//! becomes the test-case's `Error` verdict.

use encoding_rs::Encoding;
use xqts_engine_traits::{
    EngineConnection, QueryOutcome, QueryRequest, Sequence, TextResource,
};

use crate::catalog::{TestCase, TestSource};
use crate::error::{Result, RunnerError};
use crate::pending::ResolvedEnvironment;
use crate::timings::TimingTotals;

/// `staticBaseUri` value meaning "no static base URI declared".
pub const UNDEFINED_BASE_URI: &str = "#UNDEFINED";

/// Environment name forcing an empty context sequence.
const EMPTY_ENVIRONMENT: &str = "empty";

/// Build the primary-query request for a test case.
pub fn build_request<C: EngineConnection>(
    conn: &mut C,
    timings: &mut TimingTotals,
    test_case: &TestCase,
    resolved: &ResolvedEnvironment,
) -> Result<QueryRequest> {
    let query = query_text(test_case, resolved)?;
    let base_uri = static_base_uri(test_case);

    let mut request = QueryRequest {
        query,
        cache_compiled: false,
        base_uri: Some(base_uri),
        ..QueryRequest::default()
    };

    let Some(env) = &test_case.environment else {
        return Ok(request);
    };

    request.context = context_sequence(conn, env, resolved)?;

    for source in &env.sources {
        if source.role.is_some() {
            continue;
        }
        let Some(uri) = source.uri.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let bytes = resolved
            .source_bytes(&source.file)
            .ok_or_else(|| RunnerError::MissingSource(source.file.clone()))?;
        let document = conn.parse_xml(bytes)?;
        request.available_documents.push((uri.to_string(), document));
    }

    for collection in &env.collections {
        let mut documents = Vec::with_capacity(collection.sources.len());
        for source in &collection.sources {
            let bytes = resolved
                .source_bytes(&source.file)
                .ok_or_else(|| RunnerError::MissingSource(source.file.clone()))?;
            documents.push(conn.parse_xml(bytes)?);
        }
        request
            .available_collections
            .push((collection.uri.clone(), documents));
    }

    for resource in &env.resources {
        let bytes = resolved
            .resource_bytes(&resource.file)
            .ok_or_else(|| RunnerError::MissingSource(resource.file.clone()))?;
        let text = decode_text_resource(resource.encoding.as_deref(), bytes)?;
        request
            .available_text_resources
            .push((resource.uri.clone(), text));
    }

    for param in &env.params {
        let value = match (&param.select, param.as_type.as_deref()) {
            (None, _) | (_, Some("empty")) => Sequence::empty(),
            (Some(select), _) => {
                let evaluated = conn.execute_query(&QueryRequest::bare(select.clone()))?;
                timings.record(&evaluated);
                match evaluated.outcome {
                    QueryOutcome::Sequence(seq) => seq,
                    QueryOutcome::Error(error) => {
                        return Err(RunnerError::ParamSelect {
                            name: param.name.clone(),
                            source: error,
                        });
                    }
                }
            }
        };
        request.variables.push((param.name.clone(), value));
    }

    Ok(request)
}

fn query_text(test_case: &TestCase, resolved: &ResolvedEnvironment) -> Result<String> {
    match &test_case.test {
        Some(TestSource::Inline(query)) => Ok(query.clone()),
        Some(TestSource::Path(_)) => {
            let bytes = resolved.query.as_ref().ok_or(RunnerError::MissingQuery)?;
            Ok(std::str::from_utf8(bytes)?.to_string())
        }
        None => Err(RunnerError::InvalidTestCase),
    }
}

/// The effective static base URI: the declared one unless it is the
/// `#UNDEFINED` sentinel, else the URI form of the test-case file.
pub fn static_base_uri(test_case: &TestCase) -> String {
    test_case
        .environment
        .as_ref()
        .and_then(|env| env.static_base_uri.as_deref())
        .filter(|uri| *uri != UNDEFINED_BASE_URI)
        .map(str::to_string)
        .unwrap_or_else(|| format!("file://{}", test_case.file.display()))
}

fn context_sequence<C: EngineConnection>(
    conn: &mut C,
    env: &crate::catalog::Environment,
    resolved: &ResolvedEnvironment,
) -> Result<Option<Sequence>> {
    if env.name.as_deref() == Some(EMPTY_ENVIRONMENT) {
        return Ok(Some(Sequence::empty()));
    }
    let Some(source) = env.sources.iter().find(|s| s.role.as_deref() == Some(".")) else {
        return Ok(None);
    };
    let bytes = resolved
        .source_bytes(&source.file)
        .ok_or_else(|| RunnerError::MissingSource(source.file.clone()))?;
    Ok(Some(conn.parse_xml(bytes)?))
}

fn decode_text_resource(encoding: Option<&str>, bytes: &[u8]) -> Result<TextResource> {
    let label = encoding.unwrap_or("utf-8");
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| RunnerError::UnknownCharset(label.to_string()))?;
    let (text, _, _) = encoding.decode(bytes);
    Ok(TextResource {
        charset: encoding.name().to_string(),
        text: text.into_owned(),
    })
}
