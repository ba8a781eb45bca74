//! The test-case runner: a single-inbox actor.
//!
//! One message is processed at a time; a test-case executes synchronously
//! end-to-end once its resources are resolved. The only asynchrony is the
//! request/reply exchange with the resource cache, during which other
//! test-cases make progress.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};

use tracing::{debug, error, warn};
use xqts_engine_traits::{EngineConnection, QueryEngine};

use crate::assertions::{AssertionEvaluator, Checked};
use crate::catalog::{TestCase, TestCaseId};
use crate::context;
use crate::error::RunnerError;
use crate::messages::{CacheRequest, ManagerMessage, ResourceError, RunTestCase, RunnerMessage};
use crate::pending::{PendingCases, ResolvedEnvironment, ResourcePaths};
use crate::timings::TimingTotals;
use crate::verdict::TestResult;

/// A test-case whose resources are resolved and which is ready to execute.
#[derive(Debug)]
struct InternalRun {
    request: RunTestCase,
    env: ResolvedEnvironment,
}

pub struct Runner<E: QueryEngine> {
    engine: E,
    cache: Sender<CacheRequest>,
    pending: PendingCases,
    /// Ready cases, drained after each inbound message
    internal: VecDeque<InternalRun>,
}

impl<E: QueryEngine> Runner<E> {
    pub fn new(engine: E, cache: Sender<CacheRequest>) -> Self {
        Self {
            engine,
            cache,
            pending: PendingCases::new(),
            internal: VecDeque::new(),
        }
    }

    /// Process messages until the inbox closes. Returns early only on a
    /// fatal engine failure, which the host is expected to treat as a
    /// runner crash.
    pub fn run(mut self, inbox: Receiver<RunnerMessage>) -> Result<(), RunnerError> {
        while let Ok(message) = inbox.recv() {
            self.handle(message)?;
        }
        Ok(())
    }

    /// Handle one inbound message, then execute every test-case it made
    /// ready. `Err` carries only fatal engine failures.
    pub fn handle(&mut self, message: RunnerMessage) -> Result<(), RunnerError> {
        self.dispatch(message);
        while let Some(run) = self.internal.pop_front() {
            if let Err(failure) = self.run_internal(run) {
                error!(error = %failure, "fatal engine failure, stopping runner");
                return Err(failure);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, message: RunnerMessage) {
        match message {
            RunnerMessage::RunTestCase(run) => self.on_run_test_case(run),
            RunnerMessage::CachedResource { path, bytes } => {
                debug!(path = %path.display(), "resource delivered");
                let ready = self.pending.deliver(&path, &bytes);
                for id in ready {
                    if let Some(case) = self.pending.take(&id) {
                        self.internal.push_back(InternalRun {
                            request: case.request,
                            env: case.env,
                        });
                    }
                }
            }
            RunnerMessage::ResourceGetError { path, error } => {
                debug!(path = %path.display(), %error, "resource fetch failed");
                for case in self.pending.fail(&path) {
                    self.abort_case(case.request, &path, &error);
                }
            }
        }
    }

    fn on_run_test_case(&mut self, run: RunTestCase) {
        let id = TestCaseId::new(&run.test_set.name, &run.test_case.name);
        debug!(%id, "test case submitted");

        if run.test_case.test.is_none() {
            let (compilation, execution) = TimingTotals::new().totals();
            send_manager(
                &run.manager,
                ManagerMessage::RunningTestCase {
                    test_set: run.test_set.clone(),
                    test_case: run.test_case.name.clone(),
                },
            );
            send_manager(
                &run.manager,
                ManagerMessage::RanTestCase {
                    test_set: run.test_set,
                    result: TestResult::error(
                        &id,
                        RunnerError::InvalidTestCase,
                        compilation,
                        execution,
                    ),
                },
            );
            return;
        }

        let paths = ResourcePaths::of(&run.test_case);
        if paths.is_empty() {
            self.internal.push_back(InternalRun {
                request: run,
                env: ResolvedEnvironment::default(),
            });
            return;
        }

        let requests: Vec<_> = paths.iter().cloned().collect();
        if !self.pending.register(id.clone(), run, &paths) {
            debug!(%id, "duplicate submission ignored");
            return;
        }
        for path in requests {
            if self.cache.send(CacheRequest::GetResource { path }).is_err() {
                warn!("resource cache receiver dropped");
            }
        }
    }

    /// A dependency failed to fetch: the waiting case errors out without
    /// ever touching the engine.
    fn abort_case(&self, request: RunTestCase, path: &Path, cause: &ResourceError) {
        let id = TestCaseId::new(&request.test_set.name, &request.test_case.name);
        let (compilation, execution) = TimingTotals::new().totals();
        send_manager(
            &request.manager,
            ManagerMessage::RunningTestCase {
                test_set: request.test_set.clone(),
                test_case: request.test_case.name.clone(),
            },
        );
        send_manager(
            &request.manager,
            ManagerMessage::RanTestCase {
                test_set: request.test_set,
                result: TestResult::error(
                    &id,
                    RunnerError::Resource {
                        path: path.to_path_buf(),
                        source: cause.clone(),
                    },
                    compilation,
                    execution,
                ),
            },
        );
    }

    fn run_internal(&mut self, run: InternalRun) -> Result<(), RunnerError> {
        let InternalRun { request, env } = run;
        let RunTestCase {
            test_set,
            test_case,
            manager,
        } = request;
        let id = TestCaseId::new(&test_set.name, &test_case.name);

        send_manager(
            &manager,
            ManagerMessage::RunningTestCase {
                test_set: test_set.clone(),
                test_case: test_case.name.clone(),
            },
        );

        let result = self.execute(&id, &test_case, &env)?;
        send_manager(&manager, ManagerMessage::RanTestCase { test_set, result });
        Ok(())
    }

    /// Execute one test-case synchronously: build the context, run the
    /// primary query, evaluate the assertion tree, construct the verdict.
    /// `Err` carries only fatal engine failures.
    fn execute(
        &mut self,
        id: &TestCaseId,
        test_case: &TestCase,
        resolved: &ResolvedEnvironment,
    ) -> Result<TestResult, RunnerError> {
        let mut timings = TimingTotals::new();

        let mut conn = match self.engine.acquire() {
            Ok(conn) => conn,
            Err(failure) => {
                let failure = RunnerError::from(failure);
                if failure.is_fatal() {
                    return Err(failure);
                }
                let (compilation, execution) = timings.totals();
                return Ok(TestResult::error(id, failure, compilation, execution));
            }
        };

        let checked = match Self::try_execute(&mut conn, test_case, resolved, &mut timings) {
            Ok(checked) => checked,
            Err(failure) if failure.is_fatal() => return Err(failure),
            Err(failure) => Checked::Error(failure),
        };

        let (compilation, execution) = timings.totals();
        let result = match checked {
            Checked::Pass => TestResult::pass(id, compilation, execution),
            Checked::Failure(reason) => TestResult::failure(id, reason, compilation, execution),
            Checked::Error(cause) => TestResult::error(id, cause, compilation, execution),
        };
        // The engine connection outlives the verdict construction and is
        // released here, on success and failure paths alike.
        drop(conn);
        Ok(result)
    }

    fn try_execute(
        conn: &mut E::Conn,
        test_case: &TestCase,
        resolved: &ResolvedEnvironment,
        timings: &mut TimingTotals,
    ) -> Result<Checked, RunnerError> {
        let request = context::build_request(conn, timings, test_case, resolved)?;
        let evaluated = conn.execute_query(&request)?;
        timings.record(&evaluated);

        let expected = test_case
            .result
            .as_ref()
            .ok_or(RunnerError::MissingExpectedResult)?;
        let case_dir = test_case.file.parent().unwrap_or_else(|| Path::new("."));
        let mut evaluator = AssertionEvaluator::new(conn, timings, case_dir);
        evaluator.verify(expected, &evaluated.outcome)
    }
}

fn send_manager(manager: &Sender<ManagerMessage>, message: ManagerMessage) {
    if manager.send(message).is_err() {
        warn!("manager receiver dropped");
    }
}
