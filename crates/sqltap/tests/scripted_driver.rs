//! Behaviour against a driver whose outcomes are scripted per call, for the
//! failure paths SQLite does not produce on demand.

mod common;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use common::{Recorder, Seen};
use sqltap::{
    Connection, Driver, DriverStatement, ErrorInfo, ExecutionStarts, ExecutionStartsSubscriber,
    SqlError, Subscriber, Value,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptedError {
    id: u32,
    message: String,
}

impl std::fmt::Display for ScriptedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "scripted failure #{}: {}", self.id, self.message)
    }
}

impl std::error::Error for ScriptedError {}

impl SqlError for ScriptedError {
    fn sql_state(&self) -> &str {
        "42000"
    }

    fn code(&self) -> Option<i32> {
        Some(self.id as i32)
    }
}

#[derive(Debug)]
enum Outcome {
    Succeed,
    Sentinel(Option<ErrorInfo>),
    Raise(ScriptedError),
}

fn raise(id: u32, message: &str) -> Outcome {
    Outcome::Raise(ScriptedError {
        id,
        message: message.to_string(),
    })
}

#[derive(Default)]
struct ScriptedDriver {
    script: RefCell<VecDeque<Outcome>>,
    last_error: RefCell<Option<ErrorInfo>>,
    calls: Cell<usize>,
}

impl ScriptedDriver {
    fn with(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            script: RefCell::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Pops the next outcome, mapping success to `ok` and a sentinel to
    /// `sentinel`.
    fn next<T>(&self, ok: T, sentinel: T) -> Result<T, ScriptedError> {
        self.calls.set(self.calls.get() + 1);
        let outcome = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => {
                self.last_error.replace(None);
                Ok(ok)
            }
            Outcome::Sentinel(state) => {
                self.last_error.replace(state);
                Ok(sentinel)
            }
            Outcome::Raise(err) => Err(err),
        }
    }
}

struct ScriptedStatement<'conn> {
    driver: &'conn ScriptedDriver,
    rows: Vec<Vec<Value>>,
}

impl DriverStatement for ScriptedStatement<'_> {
    type Error = ScriptedError;

    fn execute(&mut self, _params: &[Value]) -> Result<bool, ScriptedError> {
        self.driver.next(true, false)
    }

    fn row_count(&self) -> usize {
        7
    }

    fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    fn column_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Driver for ScriptedDriver {
    type Error = ScriptedError;
    type Statement<'conn> = ScriptedStatement<'conn>;

    fn exec(&self, _sql: &str) -> Result<Option<usize>, ScriptedError> {
        self.next(Some(4), None)
    }

    fn prepare(&self, _sql: &str) -> Result<Option<ScriptedStatement<'_>>, ScriptedError> {
        let statement = ScriptedStatement {
            driver: self,
            rows: Vec::new(),
        };
        self.next(Some(statement), None)
    }

    fn query(&self, sql: &str) -> Result<Option<ScriptedStatement<'_>>, ScriptedError> {
        self.prepare(sql)
    }

    fn begin_transaction(&self) -> Result<bool, ScriptedError> {
        self.next(true, false)
    }

    fn commit(&self) -> Result<bool, ScriptedError> {
        self.next(true, false)
    }

    fn rollback(&self) -> Result<bool, ScriptedError> {
        self.next(true, false)
    }

    fn last_error(&self) -> Option<ErrorInfo> {
        self.last_error.borrow().clone()
    }

    fn in_transaction(&self) -> bool {
        false
    }
}

fn scripted(outcomes: impl IntoIterator<Item = Outcome>) -> (Connection<ScriptedDriver>, Arc<Recorder>) {
    let mut conn = Connection::new(ScriptedDriver::with(outcomes));
    let recorder = Recorder::new();
    conn.subscribe(recorder.clone());
    (conn, recorder)
}

#[test]
fn exec_returns_the_raised_error_value_unchanged() {
    let (conn, recorder) = scripted([raise(17, "deadlock")]);

    let err = conn.exec("UPDATE t SET v = 1").expect_err("should raise");

    assert_eq!(
        err,
        ScriptedError {
            id: 17,
            message: "deadlock".to_string()
        }
    );
    assert_eq!(
        recorder.seen(),
        vec![
            Seen::starts("UPDATE t SET v = 1"),
            Seen::Failed {
                error: ErrorInfo::new("42000", Some(17), "scripted failure #17: deadlock"),
                params: None,
            },
        ]
    );
}

#[test]
fn exec_success_reports_the_driver_count() {
    let (conn, recorder) = scripted([Outcome::Succeed]);

    assert_eq!(conn.exec("DELETE FROM t").expect("should succeed"), Some(4));
    assert_eq!(recorder.seen()[1], Seen::succeeded(4, None));
}

#[test]
fn sentinel_failure_uses_the_recorded_error_state() {
    let state = ErrorInfo::new("23000", Some(19), "constraint failed");
    let (conn, recorder) = scripted([Outcome::Sentinel(Some(state.clone()))]);

    assert_eq!(conn.exec("INSERT INTO t VALUES (1)").expect("should not raise"), None);
    assert_eq!(recorder.seen()[1].failure(), Some(&state));
}

#[test]
fn sentinel_without_error_state_reports_unknown_failure() {
    let (conn, recorder) = scripted([Outcome::Succeed, Outcome::Sentinel(None)]);

    let mut stmt = conn
        .prepare("SELECT ?")
        .expect("prepare should succeed")
        .expect("statement should be returned");
    let ok = stmt
        .execute(&[Value::Integer(5)])
        .expect("should not raise");

    assert!(!ok);
    assert_eq!(
        recorder.seen().last(),
        Some(&Seen::Failed {
            error: ErrorInfo::unknown(),
            params: Some(vec![Value::Integer(5)]),
        })
    );
}

#[test]
fn query_success_reports_statement_row_count() {
    let (conn, recorder) = scripted([Outcome::Succeed]);

    let stmt = conn
        .query("SELECT * FROM t")
        .expect("query should succeed")
        .expect("statement should be returned");

    assert_eq!(stmt.row_count(), 7);
    assert!(std::ptr::eq(stmt.connection(), &conn));
    assert_eq!(
        recorder.seen(),
        vec![Seen::starts("SELECT * FROM t"), Seen::succeeded(7, None)]
    );
}

#[test]
fn statement_execute_reraises_and_reports_params() {
    let (conn, recorder) = scripted([Outcome::Succeed, raise(3, "busy")]);

    let mut stmt = conn
        .prepare("UPDATE t SET v = ?")
        .expect("prepare should succeed")
        .expect("statement should be returned");
    let err = stmt
        .execute(&[Value::Integer(9)])
        .expect_err("should raise");

    assert_eq!(err.id, 3);
    match recorder.seen().last() {
        Some(Seen::Failed { error, params }) => {
            assert_eq!(error.code, Some(3));
            assert_eq!(params.as_deref(), Some(&[Value::Integer(9)][..]));
        }
        other => panic!("expected a failure event, got {other:?}"),
    }
}

#[test]
fn prepare_raising_emits_nothing() {
    let (conn, recorder) = scripted([raise(1, "syntax")]);

    let err = conn.prepare("SELEC").expect_err("should raise");

    assert_eq!(err.id, 1);
    assert!(recorder.seen().is_empty());
}

#[test]
fn transaction_controls_emit_only_on_success() {
    let (conn, recorder) = scripted([
        raise(11, "cannot begin"),
        Outcome::Succeed,
        Outcome::Sentinel(Some(ErrorInfo::new("HY000", Some(5), "database is locked"))),
        Outcome::Sentinel(None),
        Outcome::Succeed,
    ]);

    let err = conn.begin_transaction().expect_err("begin should raise");
    assert_eq!(err.id, 11);
    assert!(conn.begin_transaction().expect("begin should succeed"));
    assert!(!conn.commit().expect("commit should not raise"));
    assert!(!conn.rollback().expect("rollback should not raise"));
    assert!(conn.rollback().expect("rollback should succeed"));

    assert_eq!(recorder.seen(), vec![Seen::Begin, Seen::Rollback]);
}

struct Panicker;

impl ExecutionStartsSubscriber for Panicker {
    fn on_execution_starts(&self, _event: &ExecutionStarts<'_>) {
        panic!("subscriber failure");
    }
}

impl Subscriber for Panicker {
    fn as_execution_starts(&self) -> Option<&dyn ExecutionStartsSubscriber> {
        Some(self)
    }
}

#[test]
fn panicking_subscriber_aborts_the_operation() {
    let mut conn = Connection::new(ScriptedDriver::default());
    conn.subscribe(Arc::new(Panicker));
    let later = Recorder::new();
    conn.subscribe(later.clone());

    let outcome = catch_unwind(AssertUnwindSafe(|| conn.exec("SELECT 1")));

    assert!(outcome.is_err(), "the panic should reach the caller");
    assert!(later.seen().is_empty(), "later subscribers are not notified");
    assert_eq!(conn.inner().calls.get(), 0, "the driver is never reached");
}
