#![allow(dead_code)]

//! Fake driver and log sink shared by the integration tests.
//!
//! Log records and delegated calls land in one [`Journal`] so tests can
//! check the order in which they happened.

use std::sync::{Arc, Mutex};

use drizzle_debug::{
    BeginTx, Context, Dialect, Driver, DriverError, ExecContext, ExecQuerier, ExecResult, Field,
    QueryContext, Result, Rows, Tx, TxOptions, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Exec { query: String, args: Vec<Value> },
    ExecContext { query: String, args: Vec<Value> },
    Query { query: String, args: Vec<Value> },
    QueryContext { query: String, args: Vec<Value> },
    Tx,
    BeginTx(TxOptions),
    TxExec { query: String, args: Vec<Value> },
    TxExecContext { query: String, args: Vec<Value> },
    TxQuery { query: String, args: Vec<Value> },
    TxQueryContext { query: String, args: Vec<Value> },
    Commit,
    Rollback,
    Close,
}

#[derive(Debug, Clone)]
pub struct Record {
    pub ctx: Context,
    pub message: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Log(Record),
    Call(Call),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<Record> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Log(r) => Some(r),
                Event::Call(_) => None,
            })
            .collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Call(c) => Some(c),
                Event::Log(_) => None,
            })
            .collect()
    }

    /// A logging function that records into this journal.
    pub fn log_fn(&self) -> impl Fn(&Context, &str, &[Field]) + Send + Sync + 'static {
        let journal = self.clone();
        move |ctx: &Context, msg: &str, fields: &[Field]| {
            journal.push(Event::Log(Record {
                ctx: ctx.clone(),
                message: msg.to_string(),
                fields: fields.to_vec(),
            }))
        }
    }
}

/// Behavior knobs for [`FakeDriver`] and the transactions it starts.
#[derive(Debug, Clone, Default)]
pub struct Behavior {
    /// Driver offers `ExecContext`, `QueryContext` and `BeginTx`.
    pub extended: bool,
    /// Transactions offer `ExecContext` and `QueryContext`.
    pub tx_extended: bool,
    pub fail_begin: Option<String>,
    pub fail_exec: Option<String>,
    pub fail_commit: Option<String>,
    pub fail_rollback: Option<String>,
}

pub struct FakeDriver {
    journal: Journal,
    behavior: Behavior,
}

impl FakeDriver {
    pub fn new(journal: &Journal, behavior: Behavior) -> Self {
        Self {
            journal: journal.clone(),
            behavior,
        }
    }

    /// Only the required driver operations.
    pub fn basic(journal: &Journal) -> Self {
        Self::new(journal, Behavior::default())
    }

    /// Every optional capability, on the driver and its transactions.
    pub fn extended(journal: &Journal) -> Self {
        Self::new(
            journal,
            Behavior {
                extended: true,
                tx_extended: true,
                ..Behavior::default()
            },
        )
    }

    fn record(&self, call: Call) {
        self.journal.push(Event::Call(call));
    }

    fn start(&self) -> Result<Box<dyn Tx>> {
        if let Some(msg) = &self.behavior.fail_begin {
            return Err(DriverError::TransactionError(msg.clone()));
        }
        Ok(Box::new(FakeTx {
            journal: self.journal.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

pub fn sample_rows() -> Rows {
    Rows::new(
        vec!["id".to_string(), "name".to_string()],
        vec![vec![Value::Integer(1), Value::Text("Alice".to_string())]],
    )
}

fn exec_result(behavior: &Behavior) -> Result<ExecResult> {
    match &behavior.fail_exec {
        Some(msg) => Err(DriverError::ExecutionError(msg.clone())),
        None => Ok(ExecResult {
            rows_affected: 1,
            last_insert_id: Some(7),
        }),
    }
}

impl ExecQuerier for FakeDriver {
    fn exec(&self, _ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        self.record(Call::Exec {
            query: query.to_string(),
            args: args.to_vec(),
        });
        *res = exec_result(&self.behavior)?;
        Ok(())
    }

    fn query(&self, _ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        self.record(Call::Query {
            query: query.to_string(),
            args: args.to_vec(),
        });
        *rows = sample_rows();
        Ok(())
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        self.behavior.extended.then_some(self as &dyn ExecContext)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        self.behavior.extended.then_some(self as &dyn QueryContext)
    }
}

impl ExecContext for FakeDriver {
    fn exec_context(&self, _ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        self.record(Call::ExecContext {
            query: query.to_string(),
            args: args.to_vec(),
        });
        exec_result(&self.behavior)
    }
}

impl QueryContext for FakeDriver {
    fn query_context(&self, _ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        self.record(Call::QueryContext {
            query: query.to_string(),
            args: args.to_vec(),
        });
        Ok(sample_rows())
    }
}

impl Driver for FakeDriver {
    fn tx(&self, _ctx: &Context) -> Result<Box<dyn Tx>> {
        self.record(Call::Tx);
        self.start()
    }

    fn close(&self) -> Result<()> {
        self.record(Call::Close);
        Ok(())
    }

    fn dialect(&self) -> Dialect {
        Dialect::PostgreSQL
    }

    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        self.behavior.extended.then_some(self as &dyn BeginTx)
    }
}

impl BeginTx for FakeDriver {
    fn begin_tx(&self, _ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        self.record(Call::BeginTx(*opts));
        self.start()
    }
}

pub struct FakeTx {
    journal: Journal,
    behavior: Behavior,
}

impl FakeTx {
    fn record(&self, call: Call) {
        self.journal.push(Event::Call(call));
    }
}

impl ExecQuerier for FakeTx {
    fn exec(&self, _ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        self.record(Call::TxExec {
            query: query.to_string(),
            args: args.to_vec(),
        });
        *res = exec_result(&self.behavior)?;
        Ok(())
    }

    fn query(&self, _ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        self.record(Call::TxQuery {
            query: query.to_string(),
            args: args.to_vec(),
        });
        *rows = sample_rows();
        Ok(())
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        self.behavior.tx_extended.then_some(self as &dyn ExecContext)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        self.behavior.tx_extended.then_some(self as &dyn QueryContext)
    }
}

impl ExecContext for FakeTx {
    fn exec_context(&self, _ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        self.record(Call::TxExecContext {
            query: query.to_string(),
            args: args.to_vec(),
        });
        exec_result(&self.behavior)
    }
}

impl QueryContext for FakeTx {
    fn query_context(&self, _ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        self.record(Call::TxQueryContext {
            query: query.to_string(),
            args: args.to_vec(),
        });
        Ok(sample_rows())
    }
}

impl Tx for FakeTx {
    fn commit(self: Box<Self>) -> Result<()> {
        self.record(Call::Commit);
        match &self.behavior.fail_commit {
            Some(msg) => Err(DriverError::TransactionError(msg.clone())),
            None => Ok(()),
        }
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.record(Call::Rollback);
        match &self.behavior.fail_rollback {
            Some(msg) => Err(DriverError::TransactionError(msg.clone())),
            None => Ok(()),
        }
    }
}
