//! A [`Driver`] over a single [`rusqlite::Connection`].
//!
//! Transactions are plain `BEGIN` / `COMMIT` / `ROLLBACK` statements issued on
//! the shared connection, so only one transaction may be open at a time and
//! statements run through the driver while it is open take part in it.
//! Read-only transactions switch the connection to `PRAGMA query_only` until
//! they finish.

use std::sync::{Arc, Mutex, MutexGuard};

use drizzle_debug_core::{
    BeginTx, Context, Dialect, Driver, DriverError, ExecContext, ExecQuerier, ExecResult,
    IsolationLevel, QueryContext, Result, Rows, Tx, TxOptions, Value,
};
use rusqlite::{Connection as NativeRusqliteConnection, params_from_iter};

type SharedConnection = Arc<Mutex<Option<NativeRusqliteConnection>>>;

// --- Helper Functions ---

fn lock(
    conn: &Mutex<Option<NativeRusqliteConnection>>,
) -> Result<MutexGuard<'_, Option<NativeRusqliteConnection>>> {
    conn.lock()
        .map_err(|e| DriverError::Other(format!("connection lock poisoned: {}", e)))
}

/// Runs `f` on the open connection, failing once the driver was closed.
fn with_conn<T>(
    conn: &Mutex<Option<NativeRusqliteConnection>>,
    f: impl FnOnce(&NativeRusqliteConnection) -> Result<T>,
) -> Result<T> {
    let guard = lock(conn)?;
    let conn = guard
        .as_ref()
        .ok_or_else(|| DriverError::Other("driver is closed".to_string()))?;
    f(conn)
}

fn run(conn: &NativeRusqliteConnection, sql: &str, params: &[Value]) -> Result<ExecResult> {
    let changes = conn.execute(sql, params_from_iter(params.iter()))?;
    Ok(ExecResult {
        rows_affected: changes as u64,
        last_insert_id: Some(conn.last_insert_rowid()),
    })
}

fn fetch(conn: &NativeRusqliteConnection, sql: &str, params: &[Value]) -> Result<Rows> {
    let mut stmt = conn.prepare(sql)?;
    let columns = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let num_cols = columns.len();

    let mut result = Rows::new(columns, Vec::new());
    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(num_cols);
        for i in 0..num_cols {
            values.push(row.get::<_, Value>(i)?);
        }
        result.push(values);
    }
    Ok(result)
}

fn begin_statement(opts: &TxOptions) -> Result<&'static str> {
    match opts.isolation {
        // SQLite transactions are always serializable.
        IsolationLevel::Default | IsolationLevel::Serializable => {}
        other => {
            return Err(DriverError::TransactionError(format!(
                "isolation level {:?} is not supported by SQLite",
                other
            )));
        }
    }
    Ok(if opts.read_only {
        "BEGIN DEFERRED; PRAGMA query_only = ON;"
    } else {
        "BEGIN IMMEDIATE"
    })
}

/// Ends the open transaction with `statement`, lifting `query_only` first
/// for read-only transactions.
fn end_statement(statement: &'static str, read_only: bool) -> String {
    if read_only {
        format!("PRAGMA query_only = OFF; {};", statement)
    } else {
        statement.to_string()
    }
}

// --- Wrapper Structs ---

pub struct RusqliteDriver {
    conn: SharedConnection,
}

impl RusqliteDriver {
    pub fn new(conn: NativeRusqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(NativeRusqliteConnection::open_in_memory()?))
    }

    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(NativeRusqliteConnection::open(path)?))
    }

    fn start(&self, ctx: &Context, begin: &'static str, read_only: bool) -> Result<Box<dyn Tx>> {
        ctx.err()?;
        drizzle_debug_core::drizzle_debug_trace!("begin", "sqlite.rusqlite");
        with_conn(&self.conn, |conn| {
            if let Err(err) = conn.execute_batch(begin) {
                // A failed PRAGMA leaves the BEGIN open.
                if !conn.is_autocommit() {
                    let _ = conn.execute_batch(&end_statement("ROLLBACK", read_only));
                }
                return Err(err.into());
            }
            Ok(())
        })?;
        Ok(Box::new(RusqliteTx {
            conn: Arc::clone(&self.conn),
            read_only,
            finished: false,
        }))
    }
}

impl core::fmt::Debug for RusqliteDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RusqliteDriver").finish_non_exhaustive()
    }
}

/// An open transaction on a [`RusqliteDriver`] connection.
///
/// Dropped without commit or rollback, it rolls back.
pub struct RusqliteTx {
    conn: SharedConnection,
    read_only: bool,
    finished: bool,
}

impl RusqliteTx {
    fn finish(mut self, statement: &'static str) -> Result<()> {
        let batch = end_statement(statement, self.read_only);
        with_conn(&self.conn, |conn| Ok(conn.execute_batch(&batch)?))?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for RusqliteTx {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Ok(guard) = self.conn.lock()
            && let Some(conn) = guard.as_ref()
        {
            let _ = conn.execute_batch(&end_statement("ROLLBACK", self.read_only));
        }
    }
}

// --- Trait Implementations ---

impl ExecQuerier for RusqliteDriver {
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        *res = self.exec_context(ctx, query, args)?;
        Ok(())
    }

    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        *rows = self.query_context(ctx, query, args)?;
        Ok(())
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        Some(self)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        Some(self)
    }
}

impl ExecContext for RusqliteDriver {
    fn exec_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        ctx.err()?;
        with_conn(&self.conn, |conn| run(conn, query, args))
    }
}

impl QueryContext for RusqliteDriver {
    fn query_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        ctx.err()?;
        with_conn(&self.conn, |conn| fetch(conn, query, args))
    }
}

impl Driver for RusqliteDriver {
    fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        self.start(ctx, "BEGIN", false)
    }

    /// Closes the connection. Later calls, including those on transactions
    /// still open, fail; closing again is a no-op.
    fn close(&self) -> Result<()> {
        drizzle_debug_core::drizzle_debug_trace!("close", "sqlite.rusqlite");
        match lock(&self.conn)?.take() {
            Some(conn) => conn.close().map_err(|(_, err)| DriverError::from(err)),
            None => Ok(()),
        }
    }

    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        Some(self)
    }
}

impl BeginTx for RusqliteDriver {
    fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        let begin = begin_statement(opts)?;
        self.start(ctx, begin, opts.read_only)
    }
}

impl ExecQuerier for RusqliteTx {
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        *res = self.exec_context(ctx, query, args)?;
        Ok(())
    }

    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        *rows = self.query_context(ctx, query, args)?;
        Ok(())
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        Some(self)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        Some(self)
    }
}

impl ExecContext for RusqliteTx {
    fn exec_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        ctx.err()?;
        with_conn(&self.conn, |conn| run(conn, query, args))
    }
}

impl QueryContext for RusqliteTx {
    fn query_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        ctx.err()?;
        with_conn(&self.conn, |conn| fetch(conn, query, args))
    }
}

impl Tx for RusqliteTx {
    fn commit(self: Box<Self>) -> Result<()> {
        drizzle_debug_core::drizzle_debug_trace!("commit", "sqlite.rusqlite");
        (*self).finish("COMMIT")
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        drizzle_debug_core::drizzle_debug_trace!("rollback", "sqlite.rusqlite");
        (*self).finish("ROLLBACK")
    }
}
