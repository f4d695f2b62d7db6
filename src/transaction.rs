use drizzle_debug_core::{
    Capability, Context, DriverError, ExecContext, ExecQuerier, ExecResult, Field, QueryContext,
    Result, Rows, SharedLogFn, Tx, Value,
};

/// A transaction that logs every operation, tagged with its id.
///
/// Created by [`DebugDriver`](crate::DebugDriver) when a transaction starts.
/// Commit and rollback are logged with the context the transaction was
/// started with, before the wrapped transaction is asked to finish.
pub struct DebugTx {
    tx: Box<dyn Tx>,
    id: String,
    log: SharedLogFn,
    ctx: Context,
}

impl DebugTx {
    pub(crate) fn new(tx: Box<dyn Tx>, id: String, log: SharedLogFn, ctx: Context) -> Self {
        Self { tx, id, log, ctx }
    }

    /// The transaction's logging id
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The context the transaction was started with
    #[inline]
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Logs this step and commits the wrapped transaction.
    pub fn commit(self) -> Result<()> {
        self.log(&self.ctx, &format!("Tx({}): committed", self.id), &[]);
        self.tx.commit()
    }

    /// Logs this step and rolls the wrapped transaction back.
    pub fn rollback(self) -> Result<()> {
        self.log(&self.ctx, &format!("Tx({}): rolled back", self.id), &[]);
        self.tx.rollback()
    }

    #[inline]
    fn log(&self, ctx: &Context, msg: &str, fields: &[Field]) {
        (self.log)(ctx, msg, fields)
    }
}

impl core::fmt::Debug for DebugTx {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebugTx")
            .field("id", &self.id)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl ExecQuerier for DebugTx {
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        self.log(
            ctx,
            &format!("Tx({}).Exec: query={}", self.id, query),
            &[Field::args("args", args)],
        );
        self.tx.exec(ctx, query, args, res)
    }

    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        self.log(
            ctx,
            &format!("Tx({}).Query: query={}", self.id, query),
            &[Field::args("args", args)],
        );
        self.tx.query(ctx, query, args, rows)
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        self.tx.as_exec_context().map(|_| self as &dyn ExecContext)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        self.tx.as_query_context().map(|_| self as &dyn QueryContext)
    }
}

impl ExecContext for DebugTx {
    fn exec_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        let tx = self
            .tx
            .as_exec_context()
            .ok_or(DriverError::Unsupported(Capability::TxExecContext))?;
        self.log(
            ctx,
            &format!("Tx({}).ExecContext: query={}", self.id, query),
            &[Field::args("args", args)],
        );
        tx.exec_context(ctx, query, args)
    }
}

impl QueryContext for DebugTx {
    fn query_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        let tx = self
            .tx
            .as_query_context()
            .ok_or(DriverError::Unsupported(Capability::TxQueryContext))?;
        self.log(
            ctx,
            &format!("Tx({}).QueryContext: query={}", self.id, query),
            &[Field::args("args", args)],
        );
        tx.query_context(ctx, query, args)
    }
}

impl Tx for DebugTx {
    fn commit(self: Box<Self>) -> Result<()> {
        DebugTx::commit(*self)
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        DebugTx::rollback(*self)
    }
}
