use std::sync::Arc;

use drizzle_debug_core::{
    BeginTx, Capability, Context, Dialect, Driver, DriverError, ExecContext, ExecQuerier,
    ExecResult, Field, QueryContext, Result, Rows, SharedLogFn, Tx, TxOptions, Value,
};

use crate::transaction::DebugTx;

/// A driver that logs every outgoing operation before handing it to the
/// driver it wraps.
///
/// Results and errors of the wrapped driver are returned untouched. The only
/// error originated here is [`DriverError::Unsupported`], raised when an
/// optional capability is requested from a driver that lacks it.
pub struct DebugDriver<D> {
    driver: D,
    log: SharedLogFn,
}

/// Wraps `driver` so that every operation is reported to `log` together with
/// the call's [`Context`].
///
/// ```
/// use drizzle_debug::{Context, Field, debug_with_context};
/// # use drizzle_debug::{Dialect, Driver, ExecQuerier, ExecResult, Rows, Tx, Value, Result};
/// # struct Noop;
/// # impl ExecQuerier for Noop {
/// #     fn exec(&self, _: &Context, _: &str, _: &[Value], _: &mut ExecResult) -> Result<()> { Ok(()) }
/// #     fn query(&self, _: &Context, _: &str, _: &[Value], _: &mut Rows) -> Result<()> { Ok(()) }
/// # }
/// # impl Driver for Noop {
/// #     fn tx(&self, _: &Context) -> Result<Box<dyn Tx>> { unimplemented!() }
/// #     fn close(&self) -> Result<()> { Ok(()) }
/// #     fn dialect(&self) -> Dialect { Dialect::SQLite }
/// # }
///
/// let drv = debug_with_context(Noop, |ctx: &Context, msg: &str, fields: &[Field]| {
///     println!("{ctx} {msg} {fields:?}");
/// });
/// let mut res = ExecResult::default();
/// drv.exec(&Context::background(), "DELETE FROM t", &[], &mut res)?;
/// # Ok::<(), drizzle_debug::DriverError>(())
/// ```
pub fn debug_with_context<D, F>(driver: D, log: F) -> DebugDriver<D>
where
    D: Driver,
    F: Fn(&Context, &str, &[Field]) + Send + Sync + 'static,
{
    DebugDriver::new(driver, Arc::new(log))
}

impl<D: Driver> DebugDriver<D> {
    /// Creates a debug driver sharing an existing logging function.
    pub fn new(driver: D, log: SharedLogFn) -> Self {
        Self { driver, log }
    }

    /// Gets a reference to the wrapped driver
    #[inline]
    pub fn inner(&self) -> &D {
        &self.driver
    }

    /// Unwraps the debug driver, returning the wrapped driver
    pub fn into_inner(self) -> D {
        self.driver
    }

    /// Starts a transaction and returns the concrete [`DebugTx`], whose
    /// [`id`](DebugTx::id) tags every line it logs.
    pub fn debug_tx(&self, ctx: &Context) -> Result<DebugTx> {
        let tx = self.driver.tx(ctx)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.log(ctx, &format!("driver.Tx({}): started", id), &[]);
        Ok(DebugTx::new(tx, id, Arc::clone(&self.log), ctx.clone()))
    }

    /// Like [`debug_tx`](Self::debug_tx), with explicit options. Fails with
    /// `Driver.BeginTx is not supported` when the wrapped driver has no
    /// [`BeginTx`] capability.
    pub fn debug_begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<DebugTx> {
        let drv = self
            .driver
            .as_begin_tx()
            .ok_or(DriverError::Unsupported(Capability::DriverBeginTx))?;
        let tx = drv.begin_tx(ctx, opts)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.log(ctx, &format!("driver.BeginTx({}): started", id), &[]);
        Ok(DebugTx::new(tx, id, Arc::clone(&self.log), ctx.clone()))
    }

    #[inline]
    fn log(&self, ctx: &Context, msg: &str, fields: &[Field]) {
        (self.log)(ctx, msg, fields)
    }
}

impl<D> core::fmt::Debug for DebugDriver<D>
where
    D: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebugDriver")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl<D: Driver> ExecQuerier for DebugDriver<D> {
    fn exec(&self, ctx: &Context, query: &str, args: &[Value], res: &mut ExecResult) -> Result<()> {
        self.log(
            ctx,
            "driver.Exec",
            &[Field::string("query", query), Field::args("args", args)],
        );
        self.driver.exec(ctx, query, args, res)
    }

    fn query(&self, ctx: &Context, query: &str, args: &[Value], rows: &mut Rows) -> Result<()> {
        self.log(
            ctx,
            "driver.Query",
            &[Field::string("query", query), Field::args("args", args)],
        );
        self.driver.query(ctx, query, args, rows)
    }

    fn as_exec_context(&self) -> Option<&dyn ExecContext> {
        self.driver
            .as_exec_context()
            .map(|_| self as &dyn ExecContext)
    }

    fn as_query_context(&self) -> Option<&dyn QueryContext> {
        self.driver
            .as_query_context()
            .map(|_| self as &dyn QueryContext)
    }
}

impl<D: Driver> ExecContext for DebugDriver<D> {
    fn exec_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<ExecResult> {
        let drv = self
            .driver
            .as_exec_context()
            .ok_or(DriverError::Unsupported(Capability::DriverExecContext))?;
        self.log(
            ctx,
            "driver.ExecContext",
            &[Field::string("query", query), Field::args("args", args)],
        );
        drv.exec_context(ctx, query, args)
    }
}

impl<D: Driver> QueryContext for DebugDriver<D> {
    fn query_context(&self, ctx: &Context, query: &str, args: &[Value]) -> Result<Rows> {
        let drv = self
            .driver
            .as_query_context()
            .ok_or(DriverError::Unsupported(Capability::DriverQueryContext))?;
        self.log(
            ctx,
            "driver.QueryContext",
            &[Field::string("query", query), Field::args("args", args)],
        );
        drv.query_context(ctx, query, args)
    }
}

impl<D: Driver> Driver for DebugDriver<D> {
    fn tx(&self, ctx: &Context) -> Result<Box<dyn Tx>> {
        Ok(Box::new(self.debug_tx(ctx)?))
    }

    fn close(&self) -> Result<()> {
        self.driver.close()
    }

    fn dialect(&self) -> Dialect {
        self.driver.dialect()
    }

    fn as_begin_tx(&self) -> Option<&dyn BeginTx> {
        self.driver.as_begin_tx().map(|_| self as &dyn BeginTx)
    }
}

impl<D: Driver> BeginTx for DebugDriver<D> {
    fn begin_tx(&self, ctx: &Context, opts: &TxOptions) -> Result<Box<dyn Tx>> {
        Ok(Box::new(self.debug_begin_tx(ctx, opts)?))
    }
}
