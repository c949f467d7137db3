//! Canonical logging macros
//!
//! Each engine-level operation logs exactly one `start` and one terminal
//! (`end` or `end_error`) event. Operations that run inside a transfer cycle
//! pass `ctx = &CycleContext` so every boundary event carries the same
//! `cycle_id`, `handler` and `tag` fields.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use popcon_core::log_op_start;
/// use popcon_core::core_types::CycleContext;
///
/// log_op_start!("tag_state");
/// log_op_start!("tag_state", tag = "SiStripNoise_v1");
///
/// let ctx = CycleContext::new("SiStripNoiseHandler", "SiStripNoise_v1");
/// log_op_start!("run_cycle", ctx = &ctx, dry_run = true);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, ctx = $ctx:expr $(, $($field:tt)*)?) => {{
        let __ctx: &$crate::core_types::CycleContext = $ctx;
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            cycle_id = %__ctx.cycle_id,
            handler = %__ctx.handler,
            tag = %__ctx.tag,
            $($($field)*)?
        );
    }};
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use popcon_core::log_op_end;
/// use popcon_core::core_types::CycleContext;
///
/// log_op_end!("tag_state", duration_ms = 3);
///
/// let ctx = CycleContext::new("SiStripNoiseHandler", "SiStripNoise_v1");
/// log_op_end!("run_cycle", duration_ms = 3, ctx = &ctx, outcome = "staged");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, ctx = $ctx:expr $(, $($field:tt)*)?) => {{
        let __ctx: &$crate::core_types::CycleContext = $ctx;
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            cycle_id = %__ctx.cycle_id,
            handler = %__ctx.handler,
            tag = %__ctx.tag,
            $($($field)*)?
        );
    }};
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted into `ExError` so the stable code is recorded.
///
/// ```
/// # use popcon_core::log_op_error;
/// # use popcon_core::errors::{ExError, ExErrorKind};
/// use popcon_core::core_types::CycleContext;
///
/// let err = ExError::new(ExErrorKind::Persistence).with_message("locked");
/// log_op_error!("tag_state", err.clone(), duration_ms = 10);
///
/// let ctx = CycleContext::new("SiStripNoiseHandler", "SiStripNoise_v1");
/// log_op_error!("run_cycle", err, duration_ms = 10, ctx = &ctx);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, ctx = $ctx:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        let __ctx: &$crate::core_types::CycleContext = $ctx;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            cycle_id = %__ctx.cycle_id,
            handler = %__ctx.handler,
            tag = %__ctx.tag,
            $($($field)*)?
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($field)*
        );
    }};
}
