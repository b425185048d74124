//! Performance instrumentation utilities

/// Timing macro for render paths
/// Usage: timed!("operation name", { code })
///
/// Opens a `profiling` scope (no-op without a profiler backend) and logs the
/// elapsed time at debug level.
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        profiling::scope!($name);
        let _t = std::time::Instant::now();
        let r = $block;
        tracing::debug!(elapsed = ?_t.elapsed(), "{}", $name);
        r
    }};
}
