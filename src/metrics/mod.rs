//! Metrics infrastructure.
//!
//! Counters are recorded through the `metrics` facade; embedders install
//! whatever recorder suits their deployment.

pub mod events;

/// Macro for emitting metric events.
///
/// Calls the `InternalEvent::emit()` method on the given event, which records
/// the corresponding counter metric.
///
/// # Example
///
/// ```ignore
/// use starlift::metrics::events::RecordsRead;
///
/// emit!(RecordsRead { count: 100, dataset: "songs" });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}

pub use emit;
