//! Worker context injection
//!
//! The consumer thread of a put logger installs a [`WorkerContextGuard`] so
//! every diagnostic it emits can be attributed to one logger instance, even
//! when several loggers run in the same process.

use std::cell::RefCell;

use uuid::Uuid;

/// Worker context data stored in thread-local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerContextData {
    /// Name of the logger the worker belongs to
    pub logger: String,
    /// Unique id of the logger instance
    pub instance_id: Uuid,
}

thread_local! {
    static WORKER_CONTEXT: RefCell<Option<WorkerContextData>> = const { RefCell::new(None) };
}

/// RAII guard for worker context
///
/// Sets the context for the current thread on creation and restores the
/// previous one (if any) on drop.
///
/// # Example
///
/// ```
/// use putlog_logging::WorkerContextGuard;
///
/// let _guard = WorkerContextGuard::new("caPutLog");
/// assert_eq!(WorkerContextGuard::current_logger().as_deref(), Some("caPutLog"));
/// ```
pub struct WorkerContextGuard {
    previous: Option<WorkerContextData>,
}

impl WorkerContextGuard {
    /// Create a guard with a fresh instance id
    pub fn new(logger: impl Into<String>) -> Self {
        Self::with_instance_id(logger, Uuid::new_v4())
    }

    /// Create a guard with a specific instance ID
    pub fn with_instance_id(logger: impl Into<String>, instance_id: Uuid) -> Self {
        let previous = WORKER_CONTEXT.with(|ctx| ctx.borrow().clone());
        let data = WorkerContextData {
            logger: logger.into(),
            instance_id,
        };
        WORKER_CONTEXT.with(|ctx| *ctx.borrow_mut() = Some(data));
        Self { previous }
    }

    /// Get the current worker context (if any)
    pub fn current() -> Option<WorkerContextData> {
        WORKER_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    /// Get the current logger name (if set)
    pub fn current_logger() -> Option<String> {
        Self::current().map(|ctx| ctx.logger)
    }

    /// Get the current instance ID (if set)
    pub fn current_instance_id() -> Option<Uuid> {
        Self::current().map(|ctx| ctx.instance_id)
    }

    /// A span carrying the context as fields, for the formatters to print
    pub fn span(&self) -> tracing::Span {
        match Self::current() {
            Some(ctx) => tracing::info_span!(
                "worker",
                logger = %ctx.logger,
                instance_id = %ctx.instance_id
            ),
            None => tracing::Span::none(),
        }
    }
}

impl Drop for WorkerContextGuard {
    fn drop(&mut self) {
        WORKER_CONTEXT.with(|ctx| *ctx.borrow_mut() = self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_context_guard() {
        assert!(WorkerContextGuard::current().is_none());

        {
            let _guard = WorkerContextGuard::new("caPutLog");
            let ctx = WorkerContextGuard::current().unwrap();
            assert_eq!(ctx.logger, "caPutLog");
        }

        assert!(WorkerContextGuard::current().is_none());
    }

    #[test]
    fn test_nested_contexts() {
        {
            let _outer = WorkerContextGuard::new("outer");
            {
                let _inner = WorkerContextGuard::new("inner");
                assert_eq!(WorkerContextGuard::current_logger(), Some("inner".to_string()));
            }
            assert_eq!(WorkerContextGuard::current_logger(), Some("outer".to_string()));
        }
        assert!(WorkerContextGuard::current_logger().is_none());
    }

    #[test]
    fn test_with_instance_id() {
        let instance_id = Uuid::new_v4();
        let _guard = WorkerContextGuard::with_instance_id("caPutLog", instance_id);
        assert_eq!(WorkerContextGuard::current_instance_id(), Some(instance_id));
    }
}
