//! Custom tracing layers

use tracing::{Subscriber, span};
use tracing_subscriber::{
    layer::{Context, Layer},
    registry::LookupSpan,
};

use crate::context::{WorkerContextData, WorkerContextGuard};

/// Layer that attaches the active worker context to new spans
///
/// Spans opened while a [`WorkerContextGuard`] is active carry a
/// [`WorkerContextExtension`], so later layers can look the context up
/// regardless of which thread closes the span.
pub struct WorkerContextLayer;

impl WorkerContextLayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorkerContextLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension data stored on spans
#[derive(Debug, Clone)]
pub struct WorkerContextExtension {
    pub data: WorkerContextData,
}

impl<S> Layer<S> for WorkerContextLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, _attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(worker) = WorkerContextGuard::current() {
                span.extensions_mut()
                    .insert(WorkerContextExtension { data: worker });
            }
        }
    }
}
