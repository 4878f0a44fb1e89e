//! The seam between the task store and whatever renders it.
//!
//! The store owns no presentation state; it emits `ViewEvent`s through an
//! injected `ViewSink` and the view keeps its own per-item state (entrance
//! animation progress, highlighting) keyed by task id.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A task was appended; the view should animate its entrance.
    TaskAdded { id: String },
    /// Edit mode began; `text` seeds the view's input field.
    EditStarted { id: String, text: String },
    /// Edit mode ended, whether the edit was applied or discarded.
    EditFinished,
    /// A lookup by id failed on an edit path; shown to the user.
    TaskMissing,
}

pub trait ViewSink {
    fn handle(&self, event: &ViewEvent);
}

pub struct NoopSink;

impl ViewSink for NoopSink {
    fn handle(&self, _event: &ViewEvent) {}
}

#[cfg(test)]
mod tests {
    use super::{NoopSink, ViewEvent, ViewSink};

    #[test]
    fn noop_sink_accepts_events() {
        let sink = NoopSink;
        sink.handle(&ViewEvent::EditFinished);
        sink.handle(&ViewEvent::TaskAdded {
            id: "task-1".to_string(),
        });
    }
}
