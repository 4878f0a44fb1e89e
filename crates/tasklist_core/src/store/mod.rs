use crate::model::{Task, TaskStatus};
use crate::storage::json_store;
use crate::storage::writer::StoreWriter;
use crate::view::{ViewEvent, ViewSink};
use std::path::PathBuf;
use time::OffsetDateTime;

/// Value copy of the task under edit. Commit resolves the target by id, so
/// the slot survives the list being mutated or replaced underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditSlot {
    id: String,
    text: String,
}

/// In-memory authority for the task list and the single "being edited" slot.
///
/// All mutations go through the methods below; each effective mutation hands
/// a snapshot to the background writer, so the in-memory list is always
/// immediately consistent while durability trails behind. The view renders
/// from `tasks()` / `is_editing()` / `edit_text()` and receives `ViewEvent`s
/// through the injected sink; it never mutates the list directly.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    edit_slot: Option<EditSlot>,
    writer: StoreWriter,
    sink: Box<dyn ViewSink>,
}

impl TaskStore {
    pub fn open(path: PathBuf, sink: Box<dyn ViewSink>) -> Self {
        let writer = StoreWriter::spawn(path.clone());
        Self {
            path,
            tasks: Vec::new(),
            edit_slot: None,
            writer,
            sink,
        }
    }

    /// Adopts the persisted list verbatim (storage is trusted, ids are not
    /// re-validated). Absent or unreadable data leaves the list empty; the
    /// failure is logged and never surfaced.
    pub fn initialize(&mut self) {
        match json_store::load_tasks(&self.path) {
            Ok(Some(tasks)) => self.tasks = tasks,
            Ok(None) => {}
            Err(err) => log::warn!(
                "failed to load task list from {}: {err}",
                self.path.display()
            ),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_editing(&self) -> bool {
        self.edit_slot.is_some()
    }

    pub fn edit_text(&self) -> Option<&str> {
        self.edit_slot.as_ref().map(|slot| slot.text.as_str())
    }

    /// Appends a new pending task. Whitespace-only text is a silent no-op.
    pub fn add_task(&mut self, raw_text: &str) {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return;
        }

        let id = generate_task_id(&self.tasks);
        self.tasks.push(Task {
            id: id.clone(),
            text: trimmed.to_string(),
            status: TaskStatus::Pending,
        });
        self.persist();
        self.sink.handle(&ViewEvent::TaskAdded { id });
    }

    /// Removes the task with the given id. Unknown ids are a silent no-op.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() != before {
            self.persist();
        }
    }

    /// Marks the task completed. Idempotent on already-completed tasks;
    /// unknown ids are a silent no-op. Completion is one-directional: no
    /// operation transitions a task back to pending.
    pub fn complete_task(&mut self, id: &str) {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return;
        };
        if task.status.is_completed() {
            return;
        }

        task.status = TaskStatus::Completed;
        self.persist();
    }

    /// Populates the edit slot from the task with the given id and signals
    /// the view to enter edit mode with the task's text as input seed. An
    /// unknown id raises the user-visible missing-task notification and
    /// leaves the slot unchanged.
    pub fn begin_edit(&mut self, id: &str) {
        match self.tasks.iter().find(|task| task.id == id) {
            Some(task) => {
                let slot = EditSlot {
                    id: task.id.clone(),
                    text: task.text.clone(),
                };
                self.sink.handle(&ViewEvent::EditStarted {
                    id: slot.id.clone(),
                    text: slot.text.clone(),
                });
                self.edit_slot = Some(slot);
            }
            None => self.sink.handle(&ViewEvent::TaskMissing),
        }
    }

    /// Applies the pending edit. With no populated slot, the missing-task
    /// notification is raised. Whitespace-only text discards the edit and
    /// keeps the original. Either way the slot is cleared and the view
    /// leaves edit mode.
    pub fn commit_edit(&mut self, raw_text: &str) {
        let Some(slot) = self.edit_slot.take() else {
            self.sink.handle(&ViewEvent::TaskMissing);
            self.sink.handle(&ViewEvent::EditFinished);
            return;
        };

        let trimmed = raw_text.trim();
        if !trimmed.is_empty()
            && let Some(task) = self.tasks.iter_mut().find(|task| task.id == slot.id)
        {
            task.text = trimmed.to_string();
            self.persist();
        }

        self.sink.handle(&ViewEvent::EditFinished);
    }

    /// Removes every completed task in one update, preserving the relative
    /// order of the remaining tasks. Safe no-op when nothing is completed.
    pub fn clear_completed(&mut self) {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.status.is_completed());
        if self.tasks.len() != before {
            self.persist();
        }
    }

    fn persist(&self) {
        self.writer.submit(self.tasks.clone());
    }
}

fn generate_task_id(existing: &[Task]) -> String {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let mut id = format!("task-{nanos}");
    let mut bump = 1u32;
    while existing.iter().any(|task| task.id == id) {
        id = format!("task-{nanos}-{bump}");
        bump += 1;
    }
    id
}
