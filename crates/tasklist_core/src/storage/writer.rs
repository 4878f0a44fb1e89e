use crate::model::Task;
use crate::storage::json_store;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Background writer for the task store file.
///
/// Mutations hand the writer a full snapshot of the list and move on; the
/// writer thread persists snapshots in the background, always skipping ahead
/// to the newest one queued. A failed save is not retried, it is superseded
/// by the next snapshot. Dropping the writer closes the channel and joins
/// the thread, so the last submitted snapshot is flushed at teardown.
pub struct StoreWriter {
    sender: Option<mpsc::Sender<Vec<Task>>>,
    handle: Option<JoinHandle<()>>,
}

impl StoreWriter {
    pub fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel::<Vec<Task>>();
        let handle = std::thread::spawn(move || {
            while let Ok(mut snapshot) = receiver.recv() {
                // Coalesce: only the newest queued snapshot matters.
                while let Ok(newer) = receiver.try_recv() {
                    snapshot = newer;
                }

                if let Err(err) = json_store::save_tasks(&path, &snapshot) {
                    log::warn!("failed to persist task list to {}: {err}", path.display());
                }
            }
        });

        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    pub fn submit(&self, snapshot: Vec<Task>) {
        if let Some(sender) = self.sender.as_ref() {
            // Send only fails when the writer thread is gone; the in-memory
            // list stays authoritative either way.
            let _ = sender.send(snapshot);
        }
    }
}

impl Drop for StoreWriter {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreWriter;
    use crate::model::{Task, TaskStatus};
    use crate::storage::json_store;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
    }

    fn task(id: &str, text: &str) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            status: TaskStatus::Pending,
        }
    }

    #[test]
    fn drop_flushes_submitted_snapshot() {
        let path = temp_path("writer-flush.json");

        let writer = StoreWriter::spawn(path.clone());
        writer.submit(vec![task("task-1", "demo")]);
        drop(writer);

        let loaded = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.unwrap()[0].id, "task-1");
    }

    #[test]
    fn last_snapshot_wins() {
        let path = temp_path("writer-last.json");

        let writer = StoreWriter::spawn(path.clone());
        writer.submit(vec![task("task-1", "first")]);
        writer.submit(vec![task("task-1", "first"), task("task-2", "second")]);
        writer.submit(vec![task("task-2", "second")]);
        drop(writer);

        let loaded = json_store::load_tasks(&path).unwrap().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "task-2");
    }
}
