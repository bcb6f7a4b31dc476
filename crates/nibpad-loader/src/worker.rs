use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use crate::load::{load, LoadOptions, LoadResult};

#[derive(Debug)]
pub enum LoadMessage {
    Loaded(LoadResult),
}

/// Runs one load off the caller's thread and delivers the result over the
/// given channel. One-shot: a worker performs exactly one load and is done;
/// spawn a fresh worker for the next file. There is no cancellation; an
/// unwanted load is simply abandoned and its message ignored.
pub struct LoadWorker {
    handle: JoinHandle<()>,
}

impl LoadWorker {
    pub fn spawn(path: PathBuf, options: LoadOptions, tx: Sender<LoadMessage>) -> Self {
        let handle = std::thread::spawn(move || {
            let result = load(&path, &options);
            // The receiver may be gone by now; that is the abandon case.
            let _ = tx.send(LoadMessage::Loaded(result));
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) {
        let _ = self.handle.join();
    }
}
