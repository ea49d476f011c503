use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};

use crate::search::WorkerState;

/// Deepest level at which frames share work with helpers. Below this the
/// search recurses sequentially inside one worker, which keeps
/// coordination cost away from the bulk of the tree.
pub(crate) const SPLIT_LEVELS: usize = 4;

/// Identifies a near-root frame by the 1-based branch indices taken on
/// the way down. Tasks are keyed by position, and helpers pick the
/// first advertised position in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub(crate) struct Position {
    depth: usize,
    values: [u32; SPLIT_LEVELS + 1],
}

impl Position {
    pub(crate) fn child(mut self, depth: usize, branch: u32) -> Self {
        self.depth = depth;
        if depth <= SPLIT_LEVELS {
            self.values[depth] = branch;
        }
        self
    }
}

pub(crate) type TaskFn = Arc<dyn Fn(&mut WorkerState) + Send + Sync>;

struct Task {
    /// Cleared by the first helper to finish running it, so late helpers
    /// stop piling onto a frame that is nearly done.
    func: Option<TaskFn>,
    /// Helpers currently inside the task body.
    pending: usize,
}

/// The donor/helper work-sharing pool.
///
/// A frame at depth `<= SPLIT_LEVELS` donates itself by registering a
/// replayable task under its position and running its own branch loop;
/// idle helpers claim the task, rebuild the frame from the captured
/// buffers and race through sibling branches off a shared counter. The
/// donor waits until no helper is left inside its task before
/// backtracking.
pub(crate) struct HelperPool {
    tasks: Mutex<BTreeMap<Position, Task>>,
    idle: Condvar,
    finish: AtomicBool,
    handles: Mutex<Vec<JoinHandle<WorkerState>>>,
}

impl HelperPool {
    pub(crate) fn new(helpers: usize) -> Arc<Self> {
        let pool = Arc::new(Self {
            tasks: Mutex::new(BTreeMap::new()),
            idle: Condvar::new(),
            finish: AtomicBool::new(false),
            handles: Mutex::new(Vec::with_capacity(helpers)),
        });

        let mut handles = pool.handles.lock();
        for _ in 0..helpers {
            let pool = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || pool.run_helper()));
        }
        drop(handles);

        pool
    }

    fn run_helper(&self) -> WorkerState {
        let mut worker = WorkerState::default();

        while !self.finish.load(Ordering::SeqCst) {
            let mut tasks = self.tasks.lock();

            let mut claimed = None;
            for (position, task) in tasks.iter_mut() {
                if let Some(func) = task.func.as_ref() {
                    task.pending += 1;
                    claimed = Some((*position, Arc::clone(func)));
                    break;
                }
            }

            match claimed {
                Some((position, func)) => {
                    drop(tasks);
                    func(&mut worker);

                    let mut tasks = self.tasks.lock();
                    if let Some(task) = tasks.get_mut(&position) {
                        task.func = None;
                        task.pending -= 1;
                        if task.pending == 0 {
                            self.idle.notify_all();
                        }
                    }
                }
                None => {
                    if !self.finish.load(Ordering::SeqCst) {
                        self.idle.wait(&mut tasks);
                    }
                }
            }
        }

        worker
    }

    /// Runs `main` on the donor while `helper` is advertised at
    /// `position`; returns once `main` is done and every helper has left
    /// the task.
    pub(crate) fn get_help_with(
        &self,
        position: Position,
        main: impl FnOnce(&mut WorkerState),
        helper: TaskFn,
        worker: &mut WorkerState,
    ) {
        {
            let mut tasks = self.tasks.lock();
            let replaced = tasks.insert(
                position,
                Task {
                    func: Some(helper),
                    pending: 0,
                },
            );
            debug_assert!(replaced.is_none(), "two frames at one position");
            self.idle.notify_all();
        }

        main(worker);

        let mut tasks = self.tasks.lock();
        while tasks.get(&position).is_some_and(|task| task.pending != 0) {
            self.idle.wait(&mut tasks);
        }
        tasks.remove(&position);
    }

    /// Stops the helpers and hands back what each one accumulated.
    pub(crate) fn shutdown(&self) -> Vec<WorkerState> {
        {
            let _tasks = self.tasks.lock();
            self.finish.store(true, Ordering::SeqCst);
            self.idle.notify_all();
        }

        let handles = std::mem::take(&mut *self.handles.lock());
        handles
            .into_iter()
            .map(|handle| handle.join().expect("helper thread panicked"))
            .collect()
    }
}
