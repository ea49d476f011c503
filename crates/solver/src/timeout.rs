use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Cooperative deadline: a watcher thread flips the shared abort flag
/// when the limit expires, and the search polls the flag on every node.
/// Without a limit this is a no-op shell around the flag.
pub(crate) struct Timeout {
    abort: Arc<AtomicBool>,
    timed_out: Arc<AtomicBool>,
    watcher: Option<Watcher>,
}

struct Watcher {
    shared: Arc<(Mutex<bool>, Condvar)>,
    handle: JoinHandle<()>,
}

impl Timeout {
    pub(crate) fn start(limit: Option<Duration>) -> Self {
        let abort = Arc::new(AtomicBool::new(false));
        let timed_out = Arc::new(AtomicBool::new(false));

        let watcher = limit.map(|limit| {
            let deadline = Instant::now() + limit;
            let shared = Arc::new((Mutex::new(false), Condvar::new()));
            let handle = {
                let shared = Arc::clone(&shared);
                let abort = Arc::clone(&abort);
                let timed_out = Arc::clone(&timed_out);
                std::thread::spawn(move || {
                    let (lock, finished) = &*shared;
                    let mut done = lock.lock();
                    while !*done {
                        if finished.wait_until(&mut done, deadline).timed_out() {
                            timed_out.store(true, Ordering::SeqCst);
                            break;
                        }
                    }
                    drop(done);
                    abort.store(true, Ordering::SeqCst);
                })
            };
            Watcher { shared, handle }
        });

        Self {
            abort,
            timed_out,
            watcher,
        }
    }

    /// The flag the search polls.
    pub(crate) fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Wakes the watcher if the search won the race, joins it, and
    /// reports whether the deadline fired.
    pub(crate) fn finish(self) -> bool {
        if let Some(watcher) = self.watcher {
            {
                let (lock, finished) = &*watcher.shared;
                *lock.lock() = true;
                finished.notify_all();
            }
            watcher.handle.join().expect("timeout thread panicked");
        }
        self.timed_out.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_limit_never_aborts() {
        let timeout = Timeout::start(None);
        let abort = timeout.abort_flag();

        assert!(!abort.load(Ordering::SeqCst));
        assert!(!timeout.finish());
        assert!(!abort.load(Ordering::SeqCst));
    }

    #[test]
    fn expired_limit_sets_the_flag() {
        let timeout = Timeout::start(Some(Duration::from_millis(5)));
        let abort = timeout.abort_flag();

        while !abort.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(1));
        }

        assert!(timeout.finish());
    }

    #[test]
    fn finishing_early_reports_no_timeout() {
        let timeout = Timeout::start(Some(Duration::from_secs(3600)));

        assert!(!timeout.finish());
        // The abort flag still trips so late workers stop quickly.
        // (It is only reported as a timeout when the deadline fired.)
    }
}
