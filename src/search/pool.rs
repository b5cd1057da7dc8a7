//! A fixed-size worker pool for root-subtree builds: a task queue drained by
//! scoped threads, joined before any result is read.
//!
//! The tasks are independent by construction (each owns its cloned position
//! and produces its own subtree), so the pool needs no shared mutable state
//! beyond the queue index and the result slots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// Pool size used when the caller does not pick one: the number of available
/// hardware threads, capped at 8.
#[must_use]
pub fn default_pool_size() -> usize {
    thread::available_parallelism().map_or(1, |threads| threads.get().min(8))
}

/// Runs every task on a pool of at most `pool_size` worker threads and
/// returns the results in task order. Blocks until the last task finishes:
/// the join happens-before any result is read.
///
/// With a single worker (or a single task) the tasks run inline on the
/// calling thread.
pub(crate) fn run_tasks<T, F>(pool_size: usize, tasks: Vec<F>) -> Vec<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    if pool_size <= 1 || tasks.len() <= 1 {
        return tasks.into_iter().map(|task| task()).collect();
    }

    let queue: Vec<Mutex<Option<F>>> = tasks.into_iter().map(|task| Mutex::new(Some(task))).collect();
    let results: Vec<Mutex<Option<T>>> = queue.iter().map(|_| Mutex::new(None)).collect();
    let next_task = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..pool_size.min(queue.len()) {
            let _ = scope.spawn(|| loop {
                let index = next_task.fetch_add(1, Ordering::Relaxed);
                if index >= queue.len() {
                    break;
                }
                let task = queue[index]
                    .lock()
                    .expect("task slot poisoned")
                    .take()
                    .expect("every task slot is taken exactly once");
                let result = task();
                *results[index].lock().expect("result slot poisoned") = Some(result);
            });
        }
    });

    results
        .into_iter()
        .map(|slot| {
            slot.into_inner()
                .expect("result slot poisoned")
                .expect("pool joined with every task finished")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{default_pool_size, run_tasks};

    #[test]
    fn preserves_task_order() {
        let tasks: Vec<_> = (0..100).map(|i| move || i * 2).collect();
        assert_eq!(run_tasks(4, tasks), (0..100).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn runs_inline_with_a_single_worker() {
        let tasks: Vec<_> = (0..10).map(|i| move || i + 1).collect();
        assert_eq!(run_tasks(1, tasks), (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn more_workers_than_tasks() {
        let tasks: Vec<_> = (0..3).map(|i| move || i).collect();
        assert_eq!(run_tasks(16, tasks), vec![0, 1, 2]);
    }

    #[test]
    fn empty_task_list() {
        let tasks: Vec<Box<dyn FnOnce() -> i32 + Send>> = Vec::new();
        assert_eq!(run_tasks(4, tasks).len(), 0);
    }

    #[test]
    fn sane_default_size() {
        let size = default_pool_size();
        assert!((1..=8).contains(&size));
    }
}
