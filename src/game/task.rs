//! Tick task scheduling
//!
//! Every registered task runs once per `delay` ticks, in submission order, on
//! the tick thread. A task that fails or panics is logged and keeps its slot;
//! the remaining tasks still run that tick.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::world::WorldError;

/// Failure raised while a task executes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickFault {
    #[error("World error: {0}")]
    World(#[from] WorldError),
    #[error("Task panicked: {0}")]
    Panicked(String),
}

/// Whether a task stays scheduled after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// A unit of work run by the [`TaskManager`]
pub trait Task<C> {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Ticks between executions
    fn delay(&self) -> u32 {
        1
    }

    fn execute(&mut self, ctx: &mut C) -> Result<TaskStatus, TickFault>;
}

struct ScheduledTask<C> {
    task: Box<dyn Task<C>>,
    countdown: u32,
}

/// Summary of one processed tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub executed: usize,
    pub faults: usize,
    pub finished: usize,
}

/// Runs submitted tasks once per tick
pub struct TaskManager<C> {
    tasks: Vec<ScheduledTask<C>>,
    tick: u64,
    total_faults: u64,
}

impl<C> TaskManager<C> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            tick: 0,
            total_faults: 0,
        }
    }

    /// Register a task. It first runs `delay` ticks from now.
    pub fn submit<T: Task<C> + 'static>(&mut self, task: T) {
        debug!(task = task.name(), delay = task.delay(), "Task submitted");
        let countdown = task.delay().max(1);
        self.tasks.push(ScheduledTask {
            task: Box::new(task),
            countdown,
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Ticks processed so far
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Faults caught since startup
    pub fn total_faults(&self) -> u64 {
        self.total_faults
    }

    /// Advance one tick
    pub fn process(&mut self, ctx: &mut C) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        self.tasks.retain_mut(|entry| {
            entry.countdown = entry.countdown.saturating_sub(1);
            if entry.countdown > 0 {
                return true;
            }
            entry.countdown = entry.task.delay().max(1);
            report.executed += 1;

            let result = panic::catch_unwind(AssertUnwindSafe(|| entry.task.execute(ctx)))
                .unwrap_or_else(|payload| Err(TickFault::Panicked(panic_message(payload))));

            match result {
                Ok(TaskStatus::Continue) => true,
                Ok(TaskStatus::Done) => {
                    debug!(task = entry.task.name(), "Task finished");
                    report.finished += 1;
                    false
                }
                Err(fault) => {
                    error!(task = entry.task.name(), tick = report.tick, "Task fault: {}", fault);
                    report.faults += 1;
                    true
                }
            }
        });

        self.total_faults += report.faults as u64;
        report
    }
}

impl<C> Default for TaskManager<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct Counter {
        name: &'static str,
        delay: u32,
        runs_left: Option<u32>,
    }

    impl Task<Vec<&'static str>> for Counter {
        fn name(&self) -> &str {
            self.name
        }

        fn delay(&self) -> u32 {
            self.delay
        }

        fn execute(&mut self, ctx: &mut Vec<&'static str>) -> Result<TaskStatus, TickFault> {
            ctx.push(self.name);
            match self.runs_left.as_mut() {
                Some(0) | Some(1) => Ok(TaskStatus::Done),
                Some(n) => {
                    *n -= 1;
                    Ok(TaskStatus::Continue)
                }
                None => Ok(TaskStatus::Continue),
            }
        }
    }

    struct Faulty;

    impl Task<Vec<&'static str>> for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        fn execute(&mut self, _ctx: &mut Vec<&'static str>) -> Result<TaskStatus, TickFault> {
            Err(WorldError::PlayerNotFound(Uuid::nil()).into())
        }
    }

    struct Panicky;

    impl Task<Vec<&'static str>> for Panicky {
        fn name(&self) -> &str {
            "panicky"
        }

        fn execute(&mut self, _ctx: &mut Vec<&'static str>) -> Result<TaskStatus, TickFault> {
            panic!("boom");
        }
    }

    fn counter(name: &'static str, delay: u32, runs_left: Option<u32>) -> Counter {
        Counter {
            name,
            delay,
            runs_left,
        }
    }

    #[test]
    fn test_tasks_run_in_submission_order() {
        let mut tasks = TaskManager::new();
        tasks.submit(counter("a", 1, None));
        tasks.submit(counter("b", 1, None));

        let mut log = Vec::new();
        tasks.process(&mut log);
        tasks.process(&mut log);

        assert_eq!(log, vec!["a", "b", "a", "b"]);
        assert_eq!(tasks.current_tick(), 2);
    }

    #[test]
    fn test_delay() {
        let mut tasks = TaskManager::new();
        tasks.submit(counter("slow", 3, None));

        let mut log = Vec::new();
        for _ in 0..7 {
            tasks.process(&mut log);
        }

        // Ticks 3 and 6
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_done_tasks_are_removed() {
        let mut tasks = TaskManager::new();
        tasks.submit(counter("twice", 1, Some(2)));

        let mut log = Vec::new();
        let first = tasks.process(&mut log);
        let second = tasks.process(&mut log);
        tasks.process(&mut log);

        assert_eq!(first.finished, 0);
        assert_eq!(second.finished, 1);
        assert_eq!(log.len(), 2);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_fault_does_not_stop_other_tasks() {
        let mut tasks = TaskManager::new();
        tasks.submit(Faulty);
        tasks.submit(counter("after", 1, None));

        let mut log = Vec::new();
        let report = tasks.process(&mut log);

        assert_eq!(report.faults, 1);
        assert_eq!(report.executed, 2);
        assert_eq!(log, vec!["after"]);
        // Faulted task stays scheduled
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_panic_is_caught() {
        let mut tasks = TaskManager::new();
        tasks.submit(Panicky);
        tasks.submit(counter("survivor", 1, None));

        let mut log = Vec::new();
        tasks.process(&mut log);
        let report = tasks.process(&mut log);

        assert_eq!(report.faults, 1);
        assert_eq!(tasks.total_faults(), 2);
        assert_eq!(log, vec!["survivor", "survivor"]);
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "unknown panic");
    }
}
