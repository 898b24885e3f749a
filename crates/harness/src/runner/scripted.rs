//! In-process runner for testing
//!
//! Answers invocations from a closure and records every call, so sweeps can be
//! exercised without spawning processes.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{RunnerError, SimulationRunner};
use crate::mode::ExecutionMode;

/// One recorded call to a [`ScriptedRunner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub mode: ExecutionMode,
    /// Thread argument as the executable would receive it (1 for sequential)
    pub threads: u32,
    /// 0-based position of this call across the runner's lifetime
    pub call: usize,
}

type Responder = dyn Fn(&Invocation) -> Result<f64, RunnerError> + Send + Sync;

/// Scripted [`SimulationRunner`] for tests
pub struct ScriptedRunner {
    respond: Box<Responder>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&Invocation) -> Result<f64, RunnerError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation reports the same elapsed time
    pub fn constant(seconds: f64) -> Self {
        Self::new(move |_| Ok(seconds))
    }

    /// Ideal scaling: `base_seconds / threads`
    pub fn linear(base_seconds: f64) -> Self {
        Self::new(move |call| Ok(base_seconds / f64::from(call.threads)))
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SimulationRunner for ScriptedRunner {
    async fn invoke(&self, mode: ExecutionMode, threads: u32) -> Result<f64, RunnerError> {
        let invocation = {
            let mut calls = self.calls.lock();
            let invocation = Invocation {
                mode,
                threads: mode.thread_arg(threads),
                call: calls.len(),
            };
            calls.push(invocation);
            invocation
        };
        (self.respond)(&invocation)
    }
}
