//! # Mock Script Runners
//!
//! [`RecordingRunner`] stands in for the automation host. It records the
//! time window of every execution so tests can prove that a channel never
//! let two scripts overlap.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use switchboard_automation::ScriptRunner;
use switchboard_core::AutomationError;

/// One recorded script execution.
#[derive(Debug, Clone)]
pub struct ExecutionWindow {
    pub script: String,
    pub started: Instant,
    pub finished: Instant,
}

impl ExecutionWindow {
    pub fn overlaps(&self, other: &ExecutionWindow) -> bool {
        self.started < other.finished && other.started < self.finished
    }
}

/// Script runner that sleeps, answers from a table and records windows.
///
/// Unmatched scripts answer with their own text. Clones share the record.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    delay: Duration,
    outputs: HashMap<String, Result<String, AutomationError>>,
    scripted: Arc<Mutex<VecDeque<Result<String, AutomationError>>>>,
    windows: Arc<Mutex<Vec<ExecutionWindow>>>,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            outputs: HashMap::new(),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Time each execution takes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fixed output for a given script.
    pub fn with_output(mut self, script: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(script.into(), Ok(output.into()));
        self
    }

    /// Fixed failure for a given script.
    pub fn with_failure(mut self, script: impl Into<String>, err: AutomationError) -> Self {
        self.outputs.insert(script.into(), Err(err));
        self
    }

    /// Queue an answer for the next execution, whatever its script.
    pub fn push_result(&self, result: Result<String, AutomationError>) {
        self.scripted.lock().unwrap().push_back(result);
    }

    pub fn windows(&self) -> Vec<ExecutionWindow> {
        self.windows.lock().unwrap().clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.windows()
            .into_iter()
            .map(|window| window.script)
            .collect()
    }

    pub fn execution_count(&self) -> usize {
        self.windows.lock().unwrap().len()
    }

    pub fn shared(&self) -> Arc<dyn ScriptRunner> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl ScriptRunner for RecordingRunner {
    async fn execute(&self, script: &str) -> Result<String, AutomationError> {
        let started = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let finished = Instant::now();
        self.windows.lock().unwrap().push(ExecutionWindow {
            script: script.to_string(),
            started,
            finished,
        });

        if let Some(result) = self.scripted.lock().unwrap().pop_front() {
            return result;
        }
        match self.outputs.get(script) {
            Some(result) => result.clone(),
            None => Ok(script.to_string()),
        }
    }
}

/// Panic if any two recorded windows overlap in time.
pub fn assert_no_overlap(windows: &[ExecutionWindow]) {
    for (i, first) in windows.iter().enumerate() {
        for second in &windows[i + 1..] {
            assert!(
                !first.overlaps(second),
                "scripts {:?} and {:?} overlapped",
                first.script,
                second.script
            );
        }
    }
}
