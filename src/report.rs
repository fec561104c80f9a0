//! Batch results and how they are shown to the user

use std::io::{self, Write};
use std::process::ExitCode;

use crate::types::TaskOutcome;

/// Every task outcome of one batch, in completion order
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<TaskOutcome>,
}

impl BatchReport {
    /// Wrap collected outcomes
    pub fn new(outcomes: Vec<TaskOutcome>) -> Self {
        Self { outcomes }
    }

    /// All outcomes, unordered relative to task ids
    pub fn outcomes(&self) -> &[TaskOutcome] {
        &self.outcomes
    }

    /// Number of outcomes (equals the number of launched tasks)
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no task reported
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Photos written
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Saved { .. }))
    }

    /// Tasks that never got a usable candidate
    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::NoCandidateFound { .. }))
    }

    /// Tasks that failed
    pub fn failures(&self) -> usize {
        self.count(TaskOutcome::is_failure)
    }

    /// True if at least one task failed
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(TaskOutcome::is_failure)
    }

    /// Numeric exit status: 0 when no task failed, 1 otherwise
    pub fn exit_status(&self) -> u8 {
        u8::from(self.has_failures())
    }

    /// Process exit code for this batch
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Print every error, then every success and no-candidate message
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for outcome in &self.outcomes {
            if let TaskOutcome::Failed { error, .. } = outcome {
                writeln!(out, "Error: {error}")?;
            }
        }

        for outcome in &self.outcomes {
            match outcome {
                TaskOutcome::Saved { path, .. } => {
                    writeln!(out, "Cat photo saved to {}", path.display())?;
                }
                TaskOutcome::NoCandidateFound { attempts, .. } => {
                    writeln!(out, "No cat photo found after {attempts} attempts")?;
                }
                TaskOutcome::Failed { .. } => {}
            }
        }

        Ok(())
    }

    fn count(&self, predicate: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}
