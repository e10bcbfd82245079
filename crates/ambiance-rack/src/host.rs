//! Chain execution with per-slot fault isolation.

use std::collections::VecDeque;
use std::sync::Arc;

use ambiance_core::{Buffer, buffer};
use parking_lot::Mutex;
use serde::Serialize;

use crate::builtin;
use crate::chain::{PluginChain, PluginSlot};
use crate::descriptor::PluginKind;
use crate::error::{RackError, RackResult};
use crate::external::{CommandBackend, ExternalBackend};

/// Recent slot failures kept for introspection.
const FAILURE_HISTORY: usize = 32;

/// A slot that was skipped during chain execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotFailure {
    /// Slug of the skipped slot.
    pub slug: String,
    /// Position of the slot within its chain.
    pub index: usize,
    /// Why it was skipped.
    pub reason: String,
}

/// Runs plugin chains.
///
/// Built-in processors are built fresh for every slot execution. External
/// slots go through the optional backend. Any slot that fails, for any
/// reason, is passed through and the chain carries on.
pub struct PluginHost {
    external: Option<Arc<dyn ExternalBackend>>,
    failures: Mutex<VecDeque<SlotFailure>>,
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("external", &self.external.as_ref().map(|b| b.name().to_string()))
            .field("failures", &self.failures.lock().len())
            .finish()
    }
}

impl PluginHost {
    /// Host with built-ins only. External slots always pass through.
    pub fn new() -> Self {
        Self {
            external: None,
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Host that delegates external slots to `backend`.
    pub fn with_external(backend: Arc<dyn ExternalBackend>) -> Self {
        Self {
            external: Some(backend),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Host using the [`CommandBackend`] named by the environment, if any.
    pub fn from_env() -> Self {
        match CommandBackend::from_env() {
            Some(backend) => Self::with_external(Arc::new(backend)),
            None => Self::new(),
        }
    }

    /// Name of the external backend, if one is attached.
    pub fn external_backend(&self) -> Option<&str> {
        self.external.as_deref().map(ExternalBackend::name)
    }

    /// Whether external slots can currently run.
    pub fn external_available(&self) -> bool {
        self.external.as_ref().is_some_and(|b| b.is_available())
    }

    /// Run `input` through every slot of `chain` in order.
    ///
    /// Never fails: a slot that cannot run, or produces a buffer of the
    /// wrong length or with non-finite samples, is skipped.
    pub fn process_chain(&self, chain: &PluginChain, input: Buffer, sample_rate: u32) -> Buffer {
        chain
            .slots()
            .iter()
            .enumerate()
            .fold(input, |buffer, (index, slot)| {
                self.attempt(index, slot, buffer, sample_rate)
            })
    }

    /// Most recent slot failures, oldest first.
    pub fn recent_failures(&self) -> Vec<SlotFailure> {
        self.failures.lock().iter().cloned().collect()
    }

    /// Forget recorded failures.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Run one slot; on any failure return `input` unchanged.
    fn attempt(&self, index: usize, slot: &PluginSlot, input: Buffer, sample_rate: u32) -> Buffer {
        match self
            .run_slot(slot, input.clone(), sample_rate)
            .and_then(|output| validate_output(slot.slug(), input.len(), output))
        {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(slug = slot.slug(), index, error = %err, "plugin slot skipped");
                self.record(SlotFailure {
                    slug: slot.slug().to_string(),
                    index,
                    reason: err.to_string(),
                });
                input
            }
        }
    }

    fn run_slot(&self, slot: &PluginSlot, input: Buffer, sample_rate: u32) -> RackResult<Buffer> {
        let descriptor = &slot.descriptor;
        match descriptor.kind {
            PluginKind::Builtin => {
                let mut processor = builtin::instantiate(&descriptor.slug, &slot.params)?;
                Ok(processor.process(input, sample_rate))
            }
            PluginKind::External => {
                let backend = self.external.as_ref().ok_or_else(|| {
                    RackError::Unavailable("no external plugin backend configured".to_string())
                })?;
                if !backend.is_available() {
                    return Err(RackError::Unavailable(format!(
                        "backend '{}' is not available",
                        backend.name()
                    )));
                }
                let path = descriptor.path.as_deref().ok_or_else(|| {
                    RackError::external(&descriptor.slug, "descriptor has no plugin path")
                })?;
                backend.process(path, &slot.params, &input, sample_rate)
            }
        }
    }

    fn record(&self, failure: SlotFailure) {
        let mut failures = self.failures.lock();
        if failures.len() == FAILURE_HISTORY {
            failures.pop_front();
        }
        failures.push_back(failure);
    }
}

fn validate_output(slug: &str, expected: usize, output: Buffer) -> RackResult<Buffer> {
    if output.len() != expected {
        return Err(RackError::InvalidOutput {
            slug: slug.to_string(),
            reason: format!("expected {expected} samples, got {}", output.len()),
        });
    }
    if !buffer::is_finite(&output) {
        return Err(RackError::InvalidOutput {
            slug: slug.to_string(),
            reason: "non-finite samples".to_string(),
        });
    }
    Ok(output)
}
