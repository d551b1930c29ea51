//! External input capabilities: pollable readouts appended after the binding
//! columns, and discrete triggers that each fire one export tick.

use tokio::sync::mpsc;

/// A named input value polled once per export tick.
pub trait InputReadout: Send + Sync {
    fn name(&self) -> &str;

    /// Current raw value, or `None` when the input cannot be read right now.
    fn read(&self) -> Option<String>;
}

/// Why an export tick fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    Timer,
    Input,
}

/// Clonable handle for firing input-triggered exports. Each `fire` produces
/// one independent export tick; there is no debouncing, so a trigger and the
/// periodic timer landing together produce two rows.
#[derive(Clone)]
pub struct ExportTrigger {
    tx: mpsc::UnboundedSender<TickReason>,
}

impl ExportTrigger {
    pub(crate) fn new(tx: mpsc::UnboundedSender<TickReason>) -> Self {
        Self { tx }
    }

    pub fn fire(&self) {
        if self.tx.send(TickReason::Input).is_err() {
            debug!("export trigger fired after gatherer shut down");
        }
    }
}
