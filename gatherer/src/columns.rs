//! The shared column plan.
//!
//! Header and data rows are both derived from the same ordered walk:
//! optional timestamp, then bindings in configured order, then input
//! readouts in configured order. Keeping one computation rules out the
//! header/row drift that separate bookkeeping invites.

use crate::{
    binding::Binding,
    source::ObjectRegistry,
    triggers::InputReadout,
};
use chrono::Utc;

/// Value exported for a readout that cannot currently be read.
pub const UNREADABLE_READOUT: &str = "null";

/// Header columns for one configuration. Multi-column members contribute
/// each of their declared replacement headers.
pub fn header_columns(timestamps: bool, bindings: &[Binding], readouts: &[Box<dyn InputReadout>]) -> Vec<String> {
    let mut columns = Vec::new();
    if timestamps {
        columns.push("time".to_string());
    }
    for binding in bindings {
        columns.extend(binding.header_columns());
    }
    for readout in readouts {
        columns.push(readout.name().to_string());
    }
    columns
}

/// Value columns for one export tick, in the same order as
/// [`header_columns`]. A multi-column member contributes one entry whose
/// value is already pre-joined with the export separator, so the joined row
/// stays aligned with the header.
pub fn row_columns(
    timestamps: bool,
    bindings: &mut [Binding],
    readouts: &[Box<dyn InputReadout>],
    registry: &ObjectRegistry,
    separator: char,
) -> Vec<String> {
    let mut columns = Vec::new();
    if timestamps {
        columns.push(Utc::now().timestamp_millis().to_string());
    }
    for binding in bindings {
        columns.push(binding.read(registry, separator));
    }
    for readout in readouts {
        columns.push(readout.read().unwrap_or_else(|| UNREADABLE_READOUT.to_string()));
    }
    columns
}
