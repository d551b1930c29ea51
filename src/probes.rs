//! Built-in demo probes registered by the CLI so the default configuration
//! produces meaningful output without a host application.

use data_gatherer_core::{
    Exportable,
    ExportValue,
    InputReadout,
    MemberDescriptor,
    ObjectRegistry,
    SourceObject,
    ValueKind,
};
use std::{
    sync::{
        atomic::{
            AtomicU64,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Instant,
};

pub fn register_demo_probes(registry: &mut ObjectRegistry) {
    registry.register(
        SourceObject::new("session")
            .with_component(Stopwatch::new())
            .with_component(TickCounter::default())
            .with_component(ProcessInfo),
    );
    registry.register(SourceObject::new("head").with_component(SimulatedPose::new()));
}

/// Wall-clock time since probe creation.
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Exportable for Stopwatch {
    fn type_name(&self) -> &str {
        "Stopwatch"
    }

    fn members(&self) -> Vec<MemberDescriptor> {
        vec![
            MemberDescriptor::new("elapsed_secs", ValueKind::Float),
            MemberDescriptor::new("elapsed_millis", ValueKind::Int),
        ]
    }

    fn read(&self, member: &str, _separator: char) -> Option<ExportValue> {
        let elapsed = self.started.elapsed();
        match member {
            "elapsed_secs" => Some(ExportValue::Float(elapsed.as_secs_f64())),
            "elapsed_millis" => Some(ExportValue::Int(elapsed.as_millis() as i64)),
            _ => None,
        }
    }
}

/// Counts how often its `count` member has been sampled.
#[derive(Default)]
pub struct TickCounter {
    count: AtomicU64,
}

impl Exportable for TickCounter {
    fn type_name(&self) -> &str {
        "TickCounter"
    }

    fn members(&self) -> Vec<MemberDescriptor> {
        vec![MemberDescriptor::new("count", ValueKind::UInt)]
    }

    fn read(&self, member: &str, _separator: char) -> Option<ExportValue> {
        (member == "count").then(|| ExportValue::UInt(self.count.fetch_add(1, Ordering::Relaxed) + 1))
    }
}

pub struct ProcessInfo;

impl Exportable for ProcessInfo {
    fn type_name(&self) -> &str {
        "ProcessInfo"
    }

    fn members(&self) -> Vec<MemberDescriptor> {
        vec![MemberDescriptor::new("pid", ValueKind::UInt)]
    }

    fn read(&self, member: &str, _separator: char) -> Option<ExportValue> {
        (member == "pid").then(|| ExportValue::UInt(std::process::id() as u64))
    }
}

/// A slowly swaying head pose, standing in for a tracked device. Exercises
/// the vector and quaternion export kinds plus a multi-column summary member.
pub struct SimulatedPose {
    started: Instant,
}

impl SimulatedPose {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }

    fn position(&self, t: f32) -> [f32; 3] {
        [
            0.05 * (0.5 * t).sin(),
            1.7 + 0.02 * (1.3 * t).sin(),
            0.05 * (0.5 * t).cos(),
        ]
    }

    fn rotation(&self, t: f32) -> [f32; 4] {
        let yaw = 0.3 * (0.2 * t).sin();
        [0.0, (yaw / 2.0).sin(), 0.0, (yaw / 2.0).cos()]
    }
}

impl Exportable for SimulatedPose {
    fn type_name(&self) -> &str {
        "SimulatedPose"
    }

    fn members(&self) -> Vec<MemberDescriptor> {
        vec![
            MemberDescriptor::new("position", ValueKind::Vec3),
            MemberDescriptor::new("rotation", ValueKind::Quat),
            MemberDescriptor::new("pose_summary", ValueKind::Str)
                .with_separator_arg()
                .with_headers(["pose_position", "pose_rotation"])
                .with_notice("pose_summary spans two columns, its headers replace the configured column"),
        ]
    }

    fn read(&self, member: &str, separator: char) -> Option<ExportValue> {
        let t = self.started.elapsed().as_secs_f32();
        match member {
            "position" => Some(ExportValue::Vec3(self.position(t))),
            "rotation" => Some(ExportValue::Quat(self.rotation(t))),
            "pose_summary" => Some(ExportValue::Str(format!(
                "{}{separator}{}",
                ExportValue::Vec3(self.position(t)),
                ExportValue::Quat(self.rotation(t)),
            ))),
            _ => None,
        }
    }
}

/// Shared readout holding the most recent stdin line.
#[derive(Clone, Default)]
pub struct LineReadout {
    last: Arc<Mutex<Option<String>>>,
}

impl LineReadout {
    pub fn set(&self, line: String) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some(line);
        }
    }
}

impl InputReadout for LineReadout {
    fn name(&self) -> &str {
        "last_input"
    }

    fn read(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }
}
