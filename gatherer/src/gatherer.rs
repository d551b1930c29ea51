//! The sampler/exporter.
//!
//! A [`DataGatherer`] owns the object registry, the configured bindings and
//! readouts, and the active sinks. Export ticks arrive on one channel, fed by
//! the periodic timer task and by [`ExportTrigger`] handles; each message
//! produces exactly one row.

use crate::{
    binding::{
        Binding,
        BindingConfig,
    },
    columns,
    csv,
    sinks::{
        FileSink,
        HttpSink,
    },
    source::ObjectRegistry,
    triggers::{
        ExportTrigger,
        InputReadout,
        TickReason,
    },
};
use eyre::Result;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    path::PathBuf,
    time::Duration,
};
use strum::{
    Display,
    EnumString,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Which sinks receive exported rows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Local,
    Http,
    Both,
}

impl ExportMode {
    pub fn uses_local(&self) -> bool {
        matches!(self, ExportMode::Local | ExportMode::Both)
    }

    pub fn uses_http(&self) -> bool {
        matches!(self, ExportMode::Http | ExportMode::Both)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GathererSettings {
    pub mode: ExportMode,
    pub separator: char,
    /// Prepend a Unix-millisecond timestamp column to every row.
    pub timestamps: bool,
    /// Periodic export interval; non-positive disables the timer.
    pub interval_secs: f64,
    pub export_path: PathBuf,
    pub endpoint: Option<Url>,
}

impl Default for GathererSettings {
    fn default() -> Self {
        Self {
            mode: ExportMode::default(),
            separator: csv::DEFAULT_SEPARATOR,
            timestamps: true,
            interval_secs: 1.0,
            export_path: PathBuf::from("data-export.csv"),
            endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Uninitialized,
    Ready,
    Closed,
}

struct PeriodicTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct DataGatherer {
    settings: GathererSettings,
    registry: ObjectRegistry,
    bindings: Vec<Binding>,
    readouts: Vec<Box<dyn InputReadout>>,
    file: Option<FileSink>,
    http: Option<HttpSink>,
    state: SessionState,
    periodic: Option<PeriodicTask>,
    tick_tx: mpsc::UnboundedSender<TickReason>,
    tick_rx: Option<mpsc::UnboundedReceiver<TickReason>>,
}

impl DataGatherer {
    pub fn new(settings: GathererSettings, registry: ObjectRegistry) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            settings,
            registry,
            bindings: Vec::new(),
            readouts: Vec::new(),
            file: None,
            http: None,
            state: SessionState::Uninitialized,
            periodic: None,
            tick_tx,
            tick_rx: Some(tick_rx),
        }
    }

    pub fn add_binding(&mut self, config: BindingConfig) {
        self.bindings.push(Binding::new(config));
    }

    pub fn add_readout(&mut self, readout: impl InputReadout + 'static) {
        self.readouts.push(Box::new(readout));
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.registry
    }

    /// Handle for firing input-triggered exports; clonable and usable from
    /// other tasks.
    pub fn trigger(&self) -> ExportTrigger {
        ExportTrigger::new(self.tick_tx.clone())
    }

    fn header_row(&self) -> String {
        csv::join_as_csv(
            columns::header_columns(self.settings.timestamps, &self.bindings, &self.readouts),
            self.settings.separator,
            false,
        )
    }

    /// Starts the session: validates every binding (invalid ones warn and
    /// degrade, they never block the others) and opens the configured sinks.
    /// The header row is written to a fresh local file and posted to the
    /// endpoint as session initialization.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            warn!(state = ?self.state, "gatherer already started");
            return Ok(());
        }

        for binding in &mut self.bindings {
            if !binding.validate(&self.registry) {
                warn!(binding = %binding.describe(), "binding does not resolve, it will export empty columns");
            }
        }

        let header = self.header_row();

        if self.settings.mode.uses_local() {
            self.file = Some(FileSink::open(self.settings.export_path.clone(), &header)?);
        }

        if self.settings.mode.uses_http() {
            match &self.settings.endpoint {
                Some(endpoint) => {
                    let sink = HttpSink::new(endpoint.clone());
                    sink.post(header.clone());
                    self.http = Some(sink);
                }
                None => warn!("http export selected but no endpoint configured, skipping http sink"),
            }
        }

        self.state = SessionState::Ready;
        info!(
            mode = %self.settings.mode,
            bindings = self.bindings.len(),
            readouts = self.readouts.len(),
            "data gatherer ready"
        );
        Ok(())
    }

    /// Produces and dispatches exactly one export row.
    pub fn export_once(&mut self) {
        if self.state != SessionState::Ready {
            warn!(state = ?self.state, "export tick ignored, gatherer is not running");
            return;
        }

        let row = csv::join_as_csv(
            columns::row_columns(
                self.settings.timestamps,
                &mut self.bindings,
                &self.readouts,
                &self.registry,
                self.settings.separator,
            ),
            self.settings.separator,
            false,
        );

        if let Some(file) = &mut self.file {
            file.append(&row);
        }
        if let Some(http) = &self.http {
            http.post(row);
        }
    }

    /// Starts (or restarts) the periodic export timer. A running timer is
    /// cancelled first, so there is never more than one repeating loop.
    pub fn start_periodic(&mut self) {
        self.stop_periodic();

        let interval_secs = self.settings.interval_secs;
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            warn!(interval_secs, "periodic export disabled, interval must be positive");
            return;
        }

        let period = Duration::from_secs_f64(interval_secs);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.tick_tx.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately; the
            // first export should land one period after start.
            interval.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(TickReason::Timer).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        self.periodic = Some(PeriodicTask { token, handle });
        debug!(interval_secs, "periodic export started");
    }

    pub fn stop_periodic(&mut self) {
        if let Some(task) = self.periodic.take() {
            task.token.cancel();
            task.handle.abort();
            debug!("periodic export stopped");
        }
    }

    /// Ends the session: cancels the timer and flushes/closes the file sink.
    /// In-flight HTTP posts are abandoned, not aborted.
    pub fn close(&mut self) {
        self.stop_periodic();
        if let Some(file) = self.file.take() {
            file.close();
        }
        self.http = None;
        self.state = SessionState::Closed;
        info!("data gatherer closed");
    }

    /// Runs the full session: start, periodic timer, tick loop until
    /// `shutdown` is cancelled, then teardown.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        self.start()?;
        self.start_periodic();

        let mut tick_rx = self.tick_rx.take().expect("tick receiver already taken");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                reason = tick_rx.recv() => match reason {
                    Some(reason) => {
                        debug!(?reason, "export tick");
                        self.export_once();
                    }
                    None => break,
                },
            }
        }

        self.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use temp_dir::TempDir;

    fn local_gatherer(dir: &TempDir) -> DataGatherer {
        let mut registry = ObjectRegistry::new();
        registry.register(crate::source::SourceObject::new("rig"));
        let settings = GathererSettings {
            export_path: dir.path().join("session.csv"),
            timestamps: false,
            ..GathererSettings::default()
        };
        let mut gatherer = DataGatherer::new(settings, registry);
        gatherer.add_binding(BindingConfig {
            object: "rig".into(),
            component: "Game Object".into(),
            member: "name".into(),
            column: "object_name".into(),
        });
        gatherer
    }

    #[tokio::test]
    async fn one_tick_writes_header_and_one_row() {
        let dir = TempDir::new().unwrap();
        let mut gatherer = local_gatherer(&dir);
        gatherer.start().unwrap();
        gatherer.export_once();
        gatherer.close();

        let content = std::fs::read_to_string(dir.path().join("session.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["object_name", "rig"]);
    }

    #[tokio::test]
    async fn invalid_bindings_export_empty_columns() {
        let dir = TempDir::new().unwrap();
        let mut gatherer = local_gatherer(&dir);
        gatherer.add_binding(BindingConfig {
            object: "missing".into(),
            component: "Nope".into(),
            member: "value".into(),
            column: "broken".into(),
        });
        gatherer.start().unwrap();
        gatherer.export_once();
        gatherer.close();

        let content = std::fs::read_to_string(dir.path().join("session.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["object_name;broken", "rig;"]);
    }

    #[tokio::test]
    async fn failing_http_endpoint_never_blocks_ticks() {
        let mut registry = ObjectRegistry::new();
        registry.register(crate::source::SourceObject::new("rig"));
        let settings = GathererSettings {
            mode: ExportMode::Http,
            timestamps: false,
            endpoint: Some("http://127.0.0.1:9/export".parse().unwrap()),
            ..GathererSettings::default()
        };
        let mut gatherer = DataGatherer::new(settings, registry);
        gatherer.add_binding(BindingConfig {
            object: "rig".into(),
            component: "Game Object".into(),
            member: "name".into(),
            column: "object_name".into(),
        });

        gatherer.start().unwrap();
        for _ in 0..5 {
            gatherer.export_once();
            tokio::task::yield_now().await;
        }
        gatherer.close();
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_periodic_timer_keeps_one_loop() {
        let mut registry = ObjectRegistry::new();
        registry.register(crate::source::SourceObject::new("rig"));
        let settings = GathererSettings {
            // No endpoint: http mode degrades to no sink, ticks still count.
            mode: ExportMode::Http,
            ..GathererSettings::default()
        };
        let mut gatherer = DataGatherer::new(settings, registry);
        gatherer.start().unwrap();

        gatherer.start_periodic();
        gatherer.start_periodic();

        for _ in 0..14 {
            tokio::time::advance(Duration::from_millis(250)).await;
            tokio::task::yield_now().await;
        }

        gatherer.stop_periodic();
        let mut tick_rx = gatherer.tick_rx.take().unwrap();
        let mut ticks = 0;
        while tick_rx.try_recv().is_ok() {
            ticks += 1;
        }
        // 3.5 seconds at a 1 second interval: one timer yields 3 ticks, a
        // duplicated timer would have yielded 6.
        assert_eq!(ticks, 3);
    }

    #[tokio::test]
    async fn triggers_produce_independent_rows() {
        let dir = TempDir::new().unwrap();
        let mut gatherer = local_gatherer(&dir);
        let trigger = gatherer.trigger();
        let shutdown = CancellationToken::new();

        trigger.fire();
        trigger.fire();

        let stop = shutdown.clone();
        let handle = tokio::spawn(gatherer.run(stop));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();
        handle.await.unwrap().unwrap();

        let content = std::fs::read_to_string(dir.path().join("session.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["object_name", "rig", "rig"]);
    }

    #[tokio::test]
    async fn non_positive_interval_disables_timer() {
        let dir = TempDir::new().unwrap();
        let mut gatherer = local_gatherer(&dir);
        gatherer.settings.interval_secs = 0.0;
        gatherer.start().unwrap();
        gatherer.start_periodic();
        assert!(gatherer.periodic.is_none());
        gatherer.close();
    }
}
