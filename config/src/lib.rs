#[macro_use]
extern crate tracing;

mod app_config;
mod args;

use app_config::AppConfig;
pub use app_config::{
    get_config_dir,
    get_data_dir,
};
pub use args::Args;
use data_gatherer_core::{
    BindingConfig,
    ExportMode,
    GathererSettings,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::HashMap,
    path::PathBuf,
};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    app_config: AppConfig,
    #[serde(default)]
    pub mode: ExportMode,
    /// Column separator for exported rows; a single character.
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default = "default_interval")]
    pub interval_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<BindingConfig>,
    /// Fire an export tick (and capture the line as a readout) per stdin line.
    #[serde(default = "default_true")]
    pub stdin_trigger: bool,
    #[serde(default)]
    pub verbose: bool,
}

fn default_separator() -> String {
    ";".to_string()
}

fn default_true() -> bool {
    true
}

fn default_interval() -> f64 {
    1.0
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl config::Source for Config {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new((*self).clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut cache = HashMap::<String, config::Value>::new();
        cache.insert("mode".to_string(), self.mode.to_string().into());
        cache.insert("separator".to_string(), self.separator.clone().into());
        cache.insert("timestamps".to_string(), self.timestamps.into());
        cache.insert("interval_secs".to_string(), self.interval_secs.into());
        cache.insert("stdin_trigger".to_string(), self.stdin_trigger.into());
        if let Some(path) = &self.export_path {
            cache.insert("export_path".to_string(), path.display().to_string().into());
        }
        if let Some(endpoint) = &self.endpoint {
            cache.insert("endpoint".to_string(), endpoint.to_string().into());
        }
        if !self.bindings.is_empty() {
            cache.insert(
                "bindings".to_string(),
                self.bindings
                    .iter()
                    .map(|binding| {
                        config::ValueKind::Table(config::Map::from_iter([
                            ("object".to_string(), binding.object.clone().into()),
                            ("component".to_string(), binding.component.clone().into()),
                            ("member".to_string(), binding.member.clone().into()),
                            ("column".to_string(), binding.column.clone().into()),
                        ]))
                    })
                    .collect::<Vec<_>>()
                    .into(),
            );
        }
        Ok(cache)
    }
}

impl Config {
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_str().unwrap_or_default())?
            .set_default("config_dir", config_dir.to_str().unwrap_or_default())?;

        builder = builder.add_source(Config::default());

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    /// Engine settings derived from this configuration. The export path
    /// defaults to a file inside the platform data directory.
    pub fn gatherer_settings(&self) -> GathererSettings {
        let mut chars = self.separator.chars();
        let separator = chars.next().unwrap_or(';');
        if chars.next().is_some() {
            warn!(configured = %self.separator, using = %separator, "separator must be a single character");
        }

        GathererSettings {
            mode: self.mode,
            separator,
            timestamps: self.timestamps,
            interval_secs: self.interval_secs,
            export_path: self
                .export_path
                .clone()
                .unwrap_or_else(|| get_data_dir().join("data-export.csv")),
            endpoint: self.endpoint.clone(),
        }
    }
}
