use clap::Parser;

/// Experiment data gatherer
#[derive(Parser, Debug, Clone)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Export destination: local, http or both.
    #[clap(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Export file path; extensions .csv/.txt/.log are accepted as-is.
    #[clap(long = "export-path", value_name = "FILE")]
    pub export_path: Option<String>,

    /// HTTP endpoint receiving exported rows.
    #[clap(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Periodic export interval in seconds; non-positive disables the timer.
    #[clap(long = "interval-secs", value_name = "SECONDS")]
    pub interval_secs: Option<f64>,

    /// Omit the leading Unix-millisecond timestamp column.
    #[clap(long = "no-timestamps", action)]
    pub no_timestamps: bool,

    /// Disable the per-stdin-line export trigger.
    #[clap(long = "no-stdin-trigger", action)]
    pub no_stdin_trigger: bool,

    /// Enables verbose logging.
    #[clap(long, action)]
    pub verbose: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(mode) = &self.mode {
                cache.insert("mode".to_string(), mode.clone().into());
            }
            if let Some(export_path) = &self.export_path {
                cache.insert("export_path".to_string(), export_path.clone().into());
            }
            if let Some(endpoint) = &self.endpoint {
                cache.insert("endpoint".to_string(), endpoint.clone().into());
            }
            if let Some(interval_secs) = self.interval_secs {
                cache.insert("interval_secs".to_string(), interval_secs.into());
            }
            if self.no_timestamps {
                cache.insert("timestamps".to_string(), false.into());
            }
            if self.no_stdin_trigger {
                cache.insert("stdin_trigger".to_string(), false.into());
            }
            if self.verbose {
                cache.insert("verbose".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();
    let data_dir_path = crate::get_data_dir().display().to_string();

    format!(
        "\
Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
