use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::month::YearMonth;
use crate::options::{EndBoundary, InvalidTimestampPolicy};

/// Default file name of the orders table inside the data directory.
pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";
/// Default file name of the order reviews table inside the data directory.
pub const REVIEWS_FILE: &str = "olist_order_reviews_dataset.csv";
/// Default file name of the order payments table inside the data directory.
pub const PAYMENTS_FILE: &str = "olist_order_payments_dataset.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Interactive e-commerce orders dashboard
#[derive(Parser, Debug, Clone)]
#[command(
    name = "orders-dashboard",
    about = "Interactive e-commerce orders dashboard for the terminal",
    version
)]
pub struct Settings {
    /// Directory holding the three input CSV files
    #[arg(long, env = "ORDERS_DASHBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Orders CSV (overrides --data-dir)
    #[arg(long)]
    pub orders: Option<PathBuf>,

    /// Order reviews CSV (overrides --data-dir)
    #[arg(long)]
    pub reviews: Option<PathBuf>,

    /// Order payments CSV (overrides --data-dir)
    #[arg(long)]
    pub payments: Option<PathBuf>,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "table"])]
    pub view: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Initial start month (YYYY-MM); defaults to the earliest month
    #[arg(long)]
    pub start: Option<YearMonth>,

    /// Initial end month (YYYY-MM); defaults to the latest month
    #[arg(long)]
    pub end: Option<YearMonth>,

    /// How the end month bounds the range
    #[arg(long, value_enum, default_value_t = EndBoundary::EndOfMonth)]
    pub end_boundary: EndBoundary,

    /// What to do with rows whose purchase timestamp cannot be parsed
    #[arg(long, value_enum, default_value_t = InvalidTimestampPolicy::Drop)]
    pub invalid_timestamps: InvalidTimestampPolicy,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.orders-dashboard/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_boundary: Option<EndBoundary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_timestamps: Option<InvalidTimestampPolicy>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".orders-dashboard").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] but with explicit arguments
    /// and config path so tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear saved configuration");
            }
            return Self::apply_debug(settings);
        }

        let mut last = LastUsedParams::load_from(config_path);
        if let Some(dir) = last.data_dir.take() {
            if dir.is_dir() {
                last.data_dir = Some(dir);
            } else {
                tracing::warn!(path = %dir.display(), "ignoring saved data directory that no longer exists");
            }
        }

        // CLI always wins over persisted values.
        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir.clone();
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "end_boundary") {
            if let Some(v) = last.end_boundary {
                settings.end_boundary = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "invalid_timestamps") {
            if let Some(v) = last.invalid_timestamps {
                settings.invalid_timestamps = v;
            }
        }

        settings = Self::apply_debug(settings);

        let mut params = LastUsedParams::from(&settings);
        // Only a directory that exists is remembered; a mistyped one would
        // otherwise fail every later run.
        if !params.data_dir.as_deref().is_some_and(Path::is_dir) {
            params.data_dir = last.data_dir;
        }
        if let Err(e) = params.save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used settings");
        }

        settings
    }

    /// Path of the orders CSV, honouring `--orders` over `--data-dir`.
    pub fn orders_path(&self) -> PathBuf {
        self.resolve_file(self.orders.as_ref(), ORDERS_FILE)
    }

    /// Path of the reviews CSV, honouring `--reviews` over `--data-dir`.
    pub fn reviews_path(&self) -> PathBuf {
        self.resolve_file(self.reviews.as_ref(), REVIEWS_FILE)
    }

    /// Path of the payments CSV, honouring `--payments` over `--data-dir`.
    pub fn payments_path(&self) -> PathBuf {
        self.resolve_file(self.payments.as_ref(), PAYMENTS_FILE)
    }

    /// `true` when all three tables are given by explicit path, so the data
    /// directory is never consulted.
    pub fn has_explicit_files(&self) -> bool {
        self.orders.is_some() && self.reviews.is_some() && self.payments.is_some()
    }

    fn resolve_file(&self, explicit: Option<&PathBuf>, default_name: &str) -> PathBuf {
        if let Some(p) = explicit {
            return p.clone();
        }
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(default_name)
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_dir: s.data_dir.clone(),
            view: Some(s.view.clone()),
            theme: Some(s.theme.clone()),
            end_boundary: Some(s.end_boundary),
            invalid_timestamps: Some(s.invalid_timestamps),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data_dir: Some(PathBuf::from("/data/olist")),
            view: Some("table".to_string()),
            theme: Some("dark".to_string()),
            end_boundary: Some(EndBoundary::MonthStart),
            invalid_timestamps: Some(InvalidTimestampPolicy::Reject),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.data_dir, Some(PathBuf::from("/data/olist")));
        assert_eq!(loaded.view, Some("table".to_string()));
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.end_boundary, Some(EndBoundary::MonthStart));
        assert_eq!(loaded.invalid_timestamps, Some(InvalidTimestampPolicy::Reject));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.data_dir.is_none());
        assert!(loaded.view.is_none());
        assert!(loaded.theme.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(LastUsedParams::load_from(&path).theme.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── Settings parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["orders-dashboard"]);
        assert!(settings.orders.is_none());
        assert_eq!(settings.view, "dashboard");
        assert_eq!(settings.theme, "auto");
        assert!(settings.start.is_none());
        assert!(settings.end.is_none());
        assert_eq!(settings.end_boundary, EndBoundary::EndOfMonth);
        assert_eq!(settings.invalid_timestamps, InvalidTimestampPolicy::Drop);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_months() {
        let settings =
            Settings::parse_from(["orders-dashboard", "--start", "2017-01", "--end", "2017-06"]);
        assert_eq!(settings.start.map(|m| m.to_string()), Some("2017-01".to_string()));
        assert_eq!(settings.end.map(|m| m.to_string()), Some("2017-06".to_string()));
    }

    #[test]
    fn test_settings_cli_rejects_bad_month() {
        let result = Settings::try_parse_from(["orders-dashboard", "--start", "2017-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_view() {
        let result = Settings::try_parse_from(["orders-dashboard", "--view", "pie"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_paths_from_data_dir() {
        let settings = Settings::parse_from(["orders-dashboard", "--data-dir", "/srv/olist"]);
        assert_eq!(
            settings.orders_path(),
            PathBuf::from("/srv/olist").join(ORDERS_FILE)
        );
        assert_eq!(
            settings.reviews_path(),
            PathBuf::from("/srv/olist").join(REVIEWS_FILE)
        );
        assert_eq!(
            settings.payments_path(),
            PathBuf::from("/srv/olist").join(PAYMENTS_FILE)
        );
    }

    #[test]
    fn test_explicit_file_overrides_data_dir() {
        let settings = Settings::parse_from([
            "orders-dashboard",
            "--data-dir",
            "/srv/olist",
            "--payments",
            "/tmp/payments.csv",
        ]);
        assert_eq!(settings.payments_path(), PathBuf::from("/tmp/payments.csv"));
        assert_eq!(
            settings.orders_path(),
            PathBuf::from("/srv/olist").join(ORDERS_FILE)
        );
    }

    #[test]
    fn test_has_explicit_files_needs_all_three() {
        let partial = Settings::parse_from(["orders-dashboard", "--orders", "/tmp/o.csv"]);
        assert!(!partial.has_explicit_files());

        let full = Settings::parse_from([
            "orders-dashboard",
            "--data-dir",
            "/no/such/dir",
            "--orders",
            "/tmp/o.csv",
            "--reviews",
            "/tmp/r.csv",
            "--payments",
            "/tmp/p.csv",
        ]);
        assert!(full.has_explicit_files());
    }

    #[test]
    fn test_file_paths_default_to_current_dir() {
        let settings = Settings::parse_from(["orders-dashboard"]);
        assert_eq!(settings.orders_path(), PathBuf::from(".").join(ORDERS_FILE));
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let data_dir = tmp.path().join("olist");
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        LastUsedParams {
            data_dir: Some(data_dir.clone()),
            theme: Some("dark".to_string()),
            end_boundary: Some(EndBoundary::MonthStart),
            invalid_timestamps: Some(InvalidTimestampPolicy::Reject),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["orders-dashboard".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.end_boundary, EndBoundary::MonthStart);
        assert_eq!(settings.invalid_timestamps, InvalidTimestampPolicy::Reject);
        assert_eq!(settings.data_dir, Some(data_dir));
    }

    #[test]
    fn test_cli_enum_options_override_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            end_boundary: Some(EndBoundary::MonthStart),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "orders-dashboard".into(),
                "--end-boundary".into(),
                "end-of-month".into(),
                "--invalid-timestamps".into(),
                "reject".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.end_boundary, EndBoundary::EndOfMonth);
        assert_eq!(settings.invalid_timestamps, InvalidTimestampPolicy::Reject);
    }

    #[test]
    fn test_settings_cli_rejects_unknown_boundary() {
        let result = Settings::try_parse_from(["orders-dashboard", "--end-boundary", "eom"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_data_dir_is_not_remembered() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let missing = tmp.path().join("no-such-dir");

        let first = Settings::load_with_last_used_impl(
            vec![
                "orders-dashboard".into(),
                "--data-dir".into(),
                missing.clone().into_os_string(),
            ],
            &config_path,
        );
        assert_eq!(first.data_dir, Some(missing));

        let second =
            Settings::load_with_last_used_impl(vec!["orders-dashboard".into()], &config_path);
        assert!(second.data_dir.is_none());
        assert!(LastUsedParams::load_from(&config_path).data_dir.is_none());
    }

    #[test]
    fn test_missing_data_dir_keeps_previous_good_one() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let good = tmp.path().join("olist");
        std::fs::create_dir_all(&good).expect("create data dir");

        Settings::load_with_last_used_impl(
            vec![
                "orders-dashboard".into(),
                "--data-dir".into(),
                good.clone().into_os_string(),
            ],
            &config_path,
        );
        Settings::load_with_last_used_impl(
            vec![
                "orders-dashboard".into(),
                "--data-dir".into(),
                tmp.path().join("typo").into_os_string(),
            ],
            &config_path,
        );

        let third =
            Settings::load_with_last_used_impl(vec!["orders-dashboard".into()], &config_path);
        assert_eq!(third.data_dir, Some(good));
    }

    #[test]
    fn test_saved_data_dir_that_vanished_is_ignored() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            data_dir: Some(tmp.path().join("removed")),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["orders-dashboard".into()], &config_path);
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("table".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "orders-dashboard".into(),
                "--theme".into(),
                "light".into(),
                "--view".into(),
                "dashboard".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.view, "dashboard");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["orders-dashboard".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        let settings = Settings::load_with_last_used_impl(
            vec!["orders-dashboard".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["orders-dashboard".into(), "--theme".into(), "classic".into()],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme, Some("classic".to_string()));
        assert_eq!(loaded.view, Some("dashboard".to_string()));
    }
}
