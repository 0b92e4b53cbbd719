//! Server configuration – reads/writes `~/.teleop/config.toml`.
//!
//! Precedence, lowest first: built-in defaults, the config file, `TELEOP_*`
//! environment variables, the command line.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use teleop_middleware::SupervisorConfig;
use teleop_runtime::ArbiterConfig;
use teleop_types::TeleopError;

/// Persisted server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listening socket binds to; also the robot's address.
    pub robot_addr: String,
    pub listen_port: u16,
    /// How often a new connection attempt may start.
    pub reconnect_interval_ms: u64,
    pub bind_retry_ms: u64,
    /// Longest tolerated silence between frames.
    pub watchdog_ms: u64,
    pub read_buffer_bytes: usize,
    pub max_inflight_events: usize,
    pub forward_scale: f32,
    pub twist_scale: f32,
    /// Leave autonomous life, stiffness and volume untouched at startup.
    pub skip_robot_prepare: bool,
}

impl Default for Config {
    fn default() -> Self {
        let supervisor = SupervisorConfig::new("");
        let arbiter = ArbiterConfig::default();
        Self {
            robot_addr: String::new(),
            listen_port: supervisor.port,
            reconnect_interval_ms: millis(supervisor.reconnect_interval),
            bind_retry_ms: millis(supervisor.bind_retry),
            watchdog_ms: millis(supervisor.watchdog),
            read_buffer_bytes: supervisor.read_buffer_bytes,
            max_inflight_events: supervisor.max_inflight_events,
            forward_scale: arbiter.forward_scale,
            twist_scale: arbiter.twist_scale,
            skip_robot_prepare: false,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl Config {
    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), TeleopError> {
        if self.robot_addr.trim().is_empty() {
            return Err(TeleopError::Config("robot_addr is empty".into()));
        }
        let nonzero = [
            ("listen_port", u64::from(self.listen_port)),
            ("reconnect_interval_ms", self.reconnect_interval_ms),
            ("bind_retry_ms", self.bind_retry_ms),
            ("watchdog_ms", self.watchdog_ms),
            ("read_buffer_bytes", self.read_buffer_bytes as u64),
            ("max_inflight_events", self.max_inflight_events as u64),
        ];
        if let Some((field, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(TeleopError::Config(format!("{field} must be non-zero")));
        }
        for (field, scale) in [
            ("forward_scale", self.forward_scale),
            ("twist_scale", self.twist_scale),
        ] {
            if !scale.is_finite() || scale < 0.0 {
                return Err(TeleopError::Config(format!(
                    "{field} must be a finite, non-negative number"
                )));
            }
        }
        Ok(())
    }

    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            bind_host: self.robot_addr.clone(),
            port: self.listen_port,
            reconnect_interval: Duration::from_millis(self.reconnect_interval_ms),
            bind_retry: Duration::from_millis(self.bind_retry_ms),
            watchdog: Duration::from_millis(self.watchdog_ms),
            read_buffer_bytes: self.read_buffer_bytes,
            max_inflight_events: self.max_inflight_events,
        }
    }

    pub fn arbiter_config(&self) -> ArbiterConfig {
        ArbiterConfig {
            forward_scale: self.forward_scale,
            twist_scale: self.twist_scale,
        }
    }
}

/// Return the path to `~/.teleop/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".teleop").join("config.toml")
}

/// Defaults, then the file at `path` when it exists, then the environment.
pub fn load_from(path: &Path) -> Result<Config, TeleopError> {
    let mut cfg = read_from(path)?;
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// The file at `path` over the defaults; defaults alone when it is missing.
pub(crate) fn read_from(path: &Path) -> Result<Config, TeleopError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| TeleopError::Config(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&raw)
        .map_err(|e| TeleopError::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Apply `TELEOP_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `TELEOP_ROBOT_ADDR` | `robot_addr` |
/// | `TELEOP_LISTEN_PORT` | `listen_port` |
/// | `TELEOP_RECONNECT_INTERVAL_MS` | `reconnect_interval_ms` |
/// | `TELEOP_BIND_RETRY_MS` | `bind_retry_ms` |
/// | `TELEOP_WATCHDOG_MS` | `watchdog_ms` |
/// | `TELEOP_READ_BUFFER_BYTES` | `read_buffer_bytes` |
/// | `TELEOP_MAX_INFLIGHT_EVENTS` | `max_inflight_events` |
/// | `TELEOP_FORWARD_SCALE` | `forward_scale` |
/// | `TELEOP_TWIST_SCALE` | `twist_scale` |
/// | `TELEOP_SKIP_ROBOT_PREPARE` | `skip_robot_prepare` |
pub fn apply_env_overrides(cfg: &mut Config) -> Result<(), TeleopError> {
    apply_overrides(cfg, |name| std::env::var(name).ok())
}

fn apply_overrides(
    cfg: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), TeleopError> {
    if let Some(v) = lookup("TELEOP_ROBOT_ADDR") {
        cfg.robot_addr = v;
    }
    parse_into(&lookup, "TELEOP_LISTEN_PORT", &mut cfg.listen_port)?;
    parse_into(&lookup, "TELEOP_RECONNECT_INTERVAL_MS", &mut cfg.reconnect_interval_ms)?;
    parse_into(&lookup, "TELEOP_BIND_RETRY_MS", &mut cfg.bind_retry_ms)?;
    parse_into(&lookup, "TELEOP_WATCHDOG_MS", &mut cfg.watchdog_ms)?;
    parse_into(&lookup, "TELEOP_READ_BUFFER_BYTES", &mut cfg.read_buffer_bytes)?;
    parse_into(&lookup, "TELEOP_MAX_INFLIGHT_EVENTS", &mut cfg.max_inflight_events)?;
    parse_into(&lookup, "TELEOP_FORWARD_SCALE", &mut cfg.forward_scale)?;
    parse_into(&lookup, "TELEOP_TWIST_SCALE", &mut cfg.twist_scale)?;
    parse_into(&lookup, "TELEOP_SKIP_ROBOT_PREPARE", &mut cfg.skip_robot_prepare)?;
    Ok(())
}

fn parse_into<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    field: &mut T,
) -> Result<(), TeleopError>
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return Ok(());
    };
    *field = raw
        .trim()
        .parse()
        .map_err(|e| TeleopError::Config(format!("{name}={raw:?}: {e}")))?;
    Ok(())
}

/// Write `cfg` to `path`, creating the parent directory if necessary.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), TeleopError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| TeleopError::Config(format!("failed to create config directory: {e}")))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                TeleopError::Config(format!("failed to restrict config directory: {e}"))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| TeleopError::Config(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw)
        .map_err(|e| TeleopError::Config(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn valid() -> Config {
        Config {
            robot_addr: "192.168.1.20".into(),
            ..Config::default()
        }
    }

    #[test]
    fn defaults_match_the_wire_protocol() {
        let cfg = Config::default();
        assert_eq!(cfg.listen_port, 8888);
        assert_eq!(cfg.reconnect_interval_ms, 2000);
        assert_eq!(cfg.bind_retry_ms, 1000);
        assert_eq!(cfg.watchdog_ms, 2000);
        assert_eq!(cfg.read_buffer_bytes, 2048);
        assert_eq!(cfg.max_inflight_events, 32);
        assert!((cfg.forward_scale - 0.4).abs() < f32::EPSILON);
        assert!((cfg.twist_scale - 0.6).abs() < f32::EPSILON);
        assert!(!cfg.skip_robot_prepare);
    }

    #[test]
    fn config_path_points_to_teleop_dir() {
        let p = config_path_for_home("/home/operator");
        assert_eq!(p, PathBuf::from("/home/operator/.teleop/config.toml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let cfg = read_from(&path).expect("load");
        assert_eq!(cfg.listen_port, 8888);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "robot_addr = \"10.0.0.7\"\nwatchdog_ms = 500\n").unwrap();

        let cfg = read_from(&path).expect("load");
        assert_eq!(cfg.robot_addr, "10.0.0.7");
        assert_eq!(cfg.watchdog_ms, 500);
        assert_eq!(cfg.bind_retry_ms, 1000);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen_port = \"eighty\"\n").unwrap();
        assert!(matches!(read_from(&path), Err(TeleopError::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let mut cfg = valid();
        cfg.max_inflight_events = 4;
        cfg.skip_robot_prepare = true;
        save_to(&cfg, &path).expect("save");
        assert_eq!(read_from(&path).expect("load"), cfg);
    }

    #[cfg(unix)]
    #[test]
    fn config_directory_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        save_to(&Config::default(), &path).expect("save");
        let mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn overrides_replace_fields() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            lookup(&[
                ("TELEOP_ROBOT_ADDR", "robot.local"),
                ("TELEOP_LISTEN_PORT", "9000"),
                ("TELEOP_TWIST_SCALE", "0.3"),
                ("TELEOP_SKIP_ROBOT_PREPARE", "true"),
            ]),
        )
        .expect("overrides");
        assert_eq!(cfg.robot_addr, "robot.local");
        assert_eq!(cfg.listen_port, 9000);
        assert!((cfg.twist_scale - 0.3).abs() < f32::EPSILON);
        assert!(cfg.skip_robot_prepare);
        assert_eq!(cfg.watchdog_ms, 2000);
    }

    #[test]
    fn unparsable_override_is_a_config_error() {
        let mut cfg = Config::default();
        let err = apply_overrides(&mut cfg, lookup(&[("TELEOP_LISTEN_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(err.to_string().contains("TELEOP_LISTEN_PORT"));
        assert_eq!(cfg.listen_port, 8888);
    }

    #[test]
    fn environment_overrides_are_read() {
        // SAFETY: no other test reads this variable.
        unsafe { std::env::set_var("TELEOP_BIND_RETRY_MS", "250") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg).expect("overrides");
        unsafe { std::env::remove_var("TELEOP_BIND_RETRY_MS") };
        assert_eq!(cfg.bind_retry_ms, 250);
    }

    #[test]
    fn validation() {
        assert!(valid().validate().is_ok());
        assert!(Config::default().validate().is_err());

        let mut cfg = valid();
        cfg.watchdog_ms = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("watchdog_ms"));

        let mut cfg = valid();
        cfg.listen_port = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.forward_scale = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn converts_to_component_configs() {
        let mut cfg = valid();
        cfg.watchdog_ms = 750;
        let supervisor = cfg.supervisor_config();
        assert_eq!(supervisor.bind_host, "192.168.1.20");
        assert_eq!(supervisor.watchdog, Duration::from_millis(750));
        assert_eq!(supervisor.port, 8888);
        assert_eq!(cfg.arbiter_config(), ArbiterConfig::default());
    }
}
