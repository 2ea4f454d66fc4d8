//! Build script for thc-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates plasma.toml at compile time, with both a TOML schema check
//!   and the parser the firmware runs at boot

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Expected value type of a config key
#[derive(Clone, Copy)]
enum Kind {
    Bool,
    /// Integer within an inclusive range
    Int(i64, i64),
    /// Non-negative duration in seconds
    Seconds,
    /// Any finite float
    Float,
}

/// Every accepted key, by section
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "plasma",
        &[
            ("thc_enabled", Kind::Bool),
            ("arc_retries", Kind::Int(0, 255)),
            ("arc_voltage_setpoint", Kind::Int(0, 255)),
            ("arc_voltage_hysteresis", Kind::Int(0, 255)),
            ("vad_threshold", Kind::Int(0, 100)),
            ("arc_fail_timeout", Kind::Seconds),
            ("arc_retry_delay", Kind::Seconds),
            ("pause_at_end", Kind::Seconds),
            ("thc_delay", Kind::Seconds),
            ("arc_voltage_scale", Kind::Float),
            ("arc_voltage_offset", Kind::Float),
        ],
    ),
    ("timer", &[("tick_hz", Kind::Int(1, 100_000))]),
    (
        "jog",
        &[
            ("axis", Kind::Int(0, 7)),
            ("dir_invert_mask", Kind::Int(0, 255)),
            ("dir_setup_us", Kind::Int(0, 1000)),
            ("step_pulse_us", Kind::Int(1, 1000)),
        ],
    ),
    (
        "arc_ok",
        &[("active_low", Kind::Bool), ("pull_up", Kind::Bool)],
    ),
    (
        "control",
        &[("update_interval_ms", Kind::Int(1, 1000))],
    ),
];

/// Validate plasma.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=plasma.toml");

    let config_path = Path::new("plasma.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: plasma.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds plasma.toml as its configuration.           ║\n\
            ║  Please create one in the thc-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read plasma.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in plasma.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = check_schema(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in plasma.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // The firmware falls back to defaults if this fails at boot
    if let Err(e) = thc_core::config::parse_config(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: plasma.toml rejected by the firmware config parser       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    println!("cargo:warning=plasma.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check sections, keys, value types and ranges
fn check_schema(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return vec!["top level must be a table".to_string()],
    };

    for (section, body) in root {
        let keys = match SCHEMA.iter().find(|(name, _)| name == section) {
            Some((_, keys)) => *keys,
            None => {
                errors.push(format!("unknown section [{}]", section));
                continue;
            }
        };

        let table = match body.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        for (key, value) in table {
            let kind = match keys.iter().find(|(name, _)| name == key) {
                Some((_, kind)) => *kind,
                None => {
                    errors.push(format!("[{}] unknown key '{}'", section, key));
                    continue;
                }
            };

            if let Err(msg) = check_value(kind, value) {
                errors.push(format!("[{}] {} {}", section, key, msg));
            }
        }
    }

    errors
}

fn check_value(kind: Kind, value: &toml::Value) -> Result<(), String> {
    match kind {
        Kind::Bool => value
            .as_bool()
            .map(|_| ())
            .ok_or_else(|| "must be true or false".to_string()),
        Kind::Int(min, max) => match value.as_integer() {
            Some(v) if (min..=max).contains(&v) => Ok(()),
            Some(_) => Err(format!("must be {}-{}", min, max)),
            None => Err("must be an integer".to_string()),
        },
        Kind::Seconds => match as_number(value) {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(()),
            Some(_) => Err("must be a non-negative number of seconds".to_string()),
            None => Err("must be a number".to_string()),
        },
        Kind::Float => match as_number(value) {
            Some(v) if v.is_finite() => Ok(()),
            Some(_) => Err("must be finite".to_string()),
            None => Err("must be a number".to_string()),
        },
    }
}

fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}
