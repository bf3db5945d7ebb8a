//! File system operations for network problems.
use super::NetworkProblem;

use std::path::{Path, PathBuf};

fn is_yaml<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Parse a JSON or YAML file (chosen by extension) into a `serde_json::Value`.
pub fn read_value_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<serde_json::Value> {
    let content = std::fs::read_to_string(&path)?;
    if is_yaml(&path) {
        serde_yaml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Given a `serde_json::Value`, read it from the path it specifies if it's a string,
/// relative to the given `path`.
pub fn read_json_value_from_file<P: AsRef<Path>>(
    value: &mut serde_json::Value,
    path: P,
) -> std::io::Result<bool> {
    if let serde_json::Value::String(s) = value {
        let mut referenced = PathBuf::new();
        referenced.push(path);
        referenced.pop();
        referenced.push(s);
        *value = read_value_from_file(&referenced)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Given a `serde_json::Value`, read its given `field` from the path it specifies if it's a
/// string, relative to the given `path`.
pub fn read_field_from_file<P: AsRef<Path>>(
    value: &mut serde_json::Value,
    field: &str,
    path: P,
) -> std::io::Result<bool> {
    let field = value.get_mut(field);
    if let Some(v) = field {
        read_json_value_from_file(v, path)
    } else {
        Ok(false)
    }
}

impl NetworkProblem {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<NetworkProblem> {
        let mut value = read_value_from_file(&path)?;
        read_field_from_file(&mut value, "network", &path)?;
        let problem: NetworkProblem = serde_json::from_value(value)?;
        log::info!(
            "Read problem {} from {}",
            problem.name.as_deref().unwrap_or("-"),
            path.as_ref().display()
        );
        Ok(problem)
    }
}
