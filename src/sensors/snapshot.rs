use anyhow::{Context, Result};
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A raw sensor state as written in a snapshot file.
///
/// Entities the advisor never reads (binary sensors, attribute lists) may sit
/// in the same file, so any value shape is accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawState {
    Number(f64),
    Text(String),
    Bool(bool),
    Other(IgnoredAny),
}

/// Sensor states keyed by entity id, e.g. `sensor.living_temperature: "21.4"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot {
    states: HashMap<String, Option<RawState>>,
}

impl StateSnapshot {
    /// Load a snapshot file. `.json` files are parsed as JSON, everything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file at {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let snapshot = if is_json {
            Self::from_json(&content)
                .with_context(|| format!("Failed to parse states: invalid JSON in {}", path.display()))?
        } else {
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse states: invalid YAML in {}", path.display()))?
        };

        tracing::debug!(path = %path.display(), entities = snapshot.len(), "loaded state snapshot");
        Ok(snapshot)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, state: impl Into<String>) {
        self.states
            .insert(entity_id.into(), Some(RawState::Text(state.into())));
    }

    /// Numeric value of an entity, or None if it is missing or not a number.
    pub fn value(&self, entity_id: &str) -> Option<f64> {
        match self.states.get(entity_id)? {
            Some(RawState::Number(n)) if n.is_finite() => Some(*n),
            Some(RawState::Text(text)) => super::parse_state(text),
            Some(RawState::Number(_) | RawState::Bool(_) | RawState::Other(_)) | None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StateSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::default();
        for (entity_id, state) in iter {
            snapshot.insert(entity_id, state);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yaml_snapshot_values() {
        let yaml = r#"
sensor.living_temperature: 21.5
sensor.living_humidity: "48"
sensor.outdoor_temperature: unavailable
sensor.wind_speed: ~
"#;
        let snapshot = StateSnapshot::from_yaml(yaml).unwrap();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.value("sensor.living_temperature"), Some(21.5));
        assert_eq!(snapshot.value("sensor.living_humidity"), Some(48.0));
        assert_eq!(snapshot.value("sensor.outdoor_temperature"), None);
        assert_eq!(snapshot.value("sensor.wind_speed"), None);
        assert_eq!(snapshot.value("sensor.missing"), None);
    }

    #[test]
    fn test_json_snapshot_values() {
        let json = r#"{"sensor.co2": 950, "sensor.t": "unknown", "sensor.h": "55.5"}"#;
        let snapshot = StateSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.value("sensor.co2"), Some(950.0));
        assert_eq!(snapshot.value("sensor.t"), None);
        assert_eq!(snapshot.value("sensor.h"), Some(55.5));
    }

    #[test]
    fn test_non_numeric_entities_do_not_reject_snapshot() {
        let yaml = r#"
sensor.t: 20
binary_sensor.window: off
binary_sensor.door: true
sensor.attrs: [1, 2]
sensor.nested:
  unit: ppm
"#;
        let snapshot = StateSnapshot::from_yaml(yaml).unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.value("sensor.t"), Some(20.0));
        assert_eq!(snapshot.value("binary_sensor.window"), None);
        assert_eq!(snapshot.value("binary_sensor.door"), None);
        assert_eq!(snapshot.value("sensor.attrs"), None);
        assert_eq!(snapshot.value("sensor.nested"), None);

        let json = r#"{"sensor.t": 20, "binary_sensor.door": true, "sensor.attrs": [1], "sensor.obj": {"a": 1}}"#;
        let snapshot = StateSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.value("sensor.t"), Some(20.0));
        assert_eq!(snapshot.value("binary_sensor.door"), None);
        assert_eq!(snapshot.value("sensor.attrs"), None);
        assert_eq!(snapshot.value("sensor.obj"), None);
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("states.json");
        std::fs::write(&json_path, r#"{"sensor.a": 1.5}"#).unwrap();
        assert_eq!(StateSnapshot::load(&json_path).unwrap().value("sensor.a"), Some(1.5));

        let yaml_path = dir.path().join("states.yaml");
        let mut file = std::fs::File::create(&yaml_path).unwrap();
        writeln!(file, "sensor.a: 2.5").unwrap();
        assert_eq!(StateSnapshot::load(&yaml_path).unwrap().value("sensor.a"), Some(2.5));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StateSnapshot::load(&dir.path().join("none.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read state file"));
    }

    #[test]
    fn test_empty_yaml_is_empty_snapshot() {
        assert!(StateSnapshot::from_yaml("\n").unwrap().is_empty());
    }

    #[test]
    fn test_from_iter() {
        let snapshot: StateSnapshot = [("sensor.a", "3"), ("sensor.b", "off")].into_iter().collect();
        assert_eq!(snapshot.value("sensor.a"), Some(3.0));
        assert_eq!(snapshot.value("sensor.b"), None);
    }
}
