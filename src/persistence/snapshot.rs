//! Save snapshot format
//!
//! Loading goes through three gates: the text must be JSON, the raw value
//! must pass structural checks, and the schema version must match. Only
//! then is it decoded into typed state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::error::{Result, TycoonError};
use crate::core::types::ZoneId;
use crate::progress::achievements::AchievementTracker;
use crate::progress::upgrades::UpgradeLedger;
use crate::simulation::population::ZoneState;
use crate::simulation::progression::Progression;

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const REQUIRED_FIELDS: [&str; 4] = ["schema_version", "timestamp", "progression", "populations"];

/// Everything persisted between sessions. Pending bursts are not part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub schema_version: u32,
    /// Wall-clock save time, ms since the Unix epoch
    pub timestamp: u64,
    pub progression: Progression,
    pub populations: BTreeMap<ZoneId, ZoneState>,
    #[serde(default)]
    pub upgrades: UpgradeLedger,
    #[serde(default)]
    pub achievements: AchievementTracker,
}

impl SaveData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| TycoonError::Parse(e.to_string()))?;
        validate(&value)?;
        check_version(&value)?;
        serde_json::from_value(value)
            .map_err(|e| TycoonError::Validation(format!("malformed save: {}", e)))
    }
}

/// Structural checks on the raw value
pub fn validate(value: &Value) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| TycoonError::Validation("save is not an object".into()))?;

    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(TycoonError::Validation(format!("missing field '{}'", field)));
        }
    }

    match object.get("timestamp").and_then(Value::as_f64) {
        Some(ts) if ts > 0.0 => {}
        _ => {
            return Err(TycoonError::Validation(
                "timestamp must be a positive number".into(),
            ))
        }
    }

    let currency = object
        .get("progression")
        .and_then(|p| p.get("currency"))
        .and_then(Value::as_f64);
    match currency {
        Some(c) if c >= 0.0 => Ok(()),
        _ => Err(TycoonError::Validation(
            "currency must be a non-negative number".into(),
        )),
    }
}

fn check_version(value: &Value) -> Result<()> {
    let found = value
        .get("schema_version")
        .and_then(Value::as_u64)
        .ok_or_else(|| TycoonError::Validation("schema_version must be an integer".into()))?;

    if found != CURRENT_SCHEMA_VERSION as u64 {
        // No migrations exist yet
        return Err(TycoonError::VersionMismatch {
            found: found.min(u32::MAX as u64) as u32,
            current: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::zones::default_zones;
    use crate::simulation::population::Populations;

    fn sample() -> SaveData {
        let mut progression = Progression::new(1234);
        progression.visitors_attracted = 17;
        SaveData {
            schema_version: CURRENT_SCHEMA_VERSION,
            timestamp: 1_700_000_000_000,
            progression,
            populations: Populations::from_definitions(&default_zones(), 0.1).snapshot(),
            upgrades: UpgradeLedger::new(),
            achievements: AchievementTracker::new(),
        }
    }

    fn tamper(edit: impl FnOnce(&mut Value)) -> String {
        let mut value = serde_json::to_value(sample()).unwrap();
        edit(&mut value);
        value.to_string()
    }

    #[test]
    fn test_round_trip() {
        let data = sample();
        let restored = SaveData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn test_not_json_is_parse_error() {
        assert!(matches!(SaveData::from_json("{oops"), Err(TycoonError::Parse(_))));
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let text = tamper(|v| {
            v.as_object_mut().unwrap().remove("populations");
        });
        assert!(matches!(SaveData::from_json(&text), Err(TycoonError::Validation(_))));
    }

    #[test]
    fn test_bad_timestamp_and_currency() {
        let zero_ts = tamper(|v| v["timestamp"] = Value::from(0));
        assert!(matches!(SaveData::from_json(&zero_ts), Err(TycoonError::Validation(_))));

        let text_ts = tamper(|v| v["timestamp"] = Value::from("yesterday"));
        assert!(matches!(SaveData::from_json(&text_ts), Err(TycoonError::Validation(_))));

        let negative = tamper(|v| v["progression"]["currency"] = Value::from(-5));
        let err = SaveData::from_json(&negative).unwrap_err();
        assert!(matches!(err, TycoonError::Validation(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_version_mismatch_is_fatal() {
        let text = tamper(|v| v["schema_version"] = Value::from(99));
        let err = SaveData::from_json(&text).unwrap_err();
        assert!(matches!(err, TycoonError::VersionMismatch { found: 99, current: 1 }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_additive_fields_default() {
        let text = tamper(|v| {
            let obj = v.as_object_mut().unwrap();
            obj.remove("upgrades");
            obj.remove("achievements");
            obj["progression"].as_object_mut().unwrap().remove("bell_rings");
        });
        let restored = SaveData::from_json(&text).unwrap();
        assert_eq!(restored.upgrades, UpgradeLedger::new());
        assert_eq!(restored.progression.bell_rings, 0);
        assert_eq!(restored.progression.currency, 1234);
    }
}
