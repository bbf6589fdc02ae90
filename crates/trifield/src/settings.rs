//! Search settings, their flat key-value record, and the store seam.
//!
//! The core never persists on its own: a host hands in a `SettingsStore`
//! (browser local storage, a JSON file, ...) and the settings live under
//! `SETTINGS_KEY` as one JSON object of field/value pairs.
//!
//! Record rules
//! - Missing or ill-typed fields fall back to defaults field by field.
//! - Unknown fields are ignored.
//! - The legacy `tolerance` field is migrated by `migrate_record` (pure).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, SearchError};
use crate::score::ScoreMethod;

/// Key of the settings record in the host store.
pub const SETTINGS_KEY: &str = "equilateralFinder-settings";
/// Field name used by the first finder release for its percent tolerance.
pub const LEGACY_TOLERANCE_FIELD: &str = "tolerance";

const F_METHOD: &str = "method";
const F_THRESHOLD: &str = "threshold";
const F_MAX_RESULTS: &str = "maxResults";
const F_MAX_PORTALS: &str = "maxPortals";

/// User-tunable search parameters.
///
/// Deserializing goes through `from_record`, so serde input gets the same
/// per-method defaults and legacy migration as a stored record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct SearchSettings {
    pub method: ScoreMethod,
    /// Percent: max spread (`RelativeSpread`) or min quality (`AreaRatio`).
    pub threshold: f64,
    pub max_results: usize,
    /// Candidate count above which the host must confirm before searching.
    pub max_portals: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::for_method(ScoreMethod::default())
    }
}

impl SearchSettings {
    pub fn for_method(method: ScoreMethod) -> Self {
        Self {
            method,
            threshold: method.default_threshold(),
            max_results: 20,
            max_portals: 300,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_threshold(self.method, self.threshold)?;
        if self.max_results == 0 {
            return Err(SearchError::InvalidSettings(
                "maxResults must be at least 1".into(),
            ));
        }
        if self.max_portals == 0 {
            return Err(SearchError::InvalidSettings(
                "maxPortals must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Apply raw dialog input on top of `self`; the caller re-prompts on error.
    pub fn with_inputs(&self, threshold: &str, max_results: &str) -> Result<Self> {
        let t = threshold.trim();
        let threshold: f64 = t
            .parse()
            .map_err(|_| SearchError::InvalidSettings(format!("threshold '{t}' is not a number")))?;
        let m = max_results.trim();
        let max_results: usize = m.parse().map_err(|_| {
            SearchError::InvalidSettings(format!("maxResults '{m}' is not a positive integer"))
        })?;
        let next = Self {
            threshold,
            max_results,
            ..self.clone()
        };
        next.validate()?;
        Ok(next)
    }

    /// Read a (possibly legacy, possibly partial) record.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let record = migrate_record(record.clone());
        let method = record
            .get(F_METHOD)
            .and_then(|v| serde_json::from_value::<ScoreMethod>(v.clone()).ok())
            .unwrap_or_default();
        let defaults = Self::for_method(method);
        let threshold = record
            .get(F_THRESHOLD)
            .and_then(Value::as_f64)
            .filter(|t| check_threshold(method, *t).is_ok())
            .unwrap_or(defaults.threshold);
        let max_results = positive_field(&record, F_MAX_RESULTS).unwrap_or(defaults.max_results);
        let max_portals = positive_field(&record, F_MAX_PORTALS).unwrap_or(defaults.max_portals);
        Self {
            method,
            threshold,
            max_results,
            max_portals,
        }
    }

    pub fn to_record(&self) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert(F_METHOD.into(), json!(self.method));
        m.insert(F_THRESHOLD.into(), json!(self.threshold));
        m.insert(F_MAX_RESULTS.into(), json!(self.max_results));
        m.insert(F_MAX_PORTALS.into(), json!(self.max_portals));
        m
    }
}

impl From<Map<String, Value>> for SearchSettings {
    fn from(record: Map<String, Value>) -> Self {
        Self::from_record(&record)
    }
}

fn check_threshold(method: ScoreMethod, t: f64) -> Result<()> {
    let ok = t.is_finite()
        && match method {
            // a zero spread tolerance can never be met under the strict test
            ScoreMethod::RelativeSpread => t > 0.0 && t <= 100.0,
            ScoreMethod::AreaRatio => (0.0..=100.0).contains(&t),
        };
    if ok {
        Ok(())
    } else {
        Err(SearchError::InvalidSettings(format!(
            "threshold {t} out of range for {method:?}"
        )))
    }
}

fn positive_field(record: &Map<String, Value>, key: &str) -> Option<usize> {
    record
        .get(key)
        .and_then(Value::as_u64)
        .filter(|v| *v > 0)
        .and_then(|v| usize::try_from(v).ok())
}

/// Rewrite a record that may still carry the legacy `tolerance` field.
///
/// - The legacy field is always removed.
/// - An existing `threshold` wins.
/// - Otherwise `threshold` becomes the default for the record's method; only an
///   explicit `relativeSpread` method keeps the legacy value (same unit).
pub fn migrate_record(mut record: Map<String, Value>) -> Map<String, Value> {
    let Some(legacy) = record.remove(LEGACY_TOLERANCE_FIELD) else {
        return record;
    };
    if record.contains_key(F_THRESHOLD) {
        return record;
    }
    let method = record
        .get(F_METHOD)
        .and_then(|v| serde_json::from_value::<ScoreMethod>(v.clone()).ok())
        .unwrap_or_default();
    let threshold = match method {
        ScoreMethod::RelativeSpread => legacy
            .as_f64()
            .filter(|t| check_threshold(method, *t).is_ok())
            .unwrap_or_else(|| method.default_threshold()),
        ScoreMethod::AreaRatio => method.default_threshold(),
    };
    record.insert(F_THRESHOLD.into(), json!(threshold));
    record
}

/// Host-provided string key-value storage.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: String);
}

/// In-memory store (tests, embedding hosts without persistence).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(HashMap<String, String>);

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
    fn put(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }
}

/// Load settings; absent or unreadable records give defaults.
pub fn load_settings<S: SettingsStore + ?Sized>(store: &S) -> SearchSettings {
    let Some(raw) = store.get(SETTINGS_KEY) else {
        debug!("no stored settings, using defaults");
        return SearchSettings::default();
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(record)) => {
            if record.contains_key(LEGACY_TOLERANCE_FIELD) {
                warn!("migrating legacy '{LEGACY_TOLERANCE_FIELD}' settings field");
            }
            SearchSettings::from_record(&record)
        }
        Ok(other) => {
            warn!(kind = %json_kind(&other), "stored settings are not an object, using defaults");
            SearchSettings::default()
        }
        Err(err) => {
            warn!(%err, "stored settings are not valid JSON, using defaults");
            SearchSettings::default()
        }
    }
}

pub fn save_settings<S: SettingsStore + ?Sized>(store: &mut S, settings: &SearchSettings) {
    store.put(SETTINGS_KEY, Value::Object(settings.to_record()).to_string());
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn defaults_are_documented_values() {
        let s = SearchSettings::default();
        assert_eq!(s.method, ScoreMethod::AreaRatio);
        assert_eq!(s.threshold, 90.0);
        assert_eq!(s.max_results, 20);
        assert_eq!(s.max_portals, 300);
        assert!(s.validate().is_ok());
        assert_eq!(SearchSettings::for_method(ScoreMethod::RelativeSpread).threshold, 5.0);
    }

    #[test]
    fn legacy_only_record_gets_default_threshold() {
        let rec = record(json!({"tolerance": 5}));
        let migrated = migrate_record(rec.clone());
        assert!(!migrated.contains_key(LEGACY_TOLERANCE_FIELD));
        assert_eq!(migrated.get("threshold").and_then(Value::as_f64), Some(90.0));
        let s = SearchSettings::from_record(&rec);
        assert_eq!(s.threshold, SearchSettings::default().threshold);
        assert!(!s.to_record().contains_key(LEGACY_TOLERANCE_FIELD));
    }

    #[test]
    fn legacy_value_carried_for_spread_method() {
        let rec = record(json!({"method": "relativeSpread", "tolerance": 7.5, "maxResults": 5}));
        let s = SearchSettings::from_record(&rec);
        assert_eq!(s.method, ScoreMethod::RelativeSpread);
        assert_eq!(s.threshold, 7.5);
        assert_eq!(s.max_results, 5);
        assert_eq!(s.max_portals, 300);
    }

    #[test]
    fn existing_threshold_wins_over_legacy() {
        let rec = record(json!({"tolerance": 3, "threshold": 80.0}));
        let migrated = migrate_record(rec);
        assert_eq!(migrated.get("threshold").and_then(Value::as_f64), Some(80.0));
        assert!(!migrated.contains_key("tolerance"));
    }

    #[test]
    fn migration_is_identity_without_legacy_field() {
        let rec = record(json!({"threshold": 85.0, "maxResults": 3}));
        assert_eq!(migrate_record(rec.clone()), rec);
    }

    #[test]
    fn ill_typed_and_unknown_fields_fall_back() {
        let rec = record(json!({
            "method": "bogus",
            "threshold": "high",
            "maxResults": null,
            "maxPortals": -4,
            "colour": "red"
        }));
        assert_eq!(SearchSettings::from_record(&rec), SearchSettings::default());
        let out_of_range = record(json!({"threshold": 150.0}));
        assert_eq!(SearchSettings::from_record(&out_of_range).threshold, 90.0);
    }

    #[test]
    fn store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(load_settings(&store), SearchSettings::default());
        let s = SearchSettings {
            method: ScoreMethod::RelativeSpread,
            threshold: 2.5,
            max_results: 7,
            max_portals: 120,
        };
        save_settings(&mut store, &s);
        assert_eq!(load_settings(&store), s);
    }

    #[test]
    fn garbage_in_store_gives_defaults() {
        let mut store = MemoryStore::default();
        store.put(SETTINGS_KEY, "{not json".into());
        assert_eq!(load_settings(&store), SearchSettings::default());
        store.put(SETTINGS_KEY, "[1,2]".into());
        assert_eq!(load_settings(&store), SearchSettings::default());
        store.put(SETTINGS_KEY, r#"{"tolerance": 4}"#.into());
        assert_eq!(load_settings(&store).threshold, 90.0);
    }

    #[test]
    fn dialog_inputs_parse_or_fail() {
        let base = SearchSettings::default();
        let s = base.with_inputs(" 85.5 ", "10").unwrap();
        assert_eq!(s.threshold, 85.5);
        assert_eq!(s.max_results, 10);
        assert_eq!(s.max_portals, base.max_portals);
        assert!(matches!(base.with_inputs("abc", "10"), Err(SearchError::InvalidSettings(_))));
        assert!(matches!(base.with_inputs("80", "ten"), Err(SearchError::InvalidSettings(_))));
        assert!(matches!(base.with_inputs("80", "0"), Err(SearchError::InvalidSettings(_))));
        assert!(matches!(base.with_inputs("101", "5"), Err(SearchError::InvalidSettings(_))));
        assert!(matches!(base.with_inputs("NaN", "5"), Err(SearchError::InvalidSettings(_))));
        let spread = SearchSettings::for_method(ScoreMethod::RelativeSpread);
        assert!(matches!(spread.with_inputs("0", "5"), Err(SearchError::InvalidSettings(_))));
    }

    #[test]
    fn serde_uses_camel_case_and_defaults() {
        let s: SearchSettings = serde_json::from_str(r#"{"maxResults": 3}"#).unwrap();
        assert_eq!(s.max_results, 3);
        assert_eq!(s.threshold, 90.0);
        let back: SearchSettings =
            serde_json::from_value(serde_json::to_value(&s).unwrap()).unwrap();
        assert_eq!(back, s);
        let v = serde_json::to_value(SearchSettings::default()).unwrap();
        assert_eq!(v["maxPortals"], json!(300));
        assert_eq!(v["method"], json!("areaRatio"));
    }

    #[test]
    fn serde_agrees_with_record_reader() {
        for raw in [
            json!({"method": "relativeSpread"}),
            json!({"tolerance": 5}),
            json!({"method": "relativeSpread", "tolerance": 12.5}),
            json!({"method": "areaRatio", "threshold": "high", "maxPortals": -1}),
        ] {
            let via_serde: SearchSettings = serde_json::from_value(raw.clone()).unwrap();
            let via_record = SearchSettings::from_record(raw.as_object().unwrap());
            assert_eq!(via_serde, via_record, "{raw}");
        }
        let spread: SearchSettings =
            serde_json::from_value(json!({"method": "relativeSpread"})).unwrap();
        assert_eq!(spread.threshold, 5.0);
    }
}
