use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::act::clamp_unit;

/// A named set of not-yet-actualized possibilities, each weighted uniformly.
///
/// Any `weight` present on input is ignored and recomputed from the
/// possibilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHorizon")]
pub struct Horizon {
    pub possibilities: Vec<Value>,
    pub weight: f64,
}

impl Horizon {
    /// Uniform weight over `possibilities`; an empty list weighs 0.
    pub fn new(possibilities: Vec<Value>) -> Self {
        let weight = if possibilities.is_empty() {
            0.0
        } else {
            1.0 / possibilities.len() as f64
        };
        Self {
            possibilities,
            weight,
        }
    }

    pub fn len(&self) -> usize {
        self.possibilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.possibilities.is_empty()
    }
}

#[derive(Deserialize)]
struct RawHorizon {
    possibilities: Vec<Value>,
}

impl From<RawHorizon> for Horizon {
    fn from(raw: RawHorizon) -> Self {
        Self::new(raw.possibilities)
    }
}

/// The object side of an experience: content as it is meant, in some mode,
/// surrounded by horizons of further possible determination.
///
/// Horizons keep insertion order. Deserialized determinacy is clamped like
/// [`ObjectAsMeant::new`] does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawObject")]
pub struct ObjectAsMeant {
    pub content: Value,
    pub mode: String,
    pub horizons: IndexMap<String, Horizon>,
    pub determinacy: f64,
    pub temporal_index: Option<String>,
}

#[derive(Deserialize)]
struct RawObject {
    content: Value,
    mode: String,
    #[serde(default)]
    horizons: IndexMap<String, Horizon>,
    #[serde(default)]
    determinacy: f64,
    #[serde(default)]
    temporal_index: Option<String>,
}

impl From<RawObject> for ObjectAsMeant {
    fn from(raw: RawObject) -> Self {
        Self {
            content: raw.content,
            mode: raw.mode,
            horizons: raw.horizons,
            determinacy: clamp_unit(raw.determinacy),
            temporal_index: raw.temporal_index,
        }
    }
}

impl ObjectAsMeant {
    /// Build an object with no horizons. Determinacy is clamped into [0, 1].
    pub fn new(content: impl Into<Value>, mode: impl Into<String>, determinacy: f64) -> Self {
        Self {
            content: content.into(),
            mode: mode.into(),
            horizons: IndexMap::new(),
            determinacy: clamp_unit(determinacy),
            temporal_index: None,
        }
    }

    pub fn with_temporal_index(mut self, timestamp: impl Into<String>) -> Self {
        self.temporal_index = Some(timestamp.into());
        self
    }

    /// Insert one named horizon. Possibility order is kept; a horizon with the
    /// same name is replaced in place.
    pub fn add_horizon<I, V>(&mut self, name: impl Into<String>, possibilities: I) -> &Horizon
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let name = name.into();
        let horizon = Horizon::new(possibilities.into_iter().map(Into::into).collect());
        self.horizons.insert(name.clone(), horizon);
        &self.horizons[&name]
    }

    /// Sum of possibility counts across all horizons.
    pub fn total_possibilities(&self) -> usize {
        self.horizons.values().map(Horizon::len).sum()
    }

    /// Content rendered as plain text: strings verbatim, anything else as JSON.
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_horizon_uniform_weight() {
        let mut obj = ObjectAsMeant::new("red sphere", "perceptual", 0.7);
        let h = obj.add_horizon("inner_texture", ["smooth", "rough", "matte"]);
        assert!((h.weight - 1.0 / 3.0).abs() < 1e-10);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_add_horizon_empty_weighs_zero() {
        let mut obj = ObjectAsMeant::new("void", "imaginative", 0.0);
        let h = obj.add_horizon("nothing", Vec::<Value>::new());
        assert_eq!(h.weight, 0.0);
        assert!(h.is_empty());
    }

    #[test]
    fn test_add_horizon_preserves_order() {
        let mut obj = ObjectAsMeant::new("cup", "perceptual", 0.5);
        obj.add_horizon("background", ["table", "shelf", "floor"]);
        let got: Vec<&str> = obj.horizons["background"]
            .possibilities
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(got, vec!["table", "shelf", "floor"]);
    }

    #[test]
    fn test_add_horizon_replaces_same_name() {
        let mut obj = ObjectAsMeant::new("cup", "perceptual", 0.5);
        obj.add_horizon("background", ["table"]);
        obj.add_horizon("background", ["shelf", "floor"]);
        assert_eq!(obj.horizons.len(), 1);
        assert_eq!(obj.horizons["background"].len(), 2);
        assert!((obj.horizons["background"].weight - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_total_possibilities() {
        let mut obj = ObjectAsMeant::new("cup", "perceptual", 0.5);
        assert_eq!(obj.total_possibilities(), 0);
        obj.add_horizon("a", [1, 2]);
        obj.add_horizon("b", [json!({"k": "v"})]);
        assert_eq!(obj.total_possibilities(), 3);
    }

    #[test]
    fn test_determinacy_clamped() {
        assert_eq!(ObjectAsMeant::new("x", "m", 2.0).determinacy, 1.0);
        assert_eq!(ObjectAsMeant::new("x", "m", -1.0).determinacy, 0.0);
    }

    #[test]
    fn test_content_text() {
        assert_eq!(ObjectAsMeant::new("red sphere", "m", 0.1).content_text(), "red sphere");
        assert_eq!(
            ObjectAsMeant::new(json!({"a": 1}), "m", 0.1).content_text(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn test_deserialize_minimal() {
        let obj: ObjectAsMeant =
            serde_json::from_value(json!({"content": "tree", "mode": "recollective"})).unwrap();
        assert!(obj.horizons.is_empty());
        assert_eq!(obj.determinacy, 0.0);
        assert!(obj.temporal_index.is_none());
    }

    #[test]
    fn test_deserialize_recomputes_weight_and_clamps() {
        let obj: ObjectAsMeant = serde_json::from_value(json!({
            "content": "cup",
            "mode": "perceptual",
            "determinacy": 1.5,
            "horizons": {
                "background": {"possibilities": ["table", "shelf"], "weight": 9.0},
                "inner_rim": {"possibilities": []}
            }
        }))
        .unwrap();
        assert_eq!(obj.determinacy, 1.0);
        assert!((obj.horizons["background"].weight - 0.5).abs() < 1e-10);
        assert_eq!(obj.horizons["inner_rim"].weight, 0.0);

        let obj: ObjectAsMeant = serde_json::from_value(json!({
            "content": "cup", "mode": "perceptual", "determinacy": -0.2
        }))
        .unwrap();
        assert_eq!(obj.determinacy, 0.0);
    }

    #[test]
    fn test_horizons_keep_insertion_order() {
        let mut obj = ObjectAsMeant::new("cup", "perceptual", 0.5);
        obj.add_horizon("zenith", ["sky"]);
        obj.add_horizon("background", ["table"]);
        obj.add_horizon("inner_rim", ["chipped"]);
        obj.add_horizon("zenith", ["ceiling"]);
        let names: Vec<&str> = obj.horizons.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zenith", "background", "inner_rim"]);

        let text = serde_json::to_string(&obj).unwrap();
        let back: ObjectAsMeant = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = back.horizons.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zenith", "background", "inner_rim"]);
    }

    #[test]
    fn test_temporal_index() {
        let obj = ObjectAsMeant::new("tree", "recollective", 0.4)
            .with_temporal_index("2026-02-21T00:00:00.000Z");
        assert_eq!(obj.temporal_index.as_deref(), Some("2026-02-21T00:00:00.000Z"));
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["temporal_index"], "2026-02-21T00:00:00.000Z");
    }
}
