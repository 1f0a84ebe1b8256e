use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Location;

/// Whether the probe matches the studied color at the tested slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "same")]
    Same,
    #[serde(rename = "diff")]
    Different,
}

/// Response keys for the two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAssignment {
    pub same: char,
    pub different: char,
}

impl KeyAssignment {
    pub fn key_for(&self, condition: Condition) -> char {
        match condition {
            Condition::Same => self.same,
            Condition::Different => self.different,
        }
    }
}

/// Planning unit before colors and locations are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSpec {
    pub set_size: usize,
    pub condition: Condition,
}

/// One fully composed trial. Built in a single pass and never mutated;
/// `locations` and `stim_colors` are index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub set_size: usize,
    pub condition: Condition,
    pub correct_response_key: char,
    pub locations: Vec<Location>,
    pub stim_colors: Vec<Color>,
    pub test_index: usize,
    pub test_color: Color,
    /// Whether the probe display shows only the tested stimulus; carried
    /// for the presentation layer.
    pub single_probe: bool,
}

impl Trial {
    /// Color shown at the tested slot during the probe display.
    ///
    /// Same trials present the studied color unchanged; only Different
    /// trials substitute the drawn test color.
    pub fn probe_color(&self) -> Color {
        match self.condition {
            Condition::Same => self.stim_colors[self.test_index],
            Condition::Different => self.test_color,
        }
    }
}

/// Keypress reported by the presenter for one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub key: char,
    pub rt_ms: f64,
}

/// One persisted row, shaped for the data sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(rename = "Block")]
    pub block: usize,
    #[serde(rename = "Trial")]
    pub trial: usize,
    #[serde(rename = "Timestamp")]
    pub timestamp: f64,
    #[serde(rename = "Condition")]
    pub condition: Condition,
    #[serde(rename = "SetSize")]
    pub set_size: usize,
    #[serde(rename = "RT")]
    pub rt: f64,
    #[serde(rename = "CRESP")]
    pub cresp: char,
    #[serde(rename = "RESP")]
    pub resp: char,
    #[serde(rename = "ACC")]
    pub acc: u8,
    #[serde(rename = "LocationTested")]
    pub location_tested: usize,
    #[serde(rename = "Locations")]
    pub locations: Vec<Location>,
    #[serde(rename = "SampleColors")]
    pub sample_colors: Vec<Color>,
    #[serde(rename = "TestColor")]
    pub test_color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(condition: Condition) -> Trial {
        Trial {
            set_size: 2,
            condition,
            correct_response_key: 's',
            locations: vec![Location::new(0.2, 0.2), Location::new(0.8, 0.8)],
            stim_colors: vec![Color::new(1.0, -1.0, -1.0), Color::new(-1.0, 1.0, -1.0)],
            test_index: 1,
            test_color: Color::new(-1.0, -1.0, 1.0),
            single_probe: true,
        }
    }

    #[test]
    fn same_trials_probe_the_studied_color() {
        let t = trial(Condition::Same);
        assert_eq!(t.probe_color(), t.stim_colors[1]);
    }

    #[test]
    fn different_trials_probe_the_substituted_color() {
        let t = trial(Condition::Different);
        assert_eq!(t.probe_color(), t.test_color);
    }

    #[test]
    fn condition_serializes_with_the_on_disk_vocabulary() {
        assert_eq!(
            serde_json::to_value(Condition::Same).unwrap(),
            serde_json::json!("same")
        );
        assert_eq!(
            serde_json::to_value(Condition::Different).unwrap(),
            serde_json::json!("diff")
        );
    }

    #[test]
    fn record_serializes_with_the_data_field_names() {
        let record = TrialRecord {
            block: 0,
            trial: 3,
            timestamp: 0.0,
            condition: Condition::Different,
            set_size: 2,
            rt: 412.5,
            cresp: 'd',
            resp: 's',
            acc: 0,
            location_tested: 1,
            locations: vec![Location::new(0.2, 0.2)],
            sample_colors: vec![Color::new(1.0, -1.0, -1.0)],
            test_color: Color::new(-1.0, -1.0, 1.0),
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        let expected = [
            "Block",
            "Trial",
            "Timestamp",
            "Condition",
            "SetSize",
            "RT",
            "CRESP",
            "RESP",
            "ACC",
            "LocationTested",
            "Locations",
            "SampleColors",
            "TestColor",
        ];

        assert_eq!(object.len(), expected.len());
        for field in expected {
            assert!(object.contains_key(field), "missing field {field}");
        }
    }
}
