//! Wheel and segment data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label given to a wheel's first segment and to the segment that replaces
/// the last one when it is deleted.
pub const DEFAULT_SEGMENT_LABEL: &str = "Default";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub label: String,
}

impl Segment {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            label: label.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(DEFAULT_SEGMENT_LABEL)
    }
}

/// A named wheel. `segments` is kept non-empty by every operation in
/// [`crate::wheels::store`]; its order is the angular order around the wheel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Wheel {
    pub id: String,
    pub name: String,
    pub segments: Vec<Segment>,
}

impl Wheel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            segments: vec![Segment::placeholder()],
        }
    }

    pub fn segment(&self, segment_id: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.id == segment_id)
    }

    pub fn contains_segment(&self, segment_id: &str) -> bool {
        self.segment(segment_id).is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionState {
    pub wheels: Vec<Wheel>,
    pub active_wheel_id: Option<String>,
    pub selected_segment_id: Option<String>,
}

impl CollectionState {
    pub fn wheel(&self, wheel_id: &str) -> Option<&Wheel> {
        self.wheels.iter().find(|wheel| wheel.id == wheel_id)
    }

    pub fn active_wheel(&self) -> Option<&Wheel> {
        self.active_wheel_id
            .as_deref()
            .and_then(|wheel_id| self.wheel(wheel_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_wheel_starts_with_one_default_segment() {
        let wheel = Wheel::new("Wheel 1");
        assert_eq!(wheel.segments.len(), 1);
        assert_eq!(wheel.segments[0].label, DEFAULT_SEGMENT_LABEL);
    }

    #[test]
    fn ids_are_unique() {
        let a = Segment::new("a");
        let b = Segment::new("a");
        assert_ne!(a.id, b.id);
        assert_ne!(Wheel::new("x").id, Wheel::new("x").id);
    }

    #[test]
    fn collection_serializes_camel_case() {
        let wheel = Wheel::new("Wheel 1");
        let state = CollectionState {
            active_wheel_id: Some(wheel.id.clone()),
            wheels: vec![wheel],
            selected_segment_id: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("activeWheelId").is_some());
        assert!(json.get("selectedSegmentId").is_some());
    }
}
