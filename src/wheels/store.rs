//! Invariant-preserving mutators over the wheel collection.
//!
//! Every operation leaves the collection displayable: at least one wheel,
//! every wheel with at least one segment, the active id pointing at a live
//! wheel and the selection (if any) pointing at a segment of the active
//! wheel. Stale ids are ignored rather than reported.

use std::collections::HashSet;

use crate::persistence::PersistedCollection;

use super::models::{CollectionState, Segment, Wheel};

pub struct CollectionStore {
    state: CollectionState,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionStore {
    /// One wheel named "Wheel 1" holding a single default segment.
    pub fn new() -> Self {
        let wheel = Wheel::new(wheel_name(0));
        Self {
            state: CollectionState {
                active_wheel_id: Some(wheel.id.clone()),
                wheels: vec![wheel],
                selected_segment_id: None,
            },
        }
    }

    /// Rebuilds the store from a loaded snapshot.
    ///
    /// Returns `None` when the snapshot holds no wheels. Wheels without
    /// segments get a default one, repeated wheel or segment ids keep only
    /// their first occurrence, and a missing or unknown active id falls back
    /// to the first wheel.
    pub fn from_persisted(persisted: PersistedCollection) -> Option<Self> {
        let mut seen_wheels = HashSet::new();
        let mut seen_segments = HashSet::new();
        let mut wheels = Vec::with_capacity(persisted.wheels.len());

        for mut wheel in persisted.wheels {
            if !seen_wheels.insert(wheel.id.clone()) {
                continue;
            }
            wheel
                .segments
                .retain(|segment| seen_segments.insert(segment.id.clone()));
            if wheel.segments.is_empty() {
                wheel.segments.push(Segment::placeholder());
            }
            wheels.push(wheel);
        }

        let first_id = wheels.first()?.id.clone();
        let active_wheel_id = persisted
            .active_wheel_id
            .filter(|id| wheels.iter().any(|wheel| &wheel.id == id))
            .unwrap_or(first_id);

        Some(Self {
            state: CollectionState {
                wheels,
                active_wheel_id: Some(active_wheel_id),
                selected_segment_id: None,
            },
        })
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.state.wheels
    }

    pub fn wheel(&self, wheel_id: &str) -> Option<&Wheel> {
        self.state.wheel(wheel_id)
    }

    pub fn active_wheel(&self) -> Option<&Wheel> {
        self.state.active_wheel()
    }

    pub fn active_wheel_id(&self) -> Option<&str> {
        self.state.active_wheel_id.as_deref()
    }

    pub fn selected_segment_id(&self) -> Option<&str> {
        self.state.selected_segment_id.as_deref()
    }

    /// The part of the state that survives a restart.
    pub fn persisted(&self) -> PersistedCollection {
        PersistedCollection {
            wheels: self.state.wheels.clone(),
            active_wheel_id: self.state.active_wheel_id.clone(),
        }
    }

    /// Appends "Wheel N" and makes it active. Returns the new wheel id.
    pub fn create_wheel(&mut self) -> String {
        let wheel = Wheel::new(wheel_name(self.state.wheels.len()));
        let wheel_id = wheel.id.clone();
        self.state.wheels.push(wheel);
        self.state.active_wheel_id = Some(wheel_id.clone());
        self.state.selected_segment_id = None;
        wheel_id
    }

    /// Removes a wheel unless it is the last one. If the active wheel goes,
    /// the first remaining wheel becomes active.
    pub fn delete_wheel(&mut self, wheel_id: &str) -> bool {
        if self.state.wheels.len() <= 1 {
            return false;
        }
        let Some(position) = self.position(wheel_id) else {
            return false;
        };

        self.state.wheels.remove(position);
        if self.active_wheel_id() == Some(wheel_id) {
            self.state.active_wheel_id = self.state.wheels.first().map(|wheel| wheel.id.clone());
        }
        self.state.selected_segment_id = None;
        true
    }

    pub fn rename_wheel(&mut self, wheel_id: &str, name: impl Into<String>) -> bool {
        match self.wheel_mut(wheel_id) {
            Some(wheel) => {
                wheel.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Appends "Segment N" to the wheel. Returns the new segment id.
    pub fn add_segment(&mut self, wheel_id: &str) -> Option<String> {
        let wheel = self.wheel_mut(wheel_id)?;
        let segment = Segment::new(format!("Segment {}", wheel.segments.len() + 1));
        let segment_id = segment.id.clone();
        wheel.segments.push(segment);
        Some(segment_id)
    }

    pub fn update_segment_label(
        &mut self,
        wheel_id: &str,
        segment_id: &str,
        label: impl Into<String>,
    ) -> bool {
        let Some(segment) = self
            .wheel_mut(wheel_id)
            .and_then(|wheel| wheel.segments.iter_mut().find(|s| s.id == segment_id))
        else {
            return false;
        };
        segment.label = label.into();
        true
    }

    /// Removes a segment. Deleting a wheel's only segment swaps in a fresh
    /// default segment instead of leaving the wheel empty.
    pub fn delete_segment(&mut self, wheel_id: &str, segment_id: &str) -> bool {
        let Some(wheel) = self.wheel_mut(wheel_id) else {
            return false;
        };
        let Some(position) = wheel.segments.iter().position(|s| s.id == segment_id) else {
            return false;
        };

        wheel.segments.remove(position);
        if wheel.segments.is_empty() {
            wheel.segments.push(Segment::placeholder());
        }

        if self.selected_segment_id() == Some(segment_id) {
            self.state.selected_segment_id = None;
        }
        true
    }

    /// Makes a wheel active. The selection is cleared even when the wheel was
    /// already active.
    pub fn set_active_wheel(&mut self, wheel_id: &str) -> bool {
        if self.position(wheel_id).is_none() {
            return false;
        }
        self.state.active_wheel_id = Some(wheel_id.to_string());
        self.state.selected_segment_id = None;
        true
    }

    /// Marks a segment of the active wheel as the winner. Segments of other
    /// wheels are ignored.
    pub fn record_spin_result(&mut self, segment_id: &str) -> bool {
        let belongs_to_active = self
            .active_wheel()
            .is_some_and(|wheel| wheel.contains_segment(segment_id));
        if !belongs_to_active {
            return false;
        }
        self.state.selected_segment_id = Some(segment_id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.state.selected_segment_id = None;
    }

    fn position(&self, wheel_id: &str) -> Option<usize> {
        self.state.wheels.iter().position(|wheel| wheel.id == wheel_id)
    }

    fn wheel_mut(&mut self, wheel_id: &str) -> Option<&mut Wheel> {
        self.state.wheels.iter_mut().find(|wheel| wheel.id == wheel_id)
    }
}

fn wheel_name(existing: usize) -> String {
    format!("Wheel {}", existing + 1)
}
