// ============================================================================
// LABEL DATA
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{CurveError, Result};
use crate::series::HOURS;

/// Annotation attached to one hour of the curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub title: String,
    pub content: String,
    pub icon: Option<PathBuf>,
}

impl Label {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

// ============================================================================
// LABEL STORE
// ============================================================================

/// What an edit did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Created,
    Updated,
    Removed,
    Unchanged,
}

/// At most one label per hour. Holds data only; anything drawn for a label
/// lives with the renderer.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    labels: BTreeMap<usize, Label>,
}

impl LabelStore {
    pub fn get(&self, hour: usize) -> Option<&Label> {
        self.labels.get(&hour)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Label)> {
        self.labels.iter().map(|(hour, label)| (*hour, label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Inserts or replaces the label at `hour`. A blank title removes it.
    pub fn set(&mut self, hour: usize, mut label: Label) -> Result<LabelChange> {
        if hour >= HOURS {
            return Err(CurveError::HourOutOfRange(hour));
        }
        label.title = label.title.trim().to_string();
        label.content = label.content.trim().to_string();
        if label.title.is_empty() {
            return Ok(self.remove(hour));
        }
        Ok(match self.labels.insert(hour, label.clone()) {
            None => LabelChange::Created,
            Some(previous) if previous == label => LabelChange::Unchanged,
            Some(_) => LabelChange::Updated,
        })
    }

    pub fn remove(&mut self, hour: usize) -> LabelChange {
        match self.labels.remove(&hour) {
            Some(_) => LabelChange::Removed,
            None => LabelChange::Unchanged,
        }
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_label_per_hour() {
        let mut store = LabelStore::default();
        assert_eq!(store.set(8, Label::new("Coffee", "")).unwrap(), LabelChange::Created);
        assert_eq!(
            store.set(8, Label::new("Meeting", "standup")).unwrap(),
            LabelChange::Updated
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(8).unwrap().title, "Meeting");
    }

    #[test]
    fn blank_title_deletes() {
        let mut store = LabelStore::default();
        store.set(3, Label::new("Run", "5k")).unwrap();
        assert_eq!(store.set(3, Label::new("   ", "x")).unwrap(), LabelChange::Removed);
        assert!(store.get(3).is_none());
        assert_eq!(store.set(4, Label::new("", "")).unwrap(), LabelChange::Unchanged);
    }

    #[test]
    fn rejects_hours_past_the_day() {
        let mut store = LabelStore::default();
        assert!(store.set(24, Label::new("Late", "")).is_err());
    }

    #[test]
    fn identical_edit_is_unchanged() {
        let mut store = LabelStore::default();
        let label = Label::new("Lunch", "noodles").with_icon("bowl.png");
        store.set(12, label.clone()).unwrap();
        assert_eq!(store.set(12, label).unwrap(), LabelChange::Unchanged);
    }
}
