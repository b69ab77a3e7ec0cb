//! Stereotype annotations, keyed by unit index and element address.
//!
//! The driver records every label here before touching the DOM; the
//! annotation pass then re-locates each element by its address and sets
//! the `stereotype` attribute. Ordered maps keep the pass deterministic.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct AnnotationMap {
    entries: BTreeMap<usize, BTreeMap<String, String>>,
}

impl AnnotationMap {
    pub fn record(&mut self, unit_index: usize, xpath: String, labels: String) {
        self.entries.entry(unit_index).or_default().insert(xpath, labels);
    }

    /// Annotations for one unit, in address order.
    pub fn for_unit(&self, unit_index: usize) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .get(&unit_index)
            .into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn labels_for(&self, unit_index: usize, xpath: &str) -> Option<&str> {
        self.entries
            .get(&unit_index)
            .and_then(|m| m.get(xpath))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_grouped_by_unit() {
        let mut map = AnnotationMap::default();
        map.record(0, "(a)[1]".into(), "get".into());
        map.record(1, "(a)[1]".into(), "set".into());
        map.record(0, "(a)[2]".into(), "factory".into());

        assert_eq!(map.len(), 3);
        assert_eq!(map.for_unit(0).count(), 2);
        assert_eq!(map.labels_for(1, "(a)[1]"), Some("set"));
        assert_eq!(map.labels_for(2, "(a)[1]"), None);
    }

    #[test]
    fn re_recording_overwrites() {
        let mut map = AnnotationMap::default();
        map.record(0, "(a)[1]".into(), "get".into());
        map.record(0, "(a)[1]".into(), "get set".into());
        assert_eq!(map.len(), 1);
        assert_eq!(map.labels_for(0, "(a)[1]"), Some("get set"));
    }
}
