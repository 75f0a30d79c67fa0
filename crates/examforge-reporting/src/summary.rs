use std::collections::BTreeMap;
use std::fmt;

use examforge_core::Topic;

/// Topic distribution of one run, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSummary {
    pub entries: Vec<(Topic, usize)>,
}

impl TopicSummary {
    /// Sort by descending count. Equal counts keep classifier table order,
    /// which is the map's key order.
    pub fn from_counts(counts: &BTreeMap<Topic, usize>) -> Self {
        let mut entries: Vec<(Topic, usize)> = counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(topic, count)| (*topic, *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }
}

impl fmt::Display for TopicSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Topic distribution:")?;
        for (topic, count) in &self.entries {
            writeln!(f, "  {}: {}", topic, count)?;
        }
        Ok(())
    }
}
