use super::types::FeedbackRecord;

/// Ordered working set of feedback records known to this client.
///
/// The remote service owns ordering and contents; only the sync controller
/// writes here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackStore {
    records: Vec<FeedbackRecord>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&FeedbackRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard everything and install `records` in the order received.
    pub(super) fn replace_all(&mut self, records: Vec<FeedbackRecord>) {
        self.records = records;
    }

    /// Overwrite the record with the same id in place.
    /// Returns false (and changes nothing) when the id is unknown.
    pub(super) fn replace_one(&mut self, record: FeedbackRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                log::debug!("Ignoring snapshot for unknown feedback {}", record.id);
                false
            }
        }
    }
}
