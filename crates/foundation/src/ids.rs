/// Stable identity of a dataset record.
///
/// Assigned once at ingestion and never reassigned; every rendered element
/// that stands for a record is keyed by it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordIndex(pub u32);

impl RecordIndex {
    pub fn new(n: u32) -> Self {
        RecordIndex(n)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
