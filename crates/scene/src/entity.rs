use foundation::ids::RecordIndex;

/// Identity of a rendered element across render passes.
///
/// Records are keyed by their index, hierarchy groups by their category
/// name. Variant order doubles as paint order (root, groups, leaves), so
/// parents always sit beneath their children.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKey {
    Root,
    Group(String),
    Record(RecordIndex),
}

impl ElementKey {
    pub fn record(&self) -> Option<RecordIndex> {
        match self {
            ElementKey::Record(index) => Some(*index),
            _ => None,
        }
    }
}

impl From<RecordIndex> for ElementKey {
    fn from(index: RecordIndex) -> Self {
        ElementKey::Record(index)
    }
}

impl std::fmt::Display for ElementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKey::Root => write!(f, "root"),
            ElementKey::Group(name) => write!(f, "group:{name}"),
            ElementKey::Record(index) => write!(f, "record{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ElementKey;
    use foundation::ids::RecordIndex;

    #[test]
    fn paint_order_puts_parents_first() {
        let mut keys = vec![
            ElementKey::Record(RecordIndex(0)),
            ElementKey::Group("B".to_string()),
            ElementKey::Root,
            ElementKey::Group("A".to_string()),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ElementKey::Root,
                ElementKey::Group("A".to_string()),
                ElementKey::Group("B".to_string()),
                ElementKey::Record(RecordIndex(0)),
            ]
        );
    }

    #[test]
    fn display_and_record_accessor() {
        let k = ElementKey::from(RecordIndex(7));
        assert_eq!(k.to_string(), "record#7");
        assert_eq!(k.record(), Some(RecordIndex(7)));
        assert_eq!(ElementKey::Group("CA".into()).record(), None);
    }
}
