use serde::{Deserialize, Serialize};

/// Slot for an entity that a later transition creates.
///
/// Serialized adjacently tagged so a stored snapshot reads
/// `{"state": "NOT_CREATED"}` or `{"state": "CREATED", "record": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Record<T> {
    NotCreated,
    Created(T),
}

impl<T> Record<T> {
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Record::NotCreated => None,
            Record::Created(value) => Some(value),
        }
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Record::NotCreated => None,
            Record::Created(value) => Some(value),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Record::Created(_))
    }

    /// Take the value out, leaving `NotCreated` behind
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Record::NotCreated) {
            Record::NotCreated => None,
            Record::Created(value) => Some(value),
        }
    }
}

impl<T> Default for Record<T> {
    fn default() -> Self {
        Record::NotCreated
    }
}

impl<T> From<Option<T>> for Record<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Record::NotCreated, Record::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_state_tag() {
        let empty: Record<u32> = Record::NotCreated;
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "NOT_CREATED" }));

        let created = Record::Created(7u32);
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "CREATED", "record": 7 }));
    }

    #[test]
    fn take_leaves_not_created() {
        let mut slot = Record::Created("scope");
        assert_eq!(slot.take(), Some("scope"));
        assert!(!slot.is_created());
    }
}
