//! Key-value records.
use crate::error::SigrlError;
use std::collections::HashMap;

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value, e.g. a reward or a loss.
    Scalar(f32),

    /// A 1-dimensional array, e.g. an observation.
    Array1(Vec<f32>),
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use sigrl_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("episode", RecordValue::Scalar(1.0));
///
/// assert_eq!(record.get_scalar("loss").unwrap(), 0.5);
/// assert!(record.get_array1("loss").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite values of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, SigrlError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(SigrlError::RecordValueTypeError("Scalar".to_string())),
            None => Err(SigrlError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, SigrlError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(SigrlError::RecordValueTypeError("Array1".to_string())),
            None => Err(SigrlError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overwrites_with_second() {
        let a = Record::from_slice(&[
            ("reward", RecordValue::Scalar(1.0)),
            ("action", RecordValue::Scalar(2.0)),
        ]);
        let b = Record::from_scalar("reward", -3.0);
        let c = a.merge(b);

        assert_eq!(c.len(), 2);
        assert_eq!(c.get_scalar("reward").unwrap(), -3.0);
        assert_eq!(c.get_scalar("action").unwrap(), 2.0);
    }

    #[test]
    fn test_typed_getters() {
        let mut record = Record::empty();
        record.insert("obs", RecordValue::Array1(vec![0.0, 1.0, 2.0]));
        record.insert("phase", RecordValue::Scalar(2.0));

        assert_eq!(record.get_array1("obs").unwrap(), vec![0.0, 1.0, 2.0]);
        assert_eq!(record.get_scalar("phase").unwrap(), 2.0);
        assert!(matches!(
            record.get_array1("phase"),
            Err(SigrlError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_scalar("obs"),
            Err(SigrlError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_scalar("missing"),
            Err(SigrlError::RecordKeyError(_))
        ));
    }
}
