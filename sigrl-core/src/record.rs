//! Types and traits for recording values produced during training and evaluation.
//!
//! * [`Record`] - a container of key-value pairs of various data types
//! * [`RecordValue`] - the types of values that can be stored
//! * [`Recorder`] - the interface for writing records to some destination
//! * [`BufferedRecorder`] - a recorder that keeps records in memory
//! * [`NullRecorder`] - a recorder that discards all records
//!
//! ```rust
//! use sigrl_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let episode = 3;
//! let obs = vec![0f32, 1.0, 2.0, 0.0];
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(episode as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! record.insert("obs", RecordValue::Array1(obs));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
