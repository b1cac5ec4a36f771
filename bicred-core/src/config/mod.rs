//! Configuration values are untyped yaml until a model parses them.

pub use serde_yaml::{from_value, to_value, Mapping, Number, Sequence, Value};
