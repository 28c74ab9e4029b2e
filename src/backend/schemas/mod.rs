//! One adapter per backend schema, each producing the canonical models.

pub mod documents;
pub mod object_store;
pub mod realtime;
