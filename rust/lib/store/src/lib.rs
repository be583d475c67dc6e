//! Typed record operations over a `bakery_kv::KVStore`.
//!
//! Models implement [`Record`] to declare their collection and key.
//! [`RecordOps`] does the encoding and runs every engine call off the async
//! executor, so callers simply `.await` each operation.

pub mod kv;

pub use kv::{delete_many, Record, RecordOps};
