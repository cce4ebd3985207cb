//! Background jobs.
//!
//! One job today: the daily price sync, run once per process invocation by
//! the `sync` command. Jobs are idempotent (keyed upserts) and
//! fault-tolerant: a failing item is logged and skipped, never fatal to the
//! batch.

pub mod price_sync_job;
