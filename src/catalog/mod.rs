//! Catalog records and their save/delete lifecycle.
//!
//! Every write goes through a [`HookChain`]: the record is validated, each
//! hook's `pre_save` runs in registration order, the row is written, then each
//! `post_save` runs in the same order. Deletes run `pre_delete` hooks, remove
//! the row, and run `post_delete` hooks. The first error stops the chain and is
//! returned to the caller as-is; the database work of that save or delete is
//! rolled back.

mod hooks;
mod record;
mod service;

pub use hooks::{BookSlugHook, HookChain, PollProvisioner, RecordHooks, SlugHook};
pub use record::{Record, Slugged};
pub use service::{Catalog, Vote};
