//! Minimal rule-based authorization.
//!
//! An [`Ability`] maps resource names to per-action rules ("detectors").
//! A check resolves the target's resource name, looks up the detector bound
//! to the action and evaluates it with the subject as context. Detectors may
//! answer immediately or return a pending computation, for example a count
//! of join rows in external storage; the check waits for exactly that one
//! result.
//!
//! Failures are never a denial: an undeclared resource or action, an
//! unresolvable target or a failing detector all surface as [`Error`].
//!
//! # Examples
//!
//! ```
//! use futures::executor::block_on;
//! use rs_ability::{Ability, Model, Target, Verdict};
//!
//! struct User {
//!     name: String,
//! }
//! rs_ability::impl_model!(User, "users");
//!
//! let ability = Ability::<User>::with_setup(|can| {
//!     can.declare(["view", "edit"], User::model(), |me: &User, target: Target<'_>| {
//!         target.downcast_ref::<User>().is_some_and(|user| user.name == me.name)
//!     })
//! })
//! .unwrap();
//!
//! let me = User { name: "me".into() };
//! let them = User { name: "them".into() };
//! assert_eq!(block_on(ability.check(&me, "edit", &me)).unwrap(), Verdict::Bool(true));
//! assert!(!block_on(ability.allows(&me, "view", &them)).unwrap());
//! ```
//!
//! Using the in-memory relation store for pending decisions (enable
//! `memory-store`):
//! ```no_run
//! # #[cfg(feature = "memory-store")]
//! # {
//! use rs_ability::{Decision, MemoryRelationStore, RelationStore, Target};
//! let store = MemoryRelationStore::new();
//! store.link("users_posts", "user_1", "post_1");
//! let detector = move |user: &String, target: Target<'_>| {
//!     let store = store.clone();
//!     let user = user.clone();
//!     let post = target.name().unwrap_or_default().to_string();
//!     Decision::pending(async move { store.count("users_posts", &user, &post).await })
//! };
//! # let _ = detector;
//! # }
//! ```
#![forbid(unsafe_code)]

mod ability;
mod attach;
mod decision;
mod error;
mod resolve;
mod resource;
mod resource_action;
mod store;
mod types;

#[cfg(feature = "memory-store")]
mod memory_store;

pub use crate::ability::{Ability, AbilityBuilder, IntoActions, ResourceSpec};
pub use crate::attach::Attached;
pub use crate::decision::{Decision, Detector, IntoDecision, PendingVerdict, Verdict};
pub use crate::error::{DetectorError, Error, Result, StoreError};
pub use crate::resolve::{DefaultNameResolver, NameResolver, resolve_name};
pub use crate::resource::{Model, ModelRef, Resource, ResourceRef, Target};
pub use crate::resource_action::ResourceAction;
pub use crate::store::RelationStore;
pub use crate::types::{ActionName, ResourceName};

#[cfg(feature = "memory-store")]
pub use crate::memory_store::MemoryRelationStore;
