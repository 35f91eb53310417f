//! Check entry points attached to a model type.
//!
//! A model that implements [`Attached`] holds a handle to the ability its
//! rules were declared on and gains `check`/`allows` methods that supply the
//! instance itself as the subject:
//!
//! ```
//! use std::sync::Arc;
//! use rs_ability::{Ability, Attached, Model, Target};
//! # use futures::executor::block_on;
//!
//! struct User {
//!     active: bool,
//!     ability: Arc<Ability<User>>,
//! }
//! rs_ability::impl_model!(User, "users");
//!
//! impl Attached for User {
//!     fn ability(&self) -> &Ability<Self> {
//!         &self.ability
//!     }
//! }
//!
//! let ability = Ability::<User>::attach(|can| {
//!     can.declare("view", User::model(), |_: &User, target: Target<'_>| {
//!         target.downcast_ref::<User>().is_some_and(|user| user.active)
//!     })
//! })
//! .unwrap();
//!
//! let me = User { active: true, ability: Arc::clone(&ability) };
//! let them = User { active: false, ability: Arc::clone(&ability) };
//!
//! assert_eq!(block_on(User::check(&me, "view", &me)).unwrap(), true);
//! assert_eq!(block_on(me.check("view", &them)).unwrap(), false);
//! ```

use crate::ability::Ability;
use crate::decision::Verdict;
use crate::error::Result;
use crate::resource::Target;
use std::future::Future;
use std::sync::Arc;

/// Model type bound to an [`Ability`] over itself.
///
/// The instance-level call is `me.check(action, target)`; the class-level
/// call is the fully qualified `User::check(&me, action, target)`. Both
/// forward to [`Ability::check`] with the instance as subject.
pub trait Attached: Sized + Send + Sync + 'static {
    /// Ability the model's rules were declared on.
    fn ability(&self) -> &Ability<Self>;

    /// Checks whether `self` may perform `action` on `target`.
    fn check<'a>(
        &'a self,
        action: &'a str,
        target: impl Into<Target<'a>>,
    ) -> impl Future<Output = Result<Verdict>> + Send + 'a {
        let target = target.into();
        self.ability().check(self, action, target)
    }

    /// Strict-boolean form of [`Attached::check`].
    fn allows<'a>(
        &'a self,
        action: &'a str,
        target: impl Into<Target<'a>>,
    ) -> impl Future<Output = Result<bool>> + Send + 'a {
        let target = target.into();
        self.ability().allows(self, action, target)
    }
}

impl<M: Attached> Ability<M> {
    /// Creates an ability for `M`, runs `setup` against it and returns it
    /// shared so model instances can hold it.
    pub fn attach<F>(setup: F) -> Result<Arc<Self>>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        Self::with_setup(setup).map(Arc::new)
    }
}
