use crate::decision::{Decision, Detector, FnDetector, IntoDecision, Verdict};
use crate::error::{Error, Result};
use crate::resolve::{DefaultNameResolver, NameResolver};
use crate::resource::{ModelRef, ResourceRef, Target};
use crate::resource_action::ResourceAction;
use crate::types::{ActionName, ResourceName};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Action names accepted by [`Ability::declare`]: a single name or a
/// sequence of names.
pub trait IntoActions {
    /// Validates and collects the action names.
    fn into_actions(self) -> Result<Vec<ActionName>>;
}

fn collect_actions<I>(values: I) -> Result<Vec<ActionName>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values.into_iter().map(ActionName::new).collect()
}

impl IntoActions for &str {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        Ok(vec![ActionName::new(self)?])
    }
}

impl IntoActions for String {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        Ok(vec![ActionName::new(self)?])
    }
}

impl IntoActions for ActionName {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        Ok(vec![self])
    }
}

impl<T: AsRef<str>, const N: usize> IntoActions for [T; N] {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        collect_actions(self)
    }
}

impl<T: AsRef<str>> IntoActions for &[T] {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        collect_actions(self)
    }
}

impl<T: AsRef<str>> IntoActions for Vec<T> {
    fn into_actions(self) -> Result<Vec<ActionName>> {
        collect_actions(self)
    }
}

/// Rules declared for one resource name.
pub struct ResourceSpec<S: ?Sized> {
    model: Option<ModelRef>,
    actions: HashMap<ActionName, Arc<dyn Detector<S>>>,
}

impl<S: ?Sized> ResourceSpec<S> {
    fn new() -> Self {
        Self {
            model: None,
            actions: HashMap::new(),
        }
    }

    /// Class reference of the last declaration made with one.
    ///
    /// Only kept for introspection; checks never dispatch on it.
    pub fn model(&self) -> Option<&ModelRef> {
        self.model.as_ref()
    }

    /// Returns the bound action names.
    pub fn actions(&self) -> impl Iterator<Item = &ActionName> {
        self.actions.keys()
    }

    /// Returns the detector bound to `action`.
    pub fn detector(&self, action: &str) -> Option<&Arc<dyn Detector<S>>> {
        self.actions.get(action)
    }

    /// Returns true if `action` has a detector.
    pub fn contains_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }
}

impl<S: ?Sized> fmt::Debug for ResourceSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&ActionName> = self.actions.keys().collect();
        actions.sort();
        f.debug_struct("ResourceSpec")
            .field("model", &self.model)
            .field("actions", &actions)
            .finish()
    }
}

/// Rule registry and resolver.
///
/// Rules are declared during setup through `&mut self`; checks only need
/// `&self`, so a populated ability can be shared behind an [`Arc`].
pub struct Ability<S: ?Sized> {
    resources: HashMap<ResourceName, ResourceSpec<S>>,
    resolver: Box<dyn NameResolver>,
    reject_rebinding: bool,
}

/// Builder for [`Ability`].
pub struct AbilityBuilder<S: ?Sized> {
    resolver: Box<dyn NameResolver>,
    reject_rebinding: bool,
    _subject: PhantomData<fn(&S)>,
}

impl<S: ?Sized> AbilityBuilder<S> {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            resolver: Box::new(DefaultNameResolver),
            reject_rebinding: false,
            _subject: PhantomData,
        }
    }

    /// Sets the resource name resolver.
    pub fn name_resolver<R: NameResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Rejects re-declaring an already bound (resource, action) pair.
    ///
    /// Off by default, in which case the last declaration wins.
    pub fn reject_rebinding(mut self, on: bool) -> Self {
        self.reject_rebinding = on;
        self
    }

    /// Builds an empty ability.
    pub fn build(self) -> Ability<S> {
        Ability {
            resources: HashMap::new(),
            resolver: self.resolver,
            reject_rebinding: self.reject_rebinding,
        }
    }

    /// Builds the ability and runs `setup` against it.
    pub fn build_with<F>(self, setup: F) -> Result<Ability<S>>
    where
        F: FnOnce(&mut Ability<S>) -> Result<()>,
    {
        let mut ability = self.build();
        setup(&mut ability)?;
        Ok(ability)
    }
}

impl<S: ?Sized> Default for AbilityBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> Ability<S> {
    /// Creates an empty ability with default configuration.
    pub fn new() -> Self {
        AbilityBuilder::new().build()
    }

    /// Returns a builder.
    pub fn builder() -> AbilityBuilder<S> {
        AbilityBuilder::new()
    }

    /// Creates an ability and runs `setup` against it.
    ///
    /// ```
    /// use rs_ability::{Ability, Target};
    ///
    /// let ability = Ability::<str>::with_setup(|can| {
    ///     can.declare("read", "docs", |_subject: &str, _target: Target<'_>| true)
    /// })
    /// .unwrap();
    /// assert!(ability.resource("docs").is_some());
    /// ```
    pub fn with_setup<F>(setup: F) -> Result<Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        AbilityBuilder::new().build_with(setup)
    }

    /// Binds a closure detector to every action in `actions` on `target`.
    ///
    /// `target` is a bare resource name or a [`ModelRef`]; in the latter case
    /// it is recorded on the resource spec. Existing bindings are replaced
    /// unless the ability rejects rebinding.
    pub fn declare<F, R>(
        &mut self,
        actions: impl IntoActions,
        target: impl Into<ResourceRef>,
        detector: F,
    ) -> Result<()>
    where
        F: Fn(&S, Target<'_>) -> R + Send + Sync + 'static,
        R: IntoDecision,
    {
        self.declare_shared(actions, target, Arc::new(FnDetector(detector)))
    }

    /// Binds a [`Detector`] implementation.
    pub fn declare_detector<D>(
        &mut self,
        actions: impl IntoActions,
        target: impl Into<ResourceRef>,
        detector: D,
    ) -> Result<()>
    where
        D: Detector<S> + 'static,
    {
        self.declare_shared(actions, target, Arc::new(detector))
    }

    /// Binds an already shared detector.
    pub fn declare_shared(
        &mut self,
        actions: impl IntoActions,
        target: impl Into<ResourceRef>,
        detector: Arc<dyn Detector<S>>,
    ) -> Result<()> {
        let mut actions = actions.into_actions()?;
        let mut seen = HashSet::with_capacity(actions.len());
        actions.retain(|action| seen.insert(action.clone()));
        if actions.is_empty() {
            return Err(Error::InvalidDeclaration(
                "at least one action is required".to_string(),
            ));
        }
        let target = target.into();
        let name = self.resolver.resolve(&target.as_target())?;

        if self.reject_rebinding
            && let Some(spec) = self.resources.get(&name)
            && let Some(bound) = actions.iter().find(|action| spec.actions.contains_key(*action))
        {
            return Err(Error::DuplicateBinding(ResourceAction::new(
                name,
                bound.clone(),
            )));
        }

        let spec = self
            .resources
            .entry(name.clone())
            .or_insert_with(ResourceSpec::new);
        if let Some(model) = target.model() {
            spec.model = Some(*model);
        }
        for action in actions {
            if spec
                .actions
                .insert(action.clone(), Arc::clone(&detector))
                .is_some()
            {
                tracing::debug!(resource = %name, action = %action, "detector rebound");
            } else {
                tracing::debug!(resource = %name, action = %action, "detector bound");
            }
        }
        Ok(())
    }

    /// Resolves the target, looks up its detector and invokes it, without
    /// waiting on a pending result.
    pub fn decide<'a>(
        &self,
        subject: &S,
        action: &str,
        target: impl Into<Target<'a>>,
    ) -> Result<Decision> {
        let target = target.into();
        let name = self.resolver.resolve(&target)?;
        let Some(spec) = self.resources.get(&name) else {
            return Err(Error::UnknownResource(name));
        };
        let Some(detector) = spec.actions.get(action) else {
            return Err(Error::UnknownAction(ResourceAction::new(
                name,
                ActionName::from_string(action.to_string()),
            )));
        };

        let decision = detector.detect(subject, target).map_err(Error::Detector)?;
        tracing::trace!(
            resource = %name,
            action,
            pending = decision.is_pending(),
            "detector evaluated"
        );
        Ok(decision)
    }

    /// Checks whether `subject` may perform `action` on `target`.
    ///
    /// The detector's value is returned as-is; a count of zero is a falsy
    /// [`Verdict::Int`], not `false`. Errors are never a denial.
    pub async fn check<'a>(
        &self,
        subject: &S,
        action: &str,
        target: impl Into<Target<'a>>,
    ) -> Result<Verdict> {
        let decision = self.decide(subject, action, target)?;
        decision.settle().await.map_err(Error::Detector)
    }

    /// Like [`Ability::check`], coercing the verdict to a strict boolean.
    pub async fn allows<'a>(
        &self,
        subject: &S,
        action: &str,
        target: impl Into<Target<'a>>,
    ) -> Result<bool> {
        let verdict = self.check(subject, action, target).await?;
        Ok(verdict.is_granted())
    }

    /// Returns the rules declared under `name`.
    pub fn resource(&self, name: &str) -> Option<&ResourceSpec<S>> {
        self.resources.get(name)
    }

    /// Iterates over declared resources.
    pub fn resources(&self) -> impl Iterator<Item = (&ResourceName, &ResourceSpec<S>)> {
        self.resources.iter()
    }

    /// Iterates over every (resource, action) binding.
    pub fn bindings(&self) -> impl Iterator<Item = ResourceAction> + '_ {
        self.resources.iter().flat_map(|(name, spec)| {
            spec.actions
                .keys()
                .map(move |action| ResourceAction::new(name.clone(), action.clone()))
        })
    }

    /// Returns true if a detector is bound for `key`.
    pub fn contains(&self, key: &ResourceAction) -> bool {
        self.resources
            .get(key.resource())
            .is_some_and(|spec| spec.actions.contains_key(key.action()))
    }

    /// Number of declared resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<S: ?Sized> Default for Ability<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for Ability<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("resources", &self.resources)
            .field("reject_rebinding", &self.reject_rebinding)
            .finish_non_exhaustive()
    }
}
