use crate::error::{Error, Result};
use crate::resource::Target;
use crate::types::ResourceName;

/// Maps a target to the resource name its rules are stored under.
///
/// Install a custom implementation with
/// [`AbilityBuilder::name_resolver`](crate::AbilityBuilder::name_resolver)
/// for resource types the default heuristic cannot handle.
pub trait NameResolver: Send + Sync {
    /// Resolves the resource name for `target`.
    fn resolve(&self, target: &Target<'_>) -> Result<ResourceName>;
}

/// Default resolution heuristic.
///
/// Bare names are returned unchanged. Class references and instances use
/// their collection name when they carry one, and their short type name
/// otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNameResolver;

impl NameResolver for DefaultNameResolver {
    fn resolve(&self, target: &Target<'_>) -> Result<ResourceName> {
        let name = match *target {
            Target::Name(name) => name,
            Target::Model(model) => model
                .collection()
                .filter(|collection| !collection.is_empty())
                .unwrap_or(model.type_name()),
            Target::Instance(instance) => instance
                .collection_name()
                .filter(|collection| !collection.is_empty())
                .unwrap_or(instance.type_name()),
        };
        ResourceName::new(name).map_err(|err| match err {
            Error::InvalidName(reason) => Error::NameResolution(format!("{target:?}: {reason}")),
            other => other,
        })
    }
}

/// Resolves a resource name with [`DefaultNameResolver`].
pub fn resolve_name<'a>(target: impl Into<Target<'a>>) -> Result<ResourceName> {
    DefaultNameResolver.resolve(&target.into())
}
