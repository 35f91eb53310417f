//! Resource values, class references and check targets.

use crate::error::DetectorError;
use crate::types::ResourceName;
use std::any::{Any, TypeId};
use std::fmt;

/// A value that can be the subject or target of a check.
///
/// Instances resolve to a resource name through [`Resource::collection_name`]
/// when they carry collection metadata, and through [`Resource::type_name`]
/// otherwise.
pub trait Resource: Any + Send + Sync {
    /// Name of the collection this value was loaded from, if any.
    fn collection_name(&self) -> Option<&str> {
        None
    }

    /// Short name of the concrete type, without module path or generics.
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Class-level counterpart of [`Resource`].
pub trait Model: Resource + Sized {
    /// Returns the class reference used when declaring rules for this type.
    fn model() -> ModelRef {
        ModelRef::of::<Self>()
    }
}

/// Implements [`Resource`] and [`Model`] for a type, optionally bound to a
/// collection name.
///
/// ```
/// struct Post;
/// rs_ability::impl_model!(Post, "posts");
///
/// use rs_ability::{Model, resolve_name};
/// assert_eq!(resolve_name(&Post::model()).unwrap(), "posts");
/// assert_eq!(resolve_name(&Post).unwrap(), "posts");
/// ```
#[macro_export]
macro_rules! impl_model {
    ($ty:ty, $collection:expr) => {
        impl $crate::Resource for $ty {
            fn collection_name(&self) -> ::std::option::Option<&str> {
                ::std::option::Option::Some($collection)
            }
        }

        impl $crate::Model for $ty {
            fn model() -> $crate::ModelRef {
                $crate::ModelRef::of::<Self>().with_collection($collection)
            }
        }
    };
    ($ty:ty) => {
        impl $crate::Resource for $ty {}

        impl $crate::Model for $ty {}
    };
}

/// Reference to a resource type, used for declarations and introspection.
///
/// Dispatch never depends on the type id; it is kept so callers can find
/// out which type a declaration was made with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelRef {
    type_id: TypeId,
    type_name: &'static str,
    collection: Option<&'static str>,
}

impl ModelRef {
    /// Creates a reference to `T` without collection metadata.
    pub fn of<T: Resource>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: short_type_name(std::any::type_name::<T>()),
            collection: None,
        }
    }

    /// Attaches a collection name.
    pub fn with_collection(mut self, collection: &'static str) -> Self {
        self.collection = Some(collection);
        self
    }

    /// Returns the collection name, if any.
    pub fn collection(&self) -> Option<&'static str> {
        self.collection
    }

    /// Returns the short type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the referenced type id.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns true when this references `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

/// Target of a check: a bare resource name, a class reference or an
/// instance.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// Pre-resolved resource name.
    Name(&'a str),
    /// Resource class reference.
    Model(&'a ModelRef),
    /// Live resource instance.
    Instance(&'a (dyn Resource + 'static)),
}

impl<'a> Target<'a> {
    /// Returns the bare name when the target is one.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the class reference when the target is one.
    pub fn model(&self) -> Option<&'a ModelRef> {
        match *self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Returns the instance when the target is one.
    pub fn instance(&self) -> Option<&'a (dyn Resource + 'static)> {
        match *self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Downcasts an instance target to `T`.
    pub fn downcast_ref<T: Resource>(&self) -> Option<&'a T> {
        let instance: &'a dyn Any = self.instance()?;
        instance.downcast_ref::<T>()
    }

    /// Downcasts an instance target to `T`, failing with a detector error.
    ///
    /// Meant for use with `?` inside detectors.
    pub fn require<T: Resource>(&self) -> std::result::Result<&'a T, DetectorError> {
        self.downcast_ref::<T>().ok_or_else(|| {
            format!(
                "expected {} instance, got {self:?}",
                short_type_name(std::any::type_name::<T>())
            )
            .into()
        })
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Self::Model(model) => f.debug_tuple("Model").field(&model.type_name()).finish(),
            Self::Instance(instance) => f
                .debug_tuple("Instance")
                .field(&instance.type_name())
                .finish(),
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(value: &'a str) -> Self {
        Self::Name(value)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(value: &'a String) -> Self {
        Self::Name(value.as_str())
    }
}

impl<'a> From<&'a ResourceName> for Target<'a> {
    fn from(value: &'a ResourceName) -> Self {
        Self::Name(value.as_str())
    }
}

impl<'a> From<&'a ModelRef> for Target<'a> {
    fn from(value: &'a ModelRef) -> Self {
        Self::Model(value)
    }
}

impl<'a, T: Resource> From<&'a T> for Target<'a> {
    fn from(value: &'a T) -> Self {
        Self::Instance(value)
    }
}

/// Target of a declaration: a bare resource name or a class reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRef {
    /// Bare resource name.
    Name(String),
    /// Resource class reference, recorded for introspection.
    Model(ModelRef),
}

impl ResourceRef {
    /// Borrows this reference as a check target for name resolution.
    pub fn as_target(&self) -> Target<'_> {
        match self {
            Self::Name(name) => Target::Name(name),
            Self::Model(model) => Target::Model(model),
        }
    }

    /// Returns the class reference, if this is one.
    pub fn model(&self) -> Option<&ModelRef> {
        match self {
            Self::Model(model) => Some(model),
            Self::Name(_) => None,
        }
    }
}

impl From<&str> for ResourceRef {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for ResourceRef {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<ResourceName> for ResourceRef {
    fn from(value: ResourceName) -> Self {
        Self::Name(value.as_str().to_string())
    }
}

impl From<ModelRef> for ResourceRef {
    fn from(value: ModelRef) -> Self {
        Self::Model(value)
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
