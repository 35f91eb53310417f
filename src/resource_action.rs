use crate::error::{Error, Result};
use crate::types::{ActionName, ResourceName};
use std::fmt;

/// Composite `resource:action` key identifying one detector binding.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceAction {
    resource: ResourceName,
    action: ActionName,
}

impl ResourceAction {
    /// Creates a key from already validated parts.
    pub fn new(resource: ResourceName, action: ActionName) -> Self {
        Self { resource, action }
    }

    /// Parses a `resource:action` string.
    ///
    /// The action is everything after the last `:`, so resource names may
    /// themselves contain colons.
    pub fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref();
        let (resource, action) = split_key(value).ok_or_else(|| {
            Error::InvalidName(format!("`{value}` must be in resource:action format"))
        })?;
        Ok(Self {
            resource: ResourceName::new(resource)?,
            action: ActionName::new(action)?,
        })
    }

    /// Returns the resource part.
    pub fn resource(&self) -> &ResourceName {
        &self.resource
    }

    /// Returns the action part.
    pub fn action(&self) -> &ActionName {
        &self.action
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl TryFrom<&str> for ResourceAction {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<(ResourceName, ActionName)> for ResourceAction {
    fn from((resource, action): (ResourceName, ActionName)) -> Self {
        Self::new(resource, action)
    }
}

fn split_key(value: &str) -> Option<(&str, &str)> {
    value.rsplit_once(':')
}
