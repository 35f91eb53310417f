use crate::error::DetectorError;
use crate::resource::Target;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Permission value produced by a detector.
///
/// Values are passed through unchanged: a detector that counts matching
/// rows yields `Int(n)` rather than a coerced boolean. Use
/// [`Verdict::is_granted`] to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Verdict {
    /// Plain boolean decision.
    Bool(bool),
    /// Numeric decision, granted when non-zero.
    Int(i64),
}

impl Verdict {
    /// Returns whether this value grants the action.
    pub fn is_granted(&self) -> bool {
        match *self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }

    /// Returns the value only when it is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(value) => Some(value),
            Self::Int(_) => None,
        }
    }

    /// Returns the value only when it is numeric.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(value) => Some(value),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl PartialEq<bool> for Verdict {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Verdict {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! verdict_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Verdict {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

verdict_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! verdict_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Verdict {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

verdict_from_wide_int!(u64, usize, isize);

/// Pending detector computation.
pub type PendingVerdict = BoxFuture<'static, std::result::Result<Verdict, DetectorError>>;

/// Outcome of invoking a detector.
pub enum Decision {
    /// The detector completed synchronously.
    Immediate(Verdict),
    /// The detector needs asynchronous work, such as a storage round-trip.
    Pending(PendingVerdict),
}

impl Decision {
    /// Wraps a future producing a verdict-like value.
    pub fn pending<F, T, E>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Into<Verdict>,
        E: Into<DetectorError>,
    {
        Self::Pending(
            async move {
                match future.await {
                    Ok(value) => Ok::<Verdict, DetectorError>(value.into()),
                    Err(err) => Err(err.into()),
                }
            }
            .boxed(),
        )
    }

    /// Returns true if settling requires awaiting a computation.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Waits for the decision to settle.
    pub async fn settle(self) -> std::result::Result<Verdict, DetectorError> {
        match self {
            Self::Immediate(verdict) => Ok(verdict),
            Self::Pending(pending) => pending.await,
        }
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(verdict) => f.debug_tuple("Immediate").field(verdict).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Conversion of detector return values into a [`Decision`].
pub trait IntoDecision {
    /// Converts the value, surfacing detector failures.
    fn into_decision(self) -> std::result::Result<Decision, DetectorError>;
}

impl IntoDecision for Decision {
    fn into_decision(self) -> std::result::Result<Decision, DetectorError> {
        Ok(self)
    }
}

macro_rules! into_decision_immediate {
    ($($ty:ty),*) => {
        $(
            impl IntoDecision for $ty {
                fn into_decision(self) -> std::result::Result<Decision, DetectorError> {
                    Ok(Decision::Immediate(self.into()))
                }
            }
        )*
    };
}

into_decision_immediate!(Verdict, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T, E> IntoDecision for std::result::Result<T, E>
where
    T: IntoDecision,
    E: Into<DetectorError>,
{
    fn into_decision(self) -> std::result::Result<Decision, DetectorError> {
        match self {
            Ok(value) => value.into_decision(),
            Err(err) => Err(err.into()),
        }
    }
}

/// Permission rule bound to one or more (resource, action) pairs.
///
/// The subject is the evaluation context and the target the sole argument.
/// Implementations must not assume anything about the registry state.
pub trait Detector<S: ?Sized>: Send + Sync {
    /// Evaluates the rule.
    fn detect(
        &self,
        subject: &S,
        target: Target<'_>,
    ) -> std::result::Result<Decision, DetectorError>;
}

/// Detector backed by a closure.
pub(crate) struct FnDetector<F>(pub(crate) F);

impl<S, F, R> Detector<S> for FnDetector<F>
where
    S: ?Sized,
    F: Fn(&S, Target<'_>) -> R + Send + Sync,
    R: IntoDecision,
{
    fn detect(
        &self,
        subject: &S,
        target: Target<'_>,
    ) -> std::result::Result<Decision, DetectorError> {
        (self.0)(subject, target).into_decision()
    }
}
