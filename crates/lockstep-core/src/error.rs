#![forbid(unsafe_code)]

//! Error taxonomy for construction and mutation.
//!
//! Construction can fail only on an unresolvable flavor id. Mutations can
//! fail only by flavor rejection, and a rejected mutation commits nothing:
//! neither column is touched and the dirty flag keeps its prior value.
//! Sparse reads are not errors; they return `None`.

use crate::registry::FlavorId;

/// Rejection raised by a [`Flavor`](crate::flavor::Flavor) plan hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlavorError {
    /// The operation would grow the collection past a fixed capacity.
    CapacityExceeded { capacity: usize, requested: usize },
    /// The flavor does not admit this operation class at all.
    Unsupported { op: &'static str },
}

impl std::fmt::Display for FlavorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityExceeded {
                capacity,
                requested,
            } => {
                write!(
                    f,
                    "capacity exceeded: {} slots requested, {} allowed",
                    requested, capacity
                )
            }
            Self::Unsupported { op } => write!(f, "operation '{}' not supported by flavor", op),
        }
    }
}

impl std::error::Error for FlavorError {}

/// Why a mutation was refused. Nothing was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The active flavor rejected the planned edit.
    Flavor(FlavorError),
}

impl std::fmt::Display for MutationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flavor(err) => write!(f, "mutation rejected: {}", err),
        }
    }
}

impl std::error::Error for MutationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Flavor(err) => Some(err),
        }
    }
}

impl From<FlavorError> for MutationError {
    fn from(err: FlavorError) -> Self {
        Self::Flavor(err)
    }
}

/// Why a [`RenderList`](crate::list::RenderList) could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The requested flavor id is not present in the registry.
    UnknownFlavor(FlavorId),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFlavor(id) => write!(f, "unknown collection flavor '{}'", id),
        }
    }
}

impl std::error::Error for BuildError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let cap = FlavorError::CapacityExceeded {
            capacity: 4,
            requested: 5,
        };
        assert_eq!(cap.to_string(), "capacity exceeded: 5 slots requested, 4 allowed");

        let unsupported = FlavorError::Unsupported { op: "sort" };
        assert_eq!(
            unsupported.to_string(),
            "operation 'sort' not supported by flavor"
        );

        let build = BuildError::UnknownFlavor(FlavorId::new("missing"));
        assert_eq!(build.to_string(), "unknown collection flavor 'missing'");
    }

    #[test]
    fn mutation_error_wraps_flavor_error() {
        let err: MutationError = FlavorError::Unsupported { op: "splice" }.into();
        assert!(matches!(
            err,
            MutationError::Flavor(FlavorError::Unsupported { op: "splice" })
        ));
        assert!(err.to_string().starts_with("mutation rejected:"));
    }

    #[test]
    fn source_chain_reaches_flavor_error() {
        use std::error::Error as _;
        let err: MutationError = FlavorError::CapacityExceeded {
            capacity: 1,
            requested: 2,
        }
        .into();
        let source = err.source().expect("flavor rejection carries a source");
        assert!(source.to_string().contains("capacity exceeded"));
    }
}
