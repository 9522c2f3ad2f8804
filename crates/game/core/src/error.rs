//! Common error infrastructure for hexcombat-core.
//!
//! Every error enum in the crate implements [`GameError`] so callers can
//! classify failures by severity and match on stable error codes without
//! parsing messages.

use crate::state::{Hex, PlayerId, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed later or with another choice
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: destination blocked, ability already spent this round.
    Recoverable,

    /// Examples: unknown unit, selection index out of range.
    Validation,

    /// Examples: effect capacity exhausted.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all hexcombat-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors surfaced by the combat engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is already on the battlefield")]
    DuplicateUnit(UnitId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("unit {unit} has no ability in slot {slot}")]
    AbilityNotFound { unit: UnitId, slot: usize },

    #[error("ability {slot} of unit {unit} was already used this round")]
    AbilityUsed { unit: UnitId, slot: usize },

    #[error("requirements of ability {slot} of unit {unit} are not met")]
    RequirementsNotMet { unit: UnitId, slot: usize },

    #[error("selection {index} is not one of the {available} offered targets")]
    InvalidSelection { index: usize, available: usize },

    #[error("unit {unit} cannot stand on {hex}")]
    Blocked { unit: UnitId, hex: Hex },

    #[error("unit {0} cannot hold more effects")]
    EffectCapacity(UnitId),

    #[error("unit {0} cannot learn more abilities")]
    AbilityCapacity(UnitId),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            UnitNotFound(_) | DuplicateUnit(_) | PlayerNotFound(_) | AbilityNotFound { .. } => {
                ErrorSeverity::Validation
            }
            InvalidSelection { .. } | AbilityCapacity(_) => ErrorSeverity::Validation,
            AbilityUsed { .. } | RequirementsNotMet { .. } | Blocked { .. } => {
                ErrorSeverity::Recoverable
            }
            EffectCapacity(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            UnitNotFound(_) => "COMBAT_UNIT_NOT_FOUND",
            DuplicateUnit(_) => "COMBAT_DUPLICATE_UNIT",
            PlayerNotFound(_) => "COMBAT_PLAYER_NOT_FOUND",
            AbilityNotFound { .. } => "COMBAT_ABILITY_NOT_FOUND",
            AbilityUsed { .. } => "COMBAT_ABILITY_USED",
            RequirementsNotMet { .. } => "COMBAT_REQUIREMENTS_NOT_MET",
            InvalidSelection { .. } => "COMBAT_INVALID_SELECTION",
            Blocked { .. } => "COMBAT_BLOCKED",
            EffectCapacity(_) => "COMBAT_EFFECT_CAPACITY",
            AbilityCapacity(_) => "COMBAT_ABILITY_CAPACITY",
        }
    }
}
