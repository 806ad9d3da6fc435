use thiserror::Error;

/// Main error type for the battle engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleEngineError {
    /// Error related to move data lookup or processing
    #[error("Move data error: {0}")]
    MoveData(#[from] MoveDataError),
    /// Error related to species data lookup or processing
    #[error("Species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    /// Error related to item data lookup or processing
    #[error("Item data error: {0}")]
    ItemData(#[from] ItemDataError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
}

/// Errors related to move data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveDataError {
    /// The specified move was not found in the database
    #[error("Move not found: {0}")]
    MoveNotFound(String),
}

/// Errors related to species data operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    /// The specified species was not found in the database
    #[error("Species not found: #{0:03}")]
    SpeciesNotFound(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemDataError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    /// The party store has no combatant able to battle
    #[error("No active Pokemon found")]
    NoActivePokemon,
    /// No encounter slots exist for the requested route and method
    #[error("No encounters on route {route} for {method}")]
    NoEncounters { route: u16, method: String },
    /// Battle state is in an inconsistent or corrupted state
    #[error("Inconsistent battle state: {0}")]
    InconsistentState(String),
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Failures while reading static data tables from disk
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl DataLoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        DataLoadError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn parse(path: &str, source: ron::error::SpannedError) -> Self {
        DataLoadError::Parse {
            path: path.to_string(),
            source,
        }
    }
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using MoveDataError
pub type MoveDataResult<T> = Result<T, MoveDataError>;

/// Type alias for Results using SpeciesDataError
pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

pub type ItemDataResult<T> = Result<T, ItemDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_wrap_into_engine_error() {
        let err: BattleEngineError = MoveDataError::MoveNotFound("splash".to_string()).into();
        assert_eq!(err.to_string(), "Move data error: Move not found: splash");

        let err: BattleEngineError = SpeciesDataError::SpeciesNotFound(7).into();
        assert_eq!(err.to_string(), "Species data error: Species not found: #007");
    }
}
