use crate::model::GroupId;
use groupsplit_domain::{AtomicUnitConversionError, LedgerError, SettlementInvariantViolation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Transfer rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Conversion(#[from] AtomicUnitConversionError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationError {
    #[error("Group {0} does not exist")]
    UnknownGroup(GroupId),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Settlement(#[from] SettlementInvariantViolation),
}

/// Failure while applying a script; the ledger keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error("Line {line}: {source}")]
    Ledger { line: usize, source: LedgerError },
    #[error("Line {line}: {source}")]
    Settlement {
        line: usize,
        source: SettlementInvariantViolation,
    },
}

impl ProcessingError {
    pub fn line(&self) -> usize {
        match self {
            Self::Parse(CommandParseError::SyntaxError { line, .. })
            | Self::Ledger { line, .. }
            | Self::Settlement { line, .. } => *line,
        }
    }
}
