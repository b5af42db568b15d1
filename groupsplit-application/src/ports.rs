use crate::{
    error::{CommandParseError, ExecutionError},
    model::{LedgerCommandWithLine, TransferReceipt},
};
use groupsplit_domain::TransferInstruction;

/// Turns user input into ledger commands. The ledger validates every command
/// again, whatever the source.
pub trait LedgerCommandParser: Send + Sync {
    fn parse<'a>(
        &self,
        content: &'a str,
    ) -> Result<Vec<LedgerCommandWithLine<'a>>, CommandParseError>;
}

/// Moves value for one transfer (wallet submission in production).
///
/// Each call is independent; callers never retry or roll back.
pub trait TransferExecutor: Send + Sync {
    fn execute(&self, transfer: &TransferInstruction) -> Result<TransferReceipt, ExecutionError>;
}
