#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod processor;
pub mod registry;
pub mod reporter;

pub use error::{ApplicationError, CommandParseError, ExecutionError, ProcessingError};
pub use model::{
    GroupId, LedgerCommand, LedgerCommandWithLine, ProcessingOutput, TransferOutcome,
    TransferReceipt,
};
pub use ports::{LedgerCommandParser, TransferExecutor};
pub use processor::LedgerProcessor;
pub use registry::GroupRegistry;
pub use reporter::{ExecutionReport, SettlementReporter};
