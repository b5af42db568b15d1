#![warn(clippy::uninlined_format_args)]

pub mod ledger;
pub mod model;
pub mod services;

pub use ledger::{ExpenseLedger, GroupSummary, LedgerError};
pub use model::{
    AtomicUnitConversionError, ExpenseEvent, ExpenseId, MAX_ATOMIC_SCALE, MemberBalances,
    MemberId, Money, SettlementPlan, Tolerance, TransferInstruction,
};
pub use services::{
    BalanceCalculator, PlanVerificationError, SettlementInvariantViolation, SettlementPlanner,
    compute_balances, compute_transfers,
};
