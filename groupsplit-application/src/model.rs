use crate::error::ExecutionError;
use groupsplit_domain::{
    ExpenseId, GroupSummary, MemberBalances, Money, SettlementPlan, TransferInstruction,
};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand<'a> {
    Rename(&'a str),
    AddMember(&'a str),
    RemoveMember(&'a str),
    AddExpense {
        payer: &'a str,
        amount: Money,
        description: &'a str,
    },
    RemoveExpense(ExpenseId),
    ShowBalances,
    ShowSummary,
    Settle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerCommandWithLine<'a> {
    pub line: usize,
    pub command: LedgerCommand<'a>,
}

/// Snapshot requested by a query command, tagged with its source line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOutput {
    Balances { line: usize, balances: MemberBalances },
    Summary { line: usize, summary: GroupSummary },
    Plan { line: usize, plan: SettlementPlan },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proof of execution handed back by an executor (e.g. a transaction signature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub transfer: TransferInstruction,
    pub result: Result<TransferReceipt, ExecutionError>,
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
