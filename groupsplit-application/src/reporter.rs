use crate::{model::TransferOutcome, ports::TransferExecutor};
use groupsplit_domain::{
    MemberBalances, PlanVerificationError, SettlementPlan, Tolerance,
    services::{apply_transfers, verify_plan},
};

/// Result of handing a plan to an executor, one outcome per transfer in plan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcomes: Vec<TransferOutcome>,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &TransferOutcome> + '_ {
        self.outcomes.iter().filter(|outcome| outcome.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TransferOutcome> + '_ {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(TransferOutcome::is_success)
    }

    /// Balances still open after the successful transfers, ready to be planned again.
    pub fn remaining_balances(&self, balances: &MemberBalances) -> MemberBalances {
        apply_transfers(balances, self.succeeded().map(|outcome| &outcome.transfer))
    }
}

/// Hands each transfer of a plan to the executor.
///
/// Transfers are submitted in plan order. A failure is recorded and the next
/// transfer is still attempted; nothing is retried or rolled back.
pub struct SettlementReporter<'a> {
    executor: &'a dyn TransferExecutor,
    tolerance: Tolerance,
}

impl<'a> SettlementReporter<'a> {
    pub fn new(executor: &'a dyn TransferExecutor, tolerance: Tolerance) -> Self {
        Self {
            executor,
            tolerance,
        }
    }

    pub fn execute(
        &self,
        plan: &SettlementPlan,
    ) -> Result<ExecutionReport, PlanVerificationError> {
        verify_plan(&plan.balances, &plan.transfers, self.tolerance)?;

        let mut outcomes = Vec::with_capacity(plan.transfers.len());
        for (index, transfer) in plan.transfers.iter().enumerate() {
            let result = self.executor.execute(transfer);
            match &result {
                Ok(receipt) => tracing::info!(
                    index,
                    from = %transfer.from,
                    to = %transfer.to,
                    amount = %transfer.amount,
                    reference = %receipt.reference,
                    "Transfer executed"
                ),
                Err(err) => tracing::warn!(
                    index,
                    from = %transfer.from,
                    to = %transfer.to,
                    amount = %transfer.amount,
                    error = %err,
                    "Transfer failed"
                ),
            }
            outcomes.push(TransferOutcome {
                transfer: transfer.clone(),
                result,
            });
        }

        Ok(ExecutionReport { outcomes })
    }
}
