use crate::{
    model::{MemberBalances, MemberId, Money, SettlementPlan, Tolerance, TransferInstruction},
    services::invariants::SettlementInvariantViolation,
};

/// Greedy debt simplification.
///
/// Matches the largest remaining debtor against the largest remaining
/// creditor until one side runs out. Every step settles at least one of the
/// two, so a plan never has more than `debtors + creditors - 1` transfers.
pub struct SettlementPlanner {
    tolerance: Tolerance,
}

struct Position<'a> {
    member: &'a MemberId,
    remaining: Money,
}

impl SettlementPlanner {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Computes the ordered transfer list that zeroes `balances`.
    ///
    /// Members within tolerance of zero are treated as settled. Debtors and
    /// creditors are ordered by descending amount; equal amounts keep the
    /// map's insertion order.
    pub fn compute_transfers(
        &self,
        balances: &MemberBalances,
    ) -> Result<Vec<TransferInstruction>, SettlementInvariantViolation> {
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();
        for (member, &balance) in balances {
            if self.tolerance.is_settled(balance) {
                continue;
            }
            let position = Position {
                member,
                remaining: balance.abs(),
            };
            if balance.is_negative() {
                debtors.push(position);
            } else {
                creditors.push(position);
            }
        }

        // `sort_by` is stable, which keeps ties in insertion order.
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];
            let amount = debtor.remaining.min(creditor.remaining);

            if self.tolerance.exceeds(amount) {
                transfers.push(TransferInstruction {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                });
            }

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if self.tolerance.is_settled(debtor.remaining) {
                i += 1;
            }
            if self.tolerance.is_settled(creditor.remaining) {
                j += 1;
            }
        }

        let residual = debtors[i..]
            .iter()
            .map(|position| (position.member, -position.remaining))
            .chain(
                creditors[j..]
                    .iter()
                    .map(|position| (position.member, position.remaining)),
            )
            .find(|(_, residual)| self.tolerance.exceeds(*residual));
        if let Some((member, residual)) = residual {
            tracing::error!(
                member = %member,
                residual = %residual,
                epsilon = %self.tolerance.epsilon(),
                debtor_count = debtors.len(),
                creditor_count = creditors.len(),
                "Settlement planning left an unsettled residual"
            );
            return Err(SettlementInvariantViolation {
                member: member.clone(),
                residual,
            });
        }

        tracing::debug!(
            member_count = balances.len(),
            debtor_count = debtors.len(),
            creditor_count = creditors.len(),
            transfer_count = transfers.len(),
            "Settlement plan computed"
        );
        Ok(transfers)
    }

    pub fn plan(
        &self,
        balances: MemberBalances,
    ) -> Result<SettlementPlan, SettlementInvariantViolation> {
        let transfers = self.compute_transfers(&balances)?;
        Ok(SettlementPlan {
            balances,
            transfers,
        })
    }
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(Tolerance::DEFAULT)
    }
}

pub fn compute_transfers(
    balances: &MemberBalances,
) -> Result<Vec<TransferInstruction>, SettlementInvariantViolation> {
    SettlementPlanner::default().compute_transfers(balances)
}
