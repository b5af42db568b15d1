use crate::{
    ledger::ExpenseLedger,
    model::{MemberBalances, Money, Tolerance},
    services::invariants::balance_sum,
};

/// Equal-split balance calculation
pub struct BalanceCalculator {
    tolerance: Tolerance,
}

impl BalanceCalculator {
    pub fn new(tolerance: Tolerance) -> Self {
        Self { tolerance }
    }

    /// Computes `paid - total / member_count` for every member in roster order.
    ///
    /// An empty roster yields an empty map.
    pub fn calculate(&self, ledger: &ExpenseLedger) -> MemberBalances {
        let Some(share) = ledger.total_amount().split_evenly(ledger.member_count()) else {
            return MemberBalances::new();
        };

        let mut balances: MemberBalances = ledger
            .members()
            .map(|member| (member.clone(), Money::ZERO))
            .collect();
        for expense in ledger.expenses() {
            if let Some(paid) = balances.get_mut(expense.payer()) {
                *paid += expense.amount();
            }
        }
        for balance in balances.values_mut() {
            *balance -= share;
        }

        let sum = balance_sum(&balances);
        if self.tolerance.exceeds(sum) {
            tracing::warn!(
                sum = %sum,
                epsilon = %self.tolerance.epsilon(),
                member_count = balances.len(),
                "Computed balances do not sum to zero"
            );
        }

        balances
    }
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(Tolerance::DEFAULT)
    }
}

pub fn compute_balances(ledger: &ExpenseLedger) -> MemberBalances {
    BalanceCalculator::default().calculate(ledger)
}

/// Share owed by each member, or `None` for an empty roster.
pub fn per_person_share(ledger: &ExpenseLedger) -> Option<Money> {
    ledger.total_amount().split_evenly(ledger.member_count())
}
