use crate::model::{MemberBalances, MemberId, Money, Tolerance, TransferInstruction};
use fxhash::FxHashSet;

/// A settlement left a member with a residual beyond tolerance.
///
/// Balances produced by the balance calculator never trigger this; it means
/// the planner was fed a map that does not sum to zero.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Settlement left member '{member}' with an unsettled residual of {residual}")]
pub struct SettlementInvariantViolation {
    pub member: MemberId,
    /// Signed like a balance: negative means the member still owes.
    pub residual: Money,
}

/// Why a plan was refused before execution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanVerificationError {
    #[error("Transfer {from} -> {to} of {amount} is malformed")]
    MalformedTransfer {
        from: MemberId,
        to: MemberId,
        amount: Money,
    },
    #[error(transparent)]
    Unsettled(#[from] SettlementInvariantViolation),
}

pub fn balance_sum(balances: &MemberBalances) -> Money {
    balances.values().sum()
}

/// Returns the balances left after every transfer has been paid: the payer's
/// debt shrinks and the payee's credit shrinks by the transferred amount.
pub fn apply_transfers<'a, I>(balances: &MemberBalances, transfers: I) -> MemberBalances
where
    I: IntoIterator<Item = &'a TransferInstruction>,
{
    let mut remaining = balances.clone();
    for transfer in transfers {
        *remaining.entry(transfer.from.clone()).or_insert(Money::ZERO) += transfer.amount;
        *remaining.entry(transfer.to.clone()).or_insert(Money::ZERO) -= transfer.amount;
    }
    remaining
}

/// Members whose balance is beyond tolerance, in map order.
pub fn unsettled_members(
    balances: &MemberBalances,
    tolerance: Tolerance,
) -> impl Iterator<Item = (&MemberId, Money)> + '_ {
    balances
        .iter()
        .filter(move |(_, balance)| tolerance.exceeds(**balance))
        .map(|(member, balance)| (member, *balance))
}

/// Checks that a plan is well formed and zeroes every balance.
pub fn verify_plan(
    balances: &MemberBalances,
    transfers: &[TransferInstruction],
    tolerance: Tolerance,
) -> Result<(), PlanVerificationError> {
    let mut involved = FxHashSet::default();
    for (index, transfer) in transfers.iter().enumerate() {
        if transfer.from == transfer.to || tolerance.is_settled(transfer.amount) {
            tracing::error!(
                index,
                from = %transfer.from,
                to = %transfer.to,
                amount = %transfer.amount,
                epsilon = %tolerance.epsilon(),
                "Settlement plan contains a malformed transfer"
            );
            return Err(PlanVerificationError::MalformedTransfer {
                from: transfer.from.clone(),
                to: transfer.to.clone(),
                amount: transfer.amount,
            });
        }
        involved.insert(&transfer.from);
        involved.insert(&transfer.to);
    }

    let remaining = apply_transfers(balances, transfers);
    if let Some((member, residual)) = unsettled_members(&remaining, tolerance).next() {
        tracing::error!(
            member = %member,
            residual = %residual,
            involved_members = involved.len(),
            transfer_count = transfers.len(),
            "Settlement plan does not zero all balances"
        );
        return Err(SettlementInvariantViolation {
            member: member.clone(),
            residual,
        }
        .into());
    }
    Ok(())
}
