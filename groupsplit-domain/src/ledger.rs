use crate::model::{ExpenseEvent, ExpenseId, MemberId, Money};
use indexmap::IndexSet;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Member '{0}' is already part of the group")]
    DuplicateMember(MemberId),
    #[error("Member '{0}' is not part of the group")]
    UnknownMember(MemberId),
    #[error("Expense {0} does not exist")]
    UnknownExpense(ExpenseId),
    #[error("Expense amount must not be negative (got {0})")]
    InvalidAmount(Money),
    #[error("Member identifier must not be blank")]
    BlankMember,
    #[error("Expense of {0} would overflow the group total")]
    AmountOverflow(Money),
}

/// Figures shown above a group's expense list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSummary {
    pub name: Option<String>,
    pub member_count: usize,
    pub expense_count: usize,
    pub total_amount: Money,
    /// `None` while the roster is empty.
    pub per_person_share: Option<Money>,
}

/// Members and expense events of one settlement group.
///
/// Every mutation either succeeds completely or returns an error and leaves
/// the ledger untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    name: Option<String>,
    members: IndexSet<MemberId>,
    expenses: Vec<ExpenseEvent>,
    next_expense_id: u64,
    total: Money,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn add_member(&mut self, id: &str) -> Result<MemberId, LedgerError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::BlankMember);
        }
        let member = MemberId::new(trimmed);
        if self.members.contains(&member) {
            return Err(LedgerError::DuplicateMember(member));
        }
        self.members.insert(member.clone());
        Ok(member)
    }

    /// Removes the member together with every expense they paid.
    /// Returns the cascaded expenses in insertion order.
    pub fn remove_member(&mut self, id: &str) -> Result<Vec<ExpenseEvent>, LedgerError> {
        let Some(member) = self.members.shift_take(id.trim()) else {
            return Err(LedgerError::UnknownMember(MemberId::new(id.trim())));
        };

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.expenses)
            .into_iter()
            .partition(|expense| expense.payer() == &member);
        self.expenses = kept;
        self.total -= removed.iter().map(ExpenseEvent::amount).sum::<Money>();

        tracing::debug!(
            member = %member,
            cascaded_expenses = removed.len(),
            "Removed member from ledger"
        );
        Ok(removed)
    }

    pub fn add_expense(
        &mut self,
        payer: &str,
        amount: Money,
        description: impl Into<String>,
    ) -> Result<ExpenseId, LedgerError> {
        let Some(payer) = self.members.get(payer.trim()).cloned() else {
            return Err(LedgerError::UnknownMember(MemberId::new(payer.trim())));
        };
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        let Some(total) = self.total.checked_add(amount) else {
            return Err(LedgerError::AmountOverflow(amount));
        };

        let id = ExpenseId(self.next_expense_id);
        self.next_expense_id += 1;
        self.total = total;
        self.expenses
            .push(ExpenseEvent::new(id, payer, amount, description.into()));
        Ok(id)
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<ExpenseEvent, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id() == id)
            .ok_or(LedgerError::UnknownExpense(id))?;
        let expense = self.expenses.remove(index);
        self.total -= expense.amount();
        Ok(expense)
    }

    /// Sum of all expense amounts. Kept below `Decimal::MAX` by `add_expense`.
    pub fn total_amount(&self) -> Money {
        self.total
    }

    pub fn paid_by(&self, member: &MemberId) -> Money {
        self.expenses
            .iter()
            .filter(|expense| expense.payer() == member)
            .map(ExpenseEvent::amount)
            .sum()
    }

    pub fn members(&self) -> impl ExactSizeIterator<Item = &MemberId> + '_ {
        self.members.iter()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains_member(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn expenses(&self) -> &[ExpenseEvent] {
        &self.expenses
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&ExpenseEvent> {
        self.expenses.iter().find(|expense| expense.id() == id)
    }

    pub fn summary(&self) -> GroupSummary {
        let total_amount = self.total_amount();
        GroupSummary {
            name: self.name.clone(),
            member_count: self.members.len(),
            expense_count: self.expenses.len(),
            total_amount,
            per_person_share: total_amount.split_evenly(self.members.len()),
        }
    }
}
