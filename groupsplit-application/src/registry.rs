use crate::{error::ApplicationError, model::GroupId};
use dashmap::DashMap;
use fxhash::FxBuildHasher;
use groupsplit_domain::{
    BalanceCalculator, ExpenseLedger, LedgerError, MemberBalances, SettlementPlan,
    SettlementPlanner, Tolerance,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ledgers of many groups shared between threads.
///
/// Mutations of one group are serialized by the map entry's lock. Queries
/// clone the ledger and compute outside the lock.
pub struct GroupRegistry {
    ledgers: DashMap<GroupId, ExpenseLedger, FxBuildHasher>,
    next_id: AtomicU64,
    calculator: BalanceCalculator,
    planner: SettlementPlanner,
}

impl GroupRegistry {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            ledgers: DashMap::with_hasher(FxBuildHasher::default()),
            next_id: AtomicU64::new(1),
            calculator: BalanceCalculator::new(tolerance),
            planner: SettlementPlanner::new(tolerance),
        }
    }

    pub fn create_group(&self, name: Option<&str>) -> GroupId {
        let id = GroupId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ledger = match name {
            Some(name) => ExpenseLedger::named(name),
            None => ExpenseLedger::new(),
        };
        self.ledgers.insert(id, ledger);
        tracing::debug!(group = %id, "Group created");
        id
    }

    pub fn remove_group(&self, id: GroupId) -> Result<ExpenseLedger, ApplicationError> {
        self.ledgers
            .remove(&id)
            .map(|(_, ledger)| ledger)
            .ok_or(ApplicationError::UnknownGroup(id))
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.ledgers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Runs one mutation under the group's lock.
    ///
    /// The mutation works on a copy that replaces the stored ledger only when
    /// it returns `Ok`, so a multi-step mutation never commits halfway.
    pub fn update<T, F>(&self, id: GroupId, mutation: F) -> Result<T, ApplicationError>
    where
        F: FnOnce(&mut ExpenseLedger) -> Result<T, LedgerError>,
    {
        let mut entry = self
            .ledgers
            .get_mut(&id)
            .ok_or(ApplicationError::UnknownGroup(id))?;
        let mut working = entry.value().clone();
        let value = mutation(&mut working)?;
        *entry.value_mut() = working;
        Ok(value)
    }

    pub fn snapshot(&self, id: GroupId) -> Result<ExpenseLedger, ApplicationError> {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.value().clone())
            .ok_or(ApplicationError::UnknownGroup(id))
    }

    pub fn balances(&self, id: GroupId) -> Result<MemberBalances, ApplicationError> {
        let ledger = self.snapshot(id)?;
        Ok(self.calculator.calculate(&ledger))
    }

    pub fn plan(&self, id: GroupId) -> Result<SettlementPlan, ApplicationError> {
        let balances = self.balances(id)?;
        Ok(self.planner.plan(balances)?)
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new(Tolerance::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupsplit_domain::{MemberId, Money};
    use std::thread;

    #[test]
    fn unknown_group_is_reported() {
        let registry = GroupRegistry::default();

        assert_eq!(
            registry.plan(GroupId(99)),
            Err(ApplicationError::UnknownGroup(GroupId(99)))
        );
        assert_eq!(
            registry.update(GroupId(99), |ledger| ledger.add_member("A")),
            Err(ApplicationError::UnknownGroup(GroupId(99)))
        );
    }

    #[test]
    fn ledger_errors_pass_through() {
        let registry = GroupRegistry::default();
        let group = registry.create_group(Some("Dinner"));
        registry.update(group, |ledger| ledger.add_member("A")).unwrap();

        assert_eq!(
            registry.update(group, |ledger| ledger.add_member("A")),
            Err(ApplicationError::Ledger(LedgerError::DuplicateMember(
                MemberId::new("A")
            )))
        );
    }

    #[test]
    fn failed_multi_step_update_commits_nothing() {
        let registry = GroupRegistry::default();
        let group = registry.create_group(Some("Dinner"));

        let result = registry.update(group, |ledger| {
            ledger.add_member("A")?;
            ledger.add_expense("A", Money::from_i64(10), "taxi")?;
            ledger.add_expense("Z", Money::from_i64(5), "ghost")
        });

        assert_eq!(
            result,
            Err(ApplicationError::Ledger(LedgerError::UnknownMember(
                MemberId::new("Z")
            )))
        );
        let ledger = registry.snapshot(group).unwrap();
        assert_eq!(ledger, ExpenseLedger::named("Dinner"));
        assert_eq!(ledger.member_count(), 0);
    }

    #[test]
    fn groups_are_isolated() {
        let registry = GroupRegistry::default();
        let dinner = registry.create_group(Some("Dinner"));
        let trip = registry.create_group(None);

        registry
            .update(dinner, |ledger| {
                ledger.add_member("A")?;
                ledger.add_member("B")?;
                ledger.add_expense("A", Money::from_i64(100), "dinner")
            })
            .unwrap();

        let plan = registry.plan(dinner).unwrap();
        assert_eq!(plan.transfers.len(), 1);
        assert_eq!(plan.transfers[0].amount, Money::from_i64(50));
        assert!(registry.plan(trip).unwrap().transfers.is_empty());
        assert_eq!(registry.snapshot(dinner).unwrap().name(), Some("Dinner"));

        registry.remove_group(trip).unwrap();
        assert!(!registry.contains(trip));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let registry = GroupRegistry::default();
        let group = registry.create_group(None);
        let names = ["A", "B", "C", "D"];
        for name in names {
            registry.update(group, |ledger| ledger.add_member(name)).unwrap();
        }

        thread::scope(|scope| {
            for name in names {
                let registry = &registry;
                scope.spawn(move || {
                    for _ in 0..50 {
                        registry
                            .update(group, |ledger| {
                                ledger.add_expense(name, Money::from_i64(1), "round")
                            })
                            .unwrap();
                    }
                });
            }
        });

        let ledger = registry.snapshot(group).unwrap();
        assert_eq!(ledger.expenses().len(), 200);
        assert_eq!(ledger.total_amount(), Money::from_i64(200));
        assert!(registry.plan(group).unwrap().transfers.is_empty());
    }
}
