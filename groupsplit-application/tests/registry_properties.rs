use groupsplit_application::GroupRegistry;
use groupsplit_domain::{
    ExpenseId, Money, Tolerance,
    services::{apply_transfers, balance_sum, unsettled_members},
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["alice", "bob", "carol", "dave", "erin", "frank"];

#[derive(Debug, Clone)]
enum Op {
    Expense { payer: usize, cents: i64 },
    RemoveMember(usize),
    RemoveExpense(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0usize..6, 0i64..=500_000).prop_map(|(payer, cents)| Op::Expense { payer, cents }),
        1 => (0usize..6).prop_map(Op::RemoveMember),
        1 => (0u64..20).prop_map(Op::RemoveExpense),
    ]
}

proptest! {
    #[test]
    fn plans_settle_after_arbitrary_edits(ops in prop::collection::vec(op(), 0..=40)) {
        let registry = GroupRegistry::default();
        let group = registry.create_group(Some("props"));
        for name in NAMES {
            registry.update(group, |ledger| ledger.add_member(name)).unwrap();
        }

        for op in ops {
            let before = registry.snapshot(group).unwrap();
            let result = match op {
                Op::Expense { payer, cents } => registry
                    .update(group, |ledger| {
                        ledger.add_expense(NAMES[payer], Money::new(cents, 2), "item")
                    })
                    .map(drop),
                Op::RemoveMember(idx) => registry
                    .update(group, |ledger| ledger.remove_member(NAMES[idx]))
                    .map(drop),
                Op::RemoveExpense(id) => registry
                    .update(group, |ledger| ledger.remove_expense(ExpenseId(id)))
                    .map(drop),
            };
            if result.is_err() {
                prop_assert_eq!(registry.snapshot(group).unwrap(), before);
            }
        }

        let balances = registry.balances(group).unwrap();
        prop_assert!(Tolerance::DEFAULT.is_settled(balance_sum(&balances)));

        let plan = registry.plan(group).unwrap();
        let remaining = apply_transfers(&plan.balances, &plan.transfers);
        prop_assert_eq!(unsettled_members(&remaining, Tolerance::DEFAULT).count(), 0);
    }
}
