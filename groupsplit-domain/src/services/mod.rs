pub mod balance_calculator;
pub mod invariants;
pub mod settlement_planner;

pub use balance_calculator::{BalanceCalculator, compute_balances, per_person_share};
pub use invariants::{
    PlanVerificationError, SettlementInvariantViolation, apply_transfers, balance_sum,
    unsettled_members, verify_plan,
};
pub use settlement_planner::{SettlementPlanner, compute_transfers};
