use arcstr::ArcStr;
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use std::{
    borrow::Borrow,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

/// Opaque member identifier (wallet address or display name).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(ArcStr);

impl MemberId {
    pub fn new(id: &str) -> Self {
        Self(ArcStr::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(ArcStr::from(value))
    }
}

/// Creation-order identifier of an expense within one ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Largest scale accepted when converting to integer atomic units.
pub const MAX_ATOMIC_SCALE: u32 = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AtomicUnitConversionError {
    #[error("Unsupported atomic unit scale {scale} (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
    #[error("Amount does not fit into atomic units")]
    OutOfRange,
}

/// Fixed-point amount in reference units (e.g. SOL).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// `num * 10^-scale`, e.g. `Money::new(1250, 2)` is 12.50.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn signum(self) -> i64 {
        if self.0.is_zero() {
            0
        } else if self.0.is_sign_negative() {
            -1
        } else {
            1
        }
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Splits the amount into `parts` equal shares. `None` when `parts` is zero.
    pub fn split_evenly(self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(parts)).map(Self)
    }

    /// Rounds half away from zero to `dp` decimal places.
    pub fn round_dp(self, dp: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Converts to integer atomic units (`scale` = 9 gives lamports for SOL),
    /// rounding half away from zero.
    pub fn to_atomic_units(self, scale: u32) -> Result<i64, AtomicUnitConversionError> {
        if scale > MAX_ATOMIC_SCALE {
            return Err(AtomicUnitConversionError::UnsupportedScale {
                scale,
                max_supported: MAX_ATOMIC_SCALE,
            });
        }
        let factor = Decimal::from_i128_with_scale(10_i128.pow(scale), 0);
        let units = self
            .0
            .checked_mul(factor)
            .ok_or(AtomicUnitConversionError::OutOfRange)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        units.to_i64().ok_or(AtomicUnitConversionError::OutOfRange)
    }

    pub fn from_atomic_units(units: i64, scale: u32) -> Result<Self, AtomicUnitConversionError> {
        if scale > MAX_ATOMIC_SCALE {
            return Err(AtomicUnitConversionError::UnsupportedScale {
                scale,
                max_supported: MAX_ATOMIC_SCALE,
            });
        }
        Decimal::try_new(units, scale)
            .map(Self)
            .map_err(|_| AtomicUnitConversionError::OutOfRange)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return f.write_str("0");
        }
        write!(f, "{}", self.0.normalize())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Numeric slack below which a balance or remainder counts as settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tolerance(Money);

impl Tolerance {
    /// 0.001 reference units.
    pub const DEFAULT: Self = Self(Money(Decimal::from_parts(1, 0, 0, false, 3)));

    /// Smallest accepted epsilon. Exact shares such as 100 / 3 leave a drift
    /// near 1e-26 in the balance sum, so a tighter epsilon cannot hold.
    pub const MIN_EPSILON: Money = Money(Decimal::from_parts(1, 0, 0, false, 18));

    /// Returns `None` for an epsilon below [`Self::MIN_EPSILON`].
    pub fn new(epsilon: Money) -> Option<Self> {
        if epsilon < Self::MIN_EPSILON {
            None
        } else {
            Some(Self(epsilon))
        }
    }

    pub fn epsilon(self) -> Money {
        self.0
    }

    pub fn is_settled(self, amount: Money) -> bool {
        amount.abs() <= self.0
    }

    pub fn exceeds(self, amount: Money) -> bool {
        !self.is_settled(amount)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A single recorded expense. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseEvent {
    id: ExpenseId,
    payer: MemberId,
    amount: Money,
    description: String,
}

impl ExpenseEvent {
    pub(crate) fn new(id: ExpenseId, payer: MemberId, amount: Money, description: String) -> Self {
        Self {
            id,
            payer,
            amount,
            description,
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Net balance per member in roster order
/// (positive: is owed money, negative: owes money).
pub type MemberBalances = IndexMap<MemberId, Money>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferInstruction {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

impl fmt::Display for TransferInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementPlan {
    pub balances: MemberBalances,
    pub transfers: Vec<TransferInstruction>,
}

impl SettlementPlan {
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn total_transferred(&self) -> Money {
        self.transfers.iter().map(|transfer| transfer.amount).sum()
    }
}
