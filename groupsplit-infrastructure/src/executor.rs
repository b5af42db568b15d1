use groupsplit_application::{ExecutionError, TransferExecutor, TransferReceipt};
use groupsplit_domain::TransferInstruction;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lamports per SOL.
pub const LAMPORT_SCALE: u32 = 9;

/// Executor that only logs what would be submitted.
///
/// Amounts are converted to atomic units first so that an amount a wallet
/// could not represent fails here as well.
pub struct DryRunTransferExecutor {
    atomic_scale: u32,
    submitted: AtomicU64,
}

impl DryRunTransferExecutor {
    pub fn new(atomic_scale: u32) -> Self {
        Self {
            atomic_scale,
            submitted: AtomicU64::new(0),
        }
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }
}

impl Default for DryRunTransferExecutor {
    fn default() -> Self {
        Self::new(LAMPORT_SCALE)
    }
}

impl TransferExecutor for DryRunTransferExecutor {
    fn execute(&self, transfer: &TransferInstruction) -> Result<TransferReceipt, ExecutionError> {
        let units = transfer.amount.to_atomic_units(self.atomic_scale)?;
        if units <= 0 {
            return Err(ExecutionError::Rejected(format!(
                "amount {} rounds to {units} atomic units",
                transfer.amount
            )));
        }

        let sequence = self.submitted.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            from = %transfer.from,
            to = %transfer.to,
            atomic_units = units,
            atomic_scale = self.atomic_scale,
            "Dry run transfer"
        );
        Ok(TransferReceipt {
            reference: format!("dry-run-{sequence}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupsplit_domain::{AtomicUnitConversionError, MemberId, Money};
    use rstest::rstest;

    fn transfer(amount: Money) -> TransferInstruction {
        TransferInstruction {
            from: MemberId::new("A"),
            to: MemberId::new("B"),
            amount,
        }
    }

    #[test]
    fn numbers_receipts() {
        let executor = DryRunTransferExecutor::default();

        let first = executor.execute(&transfer(Money::from_i64(1))).unwrap();
        let second = executor.execute(&transfer(Money::new(5, 1))).unwrap();

        assert_eq!(first.reference, "dry-run-1");
        assert_eq!(second.reference, "dry-run-2");
        assert_eq!(executor.submitted(), 2);
    }

    #[rstest]
    #[case::below_one_unit(0, Money::new(4, 1))]
    #[case::below_one_lamport(9, Money::new(4, 10))]
    fn rejects_amounts_rounding_to_zero(#[case] scale: u32, #[case] amount: Money) {
        let executor = DryRunTransferExecutor::new(scale);

        assert!(matches!(
            executor.execute(&transfer(amount)),
            Err(ExecutionError::Rejected(_))
        ));
        assert_eq!(executor.submitted(), 0);
    }

    #[test]
    fn surfaces_conversion_errors() {
        let executor = DryRunTransferExecutor::new(30);

        assert_eq!(
            executor.execute(&transfer(Money::from_i64(1))),
            Err(ExecutionError::Conversion(
                AtomicUnitConversionError::UnsupportedScale {
                    scale: 30,
                    max_supported: 18,
                }
            ))
        );
    }
}
