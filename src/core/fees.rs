//! Transfer fee policy
//!
//! A fee is withheld from the amount credited to the target of a transfer.
//! When fees are enabled the withheld amount is credited to a dedicated
//! fee-sink account so the total balance across all accounts is conserved.

use crate::types::{AccountId, TransactionType};
use rust_decimal::{Decimal, RoundingStrategy};

/// Default transfer fee rate (2%)
pub const DEFAULT_FEE_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Fee schedule applied at settlement
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeePolicy {
    /// No fees are charged
    #[default]
    None,

    /// A percentage of every transfer, credited to `sink`
    Percentage {
        /// Fraction of the amount, e.g. 0.02 for 2%
        rate: Decimal,
        /// Account that receives the fees
        sink: AccountId,
    },
}

impl FeePolicy {
    /// The standard 2% transfer fee credited to `sink`
    pub fn standard(sink: AccountId) -> Self {
        FeePolicy::Percentage {
            rate: DEFAULT_FEE_RATE,
            sink,
        }
    }

    /// Fee owed for a movement of `amount`
    ///
    /// Only transfers are charged. The fee is rounded to cents, midpoint away
    /// from zero, and never exceeds the amount itself.
    pub fn fee_for(&self, amount: Decimal, tx_type: TransactionType) -> Decimal {
        match (self, tx_type) {
            (FeePolicy::Percentage { rate, .. }, TransactionType::Transfer) => (amount * rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .min(amount),
            _ => Decimal::ZERO,
        }
    }

    pub fn sink(&self) -> Option<&AccountId> {
        match self {
            FeePolicy::None => None,
            FeePolicy::Percentage { sink, .. } => Some(sink),
        }
    }
}
