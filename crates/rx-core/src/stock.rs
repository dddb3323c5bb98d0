//! # Stock Rules
//!
//! The two decisions every stock mutation and every dashboard read depends
//! on: whether a sale may drive stock below zero, and which bucket a stock
//! level falls into.
//!
//! ## Bucket Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity_available                                                     │
//! │                                                                         │
//! │   ... -1  0 │ 1 ... 9 │ 10 ... 49 │ 50 ...                              │
//! │  ───────────┼─────────┼───────────┼──────────                           │
//! │  Out of     │  Low    │  Medium   │  Well                               │
//! │  Stock      │  Stock  │  Stock    │  Stocked                            │
//! │                                                                         │
//! │  Every integer lands in exactly one bucket, so bucket counts always    │
//! │  add up to the number of stock rows.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::{LOW_STOCK_THRESHOLD, MEDIUM_STOCK_THRESHOLD};

// =============================================================================
// Stock Policy
// =============================================================================

/// What happens when a sale asks for more than is available.
///
/// ## Policies
/// ```text
/// REJECT (default)
/// ────────────────
/// • Conditional decrement: only applied if available >= requested
/// • Failure aborts the whole sale with InsufficientStock
/// • quantity_available never goes below zero
///
/// ALLOW_NEGATIVE
/// ──────────────
/// • Unconditional decrement, stock may go negative
/// • Matches counters that record sales before the delivery is booked
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    #[default]
    Reject,
    AllowNegative,
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockPolicy::Reject => write!(f, "reject"),
            StockPolicy::AllowNegative => write!(f, "allow_negative"),
        }
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "strict" => Ok(StockPolicy::Reject),
            "allow_negative" | "allow-negative" | "oversell" => Ok(StockPolicy::AllowNegative),
            _ => Err(ValidationError::NotAllowed {
                field: "stock policy".to_string(),
                allowed: vec!["reject".to_string(), "allow_negative".to_string()],
            }),
        }
    }
}

// =============================================================================
// Stock Buckets
// =============================================================================

/// Dashboard stock distribution bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockBucket {
    OutOfStock,
    LowStock,
    MediumStock,
    WellStocked,
}

impl StockBucket {
    /// All buckets in display order.
    pub const ALL: [StockBucket; 4] = [
        StockBucket::OutOfStock,
        StockBucket::LowStock,
        StockBucket::MediumStock,
        StockBucket::WellStocked,
    ];

    /// Classifies a stock quantity.
    ///
    /// Negative balances (only reachable under
    /// [`StockPolicy::AllowNegative`]) count as out of stock.
    pub fn classify(quantity: i64) -> Self {
        if quantity <= 0 {
            StockBucket::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            StockBucket::LowStock
        } else if quantity < MEDIUM_STOCK_THRESHOLD {
            StockBucket::MediumStock
        } else {
            StockBucket::WellStocked
        }
    }

    /// Label shown on the dashboard chart.
    pub fn label(&self) -> &'static str {
        match self {
            StockBucket::OutOfStock => "Out of Stock",
            StockBucket::LowStock => "Low Stock",
            StockBucket::MediumStock => "Medium Stock",
            StockBucket::WellStocked => "Well Stocked",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("reject".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert_eq!(
            "ALLOW_NEGATIVE".parse::<StockPolicy>().unwrap(),
            StockPolicy::AllowNegative
        );
        assert!("sometimes".parse::<StockPolicy>().is_err());
        assert_eq!(StockPolicy::AllowNegative.to_string(), "allow_negative");
        assert_eq!(StockPolicy::default(), StockPolicy::Reject);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(StockBucket::classify(-5), StockBucket::OutOfStock);
        assert_eq!(StockBucket::classify(0), StockBucket::OutOfStock);
        assert_eq!(StockBucket::classify(1), StockBucket::LowStock);
        assert_eq!(StockBucket::classify(9), StockBucket::LowStock);
        assert_eq!(StockBucket::classify(10), StockBucket::MediumStock);
        assert_eq!(StockBucket::classify(49), StockBucket::MediumStock);
        assert_eq!(StockBucket::classify(50), StockBucket::WellStocked);
    }

    #[test]
    fn test_buckets_partition_a_range() {
        let mut counts = [0usize; 4];
        for q in -20..200 {
            let bucket = StockBucket::classify(q);
            let idx = StockBucket::ALL.iter().position(|b| *b == bucket).unwrap();
            counts[idx] += 1;
        }
        assert_eq!(counts.iter().sum::<usize>(), 220);
        assert_eq!(counts, [21, 9, 40, 150]);
    }
}
