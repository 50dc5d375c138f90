//! Magnitude bucket table
//!
//! Buckets are half-open `[low, high)` ranges over the absolute return. A
//! valid table is contiguous and ends in an unbounded bucket, so every
//! magnitude at or above the first lower bound lands in exactly one bucket.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub low: f64,
    pub high: f64,
    pub label: String,
}

impl Bucket {
    pub fn new(low: f64, high: f64, label: impl Into<String>) -> Self {
        Self {
            low,
            high,
            label: label.into(),
        }
    }

    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.low && magnitude < self.high
    }

    pub fn is_unbounded(&self) -> bool {
        self.high == f64::INFINITY
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BucketTableError {
    Empty,
    InvalidRange { label: String },
    Gap { after: String, before: String },
    Bounded { label: String },
}

impl fmt::Display for BucketTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketTableError::Empty => write!(f, "Bucket table is empty"),
            BucketTableError::InvalidRange { label } => {
                write!(f, "Bucket '{}' must satisfy 0 <= low < high", label)
            }
            BucketTableError::Gap { after, before } => write!(
                f,
                "Buckets '{}' and '{}' are not contiguous",
                after, before
            ),
            BucketTableError::Bounded { label } => {
                write!(f, "Last bucket '{}' must have an unbounded upper edge", label)
            }
        }
    }
}

impl std::error::Error for BucketTableError {}

/// Ordered, validated list of buckets
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTable {
    buckets: Vec<Bucket>,
}

impl BucketTable {
    pub fn new(buckets: Vec<Bucket>) -> Result<Self, BucketTableError> {
        let last = buckets.last().ok_or(BucketTableError::Empty)?;
        if !last.is_unbounded() {
            return Err(BucketTableError::Bounded {
                label: last.label.clone(),
            });
        }

        for bucket in &buckets {
            if !(bucket.low >= 0.0 && bucket.low < bucket.high) {
                return Err(BucketTableError::InvalidRange {
                    label: bucket.label.clone(),
                });
            }
        }

        for pair in buckets.windows(2) {
            if pair[0].high != pair[1].low {
                return Err(BucketTableError::Gap {
                    after: pair[0].label.clone(),
                    before: pair[1].label.clone(),
                });
            }
        }

        Ok(Self { buckets })
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Smallest magnitude covered by the table
    pub fn lower_bound(&self) -> f64 {
        self.buckets.first().map(|b| b.low).unwrap_or(0.0)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    /// Index of the bucket containing `magnitude`, if any
    pub fn classify(&self, magnitude: f64) -> Option<usize> {
        if magnitude.is_nan() || magnitude < self.lower_bound() {
            return None;
        }
        // First bucket whose upper edge lies above the magnitude
        let idx = self.buckets.partition_point(|b| b.high <= magnitude);
        (idx < self.buckets.len()).then_some(idx)
    }
}

impl Default for BucketTable {
    fn default() -> Self {
        Self {
            buckets: vec![
                Bucket::new(0.005, 0.006, "0.5%–0.6%"),
                Bucket::new(0.006, 0.007, "0.6%–0.7%"),
                Bucket::new(0.007, 0.008, "0.7%–0.8%"),
                Bucket::new(0.008, 0.009, "0.8%–0.9%"),
                Bucket::new(0.009, 0.010, "0.9%–1.0%"),
                Bucket::new(0.010, 0.015, "1.0%–1.5%"),
                Bucket::new(0.015, 0.020, "1.5%–2.0%"),
                Bucket::new(0.020, f64::INFINITY, ">2.0%"),
            ],
        }
    }
}
