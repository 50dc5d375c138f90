//! Pump/dump histogram over the bucket table

use super::bucket::BucketTable;
use super::detector::{Direction, Event};
use serde::{Deserialize, Serialize};

/// One histogram row, in bucket table order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: String,
    pub pumps: usize,
    pub dumps: usize,
}

impl BucketCount {
    pub fn total(&self) -> usize {
        self.pumps + self.dumps
    }
}

pub struct BucketAggregator<'a> {
    table: &'a BucketTable,
}

impl<'a> BucketAggregator<'a> {
    pub fn new(table: &'a BucketTable) -> Self {
        Self { table }
    }

    /// Count events per bucket and direction
    ///
    /// Every bucket gets a row, zero rows included, so tables from different
    /// runs line up positionally. Classification uses the absolute return for
    /// both directions.
    pub fn aggregate(&self, events: &[Event]) -> Vec<BucketCount> {
        let mut rows: Vec<BucketCount> = self
            .table
            .buckets()
            .iter()
            .map(|b| BucketCount {
                bucket: b.label.clone(),
                pumps: 0,
                dumps: 0,
            })
            .collect();

        let mut unclassified = 0usize;
        for event in events {
            let Some(idx) = self.table.classify(event.magnitude()) else {
                unclassified += 1;
                continue;
            };
            match event.direction() {
                Some(Direction::Pump) => rows[idx].pumps += 1,
                Some(Direction::Dump) => rows[idx].dumps += 1,
                None => unclassified += 1,
            }
        }

        if unclassified > 0 {
            log::warn!(
                "{} events fell outside the bucket table (lower bound {})",
                unclassified,
                self.table.lower_bound()
            );
        }

        rows
    }
}
