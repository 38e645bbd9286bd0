//! Single-consumer reduction: drain result channels in discovery order, group
//! records by key, then rank the groups.

use crate::progress::JobProgress;
use crate::record::Record;
use ahash::AHashMap;
use crossbeam_channel::Receiver;
use serde::Serialize;

/// All records for one group key, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: String,
    pub count: usize,
    pub records: Vec<Record>,
    #[serde(skip)]
    max_population: u64,
}

impl Group {
    fn new(key: String) -> Self {
        Self { key, count: 0, records: Vec::new(), max_population: 0 }
    }

    fn push(&mut self, rec: Record) {
        self.max_population = self.max_population.max(rec.population);
        self.records.push(rec);
        self.count = self.records.len();
    }

    pub fn max_population(&self) -> u64 {
        self.max_population
    }
}

/// Group key -> records. Groups are stored in first-seen order, which is also
/// the final tie-break when ranking.
#[derive(Debug, Default)]
pub struct GroupAggregate {
    index: AHashMap<String, usize>,
    groups: Vec<Group>,
    records: u64,
    jobs: u64,
}

impl GroupAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rec: Record) {
        let idx = match self.index.get(rec.group.as_str()) {
            Some(&i) => i,
            None => {
                let i = self.groups.len();
                self.index.insert(rec.group.clone(), i);
                self.groups.push(Group::new(rec.group.clone()));
                i
            }
        };
        self.groups[idx].push(rec);
        self.records += 1;
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> u64 {
        self.records
    }

    /// Result channels fully drained so far.
    pub fn jobs_drained(&self) -> u64 {
        self.jobs
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rank by record count (desc), then max population (desc). The sort is
    /// stable, so groups still tied keep first-seen order.
    pub fn rank(self) -> Vec<Group> {
        let mut groups = self.groups;
        groups.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.max_population.cmp(&a.max_population))
        });
        groups
    }
}

/// Drain every result channel in the order the handles arrive. Each channel is
/// read to completion (its worker dropped the sender) before the next handle is
/// taken. Returns once the handle queue is closed and empty.
pub fn reduce(handles: Receiver<Receiver<Record>>, progress: &JobProgress) -> GroupAggregate {
    let mut agg = GroupAggregate::new();
    for results in handles.iter() {
        for rec in results.iter() {
            agg.insert(rec);
        }
        agg.jobs += 1;
        progress.job_drained();
    }
    tracing::info!(jobs = agg.jobs, groups = agg.group_count(), records = agg.record_count(), "reduce complete");
    agg
}
