use arcstr::ArcStr;
use hashbrown::HashMap;
use itertools::Itertools;
use serde::Serialize;

/// Running coordinate range of the features loaded for one contig.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContigStat {
    pub seq_id:    usize,
    pub name:      ArcStr,
    pub mincoord:  u32,
    pub maxcoord:  u32,
    pub fcount:    usize,
}

impl ContigStat {
    pub fn new(
        seq_id: usize,
        name: ArcStr,
    ) -> Self {
        Self {
            seq_id,
            name,
            mincoord: u32::MAX,
            maxcoord: 0,
            fcount: 0,
        }
    }

    pub fn extend(
        &mut self,
        start: u32,
        end: u32,
    ) {
        self.mincoord = self.mincoord.min(start);
        self.maxcoord = self.maxcoord.max(end);
    }
}

/// Per-contig statistics of one load session, keyed by contig name id.
#[derive(Debug, Clone, Default)]
pub struct SeqStats {
    stats: HashMap<usize, ContigStat>,
}

impl SeqStats {
    pub fn new() -> Self { Self::default() }

    /// Counts a newly created feature spanning `start..=end` on `seq_id`.
    pub fn register(
        &mut self,
        seq_id: usize,
        name: ArcStr,
        start: u32,
        end: u32,
    ) {
        let stat = self
            .stats
            .entry(seq_id)
            .or_insert_with(|| ContigStat::new(seq_id, name));
        stat.fcount += 1;
        stat.extend(start, end);
    }

    /// Widens the range of `seq_id` after a feature grew; unknown ids are
    /// ignored.
    pub fn extend(
        &mut self,
        seq_id: usize,
        start: u32,
        end: u32,
    ) {
        if let Some(stat) = self.stats.get_mut(&seq_id) {
            stat.extend(start, end);
        }
    }

    pub fn get(
        &self,
        seq_id: usize,
    ) -> Option<&ContigStat> {
        self.stats.get(&seq_id)
    }

    /// Statistics ordered by contig id, i.e. by first appearance.
    pub fn sorted(&self) -> Vec<&ContigStat> {
        self.stats
            .values()
            .sorted_by_key(|stat| stat.seq_id)
            .collect()
    }

    pub fn len(&self) -> usize { self.stats.len() }

    pub fn is_empty(&self) -> bool { self.stats.is_empty() }

    pub fn clear(&mut self) { self.stats.clear() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_range_and_count() {
        let mut stats = SeqStats::new();
        stats.register(0, "chr1".into(), 500, 900);
        stats.register(0, "chr1".into(), 100, 300);
        stats.extend(0, 90, 1200);
        stats.extend(5, 1, 2);
        let chr1 = stats.get(0).unwrap();
        assert_eq!((chr1.mincoord, chr1.maxcoord, chr1.fcount), (90, 1200, 2));
        assert_eq!(stats.len(), 1);
    }
}
