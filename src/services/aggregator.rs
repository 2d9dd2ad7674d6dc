//! 全局聚合 - 业务能力层
//!
//! 维护跨论文的去重 ID 集合，生成全局统计。

use std::collections::{BTreeMap, HashSet};

use crate::models::{GlobalStatistics, PaperAnalysisResult};

#[derive(Debug, Clone, Copy, Default)]
struct PaperCounts {
    total_statements: u64,
    resources: u64,
    literals: u64,
    predicates: u64,
}

/// 全局聚合器
///
/// 去重集合只增不减。单篇计数按论文 ID 记录，同一篇论文重复折叠时覆盖旧计数，
/// 因此总和不会因重复处理而翻倍。
#[derive(Debug, Default)]
pub struct GlobalAggregator {
    resource_ids: HashSet<String>,
    literal_ids: HashSet<String>,
    predicate_ids: HashSet<String>,
    papers: BTreeMap<String, PaperCounts>,
}

impl GlobalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用缓存结果初始化（续跑时使用）
    pub fn seeded<'a>(results: impl IntoIterator<Item = &'a PaperAnalysisResult>) -> Self {
        let mut aggregator = Self::new();
        for result in results {
            aggregator.fold(result);
        }
        aggregator
    }

    /// 合并一篇论文的结果
    pub fn fold(&mut self, result: &PaperAnalysisResult) {
        self.resource_ids.extend(result.resource_ids.iter().cloned());
        self.literal_ids.extend(result.literal_ids.iter().cloned());
        self.predicate_ids.extend(result.predicate_ids.iter().cloned());
        self.papers.insert(
            result.paper_id.clone(),
            PaperCounts {
                total_statements: result.total_statements,
                resources: result.resource_count,
                literals: result.literal_count,
                predicates: result.predicate_count,
            },
        );
    }

    /// 生成全局统计
    pub fn finalize(&self) -> GlobalStatistics {
        let mut stats = GlobalStatistics {
            global_distinct_resources: self.resource_ids.len() as u64,
            global_distinct_literals: self.literal_ids.len() as u64,
            global_distinct_predicates: self.predicate_ids.len() as u64,
            paper_count: self.papers.len() as u64,
            ..GlobalStatistics::default()
        };
        for counts in self.papers.values() {
            stats.total_statements += counts.total_statements;
            stats.total_resources += counts.resources;
            stats.total_literals += counts.literals;
            stats.total_predicates += counts.predicates;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(paper_id: &str, resources: &[&str], literals: &[&str], predicates: &[&str]) -> PaperAnalysisResult {
        let to_vec = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        PaperAnalysisResult {
            paper_id: paper_id.to_string(),
            total_statements: predicates.len() as u64,
            resource_count: resources.len() as u64,
            literal_count: literals.len() as u64,
            predicate_count: predicates.len() as u64,
            resource_ids: to_vec(resources),
            literal_ids: to_vec(literals),
            predicate_ids: to_vec(predicates),
            analyzed_at: None,
            fetch_error: None,
        }
    }

    #[test]
    fn test_shared_ids_counted_once_in_distinct() {
        let a = result("P1", &["R1", "R2"], &["L1"], &["P31"]);
        let b = result("P2", &["R2", "R3"], &["L1", "L2"], &["P31", "P32"]);

        let stats = GlobalAggregator::seeded([&a, &b]).finalize();

        assert_eq!(stats.total_resources, 4);
        assert_eq!(stats.global_distinct_resources, 3);
        assert_eq!(stats.total_literals, 3);
        assert_eq!(stats.global_distinct_literals, 2);
        assert_eq!(stats.total_predicates, 3);
        assert_eq!(stats.global_distinct_predicates, 2);
        assert_eq!(stats.paper_count, 2);
    }

    #[test]
    fn test_order_independent() {
        let a = result("P1", &["R1", "R2"], &["L1"], &["P31"]);
        let b = result("P2", &["R2", "R3"], &["L2"], &["P32"]);
        let c = result("P3", &["R9"], &[], &["P31"]);

        let forward = GlobalAggregator::seeded([&a, &b, &c]).finalize();
        let backward = GlobalAggregator::seeded([&c, &b, &a]).finalize();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_folding_twice_is_idempotent() {
        let a = result("P1", &["R1", "R2"], &["L1"], &["P31"]);
        let b = result("P2", &["R3"], &["L2"], &["P32"]);

        let once = GlobalAggregator::seeded([&a, &b]).finalize();
        let twice = GlobalAggregator::seeded([&a, &b, &a, &b]).finalize();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_distinct_never_exceeds_sum() {
        let a = result("P1", &["R1", "R1", "R1"], &["L1", "L1"], &["P1", "P1"]);
        let stats = GlobalAggregator::seeded([&a]).finalize();

        assert!(stats.global_distinct_resources <= stats.total_resources);
        assert!(stats.global_distinct_literals <= stats.total_literals);
        assert!(stats.global_distinct_predicates <= stats.total_predicates);
    }

    #[test]
    fn test_empty_paper_still_counted() {
        let empty = PaperAnalysisResult::failed("P404", "not found");
        let stats = GlobalAggregator::seeded([&empty]).finalize();

        assert_eq!(stats.paper_count, 1);
        assert_eq!(stats.total_statements, 0);
        assert_eq!(stats.global_distinct_resources, 0);
    }
}
