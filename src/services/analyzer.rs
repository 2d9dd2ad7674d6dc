//! 论文分析 - 业务能力层
//!
//! 纯函数：把一篇论文的语句分类计数，不做 I/O。

use crate::models::{NodeClass, Statement, StatementAnalysis};

/// 对语句列表分类计数
///
/// 主语和宾语按各自的分类标签计入资源或字面量；谓词 ID 非空时计入谓词。
/// ID 列表保留重复项，计数即出现次数。
pub fn analyze(statements: &[Statement]) -> StatementAnalysis {
    let mut analysis = StatementAnalysis {
        total: statements.len() as u64,
        ..StatementAnalysis::default()
    };

    for statement in statements {
        for node in [&statement.subject, &statement.object] {
            match node.class {
                NodeClass::Resource => analysis.resource_ids.push(node.id.clone()),
                NodeClass::Literal => analysis.literal_ids.push(node.id.clone()),
                NodeClass::Other => {}
            }
        }
        if !statement.predicate.id.is_empty() {
            analysis.predicate_ids.push(statement.predicate.id.clone());
        }
    }

    analysis.resource_count = analysis.resource_ids.len() as u64;
    analysis.literal_count = analysis.literal_ids.len() as u64;
    analysis.predicate_count = analysis.predicate_ids.len() as u64;
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Node, Predicate};

    fn sample_statements() -> Vec<Statement> {
        vec![
            Statement::new(Node::resource("R1"), "P1", Node::resource("R2")),
            Statement::new(Node::resource("R1"), "P2", Node::literal("L1")),
            Statement::new(Node::resource("R2"), "P1", Node::literal("L2")),
            Statement::new(Node::literal("L3"), "", Node::resource("R3")),
        ]
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let analysis = analyze(&[]);
        assert_eq!(analysis, StatementAnalysis::default());
    }

    #[test]
    fn test_resource_and_literal_cover_both_ends() {
        let statements = sample_statements();
        let analysis = analyze(&statements);

        assert_eq!(analysis.total, 4);
        assert_eq!(
            analysis.resource_count + analysis.literal_count,
            2 * statements.len() as u64
        );
        assert_eq!(analysis.resource_ids, vec!["R1", "R2", "R1", "R2", "R3"]);
        assert_eq!(analysis.literal_ids, vec!["L1", "L2", "L3"]);
    }

    #[test]
    fn test_empty_predicate_is_skipped() {
        let analysis = analyze(&sample_statements());

        assert_eq!(analysis.predicate_count, 3);
        assert_eq!(analysis.predicate_ids, vec!["P1", "P2", "P1"]);
    }

    #[test]
    fn test_other_class_counts_in_neither_bucket() {
        let statements = vec![Statement {
            subject: Node::resource("R1"),
            predicate: Predicate {
                id: "P31".to_string(),
            },
            object: Node {
                id: "C1".to_string(),
                class: NodeClass::Other,
            },
        }];

        let analysis = analyze(&statements);

        assert_eq!(analysis.resource_count, 1);
        assert_eq!(analysis.literal_count, 0);
        assert_eq!(analysis.total, 1);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let statements = sample_statements();
        assert_eq!(analyze(&statements), analyze(&statements));
    }
}
