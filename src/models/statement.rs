//! 图语句模型
//!
//! 对应语句包接口 `/statements/{paperId}/bundle` 的返回结构。

use serde::{Deserialize, Serialize};

/// 节点分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    /// 指向另一个节点的引用
    Resource,
    /// 标量值（字符串、数字等）
    Literal,
    /// 其他类型（class、predicate 等），不计入资源或字面量
    #[serde(other)]
    Other,
}

/// 语句中的主语或宾语节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "_class", alias = "class")]
    pub class: NodeClass,
}

/// 谓词
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Predicate {
    #[serde(default)]
    pub id: String,
}

/// 一条主语-谓词-宾语语句
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Node,
    #[serde(default)]
    pub predicate: Predicate,
    pub object: Node,
}

/// 单篇论文的语句包
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementBundle {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Node {
    pub fn resource(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: NodeClass::Resource,
        }
    }

    pub fn literal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: NodeClass::Literal,
        }
    }
}

impl Statement {
    pub fn new(subject: Node, predicate_id: impl Into<String>, object: Node) -> Self {
        Self {
            subject,
            predicate: Predicate {
                id: predicate_id.into(),
            },
            object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_bundle_with_class_tags() {
        let json = r#"{
            "root": "R1",
            "statements": [
                {
                    "id": "S1",
                    "subject": {"id": "R1", "label": "Paper", "_class": "resource"},
                    "predicate": {"id": "P31", "label": "contribution"},
                    "object": {"id": "L9", "label": "2021", "_class": "literal"}
                },
                {
                    "subject": {"id": "R2", "_class": "resource"},
                    "predicate": {"id": "P32"},
                    "object": {"id": "C1", "_class": "class"}
                }
            ]
        }"#;

        let bundle: StatementBundle = serde_json::from_str(json).unwrap();

        assert_eq!(bundle.statements.len(), 2);
        assert_eq!(bundle.statements[0].subject.class, NodeClass::Resource);
        assert_eq!(bundle.statements[0].object.class, NodeClass::Literal);
        assert_eq!(bundle.statements[0].predicate.id, "P31");
        assert_eq!(bundle.statements[1].object.class, NodeClass::Other);
    }

    #[test]
    fn test_missing_statements_field_is_empty() {
        let bundle: StatementBundle = serde_json::from_str("{}").unwrap();
        assert!(bundle.statements.is_empty());
    }
}
