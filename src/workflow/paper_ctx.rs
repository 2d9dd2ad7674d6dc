//! 论文处理上下文
//!
//! 封装"我正在处理哪个模板的第几篇论文"这一信息

use std::fmt::Display;

/// 论文处理上下文
#[derive(Debug, Clone)]
pub struct PaperCtx {
    /// 模板键
    pub template_key: String,

    /// 论文 ID
    pub paper_id: String,

    /// 在本次运行中的序号（从1开始，包含已缓存的论文）
    pub paper_index: usize,

    /// 目标论文总数
    pub total_papers: usize,
}

impl PaperCtx {
    /// 创建新的论文上下文
    pub fn new(
        template_key: String,
        paper_id: String,
        paper_index: usize,
        total_papers: usize,
    ) -> Self {
        Self {
            template_key,
            paper_id,
            paper_index,
            total_papers,
        }
    }
}

impl Display for PaperCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[论文 {}/{} #{}]",
            self.paper_index, self.total_papers, self.paper_id
        )
    }
}
