use crate::flow::agents::{FlowAgent, Summarizer, bind};
use crate::flow::retry::RetryPolicy;
use crate::flow::task::{ExecutionError, ReasoningExecutor};

/// 单个人物在逐项报告中的标题行
pub fn entity_header(name: &str) -> String {
    format!("********************  Details about {} **********************", name)
}

/// 按顺序拼接逐项报告：每个人物一个标题行加调研详情
pub fn compose_details_report(entries: &[(&str, &str)]) -> String {
    let mut report = String::new();
    for (name, detail) in entries {
        report.push_str(&entity_header(name));
        report.push_str("\n\n");
        report.push_str(detail.trim_end());
        report.push_str("\n\n\n");
    }
    report
}

/// 总结聚合：把按下标对齐的(名称, 详情)归并为每人一段的最终报告
pub struct SummaryAggregator<'a> {
    executor: &'a dyn ReasoningExecutor,
    policy: RetryPolicy,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(executor: &'a dyn ReasoningExecutor, policy: RetryPolicy) -> Self {
        Self { executor, policy }
    }

    /// 即使没有任何人物也会执行，此时得到空或极简的报告
    pub async fn summarize(&self, entries: &[(&str, &str)]) -> Result<String, ExecutionError> {
        let people = entries
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join("\n");
        let details = entries
            .iter()
            .map(|(name, detail)| format!("### {}\n{}", name, detail.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");

        let task = Summarizer.task(bind([
            ("person", people.as_str()),
            ("details", details.as_str()),
        ]));
        let output = self
            .policy
            .run(&task.tag, |_| self.executor.execute(&task))
            .await?;

        Ok(output.into_text().trim().to_string())
    }
}
