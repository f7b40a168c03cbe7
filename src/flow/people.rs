use crate::config::FlowConfig;
use crate::flow::agents::{FlowAgent, NameExtractor, PersonResearcher, bind};
use crate::flow::decode::names_from_output;
use crate::flow::retry::RetryPolicy;
use crate::flow::task::{ExecutionError, ReasoningExecutor};
use crate::utils::threads::do_parallel_with_limit;

/// 人物调研的输入：可选的公司上下文与待提取人名的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeopleRequest {
    pub company: String,
    pub text: String,
}

impl PeopleRequest {
    /// 文本块为空时回落到原始请求
    pub fn new(company: &str, lines: &[String], user_query: &str) -> Self {
        let text = if lines.is_empty() {
            user_query.to_string()
        } else {
            lines.join("\n")
        };
        Self {
            company: company.trim().to_string(),
            text,
        }
    }
}

/// 人物调研流水线
pub struct PersonPipeline<'a> {
    executor: &'a dyn ReasoningExecutor,
    config: &'a FlowConfig,
}

impl<'a> PersonPipeline<'a> {
    pub fn new(executor: &'a dyn ReasoningExecutor, config: &'a FlowConfig) -> Self {
        Self { executor, config }
    }

    /// 从文本中提取人名，解码失败即失败
    pub async fn extract_names(&self, text: &str) -> Result<Vec<String>, ExecutionError> {
        let task = NameExtractor.task(bind([("type", "people"), ("text", text)]));
        let output = self.executor.execute(&task).await?;
        names_from_output(output)
    }

    /// 调研所有人物，返回结果与`names`按下标一一对应
    ///
    /// 各人物的调研互不依赖，以`max_parallels`为上限并发执行；单个人物失败不影响其他人物。
    pub async fn research_all(
        &self,
        names: &[String],
        company: &str,
    ) -> Vec<Result<String, ExecutionError>> {
        let futures: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(index, name)| self.research_one(index, name, company))
            .collect();

        do_parallel_with_limit(futures, self.config.max_parallels).await
    }

    /// 调研单个人物，瞬时失败时按策略重试
    pub async fn research_one(
        &self,
        index: usize,
        name: &str,
        company: &str,
    ) -> Result<String, ExecutionError> {
        let policy = RetryPolicy::new(self.config.person_max_attempts, self.config.retry_delay_ms);
        let researcher = PersonResearcher::new(self.config.search_calls_per_attempt);
        let task = researcher.task(bind([("person", name), ("company", company)]));

        println!("🔍 调研人物 [{}] {}", index + 1, name);
        let tag = format!("{}#{}", task.tag, index);
        let result = policy
            .run(&tag, |attempt| {
                let task = &task;
                async move {
                    tracing::debug!(person = name, attempt, "person research attempt");
                    self.executor.execute(task).await
                }
            })
            .await;

        result.map(|output| output.into_text())
    }
}
