//! 让LLM客户端作为流程的推理执行器

use async_trait::async_trait;
use rig::extractor::ExtractionError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::LLMClient;
use super::utils::evaluate_befitting_model;
use crate::flow::decode::normalize_names;
use crate::flow::task::{
    ExecutionError, OutputShape, ReasoningExecutor, ReasoningTask, TaskOutput, ToolAccess,
};

/// 人名提取任务的结构化输出
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PersonNames {
    /// Person names in the order they appear in the text
    pub name: Vec<String>,
}

/// 模型返回的数据不符合预期结构时视为格式错误，其余均视为模型服务错误
fn classify_error(err: anyhow::Error) -> ExecutionError {
    match err.downcast_ref::<ExtractionError>() {
        Some(ExtractionError::NoData) | Some(ExtractionError::DeserializationError(_)) => {
            ExecutionError::MalformedOutput(err.to_string())
        }
        _ => ExecutionError::Model(format!("{:#}", err)),
    }
}

/// 仅允许空输出的任务接受空文本
fn text_output(text: String, allow_empty: bool) -> Result<TaskOutput, ExecutionError> {
    if !allow_empty && text.trim().is_empty() {
        return Err(ExecutionError::Model("model returned an empty response".to_string()));
    }
    Ok(TaskOutput::Text(text))
}

impl LLMClient {
    async fn run_task(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError> {
        let system_prompt = task.system_prompt();
        let user_prompt = task.user_prompt();
        let (model, fallover_model) =
            evaluate_befitting_model(&self.config, task.model_tier, &system_prompt, &user_prompt);
        tracing::debug!(task = %task.tag, model = %model, "executing task");

        match (task.output_shape, task.tool_access) {
            (OutputShape::NameList, _) => {
                let names: PersonNames = self
                    .extract(&system_prompt, &user_prompt, model, fallover_model)
                    .await
                    .map_err(classify_error)?;
                Ok(TaskOutput::Names(normalize_names(names.name)))
            }
            (OutputShape::Text, ToolAccess::None) => {
                let text = self
                    .prompt_without_react(&model, &system_prompt, &user_prompt)
                    .await
                    .map_err(classify_error)?;
                text_output(text, task.allow_empty)
            }
            (OutputShape::Text, ToolAccess::Search { calls_per_attempt }) => {
                let response = self
                    .prompt_with_search(&model, &system_prompt, &user_prompt, calls_per_attempt)
                    .await
                    .map_err(classify_error)?;
                text_output(response.content, task.allow_empty)
            }
        }
    }
}

#[async_trait]
impl ReasoningExecutor for LLMClient {
    async fn execute(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError> {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        match tokio::time::timeout(timeout, self.run_task(task)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(task = %task.tag, seconds = self.config.timeout_seconds, "task timed out");
                Err(ExecutionError::Timeout(self.config.timeout_seconds))
            }
        }
    }
}
