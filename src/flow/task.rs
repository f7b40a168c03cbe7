//! 推理任务模型 - 描述一次推理调用的角色、目标、输入绑定与期望输出形态

use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// 输入绑定，key为模板占位符名称
pub type Bindings = BTreeMap<String, String>;

/// 期望的输出形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// 原始文本
    Text,
    /// 有序的名称列表
    NameList,
}

/// 任务可使用的外部能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAccess {
    None,
    /// 允许调用搜索工具，每次尝试最多调用`calls_per_attempt`次
    Search { calls_per_attempt: usize },
}

/// 模型档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Efficient,
    Powerful,
}

/// 推理任务的执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Text(String),
    Names(Vec<String>),
}

impl TaskOutput {
    /// 以文本形式取出结果，名称列表按行拼接
    pub fn into_text(self) -> String {
        match self {
            TaskOutput::Text(text) => text,
            TaskOutput::Names(names) => names.join("\n"),
        }
    }
}

/// 推理任务执行错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("model call failed: {0}")]
    Model(String),
    #[error("malformed structured output: {0}")]
    MalformedOutput(String),
    #[error("task timed out after {0}s")]
    Timeout(u64),
}

impl ExecutionError {
    /// 是否为可重试的瞬时错误；结构化解码失败不重试
    pub fn is_transient(&self) -> bool {
        !matches!(self, ExecutionError::MalformedOutput(_))
    }
}

/// 一次推理任务
#[derive(Debug, Clone)]
pub struct ReasoningTask {
    /// 日志与调试用的任务标识
    pub tag: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub description: String,
    pub expected_output: String,
    pub bindings: Bindings,
    pub output_shape: OutputShape,
    pub tool_access: ToolAccess,
    pub model_tier: ModelTier,
    /// 为true时空文本是合法结果，否则视为模型错误
    pub allow_empty: bool,
}

impl ReasoningTask {
    pub fn binding(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    /// 由角色、目标与背景构成的系统提示词
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}.\n\n## Goal\n{}\n\n## Backstory\n{}",
            render_template(self.role.trim(), &self.bindings),
            render_template(self.goal.trim(), &self.bindings),
            render_template(self.backstory.trim(), &self.bindings),
        )
    }

    /// 由任务描述与期望输出构成的用户提示词
    pub fn user_prompt(&self) -> String {
        let mut prompt = format!(
            "## Task\n{}\n\n## Expected output\n{}",
            render_template(self.description.trim(), &self.bindings),
            render_template(self.expected_output.trim(), &self.bindings),
        );

        if let ToolAccess::Search { calls_per_attempt } = self.tool_access {
            prompt.push_str(&format!(
                "\n\nYou may call the search tool at most {} time(s). Use its output, even if it reports an error, to frame your answer.",
                calls_per_attempt
            ));
        }

        prompt
    }
}

/// 将模板中的`{key}`替换为绑定值，未绑定的占位符原样保留
pub fn render_template(template: &str, bindings: &Bindings) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            bindings
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// 推理任务执行器
#[async_trait]
pub trait ReasoningExecutor: Send + Sync {
    async fn execute(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError>;
}
