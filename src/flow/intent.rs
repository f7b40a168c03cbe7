use serde::Serialize;

use crate::config::UnroutedPolicy;
use crate::flow::agents::{FlowAgent, IntentExtractor, bind};
use crate::flow::task::{ExecutionError, ReasoningExecutor};

/// 识别后的意图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Intent {
    Company,
    People,
    /// 无法识别的原始标签
    Unknown(String),
}

/// 路由目标分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Company,
    People,
}

impl Intent {
    /// 将分类器输出的标签解码为意图：小写并去除首尾空白后做子串匹配，"people"优先
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        if normalized.contains("people") {
            Intent::People
        } else if normalized.contains("company") {
            Intent::Company
        } else {
            Intent::Unknown(label.trim().to_string())
        }
    }

    /// 根据策略确定路由；`None`表示流程应在此终止
    pub fn route(&self, policy: UnroutedPolicy) -> Option<Route> {
        match (self, policy) {
            (Intent::Company, _) => Some(Route::Company),
            (Intent::People, _) => Some(Route::People),
            (Intent::Unknown(_), UnroutedPolicy::Reject) => None,
            (Intent::Unknown(_), UnroutedPolicy::People) => Some(Route::People),
            (Intent::Unknown(_), UnroutedPolicy::Company) => Some(Route::Company),
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Company => write!(f, "company"),
            Intent::People => write!(f, "people"),
            Intent::Unknown(label) => write!(f, "unknown({})", label),
        }
    }
}

/// 意图识别：执行一次推理任务，返回去除首尾空白的标签
pub async fn classify(
    executor: &dyn ReasoningExecutor,
    text: &str,
) -> Result<String, ExecutionError> {
    let task = IntentExtractor.task(bind([("text", text)]));
    let output = executor.execute(&task).await?;
    Ok(output.into_text().trim().to_string())
}
