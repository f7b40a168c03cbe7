//! ReAct模式的配置与响应类型

use rig::completion::Message;

/// ReAct模式配置
///
/// 达到最大迭代次数时总是返回部分结果及对话历史，由调用方决定是否做总结推理
#[derive(Debug, Clone)]
pub struct ReActConfig {
    /// 最大迭代次数（模型轮次，含工具调用）
    pub max_iterations: usize,
}

impl ReActConfig {
    /// 按工具调用预算推导迭代次数：每次工具调用一轮，外加一轮给出最终回答
    pub fn for_tool_budget(tool_calls: usize) -> Self {
        Self {
            max_iterations: tool_calls + 1,
        }
    }
}

/// ReAct模式响应
#[derive(Debug, Clone)]
pub struct ReActResponse {
    pub content: String,
    pub iterations_used: usize,
    pub stopped_by_max_depth: bool,
    pub tool_calls_history: Vec<String>,
    pub chat_history: Option<Vec<Message>>,
}

impl ReActResponse {
    pub fn success(content: String, iterations_used: usize) -> Self {
        Self {
            content,
            iterations_used,
            stopped_by_max_depth: false,
            tool_calls_history: Vec::new(),
            chat_history: None,
        }
    }

    pub fn max_depth_reached_with_history(
        content: String,
        max_depth: usize,
        tool_calls_history: Vec<String>,
        chat_history: Vec<Message>,
    ) -> Self {
        Self {
            content,
            iterations_used: max_depth,
            stopped_by_max_depth: true,
            tool_calls_history,
            chat_history: Some(chat_history),
        }
    }

    pub fn from_summary_reasoning(
        content: String,
        iterations_used: usize,
        tool_calls_history: Vec<String>,
        chat_history: Vec<Message>,
    ) -> Self {
        Self {
            content,
            iterations_used,
            stopped_by_max_depth: false,
            tool_calls_history,
            chat_history: Some(chat_history),
        }
    }
}
