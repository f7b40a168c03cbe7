//! ReAct执行器 - 带工具的多轮对话

use anyhow::{Result, anyhow};
use rig::completion::{AssistantContent, Message, PromptError};

use super::providers::ProviderAgent;
use super::react::{ReActConfig, ReActResponse};

pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行多轮对话，达到最大迭代次数时返回部分结果
    pub async fn execute(
        agent: &ProviderAgent,
        user_prompt: &str,
        config: &ReActConfig,
    ) -> Result<ReActResponse> {
        tracing::debug!(max_iterations = config.max_iterations, "react agent started");

        match agent.multi_turn(user_prompt, config.max_iterations).await {
            Ok(response) => Ok(ReActResponse::success(response, config.max_iterations)),
            Err(PromptError::MaxDepthError {
                max_depth,
                chat_history,
                ..
            }) => {
                tracing::debug!(max_depth, "react loop reached max depth");
                let content = last_assistant_text(&chat_history).unwrap_or_default();
                Ok(ReActResponse::max_depth_reached_with_history(
                    content,
                    max_depth,
                    tool_calls(&chat_history),
                    chat_history.to_vec(),
                ))
            }
            Err(e) => Err(anyhow!("agent prompt failed: {}", e)),
        }
    }
}

/// 对话历史中最后一条非空的助手文本
pub(super) fn last_assistant_text(chat_history: &[Message]) -> Option<String> {
    chat_history.iter().rev().find_map(|msg| {
        let Message::Assistant { content, .. } = msg else {
            return None;
        };
        let text = content
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        (!text.trim().is_empty()).then_some(text)
    })
}

/// 对话历史中的工具调用，格式为`name(arguments)`
pub(super) fn tool_calls(chat_history: &[Message]) -> Vec<String> {
    chat_history
        .iter()
        .filter_map(|msg| match msg {
            Message::Assistant { content, .. } => Some(content.iter()),
            _ => None,
        })
        .flatten()
        .filter_map(|c| match c {
            AssistantContent::ToolCall(tool_call) => Some(format!(
                "{}({})",
                tool_call.function.name, tool_call.function.arguments
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert!(last_assistant_text(&[]).is_none());
        assert!(tool_calls(&[]).is_empty());
    }

    #[test]
    fn test_last_assistant_text_skips_user_messages() {
        let history = vec![
            Message::user("Who is Alice?"),
            Message::assistant("Alice is the CEO of Acme."),
            Message::user("continue"),
        ];
        assert_eq!(
            last_assistant_text(&history).as_deref(),
            Some("Alice is the CEO of Acme.")
        );
    }
}
