//! 总结推理 - 多轮对话达到最大迭代次数后，基于已获得的信息给出最终回答

use anyhow::Result;
use rig::completion::{AssistantContent, Message};

use super::providers::ProviderAgent;

pub struct SummaryReasoner;

impl SummaryReasoner {
    pub async fn summarize_and_reason(
        agent_without_tools: &ProviderAgent,
        original_user_prompt: &str,
        chat_history: &[Message],
        tool_calls_history: &[String],
    ) -> Result<String> {
        let prompt = build_summary_prompt(original_user_prompt, chat_history, tool_calls_history);
        agent_without_tools.prompt(&prompt).await
    }
}

fn build_summary_prompt(
    original_user_prompt: &str,
    chat_history: &[Message],
    tool_calls_history: &[String],
) -> String {
    let mut prompt = String::new();

    prompt.push_str("# Original task\n");
    prompt.push_str(original_user_prompt);
    prompt.push_str("\n\n");

    if !tool_calls_history.is_empty() {
        prompt.push_str("# Tool calls already made\n");
        for (index, tool_call) in tool_calls_history.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", index + 1, tool_call));
        }
        prompt.push('\n');
    }

    let findings = collect_findings(chat_history);
    if !findings.is_empty() {
        prompt.push_str("# Information gathered so far\n");
        prompt.push_str(&findings);
        prompt.push_str("\n\n");
    }

    prompt.push_str("# Instructions\n");
    prompt.push_str("No more tools are available. Using only the information above, write the final answer to the original task.\n");
    prompt.push_str("Do not invent facts. If something could not be found, say so briefly.\n");

    prompt
}

/// 第一条消息是原始请求，已在上面单独列出
fn collect_findings(chat_history: &[Message]) -> String {
    let mut findings = String::new();

    for (turn, message) in chat_history.iter().enumerate().skip(1) {
        match message {
            Message::User { content } => {
                findings.push_str(&format!("## Tool results [turn {}]\n", turn + 1));
                findings.push_str(&format!("{:#?}\n\n", content));
            }
            Message::Assistant { content, .. } => {
                for item in content.iter() {
                    match item {
                        AssistantContent::Text(text) if !text.text.is_empty() => {
                            findings.push_str(&format!(
                                "## Assistant [turn {}]\n{}\n\n",
                                turn + 1,
                                text.text
                            ));
                        }
                        AssistantContent::ToolCall(tool_call) => {
                            findings.push_str(&format!(
                                "## Tool call [turn {}]\n`{}` {}\n\n",
                                turn + 1,
                                tool_call.function.name,
                                tool_call.function.arguments
                            ));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    findings
}
