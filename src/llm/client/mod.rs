//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::llm::tools::search::AgentToolSearch;
use crate::search::SearchProvider;

mod executor;
mod providers;
mod react;
mod react_executor;
mod summary_reasoner;
pub mod utils;

pub use react::{ReActConfig, ReActResponse};

use providers::ProviderClient;
use react_executor::ReActExecutor;
use summary_reasoner::SummaryReasoner;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
    search: Arc<dyn SearchProvider>,
}

impl LLMClient {
    /// 创建新的LLM客户端，`search`供需要搜索的任务使用
    pub fn new(config: LLMConfig, search: Arc<dyn SearchProvider>) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self {
            config,
            client,
            search,
        })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .prompt_without_react(
                &self.config.model_efficient,
                "You are a helpful assistant.",
                "Hello",
            )
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，用于处理模型服务调用的瞬时错误
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(attempt = retries, max_retries, error = %err, "model call failed");
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 结构化数据提取，首选模型失败后使用备选模型再试
    pub async fn extract<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        befitting_model: String,
        fallover_model: Option<String>,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor = self
            .client
            .create_extractor::<T>(&befitting_model, system_prompt, &self.config);

        let result = self
            .retry_with_backoff(|| async { extractor.extract(user_prompt).await })
            .await;

        match (result, fallover_model) {
            (Ok(r), _) => Ok(r),
            (Err(e), Some(model)) => {
                eprintln!(
                    "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                    self.config.retry_attempts, model, e
                );
                let user_prompt_with_fixer = format!(
                    "{}\n\n**Note** A previous attempt failed with the error \"{}\". Make sure your answer avoids it.",
                    user_prompt, e
                );
                Box::pin(self.extract(system_prompt, &user_prompt_with_fixer, model, None)).await
            }
            (Err(e), None) => Err(e),
        }
    }

    /// 单轮对话（不使用工具）
    pub async fn prompt_without_react(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let agent = self
            .client
            .create_agent(model, system_prompt, &self.config, None);

        self.retry_with_backoff(|| async { agent.prompt(user_prompt).await })
            .await
    }

    /// 为一次尝试创建搜索工具，预算不与其他尝试共享
    pub(crate) fn search_tool_for_attempt(&self, tool_calls: usize) -> AgentToolSearch {
        AgentToolSearch::new(self.search.clone(), tool_calls)
    }

    /// 允许调用搜索工具的多轮对话，搜索次数不超过`tool_calls`
    ///
    /// 模型服务出错时不在这里重试，由调用方决定是否重新尝试；
    /// 每次调用都使用新的搜索预算。
    pub async fn prompt_with_search(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        tool_calls: usize,
    ) -> Result<ReActResponse> {
        let react_config = ReActConfig::for_tool_budget(tool_calls);
        let search_tool = self.search_tool_for_attempt(tool_calls);
        let agent = self
            .client
            .create_agent(model, system_prompt, &self.config, Some(search_tool));

        let response = ReActExecutor::execute(&agent, user_prompt, &react_config).await?;

        if response.stopped_by_max_depth && response.chat_history.is_some() {
            tracing::debug!("react loop exhausted, summarizing gathered information");
            match self
                .try_summary_reasoning(model, system_prompt, user_prompt, &response)
                .await
            {
                Ok(summary_response) => return Ok(summary_response),
                Err(e) => {
                    tracing::warn!(error = %e, "summary reasoning failed, keeping partial answer");
                }
            }
        }

        Ok(response)
    }

    /// 基于已有对话历史的无工具总结推理
    async fn try_summary_reasoning(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        original_response: &ReActResponse,
    ) -> Result<ReActResponse> {
        let agent_without_tools = self
            .client
            .create_agent(model, system_prompt, &self.config, None);

        let chat_history = original_response
            .chat_history
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("missing chat history"))?;

        let summary_result = self
            .retry_with_backoff(|| async {
                SummaryReasoner::summarize_and_reason(
                    &agent_without_tools,
                    user_prompt,
                    chat_history,
                    &original_response.tool_calls_history,
                )
                .await
            })
            .await?;

        Ok(ReActResponse::from_summary_reasoning(
            summary_result,
            original_response.iterations_used,
            original_response.tool_calls_history.clone(),
            chat_history.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rig::tool::Tool;
    use std::sync::Mutex;

    use crate::llm::tools::search::{BUDGET_EXHAUSTED, SearchArgs};

    #[derive(Default)]
    struct CountingSearch {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for CountingSearch {
        async fn search(&self, query: &str) -> String {
            self.queries.lock().unwrap().push(query.to_string());
            format!("results for {}", query)
        }
    }

    fn args(person: &str) -> SearchArgs {
        SearchArgs {
            person: person.to_string(),
            company: "Acme".to_string(),
        }
    }

    #[tokio::test]
    async fn test_each_attempt_gets_a_fresh_search_budget() {
        let search = Arc::new(CountingSearch::default());
        let client = LLMClient::new(LLMConfig::default(), search.clone()).unwrap();

        let first = client.search_tool_for_attempt(1);
        let second = client.search_tool_for_attempt(1);
        assert_eq!(first.remaining(), 1);
        assert_eq!(second.remaining(), 1);

        first.call(args("Alice")).await.unwrap();
        assert_eq!(first.remaining(), 0);
        assert_eq!(second.remaining(), 1);

        assert_eq!(first.call(args("Alice")).await.unwrap(), BUDGET_EXHAUSTED);
        assert_eq!(
            second.call(args("Alice")).await.unwrap(),
            "results for Alice Acme"
        );
        assert_eq!(search.queries.lock().unwrap().len(), 2);
    }
}
