//! 人物搜索工具

use rig::tool::Tool;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::search::{SearchProvider, person_query};

/// 本次尝试的搜索次数已用完时返回给模型的文本
pub const BUDGET_EXHAUSTED: &str =
    "Search budget for this task is exhausted. Answer with the information you already have.";

/// 搜索工具，每个实例带有独立的调用次数预算
#[derive(Clone)]
pub struct AgentToolSearch {
    provider: Arc<dyn SearchProvider>,
    remaining: Arc<AtomicUsize>,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub person: String,
    #[serde(default)]
    pub company: String,
}

#[derive(Debug, thiserror::Error)]
#[error("search tool error: {0}")]
pub struct SearchToolError(String);

impl AgentToolSearch {
    pub fn new(provider: Arc<dyn SearchProvider>, calls_allowed: usize) -> Self {
        Self {
            provider,
            remaining: Arc::new(AtomicUsize::new(calls_allowed)),
        }
    }

    /// 占用一次调用预算，预算已用完时返回false
    fn take_budget(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::SeqCst)
    }
}

impl Tool for AgentToolSearch {
    const NAME: &'static str = "search_person";

    type Error = SearchToolError;
    type Args = SearchArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web for public information about a person, optionally narrowed by the company they are associated with.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "person": {
                        "type": "string",
                        "description": "Full name of the person to look up"
                    },
                    "company": {
                        "type": "string",
                        "description": "Company the person is associated with, empty when unknown"
                    }
                },
                "required": ["person"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...search@{:?}", args);

        if args.person.trim().is_empty() {
            return Err(SearchToolError("person must not be empty".to_string()));
        }
        if !self.take_budget() {
            tracing::debug!(person = %args.person, "search budget exhausted");
            return Ok(BUDGET_EXHAUSTED.to_string());
        }

        let query = person_query(&args.person, &args.company);
        Ok(self.provider.search(&query).await)
    }
}
