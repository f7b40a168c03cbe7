//! 搜索能力 - 根据自由文本查询返回文本结果，失败时返回带错误前缀的文本而不是错误

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;

/// 搜索失败时结果文本的前缀
pub const SEARCH_ERROR_PREFIX: &str = "Error performing search: ";

/// 没有任何可用结果时返回的文本
pub const NO_RESULT: &str = "No good search result found";

/// 搜索能力
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行搜索；不返回错误，失败信息以`SEARCH_ERROR_PREFIX`开头的文本返回
    async fn search(&self, query: &str) -> String;
}

/// 人物搜索的查询语句：人名 + 公司名
pub fn person_query(person: &str, company: &str) -> String {
    format!("{} {}", person.trim(), company.trim())
        .trim()
        .to_string()
}

/// 基于Serper (google.serper.dev) 的搜索实现
pub struct SerperSearch {
    http: reqwest::Client,
    config: SearchConfig,
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerperResponse {
    #[serde(default)]
    pub answer_box: Option<AnswerBox>,
    #[serde(default)]
    pub knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerBox {
    pub answer: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KnowledgeGraph {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub snippet: Option<String>,
}

impl SerperSearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build search http client")?;
        Ok(Self { http, config })
    }

    async fn try_search(&self, query: &str) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(anyhow!("SERPER api key is not configured"));
        }

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("X-API-KEY", &self.config.api_key)
            .json(&SerperRequest {
                q: query,
                num: self.config.max_results,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: SerperResponse = response.json().await?;
        Ok(format_results(&body, self.config.max_results))
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(&self, query: &str) -> String {
        tracing::info!(query, "web search");
        match self.try_search(query).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(query, error = %e, "web search failed");
                format!("{}{}", SEARCH_ERROR_PREFIX, e)
            }
        }
    }
}

/// 将搜索响应整理为一段文本：直接答案优先，其次知识图谱，最后是网页摘要
pub fn format_results(response: &SerperResponse, max_results: usize) -> String {
    if let Some(answer_box) = &response.answer_box {
        if let Some(answer) = answer_box.answer.as_deref().filter(|a| !a.is_empty()) {
            return answer.to_string();
        }
        if let Some(snippet) = answer_box.snippet.as_deref().filter(|s| !s.is_empty()) {
            return snippet.replace('\n', " ");
        }
    }

    let mut snippets = Vec::new();

    if let Some(kg) = &response.knowledge_graph {
        let title = kg.title.as_deref().unwrap_or_default();
        if let Some(entity_type) = kg.entity_type.as_deref() {
            snippets.push(format!("{}: {}.", title, entity_type));
        }
        if let Some(description) = kg.description.as_deref() {
            snippets.push(description.to_string());
        }
        for (attribute, value) in &kg.attributes {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            snippets.push(format!("{} {}: {}.", title, attribute, value));
        }
    }

    snippets.extend(
        response
            .organic
            .iter()
            .take(max_results)
            .filter_map(|result| result.snippet.clone()),
    );

    if snippets.is_empty() {
        NO_RESULT.to_string()
    } else {
        snippets.join(" ")
    }
}
