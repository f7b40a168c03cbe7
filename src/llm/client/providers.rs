//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
    extractor::Extractor,
    providers::{
        anthropic, deepseek, gemini,
        gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
        ollama, openai,
    },
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    config::{LLMConfig, LLMProvider},
    llm::tools::search::AgentToolSearch,
};

/// 配置了自定义基地址时覆盖provider的默认地址
macro_rules! with_base_url {
    ($builder:expr, $config:expr) => {{
        let builder = $builder;
        match $config.custom_base_url() {
            Some(url) => builder.base_url(url),
            None => builder,
        }
    }};
}

/// 所有provider共用的Agent参数，有搜索工具时一并挂载
macro_rules! build_agent {
    ($builder:expr, $system_prompt:expr, $config:expr, $search:expr) => {{
        let builder = $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .temperature($config.temperature);
        match $search {
            Some(search) => builder.tool(search).build(),
            None => builder.build(),
        }
    }};
}

macro_rules! build_extractor {
    ($builder:expr, $system_prompt:expr, $config:expr) => {
        $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .build()
    };
}

/// 对各provider变体执行同一段逻辑
macro_rules! each_provider {
    ($value:expr, $kind:ident, $inner:ident => $body:expr) => {
        match $value {
            $kind::OpenAI($inner) => $body,
            $kind::DeepSeek($inner) => $body,
            $kind::Anthropic($inner) => $body,
            $kind::Gemini($inner) => $body,
            $kind::Ollama($inner) => $body,
        }
    };
}

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(openai::Client),
    DeepSeek(deepseek::Client),
    Anthropic(anthropic::Client),
    Gemini(gemini::Client),
    Ollama(ollama::Client),
}

fn gemini_params() -> serde_json::Value {
    let cfg = AdditionalParameters::default().with_config(GenerationConfig::default());
    serde_json::to_value(cfg).unwrap_or(serde_json::Value::Null)
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let key = config.api_key.as_str();
        let client = match config.provider {
            LLMProvider::OpenAI => {
                ProviderClient::OpenAI(with_base_url!(openai::Client::builder(key), config).build())
            }
            LLMProvider::DeepSeek => ProviderClient::DeepSeek(
                with_base_url!(deepseek::Client::builder(key), config).build(),
            ),
            LLMProvider::Anthropic => ProviderClient::Anthropic(
                with_base_url!(anthropic::Client::builder(key), config).build()?,
            ),
            LLMProvider::Gemini => {
                ProviderClient::Gemini(with_base_url!(gemini::Client::builder(key), config).build()?)
            }
            LLMProvider::Ollama => {
                ProviderClient::Ollama(with_base_url!(ollama::Client::builder(), config).build())
            }
        };
        Ok(client)
    }

    /// 创建Agent，传入搜索工具时允许模型调用搜索
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
        search: Option<AgentToolSearch>,
    ) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => {
                let builder = client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder();
                ProviderAgent::OpenAI(build_agent!(builder, system_prompt, config, search))
            }
            ProviderClient::DeepSeek(client) => {
                ProviderAgent::DeepSeek(build_agent!(client.agent(model), system_prompt, config, search))
            }
            ProviderClient::Anthropic(client) => {
                ProviderAgent::Anthropic(build_agent!(client.agent(model), system_prompt, config, search))
            }
            ProviderClient::Gemini(client) => {
                let builder = client.agent(model).additional_params(gemini_params());
                ProviderAgent::Gemini(build_agent!(builder, system_prompt, config, search))
            }
            ProviderClient::Ollama(client) => {
                ProviderAgent::Ollama(build_agent!(client.agent(model), system_prompt, config, search))
            }
        }
    }

    /// 创建Extractor
    pub fn create_extractor<T>(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> ProviderExtractor<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        match self {
            ProviderClient::OpenAI(client) => ProviderExtractor::OpenAI(build_extractor!(
                client.extractor_completions_api::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::DeepSeek(client) => ProviderExtractor::DeepSeek(build_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::Anthropic(client) => ProviderExtractor::Anthropic(build_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::Gemini(client) => ProviderExtractor::Gemini(build_extractor!(
                client
                    .extractor::<T>(model)
                    .additional_params(gemini_params()),
                system_prompt,
                config
            )),
            ProviderClient::Ollama(client) => ProviderExtractor::Ollama(build_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<openai::CompletionModel>),
    DeepSeek(Agent<deepseek::CompletionModel>),
    Anthropic(Agent<anthropic::completion::CompletionModel>),
    Gemini(Agent<gemini::completion::CompletionModel>),
    Ollama(Agent<ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行单轮prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        each_provider!(self, ProviderAgent, agent => Ok(agent.prompt(prompt).await?))
    }

    /// 执行多轮对话（允许工具调用）
    pub async fn multi_turn(
        &self,
        prompt: &str,
        max_iterations: usize,
    ) -> Result<String, PromptError> {
        each_provider!(self, ProviderAgent, agent => agent.prompt(prompt).multi_turn(max_iterations).await)
    }
}

/// 统一的Extractor枚举
pub enum ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    OpenAI(Extractor<openai::CompletionModel, T>),
    DeepSeek(Extractor<deepseek::CompletionModel, T>),
    Anthropic(Extractor<anthropic::completion::CompletionModel, T>),
    Gemini(Extractor<gemini::completion::CompletionModel, T>),
    Ollama(Extractor<ollama::CompletionModel<reqwest::Client>, T>),
}

impl<T> ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    /// 执行提取
    pub async fn extract(&self, prompt: &str) -> Result<T> {
        each_provider!(self, ProviderExtractor, extractor => Ok(extractor.extract(prompt).await?))
    }
}
