use crate::config::{Config, LLMProvider, UnroutedPolicy};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// researchflow - 基于意图路由的公司与人物调研引擎
#[derive(Parser, Debug)]
#[command(name = "researchflow")]
#[command(
    about = "Intent-routed research engine. It classifies a free-text request, researches a company or the people it names with LLMs and web search, and consolidates the findings into a report."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 初始调研请求，缺省时以交互方式输入
    #[arg(short, long)]
    pub query: Option<String>,

    /// 最终报告的保存路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// LLM Provider (openai, deepseek, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 高能效模型，用于意图识别、名称提取与总结
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于调研任务，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 人物调研的最大并发数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// Serper搜索 API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 意图无法路由时的处理策略 (reject, people, company)
    #[arg(long)]
    pub unrouted_policy: Option<String>,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用配置中的provider: {}",
                    provider_str, config.llm.provider
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 搜索与流程配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.flow.max_parallels = max_parallels;
        }
        if let Some(policy_str) = self.unrouted_policy {
            if let Ok(policy) = policy_str.parse::<UnroutedPolicy>() {
                config.flow.unrouted_policy = policy;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的路由策略: {}，使用配置中的策略: {}",
                    policy_str, config.flow.unrouted_policy
                );
            }
        }

        if self.output_path.is_some() {
            config.output_path = self.output_path;
        }
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
