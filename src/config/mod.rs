use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "researchflow.toml";

/// LLM API的默认基地址
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 意图无法路由时的处理策略
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnroutedPolicy {
    /// 终止流程并向调用方报告错误
    #[default]
    Reject,
    /// 按人物调研分支继续
    People,
    /// 按公司调研分支继续
    Company,
}

impl std::fmt::Display for UnroutedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnroutedPolicy::Reject => write!(f, "reject"),
            UnroutedPolicy::People => write!(f, "people"),
            UnroutedPolicy::Company => write!(f, "company"),
        }
    }
}

impl std::str::FromStr for UnroutedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(UnroutedPolicy::Reject),
            "people" => Ok(UnroutedPolicy::People),
            "company" => Ok(UnroutedPolicy::Company),
            _ => Err(format!("Unknown unrouted policy: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// 调研流程配置
    pub flow: FlowConfig,

    /// 最终报告的保存路径，为空时只输出到终端
    pub output_path: Option<PathBuf>,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于意图识别、名称提取与总结
    pub model_efficient: String,

    /// 高质量模型，用于公司与人物调研，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 单次推理任务内部的重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Serper API KEY
    pub api_key: String,

    /// 搜索接口地址
    pub endpoint: String,

    /// 每次搜索返回的最大结果数
    pub max_results: usize,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 调研流程配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FlowConfig {
    /// 单个人物调研任务的最大尝试次数（含首次）
    pub person_max_attempts: u32,

    /// 总结任务的最大尝试次数（含首次）
    pub summary_max_attempts: u32,

    /// 流程层重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 每次尝试允许调用搜索工具的次数
    pub search_calls_per_attempt: usize,

    /// 人物调研的最大并发数
    pub max_parallels: usize,

    /// 意图无法路由时的处理策略
    pub unrouted_policy: UnroutedPolicy,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 按优先级加载配置：显式路径 > 当前目录下的默认配置文件 > 默认值
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let default_config_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);

        if default_config_path.exists() {
            Self::from_file(&default_config_path)
        } else {
            Ok(Config::default())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            flow: FlowConfig::default(),
            output_path: None,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("RESEARCHFLOW_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 8192,
            temperature: 0.1,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 300,
        }
    }
}

impl LLMConfig {
    /// 显式配置的API基地址；未配置或仍为默认值时返回None，由provider使用自身的默认地址
    pub fn custom_base_url(&self) -> Option<&str> {
        let url = self.api_base_url.trim();
        (!url.is_empty() && url != DEFAULT_API_BASE_URL).then_some(url)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("SERPER_API_KEY").unwrap_or_default(),
            endpoint: String::from("https://google.serper.dev/search"),
            max_results: 10,
            timeout_seconds: 30,
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            person_max_attempts: 2,
            summary_max_attempts: 2,
            retry_delay_ms: 1000,
            search_calls_per_attempt: 1,
            max_parallels: 3,
            unrouted_policy: UnroutedPolicy::default(),
        }
    }
}
