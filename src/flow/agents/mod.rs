//! 流程中各推理任务的角色与提示词定义

use crate::flow::task::{Bindings, ModelTier, OutputShape, ReasoningTask, ToolAccess};

pub mod company_name_extractor;
pub mod company_researcher;
pub mod intent_extractor;
pub mod name_extractor;
pub mod person_researcher;
pub mod summarizer;

pub use company_name_extractor::CompanyNameExtractor;
pub use company_researcher::CompanyResearcher;
pub use intent_extractor::IntentExtractor;
pub use name_extractor::NameExtractor;
pub use person_researcher::PersonResearcher;
pub use summarizer::Summarizer;

/// 推理任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    IntentExtractor,
    CompanyNameExtractor,
    CompanyResearcher,
    NameExtractor,
    PersonResearcher,
    Summarizer,
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgentType::IntentExtractor => "intent_extractor",
            AgentType::CompanyNameExtractor => "company_name_extractor",
            AgentType::CompanyResearcher => "company_researcher",
            AgentType::NameExtractor => "name_extractor",
            AgentType::PersonResearcher => "person_researcher",
            AgentType::Summarizer => "summarizer",
        };
        write!(f, "{}", name)
    }
}

/// 任务模板，占位符在执行前由绑定值替换
#[derive(Debug, Clone)]
pub struct TaskTemplate {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub description: String,
    pub expected_output: String,
    pub output_shape: OutputShape,
    pub tool_access: ToolAccess,
    pub model_tier: ModelTier,
    /// 允许模型返回空文本
    pub allow_empty: bool,
}

/// 流程中的推理角色
pub trait FlowAgent {
    fn agent_type(&self) -> AgentType;

    fn template(&self) -> TaskTemplate;

    /// 结合输入绑定生成一次推理任务
    fn task(&self, bindings: Bindings) -> ReasoningTask {
        let template = self.template();
        ReasoningTask {
            tag: self.agent_type().to_string(),
            role: template.role,
            goal: template.goal,
            backstory: template.backstory,
            description: template.description,
            expected_output: template.expected_output,
            bindings,
            output_shape: template.output_shape,
            tool_access: template.tool_access,
            model_tier: template.model_tier,
            allow_empty: template.allow_empty,
        }
    }
}

/// 由键值对构造输入绑定
pub fn bind<const N: usize>(pairs: [(&str, &str); N]) -> Bindings {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
