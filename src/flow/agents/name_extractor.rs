use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

/// 名称提取 - 从文本中提取指定类别（people/companies）的名称
#[derive(Default)]
pub struct NameExtractor;

impl FlowAgent for NameExtractor {
    fn agent_type(&self) -> AgentType {
        AgentType::NameExtractor
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "a Name extractor".to_string(),
            goal: "You have to extract names of {type} from given text {text}".to_string(),
            backstory: "You are an expert in finding names of {type} from a given text"
                .to_string(),
            description: "Find out names of {type} from the given text {text}".to_string(),
            expected_output: r#"List out all the names of {type} in the order they appear, as JSON: {"name": ["..."]}"#
                .to_string(),
            output_shape: OutputShape::NameList,
            tool_access: ToolAccess::None,
            model_tier: ModelTier::Efficient,
            allow_empty: false,
        }
    }
}
