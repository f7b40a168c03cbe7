use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

#[derive(Default)]
pub struct CompanyNameExtractor;

impl FlowAgent for CompanyNameExtractor {
    fn agent_type(&self) -> AgentType {
        AgentType::CompanyNameExtractor
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "a Company Name extractor".to_string(),
            goal: r#"You have to extract the name of a company from given text {text}
Just return the name of the company. Do not return anything else or any other text."#
                .to_string(),
            backstory: "You are an expert in finding names of company from a given text"
                .to_string(),
            description: "Find out name of company from the given text {text}".to_string(),
            expected_output: "Just the name of company".to_string(),
            output_shape: OutputShape::Text,
            tool_access: ToolAccess::None,
            model_tier: ModelTier::Efficient,
            allow_empty: false,
        }
    }
}
