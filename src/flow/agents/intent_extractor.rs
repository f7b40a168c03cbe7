use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

/// 意图识别 - 判断用户想了解公司还是公司中的人物
#[derive(Default)]
pub struct IntentExtractor;

impl FlowAgent for IntentExtractor {
    fn agent_type(&self) -> AgentType {
        AgentType::IntentExtractor
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "an Intent extractor".to_string(),
            goal: r#"You have to extract user's intent from given text {text}
If the user wants to know about a company, just return "company"
If the user wants to know the details about some people in a company, just return "people"
Just return a single word that describes the intent. Do not return a long phrase or a sentence."#
                .to_string(),
            backstory: "You are an expert in finding user's intent from a given text. You return the user's intent as a single word."
                .to_string(),
            description: "Find out user's intent from the given text {text}".to_string(),
            expected_output: "A single word that describes the intent.".to_string(),
            output_shape: OutputShape::Text,
            tool_access: ToolAccess::None,
            model_tier: ModelTier::Efficient,
            allow_empty: false,
        }
    }
}
