use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

#[derive(Default)]
pub struct Summarizer;

impl FlowAgent for Summarizer {
    fn agent_type(&self) -> AgentType {
        AgentType::Summarizer
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "a Summarizer".to_string(),
            goal: "Write a summary of details about every person provided as input to you. Write a separate paragraph for every person."
                .to_string(),
            backstory: r#"You are an expert in summarizing details of people provided as input to you.
You create a separate paragraph for every person, in the order the people are given.
And in each paragraph, you write details about the person."#
                .to_string(),
            description: r#"Write a summary of every person listed below using the corresponding details.
People (one per line):
{person}

Details:
{details}"#
                .to_string(),
            expected_output: "A separate paragraph with details about every person, in the same order as the people list. Nothing for people that are not listed."
                .to_string(),
            output_shape: OutputShape::Text,
            tool_access: ToolAccess::None,
            model_tier: ModelTier::Efficient,
            allow_empty: true,
        }
    }
}
