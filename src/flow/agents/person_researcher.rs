use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

/// 人物调研员 - 借助搜索工具调研单个人物
pub struct PersonResearcher {
    search_calls_per_attempt: usize,
}

impl PersonResearcher {
    pub fn new(search_calls_per_attempt: usize) -> Self {
        Self {
            search_calls_per_attempt,
        }
    }
}

impl Default for PersonResearcher {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FlowAgent for PersonResearcher {
    fn agent_type(&self) -> AgentType {
        AgentType::PersonResearcher
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "a Researcher".to_string(),
            goal: r#"Find details about a person from Internet by using the provided tool. If the person's company name is also provided, pass on that information to the tool as well.
Use the information returned by the tool to frame your response.
Call the tool only once and use the output from the tool to generate response.
If the tool output is in some other language than English, then translate the tool output to English and then generate response"#
                .to_string(),
            backstory: r#"You are an expert in finding details about a person by searching various resources in Internet.
If the person's company name is provided, you use that information as well to search for that person in relation to that company.
You use the provided tool to find information about the person and then present it in a concise fashion.
The tool takes a JSON object with `person` (the person to be searched) and `company` (the company the person is associated with, may be empty)."#
                .to_string(),
            description: "Find out details about {person} related to {company} by searching on Internet"
                .to_string(),
            expected_output: "Details about {person} related to {company}, framed from the search results"
                .to_string(),
            output_shape: OutputShape::Text,
            tool_access: ToolAccess::Search {
                calls_per_attempt: self.search_calls_per_attempt,
            },
            model_tier: ModelTier::Powerful,
            allow_empty: false,
        }
    }
}
