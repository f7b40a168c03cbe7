use crate::flow::agents::{AgentType, FlowAgent, TaskTemplate};
use crate::flow::task::{ModelTier, OutputShape, ToolAccess};

/// 公司调研员 - 在已知公司名称的前提下调研公司概况与核心管理层
#[derive(Default)]
pub struct CompanyResearcher;

impl FlowAgent for CompanyResearcher {
    fn agent_type(&self) -> AgentType {
        AgentType::CompanyResearcher
    }

    fn template(&self) -> TaskTemplate {
        TaskTemplate {
            role: "a Company Researcher".to_string(),
            goal: r#"You have to do research on the company {company}.
Find out what the company does, its market and its recent history.
Find out details about all the top leaders of the company: their professional history, their current job profile and areas of interest."#
                .to_string(),
            backstory: "You are an expert in doing research on a company and on the top leaders of a company"
                .to_string(),
            description: r#"Perform detailed research on the company {company} and on all of its top leaders.
The original request was: {text}"#
                .to_string(),
            expected_output: "Summary report on the company {company}, followed by a summary of each of its top leaders"
                .to_string(),
            output_shape: OutputShape::Text,
            tool_access: ToolAccess::None,
            model_tier: ModelTier::Powerful,
            allow_empty: false,
        }
    }
}
