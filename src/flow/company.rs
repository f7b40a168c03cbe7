use serde::Serialize;

use crate::flow::agents::{CompanyNameExtractor, CompanyResearcher, FlowAgent, bind};
use crate::flow::task::{ExecutionError, ReasoningExecutor};

/// 公司调研结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyReport {
    pub company_name: String,
    pub report: String,
}

/// 公司调研流水线：先提取公司名称，再以该名称为上下文调研公司与管理层
pub struct CompanyPipeline<'a> {
    executor: &'a dyn ReasoningExecutor,
}

impl<'a> CompanyPipeline<'a> {
    pub fn new(executor: &'a dyn ReasoningExecutor) -> Self {
        Self { executor }
    }

    pub async fn run(&self, user_query: &str) -> Result<CompanyReport, ExecutionError> {
        let name_task = CompanyNameExtractor.task(bind([("text", user_query)]));
        let company_name = self
            .executor
            .execute(&name_task)
            .await?
            .into_text()
            .trim()
            .to_string();
        tracing::info!(company = %company_name, "company name extracted");
        println!("🏢 公司名称: {}", company_name);

        let research_task = CompanyResearcher.task(bind([
            ("company", company_name.as_str()),
            ("text", user_query),
        ]));
        let report = self.executor.execute(&research_task).await?.into_text();

        Ok(CompanyReport {
            company_name,
            report,
        })
    }
}
