use anyhow::{Result, anyhow};
use std::io::{self, BufReader};
use std::sync::Arc;

use crate::config::Config;
use crate::llm::LLMClient;
use crate::search::{SearchProvider, SerperSearch};

pub mod agents;
pub mod company;
pub mod decode;
pub mod input;
pub mod intent;
pub mod orchestrator;
pub mod outlet;
pub mod people;
pub mod retry;
pub mod state;
pub mod summary;
pub mod task;
pub mod timing;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod tests;

pub use input::{ConsoleInput, InputSource};
pub use orchestrator::{FlowError, FlowOutcome, FlowStage, ResearchFlow};
pub use task::{ExecutionError, ReasoningExecutor, ReasoningTask, TaskOutput};

/// 启动调研流程：交互读取输入、执行流程并输出报告
pub async fn launch(config: &Config, preset_query: Option<String>) -> Result<()> {
    let search: Arc<dyn SearchProvider> = Arc::new(SerperSearch::new(config.search.clone())?);
    let llm_client = LLMClient::new(config.llm.clone(), search)?;

    // 启动时检查模型连接
    llm_client.check_connection().await?;

    let mut input = ConsoleInput::new(BufReader::new(io::stdin()), io::stdout())
        .with_preset_query(preset_query);
    let flow = ResearchFlow::new(Arc::new(llm_client), config.flow.clone());
    let run_id = flow.run_id();

    let outcome = match flow.run(&mut input).await {
        Ok(outcome) => outcome,
        Err(FlowError::UnroutableIntent(label)) => {
            eprintln!(
                "❌ Sorry, I can only research a company or the people in your text (intent: {})",
                label
            );
            return Err(anyhow!("unroutable intent: {}", label));
        }
        Err(e) => {
            tracing::error!(run_id = %run_id, error = %e, "research flow failed");
            return Err(e.into());
        }
    };

    if outcome.summary_fallback {
        println!("⚠️ 总结生成失败，以下为逐项调研结果");
    }
    outlet::print_report(&outcome.report);

    if let Some(path) = &config.output_path {
        outlet::save_report(path, &outcome.report)?;
    }

    Ok(())
}
