use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::flow::company::{CompanyPipeline, CompanyReport};
use crate::flow::input::InputSource;
use crate::flow::intent::{self, Intent, Route};
use crate::flow::people::{PeopleRequest, PersonPipeline};
use crate::flow::retry::RetryPolicy;
use crate::flow::state::{ResearchState, StateError};
use crate::flow::summary::{SummaryAggregator, compose_details_report};
use crate::flow::task::{ExecutionError, ReasoningExecutor};
use crate::flow::timing::TimingScope;

/// 流程状态机的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowStage {
    Init,
    IntentClassified,
    CompanyResearch,
    PeopleResearch,
    Summary,
    Done,
    /// 意图无法路由且策略为拒绝时的终止阶段
    Unrouted,
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowStage::Init => "init",
            FlowStage::IntentClassified => "intent_classified",
            FlowStage::CompanyResearch => "company_research",
            FlowStage::PeopleResearch => "people_research",
            FlowStage::Summary => "summary",
            FlowStage::Done => "done",
            FlowStage::Unrouted => "unrouted",
        };
        write!(f, "{}", name)
    }
}

/// 中止整个运行的错误
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("intent classification failed: {0}")]
    Classification(#[source] ExecutionError),
    #[error("people extraction failed: {0}")]
    Extraction(#[source] ExecutionError),
    #[error("company research failed: {0}")]
    CompanyResearch(#[source] ExecutionError),
    #[error("intent `{0}` matches neither company nor people research")]
    UnroutableIntent(String),
    #[error("failed to read user input: {0}")]
    Input(#[from] std::io::Error),
    #[error(transparent)]
    State(#[from] StateError),
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct FlowOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub intent: Intent,
    pub route: Route,
    /// 依次经过的阶段
    pub stages: Vec<FlowStage>,
    pub state: ResearchState,
    /// 公司分支的调研结果
    pub company: Option<CompanyReport>,
    /// 人物分支的逐项报告
    pub details_report: String,
    /// 最终报告
    pub report: String,
    /// 总结任务失败、以逐项报告代替时为true
    pub summary_fallback: bool,
}

/// 调研流程编排器：意图路由、分支执行与结果汇总
pub struct ResearchFlow {
    executor: Arc<dyn ReasoningExecutor>,
    config: FlowConfig,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    stages: Vec<FlowStage>,
    timing: TimingScope,
}

impl ResearchFlow {
    pub fn new(executor: Arc<dyn ReasoningExecutor>, config: FlowConfig) -> Self {
        Self {
            executor,
            config,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            stages: Vec::new(),
            timing: TimingScope::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    fn transition(&mut self, stage: FlowStage) {
        tracing::info!(run_id = %self.run_id, stage = %stage, "flow transition");
        self.stages.push(stage);
        self.timing.start_phase(&stage.to_string());
    }

    fn finish(&mut self) {
        self.timing.end_phase();
        tracing::debug!(run_id = %self.run_id, "\n{}", self.timing.generate_timing_report());
    }

    /// 执行一次完整的调研流程
    pub async fn run(mut self, input: &mut dyn InputSource) -> Result<FlowOutcome, FlowError> {
        self.started_at = Utc::now();
        self.transition(FlowStage::Init);
        println!("🚀 开始执行Research Flow调研流程...");

        let query = input.read_query()?;
        let mut state = ResearchState::new(query);

        let label = intent::classify(self.executor.as_ref(), state.user_query())
            .await
            .map_err(FlowError::Classification)?;
        state.set_intent(&label)?;
        let intent = Intent::from_label(state.intent());
        self.transition(FlowStage::IntentClassified);
        println!("🧭 用户意图: {}", state.intent());

        let Some(route) = intent.route(self.config.unrouted_policy) else {
            self.transition(FlowStage::Unrouted);
            self.finish();
            tracing::warn!(run_id = %self.run_id, intent = %label, "intent could not be routed");
            return Err(FlowError::UnroutableIntent(label));
        };
        if let Intent::Unknown(raw) = &intent {
            tracing::warn!(
                intent = %raw,
                policy = %self.config.unrouted_policy,
                "unknown intent routed by policy"
            );
        }

        let mut company = None;
        let mut details_report = String::new();
        let mut summary_fallback = false;

        let report = match route {
            Route::Company => {
                self.transition(FlowStage::CompanyResearch);
                println!("🏢 OK, you want to research about a company");
                let result = CompanyPipeline::new(self.executor.as_ref())
                    .run(state.user_query())
                    .await
                    .map_err(FlowError::CompanyResearch)?;
                self.transition(FlowStage::Summary);
                let report = result.report.clone();
                company = Some(result);
                report
            }
            Route::People => {
                self.transition(FlowStage::PeopleResearch);
                details_report = self.research_people(&mut state, input).await?;
                self.transition(FlowStage::Summary);
                let (report, fallback) = self.summarize(&state, &details_report).await;
                summary_fallback = fallback;
                report
            }
        };

        self.transition(FlowStage::Done);
        self.finish();
        println!("✓ Research Flow流程执行完毕");

        Ok(FlowOutcome {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            intent,
            route,
            stages: self.stages,
            state,
            company,
            details_report,
            report,
            summary_fallback,
        })
    }

    /// 人物分支：收集输入、提取人名、逐人调研并提交到状态
    async fn research_people(
        &self,
        state: &mut ResearchState,
        input: &mut dyn InputSource,
    ) -> Result<String, FlowError> {
        println!("👥 OK, you want to know details about some people");
        let company = input.read_company()?;
        let lines = input.read_text_block()?;
        let request = PeopleRequest::new(&company, &lines, state.user_query());

        let pipeline = PersonPipeline::new(self.executor.as_ref(), &self.config);
        let names = pipeline
            .extract_names(&request.text)
            .await
            .map_err(FlowError::Extraction)?;
        tracing::info!(run_id = %self.run_id, count = names.len(), "people extracted");

        let slots = state.register_names(names);
        let names = state.names()[slots.clone()].to_vec();
        let results = pipeline.research_all(&names, &request.company).await;

        for (index, result) in slots.zip(results) {
            match result {
                Ok(detail) => state.commit_detail(index, detail)?,
                Err(err) => {
                    let name = state.names().get(index).map(String::as_str).unwrap_or("");
                    tracing::debug!(person = name, error = %err, "person research failed");
                }
            }
        }

        let abandoned = state.abandoned();
        if !abandoned.is_empty() {
            tracing::warn!(
                run_id = %self.run_id,
                abandoned = ?abandoned,
                completed = state.completed_count(),
                "person research abandoned"
            );
            eprintln!("❌ 人物调研失败，已跳过: {}", abandoned.join(", "));
        }

        let details_report = compose_details_report(&state.completed());
        println!("\n{}", details_report);
        Ok(details_report)
    }

    /// 总结聚合；失败时以逐项报告作为最终报告
    async fn summarize(&self, state: &ResearchState, details_report: &str) -> (String, bool) {
        let policy = RetryPolicy::new(self.config.summary_max_attempts, self.config.retry_delay_ms);
        let aggregator = SummaryAggregator::new(self.executor.as_ref(), policy);

        match aggregator.summarize(&state.completed()).await {
            Ok(report) => (report, false),
            Err(err) => {
                tracing::warn!(error = %err, "summary failed, using per-person report");
                (details_report.to_string(), true)
            }
        }
    }
}
