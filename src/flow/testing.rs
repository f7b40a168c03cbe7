//! 测试用的脚本化执行器、搜索与输入

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::FlowConfig;
use crate::flow::input::ConsoleInput;
use crate::flow::task::{ExecutionError, ReasoningExecutor, ReasoningTask, TaskOutput};
use crate::search::{SEARCH_ERROR_PREFIX, SearchProvider, person_query};

pub type ScriptedConsole = ConsoleInput<Cursor<Vec<u8>>, Vec<u8>>;

pub fn console(script: &str) -> ScriptedConsole {
    ConsoleInput::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
}

/// 不等待重试间隔的流程配置
pub fn fast_config() -> FlowConfig {
    FlowConfig {
        retry_delay_ms: 0,
        ..FlowConfig::default()
    }
}

/// 名字中包含"Bob"时返回错误文本，其余返回固定结果
#[derive(Default)]
pub struct FakeSearch {
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SearchProvider for FakeSearch {
    async fn search(&self, query: &str) -> String {
        self.queries.lock().unwrap().push(query.to_string());
        if query.contains("Bob") {
            format!("{}rate limited", SEARCH_ERROR_PREFIX)
        } else {
            format!("{} is an executive.", query)
        }
    }
}

/// 按任务标签返回预设结果的执行器，并记录收到的全部任务
pub struct ScriptedExecutor {
    intent: Result<String, ExecutionError>,
    company_name: String,
    names: Result<TaskOutput, ExecutionError>,
    person_failures: Mutex<HashMap<String, u32>>,
    person_delays: HashMap<String, Duration>,
    summary_error: Option<ExecutionError>,
    search: Option<Arc<dyn SearchProvider>>,
    calls: Mutex<Vec<ReasoningTask>>,
}

impl ScriptedExecutor {
    pub fn new(intent: &str) -> Self {
        Self {
            intent: Ok(intent.to_string()),
            company_name: "Acme".to_string(),
            names: Ok(TaskOutput::Names(Vec::new())),
            person_failures: Mutex::new(HashMap::new()),
            person_delays: HashMap::new(),
            summary_error: None,
            search: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn intent_error(mut self, error: ExecutionError) -> Self {
        self.intent = Err(error);
        self
    }

    pub fn names(mut self, names: &[&str]) -> Self {
        self.names = Ok(TaskOutput::Names(
            names.iter().map(|n| n.to_string()).collect(),
        ));
        self
    }

    pub fn names_output(mut self, output: Result<TaskOutput, ExecutionError>) -> Self {
        self.names = output;
        self
    }

    pub fn company_name(mut self, name: &str) -> Self {
        self.company_name = name.to_string();
        self
    }

    /// 该人物的前`times`次调研失败
    pub fn failing(self, person: &str, times: u32) -> Self {
        self.person_failures
            .lock()
            .unwrap()
            .insert(person.to_string(), times);
        self
    }

    pub fn delayed(mut self, person: &str, millis: u64) -> Self {
        self.person_delays
            .insert(person.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn summary_error(mut self, error: ExecutionError) -> Self {
        self.summary_error = Some(error);
        self
    }

    pub fn with_search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn calls_for(&self, tag: &str) -> Vec<ReasoningTask> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|task| task.tag == tag)
            .cloned()
            .collect()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.calls_for(tag).len()
    }

    fn take_failure(&self, person: &str) -> bool {
        let mut failures = self.person_failures.lock().unwrap();
        match failures.get_mut(person) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    async fn research_person(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError> {
        let person = task.binding("person").unwrap_or_default().to_string();
        let company = task.binding("company").unwrap_or_default().to_string();

        if let Some(delay) = self.person_delays.get(&person) {
            tokio::time::sleep(*delay).await;
        }
        if self.take_failure(&person) {
            return Err(ExecutionError::Model(format!("scripted failure for {}", person)));
        }

        let mut detail = format!("{} works at {}.", person, company);
        if let Some(search) = &self.search {
            let found = search.search(&person_query(&person, &company)).await;
            detail.push_str(&format!(" Search: {}", found));
        }
        Ok(TaskOutput::Text(detail))
    }

    /// 每个人物一段，顺序与`person`绑定一致
    fn summarize(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError> {
        if let Some(error) = &self.summary_error {
            return Err(error.clone());
        }
        let paragraphs = task
            .binding("person")
            .unwrap_or_default()
            .lines()
            .filter(|line| !line.is_empty())
            .map(|name| format!("{} is summarized.", name))
            .collect::<Vec<_>>();
        if paragraphs.is_empty() && !task.allow_empty {
            return Err(ExecutionError::Model("model returned an empty response".to_string()));
        }
        Ok(TaskOutput::Text(paragraphs.join("\n\n")))
    }
}

#[async_trait]
impl ReasoningExecutor for ScriptedExecutor {
    async fn execute(&self, task: &ReasoningTask) -> Result<TaskOutput, ExecutionError> {
        self.calls.lock().unwrap().push(task.clone());

        match task.tag.as_str() {
            "intent_extractor" => self.intent.clone().map(TaskOutput::Text),
            "company_name_extractor" => Ok(TaskOutput::Text(format!(" {} \n", self.company_name))),
            "company_researcher" => Ok(TaskOutput::Text(format!(
                "Report on {}",
                task.binding("company").unwrap_or_default()
            ))),
            "name_extractor" => self.names.clone(),
            "person_researcher" => self.research_person(task).await,
            "summarizer" => self.summarize(task),
            other => Err(ExecutionError::Model(format!("unexpected task {}", other))),
        }
    }
}
