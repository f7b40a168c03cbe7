#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::UnroutedPolicy;
    use crate::flow::intent::{Intent, Route};
    use crate::flow::orchestrator::{FlowError, FlowOutcome, FlowStage, ResearchFlow};
    use crate::flow::retry::RetryPolicy;
    use crate::flow::summary::{SummaryAggregator, entity_header};
    use crate::flow::task::{ExecutionError, TaskOutput};
    use crate::flow::testing::{FakeSearch, ScriptedExecutor, console, fast_config};
    use crate::search::SEARCH_ERROR_PREFIX;

    const PEOPLE_SCRIPT: &str = "Who are these people?\nAcme\nAlice\nBob\nEND\n";

    async fn run_people(executor: &Arc<ScriptedExecutor>) -> FlowOutcome {
        let mut input = console(PEOPLE_SCRIPT);
        ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_company_intent_runs_company_pipeline_only() {
        let executor = Arc::new(ScriptedExecutor::new("company").company_name("Acme Corp"));
        let mut input = console("Tell me about Acme Corp\n");

        let outcome = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Company);
        assert_eq!(outcome.route, Route::Company);
        assert_eq!(
            outcome.stages,
            vec![
                FlowStage::Init,
                FlowStage::IntentClassified,
                FlowStage::CompanyResearch,
                FlowStage::Summary,
                FlowStage::Done,
            ]
        );
        assert_eq!(executor.count("company_name_extractor"), 1);
        assert_eq!(executor.count("company_researcher"), 1);
        assert_eq!(executor.count("name_extractor"), 0);
        assert_eq!(executor.count("person_researcher"), 0);
        assert_eq!(executor.count("summarizer"), 0);

        let company = outcome.company.unwrap();
        assert_eq!(company.company_name, "Acme Corp");
        assert_eq!(outcome.report, "Report on Acme Corp");
        assert!(outcome.state.names().is_empty());
    }

    #[tokio::test]
    async fn test_company_research_receives_extracted_name_and_query() {
        let executor = Arc::new(ScriptedExecutor::new("Company").company_name("Globex"));
        let mut input = console("What does Globex do?\n");

        ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        let research = &executor.calls_for("company_researcher")[0];
        assert_eq!(research.binding("company"), Some("Globex"));
        assert_eq!(research.binding("text"), Some("What does Globex do?"));
    }

    #[tokio::test]
    async fn test_people_flow_researches_each_name_with_company() {
        let executor = Arc::new(ScriptedExecutor::new("people").names(&["Alice", "Bob"]));

        let outcome = run_people(&executor).await;

        assert_eq!(outcome.route, Route::People);
        assert_eq!(outcome.state.intent(), "people");
        assert_eq!(outcome.state.names(), ["Alice", "Bob"]);
        assert_eq!(outcome.state.completed_count(), 2);
        assert_eq!(outcome.state.detail(0), Some("Alice works at Acme."));
        assert_eq!(outcome.state.detail(1), Some("Bob works at Acme."));

        let extraction = &executor.calls_for("name_extractor")[0];
        assert_eq!(extraction.binding("text"), Some("Alice\nBob"));
        assert_eq!(extraction.binding("type"), Some("people"));

        let research = executor.calls_for("person_researcher");
        assert_eq!(research.len(), 2);
        assert!(research.iter().all(|t| t.binding("company") == Some("Acme")));

        assert_eq!(
            outcome.stages,
            vec![
                FlowStage::Init,
                FlowStage::IntentClassified,
                FlowStage::PeopleResearch,
                FlowStage::Summary,
                FlowStage::Done,
            ]
        );
        assert_eq!(outcome.report, "Alice is summarized.\n\nBob is summarized.");
        assert!(!outcome.summary_fallback);
    }

    #[tokio::test]
    async fn test_search_error_still_produces_detail() {
        let search = Arc::new(FakeSearch::default());
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names(&["Alice", "Bob"])
                .with_search(search.clone()),
        );

        let outcome = run_people(&executor).await;

        let bob = outcome.state.detail(1).unwrap();
        assert!(!bob.is_empty());
        assert!(bob.contains(SEARCH_ERROR_PREFIX));
        assert_eq!(outcome.state.completed_count(), 2);

        let mut queries = search.queries.lock().unwrap().clone();
        queries.sort();
        assert_eq!(queries, vec!["Alice Acme", "Bob Acme"]);
    }

    #[tokio::test]
    async fn test_single_failure_is_retried() {
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names(&["Alice", "Bob"])
                .failing("Alice", 1),
        );

        let outcome = run_people(&executor).await;

        assert_eq!(outcome.state.completed_count(), 2);
        assert_eq!(executor.count("person_researcher"), 3);
    }

    #[tokio::test]
    async fn test_exhausted_person_is_abandoned_but_kept_in_names() {
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names(&["Alice", "Bob"])
                .failing("Bob", 2),
        );

        let outcome = run_people(&executor).await;

        assert_eq!(outcome.state.names(), ["Alice", "Bob"]);
        assert_eq!(outcome.state.detail(1), None);
        assert_eq!(outcome.state.abandoned(), vec!["Bob"]);
        assert_eq!(outcome.state.completed(), vec![("Alice", "Alice works at Acme.")]);
        assert_eq!(executor.count("person_researcher"), 3);

        let summary = &executor.calls_for("summarizer")[0];
        assert_eq!(summary.binding("person"), Some("Alice"));
        assert_eq!(outcome.report, "Alice is summarized.");
    }

    #[tokio::test]
    async fn test_details_align_with_names_under_parallel_completion() {
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names(&["Alice", "Bob", "Carol"])
                .delayed("Alice", 60)
                .delayed("Bob", 30),
        );

        let outcome = run_people(&executor).await;

        for (index, name) in outcome.state.names().iter().enumerate() {
            let detail = outcome.state.detail(index).unwrap();
            assert!(detail.starts_with(name.as_str()), "{} -> {}", name, detail);
        }
    }

    #[tokio::test]
    async fn test_duplicate_names_are_researched_independently() {
        let executor = Arc::new(ScriptedExecutor::new("people").names(&["Alice", "Alice"]));

        let outcome = run_people(&executor).await;

        assert_eq!(outcome.state.names(), ["Alice", "Alice"]);
        assert_eq!(outcome.state.completed_count(), 2);
        assert_eq!(executor.count("person_researcher"), 2);
    }

    #[tokio::test]
    async fn test_empty_text_block_falls_back_to_query() {
        let executor = Arc::new(ScriptedExecutor::new("people"));
        let mut input = console("Research the founders of Acme\n\nEND\n");

        let outcome = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        let extraction = &executor.calls_for("name_extractor")[0];
        assert_eq!(extraction.binding("text"), Some("Research the founders of Acme"));
        assert!(outcome.state.names().is_empty());
        assert_eq!(executor.count("person_researcher"), 0);
        assert_eq!(executor.count("summarizer"), 1);
        assert_eq!(outcome.report, "");
    }

    #[tokio::test]
    async fn test_unknown_company_binds_empty_context() {
        let executor = Arc::new(ScriptedExecutor::new("people").names(&["Alice"]));
        let mut input = console("Who is Alice?\n\nAlice\nEND\n");

        ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        let research = &executor.calls_for("person_researcher")[0];
        assert_eq!(research.binding("company"), Some(""));
    }

    #[tokio::test]
    async fn test_unroutable_intent_is_rejected_by_default() {
        let executor = Arc::new(ScriptedExecutor::new("weather"));
        let mut input = console(PEOPLE_SCRIPT);

        let result = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await;

        assert!(matches!(result, Err(FlowError::UnroutableIntent(label)) if label == "weather"));
        assert_eq!(executor.count("name_extractor"), 0);
        assert_eq!(executor.count("company_name_extractor"), 0);
    }

    #[tokio::test]
    async fn test_unroutable_intent_follows_policy() {
        let executor = Arc::new(ScriptedExecutor::new("weather").names(&["Alice"]));
        let mut input = console(PEOPLE_SCRIPT);
        let mut config = fast_config();
        config.unrouted_policy = UnroutedPolicy::People;

        let outcome = ResearchFlow::new(executor.clone(), config)
            .run(&mut input)
            .await
            .unwrap();

        assert_eq!(outcome.intent, Intent::Unknown("weather".to_string()));
        assert_eq!(outcome.route, Route::People);
        assert_eq!(outcome.state.completed_count(), 1);
    }

    #[tokio::test]
    async fn test_classification_failure_is_fatal() {
        let executor = Arc::new(
            ScriptedExecutor::new("people").intent_error(ExecutionError::Timeout(30)),
        );
        let mut input = console(PEOPLE_SCRIPT);

        let result = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await;

        assert!(matches!(result, Err(FlowError::Classification(ExecutionError::Timeout(30)))));
        assert_eq!(executor.count("name_extractor"), 0);
    }

    #[tokio::test]
    async fn test_malformed_name_list_is_fatal() {
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names_output(Ok(TaskOutput::Text("Alice and Bob".to_string()))),
        );

        let mut input = console(PEOPLE_SCRIPT);
        let result = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await;

        assert!(matches!(
            result,
            Err(FlowError::Extraction(ExecutionError::MalformedOutput(_)))
        ));
        assert_eq!(executor.count("person_researcher"), 0);
        assert_eq!(executor.count("summarizer"), 0);
    }

    #[tokio::test]
    async fn test_name_list_decoded_from_text_output() {
        let executor = Arc::new(ScriptedExecutor::new("people").names_output(Ok(
            TaskOutput::Text("```json\n{\"name\": [\"Alice\", \" Bob \"]}\n```".to_string()),
        )));

        let outcome = run_people(&executor).await;

        assert_eq!(outcome.state.names(), ["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_summary_failure_falls_back_to_details_report() {
        let executor = Arc::new(
            ScriptedExecutor::new("people")
                .names(&["Alice", "Bob"])
                .summary_error(ExecutionError::Model("overloaded".to_string())),
        );

        let outcome = run_people(&executor).await;

        assert!(outcome.summary_fallback);
        assert_eq!(outcome.report, outcome.details_report);
        assert!(outcome.report.contains(&entity_header("Alice")));
        assert!(outcome.report.contains(&entity_header("Bob")));
        assert_eq!(
            executor.count("summarizer"),
            fast_config().summary_max_attempts as usize
        );
        assert_eq!(outcome.stages.last(), Some(&FlowStage::Done));
    }

    #[tokio::test]
    async fn test_details_report_keeps_name_order() {
        let executor = Arc::new(ScriptedExecutor::new("people").names(&["Alice", "Bob"]));

        let outcome = run_people(&executor).await;

        let alice = outcome.details_report.find(&entity_header("Alice")).unwrap();
        let bob = outcome.details_report.find(&entity_header("Bob")).unwrap();
        assert!(alice < bob);
    }

    #[tokio::test]
    async fn test_each_run_gets_its_own_id() {
        let executor = Arc::new(ScriptedExecutor::new("people").names(&["Alice"]));

        let first = run_people(&executor).await;
        let second = run_people(&executor).await;

        assert_ne!(first.run_id, second.run_id);
        assert!(first.finished_at >= first.started_at);
        assert!(second.started_at >= first.started_at);
    }

    #[tokio::test]
    async fn test_empty_query_and_block_extract_from_empty_text() {
        let executor = Arc::new(ScriptedExecutor::new("people"));
        let mut input = console("\n\nEND\n");

        let outcome = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        let extraction = &executor.calls_for("name_extractor")[0];
        assert_eq!(extraction.binding("text"), Some(""));
        assert!(outcome.state.names().is_empty());
        assert!(outcome.state.completed().is_empty());
        assert_eq!(executor.count("summarizer"), 1);
    }

    #[tokio::test]
    async fn test_empty_summary_over_no_entries_is_not_a_failure() {
        let executor = Arc::new(ScriptedExecutor::new("people"));
        let mut input = console("Who are these people?\nAcme\nEND\n");

        let outcome = ResearchFlow::new(executor.clone(), fast_config())
            .run(&mut input)
            .await
            .unwrap();

        assert!(outcome.state.names().is_empty());
        assert!(!outcome.summary_fallback);
        assert_eq!(outcome.report, "");
        assert_eq!(executor.count("summarizer"), 1);
        assert!(executor.calls_for("summarizer")[0].allow_empty);
    }

    #[tokio::test]
    async fn test_summary_is_stable_across_reruns() {
        let executor = ScriptedExecutor::new("people");
        let aggregator = SummaryAggregator::new(&executor, RetryPolicy::new(1, 0));
        let entries = [("Alice", "Alice works at Acme."), ("Bob", "Bob works at Acme.")];

        let first = aggregator.summarize(&entries).await.unwrap();
        let second = aggregator.summarize(&entries).await.unwrap();

        assert_eq!(first, second);
        let paragraphs: Vec<_> = first.split("\n\n").collect();
        assert_eq!(paragraphs, vec!["Alice is summarized.", "Bob is summarized."]);
    }
}
