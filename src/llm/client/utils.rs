use crate::{config::LLMConfig, flow::task::ModelTier};

/// 超过该长度的prompt直接使用能力更强的模型
const EFFICIENT_PROMPT_LIMIT: usize = 32 * 1024;

/// 选择合适的模型，返回(首选模型, 备选模型)
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    tier: ModelTier,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    let oversized = system_prompt.len() + user_prompt.len() > EFFICIENT_PROMPT_LIMIT;
    match tier {
        ModelTier::Efficient if !oversized => (
            llm_config.model_efficient.clone(),
            Some(llm_config.model_powerful.clone()),
        ),
        _ => (llm_config.model_powerful.clone(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficient_tier_falls_over_to_powerful() {
        let config = LLMConfig::default();
        let (model, fallover) =
            evaluate_befitting_model(&config, ModelTier::Efficient, "system", "user");
        assert_eq!(model, config.model_efficient);
        assert_eq!(fallover, Some(config.model_powerful.clone()));
    }

    #[test]
    fn test_powerful_tier_has_no_fallover() {
        let config = LLMConfig::default();
        let (model, fallover) =
            evaluate_befitting_model(&config, ModelTier::Powerful, "system", "user");
        assert_eq!(model, config.model_powerful);
        assert!(fallover.is_none());
    }

    #[test]
    fn test_oversized_prompt_uses_powerful_model() {
        let config = LLMConfig::default();
        let long_prompt = "x".repeat(EFFICIENT_PROMPT_LIMIT + 1);
        let (model, _) =
            evaluate_befitting_model(&config, ModelTier::Efficient, "system", &long_prompt);
        assert_eq!(model, config.model_powerful);
    }
}
