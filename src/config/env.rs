use std::collections::BTreeMap;

use super::types::non_empty;

/// Action inputs forwarded to VectorLint. Each `name` arrives as
/// `INPUT_<NAME>` and is exported to the linter as `<NAME>`.
pub const PROVIDER_INPUTS: &[&str] = &[
    "llm_provider",
    "openai_api_key",
    "anthropic_api_key",
    "gemini_api_key",
    "perplexity_api_key",
    "openai_model",
    "anthropic_model",
    "gemini_model",
    "azure_openai_model",
    "openai_temperature",
    "anthropic_temperature",
    "anthropic_max_tokens",
    "gemini_temperature",
    "azure_openai_api_key",
    "azure_openai_endpoint",
    "azure_openai_deployment_name",
    "azure_openai_api_version",
    "azure_openai_temperature",
];

/// Variable reviewdog reads its GitHub token from.
pub const REVIEWDOG_TOKEN_VAR: &str = "REVIEWDOG_GITHUB_API_TOKEN";

/// Name GitHub Actions uses to expose an input: `INPUT_` + upper-cased name,
/// spaces replaced with underscores.
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_ascii_uppercase())
}

/// Collect provider settings for the linter's environment. Empty inputs are
/// skipped.
pub fn linter_env<F>(lookup: F) -> BTreeMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    PROVIDER_INPUTS
        .iter()
        .filter_map(|name| {
            non_empty(lookup(&input_var(name))).map(|value| (name.to_ascii_uppercase(), value))
        })
        .collect()
}

/// Environment for the reporter: just the token, when one is configured.
pub fn reporter_env(github_token: Option<&str>) -> BTreeMap<String, String> {
    github_token
        .filter(|t| !t.is_empty())
        .map(|t| (REVIEWDOG_TOKEN_VAR.to_string(), t.to_string()))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_var_follows_actions_convention() {
        assert_eq!(input_var("openai_api_key"), "INPUT_OPENAI_API_KEY");
        assert_eq!(input_var("fail on error"), "INPUT_FAIL_ON_ERROR");
    }

    #[test]
    fn linter_env_maps_inputs_and_skips_empty() {
        let lookup = |key: &str| match key {
            "INPUT_LLM_PROVIDER" => Some("anthropic".to_string()),
            "INPUT_ANTHROPIC_API_KEY" => Some("sk-ant-test".to_string()),
            "INPUT_OPENAI_API_KEY" => Some(String::new()),
            _ => None,
        };
        let env = linter_env(lookup);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("LLM_PROVIDER").map(String::as_str), Some("anthropic"));
        assert_eq!(env.get("ANTHROPIC_API_KEY").map(String::as_str), Some("sk-ant-test"));
        assert!(!env.contains_key("OPENAI_API_KEY"));
    }

    #[test]
    fn reporter_env_only_with_token() {
        assert!(reporter_env(None).is_empty());
        assert!(reporter_env(Some("")).is_empty());
        let env = reporter_env(Some("ghs_token"));
        assert_eq!(env.get(REVIEWDOG_TOKEN_VAR).map(String::as_str), Some("ghs_token"));
    }
}
