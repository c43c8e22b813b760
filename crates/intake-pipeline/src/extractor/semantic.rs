use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use intake_llm::{ChatClient, ChatOptions, ChatRequest, JsonSchemaFormat, Message, ResponseFormat};
use intake_types::{LLMConfig, Summary, DEFAULT_PROJECT_TITLE};
use serde_json::{json, Map, Value};
use std::sync::Arc;

const SCHEMA_NAME: &str = "project_summary";

const EXTRACTION_INSTRUCTIONS: &str = "You extract a structured project summary from an intake \
conversation. Use only facts the user stated. Leave a field null or empty when the conversation \
does not cover it. When opportunity areas are not stated explicitly, derive a few from the \
problem, solution and target users.";

/// External semantic extraction service
#[async_trait]
pub trait SemanticService: Send + Sync {
    /// Return JSON text shaped by `schema`
    async fn complete(&self, prompt: &str, schema: &Value) -> Result<String>;
}

/// Semantic service backed by a chat completion with structured output
pub struct LlmSemanticService {
    client: Arc<dyn ChatClient>,
    config: LLMConfig,
}

impl LlmSemanticService {
    pub fn new(client: Arc<dyn ChatClient>, config: LLMConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SemanticService for LlmSemanticService {
    async fn complete(&self, prompt: &str, schema: &Value) -> Result<String> {
        let mut options = ChatOptions::new().response_format(ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: SCHEMA_NAME.to_string(),
                schema: schema.clone(),
                strict: Some(true),
            },
        });
        if let Some(temperature) = self.config.temperature {
            options = options.temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            options = options.max_tokens(max_tokens);
        }

        let request = ChatRequest::new(
            self.config.model.clone(),
            vec![
                Message::system(EXTRACTION_INSTRUCTIONS),
                Message::human(prompt.to_string()),
            ],
        )
        .with_options(options);

        let response = self
            .client
            .chat(request)
            .await
            .context("Summary extraction request failed")?;

        response
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| anyhow!("Summary extraction returned no content"))
    }
}

pub fn build_prompt(raw_text: &str, document_names: &[String]) -> String {
    let documents = if document_names.is_empty() {
        "none".to_string()
    } else {
        document_names.join(", ")
    };
    format!(
        "Attached documents: {documents}\n\nConversation (user messages, oldest first):\n{raw_text}"
    )
}

/// Schema hint listing every summary field the service must return
pub fn summary_schema() -> Value {
    let text = json!({ "type": ["string", "null"] });
    let list = json!({ "type": "array", "items": { "type": "string" } });
    json!({
        "type": "object",
        "properties": {
            "project_title": { "type": "string" },
            "problem": text,
            "solution": text,
            "target_users": list,
            "success_metrics": list,
            "constraints": list,
            "timeline": text,
            "resources": list,
            "opportunity_areas": list,
        },
        "required": [
            "project_title", "problem", "solution", "target_users", "success_metrics",
            "constraints", "timeline", "resources", "opportunity_areas"
        ],
        "additionalProperties": false,
    })
}

/// Parse the service reply into a `Summary`, normalising blanks.
///
/// The reply must match [`summary_schema`]: every required key present, no
/// unknown keys, and each value of the declared type.
pub fn parse_summary(reply: &str, document_names: &[String]) -> Result<Summary> {
    let value: Value =
        serde_json::from_str(strip_code_fence(reply)).context("Reply is not valid JSON")?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("Reply is not a JSON object"))?;
    conform(object, &summary_schema())?;

    let mut summary = Summary {
        project_title: text_field(object.get("project_title"))
            .unwrap_or_else(|| DEFAULT_PROJECT_TITLE.to_string()),
        problem: text_field(object.get("problem")),
        solution: text_field(object.get("solution")),
        target_users: list_field(object.get("target_users")),
        success_metrics: list_field(object.get("success_metrics")),
        constraints: list_field(object.get("constraints")),
        timeline: text_field(object.get("timeline")),
        resources: list_field(object.get("resources")),
        documents: document_names.to_vec(),
        opportunity_areas: list_field(object.get("opportunity_areas")),
    };
    summary.opportunity_areas = super::fallback::derive_opportunity_areas(&summary);
    Ok(summary)
}

fn conform(object: &Map<String, Value>, schema: &Value) -> Result<()> {
    let required = schema["required"].as_array().into_iter().flatten();
    for key in required.filter_map(Value::as_str) {
        if !object.contains_key(key) {
            bail!("Reply is missing `{key}`");
        }
    }

    for (key, value) in object {
        let Some(property) = schema["properties"].get(key) else {
            bail!("Reply has unexpected key `{key}`");
        };
        if !has_type(value, property) {
            bail!("Reply field `{key}` has type {}", type_name(value));
        }
    }
    Ok(())
}

fn has_type(value: &Value, property: &Value) -> bool {
    let allowed = match &property["type"] {
        Value::String(name) => name == type_name(value),
        Value::Array(names) => names.iter().any(|name| name == type_name(value)),
        _ => true,
    };
    match value {
        Value::Array(items) if allowed => items.iter().all(|item| has_type(item, &property["items"])),
        _ => allowed,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

fn text_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn list_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| text_field(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_with(overrides: Value) -> String {
        let mut reply = json!({
            "project_title": "Atlas",
            "problem": null,
            "solution": null,
            "target_users": [],
            "success_metrics": [],
            "constraints": [],
            "timeline": null,
            "resources": [],
            "opportunity_areas": []
        });
        if let (Some(reply), Value::Object(overrides)) = (reply.as_object_mut(), overrides) {
            reply.extend(overrides);
        }
        reply.to_string()
    }

    #[test]
    fn test_parse_normalises_blanks() {
        let reply = reply_with(json!({
            "project_title": "  ",
            "problem": "Slow onboarding",
            "solution": "",
            "target_users": ["New hires", " ", "Managers"],
            "resources": ["Wiki"]
        }));
        let summary = parse_summary(&reply, &["Handbook".to_string()]).unwrap();

        assert_eq!(summary.project_title, DEFAULT_PROJECT_TITLE);
        assert_eq!(summary.problem.as_deref(), Some("Slow onboarding"));
        assert!(summary.solution.is_none());
        assert_eq!(summary.target_users, vec!["New hires", "Managers"]);
        assert_eq!(summary.resources, vec!["Wiki"]);
        assert_eq!(summary.documents, vec!["Handbook"]);
        assert_eq!(
            summary.opportunity_areas,
            vec![
                "Address the problem: Slow onboarding".to_string(),
                "Delight New hires, Managers".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let reply = format!("```json\n{}\n```", reply_with(json!({})));
        let summary = parse_summary(&reply, &[]).unwrap();
        assert_eq!(summary.project_title, "Atlas");
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(parse_summary("[1, 2]", &[]).is_err());
        assert!(parse_summary("not json", &[]).is_err());
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        let err = parse_summary(r#"{"project_title": "Atlas"}"#, &[]).unwrap_err();
        assert!(err.to_string().contains("missing `problem`"), "{err}");
        assert!(parse_summary("{}", &[]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse_summary(&reply_with(json!({ "status": "ok" })), &[]).unwrap_err();
        assert!(err.to_string().contains("unexpected key `status`"), "{err}");
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_summary(&reply_with(json!({ "problem": 42 })), &[]).is_err());
        assert!(parse_summary(&reply_with(json!({ "target_users": "x" })), &[]).is_err());
        assert!(parse_summary(&reply_with(json!({ "constraints": null })), &[]).is_err());
        assert!(parse_summary(&reply_with(json!({ "resources": ["Wiki", 3] })), &[]).is_err());
        assert!(parse_summary(&reply_with(json!({ "project_title": null })), &[]).is_err());
    }

    #[test]
    fn test_schema_requires_every_property() {
        let schema = summary_schema();
        let properties = schema["properties"].as_object().unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(properties.len(), required.len());
    }
}
