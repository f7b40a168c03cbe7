//! 结构化解码 - 将推理任务的文本输出解析为有序名称列表

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::flow::task::{ExecutionError, TaskOutput};

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fenced block pattern is valid")
});

/// 将推理任务的输出转换为名称列表
pub fn names_from_output(output: TaskOutput) -> Result<Vec<String>, ExecutionError> {
    match output {
        TaskOutput::Names(names) => Ok(normalize_names(names)),
        TaskOutput::Text(raw) => decode_name_list(&raw),
    }
}

/// 解析`{"name": [...]}`、`{"names": [...]}`或字符串数组，可包裹在代码块中
pub fn decode_name_list(raw: &str) -> Result<Vec<String>, ExecutionError> {
    let body = FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ExecutionError::MalformedOutput(format!("invalid JSON: {}", e)))?;

    let list = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("name").or_else(|| map.get("names")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ExecutionError::MalformedOutput(
                    "expected a `name` array".to_string(),
                ));
            }
        },
        _ => {
            return Err(ExecutionError::MalformedOutput(
                "expected an object or an array of names".to_string(),
            ));
        }
    };

    let mut names = Vec::with_capacity(list.len());
    for item in list {
        match item {
            Value::String(name) => names.push(name.clone()),
            other => {
                return Err(ExecutionError::MalformedOutput(format!(
                    "name entry is not a string: {}",
                    other
                )));
            }
        }
    }

    Ok(normalize_names(names))
}

/// 去除首尾空白并丢弃空项；保留顺序与重复项
pub fn normalize_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
