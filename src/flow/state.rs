use serde::Serialize;
use std::ops::Range;

/// 调研状态操作错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("intent has already been set to `{0}`")]
    IntentAlreadySet(String),
    #[error("detail slot {index} is out of range ({len} names)")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("detail slot {0} has already been committed")]
    SlotAlreadyCommitted(usize),
}

/// 单次运行的调研状态，仅由流程编排器持有与修改
///
/// `names`与`details`按提取顺序一一对应：每个名称在登记时即获得一个同下标的详情槽位，
/// 调研成功后写入该槽位，放弃的名称其槽位保持为空。
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResearchState {
    intent: Option<String>,
    user_query: String,
    names: Vec<String>,
    details: Vec<Option<String>>,
}

impl ResearchState {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            ..Default::default()
        }
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    /// 意图标签，尚未识别时为空串
    pub fn intent(&self) -> &str {
        self.intent.as_deref().unwrap_or_default()
    }

    /// 设置意图标签，仅允许设置一次
    pub fn set_intent(&mut self, label: &str) -> Result<(), StateError> {
        if let Some(intent) = &self.intent {
            return Err(StateError::IntentAlreadySet(intent.clone()));
        }
        self.intent = Some(label.trim().to_string());
        Ok(())
    }

    /// 登记提取到的名称并预留同下标的详情槽位，返回新槽位的下标范围
    pub fn register_names(&mut self, names: Vec<String>) -> Range<usize> {
        let start = self.names.len();
        self.details.extend(std::iter::repeat_n(None, names.len()));
        self.names.extend(names);
        start..self.names.len()
    }

    /// 将调研结果写入指定下标的槽位
    pub fn commit_detail(&mut self, index: usize, detail: String) -> Result<(), StateError> {
        let len = self.names.len();
        let slot = self
            .details
            .get_mut(index)
            .ok_or(StateError::SlotOutOfRange { index, len })?;
        if slot.is_some() {
            return Err(StateError::SlotAlreadyCommitted(index));
        }
        *slot = Some(detail);
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 指定下标的调研详情，未完成或已放弃时为None
    pub fn detail(&self, index: usize) -> Option<&str> {
        self.details.get(index).and_then(|d| d.as_deref())
    }

    /// 已完成调研的数量
    pub fn completed_count(&self) -> usize {
        self.details.iter().filter(|d| d.is_some()).count()
    }

    /// 按提取顺序返回已完成调研的(名称, 详情)
    pub fn completed(&self) -> Vec<(&str, &str)> {
        self.names
            .iter()
            .zip(&self.details)
            .filter_map(|(name, detail)| detail.as_deref().map(|d| (name.as_str(), d)))
            .collect()
    }

    /// 按提取顺序返回调研被放弃的名称
    pub fn abandoned(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(&self.details)
            .filter(|(_, detail)| detail.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
