//! 错误信息结构
//!
//! 提供传递给 after_throwing 钩子的结构化错误信息

use std::error::Error;

use crate::error::InterceptError;

/// 结构化的错误信息
///
/// 调用失败时由执行链构建，逐层传递给 after_throwing 钩子
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// 错误消息
    pub message: String,

    /// 错误种类标签
    pub kind: String,

    /// 错误源链（cause chain）
    pub source_chain: Vec<String>,
}

impl ErrorInfo {
    /// 从拦截错误构建 ErrorInfo
    pub fn from_intercept(error: &InterceptError) -> Self {
        let message = error.to_string();
        let kind = match error {
            InterceptError::DuplicateName(_) => "duplicate_name",
            InterceptError::NotFound(_) => "not_found",
            InterceptError::TargetFailed { .. } => "target_failed",
            InterceptError::HookFailed { .. } => "hook_failed",
        }
        .to_string();

        // 构建错误源链
        let mut source_chain = Vec::new();
        let mut current_source = error.source();
        while let Some(source) = current_source {
            source_chain.push(source.to_string());
            current_source = source.source();
        }

        Self {
            message,
            kind,
            source_chain,
        }
    }

    /// 获取完整的错误描述（包含源链）
    pub fn full_description(&self) -> String {
        if self.source_chain.is_empty() {
            self.message.clone()
        } else {
            format!(
                "{}\nCaused by:\n  {}",
                self.message,
                self.source_chain.join("\n  ")
            )
        }
    }

    /// 最内层的原始错误消息，没有源链时为消息本身
    pub fn root_cause(&self) -> &str {
        self.source_chain
            .last()
            .map(String::as_str)
            .unwrap_or(&self.message)
    }
}
