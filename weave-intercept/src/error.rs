//! 拦截管道错误类型
//!
//! 区分注册期错误（重名、未找到）与调用期错误（目标失败、钩子失败）

use std::fmt;

use thiserror::Error;

use crate::invocation::OpValue;

/// 钩子种类
///
/// 用于在 HookFailed 中标识失败发生的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// 前置钩子
    Before,
    /// 返回后钩子（成功时执行）
    AfterReturning,
    /// 异常钩子（失败时执行）
    AfterThrowing,
    /// 后置钩子（无论成功失败都执行）
    After,
    /// 环绕钩子（可控制目标执行）
    Around,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Before => write!(f, "before"),
            HookKind::AfterReturning => write!(f, "after_returning"),
            HookKind::AfterThrowing => write!(f, "after_throwing"),
            HookKind::After => write!(f, "after"),
            HookKind::Around => write!(f, "around"),
        }
    }
}

/// 拦截管道统一错误
///
/// 管道本身只路由控制流和错误，从不吞掉错误；
/// 目标操作的原始错误保留在 source 链上原样到达调用方
#[derive(Debug, Error)]
pub enum InterceptError {
    /// 注册了重名拦截器，且两者的切点可能重叠
    #[error("duplicate interceptor name '{0}'")]
    DuplicateName(String),

    /// 注销了不存在的拦截器
    #[error("no interceptor named '{0}'")]
    NotFound(String),

    /// 目标操作执行失败
    #[error("operation '{operation}' failed")]
    TargetFailed {
        /// 操作标识
        operation: String,
        /// 目标抛出的原始错误
        #[source]
        source: anyhow::Error,
    },

    /// 拦截器钩子自身执行失败
    ///
    /// 钩子失败会取代此前的结果（成功或失败），并继续触发
    /// 更外层拦截器的失败路径
    #[error("{hook} hook of interceptor '{interceptor}' failed")]
    HookFailed {
        /// 拦截器名称
        interceptor: String,
        /// 失败的钩子
        hook: HookKind,
        /// 钩子抛出的错误
        #[source]
        source: anyhow::Error,
    },
}

pub type InterceptResult<T> = Result<T, InterceptError>;

/// 一次 invoke 的最终结果
pub type InvokeResult = InterceptResult<OpValue>;
