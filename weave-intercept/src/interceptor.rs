//! 拦截器（Interceptor）定义
//!
//! 拦截器是横切关注点的模块化：以钩子形式观察或包裹目标操作

use async_trait::async_trait;

use crate::chain::Next;
use crate::error::InvokeResult;
use crate::error_info::ErrorInfo;
use crate::invocation::{Invocation, OpValue};
use crate::pointcut::Pointcut;

/// 拦截器 Trait
///
/// 实现任意非空的钩子子集即可。order 越小包裹越外层：
/// 它的 before 最先执行，它的 after 最后执行（先进后出）
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// 拦截器名称
    ///
    /// 注册表内，切点可能重叠的拦截器之间名称必须唯一
    fn name(&self) -> &str;

    /// 执行顺序，越小越靠外
    fn order(&self) -> i32 {
        100
    }

    /// 适用性判定
    fn pointcut(&self) -> &Pointcut;

    /// 前置钩子（可选实现）
    ///
    /// 返回错误时目标操作不会执行
    async fn before(&self, _invocation: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    /// 返回后钩子（可选实现），目标成功返回时观察结果
    async fn after_returning(
        &self,
        _invocation: &Invocation,
        _result: &OpValue,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// 异常钩子（可选实现），调用失败时观察错误信息
    async fn after_throwing(
        &self,
        _invocation: &Invocation,
        _error: &ErrorInfo,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// 后置钩子（可选实现），无论成功失败都在本层最后执行
    async fn after(&self, _invocation: &Invocation) -> anyhow::Result<()> {
        Ok(())
    }

    /// 环绕钩子（可选实现）
    ///
    /// 完全控制继续执行：可以不调用 next 短路、捕获错误替换结果，
    /// 或多次调用 next 重试。默认实现直接继续
    async fn around(&self, _invocation: &Invocation, next: Next) -> InvokeResult {
        next.proceed().await
    }
}

// ============================================================================
// 预定义的常用拦截器
// ============================================================================

/// 日志拦截器 - 记录操作进出
pub struct LoggingInterceptor {
    log_args: bool,
    order: i32,
    pointcut: Pointcut,
}

impl LoggingInterceptor {
    pub fn new(pointcut: Pointcut) -> Self {
        Self {
            log_args: false,
            order: 100,
            pointcut,
        }
    }

    pub fn with_args(mut self) -> Self {
        self.log_args = true;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "LoggingInterceptor"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    async fn before(&self, invocation: &Invocation) -> anyhow::Result<()> {
        if self.log_args {
            tracing::info!(
                "→ Entering: {} ({} args)",
                invocation.operation(),
                invocation.args().len()
            );
        } else {
            tracing::info!("→ Entering: {}", invocation.operation());
        }
        Ok(())
    }

    async fn after(&self, invocation: &Invocation) -> anyhow::Result<()> {
        tracing::info!(
            "← Exiting: {} (took {:?})",
            invocation.operation(),
            invocation.elapsed()
        );
        Ok(())
    }
}

/// 慢调用监控拦截器
pub struct SlowCallInterceptor {
    threshold_ms: u128,
    pointcut: Pointcut,
}

impl SlowCallInterceptor {
    pub fn new(threshold_ms: u128, pointcut: Pointcut) -> Self {
        Self {
            threshold_ms,
            pointcut,
        }
    }
}

#[async_trait]
impl Interceptor for SlowCallInterceptor {
    fn name(&self) -> &str {
        "SlowCallInterceptor"
    }

    fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    async fn after(&self, invocation: &Invocation) -> anyhow::Result<()> {
        let elapsed = invocation.elapsed().as_millis();
        if elapsed > self.threshold_ms {
            tracing::warn!(
                "⚠️ Slow operation detected: {} took {}ms (threshold: {}ms)",
                invocation.operation(),
                elapsed,
                self.threshold_ms
            );
        }
        Ok(())
    }
}

/// 异常日志拦截器
pub struct ErrorLoggingInterceptor {
    pointcut: Pointcut,
}

impl ErrorLoggingInterceptor {
    pub fn new(pointcut: Pointcut) -> Self {
        Self { pointcut }
    }
}

#[async_trait]
impl Interceptor for ErrorLoggingInterceptor {
    fn name(&self) -> &str {
        "ErrorLoggingInterceptor"
    }

    fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    async fn after_throwing(
        &self,
        invocation: &Invocation,
        error: &ErrorInfo,
    ) -> anyhow::Result<()> {
        tracing::error!(
            "❌ Failure in {}: {}",
            invocation.operation(),
            error.full_description()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare {
        pointcut: Pointcut,
    }

    #[async_trait]
    impl Interceptor for Bare {
        fn name(&self) -> &str {
            "Bare"
        }

        fn pointcut(&self) -> &Pointcut {
            &self.pointcut
        }
    }

    #[tokio::test]
    async fn test_default_hooks_are_noops() {
        let bare = Bare {
            pointcut: Pointcut::All,
        };
        let invocation = Invocation::new("svc::op", vec![]);

        assert_eq!(bare.order(), 100);
        assert!(bare.before(&invocation).await.is_ok());
        assert!(bare.after(&invocation).await.is_ok());
    }

    #[test]
    fn test_builtin_configuration() {
        let logging = LoggingInterceptor::new(Pointcut::All).with_args().with_order(10);
        assert_eq!(logging.name(), "LoggingInterceptor");
        assert_eq!(logging.order(), 10);
        assert!(logging.log_args);

        let slow = SlowCallInterceptor::new(250, Pointcut::All);
        assert_eq!(slow.order(), 100);
        assert_eq!(slow.threshold_ms, 250);
    }
}
