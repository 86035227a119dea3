//! 调用链组装与执行
//!
//! 将匹配的拦截器按序组装成洋葱结构，最内层是目标操作。
//! 链从右向左构建：每一层把剩余链作为继续执行句柄交给环绕钩子

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{HookKind, InterceptError, InvokeResult};
use crate::error_info::ErrorInfo;
use crate::interceptor::Interceptor;
use crate::invocation::{Invocation, OpValue};

/// 目标操作
///
/// 使用 Fn 而非 FnOnce：环绕钩子可以零次或多次触发继续执行
pub type TargetFn =
    Arc<dyn Fn(Arc<Invocation>) -> BoxFuture<'static, anyhow::Result<OpValue>> + Send + Sync>;

/// 将异步闭包适配为 TargetFn
pub fn operation<F, Fut>(f: F) -> TargetFn
where
    F: Fn(Arc<Invocation>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<OpValue>> + Send + 'static,
{
    Arc::new(move |invocation| f(invocation).boxed())
}

/// 环绕钩子的继续执行句柄
///
/// 持有剩余链的游标。proceed 可以被调用零次、一次或多次，
/// 每次都重新执行游标之后的整条剩余链
#[derive(Clone)]
pub struct Next {
    invocation: Arc<Invocation>,
    interceptors: Arc<[Arc<dyn Interceptor>]>,
    cursor: usize,
    target: TargetFn,
}

impl Next {
    pub(crate) fn new(
        invocation: Arc<Invocation>,
        interceptors: Arc<[Arc<dyn Interceptor>]>,
        target: TargetFn,
    ) -> Self {
        Self {
            invocation,
            interceptors,
            cursor: 0,
            target,
        }
    }

    /// 获取调用快照
    pub fn invocation(&self) -> &Arc<Invocation> {
        &self.invocation
    }

    /// 继续执行剩余链
    ///
    /// 游标处还有拦截器时进入下一层，否则执行目标操作；
    /// 目标失败被归类为 TargetFailed，原始错误挂在 source 链上
    pub fn proceed(&self) -> BoxFuture<'_, InvokeResult> {
        async move {
            match self.interceptors.get(self.cursor) {
                Some(interceptor) => {
                    let rest = Next {
                        invocation: self.invocation.clone(),
                        interceptors: self.interceptors.clone(),
                        cursor: self.cursor + 1,
                        target: self.target.clone(),
                    };
                    run_layer(interceptor.clone(), self.invocation.clone(), rest).await
                }
                None => (self.target)(self.invocation.clone()).await.map_err(|source| {
                    InterceptError::TargetFailed {
                        operation: self.invocation.operation().to_string(),
                        source,
                    }
                }),
            }
        }
        .boxed()
    }
}

/// 执行洋葱的一层
///
/// before → around（默认落到继续执行）→ 结果钩子 → after。
/// before 失败时目标不得执行，本层自己的结果钩子一并跳过；
/// 结果钩子失败会取代在途结果，after 在两条路径上都最后执行
async fn run_layer(
    interceptor: Arc<dyn Interceptor>,
    invocation: Arc<Invocation>,
    next: Next,
) -> InvokeResult {
    let name = interceptor.name().to_string();

    if let Err(source) = interceptor.before(&invocation).await {
        return Err(InterceptError::HookFailed {
            interceptor: name,
            hook: HookKind::Before,
            source,
        });
    }

    let outcome = interceptor.around(&invocation, next).await;

    let mut outcome = match outcome {
        Ok(result) => match interceptor.after_returning(&invocation, &result).await {
            Ok(()) => Ok(result),
            Err(source) => Err(InterceptError::HookFailed {
                interceptor: name.clone(),
                hook: HookKind::AfterReturning,
                source,
            }),
        },
        Err(error) => {
            let info = ErrorInfo::from_intercept(&error);
            match interceptor.after_throwing(&invocation, &info).await {
                Ok(()) => Err(error),
                Err(source) => Err(InterceptError::HookFailed {
                    interceptor: name.clone(),
                    hook: HookKind::AfterThrowing,
                    source,
                }),
            }
        }
    };

    if let Err(source) = interceptor.after(&invocation).await {
        outcome = Err(InterceptError::HookFailed {
            interceptor: name,
            hook: HookKind::After,
            source,
        });
    }

    outcome
}
