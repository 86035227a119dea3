//! 拦截器注册表
//!
//! 持有有序的拦截器集合，组装并执行调用链

use std::sync::Arc;

use parking_lot::RwLock;

use crate::chain::{Next, TargetFn};
use crate::error::{InterceptError, InterceptResult, InvokeResult};
use crate::interceptor::Interceptor;
use crate::invocation::{Invocation, OpValue};

/// 拦截器注册表（拦截管道）
///
/// 注册/注销受读写锁保护；invoke 在读锁下取一致快照后立即释放锁，
/// 在途调用不受并发注册/注销影响
pub struct InterceptorRegistry {
    interceptors: RwLock<Vec<Arc<dyn Interceptor>>>,
}

impl InterceptorRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            interceptors: RwLock::new(Vec::new()),
        }
    }

    /// 注册拦截器
    ///
    /// 与已注册的同名拦截器切点可能重叠时拒绝，注册表保持原状。
    /// 列表始终按 order 升序稳定排序，相同 order 保持注册顺序
    pub fn register(&self, interceptor: Arc<dyn Interceptor>) -> InterceptResult<()> {
        let mut interceptors = self.interceptors.write();

        let duplicate = interceptors.iter().any(|existing| {
            existing.name() == interceptor.name()
                && existing.pointcut().may_overlap(interceptor.pointcut())
        });
        if duplicate {
            return Err(InterceptError::DuplicateName(interceptor.name().to_string()));
        }

        tracing::debug!(
            "Registering interceptor: {} (order {})",
            interceptor.name(),
            interceptor.order()
        );
        interceptors.push(interceptor);
        interceptors.sort_by_key(|i| i.order());
        Ok(())
    }

    /// 批量注册拦截器
    pub fn register_all(
        &self,
        interceptors: impl IntoIterator<Item = Arc<dyn Interceptor>>,
    ) -> InterceptResult<()> {
        for interceptor in interceptors {
            self.register(interceptor)?;
        }
        Ok(())
    }

    /// 注销拦截器
    pub fn unregister(&self, name: &str) -> InterceptResult<()> {
        let mut interceptors = self.interceptors.write();
        let before_len = interceptors.len();
        interceptors.retain(|i| i.name() != name);
        if interceptors.len() == before_len {
            return Err(InterceptError::NotFound(name.to_string()));
        }
        tracing::debug!("Unregistered interceptor: {}", name);
        Ok(())
    }

    /// 获取匹配指定操作的有序拦截器快照
    pub fn matching(&self, operation: &str) -> Vec<Arc<dyn Interceptor>> {
        self.interceptors
            .read()
            .iter()
            .filter(|i| i.pointcut().matches(operation))
            .cloned()
            .collect()
    }

    /// 执行带拦截的操作调用
    ///
    /// 匹配的拦截器按 order 升序包裹目标，外层先进后出；
    /// 每次调用构建独立的 Invocation 快照，互不共享可变状态。
    /// 除非环绕钩子另有决定，目标恰好执行一次
    pub async fn invoke(
        &self,
        operation: impl Into<String>,
        args: Vec<OpValue>,
        target: TargetFn,
    ) -> InvokeResult {
        let operation = operation.into();
        let matched: Arc<[Arc<dyn Interceptor>]> = self.matching(&operation).into();

        tracing::trace!(
            operation = %operation,
            interceptors = matched.len(),
            "Invoking through interception pipeline"
        );

        let invocation = Arc::new(Invocation::new(operation, args));
        let chain = Next::new(invocation, matched, target);
        chain.proceed().await
    }

    /// 获取注册的拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.read().len()
    }

    /// 检查是否没有注册任何拦截器
    pub fn is_empty(&self) -> bool {
        self.interceptors.read().is_empty()
    }

    /// 清除所有拦截器
    pub fn clear(&self) {
        self.interceptors.write().clear();
    }
}

impl Default for InterceptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
