//! Weave Intercept - 有序方法拦截管道
//!
//! 提供类似 Spring AOP 运行时语义的函数包裹式拦截能力，支持：
//! - 多拦截器按 order 洋葱式嵌套包裹目标操作
//! - 多种钩子（Before、After、AfterReturning、AfterThrowing、Around）
//! - 针对操作标识的切点匹配
//! - 环绕钩子短路、替换结果或重试
//! - 动态注册/注销，调用期读取一致快照
//!
//! 没有代理对象，也没有运行时反射：管道在调用时把匹配的拦截器
//! 组装成一条普通的继续执行链
//!
//! ## 使用示例
//!
//! ```ignore
//! use weave_intercept::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = InterceptorRegistry::new();
//! registry.register(Arc::new(LoggingInterceptor::new(Pointcut::pattern("GreetingService::*"))))?;
//!
//! let result = registry
//!     .invoke(
//!         "GreetingService::say_hello",
//!         vec![op_value("Daniel".to_string())],
//!         operation(|invocation| async move {
//!             let person = invocation.arg::<String>(0).cloned().unwrap_or_default();
//!             Ok(op_value(format!("Hola {}!", person)))
//!         }),
//!     )
//!     .await?;
//! ```

pub mod chain;
pub mod error;
pub mod error_info;
pub mod interceptor;
pub mod invocation;
pub mod pointcut;
pub mod registry;

// 重新导出核心类型
pub use chain::{operation, Next, TargetFn};
pub use error::{HookKind, InterceptError, InterceptResult, InvokeResult};
pub use error_info::ErrorInfo;
pub use interceptor::{
    ErrorLoggingInterceptor, Interceptor, LoggingInterceptor, SlowCallInterceptor,
};
pub use invocation::{op_value, Invocation, OpValue};
pub use pointcut::Pointcut;
pub use registry::InterceptorRegistry;

/// 预导入模块
pub mod prelude {
    pub use crate::chain::{operation, Next, TargetFn};
    pub use crate::error::{HookKind, InterceptError, InterceptResult, InvokeResult};
    pub use crate::error_info::ErrorInfo;
    pub use crate::interceptor::*;
    pub use crate::invocation::{op_value, Invocation, OpValue};
    pub use crate::pointcut::Pointcut;
    pub use crate::registry::InterceptorRegistry;
}
