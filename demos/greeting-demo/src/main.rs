//! 问候演示 - 拦截管道的外部调用方
//!
//! 两个不同 order 的拦截器共享同一个切点，包裹一个简单的问候服务；
//! 第二个操作故意抛错，演示失败沿钩子链向外传播

use std::sync::Arc;

use async_trait::async_trait;
use weave_intercept::prelude::*;

// ==================== 业务服务 ====================

/// 问候服务 - 被管道包裹的目标操作提供方
#[derive(Clone)]
struct GreetingService;

impl GreetingService {
    fn say_hello(&self, person: &str, phrase: &str) -> String {
        format!("{} {}!", phrase, person)
    }

    fn say_hello_throw_error(&self, _person: &str, _phrase: &str) -> anyhow::Result<String> {
        anyhow::bail!("some error happened!")
    }
}

// ==================== 拦截器 ====================

/// 问候日志拦截器（order 2）- 演示全部五种钩子
struct GreetingInterceptor {
    pointcut: Pointcut,
}

#[async_trait]
impl Interceptor for GreetingInterceptor {
    fn name(&self) -> &str {
        "GreetingInterceptor"
    }

    fn order(&self) -> i32 {
        2
    }

    fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    async fn before(&self, invocation: &Invocation) -> anyhow::Result<()> {
        tracing::info!(
            "Before: {} with {} args",
            invocation.operation(),
            invocation.args().len()
        );
        Ok(())
    }

    async fn after_returning(
        &self,
        invocation: &Invocation,
        result: &OpValue,
    ) -> anyhow::Result<()> {
        if let Some(greeting) = result.downcast_ref::<String>() {
            tracing::info!("AfterReturning: {} -> {}", invocation.operation(), greeting);
        }
        Ok(())
    }

    async fn after_throwing(
        &self,
        invocation: &Invocation,
        error: &ErrorInfo,
    ) -> anyhow::Result<()> {
        tracing::info!(
            "AfterThrowing: {} raised: {}",
            invocation.operation(),
            error.root_cause()
        );
        Ok(())
    }

    async fn after(&self, invocation: &Invocation) -> anyhow::Result<()> {
        tracing::info!("After: {} (took {:?})", invocation.operation(), invocation.elapsed());
        Ok(())
    }

    async fn around(&self, invocation: &Invocation, next: Next) -> InvokeResult {
        tracing::info!("Around entering: {}", invocation.operation());
        let result = next.proceed().await;
        match &result {
            Ok(_) => tracing::info!("Around returning: {}", invocation.operation()),
            Err(_) => tracing::error!("Around error in: {}", invocation.operation()),
        }
        result
    }
}

/// 外层问候拦截器（order 1）- 包裹其余所有拦截器
struct GreetingFooInterceptor {
    pointcut: Pointcut,
}

#[async_trait]
impl Interceptor for GreetingFooInterceptor {
    fn name(&self) -> &str {
        "GreetingFooInterceptor"
    }

    fn order(&self) -> i32 {
        1
    }

    fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    async fn before(&self, invocation: &Invocation) -> anyhow::Result<()> {
        tracing::info!("Before (Foo): {}", invocation.operation());
        Ok(())
    }

    async fn after(&self, invocation: &Invocation) -> anyhow::Result<()> {
        tracing::info!("After (Foo): {}", invocation.operation());
        Ok(())
    }
}

// ==================== 主程序 ====================

fn say_hello_target(service: Arc<GreetingService>) -> TargetFn {
    operation(move |invocation| {
        let service = service.clone();
        async move {
            let person = invocation
                .arg::<String>(0)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing person argument"))?;
            let phrase = invocation
                .arg::<String>(1)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing phrase argument"))?;
            Ok(op_value(service.say_hello(&person, &phrase)))
        }
    })
}

fn say_hello_throw_error_target(service: Arc<GreetingService>) -> TargetFn {
    operation(move |invocation| {
        let service = service.clone();
        async move {
            let person = invocation
                .arg::<String>(0)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing person argument"))?;
            let phrase = invocation
                .arg::<String>(1)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("missing phrase argument"))?;
            Ok(op_value(service.say_hello_throw_error(&person, &phrase)?))
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let registry = InterceptorRegistry::new();

    // 两个拦截器共享同一个切点值，order 决定包裹层级
    let pointcut = Pointcut::pattern("GreetingService::*");
    registry.register(Arc::new(GreetingFooInterceptor {
        pointcut: pointcut.clone(),
    }))?;
    registry.register(Arc::new(GreetingInterceptor { pointcut }))?;

    let service = Arc::new(GreetingService);

    // 正常问候
    let result = registry
        .invoke(
            "GreetingService::say_hello",
            vec![
                op_value("Daniel".to_string()),
                op_value("Hola que tal!".to_string()),
            ],
            say_hello_target(service.clone()),
        )
        .await?;

    if let Some(greeting) = result.downcast_ref::<String>() {
        println!("{}", serde_json::json!({ "greeting": greeting }));
    }

    // 故意失败的问候：所有匹配钩子观察失败后，原始错误到达调用方
    let failure = registry
        .invoke(
            "GreetingService::say_hello_throw_error",
            vec![
                op_value("Daniel".to_string()),
                op_value("Hola que tal!".to_string()),
            ],
            say_hello_throw_error_target(service),
        )
        .await;

    match failure {
        Ok(_) => println!("unexpected success"),
        Err(error) => {
            let info = ErrorInfo::from_intercept(&error);
            println!("error: {}", info.full_description());
        }
    }

    Ok(())
}
