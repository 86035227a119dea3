//! 调用快照（Invocation）
//!
//! 每次 invoke 创建一个独立快照，调用返回或失败后随之丢弃

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// 类型擦除的参数/结果值
pub type OpValue = Arc<dyn Any + Send + Sync>;

/// 将任意值装箱为 OpValue
pub fn op_value<T: Any + Send + Sync>(value: T) -> OpValue {
    Arc::new(value)
}

/// 一次管道执行的上下文快照
///
/// 操作标识与参数在整个调用期间只读；attributes 是拦截器之间的
/// 可变旁路通道，作用域限于本次调用
pub struct Invocation {
    /// 操作标识
    operation: String,

    /// 有序参数列表
    args: Vec<OpValue>,

    /// 调用时间戳
    timestamp: Instant,

    /// 拦截器间元数据旁路
    attributes: Mutex<HashMap<String, OpValue>>,
}

impl Invocation {
    /// 创建新的调用快照
    pub fn new(operation: impl Into<String>, args: Vec<OpValue>) -> Self {
        Self {
            operation: operation.into(),
            args,
            timestamp: Instant::now(),
            attributes: Mutex::new(HashMap::new()),
        }
    }

    /// 获取操作标识
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// 获取参数列表
    pub fn args(&self) -> &[OpValue] {
        &self.args
    }

    /// 尝试按类型获取第 idx 个参数
    pub fn arg<T: Any + Send + Sync>(&self, idx: usize) -> Option<&T> {
        self.args.get(idx)?.downcast_ref::<T>()
    }

    /// 调用开始以来经过的时间
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// 写入旁路属性
    pub fn set_attribute(&self, key: impl Into<String>, value: OpValue) {
        self.attributes.lock().insert(key.into(), value);
    }

    /// 按类型读取旁路属性
    pub fn attribute<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.attributes.lock().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// 移除旁路属性并返回
    pub fn remove_attribute(&self, key: &str) -> Option<OpValue> {
        self.attributes.lock().remove(key)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("operation", &self.operation)
            .field("args", &self.args.len())
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_args() {
        let invocation = Invocation::new(
            "GreetingService::say_hello",
            vec![op_value("Daniel".to_string()), op_value(42_u32)],
        );

        assert_eq!(invocation.operation(), "GreetingService::say_hello");
        assert_eq!(invocation.args().len(), 2);
        assert_eq!(invocation.arg::<String>(0).map(String::as_str), Some("Daniel"));
        assert_eq!(invocation.arg::<u32>(1), Some(&42));

        // 类型不符或越界返回 None
        assert!(invocation.arg::<u32>(0).is_none());
        assert!(invocation.arg::<String>(5).is_none());
    }

    #[test]
    fn test_attribute_side_channel() {
        let invocation = Invocation::new("svc::op", vec![]);

        assert!(invocation.attribute::<String>("trace_id").is_none());

        invocation.set_attribute("trace_id", op_value("t-001".to_string()));
        let seen = invocation.attribute::<String>("trace_id");
        assert_eq!(seen.as_deref().map(String::as_str), Some("t-001"));

        assert!(invocation.remove_attribute("trace_id").is_some());
        assert!(invocation.attribute::<String>("trace_id").is_none());
    }
}
