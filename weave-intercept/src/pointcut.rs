//! 切点（Pointcut）匹配规则
//!
//! 决定拦截器适用于哪些操作。针对操作标识字符串求值，
//! 例如 "GreetingService::say_hello"

use std::sync::Arc;

use regex::Regex;

/// 适用性判定
///
/// 同一个 Pointcut 值可以被多个不同 order 的拦截器共享
#[derive(Clone)]
pub enum Pointcut {
    /// 匹配所有操作
    All,

    /// 精确匹配操作标识
    Exact(String),

    /// 通配符模式，* 匹配任意字符串，构造时编译为正则
    Pattern { pattern: String, regex: Regex },

    /// 正则匹配
    Regex(Regex),

    /// 自定义判定函数
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),

    /// 与运算（AND）
    And(Box<Pointcut>, Box<Pointcut>),

    /// 或运算（OR）
    Or(Box<Pointcut>, Box<Pointcut>),

    /// 非运算（NOT）
    Not(Box<Pointcut>),
}

impl Pointcut {
    /// 创建精确匹配切点
    pub fn exact(operation: impl Into<String>) -> Self {
        Pointcut::Exact(operation.into())
    }

    /// 创建通配符模式切点
    ///
    /// 支持的模式：
    /// - `*` - 匹配任意操作
    /// - `GreetingService::*` - 该服务的所有操作
    /// - `*::say_hello` - 任意服务的 say_hello
    pub fn pattern(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let escaped = regex::escape(&pattern).replace(r"\*", ".*");

        match Regex::new(&format!("^{}$", escaped)) {
            Ok(regex) => Pointcut::Pattern { pattern, regex },
            // 转义后的模式总是合法正则；万一失败退化为精确匹配
            Err(_) => Pointcut::Exact(pattern),
        }
    }

    /// 创建自定义判定切点
    pub fn custom(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Pointcut::Custom(Arc::new(predicate))
    }

    /// 检查操作标识是否匹配
    pub fn matches(&self, operation: &str) -> bool {
        match self {
            Pointcut::All => true,

            Pointcut::Exact(literal) => literal == operation,

            Pointcut::Pattern { regex, .. } => regex.is_match(operation),

            Pointcut::Regex(regex) => regex.is_match(operation),

            Pointcut::Custom(predicate) => predicate(operation),

            Pointcut::And(left, right) => left.matches(operation) && right.matches(operation),

            Pointcut::Or(left, right) => left.matches(operation) || right.matches(operation),

            Pointcut::Not(inner) => !inner.matches(operation),
        }
    }

    /// 保守的重叠判断，用于注册期的重名检查
    ///
    /// Exact 切点只匹配单个字面量，与任意对端的重叠可以精确判定；
    /// 其余组合一律按可能重叠处理
    pub fn may_overlap(&self, other: &Pointcut) -> bool {
        match (self, other) {
            (Pointcut::Exact(a), Pointcut::Exact(b)) => a == b,
            (Pointcut::Exact(literal), candidate) | (candidate, Pointcut::Exact(literal)) => {
                candidate.matches(literal)
            }
            _ => true,
        }
    }

    /// 与运算
    pub fn and(self, other: Pointcut) -> Self {
        Pointcut::And(Box::new(self), Box::new(other))
    }

    /// 或运算
    pub fn or(self, other: Pointcut) -> Self {
        Pointcut::Or(Box::new(self), Box::new(other))
    }

    /// 非运算
    pub fn not(self) -> Self {
        Pointcut::Not(Box::new(self))
    }
}

impl std::fmt::Debug for Pointcut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pointcut::All => write!(f, "All"),
            Pointcut::Exact(literal) => write!(f, "Exact({})", literal),
            Pointcut::Pattern { pattern, .. } => write!(f, "Pattern({})", pattern),
            Pointcut::Regex(_) => write!(f, "Regex(...)"),
            Pointcut::Custom(_) => write!(f, "Custom(...)"),
            Pointcut::And(l, r) => write!(f, "And({:?}, {:?})", l, r),
            Pointcut::Or(l, r) => write!(f, "Or({:?}, {:?})", l, r),
            Pointcut::Not(e) => write!(f, "Not({:?})", e),
        }
    }
}
