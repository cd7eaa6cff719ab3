//! User-level lock functions
//!
//! `GET_LOCK`, `IS_FREE_LOCK`, `IS_USED_LOCK`, `RELEASE_LOCK` and
//! `RELEASE_ALL_LOCKS`, each bound to a shared [`LockSubsystem`]. They act on
//! the calling connection, so they are registered in the full catalog but
//! never allowed in column defaults.

use crate::catalog::function::FunctionDescriptor;
use crate::common::error::PrismDBResult;
use crate::execution::{ExecutionContext, LockSubsystem, ReleaseOutcome};
use crate::expression::utils::{evaluate_all, join_display};
use crate::expression::{check_children_count, Expression, ExpressionRef};
use crate::types::{LogicalType, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockFunctionKind {
    GetLock,
    IsFreeLock,
    IsUsedLock,
    ReleaseLock,
    ReleaseAllLocks,
}

impl LockFunctionKind {
    pub fn name(&self) -> &'static str {
        match self {
            LockFunctionKind::GetLock => "GET_LOCK",
            LockFunctionKind::IsFreeLock => "IS_FREE_LOCK",
            LockFunctionKind::IsUsedLock => "IS_USED_LOCK",
            LockFunctionKind::ReleaseLock => "RELEASE_LOCK",
            LockFunctionKind::ReleaseAllLocks => "RELEASE_ALL_LOCKS",
        }
    }
}

/// A call to one of the lock functions
#[derive(Debug, Clone)]
pub struct LockFunction {
    kind: LockFunctionKind,
    locks: Arc<LockSubsystem>,
    arguments: Vec<ExpressionRef>,
}

impl LockFunction {
    pub fn new(
        kind: LockFunctionKind,
        locks: Arc<LockSubsystem>,
        arguments: Vec<ExpressionRef>,
    ) -> Self {
        Self {
            kind,
            locks,
            arguments,
        }
    }

    pub fn kind(&self) -> LockFunctionKind {
        self.kind
    }
}

/// GET_LOCK timeout in seconds; a negative timeout waits forever
fn lock_timeout(value: &Value) -> PrismDBResult<Option<Duration>> {
    let seconds = match value {
        Value::Null => 0.0,
        v => v.try_as_f64()?,
    };
    if seconds < 0.0 {
        return Ok(None);
    }
    Ok(Some(Duration::from_secs_f64(seconds.min(u32::MAX as f64))))
}

fn flag(b: bool) -> Value {
    Value::Integer(b as i32)
}

impl fmt::Display for LockFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.name(), join_display(&self.arguments))
    }
}

impl Expression for LockFunction {
    fn return_type(&self) -> LogicalType {
        match self.kind {
            LockFunctionKind::IsUsedLock | LockFunctionKind::ReleaseAllLocks => LogicalType::BigInt,
            _ => LogicalType::Integer,
        }
    }

    fn is_nullable(&self) -> bool {
        self.kind != LockFunctionKind::ReleaseAllLocks
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<ExpressionRef> {
        self.arguments.clone()
    }

    fn with_children(&self, children: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        check_children_count(self, children.len(), self.arguments.len())?;
        Ok(Arc::new(Self::new(self.kind, Arc::clone(&self.locks), children)))
    }

    fn evaluate(&self, ctx: &ExecutionContext, row: &[Value]) -> PrismDBResult<Value> {
        let values = evaluate_all(&self.arguments, ctx, row)?;

        if self.kind == LockFunctionKind::ReleaseAllLocks {
            return Ok(Value::BigInt(self.locks.release_all(ctx) as i64));
        }

        let name = match values.first() {
            None | Some(Value::Null) => return Ok(Value::Null),
            Some(v) => v.to_plain_string(),
        };

        match self.kind {
            LockFunctionKind::GetLock => {
                let timeout = lock_timeout(values.get(1).unwrap_or(&Value::Null))?;
                Ok(flag(self.locks.lock(ctx, &name, timeout)?))
            }
            LockFunctionKind::IsFreeLock => Ok(flag(self.locks.is_free(&name)?)),
            LockFunctionKind::IsUsedLock => Ok(self
                .locks
                .owner(&name)?
                .map_or(Value::Null, |id| Value::BigInt(id as i64))),
            LockFunctionKind::ReleaseLock => Ok(match self.locks.unlock(ctx, &name)? {
                ReleaseOutcome::Released => flag(true),
                ReleaseOutcome::NotOwned => flag(false),
                ReleaseOutcome::NotFound => Value::Null,
            }),
            LockFunctionKind::ReleaseAllLocks => {
                Ok(Value::BigInt(self.locks.release_all(ctx) as i64))
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Lock functions bound to `locks`
pub fn locking_functions(locks: Arc<LockSubsystem>) -> Vec<FunctionDescriptor> {
    use LockFunctionKind::*;

    let get = Arc::clone(&locks);
    let is_free = Arc::clone(&locks);
    let is_used = Arc::clone(&locks);
    let release = Arc::clone(&locks);
    let release_all = locks;

    vec![
        FunctionDescriptor::binary(GetLock.name(), move |name, timeout| {
            Ok(Arc::new(LockFunction::new(GetLock, Arc::clone(&get), vec![name, timeout]))
                as ExpressionRef)
        }),
        FunctionDescriptor::unary(IsFreeLock.name(), move |name| {
            Ok(Arc::new(LockFunction::new(IsFreeLock, Arc::clone(&is_free), vec![name]))
                as ExpressionRef)
        }),
        FunctionDescriptor::unary(IsUsedLock.name(), move |name| {
            Ok(Arc::new(LockFunction::new(IsUsedLock, Arc::clone(&is_used), vec![name]))
                as ExpressionRef)
        }),
        FunctionDescriptor::unary(ReleaseLock.name(), move |name| {
            Ok(Arc::new(LockFunction::new(ReleaseLock, Arc::clone(&release), vec![name]))
                as ExpressionRef)
        }),
        FunctionDescriptor::nullary(ReleaseAllLocks.name(), move || {
            Ok(Arc::new(LockFunction::new(
                ReleaseAllLocks,
                Arc::clone(&release_all),
                vec![],
            )) as ExpressionRef)
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::function::FunctionRegistry;
    use crate::expression::LiteralExpression;

    fn lit(value: Value) -> ExpressionRef {
        Arc::new(LiteralExpression::new(value))
    }

    fn call(
        registry: &FunctionRegistry,
        ctx: &ExecutionContext,
        name: &str,
        args: Vec<ExpressionRef>,
    ) -> PrismDBResult<Value> {
        registry.lookup(name)?.call(args)?.evaluate(ctx, &[])
    }

    #[test]
    fn test_lock_functions_share_one_subsystem() -> PrismDBResult<()> {
        let locks = Arc::new(LockSubsystem::new());
        let registry = FunctionRegistry::with_functions(locking_functions(Arc::clone(&locks)))?;
        let a = ExecutionContext::new(1, "a");
        let b = ExecutionContext::new(2, "b");
        let name = || lit(Value::varchar("job"));

        assert_eq!(
            call(&registry, &a, "get_lock", vec![name(), lit(Value::Integer(0))])?,
            Value::Integer(1)
        );
        assert_eq!(call(&registry, &b, "is_free_lock", vec![name()])?, Value::Integer(0));
        assert_eq!(call(&registry, &b, "is_used_lock", vec![name()])?, Value::BigInt(1));
        assert_eq!(
            call(&registry, &b, "get_lock", vec![name(), lit(Value::Double(0.01))])?,
            Value::Integer(0)
        );
        assert_eq!(call(&registry, &b, "release_lock", vec![name()])?, Value::Integer(0));
        assert_eq!(call(&registry, &a, "release_all_locks", vec![])?, Value::BigInt(1));
        assert_eq!(call(&registry, &a, "release_lock", vec![name()])?, Value::Null);
        assert!(locks.is_empty());
        Ok(())
    }

    #[test]
    fn test_display_and_nulls() -> PrismDBResult<()> {
        let locks = Arc::new(LockSubsystem::new());
        let registry = FunctionRegistry::with_functions(locking_functions(locks))?;
        let node = registry
            .lookup("GET_LOCK")?
            .call(vec![lit(Value::varchar("x")), lit(Value::Integer(10))])?;
        assert_eq!(node.to_string(), "GET_LOCK('x', 10)");
        assert!(!node.is_deterministic());

        let ctx = ExecutionContext::empty();
        assert_eq!(call(&registry, &ctx, "is_free_lock", vec![lit(Value::Null)])?, Value::Null);
        assert!(registry.lookup("get_lock")?.call(vec![lit(Value::Null)]).is_err());
        Ok(())
    }
}
