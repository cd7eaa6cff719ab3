//! Function Management
//!
//! Name-keyed registry of function builders. A builder turns already
//! resolved argument expressions into a function expression node. Names
//! are matched case-insensitively.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::expression::ExpressionRef;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type NullaryBuilder = Arc<dyn Fn() -> PrismDBResult<ExpressionRef> + Send + Sync>;
pub type UnaryBuilder = Arc<dyn Fn(ExpressionRef) -> PrismDBResult<ExpressionRef> + Send + Sync>;
pub type BinaryBuilder =
    Arc<dyn Fn(ExpressionRef, ExpressionRef) -> PrismDBResult<ExpressionRef> + Send + Sync>;
pub type TernaryBuilder = Arc<
    dyn Fn(ExpressionRef, ExpressionRef, ExpressionRef) -> PrismDBResult<ExpressionRef>
        + Send
        + Sync,
>;
pub type VariadicBuilder =
    Arc<dyn Fn(Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> + Send + Sync>;

/// Builder shape; determines the arity class of the function
#[derive(Clone)]
pub enum FunctionBuilder {
    Nullary(NullaryBuilder),
    Unary(UnaryBuilder),
    Binary(BinaryBuilder),
    Ternary(TernaryBuilder),
    Variadic(VariadicBuilder),
}

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic => write!(f, "N"),
        }
    }
}

/// A named function builder
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    builder: FunctionBuilder,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, builder: FunctionBuilder) -> Self {
        Self {
            name: name.into(),
            builder,
        }
    }

    pub fn nullary<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> PrismDBResult<ExpressionRef> + Send + Sync + 'static,
    {
        Self::new(name, FunctionBuilder::Nullary(Arc::new(f)))
    }

    pub fn unary<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ExpressionRef) -> PrismDBResult<ExpressionRef> + Send + Sync + 'static,
    {
        Self::new(name, FunctionBuilder::Unary(Arc::new(f)))
    }

    pub fn binary<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ExpressionRef, ExpressionRef) -> PrismDBResult<ExpressionRef> + Send + Sync + 'static,
    {
        Self::new(name, FunctionBuilder::Binary(Arc::new(f)))
    }

    pub fn ternary<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(ExpressionRef, ExpressionRef, ExpressionRef) -> PrismDBResult<ExpressionRef>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, FunctionBuilder::Ternary(Arc::new(f)))
    }

    pub fn variadic<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> + Send + Sync + 'static,
    {
        Self::new(name, FunctionBuilder::Variadic(Arc::new(f)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn builder(&self) -> &FunctionBuilder {
        &self.builder
    }

    pub fn arity(&self) -> Arity {
        match self.builder {
            FunctionBuilder::Nullary(_) => Arity::Fixed(0),
            FunctionBuilder::Unary(_) => Arity::Fixed(1),
            FunctionBuilder::Binary(_) => Arity::Fixed(2),
            FunctionBuilder::Ternary(_) => Arity::Fixed(3),
            FunctionBuilder::Variadic(_) => Arity::Variadic,
        }
    }

    /// Build the function node from resolved arguments.
    ///
    /// Fixed-arity functions require exactly their argument count. Variadic
    /// builders receive every argument and validate the count themselves.
    pub fn call(&self, arguments: Vec<ExpressionRef>) -> PrismDBResult<ExpressionRef> {
        if let Arity::Fixed(expected) = self.arity() {
            if arguments.len() != expected {
                return Err(PrismDBError::InvalidArgumentNumber {
                    name: self.name.clone(),
                    expected,
                    given: arguments.len(),
                });
            }
        }

        let mut args = arguments.into_iter();
        match (&self.builder, args.next(), args.next(), args.next()) {
            (FunctionBuilder::Nullary(f), None, None, None) => f(),
            (FunctionBuilder::Unary(f), Some(a), None, None) => f(a),
            (FunctionBuilder::Binary(f), Some(a), Some(b), None) => f(a, b),
            (FunctionBuilder::Ternary(f), Some(a), Some(b), Some(c)) => f(a, b, c),
            (FunctionBuilder::Variadic(f), first, second, third) => {
                let all: Vec<ExpressionRef> =
                    first.into_iter().chain(second).chain(third).chain(args).collect();
                f(all)
            }
            _ => Err(crate::internal_err!(
                "argument count checked but builder shape for '{}' did not match",
                self.name
            )),
        }
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish()
    }
}

/// Function registry for managing functions
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDescriptor>,
}

impl FunctionRegistry {
    /// Create a new, empty function registry
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Create a registry holding `functions`
    pub fn with_functions(functions: Vec<FunctionDescriptor>) -> PrismDBResult<Self> {
        let mut registry = Self::new();
        registry.register(functions)?;
        Ok(registry)
    }

    fn normalize(name: &str) -> String {
        name.to_lowercase()
    }

    /// Register a batch of functions.
    ///
    /// Fails with `DuplicateFunction` if any name collides with an existing
    /// entry or with another entry of the batch; nothing is inserted then.
    pub fn register(&mut self, functions: Vec<FunctionDescriptor>) -> PrismDBResult<()> {
        let mut batch_names = HashSet::with_capacity(functions.len());
        for function in &functions {
            let key = Self::normalize(function.name());
            if self.functions.contains_key(&key) || !batch_names.insert(key) {
                return Err(PrismDBError::DuplicateFunction(function.name().to_string()));
            }
        }

        let count = functions.len();
        for function in functions {
            self.functions.insert(Self::normalize(function.name()), function);
        }
        debug!(count, total = self.functions.len(), "registered functions");
        Ok(())
    }

    /// Register a single function
    pub fn register_function(&mut self, function: FunctionDescriptor) -> PrismDBResult<()> {
        self.register(vec![function])
    }

    /// Lookup a function by name
    pub fn lookup(&self, name: &str) -> PrismDBResult<&FunctionDescriptor> {
        self.get(name)
            .ok_or_else(|| PrismDBError::FunctionNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(&Self::normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&Self::normalize(name))
    }

    /// List all function names, sorted
    pub fn list_functions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get function count
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
