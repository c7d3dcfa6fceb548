use std::rc::Rc;

use crate::runner::context::EvalContext;
use crate::runner::ds::error::ErrorType;
use crate::runner::ds::value::Value;

/// Signature of built-in methods: evaluation context, receiver, arguments.
pub type NativeFn =
    fn(ctx: &mut EvalContext, this: Value, args: Vec<Value>) -> Result<Value, ErrorType>;

pub type ClosureFn = dyn Fn(&mut EvalContext, Value, Vec<Value>) -> Result<Value, ErrorType>;

/// Callable body of a method trait, constructor, or accessor half.
#[derive(Clone)]
pub enum MethodFn {
    /// Direct function pointer for built-ins.
    Native(NativeFn),
    /// Host closure supplied with a class definition.
    Closure(Rc<ClosureFn>),
}
impl MethodFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut EvalContext, Value, Vec<Value>) -> Result<Value, ErrorType> + 'static,
    {
        MethodFn::Closure(Rc::new(f))
    }

    pub fn call(
        &self,
        ctx: &mut EvalContext,
        this: Value,
        args: Vec<Value>,
    ) -> Result<Value, ErrorType> {
        match self {
            MethodFn::Native(f) => f(ctx, this, args),
            MethodFn::Closure(f) => f(ctx, this, args),
        }
    }
}
impl PartialEq for MethodFn {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MethodFn::Native(a), MethodFn::Native(b)) => *a as usize == *b as usize,
            (MethodFn::Closure(a), MethodFn::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A method closed over its receiver, produced by reading a method trait.
#[derive(Clone, PartialEq)]
pub struct BoundMethod {
    this: Value,
    method: MethodFn,
}
impl BoundMethod {
    pub fn new(this: Value, method: MethodFn) -> Self {
        BoundMethod { this, method }
    }

    pub fn this(&self) -> &Value {
        &self.this
    }

    pub fn call(&self, ctx: &mut EvalContext, args: Vec<Value>) -> Result<Value, ErrorType> {
        self.method.call(ctx, self.this.clone(), args)
    }
}

pub type FunctionRef = Rc<BoundMethod>;
