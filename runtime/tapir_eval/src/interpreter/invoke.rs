//! Calling convention.
//!
//! # General path
//!
//! A callable of arity N takes the threaded left value (if any) as its
//! first argument and pulls the rest from the tape, one expression each,
//! left to right. Operator references pull concrete values; prefix and pipe
//! references pull limited expressions. If the tape runs out first, the
//! result is a partial application holding what was gathered. Once all N
//! are in hand a native receives them in five positional slots (void past
//! N) and a function binds them in a fresh frame.
//!
//! # Fast path
//!
//! [`Interpreter::fast_call`] serves natives that call back into user code
//! with concrete arguments. There is no tape to pull from: natives are
//! invoked directly with the five slots as given, and functions or partial
//! applications take what they need from them.

use smallvec::SmallVec;
use tapir_value::{
    fill_args, Args, Callee, ControlFlags, Cursor, CurriedCaller, FunctionValue, NativeOp, Value,
    MAX_ARITY,
};

use super::dispatch::Threading;
use super::Interpreter;
use crate::call_stack::FrameKind;

/// Arguments gathered so far for one call.
pub(crate) type ArgBuf = SmallVec<[Value; MAX_ARITY]>;

impl Interpreter {
    /// Gather arguments for `callee` and call it, or produce a partial
    /// application if the tape ends first.
    pub(crate) fn call_callee(
        &mut self,
        callee: Callee,
        mut args: ArgBuf,
        left: Option<Value>,
        threading: Threading,
    ) {
        let arity = callee.arity();
        if let Some(left) = left {
            if args.len() < arity {
                args.push(left);
            }
        }
        while args.len() < arity {
            if self.cursor.at_end() {
                tracing::trace!(supplied = args.len(), arity, "partial application");
                self.result = Value::curried(CurriedCaller::new(callee, args));
                return;
            }
            match threading {
                Threading::Op => tapir_stack::ensure_sufficient_stack(|| self.eval_concrete()),
                Threading::Prefix | Threading::Pipe => self.eval_expression(true),
            }
            if self.flags.halts() {
                return;
            }
            args.push(std::mem::take(&mut self.result));
        }
        self.apply(&callee, args);
    }

    /// Continue a partial application with arguments from the tape.
    pub(crate) fn call_curried(
        &mut self,
        curried: &CurriedCaller,
        left: Option<Value>,
        threading: Threading,
    ) {
        let args = curried.args().iter().cloned().collect();
        self.call_callee(curried.callee().clone(), args, left, threading);
    }

    /// Call with every argument in hand.
    fn apply(&mut self, callee: &Callee, args: ArgBuf) {
        match callee {
            Callee::Native(op) => self.invoke_native(op, fill_args(args)),
            Callee::Function(func) => self.apply_function(func, args),
        }
    }

    /// Call if `args` satisfies the arity, otherwise curry.
    fn apply_or_curry(&mut self, callee: &Callee, args: ArgBuf) {
        if args.len() < callee.arity() {
            self.result = Value::curried(CurriedCaller::new(callee.clone(), args));
        } else {
            self.apply(callee, args);
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(native = op.name(), arity = op.arity()))]
    fn invoke_native(&mut self, op: &NativeOp, args: Args) {
        self.result = op.invoke(self, args);
    }

    /// Run a function body in a fresh frame with the parameters bound and
    /// the first argument injected. `return` stops at this boundary.
    #[tracing::instrument(level = "trace", skip_all, fields(arity = func.arity()))]
    fn apply_function(&mut self, func: &FunctionValue, args: ArgBuf) {
        let captured = func.context().is_some();
        let frame = func.context().unwrap_or(&self.ctx).frame();
        for (&param, arg) in func.params().iter().zip(args.iter()) {
            frame.modify(param, arg.clone());
        }
        let inject = args.into_iter().next();
        let body = func.body().cursor();
        self.with_frame(FrameKind::Function, |this| {
            this.with_tape_and_context(body, frame, |this| {
                if captured {
                    this.run_series(inject);
                } else {
                    // Parent is whoever called
                    this.without_rewrite(|this| this.run_series(inject));
                }
            });
        });
        self.flags.remove(ControlFlags::RETURN);
    }

    /// Fast path for natives calling back into user code.
    ///
    /// Non-callable values come back unchanged.
    pub(crate) fn fast_call(&mut self, callee: &Value, args: Args) -> Value {
        self.flags.remove(ControlFlags::FAILURE);
        let ctx = self.ctx.clone();
        self.with_frame(FrameKind::Callback, |this| {
            this.with_tape_and_context(Cursor::empty(), ctx, |this| match callee {
                Value::Native(op) => this.invoke_native(op, args),
                Value::Function(func) => {
                    let args = args.into_iter().take(func.arity()).collect();
                    this.apply_or_curry(&Callee::Function(func.clone()), args);
                }
                Value::Curried(curried) => {
                    let args = curried
                        .args()
                        .iter()
                        .cloned()
                        .chain(args.into_iter().take(curried.remaining()))
                        .collect();
                    this.apply_or_curry(curried.callee(), args);
                }
                other => this.result = other.clone(),
            });
        });
        self.result.clone()
    }
}
