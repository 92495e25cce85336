// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! The closure factory and the closures it produces.
//!
//! A closure is an explicit record of the value it captured. Invoking it ignores the
//! argument and runs the factory again with the captured value, so every invocation of
//! one closure instance emits the same value.

use log::*;
use std::io::{self, Write};

use super::call_site::CallType;
use super::value::{FuncRef, Value};
use super::ProbeContext;

/// Anything that can be called with one argument and produces a closure.
pub trait Invocable {
    fn invoke<W: Write>(&self, cx: &mut ProbeContext<W>, arg: Value) -> io::Result<Closure>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClosureFactory {
    func: FuncRef,
}

impl ClosureFactory {
    pub fn new(func: FuncRef) -> Self {
        ClosureFactory { func }
    }

    pub fn func(&self) -> &FuncRef {
        &self.func
    }

    /// The factory body: emit `n`, then close over it.
    fn body<W: Write>(&self, cx: &mut ProbeContext<W>, n: Value) -> io::Result<Closure> {
        cx.emit(&n)?;
        let func = cx.new_closure_function();
        debug!("{} captured {}", func, n);
        Ok(Closure {
            func,
            captured: n,
            factory: self.clone(),
        })
    }
}

impl Invocable for ClosureFactory {
    fn invoke<W: Write>(&self, cx: &mut ProbeContext<W>, n: Value) -> io::Result<Closure> {
        cx.enter(&self.func, CallType::Direct);
        let result = self.body(cx, n);
        cx.leave();
        result
    }
}

/// A function value produced by [`ClosureFactory`], holding its captured argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Closure {
    func: FuncRef,
    captured: Value,
    factory: ClosureFactory,
}

impl Closure {
    pub fn func(&self) -> &FuncRef {
        &self.func
    }

    pub fn captured(&self) -> &Value {
        &self.captured
    }
}

impl Invocable for Closure {
    fn invoke<W: Write>(&self, cx: &mut ProbeContext<W>, arg: Value) -> io::Result<Closure> {
        cx.enter(&self.func, CallType::Closure);
        trace!("{} ignores its argument {}", self.func, arg);
        let result = self.factory.invoke(cx, self.captured.clone());
        cx.leave();
        result
    }
}
