// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{self, Write};

use super::call_site::CallForm;
use super::closure::{Closure, ClosureFactory, Invocable};
use super::receiver::{bind_receiver, probe};
use super::value::{FuncRef, ObjectRef, Value};
use super::ProbeContext;

/// The top-level value: `{ probe: { probe }, factory }`.
///
/// The probe sits inside a holder object so that a method call through the holder binds
/// the holder, not the aggregate, as its receiver. Members are fixed at construction.
#[derive(Clone, Debug)]
pub struct Aggregate {
    object: ObjectRef,
    holder: ObjectRef,
    probe: FuncRef,
    factory: ClosureFactory,
}

impl Aggregate {
    pub fn new<W: Write>(cx: &mut ProbeContext<W>) -> Self {
        let object = cx.new_object("aggregate");
        let holder = cx.new_object("probe");
        let probe = cx.new_function("probe");
        let factory = ClosureFactory::new(cx.new_function("factory"));
        Aggregate {
            object,
            holder,
            probe,
            factory,
        }
    }

    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    pub fn holder(&self) -> &ObjectRef {
        &self.holder
    }

    pub fn factory(&self) -> &ClosureFactory {
        &self.factory
    }

    /// Member lookup on the aggregate itself.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "probe" => Some(Value::Object(self.holder.clone())),
            "factory" => Some(Value::Function(self.factory.func().clone())),
            _ => None,
        }
    }

    /// Member lookup on the holder object.
    pub fn get_in_holder(&self, key: &str) -> Option<Value> {
        match key {
            "probe" => Some(Value::Function(self.probe.clone())),
            _ => None,
        }
    }

    /// Calls the probe with the given call form and returns the receiver it saw.
    pub fn call_probe<W: Write>(&self, cx: &mut ProbeContext<W>, form: CallForm) -> Value {
        let call_type = form.call_type();
        cx.enter(&self.probe, call_type);
        let receiver = probe(bind_receiver(&form));
        cx.observe_receiver(call_type, &receiver);
        cx.leave();
        receiver
    }

    /// `aggregate.probe.probe()`
    pub fn probe_implicit<W: Write>(&self, cx: &mut ProbeContext<W>) -> Value {
        let base = Value::Object(self.holder.clone());
        self.call_probe(cx, CallForm::Implicit { base })
    }

    /// `aggregate.probe.probe.call(receiver)`
    pub fn probe_explicit<W: Write>(&self, cx: &mut ProbeContext<W>, receiver: Value) -> Value {
        self.call_probe(cx, CallForm::Explicit { receiver })
    }

    /// `aggregate.factory(n)`
    pub fn call_factory<W: Write>(&self, cx: &mut ProbeContext<W>, n: Value) -> io::Result<Closure> {
        self.factory.invoke(cx, n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::runtime::call_site::CallType;
    use crate::runtime::receiver::ExecutionMode;

    #[test]
    fn members() {
        let mut cx = ProbeContext::new(ExecutionMode::Strict, Vec::new());
        let aggregate = Aggregate::new(&mut cx);
        assert_eq!(aggregate.get("probe"), Some(Value::Object(aggregate.holder().clone())));
        assert!(matches!(aggregate.get("factory"), Some(Value::Function(_))));
        assert!(matches!(aggregate.get_in_holder("probe"), Some(Value::Function(_))));
        assert_eq!(aggregate.get("missing"), None);
        assert_eq!(aggregate.get_in_holder("factory"), None);
        assert_ne!(aggregate.object(), aggregate.holder());
    }

    #[test]
    fn implicit_probe_sees_holder() {
        let mut cx = ProbeContext::new(ExecutionMode::Sloppy, Vec::new());
        let aggregate = Aggregate::new(&mut cx);
        let receiver = aggregate.probe_implicit(&mut cx);
        assert_eq!(receiver, Value::Object(aggregate.holder().clone()));
        assert_ne!(receiver, Value::Object(aggregate.object().clone()));
    }

    #[test]
    fn explicit_probe_sees_ambient_receiver() {
        for (mode, expected) in [
            (ExecutionMode::Strict, "undefined"),
            (ExecutionMode::Sloppy, "[object global]"),
            (ExecutionMode::Module, "[object exports]"),
        ] {
            let mut cx = ProbeContext::new(mode, Vec::new());
            let aggregate = Aggregate::new(&mut cx);
            let ambient = cx.realm().ambient_receiver();
            let receiver = aggregate.probe_explicit(&mut cx, ambient);
            assert_eq!(receiver.to_string(), expected);
            let implicit = aggregate.probe_implicit(&mut cx);
            assert_ne!(implicit, receiver);
            assert_eq!(cx.trace().receivers(CallType::Explicit).count(), 1);
            assert_eq!(cx.trace().receivers(CallType::Method).count(), 1);
        }
    }

    #[test]
    fn probes_emit_nothing() {
        let mut cx = ProbeContext::new(ExecutionMode::Strict, Vec::new());
        let aggregate = Aggregate::new(&mut cx);
        aggregate.probe_implicit(&mut cx);
        aggregate.probe_explicit(&mut cx, Value::Null);
        assert!(cx.into_output().is_empty());
    }
}
