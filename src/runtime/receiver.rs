// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

//! Receiver binding.
//!
//! There is no implicitly bound receiver: every function that needs one takes it as an
//! explicit first parameter, and the caller computes it from the call form with
//! [`bind_receiver`]. The only context-dependent piece is the ambient top-level receiver,
//! which is fixed by the configured [`ExecutionMode`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use super::call_site::CallForm;
use super::value::{ObjectRef, Value};

/// The host execution mode, which decides the ambient top-level receiver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Strict code: the ambient receiver is `undefined`.
    Strict,
    /// Loose top-level script: the ambient receiver is the global object.
    Sloppy,
    /// Module wrapper: the ambient receiver is the module's export object.
    Module,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Strict
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ExecutionMode::Strict),
            "sloppy" | "script" => Ok(ExecutionMode::Sloppy),
            "module" => Ok(ExecutionMode::Module),
            _ => Err(format!("unknown execution mode `{s}`")),
        }
    }
}

impl Display for ExecutionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionMode::Strict => "strict",
            ExecutionMode::Sloppy => "sloppy",
            ExecutionMode::Module => "module",
        };
        f.write_str(name)
    }
}

/// The outermost execution context: its mode and the objects an ambient receiver may be.
#[derive(Clone, Debug)]
pub struct Realm {
    mode: ExecutionMode,
    global: ObjectRef,
    exports: ObjectRef,
}

impl Realm {
    pub fn new(mode: ExecutionMode, global: ObjectRef, exports: ObjectRef) -> Self {
        Realm { mode, global, exports }
    }

    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn global(&self) -> &ObjectRef {
        &self.global
    }

    pub fn exports(&self) -> &ObjectRef {
        &self.exports
    }

    /// Returns the receiver the top level passes when it forwards its own.
    pub fn ambient_receiver(&self) -> Value {
        match self.mode {
            ExecutionMode::Strict => Value::Undefined,
            ExecutionMode::Sloppy => Value::Object(self.global.clone()),
            ExecutionMode::Module => Value::Object(self.exports.clone()),
        }
    }
}

/// Computes the receiver a call form passes to its callee.
pub fn bind_receiver(form: &CallForm) -> Value {
    match form {
        CallForm::Implicit { base } => base.clone(),
        CallForm::Explicit { receiver } => receiver.clone(),
    }
}

/// The receiver probe: returns the receiver it is given.
#[inline]
pub fn probe(receiver: Value) -> Value {
    receiver
}
