// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::value::Value;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
/// The type of a call graph edge
pub enum CallType {
    // Method calls whose receiver is the object the callee was read from
    Method,
    // Calls whose receiver is supplied explicitly by the caller
    Explicit,
    // Plain calls of the factory
    Direct,
    // Invocations of a closure produced by the factory
    Closure,
}

impl CallType {
    pub fn all() -> [CallType; 4] {
        [CallType::Method, CallType::Explicit, CallType::Direct, CallType::Closure]
    }
}

impl Display for CallType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallType::Method => "method",
            CallType::Explicit => "explicit",
            CallType::Direct => "direct",
            CallType::Closure => "closure",
        };
        f.write_str(name)
    }
}

/// A call site is identified by its position in the program's statement sequence.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct CallSite {
    pub seq: usize,
    pub call_type: CallType,
}

impl CallSite {
    pub fn new(seq: usize, call_type: CallType) -> Self {
        CallSite { seq, call_type }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seq, self.call_type)
    }
}

/// How a receiver-taking function is called.
#[derive(Clone, Debug, PartialEq)]
pub enum CallForm {
    /// `base.f()`: the receiver is `base`.
    Implicit { base: Value },
    /// `f.call(receiver)`: the receiver is whatever the caller passes.
    Explicit { receiver: Value },
}

impl CallForm {
    pub fn call_type(&self) -> CallType {
        match self {
            CallForm::Implicit { .. } => CallType::Method,
            CallForm::Explicit { .. } => CallType::Explicit,
        }
    }
}
