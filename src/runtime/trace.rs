// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;

use super::call_site::CallType;
use super::value::Value;

/// A single thing the probe saw, in the order it happened.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// The factory body wrote `value` to the output stream.
    Emitted {
        seq: usize,
        /// The function whose call ran the factory body.
        caller: String,
        value: Value,
    },
    /// A receiver probe returned `value`.
    Receiver {
        seq: usize,
        call_type: CallType,
        value: Value,
    },
}

impl Observation {
    pub fn seq(&self) -> usize {
        match self {
            Observation::Emitted { seq, .. } | Observation::Receiver { seq, .. } => *seq,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Trace {
    observations: Vec<Observation>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_emitted(&mut self, caller: String, value: Value) {
        let seq = self.observations.len();
        self.observations.push(Observation::Emitted { seq, caller, value });
    }

    pub fn push_receiver(&mut self, call_type: CallType, value: Value) {
        let seq = self.observations.len();
        self.observations.push(Observation::Receiver { seq, call_type, value });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// The emitted values, in emission order.
    pub fn emitted(&self) -> impl Iterator<Item = &Value> + '_ {
        self.observations.iter().filter_map(|obs| match obs {
            Observation::Emitted { value, .. } => Some(value),
            _ => None,
        })
    }

    /// The emitted values whose factory call came from `caller`.
    pub fn emitted_by<'a>(&'a self, caller: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.observations.iter().filter_map(move |obs| match obs {
            Observation::Emitted { caller: c, value, .. } if c == caller => Some(value),
            _ => None,
        })
    }

    /// The receivers observed by probe calls of the given type.
    pub fn receivers(&self, call_type: CallType) -> impl Iterator<Item = &Value> + '_ {
        self.observations.iter().filter_map(move |obs| match obs {
            Observation::Receiver { call_type: t, value, .. } if *t == call_type => Some(value),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.observations)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequence_numbers_follow_insertion() {
        let mut trace = Trace::new();
        trace.push_receiver(CallType::Method, Value::Undefined);
        trace.push_emitted("<top>".to_owned(), Value::from(1));
        trace.push_emitted("closure#4".to_owned(), Value::from(1));
        let seqs: Vec<usize> = trace.iter().map(Observation::seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(trace.emitted().count(), 2);
        assert_eq!(trace.emitted_by("closure#4").count(), 1);
        assert_eq!(trace.receivers(CallType::Explicit).count(), 0);
    }

    #[test]
    fn json_is_tagged() {
        let mut trace = Trace::new();
        trace.push_emitted("<top>".to_owned(), Value::from(7));
        let json: serde_json::Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["kind"], "emitted");
        assert_eq!(json[0]["caller"], "<top>");
        assert_eq!(json[0]["value"]["repr"], "7");
    }
}
