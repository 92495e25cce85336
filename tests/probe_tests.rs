// Copyright (c) 2024 <Wei Li>.
//
// This source code is licensed under the GNU license found in the
// LICENSE file in the root directory of this source tree.
//
// End-to-end runs of the probe program against in-memory output.

use closure_probe::driver::{self, run_program};
use closure_probe::runtime::call_site::CallType;
use closure_probe::runtime::receiver::ExecutionMode;
use closure_probe::runtime::value::Value;
use closure_probe::runtime::{ProbeContext, TOP_LEVEL};
use closure_probe::util::options::ProbeOptions;

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out).unwrap().lines().map(str::to_owned).collect()
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("closure-probe-{}-{}", std::process::id(), name))
}

#[test]
fn literal_program_emits_captured_value_four_times() {
    let cx = driver::run(&ProbeOptions::default(), Vec::new()).unwrap();
    assert_eq!(cx.trace().emitted_by(TOP_LEVEL).count(), 1);
    assert_eq!(lines(cx.into_output()), vec!["1", "1", "1", "1"]);
}

#[test]
fn factory_only_emits_once() {
    let options = ProbeOptions {
        factory_only: true,
        capture: Value::from(7),
        ..ProbeOptions::default()
    };
    let cx = driver::run(&options, Vec::new()).unwrap();
    assert_eq!(cx.call_graph().edge_count_of(CallType::Closure), 0);
    assert_eq!(cx.trace().receivers(CallType::Method).count(), 0);
    assert_eq!(lines(cx.into_output()), vec!["7"]);
}

#[test]
fn statement_order_is_preserved() {
    let mut cx = ProbeContext::new(ExecutionMode::Sloppy, Vec::new());
    let args = [Value::from("a"), Value::Null, Value::from(3)];
    let f = run_program(&mut cx, Value::from("x"), &args).unwrap();

    let kinds: Vec<String> = cx
        .trace()
        .iter()
        .map(|obs| serde_json::to_value(obs).unwrap()["kind"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(
        kinds,
        vec!["receiver", "receiver", "emitted", "emitted", "emitted", "emitted"]
    );
    let callers: Vec<String> = cx
        .trace()
        .iter()
        .filter_map(|obs| serde_json::to_value(obs).unwrap()["caller"].as_str().map(str::to_owned))
        .collect();
    let closure = f.func().to_string();
    assert_eq!(callers, vec![TOP_LEVEL.to_owned(), closure.clone(), closure.clone(), closure]);

    let top = cx.top_level().id;
    let callees: Vec<String> = cx
        .call_graph()
        .get_callees(top)
        .iter()
        .map(|func| func.to_string())
        .collect();
    let closure = f.func().to_string();
    let closure = closure.as_str();
    assert_eq!(callees, vec!["probe", "probe", "factory", closure, closure, closure]);
    assert_eq!(lines(cx.into_output()), vec!["x", "x", "x", "x"]);
}

#[test]
fn receivers_per_mode() {
    for (mode, explicit) in [
        (ExecutionMode::Strict, "undefined"),
        (ExecutionMode::Sloppy, "[object global]"),
        (ExecutionMode::Module, "[object exports]"),
    ] {
        let options = ProbeOptions {
            mode,
            ..ProbeOptions::default()
        };
        let cx = driver::run(&options, Vec::new()).unwrap();
        let implicit: Vec<String> =
            cx.trace().receivers(CallType::Method).map(|v| v.to_string()).collect();
        let explicit_seen: Vec<String> =
            cx.trace().receivers(CallType::Explicit).map(|v| v.to_string()).collect();
        assert_eq!(implicit, vec!["[object probe]"]);
        assert_eq!(explicit_seen, vec![explicit]);
        assert_ne!(implicit, explicit_seen);
    }
}

#[test]
fn empty_argument_list_runs_factory_only_once() {
    let mut cx = ProbeContext::new(ExecutionMode::Strict, Vec::new());
    run_program(&mut cx, Value::from(2), &[]).unwrap();
    assert_eq!(lines(cx.into_output()), vec!["2"]);
}

#[test]
fn dumps_trace_and_call_graph() {
    let trace_path = temp_path("trace.json");
    let dot_path = temp_path("calls.dot");
    let options = ProbeOptions {
        trace_output: Some(trace_path.to_string_lossy().into_owned()),
        call_graph_output: Some(dot_path.to_string_lossy().into_owned()),
        ..ProbeOptions::default()
    };
    driver::run(&options, Vec::new()).unwrap();

    let trace: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&trace_path).unwrap()).unwrap();
    let observations = trace.as_array().unwrap();
    assert_eq!(observations.len(), 6);
    assert_eq!(observations[1]["call_type"], "explicit");
    assert_eq!(observations[1]["value"]["kind"], "undefined");
    assert_eq!(observations[5]["value"]["repr"], "1");

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.starts_with("digraph calls {"));
    assert!(dot.contains("method"));
    assert!(dot.contains("explicit"));

    let _ = std::fs::remove_file(trace_path);
    let _ = std::fs::remove_file(dot_path);
}

#[test]
fn unwritable_dump_is_an_error() {
    let options = ProbeOptions {
        call_graph_output: Some(
            temp_path("missing-dir").join("calls.dot").to_string_lossy().into_owned(),
        ),
        ..ProbeOptions::default()
    };
    let err = driver::run(&options, Vec::new()).err().unwrap();
    assert!(format!("{:#}", err).contains("Failed to write dot file output"));
}
