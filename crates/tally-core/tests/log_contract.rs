//! Log capture contract: cache state at construction, resolution at debug, unresolved answers at warn.

use std::sync::{Arc, Mutex};
use tally_core::config::EvaluatorConfig;
use tally_core::providers::backend::FakeBackend;
use tally_core::AnswerEvaluator;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MockWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl MockWriter {
    fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }
}

fn setup_capture(filter: &str) -> (MockWriter, tracing::subscriber::DefaultGuard) {
    let writer = MockWriter {
        buf: Arc::new(Mutex::new(Vec::new())),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_env_filter(EnvFilter::new(filter))
        .json()
        .finish();
    (writer, tracing::subscriber::set_default(subscriber))
}

/// Messages of all captured JSON log lines.
fn messages(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|l| serde_json::from_str::<serde_json::Value>(l).ok())
        .filter_map(|v| v["fields"]["message"].as_str().map(String::from))
        .collect()
}

fn strings(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|s| s.to_string()).collect()
}

#[test]
fn construction_reports_cache_state() {
    let (writer, _guard) = setup_capture("info");
    let tmp = tempfile::tempdir().unwrap();

    AnswerEvaluator::new(EvaluatorConfig::new("fake"), FakeBackend::<str>::new("fake"), None).unwrap();
    AnswerEvaluator::new(
        EvaluatorConfig::new("fake").with_cache(tmp.path()),
        FakeBackend::<str>::new("fake"),
        None,
    )
    .unwrap();

    let msgs = messages(&writer.contents());
    assert!(msgs.contains(&"model cache is disabled".to_string()), "{msgs:?}");
    assert!(msgs.contains(&"model cache is enabled".to_string()), "{msgs:?}");
}

#[test]
fn unresolved_answer_warns() {
    let (writer, _guard) = setup_capture("warn");
    let ev = AnswerEvaluator::new(
        EvaluatorConfig::new("fake"),
        FakeBackend::<str>::new("fake").with_response("no idea"),
        None,
    )
    .unwrap();
    ev.multiple_choice_qa("img", "Q", &strings(&["cat", "dog"]), None, None)
        .unwrap();

    let out = writer.contents();
    assert_eq!(messages(&out), vec!["answer did not resolve to any choice".to_string()]);
    assert!(out.contains("\"level\":\"WARN\""));
}

#[test]
fn resolving_strategy_logged_at_debug() {
    let (writer, _guard) = setup_capture("tally_core=debug");
    let tmp = tempfile::tempdir().unwrap();
    let ev = AnswerEvaluator::new(
        EvaluatorConfig::new("fake").with_cache(tmp.path()),
        FakeBackend::<str>::new("fake").with_response("B"),
        None,
    )
    .unwrap();
    let choices = strings(&["cat", "dog"]);
    ev.multiple_choice_qa("img", "Q", &choices, None, None).unwrap();
    ev.multiple_choice_qa("img", "Q", &choices, None, None).unwrap();

    let out = writer.contents();
    let msgs = messages(&out);
    assert!(msgs.contains(&"cache miss".to_string()));
    assert!(msgs.contains(&"cache hit".to_string()));
    assert!(msgs.contains(&"answer resolved".to_string()));
    assert!(out.contains("\"strategy\":\"label\""));
}
