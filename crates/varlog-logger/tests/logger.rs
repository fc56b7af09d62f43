//! Tests for logger families: admission, shared levels, and output formats

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::Value;
use varlog_logger::{Attr, HandlerKind, LevelError, Logger, Severity, attr};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture
{
    fn output(&self) -> String
    {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }

    fn lines(&self) -> Vec<String>
    {
        self.output().lines().map(str::to_string).collect()
    }

    fn records(&self) -> Vec<Value>
    {
        self.lines().iter().map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    fn clear(&self)
    {
        self.0.lock().unwrap().clear();
    }
}

impl io::Write for Capture
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>
    {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()>
    {
        Ok(())
    }
}

fn json_logger(level: Severity) -> (Logger, Capture)
{
    let capture = Capture::default();
    let logger = Logger::with_level(capture.clone(), HandlerKind::Json, level);
    (logger, capture)
}

#[test]
fn test_admission_matrix()
{
    for threshold in Severity::ALL {
        let (logger, capture) = json_logger(threshold);

        for record in Severity::ALL {
            logger.log(record, record.as_str(), &[]);
        }

        let written: Vec<String> =
            capture.records().iter().map(|r| r["msg"].as_str().unwrap().to_string()).collect();
        let expected: Vec<String> =
            Severity::ALL.iter().filter(|record| **record <= threshold).map(|r| r.as_str().to_string()).collect();
        assert_eq!(written, expected, "threshold {threshold}");
    }
}

#[test]
fn test_error_always_admitted_debug_only_at_debug()
{
    let (logger, capture) = json_logger(Severity::Error);
    logger.error("e");
    logger.warn("w");
    assert_eq!(capture.records().len(), 1);

    capture.clear();
    logger.set_level(Severity::Info);
    logger.debug("d");
    assert!(capture.output().is_empty());

    logger.set_level(Severity::Debug);
    logger.debug("d");
    assert_eq!(capture.records()[0]["level"], "DEBUG");
}

#[test]
fn test_level_change_is_shared_across_family()
{
    let (root, capture) = json_logger(Severity::Error);
    let a = root.with([attr("subsystem", "a")]);
    let b = root.with_group("b").with([attr("id", 2)]);

    a.set_level(Severity::Debug);
    b.debug("b sees debug");
    assert_eq!(capture.records().len(), 1);

    b.set_level(Severity::Error);
    capture.clear();
    a.info("a suppressed");
    root.warn("root suppressed");
    assert!(capture.output().is_empty());
    assert_eq!(root.level(), Severity::Error);
}

#[test]
fn test_handles_derived_before_a_change_observe_it()
{
    let (root, capture) = json_logger(Severity::Error);
    let early = root.with([attr("created", "early")]);

    root.set_level_by_counter(3);

    early.debug("now visible");
    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["created"], "early");
}

#[test]
fn test_set_level_by_name_through_handle()
{
    let (root, _capture) = json_logger(Severity::Info);
    let child = root.with_group("child");

    assert_eq!(child.set_level_by_name("ERROR"), Ok(Severity::Error));
    assert_eq!(root.level(), Severity::Error);

    child.set_level_by_name("Warning").unwrap();
    assert_eq!(root.level(), Severity::Warn);

    root.set_level_by_name("debug").unwrap();
    assert_eq!(child.level(), Severity::Debug);

    let before = root.level();
    assert_eq!(
        child.set_level_by_name("verbose"),
        Err(LevelError::InvalidLevelName("verbose".to_string()))
    );
    assert_eq!(root.level(), before);
}

#[test]
fn test_set_level_by_counter_through_handle()
{
    let (root, _capture) = json_logger(Severity::Info);
    let cases = [
        (-5, Severity::Error),
        (0, Severity::Error),
        (1, Severity::Warn),
        (2, Severity::Info),
        (3, Severity::Debug),
        (100, Severity::Debug),
    ];

    for (count, expected) in cases {
        assert_eq!(root.set_level_by_counter(count), expected);
        assert_eq!(root.level(), expected);
    }
}

#[test]
fn test_set_level_twice_matches_once()
{
    let (once, once_out) = json_logger(Severity::Debug);
    let (twice, twice_out) = json_logger(Severity::Debug);

    once.set_level(Severity::Warn);
    twice.set_level(Severity::Warn);
    twice.set_level(Severity::Warn);

    for logger in [&once, &twice] {
        for record in Severity::ALL {
            logger.log(record, "m", &[]);
        }
    }

    assert_eq!(once_out.records().len(), 2);
    assert_eq!(twice_out.records().len(), 2);
}

#[test]
fn test_unknown_handler_name_falls_back_to_json()
{
    let capture = Capture::default();
    let logger = Logger::from_handler_name(capture.clone(), "bogus");

    assert_eq!(logger.handler(), HandlerKind::Json);
    logger.info("still usable");

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "still usable");
}

#[test]
fn test_known_handler_name_is_used()
{
    let logger = Logger::from_handler_name(io::sink(), "text");
    assert_eq!(logger.handler(), HandlerKind::Text);
}

#[test]
fn test_capitalised_handler_name_falls_back_to_json()
{
    for name in ["Text", "JSON"] {
        let capture = Capture::default();
        let logger = Logger::from_handler_name(capture.clone(), name);

        assert_eq!(logger.handler(), HandlerKind::Json);
        logger.warn("fallback");
        assert_eq!(capture.records()[0]["msg"], "fallback");
    }
}

#[test]
fn test_json_nests_attrs_under_groups()
{
    let (root, capture) = json_logger(Severity::Info);
    let logger = root.with([attr("service", "api")]).with_group("request").with([attr("id", 42)]);

    logger.log(Severity::Info, "handled", &[attr("status", 200), Attr::group("timing", [attr("ms", 12.5)])]);

    let records = capture.records();
    let record = &records[0];
    assert_eq!(record["msg"], "handled");
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["service"], "api");
    assert_eq!(record["request"]["id"], 42);
    assert_eq!(record["request"]["status"], 200);
    assert_eq!(record["request"]["timing"]["ms"], 12.5);
}

#[test]
fn test_json_bound_attrs_do_not_replace_message_or_level()
{
    let (root, capture) = json_logger(Severity::Info);
    root.with([attr("msg", "bound"), attr("level", "x")]).info("hello");
    root.log(Severity::Warn, "record", &[attr("time", "late")]);

    let records = capture.records();
    assert_eq!(records[0]["msg"], "hello");
    assert_eq!(records[0]["level"], "INFO");
    assert_eq!(records[0]["attrs.msg"], "bound");
    assert_eq!(records[0]["attrs.level"], "x");
    assert_eq!(records[1]["level"], "WARN");
    assert_ne!(records[1]["time"], "late");
    assert_eq!(records[1]["attrs.time"], "late");
}

#[test]
fn test_json_omits_empty_groups()
{
    let (root, capture) = json_logger(Severity::Info);
    root.with_group("empty").info("no attrs");

    let records = capture.records();
    let record = &records[0];
    assert!(record.get("empty").is_none());
    assert!(record.get("attrs").is_none());
}

#[test]
fn test_record_attrs_are_not_bound()
{
    let (root, capture) = json_logger(Severity::Info);
    root.log(Severity::Info, "first", &[attr("once", true)]);
    root.info("second");

    let records = capture.records();
    assert_eq!(records[0]["once"], true);
    assert!(records[1].get("once").is_none());
}

#[test]
fn test_text_output_uses_dotted_keys()
{
    let capture = Capture::default();
    let root = Logger::new(capture.clone(), HandlerKind::Text);
    let logger = root.with([attr("user", "alice")]).with_group("req").with([attr("id", 7)]);

    logger.warn("slow request");
    logger.debug("suppressed");

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("WARN"), "{}", lines[0]);
    assert!(lines[0].contains("slow request user=alice req.id=7"), "{}", lines[0]);
    assert!(!lines[0].contains('\u{1b}'), "text output must not contain ANSI escapes");
}

#[test]
fn test_console_output_contains_message_and_attrs()
{
    let capture = Capture::default();
    let logger = Logger::new(capture.clone(), HandlerKind::Console).with([attr("port", 8080)]);

    logger.info("listening");

    let output = capture.output();
    assert!(output.contains("listening"), "{output}");
    assert!(output.contains("port=8080"), "{output}");
}

#[test]
fn test_console_without_ansi_writes_plain_text()
{
    let plain = Capture::default();
    Logger::without_ansi(plain.clone(), HandlerKind::Console, Severity::Info).warn("plain");
    let output = plain.output();
    assert!(output.contains("plain"), "{output}");
    assert!(!output.contains('\u{1b}'), "{output:?}");

    let coloured = Capture::default();
    Logger::with_level(coloured.clone(), HandlerKind::Console, Severity::Info).warn("coloured");
    assert!(coloured.output().contains('\u{1b}'), "{:?}", coloured.output());
}

#[test]
fn test_concurrent_level_changes_while_logging()
{
    let (root, capture) = json_logger(Severity::Error);

    let emitters: Vec<_> = (0..4)
        .map(|i| {
            let logger = root.with([attr("worker", i)]);
            thread::spawn(move || {
                for _ in 0..200 {
                    logger.error("always");
                    logger.debug("sometimes");
                }
            })
        })
        .collect();

    let togglers: Vec<_> = [Severity::Debug, Severity::Error]
        .into_iter()
        .map(|severity| {
            let logger = root.with_group("toggle");
            thread::spawn(move || {
                for _ in 0..200 {
                    logger.set_level(severity);
                }
            })
        })
        .collect();

    for handle in emitters.into_iter().chain(togglers) {
        handle.join().unwrap();
    }

    let records = capture.records();
    let errors = records.iter().filter(|r| r["level"] == "ERROR").count();
    assert_eq!(errors, 800);
    assert!(records.iter().all(|r| r["level"] == "ERROR" || r["level"] == "DEBUG"));
    assert!(Severity::ALL.contains(&root.level()));
}
