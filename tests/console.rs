//! Console session lifecycle: echo, finalization, and idempotent close.

#![cfg(unix)]

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use scribepad::services::console::ConsoleManager;
use scribepad::services::pipeline::{self, RunningProcess};
use scribepad::services::runner::{CommandSpec, RunPlan};
use scribepad::{ChannelSink, UiEvent};

fn launch(program: &str, args: &[&str]) -> RunningProcess {
    let plan = RunPlan {
        language: "Python",
        compile: None,
        run: CommandSpec {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        },
        cwd: std::env::temp_dir(),
    };
    pipeline::execute(&plan).expect("launch should succeed")
}

fn wait_for<F>(rx: &Receiver<UiEvent>, mut pred: F) -> Vec<UiEvent>
where
    F: FnMut(&UiEvent) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = Vec::new();
    while Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok(event) => {
                let done = pred(&event);
                seen.push(event);
                if done {
                    return seen;
                }
            }
            Err(_) => continue,
        }
    }
    panic!("timed out waiting for event; saw {seen:?}");
}

#[test]
fn send_forwards_stdin_and_echoes_exactly_once() {
    let (sink, rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    let id = consoles.open("cat", launch("cat", &[]));

    consoles.send(id, "hello").unwrap();

    // cat reads the forwarded line and writes it back, so the line shows
    // up twice: once as our echo ("hello\n") and once as process output.
    let events = wait_for(&rx, |e| {
        matches!(e, UiEvent::ConsoleOutput { chunk, .. } if chunk != "hello\n" && chunk.contains("hello"))
    });
    let echoes = events
        .iter()
        .filter(|e| matches!(e, UiEvent::ConsoleOutput { chunk, .. } if chunk == "hello\n"))
        .count();
    assert_eq!(echoes, 1, "exactly one echo append; events: {events:?}");

    consoles.close(id);
    assert!(!consoles.is_open(id));
}

#[test]
fn console_is_announced_before_any_of_its_output() {
    let (sink, rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    // A process that prints immediately: its first chunk can be ready
    // before open() even returns.
    let id = consoles.open("fast", launch("sh", &["-c", "printf early"]));

    let events = wait_for(&rx, |e| matches!(e, UiEvent::ConsoleFinished { .. }));
    assert!(
        matches!(events.first(), Some(UiEvent::ConsoleOpened { console, .. }) if *console == id),
        "first event must announce the console; events: {events:?}"
    );
    let output: String = events
        .iter()
        .filter_map(|e| match e {
            UiEvent::ConsoleOutput { chunk, .. } => Some(chunk.clone()),
            _ => None,
        })
        .collect();
    assert!(output.contains("early"));
}

#[test]
fn close_is_not_blocked_by_a_stalled_writer() {
    let (sink, _rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    let id = consoles.open("stall", launch("sh", &["-c", "sleep 30"]));

    // The child never reads its terminal, so a large enough line fills
    // the kernel buffer and parks the writing thread.
    let flood = "x".repeat(1 << 20);
    let sender = {
        let consoles = Arc::clone(&consoles);
        thread::spawn(move || {
            let _ = consoles.send(id, &flood);
        })
    };
    thread::sleep(Duration::from_millis(200));

    // Killing the session must not wait for the stalled write.
    consoles.close(id);
    assert!(!consoles.is_open(id));
    // The kill tears the stream down, which unparks the writer.
    sender.join().unwrap();
}

#[test]
fn natural_exit_appends_one_finalization_line_with_the_exit_code() {
    let (sink, rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    let id = consoles.open("exit7", launch("sh", &["-c", "exit 7"]));

    let events = wait_for(&rx, |e| matches!(e, UiEvent::ConsoleFinished { .. }));
    assert!(matches!(
        events.last(),
        Some(UiEvent::ConsoleFinished { exit_code: 7, .. })
    ));
    let finalizations = events
        .iter()
        .filter(|e| {
            matches!(e, UiEvent::ConsoleOutput { chunk, .. }
                if chunk.contains("[Process finished with exit code 7]"))
        })
        .count();
    assert_eq!(finalizations, 1);

    // Input is disabled after exit: sends are accepted but do nothing.
    consoles.send(id, "too late").unwrap();
    assert!(rx.try_recv().is_err(), "no echo after process exit");
}

#[test]
fn close_kills_a_live_process_and_is_idempotent() {
    let (sink, _rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    let id = consoles.open("sleeper", launch("sh", &["-c", "sleep 30"]));
    assert!(consoles.is_open(id));

    consoles.close(id);
    assert!(!consoles.is_open(id));
    // Closing again, or closing an id that never existed, is safe.
    consoles.close(id);
    consoles.close(9999);

    // The killed session is gone; later sends are no-ops.
    consoles.send(id, "anyone there").unwrap();
}

#[test]
fn sessions_own_their_processes_independently() {
    let (sink, rx) = ChannelSink::new();
    let consoles = ConsoleManager::new(sink);
    let long = consoles.open("long", launch("sh", &["-c", "sleep 30"]));
    let short = consoles.open("short", launch("sh", &["-c", "exit 0"]));
    assert_ne!(long, short);

    let events = wait_for(&rx, |e| {
        matches!(e, UiEvent::ConsoleFinished { console, .. } if *console == short)
    });
    // The long-running session must be untouched by its sibling's exit.
    assert!(consoles.is_open(long));
    assert!(!events
        .iter()
        .any(|e| matches!(e, UiEvent::ConsoleFinished { console, .. } if *console == long)));
    consoles.close(long);
}
