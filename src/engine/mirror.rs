//! Secondary, non-authoritative text mirror
//!
//! After a record is durable in the binary log, the engine may hand it to a
//! `SecondaryWriter`. The bundled `TextMirror` appends `"<id>: <payload>"`
//! lines to `T/T.txt` from a single background worker.
//!
//! A secondary writer never touches the checkpoint or the binary log, and
//! its failures never fail `produce`; they are logged and dropped.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::observability::{log_event_with_fields, Event};

/// One record handed to a secondary writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEntry {
    /// Destination file
    pub path: PathBuf,
    /// Record id
    pub id: u32,
    /// Record payload
    pub payload: Vec<u8>,
}

/// A best-effort consumer of produced records.
pub trait SecondaryWriter: Send {
    /// Queue a record. Must not block on I/O.
    fn submit(&self, entry: MirrorEntry);

    /// Block until every previously submitted record has been handled.
    fn flush(&self);
}

enum Command {
    Write(MirrorEntry),
    Flush(Sender<()>),
}

/// Single-worker text mirror.
///
/// Dropping the mirror closes the queue and waits for the worker to drain it.
pub struct TextMirror {
    sender: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl TextMirror {
    /// Start the worker thread
    pub fn spawn() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("kafkalite-mirror".to_string())
            .spawn(move || run(receiver))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    fn send(&self, command: Command) -> bool {
        match &self.sender {
            Some(sender) => sender.send(command).is_ok(),
            None => false,
        }
    }
}

impl SecondaryWriter for TextMirror {
    fn submit(&self, entry: MirrorEntry) {
        let id = entry.id;
        if !self.send(Command::Write(entry)) {
            let id = id.to_string();
            log_event_with_fields(
                Event::MirrorWriteFailed,
                &[("id", &id), ("reason", "mirror worker stopped")],
            );
        }
    }

    fn flush(&self) {
        let (ack_tx, ack_rx) = mpsc::channel();
        if self.send(Command::Flush(ack_tx)) {
            // The worker answers once everything queued ahead has been written.
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for TextMirror {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run(receiver: Receiver<Command>) {
    for command in receiver {
        match command {
            Command::Write(entry) => {
                if let Err(e) = write_line(&entry) {
                    let id = entry.id.to_string();
                    let path = entry.path.display().to_string();
                    let reason = e.to_string();
                    log_event_with_fields(
                        Event::MirrorWriteFailed,
                        &[("id", &id), ("path", &path), ("reason", &reason)],
                    );
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

fn write_line(entry: &MirrorEntry) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&entry.path)?;
    file.write_all(render_line(entry.id, &entry.payload).as_bytes())
}

/// Render one mirror line; embedded newlines are escaped so each record
/// stays on one line.
pub fn render_line(id: u32, payload: &[u8]) -> String {
    let text = String::from_utf8_lossy(payload);
    let mut line = String::with_capacity(text.len() + 12);
    line.push_str(&id.to_string());
    line.push_str(": ");
    for c in text.chars() {
        match c {
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            c => line.push(c),
        }
    }
    line.push('\n');
    line
}
