//! Unix-socket [`EventSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Event`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Key":{"key_code":71,"phase":"Down","modifiers":{"control":true,"option":true},"timestamp_ms":1200}}
//! {"Snap":{"ScreenHalf":"Left"}}
//! {"Snap":"FullScreen"}
//! ```
//!
//! Every `Key` event is answered on the same connection with one line
//! holding its [`Disposition`], `"Consume"` or `"PassThrough"`, so the input
//! tap on the other end knows whether to swallow the OS event.  A key whose
//! key-down was consumed also has its key-up consumed, whatever modifiers
//! are still held by then.  `Snap` events get no reply.
//!
//! When a connection that sent key events closes, the listener forwards
//! [`Event::Disconnected`] so held keys are not left stuck.

use crate::keys::{Disposition, KeyCodeSet, TapFilter};
use crate::traits::{Event, EventSource};
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// An [`EventSource`] that listens on a Unix stream socket for
/// JSON-encoded events.
///
/// Each accepted connection can send multiple newline-delimited events.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
    key_codes: KeyCodeSet,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether the listener should keep serving after a connection ends.
enum Flow {
    Continue,
    SinkClosed,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`, decoding key codes with
    /// `key_codes`.
    ///
    /// The socket file is created when [`run`](EventSource::run) is called.
    pub fn new(path: impl AsRef<Path>, key_codes: KeyCodeSet) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key_codes,
        }
    }

    fn serve(&self, stream: UnixStream, sink: &mpsc::Sender<Event>) -> Result<Flow, UnixSocketError> {
        let mut writer = stream.try_clone()?;
        let reader = BufReader::new(stream);
        let mut filter = TapFilter::new(self.key_codes);
        let mut saw_keys = false;
        for line in reader.lines() {
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    error!("read error: {}", e);
                    break;
                }
            };
            if text.trim().is_empty() {
                continue;
            }
            let event = match serde_json::from_str::<Event>(&text) {
                Ok(event) => event,
                Err(e) => {
                    error!("bad event {:?}: {}", text, e);
                    continue;
                }
            };
            debug!("received {:?}", event);

            if let Event::Key(key) = &event {
                saw_keys = true;
                let reply = filter.decide(key);
                if let Err(e) = write_disposition(&mut writer, reply) {
                    warn!("could not reply to client: {}", e);
                }
            }

            if sink.send(event).is_err() {
                info!("sink closed, shutting down");
                return Ok(Flow::SinkClosed);
            }
        }
        if saw_keys && sink.send(Event::Disconnected).is_err() {
            return Ok(Flow::SinkClosed);
        }
        Ok(Flow::Continue)
    }
}

fn write_disposition(writer: &mut impl Write, reply: Disposition) -> Result<(), UnixSocketError> {
    let mut line = serde_json::to_string(&reply)?;
    line.push('\n');
    writer.write_all(line.as_bytes())?;
    writer.flush()?;
    Ok(())
}

impl EventSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** indefinitely.  Run it on a dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Event>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match self.serve(stream, &sink) {
                        Ok(Flow::SinkClosed) => return Ok(()),
                        Ok(Flow::Continue) => {}
                        Err(e) => error!("connection error: {}", e),
                    }
                    debug!("client disconnected");
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyEvent, KeyPhase};
    use crate::layout::{LayoutPosition, Side};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("splitview-test-{}-{}.sock", std::process::id(), id))
    }

    fn start_listener(path: &Path) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&path, KeyCodeSet::Evdev);
            let _ = listener.run(tx);
        });
        // Give the listener a moment to bind.
        std::thread::sleep(Duration::from_millis(150));
        rx
    }

    #[test]
    fn events_arrive_and_keys_get_replies() {
        let path = tmp_socket_path();
        let rx = start_listener(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        writeln!(
            stream,
            r#"{{"Key":{{"key_code":71,"phase":"Down","modifiers":{{"control":true,"option":true}},"timestamp_ms":5}}}}"#
        )
        .unwrap();
        writeln!(stream, r#"{{"Key":{{"key_code":30,"phase":"Down","timestamp_ms":6}}}}"#).unwrap();
        writeln!(stream, r#"{{"Snap":{{"ScreenHalf":"Left"}}}}"#).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();

        let mut replies = Vec::new();
        let reader = BufReader::new(stream.try_clone().unwrap());
        for line in reader.lines() {
            replies.push(serde_json::from_str::<Disposition>(&line.unwrap()).unwrap());
        }
        assert_eq!(replies, vec![Disposition::Consume, Disposition::PassThrough]);

        std::thread::sleep(Duration::from_millis(100));
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            Event::Key(KeyEvent {
                key_code: 71,
                phase: KeyPhase::Down,
                ..
            })
        ));
        assert_eq!(events[2], Event::Snap(LayoutPosition::ScreenHalf(Side::Left)));
        assert_eq!(events[3], Event::Disconnected);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn key_up_after_modifier_release_is_consumed() {
        let path = tmp_socket_path();
        let rx = start_listener(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        writeln!(
            stream,
            r#"{{"Key":{{"key_code":71,"phase":"Down","modifiers":{{"control":true,"option":true}},"timestamp_ms":5}}}}"#
        )
        .unwrap();
        writeln!(stream, r#"{{"Key":{{"key_code":71,"phase":"Up","timestamp_ms":60}}}}"#).unwrap();
        writeln!(stream, r#"{{"Key":{{"key_code":71,"phase":"Down","timestamp_ms":900}}}}"#).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();

        let reader = BufReader::new(stream.try_clone().unwrap());
        let replies: Vec<Disposition> = reader
            .lines()
            .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
            .collect();
        assert_eq!(
            replies,
            vec![Disposition::Consume, Disposition::Consume, Disposition::PassThrough]
        );

        std::thread::sleep(Duration::from_millis(100));
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events.last(), Some(&Event::Disconnected));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn consumed_keys_are_forgotten_per_connection() {
        let path = tmp_socket_path();
        let _rx = start_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(
                stream,
                r#"{{"Key":{{"key_code":72,"phase":"Down","modifiers":{{"control":true,"function":true}},"timestamp_ms":1}}}}"#
            )
            .unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            let mut reply = String::new();
            BufReader::new(stream).read_line(&mut reply).unwrap();
            assert_eq!(reply.trim(), r#""Consume""#);
        }

        let mut stream = UnixStream::connect(&path).expect("connect");
        stream.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        writeln!(stream, r#"{{"Key":{{"key_code":72,"phase":"Up","timestamp_ms":2}}}}"#).unwrap();
        stream.shutdown(std::net::Shutdown::Write).unwrap();
        let mut reply = String::new();
        BufReader::new(stream).read_line(&mut reply).unwrap();
        assert_eq!(reply.trim(), r#""PassThrough""#);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_does_not_crash() {
        let path = tmp_socket_path();
        let rx = start_listener(&path);

        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, "not json at all").unwrap();
            writeln!(stream).unwrap();
            writeln!(stream, r#"{{"Snap":"FullScreen"}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }

        std::thread::sleep(Duration::from_millis(150));
        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events, vec![Event::Snap(LayoutPosition::FullScreen)]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn listener_serves_successive_connections() {
        let path = tmp_socket_path();
        let rx = start_listener(&path);

        for _ in 0..2 {
            let mut stream = UnixStream::connect(&path).expect("connect");
            writeln!(stream, r#"{{"Snap":"CenteredHalf"}}"#).unwrap();
            stream.shutdown(std::net::Shutdown::Write).unwrap();
            std::thread::sleep(Duration::from_millis(100));
        }

        let events: Vec<Event> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disposition_lines_are_bare_json_strings() {
        let mut buf = Vec::new();
        write_disposition(&mut buf, Disposition::PassThrough).unwrap();
        assert_eq!(buf, b"\"PassThrough\"\n");
    }
}
