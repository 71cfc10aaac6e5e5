//! Outbound typing contract. The editor core never talks to hardware;
//! it hands characters one at a time to a [`KeySink`] supplied by the
//! host (a USB HID keyboard, a test buffer, a clipboard shim). The
//! driver here adds the bookkeeping every sink needs: shift-state
//! classification, progress reporting, a cancellation poll and an idle
//! timeout budget.

use std::time::{Duration, Instant};

use thiserror::Error;

/// One character to deliver, with the shift state the receiving layout
/// needs to produce it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub ch: char,
    pub shifted: bool,
}

/// Outcome of offering one keypress to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// Delivered.
    Sent,
    /// Not ready; the driver retries until cancel or timeout.
    Busy,
    /// The sink cannot produce this character; it is skipped but still
    /// counted toward progress.
    Unsupported,
}

/// The narrow interface a transport has to implement.
pub trait KeySink {
    fn send_key(&mut self, key: KeyPress) -> SinkStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("typing cancelled after {sent} of the characters were delivered")]
    Cancelled { sent: usize },
    #[error("sink stayed busy past the timeout budget ({sent} characters delivered)")]
    Timeout { sent: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct TypeOptions {
    /// Abort when the sink accepts nothing for this long. The budget is
    /// measured since the last successful send, not since the start.
    pub timeout: Option<Duration>,
    /// Pause between retries while the sink is busy.
    pub retry_delay: Duration,
}

impl Default for TypeOptions {
    fn default() -> Self {
        TypeOptions {
            timeout: Some(Duration::from_secs(5)),
            retry_delay: Duration::from_millis(1),
        }
    }
}

/// Progress is reported every this many characters, and at the end.
pub const PROGRESS_STRIDE: usize = 5;

/// Does producing `ch` require shift on a US layout?
pub fn needs_shift(ch: char) -> bool {
    ch.is_ascii_uppercase() || "~!@#$%^&*()_+{}|:\"<>?".contains(ch)
}

/// Deliver `text` one character at a time. `progress(sent, total)` fires
/// every [`PROGRESS_STRIDE`] characters and once at the end; `cancel` is
/// polled before every delivery attempt.
pub fn type_string<S, P, C>(
    sink: &mut S,
    text: &str,
    options: &TypeOptions,
    mut progress: P,
    mut cancel: C,
) -> Result<usize, TypeError>
where
    S: KeySink,
    P: FnMut(usize, usize),
    C: FnMut() -> bool,
{
    let total = text.chars().count();
    let mut sent = 0usize;
    let mut last_sent_at = Instant::now();

    for ch in text.chars() {
        let key = KeyPress {
            ch,
            shifted: needs_shift(ch),
        };

        loop {
            if cancel() {
                return Err(TypeError::Cancelled { sent });
            }
            if let Some(limit) = options.timeout {
                if last_sent_at.elapsed() >= limit {
                    return Err(TypeError::Timeout { sent });
                }
            }
            match sink.send_key(key) {
                SinkStatus::Sent => {
                    last_sent_at = Instant::now();
                    break;
                }
                SinkStatus::Unsupported => break,
                SinkStatus::Busy => {
                    if !options.retry_delay.is_zero() {
                        std::thread::sleep(options.retry_delay);
                    }
                }
            }
        }

        sent += 1;
        if sent % PROGRESS_STRIDE == 0 || sent == total {
            progress(sent, total);
        }
    }

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that records delivered keypresses into a string.
    #[derive(Default)]
    struct BufferSink {
        typed: String,
        shifted: Vec<bool>,
    }

    impl KeySink for BufferSink {
        fn send_key(&mut self, key: KeyPress) -> SinkStatus {
            self.typed.push(key.ch);
            self.shifted.push(key.shifted);
            SinkStatus::Sent
        }
    }

    fn no_cancel() -> bool {
        false
    }

    #[test]
    fn delivers_every_character_in_order() {
        let mut sink = BufferSink::default();
        let sent = type_string(
            &mut sink,
            "\\frac{1}{2}",
            &TypeOptions::default(),
            |_, _| {},
            no_cancel,
        )
        .unwrap();
        assert_eq!(sent, 11);
        assert_eq!(sink.typed, "\\frac{1}{2}");
    }

    #[test]
    fn shift_state_follows_us_layout() {
        let mut sink = BufferSink::default();
        type_string(
            &mut sink,
            "aA1{",
            &TypeOptions::default(),
            |_, _| {},
            no_cancel,
        )
        .unwrap();
        assert_eq!(sink.shifted, vec![false, true, false, true]);
    }

    #[test]
    fn progress_fires_every_five_and_at_end() {
        let mut sink = BufferSink::default();
        let mut reports = Vec::new();
        type_string(
            &mut sink,
            "1234567890123",
            &TypeOptions::default(),
            |sent, total| reports.push((sent, total)),
            no_cancel,
        )
        .unwrap();
        assert_eq!(reports, vec![(5, 13), (10, 13), (13, 13)]);
    }

    #[test]
    fn cancel_stops_mid_string() {
        let mut sink = BufferSink::default();
        let mut polls = 0;
        let err = type_string(
            &mut sink,
            "abcdef",
            &TypeOptions::default(),
            |_, _| {},
            move || {
                polls += 1;
                polls > 3
            },
        )
        .unwrap_err();
        assert_eq!(err, TypeError::Cancelled { sent: 3 });
        assert_eq!(sink.typed, "abc");
    }

    /// Sink that is busy for a fixed number of attempts, then accepts.
    struct SlowSink {
        busy_for: usize,
        attempts: usize,
        typed: String,
    }

    impl KeySink for SlowSink {
        fn send_key(&mut self, key: KeyPress) -> SinkStatus {
            self.attempts += 1;
            if self.attempts <= self.busy_for {
                SinkStatus::Busy
            } else {
                self.typed.push(key.ch);
                SinkStatus::Sent
            }
        }
    }

    #[test]
    fn busy_sink_is_retried() {
        let mut sink = SlowSink {
            busy_for: 4,
            attempts: 0,
            typed: String::new(),
        };
        let options = TypeOptions {
            timeout: Some(Duration::from_secs(5)),
            retry_delay: Duration::ZERO,
        };
        let sent = type_string(&mut sink, "xy", &options, |_, _| {}, no_cancel).unwrap();
        assert_eq!(sent, 2);
        assert_eq!(sink.typed, "xy");
    }

    /// Sink that never becomes ready.
    struct StuckSink;

    impl KeySink for StuckSink {
        fn send_key(&mut self, _key: KeyPress) -> SinkStatus {
            SinkStatus::Busy
        }
    }

    #[test]
    fn stuck_sink_times_out() {
        let options = TypeOptions {
            timeout: Some(Duration::from_millis(20)),
            retry_delay: Duration::from_millis(1),
        };
        let err = type_string(&mut StuckSink, "x", &options, |_, _| {}, no_cancel).unwrap_err();
        assert_eq!(err, TypeError::Timeout { sent: 0 });
    }

    /// Sink that rejects anything outside ASCII.
    struct AsciiSink {
        typed: String,
    }

    impl KeySink for AsciiSink {
        fn send_key(&mut self, key: KeyPress) -> SinkStatus {
            if key.ch.is_ascii() {
                self.typed.push(key.ch);
                SinkStatus::Sent
            } else {
                SinkStatus::Unsupported
            }
        }
    }

    #[test]
    fn unsupported_characters_are_skipped_but_counted() {
        let mut sink = AsciiSink {
            typed: String::new(),
        };
        let sent = type_string(
            &mut sink,
            "aπb",
            &TypeOptions::default(),
            |_, _| {},
            no_cancel,
        )
        .unwrap();
        assert_eq!(sent, 3);
        assert_eq!(sink.typed, "ab");
    }
}
