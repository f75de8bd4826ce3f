//! Scan spinner and a log writer that shares stderr with it.
//!
//! The spinner and the log subscriber both draw on stderr. Log lines are
//! written through [`SpinnerAwareStderr`], which hides the spinner for the
//! duration of each write so the two never interleave on one line.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Styles `pb` as the scan spinner and starts ticking it.
pub fn start_spinner(pb: &ProgressBar) -> Result<()> {
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} Scanning files... [{elapsed}]")
            .context("Failed to set progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(())
}

/// Writer that suspends `bar` around every write to `inner`.
pub struct SuspendingWriter<W> {
    bar: ProgressBar,
    inner: W,
}

impl<W: Write> SuspendingWriter<W> {
    pub fn new(bar: ProgressBar, inner: W) -> Self {
        Self { bar, inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for SuspendingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.bar.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// [`MakeWriter`] for the log subscriber: stderr, suspended around `bar`.
#[derive(Clone)]
pub struct SpinnerAwareStderr {
    bar: ProgressBar,
}

impl SpinnerAwareStderr {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl<'a> MakeWriter<'a> for SpinnerAwareStderr {
    type Writer = SuspendingWriter<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter::new(self.bar.clone(), io::stderr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_writes_pass_through_while_spinning() {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        start_spinner(&bar).unwrap();

        let mut writer = SuspendingWriter::new(bar.clone(), Vec::new());
        writeln!(writer, "Skipped 3 entries for min-size").unwrap();
        writer.flush().unwrap();
        bar.finish_and_clear();

        assert_eq!(writer.into_inner(), b"Skipped 3 entries for min-size\n");
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_events_arrive_whole() {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        start_spinner(&bar).unwrap();
        let buffer = SharedBuffer::default();

        let make_writer = {
            let bar = bar.clone();
            let buffer = buffer.clone();
            move || SuspendingWriter::new(bar.clone(), buffer.clone())
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Scan complete: 2 files, 1 folders");
        });
        bar.finish_and_clear();

        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logged.lines().count(), 1);
        assert!(logged.contains("Scan complete: 2 files, 1 folders"));
    }
}
