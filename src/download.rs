use crate::error::{ArsenalError, Result};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info};

const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Blocking HTTP fetcher. Artifacts are staged in a temp file that is
/// removed once the returned handle is dropped.
pub struct Downloader {
    client: Client,
    quiet: bool,
}

impl Downloader {
    pub fn new(quiet: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("arsenal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ArsenalError::HttpClient)?;
        Ok(Self { client, quiet })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ArsenalError::download(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ArsenalError::download(url, format!("HTTP {status}")));
        }
        Ok(resp)
    }

    pub fn fetch(&self, url: &str) -> Result<NamedTempFile> {
        info!("downloading {url}");
        let mut resp = self.get(url)?;
        let mut tmp = tempfile::Builder::new()
            .prefix("arsenal-download-")
            .tempfile()?;

        let copied = match resp.content_length() {
            Some(total) if total > 0 && !self.quiet => {
                copy_with_progress(&mut resp, tmp.as_file_mut(), total)
            }
            _ => io::copy(&mut resp, tmp.as_file_mut()),
        };
        let bytes = copied.map_err(|e| ArsenalError::download(url, e))?;
        tmp.as_file_mut()
            .flush()
            .map_err(|e| ArsenalError::download(url, e))?;
        debug!("{bytes} bytes staged at {}", tmp.path().display());
        Ok(tmp)
    }

    pub fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("fetching {url}");
        self.get(url)?
            .text()
            .map_err(|e| ArsenalError::download(url, e))
    }
}

/// Counts bytes as they pass through to `inner`.
struct CountingWriter<'a, W> {
    inner: W,
    counter: &'a Mutex<u64>,
}

impl<W: Write> Write for CountingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if let Ok(mut count) = self.counter.lock() {
            *count += n as u64;
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Copies on the calling thread while a poller thread redraws the bar from
/// the shared counter every tick. The poller is joined before returning.
fn copy_with_progress<R: Read, W: Write>(reader: &mut R, writer: W, total: u64) -> io::Result<u64> {
    let counter = Arc::new(Mutex::new(0u64));
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("   downloading {bytes} / {total_bytes} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let (done_tx, done_rx) = mpsc::channel::<()>();
    let poller = {
        let counter = Arc::clone(&counter);
        let bar = bar.clone();
        thread::spawn(move || loop {
            match done_rx.recv_timeout(PROGRESS_TICK) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Ok(count) = counter.lock() {
                        bar.set_position(*count);
                    }
                }
                _ => break,
            }
        })
    };

    let mut counting = CountingWriter {
        inner: writer,
        counter: &counter,
    };
    let res = io::copy(reader, &mut counting);
    let _ = done_tx.send(());
    let _ = poller.join();

    match &res {
        Ok(n) => {
            bar.set_position(*n);
            bar.set_style(
                ProgressStyle::with_template("   {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.finish_with_message(format!("download complete ({})", HumanBytes(total)));
        }
        Err(_) => bar.abandon(),
    }
    res
}
