use super::attachments::{AttachmentSink, DirectoryAttachments, LogAttachments};
use super::delivery::{self, Delivery, DeliveryReceiver};
use super::strategy::Snapshotting;
use crate::config::SnapshotSettings;
use crate::error::{SnapshotError, SnapshotResult};
use crate::recording::{RecordingLedger, RewriteContext, rewrite, write_source};
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Where an assertion was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub file: PathBuf,
    pub test_name: String,
    /// 1-based line of the assertion call as captured at build time
    pub line: usize,
}

impl CallSite {
    pub fn new(file: impl Into<PathBuf>, test_name: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            test_name: test_name.into(),
            line,
        }
    }
}

/// Per-assertion knobs supplied by the calling test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Rewrite the reference on mismatch instead of failing
    pub record: bool,
    /// Upper bound on waiting for the strategy's snapshot
    pub timeout: Duration,
}

impl From<&SnapshotSettings> for VerifyOptions {
    fn from(settings: &SnapshotSettings) -> Self {
        Self {
            record: settings.record,
            timeout: settings.timeout,
        }
    }
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self::from(&SnapshotSettings::default())
    }
}

/// Checks inline snapshots and records them into source files.
///
/// Owns the [`RecordingLedger`] for the run, so use one verifier for every
/// assertion of a test process and call it sequentially.
pub struct InlineSnapshotVerifier {
    ledger: RecordingLedger,
    attachments: Box<dyn AttachmentSink>,
}

impl Default for InlineSnapshotVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineSnapshotVerifier {
    pub fn new() -> Self {
        Self {
            ledger: RecordingLedger::new(),
            attachments: Box::new(LogAttachments),
        }
    }

    /// Verifier whose attachments go to `settings.attachments_dir` when set.
    pub fn from_settings(settings: &SnapshotSettings) -> Self {
        let verifier = Self::new();
        match &settings.attachments_dir {
            Some(dir) => verifier.with_attachment_sink(Box::new(DirectoryAttachments::new(dir))),
            None => verifier,
        }
    }

    pub fn with_attachment_sink(mut self, sink: Box<dyn AttachmentSink>) -> Self {
        self.attachments = sink;
        self
    }

    pub fn ledger(&self) -> &RecordingLedger {
        &self.ledger
    }

    /// Forget every recorded rewrite, e.g. between independent runs.
    pub fn reset(&mut self) {
        self.ledger.clear();
    }

    /// Blocking form of [`InlineSnapshotVerifier::verify_async`].
    ///
    /// Outside a tokio runtime the wait runs on a private current-thread
    /// runtime, which strategies may spawn onto. Inside a runtime the wait
    /// moves to a helper thread, so strategies that spawn onto the caller's
    /// runtime need [`InlineSnapshotVerifier::verify_async`] instead.
    pub fn verify<V, E, P, S>(
        &mut self,
        producer: P,
        strategy: &S,
        options: VerifyOptions,
        site: &CallSite,
        reference: &str,
    ) -> Option<String>
    where
        P: FnOnce() -> Result<V, E>,
        E: Display,
        S: Snapshotting<V>,
    {
        let outcome = wait_blocking(producer, strategy, options.timeout).and_then(|delivery| {
            self.compare::<V, S>(delivery, strategy, options, site, reference)
        });
        report(site, outcome)
    }

    /// Compare the producer's snapshot with `reference`, recording on demand.
    ///
    /// Returns `None` on success and otherwise the message to fail the test
    /// with. An empty `reference` always records. Nothing is rewritten when
    /// the snapshot already matches, even with `options.record` set.
    pub async fn verify_async<V, E, P, S>(
        &mut self,
        producer: P,
        strategy: &S,
        options: VerifyOptions,
        site: &CallSite,
        reference: &str,
    ) -> Option<String>
    where
        P: FnOnce() -> Result<V, E>,
        E: Display,
        S: Snapshotting<V>,
    {
        let outcome = match request_snapshot(producer, strategy) {
            Ok(receiver) => {
                let delivery = receiver.wait(options.timeout).await;
                self.compare::<V, S>(delivery, strategy, options, site, reference)
            }
            Err(err) => Err(err),
        };
        report(site, outcome)
    }

    fn compare<V, S>(
        &mut self,
        delivery: Delivery,
        strategy: &S,
        options: VerifyOptions,
        site: &CallSite,
        reference: &str,
    ) -> SnapshotResult<Option<String>>
    where
        S: Snapshotting<V>,
    {
        let snapshot = match delivery {
            Delivery::Delivered(snapshot) => snapshot,
            Delivery::TimedOut => {
                return Err(SnapshotError::Timeout {
                    timeout: options.timeout,
                });
            }
            Delivery::Violated => return Err(SnapshotError::Delivery),
        };

        let diffable = trim_snapshot(&snapshot).ok_or(SnapshotError::Delivery)?;
        let reference = reference.trim();

        let Some(report) = strategy.diff(reference, diffable) else {
            return Ok(None);
        };

        if options.record || reference.is_empty() {
            return self.record(site, diffable);
        }

        self.attachments.attach(&site.test_name, &report.attachments);
        Ok(Some(format!(
            "Snapshot does not match reference.\n\n{}",
            report.message.trim()
        )))
    }

    fn record(&mut self, site: &CallSite, diffable: &str) -> SnapshotResult<Option<String>> {
        let source_code = fs::read_to_string(&site.file)?;
        let recordings_before = self.ledger.len_for(&site.file);

        let context = RewriteContext::new(source_code, diffable, site.file.clone(), site.line);
        let rewritten = rewrite(&mut self.ledger, &context)?;
        if rewritten.source_code != context.source_code {
            write_source(&site.file, &rewritten.source_code)?;
        }

        if self.ledger.len_for(&site.file) == recordings_before {
            log::warn!(
                target: "kakikomi::verify",
                "No closing delimiter for {}:{}, nothing recorded",
                site.file.display(),
                site.line
            );
            return Ok(None);
        }
        if self.ledger.last_is_repeat(&site.file) {
            log::info!(
                target: "kakikomi::verify",
                "{}:{} was already recorded during this run",
                site.file.display(),
                site.line
            );
            return Ok(None);
        }

        log::info!(
            target: "kakikomi::verify",
            "Recorded snapshot for {} at {}:{}",
            site.test_name,
            site.file.display(),
            site.line
        );
        Ok(Some(format!(
            "Automatically recorded a new snapshot for \"{name}\".\n\n\
             Re-run \"{name}\" to test against the newly-recorded snapshot.",
            name = site.test_name
        )))
    }
}

/// Run the producer and hand its value to the strategy.
fn request_snapshot<V, E, P, S>(producer: P, strategy: &S) -> SnapshotResult<DeliveryReceiver>
where
    P: FnOnce() -> Result<V, E>,
    E: Display,
    S: Snapshotting<V>,
{
    let value = producer().map_err(SnapshotError::producer)?;
    let (sink, receiver) = delivery::channel();
    strategy.snapshot(value, sink);
    Ok(receiver)
}

fn current_thread_runtime() -> SnapshotResult<Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?)
}

/// Request a snapshot and block until it is delivered or the wait gives up.
fn wait_blocking<V, E, P, S>(
    producer: P,
    strategy: &S,
    timeout: Duration,
) -> SnapshotResult<Delivery>
where
    P: FnOnce() -> Result<V, E>,
    E: Display,
    S: Snapshotting<V>,
{
    if Handle::try_current().is_ok() {
        // block_on panics on a runtime thread
        let receiver = request_snapshot(producer, strategy)?;
        return thread::spawn(move || -> SnapshotResult<Delivery> {
            let runtime = current_thread_runtime()?;
            Ok(runtime.block_on(receiver.wait(timeout)))
        })
        .join()
        .unwrap_or(Err(SnapshotError::Delivery));
    }

    let runtime = current_thread_runtime()?;
    let receiver = {
        let _guard = runtime.enter();
        request_snapshot(producer, strategy)?
    };
    Ok(runtime.block_on(receiver.wait(timeout)))
}

fn report(site: &CallSite, outcome: SnapshotResult<Option<String>>) -> Option<String> {
    outcome.unwrap_or_else(|err| {
        log::debug!(
            target: "kakikomi::verify",
            "{} ({}:{}) failed: {}",
            site.test_name,
            site.file.display(),
            site.line,
            err
        );
        Some(err.to_string())
    })
}

/// Strip surrounding whitespace and a leading byte-order mark.
fn trim_snapshot(snapshot: &str) -> Option<&str> {
    let trimmed = snapshot.trim().trim_start_matches(BYTE_ORDER_MARK).trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
