//! The streaming batch loop: one verb at a time, in input order, each
//! successful record committed to the output immediately so partial results
//! are inspectable while the batch is still running.
//!
//! Failure policy here is drop-on-failure: a verb whose generation or
//! parsing fails is simply absent from the output array.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::Write;
use std::time::Duration;
use verb_utils::{VerbRecord, json_format, reflexive::split_reflexive};

use crate::qwen::QwenError;

/// Minimum delay between the starts of consecutive generation-service calls.
pub const REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// The external generation service, abstracted so the batch loop can be
/// exercised without the network.
#[allow(async_fn_in_trait)]
pub trait ConjugationService {
    async fn conjugate(&self, base_verb: &str) -> Result<Value, QwenError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Run the whole batch, streaming a JSON array of records to `writer`.
/// Per-verb failures are logged and skipped; only I/O on the output can
/// abort the run.
pub async fn run_batch<S, W>(
    service: &S,
    verbs: &[String],
    writer: &mut W,
    interval: Duration,
) -> anyhow::Result<BatchSummary>
where
    S: ConjugationService,
    W: Write,
{
    let pb = ProgressBar::new(verbs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} verbs ({per_sec}, {eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut summary = BatchSummary::default();
    writer.write_all(b"[\n")?;
    let mut first = true;

    for verb in verbs {
        summary.attempted += 1;
        let (base, _) = split_reflexive(verb);
        match service.conjugate(&base).await {
            Ok(payload) => {
                let record = VerbRecord::from_upstream(verb, payload);
                if !first {
                    writer.write_all(b",\n")?;
                }
                writer.write_all(json_format::to_string(&record)?.as_bytes())?;
                writer.flush()?;
                first = false;
                summary.succeeded += 1;
                pb.println(format!("✅ {verb}"));
            }
            Err(error) => {
                summary.failed += 1;
                log::warn!("skipping {verb}: {error}");
                pb.println(format!("❌ {verb}: {error}"));
            }
        }
        pb.inc(1);
        tokio::time::sleep(interval).await;
    }

    writer.write_all(b"\n]\n")?;
    writer.flush()?;
    pb.finish_and_clear();
    Ok(summary)
}
