//! Tag clitic-pronoun support on an existing verbs JSON file.
//!
//! Every record gets the three support fields materialized (null until
//! judged); verbs with a transitive use are sent to the generation service
//! for a DO / IO / DO+IO verdict. Failure policy here is keep-with-nulls:
//! a record whose judgment fails is still written, fields left null, so the
//! output always has the same length and order as the input.

use anyhow::Context;
use generate_verbs::collector::REQUEST_INTERVAL;
use generate_verbs::qwen::QwenClient;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use verb_utils::{SupportFlag, VerbRecord, coerce_bool, json_format};

const SUPPORT_PROMPT: &str = r#"
You are an expert in Spanish valency, clitic pronouns, and pedagogical sentence design.

Your task:
Given a single Spanish verb and basic metadata, decide whether it supports these patterns
in natural, mainstream modern Spanish (non-rare, non-poetic usage):

1) supports_do:
   The verb can naturally take ONLY a direct-object clitic pattern in context
   (lo/la/los/las or cliticized equivalent), without requiring an indirect object.

2) supports_io:
   The verb can naturally take ONLY an indirect-object clitic pattern in context
   (me/te/le/nos/os/les), without requiring a direct object.
   Use strict standards: mark true only if this pattern is genuinely common/natural.

3) supports_do_io:
   The verb can naturally take BOTH indirect + direct clitics together in one predicate
   (e.g., se lo, me la, te los), in ordinary usage.

Important rules:
- Be conservative. If uncertain, return false.
- Base judgment on common usage, not rare literary edge cases.
- Reflexive/pronominal uses do not automatically imply supports_io.
- Do not infer from a single idiom unless it is common.
- Return strict JSON only, no markdown.

Output JSON schema:
{
  "supports_do": true/false,
  "supports_io": true/false,
  "supports_do_io": true/false,
  "confidence": 0.0-1.0,
  "reason": "short explanation"
}
"#;

#[derive(Debug, PartialEq, Eq)]
struct SupportVerdict {
    supports_do: Option<bool>,
    supports_io: Option<bool>,
    supports_do_io: Option<bool>,
}

/// Pull the three verdict fields out of the model's JSON, leniently; any
/// field that does not coerce to a boolean stays null.
fn parse_verdict(payload: &Value) -> SupportVerdict {
    SupportVerdict {
        supports_do: coerce_bool(&payload["supports_do"]),
        supports_io: coerce_bool(&payload["supports_io"]),
        supports_do_io: coerce_bool(&payload["supports_do_io"]),
    }
}

fn build_profile_prompt(record: &VerbRecord) -> String {
    let translation = record
        .translation
        .as_deref()
        .unwrap_or_default()
        .join(" / ");
    format!(
        "Verb profile:\n\
         - infinitive: {}\n\
         - translation_hints: {}\n\
         - is_reflexive: {}\n\
         - has_tr_use: {}\n\
         - has_intr_use: {}\n\n\
         Decide supports_do / supports_io / supports_do_io.\n\
         Return JSON only.",
        record.infinitive,
        if translation.is_empty() {
            "(none)"
        } else {
            translation.as_str()
        },
        record.is_reflexive,
        record.has_tr_use.unwrap_or(false),
        record.has_intr_use.unwrap_or(false),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        anyhow::bail!("usage: tag-pronoun-support <input_verbs.json> <output.json>");
    }
    let input_path = &args[1];
    let output_path = &args[2];

    // Credentials are checked before any processing starts.
    let client = QwenClient::from_env()?;

    let text = std::fs::read_to_string(input_path)
        .with_context(|| format!("failed to read {input_path}"))?;
    let parsed: Value =
        serde_json::from_str(&text).with_context(|| format!("{input_path} is not valid JSON"))?;
    let Value::Array(items) = parsed else {
        anyhow::bail!("input JSON must be a top-level array");
    };
    if items.is_empty() {
        anyhow::bail!("no verb records found in {input_path}");
    }

    let mut records: Vec<VerbRecord> = items.into_iter().map(VerbRecord::from_value).collect();
    for record in &mut records {
        record.materialize_support_fields();
    }
    let evaluated_total = records
        .iter()
        .filter(|record| record.has_tr_use == Some(true))
        .count();

    println!("Loaded {} verbs.", records.len());
    println!("Will evaluate pronoun support for {evaluated_total} verbs (has_tr_use=true).");

    if let Some(dir) = Path::new(output_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
    }
    let file = File::create(output_path)
        .with_context(|| format!("failed to create {output_path}"))?;
    let mut writer = BufWriter::new(file);

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} verbs ({per_sec}, {eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut succeeded = 0usize;
    let mut failed = 0usize;

    writer.write_all(b"[\n")?;
    let mut first = true;

    for (index, record) in records.iter_mut().enumerate() {
        if record.has_tr_use == Some(true) {
            let label = if record.infinitive.is_empty() {
                format!("index:{index}")
            } else {
                record.infinitive.clone()
            };
            match client
                .chat_json(SUPPORT_PROMPT, &build_profile_prompt(record))
                .await
            {
                Ok(payload) => {
                    let verdict = parse_verdict(&payload);
                    record.supports_do = SupportFlag::from_option(verdict.supports_do);
                    record.supports_io = SupportFlag::from_option(verdict.supports_io);
                    record.supports_do_io = SupportFlag::from_option(verdict.supports_do_io);
                    succeeded += 1;
                    pb.println(format!("✅ {label}"));
                }
                Err(error) => {
                    // The record is kept; its support fields stay null.
                    failed += 1;
                    log::warn!("pronoun support judgment failed for {label}: {error}");
                    pb.println(format!("❌ {label}: {error}"));
                }
            }
            tokio::time::sleep(REQUEST_INTERVAL).await;
        }

        if !first {
            writer.write_all(b",\n")?;
        }
        writer.write_all(json_format::to_string(record)?.as_bytes())?;
        writer.flush()?;
        first = false;
        pb.inc(1);
    }

    writer.write_all(b"\n]\n")?;
    writer.flush()?;
    pb.finish_and_clear();

    println!();
    println!("Done.");
    println!("- total verbs: {}", records.len());
    println!("- evaluated (has_tr_use=true): {evaluated_total}");
    println!("- succeeded: {succeeded}");
    println!("- failed: {failed}");
    println!("- output: {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdicts_coerce_leniently() {
        let verdict = parse_verdict(&json!({
            "supports_do": true,
            "supports_io": "no",
            "supports_do_io": "unclear",
            "confidence": 0.9,
            "reason": "whatever",
        }));
        assert_eq!(
            verdict,
            SupportVerdict {
                supports_do: Some(true),
                supports_io: Some(false),
                supports_do_io: None,
            }
        );
    }

    #[test]
    fn missing_fields_stay_null() {
        let verdict = parse_verdict(&json!({}));
        assert_eq!(verdict.supports_do, None);
        assert_eq!(verdict.supports_io, None);
        assert_eq!(verdict.supports_do_io, None);
    }

    #[test]
    fn profile_prompt_includes_the_record_metadata() {
        let record = VerbRecord::from_value(json!({
            "infinitive": "dar",
            "is_reflexive": false,
            "has_tr_use": true,
            "has_intr_use": false,
            "translation": ["to give", "to hand"],
        }));
        let prompt = build_profile_prompt(&record);
        assert!(prompt.contains("- infinitive: dar"));
        assert!(prompt.contains("- translation_hints: to give / to hand"));
        assert!(prompt.contains("- is_reflexive: false"));
        assert!(prompt.contains("- has_tr_use: true"));
        assert!(prompt.contains("- has_intr_use: false"));
    }

    #[test]
    fn missing_translations_render_as_none() {
        let record = VerbRecord::from_value(json!({ "infinitive": "ir" }));
        let prompt = build_profile_prompt(&record);
        assert!(prompt.contains("- translation_hints: (none)"));
    }
}
