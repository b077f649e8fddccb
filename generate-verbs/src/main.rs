use anyhow::Context;
use generate_verbs::collector::{REQUEST_INTERVAL, run_batch};
use generate_verbs::qwen::QwenClient;
use std::fs::File;
use std::io::BufWriter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        anyhow::bail!("usage: generate-verbs <input_verbs.txt> <output.json>");
    }
    let input_path = &args[1];
    let output_path = &args[2];

    // Credentials are checked before any processing starts.
    let client = QwenClient::from_env()?;

    let verbs = load_verbs(input_path)?;
    if verbs.is_empty() {
        anyhow::bail!("no verbs found in {input_path}");
    }
    println!("Loaded {} verbs, starting generation...", verbs.len());

    let file = File::create(output_path)
        .with_context(|| format!("failed to create {output_path}"))?;
    let mut writer = BufWriter::new(file);

    let summary = run_batch(&client, &verbs, &mut writer, REQUEST_INTERVAL).await?;

    println!();
    println!(
        "Done: {} attempted, {} succeeded, {} failed.",
        summary.attempted, summary.succeeded, summary.failed
    );
    println!("Wrote {output_path}");
    Ok(())
}

/// One verb token per line; blank lines ignored, every line trimmed.
fn load_verbs(path: &str) -> anyhow::Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
