use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::StreamExt;

use chatcal::client::{GenerateClient, StreamSource};
use chatcal::config;
use chatcal::replay::TestCase;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cases_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/cases");
    let config = config::load(&std::env::current_dir()?)?;
    let client = GenerateClient::new(&config);

    let names: Vec<String> = if args.len() > 1 {
        args[1..].to_vec()
    } else {
        // Record all cases
        let mut names: Vec<String> = std::fs::read_dir(&cases_dir)?
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    };

    for name in &names {
        eprintln!("Recording: {name}");
        record_case(&client, &cases_dir, name).await?;
        eprintln!("  Done: {name}.ndjson");
    }

    Ok(())
}

async fn record_case(client: &GenerateClient, cases_dir: &Path, name: &str) -> Result<()> {
    let toml_path = cases_dir.join(format!("{name}.toml"));
    let ndjson_path = cases_dir.join(format!("{name}.ndjson"));

    let toml_content = std::fs::read_to_string(&toml_path)
        .with_context(|| format!("Failed to read {}", toml_path.display()))?;
    let case: TestCase = toml::from_str(&toml_content)?;

    // Keep every line exactly as received, including ones the decoder skips.
    let mut lines = client.open(&case.prompt()?).await?;
    let mut body = String::new();
    while let Some(line) = lines.next().await {
        body.push_str(&line?);
        body.push('\n');
    }

    std::fs::write(&ndjson_path, body)
        .with_context(|| format!("Failed to write {}", ndjson_path.display()))?;
    Ok(())
}
