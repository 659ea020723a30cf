//! `rollscope analyze` — run the full derivation pipeline over one roll file.

use std::path::PathBuf;

use rollscope_engine::{run, RollInput, RollResult};

use crate::exit_codes::EXIT_RUNTIME;
use crate::{batch_label, cli_err, load_config, CliError};

pub fn cmd_analyze(
    input: PathBuf,
    config_path: Option<PathBuf>,
    batch: Option<String>,
    json_output: bool,
    output_file: Option<PathBuf>,
    flagged_only: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_ref())?;
    let batch = batch_label(batch, &input);

    let members = rollscope_io::load_roll(&input, &batch)
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    let result = run(&config, &RollInput { members });

    // Human summary to stderr, JSON (if any) alone on stdout
    print_summary(&result);

    if json_output || output_file.is_some() {
        let emitted = if flagged_only {
            let mut filtered = result.clone();
            filtered.households.retain(|h| h.anomaly.flagged);
            filtered
        } else {
            result
        };

        let json_str = serde_json::to_string_pretty(&emitted)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    Ok(())
}

fn print_summary(result: &RollResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} households from {} members, {} links, {} flagged",
        result.meta.config_name, s.households, s.members, s.links, s.flagged
    );

    for household in result.households.iter().filter(|h| h.anomaly.flagged) {
        eprintln!(
            "  {} (score {}): {}",
            household.key,
            household.anomaly.score,
            household.anomaly.reasons.join("; ")
        );
    }
}
