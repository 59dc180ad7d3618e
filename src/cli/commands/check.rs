//! Check files against their rule bindings

use std::path::Path;

use log::info;

use judge::adapters::{CommandOracle, expand_paths, git};
use judge::check::{EvaluationRequest, evaluate};
use judge::config::Config;
use judge::core::models::{Evaluation, RuleBinding};
use judge::core::ports::Oracle;
use judge::core::services::{FileMatcher, summarize};
use judge::output::{CheckReport, OutputMode};

/// Run a check and exit non-zero when it fails
pub fn check(
    config_path: &Path,
    files: &[String],
    staged: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let passed = super::runtime()?.block_on(run(&config, files, staged, mode))?;

    if config.fail_on_issues && !passed {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    config: &Config,
    files: &[String],
    staged: bool,
    mode: OutputMode,
) -> anyhow::Result<bool> {
    let oracle = CommandOracle::for_provider(config.provider, &config.command)?;
    oracle.validate().await?;

    let root = std::env::current_dir()?;
    let candidates = if staged {
        git::staged_files(&root)?
    } else if files.is_empty() {
        anyhow::bail!("Specify files to check or use --staged");
    } else {
        expand_paths(files)
    };

    if candidates.is_empty() {
        if mode == OutputMode::Human {
            if staged {
                println!("No staged files to check");
            } else {
                println!("No files to check");
            }
        } else {
            let evaluation = Evaluation {
                results: vec![],
                summary: summarize(&[], std::time::Duration::ZERO),
            };
            CheckReport::new(config, &evaluation).render(mode);
        }
        return Ok(true);
    }

    let active = applicable_bindings(&root, &candidates, &config.rule_bindings);
    info!(
        "{} of {} binding(s) apply to {} file(s)",
        active.len(),
        config.rule_bindings.len(),
        candidates.len()
    );

    let request = EvaluationRequest {
        max_concurrent: config.max_concurrent_checks,
        timeout: config.oracle_timeout(),
        scheduling: config.scheduling,
        cache_dir: Some(config.cache_dir.as_path()),
        freshness: config.freshness(),
        ..EvaluationRequest::new(&candidates, &active, &oracle)
    };
    let evaluation = evaluate(&root, request).await;

    CheckReport::new(config, &evaluation).render(mode);
    Ok(evaluation.summary.passed)
}

/// Bindings with at least one matched file
fn applicable_bindings(root: &Path, files: &[String], bindings: &[RuleBinding]) -> Vec<RuleBinding> {
    let matches = FileMatcher::load(root).match_files(files, bindings);
    bindings.iter().filter(|b| !matches.files_for(&b.name).is_empty()).cloned().collect()
}
