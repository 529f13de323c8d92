//! Manifest sources: render a local chart or fetch a deployed release's
//! manifest, both by invoking the external `helm` binary.

use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::debug;

fn helm_bin() -> String {
    std::env::var("HELM_BIN").unwrap_or_else(|_| "helm".to_string())
}

/// Render a local chart with the given overrides and return the
/// multi-document manifest bytes.
pub async fn render_chart(
    chart: &str,
    namespace: Option<&str>,
    set_values: &[String],
    value_files: &[String],
) -> anyhow::Result<Vec<u8>> {
    let mut args = vec!["template".to_string(), chart.to_string()];
    if let Some(ns) = namespace {
        args.push("--namespace".to_string());
        args.push(ns.to_string());
    }
    for value in set_values {
        args.push("--set".to_string());
        args.push(value.clone());
    }
    for file in value_files {
        args.push("--values".to_string());
        args.push(file.clone());
    }
    run_helm(&args).await
}

/// Fetch the currently deployed manifest for a named release.
pub async fn fetch_release_manifest(
    release: &str,
    namespace: Option<&str>,
) -> anyhow::Result<Vec<u8>> {
    let mut args = vec![
        "get".to_string(),
        "manifest".to_string(),
        release.to_string(),
    ];
    if let Some(ns) = namespace {
        args.push("--namespace".to_string());
        args.push(ns.to_string());
    }
    run_helm(&args).await
}

/// One-shot, non-retried invocation; a non-zero exit surfaces helm's
/// stderr in the error message.
async fn run_helm(args: &[String]) -> anyhow::Result<Vec<u8>> {
    let bin = helm_bin();
    debug!("running {} {:?}", bin, args);
    let output = Command::new(&bin)
        .args(args)
        .output()
        .await
        .with_context(|| format!("failed to run {}", bin))?;
    if !output.status.success() {
        bail!(
            "{} {} failed ({}): {}",
            bin,
            args.first().map(String::as_str).unwrap_or_default(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(output.stdout)
}
