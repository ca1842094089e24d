//! Run orchestration.
//!
//! The run walks the fixed stages: load configuration, optionally prepare
//! the dynamic plugin, resolve the linter, enumerate files, lint, report.
//! Once the plugin was staged, cleanup runs no matter how the rest of the
//! run ended.

use std::path::PathBuf;

use anyhow::bail;
use tracing::{debug, info, warn};

use diaglint::core::config::LintrcConfig;
use diaglint::core::runner::{find_files, lint_files};
use diaglint::engine::linter::{Linter, ResolveOptions};
use diaglint::io::reports::ReportGenerator;
use diaglint::plugin::install::NpmInstaller;
use diaglint::plugin::staging::{staging_root_from_env, PluginStaging};

use crate::cli::args::Cli;
use crate::cli::output::print_console_report;

/// Entry point for a lint run.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let kind = cli.linter_type.kind();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(kind.default_config_file()));

    debug!(
        "Lint runner arguments parsed: type={kind}, pattern=\"{}\", config={}, output={}, format={}, show_console_table={}",
        cli.pattern,
        config_path.display(),
        cli.output.display(),
        cli.format.report_format().as_str(),
        cli.show_console_table,
    );

    let mut config = LintrcConfig::load(&config_path)?;

    let mut staging: Option<PluginStaging> = None;
    let result = execute(&cli, &mut config, &mut staging).await;

    // Always clean up if we staged the plugin
    if let Some(staging) = &staging {
        if let Err(err) = staging.cleanup(true) {
            warn!("Failed to clean up dynamic plugin staging area: {err}");
        }
    }

    result
}

async fn execute(
    cli: &Cli,
    config: &mut LintrcConfig,
    staging_slot: &mut Option<PluginStaging>,
) -> anyhow::Result<()> {
    let kind = cli.linter_type.kind();
    let severity = cli.custom_rules_severity.severity();

    // Prepare the dynamic plugin if a custom rules path was provided
    if let Some(rules_path) = &cli.custom_rules_path {
        let staging = staging_slot.insert(PluginStaging::new(staging_root_from_env(), kind));
        staging.prepare(rules_path, config, cli.install_custom_deps, &NpmInstaller)?;
        config.ensure_dynamic_plugin();
        config.apply_custom_rule_severity(severity);
    } else {
        debug!("Custom rules path not provided. Skipping dynamic plugin generation.");
    }

    let options = ResolveOptions {
        plugin_dir: staging_slot
            .as_ref()
            .map(|staging| staging.root().to_path_buf()),
        dynamic_severity: Some(severity),
    };
    let linter = Linter::from_config(kind, config, &options)?;

    let files = find_files(&cli.pattern)?;
    if files.is_empty() {
        warn!("No files found to lint.");
        return Ok(());
    }

    let run = lint_files(&files, &linter, kind).await;

    print_console_report(&run, &files, cli.show_console_table);

    let format = cli.format.report_format();
    let report_path = ReportGenerator::output_path(&cli.output, format);
    ReportGenerator::new(kind)
        .generate(&run, &files, format, &report_path)
        .map_err(|err| {
            anyhow::anyhow!("Error writing report to {}: {err}", report_path.display())
        })?;
    info!(
        "{} report saved to: {}",
        format.as_str().to_uppercase(),
        report_path.display()
    );

    // Lint errors drive the exit code even though the report was written
    if run.total_errors > 0 {
        bail!("Found {} lint error(s)", run.total_errors);
    }
    Ok(())
}
