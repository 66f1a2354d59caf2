//! `logirecon run` / `validate` / `default-config`.

use std::path::{Path, PathBuf};

use logirecon_io::ProcessError;
use logirecon_recon::{ReconConfig, ReconError, ReconResult, Table, TableRole};

use crate::exit_codes::{process_exit_code, recon_exit_code, EXIT_REPORT_WRITE};
use crate::CliError;

pub struct RunArgs {
    pub shipments: PathBuf,
    pub sales: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub summary_json: Option<PathBuf>,
    pub quiet: bool,
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    if same_file(&args.output, &args.shipments) || same_file(&args.output, &args.sales) {
        return Err(CliError::args(format!(
            "output {} would overwrite an input file",
            args.output.display()
        ))
        .with_hint("pass a different path with -o"));
    }

    let config = load_config(args.config.as_deref())?;
    let shipments = load_input(&args.shipments, TableRole::Shipments)?;
    let sales = load_input(&args.sales, TableRole::Sales)?;

    // Built fully in memory; nothing touches disk on failure
    let report = logirecon_io::build_report(&shipments, &sales, &config).map_err(process_err)?;

    // Everything that can fail without touching disk happens first
    let json_str = if args.json || args.summary_json.is_some() {
        Some(
            serde_json::to_string_pretty(&report.result)
                .map_err(|e| CliError::internal(format!("JSON serialization error: {e}")))?,
        )
    } else {
        None
    };

    std::fs::write(&args.output, &report.workbook).map_err(|e| {
        CliError::new(EXIT_REPORT_WRITE, format!("cannot write {}: {e}", args.output.display()))
    })?;

    if let (Some(path), Some(json_str)) = (&args.summary_json, &json_str) {
        if let Err(e) = std::fs::write(path, json_str) {
            // Leave no report behind when the run as a whole failed
            if let Err(rm) = std::fs::remove_file(&args.output) {
                tracing::warn!(path = %args.output.display(), error = %rm, "cannot remove report");
            }
            return Err(CliError::new(
                EXIT_REPORT_WRITE,
                format!("cannot write {}: {e}", path.display()),
            ));
        }
    }
    tracing::info!(
        path = %args.output.display(),
        bytes = report.workbook.len(),
        "report written"
    );

    if args.json {
        if let Some(ref json_str) = json_str {
            println!("{json_str}");
        }
    }

    if !args.quiet {
        print_summary(&args.output, &report.result, &config);
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    let report = &config.report;
    eprintln!(
        "valid: markup {}, unmatched manager '{}'",
        config.markup, config.unmatched_manager
    );
    eprintln!(
        "  shipments: '{}', '{}', '{}'",
        config.shipments.identifier, config.shipments.cost, config.shipments.recipient
    );
    eprintln!(
        "  sales:     '{}', '{}', '{}'",
        config.sales.identifier, config.sales.manager, config.sales.net_sales
    );
    eprintln!(
        "  sheets:    '{}', '{}', '{}' (summary at column {})",
        report.results_sheet, report.shipments_sheet, report.sales_sheet, report.summary_column
    );
    Ok(())
}

pub fn cmd_default_config() -> Result<(), CliError> {
    let toml = ReconConfig::default()
        .to_toml()
        .map_err(|e| CliError::internal(e.to_string()))?;
    print!("{toml}");
    Ok(())
}

/// Whether two paths name the same file. The output usually does not exist
/// yet, so it is resolved through its parent directory.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve(path: &Path) -> Option<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Some(canonical);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.canonicalize().ok().map(|dir| dir.join(name))
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };

    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReconConfig::from_toml(&config_str).map_err(|e| config_err(path, e))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

fn config_err(path: &Path, e: ReconError) -> CliError {
    CliError::new(recon_exit_code(&e), format!("{}: {e}", path.display()))
        .with_hint("run `logirecon default-config` to see every key with its default")
}

fn load_input(path: &Path, role: TableRole) -> Result<Table, CliError> {
    let table = logirecon_io::load_table(path).map_err(|e| {
        CliError::io(format!("cannot load {role} file: {e}"))
            .with_hint("inputs must be xlsx, xlsm, xlsb, xls, ods or csv files")
    })?;
    tracing::debug!(
        role = %role,
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "input loaded"
    );
    Ok(table)
}

fn process_err(e: ProcessError) -> CliError {
    let code = process_exit_code(&e);
    let hint = match &e {
        ProcessError::Recon(ReconError::MissingColumn { table, .. }) => Some(format!(
            "set the column names under [{table}] in a config file (see `logirecon default-config`)"
        )),
        ProcessError::Recon(ReconError::AmountParse { .. }) => {
            Some("amounts must be numbers; a decimal comma and space grouping are accepted".to_string())
        }
        _ => None,
    };
    CliError { code, message: e.to_string(), hint }
}

/// Human summary on stderr.
fn print_summary(output: &Path, result: &ReconResult, config: &ReconConfig) {
    let s = &result.stats;
    eprintln!(
        "wrote {}: {} shipments, {} managers; net sales {:.2}, logistics {:.2}",
        output.display(),
        s.shipments,
        s.managers,
        result.totals.net_sales,
        result.totals.cost,
    );

    if s.unmatched_shipments > 0 {
        eprintln!(
            "  {} shipment row(s) without a sales document (manager '{}')",
            s.unmatched_shipments, config.unmatched_manager
        );
    }
    if s.duplicate_sales > 0 {
        eprintln!("  {} repeated sales document row(s) ignored", s.duplicate_sales);
    }
    if s.dropped.total > 0 {
        eprintln!("  {} incomplete row(s) left out", s.dropped.total);
    }
}
