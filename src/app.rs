//! Application orchestrator.
//! Resolves the home directory, initializes logging, installs signal handlers,
//! loads the manifest and runs both reconciliation passes.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use home_stow::cli::Args;
use home_stow::output::{self as out, ConsoleReporter};
use home_stow::{
    resolve_home, shutdown, AssumeYes, Config, DeviceGuard, Manifest, Reconciler, StowError,
    TerminalPrompt,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Usage problems are reported before logging exists and before anything is touched.
    if !args.config.is_file() {
        return Err(StowError::ConfigNotFound(args.config.clone()).into());
    }
    let home = resolve_home(args.home.as_deref())?;

    let mut cfg = Config::new(args.config.clone(), home);
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(cfg.log_level, cfg.log_file.as_deref(), cfg.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current path and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .context("failed to install signal handler")?;
    }

    debug!(?cfg, "starting home_stow");

    let result = reconcile(&cfg);

    if let Err(e) = &result {
        match e.downcast_ref::<StowError>() {
            Some(se) => error!(code = se.code(), error = %se, "run aborted"),
            None => error!(error = ?e, "run aborted"),
        }
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

fn reconcile(cfg: &Config) -> Result<()> {
    let manifest = Manifest::load(&cfg.config_path, &cfg.home)?;
    info!(
        config = %cfg.config_path.display(),
        home = %cfg.home.display(),
        storages = manifest.storages().len(),
        "starting reconciliation"
    );

    let guard = if cfg.assume_yes {
        DeviceGuard::new(AssumeYes)
    } else {
        DeviceGuard::new(TerminalPrompt::stdio())
    };
    let mut reporter = ConsoleReporter;
    let mut reconciler = Reconciler::new(guard, &mut reporter);

    match reconciler.apply(&manifest) {
        Ok(summary) => {
            out::print_summary(&summary);
            info!(
                changed = summary.ok,
                unchanged = summary.info,
                warnings = summary.warnings,
                errors = summary.errors,
                "run complete"
            );
            Ok(())
        }
        Err(e) => {
            out::print_summary(&reconciler.summary());
            out::print_warn(&e.to_string());
            Err(e.into())
        }
    }
}
