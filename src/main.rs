// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
mod client;
mod output;
mod progress;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use kube::runtime::watcher;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;

use cli::{Args, Command, ConfigAction};
use mysqlbackup_lister::config::{self, Config};
use mysqlbackup_lister::{
    MySQLBackupScheduleInformer, MySQLBackupScheduleLister, MySQLBackupScheduleNamespaceLister,
    ScheduleLister, Selector,
};
use output::ScheduleView;

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    // Create log directory
    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // Rotate at 10MB or daily, keep 5 files
    let log_path = log_dir.join("mysqlbackup-lister.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(guard);

    let filter = if verbose {
        "mysqlbackup_lister=debug"
    } else {
        "mysqlbackup_lister=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (aws-lc-rs)
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Ignoring config: {:#}", e);
        Config::default()
    });

    match &args.command {
        Command::Config { action } => run_config(action, config),
        Command::List {
            all_namespaces,
            selector,
        } => run_list(&args, &config, *all_namespaces, selector.as_deref()).await,
        Command::Get { name } => run_get(&args, &config, name).await,
        Command::Watch {
            all_namespaces,
            selector,
            interval,
        } => {
            run_watch(
                &args,
                &config,
                *all_namespaces,
                selector.as_deref(),
                Duration::from_secs((*interval).max(1)),
            )
            .await
        }
    }
}

/// Parse `-l`, treating a missing flag as "everything"
fn parse_selector(selector: Option<&str>) -> Result<Selector> {
    selector
        .map(Selector::parse)
        .transpose()
        .context("Invalid label selector")
        .map(Option::unwrap_or_default)
}

/// Connect, start the informer in the background and wait for its first list
///
/// The label selector is pushed down to the watch so only matching objects are cached.
async fn start_informer(
    args: &Args,
    config: &Config,
    namespace: Option<&str>,
    selector: &Selector,
) -> Result<ScheduleLister> {
    let context = config.resolve_context(args.context.as_deref());
    let client = client::connect(context.as_deref()).await?;

    let mut watch_config = watcher::Config::default();
    if !selector.is_empty() {
        watch_config = watch_config.labels(&selector.to_string());
    }

    let informer = match namespace {
        Some(ns) => MySQLBackupScheduleInformer::namespaced(client, ns, watch_config),
        None => MySQLBackupScheduleInformer::all_namespaces(client, watch_config),
    };
    let lister = informer.lister();
    let store = informer.store();
    tokio::spawn(informer.run());

    let spinner = progress::create_spinner("Syncing MySQLBackupSchedules...");
    let result = tokio::time::timeout(config.sync_timeout(), store.wait_until_ready()).await;
    spinner.finish_and_clear();

    match result {
        Ok(Ok(())) => {
            debug!("Informer synced");
            Ok(lister)
        }
        Ok(Err(_)) => Err(anyhow!("Informer stopped before the cache synced")),
        Err(_) => Err(anyhow!(
            "Timed out after {}s waiting for the cache to sync (is the MySQLBackupSchedule CRD installed?)",
            config.sync_timeout_secs
        )),
    }
}

async fn run_list(
    args: &Args,
    config: &Config,
    all_namespaces: bool,
    selector: Option<&str>,
) -> Result<()> {
    let selector = parse_selector(selector)?;
    let namespace = (!all_namespaces).then(|| config.resolve_namespace(args.namespace.as_deref()));
    let lister = start_informer(args, config, namespace.as_deref(), &selector).await?;

    let schedules = match &namespace {
        Some(ns) => lister.for_namespace(ns).list(&selector)?,
        None => lister.list(&selector)?,
    };
    info!(count = schedules.len(), "Listed schedules");
    println!(
        "{}",
        ScheduleView::many(&schedules).format(&args.output, args.no_headers)
    );
    Ok(())
}

async fn run_get(args: &Args, config: &Config, name: &str) -> Result<()> {
    let namespace = config.resolve_namespace(args.namespace.as_deref());
    let lister = start_informer(args, config, Some(&namespace), &Selector::everything()).await?;

    match lister.for_namespace(&namespace).get(name) {
        Ok(schedule) => {
            println!(
                "{}",
                ScheduleView::one(&schedule).format(&args.output, args.no_headers)
            );
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run_watch(
    args: &Args,
    config: &Config,
    all_namespaces: bool,
    selector: Option<&str>,
    interval: Duration,
) -> Result<()> {
    let selector = parse_selector(selector)?;
    let namespace = (!all_namespaces).then(|| config.resolve_namespace(args.namespace.as_deref()));
    let lister = start_informer(args, config, namespace.as_deref(), &selector).await?;

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted, stopping watch");
                return Ok(());
            }
            _ = ticker.tick() => {
                let listed = match &namespace {
                    Some(ns) => lister.for_namespace(ns).list(&selector),
                    None => lister.list(&selector),
                };
                match listed {
                    Ok(schedules) => println!(
                        "{}\n",
                        ScheduleView::many(&schedules).format(&args.output, args.no_headers)
                    ),
                    Err(e) => warn!(error = %e, "Failed to list schedules from cache"),
                }
            }
        }
    }
}

fn run_config(action: &ConfigAction, mut config: Config) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!("# {}", Config::config_path()?.display());
        }
        ConfigAction::SetNamespace { namespace } => {
            config.namespace = Some(namespace.clone());
            config.save()?;
            println!("Default namespace set to '{}'", namespace);
        }
        ConfigAction::SetContext { context } => {
            config.context = Some(context.clone());
            config.save()?;
            println!("Default context set to '{}'", context);
        }
    }
    Ok(())
}
