// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::compile::{CommandCompiler, OutputWriter};
use crate::config::{load_and_validate, ConfigFile};
use crate::engine::{
    CompileStatus, Dispatcher, DispatcherOptions, Runtime, RuntimeEvent, SystemClock,
};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{DependencyGraph, TemplateFilter};
use crate::watch::{spawn_watcher, WatchOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and startup checks
/// - the runtime helper module
/// - the dependency graph
/// - the initial compile pass
/// - (optional) file watcher and runtime loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(args.config.as_deref(), &args.overrides())?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let root = fs.canonicalize(&cfg.dir)?;

    info!("running pug compiler on {:?}", root);

    let graph = DependencyGraph::build(fs.as_ref(), &root, &cfg.compile.source_extension)?;

    if args.dry_run {
        print_dry_run(&cfg, &graph);
        return Ok(());
    }

    let options = DispatcherOptions::from_config(&cfg);
    OutputWriter::new(&options.out_dir, &options.output_extension, options.format)
        .write_helpers(fs.as_ref())?;

    let compiler = CommandCompiler::from_config(&cfg.compile);
    let mut dispatcher = Dispatcher::new(graph, Arc::clone(&fs), compiler, Arc::new(SystemClock), options);

    if !args.skip_initial {
        let reports = dispatcher.compile_all().await;
        let failed = reports
            .iter()
            .filter(|r| matches!(r.status, CompileStatus::Failed { .. }))
            .count();
        let compiled = reports.iter().filter(|r| r.attempted()).count() - failed;
        info!(compiled, failed, "initial compile pass finished");
    }

    if args.once {
        return Ok(());
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let filter = TemplateFilter::new(&cfg.compile.source_extension)?;
    let _watcher_handle = spawn_watcher(
        root.clone(),
        filter,
        WatchOptions::from_config(&cfg.watch),
        rt_tx.clone(),
    )?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(dispatcher, rt_rx);
    runtime.run().await
}

/// Dry-run output: settings, roots, and where each include routes.
fn print_dry_run(cfg: &ConfigFile, graph: &DependencyGraph) {
    let root = graph.root();

    println!("pugwatch dry-run");
    println!("  dir = {}", cfg.dir.display());
    println!("  out = {}", cfg.out.display());
    println!("  wait_ms = {}", cfg.compile.wait_ms);
    println!("  format = {:?}", cfg.compile.format);
    println!("  command = {:?}", cfg.compile.command);
    println!();

    println!("templates ({}):", graph.len());
    for file in graph.files() {
        let marker = if graph.is_root(&file.path) { " [root]" } else { "" };
        println!("  - {}{marker}", display_rel(root, &file.path));
        let ancestors = graph.ancestors_of(&file.path);
        if !ancestors.is_empty() {
            let names: Vec<String> = ancestors.iter().map(|a| display_rel(root, a)).collect();
            println!("      recompiles: {}", names.join(", "));
        }
    }

    let cycles = graph.include_cycles();
    if !cycles.is_empty() {
        println!();
        println!("include cycles ({}):", cycles.len());
        for cycle in cycles {
            let names: Vec<String> = cycle.iter().map(|p| display_rel(root, p)).collect();
            println!("  - {}", names.join(" -> "));
        }
    }

    debug!("dry-run complete (no compilation)");
}

fn display_rel(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
