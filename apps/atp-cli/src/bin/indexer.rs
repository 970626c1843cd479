use std::env;
use std::path::PathBuf;

use atp_cli::{Overrides, Workspace, init_tracing};
use atp_core::config::Config;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut overrides = Overrides { matches_csv: None, index_dir: None, force_rebuild: false };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--force" | "-f" => overrides.force_rebuild = true,
            "--index-dir" => match args.get(i + 1) {
                Some(dir) => { overrides.index_dir = Some(PathBuf::from(dir)); i += 1; }
                None => { eprintln!("Error: --index-dir requires a path"); std::process::exit(1); }
            },
            arg if !arg.starts_with('-') => overrides.matches_csv = Some(PathBuf::from(arg)),
            other => { eprintln!("Error: unknown flag {other}"); std::process::exit(1); }
        }
        i += 1;
    }

    println!("ATP match indexer\n=================");
    let ws = Workspace::open(&config, overrides)?;
    let report = ws.corpus.report();
    println!("\n✅ Indexing completed successfully!");
    println!("📊 {} matches kept, {} dropped without winner, loser or score", report.kept, report.dropped);
    println!("📊 {} chunks in the snapshot ({:?})", ws.store.len(), ws.store.origin());
    println!("\n💡 To query it, use: cargo run --bin atp -- retrieve '<query>'");
    Ok(())
}
