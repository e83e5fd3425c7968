//! Compile material scripts against a hardware profile and report diagnostics

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};

use material_system::config::{Config, MaterialSystemConfig};
use material_system::foundation::logging;
use material_system::resources::{FileSystemLoader, DEFAULT_GROUP};
use material_system::script::{ScriptCompiler, Severity};
use material_system::MaterialSystem;

#[derive(Debug)]
struct LintOptions {
    scripts: Vec<PathBuf>,
    config: MaterialSystemConfig,
    include_dirs: Vec<PathBuf>,
    group: String,
}

#[derive(Debug, Default)]
struct LintSummary {
    scripts: usize,
    failed_scripts: usize,
    errors: usize,
    warnings: usize,
}

fn main() -> Result<()> {
    let matches = Command::new("material_lint")
        .about("Compiles material scripts and prints every diagnostic")
        .arg(
            Arg::new("scripts")
                .value_name("SCRIPT")
                .help("Material scripts to compile, in order")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Compiler policy and hardware profile (.toml or .ron)"),
        )
        .arg(
            Arg::new("include")
                .short('I')
                .long("include")
                .value_name("DIR")
                .help("Extra directory searched for imported scripts")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("group")
                .short('g')
                .long("group")
                .value_name("GROUP")
                .help("Resource group the scripts belong to")
                .default_value(DEFAULT_GROUP),
        )
        .arg(
            Arg::new("allow-override")
                .long("allow-override")
                .help("Let later definitions replace earlier ones with a warning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log each compilation phase")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    };
    logging::init_with_level(level);

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => MaterialSystemConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => MaterialSystemConfig::default(),
    };
    if matches.get_flag("allow-override") {
        config.compiler.allow_override = true;
    }

    let options = LintOptions {
        scripts: matches
            .get_many::<String>("scripts")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect(),
        config,
        include_dirs: matches
            .get_many::<String>("include")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect(),
        group: matches
            .get_one::<String>("group")
            .cloned()
            .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
    };

    let summary = lint(&options)?;
    println!(
        "{} script(s), {} failed, {} error(s), {} warning(s)",
        summary.scripts, summary.failed_scripts, summary.errors, summary.warnings
    );
    if summary.errors > 0 {
        anyhow::bail!("{} error(s) found", summary.errors);
    }
    Ok(())
}

fn loader_for(script: &Path, include_dirs: &[PathBuf]) -> FileSystemLoader {
    let parent = script.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    include_dirs
        .iter()
        .fold(FileSystemLoader::new().with_root(parent), |loader, dir| loader.with_root(dir.clone()))
}

fn lint(options: &LintOptions) -> Result<LintSummary> {
    let mut system = MaterialSystem::from_config(&options.config);
    let mut compiler = ScriptCompiler::new(options.config.compiler.clone());
    let mut summary = LintSummary::default();

    for script in &options.scripts {
        let text = std::fs::read_to_string(script)
            .with_context(|| format!("Failed to read {}", script.display()))?;
        compiler.set_loader(loader_for(script, &options.include_dirs));

        let source = script.display().to_string();
        let ok = compiler.compile(&text, &source, &options.group, &mut system);
        summary.scripts += 1;
        if !ok {
            summary.failed_scripts += 1;
        }

        for entry in compiler.diagnostics().entries() {
            match entry.severity {
                Severity::Error => {
                    summary.errors += 1;
                    eprintln!("error: {entry}");
                }
                Severity::Warning => {
                    summary.warnings += 1;
                    eprintln!("warning: {entry}");
                }
            }
        }
    }

    for (_, material) in system.materials.iter() {
        let techniques = material.num_techniques();
        let supported = material.num_supported_techniques();
        if techniques > 0 && supported == 0 {
            println!("{}: no technique is supported by the configured hardware", material.name());
        }
    }
    println!(
        "{} material(s), {} program(s), {} compositor(s), {} particle system(s)",
        system.materials.len(),
        system.programs.len(),
        system.compositors.len(),
        system.particle_systems.len()
    );
    Ok(summary)
}
