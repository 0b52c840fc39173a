//! Command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{diagram, AttachVisitor, ForestBuilder, TreeArena};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    match &cli.command {
        Some(Commands::Tree { file }) => _tree(file.as_deref(), &settings),
        Some(Commands::Traverse {
            file,
            root,
            separator,
        }) => _traverse(file.as_deref(), *root, separator.as_deref(), &settings),
        Some(Commands::Leaves { file }) => _leaves(file.as_deref(), &settings),
        Some(Commands::Paths { file }) => _paths(file.as_deref(), &settings),
        Some(Commands::Stats { file }) => _stats(file.as_deref(), &settings),
        Some(Commands::Demo) => _demo(&settings),
        Some(Commands::Config { command }) => _config(command, &settings),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

/// Resolve the outline path: explicit argument first, configured
/// fallback second.
fn resolve_outline(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    match file {
        Some(path) => Ok(path.to_path_buf()),
        None => settings.outline.clone().ok_or_else(|| {
            CliError::Usage("no outline file given and no outline configured".to_string())
        }),
    }
}

fn load_forest(file: Option<&Path>, settings: &Settings) -> CliResult<TreeArena> {
    let path = resolve_outline(file, settings)?;
    debug!("outline: {}", path.display());
    let mut builder = ForestBuilder::new();
    Ok(builder.build_from_path(&path)?)
}

#[instrument(skip(settings))]
fn _tree(file: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let arena = load_forest(file, settings)?;
    let roots: Vec<_> = arena.roots().collect();
    for root in roots {
        output::info(&diagram(&arena, root));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _traverse(
    file: Option<&Path>,
    root: Option<i64>,
    separator: Option<&str>,
    settings: &Settings,
) -> CliResult<()> {
    let arena = load_forest(file, settings)?;
    let separator = separator.unwrap_or(&settings.separator);
    let roots: Vec<_> = match root {
        Some(value) => vec![arena.find_root(value).ok_or_else(|| {
            CliError::InvalidArgs(format!("no tree rooted at value {}", value))
        })?],
        None => arena.roots().collect(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for id in roots {
        arena
            .write_preorder(id, separator, &mut out)
            .and_then(|_| writeln!(out))
            .map_err(|e| CliError::io("writing traversal", e))?;
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _leaves(file: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let arena = load_forest(file, settings)?;
    let roots: Vec<_> = arena.roots().collect();
    debug!("found {} trees", roots.len());
    for root in roots {
        output::info(&arena.leaf_values(root).iter().join(" "));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _paths(file: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let arena = load_forest(file, settings)?;
    let roots: Vec<_> = arena.roots().collect();
    for root in roots {
        for path in arena.leaf_paths(root) {
            // Leaf first, like a dependency chain
            output::info(&path.iter().rev().join(" <- "));
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _stats(file: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let arena = load_forest(file, settings)?;
    let roots: Vec<_> = arena.roots().collect();
    output::header(&format!(
        "Forest: {} nodes in {} trees",
        arena.len(),
        roots.len()
    ));
    for root in roots {
        let mut branches = 0;
        let mut leaves = 0;
        for (_, node) in arena.preorder(root) {
            if node.is_branch() {
                branches += 1;
            } else {
                leaves += 1;
            }
        }
        output::detail(&format!(
            "root {}: {} nodes ({} branches, {} leaves), depth {}",
            arena.value(root)?,
            branches + leaves,
            branches,
            leaves,
            arena.depth(root)
        ));
    }
    Ok(())
}

/// Build the classic demonstration forest in memory and traverse every
/// handle: three branches, attachments routed through the dispatcher,
/// including one absorbed by a leaf.
#[instrument(skip(settings))]
fn _demo(settings: &Settings) -> CliResult<()> {
    let mut arena = TreeArena::new();
    let mut attach = AttachVisitor;

    let nodes = [
        arena.alloc_branch(1),
        arena.alloc_branch(2),
        arena.alloc_branch(3),
    ];

    arena.accept(nodes[0], &mut attach, nodes[1])?;
    arena.accept(nodes[0], &mut attach, nodes[2])?;
    let leaf4 = arena.alloc_leaf(4);
    arena.accept(nodes[0], &mut attach, leaf4)?;

    let leaf5 = arena.alloc_leaf(5);
    arena.accept(nodes[1], &mut attach, leaf5)?;
    let leaf6 = arena.alloc_leaf(6);
    arena.accept(nodes[1], &mut attach, leaf6)?;

    let leaf7 = arena.alloc_leaf(7);
    arena.accept(nodes[2], &mut attach, leaf7)?;

    // Attach request on a leaf: absorbed, nothing changes
    let leaf8 = arena.alloc_leaf(8);
    arena.accept(leaf4, &mut attach, leaf8)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for id in nodes {
        arena
            .write_preorder(id, &settings.separator, &mut out)
            .and_then(|_| writeln!(out))
            .map_err(|e| CliError::io("writing traversal", e))?;
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            if path.exists() {
                output::warning(&format!("config already exists: {}", path.display()));
                return Ok(());
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CliError::io("creating config directory", e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| CliError::io("writing config template", e))?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&path.display()),
                None => output::warning("cannot determine config directory"),
            }
            Ok(())
        }
    }
}

#[instrument]
fn _completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
