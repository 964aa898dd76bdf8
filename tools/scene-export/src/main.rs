//! scene-export - scene exporter
//!
//! Converts a scene dumped from the authoring tool (JSON) into a `.tscene`
//! file.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use scene_export::source::ObjectKind;
use scene_export::{compile_scene, export_to_directory, ExportConfig, SceneDocument, SceneSource};

#[derive(Parser)]
#[command(name = "scene-export")]
#[command(about = "Scene exporter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene file
    Build {
        /// Scene document (JSON)
        scene: PathBuf,

        /// Path to export.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export selected objects
        #[arg(long)]
        selection_only: bool,

        /// Export every clip on this armature instead of assigned clips
        #[arg(long)]
        animation_library: Option<String>,

        /// Scene name (overrides config and document)
        #[arg(long)]
        name: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compile a scene without writing it
    Check {
        /// Scene document (JSON)
        scene: PathBuf,

        /// Path to export.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List objects and clips in a scene document
    List {
        /// Scene document (JSON)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Build { verbose: true, .. });
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Build {
            scene,
            config,
            output,
            selection_only,
            animation_library,
            name,
            verbose: _,
        } => {
            let mut export_config = ExportConfig::load_or_default(config.as_deref())?;
            if selection_only {
                export_config.export.selection_only = true;
            }
            if animation_library.is_some() {
                export_config.export.animation_library = animation_library;
            }
            if name.is_some() {
                export_config.output.scene_name = name;
            }

            let document = SceneDocument::load(&scene)?;
            let destination = match output {
                Some(dir) => dir,
                None => export_config.destination(scene_dir(&scene)),
            };

            let (path, report) = export_to_directory(&document, &export_config, &destination)?;
            tracing::info!("Exported {} ({})", path.display(), report);
            Ok(())
        }

        Commands::Check { scene, config } => {
            let export_config = ExportConfig::load_or_default(config.as_deref())?;
            let document = SceneDocument::load(&scene)?;
            match compile_scene(&document, &export_config) {
                Ok(compiled) => {
                    tracing::info!("Scene '{}' is valid: {}", compiled.name, compiled.report());
                    Ok(())
                }
                Err(e) => bail!("Scene '{}' failed to compile: {}", document.scene_name(), e),
            }
        }

        Commands::List { scene } => {
            let document = SceneDocument::load(&scene)?;
            list_document(&document);
            Ok(())
        }
    }
}

fn scene_dir(scene: &Path) -> &Path {
    scene.parent().unwrap_or_else(|| Path::new("."))
}

fn list_document(document: &SceneDocument) {
    println!("Scene '{}'", document.scene_name());
    println!("Objects:");
    for id in document.objects() {
        let Some(object) = document.object(id) else {
            continue;
        };
        let kind = match object.kind {
            ObjectKind::Mesh => "mesh",
            ObjectKind::Light => "light",
            ObjectKind::Armature => "armature",
            ObjectKind::Other => "other",
        };
        let mut line = format!("  [{}] {} ({})", id.0, object.name, kind);
        if let Some(parent) = object.parent.and_then(|p| document.object(p)) {
            line.push_str(&format!(" parent={}", parent.name));
        }
        if let Some(clip) = object.clip.and_then(|c| document.clip(c)) {
            line.push_str(&format!(" clip={}", clip.name));
        }
        if !object.visible {
            line.push_str(" [hidden]");
        } else if object.selected {
            line.push_str(" [selected]");
        }
        println!("{}", line);
    }
    println!("Clips:");
    for id in document.clips() {
        if let Some(clip) = document.clip(id) {
            println!(
                "  [{}] {} (frames {}..={})",
                id.0, clip.name, clip.frame_range[0], clip.frame_range[1]
            );
        }
    }
}
