use bevy::prelude::*;
use std::path::PathBuf;

use crate::resources::DemoScene;

/// Command-line arguments parsed at startup.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    /// Scene config file to load instead of the defaults.
    /// Usage: `cargo run -- --config my_scene.json`
    pub config: Option<PathBuf>,

    /// Which demo scene to build.
    /// Usage: `cargo run -- --scene foliage`
    pub scene: DemoScene,

    /// Problems found while parsing, logged once the app is running.
    pub warnings: Vec<String>,
}

impl CliArgs {
    /// Parse command-line arguments.
    /// Supports:
    /// - `--config <path>`: Load the scene from a JSON file
    /// - `--scene grass|foliage|orderable`: Pick a demo scene
    pub fn parse() -> Self {
        Self::parse_from(std::env::args().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    if i + 1 < args.len() {
                        cli.config = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        cli.warn("--config requires a file path argument".to_string());
                        i += 1;
                    }
                }
                "--scene" => {
                    if i + 1 < args.len() {
                        match args[i + 1].parse() {
                            Ok(scene) => cli.scene = scene,
                            Err(e) => {
                                let fallback = cli.scene;
                                cli.warn(format!("{}, using {:?}", e, fallback));
                            }
                        }
                        i += 2;
                    } else {
                        cli.warn("--scene requires a scene name argument".to_string());
                        i += 1;
                    }
                }
                arg => {
                    if arg.starts_with('-') {
                        cli.warn(format!("Unknown argument '{}'", arg));
                    }
                    i += 1;
                }
            }
        }

        cli
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}
