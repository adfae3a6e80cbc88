use std::path::Path;

use anyhow::Result;
use clap::Parser;
use sa_ascii::style::catalog;
use sa_core::config::ConvertConfig;

pub mod cli;
pub mod convert;
pub mod font;
pub mod output;
pub mod pipeline;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config puis appliquer les overrides CLI
    let mut config = resolve_config(&cli.config)?;
    cli.apply_overrides(&mut config);

    match &cli.command {
        Command::Styles => {
            print_styles();
            Ok(())
        }
        Command::Image(args) => {
            let report = convert::convert_image(&args.input, args.output.as_deref(), &config)?;
            if args.print {
                print!("{}", report.grid.to_text());
            }
            println!(
                "Image ASCII ({}x{}) écrite : {}",
                report.canvas_size.0,
                report.canvas_size.1,
                report.output.display()
            );
            Ok(())
        }
        #[cfg(feature = "video")]
        Command::Video(args) => {
            let report = convert::convert_video(&args.input, args.output.as_deref(), &config)?;
            println!(
                "Vidéo ASCII ({} frames, {} chunks) écrite : {}",
                report.sequence.frames,
                report.sequence.chunks,
                report.output.display()
            );
            Ok(())
        }
    }
}

/// Config TOML si présente, sinon défauts.
fn resolve_config(path: &Path) -> Result<ConvertConfig> {
    if path.exists() {
        sa_core::config::load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(ConvertConfig::default())
    }
}

fn print_styles() {
    for style in catalog().iter() {
        let ramp: String = style.ramp.chars().iter().collect();
        println!(
            "{:<10} {:?}  {:?}  gamma {:.2}  ramp \"{ramp}\"",
            style.name, style.color_mode, style.preprocess, style.gamma
        );
    }
}
