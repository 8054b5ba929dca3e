use std::{error::Error, fs, path::PathBuf};

use clap::{Parser, Subcommand};
use eframe::egui;
use ticktocktone::{config, player, ChimeApp};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// write a default config and create the chime directory
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// copy an audio file into the chime directory
    AddChime { path: PathBuf },
}

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the logger
    simple_file_logger::init_logger!("ticktocktone").expect("couldn't initialize logger");

    let args = Args::parse();
    match args.command {
        Some(Command::Init { force }) => {
            if force || !config::is_config_present() {
                let path = config::config_path();
                config::write_default(&path)?;
                fs::create_dir_all(config::chimes_path())?;
                log::info!("wrote default config to {}", path.display());
            }
        }
        Some(Command::AddChime { path }) => {
            let chime = player::install_chime(&path)?;
            log::info!("installed chime {}", chime.name);
        }
        None => {}
    }

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(260.0, 320.0)),
        resizable: false,
        ..Default::default()
    };
    // run the gui
    eframe::run_native(
        "TickTockTone",
        native_options,
        Box::new(|_| Box::new(ChimeApp::new())),
    )
    .map_err(Into::into)
}
