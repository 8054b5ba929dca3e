#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui::{self, Button, CentralPanel, RichText, TopBottomPanel};

use config::IntervalTable;
use player::{Chime, Player, RodioPlayer};
use scheduler::{Scheduler, SystemClock, TickOutcome};

pub mod config;
pub mod player;
/// the chime countdown state machine
pub mod scheduler;

/// the chime player window
pub struct ChimeApp {
    intervals: IntervalTable,
    selected_interval: String,
    chimes: Vec<Chime>,
    selected_chime: Option<usize>,
    scheduler: Scheduler,
    clock: SystemClock,
    player: RodioPlayer,
    status: String,
}

impl Default for ChimeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ChimeApp {
    #[must_use]
    pub fn new() -> Self {
        let intervals = IntervalTable::load(&config::config_path());
        let selected_interval = intervals.first_label().to_string();
        let chimes = player::available_chimes(&config::chimes_path());
        if chimes.is_empty() {
            log::warn!(
                "no chime sounds found in {}",
                config::chimes_path().display()
            );
        }
        let selected_chime = if chimes.is_empty() { None } else { Some(0) };
        Self {
            intervals,
            selected_interval,
            chimes,
            selected_chime,
            scheduler: Scheduler::new(),
            clock: SystemClock,
            player: RodioPlayer::new(),
            status: "Click to start chiming:".to_string(),
        }
    }

    fn selected_chime_path(&self) -> Option<PathBuf> {
        self.selected_chime
            .and_then(|i| self.chimes.get(i))
            .map(|chime| chime.path.clone())
    }

    fn play_selected(&mut self) {
        match self.selected_chime_path() {
            Some(path) => {
                if let Err(e) = self.player.play(&path) {
                    log::error!("couldn't play chime: {e}");
                }
            }
            None => log::warn!("no chime sound selected"),
        }
    }

    fn toggle_chiming(&mut self) {
        if self.scheduler.is_running() {
            self.scheduler.stop();
            self.status = "Chime stopped.".to_string();
        } else {
            // the interval is fixed here: changing the selector while
            // running only applies after the next stop/start
            let minutes = self
                .intervals
                .minutes_of(&self.selected_interval)
                .unwrap_or_else(|| {
                    log::warn!(
                        "unknown interval {:?}, using the first choice",
                        self.selected_interval
                    );
                    self.intervals
                        .minutes_of(self.intervals.first_label())
                        .unwrap_or(60)
                });
            self.scheduler.start(minutes, &self.clock);
        }
    }

    fn render_title(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("title").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let title = Button::new(RichText::new("TickTockTone").heading()).frame(false);
                if ui
                    .add(title)
                    .on_hover_text("play the selected chime")
                    .clicked()
                {
                    self.play_selected();
                }
            });
        });
    }

    fn render_interval_selector(&mut self, ui: &mut egui::Ui) {
        ui.label("Set chime interval:");
        egui::ComboBox::from_id_source("interval")
            .selected_text(self.selected_interval.clone())
            .show_ui(ui, |ui| {
                for label in self.intervals.labels() {
                    ui.selectable_value(&mut self.selected_interval, label.to_string(), label);
                }
            });
    }

    fn render_chime_selector(&mut self, ui: &mut egui::Ui) {
        ui.label("Select chime sound:");
        let selected_name = self
            .selected_chime
            .and_then(|i| self.chimes.get(i))
            .map_or_else(|| "no chimes found".to_string(), |chime| chime.name.clone());
        egui::ComboBox::from_id_source("chime")
            .selected_text(selected_name)
            .show_ui(ui, |ui| {
                for (i, chime) in self.chimes.iter().enumerate() {
                    ui.selectable_value(&mut self.selected_chime, Some(i), chime.name.as_str());
                }
            });
        if ui.button("Add chime…").clicked() {
            self.add_custom_chime();
        }
    }

    fn add_custom_chime(&mut self) {
        let dialog = rfd::FileDialog::new()
            .set_title("Pick a chime sound")
            .add_filter("audio", &["flac", "mp3", "ogg", "wav"]);
        let dialog = match directories::UserDirs::new()
            .and_then(|dirs| dirs.audio_dir().map(Path::to_path_buf))
        {
            Some(audio_dir) => dialog.set_directory(audio_dir),
            None => dialog,
        };
        if let Some(picked) = dialog.pick_file() {
            match player::install_chime(&picked) {
                Ok(chime) => {
                    log::info!("installed chime {}", chime.name);
                    let name = chime.name.clone();
                    self.chimes.push(chime);
                    self.chimes.sort_by(|a, b| a.name.cmp(&b.name));
                    self.selected_chime = self.chimes.iter().position(|c| c.name == name);
                }
                Err(e) => log::error!("couldn't install chime: {e}"),
            }
        }
    }
}

impl eframe::App for ChimeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.scheduler.is_running() {
            // the chime sound is re-resolved at every firing, so switching
            // it takes effect at the next chime without a restart
            let chime = self.selected_chime_path();
            let outcome = self
                .scheduler
                .on_tick(&self.clock, &mut self.player, chime.as_deref());
            match outcome {
                TickOutcome::Pending(left) | TickOutcome::Chimed(left) => {
                    self.status = format!("Chime in: {}m {}s", left.minutes, left.seconds);
                }
                TickOutcome::Idle => {}
            }
            // keep ticking about once a second without busy repainting
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        self.render_title(ctx);
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                self.render_interval_selector(ui);
                self.render_chime_selector(ui);
                ui.label(self.status.clone());
                let toggle = if self.scheduler.is_running() {
                    "Stop"
                } else {
                    "Start"
                };
                if ui.button(toggle).clicked() {
                    self.toggle_chiming();
                }
            });
        });
    }
}
