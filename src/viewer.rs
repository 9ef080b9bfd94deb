//! Interactive viewer window
//!
//! An `eframe` application wrapping a [`Session`]: a side panel with the five
//! parameter sliders, key hints and a status line, and the original and
//! enhanced frames side by side.

use eframe::egui;
use tracing::{debug, info};

use crate::error::{EnhanceError, Result};
use crate::params::{ParamEvent, ParamKind};
use crate::session::{Command, DisplayFrames, FfmpegBackend, Mode, Session};
use crate::video::Frame;

const WINDOW_TITLE: &str = "Underwater Enhancer";

/// Keys polled every frame besides Escape
const COMMAND_KEYS: [(egui::Key, char); 6] = [
    (egui::Key::Q, 'q'),
    (egui::Key::V, 'v'),
    (egui::Key::I, 'i'),
    (egui::Key::S, 's'),
    (egui::Key::P, 'p'),
    (egui::Key::E, 'e'),
];

/// Open the viewer window and block until it is closed
pub fn run(session: Session<FfmpegBackend>, window_size: (u32, u32)) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window_size.0 as f32, window_size.1 as f32])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    info!("Opening viewer window");

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(EnhancerApp::new(session)))),
    )
    .map_err(|e| EnhanceError::generic(format!("viewer failed: {}", e)))
}

struct EnhancerApp {
    session: Session<FfmpegBackend>,
    original_texture: Option<egui::TextureHandle>,
    enhanced_texture: Option<egui::TextureHandle>,
    needs_render: bool,
    error_message: Option<String>,
}

impl EnhancerApp {
    fn new(session: Session<FfmpegBackend>) -> Self {
        Self {
            session,
            original_texture: None,
            enhanced_texture: None,
            needs_render: true,
            error_message: None,
        }
    }

    fn poll_commands(&self, ctx: &egui::Context) -> Vec<Command> {
        ctx.input(|i| {
            let mut commands = Vec::new();
            if i.key_pressed(egui::Key::Escape) {
                commands.push(Command::Quit);
            }
            for (key, ch) in COMMAND_KEYS {
                if i.key_pressed(key) {
                    if let Some(command) = Command::from_key(ch) {
                        commands.push(command);
                    }
                }
            }
            commands
        })
    }

    fn render(&mut self, ctx: &egui::Context) {
        match self.session.step() {
            Ok(DisplayFrames { original, enhanced }) => {
                update_texture(ctx, &mut self.original_texture, "original", &original);
                update_texture(ctx, &mut self.enhanced_texture, "enhanced", &enhanced);
                self.error_message = None;
            }
            Err(e) => {
                debug!("Frame failed: {}", e);
                self.error_message = Some(e.user_message());
            }
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        ui.separator();

        for kind in ParamKind::ALL {
            let mut value = self.session.params().get(kind);
            let mut slider = egui::Slider::new(&mut value, kind.range()).text(kind.label());
            if kind.is_integer() {
                slider = slider.integer();
            }

            if ui.add(slider).changed() && self.session.apply_param(ParamEvent::new(kind, value)) {
                self.needs_render = true;
            }
        }

        ui.add_space(12.0);
        ui.heading("Keys");
        ui.separator();
        for command in Command::ALL {
            ui.label(format!("{:>6}  {}", command.key_hint(), command.description()));
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label(format!("Mode: {}", self.session.mode()));
        ui.label(self.session.status());
        if let Some(error) = &self.error_message {
            ui.colored_label(egui::Color32::RED, error.as_str());
        }
    }

    fn show_frames(&self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let panel_width = (available.x - ui.spacing().item_spacing.x) / 2.0;

        ui.horizontal(|ui| {
            for (title, texture) in [
                ("Original", &self.original_texture),
                ("Enhanced", &self.enhanced_texture),
            ] {
                ui.vertical(|ui| {
                    ui.label(title);
                    if let Some(texture) = texture {
                        let size = texture.size_vec2();
                        let scale = (panel_width / size.x).min(available.y / size.y).min(1.0);
                        ui.add(egui::Image::new((texture.id(), size * scale)));
                    }
                });
            }
        });
    }
}

impl eframe::App for EnhancerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for command in self.poll_commands(ctx) {
            let mode = self.session.mode();
            self.session.dispatch(command);
            if self.session.mode() != mode {
                self.needs_render = true;
            }
        }

        if !self.session.is_running() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        egui::SidePanel::left("controls")
            .default_width(280.0)
            .resizable(false)
            .show(ctx, |ui| self.show_controls(ui));

        // video advances one frame per repaint
        if self.needs_render || self.session.mode() == Mode::Video {
            self.render(ctx);
            self.needs_render = false;
        }

        egui::CentralPanel::default().show(ctx, |ui| self.show_frames(ui));

        if self.session.mode() == Mode::Video {
            ctx.request_repaint();
        }
    }
}

fn update_texture(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    frame: &Frame,
) {
    let image = egui::ColorImage::from_rgb(
        [frame.width() as usize, frame.height() as usize],
        frame.as_rgb_bytes(),
    );

    match slot {
        Some(texture) => texture.set(image, Default::default()),
        None => *slot = Some(ctx.load_texture(name, image, Default::default())),
    }
}
