use crate::bbox::{BoundingBox, CanvasPoint};
use crate::config::{AnnotatorConfig, RememberedState};
use crate::error::AnnotatorError;
use crate::session::{InputEvent, Session, Shortcut};
use eframe::egui;
use log::error;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Where the GUI parks the error that ended the session, for `main` to
/// return once the window has closed.
pub type FatalSlot = Rc<RefCell<Option<AnnotatorError>>>;

/// Primary-button activity over the canvas during one frame, in canvas
/// pixels. `pos` is `None` once the pointer has left the window.
#[derive(Clone, Copy, Debug, Default)]
struct PointerFrame {
    pressed: bool,
    down: bool,
    released: bool,
    moved: bool,
    pos: Option<CanvasPoint>,
}

impl PointerFrame {
    fn events(&self, in_progress: Option<BoundingBox>) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let mut drawing = in_progress;
        if let Some(p) = self.pos.filter(|_| self.pressed) {
            events.push(InputEvent::Press(p));
            drawing = Some(BoundingBox::from_corners(p, p));
        } else if let (Some(b), Some(p)) = (drawing, self.pos) {
            if self.down && self.moved {
                events.push(InputEvent::Drag(p));
                drawing = Some(BoundingBox::from_corners(b.start(), p));
            }
        }
        // Off-window releases end the box at the last dragged corner.
        if let (true, Some(b)) = (self.released, drawing) {
            events.push(InputEvent::Release(self.pos.unwrap_or(b.end())));
        }
        events
    }
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    session: Session,
    config: AnnotatorConfig,
    remembered: RememberedState,
    /// Texture of the current image, tagged with the load revision it shows
    texture: Option<(u64, egui::TextureHandle)>,
    fatal: FatalSlot,
}

impl AnnotatorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AnnotatorConfig, fatal: FatalSlot) -> Self {
        Self {
            session: Session::new(),
            config,
            remembered: RememberedState::load(cc.storage),
            texture: None,
            fatal,
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        let Some(image) = self.session.current_image() else {
            self.texture = None;
            return;
        };
        if matches!(self.texture, Some((rev, _)) if rev == image.revision()) {
            return;
        }
        let pixels = image.pixels();
        let size = [pixels.width() as usize, pixels.height() as usize];
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_flat_samples().as_slice());
        let handle = ctx.load_texture("image", color_image, egui::TextureOptions::NEAREST);
        self.texture = Some((image.revision(), handle));
    }

    fn pick_directory(&self) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Select Directory");
        let start = self
            .session
            .directory()
            .or(self.remembered.last_directory.as_deref());
        if let Some(dir) = start {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder()
    }

    fn draw_box(&self, painter: &egui::Painter, origin: egui::Pos2, b: BoundingBox) {
        let to_screen = |p: CanvasPoint| origin + egui::vec2(p.x as f32, p.y as f32);
        painter.rect_stroke(
            egui::Rect::from_two_pos(to_screen(b.start()), to_screen(b.end())),
            0.0,
            egui::Stroke::new(self.config.outline_width, self.config.outline),
            egui::StrokeKind::Middle,
        );
    }

    fn canvas_events(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        response: &egui::Response,
        events: &mut Vec<InputEvent>,
    ) {
        let frame = ui.input(|i| PointerFrame {
            pressed: i.pointer.primary_pressed() && response.hovered(),
            down: i.pointer.primary_down(),
            released: i.pointer.primary_released(),
            moved: i.pointer.delta() != egui::Vec2::ZERO,
            pos: i.pointer.interact_pos().map(|pos| {
                CanvasPoint::new(
                    (pos.x - rect.min.x).floor() as i32,
                    (pos.y - rect.min.y).floor() as i32,
                )
            }),
        });
        events.extend(frame.events(self.session.in_progress()));
    }

    fn apply(&mut self, ctx: &egui::Context, events: Vec<InputEvent>) {
        for event in events {
            if let InputEvent::DirectoryPicked(Some(dir)) = &event {
                self.remembered.last_directory = Some(dir.clone());
            }
            if let Err(err) = self.session.handle(event) {
                error!("Fatal: {err}");
                *self.fatal.borrow_mut() = Some(err);
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.fatal.borrow().is_some() {
            return;
        }
        self.ensure_texture(ctx);

        let mut events = Vec::new();

        // Keyboard shortcuts
        ctx.input(|i| {
            events.extend(self.config.keys.pressed(i).into_iter().map(InputEvent::Key));
        });

        egui::TopBottomPanel::top("directory").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(6.0);
                ui.label(self.session.status().to_string());
                if ui.button("Select Directory").clicked() {
                    events.push(InputEvent::DirectoryPicked(self.pick_directory()));
                }
                ui.add_space(6.0);
            });
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Previous Image (A)").clicked() {
                    events.push(InputEvent::Key(Shortcut::PreviousImage));
                }
                if ui.button("Delete Last Box").clicked() {
                    events.push(InputEvent::Key(Shortcut::DeleteLastBox));
                }
                if ui.button("Next Image (D)").clicked() {
                    events.push(InputEvent::Key(Shortcut::NextImage));
                }
            });
        });

        // Canvas, one point per image pixel
        egui::CentralPanel::default().show(ctx, |ui| {
            let (Some(image), Some((_, tex))) = (self.session.current_image(), &self.texture)
            else {
                return;
            };
            let size = egui::vec2(image.width() as f32, image.height() as f32);
            egui::ScrollArea::both()
                .drag_to_scroll(false)
                .show(ui, |ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(size, egui::Sense::click_and_drag());
                    let painter = ui.painter_at(rect);
                    painter.image(
                        tex.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                    for b in self.session.boxes() {
                        self.draw_box(&painter, rect.min, *b);
                    }
                    if let Some(b) = self.session.in_progress() {
                        self.draw_box(&painter, rect.min, b);
                    }
                    self.canvas_events(ui, rect, &response, &mut events);
                });
        });

        self.apply(ctx, events);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.remembered.save(storage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> Option<CanvasPoint> {
        Some(CanvasPoint::new(x, y))
    }

    #[test]
    fn click_is_press_then_release() {
        let frame = PointerFrame {
            pressed: true,
            released: true,
            pos: at(4, 5),
            ..Default::default()
        };
        assert_eq!(
            frame.events(None),
            vec![
                InputEvent::Press(CanvasPoint::new(4, 5)),
                InputEvent::Release(CanvasPoint::new(4, 5)),
            ]
        );
    }

    #[test]
    fn motion_while_drawing_is_a_drag() {
        let frame = PointerFrame {
            down: true,
            moved: true,
            pos: at(-3, 40),
            ..Default::default()
        };
        let box_started = Some(BoundingBox::new(1, 1, 1, 1));
        assert_eq!(
            frame.events(box_started),
            vec![InputEvent::Drag(CanvasPoint::new(-3, 40))]
        );
        assert!(frame.events(None).is_empty());
    }

    #[test]
    fn release_outside_window_commits_last_corner() {
        let frame = PointerFrame {
            released: true,
            pos: None,
            ..Default::default()
        };
        assert_eq!(
            frame.events(Some(BoundingBox::new(10, 10, 250, -7))),
            vec![InputEvent::Release(CanvasPoint::new(250, -7))]
        );
    }

    #[test]
    fn release_without_box_is_dropped() {
        let frame = PointerFrame {
            released: true,
            pos: at(2, 2),
            ..Default::default()
        };
        assert!(frame.events(None).is_empty());
    }

    #[test]
    fn off_window_release_reaches_the_sidecar() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let image = temp.path().join("a.png");
        image::RgbImage::new(8, 8).save(&image).expect("write test image");
        let mut session = Session::new();
        session.load_image(&image).expect("load image");

        let press = PointerFrame {
            pressed: true,
            down: true,
            pos: at(2, 3),
            ..Default::default()
        };
        let drag = PointerFrame {
            down: true,
            moved: true,
            pos: at(30, -4),
            ..Default::default()
        };
        let release = PointerFrame {
            released: true,
            ..Default::default()
        };
        for frame in [press, drag, release] {
            for event in frame.events(session.in_progress()) {
                session.handle(event).expect("handle");
            }
        }

        assert_eq!(session.boxes(), &[BoundingBox::new(2, 3, 30, -4)]);
        let text = std::fs::read_to_string(crate::sidecar::sidecar_path(&image))
            .expect("read sidecar");
        assert_eq!(text, "2 3 30 -4\n");
    }
}
