//! Lesson panels and on-screen labels drawn with egui

use egui::{Color32, Context, RichText};
use glam::Vec2;

/// A fact shown in the lesson sidebar
pub struct Note {
    pub name: &'static str,
    pub detail: &'static str,
}

/// What the sidebar shows this frame
pub struct LessonView<'a> {
    pub title: &'a str,
    pub prompt: &'a str,
    /// Current and final step, when the lab is step driven
    pub progress: Option<(u32, u32)>,
    pub notes: &'a [Note],
    pub completion: Option<&'a str>,
}

/// Draw the lesson sidebar
pub fn draw_lesson_panel(ctx: &Context, view: &LessonView) {
    egui::SidePanel::right("lesson_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(view.title).color(Color32::LIGHT_BLUE));
            ui.separator();

            if let Some((step, total)) = view.progress {
                ui.add(egui::ProgressBar::new(step.saturating_sub(1) as f32 / total.saturating_sub(1).max(1) as f32).text(format!("Step {} / {}", step.min(total), total)));
                ui.add_space(6.0);
            }

            ui.group(|ui| {
                ui.label(RichText::new(view.prompt).strong().color(Color32::YELLOW));
            });

            if let Some(text) = view.completion {
                ui.add_space(6.0);
                ui.label(RichText::new(text).strong().color(Color32::LIGHT_GREEN));
            }

            if !view.notes.is_empty() {
                ui.add_space(8.0);
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.collapsing(RichText::new("📖 Notes").strong(), |ui| {
                        for note in view.notes {
                            ui.group(|ui| {
                                ui.label(RichText::new(note.name).strong().color(Color32::YELLOW));
                                ui.label(RichText::new(note.detail).small().italics());
                            });
                            ui.add_space(4.0);
                        }
                    });
                });
            }
        });
}

/// Prompt strip along the top of the window
pub fn draw_prompt_banner(ctx: &Context, prompt: &str) {
    egui::TopBottomPanel::top("prompt_banner").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(prompt).strong());
        });
    });
}

/// Clickable label pinned to a screen position. Returns true when clicked.
pub fn world_label(ctx: &Context, id: &str, screen: Vec2, text: &str, color: Color32) -> bool {
    let pixels_per_point = ctx.pixels_per_point();
    let pos = egui::pos2(screen.x / pixels_per_point, screen.y / pixels_per_point);
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(pos)
        .pivot(egui::Align2::CENTER_CENTER)
        .show(ctx, |ui| ui.button(RichText::new(text).color(color)).clicked())
        .inner
}

/// Plain caption pinned to a screen position
pub fn world_text(ctx: &Context, id: &str, screen: Vec2, text: &str, color: Color32) {
    let pixels_per_point = ctx.pixels_per_point();
    let pos = egui::pos2(screen.x / pixels_per_point, screen.y / pixels_per_point);
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(pos)
        .pivot(egui::Align2::CENTER_CENTER)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(text).strong().color(color));
            });
        });
}

/// Convert `[r, g, b, a]` in 0..1 to an egui color
pub fn to_color32(color: [f32; 4]) -> Color32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(c(color[0]), c(color[1]), c(color[2]), c(color[3]))
}
