//! Toast notifications
//!
//! A pending toast stays up until its request resolves it into a success or
//! error toast. Final toasts are fully visible for a few seconds, then fade
//! out and get pruned. Hovering a toast restarts its timer.

use crate::constants::{TOAST_FADE_SECS, TOAST_MAX, TOAST_VISIBLE_SECS};
use crate::theme;
use eframe::egui;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Pending,
    Success,
    Error,
}

pub type ToastId = u64;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    /// Opacity at `now`: 1.0 while visible, linear fade afterwards. Pending toasts never fade.
    pub fn alpha(&self, now: Instant) -> f32 {
        if self.kind == ToastKind::Pending {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.shown_at).as_secs_f32();
        if elapsed <= TOAST_VISIBLE_SECS {
            1.0
        } else {
            ((TOAST_VISIBLE_SECS + TOAST_FADE_SECS - elapsed) / TOAST_FADE_SECS).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.kind != ToastKind::Pending
            && now.saturating_duration_since(self.shown_at).as_secs_f32()
                >= TOAST_VISIBLE_SECS + TOAST_FADE_SECS
    }
}

#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
    next_id: ToastId,
}

impl Toasts {
    pub fn pending(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        self.push(ToastKind::Pending, message.into(), now)
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        self.push(ToastKind::Success, message.into(), now)
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        self.push(ToastKind::Error, message.into(), now)
    }

    /// Replace toast `id` in place. Pushes a fresh toast if it is already gone.
    pub fn resolve(&mut self, id: ToastId, kind: ToastKind, message: impl Into<String>, now: Instant) -> ToastId {
        let message = message.into();
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(toast) => {
                toast.kind = kind;
                toast.message = message;
                toast.shown_at = now;
                id
            }
            None => self.push(kind, message, now),
        }
    }

    /// Restart the timer of toast `id` (used while it is hovered)
    pub fn hold(&mut self, id: ToastId, now: Instant) {
        if let Some(toast) = self.items.iter_mut().find(|t| t.id == id) {
            toast.shown_at = now;
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| !t.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, kind: ToastKind, message: String, now: Instant) -> ToastId {
        if self.items.len() >= TOAST_MAX {
            // Oldest final toast goes first; pending ones only if nothing else is left.
            let victim = self
                .items
                .iter()
                .position(|t| t.kind != ToastKind::Pending)
                .unwrap_or(0);
            self.items.remove(victim);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast {
            id,
            kind,
            message,
            shown_at: now,
        });
        id
    }

    /// Draw toasts stacked upward from the bottom-right corner of `screen`.
    pub fn show(&mut self, ctx: &egui::Context, screen: egui::Rect) {
        let now = Instant::now();
        self.prune(now);
        if self.items.is_empty() {
            return;
        }

        let margin = theme::SPACING_LG;
        let mut bottom = screen.bottom() - margin;
        let mut hovered = Vec::new();

        // Newest at the bottom, older ones above it
        for toast in self.items.iter().rev() {
            let alpha = toast.alpha(now);
            let (accent, icon) = theme::toast_style(toast.kind);
            let response = egui::Area::new(egui::Id::new(("toast", toast.id)))
                .order(egui::Order::Foreground)
                .fixed_pos(egui::pos2(screen.right() - margin, bottom))
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .show(ctx, |ui| {
                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x1e, (230.0 * alpha) as u8))
                        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::fade(accent, 0.4 * alpha)))
                        .corner_radius(theme::RADIUS_MEDIUM)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.set_min_width(theme::TOAST_WIDTH);
                            ui.horizontal(|ui| {
                                if toast.kind == ToastKind::Pending {
                                    ui.add(egui::Spinner::new().size(theme::FONT_BODY).color(accent));
                                } else {
                                    ui.label(egui::RichText::new(icon).color(theme::fade(accent, alpha)));
                                }
                                ui.label(
                                    egui::RichText::new(&toast.message)
                                        .size(theme::FONT_BODY)
                                        .color(theme::fade(theme::TEXT_PRIMARY, alpha)),
                                );
                            });
                        });
                });

            if response.response.hovered() {
                hovered.push(toast.id);
            }
            bottom -= response.response.rect.height() + theme::SPACING_MD;
        }

        for id in hovered {
            self.hold(id, now);
        }

        // Keep animating while anything is on screen
        ctx.request_repaint();
    }
}
