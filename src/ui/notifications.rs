//! Transient notifications painted in the bottom-right corner.

use chrono::{DateTime, Local, TimeDelta};
use eframe::egui::{self, Margin, RichText};

use super::components::colors;
use crate::controller::{Notice, NoticeLevel};

/// A notice and when it appeared.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: DateTime<Local>,
}

/// Stack of visible notifications.
pub struct Notifications {
    toasts: Vec<Toast>,
    lifetime: TimeDelta,
}

impl Notifications {
    /// Lifetimes beyond what chrono can represent saturate.
    pub fn new(lifetime_secs: u64) -> Self {
        let lifetime = i64::try_from(lifetime_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            toasts: Vec::new(),
            lifetime,
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Local::now());
    }

    pub fn push_at(&mut self, notice: Notice, shown_at: DateTime<Local>) {
        self.toasts.push(Toast { notice, shown_at });
    }

    /// Drop toasts older than the configured lifetime.
    pub fn prune(&mut self, now: DateTime<Local>) {
        let lifetime = self.lifetime;
        self.toasts.retain(|t| now - t.shown_at < lifetime);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Paint the stack. Clicking a toast dismisses it.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Local::now());
        if self.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -40.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (idx, toast) in self.toasts.iter().enumerate() {
                    let color = match toast.notice.level {
                        NoticeLevel::Success => colors::SUCCESS,
                        NoticeLevel::Error => colors::ERROR,
                    };
                    let response = egui::Frame::popup(ui.style())
                        .inner_margin(Margin::symmetric(12, 8))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&toast.notice.text).color(color));
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        dismissed = Some(idx);
                    }
                    ui.add_space(6.0);
                }
            });

        if let Some(idx) = dismissed {
            self.toasts.remove(idx);
        }
    }
}
