//! Generic choice dialog.
//!
//! A dialog shows a message, an optional icon and one button per option. The
//! last option is preselected unless [`Dialog::set_initial_value`] says
//! otherwise. Closing the dialog without pressing a button leaves it without
//! a response.

use crate::texture::TextureCache;
use crate::theme::dialog_frame;
use crate::{Result, UiError};
use colonist_media::Image;
use egui::{Context, Id, Key, Ui, Vec2};
use std::sync::atomic::{AtomicU64, Ordering};

/// Above this many options the buttons are placed in a scroll area.
pub const SCROLL_THRESHOLD: usize = 20;

/// Largest height of the scrolled option list, in points.
const MAX_SCROLL_HEIGHT: f32 = 400.0;

static NEXT_DIALOG: AtomicU64 = AtomicU64::new(0);

/// Look of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogType {
    /// Message and buttons only
    #[default]
    Plain,
    /// Marked as a question when no icon is given
    Question,
}

/// One button of a dialog.
#[derive(Clone)]
pub struct ChoiceItem<T> {
    /// Button text
    pub text: String,
    /// Value returned when chosen
    pub value: T,
    /// Image drawn on the button
    pub icon: Option<Image>,
    /// Disabled items are shown but cannot be chosen
    pub enabled: bool,
}

impl<T> ChoiceItem<T> {
    /// An enabled option without an icon.
    pub fn new(text: impl Into<String>, value: T) -> Self {
        Self {
            text: text.into(),
            value,
            icon: None,
            enabled: true,
        }
    }

    /// Draw `icon` on the button.
    pub fn with_icon(mut self, icon: Image) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Show the option without letting it be chosen.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A message with a set of choices.
pub struct Dialog<T> {
    id: Id,
    dialog_type: DialogType,
    modal: bool,
    message: String,
    icon: Option<Image>,
    options: Vec<ChoiceItem<T>>,
    initial: usize,
    open: bool,
    focus_pending: bool,
    response: Option<usize>,
}

impl<T> Dialog<T> {
    /// Create an open dialog. At least one option is required.
    pub fn new(
        dialog_type: DialogType,
        modal: bool,
        message: impl Into<String>,
        options: Vec<ChoiceItem<T>>,
    ) -> Result<Self> {
        if options.is_empty() {
            return Err(UiError::NoOptions);
        }
        let initial = options.len() - 1;
        Ok(Self {
            id: Id::new(("dialog", NEXT_DIALOG.fetch_add(1, Ordering::Relaxed))),
            dialog_type,
            modal,
            message: message.into(),
            icon: None,
            options,
            initial,
            open: true,
            focus_pending: true,
            response: None,
        })
    }

    /// Show `icon` next to the message.
    pub fn with_icon(mut self, icon: Image) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Look of the dialog.
    pub fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Whether the dialog blocks the rest of the interface.
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    /// Text shown above the options.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Options in button order.
    pub fn options(&self) -> &[ChoiceItem<T>] {
        &self.options
    }

    /// Index of the preselected option.
    pub fn initial_value(&self) -> usize {
        self.initial
    }

    /// Preselect the option at `index`.
    pub fn set_initial_value(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.initial = index;
        self.focus_pending = true;
        Ok(())
    }

    /// Whether the scrolled layout is used.
    pub fn scrolls(&self) -> bool {
        self.options.len() > SCROLL_THRESHOLD
    }

    /// False once an option was chosen or the dialog was dismissed.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Choose the option at `index` and close.
    pub fn choose(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.response = Some(index);
        self.open = false;
        Ok(())
    }

    /// Close without choosing.
    pub fn dismiss(&mut self) {
        self.response = None;
        self.open = false;
    }

    /// The chosen value, `None` while open or after a dismissal.
    pub fn response(&self) -> Option<&T> {
        self.response.map(|i| &self.options[i].value)
    }

    /// Consume the dialog, returning the chosen value.
    pub fn into_response(mut self) -> Option<T> {
        let index = self.response?;
        Some(self.options.swap_remove(index).value)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.options.len() {
            Ok(())
        } else {
            Err(UiError::InvalidOption {
                index,
                len: self.options.len(),
            })
        }
    }

    /// Draw the dialog. Returns true while it stays open.
    pub fn show(&mut self, ctx: &Context, textures: &mut TextureCache) -> bool {
        if !self.open {
            return false;
        }
        let focus = self.focus_pending;
        let mut chosen = None;
        let frame = dialog_frame(&ctx.style());

        let dismissed = if self.modal {
            egui::Modal::new(self.id)
                .frame(frame)
                .show(ctx, |ui| self.contents(ui, textures, focus, &mut chosen))
                .should_close()
        } else {
            egui::Window::new("")
                .id(self.id)
                .title_bar(false)
                .collapsible(false)
                .resizable(false)
                .frame(frame)
                .show(ctx, |ui| self.contents(ui, textures, focus, &mut chosen));
            ctx.input(|i| i.key_pressed(Key::Escape))
        };
        self.focus_pending = false;

        match chosen {
            Some(index) => {
                tracing::debug!(index, "Dialog option chosen");
                self.response = Some(index);
                self.open = false;
            }
            None if dismissed => {
                tracing::debug!("Dialog dismissed");
                self.dismiss();
            }
            None => {}
        }
        self.open
    }

    fn contents(
        &self,
        ui: &mut Ui,
        textures: &mut TextureCache,
        focus: bool,
        chosen: &mut Option<usize>,
    ) {
        ui.horizontal(|ui| {
            match &self.icon {
                Some(icon) => {
                    let key = format!("{:?}.icon", self.id);
                    let texture = textures.get_or_load(ui.ctx(), &key, icon);
                    let size = Vec2::new(icon.width() as f32, icon.height() as f32);
                    ui.add(egui::Image::new((texture.id(), size)));
                }
                None if self.dialog_type == DialogType::Question => {
                    ui.heading("?");
                }
                None => {}
            }
            ui.label(self.message.as_str());
        });
        ui.add_space(10.0);

        if self.scrolls() {
            egui::ScrollArea::vertical()
                .max_height(MAX_SCROLL_HEIGHT)
                .show(ui, |ui| {
                    ui.vertical(|ui| self.option_buttons(ui, textures, focus, chosen));
                });
        } else {
            ui.horizontal_wrapped(|ui| self.option_buttons(ui, textures, focus, chosen));
        }
    }

    fn option_buttons(
        &self,
        ui: &mut Ui,
        textures: &mut TextureCache,
        focus: bool,
        chosen: &mut Option<usize>,
    ) {
        for (index, item) in self.options.iter().enumerate() {
            let button = match &item.icon {
                Some(icon) => {
                    let key = format!("{:?}.option.{index}", self.id);
                    let texture = textures.get_or_load(ui.ctx(), &key, icon);
                    let size = Vec2::new(icon.width() as f32, icon.height() as f32);
                    egui::Button::image_and_text((texture.id(), size), item.text.as_str())
                }
                None => egui::Button::new(item.text.as_str()),
            };
            let response = ui.add_enabled(item.enabled, button);
            if focus && index == self.initial {
                response.request_focus();
            }
            if response.clicked() {
                *chosen = Some(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> Dialog<bool> {
        Dialog::new(
            DialogType::Question,
            true,
            "Abandon colony?",
            vec![ChoiceItem::new("Yes", true), ChoiceItem::new("No", false)],
        )
        .unwrap()
    }

    #[test]
    fn test_last_option_is_initial() {
        let mut dialog = yes_no();
        assert_eq!(dialog.initial_value(), 1);
        dialog.set_initial_value(0).unwrap();
        assert_eq!(dialog.initial_value(), 0);
        assert!(matches!(
            dialog.set_initial_value(2),
            Err(UiError::InvalidOption { index: 2, len: 2 })
        ));
        assert_eq!(dialog.initial_value(), 0);
    }

    #[test]
    fn test_requires_options() {
        let empty: Vec<ChoiceItem<u8>> = Vec::new();
        assert!(matches!(
            Dialog::new(DialogType::Plain, false, "", empty),
            Err(UiError::NoOptions)
        ));
    }

    #[test]
    fn test_response_after_choice_or_dismissal() {
        let mut dialog = yes_no();
        assert!(dialog.is_open());
        assert_eq!(dialog.response(), None);
        dialog.choose(0).unwrap();
        assert!(!dialog.is_open());
        assert_eq!(dialog.response(), Some(&true));
        assert_eq!(dialog.into_response(), Some(true));

        let mut dialog = yes_no();
        dialog.dismiss();
        assert!(!dialog.is_open());
        assert_eq!(dialog.into_response(), None);
    }

    #[test]
    fn test_scroll_threshold() {
        let options = |n: usize| (0..n).map(|i| ChoiceItem::new(i.to_string(), i)).collect();
        assert!(!Dialog::new(DialogType::Plain, false, "", options(20)).unwrap().scrolls());
        assert!(Dialog::new(DialogType::Plain, false, "", options(21)).unwrap().scrolls());
    }

    #[test]
    fn test_closed_dialog_draws_nothing() {
        let ctx = Context::default();
        let mut textures = TextureCache::new();
        let mut dialog = yes_no();
        dialog.dismiss();
        assert!(!dialog.show(&ctx, &mut textures));
        assert!(textures.is_empty());
    }
}
