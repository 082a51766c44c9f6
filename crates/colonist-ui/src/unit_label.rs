//! Draggable unit icon used in colony, Europe and cargo panels.

use crate::texture::TextureCache;
use crate::theme::colors;
use colonist_core::model::role_suffix;
use colonist_core::{GoodsType, Unit};
use colonist_media::{Image, ImageLibrary};
use egui::{CornerRadius, Id, Response, Stroke, StrokeKind, Ui, Vec2};

/// Role a soldier takes when armed.
pub const SOLDIER_ROLE: &str = "model.role.soldier";
/// Role an armed unit takes when given horses.
pub const DRAGOON_ROLE: &str = "model.role.dragoon";
/// Role an unarmed unit takes when given horses.
pub const SCOUT_ROLE: &str = "model.role.scout";
/// Role of a unit carrying tools.
pub const PIONEER_ROLE: &str = "model.role.pioneer";
/// Role of a unit dressed as a missionary.
pub const MISSIONARY_ROLE: &str = "model.role.missionary";

/// Something the player asked a unit label to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitAction {
    /// Take up muskets
    Arm,
    /// Take horses; armed units become dragoons, others scouts
    Mount,
    /// Carry tools
    Tools,
    /// Become a missionary
    Dress,
    /// Switch the unit to producing the given goods
    WorkType(GoodsType),
}

/// Request a label hands to the game controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitCommand {
    /// Change the goods a working unit produces
    ChangeWorkType {
        /// Unit to reassign
        unit_id: String,
        /// New production
        goods_type: GoodsType,
    },
    /// Put the unit into a new role
    Equip {
        /// Unit to equip
        unit_id: String,
        /// Target role id
        role_id: String,
    },
}

/// Drag-and-drop payload carried by a unit label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDragPayload {
    /// Dragged unit
    pub unit_id: String,
}

/// A unit shown as its icon.
#[derive(Debug, Clone)]
pub struct UnitLabel {
    unit: Unit,
    selected: bool,
    small: bool,
}

impl UnitLabel {
    /// Label for `unit`, unselected and full size.
    pub fn new(unit: Unit) -> Self {
        Self {
            unit,
            selected: false,
            small: false,
        }
    }

    /// The unit shown.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Replace the unit after it changed.
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    /// Whether the label is the current selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Select or deselect the label.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Whether the half-size icon is shown.
    pub fn is_small(&self) -> bool {
        self.small
    }

    /// Switch between the full and the half-size icon.
    pub fn set_small(&mut self, small: bool) {
        self.small = small;
    }

    /// Ships are only enabled while selected; everything else always is.
    pub fn is_enabled(&self) -> bool {
        self.selected || !self.unit.naval
    }

    /// Scale of the icon relative to the library's own scale.
    pub fn icon_scale(&self, library: &ImageLibrary) -> f32 {
        let scale = library.scale_factor();
        if self.small {
            scale * 0.5
        } else {
            scale
        }
    }

    /// Icon for the current state, grayed out while disabled.
    pub fn icon(&self, library: &ImageLibrary) -> Option<Image> {
        library.unit_image_scaled(&self.unit, !self.is_enabled(), self.icon_scale(library))
    }

    /// Translate an action into a controller command.
    ///
    /// Carriers ignore every action.
    pub fn handle_action(&self, action: &UnitAction) -> Option<UnitCommand> {
        if self.unit.carrier {
            tracing::debug!(unit = %self.unit.id, ?action, "Carrier ignores action");
            return None;
        }
        let unit_id = self.unit.id.clone();
        let equip = |role: &str| UnitCommand::Equip {
            unit_id: unit_id.clone(),
            role_id: role.to_string(),
        };
        let command = match action {
            UnitAction::Arm => equip(SOLDIER_ROLE),
            UnitAction::Mount => {
                if role_suffix(&self.unit.role_id) == role_suffix(SOLDIER_ROLE) {
                    equip(DRAGOON_ROLE)
                } else {
                    equip(SCOUT_ROLE)
                }
            }
            UnitAction::Tools => equip(PIONEER_ROLE),
            UnitAction::Dress => equip(MISSIONARY_ROLE),
            UnitAction::WorkType(goods_type) => UnitCommand::ChangeWorkType {
                unit_id: unit_id.clone(),
                goods_type: goods_type.clone(),
            },
        };
        Some(command)
    }

    /// Draw the label. Enabled labels can be dragged; the payload is a
    /// [`UnitDragPayload`].
    pub fn show(&self, ui: &mut Ui, library: &ImageLibrary, textures: &mut TextureCache) -> Response {
        let Some(icon) = self.icon(library) else {
            return ui.label(self.unit.unit_type.id.as_str());
        };
        let key = format!(
            "unit-label.{}.{}.{}",
            self.unit.id,
            self.small,
            self.is_enabled()
        );
        let texture = textures.get_or_load(ui.ctx(), &key, &icon);
        let size = Vec2::new(icon.width() as f32, icon.height() as f32);

        let response = if self.is_enabled() {
            let payload = UnitDragPayload {
                unit_id: self.unit.id.clone(),
            };
            ui.dnd_drag_source(Id::new(&key), payload, |ui| {
                ui.add(egui::Image::new((texture.id(), size)))
            })
            .response
        } else {
            ui.add(egui::Image::new((texture.id(), size)))
        };

        if self.selected {
            ui.painter().rect_stroke(
                response.rect,
                CornerRadius::same(0),
                Stroke::new(1.0, colors::SELECTION),
                StrokeKind::Inside,
            );
        }
        response
    }
}
