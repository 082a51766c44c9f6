//! Report on a native settlement as known to the observing player.
//!
//! [`SettlementReport`] gathers every label and image the panel shows, so the
//! knowledge rules can be checked without a running UI. [`SettlementPanel`]
//! draws a report in an egui window.

use crate::messages::Messages;
use crate::texture::TextureCache;
use crate::theme::panel_frame;
use colonist_core::{DisplayObject, IndianSettlement, Player};
use colonist_media::{Image, ImageLibrary};
use egui::{Context, Ui, Vec2};

/// Number of wanted-goods slots shown before the player has visited.
pub const UNVISITED_WANTED_SLOTS: usize = 2;

/// One label, optionally with an icon.
#[derive(Clone)]
pub struct ReportEntry {
    /// Text shown next to the icon
    pub text: String,
    /// Icon, if the player knows enough to see it
    pub image: Option<Image>,
}

impl std::fmt::Debug for ReportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportEntry")
            .field("text", &self.text)
            .field("image", &self.image.as_ref().map(|i| i.dimensions()))
            .finish()
    }
}

impl ReportEntry {
    fn new(text: String, image: Option<Image>) -> Self {
        Self { text, image }
    }
}

/// A captioned row of the report.
#[derive(Debug, Clone)]
pub struct ReportSection {
    /// Left column text
    pub caption: String,
    /// Right column entries
    pub entries: Vec<ReportEntry>,
}

/// Everything the settlement panel shows.
#[derive(Debug, Clone)]
pub struct SettlementReport {
    /// Stable id used for texture keys
    pub settlement_id: String,
    /// Settlement picture and the one-line description next to it
    pub header: ReportEntry,
    /// Resident missionary, if any
    pub missionary: Option<ReportEntry>,
    /// Skill natives teach a visiting colonist
    pub learnable_skill: ReportSection,
    /// Nation the settlement hates most
    pub most_hated: ReportSection,
    /// Goods the settlement wants above all
    pub highly_wanted: ReportSection,
    /// Further wanted goods
    pub other_wanted: ReportSection,
}

impl SettlementReport {
    /// Build the report `player` gets for `settlement`.
    pub fn build(
        settlement: &IndianSettlement,
        player: &Player,
        library: &ImageLibrary,
        messages: &Messages,
    ) -> Self {
        let contacted = settlement.has_contacted(player);
        let visited = settlement.has_visited(player);

        let header = ReportEntry::new(
            header_text(settlement, player, messages),
            library.settlement_image(&settlement.settlement),
        );

        let missionary = settlement.missionary.as_ref().map(|unit| {
            let text = format!(
                "{} {}",
                messages.name_of(&unit.owner.nation.id),
                messages.name_of(&unit.unit_type.id)
            );
            ReportEntry::new(text, library.small_object_image(DisplayObject::Unit(unit)))
        });

        let skill = &settlement.learnable_skill;
        let skill_text = match (visited, skill) {
            (false, _) => messages.t("indianSettlement.skillUnknown"),
            (true, None) => messages.t("indianSettlement.skillNone"),
            (true, Some(unit_type)) => messages.name_of(&unit_type.id),
        };
        let skill_image = match (visited, skill) {
            (true, Some(unit_type)) => {
                library.small_object_image(DisplayObject::UnitType(unit_type))
            }
            _ => None,
        };

        let hated = &settlement.most_hated;
        let hated_text = match (contacted, hated) {
            (false, _) => messages.t("indianSettlement.mostHatedUnknown"),
            (true, None) => messages.t("indianSettlement.mostHatedNone"),
            (true, Some(enemy)) => messages.name_of(&enemy.nation.id),
        };
        let hated_image = match (contacted, hated) {
            (true, Some(enemy)) => library.small_object_image(DisplayObject::Player(enemy)),
            _ => None,
        };

        let slots = if visited {
            settlement.wanted_goods_amount()
        } else {
            UNVISITED_WANTED_SLOTS
        };
        let wanted = |index: usize| wanted_entry(settlement, index, visited, library, messages);

        Self {
            settlement_id: settlement.settlement.id.clone(),
            header,
            missionary,
            learnable_skill: ReportSection {
                caption: messages.t("indianSettlement.learnableSkill"),
                entries: vec![ReportEntry::new(skill_text, skill_image)],
            },
            most_hated: ReportSection {
                caption: messages.t("indianSettlement.mostHated"),
                entries: vec![ReportEntry::new(hated_text, hated_image)],
            },
            highly_wanted: ReportSection {
                caption: messages.t("indianSettlement.highlyWanted"),
                entries: vec![wanted(0)],
            },
            other_wanted: ReportSection {
                caption: messages.t("indianSettlement.otherWanted"),
                entries: (1..slots).map(wanted).collect(),
            },
        }
    }

    /// Captioned rows in display order.
    pub fn sections(&self) -> [&ReportSection; 4] {
        [
            &self.learnable_skill,
            &self.most_hated,
            &self.highly_wanted,
            &self.other_wanted,
        ]
    }
}

/// `<name>, <capital|settlement of nation> (<alarm>[,<unscouted>])`
fn header_text(settlement: &IndianSettlement, player: &Player, messages: &Messages) -> String {
    let contacted = settlement.has_contacted(player);
    let name = if contacted {
        settlement.settlement.name.clone()
    } else {
        messages.t("indianSettlement.nameUnknown")
    };
    let kind = if settlement.is_capital() {
        "indianCapital"
    } else {
        "indianSettlement"
    };
    let nation = messages.name_of(&settlement.owner().nation.id);
    let alarm_key = match settlement.alarm_for(player) {
        Some(tension) if contacted => tension.message_key(),
        _ => "model.tension.unknown",
    };

    let mut text = format!(
        "{name}, {} ({}",
        messages.t_args(kind, &[("nation", nation.as_str())]),
        messages.t(alarm_key)
    );
    if settlement.worth_scouting(player) {
        text.push(',');
        text.push_str(&messages.t("unscoutedIndianSettlement"));
    }
    text.push(')');
    text
}

fn wanted_entry(
    settlement: &IndianSettlement,
    index: usize,
    visited: bool,
    library: &ImageLibrary,
    messages: &Messages,
) -> ReportEntry {
    let goods = settlement.wanted_goods.get(index).and_then(Option::as_ref);
    match (visited, goods) {
        (false, _) => ReportEntry::new(messages.t("indianSettlement.wantedGoodsUnknown"), None),
        (true, None) => ReportEntry::new(messages.t("indianSettlement.wantedGoodsNone"), None),
        (true, Some(goods_type)) => ReportEntry::new(
            messages.name_of(&goods_type.id),
            library.goods_image(goods_type),
        ),
    }
}

/// What the player did with the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementPanelAction {
    /// The OK button was pressed
    Close,
}

/// Window showing a [`SettlementReport`].
#[derive(Default)]
pub struct SettlementPanel {
    /// Whether the window is open
    pub visible: bool,
    report: Option<SettlementReport>,
    action: Option<SettlementPanelAction>,
}

impl SettlementPanel {
    /// Show `report` from the next frame on.
    pub fn open(&mut self, report: SettlementReport) {
        self.report = Some(report);
        self.visible = true;
    }

    /// The report currently shown.
    pub fn report(&self) -> Option<&SettlementReport> {
        self.report.as_ref()
    }

    /// Take the last action, leaving none behind.
    pub fn take_action(&mut self) -> Option<SettlementPanelAction> {
        self.action.take()
    }

    /// Draw the window while visible. OK closes it and records
    /// [`SettlementPanelAction::Close`].
    pub fn show(&mut self, ctx: &Context, messages: &Messages, textures: &mut TextureCache) {
        if !self.visible {
            return;
        }
        let Some(report) = &self.report else {
            return;
        };

        let mut close = false;
        egui::Window::new(report.header.text.as_str())
            .id(egui::Id::new(("settlement_panel", &report.settlement_id)))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .frame(panel_frame(&ctx.style()))
            .show(ctx, |ui| {
                let key = format!("settlement-panel.{}.header", report.settlement_id);
                show_entry(ui, &key, &report.header, textures);
                if let Some(missionary) = &report.missionary {
                    let key = format!("settlement-panel.{}.missionary", report.settlement_id);
                    show_entry(ui, &key, missionary, textures);
                }
                ui.add_space(8.0);

                egui::Grid::new(("settlement_report", &report.settlement_id))
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        for (row, section) in report.sections().into_iter().enumerate() {
                            ui.label(section.caption.as_str());
                            ui.horizontal(|ui| {
                                for (col, entry) in section.entries.iter().enumerate() {
                                    let key = format!(
                                        "settlement-panel.{}.{row}.{col}",
                                        report.settlement_id
                                    );
                                    show_entry(ui, &key, entry, textures);
                                }
                            });
                            ui.end_row();
                        }
                    });

                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    if ui.button(messages.t("ok")).clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.visible = false;
            self.action = Some(SettlementPanelAction::Close);
        }
    }
}

fn show_entry(ui: &mut Ui, key: &str, entry: &ReportEntry, textures: &mut TextureCache) {
    ui.horizontal(|ui| {
        if let Some(image) = &entry.image {
            let texture = textures.get_or_load(ui.ctx(), key, image);
            let size = Vec2::new(image.width() as f32, image.height() as f32);
            ui.add(egui::Image::new((texture.id(), size)));
        }
        ui.label(entry.text.as_str());
    });
}
