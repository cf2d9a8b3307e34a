//! Layout placer: linear cursor placement of resolved assemblies.
//!
//! Assemblies are laid left to right from the start corner, each advanced by
//! its width plus approach space. Once the cursor passes the wrap line the
//! next assembly starts a new row. This is a placement, not an optimizer.

use crate::config::LayoutConfig;
use compliance_types::{
    Circulation, ComponentExpansion, Footprint, LayoutResult, Placement, PlacementStatus,
    PositionedAssembly, RoomDimensions,
};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct LayoutPlacer {
    config: LayoutConfig,
}

impl LayoutPlacer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn place(&self, expansion: &ComponentExpansion, room: &RoomDimensions) -> LayoutResult {
        let cfg = &self.config;
        let (mut x, mut y) = (cfg.start_x, cfg.start_y);
        let mut positioned = Vec::with_capacity(expansion.required_assemblies.len());
        let mut zones = BTreeSet::new();
        let mut skipped = Vec::new();

        for assembly in &expansion.required_assemblies {
            let geometry = Footprint::decode(&assembly.total_footprint).and_then(|footprint| {
                Circulation::decode(&assembly.circulation_space).map(|c| (footprint, c))
            });
            let (footprint, circulation) = match geometry {
                Ok(geometry) => geometry,
                Err(err) => {
                    tracing::warn!(
                        assembly = %assembly.assembly_code,
                        error = %err,
                        "Skipping assembly with unreadable geometry"
                    );
                    skipped.push(assembly.assembly_code.clone());
                    continue;
                }
            };

            let width = footprint.width.unwrap_or(cfg.default_width);
            let depth = footprint.depth.unwrap_or(cfg.default_depth);
            let approach = circulation
                .get(Circulation::APPROACH_SPACE)
                .unwrap_or(cfg.default_approach_space);

            let position = Placement {
                x,
                y,
                width,
                depth,
                clearances: circulation.0.clone(),
            };
            let compliance_status = if position.fits_within(room) {
                PlacementStatus::Compliant
            } else {
                PlacementStatus::OutOfBounds
            };
            zones.extend(circulation.names().map(str::to_string));

            positioned.push(PositionedAssembly {
                assembly_code: assembly.assembly_code.clone(),
                assembly_name: assembly.name.clone(),
                position,
                compliance_status,
            });

            x += width + approach;
            if x > room.length - cfg.wrap_margin {
                x = cfg.start_x;
                y += depth + approach;
            }
        }

        let compliant = positioned
            .iter()
            .filter(|p| p.compliance_status == PlacementStatus::Compliant)
            .count();
        let compliance_score = if positioned.is_empty() {
            100.0
        } else {
            compliant as f64 / positioned.len() as f64 * 100.0
        };

        let room_area = room.area();
        let used: f64 = positioned.iter().map(|p| p.position.area()).sum();
        let layout_efficiency = if room_area > 0.0 {
            (used / room_area * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        tracing::debug!(
            placed = positioned.len(),
            skipped = skipped.len(),
            compliance_score,
            layout_efficiency,
            "Layout generated"
        );

        LayoutResult {
            room_dimensions: *room,
            positioned_assemblies: positioned,
            compliance_score,
            layout_efficiency,
            clearance_zones: zones.into_iter().collect(),
            skipped_assemblies: skipped,
        }
    }
}
