//! Cabin layout: row stations, class blocks and aisle widths

use serde::{Deserialize, Serialize};

use super::fuselage::FuselageGeometry;
use crate::config::CabinConfig;
use crate::error::RuleError;
use crate::seating::SeatingConfig;

/// Station of one seat row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPlacement {
    pub class: String,
    pub class_index: usize,
    /// Row number within its class, starting at 0
    pub row: u32,
    /// Front edge of the row [m from nose]
    pub x: f64,
    pub seats: u32,
}

/// Extent of one seating class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBlock {
    pub name: String,
    pub start_x: f64,
    pub end_x: f64,
    pub rows: u32,
    pub seats_per_row: u32,
}

/// Longitudinal cabin arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabinLayout {
    pub cabin_start_x: f64,
    pub classes: Vec<ClassBlock>,
    pub rows: Vec<RowPlacement>,
    /// Σ rows × pitch
    pub seating_length: f64,
    /// Seating plus monuments, dividers and aft bulkhead
    pub consumed_length: f64,
    pub available_length: f64,
    /// First station behind the cabin; tanks start here
    pub aft_bulkhead_x: f64,
}

impl CabinLayout {
    pub fn passengers(&self) -> u32 {
        self.rows.iter().fold(0u32, |acc, r| acc.saturating_add(r.seats))
    }

    /// Cabin length left unused
    pub fn remaining_length(&self) -> f64 {
        self.available_length - self.consumed_length
    }
}

/// Free aisle width in one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisleWidth {
    pub class: String,
    pub cabin_width: f64,
    pub width: f64,
}

/// Place classes front to back behind the forward monuments
///
/// Fails with `LayoutOverflow` when seats and monuments do not fit between the
/// cabin start and the aft limit.
pub fn cabin_layout(
    fuselage: &FuselageGeometry,
    seating: &SeatingConfig,
    config: &CabinConfig,
) -> Result<CabinLayout, RuleError> {
    let allowances = &config.allowances;
    let start = fuselage.cabin_start_x;

    // Class extents first, so an overflow is rejected before any row exists
    let mut local = allowances.forward_length();
    let mut extents = Vec::with_capacity(seating.classes.len());
    for (ci, class) in seating.classes.iter().enumerate() {
        if ci > 0 {
            local += allowances.divider_thickness;
        }
        let class_start = local;
        local += class.length();
        extents.push((class_start, local));
    }

    let consumed_length = local + allowances.aft_length();
    let available_length = fuselage.usable_length();
    if consumed_length > available_length {
        return Err(RuleError::LayoutOverflow {
            required: consumed_length,
            available: available_length,
        });
    }

    let mut classes = Vec::with_capacity(seating.classes.len());
    let mut rows = Vec::with_capacity(seating.total_rows() as usize);
    for (ci, (class, &(class_start, class_end))) in
        seating.classes.iter().zip(&extents).enumerate()
    {
        let class_start = start + class_start;
        for r in 0..class.rows {
            rows.push(RowPlacement {
                class: class.name.clone(),
                class_index: ci,
                row: r,
                x: class_start + f64::from(r) * class.pitch,
                seats: class.seats_per_row,
            });
        }
        classes.push(ClassBlock {
            name: class.name.clone(),
            start_x: class_start,
            end_x: start + class_end,
            rows: class.rows,
            seats_per_row: class.seats_per_row,
        });
    }

    Ok(CabinLayout {
        cabin_start_x: start,
        classes,
        rows,
        seating_length: seating.seating_length(),
        consumed_length,
        available_length,
        aft_bulkhead_x: start + consumed_length,
    })
}

/// Usable cabin width at the narrowest height a seat occupies
pub fn cabin_width(inner_diameter: f64, config: &CabinConfig) -> Result<f64, RuleError> {
    let r = inner_diameter / 2.0;
    let floor_below_centre = config.floor_depth - r;
    let offset = if config.seat_height > 2.0 * floor_below_centre {
        config.seat_height - floor_below_centre
    } else {
        floor_below_centre
    };
    if offset.abs() >= r {
        return Err(RuleError::InvalidGeometry(format!(
            "floor at {:.3} m depth does not fit a {:.3} m cabin",
            config.floor_depth, inner_diameter
        )));
    }
    Ok(2.0 * (r * r - offset * offset).sqrt())
}

/// Aisle width left in every class after seats, armrests and wall clearance
pub fn aisle_widths(
    fuselage: &FuselageGeometry,
    seating: &SeatingConfig,
    config: &CabinConfig,
) -> Result<Vec<AisleWidth>, RuleError> {
    let width = cabin_width(fuselage.inner_diameter, config)?;
    seating
        .classes
        .iter()
        .map(|class| {
            let n = f64::from(class.seats_per_row);
            let aisle = width
                - n * class.seat_width
                - (n + 1.0) * config.armrest_width
                - 2.0 * config.seat_clearance;
            if aisle < config.min_aisle_width {
                return Err(RuleError::AisleTooNarrow {
                    class: class.name.clone(),
                    width: aisle,
                    minimum: config.min_aisle_width,
                });
            }
            Ok(AisleWidth {
                class: class.name.clone(),
                cabin_width: width,
                width: aisle,
            })
        })
        .collect()
}
