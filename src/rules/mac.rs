//! Wing planform, mean aerodynamic chord and the c.g. marker

use serde::{Deserialize, Serialize};

use super::fuselage::FuselageGeometry;
use super::mass::MassProperties;
use crate::error::RuleError;

/// Trapezoidal wing, optionally with one kink [m, deg]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planform {
    pub span: f64,
    pub root_chord: f64,
    pub kink_chord: f64,
    pub tip_chord: f64,
    pub kinked: bool,
    /// Spanwise station of the kink, from the root
    pub kink_y: f64,
    /// Leading edge sweep
    pub sweep_deg: f64,
}

impl Planform {
    pub fn a320() -> Self {
        Self {
            span: 34.10,
            root_chord: 6.07,
            kink_chord: 3.84,
            tip_chord: 1.64,
            kinked: true,
            kink_y: 6.604,
            sweep_deg: 25.0,
        }
    }

    /// Straight taper between root and tip
    pub fn straight(span: f64, root_chord: f64, tip_chord: f64, sweep_deg: f64) -> Self {
        Self {
            span,
            root_chord,
            kink_chord: root_chord,
            tip_chord,
            kinked: false,
            kink_y: 0.0,
            sweep_deg,
        }
    }

    pub fn semispan(&self) -> f64 {
        self.span / 2.0
    }

    /// Positive span and chords, kink inside the semispan, sweep below 90 deg
    pub fn validate(&self) -> Result<(), RuleError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(RuleError::InvalidGeometry(format!("{} must be positive, got {}", name, v)))
            }
        };
        positive("span", self.span)?;
        positive("root chord", self.root_chord)?;
        positive("tip chord", self.tip_chord)?;
        if self.kinked {
            positive("kink chord", self.kink_chord)?;
            if !(self.kink_y > 0.0 && self.kink_y < self.semispan()) {
                return Err(RuleError::InvalidGeometry(format!(
                    "kink at y = {} m lies outside the semispan (0, {})",
                    self.kink_y,
                    self.semispan()
                )));
            }
        }
        if !self.sweep_deg.is_finite() || self.sweep_deg.abs() >= 90.0 {
            return Err(RuleError::InvalidGeometry(format!(
                "sweep of {} deg is not a wing",
                self.sweep_deg
            )));
        }
        Ok(())
    }
}

impl Default for Planform {
    fn default() -> Self {
        Self::a320()
    }
}

/// MAC length and position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanAerodynamicChord {
    pub length: f64,
    /// Spanwise station from the root
    pub y: f64,
    /// LEMAC behind the root leading edge
    pub x_offset: f64,
    /// Both wings
    pub area: f64,
    pub aspect_ratio: f64,
}

/// Root leading edge and wing box stations [m from nose]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingStation {
    pub root_le_x: f64,
    pub wingbox_start_x: f64,
    pub wingbox_end_x: f64,
}

/// What the 3D view draws: a sphere at the c.g. and a rod along the MAC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CgMarker {
    pub cg_x: f64,
    pub lemac_x: f64,
    pub mac_length: f64,
    pub percent_mac: f64,
    /// Rod is drawn outboard of the tip, on the left side
    pub rod_y: f64,
    pub sphere_radius: f64,
}

struct Panel {
    /// One side
    area: f64,
    mac: f64,
    y: f64,
}

fn trapezoid(semispan: f64, root: f64, tip: f64) -> Panel {
    let taper = tip / root;
    Panel {
        area: semispan * (root + tip) / 2.0,
        mac: 2.0 / 3.0 * root * (1.0 + taper + taper * taper) / (1.0 + taper),
        y: semispan / 3.0 * (1.0 + 2.0 * taper) / (1.0 + taper),
    }
}

pub fn mean_aerodynamic_chord(planform: &Planform) -> Result<MeanAerodynamicChord, RuleError> {
    planform.validate()?;
    let semispan = planform.semispan();

    let (half_area, length, y) = if planform.kinked {
        let inboard = trapezoid(planform.kink_y, planform.root_chord, planform.kink_chord);
        let outboard = trapezoid(
            semispan - planform.kink_y,
            planform.kink_chord,
            planform.tip_chord,
        );
        let a = inboard.area + outboard.area;
        (
            a,
            (inboard.area * inboard.mac + outboard.area * outboard.mac) / a,
            (inboard.area * inboard.y + outboard.area * (planform.kink_y + outboard.y)) / a,
        )
    } else {
        let p = trapezoid(semispan, planform.root_chord, planform.tip_chord);
        (p.area, p.mac, p.y)
    };

    let area = 2.0 * half_area;
    Ok(MeanAerodynamicChord {
        length,
        y,
        x_offset: planform.sweep_deg.to_radians().tan() * y,
        area,
        aspect_ratio: planform.span * planform.span / area,
    })
}

/// Place the wing root along the fuselage
pub fn wing_root_station(
    fuselage: &FuselageGeometry,
    position_fraction: f64,
    planform: &Planform,
) -> Result<WingStation, RuleError> {
    if !(0.0..=1.0).contains(&position_fraction) {
        return Err(RuleError::OutOfRange {
            quantity: "wing.position_fraction",
            value: position_fraction,
        });
    }
    planform.validate()?;
    let root_le_x = position_fraction * fuselage.length;
    Ok(WingStation {
        root_le_x,
        wingbox_start_x: root_le_x,
        wingbox_end_x: root_le_x + planform.root_chord,
    })
}

pub fn lemac_x(station: &WingStation, mac: &MeanAerodynamicChord) -> f64 {
    station.root_le_x + mac.x_offset
}

/// c.g. position in percent of MAC, 0 at LEMAC
pub fn percent_mac(cg_x: f64, lemac_x: f64, mac: &MeanAerodynamicChord) -> f64 {
    (cg_x - lemac_x) / mac.length * 100.0
}

pub fn cg_marker(
    percent_mac: f64,
    props: &MassProperties,
    lemac_x: f64,
    mac: &MeanAerodynamicChord,
    planform: &Planform,
) -> CgMarker {
    CgMarker {
        cg_x: props.cg_x,
        lemac_x,
        mac_length: mac.length,
        percent_mac,
        rod_y: -1.2 * planform.semispan(),
        sphere_radius: 0.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_wing() {
        let mac = mean_aerodynamic_chord(&Planform::straight(10.0, 2.0, 2.0, 0.0)).unwrap();
        assert!((mac.length - 2.0).abs() < 1e-12);
        assert!((mac.y - 2.5).abs() < 1e-12);
        assert_eq!(mac.x_offset, 0.0);
        assert!((mac.area - 20.0).abs() < 1e-12);
        assert!((mac.aspect_ratio - 5.0).abs() < 1e-12);
    }

    #[test]
    fn straight_taper_formula() {
        let p = Planform::straight(20.0, 4.0, 2.0, 30.0);
        let mac = mean_aerodynamic_chord(&p).unwrap();
        let taper: f64 = 0.5;
        let expected = 2.0 / 3.0 * 4.0 * (1.0 + taper + taper * taper) / (1.0 + taper);
        assert!((mac.length - expected).abs() < 1e-12);
        assert!((mac.y - 20.0 / 6.0 * (1.0 + 2.0 * taper) / (1.0 + taper)).abs() < 1e-12);
        assert!((mac.x_offset - 30f64.to_radians().tan() * mac.y).abs() < 1e-12);
    }

    #[test]
    fn kink_at_constant_taper_matches_straight() {
        // kink chord on the straight line: both panels lie on one trapezoid
        let straight = Planform::straight(20.0, 4.0, 2.0, 0.0);
        let kinked = Planform {
            kinked: true,
            kink_y: 5.0,
            kink_chord: 3.0,
            ..straight.clone()
        };
        let a = mean_aerodynamic_chord(&straight).unwrap();
        let b = mean_aerodynamic_chord(&kinked).unwrap();
        assert!((a.length - b.length).abs() < 1e-12);
        assert!((a.y - b.y).abs() < 1e-12);
        assert!((a.area - b.area).abs() < 1e-12);
    }

    #[test]
    fn a320_mac_is_plausible() {
        let mac = mean_aerodynamic_chord(&Planform::a320()).unwrap();
        assert!(mac.length > 3.5 && mac.length < 4.6, "mac = {}", mac.length);
        assert!(mac.aspect_ratio > 8.0 && mac.aspect_ratio < 11.0);
    }

    #[test]
    fn invalid_planforms() {
        let bad_span = Planform::straight(0.0, 4.0, 2.0, 0.0);
        assert!(matches!(mean_aerodynamic_chord(&bad_span), Err(RuleError::InvalidGeometry(_))));
        let bad_kink = Planform {
            kink_y: 20.0,
            ..Planform::a320()
        };
        assert!(mean_aerodynamic_chord(&bad_kink).is_err());
        let bad_sweep = Planform {
            sweep_deg: 90.0,
            ..Planform::a320()
        };
        assert!(mean_aerodynamic_chord(&bad_sweep).is_err());
    }

    #[test]
    fn root_station_rejects_a_negative_root_chord() {
        let fuselage = crate::rules::fuselage::fuselage_geometry(
            37.57,
            4.14,
            &crate::config::FuselageConfig::default(),
        )
        .unwrap();
        let planform = Planform {
            root_chord: -6.07,
            ..Planform::a320()
        };
        let err = wing_root_station(&fuselage, 0.32579, &planform).unwrap_err();
        assert!(matches!(err, RuleError::InvalidGeometry(ref msg) if msg.contains("root chord")));

        let station = wing_root_station(&fuselage, 0.32579, &Planform::a320()).unwrap();
        assert!(station.wingbox_end_x > station.wingbox_start_x);
    }

    #[test]
    fn percent_mac_zero_at_lemac() {
        let mac = mean_aerodynamic_chord(&Planform::straight(10.0, 2.0, 2.0, 0.0)).unwrap();
        assert_eq!(percent_mac(12.0, 12.0, &mac), 0.0);
        assert!((percent_mac(12.5, 12.0, &mac) - 25.0).abs() < 1e-12);
    }
}
