//! Plain text design report

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::error::RetrofitError;
use crate::model::AircraftModel;

const RULE_HEAVY: &str = "==========================================================";
const RULE_LIGHT: &str = "----------------------------------------------------------";

/// One report line: label, value, unit
struct Entry {
    label: &'static str,
    value: Option<String>,
    unit: &'static str,
}

fn entry(label: &'static str, value: Result<String, RetrofitError>, unit: &'static str) -> Entry {
    Entry {
        label,
        value: value.ok(),
        unit,
    }
}

fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// Render the report for the current inputs
///
/// Sections whose outputs fail still print, with `n/a (error)` in place of
/// the value.
pub fn design_report(model: &mut AircraftModel, baseline: &str) -> String {
    let main = vec![
        entry("Fuselage length", model.fuselage().map(|f| fixed(f.length, 3)), "[m]"),
        entry("Fuselage diameter", model.fuselage().map(|f| fixed(f.outer_diameter, 3)), "[m]"),
        entry("Passengers", model.passengers().map(|p| p.to_string()), "[-]"),
        entry("Seat rows", model.cabin_layout().map(|c| c.rows.len().to_string()), "[-]"),
        entry(
            "Cabin length used",
            model.cabin_layout().map(|c| fixed(c.consumed_length, 3)),
            "[m]",
        ),
        entry("Number of tanks", model.tanks().map(|t| t.tanks.len().to_string()), "[-]"),
        entry("Tank length", model.tanks().map(|t| fixed(t.tank_length(), 3)), "[m]"),
        entry(
            "Tank diameter",
            model
                .tanks()
                .map(|t| fixed(t.tanks.first().map(|k| k.diameter).unwrap_or(0.0), 3)),
            "[m]",
        ),
        entry("LH2 capacity", model.tanks().map(|t| fixed(t.capacity(), 1)), "[kg]"),
        entry("LH2 mass", model.tanks().map(|t| fixed(t.fuel_mass(), 1)), "[kg]"),
        entry("Tank structural mass", model.tanks().map(|t| fixed(t.structural_mass(), 1)), "[kg]"),
        entry(
            "Cargo containers",
            model.cargo_holds().map(|h| format!("{} + {}", h.forward.capacity, h.aft.capacity)),
            "[-]",
        ),
    ];

    let wing = vec![
        entry("MAC", model.mac().map(|m| fixed(m.length, 3)), "[m]"),
        entry("MAC spanwise station", model.mac().map(|m| fixed(m.y, 3)), "[m]"),
        entry("LEMAC x", model.lemac_x().map(|x| fixed(x, 3)), "[m]"),
        entry("Planform area", model.mac().map(|m| fixed(m.area, 2)), "[m2]"),
        entry("Aspect ratio", model.mac().map(|m| fixed(m.aspect_ratio, 2)), "[-]"),
    ];

    let mass = vec![
        entry("Total mass", model.mass_properties().map(|m| fixed(m.total_mass, 1)), "[kg]"),
        entry(
            "Operating Empty Mass",
            model.mass_properties().map(|m| fixed(m.operating_empty_mass, 1)),
            "[kg]",
        ),
        entry("Payload mass", model.mass_properties().map(|m| fixed(m.payload_mass, 1)), "[kg]"),
        entry("C.G. x", model.cg_x().map(|x| fixed(x, 3)), "[m]"),
        entry("C.G. position", model.cg_percent_mac().map(|p| fixed(p, 2)), "[%]"),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE_HEAVY);
    let _ = writeln!(out, "Hydrogen Retrofit Design Report");
    let _ = writeln!(out, "Baseline Aircraft: Airbus {}", baseline);
    for (title, entries) in [
        ("Cabin and tanks", main),
        ("Wing", wing),
        ("Mass and balance", mass),
    ] {
        let _ = writeln!(out, "{}", RULE_LIGHT);
        let _ = writeln!(out, "{}", title);
        for e in entries {
            let value = e.value.unwrap_or_else(|| "n/a (error)".to_string());
            let _ = writeln!(out, "{:<27}{:<23}{}", e.label, value, e.unit);
        }
    }
    let _ = writeln!(out, "{}", RULE_HEAVY);
    out
}

/// Render and write the report
pub fn write_report(
    model: &mut AircraftModel,
    baseline: &str,
    path: impl AsRef<Path>,
) -> Result<(), RetrofitError> {
    let path = path.as_ref();
    std::fs::write(path, design_report(model, baseline))?;
    info!(path = %path.display(), "design report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_sections() {
        let mut model = AircraftModel::baseline().unwrap();
        let report = design_report(&mut model, "A320");
        assert!(report.starts_with(RULE_HEAVY));
        assert!(report.contains("Baseline Aircraft: Airbus A320"));
        assert!(report.contains("Passengers                 120"));
        assert!(report.contains("C.G. position"));
        assert!(report.contains("Cargo containers           3 + 3"));
        assert!(!report.contains("n/a (error)"));
    }

    #[test]
    fn failing_outputs_are_marked() {
        let mut model = AircraftModel::baseline().unwrap();
        model.set_fixed_items(Vec::new()).unwrap();
        model.set_seating(crate::seating::SeatingConfig::default()).unwrap();
        model.set_tank_count(0).unwrap();
        model.set_cargo_load_fraction(0.0).unwrap();
        let report = design_report(&mut model, "A320");
        assert!(report.contains("Total mass                 n/a (error)"));
        assert!(report.contains("MAC                        "));
        assert!(report.contains("Number of tanks            0"));
    }
}
