//! Seating configuration and its plain-text format
//!
//! ```text
//! # A320 two-class layout
//! class first   rows=3  seats=4 pitch=0.90 seat_width=0.50 seat_mass=10
//! class economy rows=18 seats=6 pitch=0.74
//! ```
//!
//! Parsing is all-or-nothing: one bad line rejects the whole file.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RetrofitError;

/// Matches `class <name> key=value ...`
static CLASS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^class\s+([A-Za-z0-9_-]+)((?:\s+[a-z_]+=\S+)*)\s*$").unwrap());

/// Matches one `key=value` pair
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z_]+)=(\S+)").unwrap());

/// Upper bound on rows in one class
pub const MAX_ROWS: u32 = 500;

/// Upper bound on seats abreast
pub const MAX_SEATS_PER_ROW: u32 = 20;

fn default_seat_width() -> f64 {
    0.43
}

fn default_seat_mass() -> f64 {
    11.0
}

/// One block of identical rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingClass {
    pub name: String,
    pub rows: u32,
    pub seats_per_row: u32,
    /// Row spacing [m]
    pub pitch: f64,
    /// Width of a single seat [m]
    #[serde(default = "default_seat_width")]
    pub seat_width: f64,
    /// Empty seat mass [kg]
    #[serde(default = "default_seat_mass")]
    pub seat_mass: f64,
}

impl SeatingClass {
    pub fn new(name: impl Into<String>, rows: u32, seats_per_row: u32, pitch: f64) -> Self {
        Self {
            name: name.into(),
            rows,
            seats_per_row,
            pitch,
            seat_width: default_seat_width(),
            seat_mass: default_seat_mass(),
        }
    }

    pub fn with_seat_width(mut self, width: f64) -> Self {
        self.seat_width = width;
        self
    }

    pub fn with_seat_mass(mut self, mass: f64) -> Self {
        self.seat_mass = mass;
        self
    }

    /// Σ rows × pitch for this class
    pub fn length(&self) -> f64 {
        f64::from(self.rows) * self.pitch
    }

    pub fn seats(&self) -> u32 {
        self.rows.saturating_mul(self.seats_per_row)
    }

    fn validate(&self) -> Result<(), String> {
        if self.rows > MAX_ROWS {
            return Err(format!(
                "class '{}': {} rows exceeds the limit of {}",
                self.name, self.rows, MAX_ROWS
            ));
        }
        if self.seats_per_row > MAX_SEATS_PER_ROW {
            return Err(format!(
                "class '{}': {} seats abreast exceeds the limit of {}",
                self.name, self.seats_per_row, MAX_SEATS_PER_ROW
            ));
        }
        if !(self.pitch > 0.0) || !self.pitch.is_finite() {
            return Err(format!("class '{}': pitch must be positive", self.name));
        }
        if !(self.seat_width > 0.0) {
            return Err(format!("class '{}': seat_width must be positive", self.name));
        }
        if self.seat_mass < 0.0 || !self.seat_mass.is_finite() {
            return Err(format!("class '{}': seat_mass must not be negative", self.name));
        }
        if self.rows > 0 && self.seats_per_row == 0 {
            return Err(format!("class '{}': rows without seats", self.name));
        }
        Ok(())
    }
}

/// Ordered sequence of classes, front to back
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeatingConfig {
    pub classes: Vec<SeatingClass>,
}

impl SeatingConfig {
    pub fn new(classes: Vec<SeatingClass>) -> Self {
        Self { classes }
    }

    /// A320 baseline: 3 first-class rows (2-2) and 18 economy rows (3-3)
    pub fn a320() -> Self {
        Self::new(vec![
            SeatingClass::new("first", 3, 4, 0.9)
                .with_seat_width(0.5)
                .with_seat_mass(10.0),
            SeatingClass::new("economy", 18, 6, 0.74),
        ])
    }

    pub fn total_rows(&self) -> u32 {
        self.classes.iter().fold(0u32, |acc, c| acc.saturating_add(c.rows))
    }

    pub fn passengers(&self) -> u32 {
        self.classes
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.seats()))
    }

    /// Σ(rows × pitch) over all classes
    pub fn seating_length(&self) -> f64 {
        self.classes.iter().map(SeatingClass::length).sum()
    }

    /// Check every class and that class names are unique
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::new();
        for class in &self.classes {
            class.validate()?;
            if !names.insert(class.name.as_str()) {
                return Err(format!("duplicate class '{}'", class.name));
            }
        }
        Ok(())
    }

    /// Parse the line-oriented text format
    pub fn parse(text: &str) -> Result<Self, RetrofitError> {
        let mut classes = Vec::new();
        let mut names = HashSet::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let class = parse_class_line(line).map_err(|details| RetrofitError::SeatingParse {
                line: line_no,
                details,
            })?;
            if !names.insert(class.name.clone()) {
                return Err(RetrofitError::SeatingParse {
                    line: line_no,
                    details: format!("duplicate class '{}'", class.name),
                });
            }
            classes.push(class);
        }

        Ok(Self { classes })
    }

    /// Render back to the text format
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for c in &self.classes {
            let _ = writeln!(
                out,
                "class {} rows={} seats={} pitch={} seat_width={} seat_mass={}",
                c.name, c.rows, c.seats_per_row, c.pitch, c.seat_width, c.seat_mass
            );
        }
        out
    }
}

impl FromStr for SeatingConfig {
    type Err = RetrofitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_class_line(line: &str) -> Result<SeatingClass, String> {
    let caps = CLASS_LINE
        .captures(line)
        .ok_or_else(|| format!("expected `class <name> rows=.. seats=.. pitch=..`, got '{}'", line))?;
    let name = caps[1].to_string();
    let pairs = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    let mut rows = None;
    let mut seats = None;
    let mut pitch = None;
    let mut class_width = None;
    let mut class_mass = None;

    for kv in KEY_VALUE.captures_iter(pairs) {
        let key = &kv[1];
        let value = &kv[2];
        match key {
            "rows" => rows = Some(parse_number::<u32>(key, value)?),
            "seats" => seats = Some(parse_number::<u32>(key, value)?),
            "pitch" => pitch = Some(parse_number::<f64>(key, value)?),
            "seat_width" => class_width = Some(parse_number::<f64>(key, value)?),
            "seat_mass" => class_mass = Some(parse_number::<f64>(key, value)?),
            other => return Err(format!("unknown key '{}'", other)),
        }
    }

    let mut class = SeatingClass::new(
        name,
        rows.ok_or("missing rows=")?,
        seats.ok_or("missing seats=")?,
        pitch.ok_or("missing pitch=")?,
    );
    if let Some(w) = class_width {
        class.seat_width = w;
    }
    if let Some(m) = class_mass {
        class.seat_mass = m;
    }
    class.validate()?;
    Ok(class)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{}={} is not a valid number", key, value))
}
