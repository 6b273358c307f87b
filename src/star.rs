use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity fields checked, in order, when deriving a display name.
const NAME_PREFERENCE: [StarField; 6] = [
    StarField::Proper,
    StarField::Bf,
    StarField::Gl,
    StarField::Hip,
    StarField::Hd,
    StarField::Hr,
];

/// Every column recognised in a star catalog row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StarField {
    Id,
    Hip,
    Hd,
    Hr,
    Gl,
    Bf,
    Proper,
    Ra,
    Dec,
    Dist,
    Pmra,
    Pmdec,
    Rv,
    Mag,
    Absmag,
    Spect,
    Ci,
    X,
    Y,
    Z,
    Vx,
    Vy,
    Vz,
    Rarad,
    Decrad,
    Pmrarad,
    Pmdecrad,
    Bayer,
    Flam,
    Con,
    Comp,
    CompPrimary,
    Base,
    Lum,
    Var,
    VarMin,
    VarMax,
}

impl StarField {
    pub const ALL: [StarField; 37] = [
        StarField::Id,
        StarField::Hip,
        StarField::Hd,
        StarField::Hr,
        StarField::Gl,
        StarField::Bf,
        StarField::Proper,
        StarField::Ra,
        StarField::Dec,
        StarField::Dist,
        StarField::Pmra,
        StarField::Pmdec,
        StarField::Rv,
        StarField::Mag,
        StarField::Absmag,
        StarField::Spect,
        StarField::Ci,
        StarField::X,
        StarField::Y,
        StarField::Z,
        StarField::Vx,
        StarField::Vy,
        StarField::Vz,
        StarField::Rarad,
        StarField::Decrad,
        StarField::Pmrarad,
        StarField::Pmdecrad,
        StarField::Bayer,
        StarField::Flam,
        StarField::Con,
        StarField::Comp,
        StarField::CompPrimary,
        StarField::Base,
        StarField::Lum,
        StarField::Var,
        StarField::VarMin,
        StarField::VarMax,
    ];

    /// Column name as it appears in the catalog header.
    pub fn as_str(self) -> &'static str {
        match self {
            StarField::Id => "id",
            StarField::Hip => "hip",
            StarField::Hd => "hd",
            StarField::Hr => "hr",
            StarField::Gl => "gl",
            StarField::Bf => "bf",
            StarField::Proper => "proper",
            StarField::Ra => "ra",
            StarField::Dec => "dec",
            StarField::Dist => "dist",
            StarField::Pmra => "pmra",
            StarField::Pmdec => "pmdec",
            StarField::Rv => "rv",
            StarField::Mag => "mag",
            StarField::Absmag => "absmag",
            StarField::Spect => "spect",
            StarField::Ci => "ci",
            StarField::X => "x",
            StarField::Y => "y",
            StarField::Z => "z",
            StarField::Vx => "vx",
            StarField::Vy => "vy",
            StarField::Vz => "vz",
            StarField::Rarad => "rarad",
            StarField::Decrad => "decrad",
            StarField::Pmrarad => "pmrarad",
            StarField::Pmdecrad => "pmdecrad",
            StarField::Bayer => "bayer",
            StarField::Flam => "flam",
            StarField::Con => "con",
            StarField::Comp => "comp",
            StarField::CompPrimary => "comp_primary",
            StarField::Base => "base",
            StarField::Lum => "lum",
            StarField::Var => "var",
            StarField::VarMin => "var_min",
            StarField::VarMax => "var_max",
        }
    }
}

impl FromStr for StarField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StarField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::UnknownField {
                field: s.to_string(),
            })
    }
}

impl fmt::Display for StarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry.
///
/// Only `ra`, `dec` and `dist` take part in reachability; the remaining
/// columns are carried through for export.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StarRecord {
    pub id: String,
    pub hip: Option<String>,
    pub hd: Option<String>,
    pub hr: Option<String>,
    pub gl: Option<String>,
    pub bf: Option<String>,
    pub proper: Option<String>,
    /// Right ascension in degrees.
    pub ra: f64,
    /// Declination in degrees.
    pub dec: f64,
    /// Distance from the reference origin in parsecs.
    pub dist: f64,
    pub pmra: Option<f64>,
    pub pmdec: Option<f64>,
    pub rv: Option<f64>,
    pub mag: Option<f64>,
    pub absmag: Option<f64>,
    pub spect: Option<String>,
    pub ci: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
    pub vz: Option<f64>,
    pub rarad: Option<f64>,
    pub decrad: Option<f64>,
    pub pmrarad: Option<f64>,
    pub pmdecrad: Option<f64>,
    pub bayer: Option<String>,
    pub flam: Option<f64>,
    pub con: Option<String>,
    pub comp: Option<f64>,
    pub comp_primary: Option<f64>,
    pub base: Option<String>,
    pub lum: Option<f64>,
    pub var: Option<String>,
    pub var_min: Option<f64>,
    pub var_max: Option<f64>,
}

impl StarRecord {
    /// Build a record from typed coordinates. Every other field starts empty.
    pub fn new(id: impl Into<String>, ra: f64, dec: f64, dist: f64) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::MissingField { field: "id" });
        }
        let mut star = StarRecord::blank(id);
        star.ra = ra;
        star.dec = dec;
        star.dist = dist;
        star.validate()?;
        Ok(star)
    }

    /// Build a record from catalog `(column, value)` pairs.
    ///
    /// Unknown columns and unparsable numbers fail immediately. Empty values
    /// are treated as absent; `id`, `ra`, `dec` and `dist` must be present.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut star = StarRecord::blank(String::new());
        for (key, value) in fields {
            let field: StarField = key.trim().parse()?;
            star.assign(field, value)?;
        }

        if star.id.is_empty() {
            return Err(Error::MissingField { field: "id" });
        }
        for (field, value) in [("ra", star.ra), ("dec", star.dec), ("dist", star.dist)] {
            if value.is_nan() {
                return Err(Error::MissingField { field });
            }
        }
        star.validate()?;
        Ok(star)
    }

    pub fn with_proper(mut self, proper: impl Into<String>) -> Self {
        self.proper = non_empty(proper.into());
        self
    }

    /// Human-facing name: the first populated identity field in preference
    /// order, with internal whitespace collapsed.
    pub fn display_name(&self) -> Option<String> {
        NAME_PREFERENCE.iter().find_map(|&field| {
            let value = self.identity(field)?;
            let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
            (!collapsed.is_empty()).then_some(collapsed)
        })
    }

    /// Display name, or the catalog id for stars with no other identifier.
    pub fn label(&self) -> String {
        self.display_name().unwrap_or_else(|| self.id.clone())
    }

    /// Raw value of an identity column.
    pub fn identity(&self, field: StarField) -> Option<&str> {
        let value = match field {
            StarField::Id => return Some(self.id.as_str()),
            StarField::Hip => &self.hip,
            StarField::Hd => &self.hd,
            StarField::Hr => &self.hr,
            StarField::Gl => &self.gl,
            StarField::Bf => &self.bf,
            StarField::Proper => &self.proper,
            _ => return None,
        };
        value.as_deref()
    }

    fn blank(id: String) -> Self {
        StarRecord {
            id,
            hip: None,
            hd: None,
            hr: None,
            gl: None,
            bf: None,
            proper: None,
            ra: f64::NAN,
            dec: f64::NAN,
            dist: f64::NAN,
            pmra: None,
            pmdec: None,
            rv: None,
            mag: None,
            absmag: None,
            spect: None,
            ci: None,
            x: None,
            y: None,
            z: None,
            vx: None,
            vy: None,
            vz: None,
            rarad: None,
            decrad: None,
            pmrarad: None,
            pmdecrad: None,
            bayer: None,
            flam: None,
            con: None,
            comp: None,
            comp_primary: None,
            base: None,
            lum: None,
            var: None,
            var_min: None,
            var_max: None,
        }
    }

    fn assign(&mut self, field: StarField, raw: &str) -> Result<()> {
        match field {
            StarField::Id => self.id = non_empty(raw.to_string()).unwrap_or_default(),
            StarField::Hip => self.hip = non_empty(raw.to_string()),
            StarField::Hd => self.hd = non_empty(raw.to_string()),
            StarField::Hr => self.hr = non_empty(raw.to_string()),
            StarField::Gl => self.gl = non_empty(raw.to_string()),
            StarField::Bf => self.bf = non_empty(raw.to_string()),
            StarField::Proper => self.proper = non_empty(raw.to_string()),
            // NaN marks a required coordinate that was left empty
            StarField::Ra => self.ra = parse_number(field, raw)?.unwrap_or(f64::NAN),
            StarField::Dec => self.dec = parse_number(field, raw)?.unwrap_or(f64::NAN),
            StarField::Dist => self.dist = parse_number(field, raw)?.unwrap_or(f64::NAN),
            StarField::Pmra => self.pmra = parse_number(field, raw)?,
            StarField::Pmdec => self.pmdec = parse_number(field, raw)?,
            StarField::Rv => self.rv = parse_number(field, raw)?,
            StarField::Mag => self.mag = parse_number(field, raw)?,
            StarField::Absmag => self.absmag = parse_number(field, raw)?,
            StarField::Spect => self.spect = non_empty(raw.to_string()),
            StarField::Ci => self.ci = parse_number(field, raw)?,
            StarField::X => self.x = parse_number(field, raw)?,
            StarField::Y => self.y = parse_number(field, raw)?,
            StarField::Z => self.z = parse_number(field, raw)?,
            StarField::Vx => self.vx = parse_number(field, raw)?,
            StarField::Vy => self.vy = parse_number(field, raw)?,
            StarField::Vz => self.vz = parse_number(field, raw)?,
            StarField::Rarad => self.rarad = parse_number(field, raw)?,
            StarField::Decrad => self.decrad = parse_number(field, raw)?,
            StarField::Pmrarad => self.pmrarad = parse_number(field, raw)?,
            StarField::Pmdecrad => self.pmdecrad = parse_number(field, raw)?,
            StarField::Bayer => self.bayer = non_empty(raw.to_string()),
            StarField::Flam => self.flam = parse_number(field, raw)?,
            StarField::Con => self.con = non_empty(raw.to_string()),
            StarField::Comp => self.comp = parse_number(field, raw)?,
            StarField::CompPrimary => self.comp_primary = parse_number(field, raw)?,
            StarField::Base => self.base = non_empty(raw.to_string()),
            StarField::Lum => self.lum = parse_number(field, raw)?,
            StarField::Var => self.var = non_empty(raw.to_string()),
            StarField::VarMin => self.var_min = parse_number(field, raw)?,
            StarField::VarMax => self.var_max = parse_number(field, raw)?,
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.ra.is_finite() {
            return Err(Error::InvalidCoordinate {
                field: "ra",
                value: self.ra,
            });
        }
        if !self.dec.is_finite() {
            return Err(Error::InvalidCoordinate {
                field: "dec",
                value: self.dec,
            });
        }
        if !self.dist.is_finite() || self.dist < 0.0 {
            return Err(Error::InvalidCoordinate {
                field: "dist",
                value: self.dist,
            });
        }
        Ok(())
    }
}

fn parse_number(field: StarField, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::InvalidNumber {
            field: field.as_str().to_string(),
            value: raw.to_string(),
        })
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
