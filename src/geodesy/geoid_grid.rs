//! Gridded geoid model in the GSI ASCII format
//!
//! Header line: `lat0 lon0 dlat dlon nlat nlon ikind version`, followed by
//! `nlat * nlon` undulation values in metres, south to north and west to east
//! within each row. `999.0000` marks a cell with no data.

use super::height::GeoidModel;
use crate::error::{ConfigError, HeightError};
use std::path::Path;

const MISSING_VALUE: f64 = 999.0;

#[derive(Debug, Clone)]
pub struct GeoidGrid {
    lat0: f64,
    lon0: f64,
    dlat: f64,
    dlon: f64,
    nlat: usize,
    nlon: usize,
    values: Vec<f64>,
}

impl GeoidGrid {
    /// Build a grid from values laid out row by row from `lat0`
    pub fn new(
        lat0: f64,
        lon0: f64,
        dlat: f64,
        dlon: f64,
        nlat: usize,
        nlon: usize,
        values: Vec<f64>,
    ) -> Result<Self, ConfigError> {
        if nlat < 2 || nlon < 2 {
            return Err(ConfigError::Geoid(format!(
                "grid must be at least 2x2, got {}x{}",
                nlat, nlon
            )));
        }
        if !(dlat > 0.0 && dlon > 0.0) {
            return Err(ConfigError::Geoid(format!(
                "grid spacing must be positive, got {} x {}",
                dlat, dlon
            )));
        }
        let expected = nlat.checked_mul(nlon).ok_or_else(|| {
            ConfigError::Geoid(format!("grid size {}x{} is too large", nlat, nlon))
        })?;
        if values.len() != expected {
            return Err(ConfigError::Geoid(format!(
                "expected {} values, found {}",
                expected,
                values.len()
            )));
        }
        Ok(GeoidGrid {
            lat0,
            lon0,
            dlat,
            dlon,
            nlat,
            nlon,
            values,
        })
    }

    /// Parse the ASCII grid format
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| ConfigError::Geoid("empty grid file".to_string()))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() < 6 {
            return Err(ConfigError::Geoid(format!(
                "header has {} fields, expected at least 6",
                fields.len()
            )));
        }

        let float = |i: usize| -> Result<f64, ConfigError> {
            fields[i]
                .parse::<f64>()
                .map_err(|e| ConfigError::Geoid(format!("header field {}: {}", i + 1, e)))
        };
        let count = |i: usize| -> Result<usize, ConfigError> {
            fields[i]
                .parse::<usize>()
                .map_err(|e| ConfigError::Geoid(format!("header field {}: {}", i + 1, e)))
        };

        let values = lines
            .flat_map(str::split_whitespace)
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|e| ConfigError::Geoid(format!("value '{}': {}", token, e)))
            })
            .collect::<Result<Vec<f64>, ConfigError>>()?;

        GeoidGrid::new(
            float(0)?,
            float(1)?,
            float(2)?,
            float(3)?,
            count(4)?,
            count(5)?,
            values,
        )
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    fn value(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.values[row * self.nlon + col];
        if (v - MISSING_VALUE).abs() < 1e-6 {
            None
        } else {
            Some(v)
        }
    }
}

impl GeoidModel for GeoidGrid {
    fn undulation(&self, lat_deg: f64, lon_deg: f64) -> Result<f64, HeightError> {
        let fi = (lat_deg - self.lat0) / self.dlat;
        let fj = (lon_deg - self.lon0) / self.dlon;
        let max_i = (self.nlat - 1) as f64;
        let max_j = (self.nlon - 1) as f64;
        if !(0.0..=max_i).contains(&fi) || !(0.0..=max_j).contains(&fj) {
            return Err(HeightError::OutsideGrid {
                lat: lat_deg,
                lon: lon_deg,
            });
        }

        // Clamp so that points on the northern/eastern edge use the last cell
        let i0 = (fi.floor() as usize).min(self.nlat - 2);
        let j0 = (fj.floor() as usize).min(self.nlon - 2);
        let ti = fi - i0 as f64;
        let tj = fj - j0 as f64;

        let corners = [
            (i0, j0, (1.0 - ti) * (1.0 - tj)),
            (i0, j0 + 1, (1.0 - ti) * tj),
            (i0 + 1, j0, ti * (1.0 - tj)),
            (i0 + 1, j0 + 1, ti * tj),
        ];

        let mut undulation = 0.0;
        for (row, col, weight) in corners {
            // A missing node only matters if it contributes
            if weight == 0.0 {
                continue;
            }
            let v = self.value(row, col).ok_or(HeightError::MissingData {
                lat: lat_deg,
                lon: lon_deg,
            })?;
            undulation += weight * v;
        }
        Ok(undulation)
    }
}
