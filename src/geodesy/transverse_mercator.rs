//! Transverse Mercator forward projection (Krüger series to fourth order)
//!
//! Shared by the plane rectangular system and UTM. Accuracy is well below a
//! millimetre within a few degrees of the central meridian.

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (m)
    pub a: f64,
    /// Flattening
    pub f: f64,
}

pub const GRS80: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_222_101,
};

pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

impl Ellipsoid {
    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        (self.f * (2.0 - self.f)).sqrt()
    }

    /// Third flattening
    pub fn third_flattening(&self) -> f64 {
        self.f / (2.0 - self.f)
    }
}

/// A transverse Mercator projection with a fixed origin
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    k0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    e: f64,
    rectifying_radius: f64,
    alpha: [f64; 4],
    origin_arc: f64,
}

impl TransverseMercator {
    /// Build a projection. Angles in radians.
    pub fn new(
        ellipsoid: Ellipsoid,
        k0: f64,
        lat0: f64,
        lon0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
            49561.0 * n4 / 161_280.0,
        ];
        let rectifying_radius = ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let mut tm = TransverseMercator {
            k0,
            lon0,
            false_easting,
            false_northing,
            e: ellipsoid.eccentricity(),
            rectifying_radius,
            alpha,
            origin_arc: 0.0,
        };
        // Meridian arc from the equator to the origin latitude
        tm.origin_arc = tm.series(lat0, 0.0).0;
        tm
    }

    /// Unscaled (xi, eta) scaled by the rectifying radius
    fn series(&self, lat: f64, dlon: f64) -> (f64, f64) {
        let sin_lat = lat.sin();
        let t = (sin_lat.atanh() - self.e * (self.e * sin_lat).atanh()).sinh();
        let xi_p = t.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }
        (self.rectifying_radius * xi, self.rectifying_radius * eta)
    }

    /// Longitude offset from the central meridian, normalised to (-π, π]
    pub fn delta_lon(&self, lon: f64) -> f64 {
        let d = (lon - self.lon0).rem_euclid(2.0 * std::f64::consts::PI);
        if d > std::f64::consts::PI {
            d - 2.0 * std::f64::consts::PI
        } else {
            d
        }
    }

    /// Project (lat, lon) in radians to (northing, easting) in metres
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let (xi, eta) = self.series(lat, self.delta_lon(lon));
        let northing = self.k0 * (xi - self.origin_arc) + self.false_northing;
        let easting = self.k0 * eta + self.false_easting;
        (northing, easting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_false_offsets() {
        let tm = TransverseMercator::new(
            GRS80,
            0.9999,
            36f64.to_radians(),
            139f64.to_radians(),
            100.0,
            -50.0,
        );
        let (n, e) = tm.forward(36f64.to_radians(), 139f64.to_radians());
        assert!((n + 50.0).abs() < 1e-6);
        assert!((e - 100.0).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let tm = TransverseMercator::new(GRS80, 1.0, 0.0, 0.0, 0.0, 0.0);
        let (n, e) = tm.forward(1f64.to_radians(), 0.0);
        // Meridian arc length from the equator to 1 degree north
        assert!((n - 110_574.4).abs() < 1.0, "northing {}", n);
        assert!(e.abs() < 1e-6);
    }

    #[test]
    fn easting_is_antisymmetric_about_meridian() {
        let tm = TransverseMercator::new(WGS84, 0.9996, 0.0, 0.0, 0.0, 0.0);
        let lat = 45f64.to_radians();
        let (n_east, e_east) = tm.forward(lat, 2f64.to_radians());
        let (n_west, e_west) = tm.forward(lat, (-2f64).to_radians());
        assert!((e_east + e_west).abs() < 1e-6);
        assert!((n_east - n_west).abs() < 1e-6);
    }

    #[test]
    fn delta_lon_wraps_across_antimeridian() {
        let tm = TransverseMercator::new(WGS84, 0.9996, 0.0, 177f64.to_radians(), 0.0, 0.0);
        let d = tm.delta_lon((-179f64).to_radians());
        assert!((d - 4f64.to_radians()).abs() < 1e-12);
    }
}
