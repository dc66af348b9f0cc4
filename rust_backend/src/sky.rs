//! Celestial positions, angular separations and the tangent-plane projection
//! that carries sky positions onto the plate.

use qtty::{Arcsecond, Arcseconds, Degree, Degrees, Radian, Radians};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Right ascension and declination, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra: Degrees,
    pub dec: Degrees,
}

impl SkyPosition {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra: Degrees::new(ra_deg),
            dec: Degrees::new(dec_deg),
        }
    }

    /// Great-circle separation using the haversine formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use hector_obs::sky::SkyPosition;
    ///
    /// let a = SkyPosition::new(10.0, 0.0);
    /// let b = SkyPosition::new(11.0, 0.0);
    /// assert!((a.separation(&b).value() - 1.0).abs() < 1e-9);
    /// ```
    pub fn separation(&self, other: &SkyPosition) -> Degrees {
        let dec1 = self.dec.to::<Radian>().value();
        let dec2 = other.dec.to::<Radian>().value();
        let d_dec = dec2 - dec1;
        let d_ra = (other.ra - self.ra).to::<Radian>().value();

        let h = (d_dec / 2.0).sin().powi(2) + dec1.cos() * dec2.cos() * (d_ra / 2.0).sin().powi(2);
        let angle = 2.0 * h.sqrt().min(1.0).asin();
        Radians::new(angle).to::<Degree>()
    }

    /// Separation in arcseconds, the unit fibre proximity is quoted in.
    pub fn separation_arcsec(&self, other: &SkyPosition) -> Arcseconds {
        self.separation(other).to::<Arcsecond>()
    }

    /// Gnomonic projection about `centre`, returning standard coordinates
    /// (xi towards increasing RA, eta towards increasing Dec).
    ///
    /// Returns `None` for positions 90 degrees or more from the centre.
    pub fn tangent_plane(&self, centre: &SkyPosition) -> Option<(Arcseconds, Arcseconds)> {
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        let (sin_dec0, cos_dec0) = centre.dec.sin_cos();
        let (sin_dra, cos_dra) = (self.ra - centre.ra).sin_cos();

        let cos_c = sin_dec0 * sin_dec + cos_dec0 * cos_dec * cos_dra;
        if cos_c <= 0.0 {
            return None;
        }
        let xi = cos_dec * sin_dra / cos_c;
        let eta = (cos_dec0 * sin_dec - sin_dec0 * cos_dec * cos_dra) / cos_c;
        Some((
            Radians::new(xi).to::<Arcsecond>(),
            Radians::new(eta).to::<Arcsecond>(),
        ))
    }

    /// Plate position in millimetres for a field centred on `centre`, before
    /// any distortion correction.
    pub fn to_plate(&self, centre: &SkyPosition, plate_scale_arcsec_per_mm: f64) -> Option<Point> {
        self.tangent_plane(centre).map(|(xi, eta)| {
            Point::new(
                xi.value() / plate_scale_arcsec_per_mm,
                eta.value() / plate_scale_arcsec_per_mm,
            )
        })
    }

    /// Inverse of [`SkyPosition::to_plate`]: the sky position that lands on
    /// `point` for a field centred on `centre`.
    pub fn from_plate(point: Point, centre: &SkyPosition, plate_scale_arcsec_per_mm: f64) -> Self {
        let xi = Arcseconds::new(point.x * plate_scale_arcsec_per_mm)
            .to::<Radian>()
            .value();
        let eta = Arcseconds::new(point.y * plate_scale_arcsec_per_mm)
            .to::<Radian>()
            .value();
        let (sin_dec0, cos_dec0) = centre.dec.sin_cos();

        let denom = cos_dec0 - eta * sin_dec0;
        let ra = centre.ra + Radians::new(xi.atan2(denom)).to::<Degree>();
        let dec = (sin_dec0 + eta * cos_dec0).atan2(xi.hypot(denom));
        Self {
            ra: Degrees::new(ra.value().rem_euclid(360.0)),
            dec: Radians::new(dec).to::<Degree>(),
        }
    }

    /// Destination after travelling `distance` along a great circle leaving
    /// at `bearing` (north through east).
    pub fn offset(&self, bearing: Degrees, distance: Degrees) -> Self {
        let (sin_dec, cos_dec) = self.dec.sin_cos();
        let (sin_d, cos_d) = distance.sin_cos();
        let (sin_b, cos_b) = bearing.sin_cos();

        let sin_dec2 = (sin_dec * cos_d + cos_dec * sin_d * cos_b).clamp(-1.0, 1.0);
        let d_ra = (sin_b * sin_d * cos_dec).atan2(cos_d - sin_dec * sin_dec2);
        let ra = self.ra + Radians::new(d_ra).to::<Degree>();
        Self {
            ra: Degrees::new(ra.value().rem_euclid(360.0)),
            dec: Radians::new(sin_dec2.asin()).to::<Degree>(),
        }
    }
}

/// Maps uncorrected plate positions to corrected ones.
///
/// The real optical correction runs in an external tool; the pipeline only
/// needs this seam so tile files can carry both coordinate sets.
pub trait DistortionCorrection {
    fn correct(&self, uncorrected: Point) -> Point;
}

/// Leaves positions untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDistortion;

impl DistortionCorrection for NoDistortion {
    fn correct(&self, uncorrected: Point) -> Point {
        uncorrected
    }
}

/// RA/Dec box that tile centres must fall in. Defaults to the whole sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    #[serde(default = "default_ra_min")]
    pub ra_min: f64,
    #[serde(default = "default_ra_max")]
    pub ra_max: f64,
    #[serde(default = "default_dec_min")]
    pub dec_min: f64,
    #[serde(default = "default_dec_max")]
    pub dec_max: f64,
}

fn default_ra_min() -> f64 {
    0.0
}

fn default_ra_max() -> f64 {
    360.0
}

fn default_dec_min() -> f64 {
    -90.0
}

fn default_dec_max() -> f64 {
    90.0
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            ra_min: default_ra_min(),
            ra_max: default_ra_max(),
            dec_min: default_dec_min(),
            dec_max: default_dec_max(),
        }
    }
}

impl Footprint {
    pub fn contains(&self, position: &SkyPosition) -> bool {
        let ra = position.ra.value();
        let dec = position.dec.value();
        ra >= self.ra_min && ra <= self.ra_max && dec >= self.dec_min && dec <= self.dec_max
    }
}
