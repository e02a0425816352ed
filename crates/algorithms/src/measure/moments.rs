//! Second-order central moments and the ellipse they describe

/// The ellipse with the same normalized second central moments as a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct InertiaEllipse {
    pub centroid: (f64, f64),
    /// Larger eigenvalue of the covariance matrix
    pub lambda1: f64,
    /// Smaller eigenvalue, clamped at 0
    pub lambda2: f64,
}

impl InertiaEllipse {
    pub fn from_pixels(pixels: &[(usize, usize)]) -> Self {
        let n = pixels.len().max(1) as f64;
        let (sr, sc) = pixels
            .iter()
            .fold((0.0, 0.0), |(sr, sc), &(r, c)| (sr + r as f64, sc + c as f64));
        let (cr, cc) = (sr / n, sc / n);

        let (mut mrr, mut mcc, mut mrc) = (0.0, 0.0, 0.0);
        for &(r, c) in pixels {
            let dr = r as f64 - cr;
            let dc = c as f64 - cc;
            mrr += dr * dr;
            mcc += dc * dc;
            mrc += dr * dc;
        }
        let (a, b, c) = (mrr / n, mcc / n, mrc / n);

        let mean = (a + b) / 2.0;
        let spread = (((a - b) / 2.0).powi(2) + c * c).sqrt();
        Self {
            centroid: (cr, cc),
            lambda1: mean + spread,
            lambda2: (mean - spread).max(0.0),
        }
    }

    pub fn major_axis_length(&self) -> f64 {
        4.0 * self.lambda1.sqrt()
    }

    pub fn minor_axis_length(&self) -> f64 {
        4.0 * self.lambda2.sqrt()
    }

    pub fn eccentricity(&self) -> f64 {
        if self.lambda1 == 0.0 {
            return 0.0;
        }
        (1.0 - self.lambda2 / self.lambda1).max(0.0).sqrt()
    }
}
