//! Kaiser–Bessel interpolation kernel.

use core::f64::consts::PI;

/// Modified Bessel function of the first kind, order zero.
pub fn bessel_i0(x: f64) -> f64 {
    let quarter_x2 = 0.25 * x * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..500 {
        term *= quarter_x2 / (k * k) as f64;
        sum += term;
        if term < sum * 1e-17 {
            break;
        }
    }
    sum
}

/// A Kaiser–Bessel kernel supported on `[-width / 2, width / 2]` grid samples.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KaiserBessel {
    width: usize,
    beta: f64,
}

impl KaiserBessel {
    /// Creates a kernel for the given width and grid oversampling ratio.
    ///
    /// The shape parameter follows Beatty, Nishimura and Pauly (2005).
    pub fn new(width: usize, oversampling: f64) -> Self {
        let j = width as f64;
        let shape = (j / oversampling).powi(2) * (oversampling - 0.5).powi(2) - 0.8;
        Self {
            width,
            beta: PI * shape.max(0.0).sqrt(),
        }
    }

    /// Number of grid samples the kernel touches.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The shape parameter.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Evaluates the kernel at offset `u`, in grid samples.
    pub fn evaluate(&self, u: f64) -> f64 {
        let half = self.width as f64 / 2.0;
        if u.abs() > half {
            return 0.0;
        }
        let r = u / half;
        bessel_i0(self.beta * (1.0 - r * r).max(0.0).sqrt())
    }

    /// Continuous Fourier transform of the kernel at `xi` cycles per grid sample.
    pub fn fourier(&self, xi: f64) -> f64 {
        let j = self.width as f64;
        let alpha = PI * j * xi;
        let d = self.beta * self.beta - alpha * alpha;
        if d > 0.0 {
            let s = d.sqrt();
            j * s.sinh() / s
        } else if d < 0.0 {
            let s = (-d).sqrt();
            j * s.sin() / s
        } else {
            j
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i0_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-14);
        assert!((bessel_i0(10.0) - 2815.716_628_466_254).abs() < 1e-9);
    }

    #[test]
    fn shape_parameter() {
        let kernel = KaiserBessel::new(6, 2.0);
        assert!((kernel.beta() - 13.855).abs() < 1e-3);
    }

    #[test]
    fn kernel_is_symmetric_and_compact() {
        let kernel = KaiserBessel::new(6, 2.0);
        assert_eq!(kernel.evaluate(3.5), 0.0);
        assert_eq!(kernel.evaluate(1.25), kernel.evaluate(-1.25));
        assert!(kernel.evaluate(0.0) > kernel.evaluate(1.0));
    }

    #[test]
    fn fourier_matches_quadrature() {
        let kernel = KaiserBessel::new(6, 2.0);
        let steps = 20_000;
        let h = 6.0 / steps as f64;
        for &xi in &[0.0, 0.1, 0.25] {
            // midpoint rule over the support
            let integral = (0..steps)
                .map(|i| {
                    let u = -3.0 + (i as f64 + 0.5) * h;
                    kernel.evaluate(u) * (2.0 * PI * xi * u).cos() * h
                })
                .sum::<f64>();
            let expected = kernel.fourier(xi);
            assert!(
                ((integral - expected) / expected).abs() < 1e-6,
                "{} != {}",
                integral,
                expected
            );
        }
    }
}
