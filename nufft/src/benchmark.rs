//! Memory footprints of dense, planned, and operator representations of the DFT.
//!
//! For each size in a geometric progression, [`fft_memory`] builds the dense half-spectrum DFT
//! matrix, a real [`FftOperator`], and the "FFT" entry selected by [`FftMeasurement`], measures
//! each with a [`MemoryMeter`], and hands a log-scale comparison to a [`Plotter`].

use crate::error::{Error, Result};
use crate::footprint::MemoryMeter;
use crate::plot::{Figure, Plotter, Series};
use crate::{dft, FftOperator};
use nufft_algorithms::{create_fft, FftEngine};
use serde::Serialize;

/// What the "FFT" curve measures.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FftMeasurement {
    /// Only the integer size itself.
    #[default]
    SizeOnly,
    /// The engine's FFT plan for the size.
    Plan,
}

impl core::str::FromStr for FftMeasurement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plan" => Ok(Self::Plan),
            "size" => Ok(Self::SizeOnly),
            other => Err(Error::InvalidArgument {
                arg: "fft_measurement",
                reason: format!("expected `plan` or `size`, got `{other}`"),
            }),
        }
    }
}

/// Parameters of a memory benchmark run.
///
/// Sizes are `floor(10^x)` for `x` from `start_exponent` up to, but excluding,
/// `stop_exponent`, in increments of `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkConfig {
    pub start_exponent: f64,
    pub stop_exponent: f64,
    pub step: f64,
    pub engine: FftEngine,
    pub fft_measurement: FftMeasurement,
    /// Width and height of the figure, in inches.
    pub figure_size: (f64, f64),
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            start_exponent: 2.0,
            stop_exponent: 4.0,
            step: 0.5,
            engine: FftEngine::RustFft,
            fft_measurement: FftMeasurement::SizeOnly,
            figure_size: (6.0, 4.0),
        }
    }
}

impl BenchmarkConfig {
    #[must_use]
    pub fn with_exponents(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.start_exponent = start;
        self.stop_exponent = stop;
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: FftEngine) -> Self {
        self.engine = engine;
        self
    }

    #[must_use]
    pub fn with_fft_measurement(mut self, fft_measurement: FftMeasurement) -> Self {
        self.fft_measurement = fft_measurement;
        self
    }

    #[must_use]
    pub fn with_figure_size(mut self, width: f64, height: f64) -> Self {
        self.figure_size = (width, height);
        self
    }

    /// The benchmarked sizes, in increasing order.
    pub fn sizes(&self) -> Result<Vec<usize>> {
        let (start, stop, step) = (self.start_exponent, self.stop_exponent, self.step);
        if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
            return Err(Error::InvalidArgument {
                arg: "exponents",
                reason: "exponents and step must be finite".into(),
            });
        }
        if step <= 0.0 {
            return Err(Error::InvalidArgument {
                arg: "step",
                reason: format!("step must be positive, got {step}"),
            });
        }
        if stop <= start {
            return Err(Error::InvalidArgument {
                arg: "stop_exponent",
                reason: format!("stop {stop} must exceed start {start}"),
            });
        }

        // Exponents whose power is an integer, like 10^3, may land just below it.
        let count = ((stop - start) / step - 1e-9).ceil() as usize;
        let mut sizes = Vec::with_capacity(count);
        for i in 0..count {
            let exponent = start + i as f64 * step;
            let n = (10f64.powf(exponent) * (1.0 + 1e-12)).floor();
            if n < 1.0 || n > usize::MAX as f64 {
                return Err(Error::InvalidArgument {
                    arg: "exponents",
                    reason: format!("10^{exponent} is not a valid size"),
                });
            }
            sizes.push(n as usize);
        }
        Ok(sizes)
    }
}

/// Footprints measured for one size, in bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FootprintRecord {
    pub n: usize,
    pub dft_bytes: usize,
    pub fft_bytes: usize,
    pub operator_bytes: usize,
}

/// Measures dense, planned, and operator footprints for every configured size, renders the
/// comparison, and returns the measurements.
pub fn fft_memory<M, P>(
    config: &BenchmarkConfig,
    meter: &M,
    plotter: &P,
) -> Result<Vec<FootprintRecord>>
where
    M: MemoryMeter + ?Sized,
    P: Plotter + ?Sized,
{
    let sizes = config.sizes()?;
    let mut records = Vec::with_capacity(sizes.len());
    for n in sizes {
        let x = (0..n).map(|i| i as f64).collect::<Vec<_>>();
        let (_, matrix) = dft(&x);
        let dft_bytes = meter.measure(&matrix);
        drop(matrix);

        let fft_bytes = match config.fft_measurement {
            FftMeasurement::Plan => meter.measure(&create_fft::<f64>(n, config.engine)),
            FftMeasurement::SizeOnly => meter.measure(&n),
        };

        let operator = FftOperator::<f64>::new(n, config.engine, true)?;
        let operator_bytes = meter.measure(&operator);

        records.push(FootprintRecord {
            n,
            dft_bytes,
            fft_bytes,
            operator_bytes,
        });
    }

    plotter.render(&figure(config, &records))?;
    Ok(records)
}

/// Encodes measurements as a pretty-printed JSON array.
pub fn records_to_json(records: &[FootprintRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn figure(config: &BenchmarkConfig, records: &[FootprintRecord]) -> Figure {
    let mut dft = Series::new("DFT", ".-k");
    let mut fft = Series::new("FFT", ".-r");
    let mut operator = Series::new("FFTop", ".-g");
    for record in records {
        let n = record.n as f64;
        dft.push(n, record.dft_bytes as f64);
        fft.push(n, record.fft_bytes as f64);
        operator.push(n, record.operator_bytes as f64);
    }
    Figure {
        title: "Memory comparison".into(),
        xlabel: "Vector size".into(),
        ylabel: Some("Bytes".into()),
        log_y: true,
        size: config.figure_size,
        series: vec![dft, fft, operator],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{DeepSize, Footprint};
    use crate::plot::PlotError;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct CountingMeter {
        calls: Cell<usize>,
    }

    impl MemoryMeter for CountingMeter {
        fn measure(&self, item: &dyn Footprint) -> usize {
            self.calls.set(self.calls.get() + 1);
            item.footprint()
        }
    }

    #[derive(Default)]
    struct RecordingPlotter {
        figures: RefCell<Vec<Figure>>,
    }

    impl Plotter for RecordingPlotter {
        fn render(&self, figure: &Figure) -> Result<(), PlotError> {
            self.figures.borrow_mut().push(figure.clone());
            Ok(())
        }
    }

    struct FailingPlotter;

    impl Plotter for FailingPlotter {
        fn render(&self, _: &Figure) -> Result<(), PlotError> {
            Err(PlotError::StdinUnavailable)
        }
    }

    #[test]
    fn default_sizes() {
        assert_eq!(
            BenchmarkConfig::default().sizes().unwrap(),
            vec![100, 316, 1000, 3162]
        );
    }

    #[test]
    fn invalid_progressions() {
        let bad = [
            BenchmarkConfig::default().with_exponents(2.0, 4.0, 0.0),
            BenchmarkConfig::default().with_exponents(3.0, 2.0, 0.5),
            BenchmarkConfig::default().with_exponents(f64::NAN, 2.0, 0.5),
        ];
        for config in bad.iter() {
            assert!(matches!(
                config.sizes(),
                Err(Error::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn measurement_from_str() {
        assert_eq!("plan".parse::<FftMeasurement>().unwrap(), FftMeasurement::Plan);
        assert_eq!(
            "size".parse::<FftMeasurement>().unwrap(),
            FftMeasurement::SizeOnly
        );
        assert!("heap".parse::<FftMeasurement>().is_err());
    }

    #[test]
    fn records_and_figure() {
        let config = BenchmarkConfig::default().with_exponents(1.0, 2.0, 0.5);
        let meter = CountingMeter::default();
        let plotter = RecordingPlotter::default();
        let records = fft_memory(&config, &meter, &plotter).unwrap();

        assert_eq!(
            records.iter().map(|r| r.n).collect::<Vec<_>>(),
            vec![10, 31]
        );
        assert_eq!(meter.calls.get(), 6);

        let figures = plotter.figures.borrow();
        assert_eq!(figures.len(), 1);
        let figure = &figures[0];
        assert_eq!(figure.title, "Memory comparison");
        assert_eq!(figure.xlabel, "Vector size");
        assert!(figure.log_y);
        let styles = figure
            .series
            .iter()
            .map(|s| (s.label.as_str(), s.style.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            styles,
            vec![("DFT", ".-k"), ("FFT", ".-r"), ("FFTop", ".-g")]
        );
        assert_eq!(figure.series[0].x, vec![10.0, 31.0]);
    }

    #[test]
    fn dense_matrix_dominates() {
        let config = BenchmarkConfig::default().with_exponents(2.0, 3.0, 0.5);
        let records = fft_memory(&config, &DeepSize, &crate::plot::NullPlotter).unwrap();
        for record in records {
            let n = record.n;
            assert!(record.dft_bytes >= (n / 2 + 1) * n * 16);
            assert!(record.dft_bytes > record.operator_bytes);
        }
    }

    #[test]
    fn default_measures_the_integer() {
        let config = BenchmarkConfig::default().with_exponents(2.0, 2.5, 0.5);
        assert_eq!(config.fft_measurement, FftMeasurement::SizeOnly);
        let records = fft_memory(&config, &DeepSize, &crate::plot::NullPlotter).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fft_bytes, core::mem::size_of::<usize>());
    }

    #[test]
    fn plan_measurement_is_opt_in() {
        let config = BenchmarkConfig::default()
            .with_exponents(2.0, 2.5, 0.5)
            .with_fft_measurement(FftMeasurement::Plan);
        let records = fft_memory(&config, &DeepSize, &crate::plot::NullPlotter).unwrap();
        assert!(records[0].fft_bytes > core::mem::size_of::<usize>());
    }

    #[test]
    fn records_encode_as_json() {
        let records = [FootprintRecord {
            n: 100,
            dft_bytes: 81_024,
            fft_bytes: 8,
            operator_bytes: 512,
        }];
        let json = records_to_json(&records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["n"], 100);
        assert_eq!(value[0]["fft_bytes"], 8);
    }

    #[test]
    fn encoding_errors_are_not_plot_errors() {
        let err = Error::from(serde_json::from_str::<serde_json::Value>("[").unwrap_err());
        assert!(matches!(err, Error::Json(_)));
        assert!(!err.to_string().contains("plot"));
    }

    #[test]
    fn plot_failures_propagate() {
        let config = BenchmarkConfig::default().with_exponents(1.0, 1.5, 0.5);
        assert!(matches!(
            fft_memory(&config, &DeepSize, &FailingPlotter),
            Err(Error::Plot(PlotError::StdinUnavailable))
        ));
    }
}
