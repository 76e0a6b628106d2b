//! Property tests for the spectral transform and table parser

use gaugeplot::spectrum::{frequency_axis, power_spectrum, Spectrum};
use gaugeplot::table::{HeaderRows, ResultTable};
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite() && v.abs() < 1e12)
}

proptest! {
    /// Power is a squared magnitude, so never negative
    #[test]
    fn test_power_is_non_negative(values in prop::collection::vec(finite(), 1..256)) {
        let power = power_spectrum(&values);
        prop_assert_eq!(power.len(), values.len() / 2 + 1);
        for p in power {
            prop_assert!(p >= 0.0);
        }
    }

    /// N samples spaced by dt give N/2+1 bins from 0 up to about 1/(2 dt)
    #[test]
    fn test_frequency_axis_shape(n in 2usize..512, dt in 1e-3f64..10.0) {
        let axis = frequency_axis(n, dt);
        prop_assert_eq!(axis.len(), n / 2 + 1);
        prop_assert_eq!(axis[0], 0.0);
        prop_assert!(axis.windows(2).all(|w| w[1] > w[0]));

        let nyquist = 1.0 / (2.0 * dt);
        let last = axis[n / 2];
        prop_assert!(last <= nyquist * (1.0 + 1e-12));
        if n % 2 == 0 {
            prop_assert!((last - nyquist).abs() <= 1e-9 * nyquist);
        }
    }

    /// Normalization scales every bin by the same factor
    #[test]
    fn test_normalization_is_linear(
        values in prop::collection::vec(finite(), 2..64),
        omega in 1e-3f64..10.0,
    ) {
        let axis: Vec<f64> = (0..values.len()).map(|i| i as f64 * 0.1).collect();
        let spectrum = Spectrum::compute(&axis, &values).unwrap();
        let scaled = spectrum.clone().normalized(omega);
        prop_assert_eq!(&scaled.power, &spectrum.power);
        for (a, b) in scaled.frequency.iter().zip(&spectrum.frequency) {
            prop_assert!((a * omega - b).abs() <= 1e-9 * b.abs().max(1.0));
        }
    }

    /// Rectangular numeric blocks always parse, whatever the header
    #[test]
    fn test_rectangular_block_parses(
        rows in 1usize..40,
        width in 1usize..8,
        header in prop::collection::vec("[A-Z_]{1,12} [a-z0-9.]{1,8}", 0..5),
    ) {
        let mut text = header.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        for r in 0..rows {
            let row: Vec<String> = (0..width).map(|c| format!("{}", r * width + c)).collect();
            text.push_str(&row.join(" "));
            text.push('\n');
        }

        let table = ResultTable::parse("prop.out", &text, HeaderRows::Fixed(header.len())).unwrap();
        prop_assert_eq!(table.rows(), rows);
        prop_assert_eq!(table.width(), width);
        prop_assert_eq!(table.header_lines().len(), header.len());
    }
}
