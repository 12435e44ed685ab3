use iconforge::{scale_factor, validate_options, SolidOptions};
use proptest::prelude::*;

proptest! {
    #[test]
    fn scale_factor_is_size_over_width(size in 0.01f64..10000.0, width in 0.01f64..5000.0) {
        let s = scale_factor(size, width);
        prop_assert!((s * width - size).abs() < 1e-6 * size.max(1.0));
    }

    #[test]
    fn zero_width_never_scales(size in 0.0f64..10000.0) {
        prop_assert_eq!(scale_factor(size, 0.0), 1.0);
    }

    #[test]
    fn in_range_options_validate(
        size in 0.0f64..=10000.0,
        thickness in 0.01f64..=1000.0,
        base_thickness in 0.0f64..=1000.0,
        hole_diameter in 0.0f64..=100.0,
        flat_top_offset in 0.1f64..=10.0,
    ) {
        let options = SolidOptions {
            size,
            thickness,
            base_thickness,
            hole_diameter,
            flat_top_offset,
            ..SolidOptions::default()
        };
        prop_assert!(validate_options(&options).is_ok());
    }

    #[test]
    fn negative_sizes_rejected(size in -10000.0f64..-0.0001) {
        let options = SolidOptions { size, ..SolidOptions::default() };
        prop_assert!(validate_options(&options).is_err());
    }
}
