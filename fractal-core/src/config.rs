use std::{
    f32::consts::{FRAC_PI_2, FRAC_PI_4},
    ops::Range,
};

use crate::{
    color::{Color, Gradient},
    error::GrowthError,
};

/// Tunable parameters of a growing tree.
///
/// Parameters are read at every step, so changes made between steps (see
/// [`crate::tree::Tree::set_params`]) apply to every segment processed
/// afterwards.
///
/// ### Fields
/// - `final_length` - Children shorter than this are not spawned.
/// - `min_len_reduction`, `max_len_reduction` - Child length is the parent
///   length times a uniform factor from this range.
/// - `min_weight_reduction`, `max_weight_reduction` - Same, for width.
/// - `delta_min`, `delta_max` - How far (radians) the two children may turn
///   clockwise and counter-clockwise from the parent's direction.
/// - `color` - Flat color used when `gradient` is `None`.
/// - `gradient` - Enables gradient fills derived from segment length.
/// - `draw_with_lines` - Emit centerline strokes instead of tapered quads.
/// - `trunk_length`, `trunk_width` - Ranges the trunk dimensions are drawn from.
/// - `trunk_angle` - Growth direction of the trunk (`π/2` grows up).
/// - `tail_append_probability` - Chance that a pair of children is appended
///   behind the whole frontier instead of right after its parent.
/// - `max_segments` - Hard cap on segments ever created by one tree.
/// - `length_budget` - Segment length a driver should grow per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthParameters {
    pub final_length: f32,
    pub min_len_reduction: f32,
    pub max_len_reduction: f32,
    pub min_weight_reduction: f32,
    pub max_weight_reduction: f32,
    pub delta_min: f32,
    pub delta_max: f32,
    pub color: Color,
    pub gradient: Option<Gradient>,
    pub draw_with_lines: bool,
    pub trunk_length: Range<f32>,
    pub trunk_width: Range<f32>,
    pub trunk_angle: f32,
    pub tail_append_probability: f32,
    pub max_segments: usize,
    pub length_budget: f32,
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self {
            final_length: 6.0,
            min_len_reduction: 0.7,
            max_len_reduction: 0.9,
            min_weight_reduction: 0.6,
            max_weight_reduction: 0.8,
            delta_min: FRAC_PI_4,
            delta_max: FRAC_PI_4,
            color: Color::rgb(0x1e, 0x1e, 0x1e),
            gradient: None,
            draw_with_lines: false,
            trunk_length: 90.0..120.0,
            trunk_width: 20.0..35.0,
            trunk_angle: FRAC_PI_2,
            tail_append_probability: 0.7,
            max_segments: 500_000,
            length_budget: 100.0,
        }
    }
}

impl GrowthParameters {
    /// Checks that the parameters describe a tree that can be grown.
    ///
    /// Reduction factors must lie in `(0, 1]`; a factor of exactly `1`
    /// is accepted, the segment cap is what bounds such trees.
    ///
    /// ### Errors
    /// [`GrowthError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GrowthError> {
        let finite = [
            ("final_length", self.final_length),
            ("delta_min", self.delta_min),
            ("delta_max", self.delta_max),
            ("trunk_angle", self.trunk_angle),
            ("length_budget", self.length_budget),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(GrowthError::invalid(name, format!("{value} is not finite")));
            }
        }

        if self.final_length < 0.0 {
            return Err(GrowthError::invalid(
                "final_length",
                format!("{} is negative", self.final_length),
            ));
        }

        reduction_range(
            "len_reduction",
            self.min_len_reduction,
            self.max_len_reduction,
        )?;
        reduction_range(
            "weight_reduction",
            self.min_weight_reduction,
            self.max_weight_reduction,
        )?;

        dimension_range("trunk_length", &self.trunk_length)?;
        dimension_range("trunk_width", &self.trunk_width)?;

        if !(0.0..=1.0).contains(&self.tail_append_probability) {
            return Err(GrowthError::invalid(
                "tail_append_probability",
                format!("{} is outside [0, 1]", self.tail_append_probability),
            ));
        }

        if self.max_segments == 0 {
            return Err(GrowthError::invalid("max_segments", "must be at least 1"));
        }

        // Each budgeted step must draw at least one segment.
        if self.length_budget <= 0.0 {
            return Err(GrowthError::invalid(
                "length_budget",
                format!("{} is not positive", self.length_budget),
            ));
        }

        Ok(())
    }
}

fn reduction_range(name: &'static str, min: f32, max: f32) -> Result<(), GrowthError> {
    for factor in [min, max] {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(GrowthError::invalid(
                name,
                format!("factor {factor} is outside (0, 1]"),
            ));
        }
    }
    if min > max {
        return Err(GrowthError::invalid(name, format!("min {min} exceeds max {max}")));
    }
    Ok(())
}

/// Ranges may be empty (`a..a`), which pins the value to `a`.
fn dimension_range(name: &'static str, range: &Range<f32>) -> Result<(), GrowthError> {
    if !(range.start > 0.0 && range.end.is_finite()) {
        return Err(GrowthError::invalid(
            name,
            format!("{range:?} must be positive and finite"),
        ));
    }
    if range.start > range.end {
        return Err(GrowthError::invalid(
            name,
            format!("start {} exceeds end {}", range.start, range.end),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_field(params: &GrowthParameters) -> Option<&'static str> {
        match params.validate() {
            Err(GrowthError::InvalidParameter { name, .. }) => Some(name),
            _ => None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GrowthParameters::default().validate(), Ok(()));
    }

    #[test]
    fn unit_reduction_is_accepted() {
        let params = GrowthParameters {
            min_len_reduction: 1.0,
            max_len_reduction: 1.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn reductions_outside_unit_interval_are_rejected() {
        let mut params = GrowthParameters::default();
        params.max_len_reduction = 1.2;
        assert_eq!(rejected_field(&params), Some("len_reduction"));

        let mut params = GrowthParameters::default();
        params.min_weight_reduction = 0.0;
        assert_eq!(rejected_field(&params), Some("weight_reduction"));

        let mut params = GrowthParameters::default();
        params.min_len_reduction = f32::NAN;
        assert_eq!(rejected_field(&params), Some("len_reduction"));
    }

    #[test]
    fn inverted_reduction_range_is_rejected() {
        let params = GrowthParameters {
            min_len_reduction: 0.9,
            max_len_reduction: 0.7,
            ..Default::default()
        };
        assert_eq!(rejected_field(&params), Some("len_reduction"));
    }

    #[test]
    fn negative_final_length_and_dimensions_are_rejected() {
        let mut params = GrowthParameters::default();
        params.final_length = -1.0;
        assert_eq!(rejected_field(&params), Some("final_length"));

        let mut params = GrowthParameters::default();
        params.trunk_width = -3.0..10.0;
        assert_eq!(rejected_field(&params), Some("trunk_width"));

        let mut params = GrowthParameters::default();
        params.trunk_length = 120.0..90.0;
        assert_eq!(rejected_field(&params), Some("trunk_length"));
    }

    #[test]
    fn pinned_trunk_range_is_accepted() {
        let params = GrowthParameters {
            trunk_length: 100.0..100.0,
            trunk_width: 25.0..25.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn probability_and_cap_are_checked() {
        let mut params = GrowthParameters::default();
        params.tail_append_probability = 1.5;
        assert_eq!(rejected_field(&params), Some("tail_append_probability"));

        let mut params = GrowthParameters::default();
        params.max_segments = 0;
        assert_eq!(rejected_field(&params), Some("max_segments"));
    }

    #[test]
    fn non_positive_length_budget_is_rejected() {
        for budget in [0.0, -5.0] {
            let params = GrowthParameters {
                length_budget: budget,
                ..Default::default()
            };
            assert_eq!(rejected_field(&params), Some("length_budget"));
        }
    }
}
