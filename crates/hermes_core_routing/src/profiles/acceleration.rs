/// Speeds at or above this are not derated.
pub const ACCELERATION_SPEED_CUTOFF_MAX: f64 = 80.0;
pub const ACCELERATION_SPEED_CUTOFF_MIN: f64 = 20.0;
pub const AVERAGE_SECONDS_TO_100_KMPH: f64 = 10.0;
/// Lower bound of the time spent accelerating on a way, in seconds.
pub const MIN_ACCELERATION_DURATION_SECONDS: f64 = 1.0;

fn kmph_to_mps(speed: f64) -> f64 {
    speed / 3.6
}

fn mps_to_kmph(speed: f64) -> f64 {
    speed * 3.6
}

/// Derates the speed of short ways to account for accelerating from and
/// decelerating to a stop at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationModel {
    seconds_to_100_kmph: f64,
    cutoff_min: f64,
    cutoff_max: f64,
}

impl Default for AccelerationModel {
    fn default() -> Self {
        AccelerationModel {
            seconds_to_100_kmph: AVERAGE_SECONDS_TO_100_KMPH,
            cutoff_min: ACCELERATION_SPEED_CUTOFF_MIN,
            cutoff_max: ACCELERATION_SPEED_CUTOFF_MAX,
        }
    }
}

impl AccelerationModel {
    pub fn new(seconds_to_100_kmph: f64) -> Self {
        AccelerationModel {
            seconds_to_100_kmph,
            ..AccelerationModel::default()
        }
    }

    /// Slow vehicles accelerate faster, so their modifier is close to 1 and
    /// fast ones get close to 0.01.
    fn acceleration(&self, max_speed: f64) -> f64 {
        let normalised = (max_speed.max(self.cutoff_min) - self.cutoff_min)
            / (self.cutoff_max - self.cutoff_min);
        let modifier = 0.01_f64.powf(normalised);
        let seconds_to_100 = self.seconds_to_100_kmph + modifier * self.seconds_to_100_kmph;

        100.0 / seconds_to_100
    }

    /// Whole seconds needed to travel `distance` meters from a stop,
    /// accelerating until `max_speed`.
    fn duration_to_travel(&self, acceleration: f64, max_speed: f64, distance: f64) -> f64 {
        let mut current_speed = 0.0;
        let mut travelled = 0.0;
        let mut seconds = 0.0;

        while current_speed < max_speed && travelled < distance {
            current_speed += acceleration;
            seconds += 1.0;
            travelled += kmph_to_mps(current_speed);
        }

        let remaining = distance - travelled;
        if remaining > 0.0 {
            seconds += remaining / kmph_to_mps(max_speed);
        }

        seconds
    }

    fn distance_while_accelerating(&self, acceleration: f64, max_speed: f64) -> f64 {
        let mut current_speed = 0.0;
        let mut travelled = 0.0;

        while current_speed < max_speed {
            current_speed = (current_speed + acceleration).min(max_speed);
            travelled += kmph_to_mps(current_speed);
        }

        travelled
    }

    /// Average speed in km/h on a way of `distance` meters whose speed is
    /// limited to `max_speed`.
    pub fn adjust_speed(&self, distance: f64, max_speed: f64) -> f64 {
        if max_speed >= self.cutoff_max || max_speed <= 0.0 || distance <= 0.0 {
            return max_speed;
        }

        let acceleration = self.acceleration(max_speed);
        let accelerating_distance = self.distance_while_accelerating(acceleration, max_speed);
        let distance_at_max_speed = distance - 2.0 * accelerating_distance;

        if distance_at_max_speed < 0.0 {
            // The vehicle never reaches the max speed, half of the way is
            // spent accelerating and the other half braking.
            let duration = self
                .duration_to_travel(acceleration, max_speed, distance / 2.0)
                .max(MIN_ACCELERATION_DURATION_SECONDS);

            return mps_to_kmph(distance / (duration * 2.0)).min(max_speed);
        }

        let accelerating_duration = (max_speed / acceleration).ceil();
        let duration = accelerating_duration * 2.0 + distance_at_max_speed / kmph_to_mps(max_speed);

        mps_to_kmph(distance / duration).min(max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_change_fast_speeds() {
        let model = AccelerationModel::default();
        assert_eq!(model.adjust_speed(50.0, 100.0), 100.0);
        assert_eq!(model.adjust_speed(50.0, ACCELERATION_SPEED_CUTOFF_MAX), 80.0);
    }

    #[test]
    fn should_not_change_speed_without_distance() {
        let model = AccelerationModel::default();
        assert_eq!(model.adjust_speed(0.0, 50.0), 50.0);
        assert_eq!(model.adjust_speed(-3.0, 50.0), 50.0);
    }

    #[test]
    fn should_derate_short_ways() {
        let model = AccelerationModel::default();
        let short = model.adjust_speed(100.0, 50.0);
        let long = model.adjust_speed(5_000.0, 50.0);

        assert!(short < long, "{short} {long}");
        assert!(long < 50.0);
        assert!(long > 40.0);
    }

    #[test]
    fn should_floor_duration_of_degenerate_distances() {
        let model = AccelerationModel::default();
        let distance = 0.01;
        let speed = model.adjust_speed(distance, 50.0);

        assert!(speed.is_finite());
        assert!(speed > 0.0);
        let expected = mps_to_kmph(distance / (MIN_ACCELERATION_DURATION_SECONDS * 2.0));
        assert!((speed - expected).abs() < 1e-9, "{speed} {expected}");
    }

    #[test]
    fn should_accelerate_slow_speeds_faster() {
        let model = AccelerationModel::default();
        assert!(model.acceleration(20.0) > model.acceleration(70.0));
    }
}
