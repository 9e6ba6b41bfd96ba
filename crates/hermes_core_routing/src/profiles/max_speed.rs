use crate::constants::{KNOTS_TO_KPH, MPH_TO_KPH};

use super::speed_config::SpeedConfig;

const WALK_SPEED: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxSpeed {
    /// Limit in km/h.
    Limited(f64),
    /// `maxspeed=none`, the profile maximum applies.
    Unlimited,
}

// https://wiki.openstreetmap.org/wiki/Key:maxspeed
pub fn parse_max_speed(value: &str, speeds: &SpeedConfig) -> Option<MaxSpeed> {
    value
        .split(';')
        .find_map(|part| parse_single_max_speed(part.trim(), speeds))
}

fn parse_single_max_speed(value: &str, speeds: &SpeedConfig) -> Option<MaxSpeed> {
    match value {
        "" => None,
        "none" | "signals" | "variable" => Some(MaxSpeed::Unlimited),
        "walk" => Some(MaxSpeed::Limited(WALK_SPEED)),
        zone if zone.contains(':') => speeds.zone_max_speed(zone).map(MaxSpeed::Limited),
        _ => {
            let (number, factor) = if let Some(number) = value.strip_suffix("mph") {
                (number, MPH_TO_KPH)
            } else if let Some(number) = value.strip_suffix("knots") {
                (number, KNOTS_TO_KPH)
            } else {
                let number = value
                    .trim_end_matches("km/h")
                    .trim_end_matches("kmh")
                    .trim_end_matches("kph");
                (number, 1.0)
            };

            number
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|speed| speed.is_finite() && *speed > 0.0)
                .map(|speed| MaxSpeed::Limited(speed * factor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speeds() -> SpeedConfig {
        SpeedConfig::default().with_max_speeds(&[("de:urban", 50), ("de:rural", 100)])
    }

    #[test]
    fn should_parse_plain_values() {
        assert_eq!(
            parse_max_speed("50", &speeds()),
            Some(MaxSpeed::Limited(50.0))
        );
        assert_eq!(
            parse_max_speed("70 km/h", &speeds()),
            Some(MaxSpeed::Limited(70.0))
        );
        assert_eq!(parse_max_speed("none", &speeds()), Some(MaxSpeed::Unlimited));
        assert_eq!(
            parse_max_speed("walk", &speeds()),
            Some(MaxSpeed::Limited(WALK_SPEED))
        );
    }

    #[test]
    fn should_convert_imperial_units() {
        match parse_max_speed("30 mph", &speeds()) {
            Some(MaxSpeed::Limited(speed)) => assert!((speed - 48.28).abs() < 0.01),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_resolve_zones() {
        assert_eq!(
            parse_max_speed("DE:urban", &speeds()),
            Some(MaxSpeed::Limited(50.0))
        );
        assert_eq!(parse_max_speed("FR:urban", &speeds()), None);
    }

    #[test]
    fn should_take_first_valid_of_multiple_values() {
        assert_eq!(
            parse_max_speed("fast;30", &speeds()),
            Some(MaxSpeed::Limited(30.0))
        );
        assert_eq!(parse_max_speed("NaN", &speeds()), None);
        assert_eq!(parse_max_speed("-20", &speeds()), None);
    }
}
