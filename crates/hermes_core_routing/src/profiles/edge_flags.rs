use crate::{constants::MAX_NODE_COUNTER, edge_direction::EdgeDirection};

use super::priority::PriorityCode;

/// A named bit range of the packed flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagField {
    pub name: &'static str,
    pub offset: u32,
    pub width: u32,
}

impl FlagField {
    pub const fn max_value(&self) -> u64 {
        (1u64 << self.width) - 1
    }

    pub const fn mask(&self) -> u64 {
        self.max_value() << self.offset
    }

    pub fn read(&self, word: u64) -> u64 {
        (word & self.mask()) >> self.offset
    }

    pub fn write(&self, word: u64, value: u64) -> u64 {
        let value = value.min(self.max_value());
        (word & !self.mask()) | (value << self.offset)
    }
}

pub const FORWARD_SPEED: FlagField = FlagField {
    name: "forward_speed",
    offset: 0,
    width: 8,
};
pub const BACKWARD_SPEED: FlagField = FlagField {
    name: "backward_speed",
    offset: 8,
    width: 8,
};
pub const FORWARD_ACCESS: FlagField = FlagField {
    name: "forward_access",
    offset: 16,
    width: 1,
};
pub const BACKWARD_ACCESS: FlagField = FlagField {
    name: "backward_access",
    offset: 17,
    width: 1,
};
pub const CONDITIONAL_ACCESS: FlagField = FlagField {
    name: "conditional_access",
    offset: 18,
    width: 1,
};
pub const PRIORITY: FlagField = FlagField {
    name: "priority",
    offset: 19,
    width: 3,
};
pub const ROUNDABOUT: FlagField = FlagField {
    name: "roundabout",
    offset: 22,
    width: 1,
};
pub const FERRY: FlagField = FlagField {
    name: "ferry",
    offset: 23,
    width: 1,
};
pub const TRAFFIC_SIGNALS: FlagField = FlagField {
    name: "traffic_signals",
    offset: 24,
    width: 4,
};
pub const CROSSINGS: FlagField = FlagField {
    name: "crossings",
    offset: 28,
    width: 4,
};

pub const FLAG_LAYOUT: [FlagField; 10] = [
    FORWARD_SPEED,
    BACKWARD_SPEED,
    FORWARD_ACCESS,
    BACKWARD_ACCESS,
    CONDITIONAL_ACCESS,
    PRIORITY,
    ROUNDABOUT,
    FERRY,
    TRAFFIC_SIGNALS,
    CROSSINGS,
];

/// Rounds a speed to a multiple of the profile speed factor.
pub fn quantize_speed(speed: f64, speed_factor: f64) -> f64 {
    let steps = (speed / speed_factor)
        .round()
        .clamp(0.0, FORWARD_SPEED.max_value() as f64);
    steps * speed_factor
}

/// Decoded flags of one edge for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeFlags {
    pub forward_speed: f64,
    pub backward_speed: f64,
    pub forward_access: bool,
    pub backward_access: bool,
    pub conditional_access: bool,
    pub priority: PriorityCode,
    pub roundabout: bool,
    pub ferry: bool,
    pub traffic_signals: u8,
    pub crossings: u8,
}

impl EdgeFlags {
    pub fn encode(&self, speed_factor: f64) -> u64 {
        let speed_steps = |speed: f64| (quantize_speed(speed, speed_factor) / speed_factor).round() as u64;

        let mut word = 0;
        word = FORWARD_SPEED.write(word, speed_steps(self.forward_speed));
        word = BACKWARD_SPEED.write(word, speed_steps(self.backward_speed));
        word = FORWARD_ACCESS.write(word, self.forward_access as u64);
        word = BACKWARD_ACCESS.write(word, self.backward_access as u64);
        word = CONDITIONAL_ACCESS.write(word, self.conditional_access as u64);
        word = PRIORITY.write(word, self.priority.value() as u64);
        word = ROUNDABOUT.write(word, self.roundabout as u64);
        word = FERRY.write(word, self.ferry as u64);
        word = TRAFFIC_SIGNALS.write(word, self.traffic_signals.min(MAX_NODE_COUNTER) as u64);
        word = CROSSINGS.write(word, self.crossings.min(MAX_NODE_COUNTER) as u64);
        word
    }

    pub fn decode(word: u64, speed_factor: f64) -> Self {
        EdgeFlags {
            forward_speed: FORWARD_SPEED.read(word) as f64 * speed_factor,
            backward_speed: BACKWARD_SPEED.read(word) as f64 * speed_factor,
            forward_access: FORWARD_ACCESS.read(word) == 1,
            backward_access: BACKWARD_ACCESS.read(word) == 1,
            conditional_access: CONDITIONAL_ACCESS.read(word) == 1,
            priority: PriorityCode::from_value(PRIORITY.read(word) as u8).unwrap_or_default(),
            roundabout: ROUNDABOUT.read(word) == 1,
            ferry: FERRY.read(word) == 1,
            traffic_signals: TRAFFIC_SIGNALS.read(word) as u8,
            crossings: CROSSINGS.read(word) as u8,
        }
    }

    pub fn has_access(&self) -> bool {
        self.forward_access || self.backward_access
    }

    pub fn access(&self, direction: EdgeDirection) -> bool {
        match direction {
            EdgeDirection::Forward => self.forward_access,
            EdgeDirection::Backward => self.backward_access,
        }
    }

    pub fn speed(&self, direction: EdgeDirection) -> f64 {
        match direction {
            EdgeDirection::Forward => self.forward_speed,
            EdgeDirection::Backward => self.backward_speed,
        }
    }

    /// Removes every access, used for edges behind a blocking barrier.
    pub fn blocked(mut self) -> Self {
        self.forward_access = false;
        self.backward_access = false;
        self.conditional_access = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_should_not_overlap() {
        for (i, a) in FLAG_LAYOUT.iter().enumerate() {
            for b in FLAG_LAYOUT.iter().skip(i + 1) {
                assert_eq!(
                    a.mask() & b.mask(),
                    0,
                    "{} overlaps {}",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn fields_should_fit_in_64_bits() {
        for field in FLAG_LAYOUT {
            assert!(field.width > 0);
            assert!(field.offset + field.width <= 64, "{}", field.name);
        }
    }

    #[test]
    fn priority_field_should_hold_every_code() {
        assert!(PRIORITY.max_value() >= PriorityCode::MAX_VALUE as u64);
    }

    #[test]
    fn should_decode_encoded_flags() {
        let flags = EdgeFlags {
            forward_speed: 50.0,
            backward_speed: 30.0,
            forward_access: true,
            backward_access: false,
            conditional_access: true,
            priority: PriorityCode::Prefer,
            roundabout: true,
            ferry: false,
            traffic_signals: 2,
            crossings: 1,
        };

        assert_eq!(EdgeFlags::decode(flags.encode(5.0), 5.0), flags);
    }

    #[test]
    fn should_saturate_counters() {
        let flags = EdgeFlags {
            traffic_signals: 40,
            ..EdgeFlags::default()
        };
        assert_eq!(EdgeFlags::decode(flags.encode(5.0), 5.0).traffic_signals, 15);
    }

    #[test]
    fn should_quantize_speeds() {
        assert_eq!(quantize_speed(47.0, 5.0), 45.0);
        assert_eq!(quantize_speed(48.0, 5.0), 50.0);
        assert_eq!(quantize_speed(7.0, 2.0), 8.0);
    }
}
