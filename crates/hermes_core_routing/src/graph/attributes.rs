use std::ops::BitOr;

macro_rules! bitmask {
    ($name:ident { $($flag:ident = $bit:expr => $label:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u8);

        impl $name {
            pub const NONE: $name = $name(0);
            $(pub const $flag: $name = $name(1 << $bit);)+

            pub fn bits(&self) -> u8 {
                self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub fn contains(&self, other: $name) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn intersects(&self, other: $name) -> bool {
                self.0 & other.0 != 0
            }

            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }

            pub fn from_name(name: &str) -> Option<$name> {
                match name {
                    $($label => Some($name::$flag),)+
                    _ => None,
                }
            }
        }

        impl BitOr for $name {
            type Output = $name;

            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

bitmask!(WayCategory {
    HIGHWAYS = 0 => "highways",
    TOLLWAYS = 1 => "tollways",
    STEPS = 2 => "steps",
    FERRIES = 3 => "ferries",
    FORDS = 4 => "fords",
    TUNNELS = 5 => "tunnels",
});

bitmask!(VehicleTypes {
    HGV = 0 => "hgv",
    BUS = 1 => "bus",
    AGRICULTURAL = 2 => "agricultural",
    FORESTRY = 3 => "forestry",
    DELIVERY = 4 => "delivery",
    GOODS = 5 => "goods",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderKind {
    #[default]
    None,
    Open,
    Controlled,
}

/// Country border data of an edge, supplied by an external builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BorderAttributes {
    pub kind: BorderKind,
    pub start_country: u16,
    pub end_country: u16,
}

impl BorderAttributes {
    pub fn crossing(kind: BorderKind, start_country: u16, end_country: u16) -> Self {
        BorderAttributes {
            kind,
            start_country,
            end_country,
        }
    }

    pub fn is_border(&self) -> bool {
        self.kind != BorderKind::None
    }
}

/// Legal restrictions of an edge for heavy vehicles. Dimensions are in
/// meters and tonnes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleRestrictions {
    pub restricted_types: VehicleTypes,
    /// Types only allowed to reach a destination on the edge.
    pub destination_types: VehicleTypes,
    pub hazmat_forbidden: bool,
    pub max_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_weight: Option<f64>,
    pub max_length: Option<f64>,
    pub max_axle_load: Option<f64>,
}

impl VehicleRestrictions {
    pub fn is_empty(&self) -> bool {
        *self == VehicleRestrictions::default()
    }
}

/// Accessibility data of an edge. Classes grow with roughness, lengths are
/// in centimeters and the incline is an absolute percentage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelchairAttributes {
    pub surface: Option<u8>,
    pub smoothness: Option<u8>,
    pub track_type: Option<u8>,
    pub incline: Option<f64>,
    pub kerb_height: Option<f64>,
    pub width: Option<f64>,
}

impl WheelchairAttributes {
    pub fn is_empty(&self) -> bool {
        *self == WheelchairAttributes::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeAttributes {
    pub way_category: WayCategory,
    pub border: BorderAttributes,
    pub vehicle: VehicleRestrictions,
    pub wheelchair: WheelchairAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_combine_categories() {
        let category = WayCategory::HIGHWAYS | WayCategory::TUNNELS;
        assert!(category.contains(WayCategory::TUNNELS));
        assert!(!category.contains(WayCategory::STEPS));
        assert!(category.intersects(WayCategory::TUNNELS | WayCategory::STEPS));
        assert!(!category.intersects(WayCategory::FERRIES));
    }

    #[test]
    fn should_parse_category_names() {
        assert_eq!(WayCategory::from_name("fords"), Some(WayCategory::FORDS));
        assert_eq!(VehicleTypes::from_name("bus"), Some(VehicleTypes::BUS));
        assert_eq!(WayCategory::from_name("ladders"), None);
    }

    #[test]
    fn default_attributes_should_be_empty() {
        let attributes = EdgeAttributes::default();
        assert!(attributes.way_category.is_empty());
        assert!(!attributes.border.is_border());
        assert!(attributes.vehicle.is_empty());
        assert!(attributes.wheelchair.is_empty());
    }
}
