pub mod acceleration;
pub mod bike;
pub mod car;
pub mod edge_flags;
pub mod emergency;
pub mod encoder;
pub mod foot;
pub mod hgv;
pub mod max_speed;
pub mod priority;
pub mod profile;
pub mod speed_config;
pub mod tags;
pub mod way_attributes;
pub mod wheelchair;

pub use edge_flags::EdgeFlags;
pub use encoder::{BarrierAccess, EncodedWay, ProfileEncoder, RejectReason};
pub use profile::{Profile, ProfileKind};
pub use tags::{RawNode, RawWay, Tags};
