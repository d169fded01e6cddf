pub mod core;
pub mod curve;
pub mod envelope;
pub mod note;
pub mod params;

pub use self::core::{Ducker, DEFAULT_SAMPLE_RATE};
pub use self::curve::Curve;
pub use self::envelope::{DuckEnvelope, Phase};
pub use self::note::{TriggerEvent, TriggerSource};
pub use self::params::{DuckerParams, DuckerState, Mode, ParamKey};
