pub mod audio;
pub mod ducker;
pub mod input;
pub mod runtime;

pub use ducker::{
    Curve, DuckEnvelope, Ducker, DuckerParams, Mode, Phase, TriggerEvent, TriggerSource,
};
