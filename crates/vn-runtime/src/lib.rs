mod engine;
mod helpers;

pub use engine::{
    Engine, EngineFault, EngineListener, EngineOptions, Environment, EventRecorder,
    SNAPSHOT_SCHEMA_V1,
};
