use super::rng::Mulberry32;
use super::scope::LocalStore;
use super::*;

pub const SNAPSHOT_SCHEMA_V1: &str = "vn-snapshot.v1";

impl Engine {
    /// Captures the run while it is parked on a dialogue or choice.
    pub fn snapshot(&self) -> Result<EngineSnapshot, VnError> {
        if !self.state.is_suspended() {
            return Err(VnError::new(
                "ENGINE_NOT_SUSPENDED",
                format!(
                    "snapshot() is only allowed while waiting for advance or a choice, state is {}.",
                    self.state
                ),
            ));
        }

        Ok(EngineSnapshot {
            schema_version: SNAPSHOT_SCHEMA_V1.to_string(),
            cursor: self.cursor,
            state: self.state,
            globals: self.globals.clone(),
            variables: self.locals.to_snapshot(),
            environment: self.environment.flags().clone(),
            rng_state: self.rng.state(),
        })
    }

    /// Restores a snapshot taken against the currently loaded script. No
    /// story events are replayed; use [`Engine::current_boundary`] to redraw.
    pub fn resume(&mut self, snapshot: EngineSnapshot) -> Result<(), VnError> {
        if snapshot.schema_version != SNAPSHOT_SCHEMA_V1 {
            return Err(VnError::new(
                "SNAPSHOT_SCHEMA",
                format!(
                    "Unsupported snapshot schema \"{}\".",
                    snapshot.schema_version
                ),
            ));
        }

        let step_matches = match (self.script.get(snapshot.cursor), snapshot.state) {
            (Some(step), EngineState::Waiting) => matches!(step.kind, StepKind::Dialogue { .. }),
            (Some(step), EngineState::Choice) => matches!(step.kind, StepKind::Choice { .. }),
            _ => false,
        };
        if !step_matches {
            return Err(VnError::new(
                "SNAPSHOT_CURSOR",
                format!(
                    "Snapshot cursor {} in state {} does not point at a matching step.",
                    snapshot.cursor, snapshot.state
                ),
            ));
        }

        let mut environment = self.environment.clone();
        for (key, value) in &snapshot.environment {
            environment.set(key, *value)?;
        }

        self.reset_run_bookkeeping();
        self.environment = environment;
        self.globals = snapshot.globals;
        self.locals = LocalStore::from_snapshot(snapshot.variables);
        self.rng = Mulberry32::new(snapshot.rng_state);
        self.cursor = snapshot.cursor;
        self.state = snapshot.state;
        info!(
            category = "flow",
            cursor = self.cursor,
            state = %self.state,
            "snapshot resumed"
        );
        self.update_debug();
        Ok(())
    }
}
