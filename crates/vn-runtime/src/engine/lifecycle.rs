use super::listener::EngineListener;
use super::rng::Mulberry32;
use super::scope::{Environment, LocalStore};
use super::*;

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub random_seed: Option<u32>,
    /// Closed set of environment flags. Defaults to `isDay` / `isNight`.
    pub environment: Option<BTreeMap<String, bool>>,
    /// Consecutive steps one drive may execute without reaching a dialogue,
    /// choice or the end of the script. `None` runs unbounded.
    pub step_guard: Option<usize>,
}

/// Recoverable interpreter faults. None of them raise an error from the
/// stepping operations; the last one is kept for the host to inspect.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineFault {
    UnresolvedLabel { label: String },
    UnresolvedStepId { id: StepId },
    UnknownStepType {
        step_id: Option<StepId>,
        type_name: String,
    },
    ConditionFailureWithoutFallback { step_id: Option<StepId> },
    UnknownEnvironmentKey { key: String },
    GuardExceeded { limit: usize },
}

impl EngineFault {
    /// Unresolved jumps leave the machine parked with nothing scheduled.
    pub fn stalls(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedLabel { .. } | Self::UnresolvedStepId { .. }
        )
    }
}

pub struct Engine {
    pub(super) script: Vec<Step>,
    pub(super) cursor: usize,
    pub(super) state: EngineState,
    pub(super) globals: ValueMap,
    pub(super) locals: LocalStore,
    pub(super) environment: Environment,
    pub(super) rng: Mulberry32,
    initial_random_seed: u32,
    step_guard: Option<usize>,
    pub(super) scheduled: bool,
    pub(super) step_count: u64,
    pub(super) last_fault: Option<EngineFault>,
    listeners: Vec<Box<dyn EngineListener>>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        let initial_random_seed = options.random_seed.unwrap_or(1);
        let environment = options
            .environment
            .map(Environment::with_flags)
            .unwrap_or_default();
        Self {
            script: Vec::new(),
            cursor: 0,
            state: EngineState::Idle,
            globals: ValueMap::new(),
            locals: LocalStore::default(),
            environment,
            rng: Mulberry32::new(initial_random_seed),
            initial_random_seed,
            step_guard: options.step_guard,
            scheduled: false,
            step_count: 0,
            last_fault: None,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn EngineListener>) {
        self.listeners.push(listener);
    }

    /// Replaces the running script and discards all progress of the previous
    /// run. Saved maps are copied in; absent maps start empty.
    pub fn load_script(
        &mut self,
        steps: Vec<Step>,
        saved_globals: Option<ValueMap>,
        saved_variables: Option<ValueMap>,
    ) {
        self.script = steps;
        self.globals = saved_globals.unwrap_or_default();
        self.locals = LocalStore::from_snapshot(saved_variables.unwrap_or_default());
        self.cursor = 0;
        self.state = EngineState::Idle;
        self.reset_run_bookkeeping();
        info!(
            category = "flow",
            total_steps = self.script.len(),
            "script loaded"
        );
        self.update_debug();
    }

    pub(super) fn reset_run_bookkeeping(&mut self) {
        self.scheduled = false;
        self.step_count = 0;
        self.last_fault = None;
        self.rng = Mulberry32::new(self.initial_random_seed);
    }

    /// Starts playback at `start_label`, else at the autosave label, else at
    /// the first step.
    pub fn start(&mut self, start_label: Option<&str>) -> Result<(), VnError> {
        if self.script.is_empty() {
            return Ok(());
        }
        if self.state == EngineState::Ended {
            warn!(category = "flow", "start ignored: script already ended");
            return Ok(());
        }

        self.state = EngineState::Playing;
        let entry = start_label
            .map(str::to_string)
            .or_else(|| {
                self.locals
                    .autosave()
                    .filter(|label| !label.is_empty())
                    .map(str::to_string)
            });
        match entry {
            Some(label) => {
                info!(category = "flow", label = %label, "starting at label");
                self.jump_to_label(&label);
            }
            None => {
                self.cursor = 0;
                self.schedule();
            }
        }
        self.drive()
    }

    /// Pauses playback. Cursor and stores are kept.
    pub fn stop(&mut self) {
        if self.state == EngineState::Ended {
            return;
        }
        self.state = EngineState::Idle;
        self.scheduled = false;
        self.update_debug();
    }

    pub fn advance(&mut self) -> Result<(), VnError> {
        if self.state != EngineState::Waiting {
            return Ok(());
        }
        self.state = EngineState::Playing;
        self.proceed();
        self.drive()
    }

    pub fn select_choice(&mut self, label: &str) -> Result<(), VnError> {
        if self.state != EngineState::Choice {
            return Ok(());
        }
        info!(category = "flow", label = %label, "choice selected");
        self.jump_to_label(label);
        self.drive()
    }

    pub fn set_environment(&mut self, key: &str, value: bool) -> Result<(), VnError> {
        if let Err(error) = self.environment.set(key, value) {
            warn!(category = "flow", key = %key, "unknown environment key rejected");
            self.last_fault = Some(EngineFault::UnknownEnvironmentKey {
                key: key.to_string(),
            });
            return Err(error);
        }
        Ok(())
    }

    pub fn get_variable(&self, key: &str) -> Option<VnValue> {
        self.locals.get(key)
    }

    pub fn set_variable(&mut self, key: &str, value: VnValue) {
        self.locals.set(key, value);
        self.update_debug();
    }

    pub fn delete_variable(&mut self, key: &str) -> Option<VnValue> {
        let removed = self.locals.remove(key);
        self.update_debug();
        removed
    }

    pub fn get_global(&self, key: &str) -> Option<VnValue> {
        self.globals.get(key).cloned()
    }

    pub fn set_global(&mut self, key: &str, value: VnValue) {
        self.globals.insert(key.to_string(), value);
        self.update_debug();
    }

    pub fn delete_global(&mut self, key: &str) -> Option<VnValue> {
        let removed = self.globals.remove(key);
        self.update_debug();
        removed
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.script.get(self.cursor)
    }

    pub fn script_len(&self) -> usize {
        self.script.len()
    }

    /// Steps executed since the script was loaded.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn globals(&self) -> &ValueMap {
        &self.globals
    }

    /// Locals as the host should persist them, reserved keys included.
    pub fn variables_snapshot(&self) -> ValueMap {
        self.locals.to_snapshot()
    }

    pub fn environment(&self) -> &BTreeMap<String, bool> {
        self.environment.flags()
    }

    pub fn autosave_label(&self) -> Option<&str> {
        self.locals.autosave()
    }

    pub fn unlocked_dialogues(&self) -> &[String] {
        self.locals.unlocked_dialogues()
    }

    pub fn last_fault(&self) -> Option<&EngineFault> {
        self.last_fault.as_ref()
    }

    /// True when an unresolved jump left the machine playing with nothing
    /// left to execute.
    pub fn is_stalled(&self) -> bool {
        self.state == EngineState::Playing
            && !self.scheduled
            && self.last_fault.as_ref().is_some_and(EngineFault::stalls)
    }

    /// Re-renders the event of the dialogue or choice the machine is parked
    /// on, for hosts that attach after the fact.
    pub fn current_boundary(&self) -> Option<EngineEvent> {
        let step = self.current_step()?;
        match (&step.kind, self.state) {
            (StepKind::Dialogue { label, content }, EngineState::Waiting) => {
                Some(self.say_event(label.as_deref(), content.as_deref()))
            }
            (StepKind::Choice { choice }, EngineState::Choice) => Some(EngineEvent::Choice {
                choices: choice.clone(),
            }),
            _ => None,
        }
    }

    pub(super) fn schedule(&mut self) {
        self.scheduled = true;
    }

    pub(super) fn proceed(&mut self) {
        self.cursor += 1;
        self.schedule();
    }

    /// Runs scheduled steps one at a time until the machine suspends, ends,
    /// stalls or trips the step guard.
    pub(super) fn drive(&mut self) -> Result<(), VnError> {
        let mut executed = 0usize;
        while self.scheduled {
            self.scheduled = false;
            if self.state != EngineState::Playing {
                break;
            }
            if let Some(limit) = self.step_guard.filter(|limit| executed >= *limit) {
                error!(
                    category = "flow",
                    limit,
                    cursor = self.cursor,
                    "step guard exceeded, pausing"
                );
                self.state = EngineState::Idle;
                self.last_fault = Some(EngineFault::GuardExceeded { limit });
                self.update_debug();
                return Err(VnError::new(
                    "ENGINE_GUARD_EXCEEDED",
                    format!(
                        "Execution guard exceeded {} steps without suspension.",
                        limit
                    ),
                ));
            }
            executed += 1;
            self.execute_step();
        }
        Ok(())
    }

    pub(super) fn finish(&mut self) {
        self.state = EngineState::Ended;
        self.scheduled = false;
        info!(category = "flow", "script finished");
        self.emit(EngineEvent::Finish);
        self.update_debug();
    }

    pub(super) fn emit(&mut self, event: EngineEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }

    pub(super) fn update_debug(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let event = EngineEvent::UpdateDebug {
            globals: self.globals.clone(),
            variables: self.locals.to_snapshot(),
            state: self.state,
        };
        self.emit(event);
    }
}
