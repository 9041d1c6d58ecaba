use super::lifecycle::EngineFault;
use super::*;

fn describe_id(id: Option<&StepId>) -> String {
    id.map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string())
}

impl Engine {
    /// Executes the step under the cursor. Every arm either schedules the
    /// next unit of work, suspends, or ends the run.
    pub(super) fn execute_step(&mut self) {
        let Some(step) = self.script.get(self.cursor).cloned() else {
            self.finish();
            return;
        };
        self.step_count += 1;
        debug!(
            category = "step",
            id = %describe_id(step.id.as_ref()),
            step_type = step.type_name(),
            cursor = self.cursor,
            "executing step"
        );

        match step.kind {
            StepKind::Label { .. } | StepKind::Start | StepKind::Command => self.proceed(),
            StepKind::Meta(meta) => {
                self.apply_meta(&meta);
                self.proceed();
            }
            StepKind::Transition { label } => {
                self.jump_to_label(&label);
            }
            StepKind::Next { label } => {
                self.locals.set_autosave(label.clone());
                info!(category = "flow", label = %label, "autosave point reached");
                self.emit(EngineEvent::AutoSave { label });
                self.proceed();
            }
            StepKind::Dialogue { label, content } => {
                self.state = EngineState::Waiting;
                let event = self.say_event(label.as_deref(), content.as_deref());
                self.emit(event);
                self.update_debug();
            }
            StepKind::Choice { choice } => {
                self.state = EngineState::Choice;
                self.emit(EngineEvent::Choice { choices: choice });
                self.update_debug();
            }
            StepKind::ShowSprite(placement) => {
                let final_location = self.resolve_sprite_location(&placement);
                self.emit(EngineEvent::ShowSprite {
                    final_location,
                    placement,
                });
                self.proceed();
            }
            StepKind::RemoveSprite { sprite } => {
                self.emit(EngineEvent::RemoveSprite { sprite });
                self.proceed();
            }
            StepKind::ModifyBackground { background } => {
                self.emit(EngineEvent::Background { path: background });
                self.proceed();
            }
            StepKind::ModifyVariable(mutation) => {
                self.apply_local_mutation(&mutation);
                self.proceed();
            }
            StepKind::ModifyGlobal(mutation) => {
                self.apply_global_mutation(&mutation);
                self.proceed();
            }
            StepKind::UnlockDialogues { events } => {
                for label in events {
                    if self.locals.unlock_dialogue(&label) {
                        debug!(category = "var", label = %label, "dialogue unlocked");
                    }
                }
                self.update_debug();
                self.proceed();
            }
            StepKind::IdleChat => self.execute_idle_chat(),
            StepKind::Conditional(condition) => {
                self.execute_conditional(&step.id, &condition, false)
            }
            StepKind::ConditionalGlobal(condition) => {
                self.execute_conditional(&step.id, &condition, true)
            }
            StepKind::FinishDialogue => self.finish(),
            StepKind::Unknown { type_name, reason } => {
                error!(
                    category = "step",
                    id = %describe_id(step.id.as_ref()),
                    step_type = %type_name,
                    reason = %reason,
                    "unknown instruction skipped"
                );
                self.last_fault = Some(EngineFault::UnknownStepType {
                    step_id: step.id.clone(),
                    type_name,
                });
                self.proceed();
            }
        }
    }

    pub(super) fn say_event(&self, label: Option<&str>, content: Option<&str>) -> EngineEvent {
        EngineEvent::Say {
            character: self.render_text(label),
            text: self.render_text(content),
        }
    }

    fn apply_meta(&mut self, meta: &MetaStep) {
        let init = meta.init.clone().unwrap_or_else(VnValue::zero);
        match meta.action {
            MetaAction::CreateVar => {
                debug!(category = "var", key = %meta.var, "local created");
                self.locals.set(&meta.var, init);
            }
            MetaAction::CreateGlobal => {
                if !self.globals.contains_key(&meta.var) {
                    debug!(category = "var", key = %meta.var, "global created");
                    self.globals.insert(meta.var.clone(), init);
                }
            }
            MetaAction::Other => {
                warn!(category = "var", key = %meta.var, "meta step without known action");
            }
        }
        self.update_debug();
    }

    fn resolve_sprite_location(&self, placement: &SpritePlacement) -> String {
        if let Some(dynamic) = placement
            .dyn_location
            .as_deref()
            .filter(|location| !location.is_empty())
        {
            let rendered = self.render_text(Some(dynamic));
            if !has_placeholder(&rendered) {
                return rendered;
            }
            debug!(
                category = "var",
                dyn_location = %dynamic,
                "dynamic sprite location unresolved, using static location"
            );
        }
        self.render_text(placement.location.as_deref())
    }

    fn execute_idle_chat(&mut self) {
        let unlocked = self.locals.unlocked_dialogues();
        if unlocked.is_empty() {
            debug!(category = "flow", "idle chat has nothing unlocked");
            self.proceed();
            return;
        }
        let index = self.rng.pick_index(unlocked.len());
        let label = unlocked[index].clone();
        info!(category = "flow", label = %label, "idle chat picked dialogue");
        self.jump_to_label(&label);
    }

    fn execute_conditional(
        &mut self,
        step_id: &Option<StepId>,
        condition: &Condition,
        global: bool,
    ) {
        if self.evaluate_condition(condition, global) {
            debug!(category = "cond", "condition passed");
            self.proceed();
            return;
        }

        match &condition.end {
            Some(end) => {
                debug!(category = "cond", end = %end, "condition failed, skipping");
                self.jump_to_id(end);
            }
            None => {
                error!(
                    category = "cond",
                    id = %describe_id(step_id.as_ref()),
                    "condition failed but no end id provided"
                );
                self.last_fault = Some(EngineFault::ConditionFailureWithoutFallback {
                    step_id: step_id.clone(),
                });
                self.proceed();
            }
        }
    }
}
