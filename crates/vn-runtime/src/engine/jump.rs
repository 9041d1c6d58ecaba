use super::lifecycle::EngineFault;
use super::*;

impl Engine {
    pub(super) fn find_label_index(&self, label: &str) -> Option<usize> {
        self.script
            .iter()
            .position(|step| step.label_name() == Some(label))
    }

    pub(super) fn find_step_index(&self, id: &StepId) -> Option<usize> {
        self.script
            .iter()
            .position(|step| step.id.as_ref() == Some(id))
    }

    /// Moves the cursor to the first `label` step named `label`. When no such
    /// step exists the machine is left untouched and nothing is scheduled.
    pub(super) fn jump_to_label(&mut self, label: &str) -> bool {
        match self.find_label_index(label) {
            Some(target) => {
                info!(
                    category = "flow",
                    label = %label,
                    from = self.cursor,
                    to = target,
                    "jump"
                );
                self.land_on(target);
                true
            }
            None => {
                error!(category = "flow", label = %label, "critical: label not found");
                self.last_fault = Some(EngineFault::UnresolvedLabel {
                    label: label.to_string(),
                });
                false
            }
        }
    }

    pub(super) fn jump_to_id(&mut self, id: &StepId) -> bool {
        match self.find_step_index(id) {
            Some(target) => {
                info!(
                    category = "flow",
                    id = %id,
                    from = self.cursor,
                    to = target,
                    "jump"
                );
                self.land_on(target);
                true
            }
            None => {
                error!(category = "flow", id = %id, "critical: step id not found");
                self.last_fault = Some(EngineFault::UnresolvedStepId { id: id.clone() });
                false
            }
        }
    }

    fn land_on(&mut self, target: usize) {
        self.cursor = target;
        self.state = EngineState::Playing;
        self.schedule();
    }
}
