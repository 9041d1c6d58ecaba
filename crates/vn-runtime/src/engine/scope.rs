use super::*;

/// The closed set of boolean environment flags. Keys are fixed when the
/// engine is built; `set` never creates a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    flags: BTreeMap<String, bool>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::with_flags(BTreeMap::from([
            ("isNight".to_string(), false),
            ("isDay".to_string(), true),
        ]))
    }
}

impl Environment {
    pub fn with_flags(flags: BTreeMap<String, bool>) -> Self {
        Self { flags }
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.flags.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: bool) -> Result<(), VnError> {
        match self.flags.get_mut(key) {
            Some(flag) => {
                *flag = value;
                Ok(())
            }
            None => Err(VnError::new(
                "ENGINE_UNKNOWN_ENVIRONMENT_KEY",
                format!("Environment key \"{}\" is not defined.", key),
            )),
        }
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }
}

/// Per-playthrough variables. The autosave label and the unlocked dialogue
/// list are kept as fields and only appear under their reserved keys in
/// snapshots and accessor calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct LocalStore {
    values: ValueMap,
    autosave: Option<String>,
    unlocked_dialogues: Vec<String>,
}

impl LocalStore {
    pub(super) fn from_snapshot(snapshot: ValueMap) -> Self {
        let mut store = Self::default();
        for (key, value) in snapshot {
            store.set(&key, value);
        }
        store
    }

    pub(super) fn to_snapshot(&self) -> ValueMap {
        let mut snapshot = self.values.clone();
        if let Some(label) = &self.autosave {
            snapshot.insert(AUTOSAVE_KEY.to_string(), VnValue::String(label.clone()));
        }
        if !self.unlocked_dialogues.is_empty() {
            snapshot.insert(
                UNLOCKED_DIALOGUES_KEY.to_string(),
                VnValue::Array(
                    self.unlocked_dialogues
                        .iter()
                        .cloned()
                        .map(VnValue::String)
                        .collect(),
                ),
            );
        }
        snapshot
    }

    pub(super) fn get(&self, key: &str) -> Option<VnValue> {
        match key {
            AUTOSAVE_KEY => self.autosave.clone().map(VnValue::String),
            UNLOCKED_DIALOGUES_KEY if self.unlocked_dialogues.is_empty() => None,
            UNLOCKED_DIALOGUES_KEY => Some(VnValue::Array(
                self.unlocked_dialogues
                    .iter()
                    .cloned()
                    .map(VnValue::String)
                    .collect(),
            )),
            _ => self.values.get(key).cloned(),
        }
    }

    pub(super) fn set(&mut self, key: &str, value: VnValue) {
        match key {
            AUTOSAVE_KEY => match value {
                VnValue::String(label) => self.autosave = Some(label),
                other => warn!(
                    category = "var",
                    value_type = other.type_name(),
                    "autosave label must be a string, ignored"
                ),
            },
            UNLOCKED_DIALOGUES_KEY => match value {
                VnValue::Array(entries) => {
                    self.unlocked_dialogues.clear();
                    for entry in entries {
                        match entry {
                            VnValue::String(label) => {
                                self.unlock_dialogue(&label);
                            }
                            other => warn!(
                                category = "var",
                                value_type = other.type_name(),
                                "unlocked dialogue entry must be a string, ignored"
                            ),
                        }
                    }
                }
                other => warn!(
                    category = "var",
                    value_type = other.type_name(),
                    "unlocked dialogues must be an array, ignored"
                ),
            },
            _ => {
                self.values.insert(key.to_string(), value);
            }
        }
    }

    pub(super) fn remove(&mut self, key: &str) -> Option<VnValue> {
        match key {
            AUTOSAVE_KEY => self.autosave.take().map(VnValue::String),
            UNLOCKED_DIALOGUES_KEY => {
                let removed = self.get(key);
                self.unlocked_dialogues.clear();
                removed
            }
            _ => self.values.remove(key),
        }
    }

    pub(super) fn autosave(&self) -> Option<&str> {
        self.autosave.as_deref()
    }

    pub(super) fn set_autosave(&mut self, label: String) {
        self.autosave = Some(label);
    }

    pub(super) fn unlocked_dialogues(&self) -> &[String] {
        &self.unlocked_dialogues
    }

    /// Appends `label` unless it is already unlocked. Returns whether it was
    /// added.
    pub(super) fn unlock_dialogue(&mut self, label: &str) -> bool {
        if self.unlocked_dialogues.iter().any(|entry| entry == label) {
            return false;
        }
        self.unlocked_dialogues.push(label.to_string());
        true
    }
}

/// Key/value scope a mutation step can target.
pub(super) trait ValueScope {
    fn read(&self, key: &str) -> Option<VnValue>;
    fn write(&mut self, key: &str, value: VnValue);
    fn erase(&mut self, key: &str);
}

impl ValueScope for ValueMap {
    fn read(&self, key: &str) -> Option<VnValue> {
        self.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: VnValue) {
        self.insert(key.to_string(), value);
    }

    fn erase(&mut self, key: &str) {
        self.remove(key);
    }
}

impl ValueScope for LocalStore {
    fn read(&self, key: &str) -> Option<VnValue> {
        self.get(key)
    }

    fn write(&mut self, key: &str, value: VnValue) {
        self.set(key, value);
    }

    fn erase(&mut self, key: &str) {
        self.remove(key);
    }
}

/// Applies `mutation` to `scope`. A missing key is first initialised to 0.
/// Returns the previous and the new value for logging.
pub(super) fn mutate_scope(
    scope: &mut dyn ValueScope,
    mutation: &Mutation,
) -> Result<(Option<VnValue>, Option<VnValue>), String> {
    let key = mutation.var.as_str();
    let previous = scope.read(key);
    let current = previous.clone().unwrap_or_else(VnValue::zero);
    if previous.is_none() {
        scope.write(key, current.clone());
    }

    let next = match (mutation.action, mutation.value.as_ref()) {
        (MutationAction::ModifyVar, Some(value)) => value.clone(),
        (MutationAction::ModifyVar, None) => {
            scope.erase(key);
            return Ok((previous, None));
        }
        (MutationAction::IncrementVar, Some(amount)) => add_values(&current, amount)?,
        (MutationAction::SubtractVar, Some(amount)) => subtract_values(&current, amount)?,
        (MutationAction::IncrementVar | MutationAction::SubtractVar, None) => {
            return Err(format!("mutation of \"{}\" has no value", key));
        }
        (MutationAction::Other, _) => {
            return Err(format!("mutation of \"{}\" has no known action", key));
        }
    };
    scope.write(key, next.clone());
    Ok((previous, Some(next)))
}

fn add_values(current: &VnValue, amount: &VnValue) -> Result<VnValue, String> {
    match (current, amount) {
        (VnValue::Number(left), VnValue::Number(right)) => Ok(VnValue::Number(left + right)),
        (VnValue::String(_), _) | (_, VnValue::String(_)) => Ok(VnValue::String(format!(
            "{}{}",
            current.to_text(),
            amount.to_text()
        ))),
        _ => Err(format!(
            "cannot add {} to {}",
            amount.type_name(),
            current.type_name()
        )),
    }
}

fn subtract_values(current: &VnValue, amount: &VnValue) -> Result<VnValue, String> {
    match (current, amount) {
        (VnValue::Number(left), VnValue::Number(right)) => Ok(VnValue::Number(left - right)),
        _ => Err(format!(
            "cannot subtract {} from {}",
            amount.type_name(),
            current.type_name()
        )),
    }
}

impl Engine {
    pub(super) fn apply_local_mutation(&mut self, mutation: &Mutation) {
        let outcome = mutate_scope(&mut self.locals, mutation);
        self.log_mutation("local", mutation, outcome);
        self.update_debug();
    }

    pub(super) fn apply_global_mutation(&mut self, mutation: &Mutation) {
        let outcome = mutate_scope(&mut self.globals, mutation);
        self.log_mutation("global", mutation, outcome);
        self.update_debug();
    }

    fn log_mutation(
        &self,
        scope_name: &str,
        mutation: &Mutation,
        outcome: Result<(Option<VnValue>, Option<VnValue>), String>,
    ) {
        match outcome {
            Ok((previous, next)) => debug!(
                category = "var",
                scope = scope_name,
                key = %mutation.var,
                previous = ?previous,
                next = ?next,
                "variable modified"
            ),
            Err(reason) => error!(
                category = "var",
                scope = scope_name,
                key = %mutation.var,
                reason = %reason,
                "variable modification failed"
            ),
        }
    }
}
