use std::cmp::Ordering;

use super::*;

impl Engine {
    /// Environment flags shadow both variable scopes; otherwise the step
    /// kind picks globals or locals, with 0 for missing keys.
    pub(super) fn resolve_condition_value(&self, name: &str, global: bool) -> VnValue {
        if let Some(flag) = self.environment.get(name) {
            return VnValue::Bool(flag);
        }
        let found = if global {
            self.globals.get(name).cloned()
        } else {
            self.locals.get(name)
        };
        found.unwrap_or_else(VnValue::zero)
    }

    pub(super) fn evaluate_condition(&self, condition: &Condition, global: bool) -> bool {
        let resolved = self.resolve_condition_value(&condition.var, global);
        let result = compare(&resolved, condition.condition, condition.value.as_ref());
        debug!(
            category = "cond",
            var = %condition.var,
            resolved = ?resolved,
            operator = ?condition.condition,
            target = ?condition.value,
            result,
            "condition checked"
        );
        result
    }

    /// Interpolates `<key>` placeholders, globals first.
    pub(super) fn render_text(&self, template: Option<&str>) -> String {
        let Some(template) = template.filter(|text| !text.is_empty()) else {
            return String::new();
        };
        render_placeholders(template, |key| {
            self.globals
                .get(key)
                .cloned()
                .or_else(|| self.locals.get(key))
                .map(|value| value.to_text())
        })
    }
}

/// A missing target only satisfies `not_equal`.
pub(super) fn compare(resolved: &VnValue, operator: Comparison, target: Option<&VnValue>) -> bool {
    let Some(target) = target else {
        return operator == Comparison::NotEqual;
    };
    match operator {
        Comparison::Equal => resolved == target,
        Comparison::NotEqual => resolved != target,
        Comparison::GreaterThan => resolved.compare(target) == Some(Ordering::Greater),
        Comparison::LessThan => resolved.compare(target) == Some(Ordering::Less),
        Comparison::Unknown => false,
    }
}
