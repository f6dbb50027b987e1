//! Planning hints shown under the task table.
use crate::Task;

/// Recommendation for a single task, derived from where it sits on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanHint {
    CriticalNow,
    UrgentDelegate,
    VitalPlanAhead,
    ThisWeek,
    UrgentSimplify,
    LongTerm,
    Drop,
    Postpone,
    DelegateOrSimplify,
    Flexible,
}

impl PlanHint {
    pub fn text(self) -> &'static str {
        match self {
            PlanHint::CriticalNow => {
                "Extremely urgent and extremely important: focus on it now, ideally in today's sharpest hours."
            }
            PlanHint::UrgentDelegate => {
                "Extremely urgent but only moderately important: deal with it quickly or hand it off."
            }
            PlanHint::VitalPlanAhead => {
                "Extremely important but not pressing: plan ahead and push it forward in stages."
            }
            PlanHint::ThisWeek => "Fairly urgent and important: aim to finish it this week.",
            PlanHint::UrgentSimplify => {
                "Fairly urgent but only moderately important: keep the process lean."
            }
            PlanHint::LongTerm => {
                "Fairly important but not urgent: put it on the long-term plan and review it regularly."
            }
            PlanHint::Drop => "Neither urgent nor important: consider dropping or delegating it.",
            PlanHint::Postpone => "Not urgent: it can wait.",
            PlanHint::DelegateOrSimplify => "Not important: delegate or simplify it.",
            PlanHint::Flexible => "Ordinary task: schedule it whenever it fits.",
        }
    }
}

impl std::fmt::Display for PlanHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Classify a task. The first matching rule wins.
pub fn plan_hint(task: &Task) -> PlanHint {
    let (u, i) = (task.urgency, task.importance);
    if u >= 9.0 && i >= 9.0 {
        PlanHint::CriticalNow
    } else if u >= 9.0 {
        PlanHint::UrgentDelegate
    } else if i >= 9.0 {
        PlanHint::VitalPlanAhead
    } else if u >= 7.0 && i >= 7.0 {
        PlanHint::ThisWeek
    } else if u >= 7.0 {
        PlanHint::UrgentSimplify
    } else if i >= 7.0 {
        PlanHint::LongTerm
    } else if u <= 2.0 && i <= 2.0 {
        PlanHint::Drop
    } else if u <= 2.0 {
        PlanHint::Postpone
    } else if i <= 2.0 {
        PlanHint::DelegateOrSimplify
    } else {
        PlanHint::Flexible
    }
}

/// One-line summary: level labels and icon kind.
pub fn summary(task: &Task) -> String {
    format!(
        "({} · {} · {})",
        task.urgency_label(),
        task.importance_label(),
        task.icon.kind_description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IconRef;

    fn hint(u: f64, i: f64) -> PlanHint {
        plan_hint(&Task::new("t", u, i, IconRef::default()))
    }

    #[test]
    fn thresholds_are_checked_in_order() {
        assert_eq!(hint(9.0, 9.0), PlanHint::CriticalNow);
        assert_eq!(hint(10.0, 1.0), PlanHint::UrgentDelegate);
        assert_eq!(hint(1.0, 9.5), PlanHint::VitalPlanAhead);
        assert_eq!(hint(7.0, 8.0), PlanHint::ThisWeek);
        assert_eq!(hint(8.0, 1.0), PlanHint::UrgentSimplify);
        assert_eq!(hint(1.0, 7.0), PlanHint::LongTerm);
        assert_eq!(hint(2.0, 2.0), PlanHint::Drop);
        assert_eq!(hint(1.0, 5.0), PlanHint::Postpone);
        assert_eq!(hint(5.0, 0.5), PlanHint::DelegateOrSimplify);
        assert_eq!(hint(5.0, 5.0), PlanHint::Flexible);
    }

    #[test]
    fn just_below_a_threshold_falls_through() {
        assert_eq!(hint(8.99, 8.99), PlanHint::ThisWeek);
        assert_eq!(hint(6.99, 2.01), PlanHint::Flexible);
    }

    #[test]
    fn summary_mentions_icon_kind() {
        let task = Task::new("t", 5.0, 5.0, IconRef::default());
        let text = summary(&task);
        assert!(text.contains(task.icon.kind_description()));
        assert!(text.contains(task.urgency_label().as_str()));
    }
}
