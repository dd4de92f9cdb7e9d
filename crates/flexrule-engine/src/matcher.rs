// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use flexrule_app::{Condition, Context, LogicalOperator, Rule};

use crate::evaluate;

/// How inactive causes take part in a rule's condition chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InactiveCauseMode {
    /// An inactive cause stays in the chain as a `false` term.
    #[default]
    ForceFalse,
    /// Inactive causes are dropped before the chain is folded.
    Exclude,
}

impl InactiveCauseMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ForceFalse => "force_false",
            Self::Exclude => "exclude",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "force_false" => Some(Self::ForceFalse),
            "exclude" => Some(Self::Exclude),
            _ => None,
        }
    }
}

pub fn matches(rule: &Rule, context: &Context) -> bool {
    conditions_match(&rule.causes, context, InactiveCauseMode::ForceFalse)
}

/// Left fold over the chain: each cause joins the running result with its
/// own combinator, with no AND-over-OR precedence. An empty chain matches.
pub fn conditions_match(
    conditions: &[Condition],
    context: &Context,
    mode: InactiveCauseMode,
) -> bool {
    let mut chain = conditions
        .iter()
        .filter(|condition| mode == InactiveCauseMode::ForceFalse || condition.active);

    let Some(first) = chain.next() else {
        return true;
    };

    chain.fold(evaluate(first, context), |result, condition| {
        let value = evaluate(condition, context);
        match condition.combinator {
            LogicalOperator::Or => result || value,
            LogicalOperator::And => result && value,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{InactiveCauseMode, conditions_match, matches};
    use anyhow::Result;
    use flexrule_app::{Condition, Context, Operator, Rule};
    use serde_json::json;

    fn context() -> Result<Context> {
        Context::from_value(json!({ "home": { "type": "house", "ownershipType": "renter" } }))
    }

    fn yes() -> Condition {
        Condition::new("home.type", Operator::Eq, json!("house"))
    }

    fn no() -> Condition {
        Condition::new("home.type", Operator::Eq, json!("flat"))
    }

    #[test]
    fn rule_without_causes_always_matches() -> Result<()> {
        assert!(matches(&Rule::new("always"), &context()?));
        assert!(matches(&Rule::new("always"), &Context::new()));
        Ok(())
    }

    #[test]
    fn or_after_and_default_is_a_disjunction() -> Result<()> {
        let rule = Rule::new("either").with_cause(no()).with_cause(yes().or());
        assert!(matches(&rule, &context()?));
        Ok(())
    }

    #[test]
    fn chain_folds_left_without_precedence() -> Result<()> {
        let context = context()?;
        // (false && true) || true
        let rule = Rule::new("fold")
            .with_cause(no())
            .with_cause(yes())
            .with_cause(yes().or());
        assert!(matches(&rule, &context));

        // (true || false) && false, where precedence would give true
        let rule = Rule::new("fold")
            .with_cause(yes())
            .with_cause(no().or())
            .with_cause(no());
        assert!(!matches(&rule, &context));
        Ok(())
    }

    #[test]
    fn inactive_cause_forces_false_by_default() -> Result<()> {
        let context = context()?;
        let causes = [yes().inactive(), yes().or()];
        assert!(conditions_match(&causes, &context, InactiveCauseMode::ForceFalse));

        let causes = [yes(), yes().inactive()];
        assert!(!conditions_match(&causes, &context, InactiveCauseMode::ForceFalse));
        Ok(())
    }

    #[test]
    fn exclude_mode_drops_inactive_causes() -> Result<()> {
        let context = context()?;
        let causes = [yes(), no().inactive()];
        assert!(conditions_match(&causes, &context, InactiveCauseMode::Exclude));

        let causes = [no().inactive()];
        assert!(conditions_match(&causes, &context, InactiveCauseMode::Exclude));
        assert!(!conditions_match(&causes, &context, InactiveCauseMode::ForceFalse));
        Ok(())
    }

    #[test]
    fn inactive_modes_round_trip() {
        for mode in [InactiveCauseMode::ForceFalse, InactiveCauseMode::Exclude] {
            assert_eq!(InactiveCauseMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(InactiveCauseMode::parse("skip"), None);
    }
}
