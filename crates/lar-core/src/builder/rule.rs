use std::sync::Arc;

use crate::{
    command::SharedCommand,
    errors::Error,
    policy::{
        NoRateLimitPolicy, RateLimitScope, RateLimitStorage, SharedPolicy, SlidingWindowPolicy,
    },
    rule::{AutoReplyRule, NewRule},
    specification::SharedSpecification,
    Result,
};

#[derive(Clone, Default)]
enum RateLimitSetting {
    #[default]
    Unset,
    Unlimited,
    Policy(SharedPolicy),
    SlidingWindow {
        max_count: u32,
        window_seconds: u64,
        scope: RateLimitScope,
        storage: Arc<dyn RateLimitStorage>,
    },
}

/// Staged construction of an [`AutoReplyRule`].
///
/// Setters never fail; everything is checked once in [`RuleBuilder::build`].
#[derive(Clone)]
pub struct RuleBuilder {
    id: Option<String>,
    account_id: Option<String>,
    name: Option<String>,
    priority: i32,
    trigger: Option<SharedSpecification>,
    response: Option<SharedCommand>,
    rate_limit: RateLimitSetting,
    enabled: bool,
}

impl Default for RuleBuilder {
    fn default() -> Self {
        Self {
            id: None,
            account_id: None,
            name: None,
            priority: 0,
            trigger: None,
            response: None,
            rate_limit: RateLimitSetting::Unset,
            enabled: true,
        }
    }
}

impl RuleBuilder {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn for_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn when(mut self, trigger: SharedSpecification) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn then(mut self, response: SharedCommand) -> Self {
        self.response = Some(response);
        self
    }

    /// Sliding-window limit; the parameters are validated by `build`.
    pub fn limit_to(
        mut self,
        max_count: u32,
        window_seconds: u64,
        scope: RateLimitScope,
        storage: Arc<dyn RateLimitStorage>,
    ) -> Self {
        self.rate_limit = RateLimitSetting::SlidingWindow {
            max_count,
            window_seconds,
            scope,
            storage,
        };
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.rate_limit = RateLimitSetting::Unlimited;
        self
    }

    pub fn with_policy(mut self, policy: SharedPolicy) -> Self {
        self.rate_limit = RateLimitSetting::Policy(policy);
        self
    }

    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<AutoReplyRule> {
        let account_id = self
            .account_id
            .ok_or_else(|| missing("account id"))?;
        let name = self.name.ok_or_else(|| missing("rule name"))?;
        let trigger = self.trigger.ok_or_else(|| missing("trigger specification"))?;
        let response = self.response.ok_or_else(|| missing("response command"))?;

        let rate_limit: Option<SharedPolicy> = match self.rate_limit {
            RateLimitSetting::Unset => None,
            RateLimitSetting::Unlimited => Some(Arc::new(NoRateLimitPolicy)),
            RateLimitSetting::Policy(policy) => Some(policy),
            RateLimitSetting::SlidingWindow {
                max_count,
                window_seconds,
                scope,
                storage,
            } => Some(Arc::new(SlidingWindowPolicy::new(
                max_count,
                window_seconds,
                scope,
                storage,
            )?)),
        };

        AutoReplyRule::create(NewRule {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            account_id,
            name,
            priority: self.priority,
            trigger,
            response,
            rate_limit,
            enabled: self.enabled,
        })
    }
}

fn missing(what: &str) -> Error {
    Error::Validation(format!("{what} is required"))
}
