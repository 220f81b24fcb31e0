use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    command::{MessageContext, ReplyDispatcher, SharedCommand},
    errors::Error,
    message::IncomingMessage,
    policy::SharedPolicy,
    specification::SharedSpecification,
    Result,
};

pub const MAX_NAME_LENGTH: usize = 100;

/// Inputs for creating a new rule. All invariants are checked by
/// [`AutoReplyRule::create`].
#[derive(Clone, Debug)]
pub struct NewRule {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub priority: i32,
    pub trigger: SharedSpecification,
    pub response: SharedCommand,
    pub rate_limit: Option<SharedPolicy>,
    pub enabled: bool,
}

/// Persisted state of a rule, trusted as-is by [`AutoReplyRule::reconstruct`].
#[derive(Clone, Debug)]
pub struct RuleState {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub priority: i32,
    pub trigger: SharedSpecification,
    pub response: SharedCommand,
    pub rate_limit: Option<SharedPolicy>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One auto-reply rule: when `trigger` holds, run `response`, subject to
/// `rate_limit`.
///
/// Immutable; every update returns a new rule with a fresh `updated_at`.
#[derive(Clone, Debug)]
pub struct AutoReplyRule {
    id: String,
    account_id: String,
    name: String,
    priority: i32,
    trigger: SharedSpecification,
    response: SharedCommand,
    rate_limit: Option<SharedPolicy>,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AutoReplyRule {
    pub fn create(new: NewRule) -> Result<Self> {
        if new.id.is_empty() {
            return Err(Error::Validation("rule id is required".to_string()));
        }
        if new.account_id.is_empty() {
            return Err(Error::Validation("account id is required".to_string()));
        }
        let name = validate_name(&new.name)?;
        validate_priority(new.priority)?;

        let now = Utc::now();
        Ok(Self {
            id: new.id,
            account_id: new.account_id,
            name,
            priority: new.priority,
            trigger: new.trigger,
            response: new.response,
            rate_limit: new.rate_limit,
            enabled: new.enabled,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn reconstruct(state: RuleState) -> Self {
        Self {
            id: state.id,
            account_id: state.account_id,
            name: state.name,
            priority: state.priority,
            trigger: state.trigger,
            response: state.response,
            rate_limit: state.rate_limit,
            enabled: state.enabled,
            created_at: state.created_at,
            updated_at: state.updated_at,
        }
    }

    /// Run the rule against one message.
    ///
    /// Returns `Ok(false)` when the rule is disabled, the trigger does not
    /// hold, or the rate limit is exhausted. Errors only come from the
    /// injected collaborators (storage, reply channel).
    pub async fn handle_message(
        &self,
        message: &IncomingMessage,
        dispatcher: &ReplyDispatcher,
    ) -> Result<bool> {
        if !self.enabled {
            debug!(rule_id = %self.id, "rule disabled");
            return Ok(false);
        }

        if !self.trigger.is_satisfied_by(message) {
            debug!(rule_id = %self.id, message_id = message.id(), "trigger not satisfied");
            return Ok(false);
        }

        if let Some(policy) = &self.rate_limit {
            let allowed = policy
                .can_execute(&self.id, message.user_id(), message.group_id())
                .await?;
            if !allowed {
                info!(rule_id = %self.id, user_id = message.user_id(), "rule rate limited");
                return Ok(false);
            }
        }

        let ctx = MessageContext::from_message(message);
        self.response.execute(&ctx, dispatcher).await?;

        if let Some(policy) = &self.rate_limit {
            policy
                .record_execution(&self.id, message.user_id(), message.group_id())
                .await?;
        }

        info!(
            rule_id = %self.id,
            rule = %self.name,
            user_id = message.user_id(),
            "rule fired"
        );
        Ok(true)
    }

    pub fn update_name(&self, name: &str) -> Result<Self> {
        let name = validate_name(name)?;
        Ok(Self {
            name,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    pub fn update_priority(&self, priority: i32) -> Result<Self> {
        validate_priority(priority)?;
        Ok(Self {
            priority,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// Already enabled rules come back unchanged.
    pub fn enable(&self) -> Self {
        self.with_enabled(true)
    }

    /// Already disabled rules come back unchanged.
    pub fn disable(&self) -> Self {
        self.with_enabled(false)
    }

    fn with_enabled(&self, enabled: bool) -> Self {
        if self.enabled == enabled {
            return self.clone();
        }
        Self {
            enabled,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn trigger(&self) -> &SharedSpecification {
        &self.trigger
    }

    pub fn response(&self) -> &SharedCommand {
        &self.response
    }

    pub fn rate_limit(&self) -> Option<&SharedPolicy> {
        self.rate_limit.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("rule name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "rule name cannot exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_priority(priority: i32) -> Result<()> {
    if priority < 0 {
        return Err(Error::Validation(
            "priority must be non-negative".to_string(),
        ));
    }
    Ok(())
}
