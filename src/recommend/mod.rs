//! Recommendation engine: protocol assistant chat and protocol suggestions
//!
//! Both halves are stateless. [`respond`] answers free text from an ordered
//! keyword rule table; [`recommend_protocol`] emits threshold-gated
//! adjustments and applies optional constraints.

mod chat_rules;
mod protocol;

pub use chat_rules::{
    classify, respond, ChatRule, ChatTopic, ASSISTANT_GREETING, CHAT_RULES, FALLBACK_REPLY,
};
pub use protocol::{
    recommend_protocol, LineageBias, ProtocolConstraints, ProtocolRecommendation,
    RecommendationKind,
};
