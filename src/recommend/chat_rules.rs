//! Protocol assistant replies
//!
//! Replies come from an ordered rule table. Keyword sets overlap ("red"
//! also occurs in "reduced"), so rules are evaluated top-down and the first
//! match wins. Matching is a case-insensitive substring test.

use serde::{Deserialize, Serialize};

use crate::metrics::DailyRecord;

/// First message of every chat transcript.
pub const ASSISTANT_GREETING: &str = "Hello! I'm your protocol assistant. I can help you optimize your HSC expansion protocol based on your current data. What would you like to know?";

/// Reply when no rule matches.
pub const FALLBACK_REPLY: &str = "I'm not sure I understand your question. Could you ask about specific aspects of your HSC protocol? I can provide recommendations on cytokines, media composition, self-renewal enhancement, or lineage balancing based on your current data.";

/// Topic recognised in a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatTopic {
    /// Hello / hi / hey
    Greeting,
    /// Self-renewal questions
    SelfRenewal,
    /// Multipotency questions
    Multipotency,
    /// Myeloid lineage questions
    Myeloid,
    /// Lymphoid lineage questions
    Lymphoid,
    /// Erythroid lineage questions
    Erythroid,
    /// Cytokines and media composition
    Media,
    /// Generic protocol advice
    Protocol,
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct ChatRule {
    /// Topic this rule answers
    pub topic: ChatTopic,
    /// Any of these substrings triggers the rule
    pub keywords: &'static [&'static str],
    reply: fn(&DailyRecord) -> String,
}

impl ChatRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Rules in evaluation order.
pub const CHAT_RULES: [ChatRule; 8] = [
    ChatRule {
        topic: ChatTopic::Greeting,
        keywords: &["hello", "hi", "hey", "greetings"],
        reply: greeting_reply,
    },
    ChatRule {
        topic: ChatTopic::SelfRenewal,
        keywords: &["self-renewal", "self renewal", "renewal"],
        reply: self_renewal_reply,
    },
    ChatRule {
        topic: ChatTopic::Multipotency,
        keywords: &["multipotency", "multipotent", "potency"],
        reply: multipotency_reply,
    },
    ChatRule {
        topic: ChatTopic::Myeloid,
        keywords: &["myeloid", "granulocyte", "macrophage"],
        reply: myeloid_reply,
    },
    ChatRule {
        topic: ChatTopic::Lymphoid,
        keywords: &["lymphoid", "lymphocyte", "b cell", "t cell"],
        reply: lymphoid_reply,
    },
    ChatRule {
        topic: ChatTopic::Erythroid,
        keywords: &["erythroid", "red", "erythrocyte", "rbc"],
        reply: erythroid_reply,
    },
    ChatRule {
        topic: ChatTopic::Media,
        keywords: &["cytokine", "growth factor", "medium", "media"],
        reply: media_reply,
    },
    ChatRule {
        topic: ChatTopic::Protocol,
        keywords: &["protocol", "recommend", "suggestion", "advice"],
        reply: protocol_reply,
    },
];

/// Topic of the first rule matching `user_text`, if any.
#[must_use]
pub fn classify(user_text: &str) -> Option<ChatTopic> {
    let lowered = user_text.to_lowercase();
    CHAT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.topic)
}

/// Reply to a user message using the latest record of the experiment.
///
/// ```rust
/// use chrono::NaiveDate;
/// use osiris_core::metrics::DailyRecord;
/// use osiris_core::recommend::{respond, FALLBACK_REPLY};
///
/// let record = DailyRecord::builder(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
///     .scores(30.0, 60.0)
///     .build();
///
/// assert!(respond("my self-renewal seems low", &record).contains("below optimal levels"));
/// assert_eq!(respond("gibberish xyz", &record), FALLBACK_REPLY);
/// ```
#[must_use]
pub fn respond(user_text: &str, latest_record: &DailyRecord) -> String {
    let lowered = user_text.to_lowercase();
    CHAT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or_else(|| FALLBACK_REPLY.to_string(), |rule| (rule.reply)(latest_record))
}

fn greeting_reply(_: &DailyRecord) -> String {
    "Hello! How can I help with your HSC expansion protocol today?".to_string()
}

fn self_renewal_reply(record: &DailyRecord) -> String {
    let score = record.self_renewal_score();
    if score > 75.0 {
        format!("Your current self-renewal score is {score:.1}, which is excellent! I recommend maintaining your current cytokine concentrations, particularly SCF and TPO levels.")
    } else if score > 50.0 {
        format!("Your current self-renewal score is {score:.1}, which is good but could be improved. Consider increasing SCF by 10% and ensuring TPO is at 50ng/mL to enhance self-renewal capacity.")
    } else {
        format!("Your current self-renewal score is {score:.1}, which is below optimal levels. I recommend increasing both SCF and TPO by 20%, and reducing differentiation-inducing cytokines like GM-CSF if present in your media.")
    }
}

fn multipotency_reply(record: &DailyRecord) -> String {
    let score = record.multipotency_score();
    if score > 75.0 {
        format!("Your current multipotency score is {score:.1}, which indicates excellent maintenance of HSC potential! Your current cytokine balance is working well.")
    } else if score > 50.0 {
        format!("Your current multipotency score is {score:.1}, which is reasonable but could be improved. Consider adding IL-6 at low concentration (10ng/mL) to your media to enhance multipotency.")
    } else {
        format!("Your current multipotency score is {score:.1}, which suggests your HSCs may be losing multipotency. I recommend a complete media change with fresh cytokines, particularly ensuring a balance of SCF, TPO, and FLT3L to support multipotency.")
    }
}

fn myeloid_reply(record: &DailyRecord) -> String {
    let pct = record.myeloid_pct();
    if pct > 70.0 {
        format!("Your culture shows a strong myeloid bias ({pct:.1}%). To reduce this bias, consider decreasing G-CSF and GM-CSF if present, and slightly increasing FLT3L to promote lymphoid potential.")
    } else if pct < 30.0 {
        format!("Your culture shows low myeloid output ({pct:.1}%). To increase myeloid differentiation, consider adding GM-CSF at 10ng/mL or increasing IL-3 concentration.")
    } else {
        format!("Your myeloid percentage ({pct:.1}%) is within a balanced range. Current cytokine conditions appear appropriate for balanced lineage output.")
    }
}

fn lymphoid_reply(record: &DailyRecord) -> String {
    let pct = record.lymphoid_pct();
    if pct > 70.0 {
        format!("Your culture shows a strong lymphoid bias ({pct:.1}%). To balance lineage output, consider adding IL-3 at low concentration to promote myeloid differentiation.")
    } else if pct < 30.0 {
        format!("Your culture shows low lymphoid output ({pct:.1}%). To increase lymphoid differentiation, consider adding FLT3L and IL-7 to your media.")
    } else {
        format!("Your lymphoid percentage ({pct:.1}%) is within a balanced range. Current conditions appear appropriate for balanced lineage output.")
    }
}

fn erythroid_reply(record: &DailyRecord) -> String {
    let pct = record.erythroid_pct();
    if pct > 50.0 {
        format!("Your culture shows a strong erythroid bias ({pct:.1}%). To reduce erythroid differentiation, consider decreasing EPO concentration by 50% in your next media change.")
    } else if pct < 10.0 {
        format!("Your culture shows very low erythroid output ({pct:.1}%). If erythroid potential is desired, consider adding EPO at 3U/mL to your media.")
    } else {
        format!("Your erythroid percentage ({pct:.1}%) is within an acceptable range. Current conditions appear appropriate.")
    }
}

fn media_reply(_: &DailyRecord) -> String {
    "For optimal HSC expansion, I recommend a base medium of StemSpan SFEM II with the following cytokines: SCF (100ng/mL), TPO (50ng/mL), FLT3L (100ng/mL), and IL-6 (20ng/mL). Adjust based on your specific goals: increase SCF and TPO for self-renewal, or add lineage-specific cytokines for directed differentiation.".to_string()
}

fn protocol_reply(record: &DailyRecord) -> String {
    let myeloid = record.myeloid_pct();
    let lymphoid = record.lymphoid_pct();
    let erythroid = record.erythroid_pct();

    if record.self_renewal_score() < 50.0 {
        "Based on your current data, I recommend focusing on improving self-renewal capacity. Increase SCF to 150ng/mL and TPO to 100ng/mL. Ensure your cells are at optimal density (5-10 × 10^4 cells/mL) and perform a 50% media change every 2 days rather than complete media changes.".to_string()
    } else if record.multipotency_score() < 50.0 {
        "Your data indicates declining multipotency. I recommend a complete media change with fresh cytokines: SCF (100ng/mL), TPO (50ng/mL), FLT3L (100ng/mL), and IL-6 (10ng/mL). Also, reduce culture density if currently above 2 × 10^5 cells/mL to minimize paracrine differentiation signals.".to_string()
    } else if myeloid.max(lymphoid).max(erythroid) > 70.0 {
        let (dominant, adjustment) = if myeloid > 70.0 {
            ("myeloid", "reduce G-CSF and GM-CSF")
        } else if lymphoid > 70.0 {
            ("lymphoid", "reduce IL-7 and FLT3L")
        } else {
            ("erythroid", "reduce EPO by 50%")
        };
        format!("Your culture shows a strong {dominant} bias. To rebalance, I recommend adjusting cytokines: {adjustment}. A partial media change with rebalanced cytokines should help restore multipotency.")
    } else {
        "Your current protocol appears to be working well with balanced lineage output. Continue with your current cytokine regimen and schedule. For optimal results, ensure you're performing media changes every 2-3 days and maintaining cell density between 5-20 × 10^4 cells/mL.".to_string()
    }
}
