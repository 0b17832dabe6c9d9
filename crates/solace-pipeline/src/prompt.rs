// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conditioning text handed to the completion provider.
//!
//! Two paths produce prompts: replies to an inbound message and nudges to an
//! idle user. Each comes in two variants depending on how much shared history
//! exists.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use solace_core::SolaceError;

/// Timestamp layout stamped into reply prompts, e.g. `March 4, 2026 7:05pm`.
const PROMPT_TIME_FORMAT: &str = "%B %-d, %Y %-I:%M%P";

const REPLY_PERSONA: &str = "\
You are {persona}, a warm and well-trained AI companion for mental health. \
You draw on evidence-based psychology to give honest, practical support, \
even when it is hard to hear, and you always put the person's wellbeing first.

{variant}

How to respond:
- Use the chat history to stay consistent. It can span days, months, or years.
- Call yourself {persona}. Do not mention any underlying model or vendor.
- Sound like a trusted friend with a counselor's knowledge. Keep emoji rare.
- Ask questions when you need more context. Share local resources with phone numbers when asked.
- Answer as a text message under 500 characters unless the situation needs step-by-step help.
- Write in conversational prose, no lists, and never prefix your reply with a timestamp.

Current date and time: {now}
Name: {name}
";

const REPLY_NEW_RELATIONSHIP: &str = "\
You are still getting to know each other. Be friendly and earn trust. \
Ask questions that help you follow their moods over time and learn about \
family history, mental health history, medications, and anything else relevant.";

const REPLY_ESTABLISHED: &str = "\
The chat history is everything you have talked about. Each message carries a \
date and time: use it to notice how much time has passed, the day of the week, \
and the time of day. Connect what is happening now with earlier conversations \
to surface patterns. Sometimes listen, sometimes help; when you help, lean on \
CBT, couples counseling, or another fitting therapy.";

const NUDGE_PERSONA: &str = "\
You are {persona}, a caring counselor who supports people through regular \
check-ins by text.

{name} has not checked in for a while. Write a message that invites {name} \
to share how they are feeling and what has been going on.

{variant}

Reply with one friendly text message under 600 characters.
";

const NUDGE_NEW_RELATIONSHIP: &str = "\
You are still getting to know each other. Build trust, explain briefly how you \
can help, and ask for the information that would shape their care. If you have \
not spoken before, do not pretend you have.";

const NUDGE_ESTABLISHED: &str = "\
Use the chat history to make the message personal. Refer back to earlier \
conversations to show continuity, follow up on open threads, and remind them \
why checking in helps.";

/// Which prompt variant a generation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Little or no shared history.
    NewRelationship,
    /// Enough history to refer back to.
    Established,
}

impl PromptVariant {
    /// `NewRelationship` while `count` is below `threshold`.
    pub fn for_count(count: usize, threshold: usize) -> Self {
        if count < threshold {
            PromptVariant::NewRelationship
        } else {
            PromptVariant::Established
        }
    }
}

/// Renders reply and nudge prompts for one persona.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: String,
    timezone: Tz,
}

impl PromptBuilder {
    /// `timezone` must be an IANA name.
    pub fn new(persona: impl Into<String>, timezone: &str) -> Result<Self, SolaceError> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|e| SolaceError::Config(format!("invalid timezone `{timezone}`: {e}")))?;
        Ok(Self {
            persona: persona.into(),
            timezone,
        })
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Prompt for answering an inbound message.
    pub fn reply(&self, variant: PromptVariant, first_name: &str, now: DateTime<Utc>) -> String {
        let modifier = match variant {
            PromptVariant::NewRelationship => REPLY_NEW_RELATIONSHIP,
            PromptVariant::Established => REPLY_ESTABLISHED,
        };
        REPLY_PERSONA
            .replace("{persona}", &self.persona)
            .replace("{variant}", modifier)
            .replace("{now}", &self.format_time(now))
            .replace("{name}", first_name)
    }

    /// Prompt for a system-initiated check-in.
    pub fn nudge(&self, variant: PromptVariant, first_name: &str) -> String {
        let modifier = match variant {
            PromptVariant::NewRelationship => NUDGE_NEW_RELATIONSHIP,
            PromptVariant::Established => NUDGE_ESTABLISHED,
        };
        NUDGE_PERSONA
            .replace("{persona}", &self.persona)
            .replace("{variant}", modifier)
            .replace("{name}", first_name)
    }

    /// `now` in the configured timezone, in prompt layout.
    pub fn format_time(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.timezone)
            .format(PROMPT_TIME_FORMAT)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder() -> PromptBuilder {
        PromptBuilder::new("Solace", "America/New_York").unwrap()
    }

    #[test]
    fn variant_threshold_is_exclusive() {
        assert_eq!(PromptVariant::for_count(0, 5), PromptVariant::NewRelationship);
        assert_eq!(PromptVariant::for_count(4, 5), PromptVariant::NewRelationship);
        assert_eq!(PromptVariant::for_count(5, 5), PromptVariant::Established);
    }

    #[test]
    fn formats_time_in_configured_zone() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 0, 5, 0).unwrap();
        assert_eq!(builder().format_time(at), "March 3, 2026 7:05pm");
    }

    #[test]
    fn reply_prompt_fills_every_placeholder() {
        let at = Utc.with_ymd_and_hms(2026, 7, 1, 16, 30, 0).unwrap();
        let prompt = builder().reply(PromptVariant::NewRelationship, "Dana", at);
        assert!(prompt.contains("You are Solace"));
        assert!(prompt.contains("Name: Dana"));
        assert!(prompt.contains("July 1, 2026 12:30pm"));
        assert!(prompt.contains("still getting to know each other"));
        assert!(!prompt.contains('{'), "{prompt}");
    }

    #[test]
    fn variants_change_the_modifier() {
        let at = Utc::now();
        let new = builder().reply(PromptVariant::NewRelationship, "Dana", at);
        let established = builder().reply(PromptVariant::Established, "Dana", at);
        assert_ne!(new, established);
        assert!(established.contains("patterns"));
    }

    #[test]
    fn nudge_prompt_names_the_user() {
        let prompt = builder().nudge(PromptVariant::Established, "Lee");
        assert!(prompt.contains("Lee has not checked in"));
        assert!(prompt.contains("under 600 characters"));
        assert!(!prompt.contains('{'), "{prompt}");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = PromptBuilder::new("Solace", "Mars/Olympus").unwrap_err();
        assert!(matches!(err, SolaceError::Config(_)));
    }
}
