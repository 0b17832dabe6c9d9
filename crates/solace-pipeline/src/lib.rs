// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Solace conversation pipeline.
//!
//! Inbound messages flow through [`Ingestion`] onto a durable queue, are
//! answered by [`Generation`] (driven by [`QueueWorker`]), and their delivery
//! outcome is applied by [`Reconciler`]. [`NudgeScheduler`] runs beside this
//! flow and reaches out to idle users. All stages share one
//! [`PipelineContext`].

pub mod context;
pub mod conversation;
pub mod envelope;
pub mod generation;
pub mod ingestion;
pub mod nudge;
pub mod outbound;
pub mod prompt;
pub mod reconciler;
pub mod shutdown;
pub mod worker;

pub use context::{EmotionSink, PipelineContext};
pub use conversation::ConversationLifecycle;
pub use envelope::QueueEnvelope;
pub use generation::{Generation, GenerationOutcome};
pub use ingestion::Ingestion;
pub use nudge::{NudgeReport, NudgeScheduler};
pub use outbound::{Delivery, OutboundSender};
pub use prompt::{PromptBuilder, PromptVariant};
pub use reconciler::Reconciler;
pub use worker::QueueWorker;
