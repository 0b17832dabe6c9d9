// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted emotion analysis results.

use rusqlite::params;
use solace_core::SolaceError;
use solace_core::types::{EmotionScores, MessageId, NrcScores, UserId, VaderScores};

use crate::database::Database;

/// Store the scores computed for one message.
pub async fn save_scores(
    db: &Database,
    user_id: UserId,
    message_id: MessageId,
    scores: &EmotionScores,
) -> Result<(), SolaceError> {
    let EmotionScores { nrc, vader } = scores.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO emotion_scores (user_id, message_id, anger, anticipation, disgust,
                                             fear, trust, joy, negative, positive, sadness,
                                             surprise, vader_compound, vader_neg, vader_neu,
                                             vader_pos)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    user_id.0,
                    message_id.0,
                    nrc.anger,
                    nrc.anticipation,
                    nrc.disgust,
                    nrc.fear,
                    nrc.trust,
                    nrc.joy,
                    nrc.negative,
                    nrc.positive,
                    nrc.sadness,
                    nrc.surprise,
                    vader.compound,
                    vader.neg,
                    vader.neu,
                    vader.pos,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Scores stored for a message, most recent analysis first.
pub async fn scores_for_message(
    db: &Database,
    message_id: MessageId,
) -> Result<Vec<EmotionScores>, SolaceError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT anger, anticipation, disgust, fear, trust, joy, negative, positive,
                        sadness, surprise, vader_compound, vader_neg, vader_neu, vader_pos
                 FROM emotion_scores WHERE message_id = ?1 ORDER BY id DESC",
            )?;
            let rows = stmt.query_map(params![message_id.0], |row| {
                Ok(EmotionScores {
                    nrc: NrcScores {
                        anger: row.get(0)?,
                        anticipation: row.get(1)?,
                        disgust: row.get(2)?,
                        fear: row.get(3)?,
                        trust: row.get(4)?,
                        joy: row.get(5)?,
                        negative: row.get(6)?,
                        positive: row.get(7)?,
                        sadness: row.get(8)?,
                        surprise: row.get(9)?,
                    },
                    vader: VaderScores {
                        compound: row.get(10)?,
                        neg: row.get(11)?,
                        neu: row.get(12)?,
                        pos: row.get(13)?,
                    },
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
