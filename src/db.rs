// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::params;

use crate::error::Fallible;
use crate::types::direction::Direction;
use crate::types::timestamp::Timestamp;

pub struct Database {
    conn: Connection,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ReviewRecord {
    pub card_id: i64,
    pub correct: bool,
    pub direction: Direction,
    pub reviewed_at: Timestamp,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating review history schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Append a review to the history.
    pub fn record_review(&self, review: &ReviewRecord) -> Fallible<()> {
        let sql = "insert into review_history (card_id, correct, direction, reviewed_at) values (?, ?, ?, ?);";
        self.conn.execute(
            sql,
            params![
                review.card_id,
                review.correct,
                review.direction.as_str(),
                review.reviewed_at
            ],
        )?;
        Ok(())
    }

    /// The total number of recorded reviews.
    pub fn review_count(&self) -> Fallible<usize> {
        let sql = "select count(*) from review_history;";
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Percentage of correct reviews, rounded to one decimal place. Zero
    /// when nothing has been reviewed.
    pub fn success_rate(&self) -> Fallible<f64> {
        let sql = "select count(*), coalesce(sum(correct), 0) from review_history;";
        let (total, correct): (i64, i64) = self
            .conn
            .query_row(sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(percentage(correct as usize, total as usize))
    }

    /// All reviews of a card, oldest first.
    pub fn reviews_for_card(&self, card_id: i64) -> Fallible<Vec<ReviewRecord>> {
        let sql = "select card_id, correct, direction, reviewed_at from review_history where card_id = ? order by review_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            let direction: String = row.get(2)?;
            reviews.push(ReviewRecord {
                card_id: row.get(0)?,
                correct: row.get(1)?,
                direction: Direction::new(direction),
                reviewed_at: row.get(3)?,
            });
        }
        Ok(reviews)
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["review_history"], |row| row.get(0))?;
    Ok(count > 0)
}

/// `part / total` as a percentage with one decimal place.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = (part as f64 / total as f64) * 100.0;
    (pct * 10.0).round() / 10.0
}
