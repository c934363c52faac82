//! Tracked goal operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, parse_or_default, Database};
use crate::error::{Error, Result};
use crate::models::{NewTrackedGoal, TrackedGoal};

const GOAL_COLUMNS: &str = "id, user_id, name, kind, target_amount, target_year, amount_saved, \
     monthly_target, timeframe, why, created_at";

fn goal_from_row(row: &Row<'_>) -> rusqlite::Result<TrackedGoal> {
    let kind: String = row.get(3)?;
    let timeframe: String = row.get(8)?;
    let created_at: String = row.get(10)?;

    Ok(TrackedGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        kind: parse_or_default(&kind),
        target_amount: row.get(4)?,
        target_year: row.get(5)?,
        amount_saved: row.get(6)?,
        monthly_target: row.get(7)?,
        timeframe: parse_or_default(&timeframe),
        why: row.get(9)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Create a goal, or update the user's goal with the same name
    ///
    /// Updating keeps the amount already saved.
    pub fn upsert_goal(&self, user_id: &str, goal: &NewTrackedGoal) -> Result<i64> {
        goal.validate()?;
        let conn = self.conn()?;

        let id = conn.query_row(
            r#"
            INSERT INTO goals (user_id, name, kind, target_amount, target_year, monthly_target, timeframe, why)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(user_id, name) DO UPDATE SET
                kind = excluded.kind,
                target_amount = excluded.target_amount,
                target_year = excluded.target_year,
                monthly_target = excluded.monthly_target,
                timeframe = excluded.timeframe,
                why = excluded.why
            RETURNING id
            "#,
            params![
                user_id,
                goal.name.trim(),
                goal.kind.as_str(),
                goal.target_amount,
                goal.target_year,
                goal.monthly_target,
                goal.timeframe.as_str(),
                goal.why
            ],
            |row| row.get(0),
        )?;

        Ok(id)
    }

    /// List a user's goals in creation order
    pub fn list_goals(&self, user_id: &str) -> Result<Vec<TrackedGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE user_id = ? ORDER BY id",
            GOAL_COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![user_id], goal_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Get one of a user's goals
    pub fn get_goal(&self, user_id: &str, id: i64) -> Result<Option<TrackedGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!(
                    "SELECT {} FROM goals WHERE user_id = ? AND id = ?",
                    GOAL_COLUMNS
                ),
                params![user_id, id],
                goal_from_row,
            )
            .optional()?;

        Ok(goal)
    }

    /// Add money to a goal and return the updated goal
    pub fn add_goal_contribution(
        &self,
        user_id: &str,
        id: i64,
        amount: f64,
    ) -> Result<TrackedGoal> {
        TrackedGoal::validate_contribution(amount)?;

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE goals SET amount_saved = amount_saved + ?1 WHERE user_id = ?2 AND id = ?3",
            params![amount, user_id, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("Goal {} not found", id)));
        }

        self.get_goal(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {} not found", id)))
    }

    /// Delete a goal. Returns whether it existed.
    pub fn delete_goal(&self, user_id: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM goals WHERE user_id = ? AND id = ?",
            params![user_id, id],
        )?;
        Ok(deleted > 0)
    }
}
