//! Profile operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{parse_or_default, Database};
use crate::error::Result;
use crate::models::{FinancialSnapshot, Profile};
use crate::store::SnapshotStore;

const PROFILE_COLUMNS: &str = "country, monthly_income, monthly_expenses, current_savings, \
     current_debt, has_high_interest_debt, age, employment_status, household_size, dependents, \
     primary_focus, risk_comfort, money_feeling, goals";

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let country: String = row.get(0)?;
    let employment_status: String = row.get(7)?;
    let primary_focus: String = row.get(10)?;
    let money_feeling: String = row.get(12)?;
    let goals_json: String = row.get(13)?;

    Ok(Profile {
        snapshot: FinancialSnapshot {
            country: parse_or_default(&country),
            monthly_income: row.get(1)?,
            monthly_expenses: row.get(2)?,
            current_savings: row.get(3)?,
            current_debt: row.get(4)?,
            has_high_interest_debt: row.get(5)?,
        },
        age: row.get(6)?,
        employment_status: parse_or_default(&employment_status),
        household_size: row.get(8)?,
        dependents: row.get(9)?,
        primary_focus: parse_or_default(&primary_focus),
        risk_comfort: row.get(11)?,
        money_feeling: parse_or_default(&money_feeling),
        goals: serde_json::from_str(&goals_json).unwrap_or_default(),
    })
}

impl Database {
    /// Get a user's stored profile
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE user_id = ?", PROFILE_COLUMNS),
                params![user_id],
                profile_from_row,
            )
            .optional()?;

        Ok(profile)
    }

    /// Get a user's profile, or the default profile if none is stored
    pub fn get_profile_or_default(&self, user_id: &str) -> Result<Profile> {
        Ok(self.get_profile(user_id)?.unwrap_or_default())
    }

    /// Create or replace a user's profile
    pub fn save_profile(&self, user_id: &str, profile: &Profile) -> Result<()> {
        profile.validate()?;
        let conn = self.conn()?;
        let goals_json = serde_json::to_string(&profile.goals)?;
        let s = &profile.snapshot;

        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, country, monthly_income, monthly_expenses, current_savings,
                current_debt, has_high_interest_debt, age, employment_status, household_size,
                dependents, primary_focus, risk_comfort, money_feeling, goals
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            ON CONFLICT(user_id) DO UPDATE SET
                country = excluded.country,
                monthly_income = excluded.monthly_income,
                monthly_expenses = excluded.monthly_expenses,
                current_savings = excluded.current_savings,
                current_debt = excluded.current_debt,
                has_high_interest_debt = excluded.has_high_interest_debt,
                age = excluded.age,
                employment_status = excluded.employment_status,
                household_size = excluded.household_size,
                dependents = excluded.dependents,
                primary_focus = excluded.primary_focus,
                risk_comfort = excluded.risk_comfort,
                money_feeling = excluded.money_feeling,
                goals = excluded.goals,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                user_id,
                s.country.as_str(),
                s.monthly_income,
                s.monthly_expenses,
                s.current_savings,
                s.current_debt,
                s.has_high_interest_debt,
                profile.age,
                profile.employment_status.as_str(),
                profile.household_size,
                profile.dependents,
                profile.primary_focus.as_str(),
                profile.risk_comfort,
                profile.money_feeling.as_str(),
                goals_json,
            ],
        )?;

        debug!(user = %user_id, "Profile saved");
        Ok(())
    }

    /// Delete a user's profile. Returns whether one existed.
    pub fn delete_profile(&self, user_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM profiles WHERE user_id = ?", params![user_id])?;
        Ok(deleted > 0)
    }
}

impl SnapshotStore for Database {
    fn load_snapshot(&self, user_id: &str) -> Result<Option<FinancialSnapshot>> {
        Ok(self.get_profile(user_id)?.map(|p| p.snapshot))
    }

    /// Only the money fields change; other profile answers are kept
    fn save_snapshot(&self, user_id: &str, snapshot: &FinancialSnapshot) -> Result<()> {
        let mut profile = self.get_profile_or_default(user_id)?;
        profile.snapshot = *snapshot;
        self.save_profile(user_id, &profile)
    }
}
