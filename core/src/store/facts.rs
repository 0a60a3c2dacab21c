use super::InsightsStore;
use crate::{
    error::InsightsResult,
    facts::{BrandFact, InsuranceFact, LocalityFact, TransactionFact, UserFact},
};
use rusqlite::params;

impl InsightsStore {
    // ── Fact loading (demo generator and fixtures only) ───────────

    pub fn insert_transaction_fact(&self, f: &TransactionFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_transaction (region, year, quarter, category, txn_count, txn_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![f.region, f.year, f.quarter.get(), f.category, f.count, f.amount],
        )?;
        Ok(())
    }

    pub fn insert_district_transaction(&self, f: &LocalityFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO map_transaction (region, year, quarter, district, txn_count, txn_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![f.region, f.year, f.quarter.get(), f.locality, f.count, f.amount],
        )?;
        Ok(())
    }

    pub fn insert_brand_fact(&self, f: &BrandFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_user (region, year, quarter, brand, brand_count, brand_share)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![f.region, f.year, f.quarter.get(), f.brand, f.count, f.share],
        )?;
        Ok(())
    }

    pub fn insert_user_fact(&self, f: &UserFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO map_user (region, year, quarter, district, registered_users, app_opens)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                f.region,
                f.year,
                f.quarter.get(),
                f.district,
                f.registered_users,
                f.app_opens
            ],
        )?;
        Ok(())
    }

    pub fn insert_insurance_fact(&self, f: &InsuranceFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO aggregated_insurance (region, year, quarter, insurance_count, insurance_amount)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![f.region, f.year, f.quarter.get(), f.count, f.amount],
        )?;
        Ok(())
    }

    pub fn insert_district_insurance(&self, f: &LocalityFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO map_insurance (region, year, quarter, district, insurance_count, insurance_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![f.region, f.year, f.quarter.get(), f.locality, f.count, f.amount],
        )?;
        Ok(())
    }

    pub fn insert_pincode_insurance(&self, f: &LocalityFact) -> InsightsResult<()> {
        self.conn.execute(
            "INSERT INTO top_insurance (region, year, quarter, pincode, insurance_count, insurance_amount)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![f.region, f.year, f.quarter.get(), f.locality, f.count, f.amount],
        )?;
        Ok(())
    }

    /// Number of rows in `aggregated_transaction`. Printed by the runner summary.
    pub fn transaction_fact_count(&self) -> InsightsResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM aggregated_transaction", [], |row| row.get(0))?;
        Ok(n)
    }
}
