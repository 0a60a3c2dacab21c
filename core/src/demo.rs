//! Synthetic fact generator for local runs and tests.
//!
//! Produces plausible quarterly facts for a fixed set of regions. The same
//! seed and year range always yield identical table contents.
//! Insurance data starts in 2020 Q2 and app opens start in 2019, so early
//! periods exercise the empty-table and zero-ratio paths.

use crate::{
    error::InsightsResult,
    facts::{BrandFact, InsuranceFact, LocalityFact, TransactionFact, UserFact},
    rng::{FactRng, FactStream},
    store::InsightsStore,
    types::{Period, Quarter, Year},
};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Regions and their districts, named as the boundary document names them.
pub const DEMO_REGIONS: &[(&str, &[&str])] = &[
    ("Andhra Pradesh", &["Visakhapatnam", "Guntur", "Krishna"]),
    ("Assam", &["Kamrup Metropolitan", "Dibrugarh"]),
    ("Bihar", &["Patna", "Gaya", "Muzaffarpur"]),
    ("Delhi", &["New Delhi", "South Delhi", "East Delhi"]),
    ("Gujarat", &["Ahmedabad", "Surat", "Vadodara"]),
    ("Karnataka", &["Bengaluru Urban", "Mysuru", "Belagavi"]),
    ("Kerala", &["Ernakulam", "Thiruvananthapuram"]),
    ("Maharashtra", &["Pune", "Mumbai Suburban", "Thane", "Nagpur"]),
    ("Rajasthan", &["Jaipur", "Jodhpur", "Udaipur"]),
    ("Tamil Nadu", &["Chennai", "Coimbatore", "Madurai"]),
    ("Telangana", &["Hyderabad", "Rangareddy", "Medchal Malkajgiri"]),
    ("Uttar Pradesh", &["Lucknow", "Ghaziabad", "Gautam Buddha Nagar"]),
    ("West Bengal", &["Kolkata", "North Twenty Four Parganas"]),
];

pub const DEMO_CATEGORIES: &[&str] = &[
    "Financial Services",
    "Merchant payments",
    "Others",
    "Peer-to-peer payments",
    "Recharge & bill payments",
];

pub const DEMO_BRANDS: &[&str] = &[
    "Apple", "Huawei", "Motorola", "OnePlus", "Oppo", "Realme", "Samsung", "Vivo", "Xiaomi",
    "Others",
];

const INSURANCE_LAUNCH: Period = Period { year: 2020, quarter: Quarter::Q2 };
const APP_OPENS_FROM: Year = 2019;

/// Row counts written per table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DemoSummary {
    pub transactions:       usize,
    pub district_txns:      usize,
    pub brands:             usize,
    pub users:              usize,
    pub insurance:          usize,
    pub district_insurance: usize,
    pub pincode_insurance:  usize,
}

pub struct DemoGenerator {
    seed:  u64,
    years: RangeInclusive<Year>,
}

impl DemoGenerator {
    pub fn new(seed: u64, years: RangeInclusive<Year>) -> Self {
        Self { seed, years }
    }

    fn periods(&self) -> Vec<Period> {
        self.years
            .clone()
            .flat_map(|y| Quarter::ALL.into_iter().map(move |q| Period::new(y, q)))
            .collect()
    }

    /// Write every fact table in one transaction.
    pub fn populate(&self, store: &InsightsStore) -> InsightsResult<DemoSummary> {
        let periods = self.periods();
        let mut summary = DemoSummary::default();

        let mut weights_rng = FactRng::new(self.seed, FactStream::Weights);
        let weights: Vec<f64> = DEMO_REGIONS
            .iter()
            .map(|_| weights_rng.pareto(1.0, 1.6).min(12.0))
            .collect();

        let mut txn_rng = FactRng::new(self.seed, FactStream::Transactions);
        let mut district_rng = FactRng::new(self.seed, FactStream::Districts);
        let mut brand_rng = FactRng::new(self.seed, FactStream::Brands);
        let mut user_rng = FactRng::new(self.seed, FactStream::Users);
        let mut ins_rng = FactRng::new(self.seed, FactStream::Insurance);

        store.with_transaction(|store| {
            for (step, period) in periods.iter().enumerate() {
                let growth = 1.11_f64.powi(step as i32);
                for (idx, ((region, districts), weight)) in DEMO_REGIONS.iter().zip(&weights).enumerate() {
                    let scale = weight * growth;

                    for (i, category) in DEMO_CATEGORIES.iter().enumerate() {
                        let count = (40_000.0 * scale * (i as f64 + 1.0) * txn_rng.jitter(0.2)) as i64;
                        let ticket = 180.0 + 90.0 * i as f64;
                        store.insert_transaction_fact(&TransactionFact {
                            region:   region.to_string(),
                            year:     period.year,
                            quarter:  period.quarter,
                            category: category.to_string(),
                            count,
                            amount:   count as f64 * ticket * txn_rng.jitter(0.1),
                        })?;
                        summary.transactions += 1;
                    }

                    for district in districts.iter() {
                        let count = (90_000.0 * scale * district_rng.jitter(0.4)) as i64;
                        store.insert_district_transaction(&LocalityFact {
                            region:   region.to_string(),
                            year:     period.year,
                            quarter:  period.quarter,
                            locality: district.to_string(),
                            count,
                            amount:   count as f64 * 420.0 * district_rng.jitter(0.15),
                        })?;
                        summary.district_txns += 1;

                        let registered = (25_000.0 * scale * user_rng.jitter(0.3)) as i64;
                        let opens = if period.year < APP_OPENS_FROM {
                            0
                        } else {
                            (registered as f64 * user_rng.between(8, 40) as f64) as i64
                        };
                        store.insert_user_fact(&UserFact {
                            region:           region.to_string(),
                            year:             period.year,
                            quarter:          period.quarter,
                            district:         district.to_string(),
                            registered_users: registered,
                            app_opens:        opens,
                        })?;
                        summary.users += 1;
                    }

                    let counts: Vec<i64> = DEMO_BRANDS
                        .iter()
                        .map(|_| (8_000.0 * scale * brand_rng.pareto(1.0, 2.0)) as i64)
                        .collect();
                    let total: i64 = counts.iter().sum::<i64>().max(1);
                    for (brand, count) in DEMO_BRANDS.iter().zip(&counts) {
                        store.insert_brand_fact(&BrandFact {
                            region:  region.to_string(),
                            year:    period.year,
                            quarter: period.quarter,
                            brand:   brand.to_string(),
                            count:   *count,
                            share:   *count as f64 / total as f64,
                        })?;
                        summary.brands += 1;
                    }

                    if *period < INSURANCE_LAUNCH {
                        continue;
                    }
                    let mut region_count = 0;
                    let mut region_amount = 0.0;
                    for district in districts.iter() {
                        let count = (300.0 * scale * ins_rng.jitter(0.5)) as i64;
                        let amount = count as f64 * 650.0 * ins_rng.jitter(0.2);
                        region_count += count;
                        region_amount += amount;
                        store.insert_district_insurance(&LocalityFact {
                            region:   region.to_string(),
                            year:     period.year,
                            quarter:  period.quarter,
                            locality: district.to_string(),
                            count,
                            amount,
                        })?;
                        summary.district_insurance += 1;
                    }
                    store.insert_insurance_fact(&InsuranceFact {
                        region:  region.to_string(),
                        year:    period.year,
                        quarter: period.quarter,
                        count:   region_count,
                        amount:  region_amount,
                    })?;
                    summary.insurance += 1;

                    for n in 0..3 {
                        let pincode = (110_001 + idx * 37_000 + n * 11).to_string();
                        let count = (region_count as f64 * 0.1 * ins_rng.jitter(0.3)) as i64;
                        store.insert_pincode_insurance(&LocalityFact {
                            region:   region.to_string(),
                            year:     period.year,
                            quarter:  period.quarter,
                            locality: pincode,
                            count,
                            amount:   count as f64 * 650.0,
                        })?;
                        summary.pincode_insurance += 1;
                    }
                }
            }
            Ok(())
        })?;

        log::info!(
            "Demo data written (seed {}): {} transaction rows, {} user rows, {} insurance rows",
            self.seed,
            summary.transactions,
            summary.users,
            summary.insurance
        );
        Ok(summary)
    }
}
