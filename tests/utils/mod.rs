use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use inundation_impact::{DatasetRecord, IndustrySlot};

/// Header of the rich dataset variant
pub const RICH_HEADER: &str = "State,County,inundation_zone,Establishments,Employment,wages_week,sales_week,county_establishments,county_employment,baEMP,impacted_indgrp_1,impacted_naics4_1,emp_naics4_1,impacted_indgrp_2,impacted_naics4_2,emp_naics4_2,impacted_indgrp_3,impacted_naics4_3,emp_naics4_3,impacted_indgrp_4,impacted_naics4_4,emp_naics4_4,impacted_indgrp_5,impacted_naics4_5,emp_naics4_5";

/// A small rich dataset covering both states of the built-in table
pub fn rich_csv() -> String {
    let rows = [
        "Alabama,Mobile County,Category 3,120,900,350000,900000,1000,9000,900,Retail,4451,300,,,,Food Services,7225,200,,,,,,",
        "Alabama,Mobile County,Category 1,60,410,140000,380000,1000,9000,410,Food Services,7225,150,Retail,4451,90,,,,,,,,,",
        "Alabama,Baldwin County,Category 2,75,640,210000,700000,0,5000,640,Traveler Accommodation,7211,320,,,,,,,,,,,,",
        "Mississippi,Harrison County,Category 4,300,4100,1450000,5200000,2400,36000,4100,Restaurants,7225,1230,Hospitals,6221,820,Grocery Stores,4451,410,Building Material Dealers,4441,205,Gasoline Stations,4471,164",
        "Mississippi,Hancock County,Category 4,45,380,98000,260000,500,6100,0,Marinas,7139,120,,,,,,,,,,,,",
    ];
    let mut csv = String::from(RICH_HEADER);
    csv.push('\n');
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

/// A small simple dataset keyed by SLOSH category
pub fn simple_csv() -> String {
    "State,County,SLOSH,Establishments,Employment,wages_week,sales_week\n\
     Alabama,Mobile County,3,120,900,350000,900000\n\
     Alabama,Mobile County,1,60,410,140000,380000\n\
     Mississippi,Jackson County,2,88,720,260000,810000\n"
        .to_string()
}

/// Write `contents` to `name` inside `dir`
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Seeded random records for property checks
pub fn random_records(seed: u64, count: usize) -> Vec<DatasetRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let states = ["Alabama", "Mississippi", "Louisiana"];
    let counties = ["Mobile County", "Baldwin County", "Harrison County", "Orleans Parish"];
    let categories = ["Category 1", "Category 2", "Category 3", "Category 4", "Category 5"];

    (0..count)
        .map(|_| {
            let county_establishments = rng.random_range(0..5_000u64);
            let county_employment = rng.random_range(0..60_000u64);
            let zone_employment = rng.random_range(0..20_000u64);
            let mut record = DatasetRecord::new(
                states[rng.random_range(0..states.len())],
                counties[rng.random_range(0..counties.len())],
                categories[rng.random_range(0..categories.len())],
            )
            .with_zone_counts(
                rng.random_range(0..=county_establishments),
                rng.random_range(0..=county_employment),
            )
            .with_county_totals(county_establishments, county_employment)
            .with_weekly_dollars(
                rng.random_range(0.0..50_000_000.0),
                rng.random_range(0.0..90_000_000.0),
            )
            .with_zone_employment(zone_employment);

            for rank in 1..=5u8 {
                record = if rng.random_bool(0.7) {
                    record.with_slot(IndustrySlot::new(
                        rank,
                        rng.random_range(1100..9999),
                        "Industry Group",
                        rng.random_range(0..=zone_employment),
                    ))
                } else {
                    record.with_slot(IndustrySlot::empty(rank))
                };
            }
            record
        })
        .collect()
}
