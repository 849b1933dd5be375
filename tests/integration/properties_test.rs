use crate::utils::random_records;
use inundation_impact::impact::round_one_decimal;
use inundation_impact::{
    Dataset, DatasetRecord, DatasetVariant, EngineConfig, ImagePathResolver, IndustrySlot,
    MatchPolicy, Selection, SelectionLevel, StateAbbreviations, compute_impact, rank_industries,
};

fn dataset(seed: u64) -> Dataset {
    Dataset::from_records("random.csv", DatasetVariant::Rich, random_records(seed, 400))
}

/// Every candidate at a lower level pairs with at least one record
#[test]
fn test_cascading_consistency() {
    let data = dataset(7);

    for state in data.candidates_for(SelectionLevel::State, &Selection::new()) {
        let by_state = Selection::new().with_state(state.as_str());
        for county in data.candidates_for(SelectionLevel::County, &by_state) {
            assert!(
                data.records()
                    .iter()
                    .any(|r| r.state == state && r.county == county)
            );
            let by_county = by_state.clone().with_county(county.as_str());
            let categories = data.candidates_for(SelectionLevel::Category, &by_county);
            assert!(!categories.is_empty());
            assert!(categories.windows(2).all(|pair| pair[0] < pair[1]));
            for category in categories {
                assert!(data.records().iter().any(|r| r.matches(&state, &county, &category)));
            }
        }
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let data = dataset(11);
    let config = EngineConfig::default();
    let images = config.image_path_resolver(data.variant());

    for record in data.records().iter().take(50) {
        let selection: Selection = record.key().into();
        let first = data.resolve(&selection, MatchPolicy::FirstMatch).unwrap();
        let second = data.resolve(&selection, MatchPolicy::FirstMatch).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(compute_impact(first), compute_impact(second));
        assert_eq!(rank_industries(first), rank_industries(second));
        assert_eq!(
            images.resolve_asset_id(&record.state, &record.county, &record.category),
            images.resolve_asset_id(&record.state, &record.county, &record.category)
        );
    }
}

#[test]
fn test_percentages_bounded() {
    for record in random_records(3, 1_000) {
        let impact = compute_impact(&record);
        assert!(impact.pct_establishments <= 100);
        assert!(impact.pct_employment <= 100);
        if record.county_establishments == Some(0) {
            assert_eq!(impact.pct_establishments, 0);
        }
        for industry in rank_industries(&record) {
            assert!(industry.pct_of_zone_employment <= 100);
        }
    }
}

#[test]
fn test_rounding_stable_under_rerounding() {
    for record in random_records(5, 1_000) {
        let impact = compute_impact(&record);
        assert_eq!(round_one_decimal(impact.lost_wages_millions), impact.lost_wages_millions);
        assert_eq!(round_one_decimal(impact.lost_sales_millions), impact.lost_sales_millions);
    }
}

#[test]
fn test_rank_integrity() {
    for record in random_records(9, 500) {
        let ranked = rank_industries(&record);
        assert!(ranked.len() <= 5);
        assert!(ranked.windows(2).all(|pair| pair[0].rank < pair[1].rank));
        for industry in &ranked {
            let slot = record.slot(industry.rank).unwrap();
            assert_eq!(slot.label(), Some(industry.group_label.as_str()));
        }
    }
}

/// Ranks 1 and 3 populated, rank 2 empty
#[test]
fn test_gap_in_ranked_slots() {
    let mut slot_two = IndustrySlot::empty(2);
    slot_two.naics_code = Some(4411);
    let record = DatasetRecord::new("Alabama", "Mobile County", "Category 3")
        .with_zone_employment(100)
        .with_slot(IndustrySlot::new(1, 4451, "Retail", 40))
        .with_slot(slot_two)
        .with_slot(IndustrySlot::new(3, 7225, "Food Services", 20));

    let ranked = rank_industries(&record);
    assert_eq!(ranked.len(), 2);
    assert_eq!((ranked[0].rank, ranked[0].group_label.as_str()), (1, "Retail"));
    assert_eq!((ranked[1].rank, ranked[1].group_label.as_str()), (3, "Food Services"));
}

#[test]
fn test_asset_name_ignores_record() {
    let images = ImagePathResolver::new(StateAbbreviations::default(), true);
    let id = images.resolve_asset_id("Alabama", "Mobile County", "Category 3");
    assert_eq!(id.as_str(), "Mobile_AL_cat3.jpg");

    // A selection with no backing row still gets a name
    let id = images.resolve_asset_id("Alabama", "Choctaw County", "Category 5");
    assert_eq!(id.as_str(), "Choctaw_AL_cat5.jpg");
}
