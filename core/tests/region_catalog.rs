use insights_core::{
    catalog::RegionCatalog,
    config::DashboardConfig,
    error::InsightsError,
    facts::TransactionFact,
    filter::FilterInput,
    store::InsightsStore,
    types::{Quarter, RegionScope, ALL_REGIONS},
};

fn store_with_regions(regions: &[&str]) -> InsightsStore {
    let store = InsightsStore::in_memory().unwrap();
    store.migrate().unwrap();
    for (i, region) in regions.iter().enumerate() {
        store
            .insert_transaction_fact(&TransactionFact {
                region: region.to_string(),
                year: 2018 + i as i32,
                quarter: Quarter::new(1).unwrap(),
                category: "Others".into(),
                count: 1,
                amount: 1.0,
            })
            .unwrap();
    }
    store
}

/// The sentinel comes first, then regions sorted and de-duplicated.
#[test]
fn options_start_with_all_regions_and_are_sorted() {
    let store = store_with_regions(&["Tamil Nadu", "Assam", "Goa", "Assam"]);
    let catalog = RegionCatalog::load(&store).unwrap();
    assert_eq!(
        catalog.options(),
        vec![ALL_REGIONS, "Assam", "Goa", "Tamil Nadu"]
    );
    assert_eq!(catalog.regions().len(), 3);
}

#[test]
fn empty_store_offers_only_sentinel() {
    let store = store_with_regions(&[]);
    let catalog = RegionCatalog::load(&store).unwrap();
    assert_eq!(catalog.options(), vec![ALL_REGIONS]);
}

#[test]
fn resolve_maps_sentinel_and_known_names() {
    let catalog = RegionCatalog::from_names(vec!["Goa".to_string(), "Assam".to_string()]);
    assert_eq!(catalog.resolve(ALL_REGIONS).unwrap(), RegionScope::All);
    assert_eq!(
        catalog.resolve("Goa").unwrap(),
        RegionScope::Named("Goa".into())
    );
    assert!(matches!(
        catalog.resolve("Atlantis"),
        Err(InsightsError::UnknownRegion { .. })
    ));
}

#[test]
fn filter_input_validates_year_quarter_and_region() {
    let config = DashboardConfig::default_test();
    let catalog = RegionCatalog::from_names(vec!["Goa".to_string()]);
    let input = |year, quarter, region: &str| FilterInput {
        year,
        quarter,
        region: region.to_string(),
    };

    let scope = input(2022, 3, "Goa").resolve(&config, &catalog).unwrap();
    assert_eq!(scope.period.label(), "2022-Q3");
    assert_eq!(scope.region, RegionScope::Named("Goa".into()));

    assert!(matches!(
        input(2017, 1, ALL_REGIONS).resolve(&config, &catalog),
        Err(InsightsError::InvalidFilter { field: "year", .. })
    ));
    assert!(matches!(
        input(2022, 5, ALL_REGIONS).resolve(&config, &catalog),
        Err(InsightsError::InvalidFilter { field: "quarter", .. })
    ));
    assert!(input(2022, 1, "Narnia").resolve(&config, &catalog).is_err());
}

/// A request without a region means every region.
#[test]
fn filter_input_region_defaults_to_all() {
    let input: FilterInput = serde_json::from_str(r#"{"year": 2020, "quarter": 2}"#).unwrap();
    assert_eq!(input.region, ALL_REGIONS);
}
