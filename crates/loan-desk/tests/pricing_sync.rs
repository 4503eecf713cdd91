use loan_desk::workflows::pricing::{write_catalog, PricingSheetImporter};
use loan_desk::workflows::quoting::{CitizenshipRequirement, LoanProgramCatalog};

#[test]
fn pricing_sheet_export_syncs_into_catalog() {
    let data = include_bytes!("../pricing_sheet.csv");

    let sync = PricingSheetImporter::from_reader(&data[..]).expect("pricing sheet syncs");

    assert_eq!(sync.rows_read, 9);
    assert_eq!(
        sync.catalog.loan_types().collect::<Vec<_>>(),
        vec!["CRE Bridge", "DSCR Rental", "Fix & Flip", "Hard Money", "Land Loan"]
    );
    assert_eq!(sync.catalog.tier_count(), 8);

    let fix_and_flip = sync.catalog.get("Fix & Flip").expect("fix & flip synced");
    let ids: Vec<_> = fix_and_flip.programs.iter().map(|tier| tier.id.as_str()).collect();
    assert_eq!(ids, vec!["ff-preferred", "ff-standard", "ff-starter"]);
    assert_eq!(fix_and_flip.programs[0].min_origination_fee, 2_000);
    assert_eq!(fix_and_flip.programs[0].legal_doc_fee, 995);
    assert!(fix_and_flip.programs[2].requirements.is_universal());

    let dscr = sync.catalog.get("DSCR Rental").expect("dscr synced");
    assert_eq!(dscr.arv_label, "Appraised Value");
    assert_eq!(dscr.programs[0].loan_term_months, 360);
    assert_eq!(dscr.programs[0].max_ltc, 0.0);
    assert_eq!(
        dscr.programs[0].requirements.citizenship,
        CitizenshipRequirement::UsResident
    );

    let land = sync.catalog.get("Land Loan").expect("label-only loan type");
    assert_eq!(land.arv_label, "Raw Land Value");
    assert!(land.programs.is_empty());
}

#[test]
fn sync_warns_about_gated_fallbacks_and_empty_loan_types() {
    let data = include_bytes!("../pricing_sheet.csv");

    let sync = PricingSheetImporter::from_reader(&data[..]).expect("pricing sheet syncs");

    let flagged: Vec<_> = sync
        .warnings
        .iter()
        .map(|warning| warning.loan_type.as_str())
        .collect();
    assert_eq!(flagged, vec!["Hard Money", "Land Loan"]);
    assert!(sync.warnings[0].message.contains("hm-select"));
}

#[test]
fn written_catalog_is_loadable_by_the_service() {
    let data = include_bytes!("../pricing_sheet.csv");
    let sync = PricingSheetImporter::from_reader(&data[..]).expect("pricing sheet syncs");

    let mut buffer = Vec::new();
    write_catalog(&sync.catalog, &mut buffer).expect("catalog writes");
    let json: serde_json::Value = serde_json::from_slice(&buffer).expect("valid json");
    assert!(json["loanPrograms"]["CRE Bridge"]["programs"].is_array());

    let loaded = LoanProgramCatalog::from_reader(buffer.as_slice()).expect("catalog loads");
    assert_eq!(loaded, sync.catalog);
}
