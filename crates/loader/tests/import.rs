use pepcat_core::{CatalogDocument, MetaMap};
use pepcat_loader::CatalogImporter;
use pepcat_storage::{
    CatalogStore, substance_by_slug, table_count, variant_id_by_sku, variants_for_substance,
};

fn import(store: &mut CatalogStore, yaml: &str) -> Result<pepcat_loader::ImportReport, Box<dyn std::error::Error>> {
    let doc = CatalogDocument::from_yaml_str(yaml)?;
    Ok(CatalogImporter::new(store).import(&doc)?)
}

// ============================================================================
// Scenario A: one category, one substance, one variant
// ============================================================================

#[test]
fn single_substance_catalog() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    let report = import(
        &mut store,
        r#"
categories:
  - slug: growth
    name: Growth
substances:
  - slug: bpc157
    name: BPC-157
    description: Body protection compound fragment.
    categories: [growth]
    variants:
      - sku: BPC157-5MG
        mg: 5
        price_cents: 4999
"#,
    )?;

    assert_eq!(report.categories, 1);
    assert_eq!(report.substances, 1);
    assert_eq!(report.category_links, 1);
    assert_eq!(report.variants, 1);

    assert_eq!(table_count(store.conn(), "categories")?, 1);
    assert_eq!(table_count(store.conn(), "substances")?, 1);
    assert_eq!(table_count(store.conn(), "substance_categories")?, 1);
    assert_eq!(table_count(store.conn(), "variants")?, 1);
    // The importer never stocks anything.
    assert_eq!(table_count(store.conn(), "batches")?, 0);
    assert_eq!(table_count(store.conn(), "inventory")?, 0);

    let sub = substance_by_slug(store.conn(), "bpc157")?.unwrap();
    assert_eq!(sub.priority, 9999);
    assert_eq!(sub.product_type, "peptide");
    assert_eq!(sub.meta_json, None);
    Ok(())
}

// ============================================================================
// Field partitioning
// ============================================================================

#[test]
fn extra_fields_land_in_meta_blob() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    import(
        &mut store,
        r#"
substances:
  - slug: semaglutide
    name: Semaglutide
    description: GLP-1 receptor agonist.
    product_type: peptide
    priority: 5
    molecular_weight: 4113.6
    cas_number: 910463-68-2
    research_notes: store desiccated
    aliases: [ozempic-analog, GLP-1]
"#,
    )?;

    let sub = substance_by_slug(store.conn(), "semaglutide")?.unwrap();
    assert_eq!(sub.priority, 5);

    // Only the unmapped fields reach the blob, keys sorted.
    let meta = MetaMap::from_json(sub.meta_json.as_deref().unwrap())?;
    assert_eq!(meta.len(), 2);
    assert!(meta.get("research_notes").is_some());
    assert!(meta.get("aliases").is_some());
    assert!(meta.get("molecular_weight").is_none());
    assert!(meta.get("cas_number").is_none());
    assert!(meta.get("priority").is_none());
    assert_eq!(
        sub.meta_json.as_deref().unwrap(),
        r#"{"aliases":["ozempic-analog","GLP-1"],"research_notes":"store desiccated"}"#
    );

    let (mw, cas): (Option<f64>, Option<String>) = store.conn().query_row(
        "SELECT molecular_weight, cas_number FROM substances WHERE slug = 'semaglutide'",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    assert_eq!(mw, Some(4113.6));
    assert_eq!(cas.as_deref(), Some("910463-68-2"));
    Ok(())
}

#[test]
fn structural_fields_never_reach_meta_blob() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    import(
        &mut store,
        r#"
categories:
  - slug: healing
    name: Healing
substances:
  - slug: tb500
    name: TB-500
    description: Thymosin beta-4 fragment.
    categories: [healing]
    variants:
      - sku: TB500-10MG
        mg: 10
        price_cents: 6999
"#,
    )?;

    let sub = substance_by_slug(store.conn(), "tb500")?.unwrap();
    // categories and variants are relationship data, not attributes.
    assert_eq!(sub.meta_json, None);
    Ok(())
}

#[test]
fn omitted_priority_defaults_to_sentinel() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    import(
        &mut store,
        r#"
substances:
  - slug: first
    name: First
    description: has priority
    priority: 1
  - slug: second
    name: Second
    description: no priority
"#,
    )?;

    assert_eq!(substance_by_slug(store.conn(), "first")?.unwrap().priority, 1);
    assert_eq!(substance_by_slug(store.conn(), "second")?.unwrap().priority, 9999);
    Ok(())
}

// ============================================================================
// Category linking
// ============================================================================

#[test]
fn unknown_category_skips_link_but_commits() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    let report = import(
        &mut store,
        r#"
categories:
  - slug: growth
    name: Growth
substances:
  - slug: ipamorelin
    name: Ipamorelin
    description: Growth hormone secretagogue.
    categories: [growth, nonexistent]
"#,
    )?;

    // The bad reference is skipped, the good one lands, the run commits.
    assert_eq!(report.category_links, 1);
    assert_eq!(table_count(store.conn(), "substance_categories")?, 1);
    assert_eq!(table_count(store.conn(), "substances")?, 1);
    Ok(())
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn variants_keep_document_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    import(
        &mut store,
        r#"
substances:
  - slug: cjc1295
    name: CJC-1295
    description: GHRH analog.
    variants:
      - sku: CJC1295-2MG
        mg: 2
        price_cents: 2999
      - sku: CJC1295-5MG
        mg: 5
        price_cents: 5999
        coa_path: coa/cjc5.pdf
"#,
    )?;

    let sub = substance_by_slug(store.conn(), "cjc1295")?.unwrap();
    let variants = variants_for_substance(store.conn(), sub.id)?;
    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].sku, "CJC1295-2MG");
    assert_eq!(variants[0].coa_path, None);
    assert_eq!(variants[1].sku, "CJC1295-5MG");
    assert_eq!(variants[1].coa_path.as_deref(), Some("coa/cjc5.pdf"));
    assert_eq!(variants[1].mg, 5.0);
    assert_eq!(variants[1].price_cents, 5999);
    Ok(())
}

// ============================================================================
// Failure semantics: single transaction, all-or-nothing
// ============================================================================

#[test]
fn duplicate_sku_aborts_without_committing() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    let result = import(
        &mut store,
        r#"
categories:
  - slug: growth
    name: Growth
substances:
  - slug: bpc157
    name: BPC-157
    description: first
    variants:
      - sku: BPC157-5MG
        mg: 5
        price_cents: 4999
  - slug: bpc157-copy
    name: BPC-157 copy
    description: second
    variants:
      - sku: BPC157-5MG
        mg: 5
        price_cents: 4999
"#,
    );
    assert!(result.is_err());

    // Nothing from the failed run is visible.
    assert_eq!(table_count(store.conn(), "categories")?, 0);
    assert_eq!(table_count(store.conn(), "substances")?, 0);
    assert_eq!(table_count(store.conn(), "variants")?, 0);
    Ok(())
}

#[test]
fn duplicate_slug_aborts_without_committing() -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CatalogStore::open_in_memory()?;
    let result = import(
        &mut store,
        r#"
substances:
  - slug: epitalon
    name: Epitalon
    description: first
  - slug: epitalon
    name: Epitalon again
    description: second
"#,
    );
    assert!(result.is_err());
    assert_eq!(table_count(store.conn(), "substances")?, 0);

    // The store stays usable: a corrected document imports cleanly.
    import(
        &mut store,
        r#"
substances:
  - slug: epitalon
    name: Epitalon
    description: tetrapeptide
"#,
    )?;
    assert_eq!(table_count(store.conn(), "substances")?, 1);
    assert!(variant_id_by_sku(store.conn(), "EPITALON-20MG")?.is_none());
    Ok(())
}
