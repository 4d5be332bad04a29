//! Tests for column width allocation.

use std::collections::HashMap;

use smartgrid_lib::layout::WidthAllocator;
use smartgrid_lib::layout::WidthConfig;
use smartgrid_lib::model::ColumnDef;
use smartgrid_lib::model::ColumnType;

fn total(widths: &[smartgrid_lib::layout::AllocatedWidth]) -> u32 {
    widths.iter().map(|w| w.width).sum()
}

fn mixed_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("trip", "Trip").with_type(ColumnType::Link),
        ColumnDef::new("status", "Status").with_type(ColumnType::Badge),
        ColumnDef::new("window", "Window").with_type(ColumnType::DateTimeRange),
        ColumnDef::new("weight", "Weight").with_type(ColumnType::Number),
        ColumnDef::new("origin", "Origin"),
        ColumnDef::new("destination", "Destination").with_width(500),
    ]
}

#[test]
fn test_sum_never_exceeds_available() {
    let columns = mixed_columns();
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let allocator = WidthAllocator::default();

    for available in [480, 600, 750, 1000, 1440, 1920, 4000] {
        let widths = allocator.allocate(&refs, &HashMap::new(), available);
        assert_eq!(widths.len(), columns.len());
        assert!(total(&widths) <= available, "overflow at {available}");
    }
}

#[test]
fn test_explicit_width_capped_at_share() {
    let columns = mixed_columns();
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let widths = WidthAllocator::default().allocate(&refs, &HashMap::new(), 1000);

    let destination = widths.iter().find(|w| w.key == "destination").unwrap();
    assert!(destination.width <= 400);
}

#[test]
fn test_type_bounds_apply_on_wide_containers() {
    let columns = mixed_columns();
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let widths = WidthAllocator::default().allocate(&refs, &HashMap::new(), 4000);
    let width = |key: &str| widths.iter().find(|w| w.key == key).unwrap().width;

    assert_eq!(width("status"), 140);
    assert_eq!(width("trip"), 260);
    assert_eq!(width("window"), 260);
    assert_eq!(width("weight"), 160);
    assert_eq!(width("origin"), 300);
    assert_eq!(width("destination"), 500);
}

#[test]
fn test_column_bounds_override_type_bounds() {
    let columns = vec![ColumnDef::new("note", "Note").with_bounds(50, 90)];
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let widths = WidthAllocator::default().allocate(&refs, &HashMap::new(), 1000);

    assert_eq!(widths[0].width, 90);
}

#[test]
fn test_narrow_container_floors_every_column() {
    let columns = mixed_columns();
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let widths = WidthAllocator::default().allocate(&refs, &HashMap::new(), 300);

    assert!(widths.iter().all(|w| w.width == 80));
}

#[test]
fn test_tuned_config() {
    let config = WidthConfig::new().with_max_share(0.25).with_floor(40);
    let columns = vec![ColumnDef::new("a", "A").with_width(900), ColumnDef::new("b", "B")];
    let refs: Vec<&ColumnDef> = columns.iter().collect();
    let widths = WidthAllocator::new(config).allocate(&refs, &HashMap::new(), 800);

    assert_eq!(widths[0].width, 200);
    assert_eq!(widths[1].width, 300);
}

#[test]
fn test_no_columns() {
    assert!(WidthAllocator::default().allocate(&[], &HashMap::new(), 1000).is_empty());
}
