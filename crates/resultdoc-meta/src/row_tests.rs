use super::composite::CompositeRow;
use super::flags::RowFlags;
use super::ids::{RowIndex, SelectionSetId};
use super::row::{ROW_SIZE, RowLayout, RowSpec};
use super::simple::SimpleRow;
use super::token::TokenType;

#[test]
fn simple_row_word_layout() {
    let spec = RowSpec::new(TokenType::String)
        .location(0x1234)
        .length(5)
        .complex_children(true)
        .number_of_rows(1)
        .source_id(3)
        .flags(RowFlags::LEAF);
    let bytes = SimpleRow::pack(&spec).to_bytes();

    assert_eq!(&bytes[0..4], &0x1234u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &(0x8000_0005u32).to_le_bytes());
    assert_eq!(&bytes[8..12], &(0x6000_0001u32).to_le_bytes());
    assert_eq!(&bytes[12..16], &(0x0040_0003u32).to_le_bytes());
    assert_eq!(&bytes[16..20], &[0, 0, 0, 0]);
}

#[test]
fn simple_row_accessors() {
    let spec = RowSpec::new(TokenType::StartObject)
        .location(7)
        .length(2)
        .complex_children(true)
        .number_of_rows(9)
        .source_id(0xBEEF)
        .flags(RowFlags::ROOT | RowFlags::NULLABLE);
    let row = SimpleRow::pack(&spec);

    assert_eq!(row.token_type(), TokenType::StartObject);
    assert_eq!(row.location(), 7);
    assert_eq!(row.length(), 2);
    assert!(row.has_complex_children());
    assert_eq!(row.number_of_rows(), 9);
    assert_eq!(row.source_id(), 0xBEEF);
    assert_eq!(row.flags(), RowFlags::ROOT | RowFlags::NULLABLE);
    assert_eq!(SimpleRow::from_bytes(&row.to_bytes()), row);
}

#[test]
fn composite_row_word_layout() {
    let spec = RowSpec::new(TokenType::Reference)
        .location(7)
        .number_of_rows(1)
        .source_id(1)
        .parent(Some(RowIndex(0)))
        .selection_set(Some(SelectionSetId(4)))
        .flags(RowFlags::NULLABLE);
    let bytes = CompositeRow::pack(&spec).to_bytes();

    assert_eq!(&bytes[0..4], &(0xB000_0007u32).to_le_bytes());
    assert_eq!(&bytes[4..8], &0u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &(0x0100_0001u32).to_le_bytes());
    assert_eq!(&bytes[12..16], &1u32.to_le_bytes());
    assert_eq!(&bytes[16..20], &(0x0800_0005u32).to_le_bytes());
}

#[test]
fn composite_row_absent_links_are_zero() {
    let row = CompositeRow::pack(&RowSpec::new(TokenType::Null).number_of_rows(1));

    assert_eq!(row.parent(), None);
    assert_eq!(row.selection_set(), None);
    assert_eq!(row.reference_target(), None);
    assert_eq!(&row.to_bytes()[12..20], &[0u8; 8]);
}

#[test]
fn composite_reference_target() {
    let row = CompositeRow::pack(&RowSpec::new(TokenType::Reference).location(42));
    assert_eq!(row.reference_target(), Some(RowIndex(42)));
}

#[test]
fn with_flags_keeps_selection_set() {
    let row = CompositeRow::pack(
        &RowSpec::new(TokenType::StartObject).selection_set(Some(SelectionSetId(9))),
    );
    let row = row.with_flags(row.flags() | RowFlags::INVALIDATED);

    assert_eq!(row.selection_set(), Some(SelectionSetId(9)));
    assert!(row.flags().contains(RowFlags::INVALIDATED));
}

#[test]
fn with_number_of_rows_keeps_token_and_source() {
    let simple = SimpleRow::pack(&RowSpec::new(TokenType::StartArray).source_id(2));
    let simple = simple.with_number_of_rows(12);
    assert_eq!(simple.token_type(), TokenType::StartArray);
    assert_eq!(simple.source_id(), 2);
    assert_eq!(simple.number_of_rows(), 12);

    let composite = CompositeRow::pack(&RowSpec::new(TokenType::StartArray).source_id(2));
    let composite = composite.with_number_of_rows(12);
    assert_eq!(composite.source_id(), 2);
    assert_eq!(composite.number_of_rows(), 12);
}

#[test]
fn with_complex_children_keeps_length() {
    let row = SimpleRow::pack(&RowSpec::new(TokenType::StartObject).length(3));
    let row = row.with_complex_children(true);
    assert_eq!(row.length(), 3);
    assert!(row.has_complex_children());
}

#[test]
fn with_location_replaces_target() {
    let row = CompositeRow::pack(&RowSpec::new(TokenType::Reference).location(3));
    let row = row.with_location(8);
    assert_eq!(row.reference_target(), Some(RowIndex(8)));
    assert_eq!(row.token_type(), TokenType::Reference);
}

#[test]
fn token_type_of_reads_raw_bytes() {
    let simple = SimpleRow::pack(&RowSpec::new(TokenType::False)).to_bytes();
    assert_eq!(SimpleRow::token_type_of(&simple), TokenType::False);

    let composite = CompositeRow::pack(&RowSpec::new(TokenType::EndArray)).to_bytes();
    assert_eq!(CompositeRow::token_type_of(&composite), TokenType::EndArray);
}

#[test]
fn row_size_is_twenty_bytes() {
    assert_eq!(ROW_SIZE, 20);
    assert_eq!(SimpleRow::pack(&RowSpec::default()).to_bytes().len(), ROW_SIZE);
}

#[test]
#[should_panic(expected = "31-bit limit")]
fn simple_location_overflow_panics() {
    SimpleRow::pack(&RowSpec::new(TokenType::String).location(0x8000_0000));
}

#[test]
#[should_panic(expected = "28-bit limit")]
fn composite_location_overflow_panics() {
    CompositeRow::pack(&RowSpec::new(TokenType::String).location(0x1000_0000));
}

#[test]
#[should_panic(expected = "24-bit limit")]
fn composite_span_overflow_panics() {
    CompositeRow::pack(&RowSpec::new(TokenType::StartArray).number_of_rows(0x0100_0000));
}

#[test]
#[should_panic(expected = "8-bit limit")]
fn composite_source_overflow_panics() {
    CompositeRow::pack(&RowSpec::new(TokenType::String).source_id(256));
}

#[test]
#[should_panic(expected = "no parent linkage")]
fn simple_row_rejects_parent() {
    SimpleRow::pack(&RowSpec::new(TokenType::String).parent(Some(RowIndex(0))));
}

#[test]
#[should_panic(expected = "invalid token type")]
fn invalid_token_type_panics() {
    TokenType::from_u8(12);
}

#[test]
fn token_type_predicates() {
    assert!(TokenType::StartObject.is_start());
    assert!(TokenType::EndArray.is_end());
    assert!(TokenType::Null.is_scalar());
    assert!(!TokenType::PropertyName.is_scalar());
    assert!(!TokenType::Reference.is_scalar());
    assert_eq!(TokenType::StartArray.closing(), Some(TokenType::EndArray));
    assert_eq!(TokenType::String.closing(), None);
}

#[test]
fn flags_debug() {
    assert_eq!(format!("{:?}", RowFlags::NONE), "RowFlags(-)");
    assert_eq!(
        format!("{:?}", RowFlags::ROOT | RowFlags::INVALIDATED),
        "RowFlags(invalidated|root)"
    );
}
