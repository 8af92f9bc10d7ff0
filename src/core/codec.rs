// Pricebook - core/codec.rs
//
// Catalogue CSV encoding and decoding.
// Core layer: accepts Read/Write trait objects, never touches the
// filesystem directly.
//
// Format: one record per line, no header, five fields in fixed order:
// code,name,kind,base_price,discount. Fields containing the delimiter
// are quoted (RFC 4180); the original flat format had no escaping and
// silently corrupted such records.

use crate::core::model::Product;
use crate::util::constants::{CSV_DELIMITER, CSV_FIELD_COUNT};
use crate::util::error::ParseError;
use std::io::{Read, Write};

/// Decode a whole catalogue stream.
///
/// Empty lines are skipped; every other record must decode or the whole
/// read fails with the first error (fail-fast, so callers can keep their
/// previous state intact).
pub fn read_products<R: Read>(reader: R) -> Result<Vec<Product>, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(CSV_DELIMITER)
        // Field-count mismatches are reported by decode_record with a line
        // number and the found count, not as an opaque csv::Error.
        .flexible(true)
        .from_reader(reader);

    let mut products = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| ParseError::Csv { source: e })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        products.push(decode_record(&record, line)?);
    }

    tracing::debug!(count = products.len(), "Catalogue stream decoded");
    Ok(products)
}

/// Encode `products` in sequence order, one record per line.
///
/// Returns the number of records written. The writer is flushed before
/// returning so the caller observes either a complete write or an error.
pub fn write_products<W: Write>(products: &[Product], writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(writer);

    let mut count = 0;
    for product in products {
        csv_writer.write_record([
            product.code.to_string(),
            product.name.clone(),
            product.kind.clone(),
            product.base_price.to_string(),
            product.discount.to_string(),
        ])?;
        count += 1;
    }

    csv_writer.flush().map_err(csv::Error::from)?;

    tracing::debug!(count, "Catalogue stream encoded");
    Ok(count)
}

/// Decode a single record into a `Product`.
///
/// `line` is the 1-based line number used in error reports.
fn decode_record(record: &csv::StringRecord, line: u64) -> Result<Product, ParseError> {
    if record.len() != CSV_FIELD_COUNT {
        return Err(ParseError::FieldCount {
            line,
            found: record.len(),
        });
    }

    Ok(Product {
        code: numeric_field(record, 0, "code", line)?,
        name: record.get(1).unwrap_or_default().to_string(),
        kind: record.get(2).unwrap_or_default().to_string(),
        base_price: numeric_field(record, 3, "base_price", line)?,
        discount: numeric_field(record, 4, "discount", line)?,
    })
}

/// Parse one numeric field, tolerating surrounding whitespace.
fn numeric_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    field: &'static str,
    line: u64,
) -> Result<T, ParseError> {
    let raw = record.get(index).unwrap_or_default();
    raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Product> {
        vec![
            Product::new(102, "Claw hammer", "tools", 14.5, 0.0),
            Product::new(17, "Roller set", "paint", 32.0, 10.0),
        ]
    }

    #[test]
    fn decodes_well_formed_records() {
        let input = "102,Claw hammer,tools,14.5,0\n17,Roller set,paint,32,10\n";
        let products = read_products(input.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].code, 102);
        assert_eq!(products[0].name, "Claw hammer");
        assert_eq!(products[1].kind, "paint");
        assert!((products[1].base_price - 32.0).abs() < f64::EPSILON);
        assert!((products[1].discount - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_empty_lines() {
        let input = "102,Claw hammer,tools,14.5,0\n\n17,Roller set,paint,32,10\n";
        let products = read_products(input.as_bytes()).unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn short_record_is_a_field_count_error() {
        let input = "102,Claw hammer,tools,14.5,0\n17,Roller set,paint\n";
        let err = read_products(input.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ParseError::FieldCount { line: 2, found: 3 }),
            "expected FieldCount on line 2, got {err:?}"
        );
    }

    #[test]
    fn non_numeric_price_is_an_invalid_number_error() {
        let input = "102,Claw hammer,tools,cheap,0\n";
        let err = read_products(input.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 1);
                assert_eq!(field, "base_price");
                assert_eq!(value, "cheap");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_code_is_an_invalid_number_error() {
        let input = "first,Claw hammer,tools,14.5,0\n";
        let err = read_products(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { field: "code", .. }
        ));
    }

    #[test]
    fn write_reports_record_count_and_terminates_lines() {
        let mut buf = Vec::new();
        let count = write_products(&sample(), &mut buf).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "102,Claw hammer,tools,14.5,0\n17,Roller set,paint,32,10\n");
    }

    #[test]
    fn delimiter_in_name_is_quoted_and_round_trips() {
        let original = vec![Product::new(17, "Paint, white (5L)", "paint", 32.0, 10.0)];

        let mut buf = Vec::new();
        write_products(&original, &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(
            text.contains("\"Paint, white (5L)\""),
            "comma-bearing name should be quoted: {text}"
        );

        let decoded = read_products(buf.as_slice()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn round_trip_preserves_fields_and_order() {
        let original = sample();
        let mut buf = Vec::new();
        write_products(&original, &mut buf).unwrap();
        let decoded = read_products(buf.as_slice()).unwrap();
        assert_eq!(decoded, original);
    }
}
