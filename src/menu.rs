// Pricebook - menu.rs
//
// Interactive numbered menu loop on stdin/stdout. Owns the Catalog
// instance and all filesystem access; every catalogue failure is caught
// here and rendered as a one-line status message. Only a hard terminal
// I/O failure propagates out.
//
// Generic over BufRead/Write so scripted sessions can drive the loop
// in tests.

use crate::core::catalog::Catalog;
use crate::core::model::Product;
use crate::util::error::{PricebookError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

const MENU: &str = "
 1. Load catalogue from file
 2. View table
 3. Add a product
 4. Delete a product by row number
 5. Save catalogue to file
 6. Sort by code
 7. Search by code
 8. Select by price range
 9. Apply promotional discount
10. Remove products cheaper than a price
 0. Exit
";

/// One rendered row of the catalogue table.
#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "Code")]
    code: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Base price")]
    base_price: String,
    #[tabled(rename = "Discount %")]
    discount: String,
    #[tabled(rename = "Sale price")]
    sale_price: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            code: p.code,
            name: p.name.clone(),
            kind: p.kind.clone(),
            base_price: format!("{:.2}", p.base_price),
            discount: format!("{:.2}", p.discount),
            sale_price: format!("{:.2}", p.sale_price()),
        }
    }
}

/// Run the menu loop until the operator selects Exit or the input ends.
///
/// Returns only on a hard I/O failure of the terminal streams; catalogue
/// errors are reported inline and the loop continues.
pub fn run<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    loop {
        output.write_all(MENU.as_bytes())?;
        write!(output, "Select an option: ")?;
        output.flush()?;

        let Some(choice) = read_line(input)? else {
            break;
        };

        match choice.trim() {
            "0" => break,
            "1" => handle_load(catalog, input, output)?,
            "2" => handle_view(catalog, output)?,
            "3" => handle_add(catalog, input, output)?,
            "4" => handle_delete(catalog, input, output)?,
            "5" => handle_save(catalog, input, output)?,
            "6" => {
                catalog.sort_by_code();
                writeln!(output, "Catalogue sorted by code.")?;
            }
            "7" => handle_search(catalog, input, output)?,
            "8" => handle_select(catalog, input, output)?,
            "9" => handle_promo(catalog, input, output)?,
            "10" => handle_remove_cheaper(catalog, input, output)?,
            other => writeln!(output, "Unknown option '{other}'.")?,
        }
    }

    tracing::info!("Menu session ended");
    Ok(())
}

// ---------------------------------------------------------------------------
// File access (the core never opens files itself)
// ---------------------------------------------------------------------------

/// Open `path` and replace the catalogue contents from it.
pub fn load_catalogue(catalog: &mut Catalog, path: &Path) -> Result<usize> {
    let file = File::open(path).map_err(|e| PricebookError::Io {
        path: path.to_path_buf(),
        operation: "open",
        source: e,
    })?;

    let count = catalog.load(BufReader::new(file))?;
    tracing::info!(path = %path.display(), count, "Catalogue loaded");
    Ok(count)
}

/// Create (truncating) `path` and write the whole catalogue to it.
pub fn save_catalogue(catalog: &Catalog, path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|e| PricebookError::Io {
        path: path.to_path_buf(),
        operation: "create",
        source: e,
    })?;

    let mut writer = BufWriter::new(file);
    let count = catalog
        .save(&mut writer)
        .map_err(|e| PricebookError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
    writer.flush().map_err(|e| PricebookError::Io {
        path: path.to_path_buf(),
        operation: "write",
        source: e,
    })?;

    tracing::info!(path = %path.display(), count, "Catalogue saved");
    Ok(count)
}

// ---------------------------------------------------------------------------
// Menu handlers
// ---------------------------------------------------------------------------

fn handle_load<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(raw) = prompt(input, output, "File name: ")? else {
        return Ok(());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return writeln!(output, "No file name given.");
    }

    match load_catalogue(catalog, Path::new(trimmed)) {
        Ok(count) => writeln!(output, "Catalogue loaded ({count} products)."),
        Err(e) => report(output, &e),
    }
}

fn handle_save<R: BufRead, W: Write>(
    catalog: &Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(raw) = prompt(input, output, "File name: ")? else {
        return Ok(());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return writeln!(output, "No file name given.");
    }

    match save_catalogue(catalog, Path::new(trimmed)) {
        Ok(count) => writeln!(output, "Catalogue saved ({count} products)."),
        Err(e) => report(output, &e),
    }
}

fn handle_view<W: Write>(catalog: &Catalog, output: &mut W) -> io::Result<()> {
    if catalog.is_empty() {
        return writeln!(output, "Catalogue is empty.");
    }
    render_table(output, catalog.products())
}

fn handle_add<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(code) = prompt_number::<u32, _, _>(input, output, "Code: ")? else {
        return Ok(());
    };
    let Some(name) = prompt(input, output, "Name: ")? else {
        return Ok(());
    };
    let Some(kind) = prompt(input, output, "Kind: ")? else {
        return Ok(());
    };
    let Some(base_price) = prompt_number::<f64, _, _>(input, output, "Base price: ")? else {
        return Ok(());
    };
    let Some(discount) = prompt_number::<f64, _, _>(input, output, "Discount (%): ")? else {
        return Ok(());
    };

    catalog.add(Product::new(
        code,
        name.trim(),
        kind.trim(),
        base_price,
        discount,
    ));
    writeln!(output, "Product added.")
}

fn handle_delete<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(raw) = prompt(input, output, "Row number (starting at 0): ")? else {
        return Ok(());
    };

    // Parsed as signed so a negative entry is reported as out of range
    // rather than as a number format error.
    let index = match raw.trim().parse::<i64>() {
        Ok(n) => n,
        Err(_) => return writeln!(output, "Not a number: '{}'.", raw.trim()),
    };

    if index < 0 {
        return writeln!(
            output,
            "Row {index} is out of range for a catalogue of {} products",
            catalog.len()
        );
    }

    match catalog.delete_at(index as usize) {
        Ok(removed) => writeln!(output, "Removed '{}'.", removed.name),
        Err(e) => report(output, &e),
    }
}

fn handle_search<R: BufRead, W: Write>(
    catalog: &Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(code) = prompt_number::<u32, _, _>(input, output, "Code: ")? else {
        return Ok(());
    };

    match catalog.search_by_code(code) {
        Some(product) => render_table(output, [product]),
        None => writeln!(output, "No product with code {code}."),
    }
}

fn handle_select<R: BufRead, W: Write>(
    catalog: &Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(min) = prompt_number::<f64, _, _>(input, output, "Minimum price: ")? else {
        return Ok(());
    };
    let Some(max) = prompt_number::<f64, _, _>(input, output, "Maximum price: ")? else {
        return Ok(());
    };

    let selected = catalog.select_by_price_range(min, max);
    if selected.is_empty() {
        return writeln!(output, "No products in that price range.");
    }
    render_table(output, selected)
}

fn handle_promo<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(count) =
        prompt_number::<usize, _, _>(input, output, "How many kinds take part? ")?
    else {
        return Ok(());
    };

    let mut kinds: HashSet<String> = HashSet::new();
    for i in 1..=count {
        let Some(kind) = prompt(input, output, &format!("Kind {i}: "))? else {
            return Ok(());
        };
        kinds.insert(kind.trim().to_string());
    }

    let Some(extra) = prompt_number::<f64, _, _>(input, output, "Extra discount (%): ")? else {
        return Ok(());
    };

    let touched = catalog.apply_promo_discount(&kinds, extra);
    writeln!(output, "Promo discount applied to {touched} product(s).")
}

fn handle_remove_cheaper<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    let Some(threshold) =
        prompt_number::<f64, _, _>(input, output, "Sale price threshold: ")?
    else {
        return Ok(());
    };

    let removed = catalog.remove_cheaper_than(threshold);
    writeln!(output, "Removed {removed} product(s) cheaper than {threshold}.")
}

// ---------------------------------------------------------------------------
// Prompt and rendering helpers
// ---------------------------------------------------------------------------

/// Read one line, stripping the terminator. `None` means end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print `label` and read the operator's answer. `None` means end of input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;
    read_line(input)
}

/// Prompt for a number. A non-numeric answer is reported and yields `None`,
/// returning the operator to the menu.
fn prompt_number<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<T>> {
    let Some(raw) = prompt(input, output, label)? else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            writeln!(output, "Not a number: '{}'.", raw.trim())?;
            Ok(None)
        }
    }
}

/// Report a failed operation as a status line. Never terminates the loop.
fn report<W: Write>(output: &mut W, err: &PricebookError) -> io::Result<()> {
    tracing::warn!(error = %err, "Operation failed");
    writeln!(output, "{err}")
}

fn render_table<'a, W: Write>(
    output: &mut W,
    products: impl IntoIterator<Item = &'a Product>,
) -> io::Result<()> {
    let rows: Vec<ProductRow> = products.into_iter().map(ProductRow::from).collect();
    let table = Table::new(rows).with(Style::sharp()).to_string();
    writeln!(output, "{table}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Drive a scripted session against `catalog`, returning the output.
    fn session(catalog: &mut Catalog, script: &str) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        run(catalog, &mut input, &mut output).expect("menu I/O");
        String::from_utf8(output).expect("menu output is UTF-8")
    }

    #[test]
    fn add_then_view_shows_the_product() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "3\n42\nWidget\ntools\n19.99\n5\n2\n0\n");

        assert!(output.contains("Product added."), "output: {output}");
        assert!(output.contains("Widget"), "output: {output}");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.products()[0].code, 42);
    }

    #[test]
    fn view_of_empty_catalogue_says_so() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "2\n0\n");
        assert!(output.contains("Catalogue is empty."));
    }

    #[test]
    fn negative_delete_index_reports_out_of_range() {
        let mut catalog = Catalog::new();
        catalog.add(Product::new(1, "Widget", "tools", 1.0, 0.0));

        let output = session(&mut catalog, "4\n-1\n0\n");

        assert!(output.contains("out of range"), "output: {output}");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn delete_past_end_reports_out_of_range() {
        let mut catalog = Catalog::new();
        catalog.add(Product::new(1, "Widget", "tools", 1.0, 0.0));

        let output = session(&mut catalog, "4\n1\n0\n");

        assert!(output.contains("out of range"), "output: {output}");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn search_miss_is_reported_not_fatal() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "7\n5\n0\n");
        assert!(output.contains("No product with code 5."));
    }

    #[test]
    fn unknown_option_is_reported() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "99\n0\n");
        assert!(output.contains("Unknown option '99'."));
    }

    #[test]
    fn non_numeric_prompt_answer_returns_to_menu() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "3\nnot-a-code\n0\n");
        assert!(output.contains("Not a number: 'not-a-code'."));
        assert!(catalog.is_empty());
    }

    #[test]
    fn promo_session_applies_discount_to_listed_kinds() {
        let mut catalog = Catalog::new();
        catalog.add(Product::new(1, "Widget", "tools", 100.0, 5.0));
        catalog.add(Product::new(2, "Brush", "paint", 10.0, 5.0));

        let output = session(&mut catalog, "9\n1\ntools\n10\n0\n");

        assert!(output.contains("applied to 1 product(s)"), "output: {output}");
        assert_eq!(catalog.products()[0].discount, 15.0);
        assert_eq!(catalog.products()[1].discount, 5.0);
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        let mut catalog = Catalog::new();
        let output = session(&mut catalog, "");
        assert!(output.contains("Select an option:"));
    }

    #[test]
    fn load_and_save_through_the_menu() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.csv");
        let dest = dir.path().join("out.csv");
        std::fs::write(&source, "7,Widget,tools,19.99,5\n").unwrap();

        let mut catalog = Catalog::new();
        let script = format!(
            "1\n{}\n5\n{}\n0\n",
            source.display(),
            dest.display()
        );
        let output = session(&mut catalog, &script);

        assert!(output.contains("Catalogue loaded (1 products)."), "output: {output}");
        assert!(output.contains("Catalogue saved (1 products)."), "output: {output}");
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "7,Widget,tools,19.99,5\n"
        );
    }

    #[test]
    fn load_failure_is_reported_and_loop_continues() {
        let mut catalog = Catalog::new();
        catalog.add(Product::new(1, "Survivor", "tools", 1.0, 0.0));

        let output = session(&mut catalog, "1\n/nonexistent/pricebook-test.csv\n2\n0\n");

        assert!(output.contains("I/O error during open"), "output: {output}");
        assert!(output.contains("Survivor"), "catalogue should be untouched: {output}");
    }
}
