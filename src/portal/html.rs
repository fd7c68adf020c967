//! HTML extraction for the portal pages.
//!
//! Two contracts:
//! - hidden tokens: the `value` of every `<input type="hidden">`, in document order;
//! - the usage report: four tables inside the usage block, one designated
//!   cell each, addressed by position.
//!
//! The report has no stable ids or names, so table order is the only key.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, UsageError};
use crate::usage::UsageFigures;

/// Class marker of the container that holds the four usage tables.
pub const USAGE_BLOCK_CLASSES: &str = "list-toggle-content js-toggle-content m-top-20";

static HIDDEN_INPUT_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"input[type="hidden"]"#).unwrap());
static USAGE_BLOCK_SEL: Lazy<Selector> = Lazy::new(|| {
    let compound: String = USAGE_BLOCK_CLASSES
        .split_whitespace()
        .map(|c| format!(".{}", c))
        .collect();
    Selector::parse(&compound).unwrap()
});
static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TBODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tbody").unwrap());
static TR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static TD_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// Number of tables the usage block must contain.
pub const REQUIRED_TABLES: usize = 4;

/// (table index, row index, field name) for each figure, zero-based.
const CELL_POSITIONS: [(usize, usize, &str); REQUIRED_TABLES] = [
    (0, 0, "carried_over"),
    (1, 1, "base_allowance"),
    (2, 0, "paid_addon"),
    (3, 0, "used"),
];

/// Values of all hidden inputs in document order. A hidden input without a
/// `value` attribute contributes an empty string.
pub fn hidden_input_values(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&HIDDEN_INPUT_SEL)
        .map(|input| input.value().attr("value").unwrap_or_default().to_string())
        .collect()
}

/// Value of the first hidden input, if any.
pub fn first_hidden_value(html: &str) -> Option<String> {
    hidden_input_values(html).into_iter().next()
}

/// Parse the report page into the four raw figures.
///
/// # Errors
///
/// - `ReportUnavailable` when the usage block is missing.
/// - `ReportMalformed` when there are fewer than four tables, a designated
///   row or cell is missing, or a cell is not a non-negative number.
pub fn parse_usage_report(html: &str) -> Result<UsageFigures> {
    let document = Html::parse_document(html);
    let block = document.select(&USAGE_BLOCK_SEL).next().ok_or_else(|| {
        UsageError::ReportUnavailable(format!(
            "usage block '{}' not found in report page",
            USAGE_BLOCK_CLASSES
        ))
    })?;

    let tables: Vec<ElementRef> = block.select(&TABLE_SEL).collect();
    if tables.len() < REQUIRED_TABLES {
        return Err(UsageError::ReportMalformed(format!(
            "expected at least {} tables in usage block, found {}",
            REQUIRED_TABLES,
            tables.len()
        )));
    }

    let mut values = [0.0f64; REQUIRED_TABLES];
    for (slot, (table_idx, row_idx, field)) in values.iter_mut().zip(CELL_POSITIONS) {
        *slot = read_cell(tables[table_idx], row_idx, field)?;
    }

    Ok(UsageFigures {
        carried_over_gb: values[0],
        base_allowance_gb: values[1],
        paid_addon_gb: values[2],
        used_gb: values[3],
    })
}

fn read_cell(table: ElementRef<'_>, row_idx: usize, field: &str) -> Result<f64> {
    let malformed = |what: &str| UsageError::ReportMalformed(format!("{}: {}", field, what));

    let tbody = table
        .select(&TBODY_SEL)
        .next()
        .ok_or_else(|| malformed("table has no body"))?;
    let row = tbody
        .select(&TR_SEL)
        .nth(row_idx)
        .ok_or_else(|| malformed(&format!("row {} missing", row_idx + 1)))?;
    let cell = row
        .select(&TD_SEL)
        .next()
        .ok_or_else(|| malformed(&format!("row {} has no data cell", row_idx + 1)))?;

    let text: String = cell.text().collect();
    parse_quantity(&text).ok_or_else(|| malformed(&format!("not a quantity: {:?}", text.trim())))
}

/// Parse a cell like `"\t2.5\nGB\t"` into `2.5`.
///
/// Strips tabs, newlines and surrounding whitespace plus a trailing `GB`
/// unit. Only finite, non-negative numbers are accepted.
pub fn parse_quantity(text: &str) -> Option<f64> {
    let squashed: String = text
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();
    let trimmed = squashed.trim();
    let number = strip_unit(trimmed).trim();
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn strip_unit(text: &str) -> &str {
    let len = text.len();
    if len >= 2 && text.is_char_boundary(len - 2) && text[len - 2..].eq_ignore_ascii_case("gb") {
        &text[..len - 2]
    } else {
        text
    }
}
