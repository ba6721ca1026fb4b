use std::fmt::Write;

use crate::ResultsView;

pub const RESULTS_HEADER: &str = "Results:";
pub const SEPARATOR: &str = "--------------------------------------------";

/// Renders the result listing printed after a search.
pub fn render_results(view: &ResultsView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RESULTS_HEADER}");
    let _ = writeln!(out, "{SEPARATOR}");
    for row in &view.rows {
        let _ = writeln!(out, "Product: {}", row.name);
        for price in &row.prices {
            let _ = writeln!(out, "Price: {price}");
        }
        for quantity in &row.quantities {
            let _ = writeln!(out, "Quantity: {quantity}");
        }
        let _ = writeln!(out, "{SEPARATOR}");
    }
    let _ = writeln!(out, "{} match(es).", view.total);
    out
}
