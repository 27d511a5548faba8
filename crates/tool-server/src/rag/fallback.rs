//! Built-in glossary used when no index has been loaded

use super::store::GlossaryEntry;

const FALLBACK_TERMS: &[(&str, &str)] = &[
    (
        "Gross Margin",
        "Revenue minus cost of goods sold, expressed as a percentage of revenue.",
    ),
    (
        "Operating Margin",
        "Operating income divided by revenue; shows profit from core operations before interest and taxes.",
    ),
    (
        "EBITDA",
        "Earnings before interest, taxes, depreciation and amortization; a proxy for operating cash generation.",
    ),
    (
        "Net Present Value",
        "The present value of future cash flows discounted at the cost of capital, minus the initial investment.",
    ),
    (
        "Internal Rate of Return",
        "The discount rate at which the net present value of a project's cash flows equals zero.",
    ),
    (
        "Return on Investment",
        "Gain from an investment relative to its cost, usually expressed as a percentage.",
    ),
    (
        "Working Capital",
        "Current assets minus current liabilities; the liquidity available for day-to-day operations.",
    ),
    (
        "Customer Acquisition Cost",
        "Total sales and marketing spend divided by the number of new customers acquired.",
    ),
    (
        "Customer Lifetime Value",
        "The total margin a customer is expected to generate over the whole relationship.",
    ),
    (
        "Break-even Point",
        "The sales volume at which total revenue equals total fixed and variable costs.",
    ),
    (
        "Weighted Average Cost of Capital",
        "The blended rate a company pays for capital, weighting the cost of debt and equity by their share.",
    ),
    (
        "Market Share",
        "A company's sales as a percentage of total sales in its market.",
    ),
];

/// The static fallback dataset
pub fn fallback_entries() -> Vec<GlossaryEntry> {
    FALLBACK_TERMS
        .iter()
        .map(|(term, definition)| GlossaryEntry::new(*term, *definition))
        .collect()
}
