//! Display helpers: tenge prices and placeholder product images

use askama::Template;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

const GROUP_SEPARATOR: char = '\u{a0}';
const BRAND_RED: &str = "#e30613";

/// Format a price the way the `ru-RU` locale does, with the tenge sign.
///
/// Thousands are separated by a no-break space, the decimal separator is a
/// comma and at most three fraction digits are kept.
pub fn format_price(price: Decimal) -> String {
    let rounded = price
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out.push_str(" ₸");
    out
}

/// Placeholder artwork: brand stripe along the bottom, product name on top
#[derive(Template)]
#[template(path = "placeholder.svg", escape = "html")]
struct PlaceholderSvg<'a> {
    text: &'a str,
    accent: &'a str,
}

/// Build an SVG data URI showing `text`, used when a product has no image
pub fn placeholder_image(text: &str) -> String {
    let svg = PlaceholderSvg {
        text,
        accent: BRAND_RED,
    }
    .render()
    .unwrap_or_else(|e| {
        warn!("Placeholder for {:?} failed to render: {}", text, e);
        String::new()
    });
    format!(
        "data:image/svg+xml;charset=utf-8,{}",
        urlencoding::encode(&svg)
    )
}
