//! Fixed column field formatting
use itertools::Itertools;
use log::error;

use std::io::Write;

/// Every RINEX line is exactly this long (newline excluded)
pub const LINE_WIDTH: usize = 80;

/// Header content area, the label starts right after
pub const CONTENT_WIDTH: usize = 60;

/// Header label width
pub const LABEL_WIDTH: usize = 20;

const RULER: &str =
    "----|---1|0---|---2|0---|---3|0---|---4|0---|---5|0---|---6|0---|---7|0---|---8|";

/// Formats `value` as a Fortran exponential field: `[-]0.dddd<marker>±ee`,
/// with `precision` mantissa digits, right justified in `width`.
/// Rust only knows how to print single digit exponents with a `1.dddde5` mantissa,
/// so the mantissa is shifted and the exponent reworked here.
/// Non finite values are formatted as zero.
pub fn fortran_exp(value: f64, width: usize, precision: usize, marker: char) -> String {
    let (mantissa, exponent) = if value == 0.0 || !value.is_finite() {
        ("0".repeat(precision.max(1)), 0)
    } else {
        let scientific = format!("{:.*e}", precision.saturating_sub(1), value.abs());
        let (digits, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
        let exponent = exponent.parse::<i32>().unwrap_or(0);
        (digits.replace('.', ""), exponent + 1)
    };

    let sign = if value < 0.0 && value.is_finite() {
        "-"
    } else {
        ""
    };

    let exponent_sign = if exponent < 0 { '-' } else { '+' };

    let field = format!(
        "{}0.{}{}{}{:02}",
        sign,
        mantissa,
        marker,
        exponent_sign,
        exponent.abs()
    );

    right_justify(&field, width)
}

/// Formats `value` with fixed `precision` decimals
pub fn fixed_decimal(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Left justifies `content` in a `width` wide field, padded with blanks.
pub fn left_justify(content: &str, width: usize) -> String {
    format!("{:<width$}", content, width = width)
}

/// Right justifies `content` in a `width` wide field, padded with blanks.
pub fn right_justify(content: &str, width: usize) -> String {
    format!("{:>width$}", content, width = width)
}

/// Formats `value` in exactly `width` characters, left padded with `pad`.
/// Only the `width` right-most characters are retained,
/// so a 4 digit year with `width=2` gives the two digit year.
pub fn fixed_width<T: std::fmt::Display>(value: T, width: usize, pad: char) -> String {
    let digits = value.to_string();
    let len = digits.chars().count();
    if len >= width {
        digits.chars().skip(len - width).collect()
    } else {
        let mut field = std::iter::repeat(pad).take(width - len).collect::<String>();
        field.push_str(&digits);
        field
    }
}

/// Builds a header line: `content` over the first 60 columns, `label` over the last 20.
pub fn header_line(content: &str, label: &str) -> String {
    format!(
        "{:<cw$.cw$}{:<lw$}",
        content,
        label,
        cw = CONTENT_WIDTH,
        lw = LABEL_WIDTH,
    )
}

/// Builds as many COMMENT lines as needed to fit `content`
pub fn comment_lines(content: &str) -> Vec<String> {
    let chunks = content.chars().chunks(CONTENT_WIDTH);
    let lines = chunks
        .into_iter()
        .map(|chunk| header_line(&chunk.collect::<String>(), "COMMENT"))
        .collect::<Vec<_>>();
    lines
}

/// Blank pads a record line to the standard width
pub fn pad_line(line: &str) -> String {
    left_justify(line, LINE_WIDTH)
}

/// Returns true when `line` respects the standard width, logs an error otherwise.
pub fn check_length(line: &str) -> bool {
    let len = line.len();
    if len == LINE_WIDTH {
        true
    } else {
        error!(
            "bad RINEX line: {} characters (must be {})\n{}\n{}",
            len, LINE_WIDTH, line, RULER
        );
        false
    }
}

/// Checks and writes a single line. A bad line length is not fatal,
/// the line is written anyway.
pub fn write_line<W: Write>(w: &mut W, line: &str) -> std::io::Result<()> {
    let _ = check_length(line);
    writeln!(w, "{}", line)
}
