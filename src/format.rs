//! Culture-aware template formatting for formatted lookups.
//!
//! Placeholders take the form `{index[,alignment][:specifier]}`, e.g. `{0}`,
//! `{1,8}`, `{2:N2}` or `{3,-10:F1}`. A positive alignment right-aligns the
//! value in that many columns, a negative one left-aligns it. Literal braces
//! are written `{{` and `}}`.
//!
//! Supported specifiers, each with an optional precision:
//!
//! | Specifier | Arguments | Output |
//! |-----------|-----------|--------|
//! | `N` | numbers | grouped digits, default 2 decimals |
//! | `F` | numbers | fixed point, default 2 decimals |
//! | `P` | numbers | value × 100 with grouping and `%`, default 2 decimals |
//! | `D` | integers | zero-padded to the precision |
//! | `X`, `x` | integers | hexadecimal, zero-padded to the precision |
//!
//! Numbers are rendered with the decimal and group separators of the
//! supplied [`NumberFormat`]. Precision is capped at [`MAX_PRECISION`] and
//! alignment at [`MAX_ALIGNMENT`]; templates exceeding either are rejected.

use crate::culture::NumberFormat;
use crate::error::{LocalizationError, Result};
use std::fmt;

/// Default number of decimals for `N` and `F` specifiers.
const DEFAULT_DECIMALS: usize = 2;

/// Largest precision a specifier may request.
pub const MAX_PRECISION: usize = 99;

/// Largest column width an alignment may request.
pub const MAX_ALIGNMENT: usize = 1000;

/// A value substituted into a format template.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        FormatArg::Text(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        FormatArg::Text(value)
    }
}

impl From<i64> for FormatArg {
    fn from(value: i64) -> Self {
        FormatArg::Integer(value)
    }
}

impl From<i32> for FormatArg {
    fn from(value: i32) -> Self {
        FormatArg::Integer(i64::from(value))
    }
}

impl From<u32> for FormatArg {
    fn from(value: u32) -> Self {
        FormatArg::Integer(i64::from(value))
    }
}

impl From<f64> for FormatArg {
    fn from(value: f64) -> Self {
        FormatArg::Float(value)
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Text(text) => f.write_str(text),
            FormatArg::Integer(value) => write!(f, "{}", value),
            FormatArg::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Apply `args` to `template` using the given number conventions.
///
/// # Errors
/// Returns `LocalizationError::Format` for unbalanced braces, a non-numeric
/// or out-of-range argument index, an unsupported format specifier, or a
/// precision or alignment above its cap.
pub fn format_template(template: &str, args: &[FormatArg], numbers: &NumberFormat) -> Result<String> {
    let fail = |reason: String| LocalizationError::Format {
        template: template.to_string(),
        reason,
    };

    let mut output = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                output.push('{');
            }
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(inner);
                }
                if !closed {
                    return Err(fail("unclosed placeholder".to_string()));
                }

                let (head, spec) = match placeholder.split_once(':') {
                    Some((head, spec)) => (head, Some(spec)),
                    None => (placeholder.as_str(), None),
                };
                let (index, alignment) = match head.split_once(',') {
                    Some((index, alignment)) => (index, Some(parse_alignment(alignment).map_err(fail)?)),
                    None => (head, None),
                };
                let index: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| fail(format!("invalid argument index '{}'", index)))?;
                let arg = args.get(index).ok_or_else(|| {
                    fail(format!(
                        "argument index {} out of range ({} arguments)",
                        index,
                        args.len()
                    ))
                })?;

                let rendered = render(arg, spec, numbers).map_err(fail)?;
                output.push_str(&align(rendered, alignment));
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                output.push('}');
            }
            '}' => return Err(fail("unmatched '}'".to_string())),
            _ => output.push(c),
        }
    }

    Ok(output)
}

/// Render one argument according to an optional specifier.
fn render(arg: &FormatArg, spec: Option<&str>, numbers: &NumberFormat) -> std::result::Result<String, String> {
    let spec = match spec {
        Some(spec) if !spec.is_empty() => spec,
        _ => {
            return Ok(match arg {
                FormatArg::Float(value) => localize_decimal(&value.to_string(), numbers),
                other => other.to_string(),
            })
        }
    };

    let mut spec_chars = spec.chars();
    let letter = spec_chars.next().unwrap_or_default();
    let kind = letter.to_ascii_uppercase();
    let precision = spec_chars.as_str();
    let precision = if precision.is_empty() {
        None
    } else {
        let precision = precision
            .parse::<usize>()
            .map_err(|_| format!("invalid precision in specifier '{}'", spec))?;
        if precision > MAX_PRECISION {
            return Err(format!(
                "precision in specifier '{}' exceeds {}",
                spec, MAX_PRECISION
            ));
        }
        Some(precision)
    };

    match (kind, arg) {
        // Strings ignore numeric specifiers
        (_, FormatArg::Text(text)) => Ok(text.clone()),
        ('N', FormatArg::Integer(value)) => Ok(fixed(*value as f64, precision.unwrap_or(DEFAULT_DECIMALS), true, numbers)),
        ('N', FormatArg::Float(value)) => Ok(fixed(*value, precision.unwrap_or(DEFAULT_DECIMALS), true, numbers)),
        ('F', FormatArg::Integer(value)) => Ok(fixed(*value as f64, precision.unwrap_or(DEFAULT_DECIMALS), false, numbers)),
        ('F', FormatArg::Float(value)) => Ok(fixed(*value, precision.unwrap_or(DEFAULT_DECIMALS), false, numbers)),
        ('D', FormatArg::Integer(value)) => {
            let width = precision.unwrap_or(0);
            let digits = format!("{:0width$}", value.unsigned_abs(), width = width);
            Ok(if *value < 0 { format!("-{}", digits) } else { digits })
        }
        ('D', FormatArg::Float(_)) => Err("specifier 'D' requires an integer argument".to_string()),
        ('P', FormatArg::Integer(value)) => Ok(percent(*value as f64, precision.unwrap_or(DEFAULT_DECIMALS), numbers)),
        ('P', FormatArg::Float(value)) => Ok(percent(*value, precision.unwrap_or(DEFAULT_DECIMALS), numbers)),
        ('X', FormatArg::Integer(value)) => {
            let width = precision.unwrap_or(0);
            Ok(if letter == 'x' {
                format!("{:0width$x}", value, width = width)
            } else {
                format!("{:0width$X}", value, width = width)
            })
        }
        ('X', FormatArg::Float(_)) => Err("specifier 'X' requires an integer argument".to_string()),
        _ => Err(format!("unsupported format specifier '{}'", spec)),
    }
}

/// Fixed-point rendering with optional digit grouping.
fn fixed(value: f64, decimals: usize, grouped: bool, numbers: &NumberFormat) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (integral, fraction) = match rendered.split_once('.') {
        Some((integral, fraction)) => (integral.to_string(), Some(fraction.to_string())),
        None => (rendered, None),
    };

    let integral = if grouped {
        group_digits(&integral, numbers.group_separator)
    } else {
        integral
    };

    let mut output = String::new();
    let is_zero = value.abs() < 0.5 * 10f64.powi(-(decimals as i32));
    if value.is_sign_negative() && !is_zero {
        output.push('-');
    }
    output.push_str(&integral);
    if let Some(fraction) = fraction {
        output.push(numbers.decimal_separator);
        output.push_str(&fraction);
    }
    output
}

fn percent(value: f64, decimals: usize, numbers: &NumberFormat) -> String {
    format!("{}%", fixed(value * 100.0, decimals, true, numbers))
}

fn parse_alignment(text: &str) -> std::result::Result<i64, String> {
    let alignment: i64 = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid alignment '{}'", text))?;
    if alignment.unsigned_abs() > MAX_ALIGNMENT as u64 {
        return Err(format!("alignment {} exceeds {}", alignment, MAX_ALIGNMENT));
    }
    Ok(alignment)
}

/// Pad `rendered` with spaces to the alignment's width.
fn align(rendered: String, alignment: Option<i64>) -> String {
    let alignment = match alignment {
        Some(alignment) => alignment,
        None => return rendered,
    };
    let width = alignment.unsigned_abs() as usize;
    let len = rendered.chars().count();
    if len >= width {
        return rendered;
    }

    let fill = " ".repeat(width - len);
    if alignment < 0 {
        rendered + &fill
    } else {
        fill + &rendered
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(digit);
    }
    grouped
}

/// Swap the '.' of a Rust-rendered decimal for the culture's separator.
fn localize_decimal(rendered: &str, numbers: &NumberFormat) -> String {
    rendered.replacen('.', &numbers.decimal_separator.to_string(), 1)
}
