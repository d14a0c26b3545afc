//! `printf`-style formatting
//!
//! [`format_printf`] walks the raw format text once. It decodes backslash
//! escapes and expands conversions: `%d %i %u %x %X %o %f %F %e %E %g %G %c
//! %s %%`, with flags (`-`, `0`, `+`, space, `#`), width, `.precision`
//! (either may be `*`) and ignored length modifiers (`h`, `l`, `ll`, `L`, `z`).
//! A conversion with no argument left is copied to the output verbatim, as
//! is one whose width or precision exceeds [`MAX_FIELD_WIDTH`].

use crate::memory::value::Value;

/// Largest width or precision a conversion may ask for
pub const MAX_FIELD_WIDTH: usize = 4096;

/// Decode C escape sequences in raw string literal text.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next) => push_escape(&mut out, next),
            None => out.push('\\'),
        }
    }

    out
}

fn push_escape(out: &mut String, escaped: char) {
    match escaped {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'a' => out.push('\u{7}'),
        '0' => out.push('\0'),
        '\\' => out.push('\\'),
        '"' => out.push('"'),
        '\'' => out.push('\''),
        other => {
            out.push('\\');
            out.push(other);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alt: bool,
}

/// One parsed `%...` conversion
#[derive(Debug)]
struct Conversion {
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    long: bool,
    kind: char,
    /// Original text, echoed when the argument is missing
    raw: String,
}

/// Format `format` (raw literal text) against `args`.
pub fn format_printf(format: &str, args: &[Value]) -> String {
    let mut output = String::new();
    let mut chars = format.chars().peekable();
    let mut args = args.iter();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next) => push_escape(&mut output, next),
                None => output.push('\\'),
            },
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    output.push('%');
                    continue;
                }
                let mut conv = match parse_conversion(&mut chars) {
                    Ok(conv) => conv,
                    Err(raw) => {
                        output.push_str(&raw);
                        continue;
                    }
                };
                if conv.width == Some(usize::MAX) {
                    conv.width = take_star(&mut args, &mut conv.flags);
                }
                if conv.precision == Some(usize::MAX) {
                    conv.precision = take_star(&mut args, &mut Flags::default());
                }
                if conv.width.max(conv.precision).is_some_and(|n| n > MAX_FIELD_WIDTH) {
                    args.next();
                    output.push_str(&conv.raw);
                    continue;
                }
                match args.next() {
                    Some(arg) => output.push_str(&render(&conv, arg)),
                    None => output.push_str(&conv.raw),
                }
            }
            _ => output.push(ch),
        }
    }

    output
}

/// `*` width/precision: negative width means left-justify.
fn take_star<'a>(args: &mut impl Iterator<Item = &'a Value>, flags: &mut Flags) -> Option<usize> {
    let n = args.next()?.as_int()?;
    if n < 0 {
        flags.left = true;
    }
    usize::try_from(n.unsigned_abs()).ok()
}

/// Parse the text after `%`; an unknown conversion hands back what was read.
fn parse_conversion(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Conversion, String> {
    let mut raw = String::from("%");
    let mut flags = Flags::default();

    while let Some(&c) = chars.peek() {
        match c {
            '-' => flags.left = true,
            '0' => flags.zero = true,
            '+' => flags.plus = true,
            ' ' => flags.space = true,
            '#' => flags.alt = true,
            _ => break,
        }
        raw.push(c);
        chars.next();
    }

    let width = read_count(chars, &mut raw);

    let precision = if chars.peek() == Some(&'.') {
        raw.push('.');
        chars.next();
        Some(read_count(chars, &mut raw).unwrap_or(0))
    } else {
        None
    };

    let mut long = false;
    while let Some(&c) = chars.peek() {
        if !matches!(c, 'h' | 'l' | 'L' | 'z' | 'j' | 't') {
            break;
        }
        long |= c == 'l' || c == 'L' || c == 'z' || c == 'j';
        raw.push(c);
        chars.next();
    }

    let Some(&kind) = chars.peek() else {
        return Err(raw);
    };
    if !matches!(
        kind,
        'd' | 'i' | 'u' | 'x' | 'X' | 'o' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'c' | 's'
    ) {
        return Err(raw);
    }
    raw.push(kind);
    chars.next();

    Ok(Conversion {
        flags,
        width,
        precision,
        long,
        kind,
        raw,
    })
}

/// Digits, or `*` (returned as `usize::MAX` for the caller to resolve).
/// Counts past [`MAX_FIELD_WIDTH`] are capped just above it.
fn read_count(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, raw: &mut String) -> Option<usize> {
    if chars.peek() == Some(&'*') {
        raw.push('*');
        chars.next();
        return Some(usize::MAX);
    }
    let mut digits = String::new();
    while let Some(&c) = chars.peek().filter(|c| c.is_ascii_digit()) {
        digits.push(c);
        raw.push(c);
        chars.next();
    }
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().map_or(MAX_FIELD_WIDTH + 1, |n: usize| n.min(MAX_FIELD_WIDTH + 1)))
}

fn render(conv: &Conversion, arg: &Value) -> String {
    let flags = conv.flags;
    match conv.kind {
        'd' | 'i' => {
            let n = arg.as_int().unwrap_or(0);
            let n = if conv.long { n } else { i64::from(n as i32) };
            let digits = zero_extend(n.unsigned_abs().to_string(), conv.precision);
            pad_number(sign_for(n < 0, flags), "", digits, conv)
        }
        'u' | 'x' | 'X' | 'o' => {
            let n = arg.as_int().unwrap_or(0);
            let n = if conv.long { n as u64 } else { u64::from(n as u32) };
            let digits = match conv.kind {
                'x' => format!("{:x}", n),
                'X' => format!("{:X}", n),
                'o' => format!("{:o}", n),
                _ => n.to_string(),
            };
            let prefix = match conv.kind {
                'x' if flags.alt && n != 0 => "0x",
                'X' if flags.alt && n != 0 => "0X",
                'o' if flags.alt => "0",
                _ => "",
            };
            pad_number("", prefix, zero_extend(digits, conv.precision), conv)
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let x = arg.as_float().unwrap_or(0.0);
            let body = format_float(x.abs(), conv);
            let negative = x.is_sign_negative() && !x.is_nan();
            if x.is_finite() {
                pad_number(sign_for(negative, flags), "", body, conv)
            } else {
                pad_text(format!("{}{}", sign_for(negative, flags), body), conv)
            }
        }
        'c' => {
            let c = match arg {
                Value::Str(s) => s.chars().next().unwrap_or('\0'),
                other => other.as_int().map(|n| (n as u8) as char).unwrap_or('\0'),
            };
            pad_text(c.to_string(), conv)
        }
        _ => {
            let text = arg.to_string();
            let text = match conv.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            };
            pad_text(text, conv)
        }
    }
}

fn sign_for(negative: bool, flags: Flags) -> &'static str {
    if negative {
        "-"
    } else if flags.plus {
        "+"
    } else if flags.space {
        " "
    } else {
        ""
    }
}

fn zero_extend(digits: String, precision: Option<usize>) -> String {
    match precision {
        Some(0) if digits == "0" => String::new(),
        Some(p) if digits.len() < p => format!("{}{}", "0".repeat(p - digits.len()), digits),
        _ => digits,
    }
}

/// Apply width to sign + prefix + digits; `0` pads between sign and digits.
fn pad_number(sign: &str, prefix: &str, digits: String, conv: &Conversion) -> String {
    let len = sign.chars().count() + prefix.len() + digits.chars().count();
    let width = conv.width.unwrap_or(0);
    if len >= width {
        return format!("{sign}{prefix}{digits}");
    }
    let fill = width - len;
    let is_integer = matches!(conv.kind, 'd' | 'i' | 'u' | 'x' | 'X' | 'o');
    if conv.flags.left {
        format!("{sign}{prefix}{digits}{}", " ".repeat(fill))
    } else if conv.flags.zero && !(is_integer && conv.precision.is_some()) {
        format!("{sign}{prefix}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{sign}{prefix}{digits}", " ".repeat(fill))
    }
}

fn pad_text(text: String, conv: &Conversion) -> String {
    let len = text.chars().count();
    let width = conv.width.unwrap_or(0);
    if len >= width {
        text
    } else if conv.flags.left {
        format!("{text}{}", " ".repeat(width - len))
    } else {
        format!("{}{text}", " ".repeat(width - len))
    }
}

/// Format a non-negative float for `%f`, `%e` or `%g`.
fn format_float(x: f64, conv: &Conversion) -> String {
    let upper = conv.kind.is_ascii_uppercase();
    if x.is_nan() {
        return if upper { "NAN" } else { "nan" }.to_string();
    }
    if x.is_infinite() {
        return if upper { "INF" } else { "inf" }.to_string();
    }

    let precision = conv.precision.unwrap_or(6);
    match conv.kind {
        'f' | 'F' => {
            let mut s = format!("{:.*}", precision, x);
            if conv.flags.alt && precision == 0 {
                s.push('.');
            }
            s
        }
        'e' | 'E' => format_exponent(x, precision, upper),
        _ => {
            let p = precision.max(1);
            let exponent = decimal_exponent(x, p - 1);
            let mut s = if exponent < -4 || exponent >= p as i32 {
                format_exponent(x, p - 1, upper)
            } else {
                let decimals = usize::try_from(p as i32 - 1 - exponent).unwrap_or(0);
                format!("{:.*}", decimals, x)
            };
            if !conv.flags.alt {
                s = strip_trailing_zeros(&s);
            }
            s
        }
    }
}

/// Exponent of `x` once rounded to `precision` digits after the point.
fn decimal_exponent(x: f64, precision: usize) -> i32 {
    let s = format!("{:.*e}", precision, x);
    s.split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

/// C-style scientific notation: `1.500000e+02`
fn format_exponent(x: f64, precision: usize, upper: bool) -> String {
    let s = format!("{:.*e}", precision, x);
    let (mantissa, exp) = s.split_once('e').unwrap_or((s.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let e = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}{e}{sign}{:02}", exp.unsigned_abs())
}

fn strip_trailing_zeros(s: &str) -> String {
    let (mantissa, exponent) = match s.find(|c| c == 'e' || c == 'E') {
        Some(pos) => (&s[..pos], &s[pos..]),
        None => (s, ""),
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    format!("{mantissa}{exponent}")
}
