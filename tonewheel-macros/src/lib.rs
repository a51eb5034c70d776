use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};

/// Number of drawbars on one manual.
const DRAWBARS: usize = 9;

/// Highest drawbar level.
const MAX_LEVEL: u8 = 8;

/// Creates a `Registration` at compile time from a drawbar string.
///
/// The string holds nine digits, one per drawbar from 16' to 1', each in
/// the range `0..=8`. Surrounding whitespace is trimmed and spaces and
/// dashes are ignored, so the conventional grouping `"88 8000 000"` reads
/// the same as `"888000000"`, exactly as `Registration::from_str` does.
///
/// An invalid string is a compile error rather than a runtime failure.
///
/// # Examples
///
/// ```ignore
/// use tonewheel::registration;
///
/// let full_organ = registration!("88 8888 888");
/// let jazz = registration!("88 8000 000");
/// ```
#[proc_macro]
pub fn registration(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LitStr);
    let text = input.value();

    match parse_levels(&text) {
        Ok(levels) => {
            let expanded = quote! {
                {
                    tonewheel::Registration::new([#(#levels),*])
                }
            };

            TokenStream::from(expanded)
        }
        Err(e) => {
            let error_msg = format!("Invalid registration '{}': {}", text, e);
            let expanded = quote! {
                compile_error!(#error_msg)
            };
            TokenStream::from(expanded)
        }
    }
}

fn parse_levels(s: &str) -> Result<[u8; DRAWBARS], String> {
    let digits: Vec<char> = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if digits.is_empty() {
        return Err("empty string".to_string());
    }
    if digits.len() != DRAWBARS {
        return Err(format!(
            "expected {} drawbar levels, found {}",
            DRAWBARS,
            digits.len()
        ));
    }

    let mut levels = [0u8; DRAWBARS];
    for (slot, c) in levels.iter_mut().zip(digits) {
        *slot = match c.to_digit(10) {
            Some(level) if level <= MAX_LEVEL as u32 => level as u8,
            _ => return Err(format!("invalid drawbar level '{}'", c)),
        };
    }

    Ok(levels)
}
