//! Page number formatting

use crate::constants::MAX_ROMAN;
use crate::options::PageNumberOptions;
use crate::types::NumberFormat;

/// Render `n` in the given format. `total` feeds the `{total}` placeholder
/// of custom templates.
///
/// Roman and alphabetic forms have no representation for zero or negative
/// numbers, those fall back to Arabic digits. So do Roman numbers above
/// [`MAX_ROMAN`].
pub fn format_number(n: i64, format: &NumberFormat, total: usize) -> String {
    match format {
        NumberFormat::Arabic => n.to_string(),
        NumberFormat::Roman if (1..=MAX_ROMAN).contains(&n) => to_roman(n as u64),
        NumberFormat::Letter if n > 0 => to_letters(n as u64),
        NumberFormat::Roman | NumberFormat::Letter => n.to_string(),
        NumberFormat::Custom(template) => template
            .replace("{n}", &n.to_string())
            .replace("{total}", &total.to_string()),
    }
}

/// Lowercase Roman numeral. Values above 3999 repeat `m`; callers bound
/// the input.
pub fn to_roman(mut n: u64) -> String {
    const NUMERALS: [(u64, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut out = String::new();
    for &(value, numeral) in NUMERALS.iter() {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Bijective base-26: 1 → a, 26 → z, 27 → aa, 28 → ab
pub fn to_letters(mut n: u64) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

impl PageNumberOptions {
    /// Label for every page of a `page_count`-page document, `None` where
    /// the page is skipped.
    ///
    /// The first numbered page carries `start_number`; skipped pages do not
    /// advance the counter.
    pub fn labels(&self, page_count: usize) -> Vec<Option<String>> {
        let mut next = self.start_number;
        (0..page_count)
            .map(|index| {
                let skipped = (self.skip_first && index == 0)
                    || (self.skip_last && index + 1 == page_count);
                if skipped {
                    return None;
                }
                let label = format!(
                    "{}{}{}",
                    self.prefix,
                    format_number(next, &self.format, page_count),
                    self.suffix
                );
                next = next.saturating_add(1);
                Some(label)
            })
            .collect()
    }
}
