// Mon Jan 19 2026 - Alex

use itertools::Itertools;

const INTEGRAL_WORDS: [&str; 6] = ["char", "short", "long", "signed", "int", "bool"];

/// Map a raw integral spelling plus its concrete width to a fixed-width name.
///
/// Word order is irrelevant (`long unsigned int` and `unsigned long int` are
/// the same type). Integral words match anywhere in the spelling, so
/// `wchar_t`, `char16_t` and `__int128` are integral too. Floating point
/// spellings, non-integral names and widths outside 8..=128 come back
/// unchanged. `bool` is kept as is when `preserve_bool` is set, otherwise it
/// is treated as an unsigned integer.
pub fn normalize_integral(raw_name: &str, size_bits: u64, preserve_bool: bool) -> String {
    let sorted = raw_name.split_whitespace().sorted().join(" ");
    let has = |word: &str| sorted.contains(word);

    if has("double") {
        return raw_name.to_string();
    }

    let mut is_unsigned = has("unsigned");
    if has("bool") {
        if preserve_bool {
            return raw_name.to_string();
        }
        is_unsigned = true;
    }

    if !INTEGRAL_WORDS.iter().any(|w| has(*w)) {
        return raw_name.to_string();
    }

    let base = match size_bits {
        8 => "int8_t",
        16 => "int16_t",
        32 => "int32_t",
        64 => "int64_t",
        128 => "int128_t",
        _ => return raw_name.to_string(),
    };

    if is_unsigned {
        format!("u{}", base)
    } else {
        base.to_string()
    }
}
