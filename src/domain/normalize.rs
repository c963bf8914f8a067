use caseless::Caseless;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds `value` to the form used for fuzzy comparison: case-folded with
/// accents removed, so "Motörhead" and "motorhead" compare equal.
pub fn normalize(value: &str) -> String {
    if value.is_ascii() {
        return value.to_ascii_lowercase();
    }
    normalize_indexed(value).into_iter().map(|(c, _)| c).collect()
}

/// Same folding as [`normalize`], with each output char paired with the index
/// of the source char in `value` it came from.
///
/// Every source char is folded on its own. Combining marks fold to nothing, so
/// decomposed and precomposed input yield the same chars, and `ß` yields two.
pub fn normalize_indexed(value: &str) -> Vec<(char, usize)> {
    let mut folded = Vec::with_capacity(value.len());
    for (index, c) in value.chars().enumerate() {
        if c.is_ascii() {
            folded.push((c.to_ascii_lowercase(), index));
            continue;
        }
        // Recompose after stripping marks so scripts like Hangul keep one char per syllable.
        folded.extend(
            std::iter::once(c)
                .default_case_fold()
                .nfd()
                .filter(|c| !is_combining_mark(*c))
                .nfc()
                .map(|c| (c, index)),
        );
    }
    folded
}
