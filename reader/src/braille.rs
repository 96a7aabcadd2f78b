//! Grade-1 Braille transcription.

/// Braille cells for `a` through `z`.
const LETTERS: [char; 26] = [
    '⠁', '⠃', '⠉', '⠙', '⠑', '⠋', '⠛', '⠓', '⠊', '⠚', '⠅', '⠇', '⠍', '⠝', '⠕', '⠏', '⠟', '⠗',
    '⠎', '⠞', '⠥', '⠧', '⠺', '⠭', '⠽', '⠵',
];

/// Transcribe text into uncontracted Braille.
///
/// Letters are lowercased first. Anything that is not an ASCII letter
/// (spaces, digits, punctuation) passes through unchanged.
pub fn to_braille(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if c.is_ascii_lowercase() {
                LETTERS[(c as u8 - b'a') as usize]
            } else {
                c
            }
        })
        .collect()
}
