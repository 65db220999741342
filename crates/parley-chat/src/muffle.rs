//! Distance muffling: progressive degradation of chat text.
//!
//! A listener between the clear range and the falloff range hears only part
//! of a message. Walking the message character by character, an accumulator
//! grows by `distance_sq * 1.25` per eligible character; each time it
//! reaches the threshold `(2 * range)^2` it wraps and that character is
//! muffled. Farther listeners therefore lose more characters, and the
//! overshoot carried across wraps keeps the loss evenly spread.
//!
//! Whitespace and format sequences (`§` plus one code character) are copied
//! verbatim and cost nothing. The caller supplies the accumulator's start
//! offset so two messages at the same distance do not muffle identically.

/// Marker character that introduces a two-character format sequence.
pub const FORMAT_MARKER: char = '§';

/// Format code that renders text as scrambled glyphs.
pub const OBFUSCATE_CODE: char = 'k';

/// Format code that clears all active styles.
pub const RESET_CODE: char = 'r';

/// Growth factor applied to the squared distance per character. Above 1.0
/// so that roughly the outer fifth of the falloff band is fully muffled.
const FALLOFF_SCALE: f64 = 1.25;

/// How a muffled character is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuffleStyle {
    /// Keep the character but wrap runs of muffled characters in the
    /// obfuscation format code, closing the run with a reset code.
    Obfuscate,
    /// Substitute a fixed character, preserving the message length.
    Replace(char),
}

/// A configured muffler for one falloff threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muffler {
    /// Squared falloff range; the accumulator wraps at this value.
    threshold: f64,
    /// Rendering of muffled characters.
    style: MuffleStyle,
}

impl Muffler {
    /// Create a muffler wrapping at `threshold` (a squared distance).
    pub const fn new(threshold: f64, style: MuffleStyle) -> Self {
        Self { threshold, style }
    }

    /// The squared falloff range.
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The configured rendering style.
    pub const fn style(&self) -> MuffleStyle {
        self.style
    }

    /// Muffle `message` as heard from `distance_sq` away, starting the
    /// accumulator at `start_offset`.
    pub fn muffle(&self, message: &str, distance_sq: f64, start_offset: f64) -> String {
        degrade(message, distance_sq, self.threshold, start_offset, self.style)
    }
}

/// Degrade `message` for a listener `distance_sq` away.
///
/// Deterministic for a given `start_offset`. A non-positive or non-finite
/// threshold disables muffling entirely.
pub fn degrade(
    message: &str,
    distance_sq: f64,
    threshold: f64,
    start_offset: f64,
    style: MuffleStyle,
) -> String {
    if !threshold.is_finite() || threshold <= 0.0 {
        return message.to_owned();
    }

    let step = distance_sq * FALLOFF_SCALE;
    let mut out = String::with_capacity(message.len());
    let mut progress = start_offset;
    let mut obfuscated = false;
    let mut chars = message.chars();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            out.push(c);
            continue;
        }

        if c == FORMAT_MARKER {
            out.push(c);
            if let Some(code) = chars.next() {
                out.push(code);
            }
            // A format code resets styles client-side, so an open
            // obfuscated run has to be reopened.
            if obfuscated {
                out.push(FORMAT_MARKER);
                out.push(OBFUSCATE_CODE);
            }
            continue;
        }

        progress += step;
        if progress >= threshold {
            progress -= threshold;
            match style {
                MuffleStyle::Obfuscate => {
                    if !obfuscated {
                        out.push(FORMAT_MARKER);
                        out.push(OBFUSCATE_CODE);
                        obfuscated = true;
                    }
                    out.push(c);
                }
                MuffleStyle::Replace(replacement) => out.push(replacement),
            }
        } else {
            if obfuscated {
                out.push(FORMAT_MARKER);
                out.push(RESET_CODE);
                obfuscated = false;
            }
            out.push(c);
        }
    }

    out
}
