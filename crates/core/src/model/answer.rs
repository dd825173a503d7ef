use thiserror::Error;

/// Reasons a raw answer could not be read as an integer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("answer is empty")]
    Empty,
    #[error("answer is not a number: {raw:?}")]
    NotANumber { raw: String },
    #[error("answer is out of range: {raw:?}")]
    OutOfRange { raw: String },
}

/// Parses user input into an integer answer.
///
/// Parsing is lenient about what follows the number: leading whitespace is
/// skipped, an optional sign is accepted and the leading run of digits is
/// used, so `"12abc"` reads as 12 and `"3.9"` as 3.
///
/// # Errors
///
/// Returns `AnswerError::Empty` for blank input, `AnswerError::NotANumber`
/// when no digits lead the input and `AnswerError::OutOfRange` when the
/// digits do not fit in an `i64`.
pub fn parse_answer(raw: &str) -> Result<i64, AnswerError> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return Err(AnswerError::Empty);
    }

    let (negative, rest) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let digit_count = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return Err(AnswerError::NotANumber {
            raw: raw.to_owned(),
        });
    }

    let digits = &rest[..digit_count];
    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_owned()
    };
    signed.parse::<i64>().map_err(|_| AnswerError::OutOfRange {
        raw: raw.to_owned(),
    })
}
