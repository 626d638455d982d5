//! Password generation and policy checks

use crate::error::{CliError, CliResult};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Length of generated passwords
pub const DEFAULT_LENGTH: usize = 12;

/// Shortest password the policy accepts
pub const MIN_LENGTH: usize = 6;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()-_=+[]{}|;:,.<>/?";

/// A single policy violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    TooShort,
    MissingLowercase,
    MissingUppercase,
    MissingDigit,
    MissingSpecial,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooShort => write!(f, "at least {MIN_LENGTH} characters"),
            Violation::MissingLowercase => write!(f, "a lowercase letter"),
            Violation::MissingUppercase => write!(f, "an uppercase letter"),
            Violation::MissingDigit => write!(f, "a digit"),
            Violation::MissingSpecial => write!(f, "a special character"),
        }
    }
}

/// Every rule the password breaks, in a stable order
///
/// Any character that is not an ASCII letter or digit counts as special.
pub fn check(password: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_LENGTH {
        violations.push(Violation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(Violation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(Violation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(Violation::MissingDigit);
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        violations.push(Violation::MissingSpecial);
    }
    violations
}

/// Reject passwords that break the policy
pub fn validate(password: &str) -> CliResult<()> {
    let violations = check(password);
    if violations.is_empty() {
        return Ok(());
    }
    let needs: Vec<String> = violations.iter().map(ToString::to_string).collect();
    Err(CliError::Validation(format!(
        "password must contain {}",
        needs.join(", ")
    )))
}

/// Generate a random password of `length` characters
///
/// One character of each class is drawn first, the rest come from the union
/// of all classes, then the whole string is shuffled. Uses the OS CSPRNG.
pub fn generate(length: usize) -> CliResult<String> {
    if length < 4 {
        return Err(CliError::Validation(
            "password length must be at least 4".to_string(),
        ));
    }

    let mut rng = OsRng;
    let all: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL].concat();
    let mut chars: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL]
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();
    while chars.len() < length {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    Ok(chars.into_iter().map(char::from).collect())
}
