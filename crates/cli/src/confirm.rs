// Destructive-action confirmation prompt.

use std::io::{BufRead, Write};

/// Ask `prompt [y/N]` on the given streams. Only `y`/`yes` (any case)
/// confirms; everything else, including EOF, declines.
pub fn confirm_on<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    prompt: &str,
) -> std::io::Result<bool> {
    write!(writer, "{prompt} [y/N] ")?;
    writer.flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Interactive variant on stdin/stderr.
pub fn confirm(prompt: &str) -> std::io::Result<bool> {
    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr();
    confirm_on(&mut stdin.lock(), &mut stderr, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (bool, String) {
        let mut reader = input.as_bytes();
        let mut written = Vec::new();
        let confirmed = confirm_on(&mut reader, &mut written, "Delete volume cache?").unwrap();
        (confirmed, String::from_utf8(written).unwrap())
    }

    #[test]
    fn yes_answers_confirm() {
        assert!(run("y\n").0);
        assert!(run("Y\n").0);
        assert!(run("yes\n").0);
        assert!(run("  YES  \n").0);
    }

    #[test]
    fn anything_else_declines() {
        assert!(!run("n\n").0);
        assert!(!run("\n").0);
        assert!(!run("sure\n").0);
    }

    #[test]
    fn eof_declines() {
        assert!(!run("").0);
    }

    #[test]
    fn prompt_shows_the_default() {
        let (_, prompt) = run("n\n");
        assert_eq!(prompt, "Delete volume cache? [y/N] ");
    }
}
