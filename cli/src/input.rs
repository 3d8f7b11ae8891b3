use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter CEP: ";

/// Print the prompt and read the code from the first line of `input`.
///
/// Only the first whitespace-separated token is kept. The format is not validated.
/// EOF yields an empty code.
pub fn prompt_code<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(first_token(&line).to_string())
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(input: &str) -> (String, String) {
        let mut output = Vec::new();
        let code = prompt_code(&mut Cursor::new(input), &mut output).unwrap();
        (code, String::from_utf8(output).unwrap())
    }

    #[test]
    fn reads_code_and_writes_prompt() {
        let (code, prompt) = read("01001000\n");
        assert_eq!(code, "01001000");
        assert_eq!(prompt, PROMPT);
    }

    #[test]
    fn keeps_only_first_token() {
        assert_eq!(read("  01001-000 extra\r\n").0, "01001-000");
    }

    #[test]
    fn eof_gives_empty_code() {
        assert_eq!(read("").0, "");
    }

    #[test]
    fn only_first_line_is_read() {
        assert_eq!(read("\n01001000\n").0, "");
    }
}
