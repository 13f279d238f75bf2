//! Parse command implementation.

use crate::cli::{ParseArgs, TextInput};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use perito_rag::ClaimDataParser;
use std::io::Read;

/// Execute the parse command.
///
/// Needs no index; parsing is purely textual.
pub fn execute_parse(args: ParseArgs, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;
    let claim = ClaimDataParser::new().parse(&text);
    println!("{}", formatter.format_claim(&claim)?);
    Ok(())
}

/// Read text from whichever source was given
pub fn read_input(input: &TextInput) -> Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if input.stdin {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Err(CliError::InvalidInput("No input given".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_inline_text() {
        let input = TextInput {
            text: Some("Póliza: 515360".to_string()),
            file: None,
            stdin: false,
        };
        assert_eq!(read_input(&input).unwrap(), "Póliza: 515360");
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Causa: ROTURA DE TUBERIA").unwrap();

        let input = TextInput {
            text: None,
            file: Some(file.path().to_path_buf()),
            stdin: false,
        };
        assert_eq!(read_input(&input).unwrap(), "Causa: ROTURA DE TUBERIA");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let input = TextInput {
            text: None,
            file: Some("/nonexistent/claim.txt".into()),
            stdin: false,
        };
        assert!(matches!(read_input(&input), Err(CliError::Io(_))));
    }
}
