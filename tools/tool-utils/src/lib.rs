//! Interactive helpers shared by the operator tooling

use alloy::primitives::Address;
use eyre::{eyre, Result};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Function to prompt user for a valid Ethereum address
pub fn prompt_for_eth_address(prompt: &str) -> Result<Address> {
    let stdin = io::stdin();
    prompt_for_eth_address_with(prompt, &mut stdin.lock(), &mut io::stdout())
}

/// Prompt for an Ethereum address on the given reader, re-asking until the input
/// parses. Fails if the input is exhausted before a valid address is entered.
pub fn prompt_for_eth_address_with(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Address> {
    loop {
        let line = read_prompted_line(prompt, input, output)?;
        if line.is_empty() {
            return Err(eyre!("no address entered for: {prompt}"));
        }

        match Address::from_str(&line) {
            Ok(address) => return Ok(address),
            Err(_) => {
                writeln!(
                    output,
                    "Invalid Ethereum address format. Please enter a valid address (0x followed by 40 hex characters)."
                )?;
            }
        }
    }
}

/// Write the prompt and read back one trimmed line
fn read_prompted_line(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<String> {
    write!(output, "{}: ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const OWNER: &str = "0x7eB87F93C513a59BE74fb804954019B9be48b98b";

    #[test]
    fn test_prompt_rejects_overlong_address() {
        let mut input = Cursor::new(format!("{OWNER}ff\n\n"));
        let mut output = Vec::new();

        assert!(prompt_for_eth_address_with("Owner", &mut input, &mut output).is_err());
        assert!(String::from_utf8(output).unwrap().contains("Invalid Ethereum address format"));
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut input = Cursor::new(format!("not-an-address\n{OWNER}\n"));
        let mut output = Vec::new();

        let address = prompt_for_eth_address_with("Owner", &mut input, &mut output).unwrap();
        assert_eq!(address, Address::from_str(OWNER).unwrap());

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Owner: ").count(), 2);
        assert!(printed.contains("Invalid Ethereum address format"));
    }

    #[test]
    fn test_prompt_fails_on_eof() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();

        assert!(prompt_for_eth_address_with("Owner", &mut input, &mut output).is_err());
    }
}
