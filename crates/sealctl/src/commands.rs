//! Command execution over arbitrary input and output streams.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use token_vault::{looks_encrypted, Vault};
use tracing::info;

use crate::cli::Command;

/// Run `command` against `vault`, reading values from `input` when they were
/// not given on the command line and writing results to `output`.
///
/// # Errors
///
/// Returns an error on any I/O failure or [`token_vault::VaultError`].
pub fn run<R, W>(command: Command, vault: &Vault, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    match command {
        Command::Seal { value } => {
            let plaintext = value_or_line(value, &mut input)?;
            let sealed = vault.encrypt(&plaintext).context("failed to seal value")?;
            writeln!(output, "{sealed}")?;
        }
        Command::Open { value } => {
            let envelope = value_or_line(value, &mut input)?;
            let plaintext = vault.decrypt(&envelope).context("failed to open envelope")?;
            writeln!(output, "{plaintext}")?;
        }
        Command::Check { value } => {
            let stored = value_or_line(value, &mut input)?;
            let class = if looks_encrypted(&stored) {
                "envelope"
            } else {
                "plaintext"
            };
            writeln!(output, "{class}")?;
        }
        Command::Migrate => migrate(vault, input, &mut output)?,
    }
    output.flush()?;
    Ok(())
}

/// Rewrite every input line, sealing legacy plaintext.
///
/// Stops at the first envelope that fails to open; lines already written stay
/// written.
fn migrate<R, W>(vault: &Vault, input: R, output: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut sealed = 0u64;
    let mut unchanged = 0u64;

    for (idx, line) in input.lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        let line_no = idx + 1;
        let resealed = vault.reseal_if_legacy(&line).map_err(|e| {
            let code = e.code();
            anyhow::Error::new(e)
                .context(format!("line {line_no}: stored value is unusable ({code})"))
        })?;
        match resealed {
            Some(resealed) => {
                sealed += 1;
                writeln!(output, "{resealed}")?;
            }
            None => {
                unchanged += 1;
                writeln!(output, "{line}")?;
            }
        }
    }

    info!(sealed, unchanged, "migration finished");
    Ok(())
}

/// The command-line value if given, otherwise one line of `input` without its
/// line terminator.
fn value_or_line<R: BufRead>(value: Option<String>, input: &mut R) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read stdin")?;
    if read == 0 {
        anyhow::bail!("no value given on the command line or stdin");
    }
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use token_vault::{KdfParams, Secret, VaultError};

    const LEGACY: &str = "access-sandbox-8ab976e6-64bc-4b38-98f7-731e7a349970";

    fn vault(secret: &str) -> Vault {
        let params = KdfParams {
            log_n: 10,
            ..KdfParams::default()
        };
        Vault::with_params(Secret::new(secret).unwrap(), params)
    }

    fn exec(command: Command, vault: &Vault, stdin: &str) -> Result<String> {
        let mut out = Vec::new();
        run(command, vault, Cursor::new(stdin.as_bytes()), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn seal_then_open_via_stdin() {
        let v = vault("s");
        let sealed = exec(Command::Seal { value: None }, &v, &format!("{LEGACY}\n")).unwrap();
        assert!(looks_encrypted(sealed.trim_end()));
        let opened = exec(Command::Open { value: None }, &v, &sealed).unwrap();
        assert_eq!(opened, format!("{LEGACY}\n"));
    }

    #[test]
    fn seal_uses_argument_over_stdin() {
        let v = vault("s");
        let sealed = exec(
            Command::Seal {
                value: Some("arg".into()),
            },
            &v,
            "ignored\n",
        )
        .unwrap();
        assert_eq!(v.decrypt(sealed.trim_end()).unwrap(), "arg");
    }

    #[test]
    fn crlf_is_stripped() {
        let mut input = Cursor::new("tok\r\n".as_bytes());
        assert_eq!(value_or_line(None, &mut input).unwrap(), "tok");
    }

    #[test]
    fn empty_stdin_is_an_error() {
        let v = vault("s");
        assert!(exec(Command::Check { value: None }, &v, "").is_err());
    }

    #[test]
    fn check_classifies_without_opening() {
        let v = vault("s");
        let sealed = vault("other").encrypt("tok").unwrap();
        let out = exec(Command::Check { value: Some(sealed) }, &v, "").unwrap();
        assert_eq!(out, "envelope\n");
        let out = exec(
            Command::Check {
                value: Some(LEGACY.into()),
            },
            &v,
            "",
        )
        .unwrap();
        assert_eq!(out, "plaintext\n");
    }

    #[test]
    fn open_with_wrong_secret_reports_integrity_error() {
        let sealed = vault("one").encrypt("tok").unwrap();
        let err = exec(Command::Open { value: Some(sealed) }, &vault("two"), "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::Integrity)
        ));
    }

    #[test]
    fn migrate_seals_legacy_and_keeps_envelopes() {
        let v = vault("s");
        let existing = v.encrypt("already-sealed").unwrap();
        let stdin = format!("{LEGACY}\n{existing}\n");
        let out = exec(Command::Migrate, &v, &stdin).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(v.decrypt(lines[0]).unwrap(), LEGACY);
        assert_eq!(lines[1], existing);
    }

    #[test]
    fn migrate_stops_on_unusable_envelope() {
        let foreign = vault("other").encrypt("tok").unwrap();
        let err = exec(Command::Migrate, &vault("s"), &format!("{foreign}\n")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 1"));
        assert!(msg.contains("integrity_error"));
        assert!(matches!(
            err.downcast_ref::<VaultError>(),
            Some(VaultError::Integrity)
        ));
    }

    #[test]
    fn migrate_passes_sealed_empty_token_through() {
        let v = vault("s");
        let empty = v.encrypt("").unwrap();
        let out = exec(Command::Migrate, &v, &format!("{empty}\n")).unwrap();
        assert_eq!(out, format!("{empty}\n"));
        assert_eq!(v.decrypt(out.trim_end()).unwrap(), "");
    }
}
