use std::{fmt::Display, io::Write};

use anyhow::Result;
use base64::{Engine, engine::general_purpose::STANDARD};
use solana_sdk::{instruction::Instruction, transaction::Transaction};

/// Writes the human readable `label: value` lines a scenario produces.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn line(&mut self, label: &str, value: impl Display) -> Result<()> {
        writeln!(self.out, "{label}: {value}")?;
        Ok(())
    }

    /// Indented line, used for the fields of a listed item.
    pub fn field(&mut self, label: &str, value: impl Display) -> Result<()> {
        writeln!(self.out, "  {label}: {value}")?;
        Ok(())
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    pub fn instructions(&mut self, instructions: &[Instruction]) -> Result<()> {
        self.line("instructions", instructions.len())?;
        for (index, instruction) in instructions.iter().enumerate() {
            writeln!(
                self.out,
                "  #{index} program: {}, accounts: {}, data: {}",
                instruction.program_id,
                instruction.accounts.len(),
                bs58::encode(&instruction.data).into_string()
            )?;
        }
        Ok(())
    }

    /// Base64 wire format of a signed transaction, accepted by explorers' inspectors.
    pub fn transaction(&mut self, transaction: &Transaction) -> Result<()> {
        let bytes = bincode::serialize(transaction)?;
        self.line("transaction (base64)", STANDARD.encode(bytes))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
