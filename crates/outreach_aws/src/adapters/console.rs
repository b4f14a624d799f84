use std::io::{BufRead, Write};

use outreach_core::record::{parse_age, CustomerRecord};

use crate::handlers::intake::{CandidateSource, IntakeError, DUPLICATE_ID_NOTICE};

pub const CUSTOMER_ID_PROMPT: &str = "Please enter your unique customer ID: ";
pub const FIRST_NAME_PROMPT: &str = "Please enter your first name: ";
pub const LAST_NAME_PROMPT: &str = "Please enter your last name: ";
pub const INTERESTS_PROMPT: &str = "Please enter your interests separated by commas (,): ";
pub const AGE_PROMPT: &str = "Please enter your age: ";

/// Line-oriented operator prompts over any reader/writer pair.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String, IntakeError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(IntakeError::InputClosed);
        }
        let answer = line.trim_end_matches(['\n', '\r']);
        Ok(answer.to_string())
    }
}

impl<R: BufRead, W: Write> CandidateSource for ConsolePrompter<R, W> {
    fn read_candidate(&mut self) -> Result<CustomerRecord, IntakeError> {
        let customer_id = self.ask(CUSTOMER_ID_PROMPT)?;
        let first_name = self.ask(FIRST_NAME_PROMPT)?;
        let last_name = self.ask(LAST_NAME_PROMPT)?;
        let interests = self.ask(INTERESTS_PROMPT)?;
        let age = parse_age(&self.ask(AGE_PROMPT)?)?;

        Ok(CustomerRecord::new(
            customer_id,
            first_name,
            last_name,
            interests,
            age,
        ))
    }

    fn reject_duplicate(&mut self, _customer_id: &str) -> Result<(), IntakeError> {
        writeln!(self.output, "{DUPLICATE_ID_NOTICE}")?;
        Ok(())
    }
}
